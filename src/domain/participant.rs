use serde::{Deserialize, Serialize};

use crate::domain::card::ItemCard;
use crate::domain::money::{Money, MoneyNote, NOTE_DENOMINATIONS};
use crate::domain::{NoteId, ParticipantId};

/// Участник сессии – одно "место" за столом.
///
/// Для живого игрока `id` совпадает с идентификатором соединения и может
/// быть перепривязан при реконнекте (см. lobby::continuity).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Participant {
    pub id: ParticipantId,
    pub name: String,
    pub is_automated: bool,
    /// false – место занято, но соединение потеряно (ждём реконнект).
    pub connected: bool,
    /// Рука купюр. Купюры не покидают руку, а помечаются available=false.
    pub money_hand: Vec<MoneyNote>,
    pub won_cards: Vec<ItemCard>,
    /// Текущая заявленная ставка – подмножество id купюр из money_hand.
    pub current_bid: Vec<NoteId>,
    pub has_passed: bool,
    /// Купюра, изъятая при старте игры (никогда не мин./макс. номинал).
    pub removed_note: Option<MoneyNote>,
}

impl Participant {
    pub fn new(id: ParticipantId, name: impl Into<String>, is_automated: bool) -> Self {
        Self {
            id,
            name: name.into(),
            is_automated,
            connected: true,
            money_hand: Vec::new(),
            won_cards: Vec::new(),
            current_bid: Vec::new(),
            has_passed: false,
            removed_note: None,
        }
    }

    /// Раздать стартовую руку: по одной купюре каждого номинала.
    pub fn deal_money_hand(&mut self, mut next_note_id: impl FnMut() -> NoteId) {
        self.money_hand = NOTE_DENOMINATIONS
            .iter()
            .map(|&v| MoneyNote::new(next_note_id(), Money::new(v)))
            .collect();
    }

    pub fn note(&self, id: NoteId) -> Option<&MoneyNote> {
        self.money_hand.iter().find(|n| n.id == id)
    }

    pub fn note_mut(&mut self, id: NoteId) -> Option<&mut MoneyNote> {
        self.money_hand.iter_mut().find(|n| n.id == id)
    }

    /// Сколько участник ещё может потратить: сумма доступных купюр.
    pub fn available_money(&self) -> Money {
        self.money_hand
            .iter()
            .filter(|n| n.available)
            .map(|n| n.value)
            .sum()
    }

    /// Сумма текущей заявленной ставки.
    pub fn bid_total(&self) -> Money {
        self.current_bid
            .iter()
            .filter_map(|id| self.note(*id))
            .map(|n| n.value)
            .sum()
    }

    pub fn card(&self, id: crate::domain::CardId) -> Option<&ItemCard> {
        self.won_cards.iter().find(|c| c.id == id)
    }

    /// Сбросить раундовое состояние (ставка, флаг паса).
    pub fn clear_round_state(&mut self) {
        self.current_bid.clear();
        self.has_passed = false;
    }
}
