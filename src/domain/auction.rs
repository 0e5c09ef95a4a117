use serde::{Deserialize, Serialize};

use crate::domain::money::Money;
use crate::domain::ParticipantId;

/// Тип аукциона.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum AuctionKind {
    /// Обычный: карту забирает старшая ставка (и платит её).
    Standard,
    /// Обратный (карты позора): карту забирает первый спасовавший,
    /// остальные теряют уже заявленные купюры.
    Reverse,
}

/// Состояние текущего аукциона. Существует только в фазе AUCTION.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Auction {
    pub kind: AuctionKind,
    /// Сумма старшей ставки (0, пока никто не ставил).
    pub highest_bid: Money,
    pub highest_bidder_id: Option<ParticipantId>,
    /// Кто ещё борется за лот (подмножество всех участников).
    pub active_participant_ids: Vec<ParticipantId>,
    /// Чей сейчас ход.
    pub turn_participant_id: ParticipantId,
    /// С кого раунд начался. Нужен, чтобы рестарт аукциона (реконнект)
    /// вернул ход исходному стартующему.
    pub starting_participant_id: ParticipantId,
}

impl Auction {
    pub fn new(
        kind: AuctionKind,
        active_participant_ids: Vec<ParticipantId>,
        starting_participant_id: ParticipantId,
    ) -> Self {
        Self {
            kind,
            highest_bid: Money::ZERO,
            highest_bidder_id: None,
            active_participant_ids,
            turn_participant_id: starting_participant_id,
            starting_participant_id,
        }
    }

    pub fn is_active(&self, id: ParticipantId) -> bool {
        self.active_participant_ids.contains(&id)
    }

    /// Убрать участника из борьбы за лот.
    pub fn remove_active(&mut self, id: ParticipantId) {
        self.active_participant_ids.retain(|&p| p != id);
    }
}
