use serde::{Deserialize, Serialize};

use crate::domain::auction::AuctionKind;
use crate::domain::card::ItemCard;
use crate::domain::money::Money;
use crate::domain::scoring::ParticipantResult;
use crate::domain::{CardId, ParticipantId};

/// Событие игры – факт, который уже произошёл.
///
/// Лог событий – то, что слой вещания (внешний коллаборатор) транслирует
/// подписчикам. Сброс раунда и дисконнект/реконнект идут отдельными
/// событиями, чтобы фронт мог показать их явно.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub enum GameEvent {
    ParticipantJoined {
        participant_id: ParticipantId,
        name: String,
        is_automated: bool,
    },
    ParticipantLeft {
        participant_id: ParticipantId,
    },
    GameStarted,
    RoundStarted {
        card: ItemCard,
        auction_kind: AuctionKind,
        starting_participant_id: ParticipantId,
    },
    BidPlaced {
        participant_id: ParticipantId,
        bid_total: Money,
    },
    TurnPassed {
        participant_id: ParticipantId,
    },
    /// Обычный аукцион: победитель забрал лот и заплатил.
    AuctionWon {
        participant_id: ParticipantId,
        card_id: CardId,
        paid: Money,
    },
    /// Обратный аукцион: первый спасовавший застрял с картой.
    AuctionStuck {
        participant_id: ParticipantId,
        card_id: CardId,
    },
    CardsSwapped {
        first_participant_id: ParticipantId,
        first_card_id: CardId,
        second_participant_id: ParticipantId,
        second_card_id: CardId,
    },
    SwapSkipped {
        participant_id: ParticipantId,
    },
    LuxuryDiscarded {
        participant_id: ParticipantId,
        card_id: CardId,
    },
    /// Аукцион за текущий лот начат заново (реконнект): ставки возвращены,
    /// пасы сняты, ход у исходного стартующего.
    AuctionRestarted {
        card_id: CardId,
    },
    ParticipantDisconnected {
        participant_id: ParticipantId,
    },
    ParticipantRejoined {
        old_id: ParticipantId,
        new_id: ParticipantId,
    },
    /// Реплика бота (болтовня, настроена политикой).
    BotComment {
        participant_id: ParticipantId,
        text: String,
    },
    GameFinished {
        results: Vec<ParticipantResult>,
    },
}

/// Накопительный лог событий одной сессии.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct EventLog {
    events: Vec<GameEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn iter(&self) -> impl Iterator<Item = &GameEvent> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Забрать накопленные события (для слоя вещания).
    pub fn drain(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
