use serde::{Deserialize, Serialize};

use crate::domain::auction::AuctionKind;
use crate::domain::card::ItemCard;
use crate::domain::money::Money;
use crate::domain::scoring::ParticipantResult;
use crate::domain::session::SessionPhase;
use crate::domain::{NoteId, ParticipantId};

/// Публичное представление участника – поля, видимые всем за столом.
/// Рука купюр сюда не входит (она в PrivateView владельца).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ParticipantPublicDto {
    pub id: ParticipantId,
    pub name: String,
    pub is_automated: bool,
    pub connected: bool,
    pub has_passed: bool,
    /// Сумма текущей заявленной ставки – публична в ходе аукциона.
    pub bid_total: Money,
    pub won_cards: Vec<ItemCard>,
}

/// Публичное состояние аукциона.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AuctionDto {
    pub kind: AuctionKind,
    pub highest_bid: Money,
    pub highest_bidder_id: Option<ParticipantId>,
    pub active_participant_ids: Vec<ParticipantId>,
    pub turn_participant_id: ParticipantId,
}

/// Публичное представление сессии: одно на всех подписчиков.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PublicView {
    pub code: String,
    pub phase: SessionPhase,
    pub host_id: ParticipantId,
    pub participants: Vec<ParticipantPublicDto>,
    pub current_card: Option<ItemCard>,
    pub auction: Option<AuctionDto>,
    pub deck_remaining: usize,
    pub swap_winner_id: Option<ParticipantId>,
    pub discarding_participant_id: Option<ParticipantId>,
    pub results: Option<Vec<ParticipantResult>>,
}

/// Купюра в приватном представлении.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct MoneyNoteDto {
    pub id: NoteId,
    pub value: Money,
    pub available: bool,
}

/// Приватное представление – только для самого участника:
/// рука купюр, заявленная ставка, изъятая при старте купюра.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PrivateView {
    pub participant_id: ParticipantId,
    pub money_hand: Vec<MoneyNoteDto>,
    pub available_money: Money,
    pub current_bid: Vec<NoteId>,
    pub removed_note: Option<MoneyNoteDto>,
}

/// Полное представление для конкретного вызывающего.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct StateView {
    pub public: PublicView,
    /// None – вызывающий не сидит за столом (наблюдатель).
    pub private: Option<PrivateView>,
}

/// Ответ API на команду.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub enum CommandResponse {
    /// Успешный результат без доп. данных.
    Ok,
    /// Комната создана.
    RoomCreated { code: String, state: StateView },
    /// Актуальное состояние для вызывающего.
    State(Box<StateView>),
}
