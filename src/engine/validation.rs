use serde::{Deserialize, Serialize};

use crate::domain::money::Money;
use crate::domain::participant::Participant;
use crate::domain::session::{Session, SessionPhase};
use crate::domain::{CardId, NoteId, ParticipantId};
use crate::engine::errors::EngineError;

/// Проверки перед мутацией. Все функции здесь read-only:
/// отклонённая операция не должна тронуть сессию.

/// Общие охранники хода в аукционе: фаза, очередь, пас.
pub fn validate_turn(session: &Session, participant_id: ParticipantId) -> Result<(), EngineError> {
    if session.phase != SessionPhase::Auction {
        return Err(EngineError::WrongPhase);
    }
    let auction = session
        .auction
        .as_ref()
        .ok_or(EngineError::NoActiveAuction)?;

    let participant = session
        .participant(participant_id)
        .ok_or(EngineError::ParticipantNotFound(participant_id))?;

    if auction.turn_participant_id != participant_id {
        return Err(EngineError::NotYourTurn(participant_id));
    }
    if participant.has_passed || !auction.is_active(participant_id) {
        return Err(EngineError::AlreadyPassed(participant_id));
    }

    Ok(())
}

/// Проверка ставки. Возвращает новую полную сумму ставки
/// (уже заявленные купюры ∪ новые), если она строго перебивает старшую.
pub fn validate_bid(
    session: &Session,
    participant_id: ParticipantId,
    note_ids: &[NoteId],
) -> Result<Money, EngineError> {
    validate_turn(session, participant_id)?;

    if note_ids.is_empty() {
        return Err(EngineError::InvalidBid);
    }

    let auction = session.auction.as_ref().ok_or(EngineError::NoActiveAuction)?;
    let participant = session
        .participant(participant_id)
        .ok_or(EngineError::ParticipantNotFound(participant_id))?;

    let mut added = Money::ZERO;
    for (i, &note_id) in note_ids.iter().enumerate() {
        let note = participant
            .note(note_id)
            .filter(|n| n.available)
            .ok_or(EngineError::NoteUnavailable(note_id))?;
        if participant.current_bid.contains(&note_id) || note_ids[..i].contains(&note_id) {
            return Err(EngineError::NoteAlreadyCommitted(note_id));
        }
        added += note.value;
    }

    let total = participant.bid_total() + added;
    if total <= auction.highest_bid {
        return Err(EngineError::InvalidBid);
    }

    Ok(total)
}

/// Запрос обмена картами. Все четыре поля отсутствуют – валидный «пропустить».
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SwapRequest {
    pub first_participant_id: Option<ParticipantId>,
    pub first_card_id: Option<CardId>,
    pub second_participant_id: Option<ParticipantId>,
    pub second_card_id: Option<CardId>,
}

/// Разобранный запрос обмена.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SwapChoice {
    Skip,
    Swap {
        first_participant_id: ParticipantId,
        first_card_id: CardId,
        second_participant_id: ParticipantId,
        second_card_id: CardId,
    },
}

impl SwapRequest {
    pub fn skip() -> Self {
        Self::default()
    }

    pub fn swap(p1: ParticipantId, c1: CardId, p2: ParticipantId, c2: CardId) -> Self {
        Self {
            first_participant_id: Some(p1),
            first_card_id: Some(c1),
            second_participant_id: Some(p2),
            second_card_id: Some(c2),
        }
    }
}

/// Проверка запроса обмена: либо все поля пусты (skip), либо все заполнены
/// и указывают на реальные карты у реальных участников.
pub fn validate_swap(
    session: &Session,
    executor_id: ParticipantId,
    request: &SwapRequest,
) -> Result<SwapChoice, EngineError> {
    if session.phase != SessionPhase::CardSwap {
        return Err(EngineError::WrongPhase);
    }
    if session.swap_winner_id != Some(executor_id) {
        return Err(EngineError::NotSwapWinner(executor_id));
    }

    match (
        request.first_participant_id,
        request.first_card_id,
        request.second_participant_id,
        request.second_card_id,
    ) {
        (None, None, None, None) => Ok(SwapChoice::Skip),
        (Some(p1), Some(c1), Some(p2), Some(c2)) => {
            ensure_owns_card(session, p1, c1)?;
            ensure_owns_card(session, p2, c2)?;
            if c1 == c2 {
                return Err(EngineError::SelfSwap);
            }
            Ok(SwapChoice::Swap {
                first_participant_id: p1,
                first_card_id: c1,
                second_participant_id: p2,
                second_card_id: c2,
            })
        }
        _ => Err(EngineError::IncompleteSwapRequest),
    }
}

fn ensure_owns_card(
    session: &Session,
    participant_id: ParticipantId,
    card_id: CardId,
) -> Result<(), EngineError> {
    let participant: &Participant = session
        .participant(participant_id)
        .ok_or(EngineError::ParticipantNotFound(participant_id))?;
    participant
        .card(card_id)
        .ok_or(EngineError::CardNotFound(card_id))?;
    Ok(())
}

/// Проверка сброса роскоши.
pub fn validate_discard(
    session: &Session,
    participant_id: ParticipantId,
    card_id: CardId,
) -> Result<(), EngineError> {
    if session.phase != SessionPhase::DiscardLuxury {
        return Err(EngineError::WrongPhase);
    }
    if session.discarding_participant_id != Some(participant_id) {
        return Err(EngineError::NotDiscarding(participant_id));
    }

    let participant = session
        .participant(participant_id)
        .ok_or(EngineError::ParticipantNotFound(participant_id))?;
    let card = participant
        .card(card_id)
        .ok_or(EngineError::CardNotFound(card_id))?;
    if !card.is_luxury() {
        return Err(EngineError::NotALuxuryCard(card_id));
    }

    Ok(())
}
