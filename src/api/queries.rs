use crate::api::dto::{
    AuctionDto, MoneyNoteDto, ParticipantPublicDto, PrivateView, PublicView, StateView,
};
use crate::domain::money::MoneyNote;
use crate::domain::session::Session;
use crate::domain::ParticipantId;

/// Публичное представление сессии. Чистая проекция: повторный вызов без
/// промежуточных действий даёт идентичный результат.
pub fn build_public_view(session: &Session) -> PublicView {
    PublicView {
        code: session.code.as_str().to_string(),
        phase: session.phase,
        host_id: session.host_id,
        participants: session
            .participants
            .iter()
            .map(|p| ParticipantPublicDto {
                id: p.id,
                name: p.name.clone(),
                is_automated: p.is_automated,
                connected: p.connected,
                has_passed: p.has_passed,
                bid_total: p.bid_total(),
                won_cards: p.won_cards.clone(),
            })
            .collect(),
        current_card: session.current_card,
        auction: session.auction.as_ref().map(|a| AuctionDto {
            kind: a.kind,
            highest_bid: a.highest_bid,
            highest_bidder_id: a.highest_bidder_id,
            active_participant_ids: a.active_participant_ids.clone(),
            turn_participant_id: a.turn_participant_id,
        }),
        deck_remaining: session.deck.len(),
        swap_winner_id: session.swap_winner_id,
        discarding_participant_id: session.discarding_participant_id,
        results: session.results.clone(),
    }
}

fn note_dto(note: &MoneyNote) -> MoneyNoteDto {
    MoneyNoteDto {
        id: note.id,
        value: note.value,
        available: note.available,
    }
}

/// Приватное представление для конкретного участника.
pub fn build_private_view(session: &Session, participant_id: ParticipantId) -> Option<PrivateView> {
    let participant = session.participant(participant_id)?;
    Some(PrivateView {
        participant_id,
        money_hand: participant.money_hand.iter().map(note_dto).collect(),
        available_money: participant.available_money(),
        current_bid: participant.current_bid.clone(),
        removed_note: participant.removed_note.as_ref().map(note_dto),
    })
}

/// Полное представление для вызывающего (наблюдателю – только публичное).
pub fn build_state_view(session: &Session, caller_id: ParticipantId) -> StateView {
    StateView {
        public: build_public_view(session),
        private: build_private_view(session, caller_id),
    }
}
