use auction_engine::domain::{
    auction::{Auction, AuctionKind},
    events::GameEvent,
    participant::Participant,
    session::{Session, SessionPhase},
    Money, SessionCode,
};
use auction_engine::engine::{
    self,
    errors::EngineError,
    turns::{next_active_after, next_active_excluding},
    RandomSource,
};
use auction_engine::infra::ids::IdGenerator;
use auction_engine::infra::rng::DeterministicRng;

/// Детерминированный RNG для тестов: shuffle ничего не делает,
/// pick_index всегда 0 => изымается купюра номиналом 2 (индекс 1).
#[derive(Default)]
struct NoopRng;

impl RandomSource for NoopRng {
    fn shuffle<T>(&mut self, _slice: &mut [T]) {
        // no-op
    }

    fn pick_index(&mut self, _upper: usize) -> usize {
        0
    }
}

fn waiting_session() -> Session {
    let mut session = Session::new(SessionCode::new("TEST"), Participant::new(1, "Анна", false));
    engine::add_participant(&mut session, 2, "Борис", false).unwrap();
    engine::add_participant(&mut session, 3, "Вера", false).unwrap();
    session
}

fn started_session() -> Session {
    let mut session = waiting_session();
    engine::start_session(&mut session, &mut NoopRng, &IdGenerator::new()).unwrap();
    session
}

//
// add_participant / remove_participant
//

#[test]
fn add_participant_respects_capacity() {
    let mut session = waiting_session();
    engine::add_participant(&mut session, 4, "Галя", false).unwrap();
    engine::add_participant(&mut session, 5, "Дима", true).unwrap();
    assert_eq!(session.participants.len(), 5);

    assert_eq!(
        engine::add_participant(&mut session, 6, "Ева", false),
        Err(EngineError::SessionFull)
    );
}

#[test]
fn add_participant_rejects_taken_name_case_insensitive() {
    let mut session = Session::new(SessionCode::new("TEST"), Participant::new(1, "Alice", false));
    assert_eq!(
        engine::add_participant(&mut session, 2, "aLICE", false),
        Err(EngineError::NameTaken("aLICE".into()))
    );
}

#[test]
fn taken_name_check_folds_cyrillic_case() {
    let mut session = Session::new(SessionCode::new("TEST"), Participant::new(1, "Анна", false));
    assert_eq!(
        engine::add_participant(&mut session, 2, "анна", false),
        Err(EngineError::NameTaken("анна".into()))
    );
    assert_eq!(session.participants.len(), 1);
}

#[test]
fn add_participant_rejected_after_start() {
    let mut session = started_session();
    assert_eq!(
        engine::add_participant(&mut session, 9, "Поздний", false),
        Err(EngineError::AlreadyStarted)
    );
}

#[test]
fn remove_participant_hands_host_over() {
    let mut session = waiting_session();
    assert_eq!(session.host_id, 1);

    engine::remove_participant(&mut session, 1).unwrap();
    assert_eq!(session.host_id, 2);
    assert_eq!(session.participants.len(), 2);

    assert_eq!(
        engine::remove_participant(&mut session, 42),
        Err(EngineError::ParticipantNotFound(42))
    );
}

#[test]
fn remove_participant_rejected_after_start() {
    let mut session = started_session();
    assert_eq!(
        engine::remove_participant(&mut session, 2),
        Err(EngineError::AlreadyStarted)
    );
}

//
// start_session
//

#[test]
fn start_requires_three_participants() {
    let mut session = Session::new(SessionCode::new("TEST"), Participant::new(1, "Анна", false));
    engine::add_participant(&mut session, 2, "Борис", false).unwrap();

    assert_eq!(
        engine::start_session(&mut session, &mut NoopRng, &IdGenerator::new()),
        Err(EngineError::NotEnoughParticipants)
    );
    assert_eq!(session.phase, SessionPhase::Waiting);
}

#[test]
fn start_twice_is_rejected() {
    let mut session = started_session();
    assert_eq!(
        engine::start_session(&mut session, &mut NoopRng, &IdGenerator::new()),
        Err(EngineError::AlreadyStarted)
    );
}

#[test]
fn started_session_opens_first_auction() {
    let session = started_session();

    assert_eq!(session.phase, SessionPhase::Auction);
    // одна карта уже на столе
    assert!(session.current_card.is_some());
    assert_eq!(session.deck.len(), 14);

    let auction = session.auction.as_ref().unwrap();
    assert_eq!(auction.kind, AuctionKind::Standard);
    assert_eq!(auction.starting_participant_id, 1);
    assert_eq!(auction.turn_participant_id, 1);
    assert_eq!(auction.active_participant_ids.len(), 3);
    assert_eq!(auction.highest_bid, Money::ZERO);

    assert!(session.events.iter().any(|e| matches!(e, GameEvent::GameStarted)));
    assert!(session
        .events
        .iter()
        .any(|e| matches!(e, GameEvent::RoundStarted { .. })));
}

#[test]
fn each_hand_has_ten_notes_and_one_removed() {
    let session = started_session();

    for p in &session.participants {
        assert_eq!(p.money_hand.len(), 10);
        let removed = p.removed_note.as_ref().unwrap();
        // NoopRng выбирает индекс 0 => изымается номинал 2
        assert_eq!(removed.value, Money(2));
        assert!(!p.money_hand.iter().any(|n| n.value == removed.value));
    }
}

#[test]
fn removed_note_is_never_extreme_denomination() {
    for seed in 0..64 {
        let mut session = waiting_session();
        let mut rng = DeterministicRng::from_seed(seed);
        engine::start_session(&mut session, &mut rng, &IdGenerator::new()).unwrap();

        for p in &session.participants {
            let removed = p.removed_note.as_ref().unwrap();
            assert_ne!(removed.value, Money(1), "seed {seed}: изъят минимум");
            assert_ne!(removed.value, Money(25), "seed {seed}: изъят максимум");
        }
    }
}

#[test]
fn swap_card_never_among_first_seven_draws() {
    for seed in 0..128 {
        let mut session = waiting_session();
        let mut rng = DeterministicRng::from_seed(seed);
        engine::start_session(&mut session, &mut rng, &IdGenerator::new()).unwrap();

        // карты снимаются с конца вектора, значит «поздняя» половина
        // лежит в начале: карта обмена обязана сидеть в первых 8 позициях
        assert!(!session.current_card.unwrap().is_swap(), "seed {seed}");
        let swap_pos = session
            .deck
            .cards
            .iter()
            .position(|c| c.is_swap())
            .expect("карта обмена пропала из колоды");
        assert!(swap_pos < 8, "seed {seed}: swap на позиции {swap_pos}");
    }
}

//
// turns.rs
//

fn seats(ids: &[u64]) -> Vec<Participant> {
    ids.iter()
        .map(|&id| Participant::new(id, format!("p{id}"), false))
        .collect()
}

#[test]
fn next_active_walks_the_circle() {
    let participants = seats(&[1, 2, 3]);
    let auction = Auction::new(AuctionKind::Standard, vec![1, 2, 3], 1);

    assert_eq!(next_active_after(&participants, &auction, 1), Ok(2));
    assert_eq!(next_active_after(&participants, &auction, 3), Ok(1));
}

#[test]
fn next_active_skips_inactive_seats() {
    let participants = seats(&[1, 2, 3]);
    let mut auction = Auction::new(AuctionKind::Standard, vec![1, 2, 3], 1);
    auction.remove_active(2);

    assert_eq!(next_active_after(&participants, &auction, 1), Ok(3));
    assert_eq!(next_active_excluding(&participants, &auction, 3), Ok(1));
}

#[test]
fn exhausted_circle_is_an_explicit_error() {
    let participants = seats(&[1, 2, 3]);
    let mut auction = Auction::new(AuctionKind::Standard, vec![1, 2, 3], 1);
    auction.remove_active(1);
    auction.remove_active(2);

    // единственный активный сам исключён из рассмотрения
    assert_eq!(
        next_active_excluding(&participants, &auction, 3),
        Err(EngineError::NoActiveParticipants)
    );
    // но по кругу «после» него он находится
    assert_eq!(next_active_after(&participants, &auction, 3), Ok(3));
}
