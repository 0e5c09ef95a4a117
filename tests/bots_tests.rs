//
// Боты: базовая политика решений и оркестратор полной партии.
//

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use auction_engine::api::queries::build_state_view;
use auction_engine::api::{handle_command, AutoFill, Command, StartGameOptions};
use auction_engine::bots::{
    BaselinePolicy, BotAction, BotConfig, DecisionPolicy, PolicyError,
};
use auction_engine::domain::{
    card::CardKind,
    deck::DECK_SIZE,
    participant::Participant,
    session::{Session, SessionPhase},
    Money, SessionCode,
};
use auction_engine::engine::{self, RandomSource, SwapRequest};
use auction_engine::infra::ids::IdGenerator;
use auction_engine::lobby::{SessionRegistry, SharedSession};

#[derive(Default)]
struct NoopRng;

impl RandomSource for NoopRng {
    fn shuffle<T>(&mut self, _slice: &mut [T]) {}

    fn pick_index(&mut self, _upper: usize) -> usize {
        0
    }
}

/// Три места, игра запущена; с NoopRng первый лот – роскошь (7).
fn started_session() -> Session {
    let mut session = Session::new(SessionCode::new("BOTS"), Participant::new(1, "Анна", true));
    engine::add_participant(&mut session, 2, "Борис", true).unwrap();
    engine::add_participant(&mut session, 3, "Вера", true).unwrap();
    engine::start_session(&mut session, &mut NoopRng, &IdGenerator::new()).unwrap();
    session
}

fn decide(policy: &BaselinePolicy, session: &Session, actor: u64) -> BotAction {
    let view = build_state_view(session, actor);
    policy
        .decide(&view.public, view.private.as_ref().unwrap())
        .unwrap()
        .action
}

//
// BaselinePolicy
//

#[test]
fn baseline_opens_with_a_minimal_bid() {
    let policy = BaselinePolicy::new(Some(1));
    let session = started_session();

    let action = decide(&policy, &session, 1);
    let BotAction::PlaceBid(notes) = action else {
        panic!("ожидалась ставка, получили {action:?}");
    };
    // минимальный перебив нуля – одна купюра номиналом 1
    assert_eq!(notes.len(), 1);
    let value = session.participant(1).unwrap().note(notes[0]).unwrap().value;
    assert_eq!(value, Money(1));
}

#[test]
fn baseline_passes_when_the_price_exceeds_its_cap() {
    let policy = BaselinePolicy::new(Some(1));
    let mut session = started_session();
    // потолок для роскоши (7) – 21; перебив 25 обойдётся дороже
    session.auction.as_mut().unwrap().highest_bid = Money(25);

    assert_eq!(decide(&policy, &session, 1), BotAction::Pass);
}

#[test]
fn baseline_never_swaps() {
    let policy = BaselinePolicy::new(Some(1));
    let mut session = started_session();
    session.current_card = None;
    session.auction = None;
    session.phase = SessionPhase::CardSwap;
    session.swap_winner_id = Some(2);

    assert_eq!(
        decide(&policy, &session, 2),
        BotAction::Swap(SwapRequest::skip())
    );
}

#[test]
fn baseline_discards_the_cheapest_luxury() {
    let policy = BaselinePolicy::new(Some(1));
    let mut session = started_session();
    {
        let p = session.participant_mut(2).unwrap();
        p.won_cards.push(auction_engine::domain::card::ItemCard::new(
            70,
            CardKind::Luxury { value: 6 },
        ));
        p.won_cards.push(auction_engine::domain::card::ItemCard::new(
            71,
            CardKind::Luxury { value: 2 },
        ));
    }
    session.current_card = None;
    session.auction = None;
    session.phase = SessionPhase::DiscardLuxury;
    session.discarding_participant_id = Some(2);

    assert_eq!(decide(&policy, &session, 2), BotAction::Discard(71));
}

//
// Оркестратор
//

async fn wait_for_game_over(ctx: &SharedSession) {
    for _ in 0..500 {
        {
            let guard = ctx.lock().unwrap();
            if guard.session.phase == SessionPhase::GameOver {
                return;
            }
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("партия ботов не завершилась за отведённое время");
}

fn assert_full_game_invariants(ctx: &SharedSession) {
    let guard = ctx.lock().unwrap();
    let session = &guard.session;

    assert_eq!(session.phase, SessionPhase::GameOver);
    assert!(session.deck.is_empty());
    assert!(session.current_card.is_none());

    // сохранение карт после полной партии
    let mut ids = HashSet::new();
    for p in &session.participants {
        for c in &p.won_cards {
            ids.insert(c.id);
        }
        assert_eq!(p.money_hand.len(), 10);
    }
    for c in &session.removed_from_game {
        ids.insert(c.id);
    }
    assert_eq!(ids.len(), DECK_SIZE);

    let results = session.results.as_ref().unwrap();
    assert_eq!(results.len(), session.participants.len());
    assert!(results.iter().any(|r| r.eliminated));
}

#[tokio::test(flavor = "multi_thread")]
async fn all_bot_game_runs_to_completion() {
    let mut registry = SessionRegistry::new(
        Arc::new(BaselinePolicy::new(Some(3))),
        BotConfig::instant(),
    );

    let resp = handle_command(
        &mut registry,
        1,
        Command::CreateRoom {
            name: "Ведущий".into(),
            auto_fill: AutoFill::ToFull,
        },
    )
    .unwrap();
    let code = match resp {
        auction_engine::api::CommandResponse::RoomCreated { code, .. } => code,
        other => panic!("ожидался RoomCreated, получили {other:?}"),
    };

    // политика автодобора задана при создании комнаты
    handle_command(
        &mut registry,
        1,
        Command::StartGame(StartGameOptions {
            auto_fill: None,
            spectator_mode: true,
        }),
    )
    .unwrap();

    let ctx = registry.session(&SessionCode::new(code)).unwrap();
    wait_for_game_over(&ctx).await;
    assert_full_game_invariants(&ctx);

    {
        let guard = ctx.lock().unwrap();
        assert_eq!(guard.session.participants.len(), 5);
        assert!(guard.session.participants.iter().all(|p| p.is_automated));
    }

    // наблюдатель по-прежнему может читать состояние
    let state = handle_command(&mut registry, 1, Command::GetState).unwrap();
    let auction_engine::api::CommandResponse::State(state) = state else {
        panic!("ожидался State");
    };
    assert!(state.private.is_none());
    assert!(state.public.results.is_some());
}

/// Политика, которая всегда падает: оркестратор обязан деградировать
/// до безопасных действий по умолчанию и довести партию до конца.
struct FailingPolicy;

impl DecisionPolicy for FailingPolicy {
    fn decide(
        &self,
        _public: &auction_engine::api::PublicView,
        _private: &auction_engine::api::PrivateView,
    ) -> Result<auction_engine::bots::BotDecision, PolicyError> {
        Err(PolicyError::Internal("испытательный отказ".into()))
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn failing_policy_degrades_to_safe_defaults() {
    let mut registry = SessionRegistry::new(Arc::new(FailingPolicy), BotConfig::instant());

    let resp = handle_command(
        &mut registry,
        1,
        Command::CreateRoom {
            name: "Ведущий".into(),
            auto_fill: AutoFill::Off,
        },
    )
    .unwrap();
    let code = match resp {
        auction_engine::api::CommandResponse::RoomCreated { code, .. } => code,
        other => panic!("ожидался RoomCreated, получили {other:?}"),
    };

    handle_command(
        &mut registry,
        1,
        Command::StartGame(StartGameOptions {
            auto_fill: Some(AutoFill::ToMinimum),
            spectator_mode: true,
        }),
    )
    .unwrap();

    let ctx = registry.session(&SessionCode::new(code)).unwrap();
    wait_for_game_over(&ctx).await;
    assert_full_game_invariants(&ctx);

    // при сплошных пасах никто не потратил ни купюры
    let guard = ctx.lock().unwrap();
    for p in &guard.session.participants {
        assert_eq!(p.available_money(), p.money_hand.iter().map(|n| n.value).sum());
    }
}
