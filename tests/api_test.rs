//
// Внешняя поверхность: диспетчеризация команд, представления, категории ошибок.
//

use auction_engine::api::{
    handle_command, ApiError, AutoFill, Command, CommandResponse, ErrorCategory, StartGameOptions,
    StateView,
};
use auction_engine::domain::session::SessionPhase;
use auction_engine::lobby::SessionRegistry;

fn create_room(registry: &mut SessionRegistry, conn: u64, name: &str) -> String {
    let resp = handle_command(
        registry,
        conn,
        Command::CreateRoom {
            name: name.into(),
            auto_fill: AutoFill::Off,
        },
    )
    .unwrap();
    match resp {
        CommandResponse::RoomCreated { code, .. } => code,
        other => panic!("ожидался RoomCreated, получили {other:?}"),
    }
}

fn get_state(registry: &mut SessionRegistry, conn: u64) -> StateView {
    match handle_command(registry, conn, Command::GetState).unwrap() {
        CommandResponse::State(state) => *state,
        other => panic!("ожидался State, получили {other:?}"),
    }
}

fn category(err: ApiError) -> ErrorCategory {
    err.category
}

/// Комната с тремя игроками, игра запущена без ботов.
fn started_registry() -> SessionRegistry {
    let mut registry = SessionRegistry::with_defaults();
    let code = create_room(&mut registry, 1, "Анна");
    handle_command(
        &mut registry,
        2,
        Command::JoinRoom {
            code: code.clone(),
            name: "Борис".into(),
        },
    )
    .unwrap();
    handle_command(
        &mut registry,
        3,
        Command::JoinRoom {
            code,
            name: "Вера".into(),
        },
    )
    .unwrap();
    handle_command(
        &mut registry,
        1,
        Command::StartGame(StartGameOptions {
            auto_fill: Some(AutoFill::Off),
            spectator_mode: false,
        }),
    )
    .unwrap();
    registry
}

//
// Создание и вход
//

#[test]
fn create_room_returns_code_and_private_view() {
    let mut registry = SessionRegistry::with_defaults();
    let resp = handle_command(
        &mut registry,
        1,
        Command::CreateRoom {
            name: "Анна".into(),
            auto_fill: AutoFill::Off,
        },
    )
    .unwrap();

    let CommandResponse::RoomCreated { code, state } = resp else {
        panic!("ожидался RoomCreated");
    };
    assert_eq!(code.len(), 4);
    assert_eq!(state.public.phase, SessionPhase::Waiting);
    assert_eq!(state.public.participants.len(), 1);
    assert_eq!(state.public.host_id, 1);
    // создатель сидит за столом => приватное представление есть
    assert_eq!(state.private.as_ref().map(|p| p.participant_id), Some(1));
}

#[test]
fn names_are_validated_before_any_mutation() {
    let mut registry = SessionRegistry::with_defaults();

    let err = handle_command(
        &mut registry,
        1,
        Command::CreateRoom {
            name: "   ".into(),
            auto_fill: AutoFill::Off,
        },
    )
    .unwrap_err();
    assert_eq!(category(err), ErrorCategory::Validation);

    let err = handle_command(
        &mut registry,
        1,
        Command::CreateRoom {
            name: "о".repeat(40),
            auto_fill: AutoFill::Off,
        },
    )
    .unwrap_err();
    assert_eq!(category(err), ErrorCategory::Validation);

    // ничего не создалось
    assert_eq!(registry.session_count(), 0);
}

#[tokio::test]
async fn room_auto_fill_flows_through_to_start() {
    let mut registry = SessionRegistry::with_defaults();
    handle_command(
        &mut registry,
        1,
        Command::CreateRoom {
            name: "Анна".into(),
            auto_fill: AutoFill::ToMinimum,
        },
    )
    .unwrap();

    // старт без собственной политики использует политику комнаты
    let resp = handle_command(
        &mut registry,
        1,
        Command::StartGame(StartGameOptions::default()),
    )
    .unwrap();

    let CommandResponse::State(state) = resp else {
        panic!("ожидался State");
    };
    assert_eq!(state.public.phase, SessionPhase::Auction);
    assert_eq!(state.public.participants.len(), 3);
    assert_eq!(
        state.public.participants.iter().filter(|p| p.is_automated).count(),
        2
    );
}

#[test]
fn unbound_connection_gets_not_found() {
    let mut registry = SessionRegistry::with_defaults();
    let err = handle_command(&mut registry, 42, Command::GetState).unwrap_err();
    assert_eq!(category(err), ErrorCategory::NotFound);

    let err = handle_command(
        &mut registry,
        42,
        Command::JoinRoom {
            code: "ZZZZ".into(),
            name: "Гость".into(),
        },
    )
    .unwrap_err();
    assert_eq!(category(err), ErrorCategory::NotFound);
}

//
// Чтение состояния
//

#[test]
fn get_state_is_idempotent() {
    let mut registry = started_registry();

    let first = get_state(&mut registry, 2);
    let second = get_state(&mut registry, 2);
    assert_eq!(first, second);

    // у каждого участника своё приватное, публичное общее
    let other = get_state(&mut registry, 3);
    assert_eq!(first.public, other.public);
    assert_ne!(first.private, other.private);
}

#[test]
fn state_view_survives_json_transport() {
    let mut registry = started_registry();
    let state = get_state(&mut registry, 2);

    // представление уходит клиентам как JSON – проверяем обе стороны
    let value = serde_json::to_value(&state).unwrap();
    assert_eq!(value["public"]["code"].as_str().map(str::len), Some(4));
    assert_eq!(
        value["public"]["participants"].as_array().map(Vec::len),
        Some(3)
    );
    assert!(value["private"]["money_hand"].is_array());

    let parsed: StateView = serde_json::from_value(value).unwrap();
    assert_eq!(parsed, state);
}

#[test]
fn private_view_hides_other_hands() {
    let mut registry = started_registry();
    let state = get_state(&mut registry, 2);

    let private = state.private.unwrap();
    assert_eq!(private.participant_id, 2);
    assert_eq!(private.money_hand.len(), 10);
    assert!(private.removed_note.is_some());

    // в публичном представлении рук нет, только суммы ставок
    for p in &state.public.participants {
        assert!(p.bid_total.is_zero());
    }
}

//
// Игровые команды
//

#[test]
fn first_round_resolves_through_commands() {
    let mut registry = started_registry();

    // все пасуют: раунд обязан разрешиться максимум за три паса
    for _ in 0..3 {
        let state = get_state(&mut registry, 1);
        let won: usize = state
            .public
            .participants
            .iter()
            .map(|p| p.won_cards.len())
            .sum();
        if won > 0 {
            break;
        }
        let turn = state.public.auction.unwrap().turn_participant_id;
        handle_command(&mut registry, turn, Command::Pass).unwrap();
    }

    let state = get_state(&mut registry, 1);
    let won: usize = state
        .public
        .participants
        .iter()
        .map(|p| p.won_cards.len())
        .sum();
    assert_eq!(won, 1, "после пасов лот должен был уйти кому-то");
}

#[test]
fn acting_out_of_turn_is_a_permission_error() {
    let mut registry = started_registry();
    let state = get_state(&mut registry, 1);
    let turn = state.public.auction.unwrap().turn_participant_id;
    let not_turn = [1u64, 2, 3]
        .into_iter()
        .find(|&c| c != turn)
        .unwrap();

    let err = handle_command(&mut registry, not_turn, Command::Pass).unwrap_err();
    assert_eq!(category(err), ErrorCategory::Permission);
}

#[test]
fn bid_with_bogus_note_is_a_validation_error() {
    let mut registry = started_registry();
    let state = get_state(&mut registry, 1);
    let turn = state.public.auction.unwrap().turn_participant_id;

    let err = handle_command(
        &mut registry,
        turn,
        Command::PlaceBid {
            note_ids: vec![999_999],
        },
    )
    .unwrap_err();
    assert_eq!(category(err), ErrorCategory::Validation);
}

#[test]
fn bid_through_commands_updates_the_view() {
    let mut registry = started_registry();
    let state = get_state(&mut registry, 1);
    let turn = state.public.auction.unwrap().turn_participant_id;

    let note_id = get_state(&mut registry, turn)
        .private
        .unwrap()
        .money_hand
        .iter()
        .min_by_key(|n| n.value)
        .unwrap()
        .id;

    let resp = handle_command(
        &mut registry,
        turn,
        Command::PlaceBid {
            note_ids: vec![note_id],
        },
    )
    .unwrap();

    let CommandResponse::State(state) = resp else {
        panic!("ожидался State");
    };
    let auction = state.public.auction.unwrap();
    assert_eq!(auction.highest_bidder_id, Some(turn));
    assert_ne!(auction.turn_participant_id, turn);
}

//
// Выход
//

#[test]
fn leave_room_unbinds_the_connection() {
    let mut registry = SessionRegistry::with_defaults();
    let code = create_room(&mut registry, 1, "Анна");
    handle_command(
        &mut registry,
        2,
        Command::JoinRoom {
            code,
            name: "Борис".into(),
        },
    )
    .unwrap();

    assert_eq!(
        handle_command(&mut registry, 2, Command::LeaveRoom).unwrap(),
        CommandResponse::Ok
    );
    let err = handle_command(&mut registry, 2, Command::GetState).unwrap_err();
    assert_eq!(category(err), ErrorCategory::NotFound);
}
