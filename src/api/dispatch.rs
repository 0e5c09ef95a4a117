//! Диспетчеризация команд: разобранная команда + id соединения →
//! операция реестра/машины состояний → представление для вызывающего.
//!
//! Все мутации идут под замком контекста сессии; после принятой мутации
//! оркестратору ботов ставится задача «проверь, чей ход».

use tracing::debug;

use crate::api::commands::Command;
use crate::api::dto::{CommandResponse, StateView};
use crate::api::errors::ApiError;
use crate::api::queries::build_state_view;
use crate::domain::session::Session;
use crate::domain::{ParticipantId, SessionCode};
use crate::engine::{self, EngineError};
use crate::infra::rng::SystemRng;
use crate::lobby::registry::{lock_ctx, RegistryError, SessionRegistry};

impl From<RegistryError> for ApiError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::SessionNotFound(_) | RegistryError::ConnectionNotBound(_) => {
                ApiError::not_found(err.to_string())
            }
            RegistryError::NoSeatToRejoin(_) => ApiError::not_found(err.to_string()),
            RegistryError::AlreadyInSession(_) => ApiError::validation(err.to_string()),
            RegistryError::NotHost(_) => ApiError::permission(err.to_string()),
            RegistryError::Engine(inner) => inner.into(),
        }
    }
}

const MAX_NAME_LEN: usize = 24;

fn validated_name(raw: &str) -> Result<String, ApiError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(ApiError::validation("Имя не может быть пустым"));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(ApiError::validation(format!(
            "Имя длиннее {MAX_NAME_LEN} символов"
        )));
    }
    Ok(name.to_string())
}

/// Единая точка входа: исполнить команду от имени соединения `conn`.
pub fn handle_command(
    registry: &mut SessionRegistry,
    conn: ParticipantId,
    cmd: Command,
) -> Result<CommandResponse, ApiError> {
    debug!(conn, ?cmd, "команда");

    match cmd {
        Command::CreateRoom { name, auto_fill } => {
            let name = validated_name(&name)?;
            let code = registry.create_session(conn, name, auto_fill)?;
            let state = current_state(registry, &code, conn)?;
            Ok(CommandResponse::RoomCreated {
                code: code.to_string(),
                state,
            })
        }

        Command::JoinRoom { code, name } => {
            let name = validated_name(&name)?;
            let code = registry.join_session(&code, conn, name)?;
            let state = current_state(registry, &code, conn)?;
            Ok(CommandResponse::State(Box::new(state)))
        }

        Command::LeaveRoom => {
            registry.disconnect(conn)?;
            Ok(CommandResponse::Ok)
        }

        Command::StartGame(options) => {
            let mut rng = SystemRng;
            let code = registry.start_game(conn, options, &mut rng)?;
            let state = current_state(registry, &code, conn)?;
            Ok(CommandResponse::State(Box::new(state)))
        }

        Command::PlaceBid { note_ids } => mutate_session(registry, conn, |session| {
            engine::place_bid(session, conn, &note_ids)
        }),

        Command::Pass => mutate_session(registry, conn, |session| {
            engine::pass_turn(session, conn)
        }),

        Command::ExecuteCardSwap(request) => mutate_session(registry, conn, |session| {
            engine::execute_card_swap(session, conn, &request)
        }),

        Command::DiscardLuxuryCard { card_id } => mutate_session(registry, conn, |session| {
            engine::discard_luxury_card(session, conn, card_id)
        }),

        Command::GetState => {
            let code = bound_code(registry, conn)?;
            let state = current_state(registry, &code, conn)?;
            Ok(CommandResponse::State(Box::new(state)))
        }
    }
}

fn bound_code(registry: &SessionRegistry, conn: ParticipantId) -> Result<SessionCode, ApiError> {
    registry
        .code_for_connection(conn)
        .cloned()
        .ok_or_else(|| ApiError::not_found("Соединение не привязано к комнате"))
}

/// Чтение состояния: только проекция, без мутаций и без touch.
fn current_state(
    registry: &SessionRegistry,
    code: &SessionCode,
    conn: ParticipantId,
) -> Result<StateView, ApiError> {
    let ctx = registry
        .session(code)
        .ok_or_else(|| ApiError::not_found(format!("Комната {code} не найдена")))?;
    let guard = lock_ctx(&ctx);
    Ok(build_state_view(&guard.session, conn))
}

/// Игровая мутация от имени вызывающего: операция под замком, затем
/// проверка хода ботов и свежее представление в ответ.
fn mutate_session(
    registry: &mut SessionRegistry,
    conn: ParticipantId,
    op: impl FnOnce(&mut Session) -> Result<(), EngineError>,
) -> Result<CommandResponse, ApiError> {
    let code = bound_code(registry, conn)?;
    let ctx = registry
        .session(&code)
        .ok_or_else(|| ApiError::not_found(format!("Комната {code} не найдена")))?;

    let state = {
        let mut guard = lock_ctx(&ctx);
        guard.touch();
        op(&mut guard.session)?;
        build_state_view(&guard.session, conn)
    };

    registry.schedule_bot_check(&code);
    Ok(CommandResponse::State(Box::new(state)))
}
