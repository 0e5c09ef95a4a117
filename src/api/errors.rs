use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::engine::EngineError;

/// Категория ошибки внешнего API. Отдаётся клиенту вместе с текстом,
/// чтобы фронт мог различать «не твой ход» и «комната не найдена».
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Некорректный вход – отклонено до каких-либо мутаций.
    Validation,
    /// Сессия или участник не найдены.
    NotFound,
    /// Действие не разрешено этому участнику (чужой ход, не хост и т.п.).
    Permission,
    /// Действие невозможно в текущей фазе игры.
    GameState,
    /// Неожиданный внутренний сбой.
    Internal,
}

/// Ошибка внешнего API: категория + человекочитаемый текст.
#[derive(Clone, Debug, Error, Serialize, Deserialize, PartialEq, Eq)]
#[error("{message}")]
pub struct ApiError {
    pub category: ErrorCategory,
    pub message: String,
}

impl ApiError {
    pub fn new(category: ErrorCategory, message: impl Into<String>) -> Self {
        Self {
            category,
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorCategory::Validation, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCategory::NotFound, message)
    }

    pub fn permission(message: impl Into<String>) -> Self {
        Self::new(ErrorCategory::Permission, message)
    }

    pub fn game_state(message: impl Into<String>) -> Self {
        Self::new(ErrorCategory::GameState, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCategory::Internal, message)
    }
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        use EngineError::*;

        let category = match err {
            InvalidBid | NoteUnavailable(_) | NoteAlreadyCommitted(_) | NameTaken(_)
            | IncompleteSwapRequest | SelfSwap | NotALuxuryCard(_) | SessionFull
            | NotEnoughParticipants => ErrorCategory::Validation,

            ParticipantNotFound(_) | CardNotFound(_) => ErrorCategory::NotFound,

            NotYourTurn(_) | NotSwapWinner(_) | NotDiscarding(_) => ErrorCategory::Permission,

            WrongPhase | AlreadyStarted | AlreadyPassed(_) | NoActiveAuction => {
                ErrorCategory::GameState
            }

            NoActiveParticipants | Internal(_) => ErrorCategory::Internal,
        };

        ApiError::new(category, err.to_string())
    }
}
