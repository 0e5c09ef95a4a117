//! Доменная модель аукционной игры: карты, денежные купюры, участники, сессии.

pub mod auction;
pub mod card;
pub mod deck;
pub mod events;
pub mod money;
pub mod participant;
pub mod scoring;
pub mod session;

use serde::{Deserialize, Serialize};

// Базовые идентификаторы.
//
// ParticipantId для живых игроков привязан к соединению (его выдаёт транспорт),
// для ботов генерится из старшего диапазона (см. infra::ids).
pub type ParticipantId = u64;
pub type NoteId = u32;
pub type CardId = u32;

/// Код сессии – 4 символа, верхний регистр.
/// Это то, что игроки вводят, чтобы попасть в комнату.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct SessionCode(pub String);

impl SessionCode {
    pub fn new(code: impl Into<String>) -> Self {
        SessionCode(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// Удобные реэкспорты, чтобы в других модулях писать crate::domain::Session и т.п.
pub use auction::*;
pub use card::*;
pub use deck::*;
pub use events::*;
pub use money::*;
pub use participant::*;
pub use scoring::*;
pub use session::*;
