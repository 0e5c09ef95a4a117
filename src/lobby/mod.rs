//! Жизненный цикл сессий: реестр комнат (создание/поиск/уничтожение,
//! жатва простаивающих) и continuity-слой (дисконнект и реконнект с
//! перепривязкой идентификатора).

pub mod continuity;
pub mod registry;

pub use continuity::DisconnectOutcome;
pub use registry::{RegistryError, SessionContext, SessionRegistry, SharedSession};
