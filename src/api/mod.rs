//! Внешняя поверхность: команды, DTO представлений, категории ошибок,
//! диспетчеризация. Транспорт и вещание – внешние коллабораторы, сюда
//! приходит уже разобранная команда с id соединения вызывающего.

pub mod commands;
pub mod dispatch;
pub mod dto;
pub mod errors;
pub mod queries;

pub use commands::{AutoFill, Command, StartGameOptions};
pub use dispatch::handle_command;
pub use dto::{CommandResponse, PrivateView, PublicView, StateView};
pub use errors::{ApiError, ErrorCategory};
pub use queries::{build_private_view, build_public_view, build_state_view};
