//! Оркестратор ходов ботов.
//!
//! У каждой сессии ровно одна упорядоченная очередь задач: каждый цикл
//! «чей ход? если бота – действуем» кладётся в хвост и исполняется строго
//! по одному. Оркестратор никогда не мутирует сессию напрямую – только
//! через публичные операции engine::game_loop, тем же путём, что и люди.

pub mod config;
pub mod orchestrator;
pub mod policy;

pub use config::BotConfig;
pub use orchestrator::BotDriver;
pub use policy::{BaselinePolicy, BotAction, BotDecision, DecisionPolicy, PolicyError};
