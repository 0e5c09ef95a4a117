//! Машина состояний аукциона: единственный источник правды о легальных
//! переходах.
//!
//! Основные операции (свободные функции над `&mut Session`):
//!   - `start_session` – собрать колоду, изъять купюры, открыть первый лот
//!   - `place_bid` / `pass_turn` – ход участника в аукционе
//!   - `execute_card_swap` / `discard_luxury_card` – саб-фазы спецэффектов
//!   - `restart_auction` – рестарт аукциона за текущий лот (реконнект)
//!
//! Любая отклонённая операция оставляет сессию нетронутой.

pub mod errors;
pub mod game_loop;
pub mod turns;
pub mod validation;

pub use errors::EngineError;
pub use game_loop::{
    add_participant, discard_luxury_card, execute_card_swap, pass_turn, place_bid,
    remove_participant, restart_auction, start_session,
};
pub use validation::SwapRequest;

/// RNG интерфейс для engine. Реализации – в infra (обёртки над `rand`).
pub trait RandomSource {
    fn shuffle<T>(&mut self, slice: &mut [T]);

    /// Равномерный индекс из 0..upper (upper > 0).
    fn pick_index(&mut self, upper: usize) -> usize;
}
