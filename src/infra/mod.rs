//! Инфраструктура: RNG и генерация идентификаторов.

pub mod ids;
pub mod rng;

pub use ids::IdGenerator;
pub use rng::{DeterministicRng, SystemRng};
