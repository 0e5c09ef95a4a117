//! Авторитетный движок сессий карточного аукциона.
//!
//! Комнаты на 3–5 мест, ставки купюрами фиксированных номиналов, обычные
//! и обратные аукционы, спецкарты (обмен, сброс роскоши), боты за тем же
//! столом и на тех же правах, переживаемые обрывы связи.
//!
//! Слои:
//! - `domain` – чистые данные игры, без игровой логики;
//! - `engine` – машина состояний: все мутации сессии проходят здесь;
//! - `bots` – политика решений и оркестратор ходов ботов;
//! - `lobby` – реестр комнат и continuity при обрывах связи;
//! - `api` – команды, представления и диспетчеризация;
//! - `infra` – источники случайности и генерация идентификаторов.

pub mod api;
pub mod bots;
pub mod domain;
pub mod engine;
pub mod infra;
pub mod lobby;
