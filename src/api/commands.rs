use serde::{Deserialize, Serialize};

use crate::domain::{CardId, NoteId};
use crate::engine::SwapRequest;

/// Политика автодобора ботов при старте игры.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum AutoFill {
    /// Ботов не добавлять.
    #[default]
    Off,
    /// Добрать ботов до минимума (3 места).
    ToMinimum,
    /// Добрать ботов до полного стола (5 мест).
    ToFull,
}

/// Опции старта игры.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StartGameOptions {
    /// None – взять политику, заданную при создании комнаты.
    pub auto_fill: Option<AutoFill>,
    /// Режим наблюдателя: хост встаёт из-за стола, играют только боты.
    pub spectator_mode: bool,
}

/// Команда верхнего уровня. Id вызывающего соединения приходит отдельно –
/// его выдаёт транспортный слой, а не клиент.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub enum Command {
    /// Создать комнату; вызывающий становится хостом. Политика автодобора
    /// запоминается на комнате и применяется стартом, если тот не задал свою.
    CreateRoom { name: String, auto_fill: AutoFill },

    /// Войти в комнату по коду. Если игра уже идёт и имя совпадает
    /// с отключённым местом – это реконнект (continuity-слой).
    JoinRoom { code: String, name: String },

    /// Выйти из комнаты (до старта) либо отключиться (после старта).
    LeaveRoom,

    /// Запустить игру (только хост).
    StartGame(StartGameOptions),

    /// Ставка текущими купюрами.
    PlaceBid { note_ids: Vec<NoteId> },

    /// Пас.
    Pass,

    /// Обмен картами или отказ от него (пустой запрос).
    ExecuteCardSwap(SwapRequest),

    /// Сбросить карту роскоши в саб-фазе DISCARD_LUXURY.
    DiscardLuxuryCard { card_id: CardId },

    /// Прочитать текущее состояние (идемпотентно).
    GetState,
}
