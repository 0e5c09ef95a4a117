use crate::domain::{CardId, NoteId, ParticipantId};

use thiserror::Error;

/// Ошибки машины состояний аукциона.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("Недостаточно участников: нужно минимум три")]
    NotEnoughParticipants,

    #[error("В комнате нет свободных мест")]
    SessionFull,

    #[error("Имя «{0}» уже занято в этой комнате")]
    NameTaken(String),

    #[error("Игра уже началась")]
    AlreadyStarted,

    #[error("Действие недопустимо в текущей фазе игры")]
    WrongPhase,

    #[error("Участник {0} не найден в сессии")]
    ParticipantNotFound(ParticipantId),

    #[error("Сейчас не ход участника {0}")]
    NotYourTurn(ParticipantId),

    #[error("Участник {0} уже спасовал в этом раунде")]
    AlreadyPassed(ParticipantId),

    #[error("Ставка не перебивает текущую старшую")]
    InvalidBid,

    #[error("Купюра {0} не найдена или уже потрачена")]
    NoteUnavailable(NoteId),

    #[error("Купюра {0} уже входит в текущую ставку")]
    NoteAlreadyCommitted(NoteId),

    #[error("Аукцион сейчас не идёт")]
    NoActiveAuction,

    #[error("Право обмена принадлежит не участнику {0}")]
    NotSwapWinner(ParticipantId),

    #[error("Сбрасывать роскошь должен не участник {0}")]
    NotDiscarding(ParticipantId),

    #[error("Запрос обмена неполон: нужны все четыре идентификатора либо ни одного")]
    IncompleteSwapRequest,

    #[error("Нельзя обменять карту саму на себя")]
    SelfSwap,

    #[error("Карта {0} не найдена у участника")]
    CardNotFound(CardId),

    #[error("Карта {0} не является роскошью")]
    NotALuxuryCard(CardId),

    /// Ограниченный обход не нашёл активного участника. В нормальной игре
    /// недостижимо: аукцион разрешается раньше, чем активный список пустеет.
    #[error("Не нашлось активного участника – состояние аукциона повреждено")]
    NoActiveParticipants,

    #[error("Внутренняя ошибка: {0}")]
    Internal(&'static str),
}
