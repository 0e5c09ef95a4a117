use crate::domain::auction::Auction;
use crate::domain::participant::Participant;
use crate::domain::ParticipantId;
use crate::engine::errors::EngineError;

/// Следующий активный участник после `from` по кругу.
///
/// Обход ограничен одним полным кругом по упорядоченному списку мест.
/// Если за круг активного не нашлось – это не «тихий фолбэк», а явная
/// ошибка `NoActiveParticipants`: в корректной игре аукцион разрешается
/// раньше, чем активный список может опустеть.
pub fn next_active_after(
    participants: &[Participant],
    auction: &Auction,
    from: ParticipantId,
) -> Result<ParticipantId, EngineError> {
    let len = participants.len();
    if len == 0 {
        return Err(EngineError::NoActiveParticipants);
    }

    // Если from не найден (битый id), начинаем обход с нулевого места.
    let pos = participants.iter().position(|p| p.id == from).unwrap_or(0);

    for i in 1..=len {
        let idx = (pos + i) % len;
        let candidate = participants[idx].id;
        if auction.is_active(candidate) {
            return Ok(candidate);
        }
    }

    Err(EngineError::NoActiveParticipants)
}

/// То же, но кандидат `from` сам исключается из рассмотрения.
/// Нужно при пасе: ход должен уйти кому-то другому.
pub fn next_active_excluding(
    participants: &[Participant],
    auction: &Auction,
    from: ParticipantId,
) -> Result<ParticipantId, EngineError> {
    let len = participants.len();
    if len == 0 {
        return Err(EngineError::NoActiveParticipants);
    }

    let pos = participants.iter().position(|p| p.id == from).unwrap_or(0);

    for i in 1..len {
        let idx = (pos + i) % len;
        let candidate = participants[idx].id;
        if auction.is_active(candidate) {
            return Ok(candidate);
        }
    }

    Err(EngineError::NoActiveParticipants)
}
