use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};

use crate::domain::{CardId, NoteId, ParticipantId};

/// Идентификаторы ботов берём из старшего диапазона, чтобы они заведомо
/// не пересекались с id соединений живых игроков (те приходят снаружи).
pub const BOT_PARTICIPANT_ID_BASE: ParticipantId = 1 << 32;

/// Простая генерация ID на основе монотонных счётчиков.
///
/// Один генератор живёт внутри контекста сессии: купюрам и картам
/// достаточно уникальности в рамках одной сессии.
#[derive(Debug)]
pub struct IdGenerator {
    note_counter: AtomicU32,
    card_counter: AtomicU32,
    bot_counter: AtomicU64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self {
            note_counter: AtomicU32::new(1),
            card_counter: AtomicU32::new(1),
            bot_counter: AtomicU64::new(BOT_PARTICIPANT_ID_BASE),
        }
    }

    #[inline]
    pub fn next_note_id(&self) -> NoteId {
        self.note_counter.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn next_card_id(&self) -> CardId {
        self.card_counter.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn next_bot_participant_id(&self) -> ParticipantId {
        self.bot_counter.fetch_add(1, Ordering::Relaxed)
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}
