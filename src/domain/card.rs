use serde::{Deserialize, Serialize};

use crate::domain::CardId;

/// Эффект карты позора.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum DisgraceEffect {
    /// Вычесть фиксированное количество очков при подсчёте.
    Penalty(u32),
    /// Поделить итоговый счёт пополам (с округлением вниз).
    Halve,
    /// Немедленно сбросить одну карту роскоши (саб-фаза DISCARD_LUXURY).
    /// На подсчёт очков сама карта после этого не влияет.
    DiscardLuxury,
}

/// Тип карты и её полезная нагрузка.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum CardKind {
    /// Роскошь – даёт очки по номиналу.
    Luxury { value: u32 },
    /// Престиж – множитель итогового счёта.
    Prestige { multiplier: u32 },
    /// Позор – разыгрывается обратным аукционом, эффект при получении/подсчёте.
    Disgrace { effect: DisgraceEffect },
    /// Специальная карта обмена: победитель раунда может обменять
    /// две карты между любыми двумя участниками (саб-фаза CARD_SWAP).
    Swap,
}

/// Карта-лот. Живёт ровно в одном месте: колода, текущий лот,
/// чьи-то won_cards или removed_from_game (инвариант сохранения карт).
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ItemCard {
    pub id: CardId,
    pub kind: CardKind,
}

impl ItemCard {
    pub fn new(id: CardId, kind: CardKind) -> Self {
        Self { id, kind }
    }

    pub fn is_luxury(&self) -> bool {
        matches!(self.kind, CardKind::Luxury { .. })
    }

    pub fn is_disgrace(&self) -> bool {
        matches!(self.kind, CardKind::Disgrace { .. })
    }

    pub fn is_swap(&self) -> bool {
        matches!(self.kind, CardKind::Swap)
    }
}
