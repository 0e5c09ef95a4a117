use serde::{Deserialize, Serialize};

use crate::domain::card::{CardKind, DisgraceEffect, ItemCard};
use crate::domain::CardId;

/// Колода лотов. В домене — просто упорядоченный список карт.
/// Перемешивание (со смещением для карты обмена) делает engine, НЕ здесь.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Deck {
    pub cards: Vec<ItemCard>,
}

/// Сколько карт в полной колоде.
pub const DECK_SIZE: usize = 15;

impl Deck {
    /// Полный фиксированный состав колоды (15 карт, без перемешивания):
    /// - роскошь номиналами 1..=8 (8 штук);
    /// - престиж x2 (3 штуки);
    /// - позор: штраф −5, деление пополам, сброс роскоши (3 штуки);
    /// - одна карта обмена.
    ///
    /// Идентификаторы берём из переданного генератора, чтобы они были
    /// уникальны в рамках сессии.
    pub fn full_composition(mut next_id: impl FnMut() -> CardId) -> Vec<ItemCard> {
        let mut cards = Vec::with_capacity(DECK_SIZE);
        for value in 1..=8 {
            cards.push(ItemCard::new(next_id(), CardKind::Luxury { value }));
        }
        for _ in 0..3 {
            cards.push(ItemCard::new(next_id(), CardKind::Prestige { multiplier: 2 }));
        }
        cards.push(ItemCard::new(
            next_id(),
            CardKind::Disgrace {
                effect: DisgraceEffect::Penalty(5),
            },
        ));
        cards.push(ItemCard::new(
            next_id(),
            CardKind::Disgrace {
                effect: DisgraceEffect::Halve,
            },
        ));
        cards.push(ItemCard::new(
            next_id(),
            CardKind::Disgrace {
                effect: DisgraceEffect::DiscardLuxury,
            },
        ));
        cards.push(ItemCard::new(next_id(), CardKind::Swap));
        cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Взять одну карту сверху колоды.
    pub fn draw_one(&mut self) -> Option<ItemCard> {
        self.cards.pop()
    }
}
