use serde::{Deserialize, Serialize};

use crate::domain::card::{CardKind, DisgraceEffect, ItemCard};
use crate::domain::money::Money;
use crate::domain::participant::Participant;
use crate::domain::ParticipantId;

/// Итог одного участника.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ParticipantResult {
    pub participant_id: ParticipantId,
    pub name: String,
    pub score: u32,
    /// Сколько денег осталось (сумма доступных купюр).
    pub money_left: Money,
    /// Беднейший участник исключается из борьбы за победу:
    /// счёт принудительно 0, флаг выставлен.
    pub eliminated: bool,
}

/// Подсчёт очков по выигранным картам:
/// сумма роскоши × произведение множителей престижа,
/// затем эффекты позора в порядке получения, итог не ниже нуля.
pub fn score_won_cards(cards: &[ItemCard]) -> u32 {
    let luxury_sum: i64 = cards
        .iter()
        .filter_map(|c| match c.kind {
            CardKind::Luxury { value } => Some(value as i64),
            _ => None,
        })
        .sum();

    let multiplier: i64 = cards
        .iter()
        .filter_map(|c| match c.kind {
            CardKind::Prestige { multiplier } => Some(multiplier as i64),
            _ => None,
        })
        .product();

    let mut score = luxury_sum * multiplier;

    for card in cards {
        if let CardKind::Disgrace { effect } = card.kind {
            match effect {
                DisgraceEffect::Penalty(p) => score -= p as i64,
                DisgraceEffect::Halve => score /= 2,
                // Эффект уже отработал в саб-фазе DISCARD_LUXURY.
                DisgraceEffect::DiscardLuxury => {}
            }
        }
    }

    score.max(0) as u32
}

/// Итоги игры: каждый, у кого осталось минимальное количество денег,
/// исключается из борьбы за победу (счёт 0, флаг eliminated), остальные
/// ранжируются по убыванию счёта. Исключённые – в конце списка.
pub fn compute_results(participants: &[Participant]) -> Vec<ParticipantResult> {
    let min_money = participants
        .iter()
        .map(|p| p.available_money())
        .min()
        .unwrap_or(Money::ZERO);

    let mut results: Vec<ParticipantResult> = participants
        .iter()
        .map(|p| {
            let money_left = p.available_money();
            let eliminated = money_left == min_money;
            ParticipantResult {
                participant_id: p.id,
                name: p.name.clone(),
                score: if eliminated { 0 } else { score_won_cards(&p.won_cards) },
                money_left,
                eliminated,
            }
        })
        .collect();

    results.sort_by(|a, b| {
        a.eliminated
            .cmp(&b.eliminated)
            .then(b.score.cmp(&a.score))
            .then(b.money_left.cmp(&a.money_left))
    });

    results
}
