use std::sync::Mutex;

use rand::prelude::*;
use thiserror::Error;

use crate::api::dto::{PrivateView, PublicView};
use crate::domain::card::CardKind;
use crate::domain::money::Money;
use crate::domain::session::SessionPhase;
use crate::domain::{CardId, NoteId};
use crate::engine::SwapRequest;

/// Ошибка политики принятия решений. Оркестратор не даёт ей уронить игру:
/// любая ошибка превращается в безопасное действие по умолчанию (пас).
#[derive(Debug, Error)]
pub enum PolicyError {
    #[error("Политика не смогла принять решение: {0}")]
    Internal(String),
}

/// Действие, выбранное политикой.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BotAction {
    /// Добавить купюры к своей ставке.
    PlaceBid(Vec<NoteId>),
    Pass,
    /// Обмен (или пустой запрос – пропустить).
    Swap(SwapRequest),
    Discard(CardId),
}

/// Решение политики: действие плюс необязательная реплика в чат.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BotDecision {
    pub action: BotAction,
    pub comment: Option<String>,
}

impl BotDecision {
    pub fn silent(action: BotAction) -> Self {
        Self {
            action,
            comment: None,
        }
    }
}

/// Узкий интерфейс стратегии бота: по публичному и приватному
/// представлению вернуть действие. Стратегии подменяемы, ядро они
/// не трогают – решение проводится через обычные операции engine.
pub trait DecisionPolicy: Send + Sync {
    fn decide(&self, public: &PublicView, private: &PrivateView)
        -> Result<BotDecision, PolicyError>;
}

/// Базовая эталонная политика: минимальный перебив с потолком трат,
/// неохотные ставки в обратных аукционах, без обменов, сброс самой
/// дешёвой роскоши. Seed опционален – для воспроизводимых партий.
pub struct BaselinePolicy {
    rng: Mutex<StdRng>,
}

impl BaselinePolicy {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        Self {
            rng: Mutex::new(rng),
        }
    }
}

impl Default for BaselinePolicy {
    fn default() -> Self {
        Self::new(None)
    }
}

/// Сколько бот готов потратить на этот лот.
fn spending_cap(public: &PublicView) -> Money {
    match public.current_card.map(|c| c.kind) {
        Some(CardKind::Luxury { value }) => Money::new(value * 3),
        Some(CardKind::Prestige { .. }) => Money::new(22),
        Some(CardKind::Swap) => Money::new(8),
        // В обратном аукционе «тратить» – значит откупаться от позора.
        Some(CardKind::Disgrace { .. }) => Money::new(4),
        None => Money::ZERO,
    }
}

/// Минимальный набор ещё не заявленных купюр, строго перебивающий
/// старшую ставку. Жадно с самых мелких.
fn minimal_overbid(private: &PrivateView, highest: Money) -> Option<(Vec<NoteId>, Money)> {
    let committed: Money = private
        .money_hand
        .iter()
        .filter(|n| private.current_bid.contains(&n.id))
        .map(|n| n.value)
        .sum();

    let mut spare: Vec<_> = private
        .money_hand
        .iter()
        .filter(|n| n.available && !private.current_bid.contains(&n.id))
        .collect();
    spare.sort_by_key(|n| n.value);

    let mut picked = Vec::new();
    let mut total = committed;
    for note in spare {
        if total > highest {
            break;
        }
        picked.push(note.id);
        total += note.value;
    }

    (total > highest && !picked.is_empty()).then_some((picked, total))
}

const QUIPS: [&str; 5] = [
    "Это я забираю себе.",
    "Посмотрим, кто тут щедрый.",
    "Дороговато, но ладно.",
    "Только не этот лот…",
    "Ставки сделаны!",
];

impl DecisionPolicy for BaselinePolicy {
    fn decide(
        &self,
        public: &PublicView,
        private: &PrivateView,
    ) -> Result<BotDecision, PolicyError> {
        let mut rng = self
            .rng
            .lock()
            .map_err(|_| PolicyError::Internal("rng отравлен".into()))?;

        let me = private.participant_id;

        let action = match public.phase {
            SessionPhase::Auction => {
                let Some(auction) = public.auction.as_ref() else {
                    return Err(PolicyError::Internal("фаза AUCTION без аукциона".into()));
                };
                match minimal_overbid(private, auction.highest_bid) {
                    Some((notes, total)) if total <= spending_cap(public) => {
                        BotAction::PlaceBid(notes)
                    }
                    _ => BotAction::Pass,
                }
            }

            SessionPhase::CardSwap => {
                // Базовая политика не размениваются – пропускаем.
                BotAction::Swap(SwapRequest::skip())
            }

            SessionPhase::DiscardLuxury => {
                let mine = public
                    .participants
                    .iter()
                    .find(|p| p.id == me)
                    .ok_or_else(|| PolicyError::Internal("бот не найден в сессии".into()))?;
                let cheapest = mine
                    .won_cards
                    .iter()
                    .filter_map(|c| match c.kind {
                        CardKind::Luxury { value } => Some((value, c.id)),
                        _ => None,
                    })
                    .min();
                match cheapest {
                    Some((_, card_id)) => BotAction::Discard(card_id),
                    None => {
                        return Err(PolicyError::Internal(
                            "нечего сбрасывать в DISCARD_LUXURY".into(),
                        ))
                    }
                }
            }

            _ => BotAction::Pass,
        };

        let comment = rng
            .gen_bool(0.25)
            .then(|| QUIPS[rng.gen_range(0..QUIPS.len())].to_string());

        Ok(BotDecision { action, comment })
    }
}
