use std::sync::{Arc, Weak};
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::api::queries::build_state_view;
use crate::bots::config::BotConfig;
use crate::bots::policy::{BotAction, DecisionPolicy};
use crate::domain::events::GameEvent;
use crate::domain::session::{Session, SessionPhase};
use crate::domain::ParticipantId;
use crate::engine::{self, SwapRequest};
use crate::lobby::registry::SharedSession;

/// Задача в очереди сессии. Пока задача одна: «проверь, чей ход,
/// и если бота – сделай ход».
#[derive(Debug)]
enum BotTask {
    CheckTurn,
}

/// Хэндл оркестратора одной сессии.
///
/// Воркер продолжает сам себя только через слабую ссылку на отправителя,
/// поэтому удаление сессии из реестра (drop хэндла) закрывает очередь
/// и завершает воркер.
#[derive(Debug)]
pub struct BotDriver {
    tx: Arc<mpsc::UnboundedSender<BotTask>>,
}

impl BotDriver {
    /// Запустить воркер очереди для сессии. Требует tokio-рантайм.
    pub fn spawn(
        ctx: SharedSession,
        policy: Arc<dyn DecisionPolicy>,
        config: BotConfig,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let tx = Arc::new(tx);
        tokio::spawn(run_loop(ctx, policy, config, rx, Arc::downgrade(&tx)));
        Self { tx }
    }

    /// Поставить в хвост очереди проверку «не ход ли сейчас бота».
    /// Вызывается после каждой принятой внешней мутации.
    pub fn schedule_check(&self) {
        let _ = self.tx.send(BotTask::CheckTurn);
    }
}

/// Воркер очереди: задачи исполняются строго по одной, в порядке
/// постановки. Продолжение – не рекурсия, а новая задача в хвост
/// (трамплин), поэтому глубина стека ограничена даже в партии из
/// одних ботов.
async fn run_loop(
    ctx: SharedSession,
    policy: Arc<dyn DecisionPolicy>,
    config: BotConfig,
    mut rx: mpsc::UnboundedReceiver<BotTask>,
    tx: Weak<mpsc::UnboundedSender<BotTask>>,
) {
    while let Some(BotTask::CheckTurn) = rx.recv().await {
        // Быстрая проверка без пауз: действительно ли сейчас ход бота.
        let actor = {
            let guard = lock(&ctx);
            current_automated_actor(&guard.session)
        };
        let Some(actor_id) = actor else {
            debug!("ход не бота – задача снята");
            continue;
        };

        // «Раздумья» – без удержания замка.
        let delay = config.think_delay();
        if delay > Duration::ZERO {
            tokio::time::sleep(delay).await;
        }

        let outcome = {
            let mut guard = lock(&ctx);
            act_once(&mut guard.session, actor_id, policy.as_ref())
        };

        match outcome {
            ActOutcome::Acted { comment_shown } => {
                if comment_shown && config.comment_duration > Duration::ZERO {
                    tokio::time::sleep(config.comment_duration).await;
                }
                // Трамплин: проверка следующего хода – новой задачей.
                if let Some(tx) = tx.upgrade() {
                    let _ = tx.send(BotTask::CheckTurn);
                }
            }
            ActOutcome::Skipped => {}
        }
    }
}

fn lock(ctx: &SharedSession) -> std::sync::MutexGuard<'_, crate::lobby::registry::SessionContext> {
    match ctx.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// Чей сейчас ход и бот ли это.
fn current_automated_actor(session: &Session) -> Option<ParticipantId> {
    let actor = match session.phase {
        SessionPhase::Auction => session.auction.as_ref().map(|a| a.turn_participant_id),
        SessionPhase::CardSwap => session.swap_winner_id,
        SessionPhase::DiscardLuxury => session.discarding_participant_id,
        _ => None,
    }?;
    session
        .participant(actor)
        .filter(|p| p.is_automated)
        .map(|p| p.id)
}

enum ActOutcome {
    Acted { comment_shown: bool },
    Skipped,
}

/// Один ход бота: решение политики → обычные операции engine.
/// Ошибка политики или нелегальное действие деградируют до безопасного
/// дефолта фазы, чтобы сбойная стратегия не подвесила игру.
fn act_once(
    session: &mut Session,
    actor_id: ParticipantId,
    policy: &dyn DecisionPolicy,
) -> ActOutcome {
    // Состояние могло измениться, пока бот «думал» (например, реконнект
    // перезапустил аукцион) – перепроверяем актёра под замком.
    if current_automated_actor(session) != Some(actor_id) {
        debug!(actor_id, "актёр сменился во время раздумий – ход снят");
        return ActOutcome::Skipped;
    }

    let view = build_state_view(session, actor_id);
    let Some(private) = view.private.as_ref() else {
        warn!(actor_id, "у бота нет приватного представления");
        return ActOutcome::Skipped;
    };

    let (action, comment) = match policy.decide(&view.public, private) {
        Ok(decision) => (decision.action, decision.comment),
        Err(err) => {
            warn!(actor_id, %err, "политика упала – безопасный дефолт");
            (safe_default(session, actor_id), None)
        }
    };

    let applied = apply_action(session, actor_id, &action);
    if let Err(err) = applied {
        warn!(actor_id, %err, "действие политики отклонено – безопасный дефолт");
        let fallback = safe_default(session, actor_id);
        if let Err(err) = apply_action(session, actor_id, &fallback) {
            // Дефолт тоже не прошёл: состояние ушло из-под бота.
            warn!(actor_id, %err, "безопасный дефолт отклонён");
            return ActOutcome::Skipped;
        }
    }

    let comment_shown = match comment {
        Some(text) => {
            session.events.push(GameEvent::BotComment {
                participant_id: actor_id,
                text,
            });
            true
        }
        None => false,
    };

    ActOutcome::Acted { comment_shown }
}

/// Безопасное действие по умолчанию для текущей фазы.
fn safe_default(session: &Session, actor_id: ParticipantId) -> BotAction {
    match session.phase {
        SessionPhase::CardSwap => BotAction::Swap(SwapRequest::skip()),
        SessionPhase::DiscardLuxury => {
            let first_luxury = session
                .participant(actor_id)
                .and_then(|p| p.won_cards.iter().find(|c| c.is_luxury()))
                .map(|c| c.id);
            match first_luxury {
                Some(card_id) => BotAction::Discard(card_id),
                None => BotAction::Pass,
            }
        }
        _ => BotAction::Pass,
    }
}

fn apply_action(
    session: &mut Session,
    actor_id: ParticipantId,
    action: &BotAction,
) -> Result<(), engine::EngineError> {
    match action {
        BotAction::PlaceBid(note_ids) => engine::place_bid(session, actor_id, note_ids),
        BotAction::Pass => engine::pass_turn(session, actor_id),
        BotAction::Swap(request) => engine::execute_card_swap(session, actor_id, request),
        BotAction::Discard(card_id) => engine::discard_luxury_card(session, actor_id, *card_id),
    }
}
