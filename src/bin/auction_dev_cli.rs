//! Dev-CLI: партия из одних ботов в режиме наблюдателя.
//!
//! Запуск: `auction_dev_cli [seed]`. С seed партия воспроизводима
//! (тайминги ботов всё равно случайны, но решения – нет).

use std::collections::HashMap;
use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use auction_engine::api::{handle_command, AutoFill, Command, CommandResponse, StartGameOptions};
use auction_engine::bots::{BaselinePolicy, BotConfig};
use auction_engine::domain::{
    CardKind, DisgraceEffect, GameEvent, ItemCard, ParticipantId, SessionCode, SessionPhase,
};
use auction_engine::lobby::SessionRegistry;

const HOST_CONN: ParticipantId = 1;

/// Страховка от зависшей партии: ботам с такими таймингами хватает
/// пары секунд, минута – с большим запасом.
const MAX_WAIT: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let seed = std::env::args().nth(1).and_then(|s| s.parse::<u64>().ok());
    if let Some(s) = seed {
        println!("seed: {s}");
    }

    let bot_config = BotConfig {
        think_delay_min: Duration::from_millis(30),
        think_delay_max: Duration::from_millis(120),
        comment_duration: Duration::from_millis(50),
    };
    let mut registry = SessionRegistry::new(Arc::new(BaselinePolicy::new(seed)), bot_config);

    let created = handle_command(
        &mut registry,
        HOST_CONN,
        Command::CreateRoom {
            name: "Ведущий".into(),
            auto_fill: AutoFill::ToFull,
        },
    )?;
    let CommandResponse::RoomCreated { code, .. } = created else {
        return Err("create_room вернул неожиданный ответ".into());
    };
    println!("=== Комната {code}: стол заполняется ботами ===");

    // auto_fill не задан – старт берёт политику комнаты (ToFull).
    handle_command(
        &mut registry,
        HOST_CONN,
        Command::StartGame(StartGameOptions {
            auto_fill: None,
            spectator_mode: true,
        }),
    )?;

    let code = SessionCode::new(code);
    let ctx = registry
        .session(&code)
        .ok_or("комната исчезла сразу после старта")?;

    let started = std::time::Instant::now();
    let mut printed = 0usize;
    loop {
        tokio::time::sleep(Duration::from_millis(50)).await;

        let (phase, names, fresh) = {
            let guard = match ctx.lock() {
                Ok(g) => g,
                Err(poisoned) => poisoned.into_inner(),
            };
            let names: HashMap<ParticipantId, String> = guard
                .session
                .participants
                .iter()
                .map(|p| (p.id, p.name.clone()))
                .collect();
            let fresh: Vec<GameEvent> =
                guard.session.events.iter().skip(printed).cloned().collect();
            printed += fresh.len();
            (guard.session.phase, names, fresh)
        };

        for event in &fresh {
            println!("{}", describe(event, &names));
        }

        if phase == SessionPhase::GameOver {
            break;
        }
        if started.elapsed() > MAX_WAIT {
            return Err("партия не завершилась за отведённое время".into());
        }
    }

    // Итоги ещё раз, машинно-читаемо.
    let results = {
        let guard = match ctx.lock() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard.session.results.clone()
    };
    if let Some(results) = results {
        println!("\n--- итоги (json) ---");
        println!("{}", serde_json::to_string_pretty(&results)?);
    }

    Ok(())
}

fn name_of(names: &HashMap<ParticipantId, String>, id: ParticipantId) -> String {
    names
        .get(&id)
        .cloned()
        .unwrap_or_else(|| format!("участник #{id}"))
}

fn card_label(card: &ItemCard) -> String {
    match card.kind {
        CardKind::Luxury { value } => format!("роскошь ({value})"),
        CardKind::Prestige { multiplier } => format!("престиж (×{multiplier})"),
        CardKind::Disgrace { effect } => match effect {
            DisgraceEffect::Penalty(p) => format!("позор (-{p})"),
            DisgraceEffect::Halve => "позор (половина очков)".into(),
            DisgraceEffect::DiscardLuxury => "позор (сброс роскоши)".into(),
        },
        CardKind::Swap => "карта обмена".into(),
    }
}

fn describe(event: &GameEvent, names: &HashMap<ParticipantId, String>) -> String {
    match event {
        GameEvent::ParticipantJoined { name, is_automated, .. } => {
            let tag = if *is_automated { " [бот]" } else { "" };
            format!("+ {name}{tag} за столом")
        }
        GameEvent::ParticipantLeft { participant_id } => {
            format!("- {} покинул стол", name_of(names, *participant_id))
        }
        GameEvent::GameStarted => "--- Игра началась ---".into(),
        GameEvent::RoundStarted { card, starting_participant_id, .. } => format!(
            "\nЛот: {}. Начинает {}.",
            card_label(card),
            name_of(names, *starting_participant_id)
        ),
        GameEvent::BidPlaced { participant_id, bid_total } => {
            format!("{} ставит {}", name_of(names, *participant_id), bid_total)
        }
        GameEvent::TurnPassed { participant_id } => {
            format!("{} пасует", name_of(names, *participant_id))
        }
        GameEvent::AuctionWon { participant_id, paid, .. } => format!(
            "{} забирает лот за {}",
            name_of(names, *participant_id),
            paid
        ),
        GameEvent::AuctionStuck { participant_id, .. } => {
            format!("{} застревает с лотом", name_of(names, *participant_id))
        }
        GameEvent::CardsSwapped {
            first_participant_id,
            second_participant_id,
            ..
        } => format!(
            "{} и {} меняются картами",
            name_of(names, *first_participant_id),
            name_of(names, *second_participant_id)
        ),
        GameEvent::SwapSkipped { participant_id } => {
            format!("{} отказывается от обмена", name_of(names, *participant_id))
        }
        GameEvent::LuxuryDiscarded { participant_id, .. } => {
            format!("{} сбрасывает роскошь", name_of(names, *participant_id))
        }
        GameEvent::AuctionRestarted { .. } => "Аукцион начат заново".into(),
        GameEvent::ParticipantDisconnected { participant_id } => {
            format!("{} отключился", name_of(names, *participant_id))
        }
        GameEvent::ParticipantRejoined { new_id, .. } => {
            format!("{} вернулся в игру", name_of(names, *new_id))
        }
        GameEvent::BotComment { participant_id, text } => {
            format!("{}: «{text}»", name_of(names, *participant_id))
        }
        GameEvent::GameFinished { results } => {
            let mut out = String::from("\n=== Итоги ===");
            for r in results {
                let tag = if r.eliminated { " (беднейший – вылет)" } else { "" };
                out.push_str(&format!(
                    "\n{}: {} очков, осталось {}{}",
                    r.name, r.score, r.money_left, tag
                ));
            }
            out
        }
    }
}
