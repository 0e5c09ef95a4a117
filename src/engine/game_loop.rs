use crate::domain::auction::{Auction, AuctionKind};
use crate::domain::card::{CardKind, DisgraceEffect, ItemCard};
use crate::domain::deck::Deck;
use crate::domain::events::GameEvent;
use crate::domain::money::NOTE_DENOMINATIONS;
use crate::domain::participant::Participant;
use crate::domain::scoring::compute_results;
use crate::domain::session::{Session, SessionPhase, MAX_PARTICIPANTS, MIN_PARTICIPANTS};
use crate::domain::{CardId, NoteId, ParticipantId};
use crate::engine::errors::EngineError;
use crate::engine::turns::next_active_excluding;
use crate::engine::validation::{
    validate_bid, validate_discard, validate_swap, validate_turn, SwapChoice, SwapRequest,
};
use crate::engine::RandomSource;
use crate::infra::ids::IdGenerator;

/// Посадить участника в комнату. Только в фазе WAITING.
pub fn add_participant(
    session: &mut Session,
    id: ParticipantId,
    name: impl Into<String>,
    is_automated: bool,
) -> Result<(), EngineError> {
    if session.phase != SessionPhase::Waiting {
        return Err(EngineError::AlreadyStarted);
    }
    if session.participants.len() >= MAX_PARTICIPANTS {
        return Err(EngineError::SessionFull);
    }

    let name = name.into();
    if session.participant_by_name_ci(&name).is_some() {
        return Err(EngineError::NameTaken(name));
    }

    session.events.push(GameEvent::ParticipantJoined {
        participant_id: id,
        name: name.clone(),
        is_automated,
    });
    session.participants.push(Participant::new(id, name, is_automated));
    Ok(())
}

/// Убрать участника из комнаты. Только в фазе WAITING – после старта
/// место сохраняется, а обрыв связи обрабатывает continuity-слой.
pub fn remove_participant(session: &mut Session, id: ParticipantId) -> Result<(), EngineError> {
    if session.phase != SessionPhase::Waiting {
        return Err(EngineError::AlreadyStarted);
    }
    let pos = session
        .participants
        .iter()
        .position(|p| p.id == id)
        .ok_or(EngineError::ParticipantNotFound(id))?;

    session.participants.remove(pos);
    session.events.push(GameEvent::ParticipantLeft { participant_id: id });

    // Хост ушёл – передаём права первому оставшемуся.
    if session.host_id == id {
        if let Some(next_host) = session.participants.first() {
            session.host_id = next_host.id;
        }
    }
    Ok(())
}

/// Старт игры:
/// - собирает колоду (перемешивание со смещением, см. `build_deck`);
/// - раздаёт руки купюр и изымает по одной купюре на участника
///   (никогда не минимальный и не максимальный номинал);
/// - переходит в STARTING и сразу открывает первый лот.
pub fn start_session<R: RandomSource>(
    session: &mut Session,
    rng: &mut R,
    ids: &IdGenerator,
) -> Result<(), EngineError> {
    if session.phase != SessionPhase::Waiting {
        return Err(EngineError::AlreadyStarted);
    }
    if session.participants.len() < MIN_PARTICIPANTS {
        return Err(EngineError::NotEnoughParticipants);
    }

    session.deck = build_deck(rng, || ids.next_card_id());
    session.phase = SessionPhase::Starting;

    for participant in session.participants.iter_mut() {
        participant.deal_money_hand(|| ids.next_note_id());
        // Изъятие: индекс из внутренней части лестницы номиналов,
        // крайние (минимум и максимум) не изымаются никогда.
        let idx = 1 + rng.pick_index(NOTE_DENOMINATIONS.len() - 2);
        let removed = participant.money_hand.remove(idx);
        participant.removed_note = Some(removed);
    }

    session.next_starting_participant_id = session.participants.first().map(|p| p.id);
    session.events.push(GameEvent::GameStarted);

    start_next_round(session)
}

/// Сборка колоды с позиционным ограничением: карта обмена не может
/// оказаться среди первой половины вытягиваемых карт. Перемешиваем
/// 14 обычных карт, делим пополам, подкладываем карту обмена в «позднюю»
/// половину и перемешиваем только её.
///
/// `Deck::draw_one` снимает карты с конца вектора, поэтому «поздняя»
/// половина лежит в начале.
fn build_deck<R: RandomSource>(rng: &mut R, next_id: impl FnMut() -> CardId) -> Deck {
    let mut cards = Deck::full_composition(next_id);

    let swap_pos = cards
        .iter()
        .position(|c| c.is_swap())
        .unwrap_or(cards.len() - 1);
    let swap_card = cards.remove(swap_pos);

    rng.shuffle(&mut cards);

    let mut late_half = cards.split_off(cards.len() / 2);
    let early_half = cards;

    late_half.push(swap_card);
    rng.shuffle(&mut late_half);

    let mut ordered = late_half;
    ordered.extend(early_half);
    Deck { cards: ordered }
}

/// Открыть следующий раунд: вытянуть лот, сбросить раундовые флаги,
/// выбрать тип аукциона и стартующего. Пустая колода – конец игры.
fn start_next_round(session: &mut Session) -> Result<(), EngineError> {
    session.swap_winner_id = None;
    session.discarding_participant_id = None;

    let Some(card) = session.deck.draw_one() else {
        return finish_game(session);
    };

    for participant in session.participants.iter_mut() {
        participant.clear_round_state();
    }

    let kind = if card.is_disgrace() {
        AuctionKind::Reverse
    } else {
        AuctionKind::Standard
    };

    let starting = session
        .next_starting_participant_id
        .filter(|&id| session.participant(id).is_some())
        .or_else(|| session.participants.first().map(|p| p.id))
        .ok_or(EngineError::Internal("раунд без участников"))?;

    let active: Vec<ParticipantId> = session.participants.iter().map(|p| p.id).collect();

    session.current_card = Some(card);
    session.auction = Some(Auction::new(kind, active, starting));
    session.phase = SessionPhase::Auction;

    session.events.push(GameEvent::RoundStarted {
        card,
        auction_kind: kind,
        starting_participant_id: starting,
    });

    Ok(())
}

/// Ставка участника: заявленные ранее купюры ∪ новые должны строго
/// перебивать старшую ставку. Успех двигает ход дальше по кругу.
pub fn place_bid(
    session: &mut Session,
    participant_id: ParticipantId,
    note_ids: &[NoteId],
) -> Result<(), EngineError> {
    let total = validate_bid(session, participant_id, note_ids)?;

    let auction = session.auction.as_ref().ok_or(EngineError::NoActiveAuction)?;
    let next_turn = next_active_excluding(&session.participants, auction, participant_id)?;

    // Все проверки позади – мутируем.
    let participant = session
        .participant_mut(participant_id)
        .ok_or(EngineError::ParticipantNotFound(participant_id))?;
    participant.current_bid.extend_from_slice(note_ids);

    let auction = session.auction.as_mut().ok_or(EngineError::NoActiveAuction)?;
    auction.highest_bid = total;
    auction.highest_bidder_id = Some(participant_id);
    auction.turn_participant_id = next_turn;

    session.events.push(GameEvent::BidPlaced {
        participant_id,
        bid_total: total,
    });

    Ok(())
}

/// Пас. В обратном аукционе первый же пас немедленно разрешает аукцион
/// (спасовавший застревает с лотом). В обычном – участник выбывает из
/// борьбы, и аукцион разрешается, когда активных остаётся ровно один.
pub fn pass_turn(session: &mut Session, participant_id: ParticipantId) -> Result<(), EngineError> {
    validate_turn(session, participant_id)?;

    let auction = session.auction.as_ref().ok_or(EngineError::NoActiveAuction)?;

    if auction.kind == AuctionKind::Reverse {
        session.events.push(GameEvent::TurnPassed { participant_id });
        return resolve_reverse(session, participant_id);
    }

    // Следующего вычисляем до мутаций: при ошибке сессия остаётся
    // нетронутой. На пути разрешения (остаётся один активный) скан тоже
    // успешен – он и находит этого последнего.
    let next_turn = next_active_excluding(&session.participants, auction, participant_id)?;

    if let Some(p) = session.participant_mut(participant_id) {
        p.has_passed = true;
    }
    let auction = session.auction.as_mut().ok_or(EngineError::NoActiveAuction)?;
    auction.remove_active(participant_id);

    session.events.push(GameEvent::TurnPassed { participant_id });

    if auction.active_participant_ids.len() == 1 {
        return resolve_standard(session);
    }

    let auction = session.auction.as_mut().ok_or(EngineError::NoActiveAuction)?;
    auction.turn_participant_id = next_turn;
    Ok(())
}

/// Разрешение обычного аукциона: лот уходит старшей ставке, её купюры
/// становятся недоступными, чужие заявленные купюры возвращаются.
fn resolve_standard(session: &mut Session) -> Result<(), EngineError> {
    let auction = session
        .auction
        .take()
        .ok_or(EngineError::NoActiveAuction)?;
    let card = session
        .current_card
        .take()
        .ok_or(EngineError::Internal("аукцион без лота"))?;

    // Если никто так и не поставил, лот бесплатно достаётся последнему
    // оставшемуся активному.
    let winner_id = auction
        .highest_bidder_id
        .or_else(|| auction.active_participant_ids.first().copied())
        .ok_or(EngineError::NoActiveParticipants)?;

    let mut paid = crate::domain::Money::ZERO;
    for participant in session.participants.iter_mut() {
        if participant.id == winner_id {
            paid = participant.bid_total();
            for note_id in participant.current_bid.clone() {
                if let Some(note) = participant.note_mut(note_id) {
                    note.available = false;
                }
            }
        }
        participant.current_bid.clear();
    }

    let winner = session
        .participant_mut(winner_id)
        .ok_or(EngineError::ParticipantNotFound(winner_id))?;
    winner.won_cards.push(card);

    session.next_starting_participant_id = Some(winner_id);
    session.events.push(GameEvent::AuctionWon {
        participant_id: winner_id,
        card_id: card.id,
        paid,
    });

    dispatch_after_resolution(session, winner_id, card)
}

/// Разрешение обратного аукциона: первый спасовавший забирает лот без
/// оплаты, заявленные купюры всех остальных активных сгорают.
fn resolve_reverse(
    session: &mut Session,
    passer_id: ParticipantId,
) -> Result<(), EngineError> {
    let auction = session
        .auction
        .take()
        .ok_or(EngineError::NoActiveAuction)?;
    let card = session
        .current_card
        .take()
        .ok_or(EngineError::Internal("аукцион без лота"))?;

    for participant in session.participants.iter_mut() {
        if participant.id != passer_id && auction.is_active(participant.id) {
            for note_id in participant.current_bid.clone() {
                if let Some(note) = participant.note_mut(note_id) {
                    note.available = false;
                }
            }
        }
        participant.current_bid.clear();
    }

    let passer = session
        .participant_mut(passer_id)
        .ok_or(EngineError::ParticipantNotFound(passer_id))?;
    passer.won_cards.push(card);

    session.next_starting_participant_id = Some(passer_id);
    session.events.push(GameEvent::AuctionStuck {
        participant_id: passer_id,
        card_id: card.id,
    });

    dispatch_after_resolution(session, passer_id, card)
}

/// Диспетчеризация спецэффектов после разрешения раунда.
fn dispatch_after_resolution(
    session: &mut Session,
    receiver_id: ParticipantId,
    card: ItemCard,
) -> Result<(), EngineError> {
    match card.kind {
        CardKind::Swap => {
            session.phase = SessionPhase::CardSwap;
            session.swap_winner_id = Some(receiver_id);
            Ok(())
        }
        CardKind::Disgrace {
            effect: DisgraceEffect::DiscardLuxury,
        } => {
            let has_luxury = session
                .participant(receiver_id)
                .map(|p| p.won_cards.iter().any(|c| c.is_luxury()))
                .unwrap_or(false);
            if has_luxury {
                session.phase = SessionPhase::DiscardLuxury;
                session.discarding_participant_id = Some(receiver_id);
                Ok(())
            } else {
                start_next_round(session)
            }
        }
        _ => start_next_round(session),
    }
}

/// Обмен картами (или отказ от него). Доступен только обладателю права
/// обмена; пустой запрос – валидный «пропустить».
pub fn execute_card_swap(
    session: &mut Session,
    executor_id: ParticipantId,
    request: &SwapRequest,
) -> Result<(), EngineError> {
    let choice = validate_swap(session, executor_id, request)?;

    match choice {
        SwapChoice::Skip => {
            session.events.push(GameEvent::SwapSkipped {
                participant_id: executor_id,
            });
        }
        SwapChoice::Swap {
            first_participant_id,
            first_card_id,
            second_participant_id,
            second_card_id,
        } => {
            let first_card = take_card(session, first_participant_id, first_card_id)?;
            let second_card = take_card(session, second_participant_id, second_card_id)?;

            give_card(session, first_participant_id, second_card)?;
            give_card(session, second_participant_id, first_card)?;

            session.events.push(GameEvent::CardsSwapped {
                first_participant_id,
                first_card_id,
                second_participant_id,
                second_card_id,
            });
        }
    }

    session.swap_winner_id = None;
    start_next_round(session)
}

fn take_card(
    session: &mut Session,
    participant_id: ParticipantId,
    card_id: CardId,
) -> Result<ItemCard, EngineError> {
    let participant = session
        .participant_mut(participant_id)
        .ok_or(EngineError::ParticipantNotFound(participant_id))?;
    let pos = participant
        .won_cards
        .iter()
        .position(|c| c.id == card_id)
        .ok_or(EngineError::CardNotFound(card_id))?;
    Ok(participant.won_cards.remove(pos))
}

fn give_card(
    session: &mut Session,
    participant_id: ParticipantId,
    card: ItemCard,
) -> Result<(), EngineError> {
    let participant = session
        .participant_mut(participant_id)
        .ok_or(EngineError::ParticipantNotFound(participant_id))?;
    participant.won_cards.push(card);
    Ok(())
}

/// Сброс карты роскоши в саб-фазе DISCARD_LUXURY. Карта уходит из игры
/// навсегда (в removed_from_game, не в колоду).
pub fn discard_luxury_card(
    session: &mut Session,
    participant_id: ParticipantId,
    card_id: CardId,
) -> Result<(), EngineError> {
    validate_discard(session, participant_id, card_id)?;

    let card = take_card(session, participant_id, card_id)?;
    session.removed_from_game.push(card);

    session.events.push(GameEvent::LuxuryDiscarded {
        participant_id,
        card_id,
    });

    session.discarding_participant_id = None;
    start_next_round(session)
}

/// Полный рестарт аукциона за текущий лот: все заявленные ставки
/// возвращаются, пасы снимаются, активны снова все, ход – у исходного
/// стартующего раунда. Используется continuity-слоем при реконнекте.
pub fn restart_auction(session: &mut Session) -> Result<(), EngineError> {
    if session.phase != SessionPhase::Auction {
        return Err(EngineError::WrongPhase);
    }
    let card_id = session
        .current_card
        .as_ref()
        .map(|c| c.id)
        .ok_or(EngineError::Internal("аукцион без лота"))?;

    for participant in session.participants.iter_mut() {
        participant.clear_round_state();
    }

    let all_ids: Vec<ParticipantId> = session.participants.iter().map(|p| p.id).collect();
    let auction = session.auction.as_mut().ok_or(EngineError::NoActiveAuction)?;
    auction.highest_bid = crate::domain::Money::ZERO;
    auction.highest_bidder_id = None;
    auction.active_participant_ids = all_ids;
    auction.turn_participant_id = auction.starting_participant_id;

    session.events.push(GameEvent::AuctionRestarted { card_id });
    Ok(())
}

/// Конец игры: посчитать итоги, зафиксировать терминальную фазу.
fn finish_game(session: &mut Session) -> Result<(), EngineError> {
    let results = compute_results(&session.participants);
    session.events.push(GameEvent::GameFinished {
        results: results.clone(),
    });
    session.results = Some(results);
    session.auction = None;
    session.current_card = None;
    session.phase = SessionPhase::GameOver;
    Ok(())
}
