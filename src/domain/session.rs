use serde::{Deserialize, Serialize};

use crate::domain::auction::Auction;
use crate::domain::card::ItemCard;
use crate::domain::deck::Deck;
use crate::domain::events::EventLog;
use crate::domain::participant::Participant;
use crate::domain::scoring::ParticipantResult;
use crate::domain::{ParticipantId, SessionCode};

/// Фаза игровой сессии.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum SessionPhase {
    /// Комната собрана, игра не началась. Участники приходят/уходят.
    Waiting,
    /// Переходное состояние старта (колода построена, купюры изъяты).
    Starting,
    /// Идёт аукцион за текущий лот.
    Auction,
    /// Саб-фаза карты обмена: победитель раунда решает, меняться ли.
    CardSwap,
    /// Саб-фаза карты позора: получивший обязан сбросить карту роскоши.
    DiscardLuxury,
    /// Терминальная фаза: результаты посчитаны, мутаций больше нет.
    GameOver,
}

/// Пределы количества участников.
pub const MIN_PARTICIPANTS: usize = 3;
pub const MAX_PARTICIPANTS: usize = 5;

/// Игровая сессия – одна комната со всем её изменяемым состоянием.
///
/// Владеет сессией исключительно lobby::SessionRegistry, мутируют её только
/// операции engine::game_loop (единый путь для людей и ботов).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Session {
    pub code: SessionCode,
    /// Упорядоченный список мест – порядок хода по кругу.
    pub participants: Vec<Participant>,
    pub phase: SessionPhase,
    pub deck: Deck,
    /// Текущий лот (отсутствует в WAITING и после розыгрыша).
    pub current_card: Option<ItemCard>,
    /// Состояние аукциона. Есть только в фазе AUCTION.
    pub auction: Option<Auction>,
    pub host_id: ParticipantId,
    /// Кто начинает следующий раунд (победитель/пострадавший прошлого).
    pub next_starting_participant_id: Option<ParticipantId>,
    /// Кому принадлежит право обмена в фазе CARD_SWAP.
    /// Живёт на сессии, а не в Auction: саб-фаза переживает сам аукцион.
    pub swap_winner_id: Option<ParticipantId>,
    /// Кто обязан сбросить роскошь в фазе DISCARD_LUXURY.
    pub discarding_participant_id: Option<ParticipantId>,
    /// Сброшенные навсегда карты (эффект DiscardLuxury). В колоду не
    /// возвращаются, но и не исчезают – ради проверяемости инварианта.
    pub removed_from_game: Vec<ItemCard>,
    /// Итоги игры. Заполняются один раз при переходе в GAME_OVER.
    pub results: Option<Vec<ParticipantResult>>,
    pub events: EventLog,
}

impl Session {
    /// Новая комната с хостом за первым местом.
    pub fn new(code: SessionCode, host: Participant) -> Self {
        let host_id = host.id;
        Self {
            code,
            participants: vec![host],
            phase: SessionPhase::Waiting,
            deck: Deck::default(),
            current_card: None,
            auction: None,
            host_id,
            next_starting_participant_id: None,
            swap_winner_id: None,
            discarding_participant_id: None,
            removed_from_game: Vec::new(),
            results: None,
            events: EventLog::new(),
        }
    }

    pub fn participant(&self, id: ParticipantId) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id == id)
    }

    pub fn participant_mut(&mut self, id: ParticipantId) -> Option<&mut Participant> {
        self.participants.iter_mut().find(|p| p.id == id)
    }

    /// Поиск участника по имени без учёта регистра (для реконнекта).
    /// Регистр складываем по Unicode: имена у нас сплошь кириллические.
    pub fn participant_by_name_ci(&self, name: &str) -> Option<&Participant> {
        let needle = name.to_lowercase();
        self.participants
            .iter()
            .find(|p| p.name.to_lowercase() == needle)
    }

    /// Идёт ли игра (любая фаза между WAITING и GAME_OVER включительно
    /// с точки зрения занятости мест).
    pub fn is_in_progress(&self) -> bool {
        !matches!(self.phase, SessionPhase::Waiting | SessionPhase::GameOver)
    }

    /// Перепривязать идентификатор участника во ВСЕХ полях, где он может
    /// встречаться. Единая операция, чтобы при добавлении нового
    /// id-несущего поля его нельзя было забыть где-то ещё.
    pub fn remap_participant_id(&mut self, old: ParticipantId, new: ParticipantId) {
        if let Some(p) = self.participant_mut(old) {
            p.id = new;
        }

        let remap = |field: &mut ParticipantId| {
            if *field == old {
                *field = new;
            }
        };

        remap(&mut self.host_id);
        if let Some(id) = self.next_starting_participant_id.as_mut() {
            remap(id);
        }
        if let Some(id) = self.swap_winner_id.as_mut() {
            remap(id);
        }
        if let Some(id) = self.discarding_participant_id.as_mut() {
            remap(id);
        }

        if let Some(auction) = self.auction.as_mut() {
            remap(&mut auction.turn_participant_id);
            remap(&mut auction.starting_participant_id);
            if let Some(id) = auction.highest_bidder_id.as_mut() {
                remap(id);
            }
            for id in auction.active_participant_ids.iter_mut() {
                remap(id);
            }
        }
    }
}
