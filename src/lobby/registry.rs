use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{debug, info};

use crate::api::commands::{AutoFill, StartGameOptions};
use crate::bots::{BaselinePolicy, BotConfig, BotDriver, DecisionPolicy};
use crate::domain::events::GameEvent;
use crate::domain::participant::Participant;
use crate::domain::session::{Session, SessionPhase, MAX_PARTICIPANTS, MIN_PARTICIPANTS};
use crate::domain::{ParticipantId, SessionCode};
use crate::engine::{self, EngineError, RandomSource};
use crate::infra::ids::IdGenerator;

/// Ошибки уровня реестра сессий (над машиной состояний).
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Комната {0} не найдена")]
    SessionNotFound(String),

    #[error("Соединение {0} не привязано ни к одной комнате")]
    ConnectionNotBound(ParticipantId),

    #[error("Соединение {0} уже находится в комнате")]
    AlreadyInSession(ParticipantId),

    #[error("Действие доступно только хосту")]
    NotHost(ParticipantId),

    #[error("В комнате нет отключённого места с именем «{0}»")]
    NoSeatToRejoin(String),

    /// Проброшенная ошибка машины состояний.
    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Контекст одной сессии: само состояние плюс то, что нужно вокруг него –
/// генератор id и метки времени для жатвы. Очередь ботов и генератор
/// живут здесь, внутри записи реестра: никакого процессо-глобального
/// изменяемого состояния.
#[derive(Debug)]
pub struct SessionContext {
    pub session: Session,
    pub ids: IdGenerator,
    /// Политика автодобора, заданная при создании комнаты. Старт может
    /// перекрыть её своими опциями.
    pub default_auto_fill: AutoFill,
    pub created_at: Instant,
    pub last_activity: Instant,
}

impl SessionContext {
    fn new(session: Session, default_auto_fill: AutoFill) -> Self {
        let now = Instant::now();
        Self {
            session,
            ids: IdGenerator::new(),
            default_auto_fill,
            created_at: now,
            last_activity: now,
        }
    }

    pub fn touch(&mut self) {
        self.last_activity = Instant::now();
    }
}

/// Общий доступ к контексту сессии. Замок никогда не держится через
/// await – единственный писатель в каждый момент обеспечен очередью
/// оркестратора и синхронной диспетчеризацией команд.
pub type SharedSession = Arc<Mutex<SessionContext>>;

/// Запись реестра: контекст + оркестратор ботов (если есть боты).
/// Уничтожение записи закрывает очередь оркестратора.
pub struct SessionEntry {
    pub ctx: SharedSession,
    pub driver: Option<BotDriver>,
}

/// Алфавит кодов комнат: без похожих символов (0/O, 1/I).
const CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";
const CODE_LEN: usize = 4;

/// Реестр сессий: владеет всеми комнатами и привязками
/// соединение → комната.
pub struct SessionRegistry {
    sessions: HashMap<SessionCode, SessionEntry>,
    connections: HashMap<ParticipantId, SessionCode>,
    policy: Arc<dyn DecisionPolicy>,
    bot_config: BotConfig,
}

impl SessionRegistry {
    pub fn new(policy: Arc<dyn DecisionPolicy>, bot_config: BotConfig) -> Self {
        Self {
            sessions: HashMap::new(),
            connections: HashMap::new(),
            policy,
            bot_config,
        }
    }

    /// Реестр с базовой политикой ботов и таймингами по умолчанию.
    pub fn with_defaults() -> Self {
        Self::new(Arc::new(BaselinePolicy::default()), BotConfig::default())
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    fn generate_code(&self) -> SessionCode {
        use rand::Rng;
        let mut rng = rand::thread_rng();
        loop {
            let code: String = (0..CODE_LEN)
                .map(|_| CODE_ALPHABET[rng.gen_range(0..CODE_ALPHABET.len())] as char)
                .collect();
            let code = SessionCode::new(code);
            if !self.sessions.contains_key(&code) {
                return code;
            }
        }
    }

    /// Создать комнату; вызывающее соединение становится хостом.
    pub fn create_session(
        &mut self,
        host_conn: ParticipantId,
        host_name: impl Into<String>,
        auto_fill: AutoFill,
    ) -> Result<SessionCode, RegistryError> {
        if self.connections.contains_key(&host_conn) {
            return Err(RegistryError::AlreadyInSession(host_conn));
        }

        let code = self.generate_code();
        let host_name = host_name.into();
        let mut session = Session::new(code.clone(), Participant::new(host_conn, host_name.clone(), false));
        session.events.push(GameEvent::ParticipantJoined {
            participant_id: host_conn,
            name: host_name,
            is_automated: false,
        });

        info!(code = %code, host = host_conn, "комната создана");
        self.sessions.insert(
            code.clone(),
            SessionEntry {
                ctx: Arc::new(Mutex::new(SessionContext::new(session, auto_fill))),
                driver: None,
            },
        );
        self.connections.insert(host_conn, code.clone());
        Ok(code)
    }

    pub fn code_for_connection(&self, conn: ParticipantId) -> Option<&SessionCode> {
        self.connections.get(&conn)
    }

    /// Ссылка на контекст сессии (клонирует Arc).
    pub fn session(&self, code: &SessionCode) -> Option<SharedSession> {
        self.sessions.get(code).map(|e| Arc::clone(&e.ctx))
    }

    pub(crate) fn entry(&self, code: &SessionCode) -> Option<&SessionEntry> {
        self.sessions.get(code)
    }

    pub(crate) fn bind_connection(&mut self, conn: ParticipantId, code: SessionCode) {
        self.connections.insert(conn, code);
    }

    pub(crate) fn unbind_connection(&mut self, conn: ParticipantId) -> Option<SessionCode> {
        self.connections.remove(&conn)
    }

    /// Поставить проверку хода ботов в очередь сессии.
    pub fn schedule_bot_check(&self, code: &SessionCode) {
        if let Some(driver) = self.sessions.get(code).and_then(|e| e.driver.as_ref()) {
            driver.schedule_check();
        }
    }

    /// Вход в комнату по коду. Если игра уже идёт – это попытка
    /// реконнекта (см. continuity).
    pub fn join_session(
        &mut self,
        code_str: &str,
        conn: ParticipantId,
        name: impl Into<String>,
    ) -> Result<SessionCode, RegistryError> {
        if self.connections.contains_key(&conn) {
            return Err(RegistryError::AlreadyInSession(conn));
        }

        let code = SessionCode::new(code_str.to_ascii_uppercase());
        let entry = self
            .sessions
            .get(&code)
            .ok_or_else(|| RegistryError::SessionNotFound(code_str.to_string()))?;

        let name = name.into();
        let in_progress = {
            let mut guard = lock_ctx(&entry.ctx);
            guard.touch();
            if guard.session.phase == SessionPhase::Waiting {
                engine::add_participant(&mut guard.session, conn, name.clone(), false)?;
                false
            } else {
                true
            }
        };

        if in_progress {
            self.rejoin(&code, conn, &name)?;
        }

        self.connections.insert(conn, code.clone());
        Ok(code)
    }

    /// Старт игры. Только хост; автодобор ботов – по опциям.
    pub fn start_game<R: RandomSource>(
        &mut self,
        conn: ParticipantId,
        options: StartGameOptions,
        rng: &mut R,
    ) -> Result<SessionCode, RegistryError> {
        let code = self
            .connections
            .get(&conn)
            .cloned()
            .ok_or(RegistryError::ConnectionNotBound(conn))?;
        let entry = self
            .sessions
            .get(&code)
            .ok_or_else(|| RegistryError::SessionNotFound(code.to_string()))?;
        let ctx = Arc::clone(&entry.ctx);

        let has_bots = {
            let mut guard = lock_ctx(&ctx);
            guard.touch();

            if guard.session.host_id != conn {
                return Err(RegistryError::NotHost(conn));
            }
            if guard.session.phase != SessionPhase::Waiting {
                return Err(RegistryError::Engine(EngineError::AlreadyStarted));
            }

            // Режим наблюдателя: хост встаёт из-за стола (привязка
            // соединения остаётся – публичное представление он получает).
            if options.spectator_mode {
                engine::remove_participant(&mut guard.session, conn)?;
            }

            let auto_fill = options.auto_fill.unwrap_or(guard.default_auto_fill);
            let target = match auto_fill {
                AutoFill::Off if options.spectator_mode => MIN_PARTICIPANTS,
                AutoFill::Off => 0,
                AutoFill::ToMinimum => MIN_PARTICIPANTS,
                AutoFill::ToFull => MAX_PARTICIPANTS,
            };

            let mut bot_no = 0;
            while guard.session.participants.len() < target {
                bot_no += 1;
                let bot_id = guard.ids.next_bot_participant_id();
                engine::add_participant(
                    &mut guard.session,
                    bot_id,
                    format!("Бот-{bot_no}"),
                    true,
                )?;
            }

            // расщепляем guard на поля до вызова: &mut session + &ids
            let inner = &mut *guard;
            engine::start_session(&mut inner.session, rng, &inner.ids)?;
            debug!(code = %code, "игра запущена");

            guard.session.participants.iter().any(|p| p.is_automated)
        };

        // Оркестратор нужен, только если за столом есть боты.
        if has_bots {
            let entry = self
                .sessions
                .get_mut(&code)
                .ok_or_else(|| RegistryError::SessionNotFound(code.to_string()))?;
            if entry.driver.is_none() {
                entry.driver = Some(BotDriver::spawn(
                    Arc::clone(&entry.ctx),
                    Arc::clone(&self.policy),
                    self.bot_config,
                ));
            }
            self.schedule_bot_check(&code);
        }

        Ok(code)
    }

    /// Уничтожить сессию целиком: запись, привязки, очередь ботов.
    pub fn destroy_session(&mut self, code: &SessionCode) {
        if self.sessions.remove(code).is_some() {
            info!(code = %code, "сессия уничтожена");
        }
        self.connections.retain(|_, c| c != code);
    }

    /// Жатва: убрать сессии без участников и простоявшие дольше порога.
    /// Возвращает коды уничтоженных.
    pub fn reap_idle(&mut self, max_idle: Duration) -> Vec<SessionCode> {
        let doomed: Vec<SessionCode> = self
            .sessions
            .iter()
            .filter(|(_, entry)| {
                let guard = lock_ctx(&entry.ctx);
                guard.session.participants.is_empty()
                    || guard.last_activity.elapsed() > max_idle
            })
            .map(|(code, _)| code.clone())
            .collect();

        for code in &doomed {
            self.destroy_session(code);
        }
        doomed
    }
}

pub(crate) fn lock_ctx(ctx: &SharedSession) -> MutexGuard<'_, SessionContext> {
    match ctx.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
