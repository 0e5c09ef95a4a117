//! Непрерывность партии при обрывах связи.
//!
//! Место отключившегося игрока сохраняется на протяжении всей партии;
//! реконнект идёт по имени и перепривязывает новый идентификатор
//! соединения ко всем полям сессии разом. Если в момент возвращения шёл
//! аукцион, раунд перезапускается с чистого листа – заявленные в нём
//! купюры возвращаются в руки.

use tracing::{info, warn};

use crate::domain::events::GameEvent;
use crate::domain::session::SessionPhase;
use crate::domain::{ParticipantId, SessionCode};
use crate::engine;
use crate::lobby::registry::{lock_ctx, RegistryError, SessionRegistry};

/// Чем закончилась обработка обрыва соединения.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DisconnectOutcome {
    /// Комната ещё собиралась – место освобождено.
    RemovedFromLobby,
    /// Игра шла – место помечено отключённым и ждёт реконнекта.
    SeatPreserved,
    /// Уходил последний – комната уничтожена.
    SessionDestroyed,
}

impl SessionRegistry {
    /// Обрыв соединения (или явный выход). До старта – обычный уход из
    /// комнаты, после – место сохраняется за именем.
    pub fn disconnect(&mut self, conn: ParticipantId) -> Result<DisconnectOutcome, RegistryError> {
        let code = self
            .unbind_connection(conn)
            .ok_or(RegistryError::ConnectionNotBound(conn))?;
        let Some(entry) = self.entry(&code) else {
            // Привязка пережила сессию – считаем, что уходить уже неоткуда.
            warn!(conn, code = %code, "привязка без сессии");
            return Ok(DisconnectOutcome::SessionDestroyed);
        };

        let outcome = {
            let mut guard = lock_ctx(&entry.ctx);
            guard.touch();
            let session = &mut guard.session;

            match session.phase {
                SessionPhase::Waiting => {
                    // Наблюдателя (соединение без места) просто отвязываем.
                    if session.participant(conn).is_some() {
                        engine::remove_participant(session, conn)?;
                    }
                    if session.participants.is_empty() {
                        DisconnectOutcome::SessionDestroyed
                    } else {
                        DisconnectOutcome::RemovedFromLobby
                    }
                }
                _ => {
                    if let Some(p) = session.participant_mut(conn) {
                        p.connected = false;
                        session.events.push(GameEvent::ParticipantDisconnected {
                            participant_id: conn,
                        });
                        info!(conn, code = %code, "игрок отключился, место сохранено");
                    }
                    if session
                        .participants
                        .iter()
                        .all(|p| p.is_automated || !p.connected)
                    {
                        // Живых не осталось: партию некому продолжать смотреть,
                        // но ресурсы держим до жатвы – вдруг кто-то вернётся.
                        info!(code = %code, "все живые игроки отключены");
                    }
                    DisconnectOutcome::SeatPreserved
                }
            }
        };

        if outcome == DisconnectOutcome::SessionDestroyed {
            self.destroy_session(&code);
        }
        Ok(outcome)
    }

    /// Реконнект: новое соединение занимает отключённое место с тем же
    /// именем (без учёта регистра). Если идёт аукцион – раунд
    /// перезапускается, чтобы вернувшийся начал его в равных условиях.
    pub fn rejoin(
        &mut self,
        code: &SessionCode,
        new_conn: ParticipantId,
        name: &str,
    ) -> Result<(), RegistryError> {
        let entry = self
            .entry(code)
            .ok_or_else(|| RegistryError::SessionNotFound(code.to_string()))?;

        {
            let mut guard = lock_ctx(&entry.ctx);
            guard.touch();
            let session = &mut guard.session;

            let seat = session
                .participant_by_name_ci(name)
                .filter(|p| !p.is_automated && !p.connected)
                .map(|p| p.id)
                .ok_or_else(|| RegistryError::NoSeatToRejoin(name.to_string()))?;

            session.remap_participant_id(seat, new_conn);
            if let Some(p) = session.participant_mut(new_conn) {
                p.connected = true;
            }
            session.events.push(GameEvent::ParticipantRejoined {
                old_id: seat,
                new_id: new_conn,
            });

            // Раунд мог застрять на ходе вернувшегося – начинаем его заново.
            if session.phase == SessionPhase::Auction {
                engine::restart_auction(session)?;
            }

            info!(old = seat, new = new_conn, code = %code, "игрок вернулся в партию");
        }

        self.bind_connection(new_conn, code.clone());
        // После перезапуска раунда ход мог перейти к боту.
        self.schedule_bot_check(code);
        Ok(())
    }
}
