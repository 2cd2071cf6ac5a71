use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use uuid::Uuid;

use history_core::{AuthState, GameRepository, ScreenController, date_key, parse_date_key};
use history_types::{
    GameRecord, HistoryError, Principal, ScreenEvent, ScreenView, SessionId, SessionInfo,
};

#[derive(Debug, Clone)]
pub struct Session {
    pub id: SessionId,
    pub principal: Principal,
    pub auth: AuthState,
    pub controller: ScreenController,
    pub created_at: Instant,
    pub last_activity: Instant,
}

impl Session {
    pub fn new(id: SessionId, principal: Principal, initial_date: NaiveDate) -> Self {
        let mut auth = AuthState::new(true, !principal.is_guest());
        if principal.is_guest() {
            auth.enable_bypass();
        }
        let now = Instant::now();

        Self {
            id,
            principal,
            auth,
            controller: ScreenController::new(initial_date),
            created_at: now,
            last_activity: now,
        }
    }

    pub fn info(&self) -> SessionInfo {
        SessionInfo {
            session_id: self.id,
            profile_name: self.principal.profile_name(),
            guest: self.principal.is_guest(),
        }
    }

    pub fn update_activity(&mut self) {
        self.last_activity = Instant::now();
    }

    pub fn is_inactive(&self, timeout: Duration) -> bool {
        self.last_activity.elapsed() > timeout
    }
}

/// One screen state per signed-in or guest session
pub struct SessionManager {
    sessions: RwLock<HashMap<SessionId, Session>>,
    repository: Arc<GameRepository>,
    initial_date: NaiveDate,
    board_size: f64,
}

impl SessionManager {
    pub fn new(repository: Arc<GameRepository>, initial_date: NaiveDate, board_size: f64) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            repository,
            initial_date,
            board_size,
        }
    }

    pub async fn create_session(&self, principal: Principal) -> SessionInfo {
        let session = Session::new(Uuid::new_v4(), principal, self.initial_date);
        let info = session.info();

        tracing::info!(
            "Created session {} for {}{}",
            info.session_id,
            info.profile_name,
            if info.guest { " (guest)" } else { "" }
        );

        let mut sessions = self.sessions.write().await;
        sessions.insert(session.id, session);
        info
    }

    /// Signs the session out. The session stays stored but fails the history
    /// gate until idle cleanup drops it.
    pub async fn end_session(&self, id: SessionId) -> Result<(), HistoryError> {
        let mut sessions = self.sessions.write().await;
        let session = authorized(&mut sessions, id)?;
        session.auth.sign_out();
        session.update_activity();
        tracing::info!("Session {} signed out", id);
        Ok(())
    }

    pub async fn get_session(&self, id: SessionId) -> Option<Session> {
        let sessions = self.sessions.read().await;
        sessions.get(&id).cloned()
    }

    pub async fn view(&self, id: SessionId) -> Result<ScreenView, HistoryError> {
        let mut sessions = self.sessions.write().await;
        let session = authorized(&mut sessions, id)?;
        session.update_activity();
        Ok(session.controller.view(&self.repository, self.board_size))
    }

    /// Games of one day, for a session that may view the history
    pub async fn games_on(
        &self,
        id: SessionId,
        date: &str,
    ) -> Result<Vec<GameRecord>, HistoryError> {
        let mut sessions = self.sessions.write().await;
        let session = authorized(&mut sessions, id)?;
        session.update_activity();

        let parsed = parse_date_key(date).map_err(|_| HistoryError::InvalidDate {
            date: date.to_string(),
        })?;
        Ok(self.repository.lookup(&date_key(parsed)).to_vec())
    }

    /// Applies one event under the write lock, so events of a session never interleave
    pub async fn apply_event(
        &self,
        id: SessionId,
        event: ScreenEvent,
    ) -> Result<ScreenView, HistoryError> {
        let mut sessions = self.sessions.write().await;
        let session = authorized(&mut sessions, id)?;
        session.update_activity();

        session
            .controller
            .apply(event.clone())
            .map_err(|e| match &event {
                ScreenEvent::SelectDate { date } | ScreenEvent::PickCalendarDate { date } => {
                    HistoryError::InvalidDate { date: date.clone() }
                }
                _ => HistoryError::InvalidEvent {
                    message: e.to_string(),
                },
            })?;

        Ok(session.controller.view(&self.repository, self.board_size))
    }

    pub async fn cleanup_inactive_sessions(&self, timeout: Duration) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|id, session| {
            let keep = !session.is_inactive(timeout);
            if !keep {
                tracing::info!("Removing inactive session {}", id);
            }
            keep
        });
        before - sessions.len()
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

fn session_not_found(id: SessionId) -> HistoryError {
    HistoryError::SessionNotFound {
        session_id: id.to_string(),
    }
}

fn authorized(
    sessions: &mut HashMap<SessionId, Session>,
    id: SessionId,
) -> Result<&mut Session, HistoryError> {
    let session = sessions.get_mut(&id).ok_or_else(|| session_not_found(id))?;
    if !session.auth.can_view_history() {
        return Err(HistoryError::AuthenticationRequired);
    }
    Ok(session)
}
