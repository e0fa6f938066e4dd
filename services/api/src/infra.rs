use docs_wizard::catalog::DocumentType;
use docs_wizard::config::SessionConfig;
use docs_wizard::wizard::{RepositoryError, SessionId, SessionRepository, SessionState};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};
use tracing::debug;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

struct StoredSession {
    state: SessionState,
    last_access: Instant,
}

/// Process-local session store. Sessions idle for longer than the configured
/// TTL are evicted on the next insert, and treated as gone on fetch.
#[derive(Clone)]
pub(crate) struct InMemorySessionRepository {
    sessions: Arc<Mutex<HashMap<SessionId, StoredSession>>>,
    idle_ttl: Duration,
}

impl Default for InMemorySessionRepository {
    fn default() -> Self {
        Self::new(&SessionConfig::default())
    }
}

impl InMemorySessionRepository {
    pub(crate) fn new(config: &SessionConfig) -> Self {
        Self {
            sessions: Arc::default(),
            idle_ttl: config.idle_ttl,
        }
    }

    fn sessions(&self) -> Result<MutexGuard<'_, HashMap<SessionId, StoredSession>>, RepositoryError> {
        self.sessions
            .lock()
            .map_err(|_| RepositoryError::Unavailable("session mutex poisoned".to_string()))
    }

    fn is_idle(&self, session: &StoredSession, now: Instant) -> bool {
        now.saturating_duration_since(session.last_access) > self.idle_ttl
    }

    fn insert_at(
        &self,
        id: SessionId,
        state: SessionState,
        now: Instant,
    ) -> Result<(), RepositoryError> {
        let mut guard = self.sessions()?;
        let before = guard.len();
        guard.retain(|_, session| !self.is_idle(session, now));
        let evicted = before - guard.len();
        if evicted > 0 {
            debug!(evicted, remaining = guard.len(), "idle sessions evicted");
        }

        if guard.contains_key(&id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(
            id,
            StoredSession {
                state,
                last_access: now,
            },
        );
        Ok(())
    }

    fn update_at(
        &self,
        id: &SessionId,
        state: SessionState,
        now: Instant,
    ) -> Result<(), RepositoryError> {
        let mut guard = self.sessions()?;
        let idle = match guard.get(id) {
            Some(session) => self.is_idle(session, now),
            None => return Err(RepositoryError::NotFound),
        };
        if idle {
            guard.remove(id);
            return Err(RepositoryError::NotFound);
        }
        if let Some(slot) = guard.get_mut(id) {
            slot.state = state;
            slot.last_access = now;
        }
        Ok(())
    }

    fn fetch_at(
        &self,
        id: &SessionId,
        now: Instant,
    ) -> Result<Option<SessionState>, RepositoryError> {
        let mut guard = self.sessions()?;
        let idle = match guard.get(id) {
            Some(session) => self.is_idle(session, now),
            None => return Ok(None),
        };
        if idle {
            guard.remove(id);
            debug!(session = %id, "idle session expired");
            return Ok(None);
        }
        Ok(guard.get_mut(id).map(|slot| {
            slot.last_access = now;
            slot.state.clone()
        }))
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.sessions().map(|guard| guard.len()).unwrap_or(0)
    }
}

impl SessionRepository for InMemorySessionRepository {
    fn insert(&self, id: SessionId, state: SessionState) -> Result<(), RepositoryError> {
        self.insert_at(id, state, Instant::now())
    }

    fn update(&self, id: &SessionId, state: SessionState) -> Result<(), RepositoryError> {
        self.update_at(id, state, Instant::now())
    }

    fn fetch(&self, id: &SessionId) -> Result<Option<SessionState>, RepositoryError> {
        self.fetch_at(id, Instant::now())
    }
}

pub(crate) fn parse_document(raw: &str) -> Result<DocumentType, String> {
    raw.parse::<DocumentType>().map_err(|err| err.to_string())
}
