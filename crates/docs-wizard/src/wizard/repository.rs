use super::domain::{SessionId, SessionState};

/// Storage abstraction for wizard sessions so the service can be exercised
/// in isolation.
pub trait SessionRepository: Send + Sync {
    fn insert(&self, id: SessionId, state: SessionState) -> Result<(), RepositoryError>;
    fn update(&self, id: &SessionId, state: SessionState) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &SessionId) -> Result<Option<SessionState>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("session already exists")]
    Conflict,
    #[error("session not found")]
    NotFound,
    #[error("session store unavailable: {0}")]
    Unavailable(String),
}
