use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use serde_json::Value;
use tempfile::TempDir;

use crate::config::WizardConfig;
use crate::wizard::domain::{ReferenceNumber, SessionId, SessionState};
use crate::wizard::reference::ReferenceGenerator;
use crate::wizard::repository::{RepositoryError, SessionRepository};
use crate::wizard::{wizard_router, ResetPolicy, WizardService, SESSION_COOKIE};

pub(super) const BOUNDARY: &str = "wizard-test-boundary";

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    sessions: Arc<Mutex<HashMap<SessionId, SessionState>>>,
}

impl MemoryRepository {
    pub(super) fn stored(&self, id: &SessionId) -> Option<SessionState> {
        self.sessions
            .lock()
            .expect("repository mutex poisoned")
            .get(id)
            .cloned()
    }

    pub(super) fn len(&self) -> usize {
        self.sessions.lock().expect("repository mutex poisoned").len()
    }
}

impl SessionRepository for MemoryRepository {
    fn insert(&self, id: SessionId, state: SessionState) -> Result<(), RepositoryError> {
        let mut guard = self.sessions.lock().expect("repository mutex poisoned");
        if guard.contains_key(&id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(id, state);
        Ok(())
    }

    fn update(&self, id: &SessionId, state: SessionState) -> Result<(), RepositoryError> {
        let mut guard = self.sessions.lock().expect("repository mutex poisoned");
        match guard.get_mut(id) {
            Some(slot) => {
                *slot = state;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn fetch(&self, id: &SessionId) -> Result<Option<SessionState>, RepositoryError> {
        Ok(self
            .sessions
            .lock()
            .expect("repository mutex poisoned")
            .get(id)
            .cloned())
    }
}

pub(super) struct UnavailableRepository;

impl SessionRepository for UnavailableRepository {
    fn insert(&self, _id: SessionId, _state: SessionState) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("store offline".to_string()))
    }

    fn update(&self, _id: &SessionId, _state: SessionState) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("store offline".to_string()))
    }

    fn fetch(&self, _id: &SessionId) -> Result<Option<SessionState>, RepositoryError> {
        Err(RepositoryError::Unavailable("store offline".to_string()))
    }
}

/// Hands out 100000, 100001, ... so assertions can name exact references.
pub(super) struct SequentialReferences(AtomicU32);

impl Default for SequentialReferences {
    fn default() -> Self {
        Self(AtomicU32::new(ReferenceNumber::MIN))
    }
}

impl ReferenceGenerator for SequentialReferences {
    fn next_reference(&self) -> ReferenceNumber {
        let value = self.0.fetch_add(1, Ordering::Relaxed);
        ReferenceNumber::new(value).expect("sequence stays in range")
    }
}

pub(super) type TestService = WizardService<MemoryRepository, SequentialReferences>;

pub(super) fn wizard_config(dir: &TempDir, reset_policy: ResetPolicy) -> WizardConfig {
    WizardConfig {
        checklist_dir: dir.path().join("checklists"),
        reset_policy,
    }
}

pub(super) fn build_service(reset_policy: ResetPolicy) -> (TestService, MemoryRepository, TempDir) {
    let dir = tempfile::tempdir().expect("tempdir");
    let repository = MemoryRepository::default();
    let service = WizardService::new(
        Arc::new(repository.clone()),
        Arc::new(SequentialReferences::default()),
        &wizard_config(&dir, reset_policy),
    );
    (service, repository, dir)
}

pub(super) fn build_router(reset_policy: ResetPolicy) -> (axum::Router, MemoryRepository, TempDir) {
    let (service, repository, dir) = build_service(reset_policy);
    (wizard_router(Arc::new(service)), repository, dir)
}

pub(super) enum Part<'a> {
    Text(&'a str, &'a str),
    File {
        name: &'a str,
        file_name: &'a str,
        content_type: &'a str,
        bytes: &'a [u8],
    },
}

pub(super) fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File {
                name,
                file_name,
                content_type,
                bytes,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\n\
                         Content-Type: {content_type}\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(bytes);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub(super) fn multipart_post(
    uri: &str,
    session: Option<&SessionId>,
    parts: &[Part<'_>],
) -> Request<axum::body::Body> {
    let mut builder = Request::post(uri).header(
        header::CONTENT_TYPE,
        format!("multipart/form-data; boundary={BOUNDARY}"),
    );
    if let Some(id) = session {
        builder = builder.header(header::COOKIE, format!("{SESSION_COOKIE}={id}"));
    }
    builder
        .body(axum::body::Body::from(multipart_body(parts)))
        .expect("request builds")
}

pub(super) fn empty_request(
    method: &str,
    uri: &str,
    session: Option<&SessionId>,
) -> Request<axum::body::Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(id) = session {
        builder = builder.header(header::COOKIE, format!("{SESSION_COOKIE}={id}"));
    }
    builder
        .body(axum::body::Body::empty())
        .expect("request builds")
}

/// Session id set by a response, if the response started a new session.
pub(super) fn issued_session(response: &Response) -> Option<SessionId> {
    response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|value| value.to_str().ok())
        .and_then(|cookie| cookie.split(';').next())
        .and_then(|pair| pair.split_once('='))
        .filter(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| SessionId(value.to_string()))
}

pub(super) fn assert_redirects_home(response: &Response) {
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response
            .headers()
            .get(header::LOCATION)
            .and_then(|value| value.to_str().ok()),
        Some("/")
    );
}

pub(super) async fn read_text_body(response: Response) -> String {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    String::from_utf8(body.to_vec()).expect("utf-8 body")
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
