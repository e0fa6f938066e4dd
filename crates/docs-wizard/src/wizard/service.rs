use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::catalog::{DocumentCatalog, DocumentType};
use crate::checklist::{ChecklistArtifact, ChecklistError, ChecklistExporter};
use crate::config::WizardConfig;

use super::controller::{WizardController, WizardError};
use super::domain::{SessionId, SessionState, WizardEvent};
use super::reference::ReferenceGenerator;
use super::repository::{RepositoryError, SessionRepository};

/// A session resolved for the current request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenedSession {
    pub id: SessionId,
    pub state: SessionState,
    /// True when no usable session id came with the request and a new one
    /// was started.
    pub created: bool,
}

/// Service composing the session store, the page state machine, and the
/// checklist exporter.
pub struct WizardService<R, G> {
    repository: Arc<R>,
    references: Arc<G>,
    catalog: Arc<DocumentCatalog>,
    controller: WizardController,
    exporter: ChecklistExporter,
}

impl<R, G> WizardService<R, G>
where
    R: SessionRepository + 'static,
    G: ReferenceGenerator + 'static,
{
    pub fn new(repository: Arc<R>, references: Arc<G>, config: &WizardConfig) -> Self {
        Self {
            repository,
            references,
            catalog: Arc::new(DocumentCatalog::standard()),
            controller: WizardController::new(config.reset_policy),
            exporter: ChecklistExporter::new(config.checklist_dir.clone()),
        }
    }

    pub fn with_catalog(mut self, catalog: DocumentCatalog) -> Self {
        self.catalog = Arc::new(catalog);
        self
    }

    pub fn catalog(&self) -> &DocumentCatalog {
        &self.catalog
    }

    pub fn controller(&self) -> &WizardController {
        &self.controller
    }

    /// Look up the caller's session, starting a fresh one when the id is
    /// missing or no longer known.
    pub fn open(&self, id: Option<SessionId>) -> Result<OpenedSession, WizardServiceError> {
        if let Some(id) = id {
            if let Some(state) = self.repository.fetch(&id)? {
                return Ok(OpenedSession {
                    id,
                    state,
                    created: false,
                });
            }
            debug!(session = %id, "unknown session id, starting over");
        }

        let id = SessionId::generate();
        let state = SessionState::new();
        self.repository.insert(id.clone(), state.clone())?;
        info!(session = %id, "session started");

        Ok(OpenedSession {
            id,
            state,
            created: true,
        })
    }

    /// Apply a button press to a stored session and persist the result. On
    /// rejection the stored session is left as it was.
    pub fn dispatch(
        &self,
        id: &SessionId,
        event: WizardEvent,
    ) -> Result<SessionState, WizardServiceError> {
        let current = self
            .repository
            .fetch(id)?
            .ok_or(RepositoryError::NotFound)?;
        let action = event.name();

        if let WizardEvent::SubmitApplication(form) = &event {
            info!(
                session = %id,
                documents = current.selected.len(),
                uploads = form.uploads.len(),
                blank = form.is_blank(),
                "application form received"
            );
            for upload in &form.uploads {
                debug!(
                    session = %id,
                    document = %upload.document,
                    requirement = %upload.requirement,
                    file = %upload.file_name,
                    content_type = %upload.content_type,
                    size = upload.size,
                    "upload received"
                );
            }
        }

        let next = match self
            .controller
            .apply(&current, event, self.references.as_ref())
        {
            Ok(next) => next,
            Err(err) => {
                warn!(session = %id, page = current.page.number(), action, error = %err, "action rejected");
                return Err(err.into());
            }
        };

        self.repository.update(id, next.clone())?;
        info!(
            session = %id,
            action,
            from = current.page.number(),
            to = next.page.number(),
            submissions = next.submissions.len(),
            "wizard transition"
        );

        Ok(next)
    }

    pub fn snapshot(&self, id: &SessionId) -> Result<Option<SessionState>, WizardServiceError> {
        Ok(self.repository.fetch(id)?)
    }

    /// Render a fresh checklist for one document, overwriting the file on disk.
    pub fn checklist(
        &self,
        document: DocumentType,
    ) -> Result<ChecklistArtifact, WizardServiceError> {
        Ok(self.exporter.export(&self.catalog, document)?)
    }

    /// Checklists for every selected document, regenerated on each call.
    pub fn checklists(
        &self,
        state: &SessionState,
    ) -> Result<Vec<ChecklistArtifact>, WizardServiceError> {
        state
            .selected
            .iter()
            .map(|document| self.checklist(*document))
            .collect()
    }
}

/// Error raised by the wizard service.
#[derive(Debug, thiserror::Error)]
pub enum WizardServiceError {
    #[error(transparent)]
    Wizard(#[from] WizardError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Checklist(#[from] ChecklistError),
}
