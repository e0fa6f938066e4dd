//! The four-page application wizard: domain types, the page state machine,
//! the session store seam, and the HTTP surface built on top of them.

pub mod controller;
pub mod domain;
mod form;
pub mod reference;
pub mod repository;
pub mod router;
pub mod service;
pub mod status;
pub mod views;

#[cfg(test)]
mod tests;

pub use controller::{ResetPolicy, WizardController, WizardError};
pub use domain::{
    ApplicationForm, ApplicationStatus, ReferenceNumber, SessionId, SessionState, Submission,
    UploadedFile, WizardEvent, WizardPage,
};
pub use reference::{RandomReferenceGenerator, ReferenceGenerator};
pub use repository::{RepositoryError, SessionRepository};
pub use router::{session_from_headers, wizard_router, SessionView, SESSION_COOKIE};
pub use service::{OpenedSession, WizardService, WizardServiceError};
pub use status::refresh_statuses;
