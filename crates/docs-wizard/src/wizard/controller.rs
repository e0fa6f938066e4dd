use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use super::domain::{ApplicationStatus, SessionState, Submission, WizardEvent, WizardPage};
use super::reference::ReferenceGenerator;
use super::status::refresh_statuses;

/// What "Start New Application" does to the data of the previous run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResetPolicy {
    /// Only the page counter goes back to the selection screen; the previous
    /// selection and submissions stay visible on the status page.
    #[default]
    Retain,
    /// Selection and submissions are discarded along with the page.
    Clear,
}

impl ResetPolicy {
    pub const fn label(self) -> &'static str {
        match self {
            ResetPolicy::Retain => "retain",
            ResetPolicy::Clear => "clear",
        }
    }
}

impl fmt::Display for ResetPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ResetPolicy {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "retain" | "keep" => Ok(ResetPolicy::Retain),
            "clear" | "reset" => Ok(ResetPolicy::Clear),
            other => Err(other.to_string()),
        }
    }
}

/// Rejections raised by the wizard state machine. The session is left
/// untouched whenever one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WizardError {
    #[error("Please select at least one document to process.")]
    EmptySelection,
    #[error("'{action}' is not available on page {}", .page.number())]
    UnexpectedAction {
        page: WizardPage,
        action: &'static str,
    },
}

/// The four-page state machine. Every transition takes the current session
/// by reference and hands back the next one.
#[derive(Debug, Clone, Copy, Default)]
pub struct WizardController {
    reset_policy: ResetPolicy,
}

impl WizardController {
    pub fn new(reset_policy: ResetPolicy) -> Self {
        Self { reset_policy }
    }

    pub fn reset_policy(&self) -> ResetPolicy {
        self.reset_policy
    }

    pub fn apply<G>(
        &self,
        state: &SessionState,
        event: WizardEvent,
        references: &G,
    ) -> Result<SessionState, WizardError>
    where
        G: ReferenceGenerator + ?Sized,
    {
        let action = event.name();
        match (state.page, event) {
            (WizardPage::Selection, WizardEvent::Next { selection }) => {
                if selection.is_empty() {
                    return Err(WizardError::EmptySelection);
                }
                Ok(SessionState {
                    page: WizardPage::Information,
                    selected: selection.into_iter().collect(),
                    submissions: state.submissions.clone(),
                })
            }
            (WizardPage::Information, WizardEvent::SubmitApplication(_form)) => {
                let mut submissions = state.submissions.clone();
                for document in &state.selected {
                    submissions.insert(
                        *document,
                        Submission {
                            reference_number: references.next_reference(),
                            status: ApplicationStatus::Submitted,
                        },
                    );
                }
                Ok(SessionState {
                    page: WizardPage::Confirmation,
                    selected: state.selected.clone(),
                    submissions,
                })
            }
            (WizardPage::Confirmation, WizardEvent::CheckStatus) => Ok(SessionState {
                page: WizardPage::Status,
                ..state.clone()
            }),
            (WizardPage::Status, WizardEvent::RefreshStatus) => Ok(SessionState {
                submissions: refresh_statuses(&state.submissions),
                ..state.clone()
            }),
            (
                WizardPage::Confirmation | WizardPage::Status,
                WizardEvent::StartNewApplication,
            ) => Ok(self.reset(state)),
            (page, _) => Err(WizardError::UnexpectedAction { page, action }),
        }
    }

    fn reset(&self, state: &SessionState) -> SessionState {
        match self.reset_policy {
            ResetPolicy::Retain => SessionState {
                page: WizardPage::Selection,
                ..state.clone()
            },
            ResetPolicy::Clear => SessionState::new(),
        }
    }
}
