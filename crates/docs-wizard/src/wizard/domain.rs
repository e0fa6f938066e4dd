use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

use crate::catalog::DocumentType;

/// Identifier wrapper for a browser session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The four screens of the wizard, in the only order they can be visited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardPage {
    Selection,
    Information,
    Confirmation,
    Status,
}

impl WizardPage {
    pub const fn number(self) -> u8 {
        match self {
            WizardPage::Selection => 1,
            WizardPage::Information => 2,
            WizardPage::Confirmation => 3,
            WizardPage::Status => 4,
        }
    }

    pub const fn title(self) -> &'static str {
        match self {
            WizardPage::Selection => "Select Your Documents",
            WizardPage::Information => "Personal Information",
            WizardPage::Confirmation => "Next Steps",
            WizardPage::Status => "Application Status",
        }
    }
}

/// Mock processing stages, advanced only by a manual refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Submitted,
    Processing,
    ReadyForPickup,
}

impl ApplicationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Submitted => "Submitted",
            ApplicationStatus::Processing => "Processing",
            ApplicationStatus::ReadyForPickup => "Ready for Pickup",
        }
    }

    /// Next stage in the progression. `ReadyForPickup` is terminal.
    pub const fn advance(self) -> Self {
        match self {
            ApplicationStatus::Submitted => ApplicationStatus::Processing,
            ApplicationStatus::Processing | ApplicationStatus::ReadyForPickup => {
                ApplicationStatus::ReadyForPickup
            }
        }
    }
}

/// Six-digit reference handed out on submission. Not guaranteed unique.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ReferenceNumber(u32);

impl ReferenceNumber {
    pub const MIN: u32 = 100_000;
    pub const MAX: u32 = 999_999;

    pub fn new(value: u32) -> Option<Self> {
        (Self::MIN..=Self::MAX)
            .contains(&value)
            .then_some(Self(value))
    }

    pub(crate) fn clamped(value: u32) -> Self {
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    pub const fn value(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ReferenceNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Submission {
    pub reference_number: ReferenceNumber,
    pub status: ApplicationStatus,
}

/// Everything the wizard remembers between requests for one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionState {
    pub page: WizardPage,
    pub selected: BTreeSet<DocumentType>,
    pub submissions: BTreeMap<DocumentType, Submission>,
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            page: WizardPage::Selection,
            selected: BTreeSet::new(),
            submissions: BTreeMap::new(),
        }
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

/// Metadata for a file received on the information page. Contents are
/// never kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub document: DocumentType,
    pub requirement: String,
    pub file_name: String,
    pub content_type: String,
    pub size: usize,
}

/// Personal details and uploads posted with "Submit Application". Nothing
/// here is validated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplicationForm {
    pub full_name: String,
    pub address: String,
    pub birthdate: Option<NaiveDate>,
    pub uploads: Vec<UploadedFile>,
}

impl ApplicationForm {
    pub fn is_blank(&self) -> bool {
        self.full_name.trim().is_empty()
            && self.address.trim().is_empty()
            && self.birthdate.is_none()
            && self.uploads.is_empty()
    }
}

/// Button presses the wizard understands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardEvent {
    Next { selection: Vec<DocumentType> },
    SubmitApplication(ApplicationForm),
    CheckStatus,
    RefreshStatus,
    StartNewApplication,
}

impl WizardEvent {
    pub const fn name(&self) -> &'static str {
        match self {
            WizardEvent::Next { .. } => "next",
            WizardEvent::SubmitApplication(_) => "submit_application",
            WizardEvent::CheckStatus => "check_status",
            WizardEvent::RefreshStatus => "refresh_status",
            WizardEvent::StartNewApplication => "start_new_application",
        }
    }
}
