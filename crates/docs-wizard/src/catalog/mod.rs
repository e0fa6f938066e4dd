//! Static catalog of supported government documents, their upload
//! requirements, and the follow-up guidance shown once an application is in.

mod document;

pub use document::{DocumentType, UnknownDocumentType};

use std::collections::BTreeMap;

use serde::Serialize;

/// Fields every applicant is asked for regardless of the documents selected.
pub const COMMON_PERSONAL_FIELDS: [&str; 3] = ["Name", "Address", "Birthdate"];

/// File extensions offered by upload widgets.
pub const ACCEPTED_UPLOAD_EXTENSIONS: [&str; 3] = ["pdf", "jpg", "png"];

/// Distinguishes requirements that need a file from ones that are read-only notes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RequirementKind {
    Upload,
    InformationNote,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Requirement {
    pub kind: RequirementKind,
    pub label: &'static str,
}

impl Requirement {
    pub const fn upload(label: &'static str) -> Self {
        Self {
            kind: RequirementKind::Upload,
            label,
        }
    }

    pub const fn note(label: &'static str) -> Self {
        Self {
            kind: RequirementKind::InformationNote,
            label,
        }
    }

    pub fn needs_upload(&self) -> bool {
        self.kind == RequirementKind::Upload
    }
}

/// Requirements and guidance for a single document type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    pub document: DocumentType,
    pub requirements: Vec<Requirement>,
    pub guidance: &'static str,
}

#[derive(Debug, Clone)]
pub struct DocumentCatalog {
    entries: BTreeMap<DocumentType, CatalogEntry>,
}

impl DocumentCatalog {
    pub fn standard() -> Self {
        Self::from_entries(standard_entries())
    }

    /// Build a catalog from explicit entries. Later entries replace earlier
    /// ones for the same document type.
    pub fn from_entries(entries: impl IntoIterator<Item = CatalogEntry>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|entry| (entry.document, entry))
                .collect(),
        }
    }

    pub fn entry(&self, document: DocumentType) -> Option<&CatalogEntry> {
        self.entries.get(&document)
    }

    pub fn requirements(&self, document: DocumentType) -> &[Requirement] {
        self.entries
            .get(&document)
            .map(|entry| entry.requirements.as_slice())
            .unwrap_or(&[])
    }

    pub fn uploads(&self, document: DocumentType) -> impl Iterator<Item = (usize, &Requirement)> {
        self.requirements(document)
            .iter()
            .enumerate()
            .filter(|(_, requirement)| requirement.needs_upload())
    }

    pub fn guidance(&self, document: DocumentType) -> Option<&'static str> {
        self.entries.get(&document).map(|entry| entry.guidance)
    }

    pub fn entries(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.values()
    }
}

impl Default for DocumentCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

fn standard_entries() -> Vec<CatalogEntry> {
    vec![
        CatalogEntry {
            document: DocumentType::LtoDriversLicense,
            requirements: vec![
                Requirement::upload("Upload Birth Certificate"),
                Requirement::upload("Upload ID Photo"),
            ],
            guidance: "Please visit your nearest LTO office with your completed form and uploaded documents.",
        },
        CatalogEntry {
            document: DocumentType::DfaPassport,
            requirements: vec![
                Requirement::upload("Upload Birth Certificate"),
                Requirement::upload("Upload Passport Photo"),
                Requirement::upload("Upload Old Passport (if renewing)"),
            ],
            guidance: "Schedule an appointment at your preferred DFA office and bring your completed form and uploaded documents.",
        },
        CatalogEntry {
            document: DocumentType::NbiClearance,
            requirements: vec![
                Requirement::upload("Upload Birth Certificate"),
                Requirement::upload("Upload ID Photo"),
            ],
            guidance: "Visit the nearest NBI office with your completed form and uploaded documents for processing.",
        },
        CatalogEntry {
            document: DocumentType::PsaBirthCertificate,
            requirements: vec![Requirement::upload("Upload ID Photo")],
            guidance: "Submit your completed form and uploaded documents to the nearest PSA office or through their online portal.",
        },
    ]
}
