use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

/// Government documents the wizard can process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DocumentType {
    LtoDriversLicense,
    DfaPassport,
    NbiClearance,
    PsaBirthCertificate,
}

impl DocumentType {
    pub const ALL: [DocumentType; 4] = [
        DocumentType::LtoDriversLicense,
        DocumentType::DfaPassport,
        DocumentType::NbiClearance,
        DocumentType::PsaBirthCertificate,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            DocumentType::LtoDriversLicense => "LTO Driver's License",
            DocumentType::DfaPassport => "DFA Passport",
            DocumentType::NbiClearance => "NBI Clearance",
            DocumentType::PsaBirthCertificate => "PSA Birth Certificate",
        }
    }

    /// URL-safe identifier used in form values and routes.
    pub const fn slug(self) -> &'static str {
        match self {
            DocumentType::LtoDriversLicense => "lto-drivers-license",
            DocumentType::DfaPassport => "dfa-passport",
            DocumentType::NbiClearance => "nbi-clearance",
            DocumentType::PsaBirthCertificate => "psa-birth-certificate",
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for DocumentType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown document type '{0}'")]
pub struct UnknownDocumentType(pub String);

impl FromStr for DocumentType {
    type Err = UnknownDocumentType;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        DocumentType::ALL
            .into_iter()
            .find(|document| {
                document.slug().eq_ignore_ascii_case(trimmed)
                    || document.label().eq_ignore_ascii_case(trimmed)
            })
            .ok_or_else(|| UnknownDocumentType(raw.to_string()))
    }
}
