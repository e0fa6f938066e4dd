//! One-page requirement checklists rendered as PDF.
//!
//! Each export regenerates the file from the catalog and overwrites
//! `{document}_requirements.pdf` in the output directory. The write goes
//! through a temporary file in the same directory followed by a rename, so a
//! reader never sees a partially written checklist.

mod render;

pub use render::render_checklist;

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use base64::{engine::general_purpose, Engine as _};
use tracing::debug;

use crate::catalog::{DocumentCatalog, DocumentType};

/// Heading printed at the top of every checklist.
pub const CHECKLIST_TITLE: &str = "Document Requirements";

/// Prefix placed before each requirement line.
pub const BULLET: &str = "- ";

#[derive(Debug, thiserror::Error)]
pub enum ChecklistError {
    #[error("failed to render checklist: {0}")]
    Render(String),
    #[error("failed to write checklist to {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A rendered checklist ready to be offered as a download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecklistArtifact {
    pub document: DocumentType,
    pub file_name: String,
    pub path: PathBuf,
    pub bytes: Vec<u8>,
}

impl ChecklistArtifact {
    pub fn file_name_for(document: DocumentType) -> String {
        format!("{}_requirements.pdf", document.label())
    }

    /// Inline `data:` URL carrying the raw PDF bytes.
    pub fn download_href(&self) -> String {
        format!(
            "data:{};base64,{}",
            mime::APPLICATION_OCTET_STREAM,
            general_purpose::STANDARD.encode(&self.bytes)
        )
    }

    pub fn link_label(&self) -> String {
        format!("Download {} Requirements", self.document)
    }
}

#[derive(Debug, Clone)]
pub struct ChecklistExporter {
    output_dir: PathBuf,
}

impl ChecklistExporter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn export(
        &self,
        catalog: &DocumentCatalog,
        document: DocumentType,
    ) -> Result<ChecklistArtifact, ChecklistError> {
        let bytes = render_checklist(catalog.requirements(document))?;
        let file_name = ChecklistArtifact::file_name_for(document);
        let path = self.output_dir.join(&file_name);

        self.write_atomically(&path, &bytes)?;
        debug!(%document, path = %path.display(), size = bytes.len(), "checklist written");

        Ok(ChecklistArtifact {
            document,
            file_name,
            path,
            bytes,
        })
    }

    fn write_atomically(&self, path: &Path, bytes: &[u8]) -> Result<(), ChecklistError> {
        let io_error = |source| ChecklistError::Io {
            path: path.to_path_buf(),
            source,
        };

        fs::create_dir_all(&self.output_dir).map_err(io_error)?;
        let mut staged = tempfile::NamedTempFile::new_in(&self.output_dir).map_err(io_error)?;
        staged.write_all(bytes).map_err(io_error)?;
        staged.persist(path).map_err(|err| io_error(err.error))?;
        Ok(())
    }
}
