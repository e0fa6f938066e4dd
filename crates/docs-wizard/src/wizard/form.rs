//! Multipart parsing for the selection and information pages.

use axum::extract::multipart::{Multipart, MultipartError};
use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::catalog::{DocumentCatalog, DocumentType};

use super::domain::{ApplicationForm, UploadedFile};

pub(crate) const DOCUMENTS_FIELD: &str = "documents";
pub(crate) const NAME_FIELD: &str = "full_name";
pub(crate) const BIRTHDATE_FIELD: &str = "birthdate";
pub(crate) const ADDRESS_FIELD: &str = "address";
const UPLOAD_PREFIX: &str = "upload:";

/// Form field name for the file input of one requirement.
pub(crate) fn upload_field(document: DocumentType, index: usize) -> String {
    format!("{UPLOAD_PREFIX}{}:{index}", document.slug())
}

fn parse_upload_field(name: &str) -> Option<(DocumentType, usize)> {
    let rest = name.strip_prefix(UPLOAD_PREFIX)?;
    let (slug, index) = rest.rsplit_once(':')?;
    let document = slug.parse().ok()?;
    let index = index.parse().ok()?;
    Some((document, index))
}

/// Collect the `documents` values posted by the selection page. Values that
/// do not name a known document are skipped.
pub(crate) async fn read_selection(
    mut multipart: Multipart,
) -> Result<Vec<DocumentType>, MultipartError> {
    let mut selection = Vec::new();
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(DOCUMENTS_FIELD) {
            continue;
        }
        let value = field.text().await?;
        match value.parse::<DocumentType>() {
            Ok(document) => selection.push(document),
            Err(err) => warn!(error = %err, "ignoring unknown document selection"),
        }
    }
    Ok(selection)
}

/// Collect personal details and upload metadata from the information page.
/// File contents are streamed to measure them and never buffered whole.
pub(crate) async fn read_application(
    mut multipart: Multipart,
    catalog: &DocumentCatalog,
) -> Result<ApplicationForm, MultipartError> {
    let mut form = ApplicationForm::default();

    while let Some(mut field) = multipart.next_field().await? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        match name.as_str() {
            NAME_FIELD => form.full_name = field.text().await?,
            ADDRESS_FIELD => form.address = field.text().await?,
            BIRTHDATE_FIELD => form.birthdate = parse_birthdate(&field.text().await?),
            other => {
                let Some((document, index)) = parse_upload_field(other) else {
                    debug!(field = other, "ignoring unexpected form field");
                    continue;
                };
                let file_name = field.file_name().unwrap_or_default().to_string();
                let declared_type = field.content_type().map(str::to_string);
                let mut size = 0;
                while let Some(chunk) = field.chunk().await? {
                    size += chunk.len();
                }
                if file_name.is_empty() && size == 0 {
                    continue;
                }

                let requirement = catalog
                    .requirements(document)
                    .get(index)
                    .map(|requirement| requirement.label.to_string())
                    .unwrap_or_else(|| format!("requirement #{index}"));
                let content_type = declared_type.unwrap_or_else(|| {
                    mime_guess::from_path(&file_name)
                        .first_or_octet_stream()
                        .to_string()
                });

                form.uploads.push(UploadedFile {
                    document,
                    requirement,
                    file_name,
                    content_type,
                    size,
                });
            }
        }
    }

    Ok(form)
}

/// Birthdates arrive from a date input as `YYYY-MM-DD`. Anything else is
/// treated as not provided.
pub(crate) fn parse_birthdate(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    match NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(err) => {
            debug!(value = trimmed, error = %err, "birthdate not understood, leaving blank");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_field_names_round_trip() {
        let name = upload_field(DocumentType::DfaPassport, 2);
        assert_eq!(name, "upload:dfa-passport:2");
        assert_eq!(
            parse_upload_field(&name),
            Some((DocumentType::DfaPassport, 2))
        );
        assert_eq!(parse_upload_field("upload:unknown:0"), None);
        assert_eq!(parse_upload_field("full_name"), None);
    }

    #[test]
    fn birthdate_parsing_is_lenient() {
        assert_eq!(
            parse_birthdate("1990-06-12"),
            NaiveDate::from_ymd_opt(1990, 6, 12)
        );
        assert_eq!(parse_birthdate(""), None);
        assert_eq!(parse_birthdate("12/06/1990"), None);
    }
}
