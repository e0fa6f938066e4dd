//! Server-rendered HTML for the four wizard pages.

use std::borrow::Cow;
use std::fmt::Write as _;

use crate::catalog::{DocumentCatalog, DocumentType, RequirementKind, ACCEPTED_UPLOAD_EXTENSIONS};
use crate::checklist::ChecklistArtifact;

use super::domain::{SessionState, WizardPage};
use super::form::{upload_field, ADDRESS_FIELD, BIRTHDATE_FIELD, DOCUMENTS_FIELD, NAME_FIELD};

pub const APP_TITLE: &str = "Philippine Government Document Processing";

const STYLESHEET: &str = r#"
body { font-family: 'Roboto', sans-serif; background-color: #f0f2f6; color: #333; max-width: 960px; margin: 0 auto; padding: 20px; }
.main-title { color: #1e88e5; text-align: center; font-size: 2.5em; font-weight: 700; margin-bottom: 30px; }
.section-title { color: #333; font-size: 1.8em; font-weight: 700; margin-top: 30px; margin-bottom: 20px; border-bottom: 2px solid #1e88e5; padding-bottom: 10px; }
.instruction-text { font-size: 1.1em; color: #555; background-color: #fff; padding: 20px; border-radius: 10px; box-shadow: 0 4px 6px rgba(0,0,0,0.1); }
.success-message { color: #4caf50; font-size: 1.3em; font-weight: 700; text-align: center; padding: 20px; background-color: #e8f5e9; border-radius: 10px; margin-bottom: 30px; }
.error-message { color: #f44336; font-size: 1.3em; font-weight: 700; text-align: center; padding: 20px; background-color: #ffebee; border-radius: 10px; margin-bottom: 30px; }
.download-button { display: inline-block; background-color: #4caf50; color: white; padding: 10px 20px; text-decoration: none; border-radius: 25px; font-weight: 500; margin-top: 10px; }
button { background-color: #1e88e5; color: white; font-weight: 500; padding: 10px 20px; border-radius: 25px; border: none; }
"#;

/// Inline message shown above the page body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Error(String),
}

/// Everything needed to draw the current page.
pub struct PageView<'a> {
    pub state: &'a SessionState,
    pub catalog: &'a DocumentCatalog,
    pub checklists: &'a [ChecklistArtifact],
    pub notice: Option<Notice>,
}

pub fn render_page(view: &PageView<'_>) -> String {
    let mut body = String::new();
    if let Some(Notice::Error(message)) = &view.notice {
        let _ = write!(body, "<p class=\"error-message\">{}</p>", escape(message));
    }

    match view.state.page {
        WizardPage::Selection => selection_page(&mut body),
        WizardPage::Information => information_page(&mut body, view.state, view.catalog),
        WizardPage::Confirmation => {
            confirmation_page(&mut body, view.state, view.catalog, view.checklists)
        }
        WizardPage::Status => status_page(&mut body, view.state),
    }

    layout(view.state.page, &body)
}

/// Bare page used when the request could not be served at all.
pub fn render_failure(message: &str) -> String {
    let body = format!("<p class=\"error-message\">{}</p>", escape(message));
    layout(WizardPage::Selection, &body)
}

fn layout(page: WizardPage, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title} · {page_title}</title>\n<style>{STYLESHEET}</style>\n</head>\n<body>\n\
         <h1 class=\"main-title\">{title}</h1>\n{body}\n</body>\n</html>\n",
        title = APP_TITLE,
        page_title = page.title(),
    )
}

fn section_title(out: &mut String, tag: &str, text: &str) {
    let _ = write!(out, "<{tag} class=\"section-title\">{}</{tag}>", escape(text));
}

fn button_form(out: &mut String, action: &str, label: &str) {
    let _ = write!(
        out,
        "<form method=\"post\" action=\"{action}\"><button type=\"submit\">{}</button></form>",
        escape(label)
    );
}

fn selection_page(out: &mut String) {
    section_title(out, "h2", WizardPage::Selection.title());
    let _ = write!(
        out,
        "<form method=\"post\" action=\"/wizard/next\" enctype=\"multipart/form-data\">\
         <label for=\"documents\">Choose the documents you need to process:</label>\
         <select id=\"documents\" name=\"{DOCUMENTS_FIELD}\" multiple size=\"{}\">",
        DocumentType::ALL.len()
    );
    for document in DocumentType::ALL {
        let _ = write!(
            out,
            "<option value=\"{}\">{}</option>",
            document.slug(),
            escape(document.label())
        );
    }
    out.push_str(
        "</select>\
         <div class=\"instruction-text\"><p><strong>Instructions:</strong></p><ol>\
         <li>Select one or more documents from the list above.</li>\
         <li>Click 'Next' to proceed to the information input step.</li>\
         <li>Make sure you have all necessary documents ready for upload.</li>\
         </ol></div>\
         <button type=\"submit\">Next</button></form>",
    );
}

fn information_page(out: &mut String, state: &SessionState, catalog: &DocumentCatalog) {
    section_title(out, "h2", WizardPage::Information.title());
    let _ = write!(
        out,
        "<form method=\"post\" action=\"/wizard/submit\" enctype=\"multipart/form-data\">\
         <label>Full Name <input type=\"text\" name=\"{NAME_FIELD}\"></label>\
         <label>Date of Birth <input type=\"date\" name=\"{BIRTHDATE_FIELD}\"></label>\
         <label>Complete Address <textarea name=\"{ADDRESS_FIELD}\"></textarea></label>"
    );

    section_title(out, "h2", "Document Requirements");
    let accept = ACCEPTED_UPLOAD_EXTENSIONS
        .iter()
        .map(|ext| format!(".{ext}"))
        .collect::<Vec<_>>()
        .join(",");

    for document in &state.selected {
        section_title(out, "h3", document.label());
        for (index, requirement) in catalog.requirements(*document).iter().enumerate() {
            match requirement.kind {
                RequirementKind::Upload => {
                    let _ = write!(
                        out,
                        "<label>{} <input type=\"file\" name=\"{}\" accept=\"{accept}\"></label>",
                        escape(requirement.label),
                        upload_field(*document, index),
                    );
                }
                RequirementKind::InformationNote => {
                    let _ = write!(
                        out,
                        "<p class=\"instruction-text\">{}</p>",
                        escape(requirement.label)
                    );
                }
            }
        }
    }

    out.push_str("<button type=\"submit\">Submit Application</button></form>");
}

fn confirmation_page(
    out: &mut String,
    state: &SessionState,
    catalog: &DocumentCatalog,
    checklists: &[ChecklistArtifact],
) {
    out.push_str(
        "<p class=\"success-message\">Your application has been successfully submitted!</p>",
    );
    section_title(out, "h2", WizardPage::Confirmation.title());
    for document in &state.selected {
        section_title(out, "h3", &format!("{document} Instructions:"));
        if let Some(guidance) = catalog.guidance(*document) {
            let _ = write!(out, "<p class=\"instruction-text\">{}</p>", escape(guidance));
        }
    }

    section_title(out, "h3", "Download Requirements Checklist");
    for artifact in checklists {
        let _ = write!(
            out,
            "<p><a href=\"{}\" download=\"{}\" class=\"download-button\">{}</a></p>",
            artifact.download_href(),
            escape(&artifact.file_name),
            escape(&artifact.link_label()),
        );
    }

    button_form(out, "/wizard/reset", "Start New Application");
    section_title(out, "h3", "Check Application Status");
    button_form(out, "/wizard/check-status", "Check Status");
}

fn status_page(out: &mut String, state: &SessionState) {
    section_title(out, "h2", WizardPage::Status.title());
    for (document, submission) in &state.submissions {
        section_title(out, "h3", document.label());
        let _ = write!(
            out,
            "<p class=\"instruction-text\">Reference Number: {}</p>\
             <p class=\"instruction-text\">Status: {}</p>",
            submission.reference_number,
            submission.status.label()
        );
    }

    button_form(out, "/wizard/refresh-status", "Refresh Status");
    button_form(out, "/wizard/reset", "Start New Application");
}

/// Escape text for element bodies and double-quoted attribute values.
pub(crate) fn escape(raw: &str) -> Cow<'_, str> {
    html_escape::encode_double_quoted_attribute(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogEntry, Requirement};
    use crate::wizard::domain::{ApplicationStatus, ReferenceNumber, Submission};

    fn render(state: &SessionState, catalog: &DocumentCatalog) -> String {
        render_page(&PageView {
            state,
            catalog,
            checklists: &[],
            notice: None,
        })
    }

    #[test]
    fn escape_handles_markup_and_quotes() {
        assert_eq!(
            escape("<b>\"LTO\" Driver's & co</b>"),
            "&lt;b&gt;&quot;LTO&quot; Driver's &amp; co&lt;/b&gt;"
        );
    }

    #[test]
    fn selection_page_lists_every_document() {
        let html = render(&SessionState::new(), &DocumentCatalog::standard());
        for document in DocumentType::ALL {
            assert!(html.contains(&format!("value=\"{}\"", document.slug())));
        }
        assert!(html.contains("action=\"/wizard/next\""));
    }

    #[test]
    fn information_page_only_offers_uploads_for_upload_requirements() {
        let catalog = DocumentCatalog::from_entries([CatalogEntry {
            document: DocumentType::NbiClearance,
            requirements: vec![
                Requirement::note("Bring two valid IDs on release day"),
                Requirement::upload("Upload ID Photo"),
            ],
            guidance: "Visit the NBI office.",
        }]);
        let mut state = SessionState::new();
        state.page = WizardPage::Information;
        state.selected.insert(DocumentType::NbiClearance);

        let html = render(&state, &catalog);

        assert_eq!(html.matches("type=\"file\"").count(), 1);
        assert!(html.contains("name=\"upload:nbi-clearance:1\""));
        assert!(html.contains("accept=\".pdf,.jpg,.png\""));
        assert!(html.contains("Bring two valid IDs on release day"));
    }

    #[test]
    fn status_page_shows_reference_and_label() {
        let mut state = SessionState::new();
        state.page = WizardPage::Status;
        state.submissions.insert(
            DocumentType::DfaPassport,
            Submission {
                reference_number: ReferenceNumber::new(314_159).expect("in range"),
                status: ApplicationStatus::ReadyForPickup,
            },
        );

        let html = render(&state, &DocumentCatalog::standard());

        assert!(html.contains("Reference Number: 314159"));
        assert!(html.contains("Status: Ready for Pickup"));
        assert!(html.contains("action=\"/wizard/refresh-status\""));
    }

    #[test]
    fn notices_render_above_the_page() {
        let html = render_page(&PageView {
            state: &SessionState::new(),
            catalog: &DocumentCatalog::standard(),
            checklists: &[],
            notice: Some(Notice::Error(
                "Please select at least one document to process.".to_string(),
            )),
        });
        assert!(html.contains(
            "<p class=\"error-message\">Please select at least one document to process.</p>"
        ));
    }
}
