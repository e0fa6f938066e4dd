use crate::infra::{parse_document, InMemorySessionRepository};
use clap::Args;
use docs_wizard::catalog::{DocumentCatalog, DocumentType};
use docs_wizard::checklist::ChecklistExporter;
use docs_wizard::config::{AppConfig, WizardConfig};
use docs_wizard::error::AppError;
use docs_wizard::wizard::{
    ApplicationForm, RandomReferenceGenerator, SessionState, WizardEvent, WizardPage,
    WizardService,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct ChecklistArgs {
    /// Document type, by slug (`nbi-clearance`) or label (`NBI Clearance`)
    #[arg(long, value_parser = parse_document)]
    pub(crate) document: DocumentType,
    /// Directory for the generated PDF (defaults to APP_CHECKLIST_DIR)
    #[arg(long)]
    pub(crate) out_dir: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Documents to apply for; repeat the flag for several. Defaults to NBI Clearance.
    #[arg(long = "document", value_parser = parse_document)]
    pub(crate) documents: Vec<DocumentType>,
    /// Number of status refreshes to perform on the status page
    #[arg(long, default_value_t = 2)]
    pub(crate) refreshes: u8,
    /// Directory for generated checklists (defaults to APP_CHECKLIST_DIR)
    #[arg(long)]
    pub(crate) out_dir: Option<PathBuf>,
}

fn wizard_config(out_dir: Option<PathBuf>) -> Result<WizardConfig, AppError> {
    let mut config = AppConfig::load()?.wizard;
    if let Some(dir) = out_dir {
        if dir.is_file() {
            return Err(AppError::Usage(format!(
                "--out-dir {} is a file, expected a directory",
                dir.display()
            )));
        }
        config.checklist_dir = dir;
    }
    Ok(config)
}

pub(crate) fn run_checklist(args: ChecklistArgs) -> Result<(), AppError> {
    let ChecklistArgs { document, out_dir } = args;
    let config = wizard_config(out_dir)?;

    let exporter = ChecklistExporter::new(config.checklist_dir);
    let artifact = exporter.export(&DocumentCatalog::standard(), document)?;
    println!(
        "{} checklist written to {} ({} bytes)",
        artifact.document,
        artifact.path.display(),
        artifact.bytes.len()
    );
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        mut documents,
        refreshes,
        out_dir,
    } = args;
    if documents.is_empty() {
        documents.push(DocumentType::NbiClearance);
    }

    let config = wizard_config(out_dir)?;
    let service = WizardService::new(
        Arc::new(InMemorySessionRepository::default()),
        Arc::new(RandomReferenceGenerator),
        &config,
    );

    println!("Government document wizard demo");
    let session = service.open(None)?;
    render_page(&service, &session.state)?;

    let mut steps = vec![
        WizardEvent::Next {
            selection: documents,
        },
        WizardEvent::SubmitApplication(ApplicationForm::default()),
        WizardEvent::CheckStatus,
    ];
    steps.extend((0..refreshes).map(|_| WizardEvent::RefreshStatus));
    steps.push(WizardEvent::StartNewApplication);

    for event in steps {
        println!("\n> {}", event.name());
        let state = service.dispatch(&session.id, event)?;
        render_page(&service, &state)?;
    }

    Ok(())
}

fn render_page(
    service: &WizardService<InMemorySessionRepository, RandomReferenceGenerator>,
    state: &SessionState,
) -> Result<(), AppError> {
    let catalog = service.catalog();
    println!("Page {}: {}", state.page.number(), state.page.title());

    match state.page {
        WizardPage::Selection => {
            for document in DocumentType::ALL {
                let mark = if state.selected.contains(&document) { "x" } else { " " };
                println!("  [{mark}] {document}");
            }
        }
        WizardPage::Information => {
            for document in &state.selected {
                println!("  {document}");
                for requirement in catalog.requirements(*document) {
                    println!("    - {}", requirement.label);
                }
            }
        }
        WizardPage::Confirmation => {
            println!("  Your application has been successfully submitted!");
            for artifact in service.checklists(state)? {
                if let Some(guidance) = catalog.guidance(artifact.document) {
                    println!("  {}: {}", artifact.document, guidance);
                }
                println!("    checklist: {}", artifact.path.display());
            }
        }
        WizardPage::Status => {
            for (document, submission) in &state.submissions {
                println!(
                    "  {document} | Reference Number: {} | Status: {}",
                    submission.reference_number,
                    submission.status.label()
                );
            }
        }
    }
    Ok(())
}
