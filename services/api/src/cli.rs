use crate::demo::{run_checklist, run_demo, ChecklistArgs, DemoArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use docs_wizard::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Government Document Wizard",
    about = "Serve the document application wizard or exercise it from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Export the requirements checklist PDF for one document type
    Checklist(ChecklistArgs),
    /// Walk a scripted application through every wizard page
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Checklist(args) => run_checklist(args),
        Command::Demo(args) => run_demo(args),
    }
}
