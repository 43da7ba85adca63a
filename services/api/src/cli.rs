use crate::demo::{run_demo, run_roster_audit, DemoArgs, RosterAuditArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use nil_deals::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "NIL Deal Compliance Service",
    about = "Run and demonstrate the NIL deal compliance service from the command line",
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
    /// Validate athlete roster exports before bulk enrollment
    Roster {
        #[command(subcommand)]
        command: RosterCommand,
    },
    /// Run an end-to-end CLI demo covering the review and appeal workflows
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum RosterCommand {
    /// Validate a roster CSV and print the report
    Audit(RosterAuditArgs),
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
        Command::Roster {
            command: RosterCommand::Audit(args),
        } => run_roster_audit(args),
        Command::Demo(args) => run_demo(args),
    }
}
