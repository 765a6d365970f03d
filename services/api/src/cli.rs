use crate::render::{run_report, run_score, ReportArgs, ScoreArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use finscore::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Financial Health Scoring",
    about = "Score household finances and analyse spending datasets from the command line",
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
    /// Score a single family record and print its insights
    Score(ScoreArgs),
    /// Analyse a spending dataset and optionally export the scored table
    Report(ReportArgs),
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
        Command::Score(args) => run_score(args),
        Command::Report(args) => run_report(args),
    }
}
