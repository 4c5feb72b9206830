use crate::report::{run_evaluate, run_fetch, EvaluateArgs, FetchArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use newsworthy::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "newsworthy",
    about = "Score news articles for insight-worthiness",
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
    /// Evaluate a single article and print the scoring breakdown
    Evaluate(EvaluateArgs),
    /// Fetch articles from the configured news source and evaluate them
    Fetch(FetchArgs),
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
        Command::Evaluate(args) => run_evaluate(args).await,
        Command::Fetch(args) => run_fetch(args).await,
    }
}
