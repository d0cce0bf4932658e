use crate::assess::{run_assess, run_rewards, AssessArgs, RewardsArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use wellbeing_engine::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Wellbeing Engine",
    about = "Score daily wellbeing inputs and track the reward ledger from the command line",
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
    /// Assess one submission from a JSON file and record its rewards
    Assess(AssessArgs),
    /// Print the current reward ledger
    Rewards(RewardsArgs),
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
        Command::Assess(args) => run_assess(args),
        Command::Rewards(args) => run_rewards(args),
    }
}
