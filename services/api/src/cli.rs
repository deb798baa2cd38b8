use crate::report::{run_poll_list, run_poll_results, PollListArgs, PollResultsArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use polls::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "polls",
    about = "Serve published polls over HTTP or inspect a poll fixture from the command line",
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
    /// Inspect polls loaded from a JSON fixture
    Polls {
        #[command(subcommand)]
        command: PollsCommand,
    },
}

#[derive(Subcommand, Debug)]
enum PollsCommand {
    /// Print the latest published polls
    List(PollListArgs),
    /// Print vote counts for one poll
    Results(PollResultsArgs),
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
        Command::Polls {
            command: PollsCommand::List(args),
        } => run_poll_list(args),
        Command::Polls {
            command: PollsCommand::Results(args),
        } => run_poll_results(args),
    }
}
