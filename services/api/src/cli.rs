use crate::score::{run_classify, run_score, ClassifyArgs, ScoreArgs};
use crate::server;
use careervue::error::AppError;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "CareerVue Messages",
    about = "Serve the CareerVue contact-message API or score messages from the command line",
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
    /// Keyword sentiment tools for contact messages
    Sentiment {
        #[command(subcommand)]
        command: SentimentCommand,
    },
}

#[derive(Subcommand, Debug)]
enum SentimentCommand {
    /// Classify a single piece of text
    Classify(ClassifyArgs),
    /// Score every message in a CSV or JSON export and print aggregate statistics
    Score(ScoreArgs),
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
        Command::Sentiment {
            command: SentimentCommand::Classify(args),
        } => run_classify(args),
        Command::Sentiment {
            command: SentimentCommand::Score(args),
        } => run_score(args),
    }
}
