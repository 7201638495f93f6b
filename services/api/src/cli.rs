use crate::commands::{run_ami, run_ask, run_search, AmiArgs, AskArgs, SearchArgs};
use crate::server;
use casa_match::error::AppError;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "CASA Match",
    about = "Find affordable NYC housing lotteries that fit your household",
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
    /// Search listings by borough, income, and rent ceiling
    Search(SearchArgs),
    /// Show area median income bands for a household
    Ami(AmiArgs),
    /// Ask the housing assistant a question
    Ask(AskArgs),
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
        Command::Search(args) => run_search(args).await,
        Command::Ami(args) => {
            run_ami(args);
            Ok(())
        }
        Command::Ask(args) => run_ask(args).await,
    }
}
