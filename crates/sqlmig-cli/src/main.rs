//! sqlmig CLI - apply, scaffold, and inspect SQL migrations

use clap::Parser;

mod cli;
mod commands;

use cli::Cli;
use commands::common::ExitCode;
use commands::{create, migrate, status, validate};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match &cli.command {
        cli::Commands::Migrate(args) => migrate::execute(args, &cli.global).await,
        cli::Commands::Create(args) => create::execute(args, &cli.global).await,
        cli::Commands::Status(args) => status::execute(args, &cli.global).await,
        cli::Commands::Validate(args) => validate::execute(args, &cli.global).await,
    };

    if let Err(err) = result {
        // Commands that already reported their failure return a bare ExitCode.
        let code = match err.downcast_ref::<ExitCode>() {
            Some(ExitCode(code)) => *code,
            None => {
                eprintln!("Error: {err:#}");
                1
            }
        };
        std::process::exit(code);
    }
}
