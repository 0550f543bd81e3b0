mod cli;
mod data;
mod error;
mod fetch;
mod session;
mod view;

use std::io;
use std::process::ExitCode;

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;

use crate::cli::Cli;
use crate::cli::Commands;

fn main() -> ExitCode {
    init_tracing();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Fetch(args) => fetch::fetch(args),
        Commands::View(args) => view::view(args),
        Commands::Session(args) => session::session(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "popvis failed");
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

// Logs go to stderr so that stdout stays reserved for session output.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}
