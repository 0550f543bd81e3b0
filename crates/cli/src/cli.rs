use std::env;
use std::path::PathBuf;

use clap::Args;
use clap::Parser;
use clap::Subcommand;

use crate::error::CliError;

/// The location of the published population dataset.
pub(crate) const DATA_URL: &str = "https://raw.githubusercontent.com/CHEAH80/MCM7183_Population_Malaysia/main/assets/population_malaysia_2024.csv";

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Download the population dataset.
    Fetch(FetchArgs),

    /// Generate the dashboard pages from the population dataset.
    View(ViewArgs),

    /// Run an interactive dashboard session over stdin and stdout.
    ///
    /// Each input line is an event, either `route <key>` or
    /// `control <id> <value>`; each output line is the JSON outcome.
    Session(SessionArgs),
}

#[derive(Args)]
pub(crate) struct FetchArgs {
    /// Specify the URL of the population dataset.
    #[arg(short, long, env = "POPVIS_DATA_URL", default_value = DATA_URL)]
    pub(crate) url: String,

    /// Specify the directory where the dataset will be stored.
    /// If the output path is not specified then the current working
    /// directory is used.
    #[arg(short, long, value_parser(parse_dir))]
    pub(crate) output_path: Option<PathBuf>,
}

#[derive(Args)]
pub(crate) struct ViewArgs {
    #[command(flatten)]
    pub(crate) source: Source,

    /// Specify the path where the generated dashboard will be created.
    /// If the output path is not specified then the current working
    /// directory is used.
    #[arg(short, long, value_parser(parse_dir))]
    pub(crate) output_path: Option<PathBuf>,
}

#[derive(Args)]
pub(crate) struct SessionArgs {
    #[command(flatten)]
    pub(crate) source: Source,
}

/// Where the population dataset is read from.
#[derive(Args)]
#[group(required = true, multiple = false)]
pub(crate) struct Source {
    /// Specify the path of a local copy of the dataset.
    #[arg(short, long, env = "POPVIS_DATA", value_parser(parse_file))]
    pub(crate) data: Option<PathBuf>,

    /// Specify the URL to download the dataset from.
    #[arg(short, long)]
    pub(crate) url: Option<String>,
}

fn parse_dir(path: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(path);

    if !path.exists() {
        return Err(format!("The `{}` path does not exist.", path.display()));
    }

    if !path.is_dir() {
        return Err(format!(
            "The `{}` path must point to a directory.",
            path.display()
        ));
    }

    Ok(path)
}

fn parse_file(path: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(path);

    if !path.is_file() {
        return Err(format!(
            "The `{}` path must point to an existing file.",
            path.display()
        ));
    }

    Ok(path)
}

pub(crate) trait PathExt {
    fn or_current_dir(self) -> Result<PathBuf, CliError>;
}

impl PathExt for Option<PathBuf> {
    fn or_current_dir(self) -> Result<PathBuf, CliError> {
        if let Some(path) = self {
            Ok(path)
        } else {
            env::current_dir().map_err(|e| CliError::Path(e.to_string()))
        }
    }
}
