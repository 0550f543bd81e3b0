use std::error::Error;
use std::fmt::Display;
use std::io;

use popvis_data::error::DataError;
use popvis_vis::error::VisError;

use crate::fetch::error::FetchError;

#[derive(Debug)]
pub(crate) enum CliError {
    Fetch(FetchError),
    Data(DataError),
    Vis(VisError),
    Io(io::Error),
    Json(serde_json::Error),
    Path(String),
}

impl From<FetchError> for CliError {
    fn from(error: FetchError) -> Self {
        CliError::Fetch(error)
    }
}

impl From<DataError> for CliError {
    fn from(error: DataError) -> Self {
        CliError::Data(error)
    }
}

impl From<VisError> for CliError {
    fn from(error: VisError) -> Self {
        CliError::Vis(error)
    }
}

impl From<io::Error> for CliError {
    fn from(error: io::Error) -> Self {
        CliError::Io(error)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(error: serde_json::Error) -> Self {
        CliError::Json(error)
    }
}

impl Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let cli_error = "CLI error:";

        match self {
            CliError::Fetch(error) => write!(f, "{cli_error} {error}"),
            CliError::Data(error) => write!(f, "{cli_error} {error}"),
            CliError::Vis(error) => write!(f, "{cli_error} {error}"),
            CliError::Io(error) => write!(f, "{cli_error} I/O error: {error}"),
            CliError::Json(error) => write!(f, "{cli_error} JSON error: {error}"),
            CliError::Path(error) => write!(f, "{cli_error} {error}"),
        }
    }
}

impl Error for CliError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            CliError::Fetch(error) => Some(error),
            CliError::Data(error) => Some(error),
            CliError::Vis(error) => Some(error),
            CliError::Io(error) => Some(error),
            CliError::Json(error) => Some(error),
            CliError::Path(_) => None,
        }
    }
}
