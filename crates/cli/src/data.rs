use std::io;
use std::sync::Arc;

use popvis_data::Dataset;
use popvis_data::Views;
use popvis_data::error::DataError;
use popvis_data::error::DataLoadError;
use reqwest::blocking::Response;
use tracing::info;

use crate::cli::Source;
use crate::error::CliError;
use crate::fetch::client::DatasetClient;
use crate::fetch::error::FetchError;

/// Loads and validates the dataset once; the views are then shared read-only.
pub(crate) fn load_views(source: &Source) -> Result<Arc<Views>, CliError> {
    let dataset = match (&source.data, &source.url) {
        (Some(path), _) => Dataset::open(path)?,
        (None, Some(url)) => {
            info!(%url, "loading the population dataset");
            let response = open_url(url).map_err(DataError::from)?;
            Dataset::load(response)?
        }
        (None, None) => {
            return Err(CliError::Path(String::from(
                "either a dataset file or a dataset URL is required",
            )));
        }
    };

    let views = dataset.derive_views().map_err(DataError::from)?;

    Ok(Arc::new(views))
}

/// An unreachable dataset URL is a load failure like an unreadable file.
fn open_url(url: &str) -> Result<Response, DataLoadError> {
    DatasetClient::new()
        .and_then(|client| client.open(url))
        .map_err(unreachable_source)
}

fn unreachable_source(error: FetchError) -> DataLoadError {
    DataLoadError::Io(Arc::new(io::Error::other(error)))
}
