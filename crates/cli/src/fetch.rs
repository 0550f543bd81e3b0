pub(crate) mod client;
pub(crate) mod error;

use tracing::info;

use crate::cli::FetchArgs;
use crate::cli::PathExt;
use crate::error::CliError;
use crate::fetch::client::DatasetClient;

const DATA_FILE_NAME: &str = "population.csv";

pub(crate) fn fetch(args: FetchArgs) -> Result<(), CliError> {
    let output_path = args.output_path.or_current_dir()?;
    let path = output_path.join(DATA_FILE_NAME);

    info!(url = %args.url, path = %path.display(), "downloading the population dataset");

    let client = DatasetClient::new()?;
    let bytes = client.download(&args.url, &path)?;

    info!(bytes, "population dataset downloaded");
    println!("{}", path.display());

    Ok(())
}
