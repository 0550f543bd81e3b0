use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::Client;
use reqwest::blocking::Response;

use crate::fetch::error::FetchError;
use crate::fetch::error::Result;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Downloads the population dataset over HTTP.
pub(crate) struct DatasetClient {
    client: Client,
}

impl DatasetClient {
    pub fn new() -> Result<Self> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self { client })
    }

    /// Sends a GET request and returns the response whose body is the dataset.
    pub fn open(&self, url: &str) -> Result<Response> {
        let response = self.client.get(url).send()?;

        match response.status() {
            StatusCode::OK => Ok(response),
            status_code => {
                let message = response.text()?;
                let error = FetchError::Response {
                    status_code,
                    message,
                };
                Err(error)
            }
        }
    }

    pub fn download(&self, url: &str, path: &Path) -> Result<u64> {
        let mut response = self.open(url)?;

        let mut writer = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;

        let bytes = io::copy(&mut response, &mut writer)?;
        Ok(bytes)
    }
}
