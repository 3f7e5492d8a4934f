//! HTTP fetcher
//!
//! Uses ureq's blocking client on a worker thread, the same fire-and-poll
//! shape as the local fetcher.

use super::{AsyncOp, FetchError, Fetcher};
use std::io::Read;

/// Largest single asset we are willing to buffer (16 MB)
const MAX_BODY_BYTES: u64 = 16 * 1024 * 1024;

#[derive(Debug, Clone, Default)]
pub struct HttpFetcher;

impl HttpFetcher {
    pub fn new() -> Self {
        Self
    }

    fn get(url: &str) -> Result<Vec<u8>, FetchError> {
        let response = ureq::get(url).call().map_err(|e| convert_error(url, e))?;

        // Anything but a plain 200 is treated as a failed asset
        if response.status() != 200 {
            return Err(FetchError::Status {
                url: url.to_string(),
                code: response.status(),
            });
        }

        let mut body = Vec::new();
        response
            .into_reader()
            .take(MAX_BODY_BYTES)
            .read_to_end(&mut body)
            .map_err(|e| FetchError::Network(e.to_string()))?;
        Ok(body)
    }
}

fn convert_error(url: &str, e: ureq::Error) -> FetchError {
    match e {
        ureq::Error::Status(404, _) => FetchError::NotFound(url.to_string()),
        ureq::Error::Status(code, _) => FetchError::Status {
            url: url.to_string(),
            code,
        },
        other => FetchError::Network(other.to_string()),
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, location: &str) -> AsyncOp<Vec<u8>> {
        let url = location.to_string();
        AsyncOp::spawn(move || Self::get(&url))
    }
}
