//! Storage
//!
//! Byte fetching for the asset loader plus the small preference store.
//!
//! Fetches use a fire-and-poll pattern that fits macroquad's single-threaded
//! loop: `fetch` returns immediately with an `AsyncOp` that is polled once per
//! frame until the background read finishes.

pub mod async_ops;
pub mod http;
pub mod local;
#[cfg(test)]
pub mod memory;
pub mod prefs;

pub use async_ops::AsyncOp;
pub use http::HttpFetcher;
pub use local::LocalFetcher;
pub use prefs::Preferences;

use std::path::Path;
use std::rc::Rc;
use thiserror::Error;

/// Fetch error types
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("request for {url} failed with HTTP {code}")]
    Status { url: String, code: u16 },
    #[error("I/O error: {0}")]
    Io(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("fetch worker went away")]
    Disconnected,
}

impl From<std::io::Error> for FetchError {
    fn from(e: std::io::Error) -> Self {
        match e.kind() {
            std::io::ErrorKind::NotFound => FetchError::NotFound(e.to_string()),
            _ => FetchError::Io(e.to_string()),
        }
    }
}

/// Source of raw bytes, addressed by path or URL
pub trait Fetcher {
    /// Start fetching `location`. Never blocks.
    fn fetch(&self, location: &str) -> AsyncOp<Vec<u8>>;
}

/// Pick a fetcher for a manifest location: `http(s)://` goes over the
/// network, anything else is read from disk relative to `base_dir`.
pub fn fetcher_for(location: &str, base_dir: &Path) -> Rc<dyn Fetcher> {
    if is_remote(location) {
        Rc::new(HttpFetcher::new())
    } else {
        Rc::new(LocalFetcher::with_base_dir(base_dir))
    }
}

pub fn is_remote(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}
