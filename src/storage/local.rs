//! Local filesystem fetcher

use super::{AsyncOp, FetchError, Fetcher};
use std::path::PathBuf;

/// Reads files relative to a base directory on a worker thread
#[derive(Debug, Clone)]
pub struct LocalFetcher {
    /// Base directory for relative paths (usually current working directory)
    base_dir: PathBuf,
}

impl Default for LocalFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalFetcher {
    /// Rooted at the current directory
    pub fn new() -> Self {
        Self {
            base_dir: PathBuf::from("."),
        }
    }

    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    fn resolve(&self, path: &str) -> PathBuf {
        self.base_dir.join(path)
    }
}

impl Fetcher for LocalFetcher {
    fn fetch(&self, location: &str) -> AsyncOp<Vec<u8>> {
        let full_path = self.resolve(location);
        AsyncOp::spawn(move || std::fs::read(&full_path).map_err(FetchError::from))
    }
}
