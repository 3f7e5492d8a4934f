//! In-memory fetcher for tests

use super::{AsyncOp, FetchError, Fetcher};
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct MemoryFetcher {
    files: HashMap<String, Vec<u8>>,
}

impl MemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, location: &str, bytes: impl Into<Vec<u8>>) -> Self {
        self.files.insert(location.to_string(), bytes.into());
        self
    }
}

impl Fetcher for MemoryFetcher {
    fn fetch(&self, location: &str) -> AsyncOp<Vec<u8>> {
        AsyncOp::ready(
            self.files
                .get(location)
                .cloned()
                .ok_or_else(|| FetchError::NotFound(location.to_string())),
        )
    }
}
