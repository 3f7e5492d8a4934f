//! User preferences
//!
//! A flat string → string store. The renderer only needs `get`/`set`; where
//! the values live is up to the implementation.

use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the active palette
pub const PREF_PALETTE: &str = "palette";
/// "true" / "false"
pub const PREF_REPEAT: &str = "repeat";

#[derive(Debug, Error)]
pub enum PrefsError {
    #[error("could not read preferences: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not parse preferences: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("could not serialize preferences: {0}")]
    Serialize(#[from] ron::Error),
}

pub trait Preferences {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);

    fn get_or(&self, key: &str, fallback: &str) -> String {
        self.get(key).unwrap_or_else(|| fallback.to_string())
    }

    fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(|v| v.parse().ok())
    }
}

/// Volatile preferences, used when no config directory is available
#[derive(Debug, Clone, Default)]
pub struct MemoryPreferences {
    values: HashMap<String, String>,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Preferences for MemoryPreferences {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct PrefsFile {
    values: BTreeMap<String, String>,
}

/// Preferences persisted as RON, rewritten on every `set`
#[derive(Debug)]
pub struct FilePreferences {
    path: PathBuf,
    file: PrefsFile,
}

impl FilePreferences {
    /// `<config dir>/sccview/prefs.ron`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("sccview").join("prefs.ron"))
    }

    /// Open (or start) a preferences file. An unreadable file is logged and
    /// treated as empty so a corrupt file never blocks startup.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let file = match Self::read(&path) {
            Ok(file) => file,
            Err(PrefsError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("no preferences at {}, starting fresh", path.display());
                PrefsFile::default()
            }
            Err(e) => {
                warn!("{} ({})", e, path.display());
                PrefsFile::default()
            }
        };
        Self { path, file }
    }

    fn read(path: &Path) -> Result<PrefsFile, PrefsError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(ron::from_str(&contents)?)
    }

    fn write(&self) -> Result<(), PrefsError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let config = ron::ser::PrettyConfig::new().indentor("  ".to_string());
        let contents = ron::ser::to_string_pretty(&self.file, config)?;
        std::fs::write(&self.path, contents)?;
        Ok(())
    }
}

impl Preferences for FilePreferences {
    fn get(&self, key: &str) -> Option<String> {
        self.file.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.file.values.insert(key.to_string(), value.to_string());
        if let Err(e) = self.write() {
            warn!("{} ({})", e, self.path.display());
        }
    }
}

/// File-backed preferences when a config dir exists, memory otherwise
pub fn open_default() -> Box<dyn Preferences> {
    match FilePreferences::default_path() {
        Some(path) => Box::new(FilePreferences::open(path)),
        None => {
            warn!("no config directory; preferences will not be saved");
            Box::new(MemoryPreferences::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_memory_prefs() {
        let mut prefs = MemoryPreferences::new();
        assert_eq!(prefs.get_or(PREF_PALETTE, "default"), "default");
        prefs.set(PREF_PALETTE, "ocean");
        prefs.set(PREF_REPEAT, "false");
        assert_eq!(prefs.get(PREF_PALETTE).as_deref(), Some("ocean"));
        assert_eq!(prefs.get_bool(PREF_REPEAT), Some(false));
    }

    #[test]
    fn test_file_prefs_persist() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("prefs.ron");

        let mut prefs = FilePreferences::open(&path);
        assert_eq!(prefs.get(PREF_PALETTE), None);
        prefs.set(PREF_PALETTE, "ocean");

        let reopened = FilePreferences::open(&path);
        assert_eq!(reopened.get(PREF_PALETTE).as_deref(), Some("ocean"));
    }

    #[test]
    fn test_corrupt_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("prefs.ron");
        std::fs::write(&path, "this is not ron (").unwrap();

        let prefs = FilePreferences::open(&path);
        assert_eq!(prefs.get(PREF_PALETTE), None);
    }
}
