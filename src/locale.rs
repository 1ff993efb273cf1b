//! Default locale: process-wide setting and durable local storage

use anyhow::{Context, Result};
use arc_swap::ArcSwapOption;
use directories::ProjectDirs;
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

/// Storage key the default locale is persisted under
pub const DEFAULT_LOCALE_KEY: &str = "openmrsDefaultLocale";

static DEFAULT_LOCALE: ArcSwapOption<String> = ArcSwapOption::const_empty();

/// Set the process-wide default locale
pub fn set_default_locale(locale: &str) {
    DEFAULT_LOCALE.store(Some(Arc::new(locale.to_string())));
}

/// Current process-wide default locale, if one was fetched
pub fn default_locale() -> Option<String> {
    DEFAULT_LOCALE.load_full().map(|locale| locale.as_ref().clone())
}

/// Durable key/value storage
#[cfg_attr(test, mockall::automock)]
pub trait LocalStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// [`LocalStore`] backed by a JSON file
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store in the user's data directory
    pub fn in_data_dir() -> Result<Self> {
        let dirs = ProjectDirs::from("org", "bahmni", "form-builder-cli")
            .context("No home directory to keep local storage in")?;
        Ok(Self::new(dirs.data_dir().join("local_storage.json")))
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {}", self.path.display()))
    }
}

impl LocalStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.read_all()?;
        entries.insert(key.to_string(), value.to_string());

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(&entries)?;
        fs::write(&self.path, content)
            .with_context(|| format!("Failed to write {}", self.path.display()))
    }
}
