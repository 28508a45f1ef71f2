//! Durable key-value store backed by a single TOML file.
//!
//! Every key is a top-level TOML entry. Values cross the store boundary as
//! `serde_json::Value` so callers never see TOML specifics.

use async_trait::async_trait;
use serde_json::{Map, Value as JsonValue};
use std::fs::{self, File, OpenOptions};
use std::io::Write as IoWrite;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use ytn_core::NotifierError;
use ytn_core::error::Result;
use ytn_core::storage::KeyValueStore;

/// Errors that can occur during TOML store operations.
#[derive(Debug)]
pub enum TomlStoreError {
    /// File I/O error.
    IoError(std::io::Error),
    /// TOML parsing error.
    TomlParseError(toml::de::Error),
    /// TOML serialization error.
    TomlSerError(toml::ser::Error),
    /// JSON conversion error.
    JsonError(serde_json::Error),
    /// File locking error.
    LockError(String),
    /// The file's top level is not a table.
    NotATable,
}

impl std::fmt::Display for TomlStoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TomlStoreError::IoError(e) => write!(f, "I/O error: {}", e),
            TomlStoreError::TomlParseError(e) => write!(f, "TOML parse error: {}", e),
            TomlStoreError::TomlSerError(e) => write!(f, "TOML serialization error: {}", e),
            TomlStoreError::JsonError(e) => write!(f, "JSON conversion error: {}", e),
            TomlStoreError::LockError(e) => write!(f, "Lock error: {}", e),
            TomlStoreError::NotATable => write!(f, "store file is not a TOML table"),
        }
    }
}

impl std::error::Error for TomlStoreError {}

impl From<std::io::Error> for TomlStoreError {
    fn from(e: std::io::Error) -> Self {
        TomlStoreError::IoError(e)
    }
}

impl From<toml::de::Error> for TomlStoreError {
    fn from(e: toml::de::Error) -> Self {
        TomlStoreError::TomlParseError(e)
    }
}

impl From<toml::ser::Error> for TomlStoreError {
    fn from(e: toml::ser::Error) -> Self {
        TomlStoreError::TomlSerError(e)
    }
}

impl From<serde_json::Error> for TomlStoreError {
    fn from(e: serde_json::Error) -> Self {
        TomlStoreError::JsonError(e)
    }
}

impl From<TomlStoreError> for NotifierError {
    fn from(e: TomlStoreError) -> Self {
        match e {
            TomlStoreError::IoError(io) => io.into(),
            TomlStoreError::TomlParseError(de) => de.into(),
            TomlStoreError::TomlSerError(ser) => ser.into(),
            TomlStoreError::JsonError(json) => json.into(),
            other => NotifierError::data_access(other.to_string()),
        }
    }
}

/// Synchronous access to the TOML file.
///
/// Provides:
/// - **Atomicity**: Updates are all-or-nothing via tmp file + atomic rename
/// - **Isolation**: File locking prevents concurrent modifications
/// - **Durability**: Explicit fsync before rename
struct TomlFile {
    path: PathBuf,
}

impl TomlFile {
    /// Loads the file as a JSON object.
    ///
    /// A missing or empty file is an empty object.
    fn load(&self) -> std::result::Result<Map<String, JsonValue>, TomlStoreError> {
        if !self.path.exists() {
            return Ok(Map::new());
        }

        let content = fs::read_to_string(&self.path)?;

        if content.trim().is_empty() {
            return Ok(Map::new());
        }

        // Parse TOML → toml::Value
        let toml_value: toml::Value = toml::from_str(&content)?;

        match toml_to_json(toml_value)? {
            JsonValue::Object(map) => Ok(map),
            _ => Err(TomlStoreError::NotATable),
        }
    }

    fn save(&self, data: &Map<String, JsonValue>) -> std::result::Result<(), TomlStoreError> {
        // Ensure parent directory exists
        if let Some(parent) = self.path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let toml_value = json_to_toml(&JsonValue::Object(data.clone()))?;
        let toml_string = toml::to_string_pretty(&toml_value)?;

        // Write to temporary file in the same directory
        let tmp_path = self.get_temp_path()?;
        let mut tmp_file = File::create(&tmp_path)?;
        tmp_file.write_all(toml_string.as_bytes())?;

        // Ensure data is written to disk
        tmp_file.sync_all()?;
        drop(tmp_file);

        // Atomic rename
        fs::rename(&tmp_path, &self.path)?;

        Ok(())
    }

    /// Performs a locked read-modify-write of the whole file.
    fn update<F>(&self, f: F) -> std::result::Result<(), TomlStoreError>
    where
        F: FnOnce(&mut Map<String, JsonValue>),
    {
        let _lock = FileLock::acquire(&self.path)?;

        let mut data = self.load()?;
        f(&mut data);
        self.save(&data)
    }

    /// Gets a temporary file path for atomic writes.
    fn get_temp_path(&self) -> std::result::Result<PathBuf, TomlStoreError> {
        let parent = self.path.parent().ok_or_else(|| {
            TomlStoreError::IoError(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "Path has no parent directory",
            ))
        })?;

        let file_name = self.path.file_name().ok_or_else(|| {
            TomlStoreError::IoError(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "Path has no file name",
            ))
        })?;

        let tmp_name = format!(".{}.tmp", file_name.to_string_lossy());
        Ok(parent.join(tmp_name))
    }
}

/// A file lock guard that automatically releases the lock when dropped.
struct FileLock {
    #[allow(dead_code)]
    file: File,
    lock_path: PathBuf,
}

impl FileLock {
    fn acquire(path: &Path) -> std::result::Result<Self, TomlStoreError> {
        let lock_path = path.with_extension("lock");

        if let Some(parent) = lock_path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;

        #[cfg(unix)]
        {
            use fs2::FileExt;
            file.lock_exclusive()
                .map_err(|e| TomlStoreError::LockError(format!("Failed to acquire lock: {}", e)))?;
        }

        Ok(FileLock { file, lock_path })
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        // Unlock is automatic when the file handle is dropped
        let _ = fs::remove_file(&self.lock_path);
    }
}

/// Converts a toml::Value to serde_json::Value.
fn toml_to_json(toml_value: toml::Value) -> std::result::Result<JsonValue, TomlStoreError> {
    let json_str = serde_json::to_string(&toml_value)?;
    Ok(serde_json::from_str(&json_str)?)
}

/// Converts a serde_json::Value to toml::Value.
///
/// TOML has no null, so nulls anywhere in `json_value` fail here.
fn json_to_toml(json_value: &JsonValue) -> std::result::Result<toml::Value, TomlStoreError> {
    let json_str = serde_json::to_string(json_value)?;
    Ok(serde_json::from_str(&json_str)?)
}

/// Durable scope of the key-value capability.
///
/// File access runs on the blocking pool so the poll loop never stalls on
/// disk I/O or the file lock.
#[derive(Clone)]
pub struct TomlKeyValueStore {
    file: Arc<TomlFile>,
}

impl TomlKeyValueStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            file: Arc::new(TomlFile { path }),
        }
    }

    pub fn path(&self) -> &Path {
        &self.file.path
    }

    async fn run_blocking<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&TomlFile) -> std::result::Result<T, TomlStoreError> + Send + 'static,
    {
        let file = Arc::clone(&self.file);
        tokio::task::spawn_blocking(move || f(&file))
            .await
            .map_err(|e| NotifierError::internal(format!("store task failed: {}", e)))?
            .map_err(NotifierError::from)
    }
}

#[async_trait]
impl KeyValueStore for TomlKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<JsonValue>> {
        let key = key.to_string();
        self.run_blocking(move |file| Ok(file.load()?.remove(&key)))
            .await
    }

    async fn set(&self, key: &str, value: JsonValue) -> Result<()> {
        if value.is_null() {
            return self.remove(key).await;
        }

        let key = key.to_string();
        tracing::debug!("[TomlKeyValueStore] set {}", key);
        self.run_blocking(move |file| {
            file.update(|data| {
                data.insert(key, value);
            })
        })
        .await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let key = key.to_string();
        self.run_blocking(move |file| {
            file.update(|data| {
                data.remove(&key);
            })
        })
        .await
    }
}
