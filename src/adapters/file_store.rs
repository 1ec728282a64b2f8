//! File-based key-value store adapter.
//!
//! Each key is stored as a pretty-printed JSON file `<key>.json` inside the
//! data directory, `~/.chatline` unless overridden.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::StoreError;
use crate::traits::KeyValueStore;

/// The data directory name under the home directory.
const DATA_DIR: &str = ".chatline";

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "CHATLINE_DATA_DIR";

/// JSON-file store.
///
/// # Example
///
/// ```ignore
/// use chatline::adapters::FileStore;
/// use chatline::traits::StoreExt;
///
/// let store = FileStore::from_env()?;
/// let history: Option<ChatHistory> = store.load_json("chat-history")?;
/// ```
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `dir`. The directory is created on first save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Create a store at `$CHATLINE_DATA_DIR`, or `~/.chatline`.
    pub fn from_env() -> Result<Self, StoreError> {
        if let Some(dir) = std::env::var_os(DATA_DIR_ENV).filter(|v| !v.is_empty()) {
            return Ok(Self::new(dir));
        }
        let home = dirs::home_dir().ok_or(StoreError::NoDataDirectory)?;
        Ok(Self::new(home.join(DATA_DIR)))
    }

    /// Get the data directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{}.json", name))
    }
}

impl KeyValueStore for FileStore {
    fn load(&self, key: &str) -> Result<Option<serde_json::Value>, StoreError> {
        let path = self.path_for(key);
        let file = match File::open(&path) {
            Ok(f) => f,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::io(key, &e)),
        };

        let reader = BufReader::new(file);
        serde_json::from_reader(reader)
            .map(Some)
            .map_err(|e| StoreError::serialization(key, &e))
    }

    fn save(&self, key: &str, value: &serde_json::Value) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir).map_err(|e| StoreError::io(key, &e))?;

        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        let file = File::create(&tmp).map_err(|e| StoreError::io(key, &e))?;

        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, value)
            .map_err(|e| StoreError::serialization(key, &e))?;
        writer.flush().map_err(|e| StoreError::io(key, &e))?;
        drop(writer);

        fs::rename(&tmp, &path).map_err(|e| StoreError::io(key, &e))
    }
}
