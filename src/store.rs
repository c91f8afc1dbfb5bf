use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde_json::{Map, Value};
use thiserror::Error;

/// Fixed key under which the high score is stored.
pub const HIGH_SCORE_KEY: &str = "snake3DHighScore";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("could not resolve a data directory for high scores")]
    NoDataDir,
    #[error("i/o error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed score file {}: {source}", .path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("stored high score in {} is not a non-negative integer", .0.display())]
    BadValue(PathBuf),
}

/// Key-value persistence of the high score.
pub trait HighScoreStore {
    /// The stored high score, or `None` if nothing has been saved yet.
    fn load(&self) -> Result<Option<u32>, StoreError>;

    fn save(&mut self, score: u32) -> Result<(), StoreError>;
}

/// In-memory store; nothing survives the process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStore {
    value: Option<u32>,
    writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(value: u32) -> Self {
        Self {
            value: Some(value),
            writes: 0,
        }
    }

    pub fn value(&self) -> Option<u32> {
        self.value
    }

    /// Number of successful `save` calls.
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl HighScoreStore for MemoryStore {
    fn load(&self) -> Result<Option<u32>, StoreError> {
        Ok(self.value)
    }

    fn save(&mut self, score: u32) -> Result<(), StoreError> {
        self.value = Some(score);
        self.writes += 1;
        Ok(())
    }
}

impl<S: HighScoreStore + ?Sized> HighScoreStore for Box<S> {
    fn load(&self) -> Result<Option<u32>, StoreError> {
        (**self).load()
    }

    fn save(&mut self, score: u32) -> Result<(), StoreError> {
        (**self).save(score)
    }
}

/// JSON object on disk, holding the score under [`HIGH_SCORE_KEY`].
///
/// Other keys in the file are preserved on save.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store in the platform's local data directory.
    pub fn in_data_dir() -> Result<Self, StoreError> {
        let proj = ProjectDirs::from("", "", "grid-snake").ok_or(StoreError::NoDataDir)?;
        Ok(Self::new(proj.data_local_dir().join("scores.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_err(&self, source: io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn read_map(&self) -> Result<Map<String, Value>, StoreError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(self.io_err(e)),
        };
        if text.trim().is_empty() {
            return Ok(Map::new());
        }
        serde_json::from_str(&text).map_err(|source| StoreError::Malformed {
            path: self.path.clone(),
            source,
        })
    }
}

impl HighScoreStore for JsonFileStore {
    fn load(&self) -> Result<Option<u32>, StoreError> {
        let map = self.read_map()?;
        match map.get(HIGH_SCORE_KEY) {
            None => Ok(None),
            Some(v) => v
                .as_u64()
                .and_then(|n| u32::try_from(n).ok())
                .map(Some)
                .ok_or_else(|| StoreError::BadValue(self.path.clone())),
        }
    }

    fn save(&mut self, score: u32) -> Result<(), StoreError> {
        // A corrupt file is replaced; a file we cannot read is left alone.
        let mut map = match self.read_map() {
            Ok(map) => map,
            Err(StoreError::Malformed { .. }) => Map::new(),
            Err(e) => return Err(e),
        };
        map.insert(HIGH_SCORE_KEY.to_owned(), Value::from(score));

        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir).map_err(|e| self.io_err(e))?;
            }
        }

        let data = serde_json::to_vec_pretty(&map).map_err(|source| StoreError::Malformed {
            path: self.path.clone(),
            source,
        })?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, data).map_err(|e| self.io_err(e))?;
        fs::rename(&tmp, &self.path).map_err(|e| self.io_err(e))?;
        Ok(())
    }
}
