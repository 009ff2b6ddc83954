use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::difficulty::Difficulty;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access high scores at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to encode high scores: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Best score per difficulty, kept across sessions.
pub trait ScoreStore {
    fn get(&self, difficulty: Difficulty) -> u32;
    fn set(&mut self, difficulty: Difficulty, value: u32) -> Result<(), StoreError>;
}

/// How scores are laid out in the backing file.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreLayout {
    /// A bare integer shared by every difficulty.
    Single,
    /// An object keyed by difficulty name.
    #[default]
    PerDifficulty,
}

pub struct JsonScoreStore {
    path: PathBuf,
    layout: ScoreLayout,
}

impl JsonScoreStore {
    pub fn new(path: impl Into<PathBuf>, layout: ScoreLayout) -> Self {
        Self {
            path: path.into(),
            layout,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The file contents, or `None` when there is no file yet.
    fn load(&self) -> io::Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(text) => Ok(Some(text)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        }
    }

    fn read(&self) -> Option<String> {
        self.load().unwrap_or_else(|err| {
            warn!("Could not read high scores from {}: {}", self.path.display(), err);
            None
        })
    }

    fn parse_table(&self, text: &str) -> Map<String, Value> {
        match serde_json::from_str::<Value>(text) {
            Ok(Value::Object(table)) => table,
            Ok(_) | Err(_) => {
                warn!("Ignoring malformed high score table in {}", self.path.display());
                Map::new()
            }
        }
    }

    fn read_table(&self) -> Map<String, Value> {
        self.read()
            .map(|text| self.parse_table(&text))
            .unwrap_or_default()
    }

    fn read_single(&self) -> u32 {
        let Some(text) = self.read() else {
            return 0;
        };
        serde_json::from_str::<u32>(text.trim()).unwrap_or_else(|_| {
            warn!("Ignoring malformed high score in {}", self.path.display());
            0
        })
    }

    fn io_error(&self, source: io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn write(&self, contents: &str) -> Result<(), StoreError> {
        let io_err = |source| self.io_error(source);
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, contents).map_err(io_err)?;
        fs::rename(&tmp, &self.path).map_err(io_err)?;
        Ok(())
    }
}

impl ScoreStore for JsonScoreStore {
    fn get(&self, difficulty: Difficulty) -> u32 {
        match self.layout {
            ScoreLayout::Single => self.read_single(),
            ScoreLayout::PerDifficulty => self
                .read_table()
                .get(difficulty.name())
                .and_then(Value::as_u64)
                .map(|v| v.min(u32::MAX as u64) as u32)
                .unwrap_or(0),
        }
    }

    fn set(&mut self, difficulty: Difficulty, value: u32) -> Result<(), StoreError> {
        let contents = match self.layout {
            ScoreLayout::Single => serde_json::to_string(&value)?,
            ScoreLayout::PerDifficulty => {
                // Writing over an unreadable file would drop the other slots.
                let text = self.load().map_err(|err| self.io_error(err))?;
                let mut table = text
                    .map(|text| self.parse_table(&text))
                    .unwrap_or_default();
                table.insert(difficulty.name().to_string(), Value::from(value));
                serde_json::to_string_pretty(&table)?
            }
        };
        self.write(&contents)?;
        debug!("Stored high score {} for {}", value, difficulty.name());
        Ok(())
    }
}

#[cfg(test)]
#[derive(Default)]
pub struct MemoryScoreStore {
    pub scores: std::collections::HashMap<Difficulty, u32>,
    pub writes: usize,
}

#[cfg(test)]
impl ScoreStore for MemoryScoreStore {
    fn get(&self, difficulty: Difficulty) -> u32 {
        self.scores.get(&difficulty).copied().unwrap_or(0)
    }

    fn set(&mut self, difficulty: Difficulty, value: u32) -> Result<(), StoreError> {
        self.scores.insert(difficulty, value);
        self.writes += 1;
        Ok(())
    }
}
