//! Stage files and the stage-name table
//!
//! Stages are numbered text files under the levels directory; a JSON object
//! maps each stage index (as a string) to the name shown in the caption.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::consts::GAME_TITLE;
use crate::sim::LevelError;

/// Errors at the stage resource boundary
#[derive(Debug, Error)]
pub enum StageError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed stage-name table: {0}")]
    Names(#[from] serde_json::Error),

    #[error("stage {stage}: {source}")]
    Level {
        stage: u32,
        #[source]
        source: LevelError,
    },
}

/// Anything that can hand out the raw text of a stage
pub trait StageSource {
    fn stage_text(&mut self, stage: u32) -> Result<String, StageError>;
}

/// Reads `level{n}.txt` from a directory
#[derive(Debug, Clone)]
pub struct DirStageSource {
    dir: PathBuf,
}

impl DirStageSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, stage: u32) -> PathBuf {
        self.dir.join(format!("level{}.txt", stage))
    }
}

impl StageSource for DirStageSource {
    fn stage_text(&mut self, stage: u32) -> Result<String, StageError> {
        let path = self.path_for(stage);
        std::fs::read_to_string(&path).map_err(|source| StageError::Io { path, source })
    }
}

/// In-memory stages, indexed by position
impl StageSource for Vec<String> {
    fn stage_text(&mut self, stage: u32) -> Result<String, StageError> {
        self.get(stage as usize).cloned().ok_or_else(|| StageError::Io {
            path: PathBuf::from(format!("level{}.txt", stage)),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        })
    }
}

/// Stage index to display name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StageNames {
    names: HashMap<String, String>,
}

impl StageNames {
    pub fn from_json(json: &str) -> Result<Self, StageError> {
        let names: HashMap<String, String> = serde_json::from_str(json)?;
        Ok(Self { names })
    }

    pub fn load(path: &Path) -> Result<Self, StageError> {
        let json = std::fs::read_to_string(path).map_err(|source| StageError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let names = Self::from_json(&json)?;
        log::info!("Loaded {} stage names from {}", names.len(), path.display());
        Ok(names)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn get(&self, stage: u32) -> Option<&str> {
        self.names.get(&stage.to_string()).map(String::as_str)
    }

    /// Window caption for `stage`, falling back to the stage number
    pub fn caption(&self, stage: u32) -> String {
        match self.get(stage) {
            Some(name) => format!("{} - {}", GAME_TITLE, name),
            None => {
                log::warn!("No name for stage {}", stage);
                format!("{} - Stage {}", GAME_TITLE, stage)
            }
        }
    }
}
