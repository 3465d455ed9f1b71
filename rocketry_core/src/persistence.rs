use std::io::{ErrorKind, Write};

use bevy::prelude::Resource;
use camino::{Utf8Path, Utf8PathBuf};
use miette::Diagnostic;
use model::part::Part;
use tempfile::NamedTempFile;
use thiserror::Error;

/// File the design is saved to, relative to the working directory
pub const DESIGN_FILE: &str = "rocket_design.json";

#[derive(Debug, Error, Diagnostic)]
pub enum PersistenceError {
    #[error("No design has been saved to `{0}` yet")]
    #[diagnostic(code(rocketry::persistence::not_saved))]
    NotSaved(Utf8PathBuf),
    #[error("Could not access `{path}`")]
    #[diagnostic(code(rocketry::persistence::io))]
    Io {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Design file `{path}` is malformed")]
    #[diagnostic(code(rocketry::persistence::format))]
    Format {
        path: Utf8PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Saves and loads the ordered list of placed parts
#[derive(Debug, Clone, Resource)]
pub struct DesignStore {
    path: Utf8PathBuf,
}

impl DesignStore {
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Overwrites the stored design. The design is written to a temporary file
    /// next to the target and renamed over it, so a failed save keeps the old file
    pub fn save(&self, parts: &[Part]) -> Result<(), PersistenceError> {
        let io = |source: std::io::Error| PersistenceError::Io {
            path: self.path.clone(),
            source,
        };
        let json = serde_json::to_string_pretty(parts).map_err(|source| PersistenceError::Format {
            path: self.path.clone(),
            source,
        })?;
        let dir = match self.path.parent() {
            Some(dir) if !dir.as_str().is_empty() => dir,
            _ => Utf8Path::new("."),
        };
        let mut file = NamedTempFile::new_in(dir).map_err(io)?;
        file.write_all(json.as_bytes()).map_err(io)?;
        file.persist(&self.path).map_err(|err| io(err.error))?;
        Ok(())
    }

    /// Reads the stored design back, in the order it was saved
    pub fn load(&self) -> Result<Vec<Part>, PersistenceError> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Err(PersistenceError::NotSaved(self.path.clone()))
            }
            Err(source) => {
                return Err(PersistenceError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        serde_json::from_str(&text).map_err(|source| PersistenceError::Format {
            path: self.path.clone(),
            source,
        })
    }
}
