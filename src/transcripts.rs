use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use regex::Regex;
use thiserror::Error;
use tracing::{debug, warn};

/// Why a transcript could not be persisted. Collapsed to a boolean at the
/// HTTP boundary; the full reason only reaches the logs.
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("invalid characters in filename component: {0}")]
    InvalidComponent(String),
    #[error("could not create transcripts directory {root:?}: {source}")]
    DirectoryUnavailable {
        root: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("could not write transcript {path:?}: {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Writes transcript text files under the first usable root from an ordered
/// candidate list. The default list is the configured directory followed by
/// a `transcripts` directory under the OS temp root, for deployments where
/// the working directory is not writable.
pub struct TranscriptStore {
    roots: Vec<PathBuf>,
}

impl TranscriptStore {
    pub fn new(primary_root: PathBuf) -> Self {
        Self::with_roots(vec![primary_root, std::env::temp_dir().join("transcripts")])
    }

    /// Callers must provide at least one candidate root.
    pub fn with_roots(roots: Vec<PathBuf>) -> Self {
        Self { roots }
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// Persist `text` as `transcript_<timestamp>_<language>.txt`. An empty
    /// `timestamp` is replaced with the current local time. Re-saving the
    /// same timestamp and language overwrites the existing file.
    pub fn save(&self, text: &str, language: &str, timestamp: &str) -> Result<PathBuf, SaveError> {
        let language = validate_component(language)?;
        let timestamp = if timestamp.is_empty() {
            current_timestamp()
        } else {
            validate_component(timestamp)?.to_string()
        };

        let filename = format!("transcript_{}_{}.txt", timestamp, language);

        let mut last_err = None;
        for root in &self.roots {
            match write_into(root, &filename, text) {
                Ok(path) => {
                    debug!("Saved transcript to {:?}", path);
                    return Ok(path);
                }
                Err(err) => {
                    warn!("Transcript root {:?} unusable: {}", root, err);
                    last_err = Some(err);
                }
            }
        }

        Err(last_err.expect("store has at least one candidate root"))
    }
}

fn write_into(root: &Path, filename: &str, text: &str) -> Result<PathBuf, SaveError> {
    fs::create_dir_all(root).map_err(|source| SaveError::DirectoryUnavailable {
        root: root.to_path_buf(),
        source,
    })?;

    let path = root.join(filename);
    fs::write(&path, text).map_err(|source| SaveError::WriteError {
        path: path.clone(),
        source,
    })?;

    Ok(path)
}

fn is_safe_component(component: &str) -> bool {
    if component.is_empty() || component.len() > 255 {
        return false;
    }
    if component == "." || component == ".." {
        return false;
    }

    let pattern = Regex::new(r"^[\w.-]+$").unwrap();
    pattern.is_match(component)
}

/// Caller-supplied values are interpolated into a filesystem path, so
/// anything outside a conservative character class is rejected outright
/// rather than reduced to something writable.
fn validate_component(component: &str) -> Result<&str, SaveError> {
    if !is_safe_component(component) {
        return Err(SaveError::InvalidComponent(component.to_string()));
    }
    Ok(component)
}

fn current_timestamp() -> String {
    chrono::Local::now().format("%Y%m%d_%H%M%S").to_string()
}
