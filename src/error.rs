//! Recoverable errors.
//!
//! Broken caller contracts (an unknown layer id, an out-of-range layer index)
//! panic instead; nothing here is meant to paper over those.

use std::path::PathBuf;

use thiserror::Error;

use crate::editor::MapId;

pub type Result<T> = std::result::Result<T, EditorError>;

#[derive(Debug, Error)]
pub enum HistoryError {
    /// The caller's current generation is not (or no longer) in the log.
    #[error("generation {0} is not in the history")]
    UnknownGeneration(u64),
}

#[derive(Debug, Error)]
pub enum MapFileError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid map data: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported version {0}")]
    UnsupportedVersion(u64),
}

#[derive(Debug, Error)]
pub enum EditorError {
    #[error("map {0} is not open")]
    UnknownMap(MapId),

    #[error("map {0} has never been saved and no path was given")]
    NoFilePath(MapId),

    #[error("{path}: {source}")]
    File {
        path: PathBuf,
        #[source]
        source: MapFileError,
    },

    #[error(transparent)]
    History(#[from] HistoryError),
}
