//! Resource types for persistence state tracking.

use bevy::prelude::*;
use std::path::PathBuf;

/// Resource tracking load operation errors for display to user.
#[derive(Resource, Default)]
pub struct MapLoadError {
    pub message: Option<String>,
}

/// Resource tracking save operation errors for display to user.
#[derive(Resource, Default)]
pub struct MapSaveError {
    pub message: Option<String>,
}

/// Files from the previous session that could not be reopened.
#[derive(Resource, Default)]
pub struct MissingMapFiles {
    pub paths: Vec<PathBuf>,
}
