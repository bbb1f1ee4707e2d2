//! Message types for map persistence operations.

use bevy::prelude::*;
use std::path::PathBuf;

use crate::editor::MapId;

/// Message to request saving a map; without a path it goes where it was loaded from
#[derive(Message)]
pub struct SaveMapRequest {
    pub map: MapId,
    pub path: Option<PathBuf>,
}

#[derive(Message)]
pub struct LoadMapRequest {
    pub path: PathBuf,
}

#[derive(Message)]
pub struct NewMapRequest;

#[derive(Message)]
pub struct CloseMapRequest {
    pub map: MapId,
}
