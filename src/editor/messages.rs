//! Message types for editing requests on open maps.

use bevy::prelude::*;

use super::maps::MapId;
use super::mode::Mode;

#[derive(Message)]
pub struct UndoRequest {
    pub map: MapId,
}

#[derive(Message)]
pub struct RedoRequest {
    pub map: MapId,
}

#[derive(Message)]
pub struct SetModeRequest {
    pub map: MapId,
    pub mode: Mode,
}

/// Message to request a quarter turn of a map's view
#[derive(Message)]
pub struct RotateRequest {
    pub map: MapId,
    pub clockwise: bool,
}
