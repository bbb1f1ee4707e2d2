//! Bevy systems for undo/redo requests.

use bevy::prelude::*;

use super::super::maps::MapsModel;
use super::super::messages::{RedoRequest, UndoRequest};

/// Undoes one step on each requested map.
pub fn handle_undo(mut requests: MessageReader<UndoRequest>, mut maps: ResMut<MapsModel>) {
    for request in requests.read() {
        let result = maps
            .get_mut(request.map)
            .and_then(|map| map.undo().map_err(Into::into));
        match result {
            Ok(true) => {}
            Ok(false) => tracing::debug!("Nothing to undo on map {}", request.map),
            Err(e) => tracing::error!("Undo failed: {}", e),
        }
    }
}

/// Redoes one step on each requested map.
pub fn handle_redo(mut requests: MessageReader<RedoRequest>, mut maps: ResMut<MapsModel>) {
    for request in requests.read() {
        let result = maps
            .get_mut(request.map)
            .and_then(|map| map.redo().map_err(Into::into));
        match result {
            Ok(true) => {}
            Ok(false) => tracing::debug!("Nothing to redo on map {}", request.map),
            Err(e) => tracing::error!("Redo failed: {}", e),
        }
    }
}
