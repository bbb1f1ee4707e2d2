//! Map save and close systems.

use bevy::prelude::*;
use tracing::{error, warn};

use crate::config::{UpdateLastMapPathRequest, UpdateOpenFilesRequest};
use crate::editor::MapsModel;

use super::messages::{CloseMapRequest, SaveMapRequest};
use super::resources::MapSaveError;

pub fn save_map_system(
    mut events: MessageReader<SaveMapRequest>,
    mut maps: ResMut<MapsModel>,
    mut save_error: ResMut<MapSaveError>,
    mut last_path_events: MessageWriter<UpdateLastMapPathRequest>,
    mut open_files_events: MessageWriter<UpdateOpenFilesRequest>,
) {
    for event in events.read() {
        match maps.save(event.map, event.path.as_deref()) {
            Ok(path) => {
                // Clear any previous save error
                save_error.message = None;
                last_path_events.write(UpdateLastMapPathRequest { path });
                open_files_events.write(UpdateOpenFilesRequest {
                    open_files: maps.open_files(),
                });
            }
            Err(e) => {
                error!("Failed to save map: {}", e);
                save_error.message = Some(e.to_string());
            }
        }
    }
}

pub fn close_map_system(
    mut events: MessageReader<CloseMapRequest>,
    mut maps: ResMut<MapsModel>,
    mut open_files_events: MessageWriter<UpdateOpenFilesRequest>,
) {
    for event in events.read() {
        match maps.close(event.map) {
            Ok(map) => {
                if map.is_dirty() {
                    warn!("Closed map {} with unsaved changes", map.id());
                }
                open_files_events.write(UpdateOpenFilesRequest {
                    open_files: maps.open_files(),
                });
            }
            Err(e) => warn!("Failed to close map: {}", e),
        }
    }
}
