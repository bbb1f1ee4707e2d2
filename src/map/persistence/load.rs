//! Map load, new map and session restore systems.

use bevy::prelude::*;
use tracing::{info, warn};

use crate::config::{EditorConfig, UpdateLastMapPathRequest, UpdateOpenFilesRequest};
use crate::editor::MapsModel;

use super::messages::{LoadMapRequest, NewMapRequest};
use super::resources::{MapLoadError, MissingMapFiles};

/// Opens each requested file as a map
pub fn load_map_system(
    mut events: MessageReader<LoadMapRequest>,
    mut maps: ResMut<MapsModel>,
    mut load_error: ResMut<MapLoadError>,
    mut last_path_events: MessageWriter<UpdateLastMapPathRequest>,
    mut open_files_events: MessageWriter<UpdateOpenFilesRequest>,
) {
    for event in events.read() {
        match maps.open(&event.path) {
            Ok(_) => {
                load_error.message = None;
                last_path_events.write(UpdateLastMapPathRequest {
                    path: event.path.clone(),
                });
                open_files_events.write(UpdateOpenFilesRequest {
                    open_files: maps.open_files(),
                });
            }
            Err(e) => {
                warn!("Failed to load map: {}", e);
                load_error.message = Some(e.to_string());
            }
        }
    }
}

pub fn new_map_system(mut events: MessageReader<NewMapRequest>, mut maps: ResMut<MapsModel>) {
    for _ in events.read() {
        maps.new_map();
    }
}

/// Startup system reopening the files of the previous session
pub fn restore_open_files(
    config: Res<EditorConfig>,
    mut maps: ResMut<MapsModel>,
    mut missing: ResMut<MissingMapFiles>,
    mut load_error: ResMut<MapLoadError>,
) {
    for path in &config.data.open_files {
        if !path.exists() {
            info!("Previously open map no longer exists: {:?}", path);
            missing.paths.push(path.clone());
            continue;
        }
        if let Err(e) = maps.open(path) {
            warn!("Failed to reopen map: {}", e);
            load_error.message = Some(e.to_string());
        }
    }
}
