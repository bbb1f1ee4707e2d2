mod grid;
mod layer;
mod location;
mod notes;
pub mod persistence;
mod position;

pub use grid::{GridModel, LayerMove};
pub use layer::{Layer, LayerInfo, LayerKind};
pub use location::Location;
pub use notes::{Note, NotesModel, parse_note_ids};
pub use persistence::{
    CloseMapRequest, LoadMapRequest, MapLoadError, MapSaveError, MissingMapFiles, NewMapRequest,
    SaveMapRequest,
};
pub use position::{ParsePositionError, Position, Rect};

use bevy::prelude::*;

use crate::config::ConfigLoaded;

pub struct MapPlugin;

impl Plugin for MapPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<MapLoadError>()
            .init_resource::<MapSaveError>()
            .init_resource::<MissingMapFiles>()
            .add_message::<SaveMapRequest>()
            .add_message::<LoadMapRequest>()
            .add_message::<NewMapRequest>()
            .add_message::<CloseMapRequest>()
            .add_systems(
                Startup,
                persistence::restore_open_files
                    .after(ConfigLoaded)
                    .after(crate::editor::apply_history_size),
            )
            .add_systems(
                Update,
                (
                    persistence::new_map_system.run_if(on_message::<NewMapRequest>),
                    persistence::load_map_system.run_if(on_message::<LoadMapRequest>),
                    persistence::save_map_system.run_if(on_message::<SaveMapRequest>),
                    persistence::close_map_system.run_if(on_message::<CloseMapRequest>),
                ),
            );
    }
}
