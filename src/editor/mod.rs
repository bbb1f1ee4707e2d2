//! Per-map editing state and the undo/redo engine around it.
//!
//! ## Module Structure
//!
//! - [`history`] - Actions, containers and the generation-numbered log
//! - [`maps`] - Open maps and the gesture routines built on the history
//! - [`clipboard`] - Copy, cut and paste
//! - [`selection`], [`mode`], [`selected_layer`], [`center`] - Small per-map models
//! - [`messages`] - Bevy messages for undo, redo, mode and rotation requests

pub mod clipboard;
pub mod history;
mod center;
mod maps;
mod messages;
mod mode;
mod selected_layer;
mod selection;

pub use center::CenterModel;
pub use maps::{MapElem, MapId, MapModels, MapsModel};
pub use messages::{RedoRequest, RotateRequest, SetModeRequest, UndoRequest};
pub use mode::{Mode, ModeModel};
pub use selected_layer::SelectedLayerModel;
pub use selection::{Selected, SelectionModel};

use bevy::prelude::*;

use crate::config::{ConfigLoaded, EditorConfig};

/// Maps opened from now on keep as many undo steps as the config asks for.
pub fn apply_history_size(config: Res<EditorConfig>, mut maps: ResMut<MapsModel>) {
    maps.set_history_size(config.data.history_size);
}

fn handle_set_mode(mut requests: MessageReader<SetModeRequest>, mut maps: ResMut<MapsModel>) {
    for request in requests.read() {
        let result = maps
            .get_mut(request.map)
            .and_then(|map| map.set_mode(request.mode).map_err(Into::into));
        if let Err(e) = result {
            tracing::error!("Failed to switch to {} mode: {}", request.mode.display_name(), e);
        }
    }
}

fn handle_rotate(mut requests: MessageReader<RotateRequest>, mut maps: ResMut<MapsModel>) {
    for request in requests.read() {
        let result = maps.get_mut(request.map).and_then(|map| {
            if request.clockwise {
                map.rotate_clockwise()?;
            } else {
                map.rotate_counterclockwise()?;
            }
            Ok(())
        });
        if let Err(e) = result {
            tracing::error!("Failed to rotate map: {}", e);
        }
    }
}

pub struct EditorPlugin;

impl Plugin for EditorPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<MapsModel>()
            .add_message::<UndoRequest>()
            .add_message::<RedoRequest>()
            .add_message::<SetModeRequest>()
            .add_message::<RotateRequest>()
            .add_systems(Startup, apply_history_size.after(ConfigLoaded))
            .add_systems(
                Update,
                (
                    history::handle_undo.run_if(on_message::<UndoRequest>),
                    history::handle_redo.run_if(on_message::<RedoRequest>),
                    handle_set_mode.run_if(on_message::<SetModeRequest>),
                    handle_rotate.run_if(on_message::<RotateRequest>),
                )
                    .chain(),
            );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rotation::Angle;

    fn app() -> App {
        let mut app = App::new();
        app.insert_resource(EditorConfig::default())
            .add_plugins(EditorPlugin);
        app.update();
        app
    }

    #[test]
    fn test_rotate_and_undo_requests() {
        let mut app = app();
        let map = app.world_mut().resource_mut::<MapsModel>().new_map();

        app.world_mut().write_message(RotateRequest { map, clockwise: true });
        app.update();
        let angle = app.world().resource::<MapsModel>().get(map).unwrap().rotation().angle();
        assert_eq!(angle, Angle::Deg90);

        app.world_mut().write_message(UndoRequest { map });
        app.update();
        let angle = app.world().resource::<MapsModel>().get(map).unwrap().rotation().angle();
        assert_eq!(angle, Angle::Deg0);

        app.world_mut().write_message(RedoRequest { map });
        app.update();
        let angle = app.world().resource::<MapsModel>().get(map).unwrap().rotation().angle();
        assert_eq!(angle, Angle::Deg90);
    }

    #[test]
    fn test_set_mode_request() {
        let mut app = app();
        let map = app.world_mut().resource_mut::<MapsModel>().new_map();

        app.world_mut().write_message(SetModeRequest { map, mode: Mode::Select });
        app.update();
        let maps = app.world().resource::<MapsModel>();
        assert_eq!(maps.get(map).unwrap().mode(), Mode::Select);
    }

    #[test]
    fn test_history_size_comes_from_config() {
        let mut app = App::new();
        let mut config = EditorConfig::default();
        config.data.history_size = 7;
        app.insert_resource(config).add_plugins(EditorPlugin);
        app.update();

        let maps = app.world().resource::<MapsModel>();
        assert_eq!(maps.history_size(), 7);
    }

    #[test]
    fn test_request_for_unknown_map_is_ignored() {
        let mut app = app();
        app.world_mut().write_message(UndoRequest { map: MapId::new() });
        app.update();
        assert!(app.world().resource::<MapsModel>().is_empty());
    }
}
