//! Editing core for layered grid maps: sparse tile layers, quarter-turn view
//! rotation, selection, copy and paste, and a generation-numbered undo/redo
//! history, with Bevy plugins wiring it into an app.

pub mod config;
pub mod constants;
pub mod editor;
pub mod error;
pub mod map;
pub mod paths;
pub mod rotation;
pub mod signal;

pub use config::ConfigPlugin;
pub use editor::EditorPlugin;
pub use error::{EditorError, HistoryError, MapFileError, Result};
pub use map::MapPlugin;
