//! Map persistence: the file format and the systems that open, save and close maps.
//!
//! A map file is gzip-compressed JSON holding a format version, the layers and
//! the notes text. Loading checks the version before anything else.
//!
//! ## Module Structure
//!
//! - [`file`] - Reading and writing the map file format
//! - [`messages`] - Message types for map operations
//! - [`resources`] - Resource types for error reporting
//! - [`load`] - Load, new map and session restore systems
//! - [`save`] - Save and close systems

mod file;
mod load;
mod messages;
mod resources;
mod save;


// Re-exports - File format
pub use file::{load_map_file, read_map, save_map_file, write_map};

// Re-exports - Messages
pub use messages::{CloseMapRequest, LoadMapRequest, NewMapRequest, SaveMapRequest};

// Re-exports - Resources
pub use resources::{MapLoadError, MapSaveError, MissingMapFiles};

// Re-exports - Systems
pub use load::{load_map_system, new_map_system, restore_open_files};
pub use save::{close_map_system, save_map_system};
