//! Centralized constants used across the application.

/// Undo steps kept per map unless the config says otherwise
pub const DEFAULT_HISTORY_SIZE: usize = 100;

/// Version written to, and required from, map files
pub const MAP_FILE_VERSION: u64 = 1;

/// Name of the single layer of a new map
pub const DEFAULT_LAYER_NAME: &str = "Layer 1";

/// Name of the Move layer a paste creates
pub const PASTED_LAYER_NAME: &str = "Pasted layer";
