use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

use crate::constants::DEFAULT_HISTORY_SIZE;

/// System set for config loading (other plugins can run after this)
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConfigLoaded;

fn default_history_size() -> usize {
    DEFAULT_HISTORY_SIZE
}

/// Editor configuration persisted to disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorConfigData {
    /// Undo steps kept per map
    #[serde(default = "default_history_size")]
    pub history_size: usize,

    /// Map files that were open when the session was last saved, reopened on startup
    #[serde(default)]
    pub open_files: Vec<PathBuf>,

    /// Last opened or saved map file
    #[serde(default)]
    pub last_map_path: Option<PathBuf>,
}

impl Default for EditorConfigData {
    fn default() -> Self {
        Self {
            history_size: DEFAULT_HISTORY_SIZE,
            open_files: Vec::new(),
            last_map_path: None,
        }
    }
}

/// Runtime configuration resource
#[derive(Resource)]
pub struct EditorConfig {
    /// The persisted configuration data
    pub data: EditorConfigData,
    /// Path to the config file
    pub config_path: PathBuf,
    /// Whether config needs to be saved (dirty flag)
    pub dirty: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            data: EditorConfigData::default(),
            config_path: crate::paths::config_file(),
            dirty: false,
        }
    }
}

/// Resource to notify user when config was reset to defaults
#[derive(Resource, Default)]
pub struct ConfigResetNotification {
    /// Whether to show the notification
    pub show: bool,
    /// The reason for the reset (parse error, read error, etc.)
    pub reason: Option<String>,
}

/// Message to trigger config save
#[derive(Message)]
pub struct SaveConfigRequest;

/// Message to replace the remembered list of open map files
#[derive(Message)]
pub struct UpdateOpenFilesRequest {
    pub open_files: Vec<PathBuf>,
}

/// Message to update the last map path in config
#[derive(Message)]
pub struct UpdateLastMapPathRequest {
    pub path: PathBuf,
}

/// Result of loading config from disk
pub struct LoadConfigResult {
    pub config: EditorConfig,
    /// Error message if config was reset to defaults due to an error
    pub reset_reason: Option<String>,
}

/// Load configuration from `config_path`, falling back to defaults
pub fn load_config(config_path: &Path) -> LoadConfigResult {
    let (data, reset_reason) = if config_path.exists() {
        match std::fs::read_to_string(config_path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(data) => {
                    info!("Loaded config from {:?}", config_path);
                    (data, None)
                }
                Err(e) => {
                    warn!("Failed to parse config file: {}", e);
                    (
                        EditorConfigData::default(),
                        Some(format!("Configuration file was corrupted: {}", e)),
                    )
                }
            },
            Err(e) => {
                warn!("Failed to read config file: {}", e);
                (
                    EditorConfigData::default(),
                    Some(format!("Could not read configuration file: {}", e)),
                )
            }
        }
    } else {
        info!("No config file found, using defaults");
        (EditorConfigData::default(), None)
    };

    LoadConfigResult {
        config: EditorConfig {
            data,
            config_path: config_path.to_path_buf(),
            dirty: false,
        },
        reset_reason,
    }
}

/// Save configuration to disk
pub fn save_config(config: &EditorConfig) -> std::io::Result<()> {
    let json = serde_json::to_string_pretty(&config.data)?;
    std::fs::write(&config.config_path, json)?;
    info!("Config saved to {:?}", config.config_path);
    Ok(())
}

/// Startup system to load config from disk into the existing resource
fn load_config_system(
    mut config: ResMut<EditorConfig>,
    mut reset_notification: ResMut<ConfigResetNotification>,
) {
    let result = load_config(&config.config_path);
    config.data = result.config.data;
    config.dirty = result.config.dirty;

    // Set notification if config was reset due to an error
    if let Some(reason) = result.reset_reason {
        reset_notification.show = true;
        reset_notification.reason = Some(reason);
    }
}

/// System to save config when requested
fn save_config_system(
    mut events: MessageReader<SaveConfigRequest>,
    mut config: ResMut<EditorConfig>,
) {
    for _ in events.read() {
        if config.dirty {
            match save_config(&config) {
                Ok(()) => config.dirty = false,
                Err(e) => error!("Failed to save config: {}", e),
            }
        }
    }
}

/// System to remember which map files are open
fn update_open_files_system(
    mut events: MessageReader<UpdateOpenFilesRequest>,
    mut config: ResMut<EditorConfig>,
    mut save_events: MessageWriter<SaveConfigRequest>,
) {
    for event in events.read() {
        if config.data.open_files != event.open_files {
            config.data.open_files = event.open_files.clone();
            config.dirty = true;
            save_events.write(SaveConfigRequest);
        }
    }
}

/// System to update last map path
fn update_last_map_path_system(
    mut events: MessageReader<UpdateLastMapPathRequest>,
    mut config: ResMut<EditorConfig>,
    mut save_events: MessageWriter<SaveConfigRequest>,
) {
    for event in events.read() {
        config.data.last_map_path = Some(event.path.clone());
        config.dirty = true;
        save_events.write(SaveConfigRequest);
    }
}

pub struct ConfigPlugin;

impl Plugin for ConfigPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<EditorConfig>()
            .init_resource::<ConfigResetNotification>()
            .add_message::<SaveConfigRequest>()
            .add_message::<UpdateOpenFilesRequest>()
            .add_message::<UpdateLastMapPathRequest>()
            .add_systems(Startup, load_config_system.in_set(ConfigLoaded))
            .add_systems(
                Update,
                (
                    update_open_files_system.run_if(on_message::<UpdateOpenFilesRequest>),
                    update_last_map_path_system.run_if(on_message::<UpdateLastMapPathRequest>),
                    save_config_system.run_if(on_message::<SaveConfigRequest>),
                )
                    .chain(),
            );
    }
}
