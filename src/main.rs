use std::path::PathBuf;

use bevy::app::ScheduleRunnerPlugin;
use bevy::prelude::*;
use tracing::info;

use gridforged::editor::MapsModel;
use gridforged::map::{LoadMapRequest, MapLoadError};
use gridforged::{ConfigPlugin, EditorPlugin, MapPlugin, paths};

/// Map files named on the command line
#[derive(Resource, Default)]
struct CliMapFiles(Vec<PathBuf>);

fn env_filter() -> tracing_subscriber::EnvFilter {
    // Default to info for dependencies, debug for gridforged
    tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,gridforged=debug"))
}

/// Set up stdout and file logging for debug builds
#[cfg(debug_assertions)]
fn setup_logging() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    use std::fs::OpenOptions;
    use std::io::Write;
    use tracing_subscriber::prelude::*;

    let logs_dir = paths::logs_dir();
    if std::fs::create_dir_all(&logs_dir).is_err() {
        eprintln!("Failed to create logs directory");
        return None;
    }

    let log_file_path = logs_dir.join("gridforged.log");

    // Append session separator to existing log file
    if let Ok(mut file) = OpenOptions::new().append(true).open(&log_file_path) {
        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
        let separator = "=".repeat(80);
        let _ = writeln!(
            file,
            "\n\n{}\n=== New Session Started at {} ===\n{}\n",
            separator, timestamp, separator
        );
    }

    let file_appender = tracing_appender::rolling::never(&logs_dir, "gridforged.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // No ANSI colors for file output
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_level(true);

    let stdout_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stdout)
        .with_ansi(true)
        .with_target(true)
        .with_level(true);

    tracing_subscriber::registry()
        .with(env_filter())
        .with(file_layer)
        .with(stdout_layer)
        .init();

    Some(guard)
}

#[cfg(not(debug_assertions))]
fn setup_logging() -> Option<()> {
    use tracing_subscriber::prelude::*;

    tracing_subscriber::registry()
        .with(env_filter())
        .with(tracing_subscriber::fmt::layer().with_ansi(true))
        .init();
    None
}

fn request_cli_maps(files: Res<CliMapFiles>, mut requests: MessageWriter<LoadMapRequest>) {
    for path in &files.0 {
        requests.write(LoadMapRequest { path: path.clone() });
    }
}

/// Logs one line per open map
fn report_maps(maps: Res<MapsModel>, load_error: Res<MapLoadError>) {
    if let Some(message) = &load_error.message {
        tracing::error!("{}", message);
    }

    for id in maps.ids() {
        let Ok(map) = maps.get(id) else {
            continue;
        };
        let grid = map.grid();
        let cells: usize = (0..grid.len()).map(|i| grid.locations(i).len()).sum();
        info!(
            "{}: {} layers, {} cells, {} notes",
            map.file_path()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| id.to_string()),
            grid.len(),
            cells,
            map.notes().len()
        );
    }
}

fn main() {
    // Keep the guard alive for the duration of the program
    let _log_guard = setup_logging();

    if let Err(e) = paths::ensure_directories() {
        tracing::warn!("Failed to create data directories: {}", e);
    }

    let files: Vec<PathBuf> = std::env::args_os().skip(1).map(PathBuf::from).collect();

    App::new()
        .add_plugins(ScheduleRunnerPlugin::run_once())
        .add_plugins(ConfigPlugin)
        .add_plugins(EditorPlugin)
        .add_plugins(MapPlugin)
        .insert_resource(CliMapFiles(files))
        .add_systems(Startup, request_cli_maps)
        .add_systems(Last, report_maps)
        .run();
}
