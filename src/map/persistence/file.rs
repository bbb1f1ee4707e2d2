//! The on-disk map format: gzip-compressed JSON
//! `{"version": 1, "map": {...}, "notes": {...}}`.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use serde::{Deserialize, Serialize};

use crate::constants::MAP_FILE_VERSION;
use crate::error::MapFileError;
use crate::map::{GridModel, NotesModel};

#[derive(Serialize)]
struct MapFileRef<'a> {
    version: u64,
    map: &'a GridModel,
    notes: &'a NotesModel,
}

#[derive(Deserialize)]
struct VersionProbe {
    #[serde(default)]
    version: u64,
}

#[derive(Deserialize)]
struct MapFileOwned {
    #[serde(default)]
    map: Option<GridModel>,
    #[serde(default)]
    notes: Option<NotesModel>,
}

/// Decodes a map from a gzip stream.
pub fn read_map(reader: impl Read) -> Result<(GridModel, NotesModel), MapFileError> {
    let mut json = Vec::new();
    GzDecoder::new(reader).read_to_end(&mut json)?;

    let probe: VersionProbe = serde_json::from_slice(&json)?;
    if probe.version != MAP_FILE_VERSION {
        return Err(MapFileError::UnsupportedVersion(probe.version));
    }

    let file: MapFileOwned = serde_json::from_slice(&json)?;
    Ok((
        file.map.unwrap_or_default(),
        file.notes.unwrap_or_default(),
    ))
}

/// Encodes a map as a gzip stream.
pub fn write_map(
    writer: impl Write,
    grid: &GridModel,
    notes: &NotesModel,
) -> Result<(), MapFileError> {
    let mut encoder = GzEncoder::new(writer, Compression::default());
    serde_json::to_writer(
        &mut encoder,
        &MapFileRef {
            version: MAP_FILE_VERSION,
            map: grid,
            notes,
        },
    )?;
    encoder.finish()?.flush()?;
    Ok(())
}

pub fn load_map_file(path: &Path) -> Result<(GridModel, NotesModel), MapFileError> {
    let file = File::open(path)?;
    read_map(BufReader::new(file))
}

pub fn save_map_file(path: &Path, grid: &GridModel, notes: &NotesModel) -> Result<(), MapFileError> {
    let file = File::create(path)?;
    write_map(BufWriter::new(file), grid, notes)
}
