//! Copy, cut and paste of selected floors and walls.
//!
//! A [`CopyResult`] stores cells in the screen frame of the moment of the copy,
//! so pasting after a rotation keeps the content oriented as the user saw it.
//!
//! ## Module Structure
//!
//! - [`CopyResult`] - Copied cells of one layer
//! - [`ClipboardModel`] - The last copy, shared by every open map
//! - [`copy_selection`] - Builds a copy from the selection

#[cfg(test)]
mod tests;

use std::collections::HashMap;

use parking_lot::Mutex;
use uuid::Uuid;

use crate::editor::SelectionModel;
use crate::map::{GridModel, Location, Position, Rect};
use crate::rotation::RotationModel;
use crate::signal::Signal;

/// Floors and walls copied from one layer, keyed by screen position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CopyResult {
    pub layer_id: Uuid,
    pub locations: HashMap<Position, Location>,
}

impl CopyResult {
    pub fn bounds(&self) -> Rect {
        Rect::enclosing(self.locations.keys().copied())
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    /// Cells sorted by position, for a stable replay order.
    pub fn sorted(&self) -> Vec<(Position, &Location)> {
        let mut cells: Vec<_> = self.locations.iter().map(|(p, l)| (*p, l)).collect();
        cells.sort_unstable_by_key(|(p, _)| *p);
        cells
    }
}

/// Copies the selected floors and walls owned by the layer at `layer_index`.
///
/// Elements selected on other layers are left out.
pub fn copy_selection(
    grid: &GridModel,
    selection: &SelectionModel,
    rotation: &RotationModel,
    layer_index: usize,
) -> CopyResult {
    let layer_id = grid.layer_id(layer_index);
    let angle = rotation.angle();
    let mut locations: HashMap<Position, Location> = HashMap::new();

    for (pos, selected) in selection.selected() {
        if selected.floor == Some(layer_id) {
            let floor = grid.floor(pos, layer_index);
            if floor != 0 {
                locations
                    .entry(angle.from_canonical(pos))
                    .or_default()
                    .floor = floor;
            }
        }

        for is_right in [true, false] {
            if selected.wall(is_right) != Some(layer_id) {
                continue;
            }
            let wall = grid.wall(pos, layer_index, is_right);
            if wall != 0 {
                let (screen, side) = angle.wall_side_from_canonical(pos, is_right);
                locations.entry(screen).or_default().set_wall(side, wall);
            }
        }
    }

    CopyResult {
        layer_id,
        locations,
    }
}

/// Holds the most recent copy.
#[derive(Debug, Default)]
pub struct ClipboardModel {
    copied: Mutex<Option<CopyResult>>,
    changed: Signal,
}

impl ClipboardModel {
    pub fn get(&self) -> Option<CopyResult> {
        self.copied.lock().clone()
    }

    pub fn has_content(&self) -> bool {
        self.copied
            .lock()
            .as_ref()
            .is_some_and(|copy| !copy.is_empty())
    }

    pub fn set(&self, copy: CopyResult) {
        *self.copied.lock() = Some(copy);
        self.changed.notify();
    }

    pub fn clear(&self) {
        let had = self.copied.lock().take().is_some();
        if had {
            self.changed.notify();
        }
    }

    pub fn changed(&self) -> &Signal {
        &self.changed
    }
}
