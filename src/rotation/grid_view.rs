use uuid::Uuid;

use super::RotationModel;
use crate::map::{GridModel, Position, Rect};

/// The grid model addressed in screen coordinates.
///
/// Layer indices pass through unchanged; only positions, wall sides and
/// rectangles are translated.
#[derive(Clone, Copy)]
pub struct RotatedGrid<'a> {
    grid: &'a GridModel,
    rotation: &'a RotationModel,
}

impl<'a> RotatedGrid<'a> {
    pub fn new(grid: &'a GridModel, rotation: &'a RotationModel) -> Self {
        Self { grid, rotation }
    }

    pub fn grid(&self) -> &'a GridModel {
        self.grid
    }

    pub fn floor(&self, pos: Position, index: usize) -> u32 {
        self.grid.floor(self.rotation.to_canonical(pos), index)
    }

    pub fn set_floor(&self, pos: Position, index: usize, value: u32) {
        self.grid
            .set_floor(self.rotation.to_canonical(pos), index, value);
    }

    pub fn wall(&self, pos: Position, index: usize, is_right: bool) -> u32 {
        let (pos, is_right) = self.rotation.wall_side_to_canonical(pos, is_right);
        self.grid.wall(pos, index, is_right)
    }

    pub fn set_wall(&self, pos: Position, index: usize, is_right: bool, value: u32) {
        let (pos, is_right) = self.rotation.wall_side_to_canonical(pos, is_right);
        self.grid.set_wall(pos, index, is_right, value);
    }

    pub fn note_id(&self, pos: Position, index: usize) -> Option<String> {
        self.grid.note_id(self.rotation.to_canonical(pos), index)
    }

    pub fn set_note_id(&self, pos: Position, index: usize, value: Option<String>) {
        self.grid
            .set_note_id(self.rotation.to_canonical(pos), index, value);
    }

    pub fn visible_floor(&self, pos: Position) -> (Uuid, u32) {
        self.grid.visible_floor(self.rotation.to_canonical(pos))
    }

    pub fn visible_wall(&self, pos: Position, is_right: bool) -> (Uuid, u32) {
        let (pos, is_right) = self.rotation.wall_side_to_canonical(pos, is_right);
        self.grid.visible_wall(pos, is_right)
    }

    pub fn visible_note_id(&self, pos: Position) -> (Uuid, Option<String>) {
        self.grid.visible_note_id(self.rotation.to_canonical(pos))
    }

    pub fn bounds(&self, index: usize) -> Rect {
        self.rotation
            .angle()
            .rect_from_canonical(self.grid.bounds(index))
    }

    /// Translates the layer by a screen-frame offset.
    pub fn move_to(&self, index: usize, offset: Position) {
        self.grid
            .move_to(index, self.rotation.to_canonical(offset));
    }

    /// Non-zero floors of the layer in screen coordinates, sorted by position.
    pub fn floors(&self, index: usize) -> Vec<(Position, u32)> {
        let angle = self.rotation.angle();
        let mut floors: Vec<_> = self
            .grid
            .locations(index)
            .into_iter()
            .filter(|(_, loc)| loc.floor != 0)
            .map(|(pos, loc)| (angle.from_canonical(pos), loc.floor))
            .collect();
        floors.sort_unstable_by_key(|(pos, _)| *pos);
        floors
    }

    /// Non-zero walls of the layer as `(screen position, is_right, value)`, sorted.
    pub fn walls(&self, index: usize) -> Vec<(Position, bool, u32)> {
        let angle = self.rotation.angle();
        let mut walls = Vec::new();
        for (pos, loc) in self.grid.locations(index) {
            for is_right in [true, false] {
                let value = loc.wall(is_right);
                if value != 0 {
                    let (pos, is_right) = angle.wall_side_from_canonical(pos, is_right);
                    walls.push((pos, is_right, value));
                }
            }
        }
        walls.sort_unstable_by_key(|(pos, is_right, _)| (*pos, *is_right));
        walls
    }

    /// Note references of the layer in screen coordinates, sorted by position.
    pub fn note_ids(&self, index: usize) -> Vec<(Position, String)> {
        let angle = self.rotation.angle();
        let mut notes: Vec<_> = self
            .grid
            .locations(index)
            .into_iter()
            .filter_map(|(pos, loc)| loc.note_id.map(|id| (angle.from_canonical(pos), id)))
            .collect();
        notes.sort_unstable_by(|a, b| a.0.cmp(&b.0));
        notes
    }
}
