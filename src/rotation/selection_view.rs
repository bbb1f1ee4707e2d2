use super::RotationModel;
use crate::editor::{Selected, SelectionModel};
use crate::map::{GridModel, Position, Rect};

/// The selection model addressed in screen coordinates.
#[derive(Clone, Copy)]
pub struct RotatedSelection<'a> {
    selection: &'a SelectionModel,
    grid: &'a GridModel,
    rotation: &'a RotationModel,
}

impl<'a> RotatedSelection<'a> {
    pub fn new(
        selection: &'a SelectionModel,
        grid: &'a GridModel,
        rotation: &'a RotationModel,
    ) -> Self {
        Self {
            selection,
            grid,
            rotation,
        }
    }

    pub fn select_floor(&self, pos: Position) -> bool {
        self.selection
            .select_floor(self.rotation.to_canonical(pos), self.grid)
    }

    pub fn select_wall(&self, pos: Position, is_right: bool) -> bool {
        let (pos, is_right) = self.rotation.wall_side_to_canonical(pos, is_right);
        self.selection.select_wall(pos, is_right, self.grid)
    }

    pub fn unselect_floor(&self, pos: Position) {
        self.selection
            .unselect_floor(self.rotation.to_canonical(pos));
    }

    pub fn unselect_wall(&self, pos: Position, is_right: bool) {
        let (pos, is_right) = self.rotation.wall_side_to_canonical(pos, is_right);
        self.selection.unselect_wall(pos, is_right);
    }

    pub fn is_floor_selected(&self, pos: Position) -> bool {
        self.selection
            .is_floor_selected(self.rotation.to_canonical(pos))
    }

    pub fn is_wall_selected(&self, pos: Position, is_right: bool) -> bool {
        let (pos, is_right) = self.rotation.wall_side_to_canonical(pos, is_right);
        self.selection.is_wall_selected(pos, is_right)
    }

    /// Selection record of a screen cell, with walls named by their screen side.
    pub fn at(&self, pos: Position) -> Selected {
        let floor = self.selection.at(self.rotation.to_canonical(pos)).floor;
        let wall = |is_right| {
            let (pos, side) = self.rotation.wall_side_to_canonical(pos, is_right);
            self.selection.at(pos).wall(side)
        };

        Selected {
            floor,
            right_wall: wall(true),
            bottom_wall: wall(false),
        }
    }

    pub fn bounds(&self) -> Rect {
        self.rotation
            .angle()
            .rect_from_canonical(self.selection.bounds())
    }

    pub fn move_to(&self, offset: Position) {
        self.selection
            .move_to(self.rotation.to_canonical(offset));
    }
}
