//! Which floors and walls are selected, per canonical cell.
//!
//! Each selected element remembers the layer that owned the visible value when
//! it was selected. Cells with nothing selected are dropped.

use std::collections::HashMap;

use parking_lot::Mutex;
use uuid::Uuid;

use crate::map::{GridModel, Position, Rect};
use crate::signal::Signal;

/// Selection record of one cell. `None` means not selected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Selected {
    pub floor: Option<Uuid>,
    pub right_wall: Option<Uuid>,
    pub bottom_wall: Option<Uuid>,
}

impl Selected {
    pub fn is_empty(&self) -> bool {
        self.floor.is_none() && self.right_wall.is_none() && self.bottom_wall.is_none()
    }

    pub fn wall(&self, is_right: bool) -> Option<Uuid> {
        if is_right {
            self.right_wall
        } else {
            self.bottom_wall
        }
    }

    pub fn set_wall(&mut self, is_right: bool, owner: Option<Uuid>) {
        if is_right {
            self.right_wall = owner;
        } else {
            self.bottom_wall = owner;
        }
    }
}

/// The selected part of a map, in canonical coordinates.
#[derive(Debug, Default)]
pub struct SelectionModel {
    cells: Mutex<HashMap<Position, Selected>>,
    changed: Signal,
}

impl SelectionModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn changed(&self) -> &Signal {
        &self.changed
    }

    /// Selects the visible floor at `pos`. Returns false when there is none.
    pub fn select_floor(&self, pos: Position, grid: &GridModel) -> bool {
        let (owner, floor) = grid.visible_floor(pos);
        if floor == 0 {
            return false;
        }
        self.edit(pos, |cell| cell.floor = Some(owner));
        true
    }

    pub fn select_wall(&self, pos: Position, is_right: bool, grid: &GridModel) -> bool {
        let (owner, wall) = grid.visible_wall(pos, is_right);
        if wall == 0 {
            return false;
        }
        self.edit(pos, |cell| cell.set_wall(is_right, Some(owner)));
        true
    }

    pub fn unselect_floor(&self, pos: Position) {
        self.edit(pos, |cell| cell.floor = None);
    }

    pub fn unselect_wall(&self, pos: Position, is_right: bool) {
        self.edit(pos, |cell| cell.set_wall(is_right, None));
    }

    /// Puts back a floor owner captured earlier, `None` unselecting it.
    pub fn restore_floor(&self, pos: Position, owner: Option<Uuid>) {
        self.edit(pos, |cell| cell.floor = owner);
    }

    pub fn restore_wall(&self, pos: Position, is_right: bool, owner: Option<Uuid>) {
        self.edit(pos, |cell| cell.set_wall(is_right, owner));
    }

    pub fn unselect_all(&self) {
        let had_any = {
            let mut cells = self.cells.lock();
            let had_any = !cells.is_empty();
            cells.clear();
            had_any
        };
        if had_any {
            self.changed.notify();
        }
    }

    fn edit(&self, pos: Position, edit: impl FnOnce(&mut Selected)) {
        let changed = {
            let mut cells = self.cells.lock();
            let before = cells.get(&pos).copied().unwrap_or_default();
            let mut after = before;
            edit(&mut after);
            if after.is_empty() {
                cells.remove(&pos);
            } else {
                cells.insert(pos, after);
            }
            before != after
        };
        if changed {
            self.changed.notify();
        }
    }

    pub fn at(&self, pos: Position) -> Selected {
        self.cells.lock().get(&pos).copied().unwrap_or_default()
    }

    pub fn is_floor_selected(&self, pos: Position) -> bool {
        self.at(pos).floor.is_some()
    }

    pub fn is_wall_selected(&self, pos: Position, is_right: bool) -> bool {
        self.at(pos).wall(is_right).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.lock().is_empty()
    }

    pub fn len(&self) -> usize {
        self.cells.lock().len()
    }

    /// Bounding rectangle (exclusive max) of selected cells, or `Rect::EMPTY`.
    pub fn bounds(&self) -> Rect {
        Rect::enclosing(self.cells.lock().keys().copied())
    }

    /// Translates the whole selection.
    pub fn move_to(&self, offset: Position) {
        if offset == Position::ORIGIN {
            return;
        }
        {
            let mut cells = self.cells.lock();
            if cells.is_empty() {
                return;
            }
            *cells = std::mem::take(&mut *cells)
                .into_iter()
                .map(|(pos, sel)| (pos + offset, sel))
                .collect();
        }
        self.changed.notify();
    }

    pub fn selected(&self) -> HashMap<Position, Selected> {
        self.cells.lock().clone()
    }

    /// Replaces the selection wholesale. Empty records are dropped.
    pub fn set_selected(&self, mut selected: HashMap<Position, Selected>) {
        selected.retain(|_, sel| !sel.is_empty());
        {
            let mut cells = self.cells.lock();
            if *cells == selected {
                return;
            }
            *cells = selected;
        }
        self.changed.notify();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_with_floor(pos: Position, value: u32) -> (GridModel, Uuid) {
        let grid = GridModel::new();
        let id = Uuid::new_v4();
        grid.add_layer(id);
        grid.set_floor(pos, 0, value);
        (grid, id)
    }

    #[test]
    fn test_select_floor_records_owner() {
        let pos = Position::new(1, 1);
        let (grid, id) = grid_with_floor(pos, 3);
        let selection = SelectionModel::new();

        assert!(selection.select_floor(pos, &grid));
        assert_eq!(selection.at(pos).floor, Some(id));
        assert!(selection.is_floor_selected(pos));
    }

    #[test]
    fn test_select_nothing_visible_is_ignored() {
        let (grid, _) = grid_with_floor(Position::new(0, 0), 3);
        let selection = SelectionModel::new();

        assert!(!selection.select_floor(Position::new(5, 5), &grid));
        assert!(!selection.select_wall(Position::new(0, 0), true, &grid));
        assert!(selection.is_empty());
    }

    #[test]
    fn test_unselect_prunes_empty_records() {
        let pos = Position::new(0, 0);
        let (grid, _) = grid_with_floor(pos, 1);
        grid.set_wall(pos, 0, false, 2);
        let selection = SelectionModel::new();

        selection.select_floor(pos, &grid);
        selection.select_wall(pos, false, &grid);
        selection.unselect_floor(pos);
        assert_eq!(selection.len(), 1);

        selection.unselect_wall(pos, false);
        assert!(selection.is_empty());
    }

    #[test]
    fn test_bounds_and_move() {
        let selection = SelectionModel::new();
        let owner = Some(Uuid::new_v4());
        let mut cells = HashMap::new();
        cells.insert(
            Position::new(1, 2),
            Selected {
                floor: owner,
                ..Default::default()
            },
        );
        cells.insert(
            Position::new(3, 2),
            Selected {
                right_wall: owner,
                ..Default::default()
            },
        );
        selection.set_selected(cells);
        assert_eq!(
            selection.bounds(),
            Rect::new(Position::new(1, 2), Position::new(4, 3))
        );

        selection.move_to(Position::new(-1, 1));
        assert!(selection.is_floor_selected(Position::new(0, 3)));
        assert!(selection.is_wall_selected(Position::new(2, 3), true));
        assert_eq!(selection.len(), 2);
    }

    #[test]
    fn test_set_selected_drops_empty_records() {
        let selection = SelectionModel::new();
        let mut cells = HashMap::new();
        cells.insert(Position::new(0, 0), Selected::default());
        selection.set_selected(cells);
        assert!(selection.is_empty());
        assert_eq!(selection.bounds(), Rect::EMPTY);
    }
}
