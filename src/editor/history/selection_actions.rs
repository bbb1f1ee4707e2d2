use std::collections::HashMap;

use uuid::Uuid;

use super::action::{ActionModels, Reversible};
use crate::editor::Selected;
use crate::map::Position;

/// Part of a cell a selection gesture picks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SelectElement {
    Floor,
    RightWall,
    BottomWall,
}

/// Selects one element of a screen cell through the rotated selection view.
///
/// Undo puts back the owner the element had before, so re-selecting an element
/// whose visible owner changed restores the earlier owner.
#[derive(Debug, Clone)]
pub struct SelectAction {
    pos: Position,
    element: SelectElement,
    previous: Option<(Position, Option<bool>, Option<Uuid>)>,
}

impl SelectAction {
    pub fn new(pos: Position, element: SelectElement) -> Self {
        Self {
            pos,
            element,
            previous: None,
        }
    }

    pub fn pos(&self) -> Position {
        self.pos
    }

    pub fn element(&self) -> SelectElement {
        self.element
    }

    /// Canonical cell and side (`None` for the floor) this action touches.
    fn canonical(&self, models: &ActionModels<'_>) -> (Position, Option<bool>) {
        match self.element {
            SelectElement::Floor => (models.rotation.to_canonical(self.pos), None),
            SelectElement::RightWall | SelectElement::BottomWall => {
                let is_right = self.element == SelectElement::RightWall;
                let (pos, side) = models.rotation.wall_side_to_canonical(self.pos, is_right);
                (pos, Some(side))
            }
        }
    }
}

impl Reversible for SelectAction {
    fn redo(&mut self, models: &ActionModels<'_>) {
        let (canonical, side) = self.canonical(models);
        let before = models.selection.at(canonical);
        let owner = match side {
            None => before.floor,
            Some(is_right) => before.wall(is_right),
        };
        self.previous = Some((canonical, side, owner));

        match side {
            None => models.selection.select_floor(canonical, models.grid),
            Some(is_right) => models.selection.select_wall(canonical, is_right, models.grid),
        };
    }

    fn undo(&mut self, models: &ActionModels<'_>) {
        let Some((canonical, side, owner)) = self.previous else {
            panic!("SelectAction undone before it was redone");
        };
        match side {
            None => models.selection.restore_floor(canonical, owner),
            Some(is_right) => models.selection.restore_wall(canonical, is_right, owner),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct UnselectAllAction {
    previous: HashMap<Position, Selected>,
}

impl UnselectAllAction {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Reversible for UnselectAllAction {
    fn redo(&mut self, models: &ActionModels<'_>) {
        self.previous = models.selection.selected();
        models.selection.unselect_all();
    }

    fn undo(&mut self, models: &ActionModels<'_>) {
        models.selection.set_selected(self.previous.clone());
    }
}

/// Replaces the selection with canonical-frame records.
#[derive(Debug, Clone)]
pub struct SetSelectedAction {
    selected: HashMap<Position, Selected>,
    previous: HashMap<Position, Selected>,
}

impl SetSelectedAction {
    pub fn new(selected: HashMap<Position, Selected>) -> Self {
        Self {
            selected,
            previous: HashMap::new(),
        }
    }
}

impl Reversible for SetSelectedAction {
    fn redo(&mut self, models: &ActionModels<'_>) {
        self.previous = models.selection.selected();
        models.selection.set_selected(self.selected.clone());
    }

    fn undo(&mut self, models: &ActionModels<'_>) {
        models.selection.set_selected(self.previous.clone());
    }
}

/// Drags the Move layer and the selection together by a screen-frame offset.
///
/// Consecutive drags of the same layer collapse into one step.
#[derive(Debug, Clone)]
pub struct MoveToSelectedAction {
    move_layer_id: Uuid,
    offset: Position,
}

impl MoveToSelectedAction {
    pub fn new(move_layer_id: Uuid, offset: Position) -> Self {
        Self {
            move_layer_id,
            offset,
        }
    }

    pub fn offset(&self) -> Position {
        self.offset
    }

    fn shift(&self, models: &ActionModels<'_>, offset: Position) {
        let index = models.grid.resolve(self.move_layer_id);
        models.grid_view().move_to(index, offset);
        models.selection_view().move_to(offset);
    }
}

impl Reversible for MoveToSelectedAction {
    fn redo(&mut self, models: &ActionModels<'_>) {
        self.shift(models, self.offset);
    }

    fn undo(&mut self, models: &ActionModels<'_>) {
        self.shift(models, -self.offset);
    }

    fn absorb(&mut self, next: &Self) -> bool {
        if next.move_layer_id != self.move_layer_id {
            return false;
        }
        self.offset = self.offset + next.offset;
        true
    }
}
