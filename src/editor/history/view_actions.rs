//! Edits to per-map view state: mode, selected layer, viewport center and angle.

use super::action::{ActionModels, Reversible};
use crate::editor::Mode;
use crate::map::Position;

#[derive(Debug, Clone)]
pub struct SetModeAction {
    mode: Mode,
    old_mode: Mode,
}

impl SetModeAction {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            old_mode: mode,
        }
    }
}

impl Reversible for SetModeAction {
    fn redo(&mut self, models: &ActionModels<'_>) {
        self.old_mode = models.mode.get();
        models.mode.set(self.mode);
    }

    fn undo(&mut self, models: &ActionModels<'_>) {
        models.mode.set(self.old_mode);
    }
}

#[derive(Debug, Clone)]
pub struct SetSelectedLayerAction {
    index: i32,
    old_index: i32,
}

impl SetSelectedLayerAction {
    pub fn new(index: i32) -> Self {
        Self {
            index,
            old_index: index,
        }
    }
}

impl Reversible for SetSelectedLayerAction {
    fn redo(&mut self, models: &ActionModels<'_>) {
        self.old_index = models.selected_layer.get();
        models.selected_layer.set(self.index);
    }

    fn undo(&mut self, models: &ActionModels<'_>) {
        models.selected_layer.set(self.old_index);
    }
}

/// Scrolls the viewport. A run of scrolls undoes back to where it started.
#[derive(Debug, Clone)]
pub struct SetCenterAction {
    pos: Position,
    old_pos: Position,
}

impl SetCenterAction {
    pub fn new(pos: Position) -> Self {
        Self {
            pos,
            old_pos: pos,
        }
    }
}

impl Reversible for SetCenterAction {
    fn redo(&mut self, models: &ActionModels<'_>) {
        self.old_pos = models.center.get();
        models.center.set(self.pos);
    }

    fn undo(&mut self, models: &ActionModels<'_>) {
        models.center.set(self.old_pos);
    }

    fn absorb(&mut self, next: &Self) -> bool {
        self.pos = next.pos;
        true
    }
}

/// A quarter turn of the view. Each direction undoes the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotateAction {
    Clockwise,
    Counterclockwise,
}

impl RotateAction {
    fn turn(self, models: &ActionModels<'_>) {
        match self {
            RotateAction::Clockwise => models.rotation.rotate_clockwise(),
            RotateAction::Counterclockwise => models.rotation.rotate_counterclockwise(),
        }
    }

    pub fn reversed(self) -> Self {
        match self {
            RotateAction::Clockwise => RotateAction::Counterclockwise,
            RotateAction::Counterclockwise => RotateAction::Clockwise,
        }
    }
}

impl Reversible for RotateAction {
    fn redo(&mut self, models: &ActionModels<'_>) {
        self.turn(models);
    }

    fn undo(&mut self, models: &ActionModels<'_>) {
        self.reversed().turn(models);
    }
}
