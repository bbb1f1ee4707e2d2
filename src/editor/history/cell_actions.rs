//! Single-cell edits. Positions are in the screen frame of the moment the
//! action is applied.

use uuid::Uuid;

use super::action::{ActionModels, Reversible};
use crate::map::Position;

#[derive(Debug, Clone)]
pub struct SetFloorAction {
    pos: Position,
    layer_id: Uuid,
    value: u32,
    old_value: u32,
}

impl SetFloorAction {
    pub fn new(pos: Position, layer_id: Uuid, value: u32) -> Self {
        Self {
            pos,
            layer_id,
            value,
            old_value: 0,
        }
    }
}

impl Reversible for SetFloorAction {
    fn redo(&mut self, models: &ActionModels<'_>) {
        let index = models.grid.resolve(self.layer_id);
        let view = models.grid_view();
        self.old_value = view.floor(self.pos, index);
        view.set_floor(self.pos, index, self.value);
    }

    fn undo(&mut self, models: &ActionModels<'_>) {
        let index = models.grid.resolve(self.layer_id);
        models
            .grid_view()
            .set_floor(self.pos, index, self.old_value);
    }
}

#[derive(Debug, Clone)]
pub struct SetWallAction {
    pos: Position,
    layer_id: Uuid,
    is_right: bool,
    value: u32,
    old_value: u32,
}

impl SetWallAction {
    pub fn new(pos: Position, layer_id: Uuid, is_right: bool, value: u32) -> Self {
        Self {
            pos,
            layer_id,
            is_right,
            value,
            old_value: 0,
        }
    }
}

impl Reversible for SetWallAction {
    fn redo(&mut self, models: &ActionModels<'_>) {
        let index = models.grid.resolve(self.layer_id);
        let view = models.grid_view();
        self.old_value = view.wall(self.pos, index, self.is_right);
        view.set_wall(self.pos, index, self.is_right, self.value);
    }

    fn undo(&mut self, models: &ActionModels<'_>) {
        let index = models.grid.resolve(self.layer_id);
        models
            .grid_view()
            .set_wall(self.pos, index, self.is_right, self.old_value);
    }
}

#[derive(Debug, Clone)]
pub struct SetNoteIdAction {
    pos: Position,
    layer_id: Uuid,
    value: Option<String>,
    old_value: Option<String>,
}

impl SetNoteIdAction {
    pub fn new(pos: Position, layer_id: Uuid, value: Option<String>) -> Self {
        Self {
            pos,
            layer_id,
            value,
            old_value: None,
        }
    }
}

impl Reversible for SetNoteIdAction {
    fn redo(&mut self, models: &ActionModels<'_>) {
        let index = models.grid.resolve(self.layer_id);
        let view = models.grid_view();
        self.old_value = view.note_id(self.pos, index);
        view.set_note_id(self.pos, index, self.value.clone());
    }

    fn undo(&mut self, models: &ActionModels<'_>) {
        let index = models.grid.resolve(self.layer_id);
        models
            .grid_view()
            .set_note_id(self.pos, index, self.old_value.clone());
    }
}
