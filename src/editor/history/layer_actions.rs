//! Edits to the layer list. Layers are always named by UUID and resolved to an
//! index at apply time.

use std::collections::HashMap;

use uuid::Uuid;

use super::action::{ActionModels, Reversible};
use crate::map::{Layer, LayerKind, Location, Position};

/// Appends a new layer. The UUID is fixed at construction so later actions in
/// the same gesture can refer to it.
#[derive(Debug, Clone)]
pub struct AddLayerAction {
    layer_id: Uuid,
    name: String,
    visible: bool,
    kind: LayerKind,
}

impl AddLayerAction {
    pub fn new(name: impl Into<String>, visible: bool, kind: LayerKind) -> Self {
        Self {
            layer_id: Uuid::new_v4(),
            name: name.into(),
            visible,
            kind,
        }
    }

    pub fn layer_id(&self) -> Uuid {
        self.layer_id
    }
}

impl Reversible for AddLayerAction {
    fn redo(&mut self, models: &ActionModels<'_>) {
        let index = models.grid.add_layer_with_kind(self.layer_id, self.kind);
        models.grid.set_layer_name(index, self.name.clone());
        models.grid.set_layer_visible(index, self.visible);
    }

    fn undo(&mut self, models: &ActionModels<'_>) {
        let index = models.grid.resolve(self.layer_id);
        models.grid.delete_layer(index);
    }
}

#[derive(Debug, Clone)]
pub struct DeleteLayerAction {
    layer_id: Uuid,
    removed: Option<(Layer, usize)>,
}

impl DeleteLayerAction {
    pub fn new(layer_id: Uuid) -> Self {
        Self {
            layer_id,
            removed: None,
        }
    }
}

impl Reversible for DeleteLayerAction {
    fn redo(&mut self, models: &ActionModels<'_>) {
        let index = models.grid.resolve(self.layer_id);
        let layer = models.grid.delete_layer(index);
        self.removed = Some((layer, index));
    }

    fn undo(&mut self, models: &ActionModels<'_>) {
        let Some((layer, index)) = &self.removed else {
            panic!("undo of layer deletion {} before redo", self.layer_id);
        };
        let appended = models.grid.push_layer(layer.clone());
        models.grid.move_up(appended, appended - index);
    }
}

/// Moves a layer by `offset` user-visible positions; positive is towards the back.
#[derive(Debug, Clone)]
pub struct MoveLayerAction {
    offset: i32,
    layer_id: Uuid,
    old_index: usize,
}

impl MoveLayerAction {
    pub fn new(offset: i32, layer_id: Uuid) -> Self {
        Self {
            offset,
            layer_id,
            old_index: 0,
        }
    }
}

impl Reversible for MoveLayerAction {
    fn redo(&mut self, models: &ActionModels<'_>) {
        let index = models.grid.resolve(self.layer_id);
        self.old_index = index;

        let steps = self.offset.unsigned_abs() as usize;
        if self.offset > 0 {
            models.grid.move_down_without_system(index, steps);
        } else if self.offset < 0 {
            models.grid.move_up_without_system(index, steps);
        }
    }

    fn undo(&mut self, models: &ActionModels<'_>) {
        let index = models.grid.resolve(self.layer_id);
        if index > self.old_index {
            models.grid.move_up(index, index - self.old_index);
        } else if index < self.old_index {
            models.grid.move_down(index, self.old_index - index);
        }
    }
}

#[derive(Debug, Clone)]
pub struct ClearLayerAction {
    layer_id: Uuid,
    previous: HashMap<Position, Location>,
}

impl ClearLayerAction {
    pub fn new(layer_id: Uuid) -> Self {
        Self {
            layer_id,
            previous: HashMap::new(),
        }
    }
}

impl Reversible for ClearLayerAction {
    fn redo(&mut self, models: &ActionModels<'_>) {
        let index = models.grid.resolve(self.layer_id);
        self.previous = models.grid.locations(index);
        models.grid.clear_layer(index);
    }

    fn undo(&mut self, models: &ActionModels<'_>) {
        let index = models.grid.resolve(self.layer_id);
        models.grid.set_locations(index, self.previous.clone());
    }
}

#[derive(Debug, Clone)]
pub struct RenameLayerAction {
    layer_id: Uuid,
    name: String,
    old_name: String,
}

impl RenameLayerAction {
    pub fn new(layer_id: Uuid, name: impl Into<String>) -> Self {
        Self {
            layer_id,
            name: name.into(),
            old_name: String::new(),
        }
    }
}

impl Reversible for RenameLayerAction {
    fn redo(&mut self, models: &ActionModels<'_>) {
        let index = models.grid.resolve(self.layer_id);
        self.old_name = models.grid.layer_info(index).name;
        models.grid.set_layer_name(index, self.name.clone());
    }

    fn undo(&mut self, models: &ActionModels<'_>) {
        let index = models.grid.resolve(self.layer_id);
        models.grid.set_layer_name(index, self.old_name.clone());
    }
}

#[derive(Debug, Clone)]
pub struct SetLayerVisibleAction {
    layer_id: Uuid,
    visible: bool,
    old_visible: bool,
}

impl SetLayerVisibleAction {
    pub fn new(layer_id: Uuid, visible: bool) -> Self {
        Self {
            layer_id,
            visible,
            old_visible: visible,
        }
    }
}

impl Reversible for SetLayerVisibleAction {
    fn redo(&mut self, models: &ActionModels<'_>) {
        let index = models.grid.resolve(self.layer_id);
        self.old_visible = models.grid.layer_info(index).visible;
        models.grid.set_layer_visible(index, self.visible);
    }

    fn undo(&mut self, models: &ActionModels<'_>) {
        let index = models.grid.resolve(self.layer_id);
        models.grid.set_layer_visible(index, self.old_visible);
    }
}

/// Used when a Move layer has nothing below it to merge into.
#[derive(Debug, Clone)]
pub struct SetLayerKindAction {
    layer_id: Uuid,
    kind: LayerKind,
    old_kind: LayerKind,
}

impl SetLayerKindAction {
    pub fn new(layer_id: Uuid, kind: LayerKind) -> Self {
        Self {
            layer_id,
            kind,
            old_kind: kind,
        }
    }
}

impl Reversible for SetLayerKindAction {
    fn redo(&mut self, models: &ActionModels<'_>) {
        let index = models.grid.resolve(self.layer_id);
        self.old_kind = models.grid.layer_info(index).kind;
        models.grid.set_layer_kind(index, self.kind);
    }

    fn undo(&mut self, models: &ActionModels<'_>) {
        let index = models.grid.resolve(self.layer_id);
        models.grid.set_layer_kind(index, self.old_kind);
    }
}
