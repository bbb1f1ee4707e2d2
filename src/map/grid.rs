//! Layered sparse tile storage for one map.
//!
//! Layers live in an arena keyed by their UUID, with a separate order vector.
//! Every operation that takes a layer index treats an out-of-range index as a
//! caller bug and panics; callers resolve the index from a UUID right before the
//! call and never keep it across another mutation.

use std::collections::HashMap;

use parking_lot::Mutex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

use super::layer::{Layer, LayerInfo, LayerKind};
use super::location::Location;
use super::position::{Position, Rect};
use crate::signal::Signal;

/// Payload of the move-layer notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerMove {
    pub from: usize,
    pub to: usize,
}

#[derive(Debug, Default)]
struct GridState {
    slots: HashMap<Uuid, Layer>,
    order: Vec<Uuid>,
}

impl GridState {
    fn id_at(&self, index: usize) -> Uuid {
        match self.order.get(index) {
            Some(id) => *id,
            None => panic!(
                "layer index {index} out of range for a map with {} layers",
                self.order.len()
            ),
        }
    }

    fn layer(&self, index: usize) -> &Layer {
        let id = self.id_at(index);
        &self.slots[&id]
    }

    fn layer_mut(&mut self, index: usize) -> &mut Layer {
        let id = self.id_at(index);
        self.slots
            .get_mut(&id)
            .unwrap_or_else(|| panic!("layer {id} is ordered but has no slot"))
    }

    fn layers(&self) -> impl Iterator<Item = &Layer> {
        self.order.iter().map(|id| &self.slots[id])
    }

    fn index_of(&self, id: Uuid) -> Option<usize> {
        self.order.iter().position(|other| *other == id)
    }

    fn push(&mut self, layer: Layer) -> usize {
        let id = layer.id();
        assert!(
            !self.slots.contains_key(&id),
            "layer {id} is already part of the map"
        );
        self.slots.insert(id, layer);
        self.order.push(id);
        self.order.len() - 1
    }

    /// Target index of moving `index` up by `offset`, if that moves anything.
    fn move_up_target(&self, index: usize, offset: usize) -> Option<usize> {
        if index >= self.order.len() {
            return None;
        }
        let offset = offset.min(index);
        (offset != 0).then(|| index - offset)
    }

    fn move_down_target(&self, index: usize, offset: usize) -> Option<usize> {
        if index >= self.order.len() {
            return None;
        }
        let offset = offset.min(self.order.len() - index - 1);
        (offset != 0).then(|| index + offset)
    }

    /// Walks towards the front counting only non-system layers.
    fn move_up_target_without_system(&self, index: usize, offset: usize) -> Option<usize> {
        if offset == 0 || index >= self.order.len() {
            return None;
        }

        let mut remaining = offset;
        let mut target = 0;
        for i in (0..index).rev() {
            if !self.layer(i).info.kind.is_system() {
                remaining -= 1;
                if remaining == 0 {
                    target = i;
                    break;
                }
            }
        }

        self.move_up_target(index, index - target)
    }

    fn move_down_target_without_system(&self, index: usize, offset: usize) -> Option<usize> {
        if offset == 0 || index >= self.order.len() {
            return None;
        }

        let mut remaining = offset;
        let mut target = self.order.len() - 1;
        for i in index + 1..self.order.len() {
            if !self.layer(i).info.kind.is_system() {
                remaining -= 1;
                if remaining == 0 {
                    target = i;
                    break;
                }
            }
        }

        self.move_down_target(index, target - index)
    }
}

/// The layers of one map, front (index 0) to back.
#[derive(Debug, Default)]
pub struct GridModel {
    state: Mutex<GridState>,
    changed: Signal,
    before_delete_layer: Signal<usize>,
    after_delete_layer: Signal<usize>,
    before_move_layer: Signal<LayerMove>,
    after_move_layer: Signal<LayerMove>,
}

impl GridModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a model from ordered layers, dropping empty cells.
    ///
    /// A repeated UUID gets a fresh one so the arena stays consistent.
    pub fn from_layers(layers: impl IntoIterator<Item = Layer>) -> Self {
        let mut state = GridState::default();
        for mut layer in layers {
            if state.slots.contains_key(&layer.id()) {
                let fresh = Uuid::new_v4();
                tracing::warn!("Duplicate layer id {}, replacing with {}", layer.id(), fresh);
                layer.info.id = fresh;
            }
            layer.prune_empty();
            state.push(layer);
        }

        Self {
            state: Mutex::new(state),
            ..Default::default()
        }
    }

    // Notifications

    pub fn changed(&self) -> &Signal {
        &self.changed
    }

    /// Fired with the index about to be removed, before anything shifts.
    pub fn before_delete_layer(&self) -> &Signal<usize> {
        &self.before_delete_layer
    }

    pub fn after_delete_layer(&self) -> &Signal<usize> {
        &self.after_delete_layer
    }

    pub fn before_move_layer(&self) -> &Signal<LayerMove> {
        &self.before_move_layer
    }

    pub fn after_move_layer(&self) -> &Signal<LayerMove> {
        &self.after_move_layer
    }

    // Layer list

    pub fn len(&self) -> usize {
        self.state.lock().order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().order.is_empty()
    }

    pub fn len_without_system(&self) -> usize {
        self.state
            .lock()
            .layers()
            .filter(|l| !l.info.kind.is_system())
            .count()
    }

    pub fn layer(&self, index: usize) -> Layer {
        self.state.lock().layer(index).clone()
    }

    /// All layers in order, cloned.
    pub fn snapshot(&self) -> Vec<Layer> {
        self.state.lock().layers().cloned().collect()
    }

    pub fn layer_info(&self, index: usize) -> LayerInfo {
        self.state.lock().layer(index).info.clone()
    }

    pub fn layer_infos(&self) -> Vec<LayerInfo> {
        self.state.lock().layers().map(|l| l.info.clone()).collect()
    }

    pub fn layer_id(&self, index: usize) -> Uuid {
        self.state.lock().id_at(index)
    }

    pub fn layer_index_by_id(&self, id: Uuid) -> Option<usize> {
        self.state.lock().index_of(id)
    }

    /// Index of a layer that must exist.
    ///
    /// # Panics
    /// If no layer has this id.
    pub fn resolve(&self, id: Uuid) -> usize {
        self.layer_index_by_id(id)
            .unwrap_or_else(|| panic!("layer {id} is not part of the map"))
    }

    pub fn layer_index_by_name(&self, name: &str, kind: LayerKind) -> Option<usize> {
        self.state
            .lock()
            .layers()
            .position(|l| l.info.name == name && l.info.kind == kind)
    }

    pub fn layer_indices_by_kind(&self, kind: LayerKind) -> Vec<usize> {
        self.state
            .lock()
            .layers()
            .enumerate()
            .filter(|(_, l)| l.info.kind == kind)
            .map(|(i, _)| i)
            .collect()
    }

    pub fn has_visible_layer(&self) -> bool {
        self.state.lock().layers().any(|l| l.info.visible)
    }

    /// Position among non-system layers of the `index`-th non-system layer's full index.
    pub fn index_with_system(&self, index_without_system: usize) -> Option<usize> {
        self.state
            .lock()
            .layers()
            .enumerate()
            .filter(|(_, l)| !l.info.kind.is_system())
            .nth(index_without_system)
            .map(|(i, _)| i)
    }

    /// Inverse of [`Self::index_with_system`]; `None` for system layers.
    pub fn index_without_system(&self, index: usize) -> Option<usize> {
        let state = self.state.lock();
        let layer = state.layers().nth(index)?;
        if layer.info.kind.is_system() {
            return None;
        }
        Some(
            state
                .layers()
                .take(index)
                .filter(|l| !l.info.kind.is_system())
                .count(),
        )
    }

    pub fn add_layer(&self, id: Uuid) -> usize {
        self.add_layer_with_kind(id, LayerKind::Regular)
    }

    pub fn add_layer_with_kind(&self, id: Uuid, kind: LayerKind) -> usize {
        self.push_layer(Layer::new(id, kind))
    }

    /// Appends an existing layer, keeping its id and cells.
    pub fn push_layer(&self, layer: Layer) -> usize {
        let index = self.state.lock().push(layer);
        self.changed.notify();
        index
    }

    pub fn delete_layer(&self, index: usize) -> Layer {
        // Bad indices fail before any listener runs.
        let _ = self.state.lock().id_at(index);
        self.before_delete_layer.emit(&index);

        let removed = {
            let mut state = self.state.lock();
            let id = state.order.remove(index);
            state
                .slots
                .remove(&id)
                .unwrap_or_else(|| panic!("layer {id} is ordered but has no slot"))
        };

        self.after_delete_layer.emit(&index);
        self.changed.notify();
        removed
    }

    pub fn clear_layer(&self, index: usize) {
        self.state.lock().layer_mut(index).locations.clear();
        self.changed.notify();
    }

    pub fn move_up(&self, index: usize, offset: usize) {
        let target = self.state.lock().move_up_target(index, offset);
        self.move_layer_to(index, target);
    }

    pub fn move_down(&self, index: usize, offset: usize) {
        let target = self.state.lock().move_down_target(index, offset);
        self.move_layer_to(index, target);
    }

    /// Moves up by `offset` user-visible layers, stepping over system layers.
    pub fn move_up_without_system(&self, index: usize, offset: usize) {
        let target = self
            .state
            .lock()
            .move_up_target_without_system(index, offset);
        self.move_layer_to(index, target);
    }

    pub fn move_down_without_system(&self, index: usize, offset: usize) {
        let target = self
            .state
            .lock()
            .move_down_target_without_system(index, offset);
        self.move_layer_to(index, target);
    }

    fn move_layer_to(&self, from: usize, to: Option<usize>) {
        let Some(to) = to else {
            return;
        };

        let moved = LayerMove { from, to };
        self.before_move_layer.emit(&moved);
        {
            let mut state = self.state.lock();
            let id = state.order.remove(from);
            state.order.insert(to, id);
        }
        self.after_move_layer.emit(&moved);
        self.changed.notify();
    }

    pub fn set_layer_name(&self, index: usize, name: impl Into<String>) {
        let name = name.into();
        let changed = {
            let mut state = self.state.lock();
            let info = &mut state.layer_mut(index).info;
            let changed = info.name != name;
            info.name = name;
            changed
        };
        if changed {
            self.changed.notify();
        }
    }

    pub fn set_layer_visible(&self, index: usize, visible: bool) {
        let changed = {
            let mut state = self.state.lock();
            let info = &mut state.layer_mut(index).info;
            let changed = info.visible != visible;
            info.visible = visible;
            changed
        };
        if changed {
            self.changed.notify();
        }
    }

    pub fn set_layer_kind(&self, index: usize, kind: LayerKind) {
        let changed = {
            let mut state = self.state.lock();
            let info = &mut state.layer_mut(index).info;
            let changed = info.kind != kind;
            info.kind = kind;
            changed
        };
        if changed {
            self.changed.notify();
        }
    }

    // Cells

    pub fn location(&self, pos: Position, index: usize) -> Option<Location> {
        self.state.lock().layer(index).location(pos).cloned()
    }

    pub fn locations(&self, index: usize) -> HashMap<Position, Location> {
        self.state.lock().layer(index).locations.clone()
    }

    /// Replaces all cells of a layer. Empty locations are dropped.
    pub fn set_locations(&self, index: usize, locations: HashMap<Position, Location>) {
        {
            let mut state = self.state.lock();
            let layer = state.layer_mut(index);
            layer.locations = locations;
            layer.prune_empty();
        }
        self.changed.notify();
    }

    pub fn floor(&self, pos: Position, index: usize) -> u32 {
        self.state
            .lock()
            .layer(index)
            .location(pos)
            .map_or(0, |l| l.floor)
    }

    pub fn set_floor(&self, pos: Position, index: usize, value: u32) {
        self.edit(pos, index, value != 0, |loc| {
            let changed = loc.floor != value;
            loc.floor = value;
            changed
        });
    }

    pub fn wall(&self, pos: Position, index: usize, is_right: bool) -> u32 {
        self.state
            .lock()
            .layer(index)
            .location(pos)
            .map_or(0, |l| l.wall(is_right))
    }

    pub fn set_wall(&self, pos: Position, index: usize, is_right: bool, value: u32) {
        self.edit(pos, index, value != 0, |loc| {
            let changed = loc.wall(is_right) != value;
            loc.set_wall(is_right, value);
            changed
        });
    }

    pub fn note_id(&self, pos: Position, index: usize) -> Option<String> {
        self.state
            .lock()
            .layer(index)
            .location(pos)
            .and_then(|l| l.note_id.clone())
    }

    /// An empty string clears the note like `None` does.
    pub fn set_note_id(&self, pos: Position, index: usize, value: Option<String>) {
        let value = value.filter(|v| !v.is_empty());
        self.edit(pos, index, value.is_some(), |loc| {
            let changed = loc.note_id != value;
            loc.note_id = value;
            changed
        });
    }

    fn edit(
        &self,
        pos: Position,
        index: usize,
        creates: bool,
        edit: impl FnOnce(&mut Location) -> bool,
    ) {
        let mut changed = false;
        self.state
            .lock()
            .layer_mut(index)
            .edit_location(pos, creates, |loc| changed = edit(loc));
        if changed {
            self.changed.notify();
        }
    }

    /// First non-empty floor among visible layers, front to back.
    ///
    /// Returns `(Uuid::nil(), 0)` when nothing is found.
    pub fn visible_floor(&self, pos: Position) -> (Uuid, u32) {
        self.visible(pos, |l| (l.floor != 0).then_some(l.floor))
            .unwrap_or((Uuid::nil(), 0))
    }

    pub fn visible_wall(&self, pos: Position, is_right: bool) -> (Uuid, u32) {
        self.visible(pos, |l| {
            let wall = l.wall(is_right);
            (wall != 0).then_some(wall)
        })
        .unwrap_or((Uuid::nil(), 0))
    }

    pub fn visible_note_id(&self, pos: Position) -> (Uuid, Option<String>) {
        self.visible(pos, |l| l.note_id.clone())
            .map_or((Uuid::nil(), None), |(id, note)| (id, Some(note)))
    }

    fn visible<T>(&self, pos: Position, pick: impl Fn(&Location) -> Option<T>) -> Option<(Uuid, T)> {
        self.state
            .lock()
            .layers()
            .filter(|l| l.info.visible)
            .find_map(|l| l.location(pos).and_then(&pick).map(|v| (l.id(), v)))
    }

    /// Bounding rectangle (exclusive max) of the layer's cells, or `Rect::EMPTY`.
    pub fn bounds(&self, index: usize) -> Rect {
        Rect::enclosing(self.state.lock().layer(index).locations.keys().copied())
    }

    /// Translates every cell of the layer by `offset`.
    pub fn move_to(&self, index: usize, offset: Position) {
        if offset == Position::ORIGIN {
            return;
        }

        {
            let mut state = self.state.lock();
            let layer = state.layer_mut(index);
            if layer.locations.is_empty() {
                return;
            }
            layer.locations = std::mem::take(&mut layer.locations)
                .into_iter()
                .map(|(pos, loc)| (pos + offset, loc))
                .collect();
        }
        self.changed.notify();
    }
}

#[derive(Serialize)]
struct GridRecordRef<'a> {
    layers: Vec<&'a Layer>,
}

#[derive(Deserialize)]
struct GridRecord {
    #[serde(default)]
    layers: Vec<Layer>,
}

impl Serialize for GridModel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let state = self.state.lock();
        GridRecordRef {
            layers: state.layers().collect(),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for GridModel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let record = GridRecord::deserialize(deserializer)?;
        Ok(GridModel::from_layers(record.layers))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn grid_with(kinds: &[LayerKind]) -> (GridModel, Vec<Uuid>) {
        let grid = GridModel::new();
        let ids: Vec<Uuid> = kinds
            .iter()
            .map(|kind| {
                let id = Uuid::new_v4();
                grid.add_layer_with_kind(id, *kind);
                id
            })
            .collect();
        (grid, ids)
    }

    fn order(grid: &GridModel) -> Vec<Uuid> {
        grid.layer_infos().into_iter().map(|i| i.id).collect()
    }

    #[test]
    fn test_set_floor_and_prune() {
        let (grid, _) = grid_with(&[LayerKind::Regular]);
        let pos = Position::new(2, 3);

        grid.set_floor(pos, 0, 7);
        assert_eq!(grid.floor(pos, 0), 7);

        grid.set_floor(pos, 0, 0);
        assert!(grid.location(pos, 0).is_none());
        assert!(grid.locations(0).is_empty());
    }

    #[test]
    fn test_zero_write_does_not_create_cell() {
        let (grid, _) = grid_with(&[LayerKind::Regular]);
        grid.set_wall(Position::new(0, 0), 0, true, 0);
        grid.set_note_id(Position::new(0, 0), 0, Some(String::new()));
        assert!(grid.locations(0).is_empty());
    }

    #[test]
    fn test_cell_survives_while_any_field_is_set() {
        let (grid, _) = grid_with(&[LayerKind::Regular]);
        let pos = Position::new(0, 0);
        grid.set_floor(pos, 0, 1);
        grid.set_wall(pos, 0, false, 2);
        grid.set_floor(pos, 0, 0);

        let loc = grid.location(pos, 0).unwrap();
        assert_eq!(loc.bottom_wall, 2);
        grid.set_wall(pos, 0, false, 0);
        assert!(grid.location(pos, 0).is_none());
    }

    #[test]
    fn test_visible_scans_front_to_back() {
        let (grid, ids) = grid_with(&[LayerKind::Regular, LayerKind::Regular]);
        let pos = Position::new(1, 1);
        grid.set_floor(pos, 1, 4);
        assert_eq!(grid.visible_floor(pos), (ids[1], 4));

        grid.set_floor(pos, 0, 9);
        assert_eq!(grid.visible_floor(pos), (ids[0], 9));

        grid.set_layer_visible(0, false);
        assert_eq!(grid.visible_floor(pos), (ids[1], 4));
    }

    #[test]
    fn test_visible_nothing_found() {
        let grid = GridModel::new();
        assert_eq!(grid.visible_floor(Position::ORIGIN), (Uuid::nil(), 0));

        let (grid, _) = grid_with(&[LayerKind::Regular]);
        assert_eq!(grid.visible_wall(Position::ORIGIN, true), (Uuid::nil(), 0));
        assert_eq!(grid.visible_note_id(Position::ORIGIN), (Uuid::nil(), None));
    }

    #[test]
    fn test_bounds_minimal_and_exclusive() {
        let (grid, _) = grid_with(&[LayerKind::Regular]);
        assert_eq!(grid.bounds(0), Rect::EMPTY);

        grid.set_floor(Position::new(-2, 1), 0, 1);
        grid.set_wall(Position::new(3, 4), 0, true, 1);
        assert_eq!(
            grid.bounds(0),
            Rect::new(Position::new(-2, 1), Position::new(4, 5))
        );
    }

    #[test]
    fn test_move_to_translates_only_existing_cells() {
        let (grid, _) = grid_with(&[LayerKind::Regular]);
        grid.set_floor(Position::new(0, 0), 0, 1);
        grid.set_floor(Position::new(2, 2), 0, 2);

        grid.move_to(0, Position::new(1, -1));

        let locations = grid.locations(0);
        assert_eq!(locations.len(), 2);
        assert_eq!(grid.floor(Position::new(1, -1), 0), 1);
        assert_eq!(grid.floor(Position::new(3, 1), 0), 2);
    }

    #[test]
    fn test_move_up_down_clamp() {
        let (grid, ids) = grid_with(&[LayerKind::Regular; 3]);

        grid.move_up(2, 10);
        assert_eq!(order(&grid), vec![ids[2], ids[0], ids[1]]);

        grid.move_down(0, 1);
        assert_eq!(order(&grid), vec![ids[0], ids[2], ids[1]]);

        grid.move_down(2, 5);
        assert_eq!(order(&grid), vec![ids[0], ids[2], ids[1]]);
    }

    #[test]
    fn test_move_without_system_skips_system_layers() {
        let (grid, ids) = grid_with(&[
            LayerKind::Regular,
            LayerKind::System,
            LayerKind::Regular,
        ]);

        grid.move_up_without_system(2, 1);
        assert_eq!(order(&grid), vec![ids[2], ids[0], ids[1]]);

        grid.move_down_without_system(0, 1);
        assert_eq!(order(&grid), vec![ids[0], ids[2], ids[1]]);
    }

    #[test]
    fn test_move_without_system_zero_offset_is_noop() {
        let (grid, ids) = grid_with(&[LayerKind::Regular, LayerKind::Regular]);
        grid.move_up_without_system(1, 0);
        assert_eq!(order(&grid), ids);
    }

    #[test]
    fn test_index_conversions() {
        let (grid, _) = grid_with(&[
            LayerKind::System,
            LayerKind::Regular,
            LayerKind::System,
            LayerKind::Regular,
        ]);

        assert_eq!(grid.len_without_system(), 2);
        assert_eq!(grid.index_with_system(0), Some(1));
        assert_eq!(grid.index_with_system(1), Some(3));
        assert_eq!(grid.index_with_system(2), None);
        assert_eq!(grid.index_without_system(3), Some(1));
        assert_eq!(grid.index_without_system(2), None);
        assert_eq!(grid.index_without_system(9), None);
    }

    #[test]
    fn test_delete_notifies_around_mutation() {
        let (grid, ids) = grid_with(&[LayerKind::Regular, LayerKind::Regular]);
        let grid = Arc::new(grid);
        let seen = Arc::new(Mutex::new(Vec::new()));

        {
            let seen = Arc::clone(&seen);
            let g = Arc::clone(&grid);
            grid.before_delete_layer()
                .connect(move |index| seen.lock().push(("before", *index, g.len())));
        }
        {
            let seen = Arc::clone(&seen);
            let g = Arc::clone(&grid);
            grid.after_delete_layer()
                .connect(move |index| seen.lock().push(("after", *index, g.len())));
        }

        let removed = grid.delete_layer(0);
        assert_eq!(removed.id(), ids[0]);
        assert_eq!(*seen.lock(), vec![("before", 0, 2), ("after", 0, 1)]);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_out_of_range_index_panics() {
        let grid = GridModel::new();
        grid.set_floor(Position::ORIGIN, 0, 1);
    }

    #[test]
    fn test_json_shape() {
        let (grid, ids) = grid_with(&[LayerKind::Regular]);
        grid.set_layer_name(0, "Ground");
        grid.set_floor(Position::new(1, 2), 0, 5);

        let value = serde_json::to_value(&grid).unwrap();
        let layer = &value["layers"][0];
        assert_eq!(layer["info"]["uuid"], serde_json::json!(ids[0].to_string()));
        assert_eq!(layer["info"]["name"], "Ground");
        assert_eq!(layer["locations"]["(1,2)"], serde_json::json!({"floor": 5}));
    }

    #[test]
    fn test_deserialize_drops_empty_cells() {
        let id = Uuid::new_v4();
        let json = format!(
            r#"{{"layers":[{{"info":{{"uuid":"{id}","name":"a","visible":true,"system":false}},
            "locations":{{"(0,0)":{{}},"(1,0)":{{"floor":2}}}}}}]}}"#
        );
        let grid: GridModel = serde_json::from_str(&json).unwrap();
        assert_eq!(grid.locations(0).len(), 1);
        assert_eq!(grid.layer_id(0), id);
    }
}
