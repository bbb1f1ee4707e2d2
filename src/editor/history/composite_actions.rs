//! Actions whose first `redo` decides a sequence of leaf actions from the
//! current grid contents.
//!
//! The sequence is kept after that first run. Every later `redo` replays it
//! and `undo` reverses it, because recomputing against a grid that already
//! holds the result would produce a different sequence.

use std::collections::HashMap;

use uuid::Uuid;

use super::action::{Action, ActionModels, Reversible};
use super::cell_actions::{SetFloorAction, SetNoteIdAction, SetWallAction};
use super::container::ActionContainer;
use super::layer_actions::{AddLayerAction, DeleteLayerAction, MoveLayerAction, SetLayerKindAction};
use super::selection_actions::{SetSelectedAction, UnselectAllAction};
use super::view_actions::{SetModeAction, SetSelectedLayerAction};
use crate::constants::PASTED_LAYER_NAME;
use crate::editor::clipboard::CopyResult;
use crate::editor::{Mode, Selected};
use crate::map::{GridModel, LayerKind, Position};

macro_rules! step_kinds {
    ($(#[$meta:meta])* $name:ident { $($variant:ident($ty:ty)),* $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug)]
        pub enum $name {
            $($variant($ty),)*
        }

        $(
            impl From<$ty> for $name {
                fn from(action: $ty) -> Self {
                    $name::$variant(action)
                }
            }
        )*

        impl Reversible for $name {
            fn redo(&mut self, models: &ActionModels<'_>) {
                match self {
                    $($name::$variant(action) => action.redo(models),)*
                }
            }

            fn undo(&mut self, models: &ActionModels<'_>) {
                match self {
                    $($name::$variant(action) => action.undo(models),)*
                }
            }
        }
    };
}

step_kinds! {
    /// What a merge is allowed to record.
    MergeStep {
        SetFloor(SetFloorAction),
        SetWall(SetWallAction),
        SetNoteId(SetNoteIdAction),
        DeleteLayer(DeleteLayerAction),
    }
}

step_kinds! {
    /// What a cut is allowed to record.
    CutStep {
        UnselectAll(UnselectAllAction),
        SetFloor(SetFloorAction),
        SetWall(SetWallAction),
    }
}

/// Runs `build` once to fill `steps`, then only replays.
fn replay_or_build<S: Reversible>(
    steps: &mut Option<ActionContainer<S>>,
    models: &ActionModels<'_>,
    build: impl FnOnce(&mut ActionContainer<S>),
) {
    match steps {
        Some(steps) => steps.redo(models),
        None => {
            let mut built = ActionContainer::new();
            build(&mut built);
            *steps = Some(built);
        }
    }
}

fn undo_steps<S: Reversible>(steps: &mut Option<ActionContainer<S>>, models: &ActionModels<'_>) {
    match steps {
        Some(steps) => steps.undo(models),
        None => panic!("undo of a composite action before its first redo"),
    }
}

/// Copies every floor, wall and note reference of `from` onto `to`, then
/// deletes `from`. Values from `from` win where both layers have one.
#[derive(Debug)]
pub struct MergeLayersAction {
    from: Uuid,
    to: Uuid,
    steps: Option<ActionContainer<MergeStep>>,
}

impl MergeLayersAction {
    pub fn new(from: Uuid, to: Uuid) -> Self {
        assert_ne!(from, to, "cannot merge layer {from} into itself");
        Self {
            from,
            to,
            steps: None,
        }
    }
}

impl Reversible for MergeLayersAction {
    fn redo(&mut self, models: &ActionModels<'_>) {
        let (from, to) = (self.from, self.to);
        replay_or_build(&mut self.steps, models, |steps| {
            let view = models.grid_view();
            let index = models.grid.resolve(from);

            for (pos, value) in view.floors(index) {
                steps.apply(SetFloorAction::new(pos, to, value), models);
            }
            for (pos, is_right, value) in view.walls(index) {
                steps.apply(SetWallAction::new(pos, to, is_right, value), models);
            }
            for (pos, note_id) in view.note_ids(index) {
                steps.apply(SetNoteIdAction::new(pos, to, Some(note_id)), models);
            }
            steps.apply(DeleteLayerAction::new(from), models);
        });
    }

    fn undo(&mut self, models: &ActionModels<'_>) {
        undo_steps(&mut self.steps, models);
    }
}

/// First non-system layer behind `index`.
fn layer_below(grid: &GridModel, index: usize) -> Option<usize> {
    (index + 1..grid.len()).find(|i| !grid.layer_info(*i).kind.is_system())
}

/// Merges a layer into the next user-visible layer behind it.
#[derive(Debug)]
pub struct MergeLayerDownAction {
    from: Uuid,
    merge: Option<MergeLayersAction>,
}

impl MergeLayerDownAction {
    pub fn new(from: Uuid) -> Self {
        Self { from, merge: None }
    }
}

impl Reversible for MergeLayerDownAction {
    fn redo(&mut self, models: &ActionModels<'_>) {
        let merge = self.merge.get_or_insert_with(|| {
            let index = models.grid.resolve(self.from);
            let Some(below) = layer_below(models.grid, index) else {
                panic!("layer {} has no layer below to merge into", self.from);
            };
            MergeLayersAction::new(self.from, models.grid.layer_id(below))
        });
        merge.redo(models);
    }

    fn undo(&mut self, models: &ActionModels<'_>) {
        match &mut self.merge {
            Some(merge) => merge.undo(models),
            None => panic!("undo of merge-down of {} before redo", self.from),
        }
    }
}

/// Leaves Move mode for `mode`, committing the Move layer if there is one.
///
/// An empty Move layer is deleted. One with nothing behind it becomes a
/// regular layer. Otherwise it is merged down. The layer that now holds the
/// content ends up selected.
#[derive(Debug)]
pub struct SetModeAndMergeDownMoveLayerAction {
    mode: Mode,
    steps: Option<ActionContainer<Action>>,
}

impl SetModeAndMergeDownMoveLayerAction {
    pub fn new(mode: Mode) -> Self {
        Self { mode, steps: None }
    }
}

impl Reversible for SetModeAndMergeDownMoveLayerAction {
    fn redo(&mut self, models: &ActionModels<'_>) {
        let mode = self.mode;
        replay_or_build(&mut self.steps, models, |steps| {
            let grid = models.grid;
            if let Some(&index) = grid.layer_indices_by_kind(LayerKind::Move).first() {
                let id = grid.layer_id(index);
                if grid.bounds(index).is_empty() {
                    steps.apply(DeleteLayerAction::new(id), models);
                } else if layer_below(grid, index).is_none() {
                    steps.apply(SetLayerKindAction::new(id, LayerKind::Regular), models);
                } else {
                    steps.apply(MergeLayerDownAction::new(id), models);
                }

                let selected = if index < grid.len() {
                    index as i32
                } else {
                    grid.len() as i32 - 1
                };
                steps.apply(SetSelectedLayerAction::new(selected), models);
            }

            if models.mode.get() != mode {
                steps.apply(SetModeAction::new(mode), models);
            }
        });
    }

    fn undo(&mut self, models: &ActionModels<'_>) {
        undo_steps(&mut self.steps, models);
    }
}

/// Clears the copied cells from their layer and drops the selection.
#[derive(Debug)]
pub struct CutAction {
    copy: CopyResult,
    steps: Option<ActionContainer<CutStep>>,
}

impl CutAction {
    pub fn new(copy: CopyResult) -> Self {
        Self { copy, steps: None }
    }
}

impl Reversible for CutAction {
    fn redo(&mut self, models: &ActionModels<'_>) {
        let copy = &self.copy;
        replay_or_build(&mut self.steps, models, |steps| {
            steps.apply(UnselectAllAction::new(), models);
            for (pos, loc) in copy.sorted() {
                if loc.floor != 0 {
                    steps.apply(SetFloorAction::new(pos, copy.layer_id, 0), models);
                }
                for is_right in [true, false] {
                    if loc.wall(is_right) != 0 {
                        steps.apply(SetWallAction::new(pos, copy.layer_id, is_right, 0), models);
                    }
                }
            }
        });
    }

    fn undo(&mut self, models: &ActionModels<'_>) {
        undo_steps(&mut self.steps, models);
    }
}

/// Places a copy on a fresh Move layer with its top-left cell at `pos`,
/// selects the pasted elements and switches to Move mode.
///
/// The new layer goes directly in front of the selected layer.
#[derive(Debug)]
pub struct PasteToMoveLayerAction {
    pos: Position,
    copy: CopyResult,
    steps: Option<ActionContainer<Action>>,
}

impl PasteToMoveLayerAction {
    pub fn new(pos: Position, copy: CopyResult) -> Self {
        Self {
            pos,
            copy,
            steps: None,
        }
    }
}

impl Reversible for PasteToMoveLayerAction {
    fn redo(&mut self, models: &ActionModels<'_>) {
        let (pos, copy) = (self.pos, &self.copy);
        replay_or_build(&mut self.steps, models, |steps| {
            let bounds = copy.bounds();
            if bounds.is_empty() {
                return;
            }

            let grid = models.grid;
            steps.apply(UnselectAllAction::new(), models);

            let anchor = models
                .selected_layer
                .index()
                .filter(|index| *index < grid.len())
                .map(|index| grid.layer_id(index));

            let add = AddLayerAction::new(PASTED_LAYER_NAME, true, LayerKind::Move);
            let move_id = add.layer_id();
            steps.apply(add, models);

            if let Some(anchor) = anchor {
                let anchor_index = grid.resolve(anchor);
                let move_index = grid.resolve(move_id);
                let in_between = (anchor_index..move_index)
                    .filter(|i| !grid.layer_info(*i).kind.is_system())
                    .count();
                if in_between > 0 {
                    steps.apply(MoveLayerAction::new(-(in_between as i32), move_id), models);
                }
            }
            steps.apply(
                SetSelectedLayerAction::new(grid.resolve(move_id) as i32),
                models,
            );

            let angle = models.rotation.angle();
            let mut selected: HashMap<Position, Selected> = HashMap::new();
            for (from, loc) in copy.sorted() {
                let to = from - bounds.min + pos;
                if loc.floor != 0 {
                    steps.apply(SetFloorAction::new(to, move_id, loc.floor), models);
                    selected.entry(angle.to_canonical(to)).or_default().floor = Some(move_id);
                }
                for is_right in [true, false] {
                    let wall = loc.wall(is_right);
                    if wall != 0 {
                        steps.apply(SetWallAction::new(to, move_id, is_right, wall), models);
                        let (canonical, side) = angle.wall_side_to_canonical(to, is_right);
                        selected
                            .entry(canonical)
                            .or_default()
                            .set_wall(side, Some(move_id));
                    }
                }
            }
            steps.apply(SetSelectedAction::new(selected), models);
            steps.apply(SetModeAction::new(Mode::Move), models);
        });
    }

    fn undo(&mut self, models: &ActionModels<'_>) {
        undo_steps(&mut self.steps, models);
    }
}
