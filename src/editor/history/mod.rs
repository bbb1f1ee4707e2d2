//! Undo/redo for map edits.
//!
//! Every edit is an [`Action`]: a value that can replay itself (`redo`) and
//! take itself back (`undo`) against the models of one map. Applied actions
//! are logged in a [`HistoryQueue`] under increasing generation numbers, and
//! the map remembers which generation it is showing.
//!
//! ## Kinds of actions
//!
//! - Leaf actions change one thing: a cell, a layer, the mode, the view
//! - Containers replay a list of actions as one step. The element type limits
//!   what may go in, and some kinds merge consecutive entries (drags, scrolls)
//! - Composite actions (merge, cut, paste, leaving Move mode) work out their
//!   steps on the first `redo` and replay exactly those steps afterwards
//!
//! ## Module Structure
//!
//! - [`action`] - The `Reversible` trait and the `Action` enum
//! - [`container`] - Type-gated containers
//! - [`cell_actions`] - Floor, wall and note edits
//! - [`layer_actions`] - Layer list edits
//! - [`selection_actions`] - Selection edits and Move layer drags
//! - [`view_actions`] - Mode, selected layer, viewport center and rotation
//! - [`composite_actions`] - Actions that expand into other actions
//! - [`queue`] - The generation-numbered log
//! - [`systems`] - Bevy systems for undo/redo requests

mod action;
mod cell_actions;
mod composite_actions;
mod container;
mod layer_actions;
mod queue;
mod selection_actions;
mod systems;
mod view_actions;


// Re-exports
pub use action::{Action, ActionModels, Reversible};
pub use cell_actions::{SetFloorAction, SetNoteIdAction, SetWallAction};
pub use composite_actions::{
    CutAction, CutStep, MergeLayerDownAction, MergeLayersAction, MergeStep,
    PasteToMoveLayerAction, SetModeAndMergeDownMoveLayerAction,
};
pub use container::{ActionContainer, Grouped};
pub use layer_actions::{
    AddLayerAction, ClearLayerAction, DeleteLayerAction, MoveLayerAction, RenameLayerAction,
    SetLayerKindAction, SetLayerVisibleAction,
};
pub use queue::{HistoryElement, HistoryLookup, HistoryQueue};
pub use selection_actions::{
    MoveToSelectedAction, SelectAction, SelectElement, SetSelectedAction, UnselectAllAction,
};
pub use systems::{handle_redo, handle_undo};
pub use view_actions::{RotateAction, SetCenterAction, SetModeAction, SetSelectedLayerAction};
