//! The [`Reversible`] contract and the [`Action`] enum every history entry holds.

use super::composite_actions::{
    CutAction, MergeLayerDownAction, MergeLayersAction, PasteToMoveLayerAction,
    SetModeAndMergeDownMoveLayerAction,
};
use super::container::ActionContainer;
use super::layer_actions::{
    AddLayerAction, ClearLayerAction, DeleteLayerAction, MoveLayerAction, RenameLayerAction,
    SetLayerKindAction, SetLayerVisibleAction,
};
use super::selection_actions::{
    MoveToSelectedAction, SelectAction, SetSelectedAction, UnselectAllAction,
};
use super::cell_actions::{SetFloorAction, SetNoteIdAction, SetWallAction};
use super::view_actions::{RotateAction, SetCenterAction, SetModeAction, SetSelectedLayerAction};
use crate::editor::{CenterModel, ModeModel, SelectedLayerModel, SelectionModel};
use crate::map::GridModel;
use crate::rotation::{RotatedGrid, RotatedSelection, RotationModel};

/// Borrowed access to every model of one map for the length of a redo or undo.
#[derive(Clone, Copy)]
pub struct ActionModels<'a> {
    pub grid: &'a GridModel,
    pub rotation: &'a RotationModel,
    pub selection: &'a SelectionModel,
    pub mode: &'a ModeModel,
    pub selected_layer: &'a SelectedLayerModel,
    pub center: &'a CenterModel,
}

impl<'a> ActionModels<'a> {
    pub fn grid_view(&self) -> RotatedGrid<'a> {
        RotatedGrid::new(self.grid, self.rotation)
    }

    pub fn selection_view(&self) -> RotatedSelection<'a> {
        RotatedSelection::new(self.selection, self.grid, self.rotation)
    }
}

/// An edit that can be replayed and reversed.
///
/// `redo` captures whatever `undo` needs from the models as they are at that
/// moment. `undo` is only valid right after the matching `redo`, and a container
/// undoes its children in reverse order.
pub trait Reversible {
    fn redo(&mut self, models: &ActionModels<'_>);

    fn undo(&mut self, models: &ActionModels<'_>);

    /// Folds an already applied `next` into `self`, returning false to keep both.
    fn absorb(&mut self, _next: &Self) -> bool
    where
        Self: Sized,
    {
        false
    }
}

macro_rules! action_kinds {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        /// Every kind of edit the history can hold.
        #[derive(Debug)]
        pub enum Action {
            $($variant($ty),)*
        }

        $(
            impl From<$ty> for Action {
                fn from(action: $ty) -> Self {
                    Action::$variant(action)
                }
            }
        )*

        impl Action {
            /// Variant name, for logs.
            pub fn kind_name(&self) -> &'static str {
                match self {
                    $(Action::$variant(_) => stringify!($variant),)*
                }
            }
        }

        impl Reversible for Action {
            fn redo(&mut self, models: &ActionModels<'_>) {
                match self {
                    $(Action::$variant(action) => action.redo(models),)*
                }
            }

            fn undo(&mut self, models: &ActionModels<'_>) {
                match self {
                    $(Action::$variant(action) => action.undo(models),)*
                }
            }
        }
    };
}

action_kinds! {
    SetFloor(SetFloorAction),
    SetWall(SetWallAction),
    SetNoteId(SetNoteIdAction),
    AddLayer(AddLayerAction),
    DeleteLayer(DeleteLayerAction),
    MoveLayer(MoveLayerAction),
    ClearLayer(ClearLayerAction),
    RenameLayer(RenameLayerAction),
    SetLayerVisible(SetLayerVisibleAction),
    SetLayerKind(SetLayerKindAction),
    SetMode(SetModeAction),
    SetSelectedLayer(SetSelectedLayerAction),
    SetCenter(SetCenterAction),
    Rotate(RotateAction),
    Select(SelectAction),
    UnselectAll(UnselectAllAction),
    SetSelected(SetSelectedAction),
    MoveToSelected(MoveToSelectedAction),
    MergeLayers(MergeLayersAction),
    MergeLayerDown(MergeLayerDownAction),
    SetModeAndMergeDownMoveLayer(SetModeAndMergeDownMoveLayerAction),
    Cut(CutAction),
    PasteToMoveLayer(PasteToMoveLayerAction),
    Group(ActionContainer<Action>),
    Selections(ActionContainer<SelectAction>),
    Moves(ActionContainer<MoveToSelectedAction>),
    Rotations(ActionContainer<RotateAction>),
    Centers(ActionContainer<SetCenterAction>),
}

impl Action {
    /// Number of children for containers, `None` for everything else.
    pub fn len(&self) -> Option<usize> {
        match self {
            Action::Group(c) => Some(c.len()),
            Action::Selections(c) => Some(c.len()),
            Action::Moves(c) => Some(c.len()),
            Action::Rotations(c) => Some(c.len()),
            Action::Centers(c) => Some(c.len()),
            _ => None,
        }
    }

    /// A container that has not received anything yet.
    pub fn is_empty_container(&self) -> bool {
        self.len() == Some(0)
    }
}
