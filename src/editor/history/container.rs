//! Ordered groups of actions replayed as one step.
//!
//! The element type decides what a container may hold, so a selection gesture
//! can only ever collect [`SelectAction`]s and so on. [`Action`] as the element
//! type makes a general group.

use super::action::{Action, ActionModels, Reversible};
use super::selection_actions::{MoveToSelectedAction, SelectAction};
use super::view_actions::{RotateAction, SetCenterAction};

#[derive(Debug)]
pub struct ActionContainer<A> {
    actions: Vec<A>,
}

impl<A> Default for ActionContainer<A> {
    fn default() -> Self {
        Self {
            actions: Vec::new(),
        }
    }
}

impl<A: Reversible> ActionContainer<A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an action that has already been applied, merging it into the
    /// last one when the kind allows it.
    pub fn push(&mut self, action: A) {
        if let Some(last) = self.actions.last_mut()
            && last.absorb(&action)
        {
            return;
        }
        self.actions.push(action);
    }

    /// Applies `action` and appends it.
    pub fn apply(&mut self, action: impl Into<A>, models: &ActionModels<'_>) {
        let mut action = action.into();
        action.redo(models);
        self.push(action);
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, A> {
        self.actions.iter()
    }
}

impl<A: Reversible> Reversible for ActionContainer<A> {
    fn redo(&mut self, models: &ActionModels<'_>) {
        for action in self.actions.iter_mut() {
            action.redo(models);
        }
    }

    fn undo(&mut self, models: &ActionModels<'_>) {
        for action in self.actions.iter_mut().rev() {
            action.undo(models);
        }
    }
}

impl<A: Reversible> From<A> for ActionContainer<A> {
    fn from(action: A) -> Self {
        Self {
            actions: vec![action],
        }
    }
}

impl<A: Reversible> FromIterator<A> for ActionContainer<A> {
    fn from_iter<I: IntoIterator<Item = A>>(iter: I) -> Self {
        Self {
            actions: iter.into_iter().collect(),
        }
    }
}

/// Action kinds that have a dedicated container variant in [`Action`].
pub trait Grouped: Reversible + Sized {
    /// The container inside `action`, if it is one of ours.
    fn group_mut(action: &mut Action) -> Option<&mut ActionContainer<Self>>;

    fn into_action(group: ActionContainer<Self>) -> Action;
}

macro_rules! grouped {
    ($ty:ty => $variant:ident) => {
        impl Grouped for $ty {
            fn group_mut(action: &mut Action) -> Option<&mut ActionContainer<Self>> {
                match action {
                    Action::$variant(group) => Some(group),
                    _ => None,
                }
            }

            fn into_action(group: ActionContainer<Self>) -> Action {
                Action::$variant(group)
            }
        }
    };
}

grouped!(SelectAction => Selections);
grouped!(MoveToSelectedAction => Moves);
grouped!(RotateAction => Rotations);
grouped!(SetCenterAction => Centers);
