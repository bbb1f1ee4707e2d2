//! Generation-numbered log of applied actions.

use std::collections::VecDeque;

use super::action::Action;
use crate::error::HistoryError;

/// An applied action and the generation it produced.
#[derive(Debug)]
pub struct HistoryElement {
    pub action: Action,
    pub generation: u64,
}

/// Result of looking a generation up in the log.
#[derive(Debug)]
pub enum HistoryLookup<'a> {
    Found(&'a HistoryElement),
    /// The neighbor was evicted, or never existed. Carries the generation the
    /// map reaches by stepping there: the last evicted one, or 0 for the root.
    EvictedBoundary(u64),
    /// Nothing after the given generation.
    End,
    /// The generation is not part of this log.
    Unknown,
}

impl<'a> HistoryLookup<'a> {
    pub fn element(&self) -> Option<&'a HistoryElement> {
        match self {
            HistoryLookup::Found(element) => Some(element),
            _ => None,
        }
    }

    /// Generation reached by moving to this result, if it is a valid position.
    pub fn generation(&self) -> Option<u64> {
        match self {
            HistoryLookup::Found(element) => Some(element.generation),
            HistoryLookup::EvictedBoundary(generation) => Some(*generation),
            HistoryLookup::End | HistoryLookup::Unknown => None,
        }
    }
}

/// Bounded undo log. Generation 0 is the root, before any action.
#[derive(Debug)]
pub struct HistoryQueue {
    entries: VecDeque<HistoryElement>,
    next_generation: u64,
    last_evicted_generation: u64,
    max_elements: usize,
}

impl HistoryQueue {
    pub fn new(max_elements: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            next_generation: 1,
            last_evicted_generation: 0,
            max_elements: max_elements.max(1),
        }
    }

    fn position(&self, generation: u64) -> Option<usize> {
        self.entries
            .iter()
            .position(|entry| entry.generation == generation)
    }

    /// Whether `current` names a position in this log.
    pub fn check_generation(&self, current: u64) -> Result<(), HistoryError> {
        if current == self.last_evicted_generation || self.position(current).is_some() {
            Ok(())
        } else {
            Err(HistoryError::UnknownGeneration(current))
        }
    }

    /// Records `action` as the successor of `current`, dropping everything
    /// that was redoable from there. Returns the new generation.
    ///
    /// `current` may be the root (0) or the eviction boundary. Both sit before
    /// every retained entry, so the whole log is redo history and is cleared.
    /// A boundary generation is accepted rather than reported as unknown, so
    /// a map undone all the way back to the boundary can still take new edits.
    /// Any other generation missing from the log is `UnknownGeneration`.
    pub fn add_action(&mut self, current: u64, action: Action) -> Result<u64, HistoryError> {
        if current == self.last_evicted_generation {
            self.entries.clear();
        } else {
            let Some(index) = self.position(current) else {
                return Err(HistoryError::UnknownGeneration(current));
            };
            self.entries.truncate(index + 1);
        }

        let generation = self.next_generation;
        self.next_generation += 1;
        self.entries.push_back(HistoryElement { action, generation });

        while self.entries.len() > self.max_elements {
            if let Some(evicted) = self.entries.pop_front() {
                tracing::debug!(
                    "Evicted history generation {} ({})",
                    evicted.generation,
                    evicted.action.kind_name()
                );
                self.last_evicted_generation = evicted.generation;
            }
        }

        // The tail may be a gesture container that is still being filled.
        let tail = self.entries.len() - 1;
        let mut index = 0;
        self.entries.retain(|entry| {
            let keep = index == tail || !entry.action.is_empty_container();
            index += 1;
            keep
        });

        Ok(generation)
    }

    pub fn action_at(&self, generation: u64) -> HistoryLookup<'_> {
        match self.position(generation) {
            Some(index) => HistoryLookup::Found(&self.entries[index]),
            None if generation == self.last_evicted_generation => {
                HistoryLookup::EvictedBoundary(generation)
            }
            None => HistoryLookup::Unknown,
        }
    }

    pub fn action_before(&self, generation: u64) -> HistoryLookup<'_> {
        match self.position(generation) {
            Some(0) => HistoryLookup::EvictedBoundary(self.last_evicted_generation),
            Some(index) => HistoryLookup::Found(&self.entries[index - 1]),
            None => HistoryLookup::Unknown,
        }
    }

    pub fn action_after(&self, generation: u64) -> HistoryLookup<'_> {
        let next = if generation == self.last_evicted_generation {
            0
        } else {
            match self.position(generation) {
                Some(index) => index + 1,
                None => return HistoryLookup::Unknown,
            }
        };
        match self.entries.get(next) {
            Some(element) => HistoryLookup::Found(element),
            None => HistoryLookup::End,
        }
    }

    pub fn action_mut(&mut self, generation: u64) -> Option<&mut Action> {
        self.entries
            .iter_mut()
            .find(|entry| entry.generation == generation)
            .map(|entry| &mut entry.action)
    }

    /// The newest entry, if `current` is its generation.
    pub fn tail_action_mut(&mut self, current: u64) -> Option<&mut Action> {
        self.entries
            .back_mut()
            .filter(|entry| entry.generation == current)
            .map(|entry| &mut entry.action)
    }

    pub fn can_undo(&self, current: u64) -> bool {
        matches!(self.action_at(current), HistoryLookup::Found(_))
    }

    pub fn can_redo(&self, current: u64) -> bool {
        matches!(self.action_after(current), HistoryLookup::Found(_))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last_evicted_generation(&self) -> u64 {
        self.last_evicted_generation
    }

    pub fn max_elements(&self) -> usize {
        self.max_elements
    }
}
