use parking_lot::Mutex;

use crate::signal::Signal;

/// Index of the layer the user is editing.
///
/// The index is only meaningful against the layer list at the time it is read.
#[derive(Debug, Default)]
pub struct SelectedLayerModel {
    index: Mutex<i32>,
    changed: Signal,
}

impl SelectedLayerModel {
    pub fn new(index: i32) -> Self {
        Self {
            index: Mutex::new(index),
            changed: Signal::default(),
        }
    }

    pub fn get(&self) -> i32 {
        *self.index.lock()
    }

    /// The index as a layer index, if one is selected.
    pub fn index(&self) -> Option<usize> {
        usize::try_from(self.get()).ok()
    }

    pub fn set(&self, index: i32) {
        let changed = std::mem::replace(&mut *self.index.lock(), index) != index;
        if changed {
            self.changed.notify();
        }
    }

    pub fn changed(&self) -> &Signal {
        &self.changed
    }
}
