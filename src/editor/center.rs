use parking_lot::Mutex;

use crate::map::Position;
use crate::signal::Signal;

/// Cell shown in the middle of the viewport, in screen coordinates.
#[derive(Debug, Default)]
pub struct CenterModel {
    pos: Mutex<Position>,
    changed: Signal,
}

impl CenterModel {
    pub fn new(pos: Position) -> Self {
        Self {
            pos: Mutex::new(pos),
            changed: Signal::default(),
        }
    }

    pub fn get(&self) -> Position {
        *self.pos.lock()
    }

    pub fn set(&self, pos: Position) {
        let changed = std::mem::replace(&mut *self.pos.lock(), pos) != pos;
        if changed {
            self.changed.notify();
        }
    }

    pub fn changed(&self) -> &Signal {
        &self.changed
    }
}
