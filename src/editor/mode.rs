use parking_lot::Mutex;

use crate::signal::Signal;

/// Editing mode of a map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    /// Paint floors and walls
    #[default]
    Set,
    /// Pick floors and walls
    Select,
    /// Drag the content of the Move layer
    Move,
}

impl Mode {
    pub fn display_name(&self) -> &'static str {
        match self {
            Mode::Set => "Set",
            Mode::Select => "Select",
            Mode::Move => "Move",
        }
    }
}

#[derive(Debug, Default)]
pub struct ModeModel {
    mode: Mutex<Mode>,
    changed: Signal,
}

impl ModeModel {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode: Mutex::new(mode),
            changed: Signal::default(),
        }
    }

    pub fn get(&self) -> Mode {
        *self.mode.lock()
    }

    pub fn set(&self, mode: Mode) {
        let changed = std::mem::replace(&mut *self.mode.lock(), mode) != mode;
        if changed {
            self.changed.notify();
        }
    }

    pub fn changed(&self) -> &Signal {
        &self.changed
    }
}
