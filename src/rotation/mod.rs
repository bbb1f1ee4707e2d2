//! Quarter-turn view rotation.
//!
//! Map data is always stored in the canonical frame. The user edits in the
//! rotated (screen) frame, and the views in this module translate every
//! coordinate on the way in and out.
//!
//! ## Module Structure
//!
//! - [`grid_view`] - [`RotatedGrid`], the grid model seen through the rotation
//! - [`selection_view`] - [`RotatedSelection`], the selection model seen through the rotation

mod grid_view;
mod selection_view;


pub use grid_view::RotatedGrid;
pub use selection_view::RotatedSelection;

use parking_lot::Mutex;

use crate::map::{Position, Rect};
use crate::signal::Signal;

/// View angle, clockwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Angle {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Angle {
    pub const ALL: [Angle; 4] = [Angle::Deg0, Angle::Deg90, Angle::Deg180, Angle::Deg270];

    pub fn degrees(self) -> u16 {
        match self {
            Angle::Deg0 => 0,
            Angle::Deg90 => 90,
            Angle::Deg180 => 180,
            Angle::Deg270 => 270,
        }
    }

    /// Accepts any multiple of 90, negative ones included.
    pub fn from_degrees(degrees: i32) -> Option<Angle> {
        match degrees.rem_euclid(360) {
            0 => Some(Angle::Deg0),
            90 => Some(Angle::Deg90),
            180 => Some(Angle::Deg180),
            270 => Some(Angle::Deg270),
            _ => None,
        }
    }

    pub fn clockwise(self) -> Angle {
        match self {
            Angle::Deg0 => Angle::Deg90,
            Angle::Deg90 => Angle::Deg180,
            Angle::Deg180 => Angle::Deg270,
            Angle::Deg270 => Angle::Deg0,
        }
    }

    pub fn counterclockwise(self) -> Angle {
        match self {
            Angle::Deg0 => Angle::Deg270,
            Angle::Deg90 => Angle::Deg0,
            Angle::Deg180 => Angle::Deg90,
            Angle::Deg270 => Angle::Deg180,
        }
    }

    /// The angle that undoes this one.
    pub fn inverse(self) -> Angle {
        match self {
            Angle::Deg90 => Angle::Deg270,
            Angle::Deg270 => Angle::Deg90,
            other => other,
        }
    }

    /// Screen position to canonical position.
    pub fn to_canonical(self, p: Position) -> Position {
        match self {
            Angle::Deg0 => p,
            Angle::Deg90 => Position::new(p.y, -p.x),
            Angle::Deg180 => Position::new(-p.x, -p.y),
            Angle::Deg270 => Position::new(-p.y, p.x),
        }
    }

    /// Canonical position to screen position.
    pub fn from_canonical(self, p: Position) -> Position {
        self.inverse().to_canonical(p)
    }

    /// Maps the right or bottom wall of a screen cell to the canonical cell and
    /// side owning the same edge.
    ///
    /// Right and bottom swap at 90° and 270°. The owning cell shifts by one
    /// where the edge ends up on the left or top of the rotated cell.
    pub fn wall_side_to_canonical(self, p: Position, is_right: bool) -> (Position, bool) {
        let c = self.to_canonical(p);
        match (self, is_right) {
            (Angle::Deg0, _) => (c, is_right),
            (Angle::Deg90, true) => (Position::new(c.x, c.y - 1), false),
            (Angle::Deg90, false) => (c, true),
            (Angle::Deg180, true) => (Position::new(c.x - 1, c.y), true),
            (Angle::Deg180, false) => (Position::new(c.x, c.y - 1), false),
            (Angle::Deg270, true) => (c, false),
            (Angle::Deg270, false) => (Position::new(c.x - 1, c.y), true),
        }
    }

    /// Inverse of [`Self::wall_side_to_canonical`].
    pub fn wall_side_from_canonical(self, p: Position, is_right: bool) -> (Position, bool) {
        self.inverse().wall_side_to_canonical(p, is_right)
    }

    /// Canonical rectangle (exclusive max) to the screen rectangle covering the same cells.
    pub fn rect_from_canonical(self, r: Rect) -> Rect {
        if r.is_empty() {
            return Rect::EMPTY;
        }

        let a = self.from_canonical(r.min);
        let b = self.from_canonical(Position::new(r.max.x - 1, r.max.y - 1));
        Rect::new(
            Position::new(a.x.min(b.x), a.y.min(b.y)),
            Position::new(a.x.max(b.x) + 1, a.y.max(b.y) + 1),
        )
    }
}

/// The current view angle of one map.
///
/// Each rotation fires `before_rotate` with the old angle, then `changed`, then
/// `after_rotate` with the new angle. A listener on the pair can carry
/// screen-frame state over by going through the canonical frame.
#[derive(Debug, Default)]
pub struct RotationModel {
    angle: Mutex<Angle>,
    before_rotate: Signal<Angle>,
    after_rotate: Signal<Angle>,
    changed: Signal,
}

impl RotationModel {
    pub fn new(angle: Angle) -> Self {
        Self {
            angle: Mutex::new(angle),
            ..Default::default()
        }
    }

    pub fn angle(&self) -> Angle {
        *self.angle.lock()
    }

    pub fn changed(&self) -> &Signal {
        &self.changed
    }

    pub fn before_rotate(&self) -> &Signal<Angle> {
        &self.before_rotate
    }

    pub fn after_rotate(&self) -> &Signal<Angle> {
        &self.after_rotate
    }

    pub fn to_canonical(&self, p: Position) -> Position {
        self.angle().to_canonical(p)
    }

    pub fn from_canonical(&self, p: Position) -> Position {
        self.angle().from_canonical(p)
    }

    pub fn wall_side_to_canonical(&self, p: Position, is_right: bool) -> (Position, bool) {
        self.angle().wall_side_to_canonical(p, is_right)
    }

    pub fn wall_side_from_canonical(&self, p: Position, is_right: bool) -> (Position, bool) {
        self.angle().wall_side_from_canonical(p, is_right)
    }

    pub fn rotate_clockwise(&self) {
        self.set_angle(self.angle().clockwise());
    }

    pub fn rotate_counterclockwise(&self) {
        self.set_angle(self.angle().counterclockwise());
    }

    pub fn set_angle(&self, angle: Angle) {
        let old = self.angle();
        if old == angle {
            return;
        }

        self.before_rotate.emit(&old);
        *self.angle.lock() = angle;
        self.changed.notify();
        self.after_rotate.emit(&angle);
    }
}
