//! Grid coordinates and rectangles.

use std::fmt;
use std::ops::{Add, Neg, Sub};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A cell coordinate on the grid.
///
/// Serializes as the text `"(x,y)"` so it can be used as a JSON object key.
/// Coordinates stay within `-LIMIT..=LIMIT`, which keeps negation, rotation,
/// exclusive rectangle corners and the sum of two positions inside `i32`.
/// Parsing enforces the range; code building positions directly must keep to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const ORIGIN: Position = Position { x: 0, y: 0 };

    /// Largest absolute coordinate a position may hold.
    pub const LIMIT: i32 = (1 << 30) - 1;

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<(i32, i32)> for Position {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

impl Add for Position {
    type Output = Position;

    fn add(self, rhs: Position) -> Position {
        Position::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Position {
    type Output = Position;

    fn sub(self, rhs: Position) -> Position {
        Position::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Neg for Position {
    type Output = Position;

    fn neg(self) -> Position {
        Position::new(-self.x, -self.y)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid position {0:?}, expected \"(x,y)\" within the grid limits")]
pub struct ParsePositionError(String);

impl FromStr for Position {
    type Err = ParsePositionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParsePositionError(s.to_string());
        let inner = s
            .trim()
            .strip_prefix('(')
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(err)?;
        let (x, y) = inner.split_once(',').ok_or_else(err)?;
        let coordinate = |text: &str| {
            text.trim()
                .parse::<i32>()
                .ok()
                .filter(|v| v.unsigned_abs() <= Position::LIMIT as u32)
                .ok_or_else(err)
        };
        Ok(Position {
            x: coordinate(x)?,
            y: coordinate(y)?,
        })
    }
}

impl Serialize for Position {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Position {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// Axis-aligned rectangle with an exclusive upper corner.
///
/// `Rect::EMPTY` (origin to origin) is the result for "nothing here".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    pub min: Position,
    pub max: Position,
}

impl Rect {
    pub const EMPTY: Rect = Rect {
        min: Position::ORIGIN,
        max: Position::ORIGIN,
    };

    pub const fn new(min: Position, max: Position) -> Self {
        Self { min, max }
    }

    /// Smallest rectangle holding every position, or `EMPTY` for none.
    pub fn enclosing(positions: impl IntoIterator<Item = Position>) -> Self {
        let mut iter = positions.into_iter();
        let Some(first) = iter.next() else {
            return Rect::EMPTY;
        };

        let (mut min, mut max) = (first, first);
        for p in iter {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }

        Rect::new(min, Position::new(max.x + 1, max.y + 1))
    }

    pub fn is_empty(&self) -> bool {
        self.min.x >= self.max.x || self.min.y >= self.max.y
    }

    pub fn width(&self) -> i32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> i32 {
        self.max.y - self.min.y
    }

    pub fn contains(&self, p: Position) -> bool {
        p.x >= self.min.x && p.x < self.max.x && p.y >= self.min.y && p.y < self.max.y
    }

    /// Cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Position> + use<> {
        let Rect { min, max } = *self;
        (min.y..max.y).flat_map(move |y| (min.x..max.x).map(move |x| Position::new(x, y)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_text_form() {
        let p = Position::new(-3, 12);
        assert_eq!(p.to_string(), "(-3,12)");
        assert_eq!("(-3,12)".parse::<Position>().unwrap(), p);
        assert_eq!(" ( 4 , -5 ) ".parse::<Position>().unwrap(), Position::new(4, -5));
    }

    #[test]
    fn test_position_rejects_garbage() {
        assert!("3,4".parse::<Position>().is_err());
        assert!("(3;4)".parse::<Position>().is_err());
        assert!("(a,4)".parse::<Position>().is_err());
    }

    #[test]
    fn test_position_rejects_out_of_range() {
        assert!("(-2147483648,0)".parse::<Position>().is_err());
        assert!("(0,2147483647)".parse::<Position>().is_err());
        assert!(format!("({},0)", Position::LIMIT + 1).parse::<Position>().is_err());

        let edge = format!("({},{})", -Position::LIMIT, Position::LIMIT);
        assert_eq!(
            edge.parse::<Position>().unwrap(),
            Position::new(-Position::LIMIT, Position::LIMIT)
        );
    }

    #[test]
    fn test_limits_survive_rotation_and_rect_corners() {
        use crate::rotation::Angle;

        let corner = Position::new(-Position::LIMIT, Position::LIMIT);
        for angle in Angle::ALL {
            assert_eq!(angle.from_canonical(angle.to_canonical(corner)), corner);
            let rect = Rect::enclosing([corner, -corner]);
            assert_eq!(angle.rect_from_canonical(rect), rect);
        }
        assert_eq!(corner + corner - corner, corner);
    }

    #[test]
    fn test_position_as_json_key() {
        let mut map = std::collections::HashMap::new();
        map.insert(Position::new(1, 2), 7u32);

        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"(1,2)":7}"#);

        let back: std::collections::HashMap<Position, u32> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, map);
    }

    #[test]
    fn test_enclosing_is_exclusive() {
        let r = Rect::enclosing([Position::new(2, -1), Position::new(-1, 3)]);
        assert_eq!(r, Rect::new(Position::new(-1, -1), Position::new(3, 4)));
        assert!(r.contains(Position::new(2, 3)));
        assert!(!r.contains(Position::new(3, 3)));
    }

    #[test]
    fn test_enclosing_nothing_is_empty() {
        let r = Rect::enclosing(std::iter::empty());
        assert_eq!(r, Rect::EMPTY);
        assert!(r.is_empty());
        assert_eq!(r.cells().count(), 0);
    }

    #[test]
    fn test_cells_row_major() {
        let r = Rect::new(Position::new(0, 0), Position::new(2, 2));
        let cells: Vec<_> = r.cells().collect();
        assert_eq!(
            cells,
            vec![
                Position::new(0, 0),
                Position::new(1, 0),
                Position::new(0, 1),
                Position::new(1, 1)
            ]
        );
    }
}
