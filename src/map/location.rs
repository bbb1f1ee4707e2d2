use serde::{Deserialize, Serialize};

/// Everything stored at one canonical cell of a layer.
///
/// Zero ids and a missing note mean "nothing there". A layer never keeps an
/// empty `Location` in its map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    #[serde(default, skip_serializing_if = "is_zero")]
    pub floor: u32,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub right_wall: u32,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub bottom_wall: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note_id: Option<String>,
}

fn is_zero(v: &u32) -> bool {
    *v == 0
}

impl Location {
    pub fn is_empty(&self) -> bool {
        self.floor == 0 && self.right_wall == 0 && self.bottom_wall == 0 && self.note_id.is_none()
    }

    pub fn wall(&self, is_right: bool) -> u32 {
        if is_right {
            self.right_wall
        } else {
            self.bottom_wall
        }
    }

    pub fn set_wall(&mut self, is_right: bool, value: u32) {
        if is_right {
            self.right_wall = value;
        } else {
            self.bottom_wall = value;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_empty() {
        assert!(Location::default().is_empty());
        let noted = Location {
            note_id: Some("A1".into()),
            ..Default::default()
        };
        assert!(!noted.is_empty());
    }

    #[test]
    fn test_empty_fields_are_omitted() {
        let loc = Location {
            floor: 3,
            ..Default::default()
        };
        assert_eq!(serde_json::to_string(&loc).unwrap(), r#"{"floor":3}"#);

        let parsed: Location = serde_json::from_str(r#"{"bottom_wall":9,"note_id":"x"}"#).unwrap();
        assert_eq!(parsed.bottom_wall, 9);
        assert_eq!(parsed.note_id.as_deref(), Some("x"));
        assert_eq!(parsed.floor, 0);
    }

    #[test]
    fn test_wall_selector() {
        let mut loc = Location::default();
        loc.set_wall(true, 4);
        loc.set_wall(false, 6);
        assert_eq!(loc.wall(true), 4);
        assert_eq!(loc.right_wall, 4);
        assert_eq!(loc.wall(false), 6);
        assert_eq!(loc.bottom_wall, 6);
    }
}
