use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::location::Location;
use super::position::Position;

/// What a layer is used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LayerKind {
    /// A user layer
    #[default]
    Regular,
    /// Staging layer holding content being dragged; merged down when the move ends
    Move,
    /// Housekeeping layer, hidden from the user-facing layer list
    System,
}

impl LayerKind {
    pub fn is_system(&self) -> bool {
        matches!(self, LayerKind::System)
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            LayerKind::Regular => "Regular",
            LayerKind::Move => "Move",
            LayerKind::System => "System",
        }
    }
}

/// Layer metadata without its cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "LayerInfoRecord", into = "LayerInfoRecord")]
pub struct LayerInfo {
    pub id: Uuid,
    pub name: String,
    pub visible: bool,
    pub kind: LayerKind,
}

impl LayerInfo {
    pub fn new(id: Uuid, kind: LayerKind) -> Self {
        Self {
            id,
            name: String::new(),
            visible: true,
            kind,
        }
    }
}

/// On-disk form of [`LayerInfo`]. Only the System kind is persisted; a saved Move
/// layer comes back as a Regular one.
#[derive(Serialize, Deserialize)]
struct LayerInfoRecord {
    uuid: Uuid,
    #[serde(default)]
    name: String,
    #[serde(default = "default_visible")]
    visible: bool,
    #[serde(default)]
    system: bool,
}

fn default_visible() -> bool {
    true
}

impl From<LayerInfoRecord> for LayerInfo {
    fn from(record: LayerInfoRecord) -> Self {
        Self {
            id: record.uuid,
            name: record.name,
            visible: record.visible,
            kind: if record.system {
                LayerKind::System
            } else {
                LayerKind::Regular
            },
        }
    }
}

impl From<LayerInfo> for LayerInfoRecord {
    fn from(info: LayerInfo) -> Self {
        Self {
            uuid: info.id,
            name: info.name,
            visible: info.visible,
            system: info.kind.is_system(),
        }
    }
}

/// One layer of a map: metadata plus sparse cell storage in the canonical frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layer {
    pub info: LayerInfo,
    #[serde(default)]
    pub locations: HashMap<Position, Location>,
}

impl Layer {
    pub fn new(id: Uuid, kind: LayerKind) -> Self {
        Self {
            info: LayerInfo::new(id, kind),
            locations: HashMap::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.info.id
    }

    pub fn location(&self, pos: Position) -> Option<&Location> {
        self.locations.get(&pos)
    }

    /// Applies `edit` to the cell at `pos`, then drops the cell if it ended up empty.
    ///
    /// A missing cell is only created when `creates` is true, so clearing an
    /// absent value never allocates.
    pub(crate) fn edit_location(
        &mut self,
        pos: Position,
        creates: bool,
        edit: impl FnOnce(&mut Location),
    ) {
        if !creates && !self.locations.contains_key(&pos) {
            return;
        }

        let loc = self.locations.entry(pos).or_default();
        edit(loc);
        if loc.is_empty() {
            self.locations.remove(&pos);
        }
    }

    pub(crate) fn prune_empty(&mut self) {
        self.locations.retain(|_, loc| !loc.is_empty());
    }
}
