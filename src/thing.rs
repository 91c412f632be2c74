use crate::location::*;
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ThingId(pub u32);

/// Category used by storage filters to decide acceptance.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ThingCategory(pub u16);

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
pub enum Passability {
    Standable,
    PassThroughOnly,
    Impassable,
}

/// An item a worker may carry.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Haulable {
    pub id: ThingId,
    pub category: ThingCategory,
    pub ever_haulable: bool,
    /// Items that must not be dropped on growing zones.
    pub blocks_planting: bool,
    pub passability: Passability,
    /// Cell the item occupies, or is held at, while it is on the map.
    pub position_held: Option<Location>,
    pub spawned: bool,
    pub burning: bool,
}

impl Haulable {
    /// A spawned, haulable, standable item lying at `position`.
    pub fn new(id: ThingId, category: ThingCategory, position: Location) -> Self {
        Haulable {
            id,
            category,
            ever_haulable: true,
            blocks_planting: false,
            passability: Passability::Standable,
            position_held: Some(position),
            spawned: true,
            burning: false,
        }
    }

    /// The cell the item sits on, only while it is spawned.
    pub fn position(&self) -> Option<Location> {
        if self.spawned {
            self.position_held
        } else {
            None
        }
    }
}
