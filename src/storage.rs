//! Storage groups (stockpiles and shelves) and their priority tiers.

use crate::location::*;
use crate::thing::*;
use fnv::FnvHashSet;
use serde::{Deserialize, Serialize};

/// Ordinal storage priority. A group may pull items away from any group of
/// strictly lower priority; `Unstored` ranks below every real group.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Ord, PartialOrd, Serialize, Deserialize)]
pub enum StoragePriority {
    Unstored = 0,
    Low = 1,
    Normal = 2,
    Preferred = 3,
    Important = 4,
    Critical = 5,
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StorageGroupId(pub u32);

/// Set of categories a storage group accepts.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct StorageFilter {
    allowed: FnvHashSet<ThingCategory>,
}

impl StorageFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allowing<I: IntoIterator<Item = ThingCategory>>(categories: I) -> Self {
        StorageFilter {
            allowed: categories.into_iter().collect(),
        }
    }

    pub fn disallow(&mut self, category: ThingCategory) {
        self.allowed.remove(&category);
    }

    pub fn allows(&self, category: ThingCategory) -> bool {
        self.allowed.contains(&category)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StorageGroup {
    pub id: StorageGroupId,
    pub priority: StoragePriority,
    pub filter: StorageFilter,
    cells: Vec<Location>,
    #[serde(skip)]
    cell_set: FnvHashSet<Location>,
}

impl StorageGroup {
    pub fn new(
        id: StorageGroupId,
        priority: StoragePriority,
        filter: StorageFilter,
        cells: Vec<Location>,
    ) -> Self {
        let cell_set = cells.iter().copied().collect();
        StorageGroup {
            id,
            priority,
            filter,
            cells,
            cell_set,
        }
    }

    pub fn allowed_to_accept(&self, item: &Haulable) -> bool {
        self.filter.allows(item.category)
    }

    /// Member cells in their stored order.
    pub fn cells(&self) -> &[Location] {
        &self.cells
    }

    pub fn contains(&self, loc: Location) -> bool {
        if self.cell_set.is_empty() {
            self.cells.contains(&loc)
        } else {
            self.cell_set.contains(&loc)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unstored_ranks_below_everything() {
        assert!(StoragePriority::Low > StoragePriority::Unstored);
        assert!(StoragePriority::Important > StoragePriority::Normal);
        assert!(StoragePriority::Critical > StoragePriority::Important);
    }

    #[test]
    fn acceptance_follows_filter() {
        let food = ThingCategory(1);
        let steel = ThingCategory(2);
        let group = StorageGroup::new(
            StorageGroupId(0),
            StoragePriority::Normal,
            StorageFilter::allowing([food]),
            vec![Location::from_coords(1, 1)],
        );
        let here = Location::from_coords(4, 4);
        assert!(group.allowed_to_accept(&Haulable::new(ThingId(1), food, here)));
        assert!(!group.allowed_to_accept(&Haulable::new(ThingId(2), steel, here)));
        assert!(group.contains(Location::from_coords(1, 1)));
        assert!(!group.contains(here));
    }
}
