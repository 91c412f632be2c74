//! Read-only view of the map consumed by the relocation searches, and an
//! in-memory implementation of it.
//!
//! `MapView` is the seam to whatever owns the real world state. `GridMap` is a
//! self-contained snapshot assembled with `GridMapBuilder`; offline tools and
//! the test suites run the searches against it.

use crate::grid::*;
use crate::location::*;
use crate::region::*;
use crate::storage::*;
use crate::thing::*;
use crate::worker::*;
use fnv::{FnvHashMap, FnvHashSet};
use itertools::Itertools;
use log::*;

/// Trait for providing map data to the relocation searches.
pub trait MapView {
    fn width(&self) -> u16;
    fn height(&self) -> u16;

    fn flags(&self, loc: Location) -> CellFlags;
    fn edifice(&self, loc: Location) -> Option<EdificeKind>;
    fn zone(&self, loc: Location) -> Option<ZoneKind>;

    fn storage_group_at(&self, loc: Location) -> Option<&StorageGroup>;

    /// All storage groups, highest priority first.
    fn storage_groups_in_priority_order(&self) -> &[StorageGroup];

    fn regions(&self) -> &RegionGrid;

    /// Another thing occupying `loc` that prevents `item` from being dropped there.
    fn haul_place_blocker_in(&self, item: &Haulable, loc: Location) -> Option<ThingId>;

    /// Ownership and contention check for a storage cell.
    fn is_good_store_cell(&self, loc: Location, item: &Haulable, carrier: &dyn Worker) -> bool;

    fn in_bounds(&self, loc: Location) -> bool {
        loc.x() < self.width() && loc.y() < self.height()
    }

    fn is_standable(&self, loc: Location) -> bool {
        self.in_bounds(loc)
            && self.flags(loc).contains(CellFlags::WALKABLE)
            && self.edifice(loc).map_or(true, |e| e.is_standable())
    }

    fn is_on_fire(&self, loc: Location) -> bool {
        self.flags(loc).contains(CellFlags::ON_FIRE)
    }

    fn has_mine_designation(&self, loc: Location) -> bool {
        self.flags(loc).contains(CellFlags::MINE_DESIGNATED)
    }

    fn region_at(&self, loc: Location) -> Option<&Region> {
        self.regions().region_at(loc)
    }
}

/// Immutable in-memory map snapshot.
#[derive(Clone, Debug)]
pub struct GridMap {
    flags: GridArray<CellFlags>,
    edifices: GridArray<Option<EdificeKind>>,
    zones: GridArray<Option<ZoneKind>>,
    storage_groups: Vec<StorageGroup>,
    storage_of: GridArray<Option<usize>>,
    things: FnvHashMap<Location, ThingId>,
    reservations: FnvHashSet<Location>,
    regions: RegionGrid,
}

impl GridMap {
    /// Whether another worker already holds a reservation on `loc`.
    pub fn is_reserved(&self, loc: Location) -> bool {
        self.reservations.contains(&loc)
    }

    pub fn thing_at(&self, loc: Location) -> Option<ThingId> {
        self.things.get(&loc).copied()
    }
}

impl MapView for GridMap {
    fn width(&self) -> u16 {
        self.flags.width()
    }

    fn height(&self) -> u16 {
        self.flags.height()
    }

    fn flags(&self, loc: Location) -> CellFlags {
        self.flags.get(loc).copied().unwrap_or(CellFlags::NONE)
    }

    fn edifice(&self, loc: Location) -> Option<EdificeKind> {
        self.edifices.get(loc).copied().flatten()
    }

    fn zone(&self, loc: Location) -> Option<ZoneKind> {
        self.zones.get(loc).copied().flatten()
    }

    fn storage_group_at(&self, loc: Location) -> Option<&StorageGroup> {
        self.storage_of
            .get(loc)
            .copied()
            .flatten()
            .and_then(|index| self.storage_groups.get(index))
    }

    fn storage_groups_in_priority_order(&self) -> &[StorageGroup] {
        &self.storage_groups
    }

    fn regions(&self) -> &RegionGrid {
        &self.regions
    }

    fn haul_place_blocker_in(&self, item: &Haulable, loc: Location) -> Option<ThingId> {
        self.thing_at(loc).filter(|other| *other != item.id)
    }

    fn is_good_store_cell(&self, loc: Location, item: &Haulable, carrier: &dyn Worker) -> bool {
        if !self.in_bounds(loc) || self.is_on_fire(loc) || !self.is_standable(loc) {
            return false;
        }
        if self.haul_place_blocker_in(item, loc).is_some() {
            return false;
        }
        carrier.can_reserve_and_reach(loc, PathEndMode::OnCell, carrier.normal_max_danger())
    }
}

/// Assembles a `GridMap`. Every cell starts walkable and empty.
#[derive(Clone, Debug)]
pub struct GridMapBuilder {
    flags: GridArray<CellFlags>,
    edifices: GridArray<Option<EdificeKind>>,
    door_owners: FnvHashMap<Location, FactionId>,
    zones: GridArray<Option<ZoneKind>>,
    danger: GridArray<Danger>,
    storage_groups: Vec<StorageGroup>,
    things: FnvHashMap<Location, ThingId>,
    reservations: FnvHashSet<Location>,
}

impl GridMapBuilder {
    pub fn new(width: u16, height: u16) -> Self {
        GridMapBuilder {
            flags: GridArray::new(width, height, CellFlags::WALKABLE),
            edifices: GridArray::new(width, height, None),
            door_owners: FnvHashMap::default(),
            zones: GridArray::new(width, height, None),
            danger: GridArray::new(width, height, Danger::None),
            storage_groups: Vec::new(),
            things: FnvHashMap::default(),
            reservations: FnvHashSet::default(),
        }
    }

    fn update_flag(&mut self, loc: Location, flag: CellFlags, value: bool) {
        if let Some(flags) = self.flags.get_mut(loc) {
            flags.set(flag, value);
        }
    }

    /// Mark terrain as impassable rock/water.
    pub fn wall(mut self, loc: Location) -> Self {
        self.update_flag(loc, CellFlags::WALKABLE, false);
        self
    }

    pub fn fire(mut self, loc: Location) -> Self {
        self.update_flag(loc, CellFlags::ON_FIRE, true);
        self
    }

    pub fn mine_designation(mut self, loc: Location) -> Self {
        self.update_flag(loc, CellFlags::MINE_DESIGNATED, true);
        self
    }

    pub fn edifice(mut self, loc: Location, kind: EdificeKind) -> Self {
        self.edifices.set(loc, Some(kind));
        self
    }

    pub fn door(mut self, loc: Location, owner: Option<FactionId>) -> Self {
        self.update_flag(loc, CellFlags::WALKABLE, true);
        self.edifices.set(loc, Some(EdificeKind::Door));
        match owner {
            Some(owner) => {
                self.door_owners.insert(loc, owner);
            }
            None => {
                self.door_owners.remove(&loc);
            }
        }
        self
    }

    pub fn zone<I: IntoIterator<Item = Location>>(mut self, kind: ZoneKind, cells: I) -> Self {
        for loc in cells {
            self.zones.set(loc, Some(kind));
        }
        self
    }

    pub fn danger(mut self, loc: Location, danger: Danger) -> Self {
        self.danger.set(loc, danger);
        self
    }

    /// Add a storage group. Cells already claimed by an earlier group, or
    /// outside the map, are dropped from the new group.
    pub fn storage_group(
        mut self,
        priority: StoragePriority,
        filter: StorageFilter,
        cells: Vec<Location>,
    ) -> Self {
        let claimed: FnvHashSet<Location> = self
            .storage_groups
            .iter()
            .flat_map(|group| group.cells().iter().copied())
            .collect();
        let cells: Vec<Location> = cells
            .into_iter()
            .filter(|loc| self.flags.in_bounds(*loc) && !claimed.contains(loc))
            .unique()
            .collect();
        let id = StorageGroupId(self.storage_groups.len() as u32);
        self.storage_groups
            .push(StorageGroup::new(id, priority, filter, cells));
        self
    }

    /// Place a thing so it blocks other items from being dropped on its cell.
    pub fn thing(mut self, loc: Location, id: ThingId) -> Self {
        self.things.insert(loc, id);
        self
    }

    /// Record a reservation held by some other worker.
    pub fn reservation(mut self, loc: Location) -> Self {
        self.reservations.insert(loc);
        self
    }

    pub fn build(self) -> GridMap {
        let width = self.flags.width();
        let height = self.flags.height();

        let mut region_cells = GridArray::new(width, height, RegionCell::Blocked);
        for (loc, flags) in self.flags.iter() {
            if !flags.contains(CellFlags::WALKABLE) {
                continue;
            }
            let danger = self.danger.get(loc).copied().unwrap_or_default();
            let cell = match self.edifices.get(loc).copied().flatten() {
                Some(EdificeKind::Door) => RegionCell::Door {
                    owner: self.door_owners.get(&loc).copied(),
                    danger,
                },
                Some(kind) if !kind.is_passable() => RegionCell::Blocked,
                _ => RegionCell::Open { danger },
            };
            region_cells.set(loc, cell);
        }
        let regions = RegionGrid::build(&region_cells);

        // Stable sort keeps insertion order within a priority tier.
        let storage_groups: Vec<StorageGroup> = self
            .storage_groups
            .into_iter()
            .sorted_by(|a, b| b.priority.cmp(&a.priority))
            .collect();

        let mut storage_of = GridArray::new(width, height, None);
        for (index, group) in storage_groups.iter().enumerate() {
            for loc in group.cells() {
                storage_of.set(*loc, Some(index));
            }
        }

        debug!(
            "Built {}x{} map: {} regions, {} storage groups",
            width,
            height,
            regions.len(),
            storage_groups.len()
        );

        GridMap {
            flags: self.flags,
            edifices: self.edifices,
            zones: self.zones,
            storage_groups,
            storage_of,
            things: self.things,
            reservations: self.reservations,
            regions,
        }
    }
}
