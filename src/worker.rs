use crate::grid::*;
use crate::location::*;
use crate::map::*;
use crate::region::*;
use crate::thing::*;
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FactionId(pub u32);

/// How close a path must get to its target.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Serialize, Deserialize)]
pub enum PathEndMode {
    /// The worker must stand on the target cell.
    OnCell,
    /// The worker must stand on or next to the target cell.
    ClosestTouch,
}

/// The agent doing the hauling.
pub trait Worker {
    fn position_held(&self) -> Location;

    fn faction(&self) -> Option<FactionId>;

    /// Danger ceiling the worker accepts during ordinary work.
    fn normal_max_danger(&self) -> Danger;

    /// Whether the worker could reserve `target` and path to it.
    fn can_reserve_and_reach(
        &self,
        target: Location,
        path_end: PathEndMode,
        max_danger: Danger,
    ) -> bool;

    /// Cheap pre-check the work-selection layer runs before asking for a job.
    fn can_automatically_haul_fast(&self, _item: &Haulable, _forced: bool) -> bool {
        true
    }
}

/// A worker standing on a `GridMap`, answering reach queries through region
/// connectivity and the map's reservation table.
#[derive(Clone, Debug)]
pub struct MapWorker<'m> {
    map: &'m GridMap,
    position: Location,
    faction: Option<FactionId>,
    max_danger: Danger,
}

impl<'m> MapWorker<'m> {
    pub fn new(map: &'m GridMap, position: Location, faction: Option<FactionId>) -> Self {
        MapWorker {
            map,
            position,
            faction,
            max_danger: Danger::Some,
        }
    }

    pub fn with_max_danger(mut self, max_danger: Danger) -> Self {
        self.max_danger = max_danger;
        self
    }
}

impl<'m> Worker for MapWorker<'m> {
    fn position_held(&self) -> Location {
        self.position
    }

    fn faction(&self) -> Option<FactionId> {
        self.faction
    }

    fn normal_max_danger(&self) -> Danger {
        self.max_danger
    }

    fn can_reserve_and_reach(
        &self,
        target: Location,
        path_end: PathEndMode,
        max_danger: Danger,
    ) -> bool {
        if !self.map.in_bounds(target) || self.map.is_reserved(target) {
            return false;
        }

        let regions = self.map.regions();
        let start = match regions.region_at(self.position) {
            Some(region) => region.id,
            None => return false,
        };

        let mut targets: Vec<RegionId> = Vec::new();
        if let Some(region) = regions.region_at(target) {
            targets.push(region.id);
        }
        if path_end == PathEndMode::ClosestTouch {
            let adjacent = neighbors(self.map.width(), self.map.height(), target, &NEIGHBORS_8)
                .filter(|loc| self.map.is_standable(*loc))
                .filter_map(|loc| regions.region_at(loc))
                .map(|region| region.id);
            targets.extend(adjacent);
        }
        if targets.is_empty() {
            return false;
        }

        let parms = TraverseParms::by_pawn(self.faction, max_danger);
        regions.connected(start, &targets, &parms)
    }

    fn can_automatically_haul_fast(&self, item: &Haulable, _forced: bool) -> bool {
        match item.position() {
            Some(position) => !self.map.is_reserved(position),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc(x: u32, y: u32) -> Location {
        Location::from_coords(x, y)
    }

    #[test]
    fn walls_cut_off_reach() {
        let mut builder = GridMapBuilder::new(6, 3);
        for y in 0..3 {
            builder = builder.wall(loc(3, y));
        }
        let map = builder.build();
        let worker = MapWorker::new(&map, loc(0, 1), None);
        assert!(worker.can_reserve_and_reach(loc(2, 2), PathEndMode::OnCell, Danger::Deadly));
        assert!(!worker.can_reserve_and_reach(loc(5, 1), PathEndMode::OnCell, Danger::Deadly));
    }

    #[test]
    fn closest_touch_reaches_cells_beside_walls() {
        let map = GridMapBuilder::new(4, 1).wall(loc(3, 0)).build();
        let worker = MapWorker::new(&map, loc(0, 0), None);
        assert!(!worker.can_reserve_and_reach(loc(3, 0), PathEndMode::OnCell, Danger::Deadly));
        assert!(worker.can_reserve_and_reach(
            loc(3, 0),
            PathEndMode::ClosestTouch,
            Danger::Deadly
        ));
    }

    #[test]
    fn reservations_block_reach() {
        let map = GridMapBuilder::new(4, 4).reservation(loc(2, 2)).build();
        let worker = MapWorker::new(&map, loc(0, 0), None);
        assert!(!worker.can_reserve_and_reach(loc(2, 2), PathEndMode::OnCell, Danger::Deadly));
        assert!(worker.can_reserve_and_reach(loc(2, 3), PathEndMode::OnCell, Danger::Deadly));
    }

    #[test]
    fn foreign_doors_block_reach() {
        let mut builder = GridMapBuilder::new(5, 3);
        for y in 0..3 {
            builder = builder.wall(loc(2, y));
        }
        let map = builder.door(loc(2, 1), Some(FactionId(9))).build();
        let ours = MapWorker::new(&map, loc(0, 1), Some(FactionId(9)));
        let theirs = MapWorker::new(&map, loc(0, 1), Some(FactionId(1)));
        assert!(ours.can_reserve_and_reach(loc(4, 1), PathEndMode::OnCell, Danger::Some));
        assert!(!theirs.can_reserve_and_reach(loc(4, 1), PathEndMode::OnCell, Danger::Some));
    }
}
