//! Region partition of the walkable grid.
//!
//! Regions are maximal cardinally-connected sets of passable cells confined to
//! a fixed-size chunk. Every door cell forms its own region so traversal can
//! gate on door ownership. Regions link to the regions they touch, giving a
//! small adjacency graph that searches expand over instead of raw cells.

use crate::constants::*;
use crate::grid::*;
use crate::location::*;
use crate::worker::FactionId;
use fnv::FnvHashSet;
use log::*;
use pathfinding::directed::bfs::bfs_reach;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RegionId(pub u32);

/// Input classification of a cell for region building.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RegionCell {
    Blocked,
    Open { danger: Danger },
    Door { owner: Option<FactionId>, danger: Danger },
}

/// Parameters gating which regions a pawn may enter. Doors admit their
/// owning faction, anyone when unowned, and bashers regardless of owner.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TraverseParms {
    pub faction: Option<FactionId>,
    pub max_danger: Danger,
    pub can_bash: bool,
}

impl TraverseParms {
    pub fn by_pawn(faction: Option<FactionId>, max_danger: Danger) -> Self {
        TraverseParms {
            faction,
            max_danger,
            can_bash: false,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Region {
    pub id: RegionId,
    cells: Vec<Location>,
    links: Vec<RegionId>,
    /// Owning faction when this region is a door.
    door: Option<Option<FactionId>>,
    danger: Danger,
}

impl Region {
    pub fn cells(&self) -> &[Location] {
        &self.cells
    }

    pub fn links(&self) -> &[RegionId] {
        &self.links
    }

    pub fn is_door(&self) -> bool {
        self.door.is_some()
    }

    pub fn allows(&self, parms: &TraverseParms) -> bool {
        if self.danger > parms.max_danger {
            return false;
        }

        match self.door {
            None => true,
            Some(owner) => parms.can_bash || owner.is_none() || owner == parms.faction,
        }
    }
}

/// Remaining number of cells a traversal may still examine.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CellBudget {
    remaining: usize,
}

impl CellBudget {
    pub fn new(cells: usize) -> Self {
        CellBudget { remaining: cells }
    }

    /// Consume one cell. Returns false once the budget is spent.
    pub fn try_take(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        true
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining == 0
    }
}

/// All regions of a map and the per-cell region lookup.
#[derive(Clone, Debug)]
pub struct RegionGrid {
    regions: Vec<Region>,
    region_of: GridArray<Option<RegionId>>,
}

impl RegionGrid {
    /// Partition the grid into regions.
    pub fn build(cells: &GridArray<RegionCell>) -> Self {
        let width = cells.width();
        let height = cells.height();
        let mut region_of: GridArray<Option<RegionId>> = GridArray::new(width, height, None);
        let mut regions: Vec<Region> = Vec::new();

        for (loc, cell) in cells.iter() {
            if region_of.get(loc).copied().flatten().is_some() {
                continue;
            }

            let id = RegionId(regions.len() as u32);

            match *cell {
                RegionCell::Blocked => continue,
                RegionCell::Door { owner, danger } => {
                    region_of.set(loc, Some(id));
                    regions.push(Region {
                        id,
                        cells: vec![loc],
                        links: Vec::new(),
                        door: Some(owner),
                        danger,
                    });
                }
                RegionCell::Open { .. } => {
                    let (member_cells, danger) = flood_chunk(cells, &mut region_of, loc, id);
                    regions.push(Region {
                        id,
                        cells: member_cells,
                        links: Vec::new(),
                        door: None,
                        danger,
                    });
                }
            }
        }

        // Link regions whose cells touch cardinally.
        let mut links: Vec<FnvHashSet<RegionId>> = vec![FnvHashSet::default(); regions.len()];
        for (loc, region) in region_of.iter() {
            let Some(region) = *region else { continue };
            for neighbor in neighbors(width, height, loc, &NEIGHBORS_4) {
                if let Some(Some(other)) = region_of.get(neighbor) {
                    if *other != region {
                        links[region.0 as usize].insert(*other);
                    }
                }
            }
        }
        for (region, linked) in regions.iter_mut().zip(links) {
            let mut linked: Vec<RegionId> = linked.into_iter().collect();
            linked.sort();
            region.links = linked;
        }

        trace!(
            "Built {} regions for {}x{} grid",
            regions.len(),
            width,
            height
        );

        RegionGrid { regions, region_of }
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn get(&self, id: RegionId) -> Option<&Region> {
        self.regions.get(id.0 as usize)
    }

    pub fn region_at(&self, loc: Location) -> Option<&Region> {
        self.region_of
            .get(loc)
            .copied()
            .flatten()
            .and_then(|id| self.get(id))
    }

    /// Whether any of `targets` can be reached from `from` through regions
    /// that `parms` allows. The starting region is always entered.
    pub fn connected(&self, from: RegionId, targets: &[RegionId], parms: &TraverseParms) -> bool {
        if targets.contains(&from) {
            return true;
        }
        let mut found = false;
        traverse_regions(
            self,
            from,
            |_, to| to.allows(parms),
            |region, _| {
                found = targets.contains(&region.id);
                found
            },
            usize::MAX,
        );
        found
    }
}

/// Flood fill open, non-door cells of the chunk containing `start`.
fn flood_chunk(
    cells: &GridArray<RegionCell>,
    region_of: &mut GridArray<Option<RegionId>>,
    start: Location,
    id: RegionId,
) -> (Vec<Location>, Danger) {
    let chunk = |loc: Location| (loc.x() / REGION_CHUNK_SIZE, loc.y() / REGION_CHUNK_SIZE);
    let start_chunk = chunk(start);

    let mut members = Vec::new();
    let mut danger = Danger::None;
    let mut queue = VecDeque::new();

    region_of.set(start, Some(id));
    queue.push_back(start);

    while let Some(loc) = queue.pop_front() {
        if let Some(RegionCell::Open { danger: cell_danger }) = cells.get(loc) {
            danger = danger.max(*cell_danger);
        }
        members.push(loc);

        for neighbor in neighbors(cells.width(), cells.height(), loc, &NEIGHBORS_4) {
            if chunk(neighbor) != start_chunk {
                continue;
            }
            if region_of.get(neighbor).copied().flatten().is_some() {
                continue;
            }
            if let Some(RegionCell::Open { .. }) = cells.get(neighbor) {
                region_of.set(neighbor, Some(id));
                queue.push_back(neighbor);
            }
        }
    }

    (members, danger)
}

/// Breadth-first traversal over regions starting at `root`.
///
/// `admit(from, to)` gates entry into a neighboring region; the root is always
/// visited. `visit` receives each region in BFS order together with the shared
/// cell budget and returns true to stop the traversal. The traversal also
/// stops once the budget is exhausted. Returns true if `visit` requested the
/// stop.
pub fn traverse_regions<A, V>(
    regions: &RegionGrid,
    root: RegionId,
    mut admit: A,
    mut visit: V,
    max_cells: usize,
) -> bool
where
    A: FnMut(&Region, &Region) -> bool,
    V: FnMut(&Region, &mut CellBudget) -> bool,
{
    if regions.get(root).is_none() {
        return false;
    }

    let mut budget = CellBudget::new(max_cells);

    let reachable = bfs_reach(root, |id: &RegionId| {
        let mut next = Vec::new();
        if let Some(from) = regions.get(*id) {
            for link in from.links() {
                if let Some(to) = regions.get(*link) {
                    if admit(from, to) {
                        next.push(*link);
                    }
                }
            }
        }
        next
    });

    for id in reachable {
        let Some(region) = regions.get(id) else { continue };
        if visit(region, &mut budget) {
            return true;
        }
        if budget.is_exhausted() {
            break;
        }
    }

    false
}
