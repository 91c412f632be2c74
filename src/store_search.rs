//! Priority-ordered search for a storage cell near an item.
//!
//! Groups are scanned highest priority first; a group below the best priority
//! already found ends the scan. Inside a group the search radius shrinks to
//! each accepted cell, so later cells must be at least as close. Large groups
//! stop scanning at a randomized index once a cell has been accepted, which
//! bounds the cost of huge stockpiles at the price of occasionally returning a
//! slightly farther cell.

use crate::constants::*;
use crate::location::*;
use crate::map::*;
use crate::storage::*;
use crate::thing::*;
use crate::worker::*;
use log::*;
use rand::Rng;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SearchAccuracy {
    /// Keep scanning a group past the first acceptance, up to a sampled index.
    Accurate,
    /// Take the first acceptable cell of each group.
    Fast,
}

/// Index after which an accepted cell ends the scan of a group of `cell_count` cells.
pub fn early_stop_index<R: Rng + ?Sized>(cell_count: usize, rng: &mut R) -> usize {
    let fraction: f32 = rng.gen_range(EARLY_STOP_FRACTION_MIN..EARLY_STOP_FRACTION_MAX);
    (cell_count as f32 * fraction).floor() as usize
}

/// Find a storage cell within `radius` of the item whose group outranks
/// `current_priority`. Returns the closest cell found at the highest priority
/// that yielded any cell.
pub fn find_better_store_cell<M, W, R>(
    map: &M,
    item: &Haulable,
    worker: &W,
    radius: i32,
    current_priority: StoragePriority,
    accuracy: SearchAccuracy,
    rng: &mut R,
) -> Option<Location>
where
    M: MapView + ?Sized,
    W: Worker,
    R: Rng + ?Sized,
{
    let groups = map.storage_groups_in_priority_order();
    if groups.is_empty() {
        return None;
    }

    let origin = item
        .position_held
        .unwrap_or_else(|| worker.position_held());
    let radius = i64::from(radius.max(0));

    let mut max_distance_sq = radius * radius;
    let mut best_priority = current_priority;
    let mut best: Option<Location> = None;

    for group in groups {
        let priority = group.priority;
        if priority < best_priority || priority <= current_priority {
            break;
        }
        if !group.allowed_to_accept(item) {
            continue;
        }

        let cells = group.cells();
        let stop_index = match accuracy {
            SearchAccuracy::Accurate => early_stop_index(cells.len(), rng),
            SearchAccuracy::Fast => 0,
        };

        for (index, cell) in cells.iter().enumerate() {
            let distance_sq = origin.distance_squared_to(*cell);
            if distance_sq > max_distance_sq {
                continue;
            }
            if !map.is_good_store_cell(*cell, item, worker) {
                continue;
            }

            best = Some(*cell);
            max_distance_sq = distance_sq;
            best_priority = priority;

            if index >= stop_index {
                break;
            }
        }
    }

    if let Some(cell) = best {
        trace!(
            "Store cell for {:?}: ({}, {}) at {:?}, distance_sq={}",
            item.id,
            cell.x(),
            cell.y(),
            best_priority,
            max_distance_sq
        );
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const WOOD: ThingCategory = ThingCategory(5);

    fn loc(x: u32, y: u32) -> Location {
        Location::from_coords(x, y)
    }

    fn row(y: u32, xs: std::ops::Range<u32>) -> Vec<Location> {
        xs.map(|x| loc(x, y)).collect()
    }

    fn search(
        map: &GridMap,
        item: &Haulable,
        radius: i32,
        accuracy: SearchAccuracy,
    ) -> Option<Location> {
        let worker = MapWorker::new(map, loc(0, 0), None);
        let mut rng = StdRng::seed_from_u64(11);
        find_better_store_cell(
            map,
            item,
            &worker,
            radius,
            StoragePriority::Unstored,
            accuracy,
            &mut rng,
        )
    }

    fn wood() -> StorageFilter {
        StorageFilter::allowing([WOOD])
    }

    #[test]
    fn no_groups_means_no_cell() {
        let map = GridMapBuilder::new(10, 10).build();
        let item = Haulable::new(ThingId(1), WOOD, loc(5, 5));
        assert_eq!(search(&map, &item, 18, SearchAccuracy::Accurate), None);
    }

    #[test]
    fn nearest_cell_of_accepting_group_wins() {
        let map = GridMapBuilder::new(30, 30)
            .storage_group(StoragePriority::Normal, wood(), row(5, 12..16))
            .build();
        let item = Haulable::new(ThingId(1), WOOD, loc(5, 5));
        assert_eq!(
            search(&map, &item, 18, SearchAccuracy::Accurate),
            Some(loc(12, 5))
        );
    }

    #[test]
    fn higher_priority_beats_closer_lower_priority() {
        let map = GridMapBuilder::new(30, 30)
            .storage_group(StoragePriority::Low, wood(), row(5, 6..8))
            .storage_group(StoragePriority::Important, wood(), row(20, 5..8))
            .build();
        let item = Haulable::new(ThingId(1), WOOD, loc(5, 5));
        let found = search(&map, &item, 18, SearchAccuracy::Accurate);
        assert_eq!(found, Some(loc(5, 20)));
    }

    #[test]
    fn lower_priority_is_used_when_higher_is_out_of_range() {
        let map = GridMapBuilder::new(40, 40)
            .storage_group(StoragePriority::Low, wood(), row(5, 8..10))
            .storage_group(StoragePriority::Critical, wood(), row(35, 5..8))
            .build();
        let item = Haulable::new(ThingId(1), WOOD, loc(5, 5));
        assert_eq!(
            search(&map, &item, 18, SearchAccuracy::Accurate),
            Some(loc(8, 5))
        );
    }

    #[test]
    fn groups_not_above_current_priority_are_ignored() {
        let map = GridMapBuilder::new(30, 30)
            .storage_group(StoragePriority::Normal, wood(), row(5, 8..10))
            .build();
        let item = Haulable::new(ThingId(1), WOOD, loc(5, 5));
        let worker = MapWorker::new(&map, loc(0, 0), None);
        let mut rng = StdRng::seed_from_u64(1);
        let found = find_better_store_cell(
            &map,
            &item,
            &worker,
            18,
            StoragePriority::Normal,
            SearchAccuracy::Accurate,
            &mut rng,
        );
        assert_eq!(found, None);
    }

    #[test]
    fn radius_one_only_reaches_adjacent_cells() {
        let map = GridMapBuilder::new(30, 30)
            .storage_group(StoragePriority::Normal, wood(), vec![loc(6, 6), loc(7, 5)])
            .build();
        let item = Haulable::new(ThingId(1), WOOD, loc(5, 5));
        assert_eq!(search(&map, &item, 1, SearchAccuracy::Accurate), None);

        let map = GridMapBuilder::new(30, 30)
            .storage_group(StoragePriority::Normal, wood(), vec![loc(6, 6), loc(5, 6)])
            .build();
        assert_eq!(
            search(&map, &item, 1, SearchAccuracy::Accurate),
            Some(loc(5, 6))
        );
    }

    #[test]
    fn rejecting_groups_and_bad_cells_are_skipped() {
        let map = GridMapBuilder::new(30, 30)
            .storage_group(StoragePriority::Critical, StorageFilter::new(), row(5, 6..8))
            .storage_group(StoragePriority::Normal, wood(), row(5, 8..12))
            .thing(loc(8, 5), ThingId(40))
            .fire(loc(9, 5))
            .build();
        let item = Haulable::new(ThingId(1), WOOD, loc(5, 5));
        assert_eq!(
            search(&map, &item, 18, SearchAccuracy::Accurate),
            Some(loc(10, 5))
        );
    }

    #[test]
    fn fast_search_takes_first_acceptable_cell_in_group_order() {
        let map = GridMapBuilder::new(30, 30)
            .storage_group(
                StoragePriority::Normal,
                wood(),
                vec![loc(15, 5), loc(9, 5), loc(6, 5)],
            )
            .build();
        let item = Haulable::new(ThingId(1), WOOD, loc(5, 5));
        assert_eq!(
            search(&map, &item, 18, SearchAccuracy::Fast),
            Some(loc(15, 5))
        );
    }

    #[test]
    fn accurate_search_scans_past_first_hit_in_large_groups() {
        // 400 cells gives an early-stop index between 2 and 7; the far cell
        // is first in order, the near cell second.
        let mut cells = vec![loc(20, 5), loc(6, 5)];
        for y in 20..40 {
            cells.extend(row(y, 20..40).into_iter().take(20));
        }
        let map = GridMapBuilder::new(60, 60)
            .storage_group(StoragePriority::Normal, wood(), cells)
            .build();
        let item = Haulable::new(ThingId(1), WOOD, loc(5, 5));
        assert_eq!(
            search(&map, &item, 25, SearchAccuracy::Accurate),
            Some(loc(6, 5))
        );
    }

    #[test]
    fn origin_falls_back_to_worker_when_item_is_carried() {
        let map = GridMapBuilder::new(40, 40)
            .storage_group(StoragePriority::Normal, wood(), vec![loc(2, 2), loc(30, 30)])
            .build();
        let mut item = Haulable::new(ThingId(1), WOOD, loc(5, 5));
        item.position_held = None;
        item.spawned = false;
        let worker = MapWorker::new(&map, loc(28, 28), None);
        let mut rng = StdRng::seed_from_u64(3);
        let found = find_better_store_cell(
            &map,
            &item,
            &worker,
            5,
            StoragePriority::Unstored,
            SearchAccuracy::Accurate,
            &mut rng,
        );
        assert_eq!(found, Some(loc(30, 30)));
    }

    #[test]
    fn cells_at_opposite_ends_of_a_huge_map_are_out_of_range() {
        let map = GridMapBuilder::new(50000, 1)
            .storage_group(StoragePriority::Normal, wood(), vec![loc(49999, 0)])
            .build();
        let item = Haulable::new(ThingId(1), WOOD, loc(0, 0));
        assert_eq!(
            search(&map, &item, MAX_RADIUS_TO_SEARCH, SearchAccuracy::Accurate),
            None
        );

        let near = Haulable::new(ThingId(2), WOOD, loc(49990, 0));
        assert_eq!(
            search(&map, &near, MAX_RADIUS_TO_SEARCH, SearchAccuracy::Accurate),
            Some(loc(49999, 0))
        );
    }

    #[test]
    fn early_stop_index_stays_within_sampled_fraction() {
        let mut rng = StdRng::seed_from_u64(99);
        for _ in 0..100 {
            let index = early_stop_index(1000, &mut rng);
            assert!((5..=18).contains(&index));
        }
        assert_eq!(early_stop_index(10, &mut rng), 0);
    }
}
