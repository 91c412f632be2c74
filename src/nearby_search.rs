//! Fallback search for a bare (non-storage) cell near an item.
//!
//! Regions are expanded breadth-first from the origin. Within each region the
//! candidate cells are ranked by squared distance to the origin and validated
//! in that order; the first accepted cell ends the whole traversal. Cells of
//! the stockpile the item is leaving are never candidates. Per-cell verdicts
//! are recorded only when a diagnostics sink is supplied.

use crate::constants::*;
use crate::diagnostics::*;
use crate::grid::*;
use crate::location::*;
use crate::map::*;
use crate::region::*;
use crate::thing::*;
use crate::validate::*;
use crate::worker::*;
use log::*;

/// Find the closest acceptable drop cell reachable from `origin`, examining at
/// most `CELLS_TO_SEARCH` candidates.
pub fn find_nearby_spot<M, W>(
    map: &M,
    item: &Haulable,
    worker: &W,
    origin: Location,
    mut diagnostics: Option<&mut Diagnostics>,
) -> Option<Location>
where
    M: MapView + ?Sized,
    W: Worker + ?Sized,
{
    let root = match map.region_at(origin) {
        Some(region) => region.id,
        None => {
            debug!(
                "No region at ({}, {}), cannot search for a drop spot",
                origin.x(),
                origin.y()
            );
            return None;
        }
    };

    let parms = TraverseParms {
        faction: worker.faction(),
        max_danger: Danger::Deadly,
        can_bash: false,
    };

    let leaving = item
        .position_held
        .and_then(|position| map.storage_group_at(position));

    let mut candidates: Vec<Location> = Vec::new();
    let mut found: Option<Location> = None;

    traverse_regions(
        map.regions(),
        root,
        |_, to| to.allows(&parms),
        |region, budget| {
            candidates.clear();
            candidates.extend(
                region
                    .cells()
                    .iter()
                    .copied()
                    .filter(|cell| !leaving.map_or(false, |group| group.contains(*cell))),
            );
            candidates.sort_by_key(|cell| cell.distance_squared_to(origin));

            for &cell in candidates.iter() {
                if !budget.try_take() {
                    break;
                }

                let verdict = validate(map, item, worker, cell);
                if let Some(sink) = diagnostics.as_deref_mut() {
                    sink.record_cell(cell, Verdict(verdict));
                }

                if verdict.is_ok() {
                    found = Some(cell);
                    break;
                }
            }

            if let Some(sink) = diagnostics.as_deref_mut() {
                sink.flush();
            }
            found.is_some()
        },
        CELLS_TO_SEARCH,
    );

    match found {
        Some(cell) => trace!(
            "Drop spot for {:?}: ({}, {})",
            item.id,
            cell.x(),
            cell.y()
        ),
        None => debug!(
            "No drop spot for {:?} near ({}, {})",
            item.id,
            origin.x(),
            origin.y()
        ),
    }

    found
}
