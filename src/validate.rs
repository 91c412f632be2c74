//! Per-cell placement checks for dropping a hauled item on a non-storage cell.
//!
//! Checks run cheapest first and stop at the first failure. The adjacency
//! rule keeps items from being dropped where they would block a door or a
//! work table's interaction spot.

use crate::grid::*;
use crate::location::*;
use crate::map::*;
use crate::thing::*;
use crate::worker::*;
use thiserror::Error;

/// Why a cell was refused.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Error)]
pub enum Rejection {
    #[error("worker cannot reserve or reach the cell")]
    CannotReserveOrReach,
    #[error("another thing blocks the cell")]
    PlacementBlocked,
    #[error("storage here does not accept the item")]
    StorageRejects,
    #[error("cell is not standable")]
    NotStandable,
    #[error("item already sits here")]
    CurrentPosition,
    #[error("cell is on fire")]
    OnFire,
    #[error("growing zone here")]
    GrowingZone,
    #[error("mining designated nearby")]
    MiningNearby,
    #[error("no open position next to the cell")]
    NoValidPosition,
    #[error("trap here")]
    Trap,
    #[error("work table here")]
    WorkTable,
}

/// Outcome of validating one cell, printable for debug output.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Verdict(pub Result<(), Rejection>);

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            Ok(()) => write!(f, "OK"),
            Err(rejection) => write!(f, "{}", rejection),
        }
    }
}

/// Decide whether `item` may be dropped on `cell` by `worker`.
pub fn validate<M, W>(
    map: &M,
    item: &Haulable,
    worker: &W,
    cell: Location,
) -> Result<(), Rejection>
where
    M: MapView + ?Sized,
    W: Worker + ?Sized,
{
    if !worker.can_reserve_and_reach(cell, PathEndMode::OnCell, worker.normal_max_danger()) {
        return Err(Rejection::CannotReserveOrReach);
    }
    if map.haul_place_blocker_in(item, cell).is_some() {
        return Err(Rejection::PlacementBlocked);
    }
    if let Some(group) = map.storage_group_at(cell) {
        if !group.allowed_to_accept(item) {
            return Err(Rejection::StorageRejects);
        }
    }
    if !map.is_standable(cell) {
        return Err(Rejection::NotStandable);
    }
    if item.spawned && item.position_held == Some(cell) {
        return Err(Rejection::CurrentPosition);
    }
    if map.is_on_fire(cell) {
        return Err(Rejection::OnFire);
    }
    if item.blocks_planting && map.zone(cell) == Some(ZoneKind::Growing) {
        return Err(Rejection::GrowingZone);
    }
    if item.passability != Passability::Standable
        && neighbors(map.width(), map.height(), cell, &NEIGHBORS_8)
            .any(|adjacent| map.has_mine_designation(adjacent))
    {
        return Err(Rejection::MiningNearby);
    }
    if !has_valid_adjacent_position(map, item, cell) {
        return Err(Rejection::NoValidPosition);
    }

    match map.edifice(cell) {
        Some(EdificeKind::Trap) => Err(Rejection::Trap),
        Some(EdificeKind::WorkTable { .. }) => Err(Rejection::WorkTable),
        _ => Ok(()),
    }
}

/// Scan north, east, south, west and the cell itself. An empty position
/// qualifies; a work table qualifies only when its own cell is storage that
/// accepts the item. Reaching a door ends the scan with whatever was found so
/// far.
fn has_valid_adjacent_position<M>(map: &M, item: &Haulable, cell: Location) -> bool
where
    M: MapView + ?Sized,
{
    let mut valid = false;

    for adjacent in neighbors(map.width(), map.height(), cell, &CARDINALS_AND_INSIDE) {
        match map.edifice(adjacent) {
            Some(EdificeKind::Door) => break,
            Some(EdificeKind::WorkTable { .. }) => {
                if map
                    .storage_group_at(adjacent)
                    .map_or(false, |group| group.allowed_to_accept(item))
                {
                    valid = true;
                }
            }
            Some(_) => {}
            None => valid = true,
        }
    }

    valid
}
