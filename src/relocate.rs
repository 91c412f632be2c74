//! Decide where an item that has to leave its stockpile should go.
//!
//! A better storage cell within the configured radius is preferred; otherwise
//! the closest acceptable bare cell is used.

use crate::diagnostics::*;
use crate::location::*;
use crate::map::*;
use crate::nearby_search::*;
use crate::settings::*;
use crate::storage::*;
use crate::store_search::*;
use crate::thing::*;
use crate::worker::*;
use log::*;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Where to put the item, and whether that cell is storage.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementDirective {
    pub destination: Location,
    pub in_storage: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
pub enum RelocationError {
    #[error("item can never be hauled")]
    NotHaulable,
    #[error("item is burning")]
    Burning,
    #[error("worker cannot reserve or reach the item")]
    Unreachable,
    #[error("no place to move the item to")]
    NoDestination,
}

/// Resolve a destination, reporting which stage failed.
pub fn try_resolve_destination<M, W, R>(
    map: &M,
    item: &Haulable,
    worker: &W,
    settings: &Settings,
    rng: &mut R,
    diagnostics: &mut Diagnostics,
) -> Result<PlacementDirective, RelocationError>
where
    M: MapView + ?Sized,
    W: Worker,
    R: Rng + ?Sized,
{
    if !item.ever_haulable {
        return Err(RelocationError::NotHaulable);
    }
    if item.burning {
        return Err(RelocationError::Burning);
    }
    let position = item.position_held.unwrap_or_else(|| worker.position_held());
    if !worker.can_reserve_and_reach(
        position,
        PathEndMode::ClosestTouch,
        worker.normal_max_danger(),
    ) {
        return Err(RelocationError::Unreachable);
    }

    if let Some(destination) = find_better_store_cell(
        map,
        item,
        worker,
        settings.radius_to_search(),
        StoragePriority::Unstored,
        SearchAccuracy::Accurate,
        rng,
    ) {
        return Ok(PlacementDirective {
            destination,
            in_storage: true,
        });
    }

    let sink = settings.debug().then_some(diagnostics);
    match find_nearby_spot(map, item, worker, position, sink) {
        Some(destination) => Ok(PlacementDirective {
            destination,
            in_storage: false,
        }),
        None => Err(RelocationError::NoDestination),
    }
}

/// Resolve a destination, or `None` when the item cannot be relocated.
pub fn resolve_destination<M, W, R>(
    map: &M,
    item: &Haulable,
    worker: &W,
    settings: &Settings,
    rng: &mut R,
    diagnostics: &mut Diagnostics,
) -> Option<PlacementDirective>
where
    M: MapView + ?Sized,
    W: Worker,
    R: Rng + ?Sized,
{
    match try_resolve_destination(map, item, worker, settings, rng, diagnostics) {
        Ok(directive) => Some(directive),
        Err(err) => {
            trace!("Cannot relocate {:?}: {}", item.id, err);
            None
        }
    }
}
