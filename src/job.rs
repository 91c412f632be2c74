//! Haul jobs handed back to the scheduling layer.

use crate::constants::*;
use crate::diagnostics::*;
use crate::location::*;
use crate::map::*;
use crate::relocate::*;
use crate::settings::*;
use crate::thing::*;
use crate::worker::*;
use log::*;
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HaulMode {
    ToCellStorage,
    ToCellNonStorage,
}

/// Instruction to carry `thing` to `destination`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HaulJob {
    pub thing: ThingId,
    pub destination: Location,
    pub haul_mode: HaulMode,
    pub count: u32,
    pub haul_opportunistic_duplicates: bool,
    pub ignore_designations: bool,
}

impl HaulJob {
    pub fn new(thing: ThingId, destination: Location, haul_mode: HaulMode) -> Self {
        HaulJob {
            thing,
            destination,
            haul_mode,
            count: HAUL_COUNT_UNLIMITED,
            haul_opportunistic_duplicates: false,
            ignore_designations: true,
        }
    }
}

/// Build the job that clears `item` out of its stockpile, if there is
/// anywhere to put it.
pub fn haul_job_for<M, W, R>(
    map: &M,
    item: &Haulable,
    worker: &W,
    settings: &Settings,
    rng: &mut R,
    diagnostics: &mut Diagnostics,
) -> Option<HaulJob>
where
    M: MapView + ?Sized,
    W: Worker,
    R: Rng + ?Sized,
{
    match try_resolve_destination(map, item, worker, settings, rng, diagnostics) {
        Ok(directive) => {
            let haul_mode = if map.storage_group_at(directive.destination).is_some() {
                HaulMode::ToCellStorage
            } else {
                HaulMode::ToCellNonStorage
            };
            Some(HaulJob::new(item.id, directive.destination, haul_mode))
        }
        Err(err) => {
            trace!("No haul job for {:?}: {}", item.id, err);
            if settings.debug() {
                diagnostics.message(NO_PLACE_TO_CLEAR);
            }
            None
        }
    }
}
