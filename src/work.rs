//! Entry points for the scheduling layer: which items need clearing, and the
//! job for one of them.

use crate::diagnostics::*;
use crate::job::*;
use crate::map::*;
use crate::settings::*;
use crate::thing::*;
use crate::worker::*;
use rand::Rng;

/// Source of items that may need hauling somewhere.
pub trait HaulableLister {
    fn things_potentially_needing_hauling(&self) -> &[Haulable];
}

impl HaulableLister for Vec<Haulable> {
    fn things_potentially_needing_hauling(&self) -> &[Haulable] {
        self
    }
}

impl HaulableLister for [Haulable] {
    fn things_potentially_needing_hauling(&self) -> &[Haulable] {
        self
    }
}

pub fn should_skip<L: HaulableLister + ?Sized>(lister: &L) -> bool {
    lister.things_potentially_needing_hauling().is_empty()
}

/// Items sitting in a stockpile whose filter no longer accepts them.
pub fn potential_work_things<'a, M, L>(map: &M, lister: &'a L) -> Vec<&'a Haulable>
where
    M: MapView + ?Sized,
    L: HaulableLister + ?Sized,
{
    lister
        .things_potentially_needing_hauling()
        .iter()
        .filter(|item| {
            item.position()
                .and_then(|position| map.storage_group_at(position))
                .map_or(false, |group| !group.allowed_to_accept(item))
        })
        .collect()
}

pub fn job_on_thing<M, W, R>(
    map: &M,
    worker: &W,
    item: &Haulable,
    forced: bool,
    settings: &Settings,
    rng: &mut R,
    diagnostics: &mut Diagnostics,
) -> Option<HaulJob>
where
    M: MapView + ?Sized,
    W: Worker,
    R: Rng + ?Sized,
{
    if !worker.can_automatically_haul_fast(item, forced) {
        return None;
    }

    haul_job_for(map, item, worker, settings, rng, diagnostics)
}
