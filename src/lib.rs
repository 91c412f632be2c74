pub mod constants;
pub mod diagnostics;
pub mod grid;
pub mod job;
pub mod location;
pub mod map;
pub mod nearby_search;
pub mod region;
pub mod relocate;
pub mod settings;
pub mod storage;
pub mod store_search;
pub mod thing;
pub mod validate;
pub mod work;
pub mod worker;

pub use job::{haul_job_for, HaulJob, HaulMode};
pub use relocate::{
    resolve_destination, try_resolve_destination, PlacementDirective, RelocationError,
};
pub use settings::{Settings, SettingsError};
pub use work::{job_on_thing, potential_work_things, should_skip, HaulableLister};
