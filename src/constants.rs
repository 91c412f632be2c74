/// Default radius (in cells) for the stockpile search.
pub const DEFAULT_RADIUS_TO_SEARCH: i32 = 18;

/// Inclusive bounds accepted for the stockpile search radius.
pub const MIN_RADIUS_TO_SEARCH: i32 = 1;
pub const MAX_RADIUS_TO_SEARCH: i32 = 25;

/// Maximum number of candidate cells the fallback search validates before giving up.
pub const CELLS_TO_SEARCH: usize = 100;

/// Bounds of the fraction of a storage group's cells that must be scanned
/// before an accepted cell ends the scan of that group.
pub const EARLY_STOP_FRACTION_MIN: f32 = 0.005;
pub const EARLY_STOP_FRACTION_MAX: f32 = 0.018;

/// Side length of the square chunks regions are confined to.
pub const REGION_CHUNK_SIZE: u16 = 12;

/// Carry-count ceiling put on relocation jobs (effectively unlimited).
pub const HAUL_COUNT_UNLIMITED: u32 = 99999;

/// Persisted settings keys.
pub const KEY_RADIUS_TO_SEARCH: &str = "val_RadiusToSearch";
pub const KEY_DEBUG: &str = "mode_debug";

/// Failure reason surfaced when no destination exists and debug mode is on.
pub const NO_PLACE_TO_CLEAR: &str = "Can't clear: No place to clear to.";

/// Clamp a requested search radius into the supported range.
pub fn clamp_radius(radius: i32) -> i32 {
    radius.clamp(MIN_RADIUS_TO_SEARCH, MAX_RADIUS_TO_SEARCH)
}
