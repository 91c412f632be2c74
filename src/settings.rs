//! The two persisted tunables.
//!
//! Settings are stored as string key/value pairs by the host. The radius is
//! clamped to its supported range on every read and write, so a hand-edited
//! value out of range never reaches the searches.

use crate::constants::*;
use fnv::FnvHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SettingsError {
    #[error("invalid value {value:?} for setting {key}")]
    InvalidValue { key: &'static str, value: String },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(rename = "val_RadiusToSearch", default = "default_radius")]
    radius_to_search: i32,
    #[serde(rename = "mode_debug", default)]
    debug: bool,
}

fn default_radius() -> i32 {
    DEFAULT_RADIUS_TO_SEARCH
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            radius_to_search: DEFAULT_RADIUS_TO_SEARCH,
            debug: false,
        }
    }
}

impl Settings {
    pub fn new(radius_to_search: i32, debug: bool) -> Self {
        Settings {
            radius_to_search: clamp_radius(radius_to_search),
            debug,
        }
    }

    /// Stockpile search radius in cells, always within 1..=25.
    pub fn radius_to_search(&self) -> i32 {
        clamp_radius(self.radius_to_search)
    }

    pub fn set_radius_to_search(&mut self, radius: i32) {
        self.radius_to_search = clamp_radius(radius);
    }

    pub fn debug(&self) -> bool {
        self.debug
    }

    pub fn set_debug(&mut self, debug: bool) {
        self.debug = debug;
    }

    /// Read settings from a persisted key/value store. Missing keys keep
    /// their defaults and unknown keys are ignored.
    pub fn from_pairs(pairs: &FnvHashMap<String, String>) -> Result<Self, SettingsError> {
        let mut settings = Settings::default();

        if let Some(value) = pairs.get(KEY_RADIUS_TO_SEARCH) {
            let radius = value
                .trim()
                .parse::<i32>()
                .map_err(|_| SettingsError::InvalidValue {
                    key: KEY_RADIUS_TO_SEARCH,
                    value: value.clone(),
                })?;
            settings.set_radius_to_search(radius);
        }

        if let Some(value) = pairs.get(KEY_DEBUG) {
            let debug = match value.trim() {
                "true" | "True" | "1" => true,
                "false" | "False" | "0" => false,
                _ => {
                    return Err(SettingsError::InvalidValue {
                        key: KEY_DEBUG,
                        value: value.clone(),
                    })
                }
            };
            settings.set_debug(debug);
        }

        Ok(settings)
    }

    pub fn to_pairs(&self) -> FnvHashMap<String, String> {
        let mut pairs = FnvHashMap::default();
        pairs.insert(
            KEY_RADIUS_TO_SEARCH.to_string(),
            self.radius_to_search().to_string(),
        );
        pairs.insert(KEY_DEBUG.to_string(), self.debug.to_string());
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(entries: &[(&str, &str)]) -> FnvHashMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn defaults() {
        let settings = Settings::default();
        assert_eq!(settings.radius_to_search(), 18);
        assert!(!settings.debug());
        assert_eq!(Settings::from_pairs(&pairs(&[])), Ok(settings));
    }

    #[test]
    fn radius_is_clamped() {
        let mut settings = Settings::new(0, false);
        assert_eq!(settings.radius_to_search(), 1);
        settings.set_radius_to_search(40);
        assert_eq!(settings.radius_to_search(), 25);

        let loaded = Settings::from_pairs(&pairs(&[("val_RadiusToSearch", "-3")])).unwrap();
        assert_eq!(loaded.radius_to_search(), 1);
    }

    #[test]
    fn pairs_round_trip() {
        let settings = Settings::new(7, true);
        assert_eq!(Settings::from_pairs(&settings.to_pairs()), Ok(settings));
    }

    #[test]
    fn malformed_values_are_errors() {
        let err = Settings::from_pairs(&pairs(&[("val_RadiusToSearch", "far")])).unwrap_err();
        assert_eq!(
            err,
            SettingsError::InvalidValue {
                key: KEY_RADIUS_TO_SEARCH,
                value: "far".to_string(),
            }
        );
        assert!(Settings::from_pairs(&pairs(&[("mode_debug", "maybe")])).is_err());
        assert!(Settings::from_pairs(&pairs(&[("other", "x")])).is_ok());
    }

    #[test]
    fn serde_uses_persisted_key_names() {
        let json = serde_json::to_string(&Settings::new(12, true)).unwrap();
        assert_eq!(json, r#"{"val_RadiusToSearch":12,"mode_debug":true}"#);

        let loaded: Settings = serde_json::from_str(r#"{"mode_debug":true}"#).unwrap();
        assert_eq!(loaded.radius_to_search(), 18);
        assert!(loaded.debug());

        let wide: Settings = serde_json::from_str(r#"{"val_RadiusToSearch":99}"#).unwrap();
        assert_eq!(wide.radius_to_search(), 25);
    }
}
