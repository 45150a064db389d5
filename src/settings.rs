//! Game settings and preferences
//!
//! Persisted in LocalStorage. Game progress itself is never saved.

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_ANIMALS_PER_ROUND, DEFAULT_HOME_URL, DEFAULT_REQUIRED_CORRECT};
use crate::sim::{AnimalKind, Catalog, RoundConfig};

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Game ===
    /// Correct answers needed to finish
    pub required_correct: u32,
    /// Animals shown per round
    pub animals_per_round: usize,
    /// Restrict the catalog (empty = every animal)
    pub animals: Vec<AnimalKind>,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Silence all cues
    pub muted: bool,

    // === Navigation ===
    /// Page the home button returns to
    pub home_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            required_correct: DEFAULT_REQUIRED_CORRECT,
            animals_per_round: DEFAULT_ANIMALS_PER_ROUND,
            animals: Vec::new(),

            master_volume: 0.8,
            muted: false,

            home_url: DEFAULT_HOME_URL.to_string(),
        }
    }
}

impl Settings {
    /// Round sizing for the controller
    pub fn round_config(&self) -> RoundConfig {
        RoundConfig {
            animals_per_round: self.animals_per_round,
            required_correct: self.required_correct,
        }
    }

    /// Catalog the session draws from
    pub fn catalog(&self) -> Catalog {
        if self.animals.is_empty() {
            Catalog::full()
        } else {
            Catalog::new(self.animals.iter().copied())
        }
    }

    /// Volume cues should play at
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume.clamp(0.0, 1.0)
        }
    }

    /// Parse stored settings, falling back to defaults when unreadable
    pub fn from_json(json: &str) -> Self {
        serde_json::from_str(json).unwrap_or_else(|e| {
            log::warn!("Ignoring unreadable settings: {}", e);
            Self::default()
        })
    }

    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "shadow_match_settings";

    #[cfg(target_arch = "wasm32")]
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok()?
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let stored = Self::storage().and_then(|s| s.get_item(Self::STORAGE_KEY).ok().flatten());
        match stored {
            Some(json) => Self::from_json(&json),
            None => {
                log::info!("No saved settings, using defaults");
                Self::default()
            }
        }
    }

    /// Write settings back after the player changes one (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let Some(storage) = Self::storage() else {
            log::warn!("LocalStorage unavailable, settings not saved");
            return;
        };
        match serde_json::to_string(self) {
            Ok(json) => match storage.set_item(Self::STORAGE_KEY, &json) {
                Ok(()) => log::debug!("Settings saved"),
                Err(e) => log::warn!("Could not save settings: {:?}", e),
            },
            Err(e) => log::warn!("Could not encode settings: {}", e),
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        log::debug!("Settings not persisted natively");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let s = Settings::default();
        assert_eq!(s.round_config(), RoundConfig::default());
        assert_eq!(s.catalog().len(), 15);
        assert_eq!(s.home_url, "https://pikopo.com/");
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let s: Settings =
            serde_json::from_str(r#"{"required_correct":3,"animals":["bear","cat","cow","cat"]}"#)
                .unwrap();
        assert_eq!(s.required_correct, 3);
        assert_eq!(s.animals_per_round, 3);
        assert_eq!(s.catalog().len(), 3);
        assert!(!s.muted);
    }

    #[test]
    fn test_from_json() {
        let s = Settings::from_json(r#"{"muted":true,"home_url":"/"}"#);
        assert!(s.muted);
        assert_eq!(s.home_url, "/");
        assert_eq!(s.required_correct, 7);

        assert_eq!(Settings::from_json("not json"), Settings::default());
        assert_eq!(Settings::from_json(r#"{"animals":["unicorn"]}"#), Settings::default());
    }

    #[test]
    fn test_saved_json_reloads() {
        let s = Settings {
            muted: true,
            animals: vec![AnimalKind::Cat, AnimalKind::Dog, AnimalKind::Pig],
            ..Default::default()
        };
        let json = serde_json::to_string(&s).unwrap();
        assert_eq!(Settings::from_json(&json), s);
    }

    #[test]
    fn test_effective_volume() {
        let mut s = Settings::default();
        assert!((s.effective_volume() - 0.8).abs() < f32::EPSILON);
        s.master_volume = 3.0;
        assert_eq!(s.effective_volume(), 1.0);
        s.muted = true;
        assert_eq!(s.effective_volume(), 0.0);
    }
}
