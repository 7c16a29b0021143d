//! Persisted profile values
//!
//! The host owns storage (LocalStorage, remote accounts). The simulation only
//! reads these values once at session start and hands updated copies back
//! through `GameEvent::Checkpoint`.

use serde::{Deserialize, Serialize};

use crate::consts::MAX_UPGRADE_LEVEL;

/// Permanent upgrade levels, each in 1..=3
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpgradeLevels {
    pub max_hp: u8,
    pub speed: u8,
    pub weapon: u8,
}

impl Default for UpgradeLevels {
    fn default() -> Self {
        Self {
            max_hp: 1,
            speed: 1,
            weapon: 1,
        }
    }
}

/// Clamp any externally supplied level into 1..=3
pub fn clamp_level(level: i64) -> u8 {
    level.clamp(1, MAX_UPGRADE_LEVEL as i64) as u8
}

impl UpgradeLevels {
    pub fn sanitized(self) -> Self {
        Self {
            max_hp: clamp_level(self.max_hp as i64),
            speed: clamp_level(self.speed as i64),
            weapon: clamp_level(self.weapon as i64),
        }
    }
}

/// Values that survive between runs
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PersistedProfile {
    #[serde(default)]
    pub high_score: u64,
    #[serde(default)]
    pub coins: u64,
    #[serde(default)]
    pub upgrades: UpgradeLevels,
}

impl PersistedProfile {
    /// LocalStorage key used by the web host
    pub const STORAGE_KEY: &'static str = "neon_siege_profile";

    /// Parse a stored profile. Levels are clamped, never rejected.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let profile: Self = serde_json::from_str(json)?;
        Ok(profile.sanitized())
    }

    /// Parse a stored profile, falling back to a fresh one on any error
    pub fn load_or_default(json: Option<&str>) -> Self {
        match json {
            Some(json) => match Self::from_json(json) {
                Ok(profile) => {
                    log::info!(
                        "Loaded profile: high score {}, {} coins",
                        profile.high_score,
                        profile.coins
                    );
                    profile
                }
                Err(e) => {
                    log::warn!("Stored profile unreadable ({}), starting fresh", e);
                    Self::default()
                }
            },
            None => {
                log::info!("No stored profile, starting fresh");
                Self::default()
            }
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn sanitized(mut self) -> Self {
        self.upgrades = self.upgrades.sanitized();
        self
    }
}
