//=========================================================================
// Session Configuration
//=========================================================================
//
// Tuning values for one gameplay session, loadable from RON.
//
// Every field has a default, so a config file only lists what it
// overrides:
//
//   (
//       max_lives: 5,
//       overlap_policy: RefreshSameKind,
//       character_name: "Rubbish Raccoon",
//   )
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

//=== Internal Dependencies ===============================================

use crate::core::consumable::OverlapPolicy;
use crate::core::math::Vec3;

//=== ConfigError =========================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(String),

    #[error("invalid config value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

//=== SessionConfig =======================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Lives at run start and upper bound for the life pickup.
    pub max_lives: u32,

    /// Invincibility window granted after a non-fatal obstacle hit.
    pub hit_invincibility_secs: f32,

    /// Seconds between blink flips during an invincibility window.
    pub blink_period: f32,

    /// Speed of attracted coins, in units per second.
    pub magnet_speed: f32,

    /// Half extents of the magnet's attraction box.
    pub magnet_half_extents: Vec3,

    /// Currency granted by a life pickup when lives are full.
    pub life_fallback_coins: u32,

    /// Contacts the per-tick buffer is pre-sized for. The channel itself
    /// is unbounded.
    pub contact_capacity: usize,

    /// Coins constructed up front in the coin pool.
    pub initial_coin_pool: usize,

    pub overlap_policy: OverlapPolicy,
    pub is_tutorial: bool,
    pub character_name: String,
    pub theme_name: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_lives: 3,
            hit_invincibility_secs: 2.0,
            blink_period: 0.1,
            magnet_speed: 10.0,
            magnet_half_extents: Vec3::new(20.0, 1.0, 1.0),
            life_fallback_coins: 10,
            contact_capacity: 128,
            initial_coin_pool: 0,
            overlap_policy: OverlapPolicy::default(),
            is_tutorial: false,
            character_name: String::from("Trash Cat"),
            theme_name: String::from("Day"),
        }
    }
}

impl SessionConfig {
    //--- Loading ----------------------------------------------------------

    /// Parses and validates a RON document.
    pub fn from_ron_str(source: &str) -> ConfigResult<Self> {
        let config: Self = ron::from_str(source).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a RON file.
    pub fn from_path(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let source = fs::read_to_string(path)?;
        Self::from_ron_str(&source)
    }

    //--- Validation -------------------------------------------------------

    pub fn validate(&self) -> ConfigResult<()> {
        if self.max_lives == 0 {
            return Err(invalid("max_lives", "must be at least 1"));
        }
        if !(self.hit_invincibility_secs >= 0.0) {
            return Err(invalid("hit_invincibility_secs", "must be non-negative"));
        }
        if !(self.blink_period > 0.0) {
            return Err(invalid("blink_period", "must be positive"));
        }
        if !(self.magnet_speed >= 0.0) {
            return Err(invalid("magnet_speed", "must be non-negative"));
        }

        let e = self.magnet_half_extents;
        if !(e.x >= 0.0 && e.y >= 0.0 && e.z >= 0.0) {
            return Err(invalid("magnet_half_extents", "components must be non-negative"));
        }
        if self.contact_capacity == 0 {
            return Err(invalid("contact_capacity", "must be at least 1"));
        }

        Ok(())
    }
}

fn invalid(field: &'static str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.to_string(),
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = SessionConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_lives, 3);
        assert_eq!(config.hit_invincibility_secs, 2.0);
        assert_eq!(config.magnet_half_extents, Vec3::new(20.0, 1.0, 1.0));
    }

    #[test]
    fn partial_document_keeps_defaults() {
        let config = SessionConfig::from_ron_str(
            r#"(
                max_lives: 5,
                overlap_policy: RefreshSameKind,
                theme_name: "NightTime",
            )"#,
        )
        .unwrap();

        assert_eq!(config.max_lives, 5);
        assert_eq!(config.overlap_policy, OverlapPolicy::RefreshSameKind);
        assert_eq!(config.theme_name, "NightTime");
        assert_eq!(config.life_fallback_coins, 10);
    }

    #[test]
    fn empty_document_is_default() {
        let config = SessionConfig::from_ron_str("()").unwrap();
        assert_eq!(config, SessionConfig::default());
    }

    #[test]
    fn malformed_document_is_parse_error() {
        let err = SessionConfig::from_ron_str("(max_lives: \"three\")").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn zero_lives_is_rejected() {
        let err = SessionConfig::from_ron_str("(max_lives: 0)").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "max_lives", .. }));
    }

    #[test]
    fn non_positive_blink_period_is_rejected() {
        let config = SessionConfig {
            blink_period: 0.0,
            ..SessionConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "blink_period", .. })
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = SessionConfig::from_path("/nonexistent/session.ron").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
