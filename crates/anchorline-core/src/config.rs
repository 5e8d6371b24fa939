//! Engine configuration and behavior policies.

use crate::error::ConfigError;
use crate::geometry::{SNAP_PADDING, SNAP_THRESHOLD};
use kurbo::Size;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default distance at which a press hits a line.
pub const LINE_HIT_TOLERANCE: f64 = 4.0;

/// What happens to other lines when a spread line claims its dependents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpreadClaimPolicy {
    /// Claimed shapes are removed from every other line.
    #[default]
    Evict,
    /// As `Evict`, and lines that lost a shape stop spreading.
    EvictAndDisableSpread,
}

/// How a line with dependents reacts to a direction switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DirectionSwitchPolicy {
    /// Detach every dependent, then flip.
    #[default]
    DropDependents,
    /// Refuse the switch while dependents exist.
    Forbid,
}

/// Tunables of the constraint engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub snap_threshold: f64,
    pub padding: f64,
    pub line_hit_tolerance: f64,
    /// Extent of the drawing surface. Lines span it unless they report their own span.
    pub viewport: Size,
    pub spread_claim: SpreadClaimPolicy,
    pub direction_switch: DirectionSwitchPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            snap_threshold: SNAP_THRESHOLD,
            padding: SNAP_PADDING,
            line_hit_tolerance: LINE_HIT_TOLERANCE,
            viewport: Size::new(1280.0, 800.0),
            spread_claim: SpreadClaimPolicy::default(),
            direction_switch: DirectionSwitchPolicy::default(),
        }
    }
}

impl EngineConfig {
    /// Parse and validate a JSON configuration. Missing fields use defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        log::debug!("loading engine config from {}", path.display());
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let non_negative = [
            ("snap_threshold", self.snap_threshold),
            ("padding", self.padding),
            ("line_hit_tolerance", self.line_hit_tolerance),
            ("viewport.width", self.viewport.width),
            ("viewport.height", self.viewport.height),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid(format!("{name} must be a non-negative number, got {value}")));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert!((config.snap_threshold - 15.0).abs() < f64::EPSILON);
        assert!((config.padding - 4.0).abs() < f64::EPSILON);
        assert_eq!(config.spread_claim, SpreadClaimPolicy::Evict);
        assert_eq!(config.direction_switch, DirectionSwitchPolicy::DropDependents);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = EngineConfig::from_json(r#"{ "snap_threshold": 20.0, "direction_switch": "forbid" }"#).unwrap();
        assert!((config.snap_threshold - 20.0).abs() < f64::EPSILON);
        assert_eq!(config.direction_switch, DirectionSwitchPolicy::Forbid);
        assert!((config.padding - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_rejects_negative_values() {
        let err = EngineConfig::from_json(r#"{ "padding": -1.0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_rejects_malformed_json() {
        let err = EngineConfig::from_json("{ nope").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "spread_claim": "evict_and_disable_spread", "viewport": {{ "width": 300.0, "height": 200.0 }} }}"#).unwrap();
        let config = EngineConfig::load(file.path()).unwrap();
        assert_eq!(config.spread_claim, SpreadClaimPolicy::EvictAndDisableSpread);
        assert!((config.viewport.width - 300.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_load_missing_file() {
        let err = EngineConfig::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
