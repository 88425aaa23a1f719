//! # Simulator Configuration
//!
//! Everything a session needs besides the live match state, loaded from
//! JSON with every section optional.
//!
//! ```rust
//! use ftc_core::config::SimulatorConfig;
//!
//! let config = SimulatorConfig::from_json(r#"{"layout": {"tile_size_px": 64}}"#).unwrap();
//! assert_eq!(config.layout.tile_size_px, 64.0);
//! assert_eq!(config.rules.grid_size(), 6);
//! ```
//!
//! ## Environment Variables
//!
//! - `FTC_CONFIG_PATH`: JSON config file
//! - `FTC_RULE_PROFILE`: rule preset when no file sets `rules` (season, practice)
//! - `FTC_RULES`: shared-link rule payload, overrides everything else

use serde::{Deserialize, Serialize};
use std::{env, fs};
use tracing::info;

use crate::field::motif::Motif;
use crate::field::zones::ArtifactPatterns;
use crate::field::FieldLayout;
use crate::match_state::{MatchState, PhaseSchedule};
use crate::robot::RosterConfig;
use crate::rules::{self, RuleSet};

pub const CONFIG_PATH_ENV: &str = "FTC_CONFIG_PATH";
pub const RULES_FRAGMENT_ENV: &str = "FTC_RULES";

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    pub rules: RuleSet,
    pub layout: FieldLayout,
    pub phases: PhaseSchedule,
    pub roster: RosterConfig,
    pub artifacts: ArtifactPatterns,
    /// Seed for the obelisk motif; no motif is shown without one.
    pub motif_seed: Option<u64>,
}

impl SimulatorConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Resolve configuration from the environment.
    ///
    /// Without `FTC_CONFIG_PATH` the defaults are used, with the rule preset
    /// picked by `FTC_RULE_PROFILE`. `FTC_RULES` then replaces the rules;
    /// an unreadable payload falls back to the default rule set.
    pub fn from_env() -> Result<Self, String> {
        let mut config = match env::var(CONFIG_PATH_ENV) {
            Ok(path) if !path.trim().is_empty() => {
                let path = path.trim();
                let content = fs::read_to_string(path).map_err(|e| {
                    format!("Failed to read config file from {CONFIG_PATH_ENV}='{path}': {e}")
                })?;
                Self::from_json(&content).map_err(|e| {
                    format!("Failed to parse config JSON from {CONFIG_PATH_ENV}='{path}': {e}")
                })?
            }
            _ => Self { rules: RuleSet::from_env_or_default(), ..Self::default() },
        };

        if let Ok(fragment) = env::var(RULES_FRAGMENT_ENV) {
            config.rules = rules::decode_or_default(&fragment);
            info!(rules = ?config.rules, "rules taken from {RULES_FRAGMENT_ENV}");
        }
        Ok(config)
    }

    pub fn motif(&self) -> Option<Motif> {
        self.motif_seed.map(Motif::pick)
    }

    /// Fresh match for this configuration.
    pub fn new_match(&self) -> MatchState {
        MatchState::new(self.rules, self.roster.clone(), self.phases)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::zones::ArtifactColor;

    #[test]
    fn test_empty_json_is_default() {
        assert_eq!(SimulatorConfig::from_json("{}").unwrap(), SimulatorConfig::default());
    }

    #[test]
    fn test_partial_sections_keep_defaults() {
        let config = SimulatorConfig::from_json(
            r#"{
                "rules": {"gridSize": 8, "movementRankingPointThreshold": 20},
                "phases": {"teleop_secs": 120},
                "artifacts": [["purple", "purple", "green"]],
                "motif_seed": 3
            }"#,
        )
        .unwrap();
        assert_eq!(config.rules.grid_size(), 8);
        assert_eq!(config.rules.leave_points(), 3);
        assert_eq!(config.phases.teleop_secs, 120);
        assert_eq!(config.phases.autonomous_secs, 30);
        assert_eq!(config.artifacts.for_cluster(2)[2], ArtifactColor::Green);
        assert_eq!(config.motif(), Some(Motif::pick(3)));
    }

    #[test]
    fn test_json_roundtrip_is_stable() {
        let config = SimulatorConfig { motif_seed: Some(9), ..SimulatorConfig::default() };
        let json = config.to_json().unwrap();
        assert_eq!(SimulatorConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_new_match_uses_configured_grid() {
        let config = SimulatorConfig::from_json(r#"{"rules": {"gridSize": 4}}"#).unwrap();
        let state = config.new_match();
        assert_eq!(state.grid_size(), 4);
        assert!(state.roster().iter().all(|r| r.position.is_within(4)));
    }

    #[test]
    fn test_bad_json_is_an_error() {
        assert!(SimulatorConfig::from_json(r#"{"rules": 5}"#).is_err());
    }
}
