//! # Rule Set
//!
//! Named, bounded scoring parameters. A `RuleSet` is immutable and always
//! within bounds: every way of building one (`new`, serde, shared-link
//! decoding) goes through [`RuleSetDraft::clamp`].
//!
//! ## Presets
//!
//! ```rust
//! use ftc_core::rules::RuleSet;
//!
//! let season = RuleSet::decode_season();
//! let practice = RuleSet::practice();
//! assert!(practice.movement_rp_threshold() < season.movement_rp_threshold());
//! ```
//!
//! ## Environment Variables
//!
//! - `FTC_RULE_PROFILE`: Select preset (season, practice)

pub mod share;

use serde::de::{self, Deserializer, Unexpected, Visitor};
use serde::{Deserialize, Serialize};
use std::{env, fmt};
use tracing::warn;

pub use share::{decode_or_default, encode, try_decode};

pub const RULE_PROFILE_ENV: &str = "FTC_RULE_PROFILE";

pub const MIN_GRID_SIZE: u8 = 4;
pub const MAX_GRID_SIZE: u8 = 10;
pub const MAX_POINTS: u32 = 999;
pub const MAX_RP_THRESHOLD: u32 = 9_999;

/// Scoring parameters in effect for a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RuleSetDraft")]
pub struct RuleSet {
    grid_size: u8,
    leave_points: u32,
    base_return_partial_points: u32,
    base_return_full_points: u32,
    movement_ranking_point_threshold: u32,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::decode_season()
    }
}

impl RuleSet {
    /// Build from raw values, clamping anything out of bounds.
    pub fn new(draft: RuleSetDraft) -> Self {
        let (rules, report) = draft.clamp();
        if !report.is_clean() {
            warn!(fields = ?report.fields, "rule set fields clamped to bounds");
        }
        rules
    }

    /// Season defaults: 6x6 field, leave 3, partial 5, full 10, RP at 16.
    pub fn decode_season() -> Self {
        Self {
            grid_size: 6,
            leave_points: 3,
            base_return_partial_points: 5,
            base_return_full_points: 10,
            movement_ranking_point_threshold: 16,
        }
    }

    /// Practice preset: same points, RP reachable by a single full return plus leave.
    pub fn practice() -> Self {
        Self {
            movement_ranking_point_threshold: 13,
            ..Self::decode_season()
        }
    }

    pub fn from_env_or_default() -> Self {
        match env::var(RULE_PROFILE_ENV)
            .unwrap_or_default()
            .to_lowercase()
            .as_str()
        {
            "practice" => Self::practice(),
            _ => Self::default(),
        }
    }

    pub fn grid_size(&self) -> u8 {
        self.grid_size
    }

    pub fn leave_points(&self) -> u32 {
        self.leave_points
    }

    pub fn base_return_partial_points(&self) -> u32 {
        self.base_return_partial_points
    }

    pub fn base_return_full_points(&self) -> u32 {
        self.base_return_full_points
    }

    pub fn movement_rp_threshold(&self) -> u32 {
        self.movement_ranking_point_threshold
    }

    /// Editable copy of the current values.
    pub fn to_draft(&self) -> RuleSetDraft {
        RuleSetDraft {
            grid_size: i64::from(self.grid_size),
            leave_points: i64::from(self.leave_points),
            base_return_partial_points: i64::from(self.base_return_partial_points),
            base_return_full_points: i64::from(self.base_return_full_points),
            movement_ranking_point_threshold: i64::from(self.movement_ranking_point_threshold),
        }
    }
}

/// Unvalidated rule values as they arrive from a form, a config file or a shared link.
///
/// Missing keys fall back to the season defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RuleSetDraft {
    #[serde(deserialize_with = "saturating_int")]
    pub grid_size: i64,
    #[serde(deserialize_with = "saturating_int")]
    pub leave_points: i64,
    #[serde(deserialize_with = "saturating_int")]
    pub base_return_partial_points: i64,
    #[serde(deserialize_with = "saturating_int")]
    pub base_return_full_points: i64,
    #[serde(deserialize_with = "saturating_int")]
    pub movement_ranking_point_threshold: i64,
}

/// Any JSON number, saturated into `i64` so that [`RuleSetDraft::clamp`] sees it.
/// Fractions truncate toward zero.
fn saturating_int<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    struct SaturatingInt;

    impl<'de> Visitor<'de> for SaturatingInt {
        type Value = i64;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a number")
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<i64, E> {
            Ok(v)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<i64, E> {
            Ok(i64::try_from(v).unwrap_or(i64::MAX))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<i64, E> {
            if v.is_nan() {
                return Err(E::invalid_value(Unexpected::Float(v), &self));
            }
            // `as` saturates at the i64 bounds
            Ok(v as i64)
        }
    }

    deserializer.deserialize_any(SaturatingInt)
}

impl Default for RuleSetDraft {
    fn default() -> Self {
        RuleSet::decode_season().to_draft()
    }
}

/// Names of the fields that had to be clamped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClampReport {
    pub fields: Vec<&'static str>,
}

impl ClampReport {
    pub fn is_clean(&self) -> bool {
        self.fields.is_empty()
    }
}

impl RuleSetDraft {
    pub fn clamp(&self) -> (RuleSet, ClampReport) {
        let mut report = ClampReport::default();
        let mut bound = |name: &'static str, value: i64, min: u32, max: u32| -> u32 {
            let clamped = value.clamp(i64::from(min), i64::from(max));
            if clamped != value {
                report.fields.push(name);
            }
            clamped as u32
        };

        let grid_size = bound(
            "gridSize",
            self.grid_size,
            u32::from(MIN_GRID_SIZE),
            u32::from(MAX_GRID_SIZE),
        ) as u8;
        let leave_points = bound("leavePoints", self.leave_points, 0, MAX_POINTS);
        let base_return_partial_points = bound(
            "baseReturnPartialPoints",
            self.base_return_partial_points,
            0,
            MAX_POINTS,
        );
        let base_return_full_points =
            bound("baseReturnFullPoints", self.base_return_full_points, 0, MAX_POINTS);
        let movement_ranking_point_threshold = bound(
            "movementRankingPointThreshold",
            self.movement_ranking_point_threshold,
            0,
            MAX_RP_THRESHOLD,
        );

        let rules = RuleSet {
            grid_size,
            leave_points,
            base_return_partial_points,
            base_return_full_points,
            movement_ranking_point_threshold,
        };
        (rules, report)
    }
}

impl From<RuleSetDraft> for RuleSet {
    fn from(draft: RuleSetDraft) -> Self {
        RuleSet::new(draft)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_season() {
        let rules = RuleSet::default();
        assert_eq!(rules.grid_size(), 6);
        assert_eq!(rules.leave_points(), 3);
        assert_eq!(rules.base_return_partial_points(), 5);
        assert_eq!(rules.base_return_full_points(), 10);
        assert_eq!(rules.movement_rp_threshold(), 16);
    }

    #[test]
    fn test_clamp_reports_each_out_of_range_field() {
        let draft = RuleSetDraft {
            grid_size: 12,
            leave_points: -4,
            ..RuleSetDraft::default()
        };
        let (rules, report) = draft.clamp();
        assert_eq!(rules.grid_size(), MAX_GRID_SIZE);
        assert_eq!(rules.leave_points(), 0);
        assert_eq!(report.fields, vec!["gridSize", "leavePoints"]);
    }

    #[test]
    fn test_clamp_small_grid_to_minimum() {
        let draft = RuleSetDraft { grid_size: 1, ..RuleSetDraft::default() };
        assert_eq!(RuleSet::new(draft).grid_size(), MIN_GRID_SIZE);
    }

    #[test]
    fn test_in_range_draft_is_clean() {
        let (rules, report) = RuleSet::practice().to_draft().clamp();
        assert!(report.is_clean());
        assert_eq!(rules, RuleSet::practice());
    }

    #[test]
    fn test_deserialize_clamps_and_fills_missing() {
        let rules: RuleSet =
            serde_json::from_str(r#"{"gridSize": 3, "leavePoints": 7}"#).unwrap();
        assert_eq!(rules.grid_size(), MIN_GRID_SIZE);
        assert_eq!(rules.leave_points(), 7);
        assert_eq!(rules.base_return_full_points(), 10);
    }

    #[test]
    fn test_deserialize_saturates_huge_numbers() {
        let rules: RuleSet = serde_json::from_str(
            r#"{"gridSize": 8, "leavePoints": 10000000000000000000, "baseReturnFullPoints": -1e40, "movementRankingPointThreshold": 1e300}"#,
        )
        .unwrap();
        assert_eq!(rules.grid_size(), 8);
        assert_eq!(rules.leave_points(), MAX_POINTS);
        assert_eq!(rules.base_return_full_points(), 0);
        assert_eq!(rules.movement_rp_threshold(), MAX_RP_THRESHOLD);
    }

    #[test]
    fn test_deserialize_truncates_fractions() {
        let rules: RuleSet = serde_json::from_str(r#"{"leavePoints": 7.9}"#).unwrap();
        assert_eq!(rules.leave_points(), 7);
        assert!(serde_json::from_str::<RuleSet>(r#"{"leavePoints": "seven"}"#).is_err());
    }

    #[test]
    fn test_serialize_uses_camel_case_keys() {
        let value = serde_json::to_value(RuleSet::default()).unwrap();
        assert_eq!(value["gridSize"], 6);
        assert_eq!(value["movementRankingPointThreshold"], 16);
        assert_eq!(value["baseReturnPartialPoints"], 5);
    }
}
