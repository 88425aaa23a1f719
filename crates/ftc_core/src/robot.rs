//! Robot tokens and their per-match achievements.

use serde::{Deserialize, Serialize};

use crate::field::{EdgeOffset, GridAnchor, TileCoord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Alliance {
    Red,
    Blue,
}

impl Alliance {
    /// Display order.
    pub const ALL: [Alliance; 2] = [Alliance::Red, Alliance::Blue];

    pub fn opponent(self) -> Self {
        match self {
            Alliance::Red => Alliance::Blue,
            Alliance::Blue => Alliance::Red,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Alliance::Red => "Red",
            Alliance::Blue => "Blue",
        }
    }

    fn id_prefix(self) -> char {
        match self {
            Alliance::Red => 'R',
            Alliance::Blue => 'B',
        }
    }
}

/// How far back into its base a robot got by the end of the match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BaseReturn {
    #[default]
    None,
    Partial,
    Full,
}

impl std::str::FromStr for BaseReturn {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" => Ok(BaseReturn::None),
            "partial" => Ok(BaseReturn::Partial),
            "full" => Ok(BaseReturn::Full),
            other => Err(format!("unknown base return level: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Robot {
    pub id: String,
    pub alliance: Alliance,
    pub position: TileCoord,
    pub has_left_start: bool,
    pub base_return: BaseReturn,
}

impl Robot {
    /// A robot at its start tile with no achievements.
    pub fn at_start(id: impl Into<String>, alliance: Alliance, start: TileCoord) -> Self {
        Self {
            id: id.into(),
            alliance,
            position: start,
            has_left_start: false,
            base_return: BaseReturn::None,
        }
    }
}

/// Start tile of one robot per alliance, declared for BLUE.
///
/// The RED robot in the same slot starts on the mirrored tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartSlot {
    pub blue_anchor: GridAnchor,
}

/// Robots fielded by each alliance and where they start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RosterConfig {
    pub slots: Vec<StartSlot>,
}

impl Default for RosterConfig {
    fn default() -> Self {
        use EdgeOffset::{FromHigh, FromLow};
        Self {
            slots: vec![
                // beside the goal
                StartSlot { blue_anchor: GridAnchor::new(FromLow(1), FromHigh(1)) },
                // audience-side launch tile, beside the loading zone; never the
                // centre column, so the mirrored RED start cannot coincide with it
                StartSlot { blue_anchor: GridAnchor::new(FromHigh(1), FromLow(0)) },
            ],
        }
    }
}

impl RosterConfig {
    /// Fresh roster for a grid size: RED robots first, then BLUE, each in slot order.
    ///
    /// Ids are `R1, R2, ..., B1, B2, ...`.
    pub fn build(&self, grid_size: u8) -> Vec<Robot> {
        let mut roster = Vec::with_capacity(self.slots.len() * Alliance::ALL.len());
        for alliance in Alliance::ALL {
            for (i, slot) in self.slots.iter().enumerate() {
                let blue_start = slot.blue_anchor.resolve(grid_size);
                let start = match alliance {
                    Alliance::Blue => blue_start,
                    Alliance::Red => blue_start.mirrored(grid_size),
                };
                let id = format!("{}{}", alliance.id_prefix(), i + 1);
                roster.push(Robot::at_start(id, alliance, start));
            }
        }
        roster
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_roster_order_and_ids() {
        let roster = RosterConfig::default().build(6);
        let ids: Vec<&str> = roster.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["R1", "R2", "B1", "B2"]);
        assert!(roster.iter().all(|r| !r.has_left_start && r.base_return == BaseReturn::None));
    }

    #[test]
    fn test_red_starts_mirror_blue_starts() {
        for grid in 4..=10u8 {
            let roster = RosterConfig::default().build(grid);
            let (red, blue) = roster.split_at(2);
            for (r, b) in red.iter().zip(blue) {
                assert_eq!(r.position, b.position.mirrored(grid));
                assert!(r.position.is_within(grid));
            }
        }
    }

    #[test]
    fn test_default_start_tiles_are_distinct() {
        for grid in 4..=10u8 {
            let roster = RosterConfig::default().build(grid);
            for (i, a) in roster.iter().enumerate() {
                for b in &roster[i + 1..] {
                    assert_ne!(a.position, b.position, "grid {grid}: {} and {} share a start", a.id, b.id);
                }
            }
        }
    }

    #[test]
    fn test_base_return_from_str() {
        assert_eq!("Partial".parse::<BaseReturn>(), Ok(BaseReturn::Partial));
        assert_eq!("full".parse::<BaseReturn>(), Ok(BaseReturn::Full));
        assert!("half".parse::<BaseReturn>().is_err());
    }

    #[test]
    fn test_alliance_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&Alliance::Red).unwrap(), "\"RED\"");
        assert_eq!(Alliance::Blue.opponent(), Alliance::Red);
    }
}
