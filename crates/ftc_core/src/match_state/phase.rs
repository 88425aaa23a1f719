//! Match phases and their default durations.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPhase {
    Autonomous,
    #[serde(rename = "teleop")]
    TeleOp,
    Endgame,
}

impl MatchPhase {
    /// Phase order within a match.
    pub const ALL: [MatchPhase; 3] = [MatchPhase::Autonomous, MatchPhase::TeleOp, MatchPhase::Endgame];

    /// Next phase, wrapping from Endgame back to Autonomous.
    pub fn next(self) -> Self {
        match self {
            MatchPhase::Autonomous => MatchPhase::TeleOp,
            MatchPhase::TeleOp => MatchPhase::Endgame,
            MatchPhase::Endgame => MatchPhase::Autonomous,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MatchPhase::Autonomous => "Autonomous",
            MatchPhase::TeleOp => "TeleOp",
            MatchPhase::Endgame => "Endgame",
        }
    }
}

impl std::str::FromStr for MatchPhase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "autonomous" | "auto" => Ok(MatchPhase::Autonomous),
            "teleop" | "driver" => Ok(MatchPhase::TeleOp),
            "endgame" => Ok(MatchPhase::Endgame),
            other => Err(format!("unknown match phase: {other}")),
        }
    }
}

/// Default duration of each phase, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhaseSchedule {
    pub autonomous_secs: u32,
    pub teleop_secs: u32,
    pub endgame_secs: u32,
}

impl Default for PhaseSchedule {
    fn default() -> Self {
        // 2:00 driver period, the last 20 s of which is endgame
        Self { autonomous_secs: 30, teleop_secs: 100, endgame_secs: 20 }
    }
}

impl PhaseSchedule {
    pub fn duration(&self, phase: MatchPhase) -> u32 {
        match phase {
            MatchPhase::Autonomous => self.autonomous_secs,
            MatchPhase::TeleOp => self.teleop_secs,
            MatchPhase::Endgame => self.endgame_secs,
        }
    }

    pub fn total_secs(&self) -> u32 {
        MatchPhase::ALL.iter().map(|&p| self.duration(p)).sum()
    }
}

/// `m:ss` clock text.
pub fn format_clock(secs: u32) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}
