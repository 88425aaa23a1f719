//! Command boundary consumed from the UI layer.

use serde::{Deserialize, Serialize};

use super::phase::MatchPhase;
use crate::error::CommandError;
use crate::robot::BaseReturn;
use crate::rules::RuleSet;

/// One discrete UI event.
///
/// Serialized as `{"command": "move_robot", "id": "R1", "col": 2, "row": 3}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    MoveRobot { id: String, col: i32, row: i32 },
    SetLeave { id: String, left: bool },
    SetBaseReturn { id: String, level: BaseReturn },
    ResetRoster,
    ReplaceRuleSet { rules: RuleSet },
    SelectPhase { phase: MatchPhase },
    AdvancePhase,
    Tick,
}

/// Result of [`MatchState::apply`](super::MatchState::apply).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    Applied,
    /// State is unchanged.
    Ignored(CommandError),
}

impl CommandOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, CommandOutcome::Applied)
    }
}
