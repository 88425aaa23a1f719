//! Match session state
//!
//! `MatchState` is the single mutable owner of a match: the roster, the
//! rule set in effect, the current phase and the remaining time. It only
//! changes through its command methods, each of which either applies fully
//! or returns an error and leaves the state untouched.
//!
//! ## Phase transitions
//!
//! Transitions are operator-driven. The clock reaching zero is observable
//! through [`MatchState::is_time_up`] but never changes the phase by itself.
//! A transition resets the clock to the new phase's default duration and
//! keeps robot positions and achievements.

pub mod command;
pub mod phase;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

pub use command::{Command, CommandOutcome};
pub use phase::{format_clock, MatchPhase, PhaseSchedule};

use crate::error::CommandError;
use crate::field::TileCoord;
use crate::robot::{BaseReturn, Robot, RosterConfig};
use crate::rules::RuleSet;
use crate::scoring::ScoreSummary;

#[derive(Debug, Clone, PartialEq)]
pub struct MatchState {
    rules: RuleSet,
    roster_config: RosterConfig,
    schedule: PhaseSchedule,
    roster: Vec<Robot>,
    phase: MatchPhase,
    remaining_secs: u32,
}

impl Default for MatchState {
    fn default() -> Self {
        Self::new(RuleSet::default(), RosterConfig::default(), PhaseSchedule::default())
    }
}

impl MatchState {
    /// First phase, full clock, roster at its start tiles.
    pub fn new(rules: RuleSet, roster_config: RosterConfig, schedule: PhaseSchedule) -> Self {
        let roster = roster_config.build(rules.grid_size());
        let phase = MatchPhase::ALL[0];
        Self {
            rules,
            roster_config,
            schedule,
            roster,
            phase,
            remaining_secs: schedule.duration(phase),
        }
    }

    // ========================
    // Reads
    // ========================

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn grid_size(&self) -> u8 {
        self.rules.grid_size()
    }

    /// Robots in stable display order.
    pub fn roster(&self) -> &[Robot] {
        &self.roster
    }

    pub fn robot(&self, id: &str) -> Option<&Robot> {
        self.roster.iter().find(|r| r.id == id)
    }

    pub fn phase(&self) -> MatchPhase {
        self.phase
    }

    pub fn schedule(&self) -> &PhaseSchedule {
        &self.schedule
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn is_time_up(&self) -> bool {
        self.remaining_secs == 0
    }

    /// Scores recomputed from the current roster and rules.
    pub fn scores(&self) -> ScoreSummary {
        ScoreSummary::compute(&self.roster, &self.rules)
    }

    pub fn snapshot(&self) -> MatchSnapshot {
        MatchSnapshot {
            rules: self.rules,
            phase: self.phase,
            remaining_secs: self.remaining_secs,
            roster: self.roster.clone(),
            scores: self.scores(),
        }
    }

    // ========================
    // Commands
    // ========================

    /// Teleport a robot to any tile on the field. No path checks.
    pub fn move_robot(&mut self, id: &str, col: i32, row: i32) -> Result<(), CommandError> {
        let grid_size = self.grid_size();
        let target = TileCoord::checked(col, row, grid_size).map_err(|e| {
            warn!(robot = id, col, row, grid_size, "move rejected: off field");
            CommandError::from(e)
        })?;
        let robot = self.robot_mut(id)?;
        robot.position = target;
        debug!(robot = id, col, row, "robot moved");
        Ok(())
    }

    pub fn set_leave(&mut self, id: &str, left: bool) -> Result<(), CommandError> {
        self.robot_mut(id)?.has_left_start = left;
        debug!(robot = id, left, "leave set");
        Ok(())
    }

    pub fn set_base_return(&mut self, id: &str, level: BaseReturn) -> Result<(), CommandError> {
        self.robot_mut(id)?.base_return = level;
        debug!(robot = id, ?level, "base return set");
        Ok(())
    }

    /// Start tiles, no achievements. Phase, clock and rules are kept.
    pub fn reset_roster(&mut self) {
        self.roster = self.roster_config.build(self.grid_size());
        info!(robots = self.roster.len(), "roster reset");
    }

    /// Swap the rule set without touching the phase or achievements.
    ///
    /// Robots left outside a smaller grid are moved to the nearest edge tile.
    pub fn replace_rule_set(&mut self, rules: RuleSet) {
        let grid_size = rules.grid_size();
        for robot in &mut self.roster {
            if !robot.position.is_within(grid_size) {
                let clamped = robot.position.clamped(grid_size);
                warn!(robot = %robot.id, ?clamped, grid_size, "robot clamped into smaller field");
                robot.position = clamped;
            }
        }
        self.rules = rules;
        info!(?rules, "rule set replaced");
    }

    /// Jump to a phase and reset the clock to its default duration.
    pub fn select_phase(&mut self, phase: MatchPhase) {
        self.phase = phase;
        self.remaining_secs = self.schedule.duration(phase);
        info!(phase = phase.label(), remaining = self.remaining_secs, "phase selected");
    }

    pub fn advance_phase(&mut self) -> MatchPhase {
        let next = self.phase.next();
        self.select_phase(next);
        next
    }

    /// One second off the clock, stopping at zero. Returns the remaining time.
    pub fn tick(&mut self) -> u32 {
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        self.remaining_secs
    }

    /// Apply a command from the UI boundary.
    pub fn apply(&mut self, command: Command) -> CommandOutcome {
        let result = match command {
            Command::MoveRobot { id, col, row } => self.move_robot(&id, col, row),
            Command::SetLeave { id, left } => self.set_leave(&id, left),
            Command::SetBaseReturn { id, level } => self.set_base_return(&id, level),
            Command::ResetRoster => {
                self.reset_roster();
                Ok(())
            }
            Command::ReplaceRuleSet { rules } => {
                self.replace_rule_set(rules);
                Ok(())
            }
            Command::SelectPhase { phase } => {
                self.select_phase(phase);
                Ok(())
            }
            Command::AdvancePhase => {
                self.advance_phase();
                Ok(())
            }
            Command::Tick => {
                self.tick();
                Ok(())
            }
        };
        match result {
            Ok(()) => CommandOutcome::Applied,
            Err(e) => CommandOutcome::Ignored(e),
        }
    }

    fn robot_mut(&mut self, id: &str) -> Result<&mut Robot, CommandError> {
        self.roster.iter_mut().find(|r| r.id == id).ok_or_else(|| {
            warn!(robot = id, "command for unknown robot ignored");
            CommandError::UnknownRobot { id: id.to_string() }
        })
    }
}

/// Read-only view handed to the UI and renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchSnapshot {
    pub rules: RuleSet,
    pub phase: MatchPhase,
    pub remaining_secs: u32,
    pub roster: Vec<Robot>,
    pub scores: ScoreSummary,
}
