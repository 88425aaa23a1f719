//! # ftc_core - DECODE Board Simulator Engine
//!
//! Rules, field geometry and match state for a tabletop rendition of the
//! FTC DECODE season. The UI layer sends [`Command`]s and redraws from the
//! resulting [`MatchState`]; nothing in here owns a window.
//!
//! ## Features
//! - Configurable rule set, shareable as a URL-safe link payload
//! - Alliance-mirrored field geometry with a bottom-left grid origin
//! - Per-robot and per-alliance scoring with the movement ranking point
//! - Backend-agnostic scene projection with a bundled SVG surface

pub mod config;
pub mod error;
pub mod field;
pub mod match_state;
pub mod render;
pub mod robot;
pub mod rules;
pub mod scoring;

pub use config::SimulatorConfig;
pub use error::{CommandError, FieldError, ShareError};
pub use field::{tile_origin, FieldLayout, PixelPoint, TileCoord};
pub use match_state::{Command, CommandOutcome, MatchPhase, MatchSnapshot, MatchState};
pub use render::{initialize, render_match, Scene, SceneHandle, Surface, SvgSurface};
pub use robot::{Alliance, BaseReturn, Robot};
pub use rules::{RuleSet, RuleSetDraft};
pub use scoring::{ranking_point_earned, score, total_score, ScoreSummary};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
