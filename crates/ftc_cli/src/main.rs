//! ftc_sim CLI
//!
//! Headless driver for the DECODE board simulator: replay command scripts,
//! render the field to SVG and work with shared rule links.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use ftc_core::field::motif::Motif;
use ftc_core::rules::{self, share};
use ftc_core::{initialize, Command, CommandOutcome, RuleSet, SimulatorConfig, SvgSurface};

#[derive(Parser)]
#[command(name = "ftc_sim", version)]
#[command(about = "DECODE board simulator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a command script and print the final match snapshot
    Run {
        /// Simulator config JSON (defaults to FTC_CONFIG_PATH or built-in presets)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Shared rule link or payload, overrides the config rules
        #[arg(long)]
        rules: Option<String>,

        /// JSON array of commands
        #[arg(long)]
        script: Option<PathBuf>,

        /// Also write the final field as SVG
        #[arg(long)]
        svg: Option<PathBuf>,
    },

    /// Render the starting field
    Scene {
        #[arg(long)]
        config: Option<PathBuf>,

        #[arg(long)]
        rules: Option<String>,

        /// Write SVG here instead of printing the scene as JSON
        #[arg(long)]
        svg: Option<PathBuf>,
    },

    /// Encode or decode shared rule links
    Share {
        #[command(subcommand)]
        action: ShareAction,
    },

    /// Draw the obelisk motif
    Motif {
        #[arg(long)]
        seed: Option<u64>,
    },
}

#[derive(Subcommand)]
enum ShareAction {
    /// Build a link fragment from the config rules with optional overrides
    Encode {
        #[arg(long)]
        config: Option<PathBuf>,

        #[arg(long)]
        grid_size: Option<i64>,

        #[arg(long)]
        leave: Option<i64>,

        #[arg(long)]
        partial: Option<i64>,

        #[arg(long)]
        full: Option<i64>,

        /// Movement Ranking Point threshold
        #[arg(long)]
        threshold: Option<i64>,
    },

    /// Print the rule set carried by a link, falling back to defaults
    Decode {
        /// Full URL, `#rules=...` fragment or bare payload
        #[arg(allow_hyphen_values = true)]
        link: String,

        /// Fail instead of falling back to the default rule set
        #[arg(long, default_value = "false")]
        strict: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { config, rules, script, svg } => {
            let config = load_config(config.as_deref(), rules.as_deref())?;
            let mut state = config.new_match();

            if let Some(script) = script {
                let commands = load_script(&script)?;
                let mut ignored = 0usize;
                for (step, command) in commands.into_iter().enumerate() {
                    if let CommandOutcome::Ignored(err) = state.apply(command) {
                        warn!(step, %err, "command ignored");
                        ignored += 1;
                    }
                }
                info!(ignored, "script finished");
            }

            if let Some(svg) = svg {
                write_svg(&svg, &config, &state)?;
            }

            println!("{}", serde_json::to_string_pretty(&state.snapshot())?);
        }

        Commands::Scene { config, rules, svg } => {
            let config = load_config(config.as_deref(), rules.as_deref())?;
            let state = config.new_match();
            match svg {
                Some(path) => write_svg(&path, &config, &state)?,
                None => {
                    let zones = ftc_core::field::zones::field_zones(state.grid_size(), &config.artifacts);
                    let scene = ftc_core::render_match(&state, &config.layout, &zones, config.motif())?;
                    println!("{}", serde_json::to_string_pretty(&scene)?);
                }
            }
        }

        Commands::Share { action } => match action {
            ShareAction::Encode { config, grid_size, leave, partial, full, threshold } => {
                let base = load_config(config.as_deref(), None)?.rules;
                let mut draft = base.to_draft();
                if let Some(v) = grid_size {
                    draft.grid_size = v;
                }
                if let Some(v) = leave {
                    draft.leave_points = v;
                }
                if let Some(v) = partial {
                    draft.base_return_partial_points = v;
                }
                if let Some(v) = full {
                    draft.base_return_full_points = v;
                }
                if let Some(v) = threshold {
                    draft.movement_ranking_point_threshold = v;
                }
                let (rules, report) = draft.clamp();
                if !report.is_clean() {
                    warn!(fields = ?report.fields, "values clamped into range");
                }
                println!("{}", share::encode_fragment(&rules));
            }

            ShareAction::Decode { link, strict } => {
                let rules: RuleSet = if strict {
                    rules::try_decode(&link).context("Failed to decode shared rules")?
                } else {
                    rules::decode_or_default(&link)
                };
                println!("{}", serde_json::to_string_pretty(&rules)?);
            }
        },

        Commands::Motif { seed } => {
            let motif = match seed {
                Some(seed) => Motif::pick(seed),
                None => Motif::pick_with(&mut rand::thread_rng()),
            };
            println!("{}", motif.label());
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>, rules_link: Option<&str>) -> Result<SimulatorConfig> {
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config: {}", path.display()))?;
            SimulatorConfig::from_json(&content)
                .with_context(|| format!("Failed to parse config: {}", path.display()))?
        }
        None => SimulatorConfig::from_env().map_err(anyhow::Error::msg)?,
    };
    if let Some(link) = rules_link {
        config.rules = rules::decode_or_default(link);
    }
    Ok(config)
}

fn load_script(path: &Path) -> Result<Vec<Command>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read script: {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse script: {}", path.display()))
}

fn write_svg(path: &Path, config: &SimulatorConfig, state: &ftc_core::MatchState) -> Result<()> {
    let mut handle = initialize(SvgSurface::new(), state.grid_size())
        .with_layout(config.layout)
        .with_patterns(config.artifacts.clone())
        .with_motif(config.motif());
    handle.redraw(state)?;
    fs::write(path, handle.into_surface().into_string())
        .with_context(|| format!("Failed to write SVG: {}", path.display()))?;
    info!(path = %path.display(), "scene written");
    Ok(())
}
