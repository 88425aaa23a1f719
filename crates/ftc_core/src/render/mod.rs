//! Scene projection
//!
//! Turns field geometry plus robot positions into an ordered list of
//! declarative primitives. Rendering never mutates match state, and the
//! scoreboard overlay only displays values computed elsewhere.
//!
//! Drawing order: background, grid, zones, artifacts, robots, overlay.

pub mod surface;

use serde::{Deserialize, Serialize};

pub use surface::{initialize, SceneHandle, Surface, SvgSurface};

use crate::error::FieldError;
use crate::field::motif::Motif;
use crate::field::zones::{ArtifactColor, Zone, ZoneGeometry, ZoneKind};
use crate::field::{FieldLayout, PixelPoint, PixelRect, TileCoord};
use crate::match_state::{format_clock, Command, MatchState};
use crate::robot::{Alliance, Robot};
use crate::scoring::ScoreSummary;

/// Token inset from each tile edge, as a fraction of a tile.
pub const TOKEN_INSET_FRACTION: f32 = 0.125;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

pub mod palette {
    use super::Rgb;

    pub const BACKGROUND: Rgb = Rgb(250, 250, 250);
    pub const FIELD: Rgb = Rgb(224, 224, 224);
    pub const GRID_LINE: Rgb = Rgb(158, 158, 158);
    pub const RED: Rgb = Rgb(211, 47, 47);
    pub const RED_TINT: Rgb = Rgb(255, 205, 210);
    pub const BLUE: Rgb = Rgb(25, 118, 210);
    pub const BLUE_TINT: Rgb = Rgb(187, 222, 251);
    pub const PURPLE: Rgb = Rgb(123, 31, 162);
    pub const GREEN: Rgb = Rgb(56, 142, 60);
    pub const TEXT: Rgb = Rgb(33, 33, 33);
    pub const TOKEN_TEXT: Rgb = Rgb(255, 255, 255);
}

fn alliance_color(alliance: Alliance) -> Rgb {
    match alliance {
        Alliance::Red => palette::RED,
        Alliance::Blue => palette::BLUE,
    }
}

fn alliance_tint(alliance: Alliance) -> Rgb {
    match alliance {
        Alliance::Red => palette::RED_TINT,
        Alliance::Blue => palette::BLUE_TINT,
    }
}

fn artifact_color(color: ArtifactColor) -> Rgb {
    match color {
        ArtifactColor::Purple => palette::PURPLE,
        ArtifactColor::Green => palette::GREEN,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layer {
    Background,
    Grid,
    Zone,
    Artifact,
    Robot,
    Overlay,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum Shape {
    Line { from: PixelPoint, to: PixelPoint },
    Rect { rect: PixelRect },
    Polygon { points: Vec<PixelPoint> },
    Circle { center: PixelPoint, radius: f32 },
    Text { at: PixelPoint, content: String, size: f32 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Primitive {
    pub layer: Layer,
    #[serde(flatten)]
    pub shape: Shape,
    pub fill: Option<Rgb>,
    pub stroke: Option<Rgb>,
    pub stroke_width: f32,
    /// Stable handle for hit-testing and tests, e.g. `robot:R1` or `zone:blue:goal`.
    pub tag: Option<String>,
}

impl Primitive {
    fn new(layer: Layer, shape: Shape) -> Self {
        Self { layer, shape, fill: None, stroke: None, stroke_width: 0.0, tag: None }
    }

    fn fill(mut self, color: Rgb) -> Self {
        self.fill = Some(color);
        self
    }

    fn stroke(mut self, color: Rgb, width: f32) -> Self {
        self.stroke = Some(color);
        self.stroke_width = width;
        self
    }

    fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }
}

/// A full frame, ready for any 2D vector surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub width: f32,
    pub height: f32,
    pub primitives: Vec<Primitive>,
}

impl Scene {
    pub fn layer(&self, layer: Layer) -> impl Iterator<Item = &Primitive> {
        self.primitives.iter().filter(move |p| p.layer == layer)
    }

    pub fn find_tag(&self, tag: &str) -> Option<&Primitive> {
        self.primitives.iter().find(|p| p.tag.as_deref() == Some(tag))
    }
}

/// Already-computed values shown on top of the field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Overlay {
    pub phase: String,
    pub clock: String,
    pub scores: ScoreSummary,
    pub motif: Option<Motif>,
}

impl Overlay {
    pub fn from_state(state: &MatchState, motif: Option<Motif>) -> Self {
        Self {
            phase: state.phase().label().to_string(),
            clock: format_clock(state.remaining_secs()),
            scores: state.scores(),
            motif,
        }
    }
}

/// Pixel rectangle of a robot token: the tile shrunk by the inset on every side.
pub fn token_rect(layout: &FieldLayout, tile: TileCoord, grid_size: u8) -> Result<PixelRect, FieldError> {
    let cell = layout.tile_rect(tile, grid_size)?;
    let inset = TOKEN_INSET_FRACTION * layout.tile_size_px;
    Ok(PixelRect::new(cell.x + inset, cell.y + inset, cell.width - 2.0 * inset, cell.height - 2.0 * inset))
}

/// Project field, zones and robots into a scene.
pub fn render_scene(
    layout: &FieldLayout,
    grid_size: u8,
    zones: &[Zone],
    roster: &[Robot],
    overlay: Option<&Overlay>,
) -> Result<Scene, FieldError> {
    let (width, height) = layout.canvas_size(grid_size);
    let mut primitives = Vec::new();

    primitives.push(
        Primitive::new(Layer::Background, Shape::Rect { rect: PixelRect::new(0.0, 0.0, width, height) })
            .fill(palette::BACKGROUND),
    );
    let field = layout.field_rect(grid_size);
    primitives.push(
        Primitive::new(Layer::Background, Shape::Rect { rect: field })
            .fill(palette::FIELD)
            .tag("field"),
    );

    push_grid_lines(&mut primitives, &field, layout.tile_size_px, grid_size);

    for zone in zones {
        push_zone(&mut primitives, zone, layout, grid_size)?;
    }

    for robot in roster {
        let rect = token_rect(layout, robot.position, grid_size)?;
        primitives.push(
            Primitive::new(Layer::Robot, Shape::Rect { rect })
                .fill(alliance_color(robot.alliance))
                .stroke(palette::TEXT, 2.0)
                .tag(format!("robot:{}", robot.id)),
        );
        primitives.push(Primitive::new(
            Layer::Robot,
            Shape::Text { at: rect.center(), content: robot.id.clone(), size: rect.height / 3.0 },
        )
        .fill(palette::TOKEN_TEXT));
    }

    if let Some(overlay) = overlay {
        push_overlay(&mut primitives, overlay, layout, width);
    }

    // Stable: keeps declaration order within a layer.
    primitives.sort_by_key(|p| p.layer);
    Ok(Scene { width, height, primitives })
}

/// Render the current match with the zones of its grid size.
pub fn render_match(
    state: &MatchState,
    layout: &FieldLayout,
    zones: &[Zone],
    motif: Option<Motif>,
) -> Result<Scene, FieldError> {
    let overlay = Overlay::from_state(state, motif);
    render_scene(layout, state.grid_size(), zones, state.roster(), Some(&overlay))
}

fn push_grid_lines(primitives: &mut Vec<Primitive>, field: &PixelRect, tile: f32, grid_size: u8) {
    for i in 0..=grid_size {
        let offset = f32::from(i) * tile;
        primitives.push(
            Primitive::new(
                Layer::Grid,
                Shape::Line {
                    from: PixelPoint::new(field.x + offset, field.y),
                    to: PixelPoint::new(field.x + offset, field.bottom()),
                },
            )
            .stroke(palette::GRID_LINE, 1.0),
        );
        primitives.push(
            Primitive::new(
                Layer::Grid,
                Shape::Line {
                    from: PixelPoint::new(field.x, field.y + offset),
                    to: PixelPoint::new(field.right(), field.y + offset),
                },
            )
            .stroke(palette::GRID_LINE, 1.0),
        );
    }
}

fn push_zone(
    primitives: &mut Vec<Primitive>,
    zone: &Zone,
    layout: &FieldLayout,
    grid_size: u8,
) -> Result<(), FieldError> {
    let tag = format!("zone:{}:{}", zone.alliance.name().to_lowercase(), zone.kind.name());
    let solid = alliance_color(zone.alliance);
    let tint = alliance_tint(zone.alliance);

    match zone.geometry(layout, grid_size)? {
        ZoneGeometry::Triangle { points } => {
            primitives.push(
                Primitive::new(Layer::Zone, Shape::Polygon { points: points.to_vec() })
                    .fill(solid)
                    .tag(tag),
            );
        }
        ZoneGeometry::Rect { rect } => {
            let primitive = Primitive::new(Layer::Zone, Shape::Rect { rect });
            let primitive = match zone.kind {
                ZoneKind::Ramp { .. } => primitive.fill(tint).stroke(solid, 2.0),
                ZoneKind::Tunnel { .. } => primitive.fill(solid),
                ZoneKind::LoadingZone => primitive.stroke(solid, 3.0),
                _ => primitive.fill(tint).stroke(solid, 1.0),
            };
            primitives.push(primitive.tag(tag));
        }
        ZoneGeometry::Markers { markers } => {
            for (i, marker) in markers.iter().enumerate() {
                primitives.push(
                    Primitive::new(Layer::Artifact, Shape::Circle { center: marker.center, radius: marker.radius })
                        .fill(artifact_color(marker.color))
                        .tag(format!("{tag}:{}:{i}", zone.tile.row)),
                );
            }
        }
    }
    Ok(())
}

fn push_overlay(primitives: &mut Vec<Primitive>, overlay: &Overlay, layout: &FieldLayout, width: f32) {
    let size = layout.tile_size_px / 4.0;
    let top = layout.origin_y / 3.0;
    let mut text = |x: f32, y: f32, content: String, color: Rgb, tag: &str| {
        primitives.push(
            Primitive::new(Layer::Overlay, Shape::Text { at: PixelPoint::new(x, y), content, size })
                .fill(color)
                .tag(tag),
        );
    };

    text(width / 2.0, top, format!("{} {}", overlay.phase, overlay.clock), palette::TEXT, "overlay:clock");
    for (i, score) in overlay.scores.alliances.iter().enumerate() {
        let x = width * (1.0 + 2.0 * i as f32) / 4.0;
        let rp = if score.ranking_point { "RP earned" } else { "RP not earned" };
        text(
            x,
            top + size * 1.5,
            format!("{}: {} ({rp})", score.alliance.name(), score.subtotal),
            alliance_color(score.alliance),
            &format!("overlay:{}", score.alliance.name().to_lowercase()),
        );
    }
    text(width / 2.0, top + size * 3.0, format!("Total: {}", overlay.scores.total), palette::TEXT, "overlay:total");
    if let Some(motif) = overlay.motif {
        text(width / 2.0, top + size * 4.5, format!("Motif: {}", motif.label()), palette::TEXT, "overlay:motif");
    }
}

/// The selection seam: a click on a tile with a robot already chosen becomes a move.
pub fn move_command_for_click(selected: Option<&str>, tile: TileCoord) -> Option<Command> {
    selected.map(|id| Command::MoveRobot {
        id: id.to_string(),
        col: i32::from(tile.col),
        row: i32::from(tile.row),
    })
}

/// Pixel variant of [`move_command_for_click`]; clicks off the field produce nothing.
pub fn move_command_for_pixel(
    selected: Option<&str>,
    point: PixelPoint,
    layout: &FieldLayout,
    grid_size: u8,
) -> Option<Command> {
    let tile = layout.pixel_to_tile(point, grid_size)?;
    move_command_for_click(selected, tile)
}
