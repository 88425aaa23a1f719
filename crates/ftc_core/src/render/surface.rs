//! Drawing surfaces
//!
//! A [`Surface`] is the thin adapter between a [`Scene`] and a concrete
//! drawing backend. [`SvgSurface`] is the bundled backend; a canvas or GPU
//! shell implements the same three calls.

use std::fmt::Write as _;
use tracing::info;

use super::{render_match, Primitive, Scene, Shape};
use crate::error::FieldError;
use crate::field::motif::Motif;
use crate::field::zones::{field_zones, ArtifactPatterns};
use crate::field::FieldLayout;
use crate::match_state::MatchState;

pub trait Surface {
    fn begin(&mut self, width: f32, height: f32);
    fn draw(&mut self, primitive: &Primitive);
    fn finish(&mut self);
}

/// Replays a scene onto a surface in primitive order.
pub fn paint<S: Surface + ?Sized>(surface: &mut S, scene: &Scene) {
    surface.begin(scene.width, scene.height);
    for primitive in &scene.primitives {
        surface.draw(primitive);
    }
    surface.finish();
}

/// Builds a standalone SVG document.
#[derive(Debug, Default, Clone)]
pub struct SvgSurface {
    document: String,
}

impl SvgSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// The last finished document.
    pub fn as_str(&self) -> &str {
        &self.document
    }

    pub fn into_string(self) -> String {
        self.document
    }
}

fn paint_attrs(primitive: &Primitive) -> String {
    let fill = primitive.fill.map_or_else(|| "none".to_string(), |c| c.to_hex());
    match primitive.stroke {
        Some(stroke) => format!(
            r#"fill="{fill}" stroke="{}" stroke-width="{}""#,
            stroke.to_hex(),
            primitive.stroke_width
        ),
        None => format!(r#"fill="{fill}""#),
    }
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

impl Surface for SvgSurface {
    fn begin(&mut self, width: f32, height: f32) {
        self.document.clear();
        let _ = write!(
            self.document,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#
        );
    }

    fn draw(&mut self, primitive: &Primitive) {
        let attrs = paint_attrs(primitive);
        let id = primitive
            .tag
            .as_deref()
            .map(|t| format!(r#" data-tag="{}""#, escape_xml(t)))
            .unwrap_or_default();
        // Writing into a String cannot fail.
        let _ = match &primitive.shape {
            Shape::Line { from, to } => write!(
                self.document,
                r#"<line x1="{}" y1="{}" x2="{}" y2="{}" {attrs}{id}/>"#,
                from.x, from.y, to.x, to.y
            ),
            Shape::Rect { rect } => write!(
                self.document,
                r#"<rect x="{}" y="{}" width="{}" height="{}" {attrs}{id}/>"#,
                rect.x, rect.y, rect.width, rect.height
            ),
            Shape::Polygon { points } => {
                let points: Vec<String> = points.iter().map(|p| format!("{},{}", p.x, p.y)).collect();
                write!(self.document, r#"<polygon points="{}" {attrs}{id}/>"#, points.join(" "))
            }
            Shape::Circle { center, radius } => write!(
                self.document,
                r#"<circle cx="{}" cy="{}" r="{radius}" {attrs}{id}/>"#,
                center.x, center.y
            ),
            Shape::Text { at, content, size } => write!(
                self.document,
                r#"<text x="{}" y="{}" font-size="{size}" text-anchor="middle" dominant-baseline="middle" {attrs}{id}>{}</text>"#,
                at.x,
                at.y,
                escape_xml(content)
            ),
        };
    }

    fn finish(&mut self) {
        self.document.push_str("</svg>");
    }
}

/// A surface bound to a field layout, redrawn from match state on demand.
pub struct SceneHandle<S: Surface> {
    surface: S,
    layout: FieldLayout,
    patterns: ArtifactPatterns,
    motif: Option<Motif>,
    grid_size: u8,
    last_scene: Option<Scene>,
}

/// Bind a surface to a grid with the default layout. Nothing is drawn until
/// the first [`SceneHandle::redraw`].
///
/// `grid_size` sizes the canvas up front ([`SceneHandle::canvas_size`]). The
/// handle is then bound to whatever grid the drawn state uses: a redraw with
/// a different grid size rebinds it.
pub fn initialize<S: Surface>(surface: S, grid_size: u8) -> SceneHandle<S> {
    SceneHandle {
        surface,
        layout: FieldLayout::default(),
        patterns: ArtifactPatterns::default(),
        motif: None,
        grid_size,
        last_scene: None,
    }
}

impl<S: Surface> SceneHandle<S> {
    pub fn with_layout(mut self, layout: FieldLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_patterns(mut self, patterns: ArtifactPatterns) -> Self {
        self.patterns = patterns;
        self
    }

    pub fn with_motif(mut self, motif: Option<Motif>) -> Self {
        self.motif = motif;
        self
    }

    /// Project the state and paint it, rebinding to the state's grid size if the rules changed.
    pub fn redraw(&mut self, state: &MatchState) -> Result<&Scene, FieldError> {
        if state.grid_size() != self.grid_size {
            info!(from = self.grid_size, to = state.grid_size(), "scene rebound to new grid size");
            self.grid_size = state.grid_size();
        }
        let zones = field_zones(self.grid_size, &self.patterns);
        let scene = render_match(state, &self.layout, &zones, self.motif)?;
        paint(&mut self.surface, &scene);
        Ok(self.last_scene.insert(scene))
    }

    pub fn grid_size(&self) -> u8 {
        self.grid_size
    }

    /// Surface size for the bound grid, available before the first redraw.
    pub fn canvas_size(&self) -> (f32, f32) {
        self.layout.canvas_size(self.grid_size)
    }

    pub fn last_scene(&self) -> Option<&Scene> {
        self.last_scene.as_ref()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{RuleSet, RuleSetDraft};

    #[derive(Default)]
    struct CountingSurface {
        begun: usize,
        drawn: usize,
        finished: usize,
    }

    impl Surface for CountingSurface {
        fn begin(&mut self, _width: f32, _height: f32) {
            self.begun += 1;
        }

        fn draw(&mut self, _primitive: &Primitive) {
            self.drawn += 1;
        }

        fn finish(&mut self) {
            self.finished += 1;
        }
    }

    #[test]
    fn test_initialize_draws_nothing() {
        let handle = initialize(CountingSurface::default(), 6);
        assert_eq!(handle.surface().begun, 0);
        assert!(handle.last_scene().is_none());
    }

    #[test]
    fn test_redraw_paints_every_primitive() {
        let mut handle = initialize(CountingSurface::default(), 6);
        let state = MatchState::default();
        let count = handle.redraw(&state).unwrap().primitives.len();
        let surface = handle.surface();
        assert_eq!((surface.begun, surface.finished), (1, 1));
        assert_eq!(surface.drawn, count);
    }

    #[test]
    fn test_redraw_follows_rule_grid_size() {
        let mut handle = initialize(CountingSurface::default(), 6);
        let mut state = MatchState::default();
        state.replace_rule_set(RuleSet::new(RuleSetDraft { grid_size: 8, ..RuleSetDraft::default() }));
        handle.redraw(&state).unwrap();
        assert_eq!(handle.grid_size(), 8);
    }

    #[test]
    fn test_canvas_size_uses_initial_grid_until_redraw() {
        let layout = FieldLayout::new(50.0, 100.0, 100.0);
        let mut handle = initialize(CountingSurface::default(), 4).with_layout(layout);
        assert_eq!(handle.canvas_size(), (400.0, 400.0));

        let scene = handle.redraw(&MatchState::default()).unwrap();
        let drawn = (scene.width, scene.height);
        assert_eq!(handle.canvas_size(), drawn);
        assert_eq!(drawn, (500.0, 500.0));
    }

    #[test]
    fn test_svg_document_is_well_formed() {
        let mut handle = initialize(SvgSurface::new(), 6).with_motif(Some(Motif::Gpp));
        handle.redraw(&MatchState::default()).unwrap();
        let svg = handle.into_surface().into_string();
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains(r#"data-tag="robot:R1""#));
        assert!(svg.contains("<polygon"));
        assert!(svg.contains("Motif: GPP"));
    }

    #[test]
    fn test_svg_escapes_text() {
        assert_eq!(escape_xml(r#"<R&D "1">"#), "&lt;R&amp;D &quot;1&quot;&gt;");
    }
}
