//! Field coordinate system
//!
//! Maps grid tiles to pixel rectangles on the rendering surface.
//!
//! ## Coordinate Systems
//!
//! **Grid coordinates** (used by robots, zones, commands):
//! - col: 0 = left wall, grid_size-1 = right wall
//! - row: 0 = bottom (audience) edge, grid_size-1 = top edge
//!
//! **Pixel coordinates** (used by the renderer):
//! - x grows to the right, y grows downwards from the surface top-left
//!
//! Row index runs opposite to screen y:
//! `y = origin_y + (grid_size - 1 - row) * tile_size_px`.

pub mod motif;
pub mod zones;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::FieldError;

/// A tile in grid coordinates. Both are 0-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileCoord {
    pub col: u8,
    pub row: u8,
}

impl TileCoord {
    pub fn new(col: u8, row: u8) -> Self {
        Self { col, row }
    }

    /// Validate signed grid input against a field size.
    pub fn checked(col: i32, row: i32, grid_size: u8) -> Result<Self, FieldError> {
        let size = i32::from(grid_size);
        if (0..size).contains(&col) && (0..size).contains(&row) {
            Ok(Self { col: col as u8, row: row as u8 })
        } else {
            Err(FieldError::OutOfBounds { col, row, grid_size })
        }
    }

    pub fn is_within(self, grid_size: u8) -> bool {
        self.col < grid_size && self.row < grid_size
    }

    /// Nearest tile inside the field.
    pub fn clamped(self, grid_size: u8) -> Self {
        let max = grid_size.saturating_sub(1);
        Self { col: self.col.min(max), row: self.row.min(max) }
    }

    /// Reflect across the vertical centre line: `col -> grid_size - 1 - col`.
    pub fn mirrored(self, grid_size: u8) -> Self {
        let max = grid_size.saturating_sub(1);
        Self { col: max.saturating_sub(self.col), row: self.row }
    }
}

/// Distance from one edge of an axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeOffset {
    /// Counted from index 0.
    FromLow(u8),
    /// Counted from index grid_size-1.
    FromHigh(u8),
}

impl EdgeOffset {
    pub fn resolve(self, grid_size: u8) -> u8 {
        let max = grid_size.saturating_sub(1);
        match self {
            EdgeOffset::FromLow(n) => n.min(max),
            EdgeOffset::FromHigh(n) => max.saturating_sub(n),
        }
    }
}

/// Tile position declared relative to the field edges, valid for any grid size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridAnchor {
    pub col: EdgeOffset,
    pub row: EdgeOffset,
}

impl GridAnchor {
    pub const fn new(col: EdgeOffset, row: EdgeOffset) -> Self {
        Self { col, row }
    }

    pub fn resolve(self, grid_size: u8) -> TileCoord {
        TileCoord::new(self.col.resolve(grid_size), self.row.resolve(grid_size))
    }
}

/// Point on the rendering surface.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PixelPoint {
    pub x: f32,
    pub y: f32,
}

impl PixelPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle on the rendering surface.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl PixelRect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> PixelPoint {
        PixelPoint::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// True if `other` lies entirely inside `self`.
    pub fn contains_rect(&self, other: &PixelRect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }
}

/// Smallest tile a layout will accept, in pixels.
pub const MIN_TILE_SIZE_PX: f32 = 4.0;

/// Pixel placement of the grid on the surface.
///
/// Always sane: tile size is finite and at least [`MIN_TILE_SIZE_PX`], and
/// origins are finite. Both [`FieldLayout::new`] and deserialization repair
/// bad values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawFieldLayout")]
pub struct FieldLayout {
    pub tile_size_px: f32,
    pub origin_x: f32,
    pub origin_y: f32,
}

impl Default for FieldLayout {
    fn default() -> Self {
        // 2.5-tile margin keeps the off-field ramp and tunnel strips on canvas.
        Self { tile_size_px: 80.0, origin_x: 200.0, origin_y: 200.0 }
    }
}

/// Layout values as read from config, before repair.
#[derive(Deserialize)]
#[serde(default)]
struct RawFieldLayout {
    tile_size_px: f32,
    origin_x: f32,
    origin_y: f32,
}

impl Default for RawFieldLayout {
    fn default() -> Self {
        let layout = FieldLayout::default();
        Self { tile_size_px: layout.tile_size_px, origin_x: layout.origin_x, origin_y: layout.origin_y }
    }
}

impl From<RawFieldLayout> for FieldLayout {
    fn from(raw: RawFieldLayout) -> Self {
        FieldLayout::new(raw.tile_size_px, raw.origin_x, raw.origin_y)
    }
}

impl FieldLayout {
    /// Non-finite values fall back to the defaults; small tiles grow to the minimum.
    pub fn new(tile_size_px: f32, origin_x: f32, origin_y: f32) -> Self {
        let defaults = Self::default();
        let tile = if tile_size_px.is_finite() { tile_size_px.max(MIN_TILE_SIZE_PX) } else { defaults.tile_size_px };
        let origin_x = if origin_x.is_finite() { origin_x } else { defaults.origin_x };
        let origin_y = if origin_y.is_finite() { origin_y } else { defaults.origin_y };
        if tile != tile_size_px {
            warn!(requested = tile_size_px, used = tile, "tile size repaired");
        }
        Self { tile_size_px: tile, origin_x, origin_y }
    }

    /// Canvas size needed for the field plus symmetric margins.
    pub fn canvas_size(&self, grid_size: u8) -> (f32, f32) {
        let field = self.field_extent(grid_size);
        (field + 2.0 * self.origin_x, field + 2.0 * self.origin_y)
    }

    pub fn field_extent(&self, grid_size: u8) -> f32 {
        f32::from(grid_size) * self.tile_size_px
    }

    pub fn field_rect(&self, grid_size: u8) -> PixelRect {
        let extent = self.field_extent(grid_size);
        PixelRect::new(self.origin_x, self.origin_y, extent, extent)
    }

    /// Top-left pixel of a tile.
    pub fn tile_origin(&self, tile: TileCoord, grid_size: u8) -> Result<PixelPoint, FieldError> {
        if !tile.is_within(grid_size) {
            return Err(FieldError::OutOfBounds {
                col: i32::from(tile.col),
                row: i32::from(tile.row),
                grid_size,
            });
        }
        let x = self.origin_x + f32::from(tile.col) * self.tile_size_px;
        let y = self.origin_y + f32::from(grid_size - 1 - tile.row) * self.tile_size_px;
        Ok(PixelPoint::new(x, y))
    }

    pub fn tile_rect(&self, tile: TileCoord, grid_size: u8) -> Result<PixelRect, FieldError> {
        let origin = self.tile_origin(tile, grid_size)?;
        Ok(PixelRect::new(origin.x, origin.y, self.tile_size_px, self.tile_size_px))
    }

    pub fn tile_center(&self, tile: TileCoord, grid_size: u8) -> Result<PixelPoint, FieldError> {
        Ok(self.tile_rect(tile, grid_size)?.center())
    }

    /// Inverse of [`tile_origin`](Self::tile_origin); `None` when the point is off-field.
    pub fn pixel_to_tile(&self, point: PixelPoint, grid_size: u8) -> Option<TileCoord> {
        let fx = ((point.x - self.origin_x) / self.tile_size_px).floor();
        let fy = ((point.y - self.origin_y) / self.tile_size_px).floor();
        let size = f32::from(grid_size);
        if !(0.0..size).contains(&fx) || !(0.0..size).contains(&fy) {
            return None;
        }
        let col = fx as u8;
        let row = grid_size - 1 - fy as u8;
        Some(TileCoord::new(col, row))
    }
}

/// Signed grid-cell origin, for callers that have not validated their input.
pub fn tile_origin(
    col: i32,
    row: i32,
    grid_size: u8,
    layout: &FieldLayout,
) -> Result<PixelPoint, FieldError> {
    let tile = TileCoord::checked(col, row, grid_size)?;
    layout.tile_origin(tile, grid_size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degenerate_layout_is_repaired() {
        let layout: FieldLayout =
            serde_json::from_str(r#"{"tile_size_px": -10, "origin_x": 5}"#).unwrap();
        assert_eq!(layout.tile_size_px, MIN_TILE_SIZE_PX);
        assert_eq!(layout.origin_x, 5.0);
        assert_eq!(layout.origin_y, 200.0);

        let layout = FieldLayout::new(f32::NAN, f32::INFINITY, 3.0);
        assert_eq!(layout.tile_size_px, 80.0);
        assert_eq!(layout.origin_x, 200.0);
        assert_eq!(layout.origin_y, 3.0);
        assert_eq!(FieldLayout::new(0.0, 0.0, 0.0).tile_size_px, MIN_TILE_SIZE_PX);
    }

    #[test]
    fn test_row_zero_is_drawn_at_bottom() {
        let layout = FieldLayout::new(50.0, 10.0, 20.0);
        let bottom = layout.tile_origin(TileCoord::new(0, 0), 6).unwrap();
        let top = layout.tile_origin(TileCoord::new(0, 5), 6).unwrap();
        assert_eq!(bottom, PixelPoint::new(10.0, 20.0 + 5.0 * 50.0));
        assert_eq!(top, PixelPoint::new(10.0, 20.0));
    }

    #[test]
    fn test_tile_origin_rejects_out_of_grid() {
        let layout = FieldLayout::default();
        assert_eq!(
            tile_origin(7, 0, 6, &layout),
            Err(FieldError::OutOfBounds { col: 7, row: 0, grid_size: 6 })
        );
        assert!(tile_origin(-1, 2, 6, &layout).is_err());
        assert!(tile_origin(5, 5, 6, &layout).is_ok());
    }

    #[test]
    fn test_pixel_to_tile_inverts_every_tile() {
        let layout = FieldLayout::new(64.0, 32.0, 48.0);
        for grid in 4..=10u8 {
            for col in 0..grid {
                for row in 0..grid {
                    let tile = TileCoord::new(col, row);
                    let center = layout.tile_center(tile, grid).unwrap();
                    assert_eq!(layout.pixel_to_tile(center, grid), Some(tile));
                    let origin = layout.tile_origin(tile, grid).unwrap();
                    assert_eq!(layout.pixel_to_tile(origin, grid), Some(tile));
                }
            }
        }
    }

    #[test]
    fn test_pixel_to_tile_off_field() {
        let layout = FieldLayout::new(50.0, 100.0, 100.0);
        assert_eq!(layout.pixel_to_tile(PixelPoint::new(99.0, 150.0), 6), None);
        assert_eq!(layout.pixel_to_tile(PixelPoint::new(150.0, 400.0), 6), None);
        assert_eq!(layout.pixel_to_tile(PixelPoint::new(150.0, 399.0), 6), Some(TileCoord::new(1, 0)));
    }

    #[test]
    fn test_mirror_and_clamp() {
        assert_eq!(TileCoord::new(0, 3).mirrored(6), TileCoord::new(5, 3));
        assert_eq!(TileCoord::new(2, 1).mirrored(6).mirrored(6), TileCoord::new(2, 1));
        assert_eq!(TileCoord::new(8, 9).clamped(6), TileCoord::new(5, 5));
    }

    #[test]
    fn test_anchor_resolves_for_every_grid() {
        let anchor = GridAnchor::new(EdgeOffset::FromHigh(1), EdgeOffset::FromLow(2));
        assert_eq!(anchor.resolve(4), TileCoord::new(2, 2));
        assert_eq!(anchor.resolve(10), TileCoord::new(8, 2));
        let far = GridAnchor::new(EdgeOffset::FromLow(20), EdgeOffset::FromHigh(20));
        assert_eq!(far.resolve(6), TileCoord::new(5, 0));
    }

    #[test]
    fn test_canvas_includes_margins() {
        let layout = FieldLayout::new(80.0, 200.0, 100.0);
        assert_eq!(layout.canvas_size(6), (880.0, 680.0));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: mapping a tile to pixels and back recovers the tile
            #[test]
            fn prop_tile_origin_roundtrip(
                grid in 4u8..=10,
                col in 0u8..10,
                row in 0u8..10,
                tile_px in 8.0f32..128.0,
                ox in 0.0f32..500.0,
                oy in 0.0f32..500.0,
            ) {
                prop_assume!(col < grid && row < grid);
                let layout = FieldLayout::new(tile_px.round(), ox.round(), oy.round());
                let tile = TileCoord::new(col, row);
                let center = layout.tile_center(tile, grid).unwrap();
                prop_assert_eq!(layout.pixel_to_tile(center, grid), Some(tile));
            }
        }
    }
}
