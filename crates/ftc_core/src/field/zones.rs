//! Zone catalogue
//!
//! Every field feature is declared once, for the BLUE alliance, as a
//! [`ZoneSpec`] anchored to the field edges. RED features are never
//! declared: they are produced by [`Zone::mirrored`], which reflects the
//! column (`col -> grid_size - 1 - col`) and swaps every left/right
//! qualifier. Rows are not reflected: both goals sit on the far wall.
//!
//! | Zone | Blue anchor | Pixel shape |
//! |------|-------------|-------------|
//! | Goal | top-left tile | right triangle in the outer corner |
//! | Ramp | left wall, 2nd row from top | strip, 2 tiles outward |
//! | Tunnel | left wall, 3rd row from top | strip, 2 tiles outward |
//! | Loading zone | bottom-right tile | whole tile |
//! | Base zone | 2nd column from right, 2nd row | 3/8-tile square in one corner |
//! | Artifact cluster | left wall, rows 1..=3 | three markers across the tile |

use serde::{Deserialize, Serialize};

use super::{EdgeOffset, FieldLayout, GridAnchor, PixelPoint, PixelRect, TileCoord};
use crate::error::FieldError;
use crate::robot::Alliance;

/// Strip length for ramps and tunnels, in tiles.
pub const STRIP_LENGTH_TILES: f32 = 2.0;
/// Strip thickness for ramps and tunnels, as a fraction of a tile.
pub const STRIP_WIDTH_FRACTION: f32 = 0.25;
/// Base zone side, as a fraction of a tile.
pub const BASE_ZONE_FRACTION: f32 = 0.375;
/// Markers per artifact cluster.
pub const ARTIFACTS_PER_CLUSTER: usize = 3;
/// Clusters per alliance on grids of 6 tiles or more.
pub const MAX_CLUSTERS: u8 = 3;
const MARKER_RADIUS_FRACTION: f32 = 0.1;

/// Left/right qualifier of a visual variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn mirrored(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// Tile corner, in screen orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    pub fn mirrored(self) -> Self {
        match self {
            Corner::TopLeft => Corner::TopRight,
            Corner::TopRight => Corner::TopLeft,
            Corner::BottomLeft => Corner::BottomRight,
            Corner::BottomRight => Corner::BottomLeft,
        }
    }

    fn point(self, rect: &PixelRect) -> PixelPoint {
        match self {
            Corner::TopLeft => PixelPoint::new(rect.x, rect.y),
            Corner::TopRight => PixelPoint::new(rect.right(), rect.y),
            Corner::BottomLeft => PixelPoint::new(rect.x, rect.bottom()),
            Corner::BottomRight => PixelPoint::new(rect.right(), rect.bottom()),
        }
    }

    fn is_left(self) -> bool {
        matches!(self, Corner::TopLeft | Corner::BottomLeft)
    }

    fn is_top(self) -> bool {
        matches!(self, Corner::TopLeft | Corner::TopRight)
    }
}

/// Closed artifact palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactColor {
    Purple,
    Green,
}

impl ArtifactColor {
    pub fn letter(self) -> char {
        match self {
            ArtifactColor::Purple => 'P',
            ArtifactColor::Green => 'G',
        }
    }
}

/// Display order of the three markers in one cluster, left to right.
pub type ArtifactPattern = [ArtifactColor; ARTIFACTS_PER_CLUSTER];

/// Per-cluster colour sequences. Cluster `i` uses entry `i % len`.
///
/// Each cluster tile carries its own sequence, set here rather than derived
/// from its neighbours. The key is the cluster index along the wall, so a
/// RED cluster shows the same sequence as the BLUE cluster it mirrors: the
/// two sides face the same artifacts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArtifactPatterns(pub Vec<ArtifactPattern>);

impl Default for ArtifactPatterns {
    fn default() -> Self {
        use ArtifactColor::{Green as G, Purple as P};
        Self(vec![[G, P, P], [P, G, P], [P, P, G]])
    }
}

impl ArtifactPatterns {
    pub fn for_cluster(&self, index: usize) -> ArtifactPattern {
        if self.0.is_empty() {
            return Self::default().for_cluster(index);
        }
        self.0[index % self.0.len()]
    }
}

/// What a zone is, with any left/right-qualified variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ZoneKind {
    Goal { corner: Corner },
    Ramp { direction: Side },
    Tunnel { direction: Side },
    LoadingZone,
    BaseZone { corner: Corner },
    ArtifactCluster { pattern: ArtifactPattern },
}

impl ZoneKind {
    pub fn mirrored(self) -> Self {
        match self {
            ZoneKind::Goal { corner } => ZoneKind::Goal { corner: corner.mirrored() },
            ZoneKind::Ramp { direction } => ZoneKind::Ramp { direction: direction.mirrored() },
            ZoneKind::Tunnel { direction } => {
                ZoneKind::Tunnel { direction: direction.mirrored() }
            }
            ZoneKind::BaseZone { corner } => ZoneKind::BaseZone { corner: corner.mirrored() },
            ZoneKind::LoadingZone | ZoneKind::ArtifactCluster { .. } => self,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ZoneKind::Goal { .. } => "goal",
            ZoneKind::Ramp { .. } => "ramp",
            ZoneKind::Tunnel { .. } => "tunnel",
            ZoneKind::LoadingZone => "loading_zone",
            ZoneKind::BaseZone { .. } => "base_zone",
            ZoneKind::ArtifactCluster { .. } => "artifact_cluster",
        }
    }
}

/// Canonical (BLUE) zone declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoneSpec {
    pub kind: ZoneKind,
    pub anchor: GridAnchor,
}

/// A zone resolved against a grid size and owned by one alliance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Zone {
    pub alliance: Alliance,
    pub tile: TileCoord,
    #[serde(flatten)]
    pub kind: ZoneKind,
}

/// One artifact marker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub center: PixelPoint,
    pub radius: f32,
    pub color: ArtifactColor,
}

/// Pixel geometry of a zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum ZoneGeometry {
    Triangle { points: [PixelPoint; 3] },
    Rect { rect: PixelRect },
    Markers { markers: Vec<Marker> },
}

/// BLUE declarations for a grid size.
///
/// Only the artifact cluster count depends on the grid: clusters never
/// reach the ramp row.
pub fn blue_zone_specs(grid_size: u8, patterns: &ArtifactPatterns) -> Vec<ZoneSpec> {
    use EdgeOffset::{FromHigh, FromLow};

    let mut specs = vec![
        ZoneSpec {
            kind: ZoneKind::Goal { corner: Corner::TopLeft },
            anchor: GridAnchor::new(FromLow(0), FromHigh(0)),
        },
        ZoneSpec {
            kind: ZoneKind::Ramp { direction: Side::Left },
            anchor: GridAnchor::new(FromLow(0), FromHigh(1)),
        },
        ZoneSpec {
            kind: ZoneKind::Tunnel { direction: Side::Left },
            anchor: GridAnchor::new(FromLow(0), FromHigh(2)),
        },
        ZoneSpec {
            kind: ZoneKind::LoadingZone,
            anchor: GridAnchor::new(FromHigh(0), FromLow(0)),
        },
        ZoneSpec {
            kind: ZoneKind::BaseZone { corner: Corner::TopLeft },
            anchor: GridAnchor::new(FromHigh(1), FromLow(1)),
        },
    ];

    let clusters = MAX_CLUSTERS.min(grid_size.saturating_sub(3));
    for i in 0..clusters {
        specs.push(ZoneSpec {
            kind: ZoneKind::ArtifactCluster { pattern: patterns.for_cluster(usize::from(i)) },
            anchor: GridAnchor::new(FromLow(0), FromLow(1 + i)),
        });
    }
    specs
}

/// Zones owned by one alliance.
pub fn zones_for(alliance: Alliance, grid_size: u8, patterns: &ArtifactPatterns) -> Vec<Zone> {
    blue_zone_specs(grid_size, patterns)
        .into_iter()
        .map(|spec| {
            let blue = Zone {
                alliance: Alliance::Blue,
                tile: spec.anchor.resolve(grid_size),
                kind: spec.kind,
            };
            match alliance {
                Alliance::Blue => blue,
                Alliance::Red => blue.mirrored(grid_size),
            }
        })
        .collect()
}

/// All zones on the field, RED first.
pub fn field_zones(grid_size: u8, patterns: &ArtifactPatterns) -> Vec<Zone> {
    let mut zones = zones_for(Alliance::Red, grid_size, patterns);
    zones.extend(zones_for(Alliance::Blue, grid_size, patterns));
    zones
}

impl Zone {
    /// The same feature for the opposing alliance.
    pub fn mirrored(&self, grid_size: u8) -> Self {
        Self {
            alliance: self.alliance.opponent(),
            tile: self.tile.mirrored(grid_size),
            kind: self.kind.mirrored(),
        }
    }

    pub fn geometry(&self, layout: &FieldLayout, grid_size: u8) -> Result<ZoneGeometry, FieldError> {
        let tile = layout.tile_rect(self.tile, grid_size)?;
        let size = layout.tile_size_px;

        let geometry = match self.kind {
            ZoneKind::Goal { corner } => {
                // Right angle in the named corner, hypotenuse facing the field.
                let right_angle = corner.point(&tile);
                let horizontal = if corner.is_left() {
                    PixelPoint::new(tile.right(), right_angle.y)
                } else {
                    PixelPoint::new(tile.x, right_angle.y)
                };
                let vertical = if corner.is_top() {
                    PixelPoint::new(right_angle.x, tile.bottom())
                } else {
                    PixelPoint::new(right_angle.x, tile.y)
                };
                ZoneGeometry::Triangle { points: [right_angle, horizontal, vertical] }
            }
            ZoneKind::Ramp { direction } | ZoneKind::Tunnel { direction } => {
                let field = layout.field_rect(grid_size);
                let length = STRIP_LENGTH_TILES * size;
                let width = STRIP_WIDTH_FRACTION * size;
                let x = match direction {
                    Side::Left => field.x - length,
                    Side::Right => field.right(),
                };
                let y = tile.y + (size - width) / 2.0;
                ZoneGeometry::Rect { rect: PixelRect::new(x, y, length, width) }
            }
            ZoneKind::LoadingZone => ZoneGeometry::Rect { rect: tile },
            ZoneKind::BaseZone { corner } => {
                let side = BASE_ZONE_FRACTION * size;
                let x = if corner.is_left() { tile.x } else { tile.right() - side };
                let y = if corner.is_top() { tile.y } else { tile.bottom() - side };
                ZoneGeometry::Rect { rect: PixelRect::new(x, y, side, side) }
            }
            ZoneKind::ArtifactCluster { pattern } => {
                let spacing = size / (ARTIFACTS_PER_CLUSTER as f32 + 1.0);
                let mid_y = tile.y + size / 2.0;
                let markers = pattern
                    .iter()
                    .enumerate()
                    .map(|(i, &color)| Marker {
                        center: PixelPoint::new(tile.x + spacing * (i as f32 + 1.0), mid_y),
                        radius: MARKER_RADIUS_FRACTION * size,
                        color,
                    })
                    .collect();
                ZoneGeometry::Markers { markers }
            }
        };
        Ok(geometry)
    }
}
