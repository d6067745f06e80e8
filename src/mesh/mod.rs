//! Turning validated boundary polygons into geometry that sits on the globe.
//!
//! Three highlight styles are supported: filled meshes (triangulated, with an
//! area based tiling strategy), outlines (one closed loop per ring) and a single
//! pin marker at the first feature's centroid.

mod grid;
mod pin;
mod strategy;
mod triangulate;

pub use grid::{square_grid, subdivide};
pub use pin::{PinMarker, BALL_RADIUS, BASE_HEIGHT, BASE_RADIUS, STICK_HEIGHT, STICK_RADIUS};
pub use strategy::{polygon_area_km2, select_strategy, Strategy};
pub use triangulate::triangulate;

use crate::data::{Feature, FeatureCollection, GeoPolygon, Ring};
use crate::error::InputError;
use crate::sphere::project_finite;
use glam::DVec3;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

/// How a region is drawn on the globe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HighlightStyle {
    Mesh,
    Lines,
    #[default]
    Pin,
}

impl FromStr for HighlightStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mesh" => Ok(Self::Mesh),
            "lines" => Ok(Self::Lines),
            "pin" => Ok(Self::Pin),
            other => Err(format!("unknown highlight style {other:?}")),
        }
    }
}

/// Document-level override of the area based strategy selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshMethod {
    /// Triangulate every polygon directly regardless of area
    Earcut,
    /// Never take the small-area shortcut; small polygons get grid subdivision
    Turf,
}

impl FromStr for MeshMethod {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "earcut" => Ok(Self::Earcut),
            "turf" => Ok(Self::Turf),
            other => Err(InputError::UnknownMeshMethod(other.to_string())),
        }
    }
}

/// What a [`SurfaceGeometry`] represents
#[derive(Debug, Clone, PartialEq)]
pub enum GeometryKind {
    /// Indexed triangle list
    Mesh,
    /// Closed line loop; the first point is repeated at the end
    Outline,
    /// Marker standing on the surface
    Pin(PinMarker),
}

/// Ready-to-render geometry in globe-local coordinates
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceGeometry {
    pub kind: GeometryKind,
    pub positions: Vec<DVec3>,
    /// Triangle indices into `positions`; empty for outlines and pins
    pub indices: Vec<u32>,
}

impl SurfaceGeometry {
    pub fn mesh(positions: Vec<DVec3>, indices: Vec<u32>) -> Self {
        Self {
            kind: GeometryKind::Mesh,
            positions,
            indices,
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Iterate triangles as vertex triples
    pub fn triangles(&self) -> impl Iterator<Item = [DVec3; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| {
            [
                self.positions[t[0] as usize],
                self.positions[t[1] as usize],
                self.positions[t[2] as usize],
            ]
        })
    }

    /// Merge another mesh into this one, offsetting its indices
    pub fn append(&mut self, other: SurfaceGeometry) {
        let offset = self.positions.len() as u32;
        self.positions.extend(other.positions);
        self.indices.extend(other.indices.into_iter().map(|i| i + offset));
    }
}

impl fmt::Display for SurfaceGeometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            GeometryKind::Mesh => write!(
                f,
                "mesh ({} vertices, {} triangles)",
                self.positions.len(),
                self.triangle_count()
            ),
            GeometryKind::Outline => write!(f, "outline ({} points)", self.positions.len()),
            GeometryKind::Pin(_) => write!(f, "pin"),
        }
    }
}

/// Build every geometry a document produces in the requested style
pub fn build_highlight(doc: &FeatureCollection, radius: f64, style: HighlightStyle) -> Vec<SurfaceGeometry> {
    match style {
        HighlightStyle::Mesh => doc
            .features
            .iter()
            .flat_map(|feature| tessellate(feature, radius, doc.mesh_method))
            .collect(),
        HighlightStyle::Lines => doc
            .features
            .iter()
            .flat_map(|feature| outline(feature, radius))
            .collect(),
        HighlightStyle::Pin => pin_for(doc, radius).into_iter().collect(),
    }
}

/// Triangulate every polygon of a feature, choosing a strategy per polygon
pub fn tessellate(feature: &Feature, radius: f64, method: Option<MeshMethod>) -> Vec<SurfaceGeometry> {
    feature
        .polygons
        .iter()
        .filter_map(|polygon| tessellate_polygon(polygon, radius, method))
        .collect()
}

pub fn tessellate_polygon(
    polygon: &GeoPolygon,
    radius: f64,
    method: Option<MeshMethod>,
) -> Option<SurfaceGeometry> {
    let finite = finite_polygon(polygon, radius)?;
    let polygon = &finite;
    let area_km2 = polygon_area_km2(polygon);
    let strategy = select_strategy(area_km2, method);
    debug!(area_km2, ?strategy, "tessellating polygon");

    match strategy {
        Strategy::Direct => triangulate(polygon, radius),
        Strategy::Inflated { scale } => triangulate(polygon, radius * scale),
        Strategy::Grid { cell_km } => {
            let mut merged: Option<SurfaceGeometry> = None;
            for piece in subdivide(polygon, cell_km) {
                let Some(cell_mesh) = triangulate(&piece, radius) else {
                    continue;
                };
                match merged.as_mut() {
                    Some(m) => m.append(cell_mesh),
                    None => merged = Some(cell_mesh),
                }
            }
            merged
        }
    }
}

/// Copy of `polygon` with every vertex that does not project cleanly removed.
/// Holes that fall below three points are dropped; `None` when the outer ring does.
fn finite_polygon(polygon: &GeoPolygon, radius: f64) -> Option<GeoPolygon> {
    let mut rings: Vec<Ring> = Vec::with_capacity(polygon.rings.len());
    for (ring_idx, ring) in polygon.rings.iter().enumerate() {
        let kept: Ring = ring
            .iter()
            .copied()
            .filter(|&(lng, lat)| finite_or_warn(lat, lng, radius).is_some())
            .collect();
        if kept.len() >= 3 {
            rings.push(kept);
        } else if ring_idx == 0 {
            warn!(points = kept.len(), "outer ring has too few usable points");
            return None;
        } else {
            warn!(ring = ring_idx, points = kept.len(), "dropping hole with too few usable points");
        }
    }
    Some(GeoPolygon { rings })
}

/// One closed line loop per ring
pub fn outline(feature: &Feature, radius: f64) -> Vec<SurfaceGeometry> {
    let mut loops = Vec::new();
    for polygon in &feature.polygons {
        for ring in &polygon.rings {
            let mut positions: Vec<DVec3> = ring
                .iter()
                .filter_map(|&(lng, lat)| finite_or_warn(lat, lng, radius))
                .collect();
            if positions.len() < 3 {
                warn!(points = positions.len(), "skipping outline with too few usable points");
                continue;
            }
            positions.push(positions[0]);
            loops.push(SurfaceGeometry {
                kind: GeometryKind::Outline,
                positions,
                indices: Vec::new(),
            });
        }
    }
    loops
}

/// A single pin at the centroid of the first feature's first outer ring
pub fn pin_for(doc: &FeatureCollection, radius: f64) -> Option<SurfaceGeometry> {
    let Some(focus) = doc.focus() else {
        warn!("no usable feature to place a pin on");
        return None;
    };
    let anchor = finite_or_warn(focus.lat, focus.lng, radius)?;
    let marker = PinMarker::standing_at(anchor);
    Some(SurfaceGeometry {
        positions: marker.key_points().to_vec(),
        kind: GeometryKind::Pin(marker),
        indices: Vec::new(),
    })
}

/// Project, logging and dropping points that would poison a vertex buffer
pub(crate) fn finite_or_warn(lat: f64, lng: f64, radius: f64) -> Option<DVec3> {
    let p = project_finite(lat, lng, radius);
    if p.is_none() {
        let err = InputError::NonFiniteVertex { lat, lng, radius };
        warn!(%err, "skipping vertex");
    }
    p
}
