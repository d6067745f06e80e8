mod basemap;
mod source;

pub use basemap::{load_basemap, simple_world, Coastline};
pub use source::{load_catalog, read_boundary, CountryEntry, CountrySource, DirectorySource, MemorySource};

use crate::error::InputError;
use crate::mesh::MeshMethod;
use crate::sphere::{ring_centroid, LatLng};
use geojson::{GeoJson, PolygonType, Value};
use std::collections::HashSet;
use tracing::warn;

/// A ring of (lng, lat) points, stored open (no repeated closing point)
pub type Ring = Vec<(f64, f64)>;

/// Outer boundary followed by zero or more holes
#[derive(Debug, Clone, PartialEq)]
pub struct GeoPolygon {
    pub rings: Vec<Ring>,
}

impl GeoPolygon {
    pub fn new(outer: Ring, holes: Vec<Ring>) -> Self {
        let mut rings = Vec::with_capacity(holes.len() + 1);
        rings.push(outer);
        rings.extend(holes);
        Self { rings }
    }

    pub fn outer(&self) -> &[(f64, f64)] {
        &self.rings[0]
    }

    pub fn holes(&self) -> &[Ring] {
        &self.rings[1..]
    }
}

/// One country part collection: a Polygon or the members of a MultiPolygon
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub polygons: Vec<GeoPolygon>,
}

/// Validated boundary document. Only features with at least one usable polygon survive.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
    /// Document-wide override of the area based strategy (`meshMethod`)
    pub mesh_method: Option<MeshMethod>,
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        Self {
            features,
            mesh_method: None,
        }
    }

    pub fn with_mesh_method(mut self, method: MeshMethod) -> Self {
        self.mesh_method = Some(method);
        self
    }

    /// Convert parsed GeoJSON, logging and skipping every feature or ring that
    /// cannot be used. Only a document without any feature list is an error.
    pub fn from_geojson(geojson: &GeoJson) -> Result<Self, InputError> {
        let (features, foreign) = match geojson {
            GeoJson::FeatureCollection(fc) => (fc.features.as_slice(), fc.foreign_members.as_ref()),
            GeoJson::Feature(f) => (std::slice::from_ref(f), None),
            GeoJson::Geometry(_) => return Err(InputError::NotFeatureCollection),
        };

        let mesh_method = foreign
            .and_then(|members| members.get("meshMethod"))
            .and_then(|v| v.as_str())
            .and_then(|name| match name.parse::<MeshMethod>() {
                Ok(method) => Some(method),
                Err(err) => {
                    warn!(%err, "ignoring mesh method override");
                    None
                }
            });

        let mut out = Vec::with_capacity(features.len());
        for (feature_idx, feature) in features.iter().enumerate() {
            match convert_feature(feature_idx, feature) {
                Ok(Some(f)) => out.push(f),
                Ok(None) => {}
                Err(err) => warn!(%err, "skipping feature"),
            }
        }

        Ok(Self {
            features: out,
            mesh_method,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Centroid of the first feature's first outer ring: where the globe turns to
    pub fn focus(&self) -> Option<LatLng> {
        let polygon = self.features.first()?.polygons.first()?;
        ring_centroid(polygon.outer())
    }
}

fn convert_feature(feature_idx: usize, feature: &geojson::Feature) -> Result<Option<Feature>, InputError> {
    let Some(ref geometry) = feature.geometry else {
        return Err(InputError::MissingGeometry { feature: feature_idx });
    };

    let raw: Vec<&PolygonType> = match &geometry.value {
        Value::Polygon(rings) => vec![rings],
        Value::MultiPolygon(polygons) => polygons.iter().collect(),
        other => {
            return Err(InputError::UnsupportedGeometry {
                feature: feature_idx,
                kind: geometry_kind(other),
            })
        }
    };

    let polygons: Vec<GeoPolygon> = raw
        .into_iter()
        .enumerate()
        .filter_map(|(polygon_idx, rings)| convert_polygon(feature_idx, polygon_idx, rings))
        .collect();

    Ok((!polygons.is_empty()).then_some(Feature { polygons }))
}

/// Returns `None` when the outer ring is unusable; bad holes are dropped on their own
fn convert_polygon(feature_idx: usize, polygon_idx: usize, rings: &PolygonType) -> Option<GeoPolygon> {
    let mut kept: Vec<Ring> = Vec::with_capacity(rings.len());

    for (ring_idx, coords) in rings.iter().enumerate() {
        match convert_ring(feature_idx, polygon_idx, ring_idx, coords) {
            Ok(ring) => kept.push(ring),
            Err(err) if ring_idx == 0 => {
                warn!(%err, "skipping polygon with unusable outer ring");
                return None;
            }
            Err(err) => warn!(%err, "skipping hole"),
        }
    }

    if kept.is_empty() {
        warn!(feature = feature_idx, polygon = polygon_idx, "skipping polygon without rings");
        return None;
    }
    Some(GeoPolygon { rings: kept })
}

fn convert_ring(
    feature: usize,
    polygon: usize,
    ring: usize,
    coords: &[Vec<f64>],
) -> Result<Ring, InputError> {
    let mut points: Ring = Vec::with_capacity(coords.len());
    for (point, c) in coords.iter().enumerate() {
        if c.len() < 2 {
            return Err(InputError::MalformedPosition {
                feature,
                polygon,
                ring,
                point,
            });
        }
        points.push((c[0], c[1]));
    }

    drop_closing_duplicate(&mut points);

    let distinct = points
        .iter()
        .map(|&(lng, lat)| (lng.to_bits(), lat.to_bits()))
        .collect::<HashSet<_>>()
        .len();
    if distinct < 3 {
        return Err(InputError::DegenerateRing {
            feature,
            polygon,
            ring,
            distinct,
        });
    }

    Ok(points)
}

/// GeoJSON rings repeat their first point; closure is re-applied only where a consumer needs it
fn drop_closing_duplicate(points: &mut Ring) {
    if points.len() >= 2 && points.first() == points.last() {
        points.pop();
    }
}

fn geometry_kind(value: &Value) -> &'static str {
    match value {
        Value::Point(_) => "Point",
        Value::MultiPoint(_) => "MultiPoint",
        Value::LineString(_) => "LineString",
        Value::MultiLineString(_) => "MultiLineString",
        Value::Polygon(_) => "Polygon",
        Value::MultiPolygon(_) => "MultiPolygon",
        Value::GeometryCollection(_) => "GeometryCollection",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> FeatureCollection {
        let geojson: GeoJson = text.parse().unwrap();
        FeatureCollection::from_geojson(&geojson).unwrap()
    }

    #[test]
    fn test_polygon_and_multipolygon() {
        let doc = parse(
            r#"{"type":"FeatureCollection","features":[
                {"type":"Feature","properties":{},"geometry":{"type":"Polygon","coordinates":[[[0,0],[4,0],[4,4],[0,4],[0,0]],[[1,1],[2,1],[2,2],[1,1]]]}},
                {"type":"Feature","properties":{},"geometry":{"type":"MultiPolygon","coordinates":[[[[10,10],[11,10],[11,11],[10,10]]],[[[20,20],[21,20],[21,21],[20,20]]]]}}
            ]}"#,
        );
        assert_eq!(doc.features.len(), 2);
        assert_eq!(doc.features[0].polygons[0].rings.len(), 2);
        // Closing duplicate removed
        assert_eq!(doc.features[0].polygons[0].outer().len(), 4);
        assert_eq!(doc.features[0].polygons[0].holes()[0].len(), 3);
        assert_eq!(doc.features[1].polygons.len(), 2);
        assert_eq!(doc.mesh_method, None);
    }

    #[test]
    fn test_skips_bad_features_and_keeps_the_rest() {
        let doc = parse(
            r#"{"type":"FeatureCollection","features":[
                {"type":"Feature","properties":{},"geometry":null},
                {"type":"Feature","properties":{},"geometry":{"type":"Point","coordinates":[1,2]}},
                {"type":"Feature","properties":{},"geometry":{"type":"Polygon","coordinates":[[[0,0],[1,1],[0,0]]]}},
                {"type":"Feature","properties":{},"geometry":{"type":"Polygon","coordinates":[[[0,0],[3,0],[3,3],[0,0]]]}}
            ]}"#,
        );
        assert_eq!(doc.features.len(), 1);
        assert_eq!(doc.features[0].polygons[0].outer(), &[(0.0, 0.0), (3.0, 0.0), (3.0, 3.0)]);
    }

    #[test]
    fn test_degenerate_hole_is_dropped_alone() {
        let doc = parse(
            r#"{"type":"FeatureCollection","features":[
                {"type":"Feature","properties":{},"geometry":{"type":"Polygon","coordinates":[[[0,0],[4,0],[4,4],[0,0]],[[1,1],[1,1],[1,1]]]}}
            ]}"#,
        );
        assert_eq!(doc.features[0].polygons[0].rings.len(), 1);
    }

    #[test]
    fn test_mesh_method_override() {
        let doc = parse(
            r#"{"type":"FeatureCollection","meshMethod":"turf","features":[]}"#,
        );
        assert_eq!(doc.mesh_method, Some(MeshMethod::Turf));

        let doc = parse(
            r#"{"type":"FeatureCollection","meshMethod":"magic","features":[]}"#,
        );
        assert_eq!(doc.mesh_method, None);
    }

    #[test]
    fn test_geometry_document_is_rejected() {
        let geojson: GeoJson = r#"{"type":"Point","coordinates":[1,2]}"#.parse().unwrap();
        assert_eq!(
            FeatureCollection::from_geojson(&geojson),
            Err(InputError::NotFeatureCollection)
        );
    }

    #[test]
    fn test_focus_uses_first_outer_ring() {
        let doc = parse(
            r#"{"type":"FeatureCollection","features":[
                {"type":"Feature","properties":{},"geometry":{"type":"Polygon","coordinates":[[[10,20],[12,20],[12,22],[10,22],[10,20]]]}}
            ]}"#,
        );
        let focus = doc.focus().unwrap();
        assert!((focus.lat - 21.0).abs() < 1e-12);
        assert!((focus.lng - 11.0).abs() < 1e-12);
        assert!(FeatureCollection::default().focus().is_none());
    }
}
