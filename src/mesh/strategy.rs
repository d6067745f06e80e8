use super::MeshMethod;
use crate::data::{GeoPolygon, Ring};
use geo::{ChamberlainDuquetteArea, Coord, LineString, Polygon};

/// Up to this area a polygon is triangulated as-is
pub const DIRECT_MAX_KM2: f64 = 200_000.0;
/// Above this area the mesh is lifted off the globe instead of tiled
pub const LIFT_MIN_KM2: f64 = 7_000_000.0;
/// Above this area the lift is stronger
pub const STRONG_LIFT_MIN_KM2: f64 = 10_000_000.0;
pub const LIFT_SCALE: f64 = 1.05;
pub const STRONG_LIFT_SCALE: f64 = 1.06;
/// Above this area grid cells get coarser
pub const COARSE_GRID_MIN_KM2: f64 = 1_000_000.0;
pub const FINE_CELL_KM: f64 = 30.0;
pub const COARSE_CELL_KM: f64 = 75.0;

/// How a single polygon becomes triangles
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Strategy {
    /// Ear-clip the whole ring set at the requested radius
    Direct,
    /// Ear-clip directly, projecting at `radius * scale`
    Inflated { scale: f64 },
    /// Clip against a square grid and ear-clip every cell
    Grid { cell_km: f64 },
}

/// Pick the tessellation strategy for a polygon of the given ground area.
/// The thresholds are visual tuning values; boundaries are inclusive on the low side.
/// An area that is not a finite number never leads to tiling.
pub fn select_strategy(area_km2: f64, method: Option<MeshMethod>) -> Strategy {
    if method == Some(MeshMethod::Earcut) || !area_km2.is_finite() {
        return Strategy::Direct;
    }
    if area_km2 <= DIRECT_MAX_KM2 && method != Some(MeshMethod::Turf) {
        return Strategy::Direct;
    }
    if area_km2 > LIFT_MIN_KM2 {
        let scale = if area_km2 > STRONG_LIFT_MIN_KM2 {
            STRONG_LIFT_SCALE
        } else {
            LIFT_SCALE
        };
        return Strategy::Inflated { scale };
    }
    let cell_km = if area_km2 > COARSE_GRID_MIN_KM2 {
        COARSE_CELL_KM
    } else {
        FINE_CELL_KM
    };
    Strategy::Grid { cell_km }
}

/// Geodesic ground area (outer ring minus holes) in km²
pub fn polygon_area_km2(polygon: &GeoPolygon) -> f64 {
    to_geo_polygon(polygon).chamberlain_duquette_unsigned_area() / 1_000_000.0
}

pub(crate) fn to_geo_polygon(polygon: &GeoPolygon) -> Polygon<f64> {
    Polygon::new(
        to_line_string(polygon.outer()),
        polygon.holes().iter().map(|h| to_line_string(h)).collect(),
    )
}

fn to_line_string(ring: &[(f64, f64)]) -> LineString<f64> {
    ring.iter().map(|&(x, y)| Coord { x, y }).collect()
}

/// Back to open (lng, lat) rings; geo closes its rings, so the repeat is dropped
pub(crate) fn from_geo_polygon(polygon: &Polygon<f64>) -> Option<GeoPolygon> {
    let outer = open_ring(polygon.exterior());
    if outer.len() < 3 {
        return None;
    }
    let holes = polygon
        .interiors()
        .iter()
        .map(open_ring)
        .filter(|h| h.len() >= 3)
        .collect();
    Some(GeoPolygon::new(outer, holes))
}

fn open_ring(line: &LineString<f64>) -> Ring {
    let mut ring: Ring = line.coords().map(|c| (c.x, c.y)).collect();
    if ring.len() >= 2 && ring.first() == ring.last() {
        ring.pop();
    }
    ring
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_boundaries() {
        assert_eq!(select_strategy(199_999.0, None), Strategy::Direct);
        assert_eq!(select_strategy(200_000.0, None), Strategy::Direct);
        assert_eq!(select_strategy(200_001.0, None), Strategy::Grid { cell_km: 30.0 });
        assert_eq!(select_strategy(1_000_000.0, None), Strategy::Grid { cell_km: 30.0 });
        assert_eq!(select_strategy(1_000_001.0, None), Strategy::Grid { cell_km: 75.0 });
        assert_eq!(select_strategy(7_000_000.0, None), Strategy::Grid { cell_km: 75.0 });
        assert_eq!(select_strategy(7_000_001.0, None), Strategy::Inflated { scale: 1.05 });
        assert_eq!(select_strategy(10_000_000.0, None), Strategy::Inflated { scale: 1.05 });
        assert_eq!(select_strategy(10_000_001.0, None), Strategy::Inflated { scale: 1.06 });
    }

    #[test]
    fn test_overrides() {
        for area in [10.0, 500_000.0, 8_000_000.0, 20_000_000.0] {
            assert_eq!(select_strategy(area, Some(MeshMethod::Earcut)), Strategy::Direct);
        }
        assert_eq!(
            select_strategy(10.0, Some(MeshMethod::Turf)),
            Strategy::Grid { cell_km: 30.0 }
        );
        assert_eq!(
            select_strategy(8_000_000.0, Some(MeshMethod::Turf)),
            Strategy::Inflated { scale: 1.05 }
        );
    }

    #[test]
    fn test_unmeasurable_area_is_triangulated_directly() {
        assert_eq!(select_strategy(f64::NAN, None), Strategy::Direct);
        assert_eq!(select_strategy(f64::NAN, Some(MeshMethod::Turf)), Strategy::Direct);
        assert_eq!(select_strategy(f64::INFINITY, None), Strategy::Direct);
    }

    #[test]
    fn test_selection_is_monotonic_in_area() {
        fn rank(s: Strategy) -> u8 {
            match s {
                Strategy::Direct => 0,
                Strategy::Grid { cell_km } if cell_km < 50.0 => 1,
                Strategy::Grid { .. } => 2,
                Strategy::Inflated { scale } if scale < 1.055 => 3,
                Strategy::Inflated { .. } => 4,
            }
        }
        let mut last = 0;
        for step in 0..=300 {
            let area = step as f64 * 50_000.0;
            let r = rank(select_strategy(area, None));
            assert!(r >= last, "rank dropped at {area} km²");
            last = r;
        }
    }

    #[test]
    fn test_area_of_one_degree_cell() {
        // One degree square at the equator on the equatorial-radius sphere is ~12,391 km²
        let polygon = GeoPolygon::new(vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)], Vec::new());
        let area = polygon_area_km2(&polygon);
        assert!((area - 12_391.0).abs() < 60.0, "area was {area}");
    }

    #[test]
    fn test_holes_reduce_area() {
        let outer = vec![(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)];
        let solid = GeoPolygon::new(outer.clone(), Vec::new());
        let holed = GeoPolygon::new(outer, vec![vec![(1.0, 1.0), (3.0, 1.0), (3.0, 3.0), (1.0, 3.0)]]);
        let ratio = polygon_area_km2(&holed) / polygon_area_km2(&solid);
        assert!((ratio - 0.75).abs() < 0.01, "ratio was {ratio}");
    }

    #[test]
    fn test_geo_round_trip_drops_closure() {
        let polygon = GeoPolygon::new(vec![(0.0, 0.0), (2.0, 0.0), (2.0, 2.0)], Vec::new());
        let back = from_geo_polygon(&to_geo_polygon(&polygon)).unwrap();
        assert_eq!(back, polygon);
    }
}
