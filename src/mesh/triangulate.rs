use super::{finite_or_warn, SurfaceGeometry};
use crate::data::GeoPolygon;
use earcutr::earcut;
use glam::DVec3;
use tracing::{debug, warn};

/// Ear-clip a ring set in the (lng, lat) plane, then lift every vertex onto the
/// sphere. Triangulating before projecting is cheap and looks right at globe
/// scale; triangles stretch a little near the poles.
///
/// Vertices whose projection is not finite are dropped before triangulation.
/// Returns `None` when the outer ring is unusable or nothing could be triangulated.
pub fn triangulate(polygon: &GeoPolygon, radius: f64) -> Option<SurfaceGeometry> {
    let mut coords: Vec<f64> = Vec::new();
    let mut hole_indices: Vec<usize> = Vec::new();
    let mut positions: Vec<DVec3> = Vec::new();

    for (ring_idx, ring) in polygon.rings.iter().enumerate() {
        let usable: Vec<((f64, f64), DVec3)> = ring
            .iter()
            .filter_map(|&(lng, lat)| finite_or_warn(lat, lng, radius).map(|p| ((lng, lat), p)))
            .collect();

        if usable.len() < 3 {
            if ring_idx == 0 {
                warn!(points = usable.len(), "outer ring has too few usable points");
                return None;
            }
            warn!(ring = ring_idx, points = usable.len(), "dropping hole with too few usable points");
            continue;
        }

        if ring_idx > 0 {
            hole_indices.push(positions.len());
        }
        for ((lng, lat), p) in usable {
            coords.push(lng);
            coords.push(lat);
            positions.push(p);
        }
    }

    let indices = match earcut(&coords, &hole_indices, 2) {
        Ok(ix) => ix,
        Err(err) => {
            warn!(?err, "triangulation failed");
            return None;
        }
    };

    if indices.is_empty() {
        debug!(vertices = positions.len(), "ring set produced no triangles");
        return None;
    }

    let mut indices: Vec<u32> = indices.into_iter().map(|i| i as u32).collect();
    wind_outward(&positions, &mut indices);

    Some(SurfaceGeometry::mesh(positions, indices))
}

/// Reorder each triangle so it is counter-clockwise seen from outside the sphere.
/// Ring orientation in the source data is not trusted.
fn wind_outward(positions: &[DVec3], indices: &mut [u32]) {
    for tri in indices.chunks_exact_mut(3) {
        let [a, b, c] = [0, 1, 2].map(|k| positions[tri[k] as usize]);
        let normal = (b - a).cross(c - a);
        if normal.dot(a + b + c) < 0.0 {
            tri.swap(1, 2);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Summed area of the projected triangles
    fn surface_area(mesh: &SurfaceGeometry) -> f64 {
        mesh.triangles()
            .map(|[a, b, c]| (b - a).cross(c - a).length() * 0.5)
            .sum()
    }

    #[test]
    fn test_closed_ring_has_area_and_valid_indices() {
        let rings = [
            vec![(0.0, 0.0), (3.0, 0.0), (3.0, 2.0), (0.0, 2.0)],
            vec![(10.0, 50.0), (12.0, 51.0), (11.0, 53.0), (9.5, 52.0), (9.0, 50.5)],
            vec![(-179.0, -10.0), (-170.0, -12.0), (-175.0, -5.0)],
        ];
        for ring in rings {
            let polygon = GeoPolygon::new(ring.clone(), Vec::new());
            let mesh = triangulate(&polygon, 100.0).unwrap();
            assert_eq!(mesh.positions.len(), ring.len());
            assert_eq!(mesh.indices.len() % 3, 0);
            assert_eq!(mesh.triangle_count(), ring.len() - 2);
            let max = *mesh.indices.iter().max().unwrap() as usize;
            assert!(max < mesh.positions.len());
            assert!(surface_area(&mesh) > 0.0);
        }
    }

    #[test]
    fn test_triangles_face_outward_for_either_ring_orientation() {
        let ccw = vec![(0.0, 0.0), (3.0, 0.0), (3.0, 3.0), (0.0, 3.0)];
        let cw: Vec<_> = ccw.iter().rev().copied().collect();
        for ring in [ccw, cw] {
            let mesh = triangulate(&GeoPolygon::new(ring, Vec::new()), 5.0).unwrap();
            for [a, b, c] in mesh.triangles() {
                assert!((b - a).cross(c - a).dot(a + b + c) > 0.0);
            }
        }
    }

    #[test]
    fn test_hole_is_respected() {
        let solid = GeoPolygon::new(vec![(0.0, 0.0), (6.0, 0.0), (6.0, 6.0), (0.0, 6.0)], Vec::new());
        let holed = GeoPolygon::new(
            vec![(0.0, 0.0), (6.0, 0.0), (6.0, 6.0), (0.0, 6.0)],
            vec![vec![(2.0, 2.0), (4.0, 2.0), (4.0, 4.0), (2.0, 4.0)]],
        );
        let solid_mesh = triangulate(&solid, 10.0).unwrap();
        let holed_mesh = triangulate(&holed, 10.0).unwrap();
        assert_eq!(holed_mesh.positions.len(), 8);
        let ratio = surface_area(&holed_mesh) / surface_area(&solid_mesh);
        assert!((ratio - 8.0 / 9.0).abs() < 0.01, "ratio was {ratio}");
    }

    #[test]
    fn test_vertices_lie_on_requested_radius() {
        let polygon = GeoPolygon::new(vec![(20.0, 20.0), (22.0, 20.0), (21.0, 22.0)], Vec::new());
        let mesh = triangulate(&polygon, 42.0).unwrap();
        for p in &mesh.positions {
            assert!((p.length() - 42.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_non_finite_vertex_is_dropped() {
        let polygon = GeoPolygon::new(
            vec![(0.0, 0.0), (2.0, 0.0), (f64::INFINITY, 1.0), (2.0, 2.0), (0.0, 2.0)],
            Vec::new(),
        );
        let mesh = triangulate(&polygon, 1.0).unwrap();
        assert_eq!(mesh.positions.len(), 4);
        assert!(mesh.positions.iter().all(|p| p.is_finite()));
    }

    #[test]
    fn test_unusable_outer_ring() {
        let polygon = GeoPolygon::new(vec![(0.0, 0.0), (f64::NAN, 0.0), (1.0, f64::NAN)], Vec::new());
        assert!(triangulate(&polygon, 1.0).is_none());
        let collinear = GeoPolygon::new(vec![(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)], Vec::new());
        assert!(triangulate(&collinear, 1.0).is_none());
    }
}
