use glam::DVec3;
use serde::Deserialize;
use std::f64::consts::PI;

/// Mean Earth radius in km, used for grid cell sizing
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A geographic position in degrees
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl Default for LatLng {
    /// The focus a freshly created globe faces: the equator at 90°W
    fn default() -> Self {
        Self::new(0.0, -90.0)
    }
}

/// Project a geographic coordinate onto the surface of a sphere.
///
/// The polar angle is measured from +Y (north pole) and the azimuth starts at
/// the antimeridian, so (0°, -90°) lands on +Z. Out-of-range inputs are not
/// clamped; callers validate geography.
#[inline(always)]
pub fn project(lat: f64, lng: f64, radius: f64) -> DVec3 {
    let phi = (90.0 - lat) * (PI / 180.0);
    let theta = (lng + 180.0) * (PI / 180.0);

    let (sin_phi, cos_phi) = phi.sin_cos();
    let (sin_theta, cos_theta) = theta.sin_cos();

    DVec3::new(
        -radius * sin_phi * cos_theta,
        radius * cos_phi,
        radius * sin_phi * sin_theta,
    )
}

/// Inverse of [`project`] for any non-zero point; the radius is ignored
pub fn unproject(p: DVec3) -> Option<LatLng> {
    let r = p.length();
    if r <= 0.0 || !r.is_finite() {
        return None;
    }
    let lat = (p.y / r).clamp(-1.0, 1.0).asin().to_degrees();
    let theta = p.z.atan2(-p.x).to_degrees();
    let lng = theta.rem_euclid(360.0) - 180.0;
    Some(LatLng::new(lat, lng))
}

/// Project and reject results that cannot go into a vertex buffer
#[inline]
pub fn project_finite(lat: f64, lng: f64, radius: f64) -> Option<DVec3> {
    let p = project(lat, lng, radius);
    p.is_finite().then_some(p)
}

/// Wrap a longitude difference into (-180, 180] so rotations take the short way round
#[inline(always)]
pub fn normalize_lng_delta(delta: f64) -> f64 {
    let wrapped = (delta + 180.0).rem_euclid(360.0) - 180.0;
    if wrapped == -180.0 {
        180.0
    } else {
        wrapped
    }
}

/// Unweighted mean of a ring's (lng, lat) points
pub fn ring_centroid(ring: &[(f64, f64)]) -> Option<LatLng> {
    if ring.is_empty() {
        return None;
    }
    let (sum_lng, sum_lat) = ring
        .iter()
        .fold((0.0, 0.0), |(sx, sy), &(lng, lat)| (sx + lng, sy + lat));
    let n = ring.len() as f64;
    Some(LatLng::new(sum_lat / n, sum_lng / n))
}

/// Haversine distance in kilometers
pub fn haversine_km(lng1: f64, lat1: f64, lng2: f64, lat2: f64) -> f64 {
    let dlat = (lat2 - lat1).to_radians();
    let dlng = (lng2 - lng1).to_radians();
    let lat1 = lat1.to_radians();
    let lat2 = lat2.to_radians();

    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();
    EARTH_RADIUS_KM * c
}

/// Interpolate along a great circle arc between two globe-local points and call a
/// visitor for each subdivision point (endpoint included, start excluded).
/// ~2° segments keep long basemap edges hugging the sphere.
pub fn walk_great_circle(a: DVec3, b: DVec3, mut visitor: impl FnMut(DVec3)) {
    let radius = a.length();
    if radius <= 0.0 {
        visitor(b);
        return;
    }
    let ua = a / radius;
    let ub = b.normalize_or_zero();

    let dot = ua.dot(ub).clamp(-1.0, 1.0);
    let angle = dot.acos();
    let steps = ((angle.to_degrees() / 2.0).ceil() as usize).max(1);

    let sin_angle = angle.sin();
    if steps == 1 || sin_angle.abs() < 1e-10 {
        // Short segment, or nearly identical/antipodal points
        visitor(b);
        return;
    }

    for i in 1..=steps {
        let t = i as f64 / steps as f64;
        let sa = ((1.0 - t) * angle).sin() / sin_angle;
        let sb = (t * angle).sin() / sin_angle;
        visitor((ua * sa + ub * sb) * radius);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn test_projection_lands_on_sphere() {
        for lat in (-90..=90).step_by(15) {
            for lng in (-180..=180).step_by(20) {
                for radius in [1.0, 100.0, 6371.0] {
                    let p = project(lat as f64, lng as f64, radius);
                    assert_close(p.length(), radius, radius * 1e-12);
                }
            }
        }
    }

    #[test]
    fn test_projection_axes() {
        let north = project(90.0, 0.0, 100.0);
        assert_close(north.y, 100.0, 1e-9);

        let facing = project(0.0, -90.0, 100.0);
        assert_close(facing.x, 0.0, 1e-9);
        assert_close(facing.y, 0.0, 1e-9);
        assert_close(facing.z, 100.0, 1e-9);

        // Prime meridian sits on -X
        let greenwich = project(0.0, 0.0, 1.0);
        assert_close(greenwich.x, -1.0, 1e-12);
    }

    #[test]
    fn test_projection_does_not_clamp() {
        let p = project(120.0, 400.0, 2.0);
        assert_close(p.length(), 2.0, 1e-12);
        assert!(project_finite(f64::NAN, 0.0, 1.0).is_none());
        assert!(project_finite(0.0, 0.0, f64::INFINITY).is_none());
    }

    #[test]
    fn test_unproject_inverts_project() {
        for (lat, lng) in [(0.0, 0.0), (45.0, 120.0), (-30.0, -150.0), (10.0, -90.0), (0.0, 179.5)] {
            let back = unproject(project(lat, lng, 42.0)).unwrap();
            assert_close(back.lat, lat, 1e-9);
            assert_close(back.lng, lng, 1e-9);
        }
        assert!(unproject(DVec3::ZERO).is_none());
    }

    #[test]
    fn test_normalize_lng_delta() {
        assert_close(normalize_lng_delta(170.0 - -170.0), -20.0, 1e-12);
        assert_close(normalize_lng_delta(-170.0 - 170.0), 20.0, 1e-12);
        assert_close(normalize_lng_delta(180.0), 180.0, 1e-12);
        assert_close(normalize_lng_delta(-180.0), 180.0, 1e-12);
        assert_close(normalize_lng_delta(0.0), 0.0, 1e-12);
        assert_close(normalize_lng_delta(725.0), 5.0, 1e-9);
    }

    #[test]
    fn test_ring_centroid_is_unweighted_mean() {
        let ring = [(0.0, 0.0), (2.0, 0.0), (2.0, 2.0), (0.0, 2.0)];
        let c = ring_centroid(&ring).unwrap();
        assert_close(c.lat, 1.0, 1e-12);
        assert_close(c.lng, 1.0, 1e-12);
        assert!(ring_centroid(&[]).is_none());
    }

    #[test]
    fn test_haversine_one_degree() {
        // One degree along the equator is ~111.19 km
        assert_close(haversine_km(0.0, 0.0, 1.0, 0.0), 111.19, 0.01);
    }

    #[test]
    fn test_great_circle_stays_on_sphere() {
        let a = project(0.0, 0.0, 50.0);
        let b = project(40.0, 60.0, 50.0);
        let mut count = 0;
        let mut last = a;
        walk_great_circle(a, b, |p| {
            assert_close(p.length(), 50.0, 1e-9);
            last = p;
            count += 1;
        });
        assert!(count > 1);
        assert!(last.abs_diff_eq(b, 1e-9));
    }
}
