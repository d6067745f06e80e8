use super::strategy::{from_geo_polygon, to_geo_polygon};
use crate::data::GeoPolygon;
use crate::sphere::haversine_km;
use geo::{BooleanOps, BoundingRect, Rect};
use rayon::prelude::*;
use tracing::{debug, warn};

/// Smallest east-west span of one degree we size cells with; keeps polar boxes finite
const MIN_KM_PER_DEGREE: f64 = 1.0;

/// Square cells of roughly `cell_km` covering the (min_lng, min_lat, max_lng, max_lat) box.
///
/// The cell side is converted to degrees along the box's southern edge (longitude)
/// and western edge (latitude). The last row and column may overhang the box so
/// the whole box is covered.
pub fn square_grid(bbox: (f64, f64, f64, f64), cell_km: f64) -> Vec<Rect<f64>> {
    let (west, south, east, north) = bbox;
    let width = east - west;
    let height = north - south;
    if !(width > 0.0 && height > 0.0 && cell_km > 0.0) {
        return Vec::new();
    }

    let km_per_deg_lng = haversine_km(west, south, west + 1.0, south).max(MIN_KM_PER_DEGREE);
    let km_per_deg_lat = haversine_km(west, south, west, south + 1.0).max(MIN_KM_PER_DEGREE);
    let cell_w = cell_km / km_per_deg_lng;
    let cell_h = cell_km / km_per_deg_lat;

    let columns = (width / cell_w).ceil().max(1.0) as usize;
    let rows = (height / cell_h).ceil().max(1.0) as usize;

    let mut cells = Vec::with_capacity(columns * rows);
    for col in 0..columns {
        let x0 = west + col as f64 * cell_w;
        for row in 0..rows {
            let y0 = south + row as f64 * cell_h;
            cells.push(Rect::new((x0, y0), (x0 + cell_w, y0 + cell_h)));
        }
    }
    cells
}

/// Intersect a polygon with a square grid over its bounding box.
/// Every non-empty piece with a usable outer ring comes back as its own polygon,
/// in grid order. A polygon with a non-finite coordinate yields nothing.
pub fn subdivide(polygon: &GeoPolygon, cell_km: f64) -> Vec<GeoPolygon> {
    if !polygon.rings.iter().flatten().all(|&(lng, lat)| lng.is_finite() && lat.is_finite()) {
        warn!(cell_km, "refusing to clip a polygon with non-finite coordinates");
        return Vec::new();
    }
    let shape = to_geo_polygon(polygon);
    let Some(bounds) = shape.bounding_rect() else {
        return Vec::new();
    };
    let bbox = (bounds.min().x, bounds.min().y, bounds.max().x, bounds.max().y);
    let cells = square_grid(bbox, cell_km);

    let pieces: Vec<GeoPolygon> = cells
        .par_iter()
        .flat_map_iter(|cell| {
            shape
                .intersection(&cell.to_polygon())
                .into_iter()
                .filter_map(|piece| from_geo_polygon(&piece))
        })
        .collect();

    debug!(cells = cells.len(), pieces = pieces.len(), cell_km, "subdivided polygon");
    pieces
}
