use anyhow::{Context, Result};
use geojson::{GeoJson, Geometry, Value};
use std::path::Path;
use tracing::{info, warn};

/// An open or closed (lng, lat) polyline drawn under the highlights
pub type Coastline = Vec<(f64, f64)>;

/// Coastlines from `<root>/coastline.json`, or the built-in outline when the
/// file is missing or unreadable
pub fn load_basemap(root: &Path) -> Vec<Coastline> {
    let path = root.join("coastline.json");
    if path.exists() {
        match load_coastlines(&path) {
            Ok(lines) if !lines.is_empty() => {
                info!(lines = lines.len(), path = %path.display(), "loaded coastlines");
                return lines;
            }
            Ok(_) => warn!(path = %path.display(), "coastline file has no lines"),
            Err(err) => warn!(path = %path.display(), "failed to load coastlines: {err:#}"),
        }
    }
    simple_world()
}

fn load_coastlines(path: &Path) -> Result<Vec<Coastline>> {
    let mut bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let geojson: GeoJson = simd_json::serde::from_slice(&mut bytes).context("parsing coastline GeoJSON")?;
    let mut lines = Vec::new();
    collect_lines(&geojson, &mut |line| lines.push(line));
    Ok(lines)
}

fn collect_lines(geojson: &GeoJson, add_line: &mut impl FnMut(Coastline)) {
    match geojson {
        GeoJson::FeatureCollection(fc) => {
            for feature in &fc.features {
                if let Some(ref geometry) = feature.geometry {
                    geometry_lines(geometry, add_line);
                }
            }
        }
        GeoJson::Feature(f) => {
            if let Some(ref geometry) = f.geometry {
                geometry_lines(geometry, add_line);
            }
        }
        GeoJson::Geometry(geometry) => geometry_lines(geometry, add_line),
    }
}

fn geometry_lines(geometry: &Geometry, add_line: &mut impl FnMut(Coastline)) {
    let to_line = |coords: &[Vec<f64>]| -> Coastline {
        coords.iter().filter(|c| c.len() >= 2).map(|c| (c[0], c[1])).collect()
    };
    match &geometry.value {
        Value::LineString(coords) => add_line(to_line(coords)),
        Value::MultiLineString(lines) => lines.iter().for_each(|l| add_line(to_line(l))),
        Value::Polygon(rings) => rings.iter().for_each(|r| add_line(to_line(r))),
        Value::MultiPolygon(polygons) => polygons.iter().flatten().for_each(|r| add_line(to_line(r))),
        Value::GeometryCollection(geometries) => geometries.iter().for_each(|g| geometry_lines(g, add_line)),
        Value::Point(_) | Value::MultiPoint(_) => {}
    }
}

/// Coarse closed continent outlines
pub fn simple_world() -> Vec<Coastline> {
    vec![
        // North America
        vec![
            (-168.0, 65.0), (-166.0, 60.0), (-141.0, 60.0), (-130.0, 55.0),
            (-125.0, 48.0), (-124.0, 40.0), (-117.0, 32.0), (-110.0, 25.0),
            (-105.0, 20.0), (-95.0, 16.0), (-85.0, 12.0), (-80.0, 8.0),
            (-83.0, 15.0), (-88.0, 21.0), (-97.0, 25.0), (-97.0, 28.0),
            (-90.0, 30.0), (-82.0, 24.0), (-80.0, 25.0), (-81.0, 31.0),
            (-75.0, 35.0), (-70.0, 41.0), (-67.0, 45.0), (-60.0, 46.0),
            (-53.0, 47.0), (-56.0, 52.0), (-61.0, 56.0), (-64.0, 60.0),
            (-78.0, 62.0), (-94.0, 60.0), (-95.0, 68.0), (-115.0, 68.0),
            (-130.0, 70.0), (-156.0, 71.0), (-168.0, 65.0),
        ],
        // South America
        vec![
            (-80.0, 8.0), (-75.0, 11.0), (-64.0, 10.0), (-60.0, 8.0),
            (-51.0, 4.0), (-50.0, 0.0), (-44.0, -2.0), (-35.0, -5.0),
            (-35.0, -10.0), (-39.0, -15.0), (-41.0, -22.0), (-48.0, -25.0),
            (-53.0, -33.0), (-58.0, -38.0), (-65.0, -42.0), (-68.0, -50.0),
            (-69.0, -55.0), (-75.0, -52.0), (-74.0, -45.0), (-73.0, -37.0),
            (-71.0, -30.0), (-70.0, -18.0), (-76.0, -14.0), (-81.0, -6.0),
            (-80.0, 0.0), (-78.0, 2.0), (-80.0, 8.0),
        ],
        // Europe
        vec![
            (-10.0, 36.0), (-5.0, 36.0), (0.0, 38.0), (3.0, 43.0),
            (10.0, 44.0), (12.0, 45.5), (19.0, 40.0), (23.0, 37.0),
            (26.0, 40.5), (29.0, 41.0), (35.0, 42.0), (40.0, 43.0),
            (40.0, 55.0), (30.0, 60.0), (25.0, 65.0), (20.0, 70.0),
            (10.0, 64.0), (5.0, 62.0), (5.0, 58.0), (8.0, 54.0),
            (0.0, 50.0), (-5.0, 48.0), (-1.0, 44.0), (-9.0, 43.0),
            (-10.0, 36.0),
        ],
        // Africa
        vec![
            (-17.0, 15.0), (-17.0, 21.0), (-13.0, 28.0), (-6.0, 35.0),
            (10.0, 37.0), (11.0, 33.0), (20.0, 31.0), (32.0, 31.0),
            (34.0, 28.0), (39.0, 16.0), (43.0, 12.0), (51.0, 12.0),
            (49.0, 6.0), (40.0, -3.0), (40.0, -15.0), (35.0, -24.0),
            (32.0, -29.0), (26.0, -34.0), (18.0, -34.5), (15.0, -27.0),
            (12.0, -17.0), (13.0, -6.0), (9.0, 0.0), (9.0, 4.0),
            (4.0, 6.0), (-4.0, 5.0), (-8.0, 4.5), (-13.0, 8.0),
            (-17.0, 15.0),
        ],
        // Asia
        vec![
            (35.0, 42.0), (40.0, 43.0), (50.0, 40.0), (54.0, 37.0),
            (57.0, 25.0), (62.0, 25.0), (67.0, 24.0), (73.0, 20.0),
            (77.0, 8.0), (80.0, 15.0), (88.0, 22.0), (92.0, 22.0),
            (95.0, 16.0), (98.0, 8.0), (103.0, 1.5), (105.0, 10.0),
            (109.0, 12.0), (108.0, 21.0), (115.0, 22.0), (120.0, 26.0),
            (122.0, 31.0), (119.0, 37.0), (122.0, 40.0), (129.0, 35.0),
            (130.0, 42.0), (140.0, 48.0), (143.0, 59.0), (160.0, 61.0),
            (170.0, 66.0), (180.0, 68.0), (140.0, 72.0), (110.0, 77.0),
            (80.0, 73.0), (68.0, 70.0), (50.0, 68.0), (40.0, 66.0),
            (40.0, 55.0), (40.0, 43.0), (35.0, 42.0),
        ],
        // Australia
        vec![
            (115.0, -20.0), (122.0, -17.0), (130.0, -12.0), (137.0, -12.0),
            (136.0, -15.0), (141.0, -17.0), (142.0, -11.0), (146.0, -19.0),
            (153.0, -25.0), (153.0, -30.0), (150.0, -37.0), (145.0, -38.5),
            (140.0, -38.0), (135.0, -35.0), (131.0, -31.5), (124.0, -33.5),
            (115.0, -34.0), (113.0, -26.0), (115.0, -20.0),
        ],
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_simple_world_rings_are_closed_and_in_range() {
        let world = simple_world();
        assert_eq!(world.len(), 6);
        for ring in &world {
            assert_eq!(ring.first(), ring.last());
            assert!(ring.iter().all(|&(lng, lat)| (-180.0..=180.0).contains(&lng) && (-90.0..=90.0).contains(&lat)));
        }
    }

    #[test]
    fn test_loads_lines_from_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("coastline.json"),
            r#"{"type":"FeatureCollection","features":[
                {"type":"Feature","properties":{},"geometry":{"type":"LineString","coordinates":[[0,0],[1,1]]}},
                {"type":"Feature","properties":{},"geometry":{"type":"MultiLineString","coordinates":[[[2,2],[3,3]],[[4,4],[5,5]]]}},
                {"type":"Feature","properties":{},"geometry":{"type":"Point","coordinates":[9,9]}}
            ]}"#,
        )
        .unwrap();
        let lines = load_basemap(dir.path());
        assert_eq!(lines, vec![vec![(0.0, 0.0), (1.0, 1.0)], vec![(2.0, 2.0), (3.0, 3.0)], vec![(4.0, 4.0), (5.0, 5.0)]]);
    }

    #[test]
    fn test_falls_back_without_file() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(load_basemap(dir.path()), simple_world());
    }

    #[test]
    fn test_falls_back_on_garbage() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("coastline.json"), "not json").unwrap();
        assert_eq!(load_basemap(dir.path()), simple_world());
    }
}
