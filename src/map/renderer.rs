use crate::braille::BrailleCanvas;
use crate::data::Coastline;
use crate::globe::GlobeScene;
use crate::map::geometry::{draw_circle, draw_line, draw_ring, fill_triangle};
use crate::map::globe::GlobeView;
use crate::mesh::{GeometryKind, SurfaceGeometry, BALL_RADIUS, BASE_RADIUS, STICK_RADIUS};
use crate::sphere::{project_finite, walk_great_circle};
use glam::DVec3;

/// Spacing of graticule lines in degrees
const GRATICULE_STEP: f64 = 30.0;

/// Display settings for globe layers
#[derive(Debug, Clone)]
pub struct DisplaySettings {
    pub show_coastlines: bool,
    pub show_graticule: bool,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            show_coastlines: true,
            show_graticule: false,
        }
    }
}

/// One canvas per colour, drawn back to front
pub struct GlobeLayers {
    pub limb: BrailleCanvas,
    pub graticule: BrailleCanvas,
    pub coastlines: BrailleCanvas,
    pub regions: BrailleCanvas,
    pub pins: BrailleCanvas,
}

impl GlobeLayers {
    fn new(width: usize, height: usize) -> Self {
        Self {
            limb: BrailleCanvas::new(width, height),
            graticule: BrailleCanvas::new(width, height),
            coastlines: BrailleCanvas::new(width, height),
            regions: BrailleCanvas::new(width, height),
            pins: BrailleCanvas::new(width, height),
        }
    }
}

/// Draws the basemap and every geometry attached to the globe node
#[derive(Debug, Default)]
pub struct GlobeRenderer {
    coastlines: Vec<Coastline>,
    pub settings: DisplaySettings,
}

impl GlobeRenderer {
    pub fn new(coastlines: Vec<Coastline>) -> Self {
        Self {
            coastlines,
            settings: DisplaySettings::default(),
        }
    }

    pub fn has_data(&self) -> bool {
        !self.coastlines.is_empty()
    }

    pub fn toggle_coastlines(&mut self) {
        self.settings.show_coastlines = !self.settings.show_coastlines;
    }

    pub fn toggle_graticule(&mut self) {
        self.settings.show_graticule = !self.settings.show_graticule;
    }

    /// Render onto canvases of `width` x `height` characters
    pub fn render(&self, scene: &GlobeScene, radius: f64, width: usize, height: usize) -> GlobeLayers {
        let mut layers = GlobeLayers::new(width, height);
        let view = GlobeView::of(scene, scene.scale, width * 2, height * 4);

        let (cx, cy) = view.center();
        draw_ring(&mut layers.limb, cx as i32, cy as i32, (radius * scene.scale).round() as i32);

        if self.settings.show_graticule {
            for line in graticule() {
                draw_lnglat_line(&mut layers.graticule, &view, &line, radius);
            }
        }

        if self.settings.show_coastlines {
            for line in &self.coastlines {
                draw_lnglat_line(&mut layers.coastlines, &view, line, radius);
            }
        }

        for (_, geometry) in scene.children() {
            match &geometry.kind {
                GeometryKind::Mesh => draw_mesh(&mut layers.regions, &view, geometry),
                GeometryKind::Outline => draw_arcs(&mut layers.regions, &view, &geometry.positions),
                GeometryKind::Pin(marker) => {
                    if view.project(marker.anchor).is_none() {
                        continue;
                    }
                    let [base, top, ball] = marker.key_points();
                    let (bx, by) = view.to_screen(view.to_view(base));
                    let (tx, ty) = view.to_screen(view.to_view(top));
                    let (hx, hy) = view.to_screen(view.to_view(ball));
                    let stick = dots(2.0 * STICK_RADIUS, scene.scale);
                    for offset in 0..stick {
                        draw_line(&mut layers.pins, bx as i32 + offset, by as i32, tx as i32 + offset, ty as i32);
                    }
                    draw_circle(&mut layers.pins, bx as i32, by as i32, dots(BASE_RADIUS, scene.scale));
                    draw_circle(&mut layers.pins, hx as i32, hy as i32, dots(BALL_RADIUS, scene.scale));
                }
            }
        }

        layers
    }
}

/// Marker size in dots, never thinner than one
fn dots(size: f64, scale: f64) -> i32 {
    (size * scale).round().max(1.0) as i32
}

/// Triangles with every corner on the near hemisphere
fn draw_mesh(canvas: &mut BrailleCanvas, view: &GlobeView, geometry: &SurfaceGeometry) {
    for [a, b, c] in geometry.triangles() {
        if let (Some(pa), Some(pb), Some(pc)) = (view.project(a), view.project(b), view.project(c)) {
            fill_triangle(canvas, pa, pb, pc);
        }
    }
}

/// Polyline of globe-local points joined along great circles, broken where it
/// passes behind the globe
fn draw_arcs(canvas: &mut BrailleCanvas, view: &GlobeView, points: &[DVec3]) {
    let Some(&first) = points.first() else {
        return;
    };
    let mut prev = view.project(first);
    let mut from = first;
    for &to in &points[1..] {
        walk_great_circle(from, to, |p| {
            let here = view.project(p);
            if let (Some((x0, y0)), Some((x1, y1))) = (prev, here) {
                draw_line(canvas, x0 as i32, y0 as i32, x1 as i32, y1 as i32);
            }
            prev = here;
        });
        from = to;
    }
}

fn draw_lnglat_line(canvas: &mut BrailleCanvas, view: &GlobeView, line: &[(f64, f64)], radius: f64) {
    let points: Vec<DVec3> = line
        .iter()
        .filter_map(|&(lng, lat)| project_finite(lat, lng, radius))
        .collect();
    draw_arcs(canvas, view, &points);
}

/// Parallels and meridians every [`GRATICULE_STEP`] degrees
fn graticule() -> Vec<Coastline> {
    let mut lines = Vec::new();
    let mut lat = -90.0 + GRATICULE_STEP;
    while lat < 90.0 {
        lines.push((0..=72).map(|i| (-180.0 + i as f64 * 5.0, lat)).collect());
        lat += GRATICULE_STEP;
    }
    let mut lng = -180.0;
    while lng < 180.0 {
        lines.push(vec![(lng, -90.0), (lng, 0.0), (lng, 90.0)]);
        lng += GRATICULE_STEP;
    }
    lines
}
