use criterion::{black_box, criterion_group, criterion_main, Criterion};
use glam::DQuat;
use tui_globe::data::{simple_world, Feature, FeatureCollection, GeoPolygon};
use tui_globe::globe::{rotation_between, GlobeScene, RegionHighlighter};
use tui_globe::map::GlobeRenderer;
use tui_globe::mesh::{build_highlight, tessellate_polygon, HighlightStyle, MeshMethod};
use tui_globe::sphere::{project, LatLng};

/// Square of `size` degrees with its south-west corner at (lng, lat)
fn square(lng: f64, lat: f64, size: f64) -> GeoPolygon {
    GeoPolygon::new(
        vec![(lng, lat), (lng + size, lat), (lng + size, lat + size), (lng, lat + size)],
        Vec::new(),
    )
}

fn bench_projection(c: &mut Criterion) {
    c.bench_function("project_10k", |b| {
        b.iter(|| {
            let mut acc = 0.0;
            for i in 0..10_000 {
                let lat = (i % 180) as f64 - 90.0;
                let lng = (i % 360) as f64 - 180.0;
                acc += project(black_box(lat), black_box(lng), 100.0).x;
            }
            acc
        })
    });

    c.bench_function("rotation_between", |b| {
        b.iter(|| {
            rotation_between(
                black_box(LatLng::new(10.0, -170.0)),
                black_box(LatLng::new(-35.0, 150.0)),
                DQuat::IDENTITY,
            )
        })
    });
}

fn bench_tessellation(c: &mut Criterion) {
    let small = square(10.0, 10.0, 2.0);
    let medium = square(10.0, 10.0, 8.0);
    let large = square(-100.0, -20.0, 40.0);

    c.bench_function("tessellate_direct", |b| {
        b.iter(|| tessellate_polygon(black_box(&small), 100.0, None))
    });
    c.bench_function("tessellate_grid", |b| {
        b.iter(|| tessellate_polygon(black_box(&medium), 100.0, None))
    });
    c.bench_function("tessellate_inflated", |b| {
        b.iter(|| tessellate_polygon(black_box(&large), 100.0, None))
    });
    c.bench_function("tessellate_earcut_override", |b| {
        b.iter(|| tessellate_polygon(black_box(&medium), 100.0, Some(MeshMethod::Earcut)))
    });

    let doc = FeatureCollection::new(vec![Feature {
        polygons: vec![small.clone(), square(20.0, 20.0, 3.0)],
    }]);
    c.bench_function("build_highlight_lines", |b| {
        b.iter(|| build_highlight(black_box(&doc), 100.0, HighlightStyle::Lines))
    });
}

fn bench_render(c: &mut Criterion) {
    let renderer = GlobeRenderer::new(simple_world());
    let mut scene = GlobeScene::new();
    let doc = FeatureCollection::new(vec![Feature {
        polygons: vec![square(-95.0, -5.0, 10.0)],
    }]);
    RegionHighlighter::new().install(&doc, &mut scene, 60.0, HighlightStyle::Mesh, 1.0);

    c.bench_function("render_globe_120x40", |b| {
        b.iter(|| renderer.render(black_box(&scene), 60.0, 120, 40))
    });
}

criterion_group!(benches, bench_projection, bench_tessellation, bench_render);
criterion_main!(benches);
