use criterion::{black_box, criterion_group, criterion_main, Criterion};
use kairos::aspects::{exact_aspect_mask, gather_ruler, void_of_course_mask, VOC_BODIES};
use kairos::ephemeris::{Body, BodyTrack, PositionBatch};

const N: usize = 100_000;

fn sweep(start: f64, speed: f64) -> Vec<f64> {
    (0..N).map(|i| (start + speed * i as f64).rem_euclid(360.0)).collect()
}

fn batch() -> PositionBatch {
    let mut batch = PositionBatch::new(N);
    for (k, body) in Body::TRADITIONAL.into_iter().enumerate() {
        let lons = sweep(k as f64 * 47.0, 0.01 + k as f64 * 0.03);
        let rows = lons.iter().map(|&l| [l, 0.0, 1.0, 0.5, 0.0, 0.0]).collect();
        let _ = batch.insert(body, BodyTrack::from_rows(rows));
    }
    batch
}

fn bench_exact_aspect_mask(c: &mut Criterion) {
    let a = sweep(0.0, 0.55);
    let b = sweep(120.0, 0.04);
    c.bench_function("exact_aspect_mask_100k", |bench| {
        bench.iter(|| exact_aspect_mask(black_box(&a), black_box(&b), 120.0, 6.0))
    });
}

fn bench_gather_ruler(c: &mut Criterion) {
    let positions = batch();
    let asc = sweep(10.0, 7.5);
    c.bench_function("gather_ruler_100k", |bench| {
        bench.iter(|| gather_ruler(black_box(&asc), black_box(&positions)))
    });
}

fn bench_void_of_course(c: &mut Criterion) {
    let positions = batch();
    let moon = sweep(200.0, 0.55);
    c.bench_function("void_of_course_100k", |bench| {
        bench.iter(|| void_of_course_mask(black_box(&moon), black_box(&positions), &VOC_BODIES))
    });
}

criterion_group!(
    benches,
    bench_exact_aspect_mask,
    bench_gather_ruler,
    bench_void_of_course
);
criterion_main!(benches);
