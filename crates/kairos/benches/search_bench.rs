use chrono::{Duration, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use kairos::{
    EngineConfig, EqualHouses, GeoLocation, MeanMotionEphemeris, SearchOrchestrator,
    SearchRequest, Strategy,
};

fn orchestrator() -> SearchOrchestrator<MeanMotionEphemeris, EqualHouses> {
    SearchOrchestrator::new(MeanMotionEphemeris::new(), EqualHouses, EngineConfig::default()).unwrap()
}

fn request(days: i64, step: i64) -> SearchRequest {
    let start = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    SearchRequest::new(
        start,
        start + Duration::days(days),
        GeoLocation {
            lat: 40.4168,
            lon: -3.7038,
        },
    )
    .with_step(step)
}

fn bench_vectorized(c: &mut Criterion) {
    let search = orchestrator();
    // 90 days at 10 minutes: ~13k instants
    let req = request(90, 10).with_return_all(true);
    c.bench_function("vectorized_90d_10min", |b| {
        b.iter(|| search.find(black_box(&req)))
    });
}

fn bench_coarse_to_fine(c: &mut Criterion) {
    let search = orchestrator();
    let req = request(7, 30).with_strategy(Strategy::CoarseToFine);
    c.bench_function("coarse_to_fine_7d", |b| b.iter(|| search.find(black_box(&req))));
}

criterion_group!(benches, bench_vectorized, bench_coarse_to_fine);
criterion_main!(benches);
