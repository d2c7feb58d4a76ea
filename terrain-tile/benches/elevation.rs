use criterion::{black_box, criterion_group, criterion_main, Criterion};
use serde_json::json;
use terrain_tile::{serialize_from_airmap_json, TerrainTile};

/// Samples per side of a nominal tile: 0.01° at 1 arc-second spacing.
const NOMINAL_SAMPLES: i16 = 37;

/// Create a synthetic AirMap response with a simple elevation gradient.
fn create_response() -> Vec<u8> {
    let carpet: Vec<Vec<i16>> = (0..NOMINAL_SAMPLES)
        .map(|row| {
            (0..NOMINAL_SAMPLES)
                .map(|col| (row * 7 + col * 3) % 4000)
                .collect()
        })
        .collect();
    let max = carpet.iter().flatten().copied().max().unwrap();
    let min = carpet.iter().flatten().copied().min().unwrap();

    json!({
        "status": "success",
        "data": {
            "bounds": {"sw": {"lat": 47.0, "lon": 8.0}, "ne": {"lat": 47.01, "lon": 8.01}},
            "stats": {"min": min, "max": max, "avg": (f64::from(min) + f64::from(max)) / 2.0},
            "carpet": carpet
        }
    })
    .to_string()
    .into_bytes()
}

fn bench_transcode(c: &mut Criterion) {
    let response = create_response();

    c.bench_function("transcode_airmap_json", |b| {
        b.iter(|| black_box(serialize_from_airmap_json(black_box(&response))));
    });
}

fn bench_decode(c: &mut Criterion) {
    let bytes = serialize_from_airmap_json(&create_response());

    c.bench_function("decode_tile", |b| {
        b.iter(|| black_box(TerrainTile::from_bytes(black_box(&bytes))));
    });
}

fn bench_single_elevation(c: &mut Criterion) {
    let tile = TerrainTile::from_airmap_json(&create_response());

    c.bench_function("single_elevation", |b| {
        b.iter(|| black_box(tile.elevation(black_box(47.00361), black_box(8.00727))));
    });
}

fn bench_batch_elevation(c: &mut Criterion) {
    let tile = TerrainTile::from_airmap_json(&create_response());

    // Generate 1000 coords within the tile
    let coords: Vec<(f64, f64)> = (0..1000)
        .map(|i| {
            let frac = i as f64 / 1000.0;
            (47.0 + frac * 0.0099, 8.0 + (1.0 - frac) * 0.0099)
        })
        .collect();

    c.bench_function("batch_1000_elevations", |b| {
        b.iter(|| {
            let total: f64 = coords
                .iter()
                .map(|&(lat, lon)| tile.elevation(lat, lon))
                .sum();
            black_box(total)
        });
    });
}

criterion_group!(
    benches,
    bench_transcode,
    bench_decode,
    bench_single_elevation,
    bench_batch_elevation,
);
criterion_main!(benches);
