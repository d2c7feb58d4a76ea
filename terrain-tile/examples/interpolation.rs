//! Example demonstrating bilinear interpolation across a synthetic tile.
//!
//! Run with: cargo run --example interpolation

use serde_json::json;
use terrain_tile::TerrainTile;

fn main() {
    // A 4x4 carpet sloping up towards the north-east
    let carpet: Vec<Vec<i16>> = (0..4)
        .map(|row| (0..4).map(|col| 100 + row * 20 + col * 5).collect())
        .collect();
    let response = json!({
        "status": "success",
        "data": {
            "bounds": {"sw": {"lat": 47.0, "lon": 8.0}, "ne": {"lat": 47.01, "lon": 8.01}},
            "stats": {"min": 100, "max": 175, "avg": 137.5},
            "carpet": carpet
        }
    });

    let tile = TerrainTile::from_airmap_json(response.to_string().as_bytes());
    if !tile.is_valid() {
        eprintln!("Synthetic tile was rejected");
        std::process::exit(1);
    }

    // Profile along the south-west to north-east diagonal
    println!("Diagonal elevation profile:");
    println!("{:-<50}", "");
    let steps = 12;
    for i in 0..=steps {
        let t = f64::from(i) / f64::from(steps);
        let lat = 47.0 + 0.01 * t;
        let lon = 8.0 + 0.01 * t;
        let elevation = tile.elevation(lat.min(47.01), lon.min(8.01));
        println!("({:.5}, {:.5}): {:.2}m", lat, lon, elevation);
    }
}
