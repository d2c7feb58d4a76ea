//! Basic example demonstrating terrain-tile library usage.
//!
//! Run with: cargo run --example basic -- /path/to/airmap-response.json

use std::env;
use terrain_tile::{try_serialize_from_airmap_json, TerrainTile, TileError};

fn main() -> Result<(), TileError> {
    // Get the AirMap response from command line
    let path = env::args().nth(1).unwrap_or_else(|| {
        eprintln!("Usage: cargo run --example basic -- /path/to/airmap-response.json");
        std::process::exit(1);
    });

    let json = std::fs::read(&path)?;
    let bytes = try_serialize_from_airmap_json(&json)?;
    let tile = TerrainTile::from_bytes(&bytes);

    let bounds = tile.bounds().expect("transcoded tiles are valid");
    println!(
        "Tile ({}, {}) - ({}, {}), {} bytes encoded",
        bounds.sw_lat,
        bounds.sw_lon,
        bounds.ne_lat,
        bounds.ne_lon,
        bytes.len()
    );
    println!(
        "min {}m / avg {:.1}m / max {}m",
        tile.min_elevation(),
        tile.avg_elevation(),
        tile.max_elevation()
    );

    // Query the corners and the center
    let center_lat = (bounds.sw_lat + bounds.ne_lat) / 2.0;
    let center_lon = (bounds.sw_lon + bounds.ne_lon) / 2.0;
    let locations = [
        ("Southwest corner", bounds.sw_lat, bounds.sw_lon),
        ("Center", center_lat, center_lon),
        ("Northeast corner", bounds.ne_lat, bounds.ne_lon),
        ("Outside", bounds.ne_lat + 1.0, bounds.ne_lon),
    ];

    println!("{:-<50}", "");
    for (name, lat, lon) in &locations {
        let elevation = tile.elevation(*lat, *lon);
        if elevation.is_nan() {
            println!("{}: no elevation", name);
        } else {
            println!("{}: {:.2}m", name, elevation);
        }
    }

    Ok(())
}
