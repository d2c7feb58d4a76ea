use anyhow::Result;
use serde::Serialize;
use std::path::PathBuf;

use super::load_tile;

#[derive(Serialize)]
struct ElevationResponse {
    lat: f64,
    lon: f64,
    elevation: Option<f64>,
}

pub fn run(
    data_dir: Option<PathBuf>,
    tile: PathBuf,
    lat: f64,
    lon: f64,
    json: bool,
) -> Result<()> {
    let (_, tile) = load_tile(data_dir.as_deref(), &tile)?;

    let elevation = Some(tile.elevation(lat, lon)).filter(|e| !e.is_nan());

    // Output result
    if json {
        let response = ElevationResponse {
            lat,
            lon,
            elevation,
        };
        println!("{}", serde_json::to_string(&response)?);
    } else if let Some(elev) = elevation {
        println!("{:.2}", elev);
    } else {
        println!("none");
    }

    Ok(())
}
