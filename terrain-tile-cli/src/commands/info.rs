use anyhow::{Context, Result};
use serde::Serialize;
use std::path::PathBuf;
use terrain_tile::TerrainTile;

use super::load_tile;

#[derive(Serialize)]
struct TileInfoResponse {
    path: String,
    size: u64,
    sw_lat: f64,
    sw_lon: f64,
    ne_lat: f64,
    ne_lon: f64,
    rows: i16,
    cols: i16,
    cell_size_lat: Option<f64>,
    cell_size_lon: Option<f64>,
    min_elevation: f64,
    max_elevation: f64,
    avg_elevation: f64,
    nominal_footprint: bool,
}

pub fn run(data_dir: Option<PathBuf>, tile: PathBuf, json: bool) -> Result<()> {
    let (path, tile) = load_tile(data_dir.as_deref(), &tile)?;
    let size = std::fs::metadata(&path)?.len();
    let info = describe(&tile, path.display().to_string(), size)?;

    if json {
        println!("{}", serde_json::to_string(&info)?);
        return Ok(());
    }

    println!("Tile: {}", info.path);
    println!("File size: {} bytes", info.size);
    println!();
    println!(
        "Bounds: ({}, {}) - ({}, {}){}",
        info.sw_lat,
        info.sw_lon,
        info.ne_lat,
        info.ne_lon,
        if info.nominal_footprint {
            ""
        } else {
            " (non-nominal footprint)"
        }
    );
    println!("Grid: {} rows x {} columns", info.rows, info.cols);
    if let (Some(lat), Some(lon)) = (info.cell_size_lat, info.cell_size_lon) {
        println!(
            "Cell size: {:.3}\" x {:.3}\"",
            lat * 3600.0,
            lon * 3600.0
        );
    }
    println!();
    println!("Min elevation: {}m", info.min_elevation);
    println!("Max elevation: {}m", info.max_elevation);
    println!("Avg elevation: {:.2}m", info.avg_elevation);

    Ok(())
}

fn describe(tile: &TerrainTile, path: String, size: u64) -> Result<TileInfoResponse> {
    let bounds = tile.bounds().context("Tile holds no data")?;
    let grid = tile.grid_size().context("Tile holds no data")?;
    let cell = tile.cell_size().context("Tile holds no data")?;

    Ok(TileInfoResponse {
        path,
        size,
        sw_lat: bounds.sw_lat,
        sw_lon: bounds.sw_lon,
        ne_lat: bounds.ne_lat,
        ne_lon: bounds.ne_lon,
        rows: grid.lat,
        cols: grid.lon,
        // Single-sample axes have no spacing
        cell_size_lat: Some(cell.lat).filter(|v| v.is_finite()),
        cell_size_lon: Some(cell.lon).filter(|v| v.is_finite()),
        min_elevation: tile.min_elevation(),
        max_elevation: tile.max_elevation(),
        avg_elevation: tile.avg_elevation(),
        nominal_footprint: bounds.is_nominal(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_invalid_tile() {
        assert!(describe(&TerrainTile::default(), "x".into(), 0).is_err());
    }

    #[test]
    fn test_describe_single_row_tile() {
        let tile = TerrainTile::from_airmap_json(
            br#"{"status": "success", "data": {
            "bounds": {"sw": {"lat": 47.0, "lon": 8.0}, "ne": {"lat": 47.01, "lon": 8.01}},
            "stats": {"min": 1, "max": 3, "avg": 2.0},
            "carpet": [[1, 2, 3]]}}"#,
        );

        let info = describe(&tile, "t.tile".into(), 54).unwrap();
        assert_eq!(info.rows, 1);
        assert_eq!(info.cols, 3);
        assert!(info.cell_size_lat.is_none());
        assert!(info.cell_size_lon.is_some());
        assert!(info.nominal_footprint);
    }
}
