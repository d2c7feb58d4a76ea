use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use terrain_tile::TerrainTile;

use super::load_tile;

pub fn run(
    data_dir: Option<PathBuf>,
    tile: PathBuf,
    input: PathBuf,
    output: Option<PathBuf>,
    lat_col: String,
    lon_col: String,
) -> Result<()> {
    let (_, tile) = load_tile(data_dir.as_deref(), &tile)?;

    // Prepare output
    let output_path = output.unwrap_or_else(|| {
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "output".to_string());
        input.with_file_name(format!("{}_elevation.csv", stem))
    });

    let count = process_csv(&tile, &input, &output_path, &lat_col, &lon_col, true)?;

    tracing::info!(records = count, "Batch complete");
    println!("Output written to: {}", output_path.display());
    Ok(())
}

/// Copy `input` to `output`, appending an `elevation` column.
///
/// Coordinates outside the tile are written as `none`.
fn process_csv(
    tile: &TerrainTile,
    input: &Path,
    output: &Path,
    lat_col: &str,
    lon_col: &str,
    show_progress: bool,
) -> Result<u64> {
    let file = File::open(input).context("Failed to open input file")?;
    let mut reader = csv::Reader::from_reader(BufReader::new(file));

    // Find column indices
    let headers = reader.headers()?.clone();
    let lat_idx = headers
        .iter()
        .position(|h| h == lat_col)
        .with_context(|| format!("Column '{}' not found in CSV", lat_col))?;
    let lon_idx = headers
        .iter()
        .position(|h| h == lon_col)
        .with_context(|| format!("Column '{}' not found in CSV", lon_col))?;

    // Collect records for progress bar
    let records: Vec<_> = reader.records().collect::<Result<_, _>>()?;
    let total = records.len() as u64;

    let pb = if show_progress {
        ProgressBar::new(total)
    } else {
        ProgressBar::hidden()
    };
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})",
            )?
            .progress_chars("#>-"),
    );

    let output_file = File::create(output).context("Failed to create output file")?;
    let mut writer = csv::Writer::from_writer(BufWriter::new(output_file));

    // Write header
    let mut new_headers: Vec<&str> = headers.iter().collect();
    new_headers.push("elevation");
    writer.write_record(&new_headers)?;

    // Process records
    for record in records {
        let lat: f64 = record
            .get(lat_idx)
            .context("Missing latitude")?
            .trim()
            .parse()
            .context("Invalid latitude")?;
        let lon: f64 = record
            .get(lon_idx)
            .context("Missing longitude")?
            .trim()
            .parse()
            .context("Invalid longitude")?;

        let elevation = tile.elevation(lat, lon);
        let elevation = if elevation.is_nan() {
            "none".to_string()
        } else {
            format!("{:.2}", elevation)
        };

        let mut new_record: Vec<&str> = record.iter().collect();
        new_record.push(&elevation);
        writer.write_record(&new_record)?;

        pb.inc(1);
    }

    pb.finish_with_message("done");
    writer.flush()?;

    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_process_csv() {
        let tile = TerrainTile::from_airmap_json(
            br#"{"status": "success", "data": {
            "bounds": {"sw": {"lat": 47.0, "lon": 8.0}, "ne": {"lat": 47.01, "lon": 8.01}},
            "stats": {"min": 100, "max": 130, "avg": 115.0},
            "carpet": [[100, 110], [120, 130]]}}"#,
        );
        let tmp = TempDir::new().unwrap();
        let input = tmp.path().join("points.csv");
        let output = tmp.path().join("points_elevation.csv");
        fs::write(&input, "name,lat,lon\nsw,47.0,8.0\nne,47.01,8.01\nfar,48.0,8.0\n").unwrap();

        let count = process_csv(&tile, &input, &output, "lat", "lon", false).unwrap();
        assert_eq!(count, 3);

        let written = fs::read_to_string(&output).unwrap();
        let lines: Vec<&str> = written.lines().collect();
        assert_eq!(lines[0], "name,lat,lon,elevation");
        assert_eq!(lines[1], "sw,47.0,8.0,100.00");
        assert_eq!(lines[2], "ne,47.01,8.01,130.00");
        assert_eq!(lines[3], "far,48.0,8.0,none");
    }

    #[test]
    fn test_process_csv_missing_column() {
        let tile = TerrainTile::default();
        let tmp = TempDir::new().unwrap();
        let input = tmp.path().join("points.csv");
        fs::write(&input, "y,x\n47.0,8.0\n").unwrap();

        let result = process_csv(&tile, &input, &tmp.path().join("out.csv"), "lat", "lon", false);
        assert!(result.is_err());
    }
}
