use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use terrain_tile::{try_serialize_from_airmap_json, TerrainTile};

use super::resolve_tile_path;

pub fn run(data_dir: Option<PathBuf>, input: PathBuf, output: Option<PathBuf>) -> Result<()> {
    let (input, output_path) = resolve_paths(data_dir.as_deref(), &input, output.as_deref());
    let bytes = transcode_file(&input, &output_path)?;

    let tile = TerrainTile::from_bytes(&bytes);
    println!(
        "Wrote {} ({} bytes, {}x{} samples)",
        output_path.display(),
        bytes.len(),
        tile.grid_size().map_or(0, |g| g.lat),
        tile.grid_size().map_or(0, |g| g.lon),
    );
    Ok(())
}

/// Transcode `input` into `output`, returning the written encoding.
pub fn transcode_file(input: &Path, output: &Path) -> Result<Vec<u8>> {
    let json = fs::read(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;

    let bytes = try_serialize_from_airmap_json(&json)
        .with_context(|| format!("No tile available from {}", input.display()))?;

    fs::write(output, &bytes)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    tracing::info!(
        input = %input.display(),
        output = %output.display(),
        size = bytes.len(),
        "Transcoded tile"
    );
    Ok(bytes)
}

fn default_output(input: &Path) -> PathBuf {
    input.with_extension("tile")
}

/// Resolve relative input and output paths against the data directory.
fn resolve_paths(
    data_dir: Option<&Path>,
    input: &Path,
    output: Option<&Path>,
) -> (PathBuf, PathBuf) {
    let input = resolve_tile_path(data_dir, input);
    let output = match output {
        Some(output) => resolve_tile_path(data_dir, output),
        None => default_output(&input),
    };
    (input, output)
}
