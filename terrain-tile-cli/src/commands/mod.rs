pub mod batch;
pub mod info;
pub mod query;
pub mod transcode;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use terrain_tile::TerrainTile;

/// Resolve a tile path, joining relative paths onto the data directory.
pub fn resolve_tile_path(data_dir: Option<&Path>, tile: &Path) -> PathBuf {
    match data_dir {
        Some(dir) if tile.is_relative() => dir.join(tile),
        _ => tile.to_path_buf(),
    }
}

/// Load a stored tile, failing if it is missing or malformed.
pub fn load_tile(data_dir: Option<&Path>, tile: &Path) -> Result<(PathBuf, TerrainTile)> {
    let path = resolve_tile_path(data_dir, tile);
    let tile = TerrainTile::from_file(&path)
        .with_context(|| format!("Failed to load tile {}", path.display()))?;
    tracing::debug!(path = %path.display(), "Loaded tile");
    Ok((path, tile))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_relative_path() {
        let resolved = resolve_tile_path(Some(Path::new("/data/tiles")), Path::new("a.tile"));
        assert_eq!(resolved, PathBuf::from("/data/tiles/a.tile"));
    }

    #[test]
    fn test_resolve_absolute_path() {
        let resolved = resolve_tile_path(Some(Path::new("/data/tiles")), Path::new("/tmp/a.tile"));
        assert_eq!(resolved, PathBuf::from("/tmp/a.tile"));

        let resolved = resolve_tile_path(None, Path::new("a.tile"));
        assert_eq!(resolved, PathBuf::from("a.tile"));
    }
}
