//! Terrain tile model and elevation interpolation.
//!
//! This module provides the [`TerrainTile`] struct, an immutable elevation
//! grid covering a small square area, and the bilinear interpolation used to
//! answer elevation queries inside it.

use std::fs::File;
use std::path::Path;

use memmap2::Mmap;
use tracing::{debug, trace, warn};

use crate::airmap;
use crate::encoding::{self, TileInfo};
use crate::error::Result;

/// Each terrain tile represents a square area of 0.01 degrees in lat/lon.
pub const TILE_SIZE_DEGREES: f64 = 0.01;

/// Nominal spacing between elevation samples: 1 arc-second.
pub const TILE_VALUE_SPACING_DEGREES: f64 = 1.0 / 3600.0;

/// Nominal spacing between elevation samples in meters.
pub const TILE_VALUE_SPACING_METERS: f64 = 30.0;

/// Tolerance used when comparing a footprint against [`TILE_SIZE_DEGREES`].
const FOOTPRINT_TOLERANCE_DEGREES: f64 = 1e-9;

/// Fractional grid positions this close to a whole index are treated as
/// lying on the grid node.
const NODE_SNAP_TOLERANCE: f64 = 1e-9;

/// Geographic footprint of a tile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileBounds {
    /// Southwest corner latitude
    pub sw_lat: f64,
    /// Southwest corner longitude
    pub sw_lon: f64,
    /// Northeast corner latitude
    pub ne_lat: f64,
    /// Northeast corner longitude
    pub ne_lon: f64,
}

impl TileBounds {
    /// Create bounds from the southwest and northeast corners.
    pub fn new(sw_lat: f64, sw_lon: f64, ne_lat: f64, ne_lon: f64) -> Self {
        Self {
            sw_lat,
            sw_lon,
            ne_lat,
            ne_lon,
        }
    }

    /// Check if a coordinate lies within the bounds, edges included.
    ///
    /// Non-finite coordinates are never contained.
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        lat >= self.sw_lat && lat <= self.ne_lat && lon >= self.sw_lon && lon <= self.ne_lon
    }

    /// Latitude extent in degrees.
    pub fn lat_span(&self) -> f64 {
        self.ne_lat - self.sw_lat
    }

    /// Longitude extent in degrees.
    pub fn lon_span(&self) -> f64 {
        self.ne_lon - self.sw_lon
    }

    /// Whether both sides match [`TILE_SIZE_DEGREES`].
    pub fn is_nominal(&self) -> bool {
        (self.lat_span() - TILE_SIZE_DEGREES).abs() <= FOOTPRINT_TOLERANCE_DEGREES
            && (self.lon_span() - TILE_SIZE_DEGREES).abs() <= FOOTPRINT_TOLERANCE_DEGREES
    }
}

/// Elevation statistics of a tile, in meters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileStats {
    /// Lowest elevation
    pub min: i16,
    /// Highest elevation
    pub max: i16,
    /// Mean elevation
    pub avg: f64,
}

/// Number of samples along each axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridSize {
    /// Rows (distinct latitudes)
    pub lat: i16,
    /// Columns (distinct longitudes)
    pub lon: i16,
}

impl GridSize {
    /// Number of rows as an index bound.
    pub fn rows(&self) -> usize {
        self.lat.max(0) as usize
    }

    /// Number of columns as an index bound.
    pub fn cols(&self) -> usize {
        self.lon.max(0) as usize
    }

    /// Total number of samples.
    pub fn len(&self) -> usize {
        self.rows() * self.cols()
    }

    /// Returns true if the grid holds no samples.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Spacing between adjacent samples in degrees.
///
/// An axis with a single sample has no spacing and reports `NaN`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellSize {
    /// Spacing between rows
    pub lat: f64,
    /// Spacing between columns
    pub lon: f64,
}

/// An immutable elevation tile.
///
/// A tile is either valid, carrying bounds, statistics and a sample grid, or
/// invalid. Invalid tiles are what [`TerrainTile::default`] and every failed
/// decode produce: they answer every elevation query with `NaN` instead of
/// raising an error, so callers check [`TerrainTile::is_valid`] before use.
///
/// # Example
///
/// ```ignore
/// use terrain_tile::TerrainTile;
///
/// let tile = TerrainTile::from_bytes(&stored);
/// if tile.is_valid() {
///     println!("Elevation: {:.1}m", tile.elevation(47.005, 8.005));
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct TerrainTile {
    state: TileState,
}

#[derive(Debug, Clone, Default)]
enum TileState {
    #[default]
    Invalid,
    Valid(TileData),
}

#[derive(Debug, Clone)]
struct TileData {
    info: TileInfo,
    cell_size: CellSize,
    /// Row-major samples, `row * cols + col`
    samples: Vec<i16>,
}

impl TerrainTile {
    /// Decode a tile from its internal encoding.
    ///
    /// Malformed or truncated payloads do not fail: they produce an invalid
    /// tile and the reason is logged at `warn` level. Use
    /// [`Self::try_from_bytes`] to get the reason instead.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        match Self::try_from_bytes(bytes) {
            Ok(tile) => tile,
            Err(e) => {
                warn!(error = %e, size = bytes.len(), "Rejected terrain tile payload");
                Self::default()
            }
        }
    }

    /// Decode a tile from its internal encoding, reporting why it was rejected.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload is shorter than the header, its length
    /// does not match the declared grid, or the header violates the tile
    /// invariants (non-positive grid, unordered bounds or statistics).
    pub fn try_from_bytes(bytes: &[u8]) -> Result<Self> {
        let (info, samples) = encoding::decode(bytes)?;

        let cell_size = CellSize {
            lat: spacing(info.bounds.lat_span(), info.grid_size.rows()),
            lon: spacing(info.bounds.lon_span(), info.grid_size.cols()),
        };

        debug!(
            rows = info.grid_size.lat,
            cols = info.grid_size.lon,
            sw_lat = info.bounds.sw_lat,
            sw_lon = info.bounds.sw_lon,
            "Decoded terrain tile"
        );

        Ok(Self {
            state: TileState::Valid(TileData {
                info,
                cell_size,
                samples,
            }),
        })
    }

    /// Build a tile straight from an AirMap elevation response.
    ///
    /// Equivalent to transcoding with [`crate::serialize_from_airmap_json`]
    /// and decoding the result; any failure yields an invalid tile.
    pub fn from_airmap_json(json: &[u8]) -> Self {
        let bytes = airmap::serialize_from_airmap_json(json);
        if bytes.is_empty() {
            return Self::default();
        }
        Self::from_bytes(&bytes)
    }

    /// Load a stored tile from a file.
    ///
    /// Unlike [`Self::from_bytes`], a malformed file is reported as an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or memory-mapped, or if
    /// its contents are not a valid tile encoding.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(&path)?;

        // SAFETY: Memory mapping is safe as long as the file is not modified
        // while mapped. The mapping is read-only and dropped before returning.
        let mmap = unsafe { Mmap::map(&file)? };

        Self::try_from_bytes(&mmap)
    }

    /// Encode this tile back into the internal encoding.
    ///
    /// Returns an empty vector for an invalid tile.
    pub fn to_bytes(&self) -> Vec<u8> {
        match &self.state {
            TileState::Valid(data) => encoding::encode(&data.info, &data.samples),
            TileState::Invalid => Vec::new(),
        }
    }

    /// Returns true if the tile holds usable data.
    pub fn is_valid(&self) -> bool {
        matches!(self.state, TileState::Valid(_))
    }

    /// Get the elevation at the specified coordinates.
    ///
    /// The value is bilinearly interpolated between the four samples of the
    /// grid cell enclosing the coordinate. A coordinate on a grid node returns
    /// that node's sample exactly. Coordinates on the north or east edge are
    /// answered from the last row or column.
    ///
    /// # Arguments
    ///
    /// * `lat` - Latitude in decimal degrees
    /// * `lon` - Longitude in decimal degrees
    ///
    /// # Returns
    ///
    /// The elevation in meters, or `NaN` if the tile is invalid or the
    /// coordinate lies outside its bounds.
    pub fn elevation(&self, lat: f64, lon: f64) -> f64 {
        match &self.state {
            TileState::Valid(data) => data.elevation(lat, lon),
            TileState::Invalid => f64::NAN,
        }
    }

    /// Minimum elevation of the tile, or `NaN` if invalid.
    pub fn min_elevation(&self) -> f64 {
        self.stats().map_or(f64::NAN, |s| f64::from(s.min))
    }

    /// Maximum elevation of the tile, or `NaN` if invalid.
    pub fn max_elevation(&self) -> f64 {
        self.stats().map_or(f64::NAN, |s| f64::from(s.max))
    }

    /// Average elevation of the tile, or `NaN` if invalid.
    pub fn avg_elevation(&self) -> f64 {
        self.stats().map_or(f64::NAN, |s| s.avg)
    }

    /// Returns the tile footprint.
    pub fn bounds(&self) -> Option<TileBounds> {
        self.data().map(|d| d.info.bounds)
    }

    /// Returns the elevation statistics.
    pub fn stats(&self) -> Option<TileStats> {
        self.data().map(|d| d.info.stats)
    }

    /// Returns the number of rows and columns.
    pub fn grid_size(&self) -> Option<GridSize> {
        self.data().map(|d| d.info.grid_size)
    }

    /// Returns the spacing between samples.
    pub fn cell_size(&self) -> Option<CellSize> {
        self.data().map(|d| d.cell_size)
    }

    /// Get the stored sample at a row/column index.
    ///
    /// # Arguments
    ///
    /// * `row` - Row index (0 = south edge)
    /// * `col` - Column index (0 = west edge)
    pub fn sample(&self, row: usize, col: usize) -> Option<i16> {
        let data = self.data()?;
        let grid = data.info.grid_size;
        if row >= grid.rows() || col >= grid.cols() {
            return None;
        }
        Some(data.at(row, col))
    }

    /// Coordinate `(lat, lon)` of the grid node at a row/column index.
    ///
    /// The first and last nodes of each axis land exactly on the bounds.
    pub fn node_coordinate(&self, row: usize, col: usize) -> Option<(f64, f64)> {
        let data = self.data()?;
        let grid = data.info.grid_size;
        if row >= grid.rows() || col >= grid.cols() {
            return None;
        }
        let b = data.info.bounds;
        Some((
            node_position(b.sw_lat, b.ne_lat, row, grid.rows()),
            node_position(b.sw_lon, b.ne_lon, col, grid.cols()),
        ))
    }

    fn data(&self) -> Option<&TileData> {
        match &self.state {
            TileState::Valid(data) => Some(data),
            TileState::Invalid => None,
        }
    }
}

impl TileData {
    fn at(&self, row: usize, col: usize) -> i16 {
        self.samples[row * self.info.grid_size.cols() + col]
    }

    fn elevation(&self, lat: f64, lon: f64) -> f64 {
        let bounds = self.info.bounds;
        if !bounds.contains(lat, lon) {
            trace!(lat, lon, "Coordinate outside terrain tile");
            return f64::NAN;
        }

        let grid = self.info.grid_size;
        let (row0, row_weight) = grid_position(lat - bounds.sw_lat, self.cell_size.lat, grid.rows());
        let (col0, col_weight) = grid_position(lon - bounds.sw_lon, self.cell_size.lon, grid.cols());
        let row1 = (row0 + 1).min(grid.rows() - 1);
        let col1 = (col0 + 1).min(grid.cols() - 1);

        let sw = f64::from(self.at(row0, col0));
        let se = f64::from(self.at(row0, col1));
        let nw = f64::from(self.at(row1, col0));
        let ne = f64::from(self.at(row1, col1));

        // Weights of exactly 0 or 1 reproduce the corner samples exactly
        let south = sw + (se - sw) * col_weight;
        let north = nw + (ne - nw) * col_weight;
        south + (north - south) * row_weight
    }
}

/// Sample spacing along one axis, `NaN` when the axis has a single sample.
fn spacing(span: f64, count: usize) -> f64 {
    if count < 2 {
        f64::NAN
    } else {
        span / (count - 1) as f64
    }
}

/// Locate `offset` degrees from the southwest edge on an axis of `count`
/// samples.
///
/// Returns the lower index of the enclosing cell and the weight of the upper
/// index. The lower index is clamped so the upper one stays in the grid, which
/// maps the far edge onto the last cell with weight 1.
fn grid_position(offset: f64, cell: f64, count: usize) -> (usize, f64) {
    if count < 2 {
        return (0, 0.0);
    }

    let mut position = offset / cell;
    let nearest = position.round();
    if (position - nearest).abs() <= NODE_SNAP_TOLERANCE {
        position = nearest;
    }

    let index = (position.floor().max(0.0) as usize).min(count - 2);
    let weight = (position - index as f64).clamp(0.0, 1.0);
    (index, weight)
}

/// Position of node `index` on an axis of `count` samples between `start`
/// and `end`.
fn node_position(start: f64, end: f64, index: usize, count: usize) -> f64 {
    if index == 0 {
        start
    } else if index + 1 == count {
        end
    } else {
        start + (end - start) * (index as f64 / (count - 1) as f64)
    }
}
