//! AirMap elevation API transcoding.
//!
//! Converts the JSON returned by the AirMap elevation "carpet" endpoint into
//! the internal tile encoding (see [`crate::encoding`]).
//!
//! # Input Format
//!
//! ```text
//! { "status": "success",
//!   "data": { "bounds": {"sw": {"lat": .., "lon": ..}, "ne": {"lat": .., "lon": ..}},
//!             "stats": {"max": .., "min": .., "avg": ..},
//!             "carpet": [[row0col0, row0col1, ...], [row1col0, ...], ...] } }
//! ```
//!
//! The carpet holds one row per latitude, south to north, with columns running
//! west to east. Elevations are meters; fractional samples are rounded to the
//! nearest meter, `stats.min` is floored and `stats.max` is ceiled, and values
//! outside the `i16` range are rejected.

use serde::Deserialize;
use tracing::{debug, warn};

use crate::encoding::{self, TileInfo};
use crate::error::{Result, TileError};
use crate::tile::{GridSize, TileBounds, TileStats};

/// Status value reported by a successful request.
const SUCCESS_STATUS: &str = "success";

#[derive(Debug, Deserialize)]
struct ElevationResponse {
    status: Option<String>,
    data: Option<ElevationData>,
}

#[derive(Debug, Deserialize)]
struct ElevationData {
    bounds: Option<Bounds>,
    stats: Option<Stats>,
    carpet: Option<Vec<Vec<f64>>>,
}

#[derive(Debug, Deserialize)]
struct Bounds {
    sw: Option<LatLon>,
    ne: Option<LatLon>,
}

#[derive(Debug, Deserialize)]
struct LatLon {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct Stats {
    min: f64,
    max: f64,
    avg: f64,
}

/// Transcode an AirMap elevation response into the internal tile encoding.
///
/// Malformed input does not fail: it yields an empty vector, which callers
/// treat as "no tile available here". The reason is logged at `warn` level.
///
/// # Example
///
/// ```
/// use terrain_tile::{serialize_from_airmap_json, TerrainTile};
///
/// let json = br#"{"status": "success", "data": {
///     "bounds": {"sw": {"lat": 47.0, "lon": 8.0}, "ne": {"lat": 47.01, "lon": 8.01}},
///     "stats": {"min": 100, "max": 100, "avg": 100.0},
///     "carpet": [[100, 100], [100, 100]]}}"#;
///
/// let bytes = serialize_from_airmap_json(json);
/// let tile = TerrainTile::from_bytes(&bytes);
/// assert_eq!(tile.elevation(47.005, 8.005), 100.0);
///
/// assert!(serialize_from_airmap_json(b"{}").is_empty());
/// ```
pub fn serialize_from_airmap_json(json: &[u8]) -> Vec<u8> {
    match try_serialize_from_airmap_json(json) {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!(error = %e, "Rejected AirMap elevation response");
            Vec::new()
        }
    }
}

/// Transcode an AirMap elevation response, reporting why it was rejected.
///
/// # Errors
///
/// Returns an error if the payload is not JSON of the expected shape, the
/// status is not `"success"`, a required key is missing, the carpet is empty
/// or ragged, an elevation does not fit in 16 bits, or the bounds or
/// statistics are inconsistent.
pub fn try_serialize_from_airmap_json(json: &[u8]) -> Result<Vec<u8>> {
    let response: ElevationResponse = serde_json::from_slice(json)?;

    let status = response
        .status
        .ok_or(TileError::MissingField { field: "status" })?;
    if status != SUCCESS_STATUS {
        return Err(TileError::Status { status });
    }

    let data = response
        .data
        .ok_or(TileError::MissingField { field: "data" })?;
    let bounds = data
        .bounds
        .ok_or(TileError::MissingField { field: "bounds" })?;
    let sw = bounds.sw.ok_or(TileError::MissingField { field: "sw" })?;
    let ne = bounds.ne.ok_or(TileError::MissingField { field: "ne" })?;
    let stats = data
        .stats
        .ok_or(TileError::MissingField { field: "stats" })?;
    let carpet = data
        .carpet
        .ok_or(TileError::MissingField { field: "carpet" })?;

    let (grid_size, samples) = flatten_carpet(&carpet)?;

    let info = TileInfo {
        bounds: TileBounds::new(sw.lat, sw.lon, ne.lat, ne.lon),
        stats: TileStats {
            // Widen outwards so the whole-meter range still contains `avg`
            min: to_elevation("stats.min", stats.min.floor())?,
            max: to_elevation("stats.max", stats.max.ceil())?,
            avg: stats.avg,
        },
        grid_size,
    };
    info.validate()?;

    debug!(
        rows = grid_size.lat,
        cols = grid_size.lon,
        sw_lat = sw.lat,
        sw_lon = sw.lon,
        "Transcoded AirMap elevation response"
    );

    Ok(encoding::encode(&info, &samples))
}

/// Flatten the carpet into row-major samples.
///
/// The width of the first row fixes the column count for every row.
fn flatten_carpet(carpet: &[Vec<f64>]) -> Result<(GridSize, Vec<i16>)> {
    let rows = carpet.len();
    let cols = carpet.first().map_or(0, Vec::len);
    if rows == 0 || cols == 0 {
        return Err(TileError::EmptyCarpet);
    }

    let (lat, lon) = match (i16::try_from(rows), i16::try_from(cols)) {
        (Ok(lat), Ok(lon)) => (lat, lon),
        _ => return Err(TileError::GridTooLarge { rows, cols }),
    };

    let mut samples = Vec::with_capacity(rows * cols);
    for (row, values) in carpet.iter().enumerate() {
        if values.len() != cols {
            return Err(TileError::RaggedCarpet {
                row,
                expected: cols,
                found: values.len(),
            });
        }
        for &value in values {
            samples.push(to_elevation("carpet", value)?);
        }
    }

    Ok((GridSize { lat, lon }, samples))
}

/// Round an elevation to whole meters, rejecting values outside `i16`.
fn to_elevation(field: &'static str, value: f64) -> Result<i16> {
    let rounded = value.round();
    if !rounded.is_finite() || rounded < f64::from(i16::MIN) || rounded > f64::from(i16::MAX) {
        return Err(TileError::ValueOutOfRange { field, value });
    }
    Ok(rounded as i16)
}
