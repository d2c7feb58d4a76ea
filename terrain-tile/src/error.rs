//! Error types for the terrain tile library.

use thiserror::Error;

/// Reasons a payload is rejected while transcoding or decoding a tile.
///
/// The fail-soft entry points ([`crate::serialize_from_airmap_json`] and
/// [`crate::TerrainTile::from_bytes`]) never return these; they log them and
/// hand back an empty encoding or an invalid tile instead. The `try_*`
/// variants expose them to callers that want the reason.
#[derive(Error, Debug)]
pub enum TileError {
    /// IO error when reading a stored tile.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The vendor payload is not JSON of the expected shape.
    #[error("Malformed elevation JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The vendor reported something other than success.
    #[error("Elevation request was not successful: status={status:?}")]
    Status { status: String },

    /// A required key is absent from the vendor payload.
    #[error("Missing required field: {field}")]
    MissingField { field: &'static str },

    /// The carpet has no rows, or its first row has no samples.
    #[error("Elevation carpet is empty")]
    EmptyCarpet,

    /// A carpet row does not have as many samples as the first row.
    #[error("Carpet row {row} has {found} samples (expected {expected})")]
    RaggedCarpet {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// An elevation value does not fit a signed 16-bit meter value.
    #[error("Elevation value {value} for {field} is outside the 16-bit range")]
    ValueOutOfRange { field: &'static str, value: f64 },

    /// The carpet has more rows or columns than the encoding can describe.
    #[error("Grid of {rows}x{cols} samples exceeds the encodable size")]
    GridTooLarge { rows: usize, cols: usize },

    /// Bounds are not finite or are not ordered southwest to northeast.
    #[error("Invalid bounds: sw=({sw_lat}, {sw_lon}) ne=({ne_lat}, {ne_lon})")]
    InvalidBounds {
        sw_lat: f64,
        sw_lon: f64,
        ne_lat: f64,
        ne_lon: f64,
    },

    /// Statistics do not satisfy `min <= avg <= max`.
    #[error("Invalid statistics: min={min} avg={avg} max={max}")]
    InvalidStats { min: i16, max: i16, avg: f64 },

    /// The header declares a non-positive grid dimension.
    #[error("Invalid grid size: {lat}x{lon}")]
    InvalidGridSize { lat: i16, lon: i16 },

    /// The payload is shorter than the fixed header.
    #[error("Payload of {size} bytes is shorter than the {expected}-byte header")]
    Truncated { size: usize, expected: usize },

    /// The payload length does not match the grid declared in its header.
    #[error("Payload is {size} bytes (expected {expected} for the declared grid)")]
    LengthMismatch { size: usize, expected: usize },
}

/// Result type alias using [`TileError`].
pub type Result<T> = std::result::Result<T, TileError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TileError::Status {
            status: "fail".to_string(),
        };
        assert!(err.to_string().contains("fail"));

        let err = TileError::RaggedCarpet {
            row: 1,
            expected: 3,
            found: 2,
        };
        let msg = err.to_string();
        assert!(msg.contains("row 1"));
        assert!(msg.contains("expected 3"));

        let err = TileError::LengthMismatch {
            size: 60,
            expected: 66,
        };
        assert!(err.to_string().contains("66"));

        let err = TileError::MissingField { field: "carpet" };
        assert!(err.to_string().contains("carpet"));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: TileError = json_err.into();
        assert!(matches!(err, TileError::Json(_)));
    }
}
