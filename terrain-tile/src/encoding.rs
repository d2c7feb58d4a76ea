//! Internal binary encoding of a terrain tile.
//!
//! A tile is stored as a fixed 48-byte header followed by the elevation grid.
//! All fields are little-endian and packed without padding:
//!
//! | Offset | Field | Type |
//! |--------|-------|------|
//! | 0 | sw_lat | `f64` |
//! | 8 | sw_lon | `f64` |
//! | 16 | ne_lat | `f64` |
//! | 24 | ne_lon | `f64` |
//! | 32 | min_elevation | `i16` |
//! | 34 | max_elevation | `i16` |
//! | 36 | avg_elevation | `f64` |
//! | 44 | grid_size_lat | `i16` |
//! | 46 | grid_size_lon | `i16` |
//! | 48 | samples | `i16` × lat × lon |
//!
//! Samples are row-major: rows run south to north, columns west to east.

use crate::error::{Result, TileError};
use crate::tile::{GridSize, TileBounds, TileStats};

/// Size of the fixed header in bytes.
pub const HEADER_SIZE: usize = 48;

/// Size of one elevation sample in bytes.
const SAMPLE_SIZE: usize = 2;

const SW_LAT_OFFSET: usize = 0;
const SW_LON_OFFSET: usize = 8;
const NE_LAT_OFFSET: usize = 16;
const NE_LON_OFFSET: usize = 24;
const MIN_OFFSET: usize = 32;
const MAX_OFFSET: usize = 34;
const AVG_OFFSET: usize = 36;
const GRID_LAT_OFFSET: usize = 44;
const GRID_LON_OFFSET: usize = 46;

/// Header block of a tile: everything except the samples.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct TileInfo {
    pub bounds: TileBounds,
    pub stats: TileStats,
    pub grid_size: GridSize,
}

impl TileInfo {
    /// Check the header against the tile invariants.
    ///
    /// The grid size is checked first since the payload length depends on it.
    pub fn validate(&self) -> Result<()> {
        let GridSize { lat, lon } = self.grid_size;
        if lat <= 0 || lon <= 0 {
            return Err(TileError::InvalidGridSize { lat, lon });
        }

        let b = self.bounds;
        let finite = [b.sw_lat, b.sw_lon, b.ne_lat, b.ne_lon]
            .iter()
            .all(|v| v.is_finite());
        if !finite || b.sw_lat >= b.ne_lat || b.sw_lon >= b.ne_lon {
            return Err(TileError::InvalidBounds {
                sw_lat: b.sw_lat,
                sw_lon: b.sw_lon,
                ne_lat: b.ne_lat,
                ne_lon: b.ne_lon,
            });
        }

        let TileStats { min, max, avg } = self.stats;
        if !avg.is_finite() || f64::from(min) > avg || avg > f64::from(max) {
            return Err(TileError::InvalidStats { min, max, avg });
        }

        Ok(())
    }

    /// Total encoded length for this header's grid.
    pub fn encoded_len(&self) -> usize {
        HEADER_SIZE + self.grid_size.len() * SAMPLE_SIZE
    }
}

/// Encode a header and its samples.
///
/// `samples` must hold exactly `grid_size.len()` values; callers guarantee it.
pub(crate) fn encode(info: &TileInfo, samples: &[i16]) -> Vec<u8> {
    debug_assert_eq!(samples.len(), info.grid_size.len());

    let mut out = Vec::with_capacity(info.encoded_len());
    out.extend_from_slice(&info.bounds.sw_lat.to_le_bytes());
    out.extend_from_slice(&info.bounds.sw_lon.to_le_bytes());
    out.extend_from_slice(&info.bounds.ne_lat.to_le_bytes());
    out.extend_from_slice(&info.bounds.ne_lon.to_le_bytes());
    out.extend_from_slice(&info.stats.min.to_le_bytes());
    out.extend_from_slice(&info.stats.max.to_le_bytes());
    out.extend_from_slice(&info.stats.avg.to_le_bytes());
    out.extend_from_slice(&info.grid_size.lat.to_le_bytes());
    out.extend_from_slice(&info.grid_size.lon.to_le_bytes());
    for sample in samples {
        out.extend_from_slice(&sample.to_le_bytes());
    }
    out
}

/// Decode a full payload into its header and samples.
///
/// The payload must be exactly the header plus `lat × lon` samples and the
/// header must satisfy [`TileInfo::validate`].
pub(crate) fn decode(bytes: &[u8]) -> Result<(TileInfo, Vec<i16>)> {
    if bytes.len() < HEADER_SIZE {
        return Err(TileError::Truncated {
            size: bytes.len(),
            expected: HEADER_SIZE,
        });
    }

    let info = TileInfo {
        bounds: TileBounds {
            sw_lat: read_f64(bytes, SW_LAT_OFFSET),
            sw_lon: read_f64(bytes, SW_LON_OFFSET),
            ne_lat: read_f64(bytes, NE_LAT_OFFSET),
            ne_lon: read_f64(bytes, NE_LON_OFFSET),
        },
        stats: TileStats {
            min: read_i16(bytes, MIN_OFFSET),
            max: read_i16(bytes, MAX_OFFSET),
            avg: read_f64(bytes, AVG_OFFSET),
        },
        grid_size: GridSize {
            lat: read_i16(bytes, GRID_LAT_OFFSET),
            lon: read_i16(bytes, GRID_LON_OFFSET),
        },
    };

    // Length only makes sense once the grid size is known to be positive
    let GridSize { lat, lon } = info.grid_size;
    if lat <= 0 || lon <= 0 {
        return Err(TileError::InvalidGridSize { lat, lon });
    }
    let expected = info.encoded_len();
    if bytes.len() != expected {
        return Err(TileError::LengthMismatch {
            size: bytes.len(),
            expected,
        });
    }
    info.validate()?;

    let samples = bytes[HEADER_SIZE..]
        .chunks_exact(SAMPLE_SIZE)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
        .collect();

    Ok((info, samples))
}

/// Read a little-endian `f64` at `offset`. The caller has checked the length.
fn read_f64(bytes: &[u8], offset: usize) -> f64 {
    let mut buf = [0u8; 8];
    buf.copy_from_slice(&bytes[offset..offset + 8]);
    f64::from_le_bytes(buf)
}

/// Read a little-endian `i16` at `offset`. The caller has checked the length.
fn read_i16(bytes: &[u8], offset: usize) -> i16 {
    i16::from_le_bytes([bytes[offset], bytes[offset + 1]])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_info(lat: i16, lon: i16) -> TileInfo {
        TileInfo {
            bounds: TileBounds::new(47.0, 8.0, 47.01, 8.01),
            stats: TileStats {
                min: -5,
                max: 120,
                avg: 40.5,
            },
            grid_size: GridSize { lat, lon },
        }
    }

    #[test]
    fn test_header_layout() {
        let info = sample_info(2, 3);
        let bytes = encode(&info, &[1, 2, 3, 4, 5, 6]);

        assert_eq!(bytes.len(), HEADER_SIZE + 6 * 2);
        assert_eq!(&bytes[0..8], &47.0f64.to_le_bytes());
        assert_eq!(&bytes[24..32], &8.01f64.to_le_bytes());
        assert_eq!(&bytes[32..34], &(-5i16).to_le_bytes());
        assert_eq!(&bytes[34..36], &120i16.to_le_bytes());
        assert_eq!(&bytes[36..44], &40.5f64.to_le_bytes());
        assert_eq!(&bytes[44..46], &2i16.to_le_bytes());
        assert_eq!(&bytes[46..48], &3i16.to_le_bytes());
        // First and last sample
        assert_eq!(&bytes[48..50], &1i16.to_le_bytes());
        assert_eq!(&bytes[58..60], &6i16.to_le_bytes());
    }

    #[test]
    fn test_decode_encoded_payload() {
        let info = sample_info(2, 2);
        let bytes = encode(&info, &[10, -20, 30, -40]);

        let (decoded, samples) = decode(&bytes).unwrap();
        assert_eq!(decoded, info);
        assert_eq!(samples, vec![10, -20, 30, -40]);
    }

    #[test]
    fn test_decode_short_header() {
        let result = decode(&[0u8; HEADER_SIZE - 1]);
        assert!(matches!(
            result,
            Err(TileError::Truncated { size: 47, expected: HEADER_SIZE })
        ));
    }

    #[test]
    fn test_decode_length_mismatch() {
        let info = sample_info(3, 3);
        let mut bytes = encode(&info, &[0; 9]);

        bytes.pop();
        assert!(matches!(
            decode(&bytes),
            Err(TileError::LengthMismatch { .. })
        ));

        bytes.extend_from_slice(&[0, 0, 0]);
        assert!(matches!(
            decode(&bytes),
            Err(TileError::LengthMismatch { .. })
        ));
    }

    #[test]
    fn test_decode_rejects_non_positive_grid() {
        let bytes = encode(&sample_info(0, 3), &[]);
        assert!(matches!(
            decode(&bytes),
            Err(TileError::InvalidGridSize { lat: 0, lon: 3 })
        ));

        let mut bytes = encode(&sample_info(1, 1), &[0]);
        bytes[46..48].copy_from_slice(&(-1i16).to_le_bytes());
        assert!(matches!(
            decode(&bytes),
            Err(TileError::InvalidGridSize { .. })
        ));
    }

    #[test]
    fn test_validate_bounds_order() {
        let mut info = sample_info(2, 2);
        info.bounds = TileBounds::new(47.01, 8.0, 47.0, 8.01);
        assert!(matches!(
            info.validate(),
            Err(TileError::InvalidBounds { .. })
        ));

        info.bounds = TileBounds::new(47.0, f64::NAN, 47.01, 8.01);
        assert!(matches!(
            info.validate(),
            Err(TileError::InvalidBounds { .. })
        ));
    }

    #[test]
    fn test_validate_stats_order() {
        let mut info = sample_info(2, 2);
        info.stats = TileStats {
            min: 10,
            max: 20,
            avg: 25.0,
        };
        assert!(matches!(info.validate(), Err(TileError::InvalidStats { .. })));

        info.stats.avg = f64::NAN;
        assert!(matches!(info.validate(), Err(TileError::InvalidStats { .. })));

        info.stats.avg = 20.0;
        assert!(info.validate().is_ok());
    }
}
