//! # Terrain Tile - Compact Elevation Tiles
//!
//! Library for turning elevation responses from the AirMap elevation API into
//! a compact binary tile, and for answering point elevation queries against
//! such a tile by bilinear interpolation.
//!
//! ## Features
//!
//! - **Compact**: A fixed 48-byte header followed by one flat `i16` grid
//! - **Fail-soft**: Malformed input yields an empty encoding or an invalid
//!   tile, and queries against it return `NaN`
//! - **Exact on nodes**: Queries on a grid node return the stored sample
//! - **Immutable**: Tiles are `Send + Sync` and can be shared without locking
//!
//! ## Quick Start
//!
//! ```ignore
//! use terrain_tile::{serialize_from_airmap_json, TerrainTile};
//!
//! // Slow path: transcode the vendor response once and store the result
//! let bytes = serialize_from_airmap_json(&response_body);
//! if bytes.is_empty() {
//!     // no tile available here
//! }
//!
//! // Fast path: decode the stored encoding
//! let tile = TerrainTile::from_bytes(&bytes);
//! let elevation = tile.elevation(47.005, 8.005);
//! if !elevation.is_nan() {
//!     println!("Elevation: {:.1}m", elevation);
//! }
//! ```
//!
//! ## Tile Geometry
//!
//! - Each tile nominally covers [`TILE_SIZE_DEGREES`] (0.01°) on each side
//! - Samples are nominally spaced [`TILE_VALUE_SPACING_DEGREES`] (1
//!   arc-second, ~30m) apart
//! - Rows run south to north and columns west to east, starting at the
//!   southwest corner
//!
//! Deciding which tile covers a coordinate, fetching tiles and caching them
//! are left to the caller.

pub mod airmap;
pub mod encoding;
pub mod error;
pub mod tile;

// Re-export main types at crate root for convenience
pub use airmap::{serialize_from_airmap_json, try_serialize_from_airmap_json};
pub use encoding::HEADER_SIZE;
pub use error::{Result, TileError};
pub use tile::{
    CellSize, GridSize, TerrainTile, TileBounds, TileStats, TILE_SIZE_DEGREES,
    TILE_VALUE_SPACING_DEGREES, TILE_VALUE_SPACING_METERS,
};
