use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

/// Terrain tile transcoding and elevation query tool
#[derive(Parser)]
#[command(name = "terrain-tile")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory that relative tile, JSON and output paths are resolved against
    #[arg(short, long, env = "TERRAIN_TILE_DATA_DIR", global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert an AirMap elevation response into a stored tile
    Transcode {
        /// AirMap JSON response file
        input: PathBuf,

        /// Output tile file (defaults to the input with a .tile extension)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Display information about a stored tile
    Info {
        /// Path to the tile file
        tile: PathBuf,

        /// Output result as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Query elevation for a single coordinate
    Query {
        /// Path to the tile file
        tile: PathBuf,

        /// Latitude in decimal degrees
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        /// Longitude in decimal degrees
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,

        /// Output result as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Add elevations to a CSV file of coordinates
    Batch {
        /// Path to the tile file
        tile: PathBuf,

        /// Input CSV file
        input: PathBuf,

        /// Output file (defaults to <input>_elevation.csv)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Column name for latitude
        #[arg(long, default_value = "lat")]
        lat_col: String,

        /// Column name for longitude
        #[arg(long, default_value = "lon")]
        lon_col: String,
    },
}

fn main() -> Result<()> {
    // Logs go to stderr so command output stays machine readable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "terrain_tile=warn,terrain_tile_cli=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Transcode { input, output } => commands::transcode::run(cli.data_dir, input, output),
        Commands::Info { tile, json } => commands::info::run(cli.data_dir, tile, json),
        Commands::Query {
            tile,
            lat,
            lon,
            json,
        } => commands::query::run(cli.data_dir, tile, lat, lon, json),
        Commands::Batch {
            tile,
            input,
            output,
            lat_col,
            lon_col,
        } => commands::batch::run(cli.data_dir, tile, input, output, lat_col, lon_col),
    }
}
