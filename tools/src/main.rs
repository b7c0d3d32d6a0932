use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use mvtile_tools::{dump_tile, format_dump_pretty, format_report_pretty, inspect_tile};

#[derive(Parser)]
#[command(
    name = "mvtile-tools",
    version,
    about = "vector tile inspection and decoding tools"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Summarize tile structure and sizes.
    Inspect {
        /// Path to the encoded tile.
        tile_path: PathBuf,
    },
    /// Decode layers, properties and geometry into structured output.
    Decode {
        /// Path to the encoded tile.
        tile_path: PathBuf,
        /// Scale applied to geometry coordinates.
        #[arg(long, default_value_t = 1.0)]
        scale: f32,
        /// Output format.
        #[arg(long, value_enum, default_value_t = DecodeFormat::Json)]
        format: DecodeFormat,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum DecodeFormat {
    Json,
    Pretty,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Inspect { tile_path } => {
            let bytes = fs::read(&tile_path)
                .with_context(|| format!("read tile {}", tile_path.display()))?;
            let report = inspect_tile(&bytes)?;
            print!("{}", format_report_pretty(&report));
        }
        Command::Decode {
            tile_path,
            scale,
            format,
        } => {
            let bytes = fs::read(&tile_path)
                .with_context(|| format!("read tile {}", tile_path.display()))?;
            let dump = dump_tile(&bytes, scale)?;
            match format {
                DecodeFormat::Json => {
                    let json = serde_json::to_string_pretty(&dump).context("serialize json")?;
                    println!("{json}");
                }
                DecodeFormat::Pretty => {
                    print!("{}", format_dump_pretty(&dump));
                }
            }
        }
    }
    Ok(())
}
