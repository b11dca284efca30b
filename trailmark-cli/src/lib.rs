//! Command-line interface for Trailmark's coordinate and share code tools.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};
use serde::Serialize;
use std::io::Write;

mod callout;
mod error;
mod grid;
mod measure;
mod share;

pub use error::CliError;

use callout::{CalloutDecodeArgs, CalloutEncodeArgs};
use grid::{GridLocateArgs, GridReferenceArgs};
use measure::{MeasureArgs, ProjectArgs};
use share::{ShareDecodeArgs, ShareEncodeArgs};

const ARG_ORIGIN_LAT: &str = "origin-lat";
const ARG_ORIGIN_LNG: &str = "origin-lng";
const ARG_ORIGIN_EASTING: &str = "origin-easting";
const ARG_ORIGIN_NORTHING: &str = "origin-northing";
const ARG_GRID_PRECISION: &str = "precision";
const ARG_GRID_EASTING: &str = "easting";
const ARG_GRID_NORTHING: &str = "northing";
const ARG_GRID_POINT: &str = "point";
const ARG_CALLOUT_POINT: &str = "point";
const ARG_CALLOUT_PRECISION: &str = "precision";
const ARG_SHARE_ROUTE: &str = "route";

const ENV_LOCATE_ORIGIN_LAT: &str = "TRAILMARK_CMDS_GRID_LOCATE_ORIGIN_LAT";
const ENV_LOCATE_ORIGIN_LNG: &str = "TRAILMARK_CMDS_GRID_LOCATE_ORIGIN_LNG";
const ENV_LOCATE_ORIGIN_EASTING: &str = "TRAILMARK_CMDS_GRID_LOCATE_ORIGIN_EASTING";
const ENV_LOCATE_ORIGIN_NORTHING: &str = "TRAILMARK_CMDS_GRID_LOCATE_ORIGIN_NORTHING";
const ENV_LOCATE_EASTING: &str = "TRAILMARK_CMDS_GRID_LOCATE_EASTING";
const ENV_LOCATE_NORTHING: &str = "TRAILMARK_CMDS_GRID_LOCATE_NORTHING";
const ENV_REFERENCE_ORIGIN_LAT: &str = "TRAILMARK_CMDS_GRID_REFERENCE_ORIGIN_LAT";
const ENV_REFERENCE_ORIGIN_LNG: &str = "TRAILMARK_CMDS_GRID_REFERENCE_ORIGIN_LNG";
const ENV_REFERENCE_ORIGIN_EASTING: &str = "TRAILMARK_CMDS_GRID_REFERENCE_ORIGIN_EASTING";
const ENV_REFERENCE_ORIGIN_NORTHING: &str = "TRAILMARK_CMDS_GRID_REFERENCE_ORIGIN_NORTHING";
const ENV_REFERENCE_POINT: &str = "TRAILMARK_CMDS_GRID_REFERENCE_POINT";
const ENV_CALLOUT_POINT: &str = "TRAILMARK_CMDS_CALLOUT_ENCODE_POINT";
const ENV_SHARE_ROUTE: &str = "TRAILMARK_CMDS_SHARE_ENCODE_ROUTE";

/// Run the Trailmark CLI with the current process arguments and environment.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    let mut stdout = std::io::stdout().lock();
    run_command(cli.command, &mut stdout)
}

fn run_command(command: Command, writer: &mut dyn Write) -> Result<(), CliError> {
    match command {
        Command::Measure(args) => measure::run_measure_with(&args, writer),
        Command::Project(args) => measure::run_project_with(&args, writer),
        Command::GridLocate(args) => grid::run_locate_with(args.into_config()?, writer),
        Command::GridReference(args) => grid::run_reference_with(args.into_config()?, writer),
        Command::CalloutEncode(args) => callout::run_encode_with(args.into_config()?, writer),
        Command::CalloutDecode(args) => callout::run_decode_with(&args, writer),
        Command::ShareEncode(args) => share::run_encode_with(args.into_config()?, writer),
        Command::ShareDecode(args) => share::run_decode_with(&args, writer),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "trailmark",
    about = "Coordinate, grid reference and route share code utilities",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Bearing and distance between two positions.
    Measure(MeasureArgs),
    /// Project a position along a bearing.
    Project(ProjectArgs),
    /// Resolve a grid reference to a position.
    GridLocate(GridLocateArgs),
    /// Compute the grid reference of a position.
    GridReference(GridReferenceArgs),
    /// Encode a position as a location code.
    CalloutEncode(CalloutEncodeArgs),
    /// Decode a location code to its cell centre and bounds.
    CalloutDecode(CalloutDecodeArgs),
    /// Encode a route state file as a share code.
    ShareEncode(ShareEncodeArgs),
    /// Decode a share code to a route snapshot.
    ShareDecode(ShareDecodeArgs),
}

/// Write `value` as pretty JSON followed by a newline.
fn write_json(writer: &mut dyn Write, value: &impl Serialize) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(value).map_err(CliError::SerialiseOutput)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}

#[cfg(test)]
mod tests;
