//! `measure` and `project` commands: great-circle math on explicit inputs.

use clap::Args;
use serde::Serialize;
use std::io::Write;
use trailmark_core::{Position, destination_point, relative_bearing};

use crate::{CliError, write_json};

/// CLI arguments for the `measure` subcommand.
#[derive(Debug, Clone, Args)]
pub(crate) struct MeasureArgs {
    /// Starting position as `lat,lng`.
    #[arg(long, value_name = "lat,lng", allow_hyphen_values = true)]
    pub(crate) from: Position,
    /// Target position as `lat,lng`.
    #[arg(long, value_name = "lat,lng", allow_hyphen_values = true)]
    pub(crate) to: Position,
    /// Current heading in degrees; adds the bearing relative to it.
    #[arg(long, value_name = "degrees", allow_hyphen_values = true)]
    pub(crate) heading: Option<f64>,
}

/// CLI arguments for the `project` subcommand.
#[derive(Debug, Clone, Args)]
pub(crate) struct ProjectArgs {
    /// Starting position as `lat,lng`.
    #[arg(long, value_name = "lat,lng", allow_hyphen_values = true)]
    pub(crate) from: Position,
    /// Initial bearing in degrees clockwise from north.
    #[arg(long, value_name = "degrees", allow_hyphen_values = true)]
    pub(crate) bearing: f64,
    /// Distance to travel in metres.
    #[arg(long, value_name = "meters")]
    pub(crate) distance: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Measurement {
    pub(crate) from: Position,
    pub(crate) to: Position,
    pub(crate) bearing_degrees: f64,
    pub(crate) distance_meters: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) relative_bearing_degrees: Option<f64>,
}

pub(crate) fn measure(args: &MeasureArgs) -> Measurement {
    let bearing = args.from.bearing_to(&args.to);
    Measurement {
        from: args.from,
        to: args.to,
        bearing_degrees: bearing,
        distance_meters: args.from.distance_to(&args.to),
        relative_bearing_degrees: relative_bearing(args.heading, Some(bearing)),
    }
}

pub(super) fn run_measure_with(args: &MeasureArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    write_json(writer, &measure(args))
}

pub(super) fn run_project_with(args: &ProjectArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let destination = destination_point(Some(args.from), args.bearing, args.distance)?;
    write_json(writer, &destination)
}
