//! `grid-locate` and `grid-reference` commands.
//!
//! Both resolve a grid origin session from layered configuration, so an
//! anchor can live in a config file or the environment while the target is
//! passed on the command line.

use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use std::io::Write;
use trailmark_core::{
    GridOrigin, GridPrecision, GridReference, Position, grid_to_lat_lng, lat_lng_to_grid_reference,
};

use crate::{
    ARG_GRID_EASTING, ARG_GRID_NORTHING, ARG_GRID_POINT, ARG_GRID_PRECISION, ARG_ORIGIN_EASTING,
    ARG_ORIGIN_LAT, ARG_ORIGIN_LNG, ARG_ORIGIN_NORTHING, CliError, ENV_LOCATE_EASTING,
    ENV_LOCATE_NORTHING, ENV_LOCATE_ORIGIN_EASTING, ENV_LOCATE_ORIGIN_LAT, ENV_LOCATE_ORIGIN_LNG,
    ENV_LOCATE_ORIGIN_NORTHING, ENV_REFERENCE_ORIGIN_EASTING, ENV_REFERENCE_ORIGIN_LAT,
    ENV_REFERENCE_ORIGIN_LNG, ENV_REFERENCE_ORIGIN_NORTHING, ENV_REFERENCE_POINT, write_json,
};

/// CLI arguments for the `grid-locate` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "grid-locate",
    long_about = "Resolve a local grid reference to a latitude and longitude. \
                 The grid origin can come from CLI flags, configuration \
                 files, or environment variables.",
    about = "Resolve a grid reference to a position"
)]
#[ortho_config(prefix = "TRAILMARK")]
pub(crate) struct GridLocateArgs {
    /// Latitude of the grid origin.
    #[arg(long = ARG_ORIGIN_LAT, value_name = "degrees", allow_hyphen_values = true)]
    #[serde(default)]
    pub(crate) origin_lat: Option<f64>,
    /// Longitude of the grid origin.
    #[arg(long = ARG_ORIGIN_LNG, value_name = "degrees", allow_hyphen_values = true)]
    #[serde(default)]
    pub(crate) origin_lng: Option<f64>,
    /// Easting digits of the grid origin.
    #[arg(long = ARG_ORIGIN_EASTING, value_name = "digits")]
    #[serde(default)]
    pub(crate) origin_easting: Option<String>,
    /// Northing digits of the grid origin.
    #[arg(long = ARG_ORIGIN_NORTHING, value_name = "digits")]
    #[serde(default)]
    pub(crate) origin_northing: Option<String>,
    /// Digits per axis: 3 for 100 m cells, 4 for 10 m cells.
    #[arg(long = ARG_GRID_PRECISION, value_name = "digits")]
    #[serde(default)]
    pub(crate) precision: Option<u8>,
    /// Easting digits of the reference to resolve.
    #[arg(long = ARG_GRID_EASTING, value_name = "digits")]
    #[serde(default)]
    pub(crate) easting: Option<String>,
    /// Northing digits of the reference to resolve.
    #[arg(long = ARG_GRID_NORTHING, value_name = "digits")]
    #[serde(default)]
    pub(crate) northing: Option<String>,
}

impl GridLocateArgs {
    pub(crate) fn into_config(self) -> Result<GridLocateConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        GridLocateConfig::try_from(merged)
    }
}

/// CLI arguments for the `grid-reference` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "grid-reference",
    long_about = "Compute the local grid reference of a position relative \
                 to a grid origin. The grid origin can come from CLI flags, \
                 configuration files, or environment variables.",
    about = "Compute the grid reference of a position"
)]
#[ortho_config(prefix = "TRAILMARK")]
pub(crate) struct GridReferenceArgs {
    /// Latitude of the grid origin.
    #[arg(long = ARG_ORIGIN_LAT, value_name = "degrees", allow_hyphen_values = true)]
    #[serde(default)]
    pub(crate) origin_lat: Option<f64>,
    /// Longitude of the grid origin.
    #[arg(long = ARG_ORIGIN_LNG, value_name = "degrees", allow_hyphen_values = true)]
    #[serde(default)]
    pub(crate) origin_lng: Option<f64>,
    /// Easting digits of the grid origin.
    #[arg(long = ARG_ORIGIN_EASTING, value_name = "digits")]
    #[serde(default)]
    pub(crate) origin_easting: Option<String>,
    /// Northing digits of the grid origin.
    #[arg(long = ARG_ORIGIN_NORTHING, value_name = "digits")]
    #[serde(default)]
    pub(crate) origin_northing: Option<String>,
    /// Digits per axis: 3 for 100 m cells, 4 for 10 m cells.
    #[arg(long = ARG_GRID_PRECISION, value_name = "digits")]
    #[serde(default)]
    pub(crate) precision: Option<u8>,
    /// Position to reference, as `lat,lng`.
    #[arg(long = ARG_GRID_POINT, value_name = "lat,lng", allow_hyphen_values = true)]
    #[serde(default)]
    pub(crate) point: Option<Position>,
}

impl GridReferenceArgs {
    pub(crate) fn into_config(self) -> Result<GridReferenceConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        GridReferenceConfig::try_from(merged)
    }
}

/// Environment variable names reported when an origin field is missing.
struct OriginEnv {
    lat: &'static str,
    lng: &'static str,
    easting: &'static str,
    northing: &'static str,
}

/// Origin fields as they arrive from configuration, before validation.
struct OriginFields {
    lat: Option<f64>,
    lng: Option<f64>,
    easting: Option<String>,
    northing: Option<String>,
    precision: Option<u8>,
}

impl OriginFields {
    /// Build the session origin; its reference carries the resolved precision.
    fn into_origin(self, env: &OriginEnv) -> Result<GridOrigin, CliError> {
        let lat = self.lat.ok_or(CliError::MissingArgument {
            field: ARG_ORIGIN_LAT,
            env: env.lat,
        })?;
        let lng = self.lng.ok_or(CliError::MissingArgument {
            field: ARG_ORIGIN_LNG,
            env: env.lng,
        })?;
        let easting = self.easting.ok_or(CliError::MissingArgument {
            field: ARG_ORIGIN_EASTING,
            env: env.easting,
        })?;
        let northing = self.northing.ok_or(CliError::MissingArgument {
            field: ARG_ORIGIN_NORTHING,
            env: env.northing,
        })?;
        let precision = GridPrecision::resolve(self.precision, None)?;
        Ok(GridOrigin::new(
            Position::new(lat, lng)?,
            GridReference::new(easting, northing, Some(precision)),
        ))
    }
}

/// Resolved `grid-locate` configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct GridLocateConfig {
    pub(crate) origin: GridOrigin,
    pub(crate) target: GridReference,
}

impl TryFrom<GridLocateArgs> for GridLocateConfig {
    type Error = CliError;

    fn try_from(args: GridLocateArgs) -> Result<Self, Self::Error> {
        let easting = args.easting.ok_or(CliError::MissingArgument {
            field: ARG_GRID_EASTING,
            env: ENV_LOCATE_EASTING,
        })?;
        let northing = args.northing.ok_or(CliError::MissingArgument {
            field: ARG_GRID_NORTHING,
            env: ENV_LOCATE_NORTHING,
        })?;
        let origin = OriginFields {
            lat: args.origin_lat,
            lng: args.origin_lng,
            easting: args.origin_easting,
            northing: args.origin_northing,
            precision: args.precision,
        }
        .into_origin(&OriginEnv {
            lat: ENV_LOCATE_ORIGIN_LAT,
            lng: ENV_LOCATE_ORIGIN_LNG,
            easting: ENV_LOCATE_ORIGIN_EASTING,
            northing: ENV_LOCATE_ORIGIN_NORTHING,
        })?;
        Ok(Self {
            origin,
            target: GridReference::new(easting, northing, None),
        })
    }
}

/// Resolved `grid-reference` configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct GridReferenceConfig {
    pub(crate) origin: GridOrigin,
    pub(crate) point: Position,
}

impl TryFrom<GridReferenceArgs> for GridReferenceConfig {
    type Error = CliError;

    fn try_from(args: GridReferenceArgs) -> Result<Self, Self::Error> {
        let point = args.point.ok_or(CliError::MissingArgument {
            field: ARG_GRID_POINT,
            env: ENV_REFERENCE_POINT,
        })?;
        let origin = OriginFields {
            lat: args.origin_lat,
            lng: args.origin_lng,
            easting: args.origin_easting,
            northing: args.origin_northing,
            precision: args.precision,
        }
        .into_origin(&OriginEnv {
            lat: ENV_REFERENCE_ORIGIN_LAT,
            lng: ENV_REFERENCE_ORIGIN_LNG,
            easting: ENV_REFERENCE_ORIGIN_EASTING,
            northing: ENV_REFERENCE_ORIGIN_NORTHING,
        })?;
        Ok(Self { origin, point })
    }
}

pub(super) fn run_locate_with(
    config: GridLocateConfig,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let position = grid_to_lat_lng(Some(&config.origin), &config.target, None)?;
    write_json(writer, &position)
}

pub(super) fn run_reference_with(
    config: GridReferenceConfig,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let reference = lat_lng_to_grid_reference(Some(&config.origin), Some(config.point), None)?;
    write_json(writer, &reference)
}
