//! `callout-encode` and `callout-decode` commands for location codes.

use clap::{Args, Parser};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use std::io::Write;
use trailmark_core::{GeoError, Position, location_code};

use crate::{ARG_CALLOUT_POINT, ARG_CALLOUT_PRECISION, CliError, ENV_CALLOUT_POINT, write_json};

/// CLI arguments for the `callout-encode` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "callout-encode",
    long_about = "Encode a position as a location code suitable for reading \
                 aloud or pasting into chat. The default precision can be \
                 set in configuration files or environment variables.",
    about = "Encode a position as a location code"
)]
#[ortho_config(prefix = "TRAILMARK")]
pub(crate) struct CalloutEncodeArgs {
    /// Position to encode, as `lat,lng`.
    #[arg(long = ARG_CALLOUT_POINT, value_name = "lat,lng", allow_hyphen_values = true)]
    #[serde(default)]
    pub(crate) point: Option<Position>,
    /// Code length in characters (1 to 12).
    #[arg(long = ARG_CALLOUT_PRECISION, value_name = "chars")]
    #[serde(default)]
    pub(crate) precision: Option<usize>,
}

impl CalloutEncodeArgs {
    pub(crate) fn into_config(self) -> Result<CalloutEncodeConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        CalloutEncodeConfig::try_from(merged)
    }
}

/// Resolved `callout-encode` configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct CalloutEncodeConfig {
    pub(crate) point: Position,
    pub(crate) precision: usize,
}

impl TryFrom<CalloutEncodeArgs> for CalloutEncodeConfig {
    type Error = CliError;

    fn try_from(args: CalloutEncodeArgs) -> Result<Self, Self::Error> {
        let point = args.point.ok_or(CliError::MissingArgument {
            field: ARG_CALLOUT_POINT,
            env: ENV_CALLOUT_POINT,
        })?;
        Ok(Self {
            point,
            precision: args.precision.unwrap_or(location_code::DEFAULT_PRECISION),
        })
    }
}

/// CLI arguments for the `callout-decode` subcommand.
#[derive(Debug, Clone, Args)]
pub(crate) struct CalloutDecodeArgs {
    /// Location code to decode.
    #[arg(value_name = "code")]
    pub(crate) code: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct EncodedCallout {
    pub(crate) code: String,
    pub(crate) precision: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DecodedCallout {
    pub(crate) centre: Position,
    pub(crate) south_west: Position,
    pub(crate) north_east: Position,
}

pub(crate) fn decode_callout(code: &str) -> Result<DecodedCallout, GeoError> {
    let centre = location_code::try_decode(code)?;
    let bounds = location_code::decode_bounds(code).ok_or_else(|| GeoError::DecodeFailure {
        code: code.to_owned(),
        reason: "cell bounds could not be resolved",
    })?;
    Ok(DecodedCallout {
        centre,
        south_west: Position::try_from(bounds.min())?,
        north_east: Position::try_from(bounds.max())?,
    })
}

pub(super) fn run_encode_with(
    config: CalloutEncodeConfig,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let code = location_code::encode(config.point, Some(config.precision))?;
    write_json(
        writer,
        &EncodedCallout {
            code,
            precision: config.precision,
        },
    )
}

pub(super) fn run_decode_with(
    args: &CalloutDecodeArgs,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    write_json(writer, &decode_callout(&args.code)?)
}
