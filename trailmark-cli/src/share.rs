//! `share-encode` and `share-decode` commands.

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8};
use clap::{Args, Parser};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use std::io::{BufReader, Write};
use trailmark_share::{RouteSnapshot, RouteState, build_snapshot};

use crate::{ARG_SHARE_ROUTE, CliError, ENV_SHARE_ROUTE, write_json};

/// CLI arguments for the `share-encode` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "share-encode",
    long_about = "Encode a route as a compact share code. The route is read \
                 from a JSON file holding start, end, checkpoints and \
                 connectVia.",
    about = "Encode a route state file as a share code"
)]
#[ortho_config(prefix = "TRAILMARK")]
pub(crate) struct ShareEncodeArgs {
    /// Path to a JSON file containing the route state.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) route: Option<Utf8PathBuf>,
}

impl ShareEncodeArgs {
    pub(crate) fn into_config(self) -> Result<ShareEncodeConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        ShareEncodeConfig::try_from(merged)
    }
}

/// Resolved `share-encode` configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ShareEncodeConfig {
    pub(crate) route: Utf8PathBuf,
}

impl TryFrom<ShareEncodeArgs> for ShareEncodeConfig {
    type Error = CliError;

    fn try_from(args: ShareEncodeArgs) -> Result<Self, Self::Error> {
        let route = args.route.ok_or(CliError::MissingArgument {
            field: ARG_SHARE_ROUTE,
            env: ENV_SHARE_ROUTE,
        })?;
        Ok(Self { route })
    }
}

/// CLI arguments for the `share-decode` subcommand.
#[derive(Debug, Clone, Args)]
pub(crate) struct ShareDecodeArgs {
    /// Share code to decode.
    #[arg(value_name = "code")]
    pub(crate) code: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct EncodedRoute {
    pub(crate) code: String,
    pub(crate) waypoints: usize,
    pub(crate) path_length_meters: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DecodedRoute {
    #[serde(flatten)]
    pub(crate) snapshot: RouteSnapshot,
    pub(crate) path_length_meters: f64,
}

/// Loads a JSON-encoded [`RouteState`] from disk.
pub(crate) fn load_route_state(path: &Utf8Path) -> Result<RouteState, CliError> {
    let file = fs_utf8::File::open_ambient(path, ambient_authority()).map_err(|source| {
        CliError::OpenRouteState {
            path: path.to_path_buf(),
            source,
        }
    })?;
    let reader = BufReader::new(file);
    serde_json::from_reader(reader).map_err(|source| CliError::ParseRouteState {
        path: path.to_path_buf(),
        source,
    })
}

pub(super) fn run_encode_with(
    config: ShareEncodeConfig,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let state = load_route_state(&config.route)?;
    let snapshot = build_snapshot(&state).ok_or_else(|| CliError::NothingToShare {
        path: config.route.clone(),
    })?;
    let code = trailmark_share::encode(&snapshot)?;
    write_json(
        writer,
        &EncodedRoute {
            code: code.into_string(),
            waypoints: snapshot.waypoints().count(),
            path_length_meters: snapshot.path_length_meters(),
        },
    )
}

pub(super) fn run_decode_with(args: &ShareDecodeArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let snapshot = trailmark_share::try_decode(&args.code)?;
    let path_length_meters = snapshot.path_length_meters();
    write_json(
        writer,
        &DecodedRoute {
            snapshot,
            path_length_meters,
        },
    )
}
