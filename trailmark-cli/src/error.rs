//! Error types emitted by the Trailmark CLI.
//!
//! Keep this error type reasonably small, as every subcommand returns
//! `Result<_, CliError>`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use thiserror::Error;
use trailmark_core::GeoError;
use trailmark_share::ShareError;

/// Errors emitted by the Trailmark CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        field: &'static str,
        env: &'static str,
    },
    /// A coordinate, grid or location code operation failed.
    #[error(transparent)]
    Geo(#[from] GeoError),
    /// Encoding or decoding a share code failed.
    #[error(transparent)]
    Share(#[from] ShareError),
    /// Opening the route state file failed.
    #[error("failed to open route state at {path:?}: {source}")]
    OpenRouteState {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The route state file was not valid JSON.
    #[error("failed to parse route state at {path:?}: {source}")]
    ParseRouteState {
        path: Utf8PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// The route state holds no start, end or checkpoints.
    #[error("route state at {path:?} has nothing to share")]
    NothingToShare { path: Utf8PathBuf },
    /// Serialising command output failed.
    #[error("failed to serialise output: {0}")]
    SerialiseOutput(#[source] serde_json::Error),
    /// Writing command output failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
}
