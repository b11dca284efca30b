//! Test helpers for running commands into memory and writing route files.

use super::*;
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use tempfile::TempDir;

/// Parse `args` as a full command line and run it, capturing stdout.
pub(super) fn run_to_json(args: &[&str]) -> Result<serde_json::Value, CliError> {
    let cli = Cli::try_parse_from(args.iter().copied())?;
    let mut buffer = Vec::new();
    run_command(cli.command, &mut buffer)?;
    Ok(serde_json::from_slice(&buffer).expect("command output is JSON"))
}

/// Capture a command's JSON output from an already-built runner.
pub(super) fn capture_json(
    run: impl FnOnce(&mut dyn Write) -> Result<(), CliError>,
) -> Result<serde_json::Value, CliError> {
    let mut buffer = Vec::new();
    run(&mut buffer)?;
    Ok(serde_json::from_slice(&buffer).expect("command output is JSON"))
}

/// A temporary UTF-8 workspace for route state files.
pub(super) struct RouteFiles {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl RouteFiles {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 workspace");
        Self { _dir: dir, root }
    }

    pub(super) fn write(&self, name: &str, contents: &str) -> Utf8PathBuf {
        let path = self.root.join(name);
        write_utf8(&path, contents.as_bytes());
        path
    }

    pub(super) fn path(&self, name: &str) -> Utf8PathBuf {
        self.root.join(name)
    }
}

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    fs::write(path.as_std_path(), contents).expect("write fixture file");
}

/// Route state JSON for a short routed walk in Ottawa.
pub(super) const OTTAWA_ROUTE: &str = r#"{
    "start": {"lat": 45.0, "lng": -75.0},
    "end": {"lat": 45.01, "lng": -74.99},
    "checkpoints": [{"lat": 45.005, "lng": -74.995}],
    "connectVia": "route"
}"#;
