//! Compact share codes for planned routes.
//!
//! A route (start, checkpoints, end and connection mode) is packed into a
//! fixed binary layout and base64url-encoded without padding, giving a short
//! code that survives being pasted into URLs and chat messages. Decoding
//! never fails loudly: malformed input yields `None`. Codes issued before
//! the binary format (base64 over JSON) are still accepted.
//!
//! # Examples
//! ```
//! use trailmark_core::Position;
//! use trailmark_share::{ConnectVia, RouteState, build_snapshot, decode, encode};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let state = RouteState {
//!     start: Some(Position::new(45.0, -75.0)?),
//!     end: Some(Position::new(45.01, -74.99)?),
//!     checkpoints: Vec::new(),
//!     connect_via: ConnectVia::Route,
//! };
//! let snapshot = build_snapshot(&state).ok_or("nothing to share")?;
//! let code = encode(&snapshot)?;
//! assert_eq!(decode(code.as_str()), Some(snapshot));
//! assert_eq!(decode("not-base64!!"), None);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

use std::fmt;

use base64::Engine as _;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use log::debug;

mod binary;
mod error;
mod legacy;
mod snapshot;

pub use error::{DecodeFailureReason, ShareError};
pub use snapshot::{
    CURRENT_VERSION, ConnectVia, RouteSnapshot, RouteState, build_snapshot, normalize_snapshot,
};

/// URL-safe alphabet without padding; padded input is tolerated on decode.
const SHARE_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// An encoded route, safe to embed in a URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShareCode(String);

impl ShareCode {
    /// Borrow the code text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Take ownership of the code text.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for ShareCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ShareCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for ShareCode {
    fn from(code: String) -> Self {
        Self(code)
    }
}

/// Encode a snapshot as a share code in the current binary format.
///
/// Fails if the snapshot is not at [`CURRENT_VERSION`], carries no
/// positions, or has more than 65535 checkpoints.
pub fn encode(snapshot: &RouteSnapshot) -> Result<ShareCode, ShareError> {
    let bytes = binary::encode(snapshot)?;
    Ok(ShareCode(SHARE_ENGINE.encode(bytes)))
}

/// Decode a share code, returning `None` for anything unreadable.
pub fn decode(code: &str) -> Option<RouteSnapshot> {
    try_decode(code).ok()
}

/// Decode a share code, reporting why the last attempted format failed.
///
/// The binary format is tried first; any mismatch falls through to the
/// legacy base64(JSON) format.
pub fn try_decode(code: &str) -> Result<RouteSnapshot, ShareError> {
    let code = code.trim();
    let binary = SHARE_ENGINE
        .decode(code)
        .map_err(|_| DecodeFailureReason::Base64)
        .and_then(|bytes| binary::decode(&bytes));
    match binary {
        Ok(snapshot) => Ok(snapshot),
        Err(reason) => {
            debug!("share code is not in the binary format ({reason}); trying legacy JSON");
            legacy::decode(code)
        }
    }
}
