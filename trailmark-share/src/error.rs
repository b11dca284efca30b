//! Errors raised while building, encoding or decoding share codes.

use thiserror::Error;

/// Why a share code could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeFailureReason {
    /// The text was not valid base64 in the expected alphabet.
    #[error("not valid base64")]
    Base64,
    /// The buffer was shorter than the fixed header.
    #[error("buffer of {actual} bytes is shorter than the {expected}-byte header")]
    Truncated {
        /// Header length.
        expected: usize,
        /// Bytes available.
        actual: usize,
    },
    /// The header announced a different number of coordinates than the
    /// buffer holds.
    #[error("expected {expected} bytes for the announced coordinates, found {actual}")]
    LengthMismatch {
        /// Length implied by the header.
        expected: usize,
        /// Length of the buffer.
        actual: usize,
    },
    /// The version byte did not match the supported format.
    #[error("version byte {0} is not supported")]
    Version(u8),
    /// Reserved flag bits were set.
    #[error("flag byte {0:#04x} sets reserved bits")]
    Flags(u8),
    /// The connection mode byte was neither direct nor route.
    #[error("connection mode byte {0} is unknown")]
    ConnectVia(u8),
    /// A coordinate decoded outside the valid latitude/longitude range.
    #[error("coordinate {index} is outside the valid range")]
    Coordinate {
        /// Position of the coordinate in wire order.
        index: usize,
    },
    /// The payload carried no start, end or checkpoints.
    #[error("route carries no positions")]
    EmptyRoute,
    /// The legacy payload was not valid JSON.
    #[error("legacy payload is not valid JSON")]
    Json,
    /// The legacy payload parsed but did not describe a route.
    #[error("legacy payload does not describe a route")]
    InvalidSnapshot,
}

/// Errors returned by the share codec.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShareError {
    /// The snapshot declared a format version other than the supported one.
    #[error("share format version {found} is not supported; supported version is {supported}")]
    UnsupportedVersion {
        /// Version found on the snapshot or payload.
        found: String,
        /// Version this crate reads and writes.
        supported: u8,
    },
    /// The route has more checkpoints than the binary format can count.
    #[error("route has {count} checkpoints; at most 65535 can be shared")]
    TooManyCheckpoints {
        /// Number of checkpoints on the snapshot.
        count: usize,
    },
    /// The snapshot has no start, end or checkpoints to share.
    #[error("route has no start, end or checkpoints to share")]
    EmptyRoute,
    /// The share code could not be decoded.
    #[error("cannot decode share code: {reason}")]
    DecodeFailure {
        /// Which decoding step failed.
        #[source]
        reason: DecodeFailureReason,
    },
}

impl From<DecodeFailureReason> for ShareError {
    fn from(reason: DecodeFailureReason) -> Self {
        Self::DecodeFailure { reason }
    }
}
