//! Decoder for share codes issued before the binary format.
//!
//! Those codes are standard base64 over a JSON snapshot. They are only read,
//! never written.

use base64::Engine as _;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};

use crate::{DecodeFailureReason, RouteSnapshot, ShareError, normalize_snapshot};

/// Standard alphabet, tolerant of missing or present padding.
const LEGACY_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Decode a legacy base64(JSON) share code.
pub(crate) fn decode(code: &str) -> Result<RouteSnapshot, ShareError> {
    let bytes = LEGACY_ENGINE
        .decode(code)
        .map_err(|_| DecodeFailureReason::Base64)?;
    let raw: serde_json::Value =
        serde_json::from_slice(&bytes).map_err(|_| DecodeFailureReason::Json)?;
    normalize_snapshot(&raw)?.ok_or_else(|| DecodeFailureReason::InvalidSnapshot.into())
}
