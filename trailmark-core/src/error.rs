//! Failure taxonomy shared by the coordinate, grid and location-code helpers.

use thiserror::Error;

/// Which coordinate axis a range failure refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Latitude, bounded by `[-90, 90]`.
    Latitude,
    /// Longitude, bounded by `[-180, 180]`.
    Longitude,
    /// Grid easting digits.
    Easting,
    /// Grid northing digits.
    Northing,
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Latitude => "latitude",
            Self::Longitude => "longitude",
            Self::Easting => "easting",
            Self::Northing => "northing",
        })
    }
}

/// Errors returned by the geospatial helpers in this crate.
///
/// None of these are fatal: callers are expected to surface the message and
/// keep whatever state they held before the call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeoError {
    /// A precision tier outside the supported set was requested.
    #[error("precision {found} is not supported; expected one of {supported}")]
    InvalidPrecision {
        /// Precision supplied by the caller.
        found: usize,
        /// Human-readable description of the accepted values.
        supported: &'static str,
    },
    /// Text did not have the expected shape.
    #[error("invalid {field} {input:?}: {reason}")]
    InvalidFormat {
        /// Name of the value being parsed.
        field: &'static str,
        /// Offending input.
        input: String,
        /// What was wrong with it.
        reason: &'static str,
    },
    /// A coordinate or grid digit fell outside its domain.
    #[error("{axis} {value} is outside the supported range")]
    OutOfRange {
        /// Axis that failed validation.
        axis: Axis,
        /// Rejected value.
        value: f64,
    },
    /// A required position or origin was not supplied.
    #[error("{what} is required")]
    MissingInput {
        /// Name of the absent input.
        what: &'static str,
    },
    /// A numeric argument was not usable, e.g. negative or non-finite.
    #[error("invalid {name} {value}: {reason}")]
    InvalidArgument {
        /// Name of the argument.
        name: &'static str,
        /// Rejected value.
        value: f64,
        /// Constraint that was violated.
        reason: &'static str,
    },
    /// A location code contained a character outside the base-32 alphabet
    /// or had an unusable length.
    #[error("cannot decode location code {code:?}: {reason}")]
    DecodeFailure {
        /// Code being decoded.
        code: String,
        /// Why decoding stopped.
        reason: &'static str,
    },
}
