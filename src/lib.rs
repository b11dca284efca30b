//! Facade crate for Trailmark's map coordinate toolkit.
//!
//! This crate re-exports the coordinate math, local grid and location code
//! APIs, and exposes the route share codec behind the `share` feature.

#![forbid(unsafe_code)]

pub use trailmark_core::{
    Axis, EARTH_RADIUS_METERS, FLAT_EARTH_SAFE_RADIUS_METERS, GeoError, GridOrigin, GridPrecision,
    GridReference, LatLng, Position, bearing_between, destination_point, distance_between,
    grid_to_lat_lng, lat_lng_to_grid_reference, location_code, parse_digits, relative_bearing,
    unit_meters,
};

#[cfg(feature = "share")]
pub use trailmark_share::{
    ConnectVia, DecodeFailureReason, RouteSnapshot, RouteState, ShareCode, ShareError,
    build_snapshot, normalize_snapshot,
};

/// Route share code encoding and decoding.
#[cfg(feature = "share")]
pub mod share {
    pub use trailmark_share::{CURRENT_VERSION, decode, encode, try_decode};
}
