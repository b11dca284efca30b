//! Coordinate maths, local grid references and location codes for Trailmark.
//!
//! Every function here is pure: it takes plain values, returns new values
//! and never retains caller state, so it can be called from any thread.
//! Inputs that callers may not have yet (a route start, a grid origin) are
//! accepted as `Option` and reported as [`GeoError::MissingInput`] when
//! absent.

#![forbid(unsafe_code)]

mod error;
pub mod geodesy;
pub mod grid;
pub mod location_code;
mod position;

pub use error::{Axis, GeoError};
pub use geodesy::{
    EARTH_RADIUS_METERS, bearing_between, destination_point, distance_between, relative_bearing,
};
pub use grid::{
    FLAT_EARTH_SAFE_RADIUS_METERS, GridOrigin, GridPrecision, GridReference, grid_to_lat_lng,
    lat_lng_to_grid_reference, parse_digits, unit_meters,
};
pub use position::{LatLng, Position};
