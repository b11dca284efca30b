//! Validated latitude/longitude values.

use std::fmt;
use std::str::FromStr;

use geo::{Coord, Point};

use crate::{Axis, GeoError};

/// Positions are stored at micro-degree resolution (about 0.11 m).
const POSITION_SCALE: f64 = 1e6;

/// A point on the Earth's surface in degrees.
///
/// Latitude lies in `[-90, 90]` and longitude in `[-180, 180]`. Values built
/// through [`Position::new`] are rounded to six decimal places.
///
/// # Examples
/// ```
/// use trailmark_core::Position;
///
/// # fn main() -> Result<(), trailmark_core::GeoError> {
/// let ottawa = Position::new(45.421_530_4, -75.697_193_1)?;
/// assert_eq!(ottawa.lat(), 45.421_530);
/// assert_eq!(ottawa.lng(), -75.697_193);
/// assert!(Position::new(91.0, 0.0).is_err());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "LatLng")
)]
pub struct Position {
    lat: f64,
    lng: f64,
}

/// Unvalidated `{lat, lng}` pair used as the serde wire shape.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
pub struct LatLng {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lng: f64,
}

impl Position {
    /// Validate and round a latitude/longitude pair.
    pub fn new(lat: f64, lng: f64) -> Result<Self, GeoError> {
        let lat = check_axis(Axis::Latitude, lat, 90.0)?;
        let lng = check_axis(Axis::Longitude, lng, 180.0)?;
        Ok(Self {
            lat: round_micro(lat),
            lng: round_micro(lng),
        })
    }

    /// Build a position from values already known to be in range, keeping
    /// full floating precision.
    pub(crate) const fn from_degrees_unchecked(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Latitude in degrees.
    pub const fn lat(&self) -> f64 {
        self.lat
    }

    /// Longitude in degrees.
    pub const fn lng(&self) -> f64 {
        self.lng
    }

    pub(crate) fn lat_radians(&self) -> f64 {
        self.lat.to_radians()
    }

    pub(crate) fn lng_radians(&self) -> f64 {
        self.lng.to_radians()
    }
}

fn check_axis(axis: Axis, value: f64, limit: f64) -> Result<f64, GeoError> {
    if !value.is_finite() {
        return Err(GeoError::InvalidArgument {
            name: match axis {
                Axis::Latitude => "latitude",
                _ => "longitude",
            },
            value,
            reason: "must be a finite number",
        });
    }
    if !(-limit..=limit).contains(&value) {
        return Err(GeoError::OutOfRange { axis, value });
    }
    Ok(value)
}

fn round_micro(value: f64) -> f64 {
    let rounded = (value * POSITION_SCALE).round() / POSITION_SCALE;
    // Avoid rendering `-0.000000`.
    if rounded == 0.0 { 0.0 } else { rounded }
}

impl TryFrom<LatLng> for Position {
    type Error = GeoError;

    fn try_from(raw: LatLng) -> Result<Self, Self::Error> {
        Self::new(raw.lat, raw.lng)
    }
}

impl From<Position> for LatLng {
    fn from(position: Position) -> Self {
        Self {
            lat: position.lat,
            lng: position.lng,
        }
    }
}

/// Coordinates follow the `x = longitude`, `y = latitude` convention.
impl From<Position> for Coord<f64> {
    fn from(position: Position) -> Self {
        Coord {
            x: position.lng,
            y: position.lat,
        }
    }
}

impl From<Position> for Point<f64> {
    fn from(position: Position) -> Self {
        Point::from(Coord::from(position))
    }
}

impl TryFrom<Coord<f64>> for Position {
    type Error = GeoError;

    fn try_from(coord: Coord<f64>) -> Result<Self, Self::Error> {
        Self::new(coord.y, coord.x)
    }
}

impl TryFrom<Point<f64>> for Position {
    type Error = GeoError;

    fn try_from(point: Point<f64>) -> Result<Self, Self::Error> {
        Self::try_from(point.0)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6},{:.6}", self.lat, self.lng)
    }
}

/// Parses the `lat,lng` form produced by [`Display`](fmt::Display).
impl FromStr for Position {
    type Err = GeoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = |reason| GeoError::InvalidFormat {
            field: "position",
            input: s.to_owned(),
            reason,
        };
        let (lat, lng) = s
            .split_once(',')
            .ok_or_else(|| malformed("expected `lat,lng`"))?;
        let lat = lat
            .trim()
            .parse::<f64>()
            .map_err(|_| malformed("latitude is not a number"))?;
        let lng = lng
            .trim()
            .parse::<f64>()
            .map_err(|_| malformed("longitude is not a number"))?;
        Self::new(lat, lng)
    }
}
