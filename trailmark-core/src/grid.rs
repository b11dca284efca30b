//! Local digit-pair grid references anchored at a caller-supplied origin.
//!
//! A grid reference names a cell by easting and northing digit strings of a
//! fixed width. Three digits give 100 m units and four digits give 10 m
//! units. Conversion to latitude/longitude is a flat-earth (equirectangular)
//! projection from the origin: there is no ellipsoid or UTM correction, so
//! accuracy degrades with distance from the origin and towards the poles.
//! Offsets beyond [`FLAT_EARTH_SAFE_RADIUS_METERS`] are still computed but
//! logged at `warn` level.

use std::fmt;

use log::warn;

use crate::{Axis, EARTH_RADIUS_METERS, GeoError, Position};

/// Offset from the origin beyond which the flat-earth projection is no
/// longer trusted to sub-metre accuracy.
pub const FLAT_EARTH_SAFE_RADIUS_METERS: f64 = 10_000.0;

const SUPPORTED_PRECISIONS: &str = "3 or 4";

/// Digit width of a grid reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "u8", into = "u8")
)]
pub enum GridPrecision {
    /// Three digits per axis, 100 m per unit.
    #[default]
    Hundred,
    /// Four digits per axis, 10 m per unit.
    Ten,
}

impl GridPrecision {
    /// Number of digits per axis.
    pub const fn digits(self) -> usize {
        match self {
            Self::Hundred => 3,
            Self::Ten => 4,
        }
    }

    /// Metres represented by one unit of easting or northing.
    ///
    /// # Examples
    /// ```
    /// use trailmark_core::GridPrecision;
    ///
    /// assert_eq!(GridPrecision::Hundred.unit_meters(), 100.0);
    /// assert_eq!(GridPrecision::Ten.unit_meters(), 10.0);
    /// ```
    pub const fn unit_meters(self) -> f64 {
        match self {
            Self::Hundred => 100.0,
            Self::Ten => 10.0,
        }
    }

    /// Exclusive upper bound for a digit value at this precision.
    const fn limit(self) -> f64 {
        match self {
            Self::Hundred => 1_000.0,
            Self::Ten => 10_000.0,
        }
    }

    /// Pick the precision for a conversion: an explicit value wins, then the
    /// value stored on the reference, then the 100 m default.
    ///
    /// # Examples
    /// ```
    /// use trailmark_core::{GeoError, GridPrecision};
    ///
    /// assert_eq!(GridPrecision::resolve(Some(4), Some(3)), Ok(GridPrecision::Ten));
    /// assert_eq!(GridPrecision::resolve(None, Some(4)), Ok(GridPrecision::Ten));
    /// assert_eq!(GridPrecision::resolve(None, None), Ok(GridPrecision::Hundred));
    /// assert!(matches!(
    ///     GridPrecision::resolve(Some(5), None),
    ///     Err(GeoError::InvalidPrecision { found: 5, .. })
    /// ));
    /// ```
    pub fn resolve(explicit: Option<u8>, stored: Option<u8>) -> Result<Self, GeoError> {
        explicit
            .or(stored)
            .map_or(Ok(Self::default()), Self::try_from)
    }
}

impl TryFrom<u8> for GridPrecision {
    type Error = GeoError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            3 => Ok(Self::Hundred),
            4 => Ok(Self::Ten),
            other => Err(GeoError::InvalidPrecision {
                found: usize::from(other),
                supported: SUPPORTED_PRECISIONS,
            }),
        }
    }
}

impl From<GridPrecision> for u8 {
    fn from(precision: GridPrecision) -> Self {
        match precision {
            GridPrecision::Hundred => 3,
            GridPrecision::Ten => 4,
        }
    }
}

/// Metres per grid unit for a raw precision value.
///
/// # Examples
/// ```
/// use trailmark_core::unit_meters;
///
/// assert_eq!(unit_meters(3), Ok(100.0));
/// assert_eq!(unit_meters(4), Ok(10.0));
/// assert!(unit_meters(2).is_err());
/// ```
pub fn unit_meters(precision: u8) -> Result<f64, GeoError> {
    GridPrecision::try_from(precision).map(GridPrecision::unit_meters)
}

/// Easting and northing digit strings, optionally tagged with their
/// precision.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridReference {
    /// Easting digits, zero-padded to the precision width.
    pub easting: String,
    /// Northing digits, zero-padded to the precision width.
    pub northing: String,
    /// Precision recorded alongside the digits, if known.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub precision: Option<GridPrecision>,
}

impl GridReference {
    /// Construct a reference from its digit strings.
    pub fn new(
        easting: impl Into<String>,
        northing: impl Into<String>,
        precision: Option<GridPrecision>,
    ) -> Self {
        Self {
            easting: easting.into(),
            northing: northing.into(),
            precision,
        }
    }

    fn digits(&self, precision: GridPrecision) -> Result<(f64, f64), GeoError> {
        let easting = parse_field("easting", &self.easting, precision)?;
        let northing = parse_field("northing", &self.northing, precision)?;
        Ok((f64::from(easting), f64::from(northing)))
    }
}

impl fmt::Display for GridReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.easting, self.northing)
    }
}

/// An anchor position paired with the grid reference it corresponds to.
///
/// Callers keep the origin in their own session state; this type only
/// carries it into the conversions.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridOrigin {
    /// Where the origin reference sits on the map.
    pub position: Position,
    /// Grid reference of [`GridOrigin::position`].
    pub reference: GridReference,
}

impl GridOrigin {
    /// Pair a position with its grid reference.
    pub const fn new(position: Position, reference: GridReference) -> Self {
        Self {
            position,
            reference,
        }
    }

    /// Resolve `target` to a latitude/longitude.
    ///
    /// Precision comes from `precision`, then `target`, then the origin
    /// reference, then the 100 m default.
    ///
    /// # Examples
    /// ```
    /// use trailmark_core::{GridOrigin, GridReference, Position};
    ///
    /// # fn main() -> Result<(), trailmark_core::GeoError> {
    /// let origin = GridOrigin::new(
    ///     Position::new(45.0, -75.0)?,
    ///     GridReference::new("500", "500", None),
    /// );
    /// let east = origin.locate(&GridReference::new("501", "500", None), None)?;
    /// assert!((origin.position.distance_to(&east) - 100.0).abs() < 0.5);
    /// # Ok(())
    /// # }
    /// ```
    pub fn locate(
        &self,
        target: &GridReference,
        precision: Option<GridPrecision>,
    ) -> Result<Position, GeoError> {
        let precision = precision
            .or(target.precision)
            .or(self.reference.precision)
            .unwrap_or_default();
        let (origin_e, origin_n) = self.reference.digits(precision)?;
        let (target_e, target_n) = target.digits(precision)?;

        let unit = precision.unit_meters();
        let east_offset = (target_e - origin_e) * unit;
        let north_offset = (target_n - origin_n) * unit;
        warn_if_beyond_safe_radius(east_offset, north_offset);

        let lat = self.position.lat();
        let projected_lat = lat + (north_offset / EARTH_RADIUS_METERS).to_degrees();
        let projected_lng = self.position.lng()
            + (east_offset / (EARTH_RADIUS_METERS * lat.to_radians().cos())).to_degrees();
        Position::new(projected_lat, projected_lng)
    }

    /// Grid reference of the cell containing `point`.
    ///
    /// Precision comes from `precision`, then the origin reference, then the
    /// 100 m default. Fails with [`GeoError::OutOfRange`] if a digit would be
    /// negative or wider than the precision allows.
    pub fn reference_for(
        &self,
        point: Position,
        precision: Option<GridPrecision>,
    ) -> Result<GridReference, GeoError> {
        let precision = precision
            .or(self.reference.precision)
            .unwrap_or_default();
        let (origin_e, origin_n) = self.reference.digits(precision)?;

        let origin_lat = self.position.lat();
        let north_offset =
            (point.lat() - origin_lat) * std::f64::consts::PI * EARTH_RADIUS_METERS / 180.0;
        let east_offset = (point.lng() - self.position.lng())
            * std::f64::consts::PI
            * EARTH_RADIUS_METERS
            * origin_lat.to_radians().cos()
            / 180.0;
        warn_if_beyond_safe_radius(east_offset, north_offset);

        let unit = precision.unit_meters();
        let easting = grid_digit(Axis::Easting, origin_e, east_offset, unit, precision)?;
        let northing = grid_digit(Axis::Northing, origin_n, north_offset, unit, precision)?;
        Ok(GridReference {
            easting: render_digits(easting, precision),
            northing: render_digits(northing, precision),
            precision: Some(precision),
        })
    }
}

/// Parse a digit string of exactly `precision` characters.
///
/// Leading zeros are accepted and dropped from the returned value.
///
/// # Examples
/// ```
/// use trailmark_core::{GeoError, GridPrecision, parse_digits};
///
/// assert_eq!(parse_digits("042", GridPrecision::Hundred), Ok(42));
/// assert!(matches!(
///     parse_digits("12", GridPrecision::Hundred),
///     Err(GeoError::InvalidFormat { .. })
/// ));
/// ```
pub fn parse_digits(text: &str, precision: GridPrecision) -> Result<u32, GeoError> {
    parse_field("grid digits", text, precision)
}

fn parse_field(field: &'static str, text: &str, precision: GridPrecision) -> Result<u32, GeoError> {
    let invalid = |reason| GeoError::InvalidFormat {
        field,
        input: text.to_owned(),
        reason,
    };
    if !text.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid("only the digits 0-9 are allowed"));
    }
    if text.len() != precision.digits() {
        return Err(invalid("digit count does not match the grid precision"));
    }
    text.parse::<u32>()
        .map_err(|_| invalid("not a decimal number"))
}

/// Resolve `target` against an optional origin.
///
/// Fails with [`GeoError::MissingInput`] when no origin has been set.
pub fn grid_to_lat_lng(
    origin: Option<&GridOrigin>,
    target: &GridReference,
    precision: Option<GridPrecision>,
) -> Result<Position, GeoError> {
    origin
        .ok_or(GeoError::MissingInput { what: "grid origin" })?
        .locate(target, precision)
}

/// Compute the grid reference for `point` against an optional origin.
pub fn lat_lng_to_grid_reference(
    origin: Option<&GridOrigin>,
    point: Option<Position>,
    precision: Option<GridPrecision>,
) -> Result<GridReference, GeoError> {
    let origin = origin.ok_or(GeoError::MissingInput { what: "grid origin" })?;
    let point = point.ok_or(GeoError::MissingInput { what: "position" })?;
    origin.reference_for(point, precision)
}

fn grid_digit(
    axis: Axis,
    origin_digit: f64,
    offset_meters: f64,
    unit_meters: f64,
    precision: GridPrecision,
) -> Result<u32, GeoError> {
    let value = (origin_digit + offset_meters / unit_meters).round();
    if !(0.0..precision.limit()).contains(&value) {
        return Err(GeoError::OutOfRange { axis, value });
    }
    // Range-checked above, so the cast is exact.
    Ok(value as u32)
}

fn render_digits(value: u32, precision: GridPrecision) -> String {
    format!("{value:0width$}", width = precision.digits())
}

/// Offset radius in metres, if it exceeds the flat-earth safe radius.
fn beyond_safe_radius(east_offset: f64, north_offset: f64) -> Option<f64> {
    let radius = east_offset.hypot(north_offset);
    (radius > FLAT_EARTH_SAFE_RADIUS_METERS).then_some(radius)
}

fn warn_if_beyond_safe_radius(east_offset: f64, north_offset: f64) {
    if let Some(radius) = beyond_safe_radius(east_offset, north_offset) {
        warn!(
            "grid offset of {radius:.0} m exceeds the {FLAT_EARTH_SAFE_RADIUS_METERS:.0} m flat-earth radius; \
             expect metre-level error"
        );
    }
}
