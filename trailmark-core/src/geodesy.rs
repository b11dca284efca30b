//! Great-circle bearing, distance and destination calculations.
//!
//! All formulas treat the Earth as a sphere of radius [`EARTH_RADIUS_METERS`].
//! The free functions accept optional inputs because callers usually hold
//! partially filled route state; a missing position yields
//! [`GeoError::MissingInput`]. The [`Position`] methods cover the case where
//! both ends are already known.

use crate::{GeoError, Position};

/// Mean Earth radius used by every spherical formula in this crate.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

impl Position {
    /// Initial great-circle bearing towards `other`, in `[0, 360)` degrees.
    ///
    /// # Examples
    /// ```
    /// use trailmark_core::Position;
    ///
    /// # fn main() -> Result<(), trailmark_core::GeoError> {
    /// let origin = Position::new(0.0, 0.0)?;
    /// let east = Position::new(0.0, 1.0)?;
    /// assert!((origin.bearing_to(&east) - 90.0).abs() < 1e-9);
    /// # Ok(())
    /// # }
    /// ```
    pub fn bearing_to(&self, other: &Self) -> f64 {
        let phi1 = self.lat_radians();
        let phi2 = other.lat_radians();
        let delta_lambda = other.lng_radians() - self.lng_radians();
        let y = delta_lambda.sin() * phi2.cos();
        let x = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * delta_lambda.cos();
        wrap_degrees(y.atan2(x).to_degrees())
    }

    /// Haversine distance to `other` in metres.
    pub fn distance_to(&self, other: &Self) -> f64 {
        let phi1 = self.lat_radians();
        let phi2 = other.lat_radians();
        let delta_phi = phi2 - phi1;
        let delta_lambda = other.lng_radians() - self.lng_radians();
        let a = (delta_phi / 2.0).sin().powi(2)
            + phi1.cos() * phi2.cos() * (delta_lambda / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).max(0.0).sqrt());
        EARTH_RADIUS_METERS * c
    }

    /// Point reached by travelling `distance_meters` along `bearing_degrees`.
    ///
    /// The bearing is reduced modulo 360 and the resulting longitude is
    /// normalised with `((lng + 540) mod 360) - 180`.
    pub fn destination(&self, bearing_degrees: f64, distance_meters: f64) -> Result<Self, GeoError> {
        if !bearing_degrees.is_finite() {
            return Err(GeoError::InvalidArgument {
                name: "bearing",
                value: bearing_degrees,
                reason: "must be a finite number",
            });
        }
        if !distance_meters.is_finite() || distance_meters < 0.0 {
            return Err(GeoError::InvalidArgument {
                name: "distance",
                value: distance_meters,
                reason: "must be a finite, non-negative number of metres",
            });
        }

        let theta = bearing_degrees.rem_euclid(360.0).to_radians();
        let delta = distance_meters / EARTH_RADIUS_METERS;
        let phi1 = self.lat_radians();
        let lambda1 = self.lng_radians();

        let sin_phi2 = phi1.sin() * delta.cos() + phi1.cos() * delta.sin() * theta.cos();
        let phi2 = sin_phi2.clamp(-1.0, 1.0).asin();
        let y = theta.sin() * delta.sin() * phi1.cos();
        let x = delta.cos() - phi1.sin() * sin_phi2;
        let lambda2 = lambda1 + y.atan2(x);

        let lat = phi2.to_degrees().clamp(-90.0, 90.0);
        let lng = normalize_longitude(lambda2.to_degrees());
        Ok(Self::from_degrees_unchecked(lat, lng))
    }
}

/// Forward azimuth from `from` to `to`, in `[0, 360)` degrees.
///
/// # Examples
/// ```
/// use trailmark_core::{GeoError, Position, bearing_between};
///
/// # fn main() -> Result<(), GeoError> {
/// let from = Position::new(0.0, 0.0)?;
/// let north = Position::new(1.0, 0.0)?;
/// assert_eq!(bearing_between(Some(from), Some(north))?, 0.0);
/// assert!(matches!(
///     bearing_between(Some(from), None),
///     Err(GeoError::MissingInput { .. })
/// ));
/// # Ok(())
/// # }
/// ```
pub fn bearing_between(from: Option<Position>, to: Option<Position>) -> Result<f64, GeoError> {
    let (from, to) = require_pair(from, to)?;
    Ok(from.bearing_to(&to))
}

/// Haversine great-circle distance in metres.
pub fn distance_between(from: Option<Position>, to: Option<Position>) -> Result<f64, GeoError> {
    let (from, to) = require_pair(from, to)?;
    Ok(from.distance_to(&to))
}

/// Direct geodetic solution on a sphere.
///
/// Fails with [`GeoError::MissingInput`] when `origin` is absent and with
/// [`GeoError::InvalidArgument`] for a negative distance or non-finite
/// bearing.
pub fn destination_point(
    origin: Option<Position>,
    bearing_degrees: f64,
    distance_meters: f64,
) -> Result<Position, GeoError> {
    let origin = origin.ok_or(GeoError::MissingInput { what: "origin" })?;
    origin.destination(bearing_degrees, distance_meters)
}

/// Clockwise offset from `heading` to `target_bearing`, in `[0, 360)`.
///
/// Used to rotate an on-screen pointer towards a target. Returns `None` when
/// either angle is unknown.
///
/// # Examples
/// ```
/// use trailmark_core::relative_bearing;
///
/// assert_eq!(relative_bearing(Some(350.0), Some(10.0)), Some(20.0));
/// assert_eq!(relative_bearing(None, Some(10.0)), None);
/// ```
pub fn relative_bearing(heading: Option<f64>, target_bearing: Option<f64>) -> Option<f64> {
    let heading = heading.filter(|value| value.is_finite())?;
    let target = target_bearing.filter(|value| value.is_finite())?;
    Some(wrap_degrees(target - heading))
}

fn require_pair(
    from: Option<Position>,
    to: Option<Position>,
) -> Result<(Position, Position), GeoError> {
    let from = from.ok_or(GeoError::MissingInput {
        what: "start position",
    })?;
    let to = to.ok_or(GeoError::MissingInput {
        what: "target position",
    })?;
    Ok((from, to))
}

/// Wrap an angle into `[0, 360)`.
pub(crate) fn wrap_degrees(degrees: f64) -> f64 {
    let wrapped = degrees.rem_euclid(360.0);
    // `rem_euclid` can round up to exactly 360 for tiny negative inputs.
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

fn normalize_longitude(lng: f64) -> f64 {
    (lng + 540.0).rem_euclid(360.0) - 180.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn ottawa() -> Position {
        Position::new(45.0, -75.0).expect("valid position")
    }

    fn angle_diff(a: f64, b: f64) -> f64 {
        ((a - b + 540.0).rem_euclid(360.0) - 180.0).abs()
    }

    #[rstest]
    #[case(1.0, 0.0, 0.0)]
    #[case(0.0, 1.0, 90.0)]
    #[case(-1.0, 0.0, 180.0)]
    #[case(0.0, -1.0, 270.0)]
    fn cardinal_bearings_from_null_island(#[case] lat: f64, #[case] lng: f64, #[case] expected: f64) {
        let origin = Position::new(0.0, 0.0).expect("valid");
        let target = Position::new(lat, lng).expect("valid");
        let bearing = bearing_between(Some(origin), Some(target)).expect("both present");
        assert!(angle_diff(bearing, expected) < 1e-9, "bearing {bearing}");
        assert!((0.0..360.0).contains(&bearing));
    }

    #[rstest]
    fn bearing_requires_both_points(ottawa: Position) {
        assert!(matches!(
            bearing_between(None, Some(ottawa)),
            Err(GeoError::MissingInput { .. })
        ));
        assert!(matches!(
            distance_between(Some(ottawa), None),
            Err(GeoError::MissingInput { .. })
        ));
    }

    #[rstest]
    fn distance_to_self_is_zero(ottawa: Position) {
        assert_eq!(distance_between(Some(ottawa), Some(ottawa)), Ok(0.0));
    }

    #[rstest]
    fn one_degree_of_latitude_is_about_111_km() {
        let a = Position::new(0.0, 0.0).expect("valid");
        let b = Position::new(1.0, 0.0).expect("valid");
        let distance = a.distance_to(&b);
        assert!((distance - 111_194.93).abs() < 1.0, "distance {distance}");
        assert_eq!(distance, b.distance_to(&a));
    }

    #[rstest]
    #[case(0.0)]
    #[case(45.0)]
    #[case(135.0)]
    #[case(270.0)]
    fn destination_reverses_bearing_and_distance(ottawa: Position, #[case] bearing: f64) {
        let target = destination_point(Some(ottawa), bearing, 2_500.0).expect("valid arguments");
        assert!(angle_diff(ottawa.bearing_to(&target), bearing) < 1e-6);
        assert!((ottawa.distance_to(&target) - 2_500.0).abs() < 1e-6);
    }

    #[rstest]
    fn destination_reduces_bearing_modulo_360(ottawa: Position) {
        let plain = ottawa.destination(90.0, 1_000.0).expect("valid");
        let wrapped = ottawa.destination(450.0, 1_000.0).expect("valid");
        let negative = ottawa.destination(-270.0, 1_000.0).expect("valid");
        assert!((plain.lng() - wrapped.lng()).abs() < 1e-12);
        assert!((plain.lng() - negative.lng()).abs() < 1e-12);
    }

    #[rstest]
    fn destination_with_zero_distance_is_origin(ottawa: Position) {
        let same = ottawa.destination(123.0, 0.0).expect("valid");
        assert!((same.lat() - ottawa.lat()).abs() < 1e-12);
        assert!((same.lng() - ottawa.lng()).abs() < 1e-12);
    }

    #[rstest]
    fn destination_normalises_across_antimeridian() {
        let origin = Position::new(0.0, 179.999).expect("valid");
        let target = origin.destination(90.0, 1_000.0).expect("valid");
        assert!(target.lng() < -179.0, "longitude {}", target.lng());
        assert!((-180.0..180.0).contains(&target.lng()));
    }

    #[rstest]
    #[case(f64::NAN, 10.0, "bearing")]
    #[case(f64::INFINITY, 10.0, "bearing")]
    #[case(10.0, -1.0, "distance")]
    fn destination_rejects_invalid_arguments(
        ottawa: Position,
        #[case] bearing: f64,
        #[case] distance: f64,
        #[case] expected: &str,
    ) {
        let err = destination_point(Some(ottawa), bearing, distance).expect_err("invalid");
        assert!(matches!(err, GeoError::InvalidArgument { name, .. } if name == expected));
    }

    #[rstest]
    fn destination_requires_origin() {
        let err = destination_point(None, 0.0, 1.0).expect_err("missing origin");
        assert_eq!(err, GeoError::MissingInput { what: "origin" });
    }

    #[rstest]
    #[case(0.0, 90.0, 90.0)]
    #[case(90.0, 0.0, 270.0)]
    #[case(350.0, 10.0, 20.0)]
    #[case(10.0, 10.0, 0.0)]
    fn relative_bearing_is_clockwise_offset(
        #[case] heading: f64,
        #[case] target: f64,
        #[case] expected: f64,
    ) {
        assert_eq!(relative_bearing(Some(heading), Some(target)), Some(expected));
    }

    #[rstest]
    fn relative_bearing_is_absent_without_inputs() {
        assert_eq!(relative_bearing(Some(10.0), None), None);
        assert_eq!(relative_bearing(None, None), None);
    }
}
