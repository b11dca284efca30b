//! Geohash-style location codes for short callouts.
//!
//! A code is built by alternately bisecting the longitude and latitude
//! ranges (longitude first) and emitting one base-32 character per five
//! bits. Longer codes are finer; nine characters resolve to a few metres.

use geo::{Coord, Rect};

use crate::{GeoError, Position};

/// Base-32 alphabet used by geohash: digits plus lowercase letters without
/// `a`, `i`, `l` and `o`.
pub const ALPHABET: &[u8; 32] = b"0123456789bcdefghjkmnpqrstuvwxyz";

/// Code length used when the caller does not ask for one.
pub const DEFAULT_PRECISION: usize = 9;

/// Longest code accepted by [`encode`] and [`decode`].
pub const MAX_PRECISION: usize = 12;

const BITS_PER_CHAR: u8 = 5;

/// Latitude/longitude bounds narrowed one bit at a time.
#[derive(Debug, Clone, Copy)]
struct Cell {
    lat: (f64, f64),
    lng: (f64, f64),
}

impl Cell {
    const WORLD: Self = Self {
        lat: (-90.0, 90.0),
        lng: (-180.0, 180.0),
    };

    fn midpoint(self) -> (f64, f64) {
        (
            (self.lat.0 + self.lat.1) / 2.0,
            (self.lng.0 + self.lng.1) / 2.0,
        )
    }
}

/// Bisect `range` around its midpoint, keeping the upper half when `upper`.
fn bisect(range: &mut (f64, f64), upper: bool) {
    let mid = (range.0 + range.1) / 2.0;
    if upper {
        range.0 = mid;
    } else {
        range.1 = mid;
    }
}

/// Encode `position` as a location code of `precision` characters
/// (default [`DEFAULT_PRECISION`]).
///
/// # Examples
/// ```
/// use trailmark_core::{Position, location_code};
///
/// # fn main() -> Result<(), trailmark_core::GeoError> {
/// let code = location_code::encode(Position::new(57.64911, 10.40744)?, Some(11))?;
/// assert_eq!(code, "u4pruydqqvj");
/// assert!(location_code::encode(Position::new(0.0, 0.0)?, Some(13)).is_err());
/// # Ok(())
/// # }
/// ```
pub fn encode(position: Position, precision: Option<usize>) -> Result<String, GeoError> {
    let precision = precision.unwrap_or(DEFAULT_PRECISION);
    if !(1..=MAX_PRECISION).contains(&precision) {
        return Err(GeoError::InvalidPrecision {
            found: precision,
            supported: "1 to 12 characters",
        });
    }

    let mut cell = Cell::WORLD;
    let mut code = String::with_capacity(precision);
    let mut even_bit = true;
    while code.len() < precision {
        let mut index = 0_usize;
        for _ in 0..BITS_PER_CHAR {
            let (range, value) = if even_bit {
                (&mut cell.lng, position.lng())
            } else {
                (&mut cell.lat, position.lat())
            };
            let upper = value >= (range.0 + range.1) / 2.0;
            bisect(range, upper);
            index = (index << 1) | usize::from(upper);
            even_bit = !even_bit;
        }
        let symbol = ALPHABET.get(index).copied().unwrap_or(b'0');
        code.push(char::from(symbol));
    }
    Ok(code)
}

/// Decode a location code to the centre of its cell.
///
/// Matching is case-insensitive. Returns `None` for empty or over-long
/// codes and for characters outside [`ALPHABET`].
///
/// # Examples
/// ```
/// use trailmark_core::location_code;
///
/// let centre = location_code::decode("U4PRUYDQQVJ").expect("valid code");
/// assert!((centre.lat() - 57.64911).abs() < 1e-5);
/// assert!(location_code::decode("u4pa").is_none());
/// ```
pub fn decode(code: &str) -> Option<Position> {
    try_decode(code).ok()
}

/// Decode a location code, reporting why decoding failed.
///
/// The centre keeps full precision: a 12-character cell is narrower than
/// the micro-degree rounding applied by [`Position::new`].
pub fn try_decode(code: &str) -> Result<Position, GeoError> {
    let (lat, lng) = converge(code)?.midpoint();
    // Midpoints of cells inside the world bounds are always in range.
    Ok(Position::from_degrees_unchecked(lat, lng))
}

/// Bounding box of the cell named by `code`, with `x = longitude`.
pub fn decode_bounds(code: &str) -> Option<Rect<f64>> {
    let cell = converge(code).ok()?;
    Some(Rect::new(
        Coord {
            x: cell.lng.0,
            y: cell.lat.0,
        },
        Coord {
            x: cell.lng.1,
            y: cell.lat.1,
        },
    ))
}

fn converge(code: &str) -> Result<Cell, GeoError> {
    let failure = |reason| GeoError::DecodeFailure {
        code: code.to_owned(),
        reason,
    };
    if code.is_empty() {
        return Err(failure("code is empty"));
    }
    if code.chars().count() > MAX_PRECISION {
        return Err(failure("code is longer than 12 characters"));
    }

    let mut cell = Cell::WORLD;
    let mut even_bit = true;
    for symbol in code.chars().map(|c| c.to_ascii_lowercase()) {
        let index = u8::try_from(symbol)
            .ok()
            .and_then(|byte| ALPHABET.iter().position(|&candidate| candidate == byte))
            .ok_or_else(|| failure("character outside the geohash alphabet"))?;
        for shift in (0..BITS_PER_CHAR).rev() {
            let upper = (index >> shift) & 1 == 1;
            let range = if even_bit { &mut cell.lng } else { &mut cell.lat };
            bisect(range, upper);
            even_bit = !even_bit;
        }
    }
    Ok(cell)
}
