//! Fixed big-endian binary layout for share codes.
//!
//! ```text
//! byte 0      version (1)
//! byte 1      flags: bit 0 = has start, bit 1 = has end
//! byte 2      connect via: 0 = direct, 1 = route
//! bytes 3-4   checkpoint count (u16)
//! then 8 bytes per coordinate, in the order start?, checkpoints, end?:
//!             round(lat * 1e5) as i32, round(lng * 1e5) as i32
//! ```

use trailmark_core::Position;

use crate::{ConnectVia, DecodeFailureReason, RouteSnapshot, ShareError, snapshot::CURRENT_VERSION};

/// Length of the fixed header in bytes.
pub(crate) const HEADER_LEN: usize = 5;

/// Bytes per encoded coordinate.
pub(crate) const COORDINATE_LEN: usize = 8;

/// Coordinates are stored as fixed-point values at 1e-5 degrees (about 1.1 m).
const COORDINATE_SCALE: f64 = 1e5;

const FLAG_HAS_START: u8 = 0b01;
const FLAG_HAS_END: u8 = 0b10;

/// Serialise a snapshot into the binary layout.
pub(crate) fn encode(snapshot: &RouteSnapshot) -> Result<Vec<u8>, ShareError> {
    if snapshot.version != CURRENT_VERSION {
        return Err(ShareError::UnsupportedVersion {
            found: snapshot.version.to_string(),
            supported: CURRENT_VERSION,
        });
    }
    if snapshot.is_empty() {
        return Err(ShareError::EmptyRoute);
    }
    let count = u16::try_from(snapshot.checkpoints.len()).map_err(|_| {
        ShareError::TooManyCheckpoints {
            count: snapshot.checkpoints.len(),
        }
    })?;

    let mut flags = 0;
    if snapshot.start.is_some() {
        flags |= FLAG_HAS_START;
    }
    if snapshot.end.is_some() {
        flags |= FLAG_HAS_END;
    }
    let connect_via = match snapshot.connect_via {
        ConnectVia::Direct => 0,
        ConnectVia::Route => 1,
    };

    let mut buffer = Vec::with_capacity(HEADER_LEN + COORDINATE_LEN * snapshot.waypoints().count());
    buffer.extend_from_slice(&[CURRENT_VERSION, flags, connect_via]);
    buffer.extend_from_slice(&count.to_be_bytes());
    for waypoint in snapshot.waypoints() {
        buffer.extend_from_slice(&to_fixed_point(waypoint.lat()).to_be_bytes());
        buffer.extend_from_slice(&to_fixed_point(waypoint.lng()).to_be_bytes());
    }
    Ok(buffer)
}

/// Parse the binary layout back into a snapshot.
///
/// The buffer must be exactly as long as its header announces and carry at
/// least one coordinate.
pub(crate) fn decode(bytes: &[u8]) -> Result<RouteSnapshot, DecodeFailureReason> {
    let Some((header, body)) = bytes.split_first_chunk::<HEADER_LEN>() else {
        return Err(DecodeFailureReason::Truncated {
            expected: HEADER_LEN,
            actual: bytes.len(),
        });
    };
    let [version, flags, connect_via, count_hi, count_lo] = *header;
    if version != CURRENT_VERSION {
        return Err(DecodeFailureReason::Version(version));
    }
    if flags & !(FLAG_HAS_START | FLAG_HAS_END) != 0 {
        return Err(DecodeFailureReason::Flags(flags));
    }
    let connect_via = match connect_via {
        0 => ConnectVia::Direct,
        1 => ConnectVia::Route,
        other => return Err(DecodeFailureReason::ConnectVia(other)),
    };
    let has_start = flags & FLAG_HAS_START != 0;
    let has_end = flags & FLAG_HAS_END != 0;
    let count = usize::from(u16::from_be_bytes([count_hi, count_lo]));

    let coordinates = count + usize::from(has_start) + usize::from(has_end);
    let expected = HEADER_LEN + COORDINATE_LEN * coordinates;
    if bytes.len() != expected {
        return Err(DecodeFailureReason::LengthMismatch {
            expected,
            actual: bytes.len(),
        });
    }
    if coordinates == 0 {
        return Err(DecodeFailureReason::EmptyRoute);
    }

    let decoded = body
        .chunks_exact(COORDINATE_LEN)
        .enumerate()
        .map(|(index, chunk)| {
            decode_coordinate(chunk).ok_or(DecodeFailureReason::Coordinate { index })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut waypoints = decoded.into_iter();
    let start = if has_start { waypoints.next() } else { None };
    let mut checkpoints: Vec<Position> = waypoints.collect();
    let end = if has_end { checkpoints.pop() } else { None };

    Ok(RouteSnapshot {
        version,
        connect_via,
        start,
        end,
        checkpoints,
    })
}

fn to_fixed_point(degrees: f64) -> i32 {
    // |degrees| <= 180, so the scaled value fits comfortably in an i32.
    (degrees * COORDINATE_SCALE).round() as i32
}

fn decode_coordinate(chunk: &[u8]) -> Option<Position> {
    let (lat, lng) = chunk.split_first_chunk::<4>()?;
    let lng: [u8; 4] = lng.try_into().ok()?;
    let lat = f64::from(i32::from_be_bytes(*lat)) / COORDINATE_SCALE;
    let lng = f64::from(i32::from_be_bytes(lng)) / COORDINATE_SCALE;
    Position::new(lat, lng).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    fn position(lat: f64, lng: f64) -> Position {
        Position::new(lat, lng).expect("valid position")
    }

    #[fixture]
    fn snapshot() -> RouteSnapshot {
        RouteSnapshot::new(
            ConnectVia::Route,
            Some(position(45.0, -75.0)),
            Some(position(45.01, -74.99)),
            vec![position(45.003, -74.997), position(45.006, -74.994)],
        )
    }

    #[rstest]
    fn header_matches_layout(snapshot: RouteSnapshot) {
        let bytes = encode(&snapshot).expect("encodes");
        assert_eq!(bytes.len(), HEADER_LEN + COORDINATE_LEN * 4);
        assert_eq!(bytes.get(..HEADER_LEN), Some(&[1, 0b11, 1, 0, 2][..]));
    }

    #[rstest]
    fn coordinates_are_big_endian_fixed_point(snapshot: RouteSnapshot) {
        let bytes = encode(&snapshot).expect("encodes");
        let start_lat = 4_500_000_i32.to_be_bytes();
        let start_lng = (-7_500_000_i32).to_be_bytes();
        assert_eq!(bytes.get(5..9), Some(&start_lat[..]));
        assert_eq!(bytes.get(9..13), Some(&start_lng[..]));
        let end_lat = 4_501_000_i32.to_be_bytes();
        assert_eq!(bytes.get(29..33), Some(&end_lat[..]));
    }

    #[rstest]
    fn checkpoint_only_snapshot_has_clear_flags() {
        let snapshot = RouteSnapshot::new(
            ConnectVia::Direct,
            None,
            None,
            vec![position(-33.8688, 151.2093)],
        );
        let bytes = encode(&snapshot).expect("encodes");
        assert_eq!(bytes.get(..HEADER_LEN), Some(&[1, 0, 0, 0, 1][..]));
        let decoded = decode(&bytes).expect("decodes");
        assert_eq!(decoded.start, None);
        assert_eq!(decoded.end, None);
        assert_eq!(decoded.checkpoints, vec![position(-33.8688, 151.2093)]);
    }

    #[rstest]
    fn decode_restores_snapshot(snapshot: RouteSnapshot) {
        let bytes = encode(&snapshot).expect("encodes");
        assert_eq!(decode(&bytes), Ok(snapshot));
    }

    #[rstest]
    fn encode_rejects_foreign_version(mut snapshot: RouteSnapshot) {
        snapshot.version = 2;
        assert!(matches!(
            encode(&snapshot),
            Err(ShareError::UnsupportedVersion { .. })
        ));
    }

    #[rstest]
    fn encode_rejects_too_many_checkpoints() {
        let checkpoints = vec![position(0.0, 0.0); usize::from(u16::MAX) + 1];
        let snapshot = RouteSnapshot::new(ConnectVia::Direct, None, None, checkpoints);
        assert_eq!(
            encode(&snapshot),
            Err(ShareError::TooManyCheckpoints { count: 65_536 })
        );
    }

    #[rstest]
    fn decode_rejects_trailing_bytes(snapshot: RouteSnapshot) {
        let mut bytes = encode(&snapshot).expect("encodes");
        bytes.push(0);
        assert!(matches!(
            decode(&bytes),
            Err(DecodeFailureReason::LengthMismatch { .. })
        ));
    }

    #[rstest]
    fn decode_rejects_missing_coordinate(snapshot: RouteSnapshot) {
        let bytes = encode(&snapshot).expect("encodes");
        let truncated = bytes.get(..bytes.len() - COORDINATE_LEN).expect("long enough");
        assert!(matches!(
            decode(truncated),
            Err(DecodeFailureReason::LengthMismatch { .. })
        ));
    }

    #[rstest]
    #[case(&[1, 0, 0, 0], DecodeFailureReason::Truncated { expected: 5, actual: 4 })]
    #[case(&[2, 0, 0, 0, 0], DecodeFailureReason::Version(2))]
    #[case(&[1, 0b100, 0, 0, 0], DecodeFailureReason::Flags(0b100))]
    #[case(&[1, 0, 2, 0, 0], DecodeFailureReason::ConnectVia(2))]
    fn decode_rejects_bad_headers(#[case] bytes: &[u8], #[case] expected: DecodeFailureReason) {
        assert_eq!(decode(bytes), Err(expected));
    }

    #[rstest]
    fn decode_rejects_out_of_range_coordinate() {
        let mut bytes = vec![1, 0b01, 0, 0, 0];
        bytes.extend_from_slice(&9_100_000_i32.to_be_bytes());
        bytes.extend_from_slice(&0_i32.to_be_bytes());
        assert_eq!(
            decode(&bytes),
            Err(DecodeFailureReason::Coordinate { index: 0 })
        );
    }

    #[rstest]
    fn encode_rejects_empty_snapshot() {
        let snapshot = RouteSnapshot::new(ConnectVia::Route, None, None, Vec::new());
        assert_eq!(encode(&snapshot), Err(ShareError::EmptyRoute));
    }

    #[rstest]
    #[case(&[1, 0, 0, 0, 0])]
    #[case(&[1, 0, 1, 0, 0])]
    fn decode_rejects_header_without_coordinates(#[case] bytes: &[u8]) {
        assert_eq!(decode(bytes), Err(DecodeFailureReason::EmptyRoute));
    }
}
