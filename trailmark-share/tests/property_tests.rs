//! Property-based tests for the share codec.
//!
//! # Invariants tested
//!
//! - **Round-trip fidelity:** decoding an encoded snapshot restores every
//!   waypoint to within 1e-5 degrees and keeps the connection mode and the
//!   start/end presence flags.
//! - **Total decoding:** arbitrary text never panics the decoder.

use proptest::prelude::*;
use trailmark_core::Position;
use trailmark_share::{ConnectVia, RouteSnapshot, decode, encode};

fn position_strategy() -> impl Strategy<Value = Position> {
    (-90.0_f64..=90.0, -180.0_f64..=180.0).prop_map(|(lat, lng)| {
        Position::new(lat, lng).unwrap_or_else(|err| panic!("generated invalid position: {err}"))
    })
}

fn snapshot_strategy() -> impl Strategy<Value = RouteSnapshot> {
    (
        prop_oneof![Just(ConnectVia::Direct), Just(ConnectVia::Route)],
        proptest::option::of(position_strategy()),
        proptest::option::of(position_strategy()),
        proptest::collection::vec(position_strategy(), 0..20),
    )
        .prop_map(|(connect_via, start, end, checkpoints)| {
            RouteSnapshot::new(connect_via, start, end, checkpoints)
        })
        .prop_filter("a shared route carries at least one position", |snapshot| {
            !snapshot.is_empty()
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn decode_inverts_encode(snapshot in snapshot_strategy()) {
        let code = encode(&snapshot).expect("snapshot encodes");
        let decoded = decode(code.as_str()).expect("code decodes");

        prop_assert_eq!(decoded.connect_via, snapshot.connect_via);
        prop_assert_eq!(decoded.start.is_some(), snapshot.start.is_some());
        prop_assert_eq!(decoded.end.is_some(), snapshot.end.is_some());
        prop_assert_eq!(decoded.checkpoints.len(), snapshot.checkpoints.len());

        for (expected, actual) in snapshot.waypoints().zip(decoded.waypoints()) {
            prop_assert!((expected.lat() - actual.lat()).abs() <= 1e-5);
            prop_assert!((expected.lng() - actual.lng()).abs() <= 1e-5);
        }
    }

    #[test]
    fn decode_never_panics(code in "\\PC{0,64}") {
        let _ = decode(&code);
    }

    #[test]
    fn decode_never_panics_on_url_safe_text(code in "[A-Za-z0-9_-]{0,96}") {
        let _ = decode(&code);
    }
}
