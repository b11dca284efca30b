//! Route snapshots: the strongly typed value that share codes carry.

use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use trailmark_core::Position;

use crate::ShareError;

/// Share format version written by [`crate::encode`].
pub const CURRENT_VERSION: u8 = 1;

/// How consecutive waypoints are joined when the route is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectVia {
    /// Straight-line segments.
    #[default]
    Direct,
    /// Segments following a routed path.
    Route,
}

impl ConnectVia {
    /// Map free-form text onto a connection mode, falling back to
    /// [`ConnectVia::Direct`] for anything unrecognised.
    ///
    /// # Examples
    /// ```
    /// use trailmark_share::ConnectVia;
    ///
    /// assert_eq!(ConnectVia::clamp("route"), ConnectVia::Route);
    /// assert_eq!(ConnectVia::clamp("teleport"), ConnectVia::Direct);
    /// ```
    pub fn clamp(text: &str) -> Self {
        match text {
            "route" => Self::Route,
            _ => Self::Direct,
        }
    }
}

/// The caller's live route state, read when building a snapshot.
///
/// This mirrors what a route planner holds while the user edits a route:
/// any of the fields may still be empty.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RouteState {
    /// Chosen start, if any.
    pub start: Option<Position>,
    /// Chosen end, if any.
    pub end: Option<Position>,
    /// Intermediate checkpoints in visiting order.
    pub checkpoints: Vec<Position>,
    /// Rendering mode for the route.
    pub connect_via: ConnectVia,
}

/// A validated, versioned copy of a route for sharing.
///
/// # Examples
/// ```
/// use trailmark_core::Position;
/// use trailmark_share::{ConnectVia, RouteSnapshot};
///
/// # fn main() -> Result<(), trailmark_core::GeoError> {
/// let snapshot = RouteSnapshot::new(
///     ConnectVia::Direct,
///     Some(Position::new(45.0, -75.0)?),
///     Some(Position::new(45.01, -74.99)?),
///     Vec::new(),
/// );
/// assert_eq!(snapshot.waypoints().count(), 2);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteSnapshot {
    /// Share format version.
    pub version: u8,
    /// Rendering mode for the route.
    pub connect_via: ConnectVia,
    /// Start of the route, if set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<Position>,
    /// End of the route, if set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<Position>,
    /// Intermediate checkpoints in visiting order.
    pub checkpoints: Vec<Position>,
}

impl RouteSnapshot {
    /// Build a snapshot at [`CURRENT_VERSION`].
    pub const fn new(
        connect_via: ConnectVia,
        start: Option<Position>,
        end: Option<Position>,
        checkpoints: Vec<Position>,
    ) -> Self {
        Self {
            version: CURRENT_VERSION,
            connect_via,
            start,
            end,
            checkpoints,
        }
    }

    /// Waypoints in wire order: start, checkpoints, end.
    pub fn waypoints(&self) -> impl Iterator<Item = Position> + '_ {
        self.start
            .iter()
            .chain(self.checkpoints.iter())
            .chain(self.end.iter())
            .copied()
    }

    /// Whether the snapshot carries no positions at all.
    pub fn is_empty(&self) -> bool {
        self.start.is_none() && self.end.is_none() && self.checkpoints.is_empty()
    }

    /// Sum of great-circle legs between consecutive waypoints, in metres.
    pub fn path_length_meters(&self) -> f64 {
        self.waypoints()
            .zip(self.waypoints().skip(1))
            .map(|(from, to)| from.distance_to(&to))
            .sum()
    }
}

/// Map the caller's route state into a snapshot.
///
/// Returns `None` when there is nothing to share: no start, no end and no
/// checkpoints.
///
/// # Examples
/// ```
/// use trailmark_share::{RouteState, build_snapshot};
///
/// assert!(build_snapshot(&RouteState::default()).is_none());
/// ```
pub fn build_snapshot(state: &RouteState) -> Option<RouteSnapshot> {
    let snapshot = RouteSnapshot::new(
        state.connect_via,
        state.start,
        state.end,
        state.checkpoints.clone(),
    );
    (!snapshot.is_empty()).then_some(snapshot)
}

/// Validate loosely structured snapshot data, as found in legacy share
/// payloads.
///
/// A missing `version` means the current version; any other version fails
/// with [`ShareError::UnsupportedVersion`]. `connectVia` falls back to
/// `direct`. Checkpoints that are not valid positions are dropped. A value
/// that is not an object, whose start, end or checkpoint list is
/// malformed, or that is left with no positions at all yields `Ok(None)`.
///
/// # Examples
/// ```
/// use serde_json::json;
/// use trailmark_share::{ConnectVia, normalize_snapshot};
///
/// let raw = json!({
///     "connectVia": "route",
///     "start": {"lat": 45.0, "lng": -75.0},
///     "checkpoints": [{"lat": 45.005, "lng": -74.995}, {"lat": 120.0, "lng": 0.0}],
/// });
/// let snapshot = normalize_snapshot(&raw).unwrap().unwrap();
/// assert_eq!(snapshot.connect_via, ConnectVia::Route);
/// assert_eq!(snapshot.checkpoints.len(), 1);
/// ```
pub fn normalize_snapshot(raw: &Value) -> Result<Option<RouteSnapshot>, ShareError> {
    let Some(fields) = raw.as_object() else {
        return Ok(None);
    };
    let version = normalize_version(fields.get("version"))?;

    let connect_via = fields
        .get("connectVia")
        .and_then(Value::as_str)
        .map_or(ConnectVia::Direct, ConnectVia::clamp);

    let Some(start) = optional_position(fields, "start") else {
        return Ok(None);
    };
    let Some(end) = optional_position(fields, "end") else {
        return Ok(None);
    };
    let Some(checkpoints) = checkpoint_list(fields) else {
        return Ok(None);
    };

    let snapshot = RouteSnapshot {
        version,
        connect_via,
        start,
        end,
        checkpoints,
    };
    Ok((!snapshot.is_empty()).then_some(snapshot))
}

fn normalize_version(raw: Option<&Value>) -> Result<u8, ShareError> {
    match raw {
        None | Some(Value::Null) => Ok(CURRENT_VERSION),
        Some(value) if value.as_u64() == Some(u64::from(CURRENT_VERSION)) => Ok(CURRENT_VERSION),
        Some(other) => Err(ShareError::UnsupportedVersion {
            found: other.to_string(),
            supported: CURRENT_VERSION,
        }),
    }
}

/// `Some(None)` for an absent field, `None` for a malformed one.
fn optional_position(fields: &Map<String, Value>, key: &str) -> Option<Option<Position>> {
    match fields.get(key) {
        None | Some(Value::Null) => Some(None),
        Some(value) => parse_position(value).map(Some),
    }
}

fn checkpoint_list(fields: &Map<String, Value>) -> Option<Vec<Position>> {
    let entries = match fields.get("checkpoints") {
        None | Some(Value::Null) => return Some(Vec::new()),
        Some(Value::Array(entries)) => entries,
        Some(_) => return None,
    };
    let checkpoints = entries
        .iter()
        .enumerate()
        .filter_map(|(index, entry)| {
            let parsed = parse_position(entry);
            if parsed.is_none() {
                warn!("dropping invalid checkpoint {index} from shared route");
            }
            parsed
        })
        .collect();
    Some(checkpoints)
}

fn parse_position(value: &Value) -> Option<Position> {
    let lat = value.get("lat").and_then(Value::as_f64)?;
    let lng = value.get("lng").and_then(Value::as_f64)?;
    Position::new(lat, lng).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use serde_json::json;

    fn position(lat: f64, lng: f64) -> Position {
        Position::new(lat, lng).expect("valid position")
    }

    #[fixture]
    fn full_state() -> RouteState {
        RouteState {
            start: Some(position(45.0, -75.0)),
            end: Some(position(45.01, -74.99)),
            checkpoints: vec![position(45.003, -74.997), position(45.006, -74.994)],
            connect_via: ConnectVia::Route,
        }
    }

    #[rstest]
    fn build_snapshot_copies_state(full_state: RouteState) {
        let snapshot = build_snapshot(&full_state).expect("state has positions");
        assert_eq!(snapshot.version, CURRENT_VERSION);
        assert_eq!(snapshot.connect_via, ConnectVia::Route);
        assert_eq!(snapshot.start, full_state.start);
        assert_eq!(snapshot.end, full_state.end);
        assert_eq!(snapshot.checkpoints, full_state.checkpoints);
    }

    #[rstest]
    fn build_snapshot_of_empty_state_is_absent() {
        let state = RouteState {
            connect_via: ConnectVia::Route,
            ..RouteState::default()
        };
        assert!(build_snapshot(&state).is_none());
    }

    #[rstest]
    fn build_snapshot_with_single_checkpoint_is_present() {
        let state = RouteState {
            checkpoints: vec![position(1.0, 2.0)],
            ..RouteState::default()
        };
        assert!(build_snapshot(&state).is_some());
    }

    #[rstest]
    fn waypoints_follow_wire_order(full_state: RouteState) {
        let snapshot = build_snapshot(&full_state).expect("state has positions");
        let waypoints: Vec<_> = snapshot.waypoints().collect();
        assert_eq!(waypoints.first(), full_state.start.as_ref());
        assert_eq!(waypoints.last(), full_state.end.as_ref());
        assert_eq!(waypoints.len(), 4);
    }

    #[rstest]
    fn path_length_sums_legs() {
        let snapshot = RouteSnapshot::new(
            ConnectVia::Direct,
            Some(position(0.0, 0.0)),
            Some(position(2.0, 0.0)),
            vec![position(1.0, 0.0)],
        );
        let expected = 2.0 * position(0.0, 0.0).distance_to(&position(1.0, 0.0));
        assert!((snapshot.path_length_meters() - expected).abs() < 1e-6);
    }

    #[rstest]
    fn normalize_defaults_version_and_mode() {
        let raw = json!({"start": {"lat": 1.0, "lng": 2.0}});
        let snapshot = normalize_snapshot(&raw)
            .expect("supported version")
            .expect("structurally valid");
        assert_eq!(snapshot.version, CURRENT_VERSION);
        assert_eq!(snapshot.connect_via, ConnectVia::Direct);
        assert!(snapshot.checkpoints.is_empty());
        assert!(snapshot.end.is_none());
    }

    #[rstest]
    #[case(json!(2))]
    #[case(json!(0))]
    #[case(json!("1"))]
    fn normalize_rejects_other_versions(#[case] version: Value) {
        let raw = json!({"version": version});
        let err = normalize_snapshot(&raw).expect_err("unsupported version");
        assert!(matches!(
            err,
            ShareError::UnsupportedVersion { supported, .. } if supported == CURRENT_VERSION
        ));
    }

    #[rstest]
    #[case(json!("train"))]
    #[case(json!(7))]
    #[case(json!(null))]
    fn normalize_clamps_connect_via(#[case] mode: Value) {
        let raw = json!({"connectVia": mode, "start": {"lat": 1.0, "lng": 2.0}});
        let snapshot = normalize_snapshot(&raw)
            .expect("supported version")
            .expect("structurally valid");
        assert_eq!(snapshot.connect_via, ConnectVia::Direct);
    }

    #[rstest]
    fn normalize_rounds_positions() {
        let raw = json!({"start": {"lat": 45.123_456_78, "lng": -75.000_000_4}});
        let snapshot = normalize_snapshot(&raw)
            .expect("supported version")
            .expect("structurally valid");
        assert_eq!(snapshot.start, Some(position(45.123_457, -75.0)));
    }

    #[rstest]
    fn normalize_drops_only_invalid_checkpoints() {
        let raw = json!({
            "checkpoints": [
                {"lat": 1.0, "lng": 1.0},
                {"lat": 91.0, "lng": 1.0},
                {"lat": "north", "lng": 1.0},
                "somewhere",
                {"lat": 2.0, "lng": 2.0},
            ],
        });
        let snapshot = normalize_snapshot(&raw)
            .expect("supported version")
            .expect("structurally valid");
        assert_eq!(
            snapshot.checkpoints,
            vec![position(1.0, 1.0), position(2.0, 2.0)]
        );
    }

    #[rstest]
    #[case(json!([1, 2, 3]))]
    #[case(json!("route"))]
    #[case(json!({"start": {"lat": 100.0, "lng": 0.0}}))]
    #[case(json!({"end": {"lng": 0.0}}))]
    #[case(json!({"checkpoints": {"lat": 1.0, "lng": 1.0}}))]
    #[case(json!({}))]
    #[case(json!({"version": 1, "connectVia": "route", "checkpoints": []}))]
    #[case(json!({"checkpoints": [{"lat": 91.0, "lng": 0.0}]}))]
    fn normalize_returns_absent_for_malformed_structure(#[case] raw: Value) {
        assert_eq!(normalize_snapshot(&raw), Ok(None));
    }

    #[rstest]
    fn snapshot_serialises_with_camel_case_fields(full_state: RouteState) {
        let snapshot = build_snapshot(&full_state).expect("state has positions");
        let value = serde_json::to_value(&snapshot).expect("serialise");
        assert_eq!(value["connectVia"], json!("route"));
        assert_eq!(value["start"], json!({"lat": 45.0, "lng": -75.0}));
        assert_eq!(normalize_snapshot(&value), Ok(Some(snapshot)));
    }

    #[rstest]
    fn route_state_deserialises_with_defaults() {
        let state: RouteState =
            serde_json::from_value(json!({"start": {"lat": 1.0, "lng": 2.0}})).expect("valid");
        assert_eq!(state.connect_via, ConnectVia::Direct);
        assert!(state.checkpoints.is_empty());
        assert_eq!(state.start, Some(position(1.0, 2.0)));
    }
}
