//! Trip suggestions produced by the matcher.
//!
//! A [`Suggestion`] is a proper sum type: every variant carries exactly the
//! fields that make sense for it. On the wire it is an internally tagged JSON
//! object (`{"type": "walk" | "direct" | "transfer" | "none", ...}`).

use serde::{Deserialize, Serialize};

use super::{Coordinate, Fare, RouteId, StopId};

/// Where the rider gets on or off a route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutePoint {
    /// The stop used, for stop-based matches.
    pub stop_id: Option<StopId>,

    /// Stop name, for stop-based matches.
    pub stop_name: Option<String>,

    /// The boarding/alighting location (stop or nearest shape point).
    pub location: Coordinate,

    /// Index of the point on the route shape, for polyline matches.
    pub shape_index: Option<usize>,

    /// Walking distance between the rider's raw location and this point.
    pub walk_distance_m: f64,
}

/// Cost estimates shared by the riding variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripEstimate {
    /// Fare for the rider's passenger category.
    pub fare: Fare,

    /// Estimated riding time in minutes.
    pub duration_minutes: f64,

    /// Meters from the raw origin to the boarding point.
    pub entry_distance_m: f64,

    /// Meters from the alighting point to the raw destination.
    pub exit_distance_m: f64,

    /// Entry plus exit walking distance.
    pub total_walking_m: f64,

    /// Walking plus riding distance.
    pub total_distance_m: f64,
}

/// Destination reachable entirely on foot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalkSuggestion {
    pub distance_m: f64,
    pub duration_minutes: f64,
}

/// One route connects origin to destination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectSuggestion {
    pub route_id: RouteId,
    pub route_name: String,
    pub board: RoutePoint,
    pub alight: RoutePoint,
    pub ride_distance_m: f64,
    pub estimate: TripEstimate,
}

/// A stop served by both legs of a transfer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferStop {
    pub stop_id: StopId,
    pub stop_name: String,
    pub location: Coordinate,
}

/// Two routes joined at a shared stop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferSuggestion {
    pub first_route_id: RouteId,
    pub first_route_name: String,
    pub second_route_id: RouteId,
    pub second_route_name: String,
    pub transfer_stop: TransferStop,
    pub board: RoutePoint,
    pub alight: RoutePoint,
    pub first_leg_distance_m: f64,
    pub second_leg_distance_m: f64,
    pub estimate: TripEstimate,
}

/// A candidate way to make the trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Suggestion {
    Walk(WalkSuggestion),
    Direct(DirectSuggestion),
    Transfer(TransferSuggestion),
    /// Nothing feasible within the search radius.
    #[serde(rename = "none")]
    NoRoute { reason: String },
}

impl Suggestion {
    pub fn no_route(reason: impl Into<String>) -> Self {
        Suggestion::NoRoute {
            reason: reason.into(),
        }
    }

    /// Total walking distance: the walk itself, or entry plus exit.
    pub fn total_walking_m(&self) -> f64 {
        match self {
            Suggestion::Walk(w) => w.distance_m,
            Suggestion::Direct(d) => d.estimate.total_walking_m,
            Suggestion::Transfer(t) => t.estimate.total_walking_m,
            Suggestion::NoRoute { .. } => f64::INFINITY,
        }
    }

    /// Walking plus riding distance.
    pub fn total_distance_m(&self) -> f64 {
        match self {
            Suggestion::Walk(w) => w.distance_m,
            Suggestion::Direct(d) => d.estimate.total_distance_m,
            Suggestion::Transfer(t) => t.estimate.total_distance_m,
            Suggestion::NoRoute { .. } => f64::INFINITY,
        }
    }

    pub fn estimate(&self) -> Option<&TripEstimate> {
        match self {
            Suggestion::Direct(d) => Some(&d.estimate),
            Suggestion::Transfer(t) => Some(&t.estimate),
            Suggestion::Walk(_) | Suggestion::NoRoute { .. } => None,
        }
    }

    /// Routes ridden, in riding order.
    pub fn route_ids(&self) -> Vec<&RouteId> {
        match self {
            Suggestion::Direct(d) => vec![&d.route_id],
            Suggestion::Transfer(t) => vec![&t.first_route_id, &t.second_route_id],
            Suggestion::Walk(_) | Suggestion::NoRoute { .. } => Vec::new(),
        }
    }

    pub fn is_no_route(&self) -> bool {
        matches!(self, Suggestion::NoRoute { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(lat: f64, lon: f64, walk: f64) -> RoutePoint {
        RoutePoint {
            stop_id: None,
            stop_name: None,
            location: Coordinate::new(lat, lon).unwrap(),
            shape_index: Some(0),
            walk_distance_m: walk,
        }
    }

    fn direct() -> Suggestion {
        Suggestion::Direct(DirectSuggestion {
            route_id: RouteId::new("route_1"),
            route_name: "Route 1".into(),
            board: point(7.0625, 125.5, 10.0),
            alight: point(7.125, 125.75, 20.0),
            ride_distance_m: 330.0,
            estimate: TripEstimate {
                fare: Fare::from_centavos(1300),
                duration_minutes: 1.25,
                entry_distance_m: 10.0,
                exit_distance_m: 20.0,
                total_walking_m: 30.0,
                total_distance_m: 360.0,
            },
        })
    }

    #[test]
    fn tagged_json() {
        let json = serde_json::to_value(direct()).unwrap();
        assert_eq!(json["type"], "direct");
        assert_eq!(json["route_id"], "route_1");
        assert_eq!(json["estimate"]["fare"], 13.0);

        let walk = serde_json::to_value(Suggestion::Walk(WalkSuggestion {
            distance_m: 120.0,
            duration_minutes: 1.4,
        }))
        .unwrap();
        assert_eq!(walk["type"], "walk");
        assert_eq!(walk["distance_m"], 120.0);

        let none = serde_json::to_value(Suggestion::no_route("nothing nearby")).unwrap();
        assert_eq!(none["type"], "none");
        assert_eq!(none["reason"], "nothing nearby");
    }

    #[test]
    fn json_roundtrip_is_lossless() {
        let original = direct();
        let json = serde_json::to_string(&original).unwrap();
        let back: Suggestion = serde_json::from_str(&json).unwrap();
        assert_eq!(back, original);
    }

    #[test]
    fn accessors() {
        let d = direct();
        assert_eq!(d.total_walking_m(), 30.0);
        assert_eq!(d.total_distance_m(), 360.0);
        assert_eq!(d.route_ids(), vec![&RouteId::new("route_1")]);
        assert!(d.estimate().is_some());
        assert!(!d.is_no_route());
        assert!(Suggestion::no_route("x").is_no_route());
    }
}
