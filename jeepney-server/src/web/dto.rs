//! Data transfer objects for web requests and responses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Coordinate, Route, RouteId, Stop, StopId, Suggestion};
use crate::planner::FareBreakdown;

/// Query for trip suggestions.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestQuery {
    pub origin_lat: f64,
    pub origin_lon: f64,
    pub dest_lat: f64,
    pub dest_lon: f64,

    /// Fare category: regular, student, senior or pwd (default regular)
    pub passenger: Option<String>,

    /// Maximum total distance in kilometres
    pub max_distance: Option<f64>,

    /// Maximum fare in pesos
    pub max_fare: Option<f64>,

    /// Maximum duration in minutes
    pub max_duration: Option<f64>,

    /// Adjust durations for the current local hour
    #[serde(default)]
    pub time_of_day: bool,

    /// Departure hour (0-23); overrides `time_of_day`
    pub hour: Option<u32>,

    /// Comma-separated route ids to favour
    pub preferred_routes: Option<String>,

    /// Comma-separated route ids to leave out
    pub avoid_routes: Option<String>,
}

/// Trip suggestions, best first.
#[derive(Debug, Serialize)]
pub struct SuggestResponse {
    /// Version of the dataset the suggestions were computed against
    pub dataset_version: u64,
    pub suggestions: Vec<Suggestion>,
}

/// Query for routes passing near a point.
#[derive(Debug, Deserialize)]
pub struct NearbyRoutesQuery {
    pub lat: f64,
    pub lon: f64,
    /// Search radius in metres
    pub radius: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct NearbyRouteResult {
    pub route_id: RouteId,
    pub route_name: String,
    pub distance_m: f64,
}

/// Query for stops near a point.
#[derive(Debug, Deserialize)]
pub struct NearbyStopsQuery {
    pub latitude: f64,
    pub longitude: f64,
    /// Search radius in kilometres
    pub radius: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct NearbyStopResult {
    pub stop_id: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub distance_km: f64,
}

/// Query for browsing routes, optionally near a point.
#[derive(Debug, Default, Deserialize)]
pub struct RoutesQuery {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Search radius in kilometres
    pub radius: Option<f64>,
}

/// A stop as listed by `/stops`.
#[derive(Debug, Serialize)]
pub struct StopResult {
    pub stop_id: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl From<&Stop> for StopResult {
    fn from(stop: &Stop) -> Self {
        Self {
            stop_id: stop.id.as_str().to_string(),
            name: stop.name.clone(),
            latitude: stop.location.latitude(),
            longitude: stop.location.longitude(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RouteShapeQuery {
    pub route_id: Option<String>,
}

/// A route's polyline.
#[derive(Debug, Serialize)]
pub struct RouteShapeResponse {
    pub shape: Vec<Coordinate>,
}

/// A route with its stop list.
#[derive(Debug, Serialize)]
pub struct RouteDetailsResponse {
    pub route_id: RouteId,
    pub route_name: String,
    pub short_name: Option<String>,
    pub long_name: Option<String>,
    pub shape_points: usize,
    pub stops: Vec<RouteStopResult>,
}

#[derive(Debug, Serialize)]
pub struct RouteStopResult {
    pub stop_id: String,
    /// `None` when the stop is not in the dataset's stop table
    pub stop_name: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub sequence: u32,
    pub distance_to_next_m: Option<f64>,
}

/// Query for a fare, either for a distance or between two stops.
#[derive(Debug, Default, Deserialize)]
pub struct FareQuery {
    /// Takes precedence over the stop pair when given
    pub distance_km: Option<f64>,
    pub origin_id: Option<String>,
    pub destination_id: Option<String>,
    pub passenger: Option<String>,
}

/// A fare, with the route ridden when it was priced between two stops.
#[derive(Debug, Serialize)]
pub struct FareResponse {
    #[serde(flatten)]
    pub breakdown: FareBreakdown,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route_id: Option<RouteId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route_name: Option<String>,
}

/// Loaded dataset status.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub loaded: bool,
    pub dataset_version: Option<u64>,
    pub loaded_at: Option<DateTime<Utc>>,
    pub stops: usize,
    pub routes: usize,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

impl RouteDetailsResponse {
    /// Create from a domain route, resolving its stops through `lookup`.
    pub fn from_route<'a>(route: &Route, lookup: impl Fn(&StopId) -> Option<&'a Stop>) -> Self {
        let stops = route
            .stops()
            .iter()
            .map(|s| {
                let stop = lookup(&s.stop_id);
                RouteStopResult {
                    stop_id: s.stop_id.as_str().to_string(),
                    stop_name: stop.map(|st| st.name.clone()),
                    latitude: stop.map(|st| st.location.latitude()),
                    longitude: stop.map(|st| st.location.longitude()),
                    sequence: s.sequence,
                    distance_to_next_m: s.distance_to_next_m,
                }
            })
            .collect();

        Self {
            route_id: route.id.clone(),
            route_name: route.display_name().to_string(),
            short_name: route.short_name.clone(),
            long_name: route.long_name.clone(),
            shape_points: route.shape().len(),
            stops,
        }
    }
}

/// Split a comma-separated list of route ids, ignoring blanks.
pub fn parse_route_list(list: Option<&str>) -> Vec<RouteId> {
    list.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(RouteId::new)
        .collect()
}
