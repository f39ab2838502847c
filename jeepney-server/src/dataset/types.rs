//! Wire format of a converted GTFS feed.
//!
//! A dataset is a single JSON document holding the GTFS tables the planner
//! needs, one array per table, with GTFS field names. Unknown fields are
//! ignored so that feeds carrying extra columns still load.

use serde::{Deserialize, Serialize};

/// A whole feed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub routes: Vec<RouteRecord>,
    #[serde(default)]
    pub stops: Vec<StopRecord>,
    #[serde(default)]
    pub trips: Vec<TripRecord>,
    #[serde(default)]
    pub stop_times: Vec<StopTimeRecord>,
    #[serde(default)]
    pub shapes: Vec<ShapePointRecord>,
}

/// Row of `routes.txt`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteRecord {
    pub route_id: String,
    #[serde(default)]
    pub route_short_name: Option<String>,
    #[serde(default)]
    pub route_long_name: Option<String>,
}

/// Row of `stops.txt`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StopRecord {
    pub stop_id: String,
    #[serde(default)]
    pub stop_name: String,
    pub stop_lat: f64,
    pub stop_lon: f64,
}

/// Row of `trips.txt`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripRecord {
    pub trip_id: String,
    pub route_id: String,
    #[serde(default)]
    pub shape_id: Option<String>,
}

/// Row of `stop_times.txt`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StopTimeRecord {
    pub trip_id: String,
    pub stop_id: String,
    pub stop_sequence: u32,
    /// Distance along the trip's shape, in metres.
    #[serde(default)]
    pub shape_dist_traveled: Option<f64>,
}

/// Row of `shapes.txt`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapePointRecord {
    pub shape_id: String,
    pub shape_pt_lat: f64,
    pub shape_pt_lon: f64,
    pub shape_pt_sequence: u32,
}
