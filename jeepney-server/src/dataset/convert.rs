//! Conversion from dataset records to a network snapshot.
//!
//! Data-quality defects (bad coordinates, dangling references, unordered stop
//! lists) are skipped with a warning rather than failing the whole load.

use std::collections::{HashMap, HashSet};

use tracing::{info, warn};

use crate::domain::{Coordinate, DomainError, Route, RouteId, RouteStop, Stop, StopId};
use crate::network::{NetworkSnapshot, RouteShapeIndex, StopRouteIndex};

use super::error::DatasetError;
use super::types::{Dataset, ShapePointRecord, StopTimeRecord, TripRecord};

/// Build a snapshot carrying `version` from a parsed dataset.
///
/// Fails only when no route survives conversion.
pub fn build_snapshot(dataset: &Dataset, version: u64) -> Result<NetworkSnapshot, DatasetError> {
    let stops = convert_stops(dataset);
    let known_stops: HashSet<&str> = stops.iter().map(|s| s.id.as_str()).collect();
    let known_routes: HashSet<&str> = dataset.routes.iter().map(|r| r.route_id.as_str()).collect();

    let shapes = shapes_by_id(&dataset.shapes);
    let stop_times = stop_times_by_trip(&dataset.stop_times);

    let mut first_trip: HashMap<&str, &TripRecord> = HashMap::new();
    for trip in &dataset.trips {
        if !known_routes.contains(trip.route_id.as_str()) {
            warn!(trip = %trip.trip_id, route = %trip.route_id, "skipping trip of unknown route");
            continue;
        }
        first_trip.entry(trip.route_id.as_str()).or_insert(trip);
    }

    let mut routes = Vec::with_capacity(dataset.routes.len());
    for record in &dataset.routes {
        let id = RouteId::new(&record.route_id);
        let trip = first_trip.get(record.route_id.as_str());

        let shape = trip
            .and_then(|t| t.shape_id.as_deref())
            .and_then(|shape_id| shapes.get(shape_id))
            .cloned()
            .unwrap_or_default();
        if shape.is_empty() {
            warn!(route = %id, "route has no shape; it can only be matched through its stops");
        }

        let route_stops = trip
            .and_then(|t| stop_times.get(t.trip_id.as_str()))
            .map(|times| route_stops(&id, times, &known_stops))
            .unwrap_or_default();

        match Route::new(
            id,
            record.route_short_name.clone(),
            record.route_long_name.clone(),
            shape,
            route_stops,
        ) {
            Ok(route) => routes.push(route),
            Err(e) => warn!(error = %e, "skipping route"),
        }
    }

    if routes.is_empty() {
        return Err(DatasetError::Empty);
    }

    let trip_routes: Vec<(&str, RouteId)> = dataset
        .trips
        .iter()
        .filter(|t| known_routes.contains(t.route_id.as_str()))
        .map(|t| (t.trip_id.as_str(), RouteId::new(&t.route_id)))
        .collect();
    let served: Vec<(&str, StopId)> = dataset
        .stop_times
        .iter()
        .filter(|st| known_stops.contains(st.stop_id.as_str()))
        .map(|st| (st.trip_id.as_str(), StopId::new(&st.stop_id)))
        .collect();
    let connectivity = StopRouteIndex::build(
        trip_routes.iter().map(|(trip, route)| (*trip, route)),
        served.iter().map(|(trip, stop)| (*trip, stop)),
    );

    info!(
        version,
        stops = stops.len(),
        routes = routes.len(),
        served_stops = connectivity.served_stop_count(),
        "built network snapshot"
    );

    Ok(NetworkSnapshot::new(
        version,
        stops,
        RouteShapeIndex::from_routes(routes),
        connectivity,
    ))
}

fn convert_stops(dataset: &Dataset) -> Vec<Stop> {
    dataset
        .stops
        .iter()
        .filter_map(|r| match Coordinate::new(r.stop_lat, r.stop_lon) {
            Ok(location) => Some(Stop::new(StopId::new(&r.stop_id), &r.stop_name, location)),
            Err(e) => {
                warn!(stop = %r.stop_id, error = %e, "skipping stop");
                None
            }
        })
        .collect()
}

/// Shape polylines keyed by shape id, ordered by point sequence.
fn shapes_by_id(points: &[ShapePointRecord]) -> HashMap<&str, Vec<Coordinate>> {
    let mut grouped: HashMap<&str, Vec<&ShapePointRecord>> = HashMap::new();
    for point in points {
        grouped.entry(point.shape_id.as_str()).or_default().push(point);
    }

    grouped
        .into_iter()
        .map(|(shape_id, mut points)| {
            points.sort_by_key(|p| p.shape_pt_sequence);
            let polyline = points
                .into_iter()
                .filter_map(|p| match Coordinate::new(p.shape_pt_lat, p.shape_pt_lon) {
                    Ok(c) => Some(c),
                    Err(e) => {
                        warn!(shape = shape_id, error = %e, "skipping shape point");
                        None
                    }
                })
                .collect();
            (shape_id, polyline)
        })
        .collect()
}

/// Stop times keyed by trip id, ordered by stop sequence.
fn stop_times_by_trip(stop_times: &[StopTimeRecord]) -> HashMap<&str, Vec<&StopTimeRecord>> {
    let mut grouped: HashMap<&str, Vec<&StopTimeRecord>> = HashMap::new();
    for st in stop_times {
        grouped.entry(st.trip_id.as_str()).or_default().push(st);
    }
    for times in grouped.values_mut() {
        times.sort_by_key(|st| st.stop_sequence);
    }
    grouped
}

/// A route's stop list from its first trip's (sorted) stop times.
///
/// Hop distances come from consecutive `shape_dist_traveled` values when both
/// are present, non-decreasing and their difference is finite.
fn route_stops(
    route: &RouteId,
    times: &[&StopTimeRecord],
    known_stops: &HashSet<&str>,
) -> Vec<RouteStop> {
    let mut kept: Vec<&StopTimeRecord> = Vec::with_capacity(times.len());
    for &st in times {
        if !known_stops.contains(st.stop_id.as_str()) {
            let e = DomainError::UnknownStop {
                route: route.clone(),
                stop: st.stop_id.clone(),
            };
            warn!(error = %e, "skipping stop time");
            continue;
        }
        if kept.last().is_some_and(|prev| prev.stop_sequence == st.stop_sequence) {
            warn!(route = %route, sequence = st.stop_sequence, "skipping duplicate stop sequence");
            continue;
        }
        kept.push(st);
    }

    kept.iter()
        .enumerate()
        .map(|(i, st)| {
            let distance_to_next_m = kept.get(i + 1).and_then(|next| {
                match (st.shape_dist_traveled, next.shape_dist_traveled) {
                    (Some(here), Some(there)) if there >= here => {
                        Some(there - here).filter(|hop| hop.is_finite())
                    }
                    _ => None,
                }
            });
            RouteStop {
                stop_id: StopId::new(&st.stop_id),
                sequence: st.stop_sequence,
                distance_to_next_m,
            }
        })
        .collect()
}
