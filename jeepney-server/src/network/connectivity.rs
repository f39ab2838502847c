//! Stop → routes connectivity, derived from trips and stop times.
//!
//! Any transfer between two routes has to happen at a stop both of them
//! serve. Indexing the routes per stop turns "which routes can I catch here?"
//! into a single lookup.

use std::collections::{BTreeSet, HashMap};

use crate::domain::{RouteId, StopId};

static NO_ROUTES: BTreeSet<RouteId> = BTreeSet::new();

/// Map from each stop to the set of routes serving it.
///
/// Built in one pass over the stop-time records and never mutated afterwards;
/// a dataset refresh builds a new index. Sets are ordered, so rebuilding from
/// the same records (in any order) yields an identical index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StopRouteIndex {
    routes_by_stop: HashMap<StopId, BTreeSet<RouteId>>,
}

impl StopRouteIndex {
    /// Build the index.
    ///
    /// * `trips` - `(trip_id, route_id)` pairs
    /// * `stop_times` - `(trip_id, stop_id)` pairs
    ///
    /// Stop times whose trip is unknown are ignored.
    pub fn build<'a>(
        trips: impl IntoIterator<Item = (&'a str, &'a RouteId)>,
        stop_times: impl IntoIterator<Item = (&'a str, &'a StopId)>,
    ) -> Self {
        let route_of_trip: HashMap<&str, &RouteId> = trips.into_iter().collect();

        let mut routes_by_stop: HashMap<StopId, BTreeSet<RouteId>> = HashMap::new();
        for (trip_id, stop_id) in stop_times {
            let Some(route) = route_of_trip.get(trip_id) else {
                continue;
            };
            routes_by_stop
                .entry(stop_id.clone())
                .or_default()
                .insert((*route).clone());
        }

        Self { routes_by_stop }
    }

    /// Routes serving a stop, in id order. Empty for unserved stops.
    pub fn routes_serving(&self, stop: &StopId) -> &BTreeSet<RouteId> {
        self.routes_by_stop.get(stop).unwrap_or(&NO_ROUTES)
    }

    /// Whether `route` serves `stop`.
    pub fn serves(&self, stop: &StopId, route: &RouteId) -> bool {
        self.routes_serving(stop).contains(route)
    }

    /// Whether a stop is served by both routes.
    pub fn served_by_both(&self, stop: &StopId, first: &RouteId, second: &RouteId) -> bool {
        let routes = self.routes_serving(stop);
        routes.contains(first) && routes.contains(second)
    }

    /// Number of stops served by at least one route.
    pub fn served_stop_count(&self) -> usize {
        self.routes_by_stop.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(trips: &[(&str, &str)], stop_times: &[(&str, &str)]) -> StopRouteIndex {
        let trips: Vec<(String, RouteId)> = trips
            .iter()
            .map(|(t, r)| (t.to_string(), RouteId::new(*r)))
            .collect();
        let stop_times: Vec<(String, StopId)> = stop_times
            .iter()
            .map(|(t, s)| (t.to_string(), StopId::new(*s)))
            .collect();

        StopRouteIndex::build(
            trips.iter().map(|(t, r)| (t.as_str(), r)),
            stop_times.iter().map(|(t, s)| (t.as_str(), s)),
        )
    }

    #[test]
    fn maps_stops_to_routes() {
        let index = build(
            &[("t1", "X"), ("t2", "Y"), ("t3", "X")],
            &[
                ("t1", "A"),
                ("t1", "C"),
                ("t2", "C"),
                ("t2", "B"),
                ("t3", "A"),
            ],
        );

        let a: Vec<_> = index.routes_serving(&StopId::new("A")).iter().collect();
        assert_eq!(a, vec![&RouteId::new("X")]);

        let c: Vec<_> = index.routes_serving(&StopId::new("C")).iter().collect();
        assert_eq!(c, vec![&RouteId::new("X"), &RouteId::new("Y")]);

        assert!(index.served_by_both(&StopId::new("C"), &RouteId::new("X"), &RouteId::new("Y")));
        assert!(!index.served_by_both(&StopId::new("A"), &RouteId::new("X"), &RouteId::new("Y")));
        assert_eq!(index.served_stop_count(), 3);
    }

    #[test]
    fn skips_unknown_trips() {
        let index = build(&[("t1", "X")], &[("t1", "A"), ("ghost", "B")]);
        assert!(index.routes_serving(&StopId::new("B")).is_empty());
        assert!(index.serves(&StopId::new("A"), &RouteId::new("X")));
    }

    #[test]
    fn rebuild_is_order_independent() {
        let forward = build(
            &[("t1", "X"), ("t2", "Y")],
            &[("t1", "A"), ("t2", "A"), ("t2", "B")],
        );
        let reversed = build(
            &[("t2", "Y"), ("t1", "X")],
            &[("t2", "B"), ("t2", "A"), ("t1", "A")],
        );
        assert_eq!(forward, reversed);
    }
}
