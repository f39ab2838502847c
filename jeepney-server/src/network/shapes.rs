//! Route shape index: route id → polyline and stop sequence.

use std::collections::BTreeMap;

use crate::domain::{Coordinate, Route, RouteId, RouteStop};

/// Immutable lookup of every route's geometry.
///
/// Routes are kept in id order so that iteration, and everything the matcher
/// derives from it, is deterministic.
#[derive(Debug, Clone, Default)]
pub struct RouteShapeIndex {
    routes: BTreeMap<RouteId, Route>,
}

impl RouteShapeIndex {
    /// Build from the full set of routes. Later duplicates replace earlier ones.
    pub fn from_routes(routes: impl IntoIterator<Item = Route>) -> Self {
        let routes = routes.into_iter().map(|r| (r.id.clone(), r)).collect();
        Self { routes }
    }

    /// The route's polyline; empty for unknown routes.
    pub fn shape_of(&self, route: &RouteId) -> &[Coordinate] {
        self.routes.get(route).map(Route::shape).unwrap_or(&[])
    }

    /// The route's ordered stops; empty for unknown routes.
    pub fn stops_of(&self, route: &RouteId) -> &[RouteStop] {
        self.routes.get(route).map(Route::stops).unwrap_or(&[])
    }

    pub fn route(&self, route: &RouteId) -> Option<&Route> {
        self.routes.get(route)
    }

    /// All routes, in ascending id order.
    pub fn routes(&self) -> impl Iterator<Item = &Route> {
        self.routes.values()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::StopId;

    fn coord(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon).unwrap()
    }

    fn route(id: &str, shape: Vec<Coordinate>, stops: &[&str]) -> Route {
        let stops = stops
            .iter()
            .enumerate()
            .map(|(i, s)| RouteStop {
                stop_id: StopId::new(*s),
                sequence: i as u32 + 1,
                distance_to_next_m: None,
            })
            .collect();
        Route::new(RouteId::new(id), None, None, shape, stops).unwrap()
    }

    #[test]
    fn lookups() {
        let index = RouteShapeIndex::from_routes(vec![
            route("b", vec![coord(7.0, 125.0), coord(7.1, 125.1)], &["s1", "s2"]),
            route("a", vec![], &[]),
        ]);

        assert_eq!(index.len(), 2);
        assert_eq!(index.shape_of(&RouteId::new("b")).len(), 2);
        assert_eq!(index.stops_of(&RouteId::new("b"))[1].stop_id, StopId::new("s2"));
        assert!(index.shape_of(&RouteId::new("a")).is_empty());
    }

    #[test]
    fn unknown_route_is_empty() {
        let index = RouteShapeIndex::default();
        assert!(index.is_empty());
        assert!(index.shape_of(&RouteId::new("nope")).is_empty());
        assert!(index.stops_of(&RouteId::new("nope")).is_empty());
        assert!(index.route(&RouteId::new("nope")).is_none());
    }

    #[test]
    fn iterates_in_id_order() {
        let index = RouteShapeIndex::from_routes(vec![
            route("route_3", vec![], &[]),
            route("route_1", vec![], &[]),
            route("route_2", vec![], &[]),
        ]);
        let ids: Vec<_> = index.routes().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["route_1", "route_2", "route_3"]);
    }
}
