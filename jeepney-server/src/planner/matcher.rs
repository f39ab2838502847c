//! Trip matching: from an origin and destination to candidate suggestions.
//!
//! Matching runs against a frozen [`NetworkSnapshot`] and never mutates it,
//! so any number of requests may match concurrently against one snapshot.
//!
//! Candidates come from three places, all computed before ranking:
//! - a walk-only suggestion when the destination is close enough,
//! - direct routes, found both through stops near each end and through route
//!   shapes passing near each end,
//! - when no direct route exists, a single transfer at a stop served by a
//!   route from each end.

use std::collections::BTreeSet;

use tracing::debug;

use crate::domain::{
    Coordinate, DirectSuggestion, Fare, InvalidCoordinate, Route, RouteId, RoutePoint, Stop,
    StopId, Suggestion, TransferStop, TransferSuggestion, TripEstimate, WalkSuggestion,
};
use crate::geometry::{distance_meters, nearest_point, path_length_meters};
use crate::network::{IndexUnavailable, NearbyStop, NetworkSnapshot};

use super::config::MatchPolicy;
use super::options::SuggestOptions;
use super::rank::rank_suggestions;

/// Error from trip matching.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MatchError {
    /// Origin or destination out of range
    #[error(transparent)]
    InvalidCoordinate(#[from] InvalidCoordinate),

    /// No dataset has been loaded yet
    #[error(transparent)]
    IndexUnavailable(#[from] IndexUnavailable),
}

/// Request for trip suggestions.
#[derive(Debug, Clone, PartialEq)]
pub struct SuggestRequest {
    pub origin: Coordinate,
    pub destination: Coordinate,
    pub options: SuggestOptions,
}

impl SuggestRequest {
    pub fn new(origin: Coordinate, destination: Coordinate, options: SuggestOptions) -> Self {
        Self {
            origin,
            destination,
            options,
        }
    }

    /// Build a request from raw degrees, rejecting out-of-range coordinates.
    pub fn from_degrees(
        origin_lat: f64,
        origin_lon: f64,
        dest_lat: f64,
        dest_lon: f64,
        options: SuggestOptions,
    ) -> Result<Self, MatchError> {
        let origin = Coordinate::new(origin_lat, origin_lon)?;
        let destination = Coordinate::new(dest_lat, dest_lon)?;
        Ok(Self::new(origin, destination, options))
    }
}

/// A ride between two stops on one route.
#[derive(Debug, Clone, Copy)]
pub struct StopRide<'a> {
    pub route: &'a Route,
    pub distance_m: f64,
}

/// Matches trips against one network snapshot.
pub struct TripMatcher<'a> {
    network: &'a NetworkSnapshot,
    policy: &'a MatchPolicy,
}

impl<'a> TripMatcher<'a> {
    pub fn new(network: &'a NetworkSnapshot, policy: &'a MatchPolicy) -> Self {
        Self { network, policy }
    }

    /// Suggest ways to make the trip, best first.
    ///
    /// Never fails: when nothing is feasible the result is a single `none`
    /// suggestion. Identical requests against the same snapshot always give
    /// the same list in the same order.
    pub fn suggest(&self, request: &SuggestRequest) -> Vec<Suggestion> {
        let SuggestRequest {
            origin,
            destination,
            options,
        } = request;

        let mut suggestions = Vec::new();

        let walk_m = distance_meters(*origin, *destination);
        if walk_m <= self.policy.walk_threshold_m {
            suggestions.push(Suggestion::Walk(WalkSuggestion {
                distance_m: walk_m,
                duration_minutes: self.policy.walking_minutes(walk_m),
            }));
        }

        let radius = self.policy.stop_search_radius_m;
        let origin_stops = self.network.stops_near(*origin, radius);
        let dest_stops = self.network.stops_near(*destination, radius);

        let mut riding = self.direct_via_stops(&origin_stops, &dest_stops, options);
        let matched: BTreeSet<RouteId> = riding
            .iter()
            .flat_map(|s| s.route_ids().into_iter().cloned())
            .collect();
        riding.extend(self.direct_via_shapes(*origin, *destination, options, &matched));

        if riding.is_empty() {
            riding.extend(self.transfer(&origin_stops, &dest_stops, options));
        }

        let found = riding.len();
        riding.retain(|s| options.admits(s));

        debug!(
            origin = %origin,
            destination = %destination,
            origin_stops = origin_stops.len(),
            dest_stops = dest_stops.len(),
            found,
            kept = riding.len(),
            walk = !suggestions.is_empty(),
            "matched trip"
        );

        suggestions.extend(riding);

        if suggestions.is_empty() {
            let reason = if found > 0 {
                "No route satisfies the requested limits.".to_string()
            } else {
                format!(
                    "No route found (direct or with one transfer) within {radius:.0} m of origin and destination."
                )
            };
            return vec![Suggestion::no_route(reason)];
        }

        rank_suggestions(suggestions, options)
    }

    /// The shortest ride from stop `from` to stop `to` on a route that calls
    /// at both, in that order.
    ///
    /// Equal distances keep route id order. `None` when either stop is
    /// unknown or no single route connects them.
    pub fn ride_between(&self, from: &StopId, to: &StopId) -> Option<StopRide<'a>> {
        let network = self.network;
        let (from_stop, to_stop) = (network.stop(from)?, network.stop(to)?);

        network
            .shapes()
            .routes()
            .filter(|route| match (route.stop_position(from), route.stop_position(to)) {
                (Some(i), Some(j)) => i < j,
                _ => false,
            })
            .map(|route| StopRide {
                route,
                distance_m: self.ride_distance(route, from_stop, to_stop),
            })
            .min_by(|a, b| a.distance_m.total_cmp(&b.distance_m))
    }

    /// Direct routes serving a stop near each end.
    ///
    /// For each route (in id order), the nearest usable origin stop is paired
    /// with the nearest usable destination stop.
    fn direct_via_stops(
        &self,
        origin_stops: &[NearbyStop<'_>],
        dest_stops: &[NearbyStop<'_>],
        options: &SuggestOptions,
    ) -> Vec<Suggestion> {
        let connectivity = self.network.connectivity();

        let origin_routes: BTreeSet<&RouteId> = origin_stops
            .iter()
            .flat_map(|n| connectivity.routes_serving(&n.stop.id))
            .collect();
        let dest_routes: BTreeSet<&RouteId> = dest_stops
            .iter()
            .flat_map(|n| connectivity.routes_serving(&n.stop.id))
            .collect();

        let mut suggestions = Vec::new();

        for route_id in origin_routes.intersection(&dest_routes) {
            if options.avoids(route_id) {
                continue;
            }
            let Some(route) = self.network.shapes().route(route_id) else {
                debug!(route = %route_id, "route serves stops but is not in the shape index");
                continue;
            };

            let pair = origin_stops
                .iter()
                .filter(|o| connectivity.serves(&o.stop.id, route_id))
                .find_map(|o| {
                    dest_stops
                        .iter()
                        .filter(|d| connectivity.serves(&d.stop.id, route_id))
                        .find(|d| {
                            d.stop.id != o.stop.id && self.heads_forward(route, o.stop, d.stop)
                        })
                        .map(|d| (o, d))
                });
            let Some((board, alight)) = pair else {
                continue;
            };

            let ride_m = self.ride_distance(route, board.stop, alight.stop);
            suggestions.push(Suggestion::Direct(DirectSuggestion {
                route_id: route.id.clone(),
                route_name: route.display_name().to_string(),
                board: stop_point(board),
                alight: stop_point(alight),
                ride_distance_m: ride_m,
                estimate: self.estimate(&[ride_m], board.distance_m, alight.distance_m, options),
            }));
        }

        suggestions
    }

    /// Direct routes whose shape passes within the match threshold of both ends.
    fn direct_via_shapes(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        options: &SuggestOptions,
        already_matched: &BTreeSet<RouteId>,
    ) -> Vec<Suggestion> {
        let threshold = self.policy.match_threshold_m;
        let mut suggestions = Vec::new();

        for route in self.network.shapes().routes() {
            if already_matched.contains(&route.id) || options.avoids(&route.id) {
                continue;
            }

            let shape = route.shape();
            let nearest = (nearest_point(origin, shape), nearest_point(destination, shape));
            let (entry, exit) = match nearest {
                (Ok(entry), Ok(exit)) => (entry, exit),
                (Err(e), _) | (_, Err(e)) => {
                    debug!(route = %route.id, error = %e, "skipping route without geometry");
                    continue;
                }
            };

            if entry.distance_m > threshold || exit.distance_m > threshold {
                continue;
            }
            if self.policy.enforce_direction && exit.index < entry.index {
                continue;
            }

            let (lo, hi) = (entry.index.min(exit.index), entry.index.max(exit.index));
            let ride_m = path_length_meters(&shape[lo..=hi]);

            suggestions.push(Suggestion::Direct(DirectSuggestion {
                route_id: route.id.clone(),
                route_name: route.display_name().to_string(),
                board: RoutePoint {
                    stop_id: None,
                    stop_name: None,
                    location: entry.point,
                    shape_index: Some(entry.index),
                    walk_distance_m: entry.distance_m,
                },
                alight: RoutePoint {
                    stop_id: None,
                    stop_name: None,
                    location: exit.point,
                    shape_index: Some(exit.index),
                    walk_distance_m: exit.distance_m,
                },
                ride_distance_m: ride_m,
                estimate: self.estimate(&[ride_m], entry.distance_m, exit.distance_m, options),
            }));
        }

        suggestions
    }

    /// One-transfer trip: the first shared stop found, in a fixed order.
    ///
    /// Origin stops nearest first, then destination stops nearest first, then
    /// route pairs in id order, then candidate transfer stops in dataset order.
    fn transfer(
        &self,
        origin_stops: &[NearbyStop<'_>],
        dest_stops: &[NearbyStop<'_>],
        options: &SuggestOptions,
    ) -> Option<Suggestion> {
        let connectivity = self.network.connectivity();
        let shapes = self.network.shapes();

        for board in origin_stops {
            for alight in dest_stops {
                for first_id in connectivity.routes_serving(&board.stop.id) {
                    if options.avoids(first_id) {
                        continue;
                    }
                    let Some(first) = shapes.route(first_id) else {
                        continue;
                    };

                    for second_id in connectivity.routes_serving(&alight.stop.id) {
                        if second_id == first_id || options.avoids(second_id) {
                            continue;
                        }
                        let Some(second) = shapes.route(second_id) else {
                            continue;
                        };

                        let shared = self.network.stops().iter().find(|stop| {
                            connectivity.served_by_both(&stop.id, first_id, second_id)
                                && self.heads_forward(first, board.stop, stop)
                                && self.heads_forward(second, stop, alight.stop)
                        });

                        if let Some(shared) = shared {
                            return Some(self.transfer_suggestion(
                                first, second, shared, board, alight, options,
                            ));
                        }
                    }
                }
            }
        }

        None
    }

    fn transfer_suggestion(
        &self,
        first: &Route,
        second: &Route,
        shared: &Stop,
        board: &NearbyStop<'_>,
        alight: &NearbyStop<'_>,
        options: &SuggestOptions,
    ) -> Suggestion {
        let first_leg_m = self.ride_distance(first, board.stop, shared);
        let second_leg_m = self.ride_distance(second, shared, alight.stop);

        Suggestion::Transfer(TransferSuggestion {
            first_route_id: first.id.clone(),
            first_route_name: first.display_name().to_string(),
            second_route_id: second.id.clone(),
            second_route_name: second.display_name().to_string(),
            transfer_stop: TransferStop {
                stop_id: shared.id.clone(),
                stop_name: shared.name.clone(),
                location: shared.location,
            },
            board: stop_point(board),
            alight: stop_point(alight),
            first_leg_distance_m: first_leg_m,
            second_leg_distance_m: second_leg_m,
            estimate: self.estimate(
                &[first_leg_m, second_leg_m],
                board.distance_m,
                alight.distance_m,
                options,
            ),
        })
    }

    /// Whether riding `route` from `from` to `to` goes with its direction of travel.
    ///
    /// Uses stop order when the route lists both stops, otherwise the order of
    /// their nearest shape points. With no ordering information, or with the
    /// check disabled, any pair is accepted.
    fn heads_forward(&self, route: &Route, from: &Stop, to: &Stop) -> bool {
        if !self.policy.enforce_direction {
            return true;
        }

        if let (Some(i), Some(j)) = (route.stop_position(&from.id), route.stop_position(&to.id)) {
            return i < j;
        }

        match (
            nearest_point(from.location, route.shape()),
            nearest_point(to.location, route.shape()),
        ) {
            (Ok(a), Ok(b)) => a.index <= b.index,
            _ => true,
        }
    }

    /// Distance ridden on `route` between two stops, in meters.
    ///
    /// Prefers the feed's stop-to-stop distances, then the shape between the
    /// stops, then the chain of stops, then a straight line.
    fn ride_distance(&self, route: &Route, from: &Stop, to: &Stop) -> f64 {
        let positions = route
            .stop_position(&from.id)
            .zip(route.stop_position(&to.id))
            .map(|(i, j)| (i.min(j), i.max(j)));

        if let Some((i, j)) = positions {
            let hops = &route.stops()[i..j];
            let known: Option<f64> = hops.iter().map(|s| s.distance_to_next_m).sum();
            if let Some(total) = known
                && i < j
                && total.is_finite()
            {
                return total;
            }
        }

        let shape = route.shape();
        if let (Ok(a), Ok(b)) = (
            nearest_point(from.location, shape),
            nearest_point(to.location, shape),
        ) {
            let (lo, hi) = (a.index.min(b.index), a.index.max(b.index));
            let along = path_length_meters(&shape[lo..=hi]);
            if along > 0.0 {
                return along;
            }
        }

        if let Some((i, j)) = positions {
            let chain: Vec<Coordinate> = route.stops()[i..=j]
                .iter()
                .filter_map(|s| self.network.stop(&s.stop_id))
                .map(|s| s.location)
                .collect();
            let along = path_length_meters(&chain);
            if along > 0.0 {
                return along;
            }
        }

        distance_meters(from.location, to.location)
    }

    fn estimate(
        &self,
        legs_m: &[f64],
        entry_m: f64,
        exit_m: f64,
        options: &SuggestOptions,
    ) -> TripEstimate {
        let tariff = &self.policy.tariff;
        let fare = legs_m
            .iter()
            .map(|m| tariff.fare(m / 1000.0, options.passenger))
            .fold(Fare::ZERO, |acc, f| acc + f);
        let ride_m: f64 = legs_m.iter().sum();

        TripEstimate {
            fare,
            duration_minutes: self
                .policy
                .ride_minutes(ride_m / 1000.0, options.departure_hour),
            entry_distance_m: entry_m,
            exit_distance_m: exit_m,
            total_walking_m: entry_m + exit_m,
            total_distance_m: entry_m + ride_m + exit_m,
        }
    }
}

fn stop_point(nearby: &NearbyStop<'_>) -> RoutePoint {
    RoutePoint {
        stop_id: Some(nearby.stop.id.clone()),
        stop_name: Some(nearby.stop.name.clone()),
        location: nearby.stop.location,
        shape_index: None,
        walk_distance_m: nearby.distance_m,
    }
}

#[cfg(test)]
#[path = "matcher_tests.rs"]
mod tests;
