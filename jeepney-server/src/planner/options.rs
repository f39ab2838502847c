//! Per-request options: rider category and result filters.

use crate::domain::{Fare, PassengerCategory, RouteId, Suggestion};

/// Options accompanying a suggestion request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SuggestOptions {
    /// Fare category of the rider.
    pub passenger: PassengerCategory,

    /// Drop riding suggestions longer than this (walking included).
    pub max_distance_km: Option<f64>,

    /// Drop riding suggestions costing more than this.
    pub max_fare: Option<Fare>,

    /// Drop riding suggestions taking longer than this.
    pub max_duration_minutes: Option<f64>,

    /// Hour of departure (0-23), for rush-hour adjustment.
    pub departure_hour: Option<u32>,

    /// Routes to favour when suggestions are otherwise equal.
    pub preferred_routes: Vec<RouteId>,

    /// Routes never to suggest.
    pub avoid_routes: Vec<RouteId>,
}

impl SuggestOptions {
    pub fn avoids(&self, route: &RouteId) -> bool {
        self.avoid_routes.contains(route)
    }

    pub fn prefers(&self, route: &RouteId) -> bool {
        self.preferred_routes.contains(route)
    }

    /// Whether a suggestion passes the distance, fare and duration limits.
    ///
    /// Walking suggestions always pass.
    pub fn admits(&self, suggestion: &Suggestion) -> bool {
        let Some(estimate) = suggestion.estimate() else {
            return true;
        };

        let within_distance = self
            .max_distance_km
            .is_none_or(|max| estimate.total_distance_m / 1000.0 <= max);
        let within_fare = self.max_fare.is_none_or(|max| estimate.fare <= max);
        let within_duration = self
            .max_duration_minutes
            .is_none_or(|max| estimate.duration_minutes <= max);

        within_distance && within_fare && within_duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Coordinate, DirectSuggestion, RoutePoint, TripEstimate, WalkSuggestion};

    fn direct(total_m: f64, fare_centavos: u64, minutes: f64) -> Suggestion {
        let point = RoutePoint {
            stop_id: None,
            stop_name: None,
            location: Coordinate::new(7.0, 125.0).unwrap(),
            shape_index: None,
            walk_distance_m: 0.0,
        };
        Suggestion::Direct(DirectSuggestion {
            route_id: RouteId::new("r"),
            route_name: "R".into(),
            board: point.clone(),
            alight: point,
            ride_distance_m: total_m,
            estimate: TripEstimate {
                fare: Fare::from_centavos(fare_centavos),
                duration_minutes: minutes,
                entry_distance_m: 0.0,
                exit_distance_m: 0.0,
                total_walking_m: 0.0,
                total_distance_m: total_m,
            },
        })
    }

    #[test]
    fn no_limits_admit_everything() {
        let options = SuggestOptions::default();
        assert!(options.admits(&direct(50_000.0, 10_000, 300.0)));
    }

    #[test]
    fn limits_are_inclusive() {
        let options = SuggestOptions {
            max_distance_km: Some(5.0),
            max_fare: Some(Fare::from_centavos(1480)),
            max_duration_minutes: Some(15.0),
            ..Default::default()
        };
        assert!(options.admits(&direct(5000.0, 1480, 15.0)));
        assert!(!options.admits(&direct(5001.0, 1480, 15.0)));
        assert!(!options.admits(&direct(5000.0, 1481, 15.0)));
        assert!(!options.admits(&direct(5000.0, 1480, 15.5)));
    }

    #[test]
    fn walking_always_admitted() {
        let options = SuggestOptions {
            max_distance_km: Some(0.0),
            ..Default::default()
        };
        let walk = Suggestion::Walk(WalkSuggestion {
            distance_m: 400.0,
            duration_minutes: 4.8,
        });
        assert!(options.admits(&walk));
    }

    #[test]
    fn route_lists() {
        let options = SuggestOptions {
            preferred_routes: vec![RouteId::new("a")],
            avoid_routes: vec![RouteId::new("b")],
            ..Default::default()
        };
        assert!(options.prefers(&RouteId::new("a")));
        assert!(!options.prefers(&RouteId::new("b")));
        assert!(options.avoids(&RouteId::new("b")));
        assert!(!options.avoids(&RouteId::new("a")));
    }
}
