//! Matching policy for the trip planner.
//!
//! Every threshold and speed the matcher depends on lives here, so that two
//! deployments disagreeing on a constant do so explicitly.

use super::fare::Tariff;

/// Configuration parameters for trip matching.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchPolicy {
    /// Trips at most this long (meters) are also offered on foot.
    pub walk_threshold_m: f64,

    /// Radius (meters) for finding stops near the origin and destination.
    pub stop_search_radius_m: f64,

    /// Maximum distance (meters) between a rider and a route shape for the
    /// shape to count as passing by.
    pub match_threshold_m: f64,

    /// Assumed average vehicle speed (km/h) for ride durations.
    pub speed_kmh: f64,

    /// Walking speed (m/s) for walk-only durations.
    pub walking_speed_mps: f64,

    /// Inclusive hour ranges treated as rush hour.
    pub rush_hours: Vec<(u32, u32)>,

    /// Ride durations during rush hour are multiplied by this.
    pub rush_hour_multiplier: f64,

    /// Reject matches that would ride a route backwards.
    ///
    /// Shapes and stop lists are assumed to be ordered in the direction of
    /// travel. Feeds that do not guarantee this should turn the check off.
    pub enforce_direction: bool,

    /// Fare policy.
    pub tariff: Tariff,
}

impl MatchPolicy {
    pub fn with_walk_threshold_m(mut self, meters: f64) -> Self {
        self.walk_threshold_m = meters;
        self
    }

    pub fn with_stop_search_radius_m(mut self, meters: f64) -> Self {
        self.stop_search_radius_m = meters;
        self
    }

    pub fn with_match_threshold_m(mut self, meters: f64) -> Self {
        self.match_threshold_m = meters;
        self
    }

    pub fn with_speed_kmh(mut self, kmh: f64) -> Self {
        self.speed_kmh = kmh;
        self
    }

    pub fn with_enforce_direction(mut self, enforce: bool) -> Self {
        self.enforce_direction = enforce;
        self
    }

    pub fn with_tariff(mut self, tariff: Tariff) -> Self {
        self.tariff = tariff;
        self
    }

    /// Whether `hour` (0-23) falls within a rush-hour window.
    pub fn is_rush_hour(&self, hour: u32) -> bool {
        self.rush_hours
            .iter()
            .any(|&(start, end)| (start..=end).contains(&hour))
    }

    /// Estimated riding time in minutes.
    ///
    /// # Panics
    ///
    /// Panics if `distance_km` is negative or not finite; that indicates a
    /// geometry bug upstream.
    pub fn ride_minutes(&self, distance_km: f64, hour: Option<u32>) -> f64 {
        assert!(
            distance_km.is_finite() && distance_km >= 0.0,
            "ride distance must be a non-negative number, got {distance_km}"
        );

        let minutes = distance_km / self.speed_kmh * 60.0;
        match hour {
            Some(h) if self.is_rush_hour(h) => minutes * self.rush_hour_multiplier,
            _ => minutes,
        }
    }

    /// Estimated walking time in minutes.
    pub fn walking_minutes(&self, distance_m: f64) -> f64 {
        distance_m / self.walking_speed_mps / 60.0
    }
}

impl Default for MatchPolicy {
    fn default() -> Self {
        Self {
            walk_threshold_m: 500.0,
            stop_search_radius_m: 500.0,
            match_threshold_m: 100.0,
            speed_kmh: 20.0,
            walking_speed_mps: 1.4,
            rush_hours: vec![(7, 9), (16, 18)],
            rush_hour_multiplier: 1.5,
            enforce_direction: true,
            tariff: Tariff::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = MatchPolicy::default();

        assert_eq!(config.walk_threshold_m, 500.0);
        assert_eq!(config.stop_search_radius_m, 500.0);
        assert_eq!(config.match_threshold_m, 100.0);
        assert_eq!(config.speed_kmh, 20.0);
        assert_eq!(config.rush_hour_multiplier, 1.5);
        assert!(config.enforce_direction);
        assert_eq!(config.tariff, Tariff::default());
    }

    #[test]
    fn custom_config() {
        let config = MatchPolicy::default()
            .with_walk_threshold_m(300.0)
            .with_stop_search_radius_m(1000.0)
            .with_match_threshold_m(50.0)
            .with_speed_kmh(15.0)
            .with_enforce_direction(false);

        assert_eq!(config.walk_threshold_m, 300.0);
        assert_eq!(config.stop_search_radius_m, 1000.0);
        assert_eq!(config.match_threshold_m, 50.0);
        assert_eq!(config.speed_kmh, 15.0);
        assert!(!config.enforce_direction);
    }

    #[test]
    fn rush_hours() {
        let config = MatchPolicy::default();
        for hour in [7, 8, 9, 16, 17, 18] {
            assert!(config.is_rush_hour(hour), "{hour} should be rush hour");
        }
        for hour in [0, 6, 10, 12, 15, 19, 23] {
            assert!(!config.is_rush_hour(hour), "{hour} should not be rush hour");
        }
    }

    #[test]
    fn ride_minutes() {
        let config = MatchPolicy::default();
        assert_eq!(config.ride_minutes(10.0, None), 30.0);
        assert_eq!(config.ride_minutes(10.0, Some(12)), 30.0);
        assert_eq!(config.ride_minutes(10.0, Some(8)), 45.0);
        assert_eq!(config.ride_minutes(0.0, Some(8)), 0.0);
    }

    #[test]
    #[should_panic(expected = "non-negative")]
    fn ride_minutes_rejects_negative_distance() {
        MatchPolicy::default().ride_minutes(-1.0, None);
    }

    #[test]
    fn walking_minutes() {
        let config = MatchPolicy::default();
        assert!((config.walking_minutes(84.0) - 1.0).abs() < 1e-9);
    }
}
