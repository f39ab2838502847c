//! Transit routes: identity, names, shape and stop sequence.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Coordinate, DomainError, StopId};

/// Stable route identifier, as given by the feed (`route_id`).
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RouteId(String);

impl RouteId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for RouteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RouteId({})", self.0)
    }
}

impl fmt::Display for RouteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A stop's position along a route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteStop {
    pub stop_id: StopId,

    /// Position along the route; strictly increasing.
    pub sequence: u32,

    /// Distance to the following stop in meters, when the feed provides it.
    pub distance_to_next_m: Option<f64>,
}

/// A transit line.
///
/// `shape` is ordered along the direction of travel. `stops`, when present,
/// has strictly increasing sequence numbers; this is checked by [`Route::new`].
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub id: RouteId,
    pub short_name: Option<String>,
    pub long_name: Option<String>,
    shape: Vec<Coordinate>,
    stops: Vec<RouteStop>,
}

impl Route {
    /// Create a route, validating that stop sequence numbers strictly increase.
    pub fn new(
        id: RouteId,
        short_name: Option<String>,
        long_name: Option<String>,
        shape: Vec<Coordinate>,
        stops: Vec<RouteStop>,
    ) -> Result<Self, DomainError> {
        if stops.windows(2).any(|w| w[0].sequence >= w[1].sequence) {
            return Err(DomainError::StopSequenceNotIncreasing(id));
        }

        Ok(Self {
            id,
            short_name,
            long_name,
            shape,
            stops,
        })
    }

    /// The ordered polyline driven by this route. May be empty.
    pub fn shape(&self) -> &[Coordinate] {
        &self.shape
    }

    /// The ordered stops of this route. May be empty.
    pub fn stops(&self) -> &[RouteStop] {
        &self.stops
    }

    /// Position of a stop in [`Route::stops`], if the route lists it.
    pub fn stop_position(&self, stop: &StopId) -> Option<usize> {
        self.stops.iter().position(|s| &s.stop_id == stop)
    }

    /// Best human-readable name: short name, then long name, then the id.
    pub fn display_name(&self) -> &str {
        self.short_name
            .as_deref()
            .or(self.long_name.as_deref())
            .unwrap_or(self.id.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route_stop(id: &str, sequence: u32) -> RouteStop {
        RouteStop {
            stop_id: StopId::new(id),
            sequence,
            distance_to_next_m: None,
        }
    }

    #[test]
    fn accepts_increasing_sequence() {
        let route = Route::new(
            RouteId::new("r1"),
            None,
            None,
            vec![],
            vec![route_stop("a", 1), route_stop("b", 2), route_stop("c", 5)],
        )
        .unwrap();
        assert_eq!(route.stop_position(&StopId::new("c")), Some(2));
        assert_eq!(route.stop_position(&StopId::new("z")), None);
    }

    #[test]
    fn rejects_repeated_sequence() {
        let err = Route::new(
            RouteId::new("r1"),
            None,
            None,
            vec![],
            vec![route_stop("a", 1), route_stop("b", 1)],
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "route r1 has stop sequence numbers that do not strictly increase"
        );
    }

    #[test]
    fn display_name_fallbacks() {
        let named = Route::new(
            RouteId::new("r1"),
            Some("Bangkal".into()),
            Some("Bangkal - Roxas".into()),
            vec![],
            vec![],
        )
        .unwrap();
        assert_eq!(named.display_name(), "Bangkal");

        let long_only =
            Route::new(RouteId::new("r2"), None, Some("Toril".into()), vec![], vec![]).unwrap();
        assert_eq!(long_only.display_name(), "Toril");

        let bare = Route::new(RouteId::new("r3"), None, None, vec![], vec![]).unwrap();
        assert_eq!(bare.display_name(), "r3");
    }
}
