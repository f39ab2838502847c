//! Stops (fixed boarding/alighting locations).

use std::fmt;

use serde::{Deserialize, Serialize};

use super::Coordinate;

/// Stable stop identifier, as given by the feed (`stop_id`).
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StopId(String);

impl StopId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for StopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StopId({})", self.0)
    }
}

impl fmt::Display for StopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A named stop. Immutable once loaded; a dataset refresh replaces every stop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    pub id: StopId,
    pub name: String,
    pub location: Coordinate,
}

impl Stop {
    pub fn new(id: StopId, name: impl Into<String>, location: Coordinate) -> Self {
        Self {
            id,
            name: name.into(),
            location,
        }
    }
}
