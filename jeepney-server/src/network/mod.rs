//! In-memory transit network: route shapes, stop connectivity and the
//! snapshot store that serves them to the planner.

mod connectivity;
mod shapes;
mod snapshot;

pub use connectivity::StopRouteIndex;
pub use shapes::RouteShapeIndex;
pub use snapshot::{IndexUnavailable, NearbyRoute, NearbyStop, NetworkSnapshot, NetworkStore};
