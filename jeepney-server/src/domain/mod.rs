//! Domain types for the jeepney trip planner.
//!
//! This module contains the core domain model types that represent
//! validated transit data. All types enforce their invariants at construction
//! time, so code that receives these types can trust their validity.

mod coordinate;
mod error;
mod fare;
mod passenger;
mod route;
mod stop;
mod suggestion;

pub use coordinate::{Coordinate, InvalidCoordinate};
pub use error::DomainError;
pub use fare::Fare;
pub use passenger::{InvalidPassengerCategory, PassengerCategory};
pub use route::{Route, RouteId, RouteStop};
pub use stop::{Stop, StopId};
pub use suggestion::{
    DirectSuggestion, RoutePoint, Suggestion, TransferStop, TransferSuggestion, TripEstimate,
    WalkSuggestion,
};
