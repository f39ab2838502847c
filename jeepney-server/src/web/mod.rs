//! Web layer for the jeepney trip planner.
//!
//! Provides HTTP endpoints for trip suggestions, nearby routes and stops,
//! route geometry and fares.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
