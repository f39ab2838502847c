//! Trip planner.
//!
//! Given an origin, a destination and a loaded network, the planner answers:
//! "which jeepney (or pair of jeepneys) gets me there, and what will it cost?"
//!
//! Matching looks for stops and route shapes near both ends, falls back to a
//! single transfer when no route covers the whole trip, then filters and ranks
//! what it found.

mod config;
mod fare;
mod matcher;
mod options;
mod rank;

pub use config::MatchPolicy;
pub use fare::{FareBreakdown, Tariff, fare};
pub use matcher::{MatchError, StopRide, SuggestRequest, TripMatcher};
pub use options::SuggestOptions;
pub use rank::rank_suggestions;
