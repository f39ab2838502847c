//! Application state for the web layer.

use std::sync::Arc;

use crate::network::NetworkStore;
use crate::planner::MatchPolicy;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Current network snapshot, swapped on refresh
    pub store: NetworkStore,

    /// Trip matching configuration
    pub policy: Arc<MatchPolicy>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(store: NetworkStore, policy: MatchPolicy) -> Self {
        Self {
            store,
            policy: Arc::new(policy),
        }
    }
}
