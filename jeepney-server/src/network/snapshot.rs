//! Versioned, immutable network snapshots and the store that swaps them.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::domain::{Coordinate, RouteId, Stop, StopId};
use crate::geometry::{distance_meters, nearest_point};

use super::{RouteShapeIndex, StopRouteIndex};

/// Returned when the planner is asked to work before any dataset is loaded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("network index is not loaded")]
pub struct IndexUnavailable;

/// A stop with its distance from some query point.
#[derive(Debug, Clone, Copy)]
pub struct NearbyStop<'a> {
    pub stop: &'a Stop,
    pub distance_m: f64,
}

/// A route whose shape passes near some query point.
#[derive(Debug, Clone)]
pub struct NearbyRoute {
    pub route_id: RouteId,
    pub distance_m: f64,
}

/// Everything the matcher reads, frozen at load time.
///
/// Snapshots are never mutated. A refresh builds a new snapshot and swaps it
/// into the [`NetworkStore`]; readers holding the old `Arc` keep a consistent
/// view until they drop it.
#[derive(Debug)]
pub struct NetworkSnapshot {
    version: u64,
    loaded_at: DateTime<Utc>,
    stops: Vec<Stop>,
    stop_positions: HashMap<StopId, usize>,
    shapes: RouteShapeIndex,
    connectivity: StopRouteIndex,
}

impl NetworkSnapshot {
    /// Assemble a snapshot. For duplicate stop ids the first stop wins.
    pub fn new(
        version: u64,
        stops: Vec<Stop>,
        shapes: RouteShapeIndex,
        connectivity: StopRouteIndex,
    ) -> Self {
        let mut stop_positions = HashMap::with_capacity(stops.len());
        for (i, stop) in stops.iter().enumerate() {
            stop_positions.entry(stop.id.clone()).or_insert(i);
        }

        Self {
            version,
            loaded_at: Utc::now(),
            stops,
            stop_positions,
            shapes,
            connectivity,
        }
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    /// All stops, in dataset order.
    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    pub fn stop(&self, id: &StopId) -> Option<&Stop> {
        self.stop_positions.get(id).map(|&i| &self.stops[i])
    }

    pub fn shapes(&self) -> &RouteShapeIndex {
        &self.shapes
    }

    pub fn connectivity(&self) -> &StopRouteIndex {
        &self.connectivity
    }

    /// Stops within `radius_m` of `point`, nearest first.
    ///
    /// Equal distances keep dataset order.
    pub fn stops_near(&self, point: Coordinate, radius_m: f64) -> Vec<NearbyStop<'_>> {
        let mut nearby: Vec<NearbyStop<'_>> = self
            .stops
            .iter()
            .filter_map(|stop| {
                let distance_m = distance_meters(point, stop.location);
                (distance_m <= radius_m).then_some(NearbyStop { stop, distance_m })
            })
            .collect();

        nearby.sort_by(|a, b| a.distance_m.total_cmp(&b.distance_m));
        nearby
    }

    /// Routes whose shape has a point within `radius_m` of `point`, nearest first.
    ///
    /// Routes without geometry are skipped.
    pub fn routes_near(&self, point: Coordinate, radius_m: f64) -> Vec<NearbyRoute> {
        let mut nearby: Vec<NearbyRoute> = self
            .shapes
            .routes()
            .filter_map(|route| {
                let nearest = nearest_point(point, route.shape()).ok()?;
                (nearest.distance_m <= radius_m).then(|| NearbyRoute {
                    route_id: route.id.clone(),
                    distance_m: nearest.distance_m,
                })
            })
            .collect();

        nearby.sort_by(|a, b| a.distance_m.total_cmp(&b.distance_m));
        nearby
    }
}

/// Holder of the current snapshot.
///
/// Cloning the store is cheap and every clone sees the same snapshot. Swaps are
/// atomic: readers get either the previous or the new snapshot, never a
/// partially built one.
#[derive(Debug, Clone, Default)]
pub struct NetworkStore {
    inner: Arc<RwLock<Option<Arc<NetworkSnapshot>>>>,
}

impl NetworkStore {
    /// Create a store with no dataset loaded.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a store already holding a snapshot.
    pub fn with_snapshot(snapshot: NetworkSnapshot) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Some(Arc::new(snapshot)))),
        }
    }

    /// The current snapshot, or [`IndexUnavailable`] before the first load.
    pub async fn current(&self) -> Result<Arc<NetworkSnapshot>, IndexUnavailable> {
        let guard = self.inner.read().await;
        guard.clone().ok_or(IndexUnavailable)
    }

    /// Version the next snapshot should carry.
    pub async fn next_version(&self) -> u64 {
        let guard = self.inner.read().await;
        guard.as_ref().map_or(1, |s| s.version() + 1)
    }

    /// Install a new snapshot, returning the one it replaced.
    pub async fn replace(&self, snapshot: NetworkSnapshot) -> Option<Arc<NetworkSnapshot>> {
        let mut guard = self.inner.write().await;
        guard.replace(Arc::new(snapshot))
    }
}
