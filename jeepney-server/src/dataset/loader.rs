//! Loading datasets into the network store.

use tracing::info;

use crate::network::NetworkStore;

use super::convert::build_snapshot;
use super::error::DatasetError;
use super::source::DatasetSource;

/// What a successful load installed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadSummary {
    pub version: u64,
    pub stops: usize,
    pub routes: usize,
}

/// Loads a dataset from its source and installs it in a store.
///
/// Cloning is cheap; clones share the same store.
#[derive(Debug, Clone)]
pub struct DatasetLoader {
    source: DatasetSource,
    store: NetworkStore,
}

impl DatasetLoader {
    pub fn new(source: DatasetSource, store: NetworkStore) -> Self {
        Self { source, store }
    }

    pub fn source(&self) -> &DatasetSource {
        &self.source
    }

    /// Load the dataset and swap it in as the current snapshot.
    ///
    /// On failure the current snapshot, if any, stays in place and the error
    /// is returned.
    pub async fn refresh(&self) -> Result<LoadSummary, DatasetError> {
        let dataset = self.source.load().await?;
        let version = self.store.next_version().await;
        let snapshot = build_snapshot(&dataset, version)?;

        let summary = LoadSummary {
            version,
            stops: snapshot.stops().len(),
            routes: snapshot.shapes().len(),
        };
        self.store.replace(snapshot).await;

        info!(
            source = %self.source,
            version = summary.version,
            stops = summary.stops,
            routes = summary.routes,
            "installed dataset"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const FEED: &str = r#"{
        "routes": [{"route_id": "R1", "route_short_name": "Route 1"}],
        "stops": [
            {"stop_id": "S1", "stop_name": "A", "stop_lat": 7.0722, "stop_lon": 125.6131},
            {"stop_id": "S2", "stop_name": "B", "stop_lat": 7.0744, "stop_lon": 125.6155}
        ],
        "trips": [{"trip_id": "T1", "route_id": "R1", "shape_id": "SH1"}],
        "stop_times": [
            {"trip_id": "T1", "stop_id": "S1", "stop_sequence": 1},
            {"trip_id": "T1", "stop_id": "S2", "stop_sequence": 2}
        ],
        "shapes": [
            {"shape_id": "SH1", "shape_pt_lat": 7.0722, "shape_pt_lon": 125.6131, "shape_pt_sequence": 1},
            {"shape_id": "SH1", "shape_pt_lat": 7.0744, "shape_pt_lon": 125.6155, "shape_pt_sequence": 2}
        ]
    }"#;

    #[tokio::test]
    async fn refresh_installs_and_bumps_version() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dataset.json");
        std::fs::write(&path, FEED).unwrap();

        let store = NetworkStore::empty();
        let loader = DatasetLoader::new(DatasetSource::File(path), store.clone());

        let first = loader.refresh().await.unwrap();
        assert_eq!(
            first,
            LoadSummary {
                version: 1,
                stops: 2,
                routes: 1
            }
        );
        assert_eq!(store.current().await.unwrap().version(), 1);

        let second = loader.refresh().await.unwrap();
        assert_eq!(second.version, 2);
        assert_eq!(store.current().await.unwrap().version(), 2);
    }

    #[tokio::test]
    async fn failed_refresh_keeps_current_snapshot() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dataset.json");
        std::fs::write(&path, FEED).unwrap();

        let store = NetworkStore::empty();
        let loader = DatasetLoader::new(DatasetSource::File(path.clone()), store.clone());
        loader.refresh().await.unwrap();

        std::fs::write(&path, "{broken").unwrap();
        assert!(loader.refresh().await.is_err());

        std::fs::write(&path, r#"{"routes": []}"#).unwrap();
        assert!(matches!(loader.refresh().await, Err(DatasetError::Empty)));

        let current = store.current().await.unwrap();
        assert_eq!(current.version(), 1);
        assert_eq!(current.stops().len(), 2);
    }

    #[tokio::test]
    async fn missing_source_leaves_store_empty() {
        let store = NetworkStore::empty();
        let loader = DatasetLoader::new(
            DatasetSource::parse("/nonexistent/dataset.json"),
            store.clone(),
        );

        assert!(loader.refresh().await.is_err());
        assert!(store.current().await.is_err());
    }
}
