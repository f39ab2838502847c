//! Transit dataset loading.
//!
//! Datasets are converted GTFS feeds serialized as one JSON document. They
//! are read from a file or fetched over HTTP, converted into a
//! [`NetworkSnapshot`](crate::network::NetworkSnapshot), and swapped into the
//! [`NetworkStore`](crate::network::NetworkStore).

mod convert;
mod error;
mod loader;
mod source;
mod types;

pub use convert::build_snapshot;
pub use error::DatasetError;
pub use loader::{DatasetLoader, LoadSummary};
pub use source::DatasetSource;
pub use types::{Dataset, RouteRecord, ShapePointRecord, StopRecord, StopTimeRecord, TripRecord};
