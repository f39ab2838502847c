use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use jeepney_server::dataset::{DatasetLoader, DatasetSource};
use jeepney_server::network::NetworkStore;
use jeepney_server::planner::{MatchPolicy, Tariff};
use jeepney_server::web::{AppState, create_router};

const DEFAULT_DATASET: &str = "dataset.json";
const DEFAULT_ADDR: &str = "127.0.0.1:4000";

/// How often to reload the dataset by default (24 hours).
const DEFAULT_REFRESH_SECS: u64 = 24 * 60 * 60;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let policy = policy_from_env();
    info!(?policy, "matching policy");

    let source = DatasetSource::parse(
        &std::env::var("JEEPNEY_DATASET").unwrap_or_else(|_| DEFAULT_DATASET.to_string()),
    );
    let store = NetworkStore::empty();
    let loader = DatasetLoader::new(source, store.clone());

    // Keep serving without a dataset; requests get 503 until a refresh succeeds
    if let Err(e) = loader.refresh().await {
        error!(source = %loader.source(), error = %e, "failed to load dataset");
    }

    let refresh_every = Duration::from_secs(env_or("JEEPNEY_REFRESH_SECS", DEFAULT_REFRESH_SECS));
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(refresh_every);
        interval.tick().await; // First tick is immediate, skip it
        loop {
            interval.tick().await;
            if let Err(e) = loader.refresh().await {
                warn!(
                    source = %loader.source(),
                    error = %e,
                    "dataset refresh failed; keeping current snapshot"
                );
            }
        }
    });

    let state = AppState::new(store, policy);
    let app = create_router(state);

    let addr: SocketAddr = match std::env::var("JEEPNEY_ADDR")
        .unwrap_or_else(|_| DEFAULT_ADDR.to_string())
        .parse()
    {
        Ok(addr) => addr,
        Err(e) => {
            error!(error = %e, "invalid JEEPNEY_ADDR");
            std::process::exit(2);
        }
    };

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(%addr, error = %e, "failed to bind");
            std::process::exit(1);
        }
    };

    info!("Jeepney trip planner listening on http://{addr}");
    info!("  GET /health          - Health check");
    info!("  GET /status          - Loaded dataset");
    info!("  GET /routes          - Routes with their stops");
    info!("  GET /routes/suggest  - Suggest trips");
    info!("  GET /routes/nearby   - Routes near a point");
    info!("  GET /routes/:id      - Route details");
    info!("  GET /route_shape     - Route polyline");
    info!("  GET /stops           - All stops by name");
    info!("  GET /stops/nearby    - Stops near a point");
    info!("  GET /fare            - Fare for a distance or between stops");

    if let Err(e) = axum::serve(listener, app).await {
        error!(error = %e, "server error");
        std::process::exit(1);
    }
}

/// Matching policy with defaults overridden from the environment.
fn policy_from_env() -> MatchPolicy {
    let defaults = MatchPolicy::default();
    MatchPolicy::default()
        .with_speed_kmh(env_or("JEEPNEY_SPEED_KMH", defaults.speed_kmh))
        .with_walk_threshold_m(env_or("JEEPNEY_WALK_THRESHOLD_M", defaults.walk_threshold_m))
        .with_stop_search_radius_m(env_or("JEEPNEY_STOP_RADIUS_M", defaults.stop_search_radius_m))
        .with_match_threshold_m(env_or("JEEPNEY_MATCH_THRESHOLD_M", defaults.match_threshold_m))
        .with_enforce_direction(env_or("JEEPNEY_ENFORCE_DIRECTION", defaults.enforce_direction))
        .with_tariff(tariff_from_env(defaults.tariff))
}

/// Fare table with amounts (in centavos) overridden from the environment.
fn tariff_from_env(defaults: Tariff) -> Tariff {
    Tariff {
        base_fare: env_or("JEEPNEY_BASE_FARE_CENTAVOS", defaults.base_fare),
        base_distance_km: env_or("JEEPNEY_BASE_DISTANCE_KM", defaults.base_distance_km),
        per_km: env_or("JEEPNEY_PER_KM_CENTAVOS", defaults.per_km),
        rounding_unit: env_or("JEEPNEY_ROUNDING_CENTAVOS", defaults.rounding_unit),
    }
}

/// Read and parse an environment variable, falling back to `default` when it
/// is unset or malformed.
fn env_or<T: FromStr>(name: &str, default: T) -> T {
    match std::env::var(name) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            warn!(name, value = %raw, "ignoring malformed environment variable");
            default
        }),
        Err(_) => default,
    }
}
