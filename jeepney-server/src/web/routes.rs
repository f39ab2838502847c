//! HTTP route handlers.

use std::collections::HashSet;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use chrono::{Local, Timelike};
use tower_http::trace::TraceLayer;
use tracing::{debug, warn};

use crate::domain::{Coordinate, Fare, InvalidCoordinate, PassengerCategory, RouteId, StopId};
use crate::network::IndexUnavailable;
use crate::planner::{MatchError, SuggestOptions, SuggestRequest, TripMatcher};

use super::dto::*;
use super::state::AppState;

/// Default radius for `/routes/nearby`, in metres.
const NEARBY_ROUTES_RADIUS_M: f64 = 200.0;

/// Default radius for `/stops/nearby`, in kilometres.
const NEARBY_STOPS_RADIUS_KM: f64 = 1.0;

/// Default radius for `/routes` around a point, in kilometres.
const ROUTES_RADIUS_KM: f64 = 2.0;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/status", get(status))
        .route("/routes", get(list_routes))
        .route("/routes/suggest", get(suggest_routes))
        .route("/routes/nearby", get(nearby_routes))
        .route("/routes/:route_id", get(route_details))
        .route("/route_shape", get(route_shape))
        .route("/stops", get(list_stops))
        .route("/stops/nearby", get(nearby_stops))
        .route("/fare", get(fare_estimate))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Which dataset is loaded, if any.
async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    let response = match state.store.current().await {
        Ok(network) => StatusResponse {
            loaded: true,
            dataset_version: Some(network.version()),
            loaded_at: Some(network.loaded_at()),
            stops: network.stops().len(),
            routes: network.shapes().len(),
        },
        Err(IndexUnavailable) => StatusResponse {
            loaded: false,
            dataset_version: None,
            loaded_at: None,
            stops: 0,
            routes: 0,
        },
    };
    Json(response)
}

/// Suggest ways to travel between two points.
async fn suggest_routes(
    State(state): State<AppState>,
    Query(query): Query<SuggestQuery>,
) -> Result<Json<SuggestResponse>, AppError> {
    let request = suggest_request(&query, Local::now().hour())?;
    let network = state.store.current().await?;

    let suggestions = TripMatcher::new(&network, &state.policy).suggest(&request);
    debug!(
        dataset_version = network.version(),
        count = suggestions.len(),
        "suggested trips"
    );

    Ok(Json(SuggestResponse {
        dataset_version: network.version(),
        suggestions,
    }))
}

/// Turn query parameters into a matcher request.
///
/// `current_hour` is used when `timeOfDay` is set and no explicit hour is given.
fn suggest_request(query: &SuggestQuery, current_hour: u32) -> Result<SuggestRequest, AppError> {
    let passenger = parse_passenger(query.passenger.as_deref())?;

    if let Some(hour) = query.hour
        && hour > 23
    {
        return Err(AppError::BadRequest {
            message: format!("hour must be between 0 and 23, got {hour}"),
        });
    }
    let departure_hour = query
        .hour
        .or_else(|| query.time_of_day.then_some(current_hour));

    let max_fare = query
        .max_fare
        .map(|pesos| {
            Fare::from_pesos(pesos).ok_or_else(|| AppError::BadRequest {
                message: format!("maxFare must be a non-negative number, got {pesos}"),
            })
        })
        .transpose()?;

    let options = SuggestOptions {
        passenger,
        max_distance_km: non_negative("maxDistance", query.max_distance)?,
        max_fare,
        max_duration_minutes: non_negative("maxDuration", query.max_duration)?,
        departure_hour,
        preferred_routes: parse_route_list(query.preferred_routes.as_deref()),
        avoid_routes: parse_route_list(query.avoid_routes.as_deref()),
    };

    Ok(SuggestRequest::from_degrees(
        query.origin_lat,
        query.origin_lon,
        query.dest_lat,
        query.dest_lon,
        options,
    )?)
}

/// Routes whose shape passes near a point, nearest first.
async fn nearby_routes(
    State(state): State<AppState>,
    Query(query): Query<NearbyRoutesQuery>,
) -> Result<Json<Vec<NearbyRouteResult>>, AppError> {
    let point = Coordinate::new(query.lat, query.lon)?;
    let radius = non_negative("radius", query.radius)?.unwrap_or(NEARBY_ROUTES_RADIUS_M);
    let network = state.store.current().await?;

    let routes = network
        .routes_near(point, radius)
        .into_iter()
        .map(|r| {
            let route_name = network
                .shapes()
                .route(&r.route_id)
                .map(|route| route.display_name().to_string())
                .unwrap_or_else(|| r.route_id.to_string());
            NearbyRouteResult {
                route_id: r.route_id,
                route_name,
                distance_m: r.distance_m,
            }
        })
        .collect();

    Ok(Json(routes))
}

/// Stops near a point, nearest first.
async fn nearby_stops(
    State(state): State<AppState>,
    Query(query): Query<NearbyStopsQuery>,
) -> Result<Json<Vec<NearbyStopResult>>, AppError> {
    let point = Coordinate::new(query.latitude, query.longitude)?;
    let radius_km = non_negative("radius", query.radius)?.unwrap_or(NEARBY_STOPS_RADIUS_KM);
    let network = state.store.current().await?;

    let stops = network
        .stops_near(point, radius_km * 1000.0)
        .into_iter()
        .map(|n| NearbyStopResult {
            stop_id: n.stop.id.as_str().to_string(),
            name: n.stop.name.clone(),
            latitude: n.stop.location.latitude(),
            longitude: n.stop.location.longitude(),
            distance_km: n.distance_m / 1000.0,
        })
        .collect();

    Ok(Json(stops))
}

/// Every route with its stops, or only routes calling within `radius` km of
/// a point. Ordered by route name, then id.
async fn list_routes(
    State(state): State<AppState>,
    Query(query): Query<RoutesQuery>,
) -> Result<Json<Vec<RouteDetailsResponse>>, AppError> {
    let point = match (query.latitude, query.longitude) {
        (Some(lat), Some(lon)) => Some(Coordinate::new(lat, lon)?),
        (None, None) => None,
        _ => {
            return Err(AppError::BadRequest {
                message: "latitude and longitude must be given together".to_string(),
            });
        }
    };
    let radius_km = non_negative("radius", query.radius)?.unwrap_or(ROUTES_RADIUS_KM);
    let network = state.store.current().await?;

    let near: Option<HashSet<&StopId>> = point.map(|p| {
        network
            .stops_near(p, radius_km * 1000.0)
            .into_iter()
            .map(|n| n.stop)
            .map(|stop| &stop.id)
            .collect()
    });

    let mut routes: Vec<_> = network
        .shapes()
        .routes()
        .filter(|route| {
            near.as_ref()
                .is_none_or(|near| route.stops().iter().any(|s| near.contains(&s.stop_id)))
        })
        .collect();
    routes.sort_by(|a, b| a.display_name().cmp(b.display_name()).then(a.id.cmp(&b.id)));

    let routes = routes
        .into_iter()
        .map(|route| RouteDetailsResponse::from_route(route, |id| network.stop(id)))
        .collect();

    Ok(Json(routes))
}

/// Every stop, ordered by name, then id.
async fn list_stops(State(state): State<AppState>) -> Result<Json<Vec<StopResult>>, AppError> {
    let network = state.store.current().await?;

    let mut stops: Vec<_> = network.stops().iter().collect();
    stops.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));

    Ok(Json(stops.into_iter().map(StopResult::from).collect()))
}

/// A route's polyline as `{latitude, longitude}` points.
async fn route_shape(
    State(state): State<AppState>,
    Query(query): Query<RouteShapeQuery>,
) -> Result<Json<RouteShapeResponse>, AppError> {
    let route_id = query
        .route_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::BadRequest {
            message: "missing or invalid route_id".to_string(),
        })?;
    let network = state.store.current().await?;

    let shape = network.shapes().shape_of(&RouteId::new(route_id));
    if shape.is_empty() {
        return Err(AppError::NotFound {
            message: format!("shape not found for route {route_id}"),
        });
    }

    Ok(Json(RouteShapeResponse {
        shape: shape.to_vec(),
    }))
}

/// A route with its stop list.
async fn route_details(
    State(state): State<AppState>,
    Path(route_id): Path<String>,
) -> Result<Json<RouteDetailsResponse>, AppError> {
    let network = state.store.current().await?;

    let route = network
        .shapes()
        .route(&RouteId::new(route_id.as_str()))
        .ok_or_else(|| AppError::NotFound {
            message: format!("route {route_id} not found"),
        })?;

    Ok(Json(RouteDetailsResponse::from_route(route, |id| network.stop(id))))
}

/// Fare under the configured tariff, for a distance or for the shortest
/// single-route ride between two stops.
async fn fare_estimate(
    State(state): State<AppState>,
    Query(query): Query<FareQuery>,
) -> Result<Json<FareResponse>, AppError> {
    let passenger = parse_passenger(query.passenger.as_deref())?;
    let tariff = &state.policy.tariff;

    if let Some(distance_km) = non_negative("distance_km", query.distance_km)? {
        return Ok(Json(FareResponse {
            breakdown: tariff.breakdown(distance_km, passenger),
            route_id: None,
            route_name: None,
        }));
    }

    let (Some(origin), Some(destination)) =
        (query.origin_id.as_deref(), query.destination_id.as_deref())
    else {
        return Err(AppError::BadRequest {
            message: "either distance_km or origin_id and destination_id is required".to_string(),
        });
    };
    let (origin, destination) = (StopId::new(origin.trim()), StopId::new(destination.trim()));
    let network = state.store.current().await?;

    for id in [&origin, &destination] {
        if network.stop(id).is_none() {
            return Err(AppError::NotFound {
                message: format!("stop {id} not found"),
            });
        }
    }

    let ride = TripMatcher::new(&network, &state.policy)
        .ride_between(&origin, &destination)
        .ok_or_else(|| AppError::NotFound {
            message: format!("no direct route found from stop {origin} to stop {destination}"),
        })?;

    Ok(Json(FareResponse {
        breakdown: tariff.breakdown(ride.distance_m / 1000.0, passenger),
        route_id: Some(ride.route.id.clone()),
        route_name: Some(ride.route.display_name().to_string()),
    }))
}

fn parse_passenger(passenger: Option<&str>) -> Result<PassengerCategory, AppError> {
    passenger
        .map(str::parse::<PassengerCategory>)
        .transpose()
        .map(Option::unwrap_or_default)
        .map_err(|e| AppError::BadRequest {
            message: e.to_string(),
        })
}

fn non_negative(name: &str, value: Option<f64>) -> Result<Option<f64>, AppError> {
    match value {
        Some(v) if !v.is_finite() || v < 0.0 => Err(AppError::BadRequest {
            message: format!("{name} must be a non-negative number, got {v}"),
        }),
        _ => Ok(value),
    }
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Unavailable { message: String },
}

impl From<InvalidCoordinate> for AppError {
    fn from(e: InvalidCoordinate) -> Self {
        AppError::BadRequest {
            message: e.to_string(),
        }
    }
}

impl From<IndexUnavailable> for AppError {
    fn from(e: IndexUnavailable) -> Self {
        AppError::Unavailable {
            message: e.to_string(),
        }
    }
}

impl From<MatchError> for AppError {
    fn from(e: MatchError) -> Self {
        match e {
            MatchError::InvalidCoordinate(e) => e.into(),
            MatchError::IndexUnavailable(e) => e.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Unavailable { message } => (StatusCode::SERVICE_UNAVAILABLE, message),
        };

        if status.is_server_error() {
            warn!(%status, %message, "request failed");
        } else {
            debug!(%status, %message, "request rejected");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
