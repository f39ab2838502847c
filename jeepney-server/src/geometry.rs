//! Geometry primitives: great-circle distance and nearest-point search.
//!
//! All distances are in meters, computed with the haversine formula on a
//! sphere of radius [`EARTH_RADIUS_M`].

use crate::domain::Coordinate;

/// Mean Earth radius used by every distance in the planner.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Errors from geometric queries.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GeometryError {
    /// Nearest-point search over an empty point set
    #[error("nearest-point search needs at least one candidate")]
    EmptyCandidateSet,
}

/// Result of a nearest-point search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearestPoint {
    pub point: Coordinate,
    pub distance_m: f64,
    /// Position of `point` in the candidate sequence.
    pub index: usize,
}

/// Haversine great-circle distance between two coordinates, in meters.
///
/// Symmetric, and zero for identical coordinates.
pub fn distance_meters(a: Coordinate, b: Coordinate) -> f64 {
    let phi1 = a.latitude().to_radians();
    let phi2 = b.latitude().to_radians();
    let d_phi = (b.latitude() - a.latitude()).to_radians();
    let d_lambda = (b.longitude() - a.longitude()).to_radians();

    let h = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    // Clamp guards against h creeping past 1.0 for antipodal points.
    let c = 2.0 * h.sqrt().min(1.0).asin();

    EARTH_RADIUS_M * c
}

/// Find the candidate closest to `target`.
///
/// Linear scan; ties go to the lowest index.
pub fn nearest_point(
    target: Coordinate,
    candidates: &[Coordinate],
) -> Result<NearestPoint, GeometryError> {
    let mut best: Option<NearestPoint> = None;

    for (index, &point) in candidates.iter().enumerate() {
        let distance_m = distance_meters(target, point);
        if best.is_none_or(|b| distance_m < b.distance_m) {
            best = Some(NearestPoint {
                point,
                distance_m,
                index,
            });
        }
    }

    best.ok_or(GeometryError::EmptyCandidateSet)
}

/// Length of a polyline in meters (sum of its segment distances).
pub fn path_length_meters(points: &[Coordinate]) -> f64 {
    points
        .windows(2)
        .map(|w| distance_meters(w[0], w[1]))
        .sum()
}
