//! Geographic utilities shared by the overlay algorithms.
//!
//! Distances are great-circle (haversine) in meters. Simplification wraps
//! the `geo` crate's Douglas-Peucker implementation; tolerances are in
//! coordinate degrees.

use geo::{algorithm::simplify::Simplify, Coord, LineString};

use crate::{Bounds, GeoPoint};

const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Great-circle distance between two points in meters.
pub fn haversine_distance(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lng = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_METERS * h.sqrt().asin()
}

/// Total distance along a polyline in meters.
pub fn polyline_length(points: &[GeoPoint]) -> f64 {
    points
        .windows(2)
        .map(|w| haversine_distance(&w[0], &w[1]))
        .sum()
}

/// Douglas-Peucker line simplification.
///
/// Reduces the number of points in a polyline while preserving shape.
/// Uses the geo crate's implementation.
///
/// # Arguments
/// * `points` - Input polyline
/// * `tolerance` - Maximum deviation from the original line, in degrees
pub fn douglas_peucker(points: &[GeoPoint], tolerance: f64) -> Vec<GeoPoint> {
    if points.len() < 2 {
        return points.to_vec();
    }

    let coords: Vec<Coord<f64>> = points
        .iter()
        .map(|p| Coord {
            x: p.longitude,
            y: p.latitude,
        })
        .collect();

    let line = LineString::new(coords);
    let simplified = line.simplify(&tolerance);

    simplified
        .coords()
        .map(|c| GeoPoint::new(c.y, c.x))
        .collect()
}

/// Split a polyline into the contiguous runs of vertices that lie within
/// `bounds`, preserving order.
///
/// Clipping is at vertex granularity: a segment crossing the bounds without
/// a vertex inside contributes nothing. Callers wanting "the visible portion
/// of the route" take the first run.
pub fn clip_to_bounds(points: &[GeoPoint], bounds: &Bounds) -> Vec<Vec<GeoPoint>> {
    let mut runs: Vec<Vec<GeoPoint>> = Vec::new();
    let mut current: Vec<GeoPoint> = Vec::new();

    for point in points {
        if bounds.contains(point) {
            current.push(*point);
        } else if !current.is_empty() {
            runs.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }
    runs
}

/// The point on `polyline` closest to `target`, interpolated along its
/// segments. Returns `None` for an empty polyline.
///
/// Uses a local planar approximation (longitude scaled by the cosine of the
/// latitude), which is accurate at the viewport scales the annotation engine
/// works with.
pub fn closest_point_on_polyline(polyline: &[GeoPoint], target: &GeoPoint) -> Option<GeoPoint> {
    let first = polyline.first()?;
    if polyline.len() == 1 {
        return Some(*first);
    }

    let lng_scale = target.latitude.to_radians().cos();
    let to_plane = |p: &GeoPoint| -> (f64, f64) { (p.longitude * lng_scale, p.latitude) };
    let (tx, ty) = to_plane(target);

    let mut best = *first;
    let mut best_dist2 = f64::MAX;

    for segment in polyline.windows(2) {
        let (ax, ay) = to_plane(&segment[0]);
        let (bx, by) = to_plane(&segment[1]);
        let (dx, dy) = (bx - ax, by - ay);
        let len2 = dx * dx + dy * dy;

        let t = if len2 == 0.0 {
            0.0
        } else {
            (((tx - ax) * dx + (ty - ay) * dy) / len2).clamp(0.0, 1.0)
        };

        let (px, py) = (ax + t * dx, ay + t * dy);
        let dist2 = (px - tx) * (px - tx) + (py - ty) * (py - ty);
        if dist2 < best_dist2 {
            best_dist2 = dist2;
            best = GeoPoint::new(
                segment[0].latitude + t * (segment[1].latitude - segment[0].latitude),
                segment[0].longitude + t * (segment[1].longitude - segment[0].longitude),
            );
        }
    }

    Some(best)
}
