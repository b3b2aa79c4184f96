//! # Route Overlays
//!
//! Route ETA annotation placement and congestion segment merging for
//! navigation maps.
//!
//! This library provides the two display-derivation algorithms a navigation
//! host needs between "routes arrived" and "features on the map":
//! - Picking visually separated anchor coordinates for per-route ETA/toll
//!   callout bubbles across a set of alternative routes
//! - Collapsing per-segment traffic congestion into maximal contiguous
//!   polyline features, with road-class based overrides
//!
//! Routes come from a directions service, screen projection comes from the
//! map view, and the produced features go back to the map style engine. The
//! library holds no references to any of them between calls.
//!
//! ## Quick Start
//!
//! ```rust
//! use route_overlays::{merge_congestion, CongestionLevel, GeoPoint};
//! use std::collections::HashSet;
//!
//! // Six coordinates, five segments, uniformly low congestion
//! let coordinates: Vec<GeoPoint> = (0..6)
//!     .map(|i| GeoPoint::new(i as f64, i as f64))
//!     .collect();
//! let levels = vec![CongestionLevel::Low; 5];
//!
//! let features = merge_congestion(&coordinates, &levels, None, &HashSet::new()).unwrap();
//! assert_eq!(features.len(), 1);
//! assert_eq!(features[0].polyline.len(), 6);
//! ```

use serde::{Deserialize, Serialize};

// Unified error handling
pub mod error;
pub use error::{OverlayError, Result};

// Route data model (legs, steps, congestion and road-class attributes)
pub mod route;
pub use route::{CongestionLevel, RoadClass, Route, RouteLeg, RouteStep};

// Screen-space projection boundary supplied by the map view
pub mod viewport;
pub use viewport::{FlatProjection, ScreenPoint, ScreenRect, ViewportProjection};

// Geographic utilities (distance, simplification, clipping)
pub mod geo_utils;
pub use geo_utils::{closest_point_on_polyline, douglas_peucker, haversine_distance, polyline_length};

// ETA/toll annotation placement engine
pub mod annotations;
pub use annotations::{
    format_travel_time, icon_name, place_annotations, AnnotationConfig, AnnotationFeature,
    TailPosition, SELECTED_SORT_ORDER, SIMPLIFICATION_TOLERANCE, SIMPLIFY_MIN_POINTS,
};

// Congestion segment merger
pub mod congestion;
pub use congestion::{merge_congestion, CongestionFeature};

// Host-facing recompute/render boundary
pub mod overlay;
pub use overlay::{OverlayLayers, OverlayRenderer, RouteOverlays};

// ============================================================================
// Core Types
// ============================================================================

/// A geographic coordinate with latitude and longitude.
///
/// # Example
/// ```
/// use route_overlays::GeoPoint;
/// let point = GeoPoint::new(51.5074, -0.1278); // London
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    /// Create a new geographic point.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Check if the point has valid coordinates.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && self.latitude >= -90.0
            && self.latitude <= 90.0
            && self.longitude >= -180.0
            && self.longitude <= 180.0
    }
}

/// Geographic bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl Bounds {
    /// Create a bounding box from explicit corners.
    pub fn new(min_lat: f64, max_lat: f64, min_lng: f64, max_lng: f64) -> Self {
        Self {
            min_lat,
            max_lat,
            min_lng,
            max_lng,
        }
    }

    /// Create bounds covering a set of points.
    pub fn from_points(points: &[GeoPoint]) -> Option<Self> {
        if points.is_empty() {
            return None;
        }
        let mut min_lat = f64::MAX;
        let mut max_lat = f64::MIN;
        let mut min_lng = f64::MAX;
        let mut max_lng = f64::MIN;

        for p in points {
            min_lat = min_lat.min(p.latitude);
            max_lat = max_lat.max(p.latitude);
            min_lng = min_lng.min(p.longitude);
            max_lng = max_lng.max(p.longitude);
        }

        Some(Self {
            min_lat,
            max_lat,
            min_lng,
            max_lng,
        })
    }

    /// Get the center point of the bounds.
    pub fn center(&self) -> GeoPoint {
        GeoPoint::new(
            (self.min_lat + self.max_lat) / 2.0,
            (self.min_lng + self.max_lng) / 2.0,
        )
    }

    /// Whether a point lies within the bounds (edges inclusive).
    pub fn contains(&self, point: &GeoPoint) -> bool {
        point.latitude >= self.min_lat
            && point.latitude <= self.max_lat
            && point.longitude >= self.min_lng
            && point.longitude <= self.max_lng
    }

    /// Whether two bounding boxes overlap.
    pub fn intersects(&self, other: &Bounds) -> bool {
        self.min_lat <= other.max_lat
            && self.max_lat >= other.min_lat
            && self.min_lng <= other.max_lng
            && self.max_lng >= other.min_lng
    }
}

// ============================================================================
// Tests
// ============================================================================
