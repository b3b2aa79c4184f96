//! Screen-space projection boundary.
//!
//! The map view owns the camera, so projection is supplied per call through
//! the [`ViewportProjection`] trait: geo to screen and back, the pixel
//! bounds, and the visible geographic bounding box. The annotation engine
//! keeps no reference to the viewport beyond a single invocation.

use serde::{Deserialize, Serialize};

use crate::{Bounds, GeoPoint};

/// A point in screen space, in pixels, y growing downward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A rectangle in screen space, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreenRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl ScreenRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Whether a point lies within the rectangle (edges inclusive).
    pub fn contains(&self, point: &ScreenPoint) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }

    /// Horizontal midpoint of the rectangle.
    pub fn mid_x(&self) -> f64 {
        self.x + self.width / 2.0
    }
}

/// Capability supplied by the map view for one placement computation.
pub trait ViewportProjection {
    /// Project a geographic coordinate to screen space.
    fn project(&self, coordinate: GeoPoint) -> ScreenPoint;

    /// Map a screen-space point back to a geographic coordinate.
    fn unproject(&self, point: ScreenPoint) -> GeoPoint;

    /// The pixel bounds of the viewport.
    fn screen_bounds(&self) -> ScreenRect;

    /// The geographic bounding box currently visible.
    fn visible_bounds(&self) -> Bounds;
}

/// Equirectangular projection of a geographic bounding box onto a screen
/// rectangle.
///
/// Real hosts forward to their map view's projection; this implementation is
/// a reference for tests and headless use. Latitude maps top-down (north at
/// y = 0), longitude left-to-right.
#[derive(Debug, Clone, Copy)]
pub struct FlatProjection {
    bounds: Bounds,
    screen: ScreenRect,
}

impl FlatProjection {
    pub fn new(bounds: Bounds, screen: ScreenRect) -> Self {
        Self { bounds, screen }
    }
}

impl ViewportProjection for FlatProjection {
    fn project(&self, coordinate: GeoPoint) -> ScreenPoint {
        let lng_span = self.bounds.max_lng - self.bounds.min_lng;
        let lat_span = self.bounds.max_lat - self.bounds.min_lat;
        let fx = if lng_span == 0.0 {
            0.5
        } else {
            (coordinate.longitude - self.bounds.min_lng) / lng_span
        };
        let fy = if lat_span == 0.0 {
            0.5
        } else {
            (self.bounds.max_lat - coordinate.latitude) / lat_span
        };
        ScreenPoint::new(
            self.screen.x + fx * self.screen.width,
            self.screen.y + fy * self.screen.height,
        )
    }

    fn unproject(&self, point: ScreenPoint) -> GeoPoint {
        let fx = if self.screen.width == 0.0 {
            0.5
        } else {
            (point.x - self.screen.x) / self.screen.width
        };
        let fy = if self.screen.height == 0.0 {
            0.5
        } else {
            (point.y - self.screen.y) / self.screen.height
        };
        GeoPoint::new(
            self.bounds.max_lat - fy * (self.bounds.max_lat - self.bounds.min_lat),
            self.bounds.min_lng + fx * (self.bounds.max_lng - self.bounds.min_lng),
        )
    }

    fn screen_bounds(&self) -> ScreenRect {
        self.screen
    }

    fn visible_bounds(&self) -> Bounds {
        self.bounds
    }
}
