//! Route data model consumed by the overlay algorithms.
//!
//! Routes are produced by an external directions service and treated as
//! immutable inputs. A route is an ordered list of legs (waypoint to
//! waypoint); a leg is an ordered list of steps (one maneuver's geometry).
//! Per-segment congestion and road-class arrays ride on the leg, aligned to
//! its concatenated geometry, which is how the directions payload delivers
//! them. The types derive `Deserialize` so hosts and tests can load route
//! payloads directly.

use serde::{Deserialize, Serialize};

use crate::{Bounds, GeoPoint};

/// Traffic congestion classification for one route segment.
///
/// The label set mirrors the upstream directions service. The merger only
/// relies on equality, plus the `Unknown` -> `Low` override rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CongestionLevel {
    Unknown,
    Low,
    Moderate,
    Heavy,
    Severe,
}

/// Road classification tag optionally attached per segment.
///
/// Only used as an override key: segments of an overridden class with
/// `Unknown` congestion render as `Low`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoadClass {
    Motorway,
    Tunnel,
    Ferry,
    Restricted,
    Toll,
}

/// The smallest routed unit within a leg: one maneuver's polyline.
///
/// Step equality (polyline plus attributes) is what the annotation engine
/// uses to find geometry unique to an alternate route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteStep {
    pub polyline: Vec<GeoPoint>,
    /// Whether this step passes a toll collection point.
    #[serde(default)]
    pub has_toll_collection: bool,
}

impl RouteStep {
    /// Create a toll-free step from its polyline.
    pub fn new(polyline: Vec<GeoPoint>) -> Self {
        Self {
            polyline,
            has_toll_collection: false,
        }
    }

    /// Bounding box of the step geometry, or `None` for an empty polyline.
    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::from_points(&self.polyline)
    }

    /// Whether any vertex of the step lies within the given bounds.
    pub fn intersects(&self, bounds: &Bounds) -> bool {
        self.polyline.iter().any(|c| bounds.contains(c))
    }
}

/// The portion of a route between two consecutive waypoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteLeg {
    pub steps: Vec<RouteStep>,
    /// One congestion level per geometry segment (`coordinates().len() - 1`
    /// entries), if the directions response carried traffic annotations.
    #[serde(default)]
    pub segment_congestion_levels: Option<Vec<CongestionLevel>>,
    /// One optional road class per geometry segment, aligned with
    /// `segment_congestion_levels`.
    #[serde(default)]
    pub segment_road_classes: Option<Vec<Option<RoadClass>>>,
}

impl RouteLeg {
    /// Create a leg without traffic annotations.
    pub fn new(steps: Vec<RouteStep>) -> Self {
        Self {
            steps,
            segment_congestion_levels: None,
            segment_road_classes: None,
        }
    }

    /// The leg geometry: step polylines concatenated in order, dropping the
    /// duplicated boundary coordinate where consecutive steps touch.
    pub fn coordinates(&self) -> Vec<GeoPoint> {
        concatenate(self.steps.iter().map(|s| s.polyline.as_slice()))
    }
}

/// A routable path from origin to destination, as returned by the
/// directions service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub legs: Vec<RouteLeg>,
    /// Expected travel duration in seconds.
    pub expected_travel_time: f64,
}

impl Route {
    /// Create a route from its legs and expected travel time in seconds.
    pub fn new(legs: Vec<RouteLeg>, expected_travel_time: f64) -> Self {
        Self {
            legs,
            expected_travel_time,
        }
    }

    /// All steps of the route, across legs, in traversal order.
    pub fn steps(&self) -> impl Iterator<Item = &RouteStep> {
        self.legs.iter().flat_map(|leg| leg.steps.iter())
    }

    /// The full route geometry: leg geometries concatenated in order,
    /// dropping duplicated boundary coordinates.
    pub fn geometry(&self) -> Vec<GeoPoint> {
        let legs: Vec<Vec<GeoPoint>> = self.legs.iter().map(|leg| leg.coordinates()).collect();
        concatenate(legs.iter().map(|c| c.as_slice()))
    }

    /// Whether any step of the route passes a toll collection point.
    pub fn has_tolls(&self) -> bool {
        self.steps().any(|s| s.has_toll_collection)
    }
}

/// Concatenate polylines in order, skipping the leading coordinate of a
/// polyline when it repeats the previous polyline's trailing coordinate.
fn concatenate<'a>(polylines: impl Iterator<Item = &'a [GeoPoint]>) -> Vec<GeoPoint> {
    let mut out: Vec<GeoPoint> = Vec::new();
    for polyline in polylines {
        match out.last() {
            Some(last) if polyline.first() == Some(last) => out.extend_from_slice(&polyline[1..]),
            _ => out.extend_from_slice(polyline),
        }
    }
    out
}
