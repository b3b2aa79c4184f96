//! Host-facing recompute and render boundary.
//!
//! [`RouteOverlays`] owns the state a map host needs between triggers: the
//! current candidate routes, which one is selected, and the road-class
//! override set. On every trigger it recomputes both feature sets and hands
//! them to the renderer as whole-set replacements. A failed recomputation
//! makes no renderer call at all, so the previously rendered state stays on
//! screen until a later trigger succeeds.
//!
//! Layer and source identifiers are explicit configuration, passed with
//! every renderer call; the library keeps no global style state.

use std::collections::HashSet;

use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::annotations::{place_annotations, AnnotationConfig, AnnotationFeature};
use crate::congestion::{merge_congestion, CongestionFeature};
use crate::error::{OverlayError, Result};
use crate::route::{CongestionLevel, RoadClass, Route};
use crate::viewport::ViewportProjection;

/// Style source/layer identifiers for the two overlay feature sets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlayLayers {
    pub annotation_source: String,
    pub annotation_layer: String,
    pub congestion_source: String,
    pub congestion_layer: String,
}

impl Default for OverlayLayers {
    fn default() -> Self {
        Self {
            annotation_source: "route-eta-annotations-source".to_string(),
            annotation_layer: "route-eta-annotations".to_string(),
            congestion_source: "route-congestion-source".to_string(),
            congestion_layer: "route-congestion".to_string(),
        }
    }
}

/// Rendering sink implemented by the map host.
///
/// Each call replaces the named source's entire contents atomically. The
/// controller never issues partial updates, and it recomputes both feature
/// sets before making either call.
pub trait OverlayRenderer {
    fn replace_annotations(&mut self, layers: &OverlayLayers, features: Vec<AnnotationFeature>);
    fn replace_congestion(&mut self, layers: &OverlayLayers, features: Vec<CongestionFeature>);
}

/// Overlay state machine driven by host triggers.
///
/// Triggers map one-to-one onto the events a navigation host observes: a
/// directions response ([`set_routes`](Self::set_routes)), a tap on an
/// alternative ([`select_route`](Self::select_route)), the camera settling
/// ([`viewport_changed`](Self::viewport_changed)), the style finishing its
/// load ([`style_ready`](Self::style_ready)), an override change, and a map
/// clear. Until the style is ready, triggers update state without touching
/// the renderer.
#[derive(Debug)]
pub struct RouteOverlays {
    routes: Vec<Route>,
    selected_index: usize,
    override_classes: HashSet<RoadClass>,
    layers: OverlayLayers,
    config: AnnotationConfig,
    style_ready: bool,
}

impl RouteOverlays {
    pub fn new(layers: OverlayLayers, config: AnnotationConfig) -> Self {
        Self {
            routes: Vec::new(),
            selected_index: 0,
            override_classes: HashSet::new(),
            layers,
            config,
            style_ready: false,
        }
    }

    /// Current candidate routes.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn selected_index(&self) -> usize {
        self.selected_index
    }

    pub fn override_classes(&self) -> &HashSet<RoadClass> {
        &self.override_classes
    }

    /// The style finished loading; render whatever state accumulated before.
    pub fn style_ready<V, S, R>(&mut self, viewport: &V, renderer: &mut S, rng: &mut R) -> Result<()>
    where
        V: ViewportProjection + ?Sized,
        S: OverlayRenderer + ?Sized,
        R: Rng,
    {
        self.style_ready = true;
        self.refresh(viewport, renderer, rng)
    }

    /// A directions response arrived. Replaces the candidate set and selects
    /// the first route.
    pub fn set_routes<V, S, R>(
        &mut self,
        routes: Vec<Route>,
        viewport: &V,
        renderer: &mut S,
        rng: &mut R,
    ) -> Result<()>
    where
        V: ViewportProjection + ?Sized,
        S: OverlayRenderer + ?Sized,
        R: Rng,
    {
        self.routes = routes;
        self.selected_index = 0;
        self.refresh(viewport, renderer, rng)
    }

    /// The user picked a different candidate route.
    pub fn select_route<V, S, R>(
        &mut self,
        index: usize,
        viewport: &V,
        renderer: &mut S,
        rng: &mut R,
    ) -> Result<()>
    where
        V: ViewportProjection + ?Sized,
        S: OverlayRenderer + ?Sized,
        R: Rng,
    {
        if index >= self.routes.len() {
            return Err(OverlayError::SelectedRouteOutOfRange {
                index,
                route_count: self.routes.len(),
            });
        }
        self.selected_index = index;
        self.refresh(viewport, renderer, rng)
    }

    /// Change which road classes override `Unknown` congestion to `Low`.
    pub fn set_override_classes<V, S, R>(
        &mut self,
        classes: HashSet<RoadClass>,
        viewport: &V,
        renderer: &mut S,
        rng: &mut R,
    ) -> Result<()>
    where
        V: ViewportProjection + ?Sized,
        S: OverlayRenderer + ?Sized,
        R: Rng,
    {
        self.override_classes = classes;
        self.refresh(viewport, renderer, rng)
    }

    /// The camera settled after a pan or zoom.
    pub fn viewport_changed<V, S, R>(
        &mut self,
        viewport: &V,
        renderer: &mut S,
        rng: &mut R,
    ) -> Result<()>
    where
        V: ViewportProjection + ?Sized,
        S: OverlayRenderer + ?Sized,
        R: Rng,
    {
        self.refresh(viewport, renderer, rng)
    }

    /// Drop all routes and empty both overlay sources.
    pub fn clear<S>(&mut self, renderer: &mut S)
    where
        S: OverlayRenderer + ?Sized,
    {
        self.routes.clear();
        self.selected_index = 0;
        if self.style_ready {
            renderer.replace_annotations(&self.layers, Vec::new());
            renderer.replace_congestion(&self.layers, Vec::new());
        }
    }

    fn refresh<V, S, R>(&mut self, viewport: &V, renderer: &mut S, rng: &mut R) -> Result<()>
    where
        V: ViewportProjection + ?Sized,
        S: OverlayRenderer + ?Sized,
        R: Rng,
    {
        if !self.style_ready {
            debug!("style not ready, deferring overlay refresh");
            return Ok(());
        }
        if self.routes.is_empty() {
            renderer.replace_annotations(&self.layers, Vec::new());
            renderer.replace_congestion(&self.layers, Vec::new());
            return Ok(());
        }

        // Compute both feature sets before touching the renderer, so an
        // error leaves the previous rendering in place.
        let annotations = place_annotations(
            &self.routes,
            self.selected_index,
            viewport,
            &self.config,
            rng,
        )?;
        let congestion = self.selected_congestion()?;

        renderer.replace_annotations(&self.layers, annotations);
        renderer.replace_congestion(&self.layers, congestion);
        Ok(())
    }

    /// Congestion features for every leg of the selected route. A leg
    /// without traffic annotations renders as one `Unknown` feature over
    /// its whole geometry.
    fn selected_congestion(&self) -> Result<Vec<CongestionFeature>> {
        let route = &self.routes[self.selected_index];
        let mut features = Vec::new();
        for leg in &route.legs {
            let coordinates = leg.coordinates();
            match &leg.segment_congestion_levels {
                Some(levels) => features.extend(merge_congestion(
                    &coordinates,
                    levels,
                    leg.segment_road_classes.as_deref(),
                    &self.override_classes,
                )?),
                None => {
                    if coordinates.len() >= 2 {
                        features.push(CongestionFeature {
                            polyline: coordinates,
                            level: CongestionLevel::Unknown,
                        });
                    }
                }
            }
        }
        Ok(features)
    }
}
