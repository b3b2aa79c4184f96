//! ETA/toll annotation placement.
//!
//! Given a set of candidate routes and the current viewport, this module
//! picks one label anchor coordinate per route so the callout bubbles stay
//! on screen and visually apart. The selected route's anchor is a uniformly
//! random on-screen vertex; each alternate is anchored on geometry unique to
//! it, biased far from the selected anchor but not pinned to the route's
//! extreme end.
//!
//! Randomness is injected: pass a seeded [`rand::rngs::StdRng`] for
//! reproducible placement, or `rand::rng()` in production. Any on-screen
//! vertex is a valid anchor for the selected route.

use log::debug;
use rand::Rng;
use rstar::{RTree, RTreeObject, AABB};
use serde::{Deserialize, Serialize};

use crate::error::{OverlayError, Result};
use crate::geo_utils::{
    clip_to_bounds, closest_point_on_polyline, douglas_peucker, haversine_distance,
};
use crate::route::{Route, RouteStep};
use crate::viewport::ViewportProjection;
use crate::{Bounds, GeoPoint};

/// Polylines below this vertex count are used as-is; longer ones are
/// simplified before anchor search, bounding per-call cost regardless of
/// route complexity.
pub const SIMPLIFY_MIN_POINTS: usize = 100;

/// Douglas-Peucker tolerance for anchor-search simplification, in degrees
/// (about 11 m at the equator).
pub const SIMPLIFICATION_TOLERANCE: f64 = 0.0001;

/// Sort order of the selected route's annotation; above every alternate.
pub const SELECTED_SORT_ORDER: i64 = 1;

/// An alternate anchor must sit at least this fraction of the furthest
/// on-screen distance from the selected anchor.
const SPACING_RATIO: f64 = 0.75;

/// Labels anchored within this outer fraction of the viewport width flip
/// their tail so the bubble stays on screen.
const EDGE_FLIP_FRACTION: f64 = 0.25;

/// Which side the callout bubble's stem attaches on. A `Left` tail anchors
/// the bubble's bottom-left corner, so the bubble extends rightward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TailPosition {
    Left,
    Right,
}

impl TailPosition {
    pub fn opposite(self) -> Self {
        match self {
            TailPosition::Left => TailPosition::Right,
            TailPosition::Right => TailPosition::Left,
        }
    }
}

/// Icon identifier for a callout bubble, keyed by tail orientation and
/// whether the route is the selected one. The host registers one stretchable
/// image per identifier with its style engine.
pub fn icon_name(tail_position: TailPosition, selected: bool) -> &'static str {
    match (tail_position, selected) {
        (TailPosition::Left, false) => "route-callout-left",
        (TailPosition::Right, false) => "route-callout-right",
        (TailPosition::Left, true) => "route-callout-left-selected",
        (TailPosition::Right, true) => "route-callout-right-selected",
    }
}

/// One route's callout bubble, ready for a symbol layer.
///
/// Features carry no identity across recomputations; the renderer replaces
/// the whole set each time. Renderers draw higher `sort_order` above lower,
/// with insertion order breaking ties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationFeature {
    pub coordinate: GeoPoint,
    pub selected: bool,
    pub tail_position: TailPosition,
    /// Rendered label: formatted travel time, plus a toll line when relevant.
    pub text: String,
    pub icon: String,
    pub sort_order: i64,
}

/// Label strings for annotation text, localizable by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationConfig {
    /// Suffix line for routes that pass a toll collection point.
    pub tolls_label: String,
    /// Suffix line for toll-free routes, shown only when some other route
    /// in the candidate set has tolls.
    pub no_tolls_label: String,
    /// Currency symbol appended after `tolls_label`, if configured.
    pub currency_symbol: Option<String>,
}

impl Default for AnnotationConfig {
    fn default() -> Self {
        Self {
            tolls_label: "Tolls".to_string(),
            no_tolls_label: "No Tolls".to_string(),
            currency_symbol: None,
        }
    }
}

/// Pick label anchors for every candidate route and build the renderable
/// feature set.
///
/// The returned list holds one feature per alternate (in candidate order)
/// followed by the selected route's feature, so renderers that honor
/// insertion order on equal sort keys draw the selected bubble on top. An
/// empty route set, or a viewport that excludes the selected route
/// entirely, yields an empty list.
///
/// # Errors
/// [`OverlayError::SelectedRouteOutOfRange`] when `selected_index` does not
/// point into `routes`.
pub fn place_annotations<V, R>(
    routes: &[Route],
    selected_index: usize,
    viewport: &V,
    config: &AnnotationConfig,
    rng: &mut R,
) -> Result<Vec<AnnotationFeature>>
where
    V: ViewportProjection + ?Sized,
    R: Rng,
{
    if routes.is_empty() {
        return Ok(Vec::new());
    }
    if selected_index >= routes.len() {
        return Err(OverlayError::SelectedRouteOutOfRange {
            index: selected_index,
            route_count: routes.len(),
        });
    }

    let visible_bounds = viewport.visible_bounds();
    let screen = viewport.screen_bounds();
    let selected = &routes[selected_index];

    // The first contiguous run of selected-route vertices inside the
    // visible bounds; nothing visible means nothing to annotate.
    let geometry = selected.geometry();
    let Some(visible_shape) = clip_to_bounds(&geometry, &visible_bounds).into_iter().next() else {
        debug!("selected route has no geometry in the visible bounds");
        return Ok(Vec::new());
    };

    let line = maybe_simplify(visible_shape);
    let on_screen: Vec<GeoPoint> = line
        .into_iter()
        .filter(|c| screen.contains(&viewport.project(*c)))
        .collect();
    if on_screen.is_empty() {
        debug!("selected route has no on-screen vertices");
        return Ok(Vec::new());
    }

    // Any on-screen vertex works as the selected anchor; the spread of
    // alternates is computed relative to whichever one comes up.
    let selected_anchor = on_screen[rng.random_range(0..on_screen.len())];
    let selected_tail = if viewport.project(selected_anchor).x <= screen.mid_x() {
        TailPosition::Left
    } else {
        TailPosition::Right
    };

    let routes_contain_tolls = routes.iter().any(|r| r.has_tolls());

    let mut features: Vec<AnnotationFeature> = Vec::with_capacity(routes.len());

    // Anchor each alternate on geometry unique to it. The exclusion list
    // grows as alternates are processed, so shared road segments annotate
    // once, on the earliest route that uses them.
    let mut excluded: Vec<&RouteStep> = selected.steps().collect();

    let alternates = routes
        .iter()
        .enumerate()
        .filter(|(index, _)| *index != selected_index);
    for (position, (_, route)) in alternates.enumerate() {
        let all_steps: Vec<&RouteStep> = route.steps().collect();
        let unique: Vec<&RouteStep> = all_steps
            .into_iter()
            .filter(|step| !excluded.iter().any(|existing| existing == step))
            .collect();
        excluded.extend(unique.iter().copied());

        let visible_steps = filter_visible_steps(&unique, &visible_bounds);
        let stitched = stitch_connected(&visible_steps);

        let coordinate = if stitched.is_empty() {
            // Nothing of this alternate is usable on screen; anchor at the
            // start of its full geometry, or skip a route with no geometry
            // at all.
            match route.geometry().first().copied() {
                Some(first) => first,
                None => {
                    debug!("alternate {} has no geometry, skipping", position);
                    continue;
                }
            }
        } else {
            spaced_anchor(&stitched, selected_anchor, viewport)
        };

        let anchor_screen = viewport.project(coordinate);
        let mut tail = selected_tail.opposite();
        // Flip the stem away from the screen edge so the bubble is not
        // drawn off-screen.
        if tail == TailPosition::Left
            && anchor_screen.x > screen.x + screen.width * (1.0 - EDGE_FLIP_FRACTION)
        {
            tail = TailPosition::Right;
        } else if tail == TailPosition::Right
            && anchor_screen.x < screen.x + screen.width * EDGE_FLIP_FRACTION
        {
            tail = TailPosition::Left;
        }

        features.push(AnnotationFeature {
            coordinate,
            selected: false,
            tail_position: tail,
            text: annotation_label(route, routes_contain_tolls, config),
            icon: icon_name(tail, false).to_string(),
            sort_order: -(position as i64),
        });
    }

    // The selected annotation goes last so it renders on top of the others.
    features.push(AnnotationFeature {
        coordinate: selected_anchor,
        selected: true,
        tail_position: selected_tail,
        text: annotation_label(selected, routes_contain_tolls, config),
        icon: icon_name(selected_tail, true).to_string(),
        sort_order: SELECTED_SORT_ORDER,
    });

    debug!("placed {} route annotations", features.len());
    Ok(features)
}

/// Format a travel duration in seconds as an abbreviated hours/minutes
/// label, truncating below a minute.
///
/// # Example
/// ```
/// use route_overlays::annotations::format_travel_time;
/// assert_eq!(format_travel_time(5400.0), "1 hr 30 min");
/// assert_eq!(format_travel_time(300.0), "5 min");
/// ```
pub fn format_travel_time(seconds: f64) -> String {
    let total_minutes = (seconds / 60.0).floor().max(0.0) as u64;
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;
    match (hours, minutes) {
        (0, m) => format!("{} min", m),
        (h, 0) => format!("{} hr", h),
        (h, m) => format!("{} hr {} min", h, m),
    }
}

/// Label text for one route: travel time, then a toll line. Toll-free
/// routes call out "no tolls" only when tolls are relevant to the choice
/// set at all.
fn annotation_label(route: &Route, routes_contain_tolls: bool, config: &AnnotationConfig) -> String {
    let mut label = format_travel_time(route.expected_travel_time);
    if route.has_tolls() {
        label.push('\n');
        label.push_str(&config.tolls_label);
        if let Some(symbol) = &config.currency_symbol {
            label.push(' ');
            label.push_str(symbol);
        }
    } else if routes_contain_tolls {
        label.push('\n');
        label.push_str(&config.no_tolls_label);
    }
    label
}

fn maybe_simplify(line: Vec<GeoPoint>) -> Vec<GeoPoint> {
    if line.len() < SIMPLIFY_MIN_POINTS {
        line
    } else {
        douglas_peucker(&line, SIMPLIFICATION_TOLERANCE)
    }
}

/// Step bounding box indexed for visibility queries.
struct StepEnvelope {
    step_index: usize,
    envelope: AABB<[f64; 2]>,
}

impl StepEnvelope {
    fn new(step_index: usize, step: &RouteStep) -> Option<Self> {
        let bounds = step.bounds()?;
        Some(Self {
            step_index,
            envelope: AABB::from_corners(
                [bounds.min_lng, bounds.min_lat],
                [bounds.max_lng, bounds.max_lat],
            ),
        })
    }
}

impl RTreeObject for StepEnvelope {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

/// Restrict steps to those with geometry inside the visible bounds,
/// preserving their traversal order. The R-tree prunes by bounding box;
/// the vertex check confirms actual geometry inside.
fn filter_visible_steps<'a>(steps: &[&'a RouteStep], bounds: &Bounds) -> Vec<&'a RouteStep> {
    if steps.is_empty() {
        return Vec::new();
    }

    let envelopes: Vec<StepEnvelope> = steps
        .iter()
        .enumerate()
        .filter_map(|(index, step)| StepEnvelope::new(index, step))
        .collect();
    let tree = RTree::bulk_load(envelopes);

    let query = AABB::from_corners(
        [bounds.min_lng, bounds.min_lat],
        [bounds.max_lng, bounds.max_lat],
    );
    let mut hits: Vec<usize> = tree
        .locate_in_envelope_intersecting(&query)
        .map(|e| e.step_index)
        .collect();
    hits.sort_unstable();

    hits.into_iter()
        .map(|index| steps[index])
        .filter(|step| step.intersects(bounds))
        .collect()
}

/// Stitch visible steps into one polyline, following the chain only while
/// each step starts where the previous one ended.
fn stitch_connected(steps: &[&RouteStep]) -> Vec<GeoPoint> {
    let mut line: Vec<GeoPoint> = Vec::new();
    for step in steps {
        if step.polyline.is_empty() {
            continue;
        }
        match line.last() {
            None => line.extend_from_slice(&step.polyline),
            Some(last) if step.polyline[0] == *last => line.extend_from_slice(&step.polyline[1..]),
            Some(_) => break,
        }
    }
    line
}

/// Anchor an alternate on its stitched line: among on-screen vertices
/// ordered by distance to the selected anchor, take the first at least
/// [`SPACING_RATIO`] of the furthest distance away, snapped back onto the
/// full-resolution line. Falls back to the line's first coordinate when no
/// vertex is on screen.
fn spaced_anchor<V>(stitched: &[GeoPoint], selected_anchor: GeoPoint, viewport: &V) -> GeoPoint
where
    V: ViewportProjection + ?Sized,
{
    let mut anchor = stitched[0];

    let screen = viewport.screen_bounds();
    let mut candidates: Vec<(GeoPoint, f64)> = maybe_simplify(stitched.to_vec())
        .into_iter()
        .filter(|c| screen.contains(&viewport.project(*c)))
        .map(|c| (c, haversine_distance(&c, &selected_anchor)))
        .collect();
    candidates.sort_by(|a, b| a.1.total_cmp(&b.1));

    if let Some(&(_, furthest)) = candidates.last() {
        for &(vertex, distance) in &candidates {
            if distance >= furthest * SPACING_RATIO {
                anchor = closest_point_on_polyline(stitched, &vertex).unwrap_or(vertex);
                break;
            }
        }
    }
    anchor
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route::RouteLeg;
    use crate::viewport::{FlatProjection, ScreenRect};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn point(lat: f64, lng: f64) -> GeoPoint {
        GeoPoint::new(lat, lng)
    }

    fn step(coords: &[(f64, f64)]) -> RouteStep {
        RouteStep::new(coords.iter().map(|&(lat, lng)| point(lat, lng)).collect())
    }

    fn route(steps: Vec<RouteStep>, travel_time: f64) -> Route {
        Route::new(vec![RouteLeg::new(steps)], travel_time)
    }

    /// Viewport showing lat/lng 0..10 on a 400x800 screen.
    fn viewport() -> FlatProjection {
        FlatProjection::new(
            Bounds::new(0.0, 10.0, 0.0, 10.0),
            ScreenRect::new(0.0, 0.0, 400.0, 800.0),
        )
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn test_empty_routes_yield_empty_features() {
        let features =
            place_annotations(&[], 0, &viewport(), &AnnotationConfig::default(), &mut rng())
                .unwrap();
        assert!(features.is_empty());
    }

    #[test]
    fn test_selected_index_out_of_range() {
        let routes = vec![route(vec![step(&[(1.0, 1.0), (2.0, 2.0)])], 600.0)];
        let result =
            place_annotations(&routes, 1, &viewport(), &AnnotationConfig::default(), &mut rng());
        assert_eq!(
            result,
            Err(OverlayError::SelectedRouteOutOfRange {
                index: 1,
                route_count: 1,
            })
        );
    }

    #[test]
    fn test_single_route_gets_one_selected_feature() {
        let routes = vec![route(vec![step(&[(2.0, 2.0), (3.0, 3.0), (4.0, 4.0)])], 600.0)];
        let features =
            place_annotations(&routes, 0, &viewport(), &AnnotationConfig::default(), &mut rng())
                .unwrap();

        assert_eq!(features.len(), 1);
        let feature = &features[0];
        assert!(feature.selected);
        assert_eq!(feature.sort_order, SELECTED_SORT_ORDER);
        assert!(routes[0].geometry().contains(&feature.coordinate));
        assert_eq!(feature.icon, icon_name(feature.tail_position, true));
        assert_eq!(feature.text, "10 min");
    }

    #[test]
    fn test_route_outside_visible_bounds_yields_empty() {
        let routes = vec![route(vec![step(&[(50.0, 50.0), (51.0, 51.0)])], 600.0)];
        let features =
            place_annotations(&routes, 0, &viewport(), &AnnotationConfig::default(), &mut rng())
                .unwrap();
        assert!(features.is_empty());
    }

    #[test]
    fn test_same_seed_same_placement() {
        let routes = vec![route(
            vec![step(&[(1.0, 1.0), (2.0, 2.0), (3.0, 3.0), (4.0, 4.0), (5.0, 5.0)])],
            600.0,
        )];
        let config = AnnotationConfig::default();

        let mut rng_a = StdRng::seed_from_u64(42);
        let mut rng_b = StdRng::seed_from_u64(42);
        let a = place_annotations(&routes, 0, &viewport(), &config, &mut rng_a).unwrap();
        let b = place_annotations(&routes, 0, &viewport(), &config, &mut rng_b).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_alternate_anchored_on_unique_geometry() {
        let shared = step(&[(5.0, 0.5), (5.0, 1.0)]);
        // Selected continues north, the alternate branches east.
        let selected = route(vec![shared.clone(), step(&[(5.0, 1.0), (6.0, 1.0)])], 600.0);
        let alternate = route(
            vec![shared.clone(), step(&[(5.0, 1.0), (5.0, 5.0), (5.0, 9.0)])],
            900.0,
        );

        let routes = vec![selected, alternate];
        let features =
            place_annotations(&routes, 0, &viewport(), &AnnotationConfig::default(), &mut rng())
                .unwrap();

        assert_eq!(features.len(), 2);
        let alt = &features[0];
        assert!(!alt.selected);
        assert_eq!(alt.sort_order, 0);
        // Anchored on the eastern branch, not the shared stem.
        assert!(alt.coordinate.longitude > 1.0);

        let sel = &features[1];
        assert!(sel.selected);
    }

    #[test]
    fn test_exclusion_accumulates_across_alternates() {
        let selected = route(vec![step(&[(1.0, 1.0), (1.0, 2.0)])], 600.0);
        let shared = step(&[(4.0, 2.0), (4.0, 6.0)]);
        let first_alternate = route(
            vec![step(&[(4.0, 1.0), (4.0, 2.0)]), shared.clone()],
            900.0,
        );
        // The second alternate shares its on-screen step with the first;
        // its only other step lies far outside the visible bounds.
        let second_alternate = route(
            vec![shared.clone(), step(&[(40.0, 6.0), (45.0, 6.0)])],
            960.0,
        );

        let routes = vec![selected, first_alternate, second_alternate];
        let features =
            place_annotations(&routes, 0, &viewport(), &AnnotationConfig::default(), &mut rng())
                .unwrap();
        assert_eq!(features.len(), 3);

        // The first alternate claims the shared step, so the second has no
        // visible geometry left and anchors at its own first coordinate.
        assert!((features[0].coordinate.latitude - 4.0).abs() < 1e-9);
        assert_eq!(features[1].coordinate, point(4.0, 2.0));
    }

    #[test]
    fn test_identical_alternate_falls_back_to_route_start() {
        let steps = vec![step(&[(2.0, 2.0), (3.0, 3.0)])];
        let selected = route(steps.clone(), 600.0);
        let duplicate = route(steps, 660.0);

        let routes = vec![selected, duplicate];
        let features =
            place_annotations(&routes, 0, &viewport(), &AnnotationConfig::default(), &mut rng())
                .unwrap();

        assert_eq!(features.len(), 2);
        // No unique geometry, so the alternate anchors at its first coordinate.
        assert_eq!(features[0].coordinate, point(2.0, 2.0));
    }

    #[test]
    fn test_spacing_rule_picks_far_but_not_extreme_vertex() {
        // One on-screen vertex pins the selected anchor at (5, 0.5).
        let selected = route(vec![step(&[(5.0, 0.5), (5.0, -1.0)])], 600.0);
        let alternate = route(
            vec![step(&[
                (5.0, 1.0),
                (5.0, 2.0),
                (5.0, 3.0),
                (5.0, 4.0),
                (5.0, 5.0),
                (5.0, 6.0),
                (5.0, 7.0),
                (5.0, 8.0),
                (5.0, 9.0),
            ])],
            900.0,
        );

        let routes = vec![selected, alternate];
        let features =
            place_annotations(&routes, 0, &viewport(), &AnnotationConfig::default(), &mut rng())
                .unwrap();

        // The furthest vertex is at lng 9; 75% of that distance falls just
        // below lng 7, so lng 7 is the first far-enough vertex.
        let alt = &features[0];
        assert!((alt.coordinate.latitude - 5.0).abs() < 1e-9);
        assert!((alt.coordinate.longitude - 7.0).abs() < 1e-9);
    }

    #[test]
    fn test_tail_orientation_follows_screen_half() {
        // Entire selected route in the left half of the screen.
        let routes = vec![route(vec![step(&[(5.0, 1.0), (5.0, 2.0)])], 600.0)];
        let features =
            place_annotations(&routes, 0, &viewport(), &AnnotationConfig::default(), &mut rng())
                .unwrap();
        assert_eq!(features[0].tail_position, TailPosition::Left);

        let routes = vec![route(vec![step(&[(5.0, 8.0), (5.0, 9.0)])], 600.0)];
        let features =
            place_annotations(&routes, 0, &viewport(), &AnnotationConfig::default(), &mut rng())
                .unwrap();
        assert_eq!(features[0].tail_position, TailPosition::Right);
    }

    #[test]
    fn test_alternate_tail_flips_away_from_screen_edge() {
        // Selected sits in the right half, so the alternate starts with a
        // Left tail; its anchor lands past 75% of the width and flips back
        // to Right.
        let selected = route(vec![step(&[(5.0, 6.0), (5.0, 6.5)])], 600.0);
        let alternate = route(vec![step(&[(5.0, 9.5), (5.0, 9.9)])], 900.0);

        let routes = vec![selected, alternate];
        let features =
            place_annotations(&routes, 0, &viewport(), &AnnotationConfig::default(), &mut rng())
                .unwrap();

        let alt = &features[0];
        assert!(!alt.selected);
        assert_eq!(alt.tail_position, TailPosition::Right);
        assert_eq!(alt.icon, icon_name(TailPosition::Right, false));
    }

    #[test]
    fn test_alternate_sort_orders_descend() {
        let selected = route(vec![step(&[(5.0, 1.0), (5.0, 2.0)])], 600.0);
        let alt_one = route(vec![step(&[(3.0, 3.0), (3.0, 4.0)])], 660.0);
        let alt_two = route(vec![step(&[(7.0, 5.0), (7.0, 6.0)])], 720.0);

        let routes = vec![selected, alt_one, alt_two];
        let features =
            place_annotations(&routes, 0, &viewport(), &AnnotationConfig::default(), &mut rng())
                .unwrap();

        assert_eq!(features.len(), 3);
        assert_eq!(features[0].sort_order, 0);
        assert_eq!(features[1].sort_order, -1);
        assert_eq!(features[2].sort_order, SELECTED_SORT_ORDER);
        assert!(features[2].selected);
    }

    #[test]
    fn test_non_first_selected_index() {
        let alt = route(vec![step(&[(3.0, 3.0), (3.0, 4.0)])], 660.0);
        let selected = route(vec![step(&[(5.0, 1.0), (5.0, 2.0)])], 600.0);

        let routes = vec![alt, selected];
        let features =
            place_annotations(&routes, 1, &viewport(), &AnnotationConfig::default(), &mut rng())
                .unwrap();

        assert_eq!(features.len(), 2);
        assert!(!features[0].selected);
        assert!(features[1].selected);
        assert!(routes[1].geometry().contains(&features[1].coordinate));
    }

    #[test]
    fn test_format_travel_time() {
        assert_eq!(format_travel_time(90.0), "1 min");
        assert_eq!(format_travel_time(300.0), "5 min");
        assert_eq!(format_travel_time(3600.0), "1 hr");
        assert_eq!(format_travel_time(5400.0), "1 hr 30 min");
        assert_eq!(format_travel_time(0.0), "0 min");
    }

    #[test]
    fn test_toll_labels() {
        let mut toll_step = step(&[(1.0, 1.0), (2.0, 2.0)]);
        toll_step.has_toll_collection = true;
        let toll_route = route(vec![toll_step], 600.0);
        let free_route = route(vec![step(&[(3.0, 3.0), (4.0, 4.0)])], 600.0);

        let config = AnnotationConfig {
            currency_symbol: Some("$".to_string()),
            ..AnnotationConfig::default()
        };

        assert_eq!(annotation_label(&toll_route, true, &config), "10 min\nTolls $");
        assert_eq!(annotation_label(&free_route, true, &config), "10 min\nNo Tolls");
        // No route in the set has tolls, so no toll line at all.
        assert_eq!(annotation_label(&free_route, false, &config), "10 min");

        let no_symbol = AnnotationConfig::default();
        assert_eq!(annotation_label(&toll_route, true, &no_symbol), "10 min\nTolls");
    }

    #[test]
    fn test_stitch_connected_follows_chain() {
        let a = step(&[(0.0, 0.0), (1.0, 1.0)]);
        let b = step(&[(1.0, 1.0), (2.0, 2.0)]);
        let c = step(&[(5.0, 5.0), (6.0, 6.0)]); // disconnected

        let stitched = stitch_connected(&[&a, &b, &c]);
        assert_eq!(stitched.len(), 3);
        assert_eq!(stitched[2], point(2.0, 2.0));
    }

    #[test]
    fn test_filter_visible_steps_preserves_order() {
        let a = step(&[(1.0, 1.0), (2.0, 2.0)]);
        let b = step(&[(50.0, 50.0), (51.0, 51.0)]); // out of view
        let c = step(&[(3.0, 3.0), (4.0, 4.0)]);

        let bounds = Bounds::new(0.0, 10.0, 0.0, 10.0);
        let visible = filter_visible_steps(&[&a, &b, &c], &bounds);
        assert_eq!(visible.len(), 2);
        assert_eq!(visible[0], &a);
        assert_eq!(visible[1], &c);
    }
}
