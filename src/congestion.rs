//! Congestion segment merging.
//!
//! A directions response classifies congestion per geometry segment, which
//! is far too granular to render directly. This module collapses adjacent
//! segments sharing the same effective classification into maximal polyline
//! features, after applying road-class overrides.
//!
//! Adjacent features share exactly one boundary coordinate, so concatenating
//! a leg's features (dropping the first coordinate of every feature after
//! the first) reconstructs the leg geometry exactly.

use std::collections::HashSet;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{OverlayError, Result};
use crate::route::{CongestionLevel, RoadClass};
use crate::GeoPoint;

/// One maximal run of route geometry under a single congestion level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CongestionFeature {
    /// Contiguous polyline spanning the run, at least two coordinates.
    pub polyline: Vec<GeoPoint>,
    pub level: CongestionLevel,
}

/// Merge per-segment congestion levels into contiguous polyline features.
///
/// `coordinates` is one leg's geometry; `segment_levels` classifies the
/// segment between each consecutive coordinate pair, so it must hold exactly
/// `coordinates.len() - 1` entries. `segment_road_classes`, when provided,
/// must be aligned with `segment_levels`.
///
/// When `override_classes` is non-empty, any segment whose road class is in
/// the set and whose classification is [`CongestionLevel::Unknown`] is
/// treated as [`CongestionLevel::Low`] before merging. Typical use is
/// rendering tunnels or motorways without traffic data as free-flowing
/// rather than unknown.
///
/// Mismatched array lengths are a caller contract violation and fail with a
/// data-inconsistency error; empty input yields an empty feature list.
///
/// # Example
/// ```
/// use route_overlays::{merge_congestion, CongestionLevel, GeoPoint};
/// use std::collections::HashSet;
///
/// let coordinates: Vec<GeoPoint> = (0..6)
///     .map(|i| GeoPoint::new(i as f64, i as f64))
///     .collect();
/// let levels = [
///     CongestionLevel::Low,
///     CongestionLevel::Low,
///     CongestionLevel::Severe,
///     CongestionLevel::Low,
///     CongestionLevel::Low,
/// ];
///
/// let features = merge_congestion(&coordinates, &levels, None, &HashSet::new()).unwrap();
/// assert_eq!(features.len(), 3);
/// assert_eq!(features[1].level, CongestionLevel::Severe);
/// ```
pub fn merge_congestion(
    coordinates: &[GeoPoint],
    segment_levels: &[CongestionLevel],
    segment_road_classes: Option<&[Option<RoadClass>]>,
    override_classes: &HashSet<RoadClass>,
) -> Result<Vec<CongestionFeature>> {
    if coordinates.is_empty() && segment_levels.is_empty() {
        return Ok(Vec::new());
    }
    if coordinates.len() != segment_levels.len() + 1 {
        return Err(OverlayError::SegmentCountMismatch {
            coordinate_count: coordinates.len(),
            level_count: segment_levels.len(),
        });
    }
    if let Some(road_classes) = segment_road_classes {
        if road_classes.len() != segment_levels.len() {
            return Err(OverlayError::RoadClassCountMismatch {
                road_class_count: road_classes.len(),
                level_count: segment_levels.len(),
            });
        }
    }
    // A single coordinate carries no segments to merge.
    if segment_levels.is_empty() {
        return Ok(Vec::new());
    }

    let effective = |index: usize| -> CongestionLevel {
        let level = segment_levels[index];
        if level == CongestionLevel::Unknown && !override_classes.is_empty() {
            let class = segment_road_classes
                .and_then(|classes| classes.get(index))
                .copied()
                .flatten();
            if let Some(class) = class {
                if override_classes.contains(&class) {
                    return CongestionLevel::Low;
                }
            }
        }
        level
    };

    let mut features = Vec::new();
    let mut run_start = 0usize;
    let mut run_level = effective(0);

    for index in 1..segment_levels.len() {
        let level = effective(index);
        if level != run_level {
            // Segments run_start..index span coordinates run_start..=index,
            // leaving coordinates[index] as the shared boundary.
            features.push(CongestionFeature {
                polyline: coordinates[run_start..=index].to_vec(),
                level: run_level,
            });
            run_start = index;
            run_level = level;
        }
    }
    features.push(CongestionFeature {
        polyline: coordinates[run_start..].to_vec(),
        level: run_level,
    });

    debug!(
        "merged {} congestion segments into {} features",
        segment_levels.len(),
        features.len()
    );
    Ok(features)
}
