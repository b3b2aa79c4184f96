//! Unified error handling for the route-overlays library.
//!
//! Every failure here is local to one computation: the caller keeps whatever
//! it rendered last and retries on the next trigger. Empty inputs are not
//! errors; both algorithms resolve them to empty results.

use thiserror::Error;

/// Unified error type for route-overlays operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OverlayError {
    /// The per-segment congestion array does not line up with the leg geometry.
    /// A leg with N coordinates must carry exactly N-1 congestion levels.
    #[error(
        "{coordinate_count} coordinates require {expected} congestion levels, got {level_count}",
        expected = .coordinate_count.saturating_sub(1)
    )]
    SegmentCountMismatch {
        coordinate_count: usize,
        level_count: usize,
    },

    /// Road classes, when provided, must cover every congestion segment.
    #[error("{level_count} congestion segments but {road_class_count} road classes")]
    RoadClassCountMismatch {
        road_class_count: usize,
        level_count: usize,
    },

    /// The selected-route index does not point into the candidate route list.
    #[error("selected route index {index} out of range for {route_count} routes")]
    SelectedRouteOutOfRange { index: usize, route_count: usize },
}

/// Result type alias for route-overlays operations.
pub type Result<T> = std::result::Result<T, OverlayError>;
