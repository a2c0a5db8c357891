// Copyright 2025 Lars Brubaker
// License: MIT
//
// Error kinds raised (or recorded) while building a visibility polygon.

use thiserror::Error;

use crate::segment::SegmentIdx;

/// Errors and diagnostics produced by the visibility engine.
///
/// `DegenerateInput`, `ParallelIntersection` and `SplitOverflow` are returned
/// as `Err`; `InconsistentOrdering` (and skipped parallel arcs) are only ever
/// recorded in [`crate::Visibility::diagnostics`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum VisibilityError {
    /// A segment with coincident endpoints, or an unusable outline size.
    #[error("degenerate input: segment has zero length")]
    DegenerateInput,

    /// Line intersection requested for (near) parallel lines.
    #[error("line intersection requested for parallel lines")]
    ParallelIntersection,

    /// Overlap splitting produced more segments than the configured cap.
    #[error("overlap splitting exceeded the limit of {limit} segments")]
    SplitOverflow {
        /// The configured `max_segments`.
        limit: usize,
    },

    /// The in-front-of predicate reported two active segments as crossing.
    #[error("segments {segment} and {occupant} reported as crossing during the sweep")]
    InconsistentOrdering {
        /// Segment being inserted.
        segment: SegmentIdx,
        /// Active segment it was compared against.
        occupant: SegmentIdx,
    },
}
