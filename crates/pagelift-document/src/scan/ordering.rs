// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Corner ordering strategies: turn the vertices of an approximated polygon
// into a `Quad` in top-left, top-right, bottom-right, bottom-left order.

use pagelift_core::{CornerOrdering, Point, Quad};

/// Assigns polygon vertices to quad corners.
///
/// Returning `None` means the vertices cannot establish the quad invariant;
/// the detector then falls back to the full-image quad.
pub trait CornerOrderingStrategy: Send + Sync {
    /// Short, stable name used in logs and reports.
    fn name(&self) -> &'static str;

    /// Order `vertices` (as produced by the polygon approximation) into a quad.
    fn order(&self, vertices: &[Point]) -> Option<Quad>;
}

/// Build the strategy selected in configuration.
pub fn strategy_for(ordering: CornerOrdering) -> Box<dyn CornerOrderingStrategy> {
    match ordering {
        CornerOrdering::RowMajor => Box::new(RowMajorOrdering),
        CornerOrdering::CentroidQuadrant => Box::new(CentroidQuadrantOrdering),
    }
}

/// Takes the first four vertices, sorts them by ascending `y` then ascending
/// `x`, and assigns them in that order to TL, TR, BR, BL.
///
/// Known limitation: the two lower points end up in ascending `x`, so for an
/// upright page the bottom corners are swapped relative to the true geometry.
/// Kept as-is for compatibility; use [`CentroidQuadrantOrdering`] when true
/// corner correspondence matters.
#[derive(Debug, Clone, Copy, Default)]
pub struct RowMajorOrdering;

impl CornerOrderingStrategy for RowMajorOrdering {
    fn name(&self) -> &'static str {
        CornerOrdering::RowMajor.as_str()
    }

    fn order(&self, vertices: &[Point]) -> Option<Quad> {
        let mut points: [Point; 4] = vertices.get(..4)?.try_into().ok()?;
        points.sort_by(|a, b| a.y.total_cmp(&b.y).then(a.x.total_cmp(&b.x)));
        Some(Quad::new(points[0], points[1], points[2], points[3]))
    }
}

/// Accepts exactly four vertices and classifies each by its quadrant relative
/// to the centroid (strict comparisons). A corner with no candidate takes the
/// vertex at the same position in the input.
#[derive(Debug, Clone, Copy, Default)]
pub struct CentroidQuadrantOrdering;

impl CornerOrderingStrategy for CentroidQuadrantOrdering {
    fn name(&self) -> &'static str {
        CornerOrdering::CentroidQuadrant.as_str()
    }

    fn order(&self, vertices: &[Point]) -> Option<Quad> {
        let points: [Point; 4] = vertices.try_into().ok()?;

        let cx = points.iter().map(|p| p.x as f64).sum::<f64>() / 4.0;
        let cy = points.iter().map(|p| p.y as f64).sum::<f64>() / 4.0;

        let find = |left: bool, above: bool| {
            points.iter().copied().find(|p| {
                let (x, y) = (p.x as f64, p.y as f64);
                let horizontal = if left { x < cx } else { x > cx };
                let vertical = if above { y < cy } else { y > cy };
                horizontal && vertical
            })
        };

        Some(Quad::new(
            find(true, true).unwrap_or(points[0]),
            find(false, true).unwrap_or(points[1]),
            find(false, false).unwrap_or(points[2]),
            find(true, false).unwrap_or(points[3]),
        ))
    }
}
