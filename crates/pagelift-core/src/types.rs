// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for Pagelift: page geometry and scan bookkeeping.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Geometry
// ---------------------------------------------------------------------------

/// A 2D coordinate in image pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`, computed in double precision.
    pub fn distance(self, other: Point) -> f64 {
        let dx = other.x as f64 - self.x as f64;
        let dy = other.y as f64 - self.y as f64;
        dx.hypot(dy)
    }
}

impl From<(f32, f32)> for Point {
    fn from((x, y): (f32, f32)) -> Self {
        Self { x, y }
    }
}

/// Ordered four-corner boundary of a document page.
///
/// Every producer must fill the corners in the winding order top-left,
/// top-right, bottom-right, bottom-left. The rectifier maps corners to
/// destination corners by position and trusts this order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quad {
    pub top_left: Point,
    pub top_right: Point,
    pub bottom_right: Point,
    pub bottom_left: Point,
}

impl Quad {
    pub const fn new(
        top_left: Point,
        top_right: Point,
        bottom_right: Point,
        bottom_left: Point,
    ) -> Self {
        Self {
            top_left,
            top_right,
            bottom_right,
            bottom_left,
        }
    }

    /// The image's own bounding rectangle: `(0,0), (W,0), (W,H), (0,H)`.
    pub fn from_image_bounds(width: u32, height: u32) -> Self {
        let (w, h) = (width as f32, height as f32);
        Self::new(
            Point::new(0.0, 0.0),
            Point::new(w, 0.0),
            Point::new(w, h),
            Point::new(0.0, h),
        )
    }

    /// Corners in winding order: TL, TR, BR, BL.
    pub fn corners(&self) -> [Point; 4] {
        [
            self.top_left,
            self.top_right,
            self.bottom_right,
            self.bottom_left,
        ]
    }

    /// Corners as `(x, y)` tuples, in winding order.
    pub fn to_control_points(&self) -> [(f32, f32); 4] {
        self.corners().map(|p| (p.x, p.y))
    }

    /// Length of the top edge (TL -> TR).
    pub fn top_width(&self) -> f64 {
        self.top_left.distance(self.top_right)
    }

    /// Length of the bottom edge (BL -> BR).
    pub fn bottom_width(&self) -> f64 {
        self.bottom_left.distance(self.bottom_right)
    }

    /// Length of the left edge (TL -> BL).
    pub fn left_height(&self) -> f64 {
        self.top_left.distance(self.bottom_left)
    }

    /// Length of the right edge (TR -> BR).
    pub fn right_height(&self) -> f64 {
        self.top_right.distance(self.bottom_right)
    }

    /// Unsigned area via the shoelace formula over the ordered corners.
    ///
    /// Self-intersecting corner orders give the net (cancelled) area.
    pub fn area(&self) -> f64 {
        let corners = self.corners();
        let mut twice_area = 0.0f64;
        for i in 0..corners.len() {
            let a = corners[i];
            let b = corners[(i + 1) % corners.len()];
            twice_area += a.x as f64 * b.y as f64 - b.x as f64 * a.y as f64;
        }
        twice_area.abs() / 2.0
    }
}

/// Why a detection ended on the full-image quad instead of a contour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "reason")]
pub enum FallbackReason {
    /// The edge map produced no contours at all.
    NoContours,
    /// The largest contour's polygon approximation could not be turned into
    /// an ordered quad (too few vertices, or not exactly four for strategies
    /// that require it).
    UnusablePolygon { vertices: usize },
    /// A quad was found but could not be rectified (zero extent or a
    /// singular transform).
    DegenerateQuad,
}

/// Which corner-ordering strategy the detector uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CornerOrdering {
    /// Sort the first four polygon vertices by `(y, x)` and assign them in
    /// sorted order.
    #[default]
    RowMajor,
    /// Require exactly four vertices and classify them by quadrant relative
    /// to their centroid.
    CentroidQuadrant,
}

impl CornerOrdering {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RowMajor => "row-major",
            Self::CentroidQuadrant => "centroid-quadrant",
        }
    }
}

impl std::fmt::Display for CornerOrdering {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Scan bookkeeping
// ---------------------------------------------------------------------------

/// Unique identifier for one multi-page scan session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One rectified page as persisted by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageRecord {
    /// 1-based page number within the session.
    pub index: usize,
    /// Where the photographed page came from (file path or label).
    pub source: String,
    /// Where the rectified image was written.
    pub output: PathBuf,
    pub width: u32,
    pub height: u32,
    /// Corners used for rectification, in source-image pixels.
    pub quad: Quad,
    /// Present when the full-image quad was used.
    pub fallback: Option<FallbackReason>,
}

/// Result of a scan session handed back to the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanReport {
    pub session_id: SessionId,
    pub created_at: DateTime<Utc>,
    pub ordering: CornerOrdering,
    pub pages: Vec<PageRecord>,
}

impl ScanReport {
    pub fn new(ordering: CornerOrdering) -> Self {
        Self {
            session_id: SessionId::new(),
            created_at: Utc::now(),
            ordering,
            pages: Vec::new(),
        }
    }

    /// Output paths in page order.
    pub fn output_paths(&self) -> Vec<&std::path::Path> {
        self.pages.iter().map(|p| p.output.as_path()).collect()
    }
}
