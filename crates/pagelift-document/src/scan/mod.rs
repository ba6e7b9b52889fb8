// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scanning pipeline: corner detection, corner ordering strategies,
// perspective rectification and the composed document scanner.

mod contour;
pub mod detect;
pub mod ordering;
pub mod pipeline;
pub mod rectify;

pub use detect::{CornerDetection, CornerDetector};
pub use ordering::{CentroidQuadrantOrdering, CornerOrderingStrategy, RowMajorOrdering};
pub use pipeline::{DocumentScanner, ScannedPage};
pub use rectify::PerspectiveRectifier;
