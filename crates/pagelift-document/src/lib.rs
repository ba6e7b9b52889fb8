// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// pagelift-document — Page detection and rectification for Pagelift.
//
// Provides image decode/encode helpers and the scanning pipeline: corner
// detection on a photographed page, perspective rectification of the detected
// quadrilateral, and a facade composing both with a full-image fallback.

pub mod image;
pub mod scan;

#[cfg(test)]
mod test_support;

// Re-export the primary structs so callers can use `pagelift_document::DocumentScanner` etc.
pub use crate::image::processor::ImageProcessor;
pub use crate::scan::detect::{CornerDetection, CornerDetector};
pub use crate::scan::ordering::{
    CentroidQuadrantOrdering, CornerOrderingStrategy, RowMajorOrdering,
};
pub use crate::scan::pipeline::{DocumentScanner, ScannedPage};
pub use crate::scan::rectify::PerspectiveRectifier;
