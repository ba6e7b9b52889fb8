// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Pagelift.

use thiserror::Error;

/// Top-level error type for all Pagelift operations.
///
/// Geometry problems during detection never surface here: the detector falls
/// back to the full-image quad instead. What remains are failures to read,
/// allocate or write image buffers, plus host-side configuration mistakes.
#[derive(Debug, Error)]
pub enum PageliftError {
    // -- Image errors --
    #[error("image processing failed: {0}")]
    ImageError(String),

    #[error("image has no pixels ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },

    #[error("quadrilateral cannot be rectified: {0}")]
    DegenerateQuad(String),

    // -- Configuration / batch --
    #[error("invalid scan configuration: {0}")]
    InvalidConfig(String),

    #[error("too many pages: {requested} requested, limit is {limit}")]
    PageLimitExceeded { limit: usize, requested: usize },

    #[error("scan worker failed: {0}")]
    Worker(String),

    // -- Storage / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, PageliftError>;
