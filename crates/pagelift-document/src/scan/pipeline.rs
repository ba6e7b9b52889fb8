// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Document scanner: detect the page, rectify it, and fall back to the full
// frame whenever the geometry is unusable.

use std::sync::Arc;

use image::{DynamicImage, GenericImageView};
use pagelift_core::error::{PageliftError, Result};
use pagelift_core::{FallbackReason, Quad, ScanConfig};
use tracing::{debug, info, instrument, warn};

use super::detect::CornerDetector;
use super::rectify::PerspectiveRectifier;
use crate::image::processor::ImageProcessor;

/// One rectified page with the geometry that produced it.
#[derive(Debug, Clone)]
pub struct ScannedPage {
    pub image: DynamicImage,
    /// Corners used for rectification, in source-image pixels.
    pub quad: Quad,
    /// Set when the full-image quad was used instead of a detected one.
    pub fallback: Option<FallbackReason>,
}

/// Composes [`CornerDetector`] and [`PerspectiveRectifier`].
///
/// Holds no mutable state, so one scanner can serve many pages concurrently
/// (see [`scan_pages`](Self::scan_pages)).
pub struct DocumentScanner {
    config: ScanConfig,
    detector: CornerDetector,
    rectifier: PerspectiveRectifier,
}

impl DocumentScanner {
    /// Validate `config` and build a scanner using its ordering strategy.
    pub fn new(config: ScanConfig) -> Result<Self> {
        config.validate()?;
        let detector = CornerDetector::new(&config);
        Ok(Self {
            config,
            detector,
            rectifier: PerspectiveRectifier::new(),
        })
    }

    /// Build a scanner around a caller-configured detector.
    pub fn with_detector(config: ScanConfig, detector: CornerDetector) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            detector,
            rectifier: PerspectiveRectifier::new(),
        })
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    pub fn detector(&self) -> &CornerDetector {
        &self.detector
    }

    /// Detect the page in `image` and rectify it.
    ///
    /// Geometry never fails the call: a detected quad that cannot be rectified
    /// is replaced by the full-image quad. Only an image without pixels is an
    /// error.
    #[instrument(skip_all, fields(width = image.width(), height = image.height()))]
    pub fn scan_document(&self, image: &DynamicImage) -> Result<ScannedPage> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(PageliftError::EmptyImage { width, height });
        }

        let detection = self.detector.detect_corners(image);
        match self.rectifier.rectify(image, &detection.quad) {
            Ok(rectified) => {
                info!(
                    out_w = rectified.width(),
                    out_h = rectified.height(),
                    fallback = ?detection.fallback,
                    "Document scanned"
                );
                Ok(ScannedPage {
                    image: rectified,
                    quad: detection.quad,
                    fallback: detection.fallback,
                })
            }
            Err(PageliftError::DegenerateQuad(detail)) if detection.fallback.is_none() => {
                warn!(%detail, "Detected quad is degenerate; rectifying full frame");
                let quad = Quad::from_image_bounds(width, height);
                let rectified = self.rectifier.rectify(image, &quad)?;
                Ok(ScannedPage {
                    image: rectified,
                    quad,
                    fallback: Some(FallbackReason::DegenerateQuad),
                })
            }
            Err(err) => Err(err),
        }
    }

    /// Decode encoded image bytes and scan them. Decode failures propagate.
    pub fn scan_bytes(&self, data: &[u8]) -> Result<ScannedPage> {
        let page = ImageProcessor::from_bytes(data)?;
        self.scan_document(page.as_dynamic())
    }

    /// Scan a multi-page capture, one blocking worker per page.
    ///
    /// More pages than `max_pages` is refused up front. Results keep input
    /// order; the first failing page fails the whole batch.
    #[instrument(skip_all, fields(pages = pages.len()))]
    pub async fn scan_pages(self: Arc<Self>, pages: Vec<Vec<u8>>) -> Result<Vec<ScannedPage>> {
        let limit = self.config.max_pages;
        if pages.len() > limit {
            return Err(PageliftError::PageLimitExceeded {
                limit,
                requested: pages.len(),
            });
        }

        let handles: Vec<_> = pages
            .into_iter()
            .enumerate()
            .map(|(index, data)| {
                let scanner = Arc::clone(&self);
                tokio::task::spawn_blocking(move || {
                    debug!(page = index + 1, bytes = data.len(), "Scanning page");
                    scanner.scan_bytes(&data)
                })
            })
            .collect();

        let mut scanned = Vec::with_capacity(handles.len());
        for (index, handle) in handles.into_iter().enumerate() {
            let page = handle
                .await
                .map_err(|err| PageliftError::Worker(format!("page {}: {}", index + 1, err)))??;
            scanned.push(page);
        }

        info!(pages = scanned.len(), "Batch scan complete");
        Ok(scanned)
    }
}
