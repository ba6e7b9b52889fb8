// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Corner detection: locate the quadrilateral boundary of a photographed page.

use image::{DynamicImage, GenericImageView, GrayImage};
use imageproc::edges::canny;
use imageproc::filter::separable_filter_equal;
use pagelift_core::{FallbackReason, Point, Quad, ScanConfig};
use tracing::{debug, info, instrument, warn};

use super::contour::{
    approximate_closed_polygon, closed_perimeter, extract_contours, largest_contour,
};
use super::ordering::{CornerOrderingStrategy, strategy_for};

/// Outcome of a detection pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CornerDetection {
    /// Ordered corners; the full-image quad when `fallback` is set.
    pub quad: Quad,
    /// Why the full-image quad was used, if it was.
    pub fallback: Option<FallbackReason>,
    /// Vertices in the polygon approximation of the largest contour (0 when
    /// there were no contours).
    pub vertex_count: usize,
}

impl CornerDetection {
    fn fallback(width: u32, height: u32, reason: FallbackReason, vertex_count: usize) -> Self {
        Self {
            quad: Quad::from_image_bounds(width, height),
            fallback: Some(reason),
            vertex_count,
        }
    }
}

/// Finds the page boundary in a photographed document.
///
/// ## Pipeline
///
/// 1. Convert to grayscale
/// 2. Gaussian smoothing with an exact `k x k` kernel (5x5 by default)
/// 3. Canny edge detection (75 / 200 by default)
/// 4. Flat contour extraction with simple chain compression
/// 5. Pick the contour with the largest enclosed area
/// 6. Douglas-Peucker approximation, epsilon = factor x perimeter
/// 7. Order the vertices into a `Quad` with the configured strategy
///
/// Detection never fails: when no contour exists or the polygon cannot be
/// ordered, the image's own bounding rectangle is returned.
pub struct CornerDetector {
    kernel: Vec<f32>,
    canny_low: f32,
    canny_high: f32,
    epsilon_factor: f64,
    strategy: Box<dyn CornerOrderingStrategy>,
}

impl CornerDetector {
    /// Build a detector using the strategy named in `config`.
    pub fn new(config: &ScanConfig) -> Self {
        Self::with_strategy(config, strategy_for(config.corner_ordering))
    }

    /// Build a detector with a caller-supplied ordering strategy.
    pub fn with_strategy(config: &ScanConfig, strategy: Box<dyn CornerOrderingStrategy>) -> Self {
        Self {
            kernel: gaussian_kernel(config.blur_kernel_size, config.effective_blur_sigma()),
            canny_low: config.canny_low,
            canny_high: config.canny_high,
            epsilon_factor: config.epsilon_factor,
            strategy,
        }
    }

    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }

    /// Best-guess page quad. Never fails.
    pub fn detect(&self, image: &DynamicImage) -> Quad {
        self.detect_corners(image).quad
    }

    /// Like [`detect`](Self::detect), also reporting whether and why the
    /// fallback quad was used.
    #[instrument(skip_all, fields(width = image.width(), height = image.height(), strategy = self.strategy.name()))]
    pub fn detect_corners(&self, image: &DynamicImage) -> CornerDetection {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return CornerDetection::fallback(width, height, FallbackReason::NoContours, 0);
        }

        let gray = image.to_luma8();
        let blurred = self.smooth(&gray);
        let edges = canny(&blurred, self.canny_low, self.canny_high);

        let contours = extract_contours(&edges);
        debug!(contour_count = contours.len(), "Contours extracted");

        let Some((index, area)) = largest_contour(&contours) else {
            warn!("No contours in edge map; using full-image quad");
            return CornerDetection::fallback(width, height, FallbackReason::NoContours, 0);
        };
        let contour = &contours[index];

        let perimeter = closed_perimeter(contour);
        let epsilon = self.epsilon_factor * perimeter;
        let vertices: Vec<Point> = approximate_closed_polygon(contour, epsilon)
            .into_iter()
            .map(|p| Point::new(p.x as f32, p.y as f32))
            .collect();
        debug!(
            area,
            perimeter,
            epsilon,
            vertex_count = vertices.len(),
            "Largest contour approximated"
        );

        let vertex_count = vertices.len();
        let ordered = if vertex_count < 4 {
            None
        } else {
            self.strategy.order(&vertices)
        };

        match ordered {
            Some(quad) => {
                info!(
                    top_left = ?quad.top_left,
                    top_right = ?quad.top_right,
                    bottom_right = ?quad.bottom_right,
                    bottom_left = ?quad.bottom_left,
                    area = quad.area(),
                    "Page corners detected"
                );
                CornerDetection {
                    quad,
                    fallback: None,
                    vertex_count,
                }
            }
            None => {
                warn!(vertex_count, "Polygon cannot be ordered into a quad; using full-image quad");
                CornerDetection::fallback(
                    width,
                    height,
                    FallbackReason::UnusablePolygon {
                        vertices: vertex_count,
                    },
                    vertex_count,
                )
            }
        }
    }

    fn smooth(&self, gray: &GrayImage) -> GrayImage {
        separable_filter_equal(gray, &self.kernel)
    }
}

/// Normalised 1D Gaussian taps for a separable `size x size` kernel.
pub(crate) fn gaussian_kernel(size: u32, sigma: f32) -> Vec<f32> {
    let radius = (size / 2) as i32;
    let denom = 2.0 * sigma * sigma;
    let taps: Vec<f32> = (-radius..=radius)
        .map(|i| (-((i * i) as f32) / denom).exp())
        .collect();
    let sum: f32 = taps.iter().sum();
    taps.into_iter().map(|t| t / sum).collect()
}
