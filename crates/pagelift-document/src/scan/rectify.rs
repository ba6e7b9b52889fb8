// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Perspective rectification: warp a page quadrilateral into an axis-aligned
// rectangle.

use image::{DynamicImage, GrayImage, Luma, Rgba, RgbaImage};
use imageproc::geometric_transformations::{Interpolation, Projection, warp_into};
use pagelift_core::error::{PageliftError, Result};
use pagelift_core::Quad;
use tracing::{debug, info, instrument};

/// Output pixel budget; a page no larger than its source is always allowed.
const MAX_OUTPUT_PIXELS: u64 = 1 << 28;

/// Flattens the region inside a `Quad` into a new rectangular image.
///
/// The quad is trusted to be in TL, TR, BR, BL order; convexity and order are
/// not checked. The destination rectangle is `(0,0), (W,0), (W,H), (0,H)`
/// where `W` and `H` come from [`target_dimensions`](Self::target_dimensions).
#[derive(Debug, Clone, Copy, Default)]
pub struct PerspectiveRectifier;

impl PerspectiveRectifier {
    pub fn new() -> Self {
        Self
    }

    /// Output size for `quad`: the longer of each pair of opposite edges,
    /// truncated toward zero.
    pub fn target_dimensions(quad: &Quad) -> (u32, u32) {
        let width = quad.top_width().max(quad.bottom_width());
        let height = quad.left_height().max(quad.right_height());
        (width as u32, height as u32)
    }

    /// Warp the quad region of `image` into a new image with bilinear
    /// sampling. The source image is left untouched.
    ///
    /// 8-bit grayscale sources stay single-channel; everything else is
    /// warped as RGBA8, so 16-bit and float sources lose precision. Output
    /// pixels whose pre-image falls outside the source are transparent black.
    ///
    /// Returns `DegenerateQuad` when the quad has zero extent or no
    /// perspective transform maps it onto the rectangle.
    #[instrument(skip_all, fields(src_w = image.width(), src_h = image.height()))]
    pub fn rectify(&self, image: &DynamicImage, quad: &Quad) -> Result<DynamicImage> {
        let (width, height) = Self::target_dimensions(quad);
        if width == 0 || height == 0 {
            return Err(PageliftError::DegenerateQuad(format!(
                "target size {width}x{height}"
            )));
        }
        let pixels = width as u64 * height as u64;
        let budget = MAX_OUTPUT_PIXELS.max(image.width() as u64 * image.height() as u64);
        if pixels > budget {
            return Err(PageliftError::ImageError(format!(
                "rectified page of {width}x{height} exceeds {budget} pixels"
            )));
        }

        let (w, h) = (width as f32, height as f32);
        let dest: [(f32, f32); 4] = [
            (0.0, 0.0), // top-left
            (w, 0.0),   // top-right
            (w, h),     // bottom-right
            (0.0, h),   // bottom-left
        ];

        let projection = Projection::from_control_points(quad.to_control_points(), dest)
            .ok_or_else(|| {
                PageliftError::DegenerateQuad("no perspective transform for corners".into())
            })?;
        debug!(width, height, "Perspective transform solved");

        let output = match image {
            DynamicImage::ImageLuma8(gray) => {
                let mut out = GrayImage::new(width, height);
                warp_into(gray, &projection, Interpolation::Bilinear, Luma([0u8]), &mut out);
                DynamicImage::ImageLuma8(out)
            }
            other => {
                let rgba = other.to_rgba8();
                let mut out = RgbaImage::new(width, height);
                warp_into(
                    &rgba,
                    &projection,
                    Interpolation::Bilinear,
                    Rgba([0u8, 0, 0, 0]),
                    &mut out,
                );
                DynamicImage::ImageRgba8(out)
            }
        };

        info!(width, height, "Page rectified");
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, Rgb, RgbImage};
    use pagelift_core::Point;

    fn skewed_quad() -> Quad {
        Quad::new(
            Point::new(100.0, 50.0),
            Point::new(900.0, 60.0),
            Point::new(880.0, 750.0),
            Point::new(120.0, 740.0),
        )
    }

    #[test]
    fn dimensions_take_longer_edges_and_truncate() {
        // top 800.06, bottom 760.07, left/right 690.29
        assert_eq!(
            PerspectiveRectifier::target_dimensions(&skewed_quad()),
            (800, 690)
        );
    }

    #[test]
    fn dimensions_truncate_rather_than_round() {
        let quad = Quad::new(
            Point::new(0.0, 0.0),
            Point::new(10.9, 0.0),
            Point::new(10.9, 5.99),
            Point::new(0.0, 5.99),
        );
        assert_eq!(PerspectiveRectifier::target_dimensions(&quad), (10, 5));
    }

    #[test]
    fn identity_quad_keeps_size_and_pixels() {
        let (w, h) = (100u32, 80u32);
        let src = GrayImage::from_fn(w, h, |x, y| Luma([(x / 2 + y / 2) as u8]));
        let image = DynamicImage::ImageLuma8(src.clone());

        let out = PerspectiveRectifier::new()
            .rectify(&image, &Quad::from_image_bounds(w, h))
            .unwrap();

        assert_eq!(out.dimensions(), (w, h));
        // Border samples may land just outside the source and take the fill.
        let out = out.as_luma8().expect("grayscale stays grayscale");
        for y in 1..h - 1 {
            for x in 1..w - 1 {
                let a = src.get_pixel(x, y).0[0] as i32;
                let b = out.get_pixel(x, y).0[0] as i32;
                assert!((a - b).abs() <= 1, "pixel ({x},{y}): {a} vs {b}");
            }
        }
    }

    #[test]
    fn colour_source_becomes_rgba() {
        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(40, 30, Rgb([200, 100, 50])));
        let quad = Quad::new(
            Point::new(5.0, 5.0),
            Point::new(35.0, 5.0),
            Point::new(35.0, 25.0),
            Point::new(5.0, 25.0),
        );
        let out = PerspectiveRectifier::new().rectify(&image, &quad).unwrap();

        assert_eq!(out.dimensions(), (30, 20));
        let rgba = out.as_rgba8().expect("colour output is RGBA");
        let pixel = rgba.get_pixel(10, 10).0;
        for (got, want) in pixel.iter().zip([200u8, 100, 50, 255]) {
            assert!(got.abs_diff(want) <= 1, "{pixel:?}");
        }
    }

    #[test]
    fn source_is_not_mutated() {
        let src = GrayImage::from_fn(50, 50, |x, _| Luma([(x * 5) as u8]));
        let image = DynamicImage::ImageLuma8(src.clone());
        let quad = Quad::new(
            Point::new(10.0, 5.0),
            Point::new(45.0, 8.0),
            Point::new(40.0, 45.0),
            Point::new(5.0, 40.0),
        );
        let _ = PerspectiveRectifier::new().rectify(&image, &quad).unwrap();
        assert_eq!(image.as_luma8().unwrap(), &src);
    }

    #[test]
    fn collapsed_quad_is_degenerate() {
        let p = Point::new(10.0, 10.0);
        let quad = Quad::new(p, p, p, p);
        let image = DynamicImage::ImageLuma8(GrayImage::new(20, 20));
        assert!(matches!(
            PerspectiveRectifier::new().rectify(&image, &quad),
            Err(PageliftError::DegenerateQuad(_))
        ));
    }

    #[test]
    fn oversized_quad_is_refused_before_allocation() {
        let quad = Quad::from_image_bounds(100_000, 100_000);
        let image = DynamicImage::ImageLuma8(GrayImage::new(20, 20));
        assert!(matches!(
            PerspectiveRectifier::new().rectify(&image, &quad),
            Err(PageliftError::ImageError(_))
        ));
    }

    #[test]
    fn long_thin_source_rectifies_at_full_size() {
        let image = DynamicImage::ImageLuma8(GrayImage::from_pixel(33_000, 2, Luma([7u8])));
        let out = PerspectiveRectifier::new()
            .rectify(&image, &Quad::from_image_bounds(33_000, 2))
            .unwrap();
        assert_eq!(out.dimensions(), (33_000, 2));
    }

    #[test]
    fn sixteen_bit_source_is_warped_as_rgba8() {
        let image = DynamicImage::ImageLuma16(image::ImageBuffer::from_pixel(
            20,
            10,
            Luma([u16::MAX]),
        ));
        let out = PerspectiveRectifier::new()
            .rectify(&image, &Quad::from_image_bounds(20, 10))
            .unwrap();
        let pixel = out.as_rgba8().expect("16-bit input is narrowed").get_pixel(5, 5).0;
        for channel in pixel {
            assert!(channel >= 254, "{pixel:?}");
        }
    }
}
