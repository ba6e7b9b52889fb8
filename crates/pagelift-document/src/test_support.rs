// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Synthetic page images for unit tests.

use image::{GrayImage, Luma};
use imageproc::drawing::draw_polygon_mut;
use imageproc::point::Point as PixelPoint;
use pagelift_core::Point;

/// A bright filled quadrilateral (the "page") on a dark background.
pub(crate) fn page_on_background(width: u32, height: u32, corners: [(i32, i32); 4]) -> GrayImage {
    let mut img = GrayImage::from_pixel(width, height, Luma([20u8]));
    let polygon: Vec<PixelPoint<i32>> = corners
        .iter()
        .map(|&(x, y)| PixelPoint::new(x, y))
        .collect();
    draw_polygon_mut(&mut img, &polygon, Luma([235u8]));
    img
}

/// Whether `point` lies within `tolerance` pixels of `expected`.
pub(crate) fn within(point: Point, expected: (f32, f32), tolerance: f64) -> bool {
    point.distance(Point::new(expected.0, expected.1)) <= tolerance
}
