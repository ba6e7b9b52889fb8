// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Contour helpers: flat contour extraction from a binary edge map, simple
// chain compression, area selection and closed-polygon approximation.

use image::GrayImage;
use imageproc::contours::find_contours;
use imageproc::geometry::{approximate_polygon_dp, arc_length};
use imageproc::point::Point;

pub(crate) type Chain = Vec<Point<i32>>;

/// Extract every border (outer and hole) from a binary edge map as one flat
/// list, each chain compressed to its turning points.
pub(crate) fn extract_contours(edges: &GrayImage) -> Vec<Chain> {
    find_contours::<i32>(edges)
        .into_iter()
        .map(|contour| compress_chain(&contour.points))
        .collect()
}

/// Drop points that sit in the middle of a horizontal, vertical or diagonal
/// run. The chain is treated as closed.
pub(crate) fn compress_chain(points: &[Point<i32>]) -> Chain {
    let n = points.len();
    if n < 3 {
        return points.to_vec();
    }

    let step = |a: Point<i32>, b: Point<i32>| ((b.x - a.x).signum(), (b.y - a.y).signum());

    let kept: Chain = (0..n)
        .filter(|&i| {
            let prev = points[(i + n - 1) % n];
            let next = points[(i + 1) % n];
            step(prev, points[i]) != step(points[i], next)
        })
        .map(|i| points[i])
        .collect();

    if kept.len() < 2 { points.to_vec() } else { kept }
}

/// Unsigned enclosed area of a closed chain (shoelace formula).
pub(crate) fn contour_area(points: &[Point<i32>]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut twice_area = 0i64;
    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        twice_area += a.x as i64 * b.y as i64 - b.x as i64 * a.y as i64;
    }
    twice_area.abs() as f64 / 2.0
}

/// Index and area of the contour with the largest enclosed area. Ties keep
/// the first contour.
pub(crate) fn largest_contour(contours: &[Chain]) -> Option<(usize, f64)> {
    let mut best: Option<(usize, f64)> = None;
    for (index, contour) in contours.iter().enumerate() {
        let area = contour_area(contour);
        match best {
            Some((_, best_area)) if area <= best_area => {}
            _ => best = Some((index, area)),
        }
    }
    best
}

/// Perimeter of the chain, closing the last point back to the first.
pub(crate) fn closed_perimeter(points: &[Point<i32>]) -> f64 {
    if points.len() < 2 {
        return 0.0;
    }
    arc_length(points, true)
}

/// Douglas-Peucker approximation of a closed chain.
///
/// The chain is split at two mutually distant points (both lie on the convex
/// hull, so they survive any approximation) and each half is simplified as
/// an open curve. The result has no repeated closing vertex.
pub(crate) fn approximate_closed_polygon(points: &[Point<i32>], epsilon: f64) -> Chain {
    let n = points.len();
    if n < 3 || !(epsilon > 0.0) {
        return points.to_vec();
    }

    let start = farthest_from(points, points[0]);
    let end = farthest_from(points, points[start]);
    if squared_distance(points[start], points[end]) == 0 {
        return vec![points[start]];
    }

    let rotated: Chain = (0..n).map(|i| points[(start + i) % n]).collect();
    let split = (end + n - start) % n;

    let mut polygon = approximate_polygon_dp(&rotated[..=split], epsilon, false);

    let mut back_half: Chain = rotated[split..].to_vec();
    back_half.push(rotated[0]);
    let back = approximate_polygon_dp(&back_half, epsilon, false);

    // `back` starts at the split point and ends at the start point, both
    // already present in `polygon`.
    if back.len() > 2 {
        polygon.extend_from_slice(&back[1..back.len() - 1]);
    }
    polygon
}

fn farthest_from(points: &[Point<i32>], origin: Point<i32>) -> usize {
    let mut best = (0usize, -1i64);
    for (index, &point) in points.iter().enumerate() {
        let d = squared_distance(origin, point);
        if d > best.1 {
            best = (index, d);
        }
    }
    best.0
}

fn squared_distance(a: Point<i32>, b: Point<i32>) -> i64 {
    let dx = (b.x - a.x) as i64;
    let dy = (b.y - a.y) as i64;
    dx * dx + dy * dy
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;
    use imageproc::drawing::draw_hollow_rect_mut;
    use imageproc::rect::Rect;

    fn p(x: i32, y: i32) -> Point<i32> {
        Point::new(x, y)
    }

    /// Every pixel along the border of an axis-aligned rectangle, clockwise.
    fn rectangle_chain(x0: i32, y0: i32, x1: i32, y1: i32) -> Chain {
        let mut chain = Vec::new();
        chain.extend((x0..x1).map(|x| p(x, y0)));
        chain.extend((y0..y1).map(|y| p(x1, y)));
        chain.extend((x0 + 1..=x1).rev().map(|x| p(x, y1)));
        chain.extend((y0 + 1..=y1).rev().map(|y| p(x0, y)));
        chain
    }

    #[test]
    fn compression_keeps_only_rectangle_corners() {
        let chain = rectangle_chain(2, 3, 12, 9);
        let compressed = compress_chain(&chain);
        assert_eq!(compressed, vec![p(2, 3), p(12, 3), p(12, 9), p(2, 9)]);
    }

    #[test]
    fn compression_leaves_tiny_chains_alone() {
        let chain = vec![p(0, 0), p(1, 1)];
        assert_eq!(compress_chain(&chain), chain);
    }

    #[test]
    fn area_of_compressed_rectangle() {
        let chain = vec![p(0, 0), p(10, 0), p(10, 5), p(0, 5)];
        assert_eq!(contour_area(&chain), 50.0);
        assert_eq!(contour_area(&[p(0, 0), p(3, 3)]), 0.0);
    }

    #[test]
    fn largest_contour_prefers_first_on_ties() {
        let small = vec![p(0, 0), p(2, 0), p(2, 2), p(0, 2)];
        let big = vec![p(0, 0), p(9, 0), p(9, 9), p(0, 9)];
        let big_again = big.clone();
        let contours = vec![small, big, big_again];
        assert_eq!(largest_contour(&contours), Some((1, 81.0)));
        assert_eq!(largest_contour(&[]), None);
    }

    #[test]
    fn perimeter_closes_the_loop() {
        let chain = vec![p(0, 0), p(10, 0), p(10, 5), p(0, 5)];
        assert!((closed_perimeter(&chain) - 30.0).abs() < 1e-9);
    }

    #[test]
    fn closed_approximation_of_full_rectangle_chain_has_four_vertices() {
        let chain = rectangle_chain(10, 10, 110, 70);
        let epsilon = 0.02 * closed_perimeter(&chain);
        let polygon = approximate_closed_polygon(&chain, epsilon);

        assert_eq!(polygon.len(), 4, "got {polygon:?}");
        for corner in [p(10, 10), p(110, 10), p(110, 70), p(10, 70)] {
            assert!(polygon.contains(&corner), "missing {corner:?} in {polygon:?}");
        }
    }

    #[test]
    fn closed_approximation_of_single_point() {
        let chain = vec![p(4, 4), p(4, 4), p(4, 4)];
        assert_eq!(approximate_closed_polygon(&chain, 1.0), vec![p(4, 4)]);
    }

    #[test]
    fn drawn_rectangle_outline_is_one_of_the_contours() {
        let mut edges = GrayImage::new(60, 40);
        draw_hollow_rect_mut(&mut edges, Rect::at(10, 8).of_size(30, 20), Luma([255u8]));

        let contours = extract_contours(&edges);
        let (index, area) = largest_contour(&contours).expect("outline has contours");
        // Outer border of the one-pixel outline runs through the outline itself.
        assert!((area - 29.0 * 19.0).abs() < 1.0, "area {area}");
        assert_eq!(contours[index].len(), 4);
    }
}
