//! Closed-loop phase alignment.
//!
//! Two loops of the same shape whose vertex lists start at different
//! places interpolate with a visible swirl when matched index for index.
//! These helpers pick the start vertex that lines the loop up with a
//! reference run.

use crate::geometry::math::endpoint_weighted_cost;
use crate::geometry::path::{open_loop, resample};
use crate::model::{Point, Vec2};

#[derive(Clone, Debug)]
pub struct PhaseFit {
    /// The loop restarted at `rotation`, closed and resampled to the
    /// reference's point count.
    pub points: Vec<Vec2>,
    pub rotation: usize,
    pub cost: f32,
}

/// Restart a loop at vertex `r` and close it again.
pub fn reclose_at(loop_pts: &[Vec2], r: usize) -> Vec<Vec2> {
    let m = loop_pts.len();
    if m == 0 {
        return Vec::new();
    }
    let mut out = Vec::with_capacity(m + 1);
    out.extend_from_slice(&loop_pts[r % m..]);
    out.extend_from_slice(&loop_pts[..r % m]);
    out.push(loop_pts[r % m]);
    out
}

fn fit_at(reference: &[Vec2], loop_pts: &[Vec2], r: usize, endpoint_weight: f32) -> PhaseFit {
    let points = resample(&reclose_at(loop_pts, r), reference.len());
    let cost = endpoint_weighted_cost(reference, &points, endpoint_weight);
    PhaseFit { points, rotation: r, cost }
}

/// Pairing with the loop's own start vertex, no search.
pub fn naive_fit(reference: &[Vec2], loop_pts: &[Vec2], endpoint_weight: f32) -> PhaseFit {
    fit_at(reference, open_loop(loop_pts), 0, endpoint_weight)
}

/// Try every vertex of `loop_pts` as the new start and keep the rotation
/// with the lowest endpoint-weighted cost. The first minimum wins.
pub fn align_loop(reference: &[Vec2], loop_pts: &[Vec2], endpoint_weight: f32) -> PhaseFit {
    let ring = open_loop(loop_pts);
    let mut best = fit_at(reference, ring, 0, endpoint_weight);
    for r in 1..ring.len() {
        let fit = fit_at(reference, ring, r, endpoint_weight);
        if fit.cost < best.cost {
            best = fit;
        }
    }
    best
}

/// Best cyclic shift of an equal-length loop, without resampling.
/// Returns the index that should become the new first vertex.
pub fn best_cyclic_shift(reference: &[Vec2], loop_pts: &[Vec2], endpoint_weight: f32) -> usize {
    let m = loop_pts.len();
    if m == 0 || m != reference.len() {
        return 0;
    }
    let mut best = 0;
    let mut best_cost = f32::INFINITY;
    let mut shifted = Vec::with_capacity(m);
    for r in 0..m {
        shifted.clear();
        shifted.extend_from_slice(&loop_pts[r..]);
        shifted.extend_from_slice(&loop_pts[..r]);
        let cost = endpoint_weighted_cost(reference, &shifted, endpoint_weight);
        if cost < best_cost {
            best = r;
            best_cost = cost;
        }
    }
    best
}

/// Rotate a closed point list so `r` becomes the first vertex. Handles
/// travel with their points, so the curve itself is unchanged.
pub fn rotate_points(points: &[Point], r: usize) -> Vec<Point> {
    if points.is_empty() {
        return Vec::new();
    }
    let r = r % points.len();
    let mut out = Vec::with_capacity(points.len());
    out.extend_from_slice(&points[r..]);
    out.extend_from_slice(&points[..r]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::math::pointwise_cost;

    fn ring(n: usize, offset: usize) -> Vec<Vec2> {
        (0..n)
            .map(|i| {
                let a = ((i + offset) % n) as f32 / n as f32 * std::f32::consts::TAU;
                Vec2::new(50.0 * a.cos(), 50.0 * a.sin())
            })
            .collect()
    }

    #[test]
    fn reclose_wraps_and_closes() {
        let pts = vec![Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0), Vec2::new(1.0, 1.0)];
        let r = reclose_at(&pts, 1);
        assert_eq!(r, vec![pts[1], pts[2], pts[0], pts[1]]);
    }

    #[test]
    fn align_recovers_rotation() {
        let reference_ring = ring(16, 0);
        let mut reference = reference_ring.clone();
        reference.push(reference_ring[0]);
        let rotated = ring(16, 5);

        let fit = align_loop(&reference, &rotated, 5.0);
        assert_eq!(fit.rotation, 11);
        assert!(pointwise_cost(&reference, &fit.points) < 0.05);

        let naive = naive_fit(&reference, &rotated, 5.0);
        assert!(fit.cost <= naive.cost);
    }

    #[test]
    fn cyclic_shift_matches_offset() {
        let reference = ring(12, 0);
        let rotated = ring(12, 4);
        let r = best_cyclic_shift(&reference, &rotated, 5.0);
        assert_eq!(r, 8);
        let pts: Vec<Point> = rotated.iter().map(|&v| Point::from(v)).collect();
        let shifted = rotate_points(&pts, r);
        assert!((shifted[0].x - reference[0].x).abs() < 1e-4);
    }
}
