//! Path measurements and point-count normalization.
//!
//! Two ways of changing a path's point count live here:
//! [`resample`] steps uniformly along arc length and discards the authored
//! vertices, while [`upsample`] only ever inserts points by bisecting the
//! longest edge, so every authored vertex (and its curvature) survives.

use crate::geometry::cubic::{bisect, CubicBezier};
use crate::geometry::flatten::flatten_path;
use crate::geometry::tolerance::{near_zero, safe_div, CLOSE_GAP_ABS, CLOSE_GAP_FRAC, EPS_LEN, EPS_POS};
use crate::model::{Point, Stroke, Vec2};

/// Length of a polyline.
pub fn polyline_length(poly: &[Vec2]) -> f32 {
    poly.windows(2).map(|w| w[0].dist(w[1])).sum()
}

/// Arc length of an open path, following bezier segments where present.
pub fn path_length(points: &[Point], tol: f32) -> f32 {
    let mut total = 0.0;
    for w in points.windows(2) {
        total += match CubicBezier::between(&w[0], &w[1]) {
            Some(c) => c.arc_length(tol),
            None => w[0].pos().dist(w[1].pos()),
        };
    }
    total
}

/// Mean position of a point set. Empty input yields the origin.
pub fn centroid(points: &[Vec2]) -> Vec2 {
    if points.is_empty() {
        return Vec2::ZERO;
    }
    let mut sx = 0.0f64;
    let mut sy = 0.0f64;
    for p in points {
        sx += p.x as f64;
        sy += p.y as f64;
    }
    let n = points.len() as f64;
    Vec2::new((sx / n) as f32, (sy / n) as f32)
}

/// Closure test: the explicit flag wins, otherwise the endpoint gap must be
/// under [`CLOSE_GAP_ABS`] or under [`CLOSE_GAP_FRAC`] of the arc length.
pub fn is_closed(points: &[Point], flag: Option<bool>, tol: f32) -> bool {
    if let Some(closed) = flag {
        return closed;
    }
    if points.len() < 3 {
        return false;
    }
    let gap = points[0].pos().dist(points[points.len() - 1].pos());
    if gap < CLOSE_GAP_ABS {
        return true;
    }
    let len = path_length(points, tol);
    len > EPS_LEN && gap < CLOSE_GAP_FRAC * len
}

pub fn stroke_is_closed(stroke: &Stroke, tol: f32) -> bool {
    is_closed(&stroke.points, stroke.closed, tol)
}

/// Heuristic closure for sampled polylines that carry no flag.
pub fn polyline_is_closed(poly: &[Vec2]) -> bool {
    if poly.len() < 3 {
        return false;
    }
    let gap = poly[0].dist(poly[poly.len() - 1]);
    let len = polyline_length(poly);
    gap < CLOSE_GAP_ABS || (len > EPS_LEN && gap < CLOSE_GAP_FRAC * len)
}

/// True when the last vertex repeats the first.
pub fn has_closing_duplicate(points: &[Point]) -> bool {
    points.len() > 1 && points[0].pos().dist(points[points.len() - 1].pos()) <= EPS_POS
}

/// Drop a repeated closing vertex from a loop polyline.
pub fn open_loop(poly: &[Vec2]) -> &[Vec2] {
    if poly.len() > 1 && poly[0].dist(poly[poly.len() - 1]) <= EPS_POS {
        &poly[..poly.len() - 1]
    } else {
        poly
    }
}

/// Flatten a stroke to a polyline. Closed strokes end on their first point.
pub fn stroke_polyline(stroke: &Stroke, tol: f32) -> Vec<Vec2> {
    let closed = stroke_is_closed(stroke, tol) && !has_closing_duplicate(&stroke.points);
    flatten_path(&stroke.points, closed, tol)
}

/// Reverse a path, swapping each point's handles so curves are preserved.
pub fn reverse_points(points: &[Point]) -> Vec<Point> {
    points.iter().rev().map(Point::flipped).collect()
}

/// Resample a polyline to exactly `n` points spaced uniformly by arc
/// length. The first and last input points are kept as endpoints.
pub fn resample(poly: &[Vec2], n: usize) -> Vec<Vec2> {
    if n == 0 || poly.is_empty() {
        return Vec::new();
    }
    if n == 1 || poly.len() == 1 {
        return vec![poly[0]; n];
    }
    let mut cumulative = Vec::with_capacity(poly.len());
    cumulative.push(0.0f32);
    for w in poly.windows(2) {
        let prev = cumulative[cumulative.len() - 1];
        cumulative.push(prev + w[0].dist(w[1]));
    }
    let total = cumulative[cumulative.len() - 1];
    if near_zero(total, EPS_LEN) {
        return vec![poly[0]; n];
    }

    let mut out = Vec::with_capacity(n);
    let mut seg = 0usize;
    for i in 0..n {
        if i + 1 == n {
            out.push(poly[poly.len() - 1]);
            break;
        }
        let target = total * i as f32 / (n - 1) as f32;
        while seg + 1 < poly.len() - 1 && cumulative[seg + 1] < target {
            seg += 1;
        }
        let seg_len = cumulative[seg + 1] - cumulative[seg];
        let local = safe_div(target - cumulative[seg], seg_len, 0.0).clamp(0.0, 1.0);
        out.push(poly[seg].lerp(poly[seg + 1], local));
    }
    out
}

/// Position at fraction `f` of the polyline's arc length.
pub fn point_at_fraction(poly: &[Vec2], f: f32) -> Option<Vec2> {
    let first = *poly.first()?;
    let total = polyline_length(poly);
    if near_zero(total, EPS_LEN) {
        return Some(first);
    }
    let target = f.clamp(0.0, 1.0) * total;
    let mut acc = 0.0;
    for w in poly.windows(2) {
        let len = w[0].dist(w[1]);
        if acc + len >= target {
            let local = safe_div(target - acc, len, 0.0);
            return Some(w[0].lerp(w[1], local));
        }
        acc += len;
    }
    poly.last().copied()
}

/// Grow `points` to exactly `n` points by repeatedly bisecting the longest
/// edge (the closing edge counts when `closed`). Paths that already have
/// `n` or more points are returned unchanged.
pub fn upsample(points: &[Point], n: usize, closed: bool) -> Vec<Point> {
    let mut out = points.to_vec();
    if out.is_empty() || out.len() >= n {
        return out;
    }
    if out.len() == 1 {
        out.resize(n, points[0]);
        return out;
    }
    while out.len() < n {
        let m = out.len();
        let edge_count = if closed { m } else { m - 1 };
        let mut longest = 0usize;
        let mut longest_len = -1.0f32;
        for i in 0..edge_count {
            let len = out[i].pos().dist(out[(i + 1) % m].pos());
            if len > longest_len {
                longest = i;
                longest_len = len;
            }
        }
        let j = (longest + 1) % m;
        let (a, mid, b) = bisect(&out[longest], &out[j]);
        out[longest] = a;
        out[j] = b;
        out.insert(longest + 1, mid);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(size: f32) -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0),
            Point::new(size, 0.0),
            Point::new(size, size),
            Point::new(0.0, size),
        ]
    }

    #[test]
    fn test_polyline_length() {
        let poly = vec![Vec2::new(0.0, 0.0), Vec2::new(3.0, 4.0), Vec2::new(3.0, 10.0)];
        assert!((polyline_length(&poly) - 11.0).abs() < 1e-5);
    }

    #[test]
    fn test_centroid_of_square() {
        let pts: Vec<Vec2> = square(10.0).iter().map(Point::pos).collect();
        let c = centroid(&pts);
        assert!((c.x - 5.0).abs() < 1e-6 && (c.y - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_closure_heuristics() {
        let sq = square(10.0);
        assert!(!is_closed(&sq, None, 0.25));
        assert!(is_closed(&sq, Some(true), 0.25));

        let mut ring = sq.clone();
        ring.push(Point::new(0.3, 0.2));
        assert!(is_closed(&ring, None, 0.25), "sub-pixel gap closes");

        let mut near = sq.clone();
        near.push(Point::new(0.0, 1.5));
        // gap 1.5 over ~38.5 length is under 5%
        assert!(is_closed(&near, None, 0.25));
        assert!(!is_closed(&near, Some(false), 0.25));
    }

    #[test]
    fn test_resample_exact_count_and_spacing() {
        let poly = vec![Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0)];
        let r = resample(&poly, 11);
        assert_eq!(r.len(), 11);
        for (i, p) in r.iter().enumerate() {
            assert!((p.x - i as f32).abs() < 1e-4);
        }

        let corner = vec![Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0), Vec2::new(10.0, 10.0)];
        let r = resample(&corner, 3);
        assert_eq!(r[1], Vec2::new(10.0, 0.0));
        assert_eq!(r[2], Vec2::new(10.0, 10.0));
    }

    #[test]
    fn test_resample_degenerate() {
        assert!(resample(&[], 5).is_empty());
        let p = Vec2::new(2.0, 3.0);
        assert_eq!(resample(&[p, p, p], 4), vec![p; 4]);
    }

    #[test]
    fn test_upsample_bisects_longest_edge() {
        let pts = vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0), Point::new(12.0, 0.0)];
        let up = upsample(&pts, 4, false);
        assert_eq!(up.len(), 4);
        assert_eq!(up[1], Point::new(5.0, 0.0));
    }

    #[test]
    fn test_upsample_closed_uses_closing_edge() {
        let pts = vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0), Point::new(1.0, 10.0)];
        let up = upsample(&pts, 4, true);
        // Closing edge (1,10) -> (0,0) is the longest.
        assert_eq!(up.len(), 4);
        assert_eq!(up[3], Point::new(0.5, 5.0));
    }

    #[test]
    fn test_upsample_never_shrinks() {
        let sq = square(10.0);
        assert_eq!(upsample(&sq, 2, true), sq);
        assert_eq!(upsample(&sq, 4, true), sq);
    }

    #[test]
    fn test_point_at_fraction() {
        let poly = vec![Vec2::new(0.0, 0.0), Vec2::new(50.0, 50.0), Vec2::new(100.0, 0.0)];
        let mid = point_at_fraction(&poly, 0.5).unwrap();
        assert!((mid.x - 50.0).abs() < 1e-3 && (mid.y - 50.0).abs() < 1e-3);
        assert_eq!(point_at_fraction(&poly, 1.0), Some(Vec2::new(100.0, 0.0)));
    }

    #[test]
    fn test_reverse_swaps_handles() {
        let a = Point { handle_out: Some(Vec2::new(1.0, 0.0)), ..Point::new(0.0, 0.0) };
        let b = Point { handle_in: Some(Vec2::new(-1.0, 0.0)), ..Point::new(5.0, 0.0) };
        let r = reverse_points(&[a, b]);
        assert_eq!(r[0].handle_out, Some(Vec2::new(-1.0, 0.0)));
        assert_eq!(r[1].handle_in, Some(Vec2::new(1.0, 0.0)));
    }
}
