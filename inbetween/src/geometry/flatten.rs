use crate::geometry::cubic::CubicBezier;
use crate::geometry::limits::MAX_FLATTEN_SEGMENT_PIECES;
use crate::geometry::math::dist_point_to_seg_sq;
use crate::geometry::tolerance::MAX_FLATTEN_DEPTH;
use crate::model::{Point, Vec2};

pub fn flatten_cubic(points: &mut Vec<Vec2>, c: &CubicBezier, tol: f32, depth: u32) {
    let d1 = dist_point_to_seg_sq(c.p1.x, c.p1.y, c.p0.x, c.p0.y, c.p3.x, c.p3.y);
    let d2 = dist_point_to_seg_sq(c.p2.x, c.p2.y, c.p0.x, c.p0.y, c.p3.x, c.p3.y);
    let tol2 = tol * tol;
    if d1.max(d2) <= tol2 || depth > MAX_FLATTEN_DEPTH {
        points.push(c.p3);
        return;
    }
    let (first, second) = c.split_at(0.5);
    flatten_cubic(points, &first, tol, depth + 1);
    flatten_cubic(points, &second, tol, depth + 1);
}

fn segment_tolerance(c: &CubicBezier, tol: f32) -> f32 {
    let hull = c.p0.dist(c.p1) + c.p1.dist(c.p2) + c.p2.dist(c.p3);
    tol.max(hull / MAX_FLATTEN_SEGMENT_PIECES as f32)
}

/// Flatten a path into a polyline. When `closed`, the closing segment back
/// to the first point is included, so the result ends where it started.
/// Each curved segment uses `tol` or a hull-relative tolerance, whichever
/// is coarser.
pub fn flatten_path(points: &[Point], closed: bool, tol: f32) -> Vec<Vec2> {
    let mut out = Vec::with_capacity(points.len() * 2);
    let first = match points.first() {
        Some(p) => p,
        None => return out,
    };
    out.push(first.pos());
    let push_segment = |a: &Point, b: &Point, out: &mut Vec<Vec2>| match CubicBezier::between(a, b) {
        Some(c) => flatten_cubic(out, &c, segment_tolerance(&c, tol), 0),
        None => out.push(b.pos()),
    };
    for w in points.windows(2) {
        push_segment(&w[0], &w[1], &mut out);
    }
    if closed && points.len() > 1 {
        push_segment(&points[points.len() - 1], first, &mut out);
    }
    out
}
