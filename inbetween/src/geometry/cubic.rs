//! Cubic Bézier segments between neighbouring path points.
//!
//! A segment is curved when either endpoint carries a handle on the side
//! facing the other; otherwise it is a straight line and callers take the
//! cheaper polyline path.

use crate::geometry::tolerance::MAX_FLATTEN_DEPTH;
use crate::model::{Point, Vec2};

/// Control points of a cubic Bézier curve.
#[derive(Clone, Copy, Debug)]
pub struct CubicBezier {
    pub p0: Vec2,
    pub p1: Vec2,
    pub p2: Vec2,
    pub p3: Vec2,
}

impl CubicBezier {
    pub fn new(p0: Vec2, p1: Vec2, p2: Vec2, p3: Vec2) -> Self {
        Self { p0, p1, p2, p3 }
    }

    /// Build the segment running from `a` to `b`, or `None` when neither
    /// facing handle is present.
    pub fn between(a: &Point, b: &Point) -> Option<CubicBezier> {
        if a.handle_out.is_none() && b.handle_in.is_none() {
            return None;
        }
        let p0 = a.pos();
        let p3 = b.pos();
        let p1 = p0.add(a.handle_out.unwrap_or(Vec2::ZERO));
        let p2 = p3.add(b.handle_in.unwrap_or(Vec2::ZERO));
        Some(CubicBezier::new(p0, p1, p2, p3))
    }

    /// Bernstein form.
    pub fn eval(&self, t: f32) -> Vec2 {
        let mt = 1.0 - t;
        let (b0, b1, b2, b3) = (mt * mt * mt, 3.0 * mt * mt * t, 3.0 * mt * t * t, t * t * t);
        self.p0.scale(b0).add(self.p1.scale(b1)).add(self.p2.scale(b2)).add(self.p3.scale(b3))
    }

    /// De Casteljau split into the `0..t` and `t..1` halves.
    pub fn split_at(&self, t: f32) -> (CubicBezier, CubicBezier) {
        let p01 = self.p0.lerp(self.p1, t);
        let p12 = self.p1.lerp(self.p2, t);
        let p23 = self.p2.lerp(self.p3, t);

        let p012 = p01.lerp(p12, t);
        let p123 = p12.lerp(p23, t);

        let at = p012.lerp(p123, t);
        (CubicBezier::new(self.p0, p01, p012, at), CubicBezier::new(at, p123, p23, self.p3))
    }

    /// Arc length by adaptive halving until the control polygon hugs the
    /// chord within `tolerance`.
    pub fn arc_length(&self, tolerance: f32) -> f32 {
        self.arc_length_at_depth(tolerance, 0)
    }

    fn arc_length_at_depth(&self, tolerance: f32, depth: u32) -> f32 {
        let chord = self.p0.dist(self.p3);
        let hull = self.p0.dist(self.p1) + self.p1.dist(self.p2) + self.p2.dist(self.p3);
        if depth >= MAX_FLATTEN_DEPTH || hull - chord < tolerance {
            return (chord + hull) * 0.5;
        }
        let (left, right) = self.split_at(0.5);
        left.arc_length_at_depth(tolerance, depth + 1) + right.arc_length_at_depth(tolerance, depth + 1)
    }
}

/// Bisect the segment `a -> b` at t = 0.5.
///
/// Returns the updated `a`, the inserted midpoint and the updated `b`.
/// Handles that were absent on `a`/`b` stay absent; the new point always
/// carries both handles so the two halves trace the original curve.
pub fn bisect(a: &Point, b: &Point) -> (Point, Point, Point) {
    match CubicBezier::between(a, b) {
        Some(curve) => {
            let (first, second) = curve.split_at(0.5);
            let mid = first.p3;
            let na = Point {
                handle_out: a.handle_out.map(|_| first.p1.sub(first.p0)),
                ..*a
            };
            let nb = Point {
                handle_in: b.handle_in.map(|_| second.p2.sub(second.p3)),
                ..*b
            };
            let m = Point {
                x: mid.x,
                y: mid.y,
                handle_in: Some(first.p2.sub(mid)),
                handle_out: Some(second.p1.sub(mid)),
            };
            (na, m, nb)
        }
        None => {
            let mid = a.pos().lerp(b.pos(), 0.5);
            (*a, Point::new(mid.x, mid.y), *b)
        }
    }
}
