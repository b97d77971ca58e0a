//! Per-point interpolation and motion-path guides.

use crate::geometry::path::{centroid, point_at_fraction, stroke_polyline};
use crate::model::{Point, Stroke, StrokeId, Vec2};

fn lerp_handle(a: Option<Vec2>, b: Option<Vec2>, t: f32) -> Option<Vec2> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.lerp(b, t)),
        // A missing handle is a straight side; blend against a zero offset
        // so the curve eases in or out instead of snapping.
        (Some(a), None) => Some(a.scale(1.0 - t)),
        (None, Some(b)) => Some(b.scale(t)),
        (None, None) => None,
    }
}

/// Interpolate two equal-length runs index for index and shift every point
/// by `offset`. Extra points on the longer run are ignored.
pub fn tween_points(a: &[Point], b: &[Point], t: f32, offset: Vec2) -> Vec<Point> {
    a.iter()
        .zip(b)
        .map(|(p, q)| {
            let pos = p.pos().lerp(q.pos(), t).add(offset);
            Point {
                x: pos.x,
                y: pos.y,
                handle_in: lerp_handle(p.handle_in, q.handle_in, t),
                handle_out: lerp_handle(p.handle_out, q.handle_out, t),
            }
        })
        .collect()
}

pub fn run_centroid(points: &[Point]) -> Vec2 {
    let pos: Vec<Vec2> = points.iter().map(Point::pos).collect();
    centroid(&pos)
}

/// A guide polyline oriented from the source end to the target end.
#[derive(Clone, Debug, PartialEq)]
pub struct Guide {
    pub id: StrokeId,
    pub path: Vec<Vec2>,
}

impl Guide {
    /// Constant offset that moves the straight-line centroid path onto the
    /// guide at time `t`.
    pub fn offset(&self, from: Vec2, to: Vec2, t: f32) -> Vec2 {
        match point_at_fraction(&self.path, t) {
            Some(on_guide) => on_guide.sub(from.lerp(to, t)),
            None => Vec2::ZERO,
        }
    }
}

fn oriented(path: Vec<Vec2>, from: Vec2) -> Vec<Vec2> {
    match (path.first(), path.last()) {
        (Some(a), Some(b)) if b.dist(from) < a.dist(from) => path.into_iter().rev().collect(),
        _ => path,
    }
}

/// Find the guide for a pair whose runs have centroids `from` and `to`.
///
/// A guide linked to any of the pair's source ids wins. Otherwise the
/// first unlinked guide whose two ends lie within `snap` of the two
/// centroids (in either direction) is used.
pub fn find_guide(guides: &[Stroke], sources: &[StrokeId], from: Vec2, to: Vec2, snap: f32, tol: f32) -> Option<Guide> {
    if let Some(g) = guides.iter().find(|g| g.linked.iter().any(|id| sources.contains(id))) {
        let path = stroke_polyline(g, tol);
        if path.len() >= 2 {
            return Some(Guide { id: g.id, path: oriented(path, from) });
        }
    }
    for g in guides.iter().filter(|g| g.linked.is_empty()) {
        let path = stroke_polyline(g, tol);
        let (a, b) = match (path.first(), path.last()) {
            (Some(a), Some(b)) if path.len() >= 2 => (*a, *b),
            _ => continue,
        };
        let forward = a.dist(from) <= snap && b.dist(to) <= snap;
        let backward = b.dist(from) <= snap && a.dist(to) <= snap;
        if forward || backward {
            return Some(Guide { id: g.id, path: oriented(path, from) });
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arc() -> Stroke {
        Stroke::from_xy(50, &[(0.0, 0.0), (50.0, 50.0), (100.0, 0.0)]).with_closed(false)
    }

    #[test]
    fn tween_blends_positions_and_handles() {
        let a = [Point { handle_out: Some(Vec2::new(10.0, 0.0)), ..Point::new(0.0, 0.0) }];
        let b = [Point { handle_out: Some(Vec2::new(0.0, 10.0)), ..Point::new(10.0, 0.0) }];
        let mid = tween_points(&a, &b, 0.5, Vec2::ZERO);
        assert_eq!(mid[0].pos(), Vec2::new(5.0, 0.0));
        assert_eq!(mid[0].handle_out, Some(Vec2::new(5.0, 5.0)));
        assert_eq!(mid[0].handle_in, None);

        let one_sided = tween_points(&a, &[Point::new(10.0, 0.0)], 0.25, Vec2::new(0.0, 1.0));
        assert_eq!(one_sided[0].handle_out, Some(Vec2::new(7.5, 0.0)));
        assert_eq!(one_sided[0].pos(), Vec2::new(2.5, 1.0));
    }

    #[test]
    fn unlinked_guide_must_snap() {
        let guides = [arc()];
        let hit = find_guide(&guides, &[1], Vec2::new(2.0, 0.0), Vec2::new(99.0, 1.0), 25.0, 0.25);
        assert!(hit.is_some());
        let miss = find_guide(&guides, &[1], Vec2::new(0.0, 200.0), Vec2::new(100.0, 0.0), 25.0, 0.25);
        assert!(miss.is_none());
    }

    #[test]
    fn linked_guide_ignores_distance_and_orients() {
        let guides = [arc().with_linked(vec![7])];
        let g = find_guide(&guides, &[7], Vec2::new(100.0, 0.0), Vec2::new(0.0, 0.0), 1.0, 0.25).unwrap();
        assert_eq!(g.path[0], Vec2::new(100.0, 0.0));
        assert!(find_guide(&guides, &[8], Vec2::new(0.0, 0.0), Vec2::new(100.0, 0.0), 25.0, 0.25).is_none());
    }

    #[test]
    fn offset_bends_midpoint_onto_guide() {
        let g = Guide { id: 50, path: vec![Vec2::new(0.0, 0.0), Vec2::new(50.0, 50.0), Vec2::new(100.0, 0.0)] };
        let off = g.offset(Vec2::new(0.0, 0.0), Vec2::new(100.0, 0.0), 0.5);
        assert!((off.x - 0.0).abs() < 1e-3 && (off.y - 50.0).abs() < 1e-3);
    }
}
