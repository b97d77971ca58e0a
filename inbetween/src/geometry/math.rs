use crate::model::Vec2;

pub fn seg_distance_sq(px: f32, py: f32, x1: f32, y1: f32, x2: f32, y2: f32) -> (f32, f32) {
    let vx = x2 - x1; let vy = y2 - y1;
    let wx = px - x1; let wy = py - y1;
    let vv = vx*vx + vy*vy;
    let mut t = if vv > 0.0 { (wx*vx + wy*vy) / vv } else { 0.0 };
    if t < 0.0 { t = 0.0; } else if t > 1.0 { t = 1.0; }
    let projx = x1 + t * vx; let projy = y1 + t * vy;
    let dx = px - projx; let dy = py - projy;
    (dx*dx + dy*dy, t)
}

pub fn dist_point_to_seg_sq(px: f32, py: f32, x1: f32, y1: f32, x2: f32, y2: f32) -> f32 {
    let (d2, _) = seg_distance_sq(px, py, x1, y1, x2, y2);
    d2
}

/// Sum of index-wise distances between two equal-length point runs.
/// Extra points on the longer side are ignored.
pub fn pointwise_cost(a: &[Vec2], b: &[Vec2]) -> f32 {
    a.iter().zip(b).map(|(p, q)| p.dist(*q)).sum()
}

/// Index-wise distance with the first and last pair weighted by `endpoint_weight`.
pub fn endpoint_weighted_cost(a: &[Vec2], b: &[Vec2], endpoint_weight: f32) -> f32 {
    let n = a.len().min(b.len());
    let mut cost = 0.0;
    for i in 0..n {
        let w = if i == 0 || i + 1 == n { endpoint_weight } else { 1.0 };
        cost += w * a[i].dist(b[i]);
    }
    cost
}

/// Combined start/start + end/end distance of two runs.
pub fn endpoint_cost(a: &[Vec2], b: &[Vec2]) -> f32 {
    match (a.first(), a.last(), b.first(), b.last()) {
        (Some(a0), Some(a1), Some(b0), Some(b1)) => a0.dist(*b0) + a1.dist(*b1),
        _ => 0.0,
    }
}

/// True when reversing `b` brings its endpoints closer to those of `a`.
pub fn reversal_helps(a: &[Vec2], b: &[Vec2]) -> bool {
    match (a.first(), a.last(), b.first(), b.last()) {
        (Some(_), Some(_), Some(b0), Some(b1)) => endpoint_cost(a, &[*b1, *b0]) < endpoint_cost(a, b),
        _ => false,
    }
}
