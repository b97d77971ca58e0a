//! Split/merge solver: slicing one path into contiguous pieces that line up
//! with several other paths.
//!
//! The single path is resampled densely, then an explicit bounded search
//! runs over child orderings, both scan directions and a set of start
//! offsets. Each candidate cuts the path into runs proportional to the
//! children's arc lengths and is scored by summed centroid distance.

use crate::algorithms::phase::{align_loop, naive_fit};
use crate::config::TweenConfig;
use crate::geometry::math::{pointwise_cost, reversal_helps};
use crate::geometry::path::{centroid, open_loop, polyline_length, resample, stroke_is_closed, stroke_polyline};
use crate::geometry::tolerance::EPS_LEN;
use crate::model::{Stroke, Vec2};
use log::debug;
use std::ops::Range;

/// Precomputed measurements of one multi-side stroke.
#[derive(Clone, Debug)]
pub struct Child {
    pub poly: Vec<Vec2>,
    pub length: f32,
    pub centroid: Vec2,
    pub closed: bool,
}

impl Child {
    pub fn measure(stroke: &Stroke, tol: f32) -> Child {
        let poly = stroke_polyline(stroke, tol);
        Child {
            length: polyline_length(&poly),
            centroid: centroid(open_loop(&poly)),
            closed: stroke_is_closed(stroke, tol),
            poly,
        }
    }
}

/// Winning arrangement of the search.
#[derive(Clone, Debug)]
pub struct SplitSolution {
    /// The single path as scanned by the winner: resampled, possibly
    /// reversed and rotated. Spans index into this.
    pub samples: Vec<Vec2>,
    /// Child index assigned to each consecutive span.
    pub order: Vec<usize>,
    /// Contiguous spans covering `0..samples.len()` in order.
    pub spans: Vec<Range<usize>>,
    pub reversed: bool,
    pub rotation: usize,
    pub cost: f32,
}

/// One slice of the single path paired with its aligned child.
#[derive(Clone, Debug)]
pub struct SplitPiece {
    pub child: usize,
    pub segment: Vec<Vec2>,
    pub child_points: Vec<Vec2>,
}

/// Advance `perm` to the next lexicographic permutation. Returns false
/// once the last permutation has been visited.
pub fn next_permutation(perm: &mut [usize]) -> bool {
    if perm.len() < 2 {
        return false;
    }
    let mut i = perm.len() - 1;
    while i > 0 && perm[i - 1] >= perm[i] {
        i -= 1;
    }
    if i == 0 {
        return false;
    }
    let mut j = perm.len() - 1;
    while perm[j] <= perm[i - 1] {
        j -= 1;
    }
    perm.swap(i - 1, j);
    perm[i..].reverse();
    true
}

/// Point counts per span for one child ordering, or `None` when the
/// ordering cannot be sliced. With a `floor`, short spans are lifted to it;
/// without one, any empty span rejects the ordering.
fn span_counts(m: usize, lengths: &[f32], order: &[usize], floor: Option<usize>) -> Option<Vec<usize>> {
    let n = order.len();
    if m < n * floor.unwrap_or(1) {
        return None;
    }
    let total: f32 = order.iter().map(|&c| lengths[c]).sum();
    if total <= EPS_LEN {
        return None;
    }
    let mut counts = Vec::with_capacity(n);
    let mut acc = 0.0f32;
    let mut prev = 0usize;
    for (k, &c) in order.iter().enumerate() {
        acc += lengths[c];
        let bound = if k + 1 == n { m } else { ((m as f32) * acc / total).round() as usize };
        let bound = bound.clamp(prev, m);
        counts.push(bound - prev);
        prev = bound;
    }
    let floor = match floor {
        Some(f) => f,
        None => return counts.iter().all(|&c| c > 0).then_some(counts),
    };
    // Lift short spans to the floor, taking points from the largest span.
    for k in 0..n {
        while counts[k] < floor {
            let donor = (0..n)
                .filter(|&d| counts[d] > floor)
                .max_by(|&a, &b| counts[a].cmp(&counts[b]).then(b.cmp(&a)))?;
            counts[donor] -= 1;
            counts[k] += 1;
        }
    }
    Some(counts)
}

fn rotations(m: usize, closed: bool, n: usize, config: &TweenConfig) -> Vec<usize> {
    if !closed || m == 0 {
        return vec![0];
    }
    if n <= config.dense_rotation_max_children {
        return (0..m).collect();
    }
    let count = config.coarse_rotation_count.max(1).min(m);
    let mut out: Vec<usize> = (0..count).map(|i| i * m / count).collect();
    out.dedup();
    out
}

/// Resample the single-side stroke for slicing. Closed paths drop the
/// repeated closing vertex.
pub fn single_samples(single: &Stroke, config: &TweenConfig) -> (Vec<Vec2>, bool) {
    let closed = stroke_is_closed(single, config.flatten_tolerance);
    let poly = stroke_polyline(single, config.flatten_tolerance);
    let mut samples = resample(&poly, config.split_samples);
    if closed && samples.len() > 1 {
        samples.pop();
    }
    (samples, closed)
}

/// Search every child ordering, both scan directions and the configured
/// start offsets for the arrangement with the lowest summed centroid
/// distance. Ties keep the first candidate found.
pub fn solve_split(single: &Stroke, children: &[Child], config: &TweenConfig) -> Option<SplitSolution> {
    let n = children.len();
    if n == 0 || n > config.max_split_children {
        return None;
    }
    let (samples, closed) = single_samples(single, config);
    let m = samples.len();
    if m == 0 || polyline_length(&samples) <= EPS_LEN {
        return None;
    }

    let robust = closed || children.iter().any(|c| c.closed);
    let floor = robust.then(|| config.min_segment_points.max(1));
    let lengths: Vec<f32> = children.iter().map(|c| c.length).collect();
    let offsets = rotations(m, closed, n, config);

    let reversed_samples: Vec<Vec2> = samples.iter().rev().copied().collect();
    let prefix = |seq: &[Vec2]| -> Vec<(f64, f64)> {
        let mut p = Vec::with_capacity(2 * m + 1);
        p.push((0.0f64, 0.0f64));
        for i in 0..2 * m {
            let (sx, sy) = p[i];
            let v = seq[i % m];
            p.push((sx + v.x as f64, sy + v.y as f64));
        }
        p
    };
    let scans = [(false, prefix(&samples)), (true, prefix(&reversed_samples))];

    let mut best: Option<(f32, Vec<usize>, Vec<usize>, bool, usize)> = None;
    let mut perm: Vec<usize> = (0..n).collect();
    let mut visited = 0usize;
    loop {
        if let Some(counts) = span_counts(m, &lengths, &perm, floor) {
            for (reversed, sums) in &scans {
                for &r in &offsets {
                    visited += 1;
                    let mut cost = 0.0f32;
                    let mut a = 0usize;
                    for (k, &c) in perm.iter().enumerate() {
                        let b = a + counts[k];
                        let (x0, y0) = sums[r + a];
                        let (x1, y1) = sums[r + b];
                        let len = (b - a) as f64;
                        let seg_centroid = Vec2::new(((x1 - x0) / len) as f32, ((y1 - y0) / len) as f32);
                        cost += seg_centroid.dist(children[c].centroid);
                        a = b;
                    }
                    if best.as_ref().map_or(true, |(bc, ..)| cost < *bc) {
                        best = Some((cost, perm.clone(), counts.clone(), *reversed, r));
                    }
                }
            }
        }
        if !next_permutation(&mut perm) {
            break;
        }
    }

    let (cost, order, counts, reversed, rotation) = best?;
    if !cost.is_finite() {
        return None;
    }
    debug!(
        "split search: {} children, {} candidates, cost {:.3}, reversed {}, rotation {}",
        n, visited, cost, reversed, rotation
    );

    let base = if reversed { &reversed_samples } else { &samples };
    let oriented: Vec<Vec2> = (0..m).map(|i| base[(i + rotation) % m]).collect();
    let mut spans = Vec::with_capacity(n);
    let mut a = 0usize;
    for c in &counts {
        spans.push(a..a + c);
        a += c;
    }
    Some(SplitSolution { samples: oriented, order, spans, reversed, rotation, cost })
}

/// Fit one child against its slice of the single path.
///
/// Closed children pick the better of forward and reversed vertex order by
/// plain point distance, then get phase aligned. Open children are
/// resampled to the slice length and reversed when that brings the
/// endpoints closer.
pub fn align_child(segment: &[Vec2], child: &Child, endpoint_weight: f32) -> Vec<Vec2> {
    if child.closed {
        let ring = open_loop(&child.poly).to_vec();
        let reversed: Vec<Vec2> = ring.iter().rev().copied().collect();
        let forward_cost = pointwise_cost(segment, &naive_fit(segment, &ring, endpoint_weight).points);
        let reverse_cost = pointwise_cost(segment, &naive_fit(segment, &reversed, endpoint_weight).points);
        let winner = if reverse_cost < forward_cost { &reversed } else { &ring };
        align_loop(segment, winner, endpoint_weight).points
    } else {
        let mut pts = resample(&child.poly, segment.len());
        if reversal_helps(segment, &pts) {
            pts.reverse();
        }
        pts
    }
}

/// Solve and align. Pieces come back in child order.
pub fn split_pieces(single: &Stroke, children: &[Child], config: &TweenConfig) -> Option<Vec<SplitPiece>> {
    let solution = solve_split(single, children, config)?;
    let mut pieces: Vec<SplitPiece> = solution
        .order
        .iter()
        .zip(&solution.spans)
        .map(|(&c, span)| {
            let segment = solution.samples[span.clone()].to_vec();
            let child_points = align_child(&segment, &children[c], config.phase_endpoint_weight);
            SplitPiece { child: c, segment, child_points }
        })
        .collect();
    pieces.sort_by_key(|p| p.child);
    Some(pieces)
}
