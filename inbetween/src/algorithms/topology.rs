//! Correspondence resolution: turning two keyframes' strokes plus their
//! bindings into paired point runs of equal length.
//!
//! Explicit groups are handled first, in stored order: 1:1 pairs,
//! splits/merges via the permutation search, and many-to-many groups via
//! a merged polyline. Whatever no group mentions is auto-matched, and
//! leftover sources pass through unchanged.

use crate::algorithms::automatch::auto_match;
use crate::algorithms::phase::{align_loop, best_cyclic_shift, rotate_points};
use crate::algorithms::split::{split_pieces, Child};
use crate::bindings::CorrespondenceGroup;
use crate::config::TweenConfig;
use crate::geometry::math::reversal_helps;
use crate::geometry::path::{
    has_closing_duplicate, open_loop, polyline_is_closed, resample, reverse_points, stroke_is_closed,
    stroke_polyline, upsample,
};
use crate::model::{MatchStrategy, Point, Stroke, StrokeId, StrokeStyle, Vec2};
use log::{debug, warn};
use std::collections::BTreeSet;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PairKind {
    OneToOne,
    Split,
    Merge,
    Mesh,
    Auto,
    Static,
}

/// One normalized pair: `start` and `end` have equal length and are
/// interpolated index for index.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedPair {
    pub kind: PairKind,
    pub start: Vec<Point>,
    pub end: Vec<Point>,
    pub sources: Vec<StrokeId>,
    pub targets: Vec<StrokeId>,
    pub source_style: StrokeStyle,
    pub target_style: StrokeStyle,
    pub closed: bool,
}

impl ResolvedPair {
    /// Source ids followed by target ids, without repeats.
    pub fn parents(&self) -> Vec<StrokeId> {
        let mut seen = BTreeSet::new();
        self.sources
            .iter()
            .chain(&self.targets)
            .copied()
            .filter(|id| seen.insert(*id))
            .collect()
    }
}

fn to_points(v: &[Vec2]) -> Vec<Point> {
    v.iter().map(|&p| Point::from(p)).collect()
}

fn lookup<'a>(strokes: &'a [Stroke], ids: &[StrokeId]) -> Vec<&'a Stroke> {
    let mut seen = BTreeSet::new();
    ids.iter()
        .filter(|id| seen.insert(**id))
        .filter_map(|id| strokes.iter().find(|s| s.id == *id && !s.points.is_empty()))
        .collect()
}

/// Pass a source stroke through unchanged.
pub fn static_pair(stroke: &Stroke, tol: f32) -> ResolvedPair {
    ResolvedPair {
        kind: PairKind::Static,
        start: stroke.points.clone(),
        end: stroke.points.clone(),
        sources: vec![stroke.id],
        targets: Vec::new(),
        source_style: stroke.style,
        target_style: stroke.style,
        closed: stroke_is_closed(stroke, tol),
    }
}

/// Upsample both strokes to the larger point count. An explicit pair
/// (`flip == false`) keeps point i matched to point i. An auto-matched pair
/// reverses open targets when that brings their endpoints closer, and may
/// cyclically shift closed targets into phase.
pub fn one_to_one(a: &Stroke, b: &Stroke, flip: bool, config: &TweenConfig) -> ResolvedPair {
    let tol = config.flatten_tolerance;
    let (a_closed, b_closed) = (stroke_is_closed(a, tol), stroke_is_closed(b, tol));
    let mut b_points = b.points.clone();
    if flip && !a_closed && !b_closed && reversal_helps(&a.positions(), &b.positions()) {
        b_points = reverse_points(&b_points);
    }
    let n = a.points.len().max(b_points.len());
    let start = upsample(&a.points, n, a_closed);
    let mut end = upsample(&b_points, n, b_closed);
    if flip
        && config.align_closed_pairs
        && a_closed
        && b_closed
        && !has_closing_duplicate(&a.points)
        && !has_closing_duplicate(&b.points)
    {
        let reference: Vec<Vec2> = start.iter().map(Point::pos).collect();
        let ring: Vec<Vec2> = end.iter().map(Point::pos).collect();
        let shift = best_cyclic_shift(&reference, &ring, config.phase_endpoint_weight);
        if shift != 0 {
            end = rotate_points(&end, shift);
        }
    }
    ResolvedPair {
        kind: if flip { PairKind::Auto } else { PairKind::OneToOne },
        start,
        end,
        sources: vec![a.id],
        targets: vec![b.id],
        source_style: a.style,
        target_style: b.style,
        closed: a_closed || b_closed,
    }
}

/// Chain polylines greedily: repeatedly append the remaining polyline
/// whose nearer endpoint is closest to the current chain end, reversing it
/// when its far end is the nearer one.
pub fn chain_polylines(mut polys: Vec<Vec<Vec2>>) -> Vec<Vec2> {
    polys.retain(|p| !p.is_empty());
    if polys.is_empty() {
        return Vec::new();
    }
    let mut chain = polys.remove(0);
    while !polys.is_empty() {
        let end = chain[chain.len() - 1];
        let mut best = (0usize, false, f32::INFINITY);
        for (i, p) in polys.iter().enumerate() {
            let d_start = end.dist(p[0]);
            let d_end = end.dist(p[p.len() - 1]);
            if d_start < best.2 {
                best = (i, false, d_start);
            }
            if d_end < best.2 {
                best = (i, true, d_end);
            }
        }
        let mut next = polys.remove(best.0);
        if best.1 {
            next.reverse();
        }
        chain.extend(next);
    }
    chain
}

fn merged(strokes: &[&Stroke], tol: f32) -> (Vec<Vec2>, bool) {
    let poly = chain_polylines(strokes.iter().map(|s| stroke_polyline(s, tol)).collect());
    let closed = match strokes {
        [single] => stroke_is_closed(single, tol),
        _ => polyline_is_closed(&poly),
    };
    (poly, closed)
}

/// Many-to-many fallback: both sides become one merged polyline each,
/// resampled to the mesh resolution and interpolated as a single pair.
pub fn mesh_pair(sources: &[&Stroke], targets: &[&Stroke], config: &TweenConfig) -> Option<ResolvedPair> {
    let tol = config.flatten_tolerance;
    let (first_source, first_target) = (sources.first()?, targets.first()?);
    let (src_poly, src_closed) = merged(sources, tol);
    let (tgt_poly, tgt_closed) = merged(targets, tol);
    let n = config.mesh_samples.max(2);
    let start = resample(&src_poly, n);
    let mut end = resample(&tgt_poly, n);
    if reversal_helps(&start, &end) {
        end.reverse();
    }
    if src_closed && tgt_closed {
        end = align_loop(&start, open_loop(&end), config.phase_endpoint_weight).points;
    }
    Some(ResolvedPair {
        kind: PairKind::Mesh,
        start: to_points(&start),
        end: to_points(&end),
        sources: sources.iter().map(|s| s.id).collect(),
        targets: targets.iter().map(|s| s.id).collect(),
        source_style: first_source.style,
        target_style: first_target.style,
        closed: src_closed || tgt_closed,
    })
}

/// One source sliced across several targets (`merge == false`) or several
/// sources gathered into one target (`merge == true`). Falls back to the
/// mesh when the search finds no arrangement.
pub fn split_or_merge(single: &Stroke, many: &[&Stroke], merge: bool, config: &TweenConfig) -> Vec<ResolvedPair> {
    let tol = config.flatten_tolerance;
    if many.len() > config.max_split_children {
        warn!(
            "{} children exceed the split search bound of {}; using merged polylines",
            many.len(),
            config.max_split_children
        );
    }
    let children: Vec<Child> = many.iter().map(|s| Child::measure(s, tol)).collect();
    let pieces = match split_pieces(single, &children, config) {
        Some(p) => p,
        None => {
            if many.len() <= config.max_split_children {
                warn!("no viable slicing of stroke {}; using merged polylines", single.id);
            }
            let one = [single];
            let (sources, targets) = if merge { (many, &one[..]) } else { (&one[..], many) };
            return mesh_pair(sources, targets, config).into_iter().collect();
        }
    };
    let single_closed = stroke_is_closed(single, tol);
    pieces
        .into_iter()
        .map(|piece| {
            let child = many[piece.child];
            let closed = single_closed || children[piece.child].closed;
            let (segment, child_points) = (to_points(&piece.segment), to_points(&piece.child_points));
            if merge {
                ResolvedPair {
                    kind: PairKind::Merge,
                    start: child_points,
                    end: segment,
                    sources: vec![child.id],
                    targets: vec![single.id],
                    source_style: child.style,
                    target_style: single.style,
                    closed,
                }
            } else {
                ResolvedPair {
                    kind: PairKind::Split,
                    start: segment,
                    end: child_points,
                    sources: vec![single.id],
                    targets: vec![child.id],
                    source_style: single.style,
                    target_style: child.style,
                    closed,
                }
            }
        })
        .collect()
}

/// Resolve every stroke of the source keyframe into normalized pairs.
///
/// `groups` should already be limited to this keyframe pair. Ids that no
/// longer exist are dropped from their group; a group left without sources
/// or targets is ignored and its strokes count as unbound.
pub fn resolve(
    sources: &[Stroke],
    targets: &[Stroke],
    groups: &[CorrespondenceGroup],
    strategy: MatchStrategy,
    config: &TweenConfig,
) -> Vec<ResolvedPair> {
    let tol = config.flatten_tolerance;
    let mut out = Vec::new();
    let mut bound_sources = BTreeSet::new();
    let mut bound_targets = BTreeSet::new();

    for group in groups {
        let src = lookup(sources, &group.sources);
        let tgt = lookup(targets, &group.targets);
        if src.len() < group.unique_sources().len() || tgt.len() < group.unique_targets().len() {
            warn!(
                "binding {}->{} references missing strokes; {} of {} sources and {} of {} targets kept",
                group.source_frame,
                group.target_frame,
                src.len(),
                group.unique_sources().len(),
                tgt.len(),
                group.unique_targets().len()
            );
        }
        if src.is_empty() || tgt.is_empty() {
            continue;
        }
        bound_sources.extend(src.iter().map(|s| s.id));
        bound_targets.extend(tgt.iter().map(|s| s.id));
        match (src.as_slice(), tgt.as_slice()) {
            ([a], [b]) => out.push(one_to_one(a, b, false, config)),
            ([a], many) => out.extend(split_or_merge(a, many, false, config)),
            (many, [b]) => out.extend(split_or_merge(b, many, true, config)),
            (s, t) => {
                debug!("binding with {} sources and {} targets resolved as a mesh", s.len(), t.len());
                out.extend(mesh_pair(s, t, config));
            }
        }
    }

    let free_sources: Vec<&Stroke> = sources.iter().filter(|s| !bound_sources.contains(&s.id)).collect();
    let free_targets: Vec<&Stroke> = targets
        .iter()
        .filter(|s| !bound_targets.contains(&s.id) && !s.points.is_empty())
        .collect();
    let matchable: Vec<&Stroke> = free_sources.iter().copied().filter(|s| !s.points.is_empty()).collect();
    let pairs = auto_match(&matchable, &free_targets, strategy, tol);
    let mut matched = BTreeSet::new();
    for &(i, j) in &pairs {
        matched.insert(matchable[i].id);
        out.push(one_to_one(matchable[i], free_targets[j], true, config));
    }
    for s in free_sources {
        if !matched.contains(&s.id) {
            out.push(static_pair(s, tol));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_reverses_to_meet_nearest_end() {
        let a = vec![Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0)];
        let b = vec![Vec2::new(30.0, 0.0), Vec2::new(11.0, 0.0)];
        let chain = chain_polylines(vec![a, b]);
        assert_eq!(chain.len(), 4);
        assert_eq!(chain[2], Vec2::new(11.0, 0.0));
        assert_eq!(chain[3], Vec2::new(30.0, 0.0));
    }

    #[test]
    fn parents_are_sources_then_targets() {
        let a = Stroke::from_xy(4, &[(0.0, 0.0), (1.0, 0.0)]);
        let b = Stroke::from_xy(9, &[(0.0, 1.0), (1.0, 1.0), (2.0, 1.0)]);
        let pair = one_to_one(&a, &b, false, &TweenConfig::default());
        assert_eq!(pair.parents(), vec![4, 9]);
        assert_eq!(pair.start.len(), 3);
        assert_eq!(pair.end.len(), 3);
    }

    #[test]
    fn auto_pair_flips_reversed_target() {
        let a = Stroke::from_xy(1, &[(0.0, 0.0), (50.0, 0.0), (100.0, 0.0)]);
        let b = Stroke::from_xy(2, &[(100.0, 5.0), (50.0, 5.0), (0.0, 5.0)]);
        let pair = one_to_one(&a, &b, true, &TweenConfig::default());
        assert_eq!(pair.end[0].pos(), Vec2::new(0.0, 5.0));
        let explicit = one_to_one(&a, &b, false, &TweenConfig::default());
        assert_eq!(explicit.end[0].pos(), Vec2::new(100.0, 5.0));
    }

    #[test]
    fn missing_ids_leave_strokes_unbound() {
        let a = Stroke::from_xy(1, &[(0.0, 0.0), (10.0, 0.0)]);
        let b = Stroke::from_xy(2, &[(0.0, 5.0), (10.0, 5.0)]);
        let groups = vec![CorrespondenceGroup::new(0, 10, vec![1], vec![99])];
        let pairs = resolve(&[a], &[b], &groups, MatchStrategy::Index, &TweenConfig::default());
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].kind, PairKind::Auto);
        assert_eq!(pairs[0].parents(), vec![1, 2]);
    }

    #[test]
    fn unmatched_source_passes_through() {
        let a = Stroke::from_xy(1, &[(0.0, 0.0), (10.0, 0.0)]);
        let c = Stroke::from_xy(3, &[(0.0, 50.0), (10.0, 50.0)]);
        let b = Stroke::from_xy(2, &[(0.0, 5.0), (10.0, 5.0)]);
        let pairs = resolve(&[a, c.clone()], &[b], &[], MatchStrategy::Index, &TweenConfig::default());
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[1].kind, PairKind::Static);
        assert_eq!(pairs[1].parents(), vec![3]);
        assert_eq!(pairs[1].start, c.points);
    }
}
