//! Tween entry points.
//!
//! [`compute_tween`] is a pure function of its arguments. [`TweenEngine`]
//! wraps it with a small memo so scrubbing back and forth over an
//! unchanged interval does not redo the search.

use crate::algorithms::interpolate::{find_guide, run_centroid, tween_points};
use crate::algorithms::style::blend_style;
use crate::algorithms::topology::{resolve, PairKind, ResolvedPair};
use crate::bindings::{BindingSet, CorrespondenceGroup};
use crate::config::TweenConfig;
use crate::model::{Frame, MatchStrategy, Stroke, Vec2, TWEEN_ID_BASE};
use log::debug;
use std::collections::HashMap;

/// Normalized, eased time of `frame_index` between the two keyframes.
pub fn tween_time(frame_index: u32, prev: &Frame, next: &Frame) -> f32 {
    let span = next.index.saturating_sub(prev.index);
    if span == 0 {
        return 0.0;
    }
    let raw = frame_index.saturating_sub(prev.index) as f32 / span as f32;
    prev.easing.apply(raw)
}

fn build_stroke(ordinal: usize, pair: &ResolvedPair, t: f32, guides: &[Stroke], config: &TweenConfig) -> Stroke {
    let from = run_centroid(&pair.start);
    let to = run_centroid(&pair.end);
    let offset = if pair.kind == PairKind::Static {
        Vec2::ZERO
    } else {
        find_guide(guides, &pair.sources, from, to, config.guide_snap_distance, config.flatten_tolerance)
            .map(|g| g.offset(from, to, t))
            .unwrap_or(Vec2::ZERO)
    };
    Stroke {
        id: TWEEN_ID_BASE | ordinal as u32,
        points: tween_points(&pair.start, &pair.end, t, offset),
        closed: Some(pair.closed),
        style: blend_style(&pair.source_style, &pair.target_style, t),
        parents: pair.parents(),
        linked: Vec::new(),
    }
}

/// Composite shape at `frame_index` between two keyframes.
///
/// At or before `prev.index` the source strokes come back as they are, at
/// or after `next.index` the target strokes do. Never fails: degenerate
/// input yields an empty or pass-through result.
pub fn compute_tween(
    frame_index: u32,
    prev: &Frame,
    next: &Frame,
    bindings: &BindingSet,
    strategy: MatchStrategy,
    config: &TweenConfig,
) -> Vec<Stroke> {
    if prev.index >= next.index || frame_index <= prev.index {
        return prev.strokes.clone();
    }
    if frame_index >= next.index {
        return next.strokes.clone();
    }
    if prev.strokes.is_empty() {
        return Vec::new();
    }
    if next.strokes.is_empty() {
        return prev.strokes.clone();
    }

    let t = tween_time(frame_index, prev, next);
    let groups: Vec<CorrespondenceGroup> = bindings.for_pair(prev.index, next.index).into_iter().cloned().collect();
    let pairs = resolve(&prev.strokes, &next.strokes, &groups, strategy, config);
    debug!(
        "tween {} in {}..{}: t={:.3}, {} groups, {} output strokes",
        frame_index,
        prev.index,
        next.index,
        t,
        groups.len(),
        pairs.len()
    );
    pairs
        .iter()
        .enumerate()
        .map(|(i, pair)| build_stroke(i, pair, t, &prev.guides, config))
        .collect()
}

/// Memo key: everything a result depends on besides the config.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TweenKey {
    pub prev_index: u32,
    pub prev_revision: u64,
    pub next_index: u32,
    pub next_revision: u64,
    pub frame_index: u32,
    pub bindings_version: u64,
    pub strategy: MatchStrategy,
}

impl TweenKey {
    pub fn new(frame_index: u32, prev: &Frame, next: &Frame, bindings: &BindingSet, strategy: MatchStrategy) -> Self {
        Self {
            prev_index: prev.index,
            prev_revision: prev.revision,
            next_index: next.index,
            next_revision: next.revision,
            frame_index,
            bindings_version: bindings.version,
            strategy,
        }
    }
}

/// Memoizing wrapper around [`compute_tween`]. The cache is keyed on frame
/// revisions and the binding version, so callers must bump those when the
/// underlying data changes.
#[derive(Debug, Default)]
pub struct TweenEngine {
    config: TweenConfig,
    cache: HashMap<TweenKey, Vec<Stroke>>,
    hits: u64,
    misses: u64,
}

impl TweenEngine {
    pub fn new(config: TweenConfig) -> Self {
        Self { config, ..Default::default() }
    }

    pub fn config(&self) -> &TweenConfig {
        &self.config
    }

    /// Replace the config. Cached results were computed under the old one,
    /// so they are dropped.
    pub fn set_config(&mut self, config: TweenConfig) {
        self.config = config;
        self.invalidate();
    }

    pub fn invalidate(&mut self) {
        self.cache.clear();
    }

    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    /// `(hits, misses)` since construction.
    pub fn stats(&self) -> (u64, u64) {
        (self.hits, self.misses)
    }

    pub fn compute(
        &mut self,
        frame_index: u32,
        prev: &Frame,
        next: &Frame,
        bindings: &BindingSet,
        strategy: MatchStrategy,
    ) -> Vec<Stroke> {
        let key = TweenKey::new(frame_index, prev, next, bindings, strategy);
        if let Some(hit) = self.cache.get(&key) {
            self.hits += 1;
            return hit.clone();
        }
        self.misses += 1;
        let out = compute_tween(frame_index, prev, next, bindings, strategy, &self.config);
        if self.cache.len() >= self.config.cache_capacity {
            self.cache.clear();
        }
        if self.config.cache_capacity > 0 {
            self.cache.insert(key, out.clone());
        }
        out
    }
}
