//! Pairing of strokes no binding mentions.

use crate::geometry::path::{centroid, open_loop, stroke_polyline};
use crate::model::{MatchStrategy, Stroke};

/// Pair unbound sources with unbound targets. Returns `(source, target)`
/// index pairs into the given slices, ordered by source index.
///
/// `Index` pairs by declaration order. `Spatial` sorts every
/// source/target centroid distance ascending and claims the closest
/// unclaimed pair first; equal distances fall back to index order.
pub fn auto_match(sources: &[&Stroke], targets: &[&Stroke], strategy: MatchStrategy, tol: f32) -> Vec<(usize, usize)> {
    match strategy {
        MatchStrategy::Index => (0..sources.len().min(targets.len())).map(|i| (i, i)).collect(),
        MatchStrategy::Spatial => {
            let sc: Vec<_> = sources.iter().map(|s| centroid(open_loop(&stroke_polyline(s, tol)))).collect();
            let tc: Vec<_> = targets.iter().map(|t| centroid(open_loop(&stroke_polyline(t, tol)))).collect();
            let mut candidates = Vec::with_capacity(sc.len() * tc.len());
            for (i, a) in sc.iter().enumerate() {
                for (j, b) in tc.iter().enumerate() {
                    candidates.push((a.dist(*b), i, j));
                }
            }
            candidates.sort_by(|x, y| x.0.total_cmp(&y.0).then(x.1.cmp(&y.1)).then(x.2.cmp(&y.2)));

            let mut source_taken = vec![false; sc.len()];
            let mut target_taken = vec![false; tc.len()];
            let mut pairs = Vec::new();
            for (_, i, j) in candidates {
                if source_taken[i] || target_taken[j] {
                    continue;
                }
                source_taken[i] = true;
                target_taken[j] = true;
                pairs.push((i, j));
            }
            pairs.sort_unstable();
            pairs
        }
    }
}
