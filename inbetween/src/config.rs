//! Engine sizing and search bounds.

use serde::{Deserialize, Serialize};

/// Tunables for the tween engine. Every algorithm takes this by reference;
/// nothing in the crate reads global state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TweenConfig {
    /// Resolution of the single-side path in the split/merge solver.
    pub split_samples: usize,
    /// Resolution of both merged polylines in the complex-mesh fallback.
    pub mesh_samples: usize,
    /// Upper bound on children in a split/merge. The permutation search is
    /// factorial in this; larger groups degrade to the complex mesh.
    pub max_split_children: usize,
    /// Closed single paths with at most this many children try every rotation.
    pub dense_rotation_max_children: usize,
    /// Evenly spaced rotations tried for closed paths with more children.
    pub coarse_rotation_count: usize,
    /// Slice floor when the single path or any child is closed.
    pub min_segment_points: usize,
    /// Weight of the first and last point in the phase-alignment cost.
    pub phase_endpoint_weight: f32,
    /// Unlinked guides must start and end within this distance of the
    /// pair's centroids.
    pub guide_snap_distance: f32,
    /// Bezier flattening tolerance in px.
    pub flatten_tolerance: f32,
    /// Memoized results kept by `TweenEngine` before the cache is reset.
    pub cache_capacity: usize,
    /// Cyclically shift closed auto-matched targets into phase (no
    /// resampling). Explicitly bound pairs keep their authored order.
    pub align_closed_pairs: bool,
}

impl Default for TweenConfig {
    fn default() -> Self {
        Self {
            split_samples: 300,
            mesh_samples: 200,
            max_split_children: 8,
            dense_rotation_max_children: 3,
            coarse_rotation_count: 12,
            min_segment_points: 3,
            phase_endpoint_weight: 5.0,
            guide_snap_distance: 25.0,
            flatten_tolerance: 0.25,
            cache_capacity: 64,
            align_closed_pairs: true,
        }
    }
}
