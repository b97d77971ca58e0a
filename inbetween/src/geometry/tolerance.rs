// Centralized tolerances and helpers for robust geometry

pub const EPS_POS: f32 = 1e-4;            // point coincidence threshold (px)
pub const EPS_LEN: f32 = 1e-6;            // zero-length vector threshold
pub const EPS_DENOM: f32 = 1e-8;          // denominator guard for ratios

// Closure heuristic for strokes without an explicit flag
pub const CLOSE_GAP_ABS: f32 = 1.0;       // endpoint gap (px)
pub const CLOSE_GAP_FRAC: f32 = 0.05;     // endpoint gap as a share of arc length

// Adaptive flattening cap
pub const MAX_FLATTEN_DEPTH: u32 = 16;

#[inline] pub fn clamp01(x: f32) -> f32 { x.max(0.0).min(1.0) }
#[inline] pub fn near_zero(x: f32, eps: f32) -> bool { x.abs() <= eps }

#[inline]
pub fn safe_div(num: f32, den: f32, fallback: f32) -> f32 {
    if den.abs() <= EPS_DENOM { fallback } else { num/den }
}
