// Centralized ingestion limits to harden against untrusted input (JSON)

// Request size caps
pub const MAX_STROKES_PER_FRAME: usize = 10_000;
pub const MAX_GUIDES_PER_FRAME: usize = 1_000;
pub const MAX_POINTS_PER_STROKE: usize = 20_000;
pub const MAX_POINTS_TOTAL: usize = 1_000_000;
pub const MAX_BINDING_GROUPS: usize = 50_000;
pub const MAX_IDS_PER_GROUP: usize = 1_000;

// Flattening never resolves a curved segment finer than its control hull
// length divided by this, so point counts stay bounded at large coordinates.
pub const MAX_FLATTEN_SEGMENT_PIECES: usize = 256;

// Numeric bounds
pub const COORD_MIN: f32 = -10_000_000.0;
pub const COORD_MAX: f32 =  10_000_000.0;
pub const WIDTH_MAX: f32 = 10_000.0;

#[inline]
pub fn in_coord_bounds(x: f32) -> bool { x.is_finite() && x >= COORD_MIN && x <= COORD_MAX }

#[inline]
pub fn in_width_bounds(w: f32) -> bool { w.is_finite() && w >= 0.0 && w <= WIDTH_MAX }
