use serde::{Deserialize, Serialize};

pub type StrokeId = u32;

/// High bit marks ids generated for tween output; the low bits are the
/// position of the stroke in the output list.
pub const TWEEN_ID_BASE: StrokeId = 0x8000_0000;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    #[inline]
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
    #[inline]
    pub fn add(self, o: Vec2) -> Vec2 {
        Vec2 { x: self.x + o.x, y: self.y + o.y }
    }
    #[inline]
    pub fn sub(self, o: Vec2) -> Vec2 {
        Vec2 { x: self.x - o.x, y: self.y - o.y }
    }
    #[inline]
    pub fn scale(self, s: f32) -> Vec2 {
        Vec2 { x: self.x * s, y: self.y * s }
    }
    #[inline]
    pub fn lerp(self, o: Vec2, t: f32) -> Vec2 {
        Vec2 {
            x: self.x + t * (o.x - self.x),
            y: self.y + t * (o.y - self.y),
        }
    }
    #[inline]
    pub fn dist(self, o: Vec2) -> f32 {
        let dx = o.x - self.x;
        let dy = o.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
    pub fn is_transparent(&self) -> bool {
        self.a == 0
    }
}

/// A path vertex. Handles are offsets from `(x, y)`; `None` means the
/// neighbouring segment is straight on that side.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handle_in: Option<Vec2>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handle_out: Option<Vec2>,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y, handle_in: None, handle_out: None }
    }
    pub fn pos(&self) -> Vec2 {
        Vec2 { x: self.x, y: self.y }
    }
    /// Swap incoming and outgoing handles, used when a path is reversed.
    pub fn flipped(&self) -> Point {
        Point {
            x: self.x,
            y: self.y,
            handle_in: self.handle_out,
            handle_out: self.handle_in,
        }
    }
}

impl From<Vec2> for Point {
    fn from(v: Vec2) -> Self {
        Point::new(v.x, v.y)
    }
}

/// Missing fields in JSON take the [`Default`] style.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrokeStyle {
    pub color: Color,
    pub fill: Option<Color>,
    pub width: f32,
    pub taper_start: f32,
    pub taper_end: f32,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            color: Color::rgba(0, 0, 0, 255),
            fill: None,
            width: 1.0,
            taper_start: 0.0,
            taper_end: 0.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub id: StrokeId,
    pub points: Vec<Point>,
    /// Explicit closure flag. `None` falls back to the endpoint-gap heuristic.
    #[serde(default)]
    pub closed: Option<bool>,
    #[serde(default)]
    pub style: StrokeStyle,
    /// Source/target strokes this stroke was produced from.
    #[serde(default)]
    pub parents: Vec<StrokeId>,
    /// Strokes a guide is bound to.
    #[serde(default)]
    pub linked: Vec<StrokeId>,
}

impl Stroke {
    pub fn new(id: StrokeId, points: Vec<Point>) -> Self {
        Self {
            id,
            points,
            closed: None,
            style: StrokeStyle::default(),
            parents: Vec::new(),
            linked: Vec::new(),
        }
    }
    pub fn from_xy(id: StrokeId, xy: &[(f32, f32)]) -> Self {
        Self::new(id, xy.iter().map(|&(x, y)| Point::new(x, y)).collect())
    }
    pub fn with_closed(mut self, closed: bool) -> Self {
        self.closed = Some(closed);
        self
    }
    pub fn with_style(mut self, style: StrokeStyle) -> Self {
        self.style = style;
        self
    }
    pub fn with_linked(mut self, linked: Vec<StrokeId>) -> Self {
        self.linked = linked;
        self
    }
    pub fn positions(&self) -> Vec<Vec2> {
        self.points.iter().map(Point::pos).collect()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Easing {
    #[default]
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
}

impl Easing {
    /// Remap normalized time; input is clamped to [0, 1].
    pub fn apply(self, t: f32) -> f32 {
        let t = crate::geometry::tolerance::clamp01(t);
        match self {
            Easing::Linear => t,
            Easing::EaseIn => t * t,
            Easing::EaseOut => t * (2.0 - t),
            Easing::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    -1.0 + (4.0 - 2.0 * t) * t
                }
            }
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub index: u32,
    /// Bumped by the keyframe store on every mutation.
    #[serde(default)]
    pub revision: u64,
    pub strokes: Vec<Stroke>,
    #[serde(default)]
    pub guides: Vec<Stroke>,
    #[serde(default)]
    pub easing: Easing,
}

impl Frame {
    pub fn new(index: u32, strokes: Vec<Stroke>) -> Self {
        Self { index, revision: 0, strokes, guides: Vec::new(), easing: Easing::Linear }
    }
    pub fn stroke(&self, id: StrokeId) -> Option<&Stroke> {
        self.strokes.iter().find(|s| s.id == id)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStrategy {
    #[default]
    Index,
    Spatial,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn easing_endpoints_are_fixed() {
        for e in [Easing::Linear, Easing::EaseIn, Easing::EaseOut, Easing::EaseInOut] {
            assert!((e.apply(0.0) - 0.0).abs() < 1e-6);
            assert!((e.apply(1.0) - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn easing_curves() {
        assert!((Easing::EaseIn.apply(0.5) - 0.25).abs() < 1e-6);
        assert!((Easing::EaseOut.apply(0.5) - 0.75).abs() < 1e-6);
        assert!((Easing::EaseInOut.apply(0.25) - 0.125).abs() < 1e-6);
        assert!((Easing::EaseInOut.apply(0.75) - 0.875).abs() < 1e-6);
        assert!((Easing::EaseInOut.apply(0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn easing_serde_names() {
        let s = serde_json::to_string(&Easing::EaseInOut).unwrap();
        assert_eq!(s, "\"ease-in-out\"");
        let m: MatchStrategy = serde_json::from_str("\"spatial\"").unwrap();
        assert_eq!(m, MatchStrategy::Spatial);
    }
}
