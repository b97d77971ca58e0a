use crate::model::{Color, StrokeStyle};

#[inline]
fn lerp_u8(a: u8, b: u8, t: f32) -> u8 {
    (a as f32 + (b as f32 - a as f32) * t).round().clamp(0.0, 255.0) as u8
}

#[inline]
fn lerp_f32(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Channel-wise blend, alpha included.
pub fn blend_color(a: Color, b: Color, t: f32) -> Color {
    Color {
        r: lerp_u8(a.r, b.r, t),
        g: lerp_u8(a.g, b.g, t),
        b: lerp_u8(a.b, b.b, t),
        a: lerp_u8(a.a, b.a, t),
    }
}

/// Fill only tweens when the source already has a visible one. A source
/// fill with no target fill fades out.
pub fn blend_fill(a: Option<Color>, b: Option<Color>, t: f32) -> Option<Color> {
    let a = a.filter(|c| !c.is_transparent())?;
    let b = b.unwrap_or(Color { a: 0, ..a });
    Some(blend_color(a, b, t))
}

pub fn blend_style(a: &StrokeStyle, b: &StrokeStyle, t: f32) -> StrokeStyle {
    StrokeStyle {
        color: blend_color(a.color, b.color, t),
        fill: blend_fill(a.fill, b.fill, t),
        width: lerp_f32(a.width, b.width, t),
        taper_start: lerp_f32(a.taper_start, b.taper_start, t),
        taper_end: lerp_f32(a.taper_end, b.taper_end, t),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Color = Color::rgba(255, 0, 0, 255);
    const BLUE: Color = Color::rgba(0, 0, 255, 255);

    #[test]
    fn color_midpoint() {
        assert_eq!(blend_color(RED, BLUE, 0.5), Color::rgba(128, 0, 128, 255));
        assert_eq!(blend_color(RED, BLUE, 0.0), RED);
        assert_eq!(blend_color(RED, BLUE, 1.0), BLUE);
    }

    #[test]
    fn fill_requires_source_fill() {
        assert_eq!(blend_fill(None, Some(BLUE), 0.9), None);
        assert_eq!(blend_fill(Some(Color::rgba(1, 2, 3, 0)), Some(BLUE), 0.5), None);
        assert_eq!(blend_fill(Some(RED), Some(BLUE), 0.5), Some(Color::rgba(128, 0, 128, 255)));
        assert_eq!(blend_fill(Some(RED), None, 1.0), Some(Color::rgba(255, 0, 0, 0)));
    }

    #[test]
    fn scalars_blend_linearly() {
        let a = StrokeStyle { width: 2.0, taper_start: 0.0, taper_end: 1.0, ..StrokeStyle::default() };
        let b = StrokeStyle { width: 4.0, taper_start: 1.0, taper_end: 0.0, ..StrokeStyle::default() };
        let s = blend_style(&a, &b, 0.5);
        assert_eq!(s.width, 3.0);
        assert_eq!(s.taper_start, 0.5);
        assert_eq!(s.taper_end, 0.5);
    }
}
