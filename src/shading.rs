//! Mapping light and floor tiles onto the glyph palette

use crate::PALETTE;
use nalgebra::Point3;

/// Brightest glyph, also used for "on" floor tiles
pub const SOLID: char = '*';

/// Glyph for "off" floor tiles and empty sky
pub const BLANK: char = ' ';

/// Floor tile parity: `floor(x) + floor(z)` even means the tile is on
pub fn is_checkerboard(point: &Point3<f32>) -> bool {
    let cx = point.x.floor() as i64;
    let cz = point.z.floor() as i64;
    cx.wrapping_add(cz).rem_euclid(2) == 0
}

/// Quantise an intensity in [0, 1] into a palette glyph
pub fn shade_surface(intensity: f32) -> char {
    let glyphs = PALETTE.as_bytes();
    let last = glyphs.len() - 1;
    let t = intensity.clamp(0.0, 1.0);
    let index = ((t * last as f32).round() as usize).min(last);
    glyphs[index] as char
}

/// Checkerboard glyph for a point on the floor plane
pub fn shade_floor(point: &Point3<f32>) -> char {
    if is_checkerboard(point) {
        SOLID
    } else {
        BLANK
    }
}

/// Combined shading routine.
///
/// With `reflective` set this is [`shade_surface`]. Without it the result is
/// the checkerboard test on the synthetic point `(t, 0, 0)` built from the
/// clamped intensity, so `t` in [0, 1) gives `'*'` and `t = 1` gives `' '`.
/// The renderer always goes through the two named routines instead; this one
/// exists for callers that want the single-function form.
pub fn shade(t: f32, reflective: bool) -> char {
    let t = t.clamp(0.0, 1.0);
    if reflective {
        shade_surface(t)
    } else {
        shade_floor(&Point3::new(t, 0.0, 0.0))
    }
}
