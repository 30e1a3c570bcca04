//! Rendering module
//!
//! `scene` builds a backend-agnostic draw list; the browser runner paints
//! it onto a 2D canvas.

pub mod scene;

pub use scene::{DrawCommand, DrawList, TextAlign, build_scene};

/// CSS colour string for an RGBA colour in `[0, 1]`
pub fn css_rgba(color: [f32; 4]) -> String {
    let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    format!(
        "rgba({},{},{},{})",
        channel(color[0]),
        channel(color[1]),
        channel(color[2]),
        color[3].clamp(0.0, 1.0)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_css_rgba() {
        assert_eq!(css_rgba([1.0, 0.0, 0.0, 1.0]), "rgba(255,0,0,1)");
        assert_eq!(css_rgba([1.0, 1.0, 1.0, 0.5]), "rgba(255,255,255,0.5)");
        assert_eq!(css_rgba([2.0, -1.0, 0.0, 1.0]), "rgba(255,0,0,1)");
    }
}
