//! Canvas display size
//!
//! The game always renders at the logical resolution; only the CSS size of
//! the canvas changes with the window.

use crate::consts::{CANVAS_H, CANVAS_W, MAX_ASPECT};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Display scale, never above 1
    pub scale: f32,
}

impl Viewport {
    /// Fit the canvas into a window, landscape first
    pub fn fit(window_w: f32, window_h: f32) -> Self {
        let usable_w = window_w.min(window_h * MAX_ASPECT);
        let scale = (usable_w / CANVAS_W).min(1.0).max(0.0);
        Self { scale }
    }

    /// Logical drawing surface size
    pub fn logical_size(&self) -> (u32, u32) {
        (CANVAS_W as u32, CANVAS_H as u32)
    }

    /// CSS pixel size, rounded
    pub fn css_size(&self) -> (u32, u32) {
        (
            (CANVAS_W * self.scale).round() as u32,
            (CANVAS_H * self.scale).round() as u32,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_large_window_caps_at_one() {
        let viewport = Viewport::fit(2560.0, 1440.0);
        assert_eq!(viewport.scale, 1.0);
        assert_eq!(viewport.css_size(), (1024, 576));
    }

    #[test]
    fn test_narrow_window_shrinks() {
        let viewport = Viewport::fit(512.0, 900.0);
        assert_eq!(viewport.scale, 0.5);
        assert_eq!(viewport.css_size(), (512, 288));
    }

    #[test]
    fn test_short_window_uses_height_limit() {
        // 400 * 1.9 = 760
        let viewport = Viewport::fit(1200.0, 400.0);
        assert!((viewport.scale - 760.0 / 1024.0).abs() < 1e-6);
        assert_eq!(viewport.logical_size(), (1024, 576));
    }
}
