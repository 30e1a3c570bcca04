//! Horizontal scroll that keeps the player left of centre

use serde::{Deserialize, Serialize};

use super::geom::Rect;

/// Derived scroll offset; recomputed every tick, never integrated
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Camera {
    /// World x of the viewport's left edge
    pub offset_x: f32,
}

impl Camera {
    /// Camera that trails the player by `lead`, clamped to the world
    pub fn follow(player_x: f32, world_width: f32, viewport_width: f32, lead: f32) -> Self {
        let max_offset = (world_width - viewport_width).max(0.0);
        Self {
            offset_x: (player_x - lead).clamp(0.0, max_offset),
        }
    }

    /// World rectangle to screen space
    pub fn to_screen(&self, rect: &Rect) -> Rect {
        rect.scrolled(self.offset_x)
    }
}
