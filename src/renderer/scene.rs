//! Draw list generation
//!
//! Turns a `GameState` into screen-space draw commands. Missing images are
//! resolved here: the command list already contains the placeholder rect
//! (or nothing) so a backend only has to paint what it is given.

use glam::Vec2;

use crate::assets::{AssetCatalog, AssetKey, ImageHandle};
use crate::consts::{CANVAS_H, CANVAS_W};
use crate::settings::Settings;
use crate::sim::level::DECORATION_SIZE;
use crate::sim::{DecorationKind, GameState, Rect, SparkleColor};

pub const HUD_HINT: &str = "Loza \u{2014} Reach the heart! Avoid Ahmed Taha";
pub const HAZARD_LABEL: &str = "Ahmed Taha";

const SPARKLE_SIZE: f32 = 24.0;
const BLINK_COLOR: [f32; 4] = [1.0, 0.8, 1.0, 1.0];
const OBSTACLE_COLOR: [f32; 4] = [0x8b as f32 / 255.0, 0.0, 0.0, 1.0];
const LABEL_COLOR: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
const HUD_PANEL: Rect = Rect::new(12.0, 12.0, 360.0, 36.0);
const HUD_PANEL_COLOR: [f32; 4] = [1.0, 1.0, 1.0, 0.8];
const HUD_TEXT_COLOR: [f32; 4] = [0x22 as f32 / 255.0, 0x22 as f32 / 255.0, 0x22 as f32 / 255.0, 1.0];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
}

/// One paint operation in screen space
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Sprite {
        key: AssetKey,
        dest: Rect,
        flip_x: bool,
    },
    Solid {
        color: [f32; 4],
        dest: Rect,
    },
    Text {
        text: &'static str,
        /// Baseline anchor
        pos: Vec2,
        size_px: f32,
        color: [f32; 4],
        align: TextAlign,
    },
}

/// Commands in painter's order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawList {
    pub commands: Vec<DrawCommand>,
}

impl DrawList {
    fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    /// Image if loaded, else its placeholder colour, else nothing
    fn image<H>(&mut self, assets: &AssetCatalog<H>, key: AssetKey, dest: Rect) {
        self.image_flipped(assets, key, dest, false);
    }

    fn image_flipped<H>(&mut self, assets: &AssetCatalog<H>, key: AssetKey, dest: Rect, flip_x: bool) {
        if assets.is_loaded(key) {
            self.push(DrawCommand::Sprite { key, dest, flip_x });
        } else if let Some(color) = key.placeholder() {
            self.push(DrawCommand::Solid { color, dest });
        }
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

fn on_screen(rect: &Rect) -> bool {
    rect.right() > 0.0 && rect.left() < CANVAS_W
}

/// Build the frame for `state`
///
/// `time_ms` is wall-clock time and only drives cosmetic motion (goal
/// bounce and idle bob).
pub fn build_scene<H: ImageHandle>(
    state: &GameState,
    assets: &AssetCatalog<H>,
    settings: &Settings,
    time_ms: f64,
) -> DrawList {
    let mut list = DrawList::default();
    let camera = state.camera;
    let animate = settings.animations_enabled();

    background(&mut list, assets, camera.offset_x);

    // Platforms, tiled horizontally when the image is available
    let platform_tile = assets
        .get(AssetKey::Platform)
        .map(|image| image.width())
        .filter(|w| *w > 0.0);
    for platform in &state.level.platforms {
        let screen = camera.to_screen(platform);
        if !on_screen(&screen) {
            continue;
        }
        match platform_tile {
            Some(tile_w) => {
                let mut x = screen.x;
                while x < screen.right() {
                    let tile = Rect::new(x, screen.y, tile_w, screen.h);
                    if on_screen(&tile) {
                        list.push(DrawCommand::Sprite {
                            key: AssetKey::Platform,
                            dest: tile,
                            flip_x: false,
                        });
                    }
                    x += tile_w;
                }
            }
            None => list.image(assets, AssetKey::Platform, screen),
        }
    }

    for decoration in &state.level.decorations {
        let key = match decoration.kind {
            DecorationKind::Seashell => AssetKey::Seashell,
            DecorationKind::Starfish => AssetKey::Starfish,
        };
        let dest = camera.to_screen(&Rect::at(decoration.pos, Vec2::splat(DECORATION_SIZE)));
        if on_screen(&dest) {
            list.image(assets, key, dest);
        }
    }

    for obstacle in &state.level.obstacles {
        let dest = camera.to_screen(obstacle);
        if on_screen(&dest) {
            list.push(DrawCommand::Solid {
                color: OBSTACLE_COLOR,
                dest,
            });
        }
    }

    for hazard in &state.level.hazards {
        let dest = camera.to_screen(&hazard.rect());
        if !on_screen(&dest) {
            continue;
        }
        list.image(assets, AssetKey::Pill, dest);
        list.push(DrawCommand::Text {
            text: HAZARD_LABEL,
            pos: Vec2::new(dest.x + dest.w / 2.0, dest.y - 6.0),
            size_px: 9.0,
            color: LABEL_COLOR,
            align: TextAlign::Center,
        });
        if hazard.is_blinking(state.tuning.blink_window) {
            list.push(DrawCommand::Solid {
                color: BLINK_COLOR,
                dest: Rect::new(
                    dest.x + dest.w / 2.0 - 6.0,
                    dest.y + dest.h / 2.0 - 4.0,
                    (dest.w * 0.3).floor().max(6.0),
                    (dest.h * 0.15).floor().max(3.0),
                ),
            });
        }
    }

    // Goal bounces while the player is close, image only
    let goal = &state.level.goal;
    let mut goal_dest = camera.to_screen(&goal.rect);
    if goal.near && animate && assets.is_loaded(AssetKey::Heart) {
        goal_dest.y -= 6.0 * (time_ms / 200.0).sin() as f32;
    }
    if on_screen(&goal_dest) {
        list.image(assets, AssetKey::Heart, goal_dest);
    }

    for sparkle in &state.sparkles {
        let key = match sparkle.color {
            SparkleColor::Violet => AssetKey::SparkleViolet,
            SparkleColor::Gold => AssetKey::SparkleGold,
        };
        let half = SPARKLE_SIZE / 2.0;
        let dest = camera.to_screen(&Rect::new(
            sparkle.pos.x - half,
            sparkle.pos.y - half,
            SPARKLE_SIZE,
            SPARKLE_SIZE,
        ));
        if on_screen(&dest) {
            list.image(assets, key, dest);
        }
    }

    let player = &state.player;
    let mut player_dest = camera.to_screen(&player.rect());
    if animate && player.is_idle() && assets.is_loaded(AssetKey::Player) {
        player_dest.y += (time_ms / 250.0).sin() as f32 * 2.0;
    }
    list.image_flipped(assets, AssetKey::Player, player_dest, player.facing < 0.0);

    hud(&mut list);
    list
}

/// Repeating sky tile scrolled with the camera, or a flat fill
fn background<H: ImageHandle>(list: &mut DrawList, assets: &AssetCatalog<H>, offset_x: f32) {
    let tile_w = assets
        .get(AssetKey::Background)
        .map(|image| image.width())
        .filter(|w| *w > 0.0);
    match tile_w {
        Some(tile_w) => {
            let mut x = -(offset_x % tile_w).floor();
            while x < CANVAS_W {
                list.push(DrawCommand::Sprite {
                    key: AssetKey::Background,
                    dest: Rect::new(x, 0.0, tile_w, CANVAS_H),
                    flip_x: false,
                });
                x += tile_w;
            }
        }
        None => list.image(assets, AssetKey::Background, Rect::new(0.0, 0.0, CANVAS_W, CANVAS_H)),
    }
}

fn hud(list: &mut DrawList) {
    list.push(DrawCommand::Solid {
        color: HUD_PANEL_COLOR,
        dest: HUD_PANEL,
    });
    list.push(DrawCommand::Text {
        text: HUD_HINT,
        pos: Vec2::new(18.0, 36.0),
        size_px: 12.0,
        color: HUD_TEXT_COLOR,
        align: TextAlign::Left,
    });
}
