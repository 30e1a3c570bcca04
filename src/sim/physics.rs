//! Player motion and collision resolution
//!
//! Semi-implicit Euler integration followed by one-way platform landing.
//! Platforms only push up; everything else is an overlap test.

use std::borrow::Borrow;

use super::geom::Rect;
use super::state::Player;
use super::tick::TickInput;
use crate::tuning::Tuning;

/// Turn the input intent into horizontal velocity and, if allowed, a jump
///
/// The jump request is consumed only when it produces a jump; a request
/// made mid-air stays pending until the player lands or the input layer
/// withdraws it.
pub fn apply_intent(player: &mut Player, input: &mut TickInput, tuning: &Tuning, dt: f32) {
    if input.move_left {
        player.vel.x = -tuning.run_speed;
        player.facing = -1.0;
        player.idle_time = 0.0;
    } else if input.move_right {
        player.vel.x = tuning.run_speed;
        player.facing = 1.0;
        player.idle_time = 0.0;
    } else {
        player.vel.x = 0.0;
        player.idle_time += dt;
    }

    if input.jump && player.grounded {
        player.vel.y = -tuning.jump_impulse;
        player.grounded = false;
        input.jump = false;
    }
}

/// Gravity first, then position. Returns the bottom edge before the move.
pub fn integrate(player: &mut Player, gravity: f32, dt: f32) -> f32 {
    let prev_bottom = player.bottom();
    player.vel.y += gravity * dt;
    player.pos += player.vel * dt;
    prev_bottom
}

/// Keep the player inside `[0, world_width - w]`
pub fn clamp_to_world(player: &mut Player, world_width: f32) {
    let max_x = (world_width - player.size.x).max(0.0);
    player.pos.x = player.pos.x.clamp(0.0, max_x);
}

/// Whether a bottom edge moving from `prev_bottom` to `bottom` crossed `top`
/// going down (or came to rest on it)
#[inline]
pub fn crosses_downward(prev_bottom: f32, bottom: f32, top: f32) -> bool {
    prev_bottom <= top && bottom >= top
}

/// Land the player on any platform it fell onto this tick
///
/// Resets `grounded` and sets it again only on a landing. Candidates are
/// tested independently in order; the last landing wins. Returns the index
/// of the platform landed on.
pub fn resolve_platforms(player: &mut Player, platforms: &[Rect], prev_bottom: f32) -> Option<usize> {
    player.grounded = false;
    let mut landed = None;

    for (index, platform) in platforms.iter().enumerate() {
        if !player.rect().overlaps_x(platform) {
            continue;
        }
        if crosses_downward(prev_bottom, player.bottom(), platform.top()) {
            player.pos.y = platform.top() - player.size.y;
            player.vel.y = 0.0;
            player.grounded = true;
            landed = Some(index);
        }
    }

    landed
}

/// Index of the first rectangle overlapping `rect`
pub fn first_overlap<I, R>(rect: &Rect, others: I) -> Option<usize>
where
    I: IntoIterator<Item = R>,
    R: Borrow<Rect>,
{
    others.into_iter().position(|other| rect.overlaps(other.borrow()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use proptest::prelude::*;

    fn player_at(x: f32, y: f32) -> Player {
        Player::spawn(Vec2::new(x, y))
    }

    #[test]
    fn test_left_wins_over_right() {
        let mut player = player_at(100.0, 100.0);
        let mut input = TickInput {
            move_left: true,
            move_right: true,
            jump: false,
        };
        apply_intent(&mut player, &mut input, &Tuning::default(), 0.016);
        assert_eq!(player.vel.x, -220.0);
        assert_eq!(player.facing, -1.0);
    }

    #[test]
    fn test_idle_time_accumulates() {
        let mut player = player_at(100.0, 100.0);
        player.vel.x = 220.0;
        let mut input = TickInput::default();
        let tuning = Tuning::default();
        apply_intent(&mut player, &mut input, &tuning, 0.25);
        apply_intent(&mut player, &mut input, &tuning, 0.25);
        assert_eq!(player.vel.x, 0.0);
        assert_eq!(player.idle_time, 0.5);

        input.move_right = true;
        apply_intent(&mut player, &mut input, &tuning, 0.25);
        assert_eq!(player.idle_time, 0.0);
    }

    #[test]
    fn test_jump_only_when_grounded() {
        let tuning = Tuning::default();
        let mut player = player_at(100.0, 100.0);
        let mut input = TickInput {
            jump: true,
            ..Default::default()
        };

        // Airborne: request stays pending, no impulse
        apply_intent(&mut player, &mut input, &tuning, 0.016);
        assert_eq!(player.vel.y, 0.0);
        assert!(input.jump);

        player.grounded = true;
        apply_intent(&mut player, &mut input, &tuning, 0.016);
        assert_eq!(player.vel.y, -700.0);
        assert!(!player.grounded);
        assert!(!input.jump, "jump request must be consumed");
    }

    #[test]
    fn test_integrate_updates_velocity_before_position() {
        let mut player = player_at(0.0, 0.0);
        let prev_bottom = integrate(&mut player, 1800.0, 0.01);
        assert_eq!(prev_bottom, 64.0);
        assert!((player.vel.y - 18.0).abs() < 1e-4);
        // Position uses the new velocity
        assert!((player.pos.y - 0.18).abs() < 1e-4);
    }

    #[test]
    fn test_clamp_to_world() {
        let mut player = player_at(-5.0, 0.0);
        clamp_to_world(&mut player, 1000.0);
        assert_eq!(player.pos.x, 0.0);

        player.pos.x = 990.0;
        clamp_to_world(&mut player, 1000.0);
        assert_eq!(player.pos.x, 936.0);
    }

    #[test]
    fn test_lands_when_crossing_top() {
        let platform = Rect::new(0.0, 400.0, 200.0, 24.0);
        // Bottom went from 399.5 to 404.5
        let mut player = player_at(50.0, 340.5);
        player.vel.y = 300.0;

        let landed = resolve_platforms(&mut player, &[platform], 399.5);

        assert_eq!(landed, Some(0));
        assert_eq!(player.bottom(), 400.0);
        assert_eq!(player.vel.y, 0.0);
        assert!(player.grounded);
    }

    #[test]
    fn test_no_landing_from_below() {
        let platform = Rect::new(0.0, 400.0, 200.0, 24.0);
        // Moving up through the platform: bottom went from 430 to 420
        let mut player = player_at(50.0, 356.0);
        player.vel.y = -500.0;
        let landed = resolve_platforms(&mut player, &[platform], 430.0);
        assert_eq!(landed, None);
        assert!(!player.grounded);
        assert_eq!(player.vel.y, -500.0);
    }

    #[test]
    fn test_no_landing_without_horizontal_overlap() {
        let platform = Rect::new(0.0, 400.0, 200.0, 24.0);
        // Right at the platform's edge: touching is not overlapping
        let mut player = player_at(200.0, 340.0);
        let landed = resolve_platforms(&mut player, &[platform], 399.0);
        assert_eq!(landed, None);
    }

    #[test]
    fn test_resting_player_stays_grounded() {
        let platform = Rect::new(0.0, 400.0, 200.0, 24.0);
        let mut player = player_at(50.0, 336.0);
        player.grounded = true;
        let prev_bottom = integrate(&mut player, 1800.0, 0.016);
        resolve_platforms(&mut player, &[platform], prev_bottom);
        assert!(player.grounded);
        assert_eq!(player.bottom(), 400.0);
    }

    #[test]
    fn test_grounded_cleared_when_walking_off() {
        let platform = Rect::new(0.0, 400.0, 200.0, 24.0);
        let mut player = player_at(250.0, 336.0);
        player.grounded = true;
        let prev_bottom = integrate(&mut player, 1800.0, 0.016);
        resolve_platforms(&mut player, &[platform], prev_bottom);
        assert!(!player.grounded);
    }

    #[test]
    fn test_first_overlap() {
        let rects = [
            Rect::new(0.0, 0.0, 10.0, 10.0),
            Rect::new(100.0, 100.0, 10.0, 10.0),
            Rect::new(105.0, 105.0, 10.0, 10.0),
        ];
        let target = Rect::new(104.0, 104.0, 2.0, 2.0);
        assert_eq!(first_overlap(&target, &rects), Some(1));
        assert_eq!(first_overlap(&Rect::new(50.0, 50.0, 1.0, 1.0), &rects), None);
    }

    proptest! {
        /// Any downward crossing of a platform top snaps onto it
        #[test]
        fn prop_landing_snaps_to_top(
            top in 100i32..500,
            above in 0.01f32..40.0,
            below in 0.01f32..40.0,
            x_offset in -60.0f32..190.0,
            vy in 0.0f32..1500.0,
        ) {
            let top = top as f32;
            let platform = Rect::new(0.0, top, 200.0, 24.0);
            let mut player = player_at(x_offset, top + below - 64.0);
            player.vel.y = vy;
            let prev_bottom = top - above;

            let landed = resolve_platforms(&mut player, &[platform], prev_bottom);

            prop_assert_eq!(landed, Some(0));
            prop_assert_eq!(player.bottom(), top);
            prop_assert_eq!(player.vel.y, 0.0);
            prop_assert!(player.grounded);
        }

        #[test]
        fn prop_clamp_keeps_player_in_world(x in -10_000.0f32..10_000.0, width in 64.0f32..8000.0) {
            let mut player = player_at(x, 0.0);
            clamp_to_world(&mut player, width);
            prop_assert!(player.pos.x >= 0.0);
            prop_assert!(player.pos.x <= width - player.size.x);
        }
    }
}
