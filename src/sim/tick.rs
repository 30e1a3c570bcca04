//! Simulation tick
//!
//! Advances one session by one frame: intent, integration, platform
//! landing, failure checks, goal check, then the derived camera.

use super::camera::Camera;
use super::level::Hazard;
use super::physics;
use super::state::{GameState, ResetCause, SessionMode};
use crate::consts::CANVAS_W;

/// Input intent for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub move_left: bool,
    pub move_right: bool,
    /// Jump request; cleared by the tick that performs the jump
    pub jump: bool,
}

/// Advance the session by `dt` seconds (clamped to `Tuning::max_dt`)
pub fn tick(state: &mut GameState, input: &mut TickInput, dt: f32) {
    let dt = state.tuning.clamp_dt(dt);

    if state.mode == SessionMode::Won {
        // Physics is over; only the celebration keeps aging
        for sparkle in &mut state.sparkles {
            sparkle.age += dt;
        }
        return;
    }

    state.time_ticks += 1;

    // Player motion
    physics::apply_intent(&mut state.player, input, &state.tuning, dt);
    let prev_bottom = physics::integrate(&mut state.player, state.tuning.gravity, dt);
    physics::clamp_to_world(&mut state.player, state.level.world_width);
    physics::resolve_platforms(&mut state.player, &state.level.platforms, prev_bottom);

    let player_rect = state.player.rect();
    let mut failure = None;

    if physics::first_overlap(&player_rect, &state.level.obstacles).is_some() {
        failure = Some(ResetCause::Obstacle);
    }

    // Hazards walk whether or not the player already failed this tick
    let blink_period = state.tuning.blink_period;
    for hazard in &mut state.level.hazards {
        hazard.patrol(dt);
        hazard.advance_blink(dt, blink_period);
    }
    if failure.is_none()
        && physics::first_overlap(&player_rect, state.level.hazards.iter().map(Hazard::rect))
            .is_some()
    {
        failure = Some(ResetCause::Hazard);
    }

    if failure.is_none() && state.player.pos.y > state.tuning.fall_limit() {
        failure = Some(ResetCause::FellOut);
    }

    if let Some(cause) = failure {
        state.reset_player(cause);
    } else if state.player.rect().overlaps(&state.level.goal.rect) {
        state.win();
    }

    let player_center = state.player.rect().center();
    let goal = &mut state.level.goal;
    goal.near = player_center.distance(goal.rect.center()) < state.tuning.goal_near_radius;

    state.camera = Camera::follow(
        state.player.pos.x,
        state.level.world_width,
        CANVAS_W,
        state.tuning.camera_lead,
    );
}
