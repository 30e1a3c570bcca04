//! Keyboard and on-screen button input
//!
//! Browser events only flip flags here; the simulation reads them through
//! `intent_mut` once per frame. Jump is a request: set on a fresh press and
//! cleared by the physics step when it actually jumps.

use crate::sim::TickInput;

/// A logical control, independent of the device that drives it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    Left,
    Right,
    Jump,
}

impl Control {
    /// Map a `KeyboardEvent.key` value
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowLeft" | "a" | "A" => Some(Control::Left),
            "ArrowRight" | "d" | "D" => Some(Control::Right),
            "ArrowUp" | "w" | "W" | " " => Some(Control::Jump),
            _ => None,
        }
    }

    /// DOM id of the matching on-screen button
    pub fn button_id(self) -> &'static str {
        match self {
            Control::Left => "leftBtn",
            Control::Right => "rightBtn",
            Control::Jump => "upBtn",
        }
    }
}

/// Current input intent
#[derive(Debug, Clone, Default)]
pub struct InputState {
    intent: TickInput,
    jump_held: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle a key press. Returns true if the key is bound.
    pub fn key_down(&mut self, key: &str, repeat: bool) -> bool {
        match Control::from_key(key) {
            Some(Control::Jump) if repeat => true,
            Some(control) => {
                self.press(control);
                true
            }
            None => false,
        }
    }

    /// Handle a key release. Returns true if the key is bound.
    pub fn key_up(&mut self, key: &str) -> bool {
        match Control::from_key(key) {
            Some(control) => {
                self.release(control);
                true
            }
            None => false,
        }
    }

    /// Button or key went down
    pub fn press(&mut self, control: Control) {
        match control {
            Control::Left => self.intent.move_left = true,
            Control::Right => self.intent.move_right = true,
            Control::Jump => {
                if !self.jump_held {
                    self.intent.jump = true;
                }
                self.jump_held = true;
            }
        }
    }

    /// Button or key went up. Releasing jump withdraws an unserved request.
    pub fn release(&mut self, control: Control) {
        match control {
            Control::Left => self.intent.move_left = false,
            Control::Right => self.intent.move_right = false,
            Control::Jump => {
                self.jump_held = false;
                self.intent.jump = false;
            }
        }
    }

    /// Drop everything, e.g. when the window loses focus
    pub fn release_all(&mut self) {
        *self = Self::default();
    }

    pub fn intent(&self) -> TickInput {
        self.intent
    }

    /// Intent handed to `tick`, which consumes the jump request
    pub fn intent_mut(&mut self) -> &mut TickInput {
        &mut self.intent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arrow_and_letter_bindings() {
        assert_eq!(Control::from_key("ArrowLeft"), Some(Control::Left));
        assert_eq!(Control::from_key("d"), Some(Control::Right));
        assert_eq!(Control::from_key(" "), Some(Control::Jump));
        assert_eq!(Control::from_key("Escape"), None);
    }

    #[test]
    fn test_hold_and_release_movement() {
        let mut input = InputState::new();
        assert!(input.key_down("ArrowRight", false));
        assert!(input.intent().move_right);
        assert!(input.key_up("ArrowRight"));
        assert!(!input.intent().move_right);
        assert!(!input.key_down("q", false));
    }

    #[test]
    fn test_jump_ignores_auto_repeat() {
        let mut input = InputState::new();
        input.key_down("ArrowUp", false);
        assert!(input.intent().jump);

        // Physics consumed it
        input.intent_mut().jump = false;
        input.key_down("ArrowUp", true);
        input.key_down("ArrowUp", true);
        assert!(!input.intent().jump);

        // Only a new press after release asks again
        input.key_up("ArrowUp");
        input.key_down("ArrowUp", false);
        assert!(input.intent().jump);
    }

    #[test]
    fn test_held_button_does_not_rearm_jump() {
        let mut input = InputState::new();
        input.press(Control::Jump);
        input.intent_mut().jump = false;
        input.press(Control::Jump);
        assert!(!input.intent().jump);
    }

    #[test]
    fn test_release_withdraws_jump_request() {
        let mut input = InputState::new();
        input.press(Control::Jump);
        input.release(Control::Jump);
        assert!(!input.intent().jump);

        input.key_down("ArrowUp", false);
        input.key_up("ArrowUp");
        assert!(!input.intent().jump);
    }

    #[test]
    fn test_release_all_clears_everything() {
        let mut input = InputState::new();
        input.press(Control::Left);
        input.press(Control::Right);
        input.press(Control::Jump);
        input.release_all();
        let intent = input.intent();
        assert!(!intent.move_left && !intent.move_right && !intent.jump);

        // Not stuck as held either
        input.press(Control::Jump);
        assert!(input.intent().jump);
    }
}
