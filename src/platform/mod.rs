//! Platform abstraction layer
//!
//! Browser-facing pieces that are still plain data:
//! - Input intent from keys and on-screen buttons
//! - Frame clock (timestamps to clamped dt)
//! - Viewport fitting
//!
//! Settings storage lives in `crate::settings`.

pub mod clock;
pub mod input;
pub mod viewport;

pub use clock::FrameClock;
pub use input::{Control, InputState};
pub use viewport::Viewport;
