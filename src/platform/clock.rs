//! Frame timestamps to simulation dt

/// Turns `requestAnimationFrame` timestamps (milliseconds) into clamped dt
#[derive(Debug, Clone)]
pub struct FrameClock {
    last_ms: Option<f64>,
    max_dt: f32,
}

impl FrameClock {
    pub fn new(max_dt: f32) -> Self {
        Self {
            last_ms: None,
            max_dt,
        }
    }

    /// Seconds since the previous frame, in `[0, max_dt]`
    ///
    /// The first frame after construction or `resume` yields 0, as does a
    /// timestamp earlier than the last one.
    pub fn advance(&mut self, now_ms: f64) -> f32 {
        let dt = match self.last_ms {
            Some(last) if now_ms > last => ((now_ms - last) / 1000.0) as f32,
            _ => 0.0,
        };
        if self.last_ms.is_none_or(|last| now_ms >= last) {
            self.last_ms = Some(now_ms);
        }
        dt.min(self.max_dt)
    }

    /// Re-anchor so a paused stretch is not simulated
    pub fn resume(&mut self, now_ms: f64) {
        self.last_ms = Some(now_ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_frame_is_zero() {
        let mut clock = FrameClock::new(0.03);
        assert_eq!(clock.advance(1234.0), 0.0);
    }

    #[test]
    fn test_regular_frames() {
        let mut clock = FrameClock::new(0.03);
        clock.advance(1000.0);
        let dt = clock.advance(1016.0);
        assert!((dt - 0.016).abs() < 1e-6);
    }

    #[test]
    fn test_long_gap_is_clamped() {
        let mut clock = FrameClock::new(0.03);
        clock.advance(0.0);
        assert_eq!(clock.advance(5000.0), 0.03);
    }

    #[test]
    fn test_backwards_clock_yields_zero() {
        let mut clock = FrameClock::new(0.03);
        clock.advance(1000.0);
        assert_eq!(clock.advance(900.0), 0.0);
        // Still measured from the later stamp
        let dt = clock.advance(1010.0);
        assert!((dt - 0.01).abs() < 1e-6);
    }

    #[test]
    fn test_resume_skips_the_gap() {
        let mut clock = FrameClock::new(0.03);
        clock.advance(1000.0);
        clock.resume(60_000.0);
        let dt = clock.advance(60_010.0);
        assert!((dt - 0.01).abs() < 1e-6);
    }
}
