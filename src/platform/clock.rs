//! Frame clock
//!
//! Turns animation-frame timestamps into clamped deltas. A frame after a
//! visibility change or a pause release is skipped outright so the gap
//! spent suspended never reaches the simulation.

use crate::consts::MAX_FRAME_DT;

#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    /// Timestamp of the previous frame (ms), `None` before the first
    last_ms: Option<f64>,
    skip_next: bool,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Skip the next frame instead of producing a delta
    pub fn skip_next_frame(&mut self) {
        self.skip_next = true;
    }

    pub fn is_skip_armed(&self) -> bool {
        self.skip_next
    }

    /// Feed a frame timestamp in milliseconds.
    ///
    /// Returns `None` on the very first frame and on a skipped frame,
    /// otherwise the delta in seconds clamped to `[0, MAX_FRAME_DT]`.
    pub fn advance(&mut self, now_ms: f64) -> Option<f32> {
        if !now_ms.is_finite() {
            // Keep the last good timestamp
            return self.last_ms.map(|_| 0.0);
        }
        let last = self.last_ms.replace(now_ms);
        if self.skip_next {
            self.skip_next = false;
            return None;
        }
        let last = last?;
        let gap = (now_ms - last) / 1000.0;
        if gap <= 0.0 {
            return Some(0.0);
        }
        Some((gap as f32).min(MAX_FRAME_DT))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_first_frame_skipped() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.advance(1000.0), None);
        let dt = clock.advance(1016.0).unwrap();
        assert!((dt - 0.016).abs() < 1e-6);
    }

    #[test]
    fn test_long_gap_clamped() {
        let mut clock = FrameClock::new();
        clock.advance(0.0);
        assert_eq!(clock.advance(5_000.0), Some(MAX_FRAME_DT));
    }

    #[test]
    fn test_skip_drops_one_frame_and_resyncs() {
        let mut clock = FrameClock::new();
        clock.advance(0.0);
        clock.advance(16.0);
        clock.skip_next_frame();
        // Tab was hidden for a minute
        assert_eq!(clock.advance(60_016.0), None);
        assert!(!clock.is_skip_armed());
        let dt = clock.advance(60_032.0).unwrap();
        assert!((dt - 0.016).abs() < 1e-6);
    }

    #[test]
    fn test_backwards_and_nan_yield_zero() {
        let mut clock = FrameClock::new();
        clock.advance(100.0);
        assert_eq!(clock.advance(50.0), Some(0.0));
        assert_eq!(clock.advance(f64::NAN), Some(0.0));
        let dt = clock.advance(66.0).unwrap();
        assert!((dt - 0.016).abs() < 1e-6);
    }

    proptest! {
        #[test]
        fn prop_dt_always_in_range(stamps in proptest::collection::vec(-1.0e6f64..1.0e9, 1..64)) {
            let mut clock = FrameClock::new();
            for now in stamps {
                if let Some(dt) = clock.advance(now) {
                    prop_assert!((0.0..=MAX_FRAME_DT).contains(&dt));
                }
            }
        }
    }
}
