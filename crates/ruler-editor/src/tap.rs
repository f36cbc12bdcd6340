//! Double-activation detector.
//!
//! Pointer events carry no native double-tap, so two presses on the same
//! target close enough in time and space are folded into one activation.

/// Remembers the last tap and reports when the next one completes a pair.
#[derive(Debug, Clone)]
pub struct TapDetector<K> {
    max_interval_ms: f64,
    max_distance: f32,
    last: Option<Tap<K>>,
}

#[derive(Debug, Clone, Copy)]
struct Tap<K> {
    target: K,
    time_ms: f64,
    x: f32,
    y: f32,
}

impl<K: Copy + PartialEq> TapDetector<K> {
    pub fn new(max_interval_ms: f64, max_distance: f32) -> Self {
        Self {
            max_interval_ms,
            max_distance,
            last: None,
        }
    }

    /// Record a tap on `target`. Returns `true` when it completes a double
    /// activation; the pair is then consumed so a third tap starts over.
    pub fn register(&mut self, target: K, x: f32, y: f32, time_ms: f64) -> bool {
        let tap = Tap {
            target,
            time_ms,
            x,
            y,
        };
        let is_double = self.last.is_some_and(|prev| {
            prev.target == target
                && time_ms >= prev.time_ms
                && time_ms - prev.time_ms <= self.max_interval_ms
                && (x - prev.x).hypot(y - prev.y) <= self.max_distance
        });

        self.last = if is_double { None } else { Some(tap) };
        is_double
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detector() -> TapDetector<u8> {
        TapDetector::new(300.0, 10.0)
    }

    #[test]
    fn two_quick_close_taps_pair_up() {
        let mut d = detector();
        assert!(!d.register(1, 10.0, 10.0, 0.0));
        assert!(d.register(1, 14.0, 13.0, 250.0));
    }

    #[test]
    fn third_tap_starts_a_new_pair() {
        let mut d = detector();
        d.register(1, 0.0, 0.0, 0.0);
        assert!(d.register(1, 0.0, 0.0, 100.0));
        assert!(!d.register(1, 0.0, 0.0, 200.0));
    }

    #[test]
    fn slow_far_or_different_target_taps_do_not_pair() {
        let mut d = detector();
        d.register(1, 0.0, 0.0, 0.0);
        assert!(!d.register(1, 0.0, 0.0, 301.0));

        let mut d = detector();
        d.register(1, 0.0, 0.0, 0.0);
        assert!(!d.register(1, 8.0, 8.0, 10.0));

        let mut d = detector();
        d.register(1, 0.0, 0.0, 0.0);
        assert!(!d.register(2, 0.0, 0.0, 10.0));
    }

    #[test]
    fn reset_forgets_the_pending_tap() {
        let mut d = detector();
        d.register(1, 0.0, 0.0, 0.0);
        d.reset();
        assert!(!d.register(1, 0.0, 0.0, 10.0));
    }
}
