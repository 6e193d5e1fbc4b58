//! Eased scroll-offset tween with cooperative cancellation.
//!
//! A tween is sampled by wall-clock milliseconds rather than stepped,
//! so a late frame lands exactly where it should instead of lagging.
//! Cancellation is a shared flag checked once per sample: whichever
//! component starts a new tween cancels the previous token first, and
//! the superseded tween simply stops being sampled.

use std::cell::Cell;
use std::rc::Rc;

/// Below this distance an animation completes immediately — sub-cell
/// moves are invisible in a terminal anyway.
const MIN_DISTANCE: f64 = 0.5;

// ───────────────────────────────────────── cancel token ──────

/// Shared cancellation flag for one tween.  Cloning hands out another
/// handle to the same flag; the engine runs on a single thread, so a
/// plain `Cell` suffices.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Rc<Cell<bool>>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }
}

// ───────────────────────────────────────── tween ─────────────

/// An in-flight eased move from one offset to another.
#[derive(Debug, Clone)]
pub struct Tween {
    from: f64,
    to: f64,
    start_ms: u64,
    duration_ms: u64,
    token: CancelToken,
}

impl Tween {
    /// Start a tween.  Returns `None` when the move is too small or the
    /// duration is zero — the caller sets the target value directly.
    pub fn animate(
        from: f64,
        to: f64,
        now_ms: u64,
        duration_ms: u64,
        token: CancelToken,
    ) -> Option<Self> {
        if (to - from).abs() < MIN_DISTANCE || duration_ms == 0 {
            return None;
        }
        Some(Self {
            from,
            to,
            start_ms: now_ms,
            duration_ms,
            token,
        })
    }

    pub fn target(&self) -> f64 {
        self.to
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Finished when full duration has elapsed (a cancelled tween is
    /// abandoned by the caller, not finished).
    pub fn is_done(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.start_ms) >= self.duration_ms
    }

    /// Current eased value.  Clamped, so sampling past the end returns
    /// exactly the target.
    pub fn sample(&self, now_ms: u64) -> f64 {
        let elapsed = now_ms.saturating_sub(self.start_ms) as f64;
        let t = (elapsed / self.duration_ms as f64).clamp(0.0, 1.0);
        self.from + (self.to - self.from) * ease_in_out_cubic(t)
    }
}

/// Standard ease-in-out cubic.
fn ease_in_out_cubic(t: f64) -> f64 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

// ───────────────────────────────────────── tests ─────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_value_completes_immediately() {
        assert!(Tween::animate(100.0, 100.0, 0, 450, CancelToken::new()).is_none());
        assert!(Tween::animate(100.0, 100.4, 0, 450, CancelToken::new()).is_none());
    }

    #[test]
    fn zero_duration_completes_immediately() {
        assert!(Tween::animate(0.0, 500.0, 0, 0, CancelToken::new()).is_none());
    }

    #[test]
    fn endpoints_are_exact() {
        let t = Tween::animate(10.0, 110.0, 1_000, 400, CancelToken::new()).unwrap();
        assert_eq!(t.sample(1_000), 10.0);
        assert_eq!(t.sample(1_400), 110.0);
        assert_eq!(t.sample(2_000), 110.0);
        assert!(!t.is_done(1_399));
        assert!(t.is_done(1_400));
    }

    #[test]
    fn eased_midpoint_is_halfway() {
        let t = Tween::animate(0.0, 100.0, 0, 400, CancelToken::new()).unwrap();
        // ease-in-out-cubic passes through 0.5 at t = 0.5.
        assert!((t.sample(200) - 50.0).abs() < 1e-9);
        // And accelerates: the first quarter covers less than a quarter.
        assert!(t.sample(100) < 25.0);
    }

    #[test]
    fn new_tween_cancels_the_old_token() {
        let token_a = CancelToken::new();
        let a = Tween::animate(0.0, 100.0, 0, 400, token_a.clone()).unwrap();

        // Supersede: cancel A synchronously, then start B.
        token_a.cancel();
        let token_b = CancelToken::new();
        let b = Tween::animate(a.sample(100), 300.0, 100, 400, token_b.clone()).unwrap();

        assert!(a.is_cancelled());
        assert!(!b.is_cancelled());
        // The final value is B's target, never a blend of both.
        assert_eq!(b.sample(1_000), 300.0);
    }
}
