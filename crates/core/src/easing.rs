//! Easing curves and time-based tweens.

use glam::Vec2;

/// Easing curve mapping linear progress in [0, 1] to eased progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Ease {
    /// Cubic ease-out, `1 - (1 - t)^3`: fast start, gentle settle.
    #[default]
    Power2Out,
}

impl Ease {
    /// Applies the curve. `t` is clamped to [0, 1]; both endpoints are exact.
    pub fn apply(self, t: f64) -> f64 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        match self {
            Ease::Power2Out => {
                let inv = 1.0 - t;
                1.0 - inv * inv * inv
            }
        }
    }
}

/// Interpolates a 2D value from `from` to `to` over `duration_ms`,
/// starting at `start_ms`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween {
    from: Vec2,
    to: Vec2,
    start_ms: f64,
    duration_ms: f64,
    ease: Ease,
}

impl Tween {
    /// A tween from `from` to `to` over `duration_ms`, beginning at `start_ms`.
    pub fn new(from: Vec2, to: Vec2, start_ms: f64, duration_ms: f64, ease: Ease) -> Self {
        Self {
            from,
            to,
            start_ms,
            duration_ms,
            ease,
        }
    }

    /// Linear progress in [0, 1]. A non-positive duration finishes instantly.
    pub fn progress(&self, now_ms: f64) -> f64 {
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        ((now_ms - self.start_ms) / self.duration_ms).clamp(0.0, 1.0)
    }

    /// Value at `now_ms`: `from` before the start, exactly `to` at and after
    /// the end.
    pub fn sample(&self, now_ms: f64) -> Vec2 {
        let eased = self.ease.apply(self.progress(now_ms));
        if eased >= 1.0 {
            return self.to;
        }
        self.from + (self.to - self.from) * eased as f32
    }

    pub fn is_finished(&self, now_ms: f64) -> bool {
        self.progress(now_ms) >= 1.0
    }
}
