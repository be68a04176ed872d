//! Count-up animation for `[data-count]` elements.

use crate::error::BackdropError;

pub const COUNTER_SELECTOR: &str = "[data-count]";
pub const COUNTER_ATTRIBUTE: &str = "data-count";
/// Total duration of a count-up.
pub const COUNTER_DURATION_MS: f64 = 2000.0;
/// Assumed frame time, so a count-up takes about 125 frames.
pub const COUNTER_FRAME_MS: f64 = 16.0;

/// Counts from zero to a target in fixed per-frame increments.
#[derive(Debug, Clone, PartialEq)]
pub struct CounterAnimation {
    target: i64,
    current: f64,
    step: f64,
    finished: bool,
}

impl CounterAnimation {
    /// Counts from zero to `target` over roughly two seconds of frames.
    pub fn new(target: i64) -> Self {
        Self {
            target,
            current: 0.0,
            step: target as f64 / (COUNTER_DURATION_MS / COUNTER_FRAME_MS),
            finished: false,
        }
    }

    /// Parses the leading integer of a `data-count` attribute, so `"120+"`
    /// counts to 120.
    pub fn from_attribute(value: &str) -> Result<Self, BackdropError> {
        let trimmed = value.trim();
        let end = trimmed
            .char_indices()
            .find(|&(i, c)| !(c.is_ascii_digit() || (i == 0 && (c == '-' || c == '+'))))
            .map_or(trimmed.len(), |(i, _)| i);
        trimmed[..end]
            .parse::<i64>()
            .map(Self::new)
            .map_err(|_| BackdropError::InvalidParameter {
                name: COUNTER_ATTRIBUTE.to_string(),
                reason: format!("{value:?} is not an integer"),
            })
    }

    /// Advances one frame and returns the value to display. Once the target
    /// is reached the target itself is shown and the animation finishes.
    pub fn tick(&mut self) -> i64 {
        if self.finished {
            return self.target;
        }
        self.current += self.step;
        if self.current < self.target as f64 {
            (self.current.floor() as i64).min(self.target)
        } else {
            self.finished = true;
            self.target
        }
    }

    /// True once the target has been shown.
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reaches_target_in_about_125_frames() {
        let mut counter = CounterAnimation::new(1000);
        let mut frames = 0;
        let mut last = 0;
        while !counter.is_finished() {
            last = counter.tick();
            frames += 1;
            assert!(frames < 200);
        }
        assert_eq!(last, 1000);
        assert!((124..=127).contains(&frames), "{frames} frames");
    }

    #[test]
    fn small_target_lands_exactly() {
        let mut counter = CounterAnimation::new(100);
        let shown: Vec<i64> = std::iter::from_fn(|| {
            (!counter.is_finished()).then(|| counter.tick())
        })
        .collect();
        assert_eq!(shown.last(), Some(&100));
        assert!(shown.iter().all(|&v| (0..=100).contains(&v)));
    }

    #[test]
    fn zero_and_negative_targets_finish_on_first_frame() {
        let mut zero = CounterAnimation::new(0);
        assert_eq!(zero.tick(), 0);
        assert!(zero.is_finished());
        let mut negative = CounterAnimation::new(-5);
        assert_eq!(negative.tick(), -5);
        assert!(negative.is_finished());
    }

    #[test]
    fn parses_leading_integer() {
        let settle = |raw: &str| {
            let mut counter = CounterAnimation::from_attribute(raw).unwrap();
            while !counter.is_finished() {
                counter.tick();
            }
            counter.tick()
        };
        assert_eq!(settle(" 42 "), 42);
        assert_eq!(settle("120+"), 120);
        assert!(CounterAnimation::from_attribute("many").is_err());
        assert!(CounterAnimation::from_attribute("").is_err());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn display_is_monotonic_and_never_exceeds_target(target in 1_i64..1_000_000) {
                let mut counter = CounterAnimation::new(target);
                let mut previous = 0;
                let mut frames = 0;
                while !counter.is_finished() {
                    let shown = counter.tick();
                    prop_assert!(shown >= previous);
                    prop_assert!(shown <= target);
                    previous = shown;
                    frames += 1;
                    prop_assert!(frames <= 130);
                }
                prop_assert_eq!(previous, target);
            }
        }
    }
}
