//! Loading screen fade-out followed by staggered entrance animations.

/// Id of the loading overlay.
pub const LOADER_ID: &str = "loading";
pub const LOADER_FADE_CLASS: &str = "fade-out";
/// Time the loader stays fully visible after the page has loaded.
pub const LOADER_HOLD_MS: f64 = 1000.0;
/// Length of the loader's fade-out transition.
pub const LOADER_FADE_MS: f64 = 500.0;
/// Element groups animated in after the loader disappears, in order.
pub const ENTRANCE_GROUPS: [&str; 4] = [".glitch", ".animate-float", ".typing-text", ".skill-tag"];
pub const ENTRANCE_GROUP_STAGGER_MS: f64 = 200.0;
pub const ENTRANCE_ELEMENT_STAGGER_MS: f64 = 100.0;
/// Animation applied when an entrance element has none of its own.
pub const ENTRANCE_ANIMATION: &str = "fadeIn 0.6s ease-out";

/// Where the loader is in its exit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadingPhase {
    /// Page loaded, loader still shown.
    Holding,
    /// `fade-out` applied.
    FadingOut,
    /// Loader hidden and entrances running.
    Done,
}

/// Drives the loader from page load to the entrance animations.
#[derive(Debug, Clone)]
pub struct LoadingSequence {
    phase: LoadingPhase,
}

impl LoadingSequence {
    pub fn new() -> Self {
        Self {
            phase: LoadingPhase::Holding,
        }
    }

    /// Delay before the next [`LoadingSequence::advance`], or `None` when
    /// the sequence is over.
    pub fn next_delay_ms(&self) -> Option<f64> {
        match self.phase {
            LoadingPhase::Holding => Some(LOADER_HOLD_MS),
            LoadingPhase::FadingOut => Some(LOADER_FADE_MS),
            LoadingPhase::Done => None,
        }
    }

    /// Moves to the next phase and returns it.
    pub fn advance(&mut self) -> LoadingPhase {
        self.phase = match self.phase {
            LoadingPhase::Holding => LoadingPhase::FadingOut,
            LoadingPhase::FadingOut | LoadingPhase::Done => LoadingPhase::Done,
        };
        self.phase
    }
}

impl Default for LoadingSequence {
    fn default() -> Self {
        Self::new()
    }
}

/// Delay of the `element`-th match of the `group`-th entrance selector.
pub fn entrance_delay_ms(group: usize, element: usize) -> f64 {
    group as f64 * ENTRANCE_GROUP_STAGGER_MS + element as f64 * ENTRANCE_ELEMENT_STAGGER_MS
}
