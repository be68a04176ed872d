//! Character-by-character typing of short paragraphs.
//!
//! Each paragraph starts one second after the previous one, types a
//! character every 50 ms and drops its caret a second after the last
//! character lands.

/// Paragraphs that get typed out.
pub const TYPING_SELECTOR: &str = ".typing-text p";
/// Stagger between consecutive paragraphs.
pub const TYPING_STAGGER_MS: f64 = 1000.0;
/// Time between two characters.
pub const TYPING_INTERVAL_MS: f64 = 50.0;
/// How long the caret lingers after the last character.
pub const CARET_LINGER_MS: f64 = 1000.0;
/// `border-right` value once the caret is removed.
pub const CARET_REMOVED: &str = "none";

/// Outcome of one typing step.
#[derive(Debug, Clone, PartialEq)]
pub enum TypingStep {
    /// Show `text`; call [`Typewriter::step`] again after `next_in_ms`.
    Typed { text: String, next_in_ms: f64 },
    /// Everything is visible; remove the caret after `caret_in_ms`.
    Finished { caret_in_ms: f64 },
}

/// Reveals a paragraph one character at a time.
#[derive(Debug, Clone)]
pub struct Typewriter {
    chars: Vec<char>,
    shown: usize,
    start_delay_ms: f64,
}

impl Typewriter {
    /// `index` is the paragraph's position among all typed paragraphs.
    pub fn new(text: &str, index: usize) -> Self {
        Self {
            chars: text.chars().collect(),
            shown: 0,
            start_delay_ms: index as f64 * TYPING_STAGGER_MS,
        }
    }

    /// Delay before the first [`Typewriter::step`]; the first character
    /// lands one interval after typing starts.
    pub fn first_step_in_ms(&self) -> f64 {
        self.start_delay_ms + TYPING_INTERVAL_MS
    }

    /// Types the next character. Empty text finishes on the first step.
    pub fn step(&mut self) -> TypingStep {
        if self.shown >= self.chars.len() {
            return TypingStep::Finished {
                caret_in_ms: CARET_LINGER_MS,
            };
        }
        self.shown += 1;
        if self.shown == self.chars.len() {
            return TypingStep::Finished {
                caret_in_ms: CARET_LINGER_MS,
            };
        }
        TypingStep::Typed {
            text: self.visible_text(),
            next_in_ms: TYPING_INTERVAL_MS,
        }
    }

    /// Characters typed so far.
    pub fn visible_text(&self) -> String {
        self.chars[..self.shown].iter().collect()
    }
}
