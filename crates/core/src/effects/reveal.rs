//! Fire-once scroll reveal.
//!
//! Elements are observed until they first intersect the viewport. At that
//! point a reveal is scheduled after a small random delay (so neighbours
//! stagger naturally) and the element stops being observed. Re-entering the
//! viewport later never fires again.

use crate::prng::RandomSource;
use std::collections::HashSet;
use std::hash::Hash;

/// Elements that get revealed on scroll.
pub const REVEAL_SELECTOR: &str =
    "section > div, .skill-card, .project-card, .stage-card, .timeline-item, h2, h3";
/// Fraction of the element that must be visible.
pub const REVEAL_THRESHOLD: f64 = 0.1;
/// Shrinks the viewport bottom so elements reveal slightly after entering.
pub const REVEAL_ROOT_MARGIN: &str = "0px 0px -50px 0px";
/// Class added on reveal.
pub const REVEAL_CLASS: &str = "animate-fade-in";
/// Upper bound (exclusive) of the random stagger.
pub const MAX_REVEAL_DELAY_MS: f64 = 300.0;

/// Element flavours with their own entrance animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealKind {
    Generic,
    SkillCard,
    ProjectCard,
}

impl RevealKind {
    /// Classifies an element by its class list. Project cards win over
    /// skill cards when an element is both.
    pub fn from_classes<'a>(classes: impl IntoIterator<Item = &'a str>) -> Self {
        let mut kind = RevealKind::Generic;
        for class in classes {
            match class {
                "project-card" => return RevealKind::ProjectCard,
                "skill-card" => kind = RevealKind::SkillCard,
                _ => {}
            }
        }
        kind
    }

    /// Inline `animation` value applied on top of the reveal class.
    pub fn animation(self) -> Option<&'static str> {
        match self {
            RevealKind::Generic => None,
            RevealKind::SkillCard => Some("slideUp 0.8s ease-out forwards"),
            RevealKind::ProjectCard => Some("fadeIn 1s ease-out forwards"),
        }
    }
}

/// What to do to an element once its delay has passed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RevealAction {
    pub delay_ms: f64,
    pub class: &'static str,
    pub animation: Option<&'static str>,
}

/// Tracks which elements are still waiting to be revealed.
#[derive(Debug, Clone)]
pub struct RevealTracker<K> {
    observing: HashSet<K>,
    revealed: HashSet<K>,
}

impl<K: Hash + Eq + Clone> RevealTracker<K> {
    pub fn new() -> Self {
        Self {
            observing: HashSet::new(),
            revealed: HashSet::new(),
        }
    }

    /// Starts observing `key`. Returns false if it is already observed or
    /// was already revealed.
    pub fn observe(&mut self, key: K) -> bool {
        if self.revealed.contains(&key) {
            return false;
        }
        self.observing.insert(key)
    }

    /// Handles a visibility change. Returns the reveal to schedule the first
    /// time an observed element intersects; `None` otherwise.
    pub fn on_visibility(
        &mut self,
        key: &K,
        intersecting: bool,
        kind: RevealKind,
        rng: &mut impl RandomSource,
    ) -> Option<RevealAction> {
        if !intersecting || !self.observing.remove(key) {
            return None;
        }
        self.revealed.insert(key.clone());
        Some(RevealAction {
            delay_ms: rng.next_range(0.0, MAX_REVEAL_DELAY_MS),
            class: REVEAL_CLASS,
            animation: kind.animation(),
        })
    }
}

impl<K: Hash + Eq + Clone> Default for RevealTracker<K> {
    fn default() -> Self {
        Self::new()
    }
}
