//! Host-independent state machines behind the page effects.
//!
//! Each effect is independent of the others and of the 3D background; the
//! only shared input is the [`Capability`](crate::config::Capability) flag.
//! The browser crate wires these to DOM events and timers.
//!
//! - [`reveal`] -- fire-once scroll reveal with staggered delays.
//! - [`navigation`] -- header hide-on-scroll, active link, anchor offsets.
//! - [`typing`] -- character-by-character text reveal.
//! - [`counter`] -- frame-stepped number animation.
//! - [`burst`] -- click particle bursts.
//! - [`loading`] -- loading screen and entrance animation schedule.
//! - [`fps`] -- frame-rate sampling.

pub mod burst;
pub mod counter;
pub mod fps;
pub mod loading;
pub mod navigation;
pub mod reveal;
pub mod typing;

pub use burst::{BurstParticle, ClickBurst};
pub use counter::CounterAnimation;
pub use fps::{FpsMonitor, FpsSample};
pub use loading::LoadingSequence;
pub use navigation::{HeaderState, HeaderVisibility, SectionBounds};
pub use reveal::{RevealAction, RevealKind, RevealTracker};
pub use typing::{Typewriter, TypingStep};
