#![deny(unsafe_code)]
//! Core types for the galaxy backdrop.
//!
//! Provides the particle field generator, scene composition and camera, the
//! frame loop state machine with its `RenderBackend` seam, the page-effect
//! state machines, start-up sequencing, `Srgb` colors, the `Xorshift64`
//! PRNG and parameter helpers. Everything here is host-independent; the
//! optional `render` feature adds a glow point-cloud renderer.

pub mod animation;
pub mod bootstrap;
pub mod camera;
pub mod color;
pub mod config;
pub mod easing;
pub mod effects;
pub mod error;
pub mod galaxy;
pub mod params;
pub mod prng;
pub mod scene;
pub mod throttle;

#[cfg(feature = "render")]
pub mod render;

pub use animation::{AnimationState, FrameLoop, LoopState, RenderBackend};
pub use bootstrap::{initialize, Effect, EffectHost, InitReport};
pub use camera::{CameraSettings, PerspectiveCamera};
pub use color::Srgb;
pub use config::{BackdropConfig, Capability, ParticleFieldParameters, Preset};
pub use easing::{Ease, Tween};
pub use error::BackdropError;
pub use galaxy::ParticleBuffer;
pub use prng::{RandomSource, Xorshift64};
pub use scene::{build_scene, Scene, SceneContext};
pub use throttle::{throttle, RateLimiter, Throttled};
