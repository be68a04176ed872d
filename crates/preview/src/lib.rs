#![deny(unsafe_code)]
//! CPU-side preview of the galaxy backdrop.
//!
//! [`pixel::RasterBackend`] implements the core `RenderBackend` trait by
//! projecting the scene onto an RGBA8 buffer, so a full `FrameLoop` can run
//! without a GPU. The `png` feature (default on) adds PNG snapshots.

pub mod pixel;

#[cfg(feature = "png")]
pub mod snapshot;

pub use pixel::{rasterize, RasterBackend};
