//! WebGL2 point-cloud rendering.
//!
//! This module is only available when the `render` feature is enabled.
//!
//! - [`shader`] -- point shaders, compilation and error formatting.
//! - [`context`] -- GL context wrapper with capability detection.
//! - [`points`] -- [`RenderBackend`](crate::animation::RenderBackend)
//!   drawing the galaxy and markers as point sprites.

pub mod context;
pub mod points;
pub mod shader;

pub use context::GpuContext;
pub use points::PointRenderer;
pub use shader::{compile_program, format_shader_error, ShaderError, POINT_FRAGMENT_SHADER, POINT_VERTEX_SHADER};
