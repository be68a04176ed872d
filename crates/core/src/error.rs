//! Error types for the backdrop core.

use thiserror::Error;

/// Errors produced while configuring, building or running the backdrop.
#[derive(Debug, Error)]
pub enum BackdropError {
    /// Not a `#rrggbb` color.
    #[error("invalid color: {0}")]
    InvalidColor(String),

    /// A parameter held a value outside its accepted range.
    #[error("invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },

    /// A preset name did not match any built-in parameter set.
    #[error("unknown preset: {0}")]
    UnknownPreset(String),

    /// The graphics pipeline could not be set up (no WebGL2, no canvas,
    /// shaders that fail to build).
    ///
    /// This is a capability loss, not a fatal condition: the background is
    /// disabled and the rest of the page keeps working.
    #[error("renderer unavailable: {0}")]
    RendererUnavailable(String),

    /// Drawing a frame failed after the renderer was built.
    #[error("render failed: {0}")]
    Render(String),

    /// A DOM call returned an error.
    #[error("dom error: {0}")]
    Dom(String),

    /// A required element was not present in the document.
    #[error("element not found: {0}")]
    MissingElement(String),

    /// File output failed (preview snapshots).
    #[error("i/o error: {0}")]
    Io(String),
}

impl BackdropError {
    /// Whether this error only means a capability is absent.
    ///
    /// Capability losses are logged as warnings; everything else is an error.
    pub fn is_capability_loss(&self) -> bool {
        matches!(self, BackdropError::RendererUnavailable(_))
    }
}
