//! GL context wrapper with capability detection.

use crate::error::BackdropError;

/// Wraps a `glow::Context` with the limits the point renderer depends on.
pub struct GpuContext {
    gl: glow::Context,
    max_point_size: f32,
}

impl GpuContext {
    /// Wraps `gl` and queries the aliased point size range.
    ///
    /// # Errors
    ///
    /// Returns [`BackdropError::RendererUnavailable`] when the context cannot
    /// draw point sprites larger than a single pixel.
    #[allow(unsafe_code)]
    pub fn new(gl: glow::Context) -> Result<Self, BackdropError> {
        use glow::HasContext;

        let mut range = [0.0_f32; 2];
        // SAFETY: ALIASED_POINT_SIZE_RANGE writes exactly two floats.
        unsafe { gl.get_parameter_f32_slice(glow::ALIASED_POINT_SIZE_RANGE, &mut range) };
        let max_point_size = point_size_limit(range)?;
        log::debug!("GL context ready, max point size {max_point_size}");

        Ok(Self { gl, max_point_size })
    }

    /// The wrapped context.
    pub fn gl(&self) -> &glow::Context {
        &self.gl
    }

    /// Largest point sprite the driver draws, in pixels.
    pub fn max_point_size(&self) -> f32 {
        self.max_point_size
    }
}

/// Upper end of an `ALIASED_POINT_SIZE_RANGE` query.
fn point_size_limit(range: [f32; 2]) -> Result<f32, BackdropError> {
    let max = range[1];
    if max < 1.0 {
        return Err(BackdropError::RendererUnavailable(format!(
            "point sprites unsupported (max size {max})"
        )));
    }
    Ok(max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_size_range_upper_bound_is_used() {
        assert_eq!(point_size_limit([1.0, 64.0]).unwrap(), 64.0);
    }

    #[test]
    fn sub_pixel_point_sprites_mean_no_renderer() {
        let err = point_size_limit([0.0, 0.0]).unwrap_err();
        assert!(err.is_capability_loss(), "{err}");
    }
}
