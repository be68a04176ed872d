//! PNG snapshots of rasterized frames.
//!
//! Feature-gated behind `png` so browser builds never pull in `image`.

use backdrop_core::error::BackdropError;
use std::path::Path;

use crate::pixel::RasterBackend;

/// Writes an RGBA8 buffer as a PNG.
///
/// Returns `BackdropError::Io` if the buffer does not match the dimensions
/// or the file cannot be written.
pub fn write_png(rgba: &[u8], width: u32, height: u32, path: &Path) -> Result<(), BackdropError> {
    let img = image::RgbaImage::from_raw(width, height, rgba.to_vec()).ok_or_else(|| {
        BackdropError::Io(format!(
            "RGBA buffer of {} bytes does not match {width}x{height}",
            rgba.len()
        ))
    })?;
    img.save(path).map_err(|e| BackdropError::Io(e.to_string()))?;
    log::info!("wrote {width}x{height} snapshot to {}", path.display());
    Ok(())
}

/// Writes the backend's last frame.
pub fn write_frame(backend: &RasterBackend, path: &Path) -> Result<(), BackdropError> {
    if backend.pixels().is_empty() {
        return Err(BackdropError::Io("no frame has been rendered".into()));
    }
    write_png(backend.pixels(), backend.width(), backend.height(), path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use backdrop_core::animation::RenderBackend;
    use backdrop_core::camera::{CameraSettings, PerspectiveCamera};
    use backdrop_core::color::Srgb;
    use backdrop_core::scene::Scene;

    #[test]
    fn written_png_reads_back_with_same_size() {
        let mut backend = RasterBackend::new(24, 12, Srgb::from_rgb_u32(0x102030));
        let camera = PerspectiveCamera::new(CameraSettings::default(), 24.0, 12.0);
        backend.render(&Scene::new(), &camera).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.png");
        write_frame(&backend, &path).unwrap();

        let img = image::open(&path).unwrap().to_rgba8();
        assert_eq!((img.width(), img.height()), (24, 12));
        assert_eq!(img.get_pixel(3, 3).0, [0x10, 0x20, 0x30, 255]);
    }

    #[test]
    fn mismatched_buffer_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = write_png(&[0; 10], 2, 2, &dir.path().join("bad.png")).unwrap_err();
        assert!(matches!(err, BackdropError::Io(_)));
    }

    #[test]
    fn unrendered_backend_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let backend = RasterBackend::new(4, 4, Srgb::BLACK);
        assert!(write_frame(&backend, &dir.path().join("none.png")).is_err());
    }
}
