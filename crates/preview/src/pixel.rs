//! Software point-sprite rasterization of a [`Scene`].
//!
//! Markers are drawn first as opaque discs, then every particle is projected
//! to a single pixel and added on top, matching the additive blending of the
//! GPU path. Channels saturate at 1.0.

use backdrop_core::animation::RenderBackend;
use backdrop_core::camera::PerspectiveCamera;
use backdrop_core::color::Srgb;
use backdrop_core::error::BackdropError;
use backdrop_core::scene::Scene;
use glam::{Mat4, Vec2, Vec3};

/// Projects a world-space point to pixel coordinates and view depth.
/// Returns `None` for points behind the camera or outside the frustum.
fn project(view_projection: Mat4, world: Vec3, width: usize, height: usize) -> Option<(Vec2, f32)> {
    let clip = view_projection * world.extend(1.0);
    if clip.w <= 0.0 {
        return None;
    }
    let ndc = clip.truncate() / clip.w;
    if ndc.x.abs() > 1.0 || ndc.y.abs() > 1.0 || ndc.z.abs() > 1.0 {
        return None;
    }
    let px = (ndc.x + 1.0) * 0.5 * width as f32;
    let py = (1.0 - ndc.y) * 0.5 * height as f32;
    Some((Vec2::new(px, py), clip.w))
}

/// Renders `scene` through `camera` into a `width * height * 4` RGBA buffer.
pub fn rasterize(
    scene: &Scene,
    camera: &PerspectiveCamera,
    width: usize,
    height: usize,
    background: Srgb,
) -> Vec<u8> {
    let mut accum = vec![background.to_vec3(); width * height];
    let view_projection = camera.view_projection();
    let scale = height as f32 / 2.0;
    let clamp_x = |v: f32| (v.floor().max(0.0) as usize).min(width.saturating_sub(1));
    let clamp_y = |v: f32| (v.floor().max(0.0) as usize).min(height.saturating_sub(1));

    if width > 0 && height > 0 {
        for marker in scene.markers() {
            let Some((center, depth)) = project(view_projection, marker.position, width, height) else {
                continue;
            };
            let radius = (marker.radius * scale / depth).max(0.5);
            let color = marker.color.to_vec3();
            for y in clamp_y(center.y - radius)..=clamp_y(center.y + radius) {
                for x in clamp_x(center.x - radius)..=clamp_x(center.x + radius) {
                    let offset = Vec2::new(x as f32 + 0.5, y as f32 + 0.5) - center;
                    if offset.length() <= radius {
                        accum[y * width + x] = color;
                    }
                }
            }
        }

        if let Some(field) = scene.field() {
            let model_view_projection = view_projection * field.model_matrix();
            for (position, color) in field.buffer().iter() {
                if let Some((p, _)) = project(model_view_projection, position, width, height) {
                    let idx = clamp_y(p.y) * width + clamp_x(p.x);
                    accum[idx] += color;
                }
            }
        }
    }

    accum
        .iter()
        .flat_map(|c| {
            let c = c.clamp(Vec3::ZERO, Vec3::ONE) * 255.0;
            [c.x.round() as u8, c.y.round() as u8, c.z.round() as u8, 255u8]
        })
        .collect()
}

/// A [`RenderBackend`] that keeps the last rendered frame in memory.
#[derive(Debug, Clone)]
pub struct RasterBackend {
    width: u32,
    height: u32,
    background: Srgb,
    pixels: Vec<u8>,
    disposed: bool,
}

impl RasterBackend {
    /// An empty backend; `background` fills every pixel the scene leaves dark.
    pub fn new(width: u32, height: u32, background: Srgb) -> Self {
        Self {
            width,
            height,
            background,
            pixels: Vec::new(),
            disposed: false,
        }
    }

    /// Drawing-buffer width in physical pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Drawing-buffer height in physical pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// RGBA8 pixels of the last frame; empty before the first render.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }
}

impl RenderBackend for RasterBackend {
    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera) -> Result<(), BackdropError> {
        if self.disposed {
            return Err(BackdropError::Render("raster backend disposed".into()));
        }
        if self.width == 0 || self.height == 0 {
            return Err(BackdropError::Render(format!(
                "empty drawing buffer {}x{}",
                self.width, self.height
            )));
        }
        self.pixels = rasterize(
            scene,
            camera,
            self.width as usize,
            self.height as usize,
            self.background,
        );
        Ok(())
    }

    fn dispose(&mut self) {
        self.pixels = Vec::new();
        self.disposed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backdrop_core::camera::CameraSettings;
    use backdrop_core::config::Capability;
    use backdrop_core::galaxy::ParticleBuffer;
    use backdrop_core::prng::Xorshift64;
    use backdrop_core::scene::{build_scene, Marker, ParticleField, PointsMaterial};
    use backdrop_core::{FrameLoop, LoopState};

    fn camera(width: usize, height: usize) -> PerspectiveCamera {
        PerspectiveCamera::new(CameraSettings::default(), width as f64, height as f64)
    }

    fn pixel(buf: &[u8], width: usize, x: usize, y: usize) -> [u8; 4] {
        let i = (y * width + x) * 4;
        [buf[i], buf[i + 1], buf[i + 2], buf[i + 3]]
    }

    fn single_point_scene(points: Vec<Vec3>, color: Vec3) -> Scene {
        let colors = vec![color; points.len()];
        let buffer = ParticleBuffer::from_parts(points, colors).unwrap();
        let mut scene = Scene::new();
        scene.set_field(ParticleField::new(buffer, PointsMaterial::glow(0.01)));
        scene
    }

    #[test]
    fn buffer_has_rgba_layout_and_opaque_alpha() {
        let buf = rasterize(&Scene::new(), &camera(8, 4), 8, 4, Srgb::BLACK);
        assert_eq!(buf.len(), 8 * 4 * 4);
        assert!(buf.chunks(4).all(|p| p == [0, 0, 0, 255]));
    }

    #[test]
    fn look_at_target_lands_in_the_center() {
        let scene = single_point_scene(vec![Vec3::ZERO], Vec3::new(0.0, 1.0, 0.0));
        let buf = rasterize(&scene, &camera(63, 63), 63, 63, Srgb::BLACK);
        assert_eq!(pixel(&buf, 63, 31, 31), [0, 255, 0, 255]);
    }

    #[test]
    fn coincident_points_add_up_and_saturate() {
        let scene = single_point_scene(vec![Vec3::ZERO; 3], Vec3::new(0.2, 0.5, 0.0));
        let buf = rasterize(&scene, &camera(15, 15), 15, 15, Srgb::BLACK);
        assert_eq!(pixel(&buf, 15, 7, 7), [153, 255, 0, 255]);
    }

    #[test]
    fn points_behind_the_camera_are_culled() {
        let scene = single_point_scene(vec![Vec3::new(0.0, 5.0, 60.0)], Vec3::ONE);
        let buf = rasterize(&scene, &camera(16, 16), 16, 16, Srgb::BLACK);
        assert!(buf.chunks(4).all(|p| p == [0, 0, 0, 255]));
    }

    #[test]
    fn markers_draw_as_discs() {
        let mut scene = Scene::new();
        scene.add_marker(Marker {
            position: Vec3::ZERO,
            radius: 0.5,
            color: Srgb::WHITE,
        });
        let buf = rasterize(&scene, &camera(200, 200), 200, 200, Srgb::BLACK);
        assert_eq!(pixel(&buf, 200, 100, 100), [255, 255, 255, 255]);
        assert_eq!(pixel(&buf, 200, 0, 0), [0, 0, 0, 255]);
    }

    #[test]
    fn backend_runs_inside_the_frame_loop() {
        let ctx = build_scene(160.0, 90.0, Capability::Mobile, &mut Xorshift64::new(3));
        let mut frame_loop = FrameLoop::new(ctx, RasterBackend::new(160, 90, Srgb::BLACK));
        assert_eq!(frame_loop.tick(0.0), LoopState::Running);
        let pixels = frame_loop.backend().pixels();
        assert_eq!(pixels.len(), 160 * 90 * 4);
        assert!(pixels.chunks(4).any(|p| p[0] > 0 || p[1] > 0 || p[2] > 0));
        frame_loop.teardown();
        assert!(frame_loop.backend().pixels().is_empty());
    }

    #[test]
    fn disposed_backend_refuses_to_draw() {
        let ctx = build_scene(32.0, 32.0, Capability::Mobile, &mut Xorshift64::new(5));
        let mut backend = RasterBackend::new(32, 32, Srgb::BLACK);
        backend.dispose();
        assert!(backend.render(&ctx.scene, &ctx.camera).is_err());
        assert!(backend.pixels().is_empty());
    }

    #[test]
    fn empty_drawing_buffer_stops_the_loop() {
        let ctx = build_scene(160.0, 90.0, Capability::Mobile, &mut Xorshift64::new(3));
        let mut frame_loop = FrameLoop::new(ctx, RasterBackend::new(0, 0, Srgb::BLACK));
        assert_eq!(frame_loop.tick(0.0), LoopState::Stopped);
        assert_eq!(frame_loop.tick(16.0), LoopState::Stopped);
        assert_eq!(frame_loop.frames(), 0);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn any_point_cloud_yields_a_full_opaque_frame(
                points in proptest::collection::vec((-50.0_f32..50.0, -50.0_f32..50.0, -50.0_f32..50.0), 0..200),
                width in 1_usize..48,
                height in 1_usize..48,
            ) {
                let points: Vec<Vec3> = points.into_iter().map(|(x, y, z)| Vec3::new(x, y, z)).collect();
                let scene = single_point_scene(points, Vec3::splat(0.4));
                let buf = rasterize(&scene, &camera(width, height), width, height, Srgb::BLACK);
                prop_assert_eq!(buf.len(), width * height * 4);
                prop_assert!(buf.chunks(4).all(|p| p[3] == 255));
            }
        }
    }
}
