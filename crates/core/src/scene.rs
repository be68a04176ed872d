//! Scene composition: the galaxy point cloud, marker stars and ambient light.
//!
//! The scene is built once per page load. After construction only the
//! particle field's rotation and the camera position change, both driven by
//! the [`FrameLoop`](crate::animation::FrameLoop).

use crate::camera::PerspectiveCamera;
use crate::color::Srgb;
use crate::config::{BackdropConfig, Capability};
use crate::galaxy::{generate, ParticleBuffer};
use crate::prng::RandomSource;
use glam::{EulerRot, Mat4, Vec3};

/// How a material combines with what is already drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Blending {
    #[default]
    Normal,
    /// Colors add up, so dense arm regions glow.
    Additive,
}

/// Material for batched point clouds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointsMaterial {
    pub size: f32,
    /// Scale point size by inverse view depth.
    pub size_attenuation: bool,
    pub depth_write: bool,
    pub blending: Blending,
    /// Use the per-point color buffer instead of a flat color.
    pub vertex_colors: bool,
}

impl PointsMaterial {
    /// The glowing galaxy material: additive, no depth writes, vertex colors.
    pub fn glow(size: f32) -> Self {
        Self {
            size,
            size_attenuation: true,
            depth_write: false,
            blending: Blending::Additive,
            vertex_colors: true,
        }
    }
}

/// The galaxy as a single renderable: an immutable buffer plus a rotation.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleField {
    buffer: ParticleBuffer,
    material: PointsMaterial,
    rotation: Vec3,
}

impl ParticleField {
    /// An unrotated field.
    pub fn new(buffer: ParticleBuffer, material: PointsMaterial) -> Self {
        Self {
            buffer,
            material,
            rotation: Vec3::ZERO,
        }
    }

    pub fn buffer(&self) -> &ParticleBuffer {
        &self.buffer
    }

    pub fn material(&self) -> &PointsMaterial {
        &self.material
    }

    /// Euler angles (radians, XYZ order).
    pub fn rotation(&self) -> Vec3 {
        self.rotation
    }

    pub fn set_rotation(&mut self, rotation: Vec3) {
        self.rotation = rotation;
    }

    /// Model transform for the current rotation.
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, self.rotation.z)
    }
}

/// A small background star.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Marker {
    pub position: Vec3,
    pub radius: f32,
    pub color: Srgb,
}

/// Uniform light reaching every surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientLight {
    pub color: Srgb,
    pub intensity: f64,
}

impl Default for AmbientLight {
    fn default() -> Self {
        Self {
            color: Srgb::WHITE,
            intensity: 0.2,
        }
    }
}

/// The scene graph: at most one particle field, any number of markers,
/// at most one ambient light.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    field: Option<ParticleField>,
    markers: Vec<Marker>,
    ambient: Option<AmbientLight>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the galaxy, replacing any previous one.
    pub fn set_field(&mut self, field: ParticleField) {
        self.field = Some(field);
    }

    /// The galaxy, if the scene has not been cleared.
    pub fn field(&self) -> Option<&ParticleField> {
        self.field.as_ref()
    }

    pub fn field_mut(&mut self) -> Option<&mut ParticleField> {
        self.field.as_mut()
    }

    pub fn add_marker(&mut self, marker: Marker) {
        self.markers.push(marker);
    }

    /// Background stars in insertion order.
    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn set_ambient(&mut self, light: AmbientLight) {
        self.ambient = Some(light);
    }

    /// The ambient light, if set.
    pub fn ambient(&self) -> Option<&AmbientLight> {
        self.ambient.as_ref()
    }

    /// Number of top-level objects (field, markers, light).
    pub fn object_count(&self) -> usize {
        usize::from(self.field.is_some()) + self.markers.len() + usize::from(self.ambient.is_some())
    }

    /// Drops every object.
    pub fn clear(&mut self) {
        self.field = None;
        self.markers.clear();
        self.ambient = None;
    }
}

/// Everything built once at startup: scene, camera and the options they
/// came from.
#[derive(Debug, Clone)]
pub struct SceneContext {
    pub scene: Scene,
    pub camera: PerspectiveCamera,
    pub config: BackdropConfig,
}

impl SceneContext {
    /// Device class the scene was sized for.
    pub fn capability(&self) -> Capability {
        self.config.capability
    }
}

/// Builds the scene for a viewport using the page's default options for
/// `capability`.
pub fn build_scene(
    viewport_width: f64,
    viewport_height: f64,
    capability: Capability,
    rng: &mut impl RandomSource,
) -> SceneContext {
    build_scene_with(
        BackdropConfig::for_capability(capability),
        viewport_width,
        viewport_height,
        rng,
    )
}

/// Builds the scene from explicit options.
pub fn build_scene_with(
    config: BackdropConfig,
    viewport_width: f64,
    viewport_height: f64,
    rng: &mut impl RandomSource,
) -> SceneContext {
    let mut scene = Scene::new();

    let buffer = generate(&config.field, rng);
    scene.set_field(ParticleField::new(
        buffer,
        PointsMaterial::glow(config.field.size as f32),
    ));

    for _ in 0..config.marker_count {
        let position = Vec3::new(
            rng.next_spread(config.marker_spread) as f32,
            rng.next_spread(config.marker_spread) as f32,
            rng.next_spread(config.marker_spread) as f32,
        );
        scene.add_marker(Marker {
            position,
            radius: config.marker_radius as f32,
            color: Srgb::WHITE,
        });
    }

    scene.set_ambient(config.ambient);

    let camera = PerspectiveCamera::new(config.camera, viewport_width, viewport_height);

    log::info!(
        "scene built: {} objects ({} particles), {:?} capability",
        scene.object_count(),
        config.field.count,
        config.capability
    );

    SceneContext {
        scene,
        camera,
        config,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prng::Xorshift64;

    #[test]
    fn desktop_scene_has_full_field_markers_and_light() {
        let ctx = build_scene(1920.0, 1080.0, Capability::Desktop, &mut Xorshift64::new(1));
        let field = ctx.scene.field().unwrap();
        assert_eq!(field.buffer().len(), 30_000);
        assert_eq!(ctx.scene.markers().len(), 100);
        assert_eq!(ctx.scene.ambient(), Some(&AmbientLight::default()));
        assert_eq!(ctx.scene.object_count(), 102);
        assert_eq!(ctx.capability(), Capability::Desktop);
    }

    #[test]
    fn mobile_scene_is_lighter() {
        let ctx = build_scene(390.0, 844.0, Capability::Mobile, &mut Xorshift64::new(1));
        assert_eq!(ctx.scene.field().unwrap().buffer().len(), 15_000);
        assert_eq!(ctx.scene.markers().len(), 50);
    }

    #[test]
    fn markers_stay_inside_the_cube() {
        let ctx = build_scene(800.0, 600.0, Capability::Desktop, &mut Xorshift64::new(77));
        for marker in ctx.scene.markers() {
            let p = marker.position;
            assert!(p.abs().max_element() <= 40.0, "marker {p} outside cube");
            assert!((marker.radius - 0.05).abs() < 1e-6);
        }
    }

    #[test]
    fn galaxy_material_is_additive_without_depth_writes() {
        let ctx = build_scene(800.0, 600.0, Capability::Desktop, &mut Xorshift64::new(2));
        let material = ctx.scene.field().unwrap().material();
        assert_eq!(material.blending, Blending::Additive);
        assert!(!material.depth_write);
        assert!(material.vertex_colors && material.size_attenuation);
        assert!((material.size - 0.01).abs() < 1e-6);
    }

    #[test]
    fn camera_matches_viewport() {
        let ctx = build_scene(1200.0, 600.0, Capability::Desktop, &mut Xorshift64::new(3));
        assert!((ctx.camera.aspect() - 2.0).abs() < 1e-6);
        assert_eq!(ctx.camera.position(), Vec3::new(0.0, 5.0, 30.0));
    }

    #[test]
    fn clear_removes_everything() {
        let mut ctx = build_scene(800.0, 600.0, Capability::Mobile, &mut Xorshift64::new(4));
        ctx.scene.clear();
        assert_eq!(ctx.scene.object_count(), 0);
        assert!(ctx.scene.field().is_none());
    }

    #[test]
    fn model_matrix_applies_rotation() {
        let mut field = ParticleField::new(ParticleBuffer::default(), PointsMaterial::glow(0.01));
        assert_eq!(field.model_matrix(), Mat4::IDENTITY);
        field.set_rotation(Vec3::new(0.0, std::f32::consts::FRAC_PI_2, 0.0));
        let rotated = field.model_matrix().transform_point3(Vec3::X);
        assert!((rotated - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-5);
    }
}
