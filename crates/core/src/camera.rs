//! Perspective camera looking at the galaxy.

use glam::{Mat4, Vec3};

/// Fixed lens and rest position of the camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraSettings {
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    /// Rest position: above and back from the origin.
    pub position: Vec3,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            fov_degrees: 75.0,
            near: 0.1,
            far: 1000.0,
            position: Vec3::new(0.0, 5.0, 30.0),
        }
    }
}

/// A right-handed perspective camera with a look-at target.
#[derive(Debug, Clone, PartialEq)]
pub struct PerspectiveCamera {
    settings: CameraSettings,
    aspect: f32,
    position: Vec3,
    target: Vec3,
}

impl PerspectiveCamera {
    /// Creates a camera at the rest position, looking at the origin.
    pub fn new(settings: CameraSettings, viewport_width: f64, viewport_height: f64) -> Self {
        let mut camera = Self {
            settings,
            aspect: 1.0,
            position: settings.position,
            target: Vec3::ZERO,
        };
        camera.set_viewport(viewport_width, viewport_height);
        camera
    }

    /// Recomputes the aspect ratio. A zero or non-finite height keeps the
    /// previous aspect so the projection never degenerates.
    pub fn set_viewport(&mut self, width: f64, height: f64) {
        let aspect = width / height;
        if aspect.is_finite() && aspect > 0.0 {
            self.aspect = aspect as f32;
        }
    }

    /// Width over height of the last valid viewport.
    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    /// Eye position in world space.
    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// Points the camera at `target`, keeping +Y up.
    pub fn look_at(&mut self, target: Vec3) {
        self.target = target;
    }

    /// World to view transform.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    /// OpenGL-convention projection (clip z in [-1, 1]).
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh_gl(
            self.settings.fov_degrees.to_radians(),
            self.aspect,
            self.settings.near,
            self.settings.far,
        )
    }

    /// Projection times view, for projecting points on the CPU.
    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera(w: f64, h: f64) -> PerspectiveCamera {
        PerspectiveCamera::new(CameraSettings::default(), w, h)
    }

    #[test]
    fn new_camera_sits_above_and_behind_origin() {
        let cam = camera(1920.0, 1080.0);
        assert_eq!(cam.position(), Vec3::new(0.0, 5.0, 30.0));
        assert_eq!(cam.target, Vec3::ZERO);
        assert!((cam.aspect() - 1920.0 / 1080.0).abs() < 1e-6);
    }

    #[test]
    fn zero_height_keeps_previous_aspect() {
        let mut cam = camera(800.0, 400.0);
        cam.set_viewport(800.0, 0.0);
        assert!((cam.aspect() - 2.0).abs() < 1e-6);
    }

    #[test]
    fn resize_is_idempotent() {
        let mut cam = camera(800.0, 600.0);
        cam.set_viewport(1024.0, 768.0);
        let once = cam.clone();
        cam.set_viewport(1024.0, 768.0);
        assert_eq!(cam, once);
    }

    #[test]
    fn origin_projects_to_screen_center() {
        let mut cam = camera(1000.0, 1000.0);
        cam.set_position(Vec3::new(0.0, 0.0, 30.0));
        let clip = cam.view_projection() * glam::Vec4::new(0.0, 0.0, 0.0, 1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < 1e-5 && ndc.y.abs() < 1e-5);
        assert!(ndc.z > -1.0 && ndc.z < 1.0);
    }

    #[test]
    fn view_matrix_moves_camera_to_origin() {
        let cam = camera(1000.0, 1000.0);
        let eye_in_view = cam.view_matrix().transform_point3(cam.position());
        assert!(eye_in_view.length() < 1e-4);
    }
}
