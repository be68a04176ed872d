//! Per-frame animation of the galaxy and camera, plus the input adapters
//! feeding it.
//!
//! [`FrameLoop`] is a two-state machine. While `Running`, every display
//! refresh calls [`FrameLoop::tick`], which spins the galaxy by a fixed
//! increment, lets the camera drift on slow sine/cosine curves of wall-clock
//! time, and asks the [`RenderBackend`] to draw. `Stopped` is terminal: it is
//! entered on teardown or when the backend fails, and later ticks do nothing.

use crate::camera::PerspectiveCamera;
use crate::easing::{Ease, Tween};
use crate::error::BackdropError;
use crate::scene::{Scene, SceneContext};
use glam::{Vec2, Vec3};

/// Galaxy spin per tick around Y. Tied to refresh rate, not elapsed time.
pub const FIELD_SPIN_Y_PER_TICK: f32 = 0.002;
/// Galaxy spin per tick around Z.
pub const FIELD_SPIN_Z_PER_TICK: f32 = 0.001;
/// Multiplier turning wall-clock milliseconds into the drift phase.
pub const CAMERA_DRIFT_RATE: f64 = 0.0003;
/// Horizontal drift amplitude of the camera.
pub const CAMERA_DRIFT_X: f64 = 2.0;
/// Vertical drift amplitude of the camera.
pub const CAMERA_DRIFT_Y: f64 = 1.0;
/// Duration of the eased turn toward the pointer.
pub const POINTER_TWEEN_MS: f64 = 2000.0;
/// Minimum interval between handled pointer moves.
pub const POINTER_THROTTLE_MS: f64 = 50.0;
/// Rotation (radians) about Y at the horizontal viewport edge.
pub const POINTER_YAW_SCALE: f32 = 0.3;
/// Rotation (radians) about X at the vertical viewport edge.
pub const POINTER_PITCH_SCALE: f32 = 0.2;

/// Maps a pointer position to [-1, 1] on both axes (top-left is (-1, -1)).
///
/// A degenerate viewport maps to the center.
pub fn normalize_pointer(client_x: f64, client_y: f64, width: f64, height: f64) -> Vec2 {
    let axis = |v: f64, extent: f64| {
        if extent > 0.0 && extent.is_finite() {
            (v / extent * 2.0 - 1.0) as f32
        } else {
            0.0
        }
    };
    Vec2::new(axis(client_x, width), axis(client_y, height))
}

/// Camera position for the idle drift at `now_ms`, around `rest`.
pub fn camera_drift(now_ms: f64, rest: Vec3) -> Vec3 {
    let t = now_ms * CAMERA_DRIFT_RATE;
    Vec3::new(
        (t.sin() * CAMERA_DRIFT_X) as f32,
        rest.y + (((t * 0.5).cos()) * CAMERA_DRIFT_Y) as f32,
        rest.z,
    )
}

/// Mutable animation state, owned by the frame loop.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationState {
    /// Galaxy Euler angles. Grow without bound; only sin/cos are consumed.
    pub field_rotation: Vec3,
    pub camera_position: Vec3,
    /// Last normalized pointer position.
    pub pointer_target: Vec2,
    tween: Option<Tween>,
}

impl AnimationState {
    /// Unrotated galaxy, camera at its rest position, no turn in progress.
    pub fn new(camera_rest: Vec3) -> Self {
        Self {
            field_rotation: Vec3::ZERO,
            camera_position: camera_rest,
            pointer_target: Vec2::ZERO,
            tween: None,
        }
    }

    /// One tick of the animation: spin, apply the pointer tween, drift.
    pub fn advance(&mut self, now_ms: f64, camera_rest: Vec3) {
        self.field_rotation.y += FIELD_SPIN_Y_PER_TICK;
        self.field_rotation.z += FIELD_SPIN_Z_PER_TICK;

        if let Some(tween) = self.tween {
            let eased = tween.sample(now_ms);
            self.field_rotation.x = eased.x;
            self.field_rotation.y = eased.y;
            if tween.is_finished(now_ms) {
                self.tween = None;
            }
        }

        self.camera_position = camera_drift(now_ms, camera_rest);
    }

    /// Starts an eased turn of the galaxy toward the pointer, from wherever
    /// it currently is. Replaces any running turn.
    pub fn aim_at(&mut self, pointer: Vec2, now_ms: f64) {
        self.pointer_target = pointer;
        let from = Vec2::new(self.field_rotation.x, self.field_rotation.y);
        let to = Vec2::new(-pointer.y * POINTER_PITCH_SCALE, pointer.x * POINTER_YAW_SCALE);
        self.tween = Some(Tween::new(from, to, now_ms, POINTER_TWEEN_MS, Ease::Power2Out));
    }
}

/// Graphics backend the frame loop draws through.
pub trait RenderBackend {
    /// Resizes the drawing surface, in physical pixels.
    fn resize(&mut self, width: u32, height: u32);

    /// Draws one frame of `scene` as seen from `camera`.
    fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera) -> Result<(), BackdropError>;

    /// Releases GPU resources. Called at most once.
    fn dispose(&mut self);
}

/// Lifecycle of the frame loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Stopped,
}

/// Owns the scene, the animation state and the backend once the scene is
/// built.
pub struct FrameLoop<B> {
    state: LoopState,
    animation: AnimationState,
    context: SceneContext,
    backend: B,
    frames: u64,
    disposed: bool,
}

impl<B: RenderBackend> FrameLoop<B> {
    /// Starts in `Running`.
    pub fn new(context: SceneContext, backend: B) -> Self {
        let rest = context.config.camera.position;
        Self {
            state: LoopState::Running,
            animation: AnimationState::new(rest),
            context,
            backend,
            frames: 0,
            disposed: false,
        }
    }

    /// Advances and renders one frame. No-op once stopped.
    pub fn tick(&mut self, now_ms: f64) -> LoopState {
        if self.state == LoopState::Stopped {
            return self.state;
        }

        let rest = self.context.config.camera.position;
        self.animation.advance(now_ms, rest);

        if let Some(field) = self.context.scene.field_mut() {
            field.set_rotation(self.animation.field_rotation);
        }
        let camera = &mut self.context.camera;
        camera.set_position(self.animation.camera_position);
        camera.look_at(Vec3::ZERO);

        match self.backend.render(&self.context.scene, &self.context.camera) {
            Ok(()) => self.frames += 1,
            Err(e) => {
                log::error!("background render failed, stopping animation: {e}");
                self.state = LoopState::Stopped;
            }
        }
        self.state
    }

    /// Viewport resize: new aspect ratio and drawing-buffer size.
    pub fn resize(&mut self, css_width: f64, css_height: f64, device_pixel_ratio: f64) {
        self.context.camera.set_viewport(css_width, css_height);
        let ratio = self.context.config.pixel_ratio(device_pixel_ratio);
        let to_px = |v: f64| (v.max(0.0) * ratio).round() as u32;
        self.backend.resize(to_px(css_width), to_px(css_height));
    }

    /// Pointer move in CSS pixels. Ignored when the capability has no
    /// pointer parallax or the loop is stopped. Returns whether a turn started.
    pub fn pointer_moved(
        &mut self,
        client_x: f64,
        client_y: f64,
        viewport_width: f64,
        viewport_height: f64,
        now_ms: f64,
    ) -> bool {
        if !self.context.config.pointer_parallax || self.state == LoopState::Stopped {
            return false;
        }
        let pointer = normalize_pointer(client_x, client_y, viewport_width, viewport_height);
        self.animation.aim_at(pointer, now_ms);
        true
    }

    /// Releases the backend and clears the scene. Terminal.
    pub fn teardown(&mut self) {
        self.state = LoopState::Stopped;
        if !self.disposed {
            self.backend.dispose();
            self.context.scene.clear();
            self.disposed = true;
            log::info!("background torn down after {} frames", self.frames);
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Rotation, camera and pointer state as of the last tick.
    pub fn animation(&self) -> &AnimationState {
        &self.animation
    }

    /// The scene, camera and options being drawn.
    pub fn context(&self) -> &SceneContext {
        &self.context
    }

    /// The backend frames are drawn through.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Frames rendered successfully.
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Capability;
    use crate::prng::Xorshift64;
    use crate::scene::build_scene;

    #[derive(Default)]
    struct RecordingBackend {
        renders: usize,
        sizes: Vec<(u32, u32)>,
        disposed: usize,
        fail_on: Option<usize>,
        last_rotation: Option<Vec3>,
        last_camera: Option<Vec3>,
    }

    impl RenderBackend for RecordingBackend {
        fn resize(&mut self, width: u32, height: u32) {
            self.sizes.push((width, height));
        }

        fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera) -> Result<(), BackdropError> {
            if self.fail_on == Some(self.renders) {
                return Err(BackdropError::Render("context lost".into()));
            }
            self.renders += 1;
            self.last_rotation = scene.field().map(|f| f.rotation());
            self.last_camera = Some(camera.position());
            Ok(())
        }

        fn dispose(&mut self) {
            self.disposed += 1;
        }
    }

    fn small_loop(capability: Capability, backend: RecordingBackend) -> FrameLoop<RecordingBackend> {
        let ctx = build_scene(1000.0, 500.0, capability, &mut Xorshift64::new(1));
        FrameLoop::new(ctx, backend)
    }

    #[test]
    fn tick_spins_by_fixed_increments() {
        let mut frame_loop = small_loop(Capability::Desktop, RecordingBackend::default());
        for i in 0..10 {
            frame_loop.tick(i as f64 * 1000.0);
        }
        let rot = frame_loop.animation().field_rotation;
        assert!((rot.y - 0.02).abs() < 1e-6, "y = {}", rot.y);
        assert!((rot.z - 0.01).abs() < 1e-6, "z = {}", rot.z);
        assert_eq!(rot.x, 0.0);
        assert_eq!(frame_loop.backend().renders, 10);
        assert_eq!(frame_loop.backend().last_rotation, Some(rot));
        assert_eq!(frame_loop.frames(), 10);
    }

    #[test]
    fn spin_ignores_elapsed_time() {
        let mut fast = small_loop(Capability::Desktop, RecordingBackend::default());
        let mut slow = small_loop(Capability::Desktop, RecordingBackend::default());
        fast.tick(16.0);
        slow.tick(5000.0);
        assert_eq!(fast.animation().field_rotation, slow.animation().field_rotation);
    }

    #[test]
    fn camera_drifts_with_wall_clock_and_looks_at_origin() {
        let mut frame_loop = small_loop(Capability::Desktop, RecordingBackend::default());
        frame_loop.tick(0.0);
        assert_eq!(frame_loop.context().camera.position(), Vec3::new(0.0, 6.0, 30.0));
        let now = 5000.0;
        frame_loop.tick(now);
        let t = now * CAMERA_DRIFT_RATE;
        let pos = frame_loop.context().camera.position();
        assert!((pos.x as f64 - t.sin() * 2.0).abs() < 1e-5);
        assert!((pos.y as f64 - (5.0 + (t * 0.5).cos())).abs() < 1e-5);
        assert_eq!(
            frame_loop.context().camera.view_matrix(),
            glam::Mat4::look_at_rh(pos, Vec3::ZERO, Vec3::Y)
        );
        assert_eq!(frame_loop.backend().last_camera, Some(pos));
    }

    #[test]
    fn camera_drift_stays_in_its_box() {
        let rest = Vec3::new(0.0, 5.0, 30.0);
        for i in 0..1000 {
            let p = camera_drift(i as f64 * 137.0, rest);
            assert!(p.x.abs() <= 2.0 + 1e-6);
            assert!((p.y - 5.0).abs() <= 1.0 + 1e-6);
            assert_eq!(p.z, 30.0);
        }
    }

    #[test]
    fn render_failure_stops_the_loop_for_good() {
        let backend = RecordingBackend {
            fail_on: Some(2),
            ..Default::default()
        };
        let mut frame_loop = small_loop(Capability::Desktop, backend);
        assert_eq!(frame_loop.tick(0.0), LoopState::Running);
        assert_eq!(frame_loop.tick(16.0), LoopState::Running);
        assert_eq!(frame_loop.tick(32.0), LoopState::Stopped);
        let rotation = frame_loop.animation().field_rotation;
        assert_eq!(frame_loop.tick(48.0), LoopState::Stopped);
        assert_eq!(frame_loop.backend().renders, 2);
        assert_eq!(frame_loop.animation().field_rotation, rotation);
    }

    #[test]
    fn teardown_disposes_once_and_clears_scene() {
        let mut frame_loop = small_loop(Capability::Desktop, RecordingBackend::default());
        frame_loop.tick(0.0);
        frame_loop.teardown();
        frame_loop.teardown();
        assert_eq!(frame_loop.backend().disposed, 1);
        assert_eq!(frame_loop.context().scene.object_count(), 0);
        assert_eq!(frame_loop.state(), LoopState::Stopped);
        frame_loop.tick(16.0);
        assert_eq!(frame_loop.backend().renders, 1);
    }

    #[test]
    fn ticks_after_teardown_report_stopped() {
        let mut frame_loop = small_loop(Capability::Desktop, RecordingBackend::default());
        assert_eq!(frame_loop.tick(0.0), LoopState::Running);
        frame_loop.teardown();
        // The browser loop drops its frame callback on the first non-running tick.
        assert_eq!(frame_loop.tick(16.0), LoopState::Stopped);
        assert_eq!(frame_loop.frames(), 1);
    }

    #[test]
    fn resize_updates_aspect_and_caps_pixel_ratio() {
        let mut frame_loop = small_loop(Capability::Desktop, RecordingBackend::default());
        frame_loop.resize(1200.0, 600.0, 3.0);
        assert!((frame_loop.context().camera.aspect() - 2.0).abs() < 1e-6);
        assert_eq!(frame_loop.backend().sizes, vec![(2400, 1200)]);
    }

    #[test]
    fn pointer_turn_eases_toward_scaled_target() {
        let mut frame_loop = small_loop(Capability::Desktop, RecordingBackend::default());
        // Pointer at the right edge, vertically centered.
        assert!(frame_loop.pointer_moved(1000.0, 250.0, 1000.0, 500.0, 0.0));
        assert_eq!(frame_loop.animation().pointer_target, Vec2::new(1.0, 0.0));
        frame_loop.tick(1000.0);
        let halfway = frame_loop.animation().field_rotation.y;
        assert!(halfway > 0.0 && halfway < 0.3, "halfway yaw {halfway}");
        frame_loop.tick(2000.0);
        let rot = frame_loop.animation().field_rotation;
        assert!((rot.y - 0.3).abs() < 1e-6, "final yaw {}", rot.y);
        assert!(rot.x.abs() < 1e-6);
        // Spin resumes from the tweened value.
        frame_loop.tick(2016.0);
        assert!((frame_loop.animation().field_rotation.y - 0.302).abs() < 1e-6);
    }

    #[test]
    fn pointer_above_center_tilts_forward() {
        let mut state = AnimationState::new(Vec3::new(0.0, 5.0, 30.0));
        state.aim_at(Vec2::new(0.0, -1.0), 0.0);
        state.advance(POINTER_TWEEN_MS, Vec3::new(0.0, 5.0, 30.0));
        assert!((state.field_rotation.x - 0.2).abs() < 1e-6);
    }

    #[test]
    fn pointer_is_ignored_on_mobile() {
        let mut frame_loop = small_loop(Capability::Mobile, RecordingBackend::default());
        assert!(!frame_loop.pointer_moved(10.0, 10.0, 400.0, 800.0, 0.0));
        assert_eq!(frame_loop.animation().pointer_target, Vec2::ZERO);
        frame_loop.tick(500.0);
        assert_eq!(frame_loop.animation().field_rotation.x, 0.0);
    }

    #[test]
    fn normalize_pointer_maps_corners() {
        assert_eq!(normalize_pointer(0.0, 0.0, 800.0, 600.0), Vec2::new(-1.0, -1.0));
        assert_eq!(normalize_pointer(800.0, 600.0, 800.0, 600.0), Vec2::new(1.0, 1.0));
        assert_eq!(normalize_pointer(400.0, 300.0, 800.0, 600.0), Vec2::ZERO);
        assert_eq!(normalize_pointer(5.0, 5.0, 0.0, 0.0), Vec2::ZERO);
    }
}
