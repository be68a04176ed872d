//! Short-lived dots that fly out from a click.

use std::f64::consts::TAU;

pub const BURST_PARTICLE_COUNT: usize = 6;
pub const BURST_PARTICLE_SIZE_PX: f64 = 4.0;
pub const BURST_COLOR: &str = "#06b6d4";
pub const BURST_Z_INDEX: i32 = 9999;
/// Speed in px per second, applied with a fixed per-frame factor.
pub const BURST_SPEED: f64 = 100.0;
pub const BURST_FRAME_FACTOR: f64 = 0.02;
/// Opacity lost per frame.
pub const BURST_FADE_PER_FRAME: f64 = 0.02;
/// Frames until a particle is fully transparent.
pub const BURST_LIFE_FRAMES: u32 = 50;

/// One dot of a click burst, in viewport pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BurstParticle {
    pub x: f64,
    pub y: f64,
    vx: f64,
    vy: f64,
    frames_left: u32,
}

impl BurstParticle {
    fn new(x: f64, y: f64, angle: f64) -> Self {
        Self {
            x,
            y,
            vx: angle.cos() * BURST_SPEED,
            vy: angle.sin() * BURST_SPEED,
            frames_left: BURST_LIFE_FRAMES,
        }
    }

    /// Moves one frame. Returns whether the particle is still visible.
    pub fn step(&mut self) -> bool {
        if self.frames_left == 0 {
            return false;
        }
        self.x += self.vx * BURST_FRAME_FACTOR;
        self.y += self.vy * BURST_FRAME_FACTOR;
        self.frames_left -= 1;
        self.frames_left > 0
    }

    pub fn opacity(&self) -> f64 {
        self.frames_left as f64 * BURST_FADE_PER_FRAME
    }

    pub fn is_alive(&self) -> bool {
        self.frames_left > 0
    }

    /// Inline style for the particle's element at creation.
    pub fn css_text(&self) -> String {
        format!(
            "position: fixed; width: {BURST_PARTICLE_SIZE_PX}px; height: {BURST_PARTICLE_SIZE_PX}px; \
             background: {BURST_COLOR}; border-radius: 50%; pointer-events: none; \
             z-index: {BURST_Z_INDEX}; left: {}px; top: {}px;",
            self.x, self.y
        )
    }
}

/// Particles spawned by a single click, evenly spread around a circle.
#[derive(Debug, Clone, PartialEq)]
pub struct ClickBurst {
    particles: Vec<BurstParticle>,
}

impl ClickBurst {
    /// Six particles at the click point, fanned out evenly.
    pub fn new(x: f64, y: f64) -> Self {
        let particles = (0..BURST_PARTICLE_COUNT)
            .map(|i| BurstParticle::new(x, y, i as f64 / BURST_PARTICLE_COUNT as f64 * TAU))
            .collect();
        Self { particles }
    }

    /// Advances every particle. Returns whether any is still visible.
    pub fn step(&mut self) -> bool {
        let mut alive = false;
        for p in &mut self.particles {
            alive |= p.step();
        }
        alive
    }

    pub fn particles(&self) -> &[BurstParticle] {
        &self.particles
    }
}
