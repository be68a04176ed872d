//! Frame-rate sampling over one-second windows.

/// Length of a sampling window.
pub const FPS_WINDOW_MS: f64 = 1000.0;
/// Below this rate a window counts as slow.
pub const LOW_FPS: u32 = 30;
/// Slow windows only matter when the field has more particles than this.
pub const REDUCIBLE_PARTICLE_COUNT: usize = 5000;

/// Result of a completed window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FpsSample {
    pub fps: u32,
    /// Slow window with enough particles that fewer would help.
    pub low: bool,
}

/// Counts frames and reports once per window.
#[derive(Debug, Clone)]
pub struct FpsMonitor {
    frames: u32,
    window_start_ms: f64,
}

impl FpsMonitor {
    /// Opens the first measurement window at `now_ms`.
    pub fn new(now_ms: f64) -> Self {
        Self {
            frames: 0,
            window_start_ms: now_ms,
        }
    }

    /// Records a frame. When a window has elapsed, returns its sample and
    /// starts a new window.
    pub fn frame(&mut self, now_ms: f64, particle_count: usize) -> Option<FpsSample> {
        self.frames += 1;
        if now_ms - self.window_start_ms < FPS_WINDOW_MS {
            return None;
        }
        let fps = self.frames;
        self.frames = 0;
        self.window_start_ms = now_ms;
        let low = fps < LOW_FPS && particle_count > REDUCIBLE_PARTICLE_COUNT;
        if low {
            log::info!("low frame rate ({fps} fps) with {particle_count} particles");
        }
        Some(FpsSample { fps, low })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_window(monitor: &mut FpsMonitor, start: f64, frames: u32, particles: usize) -> FpsSample {
        let dt = FPS_WINDOW_MS / frames as f64;
        for i in 1..frames {
            assert!(monitor.frame(start + dt * i as f64, particles).is_none());
        }
        monitor.frame(start + FPS_WINDOW_MS, particles).unwrap()
    }

    #[test]
    fn reports_frames_per_window() {
        let mut monitor = FpsMonitor::new(0.0);
        let sample = run_window(&mut monitor, 0.0, 60, 30_000);
        assert_eq!(sample, FpsSample { fps: 60, low: false });
    }

    #[test]
    fn slow_windows_with_many_particles_are_low() {
        let mut monitor = FpsMonitor::new(0.0);
        assert!(run_window(&mut monitor, 0.0, 20, 30_000).low);
        assert!(!run_window(&mut monitor, 1000.0, 20, 5000).low);
    }

    #[test]
    fn window_restarts_after_sample() {
        let mut monitor = FpsMonitor::new(0.0);
        run_window(&mut monitor, 0.0, 10, 0);
        assert!(monitor.frame(1500.0, 0).is_none());
        assert_eq!(monitor.frame(2000.0, 0).unwrap().fps, 2);
    }
}
