//! Page start-up sequencing.
//!
//! Every effect is installed in its own guarded scope: an error from one
//! initializer is logged and recorded, and the remaining initializers still
//! run. A missing renderer only disables the background. Any other failure
//! asks the host to add [`FALLBACK_CLASS`] to `<body>`.

use crate::config::Capability;
use crate::error::BackdropError;

/// Class added to `<body>` when an effect failed to install.
pub const FALLBACK_CLASS: &str = "no-js-fallback";
/// Id of the canvas hosting the background.
pub const BACKGROUND_ID: &str = "bg-animation";

/// The effects installed at start-up, in installation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Effect {
    LoadingScreen,
    Navigation,
    ScrollReveal,
    ClickBurst,
    Typing,
    Counters,
    Background,
    ErrorFallback,
    FrameRateMonitor,
}

impl Effect {
    pub const ALL: [Effect; 9] = [
        Effect::LoadingScreen,
        Effect::Navigation,
        Effect::ScrollReveal,
        Effect::ClickBurst,
        Effect::Typing,
        Effect::Counters,
        Effect::Background,
        Effect::ErrorFallback,
        Effect::FrameRateMonitor,
    ];

    /// Stable name used in log lines.
    pub fn name(self) -> &'static str {
        match self {
            Effect::LoadingScreen => "loading-screen",
            Effect::Navigation => "navigation",
            Effect::ScrollReveal => "scroll-reveal",
            Effect::ClickBurst => "click-burst",
            Effect::Typing => "typing",
            Effect::Counters => "counters",
            Effect::Background => "background",
            Effect::ErrorFallback => "error-fallback",
            Effect::FrameRateMonitor => "frame-rate-monitor",
        }
    }

    /// Whether this effect is installed at all for `capability`.
    pub fn enabled_for(self, capability: Capability) -> bool {
        match self {
            Effect::FrameRateMonitor => capability.monitors_frame_rate(),
            _ => true,
        }
    }
}

/// Installs individual effects. Implemented by the browser glue; tests use
/// a scripted host.
pub trait EffectHost {
    fn install(&mut self, effect: Effect, capability: Capability) -> Result<(), BackdropError>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum BackgroundStatus {
    Running,
    Disabled(String),
    Skipped,
}

/// What happened during start-up.
#[derive(Debug, Clone, PartialEq)]
pub struct InitReport {
    pub installed: Vec<Effect>,
    pub failed: Vec<(Effect, String)>,
    pub background: BackgroundStatus,
}

impl InitReport {
    /// True when the page should fall back to its static styling.
    pub fn needs_fallback(&self) -> bool {
        !self.failed.is_empty()
    }

    /// Whether `effect` installed without error.
    pub fn is_installed(&self, effect: Effect) -> bool {
        self.installed.contains(&effect)
    }
}

/// Runs every enabled initializer once, in [`Effect::ALL`] order.
pub fn initialize(host: &mut impl EffectHost, capability: Capability) -> InitReport {
    let mut report = InitReport {
        installed: Vec::new(),
        failed: Vec::new(),
        background: BackgroundStatus::Skipped,
    };

    for effect in Effect::ALL {
        if !effect.enabled_for(capability) {
            log::debug!("{} disabled for {capability:?}", effect.name());
            continue;
        }
        match host.install(effect, capability) {
            Ok(()) => {
                if effect == Effect::Background {
                    report.background = BackgroundStatus::Running;
                }
                report.installed.push(effect);
            }
            Err(e) if effect == Effect::Background => {
                if e.is_capability_loss() {
                    log::warn!("background animation disabled: {e}");
                } else {
                    log::warn!("background animation failed to start, disabling: {e}");
                }
                report.background = BackgroundStatus::Disabled(e.to_string());
            }
            Err(e) => {
                log::error!("failed to initialize {}: {e}", effect.name());
                report.failed.push((effect, e.to_string()));
            }
        }
    }

    if report.needs_fallback() {
        log::warn!("{} effect(s) failed, falling back", report.failed.len());
    } else {
        log::info!("page initialized with {} effects", report.installed.len());
    }
    report
}

/// Whether an uncaught error message points at the graphics context.
pub fn is_webgl_failure(message: &str) -> bool {
    message.contains("WebGL")
}
