//! Hard-coded option sets for the backdrop.
//!
//! The page has no config file or environment surface: each invocation
//! context (desktop or mobile) picks a literal parameter set from a
//! [`Preset`]. JSON overrides are accepted by the preview CLI and fall back
//! to the preset value key by key.

use crate::camera::CameraSettings;
use crate::color::Srgb;
use crate::error::BackdropError;
use crate::params::{param_color, param_f64, param_usize};
use crate::scene::AmbientLight;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Viewports at or below this width (CSS pixels) are treated as mobile.
pub const MOBILE_BREAKPOINT: f64 = 768.0;

/// Boot-time device class. Computed once from the viewport width and
/// read-only afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    Mobile,
    Desktop,
}

impl Capability {
    /// Mobile at or below [`MOBILE_BREAKPOINT`], desktop above.
    pub fn detect(viewport_width: f64) -> Self {
        if viewport_width <= MOBILE_BREAKPOINT {
            Capability::Mobile
        } else {
            Capability::Desktop
        }
    }

    pub fn is_mobile(self) -> bool {
        self == Capability::Mobile
    }

    /// Antialiasing is too expensive on phones.
    pub fn antialias(self) -> bool {
        !self.is_mobile()
    }

    /// Pointer parallax only makes sense with a hovering pointer.
    pub fn pointer_parallax(self) -> bool {
        !self.is_mobile()
    }

    pub fn monitors_frame_rate(self) -> bool {
        !self.is_mobile()
    }
}

/// Inputs of the spiral particle field generator.
///
/// Immutable once handed to [`generate`](crate::galaxy::generate).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticleFieldParameters {
    /// Number of points.
    pub count: usize,
    /// Point size in world units (attenuated by distance).
    pub size: f64,
    /// Outer radius of the disk.
    pub radius: f64,
    /// Number of spiral arms.
    pub branch_count: usize,
    /// Extra rotation per unit of radius, in radians.
    pub spin: f64,
    /// Kept for preset compatibility; placement only uses `randomness_power`.
    pub randomness: f64,
    /// Exponent applied to jitter draws. Higher values give tighter arms.
    pub randomness_power: f64,
    pub inner_color: Srgb,
    pub outer_color: Srgb,
    /// Scale of the vertical jitter; below 1 flattens the field into a disk.
    #[serde(default = "default_vertical_flatten")]
    pub vertical_flatten: f64,
}

fn default_vertical_flatten() -> f64 {
    1.0
}

impl ParticleFieldParameters {
    /// Returns a copy with every key present in `overrides` replaced.
    ///
    /// Missing or mistyped keys keep the current value.
    pub fn with_overrides(&self, overrides: &Value) -> Self {
        Self {
            count: param_usize(overrides, "count", self.count),
            size: param_f64(overrides, "size", self.size),
            radius: param_f64(overrides, "radius", self.radius),
            branch_count: param_usize(overrides, "branch_count", self.branch_count),
            spin: param_f64(overrides, "spin", self.spin),
            randomness: param_f64(overrides, "randomness", self.randomness),
            randomness_power: param_f64(overrides, "randomness_power", self.randomness_power),
            inner_color: param_color(overrides, "inner_color", self.inner_color),
            outer_color: param_color(overrides, "outer_color", self.outer_color),
            vertical_flatten: param_f64(overrides, "vertical_flatten", self.vertical_flatten),
        }
    }

    /// Checks the ranges the generator relies on for finite output.
    pub fn validate(&self) -> Result<(), BackdropError> {
        let invalid = |name: &str, reason: &str| {
            Err(BackdropError::InvalidParameter {
                name: name.to_string(),
                reason: reason.to_string(),
            })
        };
        if !(self.size.is_finite() && self.size > 0.0) {
            return invalid("size", "must be a positive finite number");
        }
        if !(self.radius.is_finite() && self.radius >= 0.0) {
            return invalid("radius", "must be a non-negative finite number");
        }
        if self.branch_count == 0 {
            return invalid("branch_count", "must be at least 1");
        }
        if !self.spin.is_finite() {
            return invalid("spin", "must be finite");
        }
        if !(self.randomness_power.is_finite() && self.randomness_power > 0.0) {
            return invalid("randomness_power", "must be a positive finite number");
        }
        if !self.vertical_flatten.is_finite() {
            return invalid("vertical_flatten", "must be finite");
        }
        Ok(())
    }

    /// Schema describing every parameter, in the shape the CLI prints.
    pub fn schema() -> Value {
        json!({
            "count": {"type": "integer", "min": 0, "description": "Number of points"},
            "size": {"type": "number", "min": 0.0, "description": "Point size in world units"},
            "radius": {"type": "number", "min": 0.0, "description": "Outer radius of the disk"},
            "branch_count": {"type": "integer", "min": 1, "description": "Number of spiral arms"},
            "spin": {"type": "number", "description": "Rotation per unit of radius (radians)"},
            "randomness": {"type": "number", "description": "Carried for preset compatibility"},
            "randomness_power": {"type": "number", "min": 0.0, "description": "Jitter exponent; higher is tighter"},
            "inner_color": {"type": "color", "description": "Color at the center"},
            "outer_color": {"type": "color", "description": "Color at the rim"},
            "vertical_flatten": {"type": "number", "description": "Scale of vertical jitter"}
        })
    }
}

const PRESET_NAMES: &[&str] = &["portfolio", "classic"];

/// Built-in parameter sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// Cyan core fading into the page background, flattened disk.
    Portfolio,
    /// Warm orange core with deep blue arms, three thick arms.
    Classic,
}

impl Preset {
    /// Looks a preset up by its CLI name.
    ///
    /// # Errors
    ///
    /// Returns [`BackdropError::UnknownPreset`] for names not in
    /// [`Preset::list_names`].
    pub fn from_name(name: &str) -> Result<Self, BackdropError> {
        match name {
            "portfolio" => Ok(Preset::Portfolio),
            "classic" => Ok(Preset::Classic),
            _ => Err(BackdropError::UnknownPreset(name.to_string())),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Preset::Portfolio => "portfolio",
            Preset::Classic => "classic",
        }
    }

    /// Names accepted by [`Preset::from_name`].
    pub fn list_names() -> &'static [&'static str] {
        PRESET_NAMES
    }

    /// The parameter set for this preset, with the particle count halved
    /// under the mobile capability.
    pub fn parameters(self, capability: Capability) -> ParticleFieldParameters {
        match self {
            Preset::Portfolio => ParticleFieldParameters {
                count: if capability.is_mobile() { 15_000 } else { 30_000 },
                size: 0.01,
                radius: 8.0,
                branch_count: 4,
                spin: 1.0,
                randomness: 0.3,
                randomness_power: 2.0,
                inner_color: Srgb::from_rgb_u32(0x00d4ff),
                outer_color: Srgb::from_rgb_u32(0x1a1a2e),
                vertical_flatten: 0.3,
            },
            Preset::Classic => ParticleFieldParameters {
                count: if capability.is_mobile() { 25_000 } else { 50_000 },
                size: 0.01,
                radius: 10.0,
                branch_count: 3,
                spin: 1.0,
                randomness: 0.2,
                randomness_power: 3.0,
                inner_color: Srgb::from_rgb_u32(0xff6030),
                outer_color: Srgb::from_rgb_u32(0x1b3984),
                vertical_flatten: 1.0,
            },
        }
    }
}

/// Everything the page needs to build and drive the background for one
/// capability.
#[derive(Debug, Clone, PartialEq)]
pub struct BackdropConfig {
    pub capability: Capability,
    pub field: ParticleFieldParameters,
    /// Number of marker stars scattered around the galaxy.
    pub marker_count: usize,
    /// Edge length of the cube markers are scattered in.
    pub marker_spread: f64,
    pub marker_radius: f64,
    pub ambient: AmbientLight,
    pub camera: CameraSettings,
    pub antialias: bool,
    pub pointer_parallax: bool,
    /// Upper bound on the device pixel ratio used for the drawing buffer.
    pub max_pixel_ratio: f64,
}

impl BackdropConfig {
    /// The page's default options for `capability`.
    pub fn for_capability(capability: Capability) -> Self {
        Self::with_preset(Preset::Portfolio, capability)
    }

    /// Page defaults for `capability` with the field parameters of `preset`.
    pub fn with_preset(preset: Preset, capability: Capability) -> Self {
        Self {
            capability,
            field: preset.parameters(capability),
            marker_count: if capability.is_mobile() { 50 } else { 100 },
            marker_spread: 80.0,
            marker_radius: 0.05,
            ambient: AmbientLight::default(),
            camera: CameraSettings::default(),
            antialias: capability.antialias(),
            pointer_parallax: capability.pointer_parallax(),
            max_pixel_ratio: 2.0,
        }
    }

    /// Clamps the device pixel ratio to the configured maximum.
    pub fn pixel_ratio(&self, device_pixel_ratio: f64) -> f64 {
        if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
            device_pixel_ratio.min(self.max_pixel_ratio)
        } else {
            1.0
        }
    }
}
