//! sRGB color type used by the particle field and scene lights.
//!
//! Colors are stored as `f64` components in [0, 1] and serialize as
//! `"#rrggbb"` hex strings so parameter sets stay human-editable.

use crate::error::BackdropError;
use glam::Vec3;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Gamma-encoded color, channels nominally in [0, 1].
///
/// Serialized as `"#rrggbb"`, so channels round to the nearest 1/255.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Srgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Srgb {
    pub const WHITE: Srgb = Srgb {
        r: 1.0,
        g: 1.0,
        b: 1.0,
    };

    pub const BLACK: Srgb = Srgb {
        r: 0.0,
        g: 0.0,
        b: 0.0,
    };

    /// Channels are stored as given; clamping happens on output.
    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Reads `#rrggbb`; the leading `#` is optional and case is ignored.
    ///
    /// Returns `BackdropError::InvalidColor` if the input is not a valid 6-digit hex color.
    pub fn from_hex(hex: &str) -> Result<Srgb, BackdropError> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(BackdropError::InvalidColor(format!(
                "expected 6 hex digits, got '{hex}'"
            )));
        }
        let channel = |range: std::ops::Range<usize>, name: &str| {
            u8::from_str_radix(&hex[range], 16)
                .map(|v| v as f64 / 255.0)
                .map_err(|e| BackdropError::InvalidColor(format!("invalid {name} component: {e}")))
        };
        Ok(Srgb {
            r: channel(0..2, "red")?,
            g: channel(2..4, "green")?,
            b: channel(4..6, "blue")?,
        })
    }

    /// Builds a color from a packed `0xRRGGBB` integer.
    pub fn from_rgb_u32(packed: u32) -> Srgb {
        Srgb {
            r: ((packed >> 16) & 0xff) as f64 / 255.0,
            g: ((packed >> 8) & 0xff) as f64 / 255.0,
            b: (packed & 0xff) as f64 / 255.0,
        }
    }

    /// Lowercase `#rrggbb`, clamping channels first.
    pub fn to_hex(self) -> String {
        let r = (self.r.clamp(0.0, 1.0) * 255.0).round() as u8;
        let g = (self.g.clamp(0.0, 1.0) * 255.0).round() as u8;
        let b = (self.b.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!("#{r:02x}{g:02x}{b:02x}")
    }

    /// Linear interpolation toward `other`: `t = 0` is `self`, `t = 1` is `other`.
    ///
    /// `t` is clamped to [0, 1] so the result never overshoots either endpoint.
    pub fn lerp(self, other: Srgb, t: f64) -> Srgb {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        // Weighted form: exact at both endpoints.
        let mix = |from: f64, to: f64| from * (1.0 - t) + to * t;
        Srgb {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
        }
    }

    /// The color as an `f32` vector, the layout GPU vertex buffers use.
    pub fn to_vec3(self) -> Vec3 {
        Vec3::new(self.r as f32, self.g as f32, self.b as f32)
    }
}

impl Serialize for Srgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Srgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Srgb::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn from_hex_parses_cyan_with_hash() {
        let c = Srgb::from_hex("#00d4ff").unwrap();
        assert!(approx_eq(c.r, 0.0));
        assert!(approx_eq(c.g, 212.0 / 255.0));
        assert!(approx_eq(c.b, 1.0));
    }

    #[test]
    fn from_hex_parses_without_hash_case_insensitive() {
        let lower = Srgb::from_hex("1a1a2e").unwrap();
        let upper = Srgb::from_hex("#1A1A2E").unwrap();
        assert_eq!(lower, upper);
    }

    #[test]
    fn from_hex_rejects_wrong_length() {
        assert!(matches!(
            Srgb::from_hex("#fff"),
            Err(BackdropError::InvalidColor(_))
        ));
    }

    #[test]
    fn from_hex_rejects_non_hex_digits() {
        assert!(Srgb::from_hex("#zz0000").is_err());
    }

    #[test]
    fn from_hex_rejects_multibyte_input_without_panicking() {
        assert!(Srgb::from_hex("ééé").is_err());
    }

    #[test]
    fn from_rgb_u32_matches_hex() {
        assert_eq!(Srgb::from_rgb_u32(0xffffff), Srgb::WHITE);
        assert_eq!(
            Srgb::from_rgb_u32(0x06b6d4),
            Srgb::from_hex("#06b6d4").unwrap()
        );
    }

    #[test]
    fn to_hex_round_trips_known_color() {
        assert_eq!(Srgb::from_hex("#ff6030").unwrap().to_hex(), "#ff6030");
    }

    #[test]
    fn hex_output_clamps_channels() {
        assert_eq!(Srgb::new(1.5, -0.2, 0.0).to_hex(), "#ff0000");
    }

    #[test]
    fn lerp_endpoints_are_exact() {
        let a = Srgb::from_hex("#00d4ff").unwrap();
        let b = Srgb::from_hex("#1a1a2e").unwrap();
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert_eq!(a.lerp(b, 7.5), b);
        assert_eq!(b.lerp(a, 1.0), a);
    }

    #[test]
    fn lerp_midpoint_averages_channels() {
        let mid = Srgb::BLACK.lerp(Srgb::WHITE, 0.5);
        assert!(approx_eq(mid.r, 0.5));
        assert!(approx_eq(mid.g, 0.5));
        assert!(approx_eq(mid.b, 0.5));
    }

    #[test]
    fn lerp_clamps_factor() {
        assert_eq!(Srgb::BLACK.lerp(Srgb::WHITE, 2.0), Srgb::WHITE);
        assert_eq!(Srgb::BLACK.lerp(Srgb::WHITE, -1.0), Srgb::BLACK);
        assert_eq!(Srgb::BLACK.lerp(Srgb::WHITE, f64::NAN), Srgb::BLACK);
    }

    #[test]
    fn serializes_as_hex_string() {
        let json = serde_json::to_string(&Srgb::from_hex("#1b3984").unwrap()).unwrap();
        assert_eq!(json, "\"#1b3984\"");
    }

    #[test]
    fn deserialize_rejects_invalid_hex() {
        let result: Result<Srgb, _> = serde_json::from_str("\"#12\"");
        assert!(result.is_err());
    }

    #[test]
    fn to_vec3_preserves_channels() {
        let v = Srgb::new(0.25, 0.5, 1.0).to_vec3();
        assert_eq!(v, Vec3::new(0.25, 0.5, 1.0));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn channel() -> impl Strategy<Value = f64> {
            0.0_f64..=1.0
        }

        proptest! {
            #[test]
            fn lerp_is_monotonic_and_bounded(
                ar in channel(), ag in channel(), ab in channel(),
                br in channel(), bg in channel(), bb in channel(),
                t0 in 0.0_f64..=1.0, t1 in 0.0_f64..=1.0,
            ) {
                let a = Srgb::new(ar, ag, ab);
                let b = Srgb::new(br, bg, bb);
                let (lo, hi) = if t0 <= t1 { (t0, t1) } else { (t1, t0) };
                let c_lo = a.lerp(b, lo);
                let c_hi = a.lerp(b, hi);
                for (start, end, x_lo, x_hi) in [
                    (a.r, b.r, c_lo.r, c_hi.r),
                    (a.g, b.g, c_lo.g, c_hi.g),
                    (a.b, b.b, c_lo.b, c_hi.b),
                ] {
                    let (min, max) = if start <= end { (start, end) } else { (end, start) };
                    prop_assert!(x_lo >= min - 1e-12 && x_lo <= max + 1e-12);
                    prop_assert!(x_hi >= min - 1e-12 && x_hi <= max + 1e-12);
                    // Moving t forward moves the channel toward `end`.
                    prop_assert!((x_hi - x_lo) * (end - start) >= -1e-12);
                }
            }

            #[test]
            fn hex_round_trip_within_quantization(
                r in channel(), g in channel(), b in channel(),
            ) {
                let back = Srgb::from_hex(&Srgb::new(r, g, b).to_hex()).unwrap();
                prop_assert!((back.r - r).abs() <= 0.5 / 255.0 + 1e-9);
                prop_assert!((back.g - g).abs() <= 0.5 / 255.0 + 1e-9);
                prop_assert!((back.b - b).abs() <= 0.5 / 255.0 + 1e-9);
            }
        }
    }
}
