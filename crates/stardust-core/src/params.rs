//! Generation parameters for the galaxy generator
//!
//! A [`GenerationParameters`] value is an immutable snapshot of every knob
//! the generator reads. Snapshots serialize to JSON presets with camelCase
//! keys and `#rrggbb` colors, so preset files are hand-editable.

use crate::color::Rgb;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// A complete parameter snapshot for one generation run
///
/// Invariants (checked by [`GenerationParameters::validate`]):
/// - `count > 0`
/// - `radius > 0` and finite
/// - `branches >= 1`
/// - `randomness >= 0` and finite
/// - `randomness_power >= 1` and finite
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerationParameters {
    /// Number of points in the cloud
    pub count: u32,
    /// Radius of the galactic disc
    pub radius: f32,
    /// Number of spiral arms
    pub branches: u32,
    /// Magnitude of the per-axis scatter away from the arm line
    pub randomness: f32,
    /// Exponent shaping the scatter falloff; higher values hug the arm
    pub randomness_power: f32,
    /// Color at the galactic core
    pub inside_color: Rgb,
    /// Color at the rim
    pub outside_color: Rgb,
}

impl Default for GenerationParameters {
    fn default() -> Self {
        Self {
            count: 100_000,
            radius: 5.0,
            branches: 3,
            randomness: 0.2,
            randomness_power: 3.0,
            inside_color: Rgb::new(1.0, 0x60 as f32 / 255.0, 0x30 as f32 / 255.0),
            outside_color: Rgb::new(0x1b as f32 / 255.0, 0x39 as f32 / 255.0, 0x84 as f32 / 255.0),
        }
    }
}

impl GenerationParameters {
    /// Check every invariant, reporting the first violation
    pub fn validate(&self) -> Result<()> {
        if self.count == 0 {
            return Err(Error::InvalidParameter("count must be positive".into()));
        }
        if !(self.radius.is_finite() && self.radius > 0.0) {
            return Err(Error::InvalidParameter(format!(
                "radius must be positive and finite, got {}",
                self.radius
            )));
        }
        if self.branches < 1 {
            return Err(Error::InvalidParameter("branches must be at least 1".into()));
        }
        if !(self.randomness.is_finite() && self.randomness >= 0.0) {
            return Err(Error::InvalidParameter(format!(
                "randomness must be non-negative and finite, got {}",
                self.randomness
            )));
        }
        if !(self.randomness_power.is_finite() && self.randomness_power >= 1.0) {
            return Err(Error::InvalidParameter(format!(
                "randomness power must be at least 1, got {}",
                self.randomness_power
            )));
        }
        Ok(())
    }

    pub fn with_count(mut self, count: u32) -> Self {
        self.count = count;
        self
    }

    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius = radius;
        self
    }

    pub fn with_branches(mut self, branches: u32) -> Self {
        self.branches = branches;
        self
    }

    pub fn with_randomness(mut self, randomness: f32) -> Self {
        self.randomness = randomness;
        self
    }

    pub fn with_randomness_power(mut self, power: f32) -> Self {
        self.randomness_power = power;
        self
    }

    pub fn with_colors(mut self, inside: Rgb, outside: Rgb) -> Self {
        self.inside_color = inside;
        self.outside_color = outside;
        self
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(GenerationParameters::default().validate().is_ok());
    }

    #[test]
    fn test_zero_count_rejected() {
        let params = GenerationParameters::default().with_count(0);
        assert!(matches!(
            params.validate(),
            Err(Error::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_non_positive_radius_rejected() {
        assert!(GenerationParameters::default().with_radius(0.0).validate().is_err());
        assert!(GenerationParameters::default().with_radius(-1.0).validate().is_err());
        assert!(GenerationParameters::default().with_radius(f32::NAN).validate().is_err());
    }

    #[test]
    fn test_zero_branches_rejected() {
        assert!(GenerationParameters::default().with_branches(0).validate().is_err());
        assert!(GenerationParameters::default().with_branches(1).validate().is_ok());
    }

    #[test]
    fn test_randomness_power_below_one_rejected() {
        let params = GenerationParameters::default().with_randomness_power(0.5);
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_json_round_trip_with_camel_case_keys() {
        let params = GenerationParameters::default();
        let json = serde_json::to_string(&params).unwrap();

        assert!(json.contains("\"randomnessPower\""));
        assert!(json.contains("\"insideColor\":\"#ff6030\""));
        assert!(json.contains("\"outsideColor\":\"#1b3984\""));

        let back: GenerationParameters = serde_json::from_str(&json).unwrap();
        assert_eq!(back, params);
    }

    #[test]
    fn test_partial_preset_uses_defaults() {
        let json = r##"{"count": 5000, "insideColor": "#ffffff"}"##;
        let params: GenerationParameters = serde_json::from_str(json).unwrap();
        assert_eq!(params.count, 5000);
        assert_eq!(params.inside_color, Rgb::WHITE);
        assert_eq!(params.branches, GenerationParameters::default().branches);
    }
}
