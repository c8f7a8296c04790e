//! Parameter storage behind the control panel
//!
//! The store buffers edits coming from a control panel. It knows nothing
//! about regeneration; the engine decides whether an update is a live edit
//! (stored value only) or a commit (stored value plus one generator run).

use stardust_core::color::Rgb;
use stardust_core::params::GenerationParameters;
use stardust_core::{Error, Result};

/// Identifies one tunable parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlKey {
    Count,
    Radius,
    Branches,
    Randomness,
    RandomnessPower,
    InsideColor,
    OutsideColor,
}

/// A value arriving from a panel widget
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlValue {
    Number(f64),
    Color(Rgb),
}

/// Holds the current parameter snapshot and applies panel updates to it
#[derive(Debug, Clone, Default)]
pub struct ParameterStore {
    params: GenerationParameters,
}

impl ParameterStore {
    pub fn new(params: GenerationParameters) -> Self {
        Self { params }
    }

    /// The stored snapshot
    pub fn parameters(&self) -> &GenerationParameters {
        &self.params
    }

    /// Clone the stored snapshot for a generation run
    pub fn snapshot(&self) -> GenerationParameters {
        self.params.clone()
    }

    /// Replace the whole snapshot (preset reload path)
    pub fn set_parameters(&mut self, params: GenerationParameters) {
        self.params = params;
    }

    /// Read the stored value for one key
    pub fn get(&self, key: ControlKey) -> ControlValue {
        match key {
            ControlKey::Count => ControlValue::Number(f64::from(self.params.count)),
            ControlKey::Radius => ControlValue::Number(f64::from(self.params.radius)),
            ControlKey::Branches => ControlValue::Number(f64::from(self.params.branches)),
            ControlKey::Randomness => ControlValue::Number(f64::from(self.params.randomness)),
            ControlKey::RandomnessPower => {
                ControlValue::Number(f64::from(self.params.randomness_power))
            }
            ControlKey::InsideColor => ControlValue::Color(self.params.inside_color),
            ControlKey::OutsideColor => ControlValue::Color(self.params.outside_color),
        }
    }

    /// Apply one panel update to the stored snapshot
    ///
    /// Rejects kind mismatches (a color for a numeric key and vice versa).
    /// Range invariants are not checked here; they are enforced by the
    /// generator's validation when a commit actually runs.
    pub fn set(&mut self, key: ControlKey, value: ControlValue) -> Result<()> {
        match (key, value) {
            (ControlKey::Count, ControlValue::Number(v)) => {
                self.params.count = v.max(0.0).round() as u32;
            }
            (ControlKey::Radius, ControlValue::Number(v)) => {
                self.params.radius = v as f32;
            }
            (ControlKey::Branches, ControlValue::Number(v)) => {
                self.params.branches = v.max(0.0).round() as u32;
            }
            (ControlKey::Randomness, ControlValue::Number(v)) => {
                self.params.randomness = v as f32;
            }
            (ControlKey::RandomnessPower, ControlValue::Number(v)) => {
                self.params.randomness_power = v as f32;
            }
            (ControlKey::InsideColor, ControlValue::Color(c)) => {
                self.params.inside_color = c;
            }
            (ControlKey::OutsideColor, ControlValue::Color(c)) => {
                self.params.outside_color = c;
            }
            (key, value) => {
                return Err(Error::InvalidParameter(format!(
                    "control {key:?} does not accept {value:?}"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get_numeric() {
        let mut store = ParameterStore::default();
        store.set(ControlKey::Count, ControlValue::Number(5000.0)).unwrap();
        assert_eq!(store.parameters().count, 5000);
        assert_eq!(store.get(ControlKey::Count), ControlValue::Number(5000.0));
    }

    #[test]
    fn test_set_color() {
        let mut store = ParameterStore::default();
        let c = Rgb::new(0.5, 0.5, 0.5);
        store.set(ControlKey::InsideColor, ControlValue::Color(c)).unwrap();
        assert_eq!(store.parameters().inside_color, c);
    }

    #[test]
    fn test_kind_mismatch_rejected() {
        let mut store = ParameterStore::default();
        let before = store.snapshot();

        let result = store.set(ControlKey::Count, ControlValue::Color(Rgb::WHITE));
        assert!(result.is_err());
        assert_eq!(store.snapshot(), before);
    }

    #[test]
    fn test_count_rounds_and_clamps_at_zero() {
        let mut store = ParameterStore::default();
        store.set(ControlKey::Count, ControlValue::Number(99.6)).unwrap();
        assert_eq!(store.parameters().count, 100);

        // Negative panel values degrade to an invalid count; the generator's
        // validation is what rejects them on commit
        store.set(ControlKey::Count, ControlValue::Number(-5.0)).unwrap();
        assert_eq!(store.parameters().count, 0);
    }
}
