//! Control-panel registration surface
//!
//! The panel widget library is an external collaborator. Stardust only
//! describes its tunables: each descriptor carries the bounds and step a
//! widget needs, and the two update paths are the engine's `set_live` and
//! `commit` methods. Keeping live and commit as separate registrations (not
//! one callback with a flag) makes the one-regeneration-per-drag invariant
//! visible in the API.

use crate::store::ControlKey;

/// Descriptor for one panel control
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlSpec {
    /// A bounded numeric slider
    Number {
        key: ControlKey,
        label: &'static str,
        min: f64,
        max: f64,
        step: f64,
    },
    /// A color swatch
    Color { key: ControlKey, label: &'static str },
}

impl ControlSpec {
    pub fn key(&self) -> ControlKey {
        match self {
            ControlSpec::Number { key, .. } | ControlSpec::Color { key, .. } => *key,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ControlSpec::Number { label, .. } | ControlSpec::Color { label, .. } => label,
        }
    }
}

/// All tunable parameters with their widget bounds
pub const CONTROLS: [ControlSpec; 7] = [
    ControlSpec::Number {
        key: ControlKey::Count,
        label: "count",
        min: 100.0,
        max: 1_000_000.0,
        step: 100.0,
    },
    ControlSpec::Number {
        key: ControlKey::Radius,
        label: "radius",
        min: 0.01,
        max: 20.0,
        step: 0.01,
    },
    ControlSpec::Number {
        key: ControlKey::Branches,
        label: "branches",
        min: 2.0,
        max: 20.0,
        step: 1.0,
    },
    ControlSpec::Number {
        key: ControlKey::Randomness,
        label: "randomness",
        min: 0.0,
        max: 2.0,
        step: 0.001,
    },
    ControlSpec::Number {
        key: ControlKey::RandomnessPower,
        label: "randomnessPower",
        min: 1.0,
        max: 10.0,
        step: 0.001,
    },
    ControlSpec::Color {
        key: ControlKey::InsideColor,
        label: "insideColor",
    },
    ControlSpec::Color {
        key: ControlKey::OutsideColor,
        label: "outsideColor",
    },
];

/// Descriptors for every tunable parameter
pub fn controls() -> &'static [ControlSpec] {
    &CONTROLS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_key_is_described_once() {
        let keys: Vec<ControlKey> = controls().iter().map(|c| c.key()).collect();
        let mut deduped = keys.clone();
        deduped.dedup();
        assert_eq!(keys.len(), 7);
        assert_eq!(keys, deduped);
    }

    #[test]
    fn test_numeric_bounds_are_ordered() {
        for spec in controls() {
            if let ControlSpec::Number { min, max, step, .. } = spec {
                assert!(min < max, "{}: min < max", spec.label());
                assert!(*step > 0.0, "{}: positive step", spec.label());
            }
        }
    }
}
