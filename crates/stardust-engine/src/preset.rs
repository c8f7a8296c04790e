//! JSON preset files
//!
//! Presets are plain JSON snapshots of [`GenerationParameters`] with
//! camelCase keys and hex color strings, e.g.
//!
//! ```json
//! {
//!   "count": 200000,
//!   "radius": 5.0,
//!   "branches": 5,
//!   "randomness": 0.2,
//!   "randomnessPower": 3.0,
//!   "insideColor": "#ff6030",
//!   "outsideColor": "#1b3984"
//! }
//! ```
//!
//! Missing keys fall back to the defaults, so a preset can tweak a single
//! value.

use crate::error::EngineError;
use stardust_core::params::GenerationParameters;
use std::path::Path;

/// Load and validate a preset file
pub fn load(path: &Path) -> Result<GenerationParameters, EngineError> {
    let contents = std::fs::read_to_string(path)?;
    let params: GenerationParameters = serde_json::from_str(&contents)?;
    params.validate()?;
    Ok(params)
}

/// Write a preset file with pretty-printed JSON
pub fn save(params: &GenerationParameters, path: &Path) -> Result<(), EngineError> {
    let json = serde_json::to_string_pretty(params)?;
    std::fs::write(path, json)?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_save_and_load_round_trip() {
        let params = GenerationParameters::default().with_count(42_000).with_branches(7);
        let path = std::env::temp_dir().join("stardust_test_preset.json");

        save(&params, &path).unwrap();
        let loaded = load(&path).unwrap();
        assert_eq!(loaded, params);

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_load_rejects_invalid_preset() {
        let path = std::env::temp_dir().join("stardust_test_preset_invalid.json");
        std::fs::write(&path, r#"{"count": 0}"#).unwrap();

        assert!(matches!(load(&path), Err(EngineError::Generation(_))));

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_load_rejects_malformed_json() {
        let path = std::env::temp_dir().join("stardust_test_preset_malformed.json");
        std::fs::write(&path, "{not json").unwrap();

        assert!(matches!(load(&path), Err(EngineError::Preset(_))));

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let path = std::env::temp_dir().join("stardust_test_preset_missing.json");
        assert!(matches!(load(&path), Err(EngineError::Io(_))));
    }
}
