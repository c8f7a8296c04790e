//! Error types for the engine layer

use stardust_cloud::SlotError;
use thiserror::Error;

/// Errors surfaced by engine operations
#[derive(Error, Debug)]
pub enum EngineError {
    /// Parameter validation or generation failed
    #[error("Generation failed: {0}")]
    Generation(#[from] stardust_core::Error),

    /// The display backend rejected the generated buffer
    #[error("Display failed: {0}")]
    Display(#[from] SlotError),

    /// A preset file could not be parsed
    #[error("Preset error: {0}")]
    Preset(#[from] serde_json::Error),

    /// IO error reading or writing a preset file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
