//! Stardust Engine - orchestration of generation and display
//!
//! The Engine owns the parameter store, the scene slot, and a display
//! backend, and enforces the commit protocol between them: live edits only
//! update stored values, a commit runs the generator exactly once and swaps
//! the displayed cloud.
//!
//! ## Example
//!
//! ```ignore
//! use stardust_engine::{ControlKey, ControlValue, Engine};
//!
//! let mut engine = Engine::new(backend);
//! engine.regenerate()?;
//!
//! // A slider drag: many live updates, one commit on release
//! engine.set_live(ControlKey::Radius, ControlValue::Number(6.0))?;
//! engine.set_live(ControlKey::Radius, ControlValue::Number(7.5))?;
//! engine.commit(ControlKey::Radius, ControlValue::Number(8.0))?;
//! ```

pub mod panel;
pub mod preset;
pub mod store;

#[cfg(feature = "preset-watcher")]
pub mod watch;

mod error;

use stardust_cloud::{CloudBackend, PointMaterial, SceneSlot};
use stardust_core::generator::{self, RandomSource};
use stardust_core::params::GenerationParameters;

// Re-export commonly used types from dependencies
pub use stardust_cloud::{FrameClock, SlotError};
pub use stardust_core::buffer::PointBuffer;
pub use stardust_core::color::Rgb;

// Re-export our own types
pub use error::EngineError;
pub use panel::{ControlSpec, controls};
pub use store::{ControlKey, ControlValue, ParameterStore};

#[cfg(feature = "preset-watcher")]
pub use watch::{PresetWatcher, WatchEvent};

/// The main Stardust engine
///
/// Generic over the display backend so tests run against a recording mock
/// while the preview window runs against the wgpu renderer.
pub struct Engine<B: CloudBackend> {
    /// Display backend (the render-engine boundary)
    backend: B,

    /// Current parameter snapshot plus panel update plumbing
    store: ParameterStore,

    /// Exclusive owner of the displayed cloud
    slot: SceneSlot<B>,

    /// Appearance of the displayed cloud
    material: PointMaterial,

    /// Number of completed generator runs
    regenerations: u64,
}

impl<B: CloudBackend> Engine<B> {
    /// Create an engine with the default galaxy parameters
    pub fn new(backend: B) -> Self {
        Self::with_parameters(backend, GenerationParameters::default())
    }

    /// Create an engine with an explicit parameter snapshot
    pub fn with_parameters(backend: B, params: GenerationParameters) -> Self {
        Self {
            backend,
            store: ParameterStore::new(params),
            slot: SceneSlot::new(),
            material: PointMaterial::default(),
            regenerations: 0,
        }
    }

    // ========================================================================
    // Parameter access
    // ========================================================================

    /// The current parameter snapshot
    pub fn parameters(&self) -> &GenerationParameters {
        self.store.parameters()
    }

    /// Read the stored value for one control
    pub fn live_value(&self, key: ControlKey) -> ControlValue {
        self.store.get(key)
    }

    pub fn material(&self) -> &PointMaterial {
        &self.material
    }

    pub fn material_mut(&mut self) -> &mut PointMaterial {
        &mut self.material
    }

    // ========================================================================
    // Commit protocol
    // ========================================================================

    /// Update a stored value without regenerating
    ///
    /// This is the path for intermediate drag values: readouts see the new
    /// value immediately, but no generator run happens.
    pub fn set_live(&mut self, key: ControlKey, value: ControlValue) -> Result<(), EngineError> {
        self.store.set(key, value)?;
        Ok(())
    }

    /// Update a stored value and regenerate exactly once
    ///
    /// On a validation failure the previously displayed cloud stays
    /// untouched.
    pub fn commit(&mut self, key: ControlKey, value: ControlValue) -> Result<(), EngineError> {
        self.store.set(key, value)?;
        self.regenerate()
    }

    /// Replace the whole snapshot and regenerate once (preset reload path)
    pub fn commit_parameters(
        &mut self,
        params: GenerationParameters,
    ) -> Result<(), EngineError> {
        self.store.set_parameters(params);
        self.regenerate()
    }

    // ========================================================================
    // Generation
    // ========================================================================

    /// Run the generator on the current snapshot and swap the displayed
    /// cloud, using the thread-local RNG
    pub fn regenerate(&mut self) -> Result<(), EngineError> {
        self.regenerate_with(&mut rand::rng())
    }

    /// Run the generator with an explicit randomness source
    pub fn regenerate_with(&mut self, rng: &mut impl RandomSource) -> Result<(), EngineError> {
        let params = self.store.snapshot();
        let buffer = generator::generate_with(&params, rng)?;

        tracing::debug!(points = buffer.point_count(), "regenerating displayed cloud");

        self.slot.replace(&mut self.backend, &buffer, &self.material)?;
        self.regenerations += 1;
        Ok(())
    }

    // ========================================================================
    // Display access
    // ========================================================================

    /// Whether a cloud is currently displayed
    pub fn has_cloud(&self) -> bool {
        self.slot.is_occupied()
    }

    /// Handle of the displayed cloud, if any
    pub fn cloud(&self) -> Option<&B::Cloud> {
        self.slot.current()
    }

    /// Number of completed generator runs over the engine's lifetime
    pub fn regeneration_count(&self) -> u64 {
        self.regenerations
    }

    /// Release the displayed cloud's resources
    pub fn teardown(&mut self) {
        self.slot.teardown(&mut self.backend);
    }

    // ========================================================================
    // Access to underlying components (for advanced use)
    // ========================================================================

    /// Get a reference to the display backend
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Get a mutable reference to the display backend
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use stardust_cloud::SlotError;

    #[derive(Debug, Default)]
    struct RecordingBackend {
        uploads: usize,
        removals: usize,
        last_count: usize,
    }

    impl CloudBackend for RecordingBackend {
        type Cloud = usize;

        fn upload(
            &mut self,
            buffer: &PointBuffer,
            _material: &PointMaterial,
        ) -> Result<usize, SlotError> {
            self.uploads += 1;
            self.last_count = buffer.point_count();
            Ok(buffer.point_count())
        }

        fn remove(&mut self, _cloud: usize) {
            self.removals += 1;
        }
    }

    fn small_engine() -> Engine<RecordingBackend> {
        Engine::with_parameters(
            RecordingBackend::default(),
            GenerationParameters::default().with_count(500),
        )
    }

    #[test]
    fn test_new_engine_has_no_cloud() {
        let engine = small_engine();
        assert!(!engine.has_cloud());
        assert_eq!(engine.regeneration_count(), 0);
    }

    #[test]
    fn test_regenerate_uploads_current_count() {
        let mut engine = small_engine();
        engine.regenerate().unwrap();
        assert!(engine.has_cloud());
        assert_eq!(engine.backend().last_count, 500);
    }

    #[test]
    fn test_set_live_does_not_regenerate() {
        let mut engine = small_engine();
        engine.regenerate().unwrap();

        engine.set_live(ControlKey::Count, ControlValue::Number(900.0)).unwrap();
        engine.set_live(ControlKey::Count, ControlValue::Number(1000.0)).unwrap();

        // Stored value updated, displayed cloud untouched
        assert_eq!(engine.parameters().count, 1000);
        assert_eq!(engine.regeneration_count(), 1);
        assert_eq!(engine.backend().last_count, 500);
    }

    #[test]
    fn test_commit_regenerates_exactly_once() {
        let mut engine = small_engine();
        engine.regenerate().unwrap();

        engine.commit(ControlKey::Count, ControlValue::Number(800.0)).unwrap();

        assert_eq!(engine.regeneration_count(), 2);
        assert_eq!(engine.backend().last_count, 800);
        assert_eq!(engine.backend().uploads, 2);
        assert_eq!(engine.backend().removals, 1);
    }

    #[test]
    fn test_failed_commit_leaves_cloud_untouched() {
        let mut engine = small_engine();
        engine.regenerate().unwrap();

        let result = engine.commit(ControlKey::Count, ControlValue::Number(0.0));
        assert!(matches!(result, Err(EngineError::Generation(_))));

        // The previous cloud is still displayed and was never released
        assert!(engine.has_cloud());
        assert_eq!(engine.backend().removals, 0);
        assert_eq!(engine.regeneration_count(), 1);
    }

    #[test]
    fn test_teardown_releases_cloud() {
        let mut engine = small_engine();
        engine.regenerate().unwrap();
        engine.teardown();

        assert!(!engine.has_cloud());
        assert_eq!(engine.backend().removals, 1);

        // Idempotent
        engine.teardown();
        assert_eq!(engine.backend().removals, 1);
    }
}
