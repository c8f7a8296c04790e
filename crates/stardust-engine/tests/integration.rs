//! Integration tests for the parameters to engine to backend pipeline

// Tests are allowed to use expect/unwrap for cleaner error messages
#![allow(clippy::expect_used)]
#![allow(clippy::unwrap_used)]

use rand::SeedableRng;
use rand::rngs::StdRng;
use stardust_cloud::{CloudBackend, PointMaterial, SlotError};
use stardust_core::params::GenerationParameters;
use stardust_engine::{ControlKey, ControlValue, Engine, EngineError, PointBuffer, preset};

/// Backend that keeps the uploaded buffers so tests can inspect them
#[derive(Debug, Default)]
struct CapturingBackend {
    uploads: Vec<PointBuffer>,
    removals: usize,
    reject_uploads: bool,
}

impl CloudBackend for CapturingBackend {
    type Cloud = PointBuffer;

    fn upload(
        &mut self,
        buffer: &PointBuffer,
        _material: &PointMaterial,
    ) -> Result<PointBuffer, SlotError> {
        if self.reject_uploads {
            return Err(SlotError::ResourceCreation("rejected by test".into()));
        }
        self.uploads.push(buffer.clone());
        Ok(buffer.clone())
    }

    fn remove(&mut self, _cloud: PointBuffer) {
        self.removals += 1;
    }
}

#[test]
fn drag_interaction_regenerates_once() {
    let mut engine = Engine::with_parameters(
        CapturingBackend::default(),
        GenerationParameters::default().with_count(200),
    );
    engine.regenerate().expect("Initial generation should succeed");

    // A drag produces many intermediate values and one final commit
    for radius in [4.0, 4.3, 4.7, 5.1, 5.6] {
        engine
            .set_live(ControlKey::Radius, ControlValue::Number(radius))
            .expect("Live update should succeed");
    }
    engine
        .commit(ControlKey::Radius, ControlValue::Number(6.0))
        .expect("Commit should succeed");

    // One initial run plus exactly one for the whole drag
    assert_eq!(engine.regeneration_count(), 2);
    assert_eq!(engine.backend().uploads.len(), 2);
    assert_eq!(engine.parameters().radius, 6.0);
}

#[test]
fn committed_buffer_reflects_parameters() {
    let mut engine = Engine::with_parameters(
        CapturingBackend::default(),
        GenerationParameters::default().with_count(150),
    );

    engine
        .commit(ControlKey::Count, ControlValue::Number(300.0))
        .expect("Commit should succeed");

    let uploaded = engine.backend().uploads.last().expect("Should have uploaded");
    assert_eq!(uploaded.point_count(), 300);
    assert_eq!(uploaded.positions().len(), 900);
    assert_eq!(uploaded.colors().len(), 900);
    assert!(uploaded.is_finite());
}

#[test]
fn failed_validation_keeps_previous_cloud() {
    let mut engine = Engine::with_parameters(
        CapturingBackend::default(),
        GenerationParameters::default().with_count(100),
    );
    engine.regenerate().expect("Initial generation should succeed");

    let result = engine.commit(ControlKey::Count, ControlValue::Number(0.0));
    assert!(matches!(result, Err(EngineError::Generation(_))));

    assert!(engine.has_cloud());
    assert_eq!(engine.backend().removals, 0);
    assert_eq!(
        engine.cloud().expect("Cloud should remain").point_count(),
        100
    );
}

#[test]
fn failed_upload_surfaces_error_and_empties_slot() {
    let mut engine = Engine::with_parameters(
        CapturingBackend::default(),
        GenerationParameters::default().with_count(100),
    );
    engine.regenerate().expect("Initial generation should succeed");

    engine.backend_mut().reject_uploads = true;
    let result = engine.commit(ControlKey::Branches, ControlValue::Number(5.0));

    assert!(matches!(result, Err(EngineError::Display(_))));
    assert!(!engine.has_cloud());
}

#[test]
fn seeded_commits_are_reproducible() {
    let params = GenerationParameters::default().with_count(250);

    let mut a = Engine::with_parameters(CapturingBackend::default(), params.clone());
    let mut b = Engine::with_parameters(CapturingBackend::default(), params);

    a.regenerate_with(&mut StdRng::seed_from_u64(99))
        .expect("Generation should succeed");
    b.regenerate_with(&mut StdRng::seed_from_u64(99))
        .expect("Generation should succeed");

    assert_eq!(a.backend().uploads, b.backend().uploads);
}

#[test]
fn preset_reload_is_one_commit() {
    let path = std::env::temp_dir().join("stardust_integration_preset.json");
    let tweaked = GenerationParameters::default().with_count(400).with_branches(6);
    preset::save(&tweaked, &path).expect("Preset should save");

    let mut engine = Engine::new(CapturingBackend::default());
    engine.regenerate().expect("Initial generation should succeed");

    let loaded = preset::load(&path).expect("Preset should load");
    engine
        .commit_parameters(loaded)
        .expect("Preset commit should succeed");

    assert_eq!(engine.regeneration_count(), 2);
    assert_eq!(engine.parameters().branches, 6);
    assert_eq!(
        engine.backend().uploads.last().expect("Should upload").point_count(),
        400
    );

    std::fs::remove_file(&path).ok();
}
