//! The scene slot: exclusive ownership of the single displayed cloud
//!
//! A [`SceneSlot`] holds at most one uploaded cloud at a time. `replace`
//! releases the previous cloud's GPU resources BEFORE uploading the new
//! one, which bounds peak GPU memory to roughly one generation's worth of
//! buffers instead of two.

use crate::material::PointMaterial;
use stardust_core::buffer::PointBuffer;
use thiserror::Error;

/// Errors surfaced by a display backend
#[derive(Error, Debug)]
pub enum SlotError {
    /// The backend could not allocate GPU-side resources
    #[error("GPU resource creation failed: {0}")]
    ResourceCreation(String),

    /// The buffer handed to the backend violates its stride invariants
    #[error("Inconsistent point buffer: {0}")]
    InconsistentBuffer(String),
}

/// The capability surface Stardust requires of a rendering engine
///
/// `upload` turns a CPU-side buffer into whatever handle the backend uses
/// for a displayed cloud (GPU buffers plus a scene object); `remove`
/// releases that handle's resources. The engine never sees anything else
/// of the backend's internal representation.
pub trait CloudBackend {
    /// Backend-specific handle owning the displayed cloud's resources
    type Cloud;

    /// Create GPU resources for `buffer` and insert the cloud into the scene
    fn upload(
        &mut self,
        buffer: &PointBuffer,
        material: &PointMaterial,
    ) -> Result<Self::Cloud, SlotError>;

    /// Remove the cloud from the scene and release its resources
    fn remove(&mut self, cloud: Self::Cloud);
}

/// Holder of the single displayed cloud
pub struct SceneSlot<B: CloudBackend> {
    current: Option<B::Cloud>,
}

impl<B: CloudBackend> Default for SceneSlot<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: CloudBackend> SceneSlot<B> {
    pub fn new() -> Self {
        Self { current: None }
    }

    /// Swap the displayed cloud for a freshly generated buffer
    ///
    /// The old cloud is released first. If the upload fails the slot is
    /// left empty, never half-populated, and the error is returned.
    pub fn replace(
        &mut self,
        backend: &mut B,
        buffer: &PointBuffer,
        material: &PointMaterial,
    ) -> Result<(), SlotError> {
        if let Some(old) = self.current.take() {
            backend.remove(old);
        }
        self.current = Some(backend.upload(buffer, material)?);
        Ok(())
    }

    /// Release the displayed cloud, leaving the slot empty
    ///
    /// Idempotent: a second call is a no-op.
    pub fn teardown(&mut self, backend: &mut B) {
        if let Some(old) = self.current.take() {
            backend.remove(old);
        }
    }

    pub fn is_occupied(&self) -> bool {
        self.current.is_some()
    }

    /// The displayed cloud's handle, if any
    pub fn current(&self) -> Option<&B::Cloud> {
        self.current.as_ref()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use stardust_core::color::Rgb;
    use stardust_core::prelude::Vec3;

    /// Backend that counts uploads and removals instead of touching a GPU
    #[derive(Debug, Default)]
    struct CountingBackend {
        uploads: usize,
        removals: usize,
        live: usize,
        fail_next_upload: bool,
    }

    impl CloudBackend for CountingBackend {
        type Cloud = usize;

        fn upload(
            &mut self,
            buffer: &PointBuffer,
            _material: &PointMaterial,
        ) -> Result<usize, SlotError> {
            if self.fail_next_upload {
                self.fail_next_upload = false;
                return Err(SlotError::ResourceCreation("simulated".into()));
            }
            self.uploads += 1;
            self.live += 1;
            Ok(buffer.point_count())
        }

        fn remove(&mut self, _cloud: usize) {
            self.removals += 1;
            self.live -= 1;
        }
    }

    fn tiny_buffer(points: usize) -> PointBuffer {
        let mut buffer = PointBuffer::with_capacity(points);
        for i in 0..points {
            buffer.push(Vec3::splat(i as f32), Rgb::WHITE, 1.0);
        }
        buffer
    }

    #[test]
    fn test_replace_twice_leaves_exactly_one_cloud() {
        let mut backend = CountingBackend::default();
        let mut slot = SceneSlot::new();
        let material = PointMaterial::default();

        slot.replace(&mut backend, &tiny_buffer(3), &material).unwrap();
        slot.replace(&mut backend, &tiny_buffer(5), &material).unwrap();

        assert_eq!(backend.live, 1);
        assert_eq!(backend.uploads, 2);
        // The first cloud was released exactly once
        assert_eq!(backend.removals, 1);
        assert_eq!(slot.current().copied(), Some(5));
    }

    #[test]
    fn test_failed_upload_leaves_slot_empty() {
        let mut backend = CountingBackend::default();
        let mut slot = SceneSlot::new();
        let material = PointMaterial::default();

        slot.replace(&mut backend, &tiny_buffer(3), &material).unwrap();

        backend.fail_next_upload = true;
        let result = slot.replace(&mut backend, &tiny_buffer(5), &material);

        assert!(matches!(result, Err(SlotError::ResourceCreation(_))));
        assert!(!slot.is_occupied());
        assert_eq!(backend.live, 0);
    }

    #[test]
    fn test_teardown_is_idempotent() {
        let mut backend = CountingBackend::default();
        let mut slot = SceneSlot::new();

        slot.replace(&mut backend, &tiny_buffer(2), &PointMaterial::default())
            .unwrap();

        slot.teardown(&mut backend);
        slot.teardown(&mut backend);

        assert_eq!(backend.removals, 1);
        assert!(!slot.is_occupied());
    }

    #[test]
    fn test_teardown_on_empty_slot_is_noop() {
        let mut backend = CountingBackend::default();
        let mut slot: SceneSlot<CountingBackend> = SceneSlot::new();
        slot.teardown(&mut backend);
        assert_eq!(backend.removals, 0);
    }
}
