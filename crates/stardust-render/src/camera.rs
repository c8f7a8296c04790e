//! Orbit camera for viewing the galaxy
//!
//! The camera orbits a target point using explicit spherical state
//! (yaw/pitch/distance), which keeps the pitch clamp trivial and avoids
//! re-deriving angles from a position every frame.

use glam::{Mat4, Vec3};

/// Pitch is kept just short of the poles so the view matrix stays stable
const PITCH_LIMIT: f32 = std::f32::consts::FRAC_PI_2 - 0.01;

/// An orbital camera around a target point
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    /// Point the camera orbits and looks at
    pub target: Vec3,
    /// Horizontal angle in radians
    pub yaw: f32,
    /// Vertical angle in radians, clamped short of straight up/down
    pub pitch: f32,
    /// Distance from the target
    pub distance: f32,
    /// Field of view in radians
    pub fov: f32,
    /// Aspect ratio (width / height)
    pub aspect: f32,
    /// Near clipping plane
    pub near: f32,
    /// Far clipping plane
    pub far: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            target: Vec3::ZERO,
            yaw: 0.5,
            pitch: 0.55,
            distance: 9.0,
            fov: 50.0_f32.to_radians(),
            aspect: 16.0 / 9.0,
            near: 0.05,
            far: 200.0,
        }
    }
}

impl OrbitCamera {
    pub fn new() -> Self {
        Self::default()
    }

    /// Camera position in world space
    pub fn position(&self) -> Vec3 {
        let offset = Vec3::new(
            self.pitch.cos() * self.yaw.sin(),
            self.pitch.sin(),
            self.pitch.cos() * self.yaw.cos(),
        );
        self.target + offset * self.distance
    }

    /// Get the view matrix (world to camera transform)
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), self.target, Vec3::Y)
    }

    /// Get the projection matrix
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far)
    }

    /// Get the combined view-projection matrix
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Orbit around the target
    ///
    /// - `delta_x`: Horizontal rotation (positive = rotate right)
    /// - `delta_y`: Vertical rotation (positive = look down from higher up)
    pub fn orbit(&mut self, delta_x: f32, delta_y: f32) {
        self.yaw -= delta_x;
        self.pitch = (self.pitch + delta_y).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    /// Zoom by scaling the orbit distance
    ///
    /// - `delta`: Positive = zoom in, negative = zoom out
    pub fn zoom(&mut self, delta: f32) {
        self.distance = (self.distance * (1.0 - delta * 0.1)).clamp(0.3, 120.0);
    }

    /// Pan the camera (move the target in the view plane)
    pub fn pan(&mut self, delta_x: f32, delta_y: f32) {
        let forward = (self.target - self.position()).normalize_or_zero();
        let right = forward.cross(Vec3::Y).normalize_or_zero();
        let up = right.cross(forward);
        self.target += right * delta_x + up * delta_y;
    }

    /// Reset to the default pose, preserving the aspect ratio
    pub fn reset(&mut self) {
        let aspect = self.aspect;
        *self = Self::default();
        self.aspect = aspect;
    }
}
