//! CPU-side point cloud storage
//!
//! A [`PointBuffer`] holds three parallel flat arrays: positions (three
//! floats per point), colors (three floats per point), and scales (one
//! float per point). All three always describe the same point count.

use crate::color::Rgb;
use glam::Vec3;

/// Number of floats per position entry
pub const POSITION_STRIDE: usize = 3;
/// Number of floats per color entry
pub const COLOR_STRIDE: usize = 3;
/// Number of floats per scale entry
pub const SCALE_STRIDE: usize = 1;

/// Flat parallel arrays describing a point cloud
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointBuffer {
    positions: Vec<f32>,
    colors: Vec<f32>,
    scales: Vec<f32>,
}

impl PointBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty buffer with capacity reserved for `count` points
    pub fn with_capacity(count: usize) -> Self {
        Self {
            positions: Vec::with_capacity(count * POSITION_STRIDE),
            colors: Vec::with_capacity(count * COLOR_STRIDE),
            scales: Vec::with_capacity(count * SCALE_STRIDE),
        }
    }

    /// Append one point, keeping all three arrays in lockstep
    pub fn push(&mut self, position: Vec3, color: Rgb, scale: f32) {
        self.positions.extend_from_slice(&position.to_array());
        self.colors.extend_from_slice(&color.to_array());
        self.scales.push(scale);
    }

    /// Number of points described by the buffer
    pub fn point_count(&self) -> usize {
        self.positions.len() / POSITION_STRIDE
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Flat position data, stride 3
    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    /// Flat color data, stride 3
    pub fn colors(&self) -> &[f32] {
        &self.colors
    }

    /// Flat per-point scale data, stride 1
    pub fn scales(&self) -> &[f32] {
        &self.scales
    }

    /// Position of point `i`
    pub fn position(&self, i: usize) -> Vec3 {
        let base = i * POSITION_STRIDE;
        Vec3::new(
            self.positions[base],
            self.positions[base + 1],
            self.positions[base + 2],
        )
    }

    /// Color of point `i`
    pub fn color(&self, i: usize) -> Rgb {
        let base = i * COLOR_STRIDE;
        Rgb::new(self.colors[base], self.colors[base + 1], self.colors[base + 2])
    }

    /// Check the parallel-array invariant: every array length is an exact
    /// multiple of its stride and all arrays agree on the point count
    pub fn is_consistent(&self) -> bool {
        self.positions.len() % POSITION_STRIDE == 0
            && self.colors.len() % COLOR_STRIDE == 0
            && self.positions.len() / POSITION_STRIDE == self.colors.len() / COLOR_STRIDE
            && self.positions.len() / POSITION_STRIDE == self.scales.len() / SCALE_STRIDE
    }

    /// True if every stored value is finite
    pub fn is_finite(&self) -> bool {
        self.positions.iter().all(|v| v.is_finite())
            && self.colors.iter().all(|v| v.is_finite())
            && self.scales.iter().all(|v| v.is_finite())
    }
}
