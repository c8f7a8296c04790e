//! # Stardust Core
//!
//! Parametric galaxy point clouds.
//!
//! Stardust generates spiral-galaxy point clouds from a small set of
//! tunable parameters: point count, radius, branch count, randomness
//! falloff, and a two-stop color ramp.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use stardust_core::prelude::*;
//!
//! // Generate a cloud with the default parameters
//! let params = GenerationParameters::default();
//! let cloud = generate(&params)?;
//!
//! // Export it as a PLY point cloud
//! export_ply(&cloud, Path::new("galaxy.ply"))?;
//! ```
//!
//! ## Units and Conventions
//!
//! - **Distances**: Arbitrary units. The default galaxy has radius `5.0`.
//! - **Angles**: Radians throughout
//! - **Precision**: `f32` everywhere for GPU compatibility
//! - **Coordinate system**: Right-handed, Y-up; the galactic plane is XZ

pub mod buffer;
pub mod color;
pub mod export;
pub mod generator;
pub mod params;

mod error;

pub use error::{Error, Result};

/// Prelude module for convenient imports
pub mod prelude {
    // Parameters
    pub use crate::params::GenerationParameters;

    // Colors
    pub use crate::color::Rgb;

    // Buffers and generation
    pub use crate::buffer::PointBuffer;
    pub use crate::generator::{RandomSource, generate, generate_with};

    // Export
    pub use crate::export::export_ply;

    // Math (re-export glam)
    pub use glam::{Vec2, Vec3};

    // Error handling
    pub use crate::{Error, Result};
}
