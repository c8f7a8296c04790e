//! Stardust Render - WGPU point-sprite renderer
//!
//! This crate is the wgpu implementation of the display boundary: it turns
//! generated point buffers into instanced camera-facing sprites and drives
//! the interactive preview window.
//!
//! ## Features
//!
//! - Instanced point-sprite rendering with additive blending
//! - Interactive orbit camera (orbit, pan, zoom)
//! - Keyboard parameter editing with the live/commit split
//! - Headless rendering to image files
//! - Preset hot reload
//!
//! ## Example
//!
//! ```rust,ignore
//! use stardust_render::{PreviewConfig, run_preview};
//!
//! run_preview(PreviewConfig::default(), params, None, None)?;
//! ```

pub mod camera;
pub mod cloud;
pub mod headless;
pub mod init;
pub mod window;

// Re-export wgpu for users who need texture formats, etc.
pub use wgpu;
pub use winit;

pub use camera::OrbitCamera;
pub use cloud::{CloudRenderer, GpuCloud, Uniforms};
pub use headless::render_image;
pub use init::{init_headless, init_with_surface};
pub use window::{PreviewConfig, controls_help, run_preview};
