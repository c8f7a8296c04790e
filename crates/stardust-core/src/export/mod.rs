//! Point-cloud export
//!
//! Generated clouds export as ASCII PLY, the common interchange format for
//! point data (MeshLab, CloudCompare, Blender all read it).

mod ply;

pub use ply::export_ply;
