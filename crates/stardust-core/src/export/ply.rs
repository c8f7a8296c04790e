//! ASCII PLY export for point clouds

use crate::Result;
use crate::buffer::PointBuffer;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Export a point buffer to ASCII PLY
///
/// Positions are written as float `x y z`, colors as uchar `red green blue`.
/// An empty buffer produces a valid zero-vertex file.
pub fn export_ply(buffer: &PointBuffer, path: &Path) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    // Header
    writeln!(writer, "ply")?;
    writeln!(writer, "format ascii 1.0")?;
    writeln!(writer, "comment Stardust point cloud")?;
    writeln!(writer, "element vertex {}", buffer.point_count())?;
    writeln!(writer, "property float x")?;
    writeln!(writer, "property float y")?;
    writeln!(writer, "property float z")?;
    writeln!(writer, "property uchar red")?;
    writeln!(writer, "property uchar green")?;
    writeln!(writer, "property uchar blue")?;
    writeln!(writer, "end_header")?;

    // One row per point
    for i in 0..buffer.point_count() {
        let p = buffer.position(i);
        let c = buffer.color(i);
        writeln!(
            writer,
            "{} {} {} {} {} {}",
            p.x,
            p.y,
            p.z,
            channel_byte(c.r),
            channel_byte(c.g),
            channel_byte(c.b)
        )?;
    }

    writer.flush()?;
    Ok(())
}

fn channel_byte(c: f32) -> u8 {
    (c.clamp(0.0, 1.0) * 255.0).round() as u8
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::color::Rgb;
    use glam::Vec3;

    #[test]
    fn test_export_writes_header_and_rows() {
        let mut buffer = PointBuffer::new();
        buffer.push(Vec3::new(1.0, 0.0, -2.5), Rgb::new(1.0, 0.0, 0.0), 0.5);
        buffer.push(Vec3::ZERO, Rgb::WHITE, 1.0);

        let path = std::env::temp_dir().join("stardust_test_export.ply");
        export_ply(&buffer, &path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("ply\nformat ascii 1.0\n"));
        assert!(contents.contains("element vertex 2"));
        assert!(contents.contains("1 0 -2.5 255 0 0"));
        assert!(contents.contains("0 0 0 255 255 255"));

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_export_empty_buffer() {
        let path = std::env::temp_dir().join("stardust_test_export_empty.ply");
        export_ply(&PointBuffer::new(), &path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("element vertex 0"));
        assert!(contents.trim_end().ends_with("end_header"));

        std::fs::remove_file(&path).ok();
    }
}
