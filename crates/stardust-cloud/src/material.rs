//! Appearance settings for a displayed point cloud

use stardust_core::color::Rgb;

/// How a point cloud is drawn, independent of its geometry
#[derive(Debug, Clone, PartialEq)]
pub struct PointMaterial {
    /// Base sprite size in pixels; multiplied by each point's scale
    pub point_size: f32,
    /// Additive blending gives the bright galactic-core look; disabling it
    /// falls back to plain alpha blending
    pub additive: bool,
    /// Clear color behind the cloud
    pub background: Rgb,
}

impl Default for PointMaterial {
    fn default() -> Self {
        Self {
            point_size: 6.0,
            additive: true,
            background: Rgb::BLACK,
        }
    }
}

impl PointMaterial {
    pub fn with_point_size(mut self, size: f32) -> Self {
        self.point_size = size;
        self
    }

    pub fn with_additive(mut self, additive: bool) -> Self {
        self.additive = additive;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_material() {
        let material = PointMaterial::default();
        assert!(material.additive);
        assert!(material.point_size > 0.0);
    }

    #[test]
    fn test_builder() {
        let material = PointMaterial::default().with_point_size(2.0).with_additive(false);
        assert_eq!(material.point_size, 2.0);
        assert!(!material.additive);
    }
}
