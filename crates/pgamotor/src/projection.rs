//! Perspective projection into clip space.

use cgmath::Matrix4;

use crate::{Float, GpuFloat, Point3, Vector4};

/// Perspective frustum looking down the +Z axis.
///
/// Points on the plane `z = near` map to depth 0 and points on the plane
/// `z = near + scale_z` map to depth 1. The visible region of the near plane
/// is `scale_x` wide and `scale_y` tall.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Projection {
    /// Horizontal scale of the frustum.
    pub scale_x: Float,
    /// Vertical scale of the frustum.
    pub scale_y: Float,
    /// Depth of the frustum.
    pub scale_z: Float,
    /// Distance from the eye to the near plane.
    pub near: Float,
}

impl Projection {
    /// Constructs a projection from its four parameters.
    pub fn new(scale_x: Float, scale_y: Float, scale_z: Float, near: Float) -> Self {
        Self {
            scale_x,
            scale_y,
            scale_z,
            near,
        }
    }
    /// Constructs a projection for a viewport with the given width-to-height
    /// ratio by shrinking the vertical scale.
    pub fn with_aspect_ratio(
        aspect_ratio: Float,
        scale_x: Float,
        scale_y: Float,
        scale_z: Float,
        near: Float,
    ) -> Self {
        Self::new(scale_x, scale_y / aspect_ratio, scale_z, near)
    }

    /// Returns the coefficient that scales depth.
    fn depth_scale(&self) -> Float {
        (self.near + self.scale_z) / self.scale_z
    }

    /// Projects a point in view space into homogeneous clip space.
    pub fn project(&self, p: Point3) -> Vector4 {
        Vector4::new(
            2.0 * self.near / self.scale_x * p.x,
            2.0 * self.near / self.scale_y * p.y,
            self.depth_scale() * (p.z - self.near),
            p.z,
        )
    }

    /// Returns the projection as a 4×4 matrix, which `cgmath` stores in
    /// column-major order.
    pub fn to_matrix(&self) -> Matrix4<GpuFloat> {
        let x = (2.0 * self.near / self.scale_x) as GpuFloat;
        let y = (2.0 * self.near / self.scale_y) as GpuFloat;
        let z = self.depth_scale() as GpuFloat;
        let w = (-self.depth_scale() * self.near) as GpuFloat;
        #[rustfmt::skip]
        let ret = Matrix4::new(
            x,   0.0, 0.0, 0.0,
            0.0, y,   0.0, 0.0,
            0.0, 0.0, z,   1.0,
            0.0, 0.0, w,   0.0,
        );
        ret
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn projection() -> Projection {
        Projection::new(2.0, 1.5, 100.0, 0.5)
    }

    #[test]
    fn test_depth_range() {
        let proj = projection();

        let near = proj.project(Point3::new(0.0, 0.0, proj.near));
        assert_approx_eq!(near.z / near.w, 0.0);

        let far = proj.project(Point3::new(0.0, 0.0, proj.near + proj.scale_z));
        assert_approx_eq!(far.z / far.w, 1.0);
    }

    #[test]
    fn test_project() {
        let clip = projection().project(Point3::new(1.0, -3.0, 4.0));
        assert_approx_eq!(clip.x, 0.5);
        assert_approx_eq!(clip.y, -2.0);
        assert_approx_eq!(clip.z, 100.5 / 100.0 * 3.5);
        assert_eq!(clip.w, 4.0);
    }

    #[test]
    fn test_matrix_matches_project() {
        let proj = projection();
        let p = Point3::new(0.25, 1.0, 7.0);
        let expected = proj.project(p);
        let actual = proj.to_matrix() * cgmath::Vector4::new(0.25, 1.0, 7.0, 1.0);
        let actual: [GpuFloat; 4] = actual.into();
        let expected: [Float; 4] = expected.into();
        for (a, b) in std::iter::zip(actual, expected) {
            assert!((a as Float - b).abs() < 1e-5);
        }
    }

    #[test]
    fn test_aspect_ratio() {
        let proj = Projection::with_aspect_ratio(2.0, 1.0, 1.0, 10.0, 0.1);
        assert_eq!(proj.scale_y, 0.5);
        assert_eq!(proj.scale_x, 1.0);
    }
}
