//! Affine matrices exported for shaders.

use cgmath::{EuclideanSpace, Matrix4};

use crate::{Float, GpuFloat, Point3, Vector3};

/// Row-major 3×4 affine matrix: the top three rows of a 4×4 homogeneous
/// matrix whose implicit last row is `0 0 0 1`.
///
/// This is the layout of a GLSL `mat4x3` or three `vec4` vertex attributes.
/// The last column is the translation.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct AffineMatrix {
    /// Rows of the matrix.
    pub rows: [[GpuFloat; 4]; 3],
}

impl Default for AffineMatrix {
    fn default() -> Self {
        Self::IDENT
    }
}

impl AffineMatrix {
    /// Identity matrix.
    pub const IDENT: Self = Self {
        rows: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
        ],
    };

    /// Returns the translation column.
    pub fn translation(&self) -> Vector3 {
        let [r0, r1, r2] = self.rows;
        Vector3::new(r0[3] as Float, r1[3] as Float, r2[3] as Float)
    }

    /// Returns the full 4×4 homogeneous matrix, which `cgmath` stores in
    /// column-major order.
    pub fn to_mat4(&self) -> Matrix4<GpuFloat> {
        let [r0, r1, r2] = self.rows;
        #[rustfmt::skip]
        let ret = Matrix4::new(
            r0[0], r1[0], r2[0], 0.0,
            r0[1], r1[1], r2[1], 0.0,
            r0[2], r1[2], r2[2], 0.0,
            r0[3], r1[3], r2[3], 1.0,
        );
        ret
    }

    /// Transforms a point by the matrix.
    pub fn transform_point(&self, p: Point3) -> Point3 {
        let [x, y, z] = self.rows.map(|row| {
            let [a, b, c, d] = row.map(|x| x as Float);
            a * p.x + b * p.y + c * p.z + d
        });
        Point3::new(x, y, z)
    }
    /// Transforms a vector by the matrix, ignoring translation.
    pub fn transform_vector(&self, v: Vector3) -> Vector3 {
        self.transform_point(Point3::from_vec(v)) - self.transform_point(Point3::origin())
    }
}

impl From<AffineMatrix> for Matrix4<GpuFloat> {
    fn from(m: AffineMatrix) -> Self {
        m.to_mat4()
    }
}

#[cfg(test)]
mod tests {
    use cgmath::{InnerSpace, SquareMatrix, Transform};

    use super::*;
    use crate::pga::Motor;

    #[test]
    fn test_identity_export() {
        assert_eq!(Motor::IDENT.to_affine_matrix(), AffineMatrix::IDENT);
        assert_eq!(AffineMatrix::IDENT.to_mat4(), Matrix4::identity());
        assert_eq!(AffineMatrix::default(), AffineMatrix::IDENT);
    }

    #[test]
    fn test_mat4_is_column_major() {
        let m = Motor::from_translation(Vector3::new(1.0, 2.0, 3.0)).to_affine_matrix();
        let mat4 = m.to_mat4();
        // The translation lives in the last column.
        assert_eq!(mat4.w.x, 1.0);
        assert_eq!(mat4.w.y, 2.0);
        assert_eq!(mat4.w.z, 3.0);
        assert_eq!(mat4.w.w, 1.0);
        assert_eq!(mat4.x.w, 0.0);

        let p = mat4.transform_point(cgmath::Point3::new(1.0, 1.0, 1.0));
        assert_eq!(p, cgmath::Point3::new(2.0, 3.0, 4.0));
    }

    fn assert_close(a: Vector3, b: Vector3) {
        assert!((a - b).magnitude() < 1e-5, "{a:?} is not close to {b:?}");
    }

    #[test]
    fn test_matrix_matches_motor() {
        let m = Motor::from_rotation_translation(
            Motor::from_axis_angle(Vector3::new(1.0, -2.0, 0.5), 2.0).unwrap(),
            Vector3::new(-3.0, 0.25, 7.0),
        );
        let matrix = m.to_affine_matrix();
        assert_close(matrix.translation(), m.translation());
        for p in [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 2.0, 3.0),
            Point3::new(-5.0, 0.5, 2.0),
        ] {
            assert_close(m.transform_point(p).to_vec(), matrix.transform_point(p).to_vec());
        }

        let v = Vector3::new(0.0, 1.0, -1.0);
        assert_close(m.transform_vector(v), matrix.transform_vector(v));
    }

    #[test]
    fn test_inverse_matrix() {
        let m = Motor::from_rotation_translation(
            Motor::from_axis_angle(Vector3::unit_y(), 0.75).unwrap(),
            Vector3::new(2.0, -1.0, 4.0),
        );
        let product = m.to_affine_matrix().to_mat4() * m.to_inverse_affine_matrix().to_mat4();
        let cols: [[GpuFloat; 4]; 4] = product.into();
        let ident_cols: [[GpuFloat; 4]; 4] = Matrix4::<GpuFloat>::identity().into();
        for (col, ident_col) in std::iter::zip(cols, ident_cols) {
            for (x, y) in std::iter::zip(col, ident_col) {
                assert!((x - y).abs() < 1e-5, "{product:?}");
            }
        }
    }
}
