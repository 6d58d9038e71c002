//! CPU mirror of the vertex stage, for validating what shaders receive.
//!
//! Shaders combine a per-instance [`AffineMatrix`] with a view-projection
//! matrix supplied by the caller. [`clip_from_view_projection()`] performs the
//! same `f32` arithmetic so that it can be compared against
//! [`Motor::transform_and_project()`](crate::pga::Motor::transform_and_project).

use cgmath::Matrix4;

use crate::matrix::AffineMatrix;
use crate::{GpuFloat, Point3};

/// Returns the clip-space position of a model-space point, computed the way
/// the vertex stage does: `view_proj * model * p`.
pub fn clip_from_view_projection(
    view_proj: &Matrix4<GpuFloat>,
    instance: &AffineMatrix,
    p: Point3,
) -> cgmath::Vector4<GpuFloat> {
    let model_space = cgmath::Vector4::new(p.x as GpuFloat, p.y as GpuFloat, p.z as GpuFloat, 1.0);
    *view_proj * (instance.to_mat4() * model_space)
}

#[cfg(test)]
mod tests {
    use cgmath::SquareMatrix;

    use super::*;
    use crate::pga::Motor;
    use crate::projection::Projection;
    use crate::{Float, Vector3};

    #[test]
    fn test_matrix_path_matches_motor_path() {
        let camera = Motor::from_rotation_translation(
            Motor::from_axis_angle(Vector3::unit_y(), 0.3).unwrap(),
            Vector3::new(0.0, 1.0, -10.0),
        );
        let object = Motor::from_rotation_translation(
            Motor::from_axis_angle(Vector3::new(1.0, 1.0, 1.0), 1.2).unwrap(),
            Vector3::new(0.5, -0.5, 2.0),
        );
        let projection = Projection::with_aspect_ratio(16.0 / 9.0, 1.0, 1.0, 100.0, 0.1);

        // Scalar path: one motor from model space to view space.
        let model_view = camera.reverse() * object;
        // Matrix path: the view matrix is the inverse of the camera pose.
        let view_proj = projection.to_matrix() * camera.to_inverse_affine_matrix().to_mat4();
        let instance = object.to_affine_matrix();

        for p in [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(-0.5, 2.0, 0.25),
        ] {
            let expected = model_view.transform_and_project(&projection, p);
            let actual = clip_from_view_projection(&view_proj, &instance, p);
            let actual_coords: [GpuFloat; 4] = actual.into();
            let expected_coords: [Float; 4] = expected.into();
            for (a, b) in std::iter::zip(actual_coords, expected_coords) {
                assert!((a as Float - b).abs() < 1e-4, "{actual:?} vs {expected:?}");
            }
        }
    }

    #[test]
    fn test_identity_matrices_pass_points_through() {
        let clip = clip_from_view_projection(
            &Matrix4::identity(),
            &AffineMatrix::IDENT,
            Point3::new(1.0, 2.0, 3.0),
        );
        assert_eq!(clip, cgmath::Vector4::new(1.0, 2.0, 3.0, 1.0));
    }
}
