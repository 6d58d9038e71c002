//! Rigid-motion motors in 3D projective geometric algebra.
//!
//! A [`Motor`](pga::Motor) stores a rotation and translation in eight
//! coefficients and replaces 4×4 homogeneous matrices for object poses.
//! Motors compose with the geometric product, integrate velocities through
//! [`Bivector::exp()`](pga::Bivector::exp), interpolate through
//! [`Motor::log()`](pga::Motor::log), and export the affine matrices consumed
//! by the rendering pipeline.

pub use {approx, cgmath, num_traits as num};

/// Floating-point type used for geometry (either `f32` or `f64`).
pub type Float = f64;

/// Floating-point type used for data handed to the GPU.
pub type GpuFloat = f32;

/// Small floating-point value used for comparisons and tiny offsets.
pub const EPSILON: Float = 0.000001;

/// Three-dimensional point.
pub type Point3 = cgmath::Point3<Float>;
/// Three-dimensional vector.
pub type Vector3 = cgmath::Vector3<Float>;
/// Homogeneous four-component vector, used for clip-space coordinates.
pub type Vector4 = cgmath::Vector4<Float>;

/// Asserts that both arguments are approximately equal.
#[macro_export]
macro_rules! assert_approx_eq {
    ($a:expr, $b:expr $(,)?) => {
        $crate::approx::assert_abs_diff_eq!($a, $b, epsilon = $crate::EPSILON)
    };
    ($a:expr, $b:expr, epsilon = $epsilon:expr $(,)?) => {
        $crate::approx::assert_abs_diff_eq!($a, $b, epsilon = $epsilon)
    };
}

/// Asserts that two `cgmath` points or vectors are approximately equal,
/// component by component.
#[cfg(test)]
macro_rules! assert_coords_approx_eq {
    ($a:expr, $b:expr $(,)?) => {{
        let (a, b) = ($a, $b);
        assert!(
            $crate::approx_cmp::coords_approx_eq(a, b),
            "{a:?} is not approximately {b:?}",
        );
    }};
}

#[macro_use]
mod impl_macros;

pub mod approx_cmp;
#[cfg(feature = "bytemuck")]
pub mod gpu;
pub mod kinematics;
pub mod matrix;
pub mod pga;
pub mod pipeline;
pub mod projection;
pub mod util;

/// Structs, traits, and constants.
pub mod prelude {
    pub use crate::approx_cmp::*;
    pub use crate::kinematics::RigidBody;
    pub use crate::matrix::AffineMatrix;
    pub use crate::pga::{Bivector, Motor};
    pub use crate::projection::Projection;
    pub use crate::traits::*;
    pub use crate::{EPSILON, Float, GpuFloat, Point3, Vector3, Vector4, pga};
}
pub use prelude::*;

/// Traits only.
pub mod traits {
    pub use approx::AbsDiffEq;

    pub use crate::pga::TransformByMotor;
}
