use std::fmt;
use std::ops::{Mul, MulAssign, Neg};

use approx::AbsDiffEq;
use cgmath::{EuclideanSpace, InnerSpace};

use super::Bivector;
use crate::matrix::AffineMatrix;
use crate::projection::Projection;
use crate::{Float, GpuFloat, Point3, Vector3, Vector4, approx_cmp, util};

/// Element of the even subalgebra of 3D projective geometric algebra,
/// representing a rigid motion (rotation plus translation).
///
/// `r` and `-r` represent the same transformation. Most operations assume a
/// unit motor: one with `s² + yz² + zx² + xy² = 1` that also satisfies the
/// Study condition `s·ixyz + yz·ix + zx·iy + xy·iz = 0`. Composition, the
/// exponential map, and the constructors all preserve these up to rounding;
/// use [`Motor::normalize()`] to clean up accumulated error.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Motor {
    /// Scalar term.
    pub s: Float,
    /// Rotational term in the plane perpendicular to X.
    pub yz: Float,
    /// Rotational term in the plane perpendicular to Y.
    pub zx: Float,
    /// Rotational term in the plane perpendicular to Z.
    pub xy: Float,
    /// Translational term along X.
    pub ix: Float,
    /// Translational term along Y.
    pub iy: Float,
    /// Translational term along Z.
    pub iz: Float,
    /// Pseudoscalar term.
    pub ixyz: Float,
}

impl Default for Motor {
    fn default() -> Self {
        Self::IDENT
    }
}

impl fmt::Display for Motor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        super::display_terms(
            f,
            &[
                (self.s, ""),
                (self.yz, "yz"),
                (self.zx, "zx"),
                (self.xy, "xy"),
                (self.ix, "ix"),
                (self.iy, "iy"),
                (self.iz, "iz"),
                (self.ixyz, "ixyz"),
            ],
        )
    }
}

impl From<Bivector> for Motor {
    /// Embeds a bivector in the even subalgebra, with zero scalar and
    /// pseudoscalar terms. The result is not a unit motor.
    fn from(b: Bivector) -> Self {
        Self::new(0.0, b.yz, b.zx, b.xy, b.ix, b.iy, b.iz, 0.0)
    }
}

impl Motor {
    /// Identity motor.
    pub const IDENT: Self = Self::new(1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0);

    /// Constructs a motor from its eight coefficients.
    pub const fn new(
        s: Float,
        yz: Float,
        zx: Float,
        xy: Float,
        ix: Float,
        iy: Float,
        iz: Float,
        ixyz: Float,
    ) -> Self {
        Self {
            s,
            yz,
            zx,
            xy,
            ix,
            iy,
            iz,
            ixyz,
        }
    }
    /// Constructs a motor representing a translation by `delta`.
    pub fn from_translation(delta: Vector3) -> Self {
        let half = delta * 0.5;
        Self::new(1.0, 0.0, 0.0, 0.0, half.x, half.y, half.z, 0.0)
    }
    /// Constructs a motor representing a rotation by `angle` radians about an
    /// axis through the origin, counterclockwise when looking down the axis.
    ///
    /// Returns `None` if `axis` is zero or subnormal.
    pub fn from_axis_angle(axis: Vector3, angle: Float) -> Option<Self> {
        // Rescale by the largest component first so that the magnitude of a
        // tiny axis does not underflow.
        let largest = axis.x.abs().max(axis.y.abs()).max(axis.z.abs());
        let axis = util::try_div(axis, largest)?;
        let axis = axis / axis.magnitude();
        let (sin, cos) = (angle / 2.0).sin_cos();
        let r = axis * sin;
        Some(Self::new(cos, r.x, r.y, r.z, 0.0, 0.0, 0.0, 0.0))
    }
    /// Constructs a motor that applies `rotation` and then translates by
    /// `delta`.
    pub fn from_rotation_translation(rotation: Self, delta: Vector3) -> Self {
        Self::from_translation(delta) * rotation
    }

    /// Returns the motor that applies `b` and then `a`.
    ///
    /// This is the geometric product `a * b`. It is associative but not
    /// commutative.
    pub fn compose(a: Self, b: Self) -> Self {
        Self {
            s: a.s * b.s - a.yz * b.yz - a.zx * b.zx - a.xy * b.xy,
            yz: a.s * b.yz + a.yz * b.s + a.zx * b.xy - a.xy * b.zx,
            zx: a.s * b.zx - a.yz * b.xy + a.zx * b.s + a.xy * b.yz,
            xy: a.s * b.xy + a.yz * b.zx - a.zx * b.yz + a.xy * b.s,

            ix: (a.s * b.ix + a.yz * b.ixyz + a.zx * b.iz - a.xy * b.iy)
                + (a.ixyz * b.yz + a.ix * b.s + a.iy * b.xy - a.iz * b.zx),
            iy: (a.s * b.iy - a.yz * b.iz + a.zx * b.ixyz + a.xy * b.ix)
                + (a.ixyz * b.zx - a.ix * b.xy + a.iy * b.s + a.iz * b.yz),
            iz: (a.s * b.iz + a.yz * b.iy - a.zx * b.ix + a.xy * b.ixyz)
                + (a.ixyz * b.xy + a.ix * b.zx - a.iy * b.yz + a.iz * b.s),
            ixyz: (a.s * b.ixyz - a.yz * b.ix - a.zx * b.iy - a.xy * b.iz)
                + (a.ixyz * b.s - a.ix * b.yz - a.iy * b.zx - a.iz * b.xy),
        }
    }

    /// Returns the reverse of the motor, which negates every bivector term.
    ///
    /// For unit motors this is the inverse transformation.
    #[must_use]
    pub fn reverse(self) -> Self {
        Self::new(
            self.s, -self.yz, -self.zx, -self.xy, -self.ix, -self.iy, -self.iz, self.ixyz,
        )
    }
    /// Returns the inverse of a unit motor. This is the same as
    /// [`Self::reverse()`].
    #[must_use]
    pub fn inverse(self) -> Self {
        self.reverse()
    }

    /// Returns the rotational bivector terms `(yz, zx, xy)`.
    pub fn rotational(self) -> Vector3 {
        Vector3::new(self.yz, self.zx, self.xy)
    }
    /// Returns the translational bivector terms `(ix, iy, iz)`.
    pub fn translational(self) -> Vector3 {
        Vector3::new(self.ix, self.iy, self.iz)
    }
    /// Returns `s² + yz² + zx² + xy²`, which is `1` for a unit motor.
    pub fn rotational_norm_squared(self) -> Float {
        self.s * self.s + self.rotational().magnitude2()
    }
    /// Returns `s·ixyz + yz·ix + zx·iy + xy·iz`, which is `0` for every motor
    /// that represents a rigid motion.
    pub fn study_residual(self) -> Float {
        self.s * self.ixyz + self.rotational().dot(self.translational())
    }

    /// Returns the displacement of the origin under the motor.
    pub fn translation(self) -> Vector3 {
        let r = self.rotational();
        let d = self.translational();
        (d * self.s - r * self.ixyz + r.cross(d)) * 2.0
    }
    /// Returns the rotation angle of the motor in radians, between `0` and
    /// `π`.
    pub fn rotation_angle(self) -> Float {
        self.rotational().magnitude().atan2(self.s.abs()) * 2.0
    }

    /// Rescales the motor so that the rotational part has unit magnitude and
    /// projects out any violation of the Study condition, or returns `None` if
    /// the rotational part is zero.
    #[must_use]
    pub fn normalize(self) -> Option<Self> {
        let m = util::try_div(self, self.rotational_norm_squared().sqrt())?;
        let residual = m.study_residual();
        Some(Self {
            ixyz: m.ixyz - residual * m.s,
            ix: m.ix - residual * m.yz,
            iy: m.iy - residual * m.zx,
            iz: m.iz - residual * m.xy,
            ..m
        })
    }
    /// Chooses the sign of the motor that [`Self::log()`] takes the logarithm
    /// of.
    ///
    /// Usually this is the sign that makes `s` positive. When `s` is
    /// approximately zero (a half turn), the sign is chosen to make the first
    /// approximately nonzero rotational term positive, or the first
    /// approximately nonzero translational term if the motor has no rotational
    /// part.
    #[must_use]
    pub fn canonicalize(self) -> Self {
        if approx_cmp::is_approx_nonzero(&self.s) {
            return if self.s < 0.0 { -self } else { self };
        }
        let rotational_sign = approx_cmp::sign_of_first_nonzero([self.yz, self.zx, self.xy]);
        let sign = rotational_sign
            .or_else(|| approx_cmp::sign_of_first_nonzero([self.ix, self.iy, self.iz]))
            .unwrap_or(1.0);
        log::trace!("choosing sign {sign} for half-turn motor {self}");
        self * sign
    }

    /// Returns the bivector whose exponential is the motor, taking the
    /// shortest path.
    ///
    /// The motor should be a unit motor. The result's [`Bivector::angle()`] is
    /// at most `π/2`; see [`Self::canonicalize()`] for how ties are broken.
    pub fn log(self) -> Bivector {
        let m = self.canonicalize();
        let r = m.rotational();

        // After canonicalization `theta` is between 0 and π/2, so `sinc` is at
        // least 2/π.
        let theta = r.magnitude().atan2(m.s);
        let sinc = util::sinc(theta);

        let u = r / sinc;
        let coupling = -m.ixyz / sinc;
        let v = (m.translational() - u * (coupling * util::screw_coefficient(theta))) / sinc;

        Bivector::from_parts(u, v)
    }
    /// Takes a real power of the motor by scaling its logarithm.
    pub fn powf(self, t: Float) -> Self {
        (self.log() * t).exp()
    }
    /// Interpolates between two motors along the screw motion from `a` to
    /// `b`, returning `a` at `t = 0` and `b` (up to sign) at `t = 1`.
    pub fn interpolate(a: Self, b: Self, t: Float) -> Self {
        a * (a.reverse() * b).powf(t)
    }

    /// Transforms an object using the motor.
    pub fn transform<T: TransformByMotor>(&self, obj: &T) -> T {
        obj.transform_by(self)
    }
    /// Rotates a vector using the motor, ignoring translation.
    ///
    /// See also [`Self::transform_point()`].
    pub fn transform_vector(&self, v: Vector3) -> Vector3 {
        let r = self.rotational();
        let t = r.cross(v);
        v + (t * self.s + r.cross(t)) * 2.0
    }
    /// Transforms a point using the motor.
    ///
    /// See also [`Self::transform_vector()`].
    pub fn transform_point(&self, p: Point3) -> Point3 {
        Point3::from_vec(self.transform_vector(p.to_vec()) + self.translation())
    }
    /// Transforms a point using the motor and then projects it into clip
    /// space.
    pub fn transform_and_project(&self, projection: &Projection, p: Point3) -> Vector4 {
        projection.project(self.transform_point(p))
    }

    /// Returns the rows of the 3×3 rotation matrix of a unit motor.
    fn rotation_rows(self) -> [[Float; 3]; 3] {
        let Self { s, yz: x, zx: y, xy: z, .. } = self;
        [
            [
                1.0 - 2.0 * (y * y + z * z),
                2.0 * (x * y - s * z),
                2.0 * (x * z + s * y),
            ],
            [
                2.0 * (x * y + s * z),
                1.0 - 2.0 * (x * x + z * z),
                2.0 * (y * z - s * x),
            ],
            [
                2.0 * (x * z - s * y),
                2.0 * (y * z + s * x),
                1.0 - 2.0 * (x * x + y * y),
            ],
        ]
    }
    /// Returns the affine matrix of a unit motor, for use by shaders.
    ///
    /// The result is only meaningful for unit motors.
    pub fn to_affine_matrix(self) -> AffineMatrix {
        let t = self.translation();
        let [r0, r1, r2] = self.rotation_rows();
        let row = |r: [Float; 3], t: Float| {
            [r[0], r[1], r[2], t].map(|x| x as GpuFloat)
        };
        AffineMatrix {
            rows: [row(r0, t.x), row(r1, t.y), row(r2, t.z)],
        }
    }
    /// Returns the affine matrix of the inverse of a unit motor.
    pub fn to_inverse_affine_matrix(self) -> AffineMatrix {
        self.reverse().to_affine_matrix()
    }

    fn coefs(self) -> [Float; 8] {
        [
            self.s, self.yz, self.zx, self.xy, self.ix, self.iy, self.iz, self.ixyz,
        ]
    }
    fn map(self, f: impl Fn(Float) -> Float) -> Self {
        let [s, yz, zx, xy, ix, iy, iz, ixyz] = self.coefs().map(f);
        Self::new(s, yz, zx, xy, ix, iy, iz, ixyz)
    }
}

impl Mul for Motor {
    type Output = Motor;

    fn mul(self, rhs: Self) -> Self::Output {
        Motor::compose(self, rhs)
    }
}
impl Mul<Float> for Motor {
    type Output = Motor;

    fn mul(self, rhs: Float) -> Self::Output {
        self.map(|x| x * rhs)
    }
}
impl Neg for Motor {
    type Output = Motor;

    /// Negates the coefficients of the motor. It still represents the same
    /// transformation.
    fn neg(self) -> Self::Output {
        self.map(|x| -x)
    }
}

impl_forward_bin_ops_to_value! {
    impl Mul for Motor { fn mul() }
}
impl_assign_ops_from_bin_ops! {
    impl MulAssign<Motor> for Motor { fn mul_assign() = mul }
    impl MulAssign<Float> for Motor { fn mul_assign() = mul }
}

impl AbsDiffEq for Motor {
    type Epsilon = Float;

    fn default_epsilon() -> Self::Epsilon {
        crate::EPSILON
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        std::iter::zip(self.coefs(), other.coefs()).all(|(a, b)| a.abs_diff_eq(&b, epsilon))
    }
}

/// Trait for types that can be transformed by a motor.
pub trait TransformByMotor {
    /// Transform the object by the motor `m`.
    fn transform_by(&self, m: &Motor) -> Self;
}

impl TransformByMotor for Point3 {
    fn transform_by(&self, m: &Motor) -> Self {
        m.transform_point(*self)
    }
}

impl TransformByMotor for Vector3 {
    fn transform_by(&self, m: &Motor) -> Self {
        m.transform_vector(*self)
    }
}

impl TransformByMotor for Motor {
    /// Conjugates the motor, moving the motion it represents into the frame
    /// of `m`.
    fn transform_by(&self, m: &Motor) -> Self {
        *m * *self * m.reverse()
    }
}

impl TransformByMotor for Bivector {
    /// Moves the screw axis of the bivector by `m`.
    fn transform_by(&self, m: &Motor) -> Self {
        let product = *m * Motor::from(*self) * m.reverse();
        Bivector::new(
            product.yz, product.zx, product.xy, product.ix, product.iy, product.iz,
        )
    }
}

impl<T: TransformByMotor> TransformByMotor for Vec<T> {
    fn transform_by(&self, m: &Motor) -> Self {
        self.iter().map(|obj| m.transform(obj)).collect()
    }
}

impl<T: TransformByMotor> TransformByMotor for Option<T> {
    fn transform_by(&self, m: &Motor) -> Self {
        self.as_ref().map(|inner| inner.transform_by(m))
    }
}

macro_rules! impl_transform_by_motor_for_tuple {
    ($($generic_param:ident),+; $($index:tt),+) => {
        impl<$($generic_param: TransformByMotor,)+> TransformByMotor for ($($generic_param,)+) {
            fn transform_by(&self, m: &Motor) -> Self {
                ($(self.$index.transform_by(m),)+)
            }
        }
    };
}
impl_transform_by_motor_for_tuple!(T0, T1; 0, 1);
impl_transform_by_motor_for_tuple!(T0, T1, T2; 0, 1, 2);
impl_transform_by_motor_for_tuple!(T0, T1, T2, T3; 0, 1, 2, 3);
