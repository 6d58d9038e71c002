use std::fmt;
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use approx::AbsDiffEq;
use cgmath::InnerSpace;

use super::Motor;
use crate::{Float, Vector3, util};

/// Screw-motion generator: the logarithm of a [`Motor`].
///
/// The rotational terms `yz`, `zx`, `xy` hold half the rotation about the X,
/// Y, and Z axes. The translational terms `ix`, `iy`, `iz` hold half the
/// displacement of the origin along each axis. The halves come from the
/// sandwich product, which applies a motor twice.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Bivector {
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
}

impl fmt::Display for Bivector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        super::display_terms(
            f,
            &[
                (self.yz, "yz"),
                (self.zx, "zx"),
                (self.xy, "xy"),
                (self.ix, "ix"),
                (self.iy, "iy"),
                (self.iz, "iz"),
            ],
        )
    }
}

impl Bivector {
    /// Zero bivector, whose exponential is the identity motor.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0, 0.0, 0.0, 0.0);

    /// Constructs a bivector from its rotational and translational terms.
    pub const fn new(yz: Float, zx: Float, xy: Float, ix: Float, iy: Float, iz: Float) -> Self {
        Self {
            yz,
            zx,
            xy,
            ix,
            iy,
            iz,
        }
    }
    /// Constructs a bivector from its rotational and translational parts.
    pub fn from_parts(rotational: Vector3, translational: Vector3) -> Self {
        Self::new(
            rotational.x,
            rotational.y,
            rotational.z,
            translational.x,
            translational.y,
            translational.z,
        )
    }
    /// Constructs the generator of a constant world-frame velocity.
    ///
    /// `angular` is the angular velocity (axis scaled by radians per unit
    /// time) and `linear` is the velocity of the point currently at the
    /// origin. Exponentiating the result scaled by `t` gives the motion after
    /// time `t`.
    pub fn from_velocity(angular: Vector3, linear: Vector3) -> Self {
        Self::from_parts(angular * 0.5, linear * 0.5)
    }

    /// Returns the rotational part `(yz, zx, xy)`.
    pub fn rotational(self) -> Vector3 {
        Vector3::new(self.yz, self.zx, self.xy)
    }
    /// Returns the translational part `(ix, iy, iz)`.
    pub fn translational(self) -> Vector3 {
        Vector3::new(self.ix, self.iy, self.iz)
    }
    /// Returns the magnitude of the rotational part, which is half the
    /// rotation angle of its exponential.
    pub fn angle(self) -> Float {
        self.rotational().magnitude()
    }
    /// Returns the angular and linear velocity represented by the bivector,
    /// inverting [`Self::from_velocity()`].
    pub fn to_velocity(self) -> (Vector3, Vector3) {
        (self.rotational() * 2.0, self.translational() * 2.0)
    }

    /// Returns the unit motor reached by following the screw motion for unit
    /// time.
    ///
    /// This is total: near-zero rotations use the Taylor series of the
    /// coefficients instead of dividing by the angle.
    pub fn exp(self) -> Motor {
        let u = self.rotational();
        let v = self.translational();

        let theta = u.magnitude();
        let sinc = util::sinc(theta);
        let coupling = u.dot(v);

        let rotational = u * sinc;
        let translational = v * sinc + u * (coupling * util::screw_coefficient(theta));

        Motor {
            s: theta.cos(),
            yz: rotational.x,
            zx: rotational.y,
            xy: rotational.z,
            ix: translational.x,
            iy: translational.y,
            iz: translational.z,
            ixyz: -coupling * sinc,
        }
    }
}

impl num_traits::Zero for Bivector {
    fn zero() -> Self {
        Self::ZERO
    }

    fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}

impl AbsDiffEq for Bivector {
    type Epsilon = Float;

    fn default_epsilon() -> Self::Epsilon {
        crate::EPSILON
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        std::iter::zip(self.coefs(), other.coefs()).all(|(a, b)| a.abs_diff_eq(&b, epsilon))
    }
}

impl Bivector {
    fn coefs(self) -> [Float; 6] {
        [self.yz, self.zx, self.xy, self.ix, self.iy, self.iz]
    }
    fn map(self, f: impl Fn(Float) -> Float) -> Self {
        Self::new(
            f(self.yz),
            f(self.zx),
            f(self.xy),
            f(self.ix),
            f(self.iy),
            f(self.iz),
        )
    }
    fn zip_with(self, rhs: Self, f: impl Fn(Float, Float) -> Float) -> Self {
        Self::new(
            f(self.yz, rhs.yz),
            f(self.zx, rhs.zx),
            f(self.xy, rhs.xy),
            f(self.ix, rhs.ix),
            f(self.iy, rhs.iy),
            f(self.iz, rhs.iz),
        )
    }
}

impl Add for Bivector {
    type Output = Bivector;

    fn add(self, rhs: Self) -> Self::Output {
        self.zip_with(rhs, |a, b| a + b)
    }
}
impl Sub for Bivector {
    type Output = Bivector;

    fn sub(self, rhs: Self) -> Self::Output {
        self.zip_with(rhs, |a, b| a - b)
    }
}
impl Mul<Float> for Bivector {
    type Output = Bivector;

    fn mul(self, rhs: Float) -> Self::Output {
        self.map(|x| x * rhs)
    }
}
impl Div<Float> for Bivector {
    type Output = Bivector;

    fn div(self, rhs: Float) -> Self::Output {
        self.map(|x| x / rhs)
    }
}
impl Neg for Bivector {
    type Output = Bivector;

    fn neg(self) -> Self::Output {
        self.map(|x| -x)
    }
}

impl_forward_bin_ops_to_value! {
    impl Add for Bivector { fn add() }
    impl Sub for Bivector { fn sub() }
}
impl_assign_ops_from_bin_ops! {
    impl AddAssign<Bivector> for Bivector { fn add_assign() = add }
    impl SubAssign<Bivector> for Bivector { fn sub_assign() = sub }
    impl MulAssign<Float> for Bivector { fn mul_assign() = mul }
    impl DivAssign<Float> for Bivector { fn div_assign() = div }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

    use super::*;
    use crate::Point3;

    #[test]
    fn test_exp_of_zero_is_identity() {
        assert_eq!(Bivector::ZERO.exp(), Motor::IDENT);
    }

    #[test]
    fn test_exp_pure_rotation() {
        // Half angle of π/4 about Z is a quarter turn.
        let m = Bivector::new(0.0, 0.0, FRAC_PI_4, 0.0, 0.0, 0.0).exp();
        assert_approx_eq!(m.s, FRAC_PI_4.cos());
        assert_approx_eq!(m.xy, FRAC_PI_4.sin());
        assert_eq!(m.ixyz, 0.0);
        let p = m.transform_point(Point3::new(1.0, 0.0, 0.0));
        assert_approx_eq!(p.x, 0.0);
        assert_approx_eq!(p.y, 1.0);
    }

    #[test]
    fn test_exp_pure_translation() {
        let m = Bivector::new(0.0, 0.0, 0.0, 1.0, -2.0, 0.5).exp();
        assert_eq!(m.s, 1.0);
        assert_eq!(m.ixyz, 0.0);
        assert_coords_approx_eq!(m.translation(), Vector3::new(2.0, -4.0, 1.0));
    }

    #[test]
    fn test_exp_is_unit_and_satisfies_study_condition() {
        let bivectors = [
            Bivector::new(0.3, -0.2, 0.9, 1.0, 2.0, -3.0),
            Bivector::new(1e-9, 0.0, -1e-9, 5.0, 0.0, 1.0),
            Bivector::new(0.0, FRAC_PI_2, 0.0, 0.0, 4.0, 0.0),
            Bivector::new(2.0, 1.0, -1.5, -0.5, 0.25, 8.0),
        ];
        for b in bivectors {
            let m = b.exp();
            assert_approx_eq!(m.rotational_norm_squared(), 1.0);
            assert_approx_eq!(m.study_residual(), 0.0);
        }
    }

    #[test]
    fn test_exp_screw_along_axis() {
        // Rotating about Z while translating along Z is a screw whose pitch
        // shows up in the pseudoscalar term.
        let b = Bivector::from_velocity(Vector3::new(0.0, 0.0, FRAC_PI_2), Vector3::unit_z());
        let m = b.exp();
        assert!(m.ixyz.abs() > 0.1);
        let p = m.transform_point(Point3::new(1.0, 0.0, 0.0));
        assert_approx_eq!(p.x, 0.0);
        assert_approx_eq!(p.y, 1.0);
        assert_approx_eq!(p.z, 1.0);
    }

    #[test]
    fn test_velocity_round_trip() {
        let angular = Vector3::new(0.5, -1.0, 2.0);
        let linear = Vector3::new(3.0, 0.0, -1.0);
        let (w, v) = Bivector::from_velocity(angular, linear).to_velocity();
        assert_coords_approx_eq!(w, angular);
        assert_coords_approx_eq!(v, linear);
    }

    #[test]
    fn test_arithmetic() {
        let a = Bivector::new(1.0, 2.0, 3.0, 4.0, 5.0, 6.0);
        let b = Bivector::new(0.5, 0.5, 0.5, 0.5, 0.5, 0.5);
        assert_eq!(a + b - b, a);
        assert_eq!(&a + &b, a + b);
        assert_eq!(a * 2.0 / 2.0, a);
        assert_eq!(-a + a, Bivector::ZERO);
        let mut c = a;
        c += b;
        c *= 2.0;
        assert_eq!(c, (a + b) * 2.0);
        assert_eq!(a.to_string(), "1yz + 2zx + 3xy + 4ix + 5iy + 6iz");
        assert_eq!(Bivector::ZERO.to_string(), "0");
    }
}
