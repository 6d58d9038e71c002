//! Common mathematical utility functions that didn't fit anywhere else.

use std::ops::Mul;

use super::Float;

/// Angle below which the trigonometric ratios in this module switch from the
/// closed form to their Taylor series.
///
/// The series are truncated after the x⁶ term, so their error below this
/// threshold is far smaller than `Float::EPSILON`, while the closed form of
/// [`screw_coefficient()`] loses only a handful of digits above it.
pub const SERIES_THRESHOLD: Float = 0.01;

/// Divides `lhs` by `rhs` if the reciprocal of `rhs` is finite; otherwise
/// returns `None`.
pub fn try_div<T>(lhs: T, rhs: Float) -> Option<T::Output>
where
    T: Mul<Float>,
{
    let recip_rhs = rhs.recip();
    recip_rhs.is_finite().then(|| lhs * recip_rhs)
}

/// Returns `sin(x) / x`, which is `1` at `x = 0`.
pub fn sinc(x: Float) -> Float {
    if x.abs() < SERIES_THRESHOLD {
        let x2 = x * x;
        1.0 - x2 / 6.0 * (1.0 - x2 / 20.0 * (1.0 - x2 / 42.0))
    } else {
        x.sin() / x
    }
}

/// Returns `(x cos(x) - sin(x)) / x³`, which is `-1/3` at `x = 0`.
///
/// This is the derivative of [`sinc()`] divided by `x`; it couples the
/// rotational and translational halves of a screw motion.
pub fn screw_coefficient(x: Float) -> Float {
    if x.abs() < SERIES_THRESHOLD {
        let x2 = x * x;
        -1.0 / 3.0 + x2 / 30.0 * (1.0 - x2 / 28.0 * (1.0 - x2 / 54.0))
    } else {
        let (sin, cos) = x.sin_cos();
        (x * cos - sin) / (x * x * x)
    }
}
