//! Approximate comparison functions that automatically use [`EPSILON`].

pub use approx::AbsDiffEq;
use num_traits::Zero;

use crate::{EPSILON, Float};

/// Compares two values, but considers them equal if they are separated by
/// less than `EPSILON`.
///
/// Handles infinity specially.
pub fn approx_eq<T: AbsDiffEq<Epsilon = Float> + PartialEq>(a: &T, b: &T) -> bool {
    // use native float equality to handle infinities
    a == b || approx::abs_diff_eq!(a, b, epsilon = EPSILON)
}

/// Returns whether `x` is within `EPSILON` of zero.
pub fn is_approx_zero<T: AbsDiffEq<Epsilon = Float> + PartialEq + Zero>(x: &T) -> bool {
    approx_eq(x, &T::zero())
}
/// Returns whether `x` has an absolute value greater than `EPSILON`.
pub fn is_approx_nonzero<T: AbsDiffEq<Epsilon = Float> + PartialEq + Zero>(x: &T) -> bool {
    !is_approx_zero(x)
}
/// Returns whether `x` is less than `-EPSILON`.
pub fn is_approx_negative<T: AbsDiffEq<Epsilon = Float> + PartialOrd + Zero>(x: &T) -> bool {
    *x < T::zero() && is_approx_nonzero(x)
}
/// Returns whether `x` is greater than `EPSILON`.
pub fn is_approx_positive<T: AbsDiffEq<Epsilon = Float> + PartialOrd + Zero>(x: &T) -> bool {
    *x > T::zero() && is_approx_nonzero(x)
}

/// Returns the sign (`1.0` or `-1.0`) that makes the first approximately
/// nonzero value of `values` positive, or `None` if every value is
/// approximately zero.
pub fn sign_of_first_nonzero(values: impl IntoIterator<Item = Float>) -> Option<Float> {
    values.into_iter().find_map(|x| {
        if is_approx_positive(&x) {
            Some(1.0)
        } else if is_approx_negative(&x) {
            Some(-1.0)
        } else {
            None
        }
    })
}

/// Compares the coordinates of two points or vectors, considering them equal
/// if every pair of components is separated by less than `EPSILON`.
///
/// `cgmath` types implement an older version of the `approx` traits, so they
/// are compared through their arrays instead.
pub fn coords_approx_eq<const N: usize>(
    a: impl Into<[Float; N]>,
    b: impl Into<[Float; N]>,
) -> bool {
    std::iter::zip(a.into(), b.into()).all(|(a, b)| approx_eq(&a, &b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_approx_sign_helpers() {
        assert!(is_approx_zero(&(EPSILON / 2.0)));
        assert!(is_approx_nonzero(&(EPSILON * 2.0)));
        assert!(is_approx_negative(&-0.5));
        assert!(!is_approx_negative(&(-EPSILON / 2.0)));
        assert!(is_approx_positive(&0.5));
        assert!(approx_eq(&Float::INFINITY, &Float::INFINITY));
    }

    #[test]
    fn test_sign_of_first_nonzero() {
        assert_eq!(sign_of_first_nonzero([0.0, -2.0, 3.0]), Some(-1.0));
        assert_eq!(sign_of_first_nonzero([EPSILON / 10.0, 0.5]), Some(1.0));
        assert_eq!(sign_of_first_nonzero([-EPSILON / 10.0, -0.5]), Some(-1.0));
        assert_eq!(sign_of_first_nonzero([0.0, 0.0]), None);
        assert_eq!(sign_of_first_nonzero([Float::NAN, 2.0]), Some(1.0));
    }

    #[test]
    fn test_coords_approx_eq() {
        let v = crate::Vector3::new(1.0, 2.0, 3.0);
        assert!(coords_approx_eq(v, v + crate::Vector3::new(0.0, EPSILON / 2.0, 0.0)));
        assert!(!coords_approx_eq(v, crate::Vector3::new(1.0, 2.0, 3.1)));
    }
}
