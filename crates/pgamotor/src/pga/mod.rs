//! Even subalgebra of 3D projective geometric algebra.
//!
//! The basis is oriented so that the rotational bivectors multiply like the
//! quaternion units: `yz = e₃₂`, `zx = e₁₃`, and `xy = e₂₁`. The ideal
//! bivectors are `ix = e₀₁`, `iy = e₀₂`, and `iz = e₀₃`, and the pseudoscalar
//! is `ixyz = e₀₁₂₃`. With this orientation a motor is a dual quaternion whose
//! dual unit is the pseudoscalar.

use std::fmt;

use crate::Float;

mod bivector;
mod motor;

pub use bivector::Bivector;
pub use motor::{Motor, TransformByMotor};

/// Writes a sum of terms, skipping zeros, or `0` if every term is zero.
fn display_terms(f: &mut fmt::Formatter<'_>, terms: &[(Float, &str)]) -> fmt::Result {
    let mut is_first = true;
    for &(coef, name) in terms.iter().filter(|(coef, _)| *coef != 0.0) {
        if is_first {
            if coef < 0.0 {
                write!(f, "-")?;
            }
        } else if coef < 0.0 {
            write!(f, " - ")?;
        } else {
            write!(f, " + ")?;
        }
        is_first = false;

        fmt::Display::fmt(&coef.abs(), f)?;
        write!(f, "{name}")?;
    }
    if is_first {
        write!(f, "0")?;
    }
    Ok(())
}
