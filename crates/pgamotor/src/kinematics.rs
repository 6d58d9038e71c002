//! Integration of rigid-body velocities.

use crate::pga::{Bivector, Motor};
use crate::{Float, util};

/// Pose and world-frame velocity of a rigid body.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct RigidBody {
    /// Current pose.
    pub pose: Motor,
    /// Current velocity, as a generator in the form produced by
    /// [`Bivector::from_velocity()`].
    pub velocity: Bivector,
}

impl RigidBody {
    /// Constructs a body at rest.
    pub fn at_rest(pose: Motor) -> Self {
        Self {
            pose,
            velocity: Bivector::ZERO,
        }
    }

    /// Advances the body by `dt`, first accelerating it and then moving it at
    /// the new velocity.
    ///
    /// The pose is renormalized after each step so that rounding error does
    /// not accumulate.
    pub fn step(&mut self, acceleration: Bivector, dt: Float) {
        self.velocity += acceleration * dt;
        let new_pose = (self.velocity * dt).exp() * self.pose;
        match new_pose.normalize() {
            Some(pose) => self.pose = pose,
            None => log::warn!("degenerate pose {new_pose} after step; keeping {}", self.pose),
        }
    }

    /// Returns the constant world-frame velocity that moves a body from `from`
    /// to `to` in time `dt`, or `None` if `dt` is zero.
    pub fn velocity_between(from: Motor, to: Motor, dt: Float) -> Option<Bivector> {
        util::try_div((to * from.reverse()).log(), dt)
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::PI;

    use super::*;
    use crate::{Point3, Vector3};

    #[test]
    fn test_constant_spin() {
        let mut body = RigidBody {
            pose: Motor::IDENT,
            velocity: Bivector::from_velocity(Vector3::new(0.0, 0.0, PI), Vector3::unit_z()),
        };
        for _ in 0..10 {
            body.step(Bivector::ZERO, 0.05);
        }
        // Half a second at π rad/s about Z is a quarter turn.
        let p = body.pose.transform_point(Point3::new(1.0, 0.0, 0.0));
        assert_coords_approx_eq!(p, Point3::new(0.0, 1.0, 0.5));
    }

    #[test]
    fn test_acceleration() {
        let mut body = RigidBody::at_rest(Motor::IDENT);
        let push = Bivector::from_velocity(Vector3::new(0.0, 0.0, 0.0), Vector3::unit_x());
        body.step(push, 1.0);
        body.step(push, 1.0);
        assert_coords_approx_eq!(body.pose.translation(), Vector3::new(3.0, 0.0, 0.0));
        assert_coords_approx_eq!(body.velocity.to_velocity().1, Vector3::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn test_at_rest_stays_put() {
        let pose = Motor::from_translation(Vector3::new(1.0, 2.0, 3.0));
        let mut body = RigidBody::at_rest(pose);
        body.step(Bivector::ZERO, 0.1);
        assert_approx_eq!(body.pose, pose);
    }

    #[test]
    fn test_velocity_between() {
        let from = Motor::from_rotation_translation(
            Motor::from_axis_angle(Vector3::unit_x(), 0.4).unwrap(),
            Vector3::new(1.0, 0.0, 0.0),
        );
        let to = Motor::from_rotation_translation(
            Motor::from_axis_angle(Vector3::new(0.0, 1.0, 1.0), 1.1).unwrap(),
            Vector3::new(-2.0, 3.0, 0.5),
        );
        let velocity = RigidBody::velocity_between(from, to, 2.0).unwrap();

        let mut body = RigidBody { pose: from, velocity };
        body.step(Bivector::ZERO, 1.0);
        body.step(Bivector::ZERO, 1.0);
        // The result may differ from `to` in sign, so compare the motions.
        for p in [Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, -1.0, 2.0)] {
            assert_coords_approx_eq!(body.pose.transform_point(p), to.transform_point(p));
        }

        assert_eq!(RigidBody::velocity_between(from, to, 0.0), None);
    }
}
