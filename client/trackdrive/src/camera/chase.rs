//! Chase camera math.
//!
//! The camera position trails a point fixed in the followed body's frame,
//! while the look direction snaps to the body every frame.

use glam::{Quat, Vec3};

/// Default offset behind and above the followed body, in body space.
pub const DEFAULT_CHASE_OFFSET: Vec3 = Vec3::new(0.0, 6.0, 10.0);

/// Default per-frame interpolation factor for the camera position.
pub const DEFAULT_CHASE_SMOOTHING: f32 = 0.1;

/// Camera position and look-at point for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraPose {
    /// World-space camera position.
    pub position: Vec3,
    /// World-space point the camera faces.
    pub look_at: Vec3,
}

/// Where the camera wants to be for a body at `position` with `rotation`.
pub fn chase_target(position: Vec3, rotation: Quat, offset: Vec3) -> Vec3 {
    position + rotation * offset
}

/// Advance the camera one frame toward its chase target.
///
/// The interpolation is per frame, not per second, so the lag depends on the
/// frame rate.
pub fn step_chase_camera(
    current: Vec3,
    body_position: Vec3,
    body_rotation: Quat,
    offset: Vec3,
    smoothing: f32,
) -> CameraPose {
    let target = chase_target(body_position, body_rotation, offset);
    CameraPose {
        position: current.lerp(target, smoothing),
        look_at: body_position,
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use super::*;

    #[test]
    fn test_target_at_origin() {
        let target = chase_target(Vec3::ZERO, Quat::IDENTITY, DEFAULT_CHASE_OFFSET);
        assert_eq!(target, Vec3::new(0.0, 6.0, 10.0));
    }

    #[test]
    fn test_target_rotates_with_body() {
        let target = chase_target(
            Vec3::new(5.0, 1.0, 0.0),
            Quat::from_rotation_y(FRAC_PI_2),
            DEFAULT_CHASE_OFFSET,
        );
        assert!((target.x - 15.0).abs() < 1e-5);
        assert!((target.y - 7.0).abs() < 1e-5);
        assert!(target.z.abs() < 1e-5);
    }

    #[test]
    fn test_step_moves_ten_percent_and_looks_at_body() {
        let pose = step_chase_camera(
            Vec3::new(0.0, 20.0, 10.0),
            Vec3::ZERO,
            Quat::IDENTITY,
            DEFAULT_CHASE_OFFSET,
            DEFAULT_CHASE_SMOOTHING,
        );

        assert!((pose.position.y - 18.6).abs() < 1e-5);
        assert!((pose.position.z - 10.0).abs() < 1e-5);
        assert_eq!(pose.look_at, Vec3::ZERO);
    }

    #[test]
    fn test_look_at_ignores_smoothing_state() {
        let body = Vec3::new(-24.0, 2.0, 3.5);
        for current in [Vec3::ZERO, Vec3::splat(100.0), Vec3::new(-24.0, 8.0, 13.5)] {
            let pose = step_chase_camera(
                current,
                body,
                Quat::IDENTITY,
                DEFAULT_CHASE_OFFSET,
                DEFAULT_CHASE_SMOOTHING,
            );
            assert_eq!(pose.look_at, body);
        }
    }

    #[test]
    fn test_converges_on_stationary_body() {
        let mut position = Vec3::new(50.0, 50.0, 50.0);
        for _ in 0..300 {
            position = step_chase_camera(
                position,
                Vec3::ZERO,
                Quat::IDENTITY,
                DEFAULT_CHASE_OFFSET,
                DEFAULT_CHASE_SMOOTHING,
            )
            .position;
        }
        assert!(position.distance(DEFAULT_CHASE_OFFSET) < 1e-3);
    }
}
