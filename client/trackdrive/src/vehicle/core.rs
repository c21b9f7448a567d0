//! Core vehicle control calculations.
//!
//! Pure functions that can be tested in isolation without Bevy dependencies.
//! The Bevy systems in the parent module read physics state, call into these,
//! and write the results back to the rigid body.

use glam::{Quat, Vec3};

use crate::input::shared::InputVector;

/// Canonical forward direction of the car model in body space.
pub const BODY_FORWARD: Vec3 = Vec3::Z;

/// Constants for the arcade drive model.
#[derive(Clone, Debug, PartialEq)]
pub struct DriveParams {
    /// Yaw rate per unit of horizontal stick (rad/s).
    pub angular_gain: f32,
    /// Horizontal speed per unit of vertical stick (m/s).
    pub throttle_gain: f32,
    /// Per-frame multiplier on horizontal velocity while coasting.
    pub idle_decay: f32,
    /// Added to horizontal speed before computing the tilt angle.
    pub tilt_epsilon: f32,
    /// Per-frame interpolation factor for the chassis pitch.
    pub tilt_smoothing: f32,
    /// Height below which the car is teleported back to spawn.
    pub respawn_floor: f32,
    /// Where the car respawns.
    pub spawn_position: Vec3,
}

impl Default for DriveParams {
    fn default() -> Self {
        Self {
            angular_gain: 3.0,
            throttle_gain: 25.0,
            idle_decay: 0.95,
            tilt_epsilon: 0.1,
            tilt_smoothing: 0.1,
            respawn_floor: -10.0,
            spawn_position: Vec3::new(-24.0, 2.0, 3.5),
        }
    }
}

/// Velocities to push into the rigid body this frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DriveCommand {
    /// New linear velocity (vertical component is always carried over).
    pub linear_velocity: Vec3,
    /// New angular velocity (only ever about the vertical axis).
    pub angular_velocity: Vec3,
}

/// Compute the velocity command for one frame.
///
/// With a neutral stick the car coasts: yaw stops and horizontal velocity
/// decays. Otherwise horizontal velocity is set directly along the body's
/// flattened forward direction. Vertical velocity is never touched, so gravity
/// and bumps keep working while throttling.
pub fn compute_drive_command(
    params: &DriveParams,
    input: InputVector,
    rotation: Quat,
    linear_velocity: Vec3,
) -> DriveCommand {
    if input.is_neutral() {
        return DriveCommand {
            linear_velocity: Vec3::new(
                linear_velocity.x * params.idle_decay,
                linear_velocity.y,
                linear_velocity.z * params.idle_decay,
            ),
            angular_velocity: Vec3::ZERO,
        };
    }

    // Stick right turns right, which is negative yaw about +Y.
    let angular_velocity = Vec3::new(0.0, -input.x * params.angular_gain, 0.0);

    // Stick up drives along -forward (-Z for an unrotated body).
    let planar = planar_forward(rotation) * (-input.y * params.throttle_gain);

    DriveCommand {
        linear_velocity: Vec3::new(planar.x, linear_velocity.y, planar.z),
        angular_velocity,
    }
}

/// Body forward direction projected onto the ground plane.
pub fn planar_forward(rotation: Quat) -> Vec3 {
    let mut forward = rotation * BODY_FORWARD;
    forward.y = 0.0;
    forward.normalize_or_zero()
}

/// Horizontal speed in the XZ plane.
pub fn horizontal_speed(linear_velocity: Vec3) -> f32 {
    linear_velocity.x.hypot(linear_velocity.z)
}

/// Lean angle implied by the current velocity.
///
/// Positive when climbing. `epsilon` keeps the angle well-defined when the
/// car is nearly stationary.
pub fn chassis_tilt(linear_velocity: Vec3, epsilon: f32) -> f32 {
    linear_velocity
        .y
        .atan2(horizontal_speed(linear_velocity) + epsilon)
}

/// Move the visual pitch a fixed fraction toward `-tilt`.
pub fn smooth_pitch(current_pitch: f32, tilt: f32, factor: f32) -> f32 {
    current_pitch + (-tilt - current_pitch) * factor
}

/// Whether the body has fallen far enough to be reset.
pub fn needs_respawn(position: Vec3, floor: f32) -> bool {
    position.y < floor
}

/// Body state to write when the car is reset.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RespawnState {
    /// Reset position.
    pub position: Vec3,
    /// Reset linear velocity.
    pub linear_velocity: Vec3,
    /// Reset angular velocity.
    pub angular_velocity: Vec3,
}

/// The state a reset puts the body in: at spawn, fully at rest.
pub fn respawn_state(params: &DriveParams) -> RespawnState {
    RespawnState {
        position: params.spawn_position,
        linear_velocity: Vec3::ZERO,
        angular_velocity: Vec3::ZERO,
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_neutral_input_stops_yaw_and_decays_horizontal() {
        let params = DriveParams::default();
        let velocity = Vec3::new(10.0, -3.0, -4.0);
        let cmd = compute_drive_command(&params, InputVector::ZERO, Quat::IDENTITY, velocity);

        assert_eq!(cmd.angular_velocity, Vec3::ZERO);
        assert!((cmd.linear_velocity.x - 9.5).abs() < 1e-6);
        assert!((cmd.linear_velocity.z - -3.8).abs() < 1e-6);
        assert_eq!(cmd.linear_velocity.y, -3.0);
    }

    #[test]
    fn test_coasting_speed_strictly_decreases() {
        let params = DriveParams::default();
        let mut velocity = Vec3::new(20.0, 0.0, 5.0);
        let mut previous = horizontal_speed(velocity);

        while previous > 1e-3 {
            velocity = compute_drive_command(&params, InputVector::ZERO, Quat::IDENTITY, velocity)
                .linear_velocity;
            let speed = horizontal_speed(velocity);
            assert!(speed < previous);
            assert!((speed - previous * 0.95).abs() < 1e-4);
            previous = speed;
        }
    }

    #[test]
    fn test_full_forward_drives_toward_negative_z() {
        let params = DriveParams::default();
        let cmd = compute_drive_command(
            &params,
            InputVector::new(0.0, 1.0),
            Quat::IDENTITY,
            Vec3::new(0.0, 2.0, 0.0),
        );

        assert!((cmd.linear_velocity.z - -25.0).abs() < 1e-5);
        assert!(cmd.linear_velocity.x.abs() < 1e-5);
        assert_eq!(cmd.linear_velocity.y, 2.0);
        assert_eq!(cmd.angular_velocity, Vec3::ZERO);
    }

    #[test]
    fn test_stick_right_yaws_negative() {
        let params = DriveParams::default();
        let cmd = compute_drive_command(
            &params,
            InputVector::new(1.0, 0.0),
            Quat::IDENTITY,
            Vec3::ZERO,
        );

        assert_eq!(cmd.angular_velocity, Vec3::new(0.0, -3.0, 0.0));
        // No throttle: horizontal velocity is replaced with zero, not decayed.
        assert_eq!(cmd.linear_velocity, Vec3::ZERO);
    }

    #[test]
    fn test_forward_follows_yaw() {
        let params = DriveParams::default();
        // Quarter turn left: body +Z maps to world +X.
        let rotation = Quat::from_rotation_y(FRAC_PI_2);
        let cmd = compute_drive_command(&params, InputVector::new(0.0, -1.0), rotation, Vec3::ZERO);

        assert!((cmd.linear_velocity.x - 25.0).abs() < 1e-4);
        assert!(cmd.linear_velocity.z.abs() < 1e-4);
    }

    #[test]
    fn test_forward_ignores_pitch() {
        let rotation = Quat::from_rotation_x(0.6);
        let forward = planar_forward(rotation);
        assert!(forward.y.abs() < 1e-6);
        assert!((forward.length() - 1.0).abs() < 1e-5);
        assert!((forward.z - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_tiny_input_takes_drive_branch() {
        // No deadzone: a vanishing input replaces horizontal velocity outright.
        let params = DriveParams::default();
        let cmd = compute_drive_command(
            &params,
            InputVector::new(0.0, 1e-6),
            Quat::IDENTITY,
            Vec3::new(10.0, 0.0, 10.0),
        );
        assert!(horizontal_speed(cmd.linear_velocity) < 1e-3);
    }

    #[test]
    fn test_tilt_when_falling_straight() {
        let tilt = chassis_tilt(Vec3::new(0.0, 5.0, 0.0), 0.1);
        assert!((tilt - 5.0_f32.atan2(0.1)).abs() < 1e-6);
        assert!((tilt - 1.5108).abs() < 1e-4);
    }

    #[test]
    fn test_pitch_moves_ten_percent() {
        let tilt = chassis_tilt(Vec3::new(0.0, 5.0, 0.0), 0.1);
        let pitch = smooth_pitch(0.0, tilt, 0.1);
        assert!((pitch - -0.1 * tilt).abs() < 1e-6);

        let next = smooth_pitch(pitch, tilt, 0.1);
        assert!((next - (pitch + (-tilt - pitch) * 0.1)).abs() < 1e-6);
    }

    #[test]
    fn test_level_driving_has_no_tilt() {
        assert_eq!(chassis_tilt(Vec3::new(3.0, 0.0, 4.0), 0.1), 0.0);
        assert!((horizontal_speed(Vec3::new(3.0, 9.0, 4.0)) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_respawn_threshold() {
        assert!(needs_respawn(Vec3::new(0.0, -10.0001, 0.0), -10.0));
        assert!(!needs_respawn(Vec3::new(0.0, -10.0, 0.0), -10.0));
        assert!(!needs_respawn(Vec3::new(0.0, 2.0, 0.0), -10.0));
    }

    #[test]
    fn test_fall_below_floor_resets_to_spawn_at_rest() {
        let params = DriveParams::default();
        let position = Vec3::new(37.0, -10.0001, -12.5);
        let linear_velocity = Vec3::new(14.0, -22.0, 3.0);
        let angular_velocity = Vec3::new(0.0, 2.5, 0.0);
        assert!(needs_respawn(position, params.respawn_floor));

        let reset = respawn_state(&params);
        assert_ne!(reset.linear_velocity, linear_velocity);
        assert_ne!(reset.angular_velocity, angular_velocity);
        assert_eq!(reset.position, Vec3::new(-24.0, 2.0, 3.5));
        assert_eq!(reset.linear_velocity, Vec3::ZERO);
        assert_eq!(reset.angular_velocity, Vec3::ZERO);
        assert!(!needs_respawn(reset.position, params.respawn_floor));
    }

    #[test]
    fn test_default_spawn_position() {
        assert_eq!(
            DriveParams::default().spawn_position,
            Vec3::new(-24.0, 2.0, 3.5)
        );
    }

    proptest! {
        #[test]
        fn prop_commands_are_bounded_by_input(
            x in -1.0f32..=1.0,
            y in -1.0f32..=1.0,
            yaw in -3.2f32..3.2,
            vx in -50.0f32..50.0,
            vy in -50.0f32..50.0,
            vz in -50.0f32..50.0,
        ) {
            prop_assume!(x != 0.0 || y != 0.0);
            let params = DriveParams::default();
            let cmd = compute_drive_command(
                &params,
                InputVector::new(x, y),
                Quat::from_rotation_y(yaw),
                Vec3::new(vx, vy, vz),
            );

            prop_assert!(cmd.angular_velocity.length() <= 3.0 * x.abs() + 1e-5);
            prop_assert!(horizontal_speed(cmd.linear_velocity) <= 25.0 * y.abs() + 1e-3);
            prop_assert_eq!(cmd.linear_velocity.y, vy);
        }

        #[test]
        fn prop_neutral_preserves_vertical(
            vx in -50.0f32..50.0,
            vy in -50.0f32..50.0,
            vz in -50.0f32..50.0,
        ) {
            let params = DriveParams::default();
            let velocity = Vec3::new(vx, vy, vz);
            let cmd = compute_drive_command(&params, InputVector::ZERO, Quat::IDENTITY, velocity);

            prop_assert_eq!(cmd.angular_velocity, Vec3::ZERO);
            prop_assert_eq!(cmd.linear_velocity.y, vy);
            prop_assert!(horizontal_speed(cmd.linear_velocity) <= horizontal_speed(velocity));
        }
    }
}
