//! Vehicle component definitions.
//!
//! Tuning components use `Reflect` so they can be inspected and edited at
//! runtime.

use bevy::prelude::*;

use super::core::DriveParams;

/// Car body marker.
#[derive(Component, Reflect, Clone, Default)]
#[reflect(Component)]
#[require(DriveTuning, CarReadback)]
pub struct Car;

/// Rigid body configuration used when the car is spawned.
#[derive(Clone, Debug)]
pub struct CarBodyConfig {
    /// Body mass in kg.
    pub mass: f32,
    /// Radius of the sphere collider.
    pub radius: f32,
    /// Linear velocity damping coefficient.
    pub linear_damping: f32,
    /// Angular velocity damping coefficient.
    pub angular_damping: f32,
    /// Contact friction of the body.
    pub friction: f32,
    /// Offset of the visual chassis relative to the body center.
    pub chassis_offset: Vec3,
}

impl Default for CarBodyConfig {
    fn default() -> Self {
        Self {
            mass: 500.0,
            radius: 0.7,
            linear_damping: 0.5,
            angular_damping: 0.5,
            friction: 0.0,
            chassis_offset: Vec3::new(0.0, -0.6, 0.0),
        }
    }
}

/// Drive model constants.
#[derive(Component, Reflect, Clone)]
#[reflect(Component)]
pub struct DriveTuning {
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
    /// Height below which the car is reset.
    pub respawn_floor: f32,
    /// Reset position.
    pub spawn_position: Vec3,
}

impl Default for DriveTuning {
    fn default() -> Self {
        Self::from(&DriveParams::default())
    }
}

impl From<&DriveParams> for DriveTuning {
    fn from(p: &DriveParams) -> Self {
        Self {
            angular_gain: p.angular_gain,
            throttle_gain: p.throttle_gain,
            idle_decay: p.idle_decay,
            tilt_epsilon: p.tilt_epsilon,
            tilt_smoothing: p.tilt_smoothing,
            respawn_floor: p.respawn_floor,
            spawn_position: p.spawn_position,
        }
    }
}

impl DriveTuning {
    /// Parameters for the pure control functions.
    pub fn params(&self) -> DriveParams {
        DriveParams {
            angular_gain: self.angular_gain,
            throttle_gain: self.throttle_gain,
            idle_decay: self.idle_decay,
            tilt_epsilon: self.tilt_epsilon,
            tilt_smoothing: self.tilt_smoothing,
            respawn_floor: self.respawn_floor,
            spawn_position: self.spawn_position,
        }
    }
}

/// Visual chassis child of the car body.
///
/// Holds the cosmetic pitch, which never feeds back into the rigid body.
#[derive(Component, Default)]
pub struct CarChassis {
    /// Current lean about the body's X axis (radians).
    pub pitch: f32,
    /// Local offset from the body center.
    pub offset: Vec3,
}

/// Velocity sampled from the physics engine before this frame's command.
///
/// The tilt and the debug overlay read this rather than the commanded
/// velocity.
#[derive(Component, Default, Clone, Copy)]
pub struct CarReadback {
    /// Linear velocity as last simulated (m/s).
    pub velocity: Vec3,
    /// Target lean angle before smoothing (radians).
    pub tilt: f32,
}
