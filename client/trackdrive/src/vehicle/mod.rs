//! Arcade car controller.
//!
//! The car is a dynamic sphere whose velocities are overwritten every frame
//! from the driver's stick. A child chassis entity carries the car model and
//! a cosmetic pitch that never feeds back into the physics body.

mod components;
pub mod core;

use avian3d::prelude::*;
use bevy::prelude::*;
use leafwing_input_manager::prelude::ActionState;

pub use components::{Car, CarBodyConfig, CarChassis, CarReadback, DriveTuning};

use crate::{
    input::{DriveAction, Driver},
    launch_params::LaunchParams,
    session::DriveSession,
};

/// Ordering for the per-frame drive routines.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum DriveSystems {
    /// Velocity commands, chassis lean and respawn.
    Control,
    /// Writes the visual pose into transforms.
    Visual,
}

/// Plugin for the player car.
pub struct VehiclePlugin;

impl Plugin for VehiclePlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<Car>()
            .register_type::<DriveTuning>()
            .configure_sets(
                Update,
                (DriveSystems::Control, DriveSystems::Visual).chain(),
            )
            .add_systems(Startup, spawn_car)
            .add_systems(
                Update,
                (
                    (drive_car, update_chassis_tilt, respawn_car)
                        .chain()
                        .in_set(DriveSystems::Control),
                    apply_chassis_pose.in_set(DriveSystems::Visual),
                ),
            );
    }
}

// ============================================================================
// Spawning
// ============================================================================

/// Spawn the car body at the spawn point with its model as a child.
fn spawn_car(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    launch_params: Res<LaunchParams>,
    mut session: ResMut<DriveSession>,
) {
    let body = CarBodyConfig::default();
    let tuning = DriveTuning::default();
    let spawn_position = tuning.spawn_position;

    let car = commands
        .spawn((
            Name::new("Car"),
            Car,
            tuning,
            Transform::from_translation(spawn_position),
            Visibility::default(),
            RigidBody::Dynamic,
            Collider::sphere(body.radius),
            Mass(body.mass),
            Friction::new(body.friction),
            LinearDamping(body.linear_damping),
            AngularDamping(body.angular_damping),
            // Yaw only: the sphere may roll visually but never pitches or banks.
            LockedAxes::new().lock_rotation_x().lock_rotation_z(),
            SleepingDisabled,
            LinearVelocity::default(),
            AngularVelocity::default(),
        ))
        .id();

    let chassis = commands
        .spawn((
            Name::new("Chassis"),
            CarChassis {
                pitch: 0.0,
                offset: body.chassis_offset,
            },
            Transform::from_translation(body.chassis_offset),
            Visibility::default(),
            children![SceneRoot(asset_server.load(
                GltfAssetLabel::Scene(0).from_asset(launch_params.car_model.clone())
            ))],
        ))
        .id();
    commands.entity(car).add_child(chassis);

    session.car = Some(car);
    tracing::info!(
        "Spawned car at {spawn_position} with model {}",
        launch_params.car_model
    );
}

// ============================================================================
// Per-frame control
// ============================================================================

/// Turn the latest stick sample into velocity commands.
fn drive_car(
    session: Res<DriveSession>,
    mut query: Query<
        (
            &DriveTuning,
            &Rotation,
            &mut CarReadback,
            &mut LinearVelocity,
            &mut AngularVelocity,
        ),
        With<Car>,
    >,
) {
    let Some(car) = session.car else {
        return;
    };
    let Ok((tuning, rotation, mut readback, mut linear_velocity, mut angular_velocity)) =
        query.get_mut(car)
    else {
        return;
    };

    readback.velocity = linear_velocity.0;

    let input = session.input.load();
    let command =
        core::compute_drive_command(&tuning.params(), input, rotation.0, linear_velocity.0);
    linear_velocity.0 = command.linear_velocity;
    angular_velocity.0 = command.angular_velocity;
}

/// Ease the chassis pitch toward the lean implied by the sampled velocity.
fn update_chassis_tilt(
    session: Res<DriveSession>,
    mut car_query: Query<(&DriveTuning, &mut CarReadback), With<Car>>,
    mut chassis_query: Query<(&ChildOf, &mut CarChassis)>,
) {
    let Some(car) = session.car else {
        return;
    };
    let Ok((tuning, mut readback)) = car_query.get_mut(car) else {
        return;
    };

    let tilt = core::chassis_tilt(readback.velocity, tuning.tilt_epsilon);
    readback.tilt = tilt;

    for (child_of, mut chassis) in &mut chassis_query {
        if child_of.parent() != car {
            continue;
        }
        chassis.pitch = core::smooth_pitch(chassis.pitch, tilt, tuning.tilt_smoothing);
    }
}

/// Reset the car to spawn when it falls below the floor or on request.
#[allow(clippy::type_complexity)]
fn respawn_car(
    mut session: ResMut<DriveSession>,
    action_query: Query<&ActionState<DriveAction>, With<Driver>>,
    mut query: Query<
        (
            &DriveTuning,
            &mut Position,
            &mut Transform,
            &mut LinearVelocity,
            &mut AngularVelocity,
        ),
        With<Car>,
    >,
) {
    let Some(car) = session.car else {
        return;
    };
    let Ok((tuning, mut position, mut transform, mut linear_velocity, mut angular_velocity)) =
        query.get_mut(car)
    else {
        return;
    };

    let requested = action_query
        .single()
        .is_ok_and(|action_state| action_state.just_pressed(&DriveAction::Respawn));
    let fell = core::needs_respawn(position.0, tuning.respawn_floor);
    if !fell && !requested {
        return;
    }

    if fell {
        tracing::info!(
            "Car fell to y = {:.2}, respawning at {}",
            position.0.y,
            tuning.spawn_position
        );
    } else {
        tracing::info!("Respawn requested, resetting to {}", tuning.spawn_position);
    }

    let reset = core::respawn_state(&tuning.params());
    position.0 = reset.position;
    transform.translation = reset.position;
    linear_velocity.0 = reset.linear_velocity;
    angular_velocity.0 = reset.angular_velocity;
    session.respawns += 1;
}

// ============================================================================
// Visual composition
// ============================================================================

/// Compose the chassis transform from its offset and cosmetic pitch.
fn apply_chassis_pose(mut query: Query<(&CarChassis, &mut Transform), Changed<CarChassis>>) {
    for (chassis, mut transform) in &mut query {
        transform.translation = chassis.offset;
        transform.rotation = Quat::from_rotation_x(chassis.pitch);
    }
}
