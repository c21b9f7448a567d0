//! Camera setup and the chase camera.
//!
//! The camera starts above the track looking at the origin and switches to
//! trailing the car as soon as the car body exists.

pub mod chase;
mod follow;

use bevy::prelude::*;

pub use follow::{ChaseCamera, ChaseCameraConfig};

use crate::{session::DriveSession, vehicle::DriveSystems};

/// Camera position before the chase camera takes over.
const INITIAL_POSITION: Vec3 = Vec3::new(0.0, 20.0, 10.0);

/// Vertical field of view in degrees.
const FOV_DEGREES: f32 = 45.0;

/// Background color behind the track.
const CLEAR_COLOR: Color = Color::srgb(0.102, 0.102, 0.102);

/// Plugin for the chase camera.
pub struct ChaseCameraPlugin;

impl Plugin for ChaseCameraPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<ChaseCameraConfig>()
            .insert_resource(ClearColor(CLEAR_COLOR))
            .add_systems(Startup, spawn_camera)
            .add_systems(
                Update,
                follow::chase_camera_system.after(DriveSystems::Control),
            );
    }
}

/// Spawn the scene camera.
fn spawn_camera(mut commands: Commands, mut session: ResMut<DriveSession>) {
    let camera = commands
        .spawn((
            Name::new("Chase Camera"),
            Camera3d::default(),
            Transform::from_translation(INITIAL_POSITION).looking_at(Vec3::ZERO, Vec3::Y),
            Projection::Perspective(PerspectiveProjection {
                fov: FOV_DEGREES.to_radians(),
                ..Default::default()
            }),
            ChaseCamera,
            ChaseCameraConfig::default(),
        ))
        .id();

    session.camera = Some(camera);
}
