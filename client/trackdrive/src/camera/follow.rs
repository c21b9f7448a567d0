//! Chase camera system.
//!
//! Third-person camera that trails the car.

use avian3d::prelude::*;
use bevy::prelude::*;

use crate::session::DriveSession;

use super::chase::{self, DEFAULT_CHASE_OFFSET, DEFAULT_CHASE_SMOOTHING};

// ============================================================================
// Components
// ============================================================================

/// Marker for the camera that follows the car.
#[derive(Component)]
pub struct ChaseCamera;

/// Configuration for the chase camera.
#[derive(Component, Reflect, Clone)]
#[reflect(Component)]
pub struct ChaseCameraConfig {
    /// Camera position offset in body-local space (x=right, y=up, z=behind).
    pub offset: Vec3,
    /// Fraction of the remaining distance covered each frame.
    pub smoothing: f32,
}

impl Default for ChaseCameraConfig {
    fn default() -> Self {
        Self {
            offset: DEFAULT_CHASE_OFFSET,
            smoothing: DEFAULT_CHASE_SMOOTHING,
        }
    }
}

// ============================================================================
// Camera system
// ============================================================================

/// Move the camera toward its chase target and point it at the car.
///
/// Position is smoothed; orientation is not.
pub(super) fn chase_camera_system(
    session: Res<DriveSession>,
    body_query: Query<(&Position, &Rotation)>,
    mut camera_query: Query<(&ChaseCameraConfig, &mut Transform), With<ChaseCamera>>,
) {
    let (Some(car), Some(camera)) = (session.car, session.camera) else {
        return;
    };
    let Ok((position, rotation)) = body_query.get(car) else {
        return;
    };
    let Ok((config, mut transform)) = camera_query.get_mut(camera) else {
        return;
    };

    let pose = chase::step_chase_camera(
        transform.translation,
        position.0,
        rotation.0,
        config.offset,
        config.smoothing,
    );

    transform.translation = pose.position;
    transform.look_at(pose.look_at, Vec3::Y);
}
