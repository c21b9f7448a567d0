//! Physics integration using Avian 3D.
//!
//! Avian steps in fixed substeps decoupled from the render rate. The drive
//! routines run once per rendered frame and read whatever state the last
//! fixed step left behind.

pub mod track_collider;

use avian3d::debug_render::{PhysicsDebugPlugin, PhysicsGizmos};
use avian3d::prelude::*;
use bevy::color::palettes::css::LIME;
use bevy::gizmos::config::{GizmoConfig, GizmoConfigStore};
use bevy::prelude::*;
use leafwing_input_manager::prelude::ActionState;

use crate::{
    input::{DriveAction, Driver},
    launch_params::{DEFAULT_PHYSICS_HZ, DEFAULT_SUBSTEPS, LaunchParams},
};

pub use track_collider::TrackCollider;

/// Gravitational acceleration (m/s^2).
pub const GRAVITY: f32 = 9.82;

/// Plugin for physics world setup.
pub struct PhysicsIntegrationPlugin;

impl Plugin for PhysicsIntegrationPlugin {
    fn build(&self, app: &mut App) {
        let (physics_hz, substeps) = app
            .world()
            .get_resource::<LaunchParams>()
            .map_or((DEFAULT_PHYSICS_HZ, DEFAULT_SUBSTEPS), |p| {
                (p.physics_hz, p.substeps)
            });

        app.add_plugins(PhysicsPlugins::default())
            // Add debug rendering plugin (disabled by default).
            .add_plugins(PhysicsDebugPlugin)
            .insert_resource(Gravity(Vec3::NEG_Y * GRAVITY))
            .insert_resource(SubstepCount(substeps))
            .insert_resource(Time::<Fixed>::from_hz(physics_hz))
            .add_systems(Startup, configure_physics_debug_on_startup)
            .add_systems(Update, physics_debug_hotkey);

        tracing::info!("Physics running at {physics_hz} Hz with {substeps} substeps");
    }
}

/// Configure physics debug rendering on startup (disabled by default, user can toggle it on).
fn configure_physics_debug_on_startup(mut config_store: ResMut<GizmoConfigStore>) {
    let physics_gizmos = PhysicsGizmos {
        collider_color: Some(LIME.into()),
        ..Default::default()
    };

    // Use negative depth_bias to render gizmos on top of geometry.
    let gizmo_config = GizmoConfig {
        enabled: false,
        depth_bias: -1.0,
        ..Default::default()
    };

    config_store.insert(gizmo_config, physics_gizmos);
}

/// Toggle physics debug visualization.
pub fn toggle_physics_debug(config_store: &mut GizmoConfigStore) {
    let (config, _) = config_store.config_mut::<PhysicsGizmos>();
    config.enabled = !config.enabled;
    tracing::info!("Physics debug visualization: {}", config.enabled);
}

/// Check if physics debug is currently enabled.
pub fn is_physics_debug_enabled(config_store: &GizmoConfigStore) -> bool {
    let (config, _) = config_store.config::<PhysicsGizmos>();
    config.enabled
}

fn physics_debug_hotkey(
    action_query: Query<&ActionState<DriveAction>, With<Driver>>,
    mut config_store: ResMut<GizmoConfigStore>,
) {
    let Ok(action_state) = action_query.single() else {
        return;
    };
    if action_state.just_pressed(&DriveAction::TogglePhysicsDebug) {
        toggle_physics_debug(&mut config_store);
    }
}
