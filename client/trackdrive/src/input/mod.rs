//! Input action definitions and the device bridge.
//!
//! Defines driver actions using `leafwing-input-manager` for declarative,
//! rebindable input mapping. Every frame the `Drive` stick is published into
//! the shared [`InputVector`] snapshot that the vehicle controller reads.

pub mod shared;

use bevy::prelude::*;
use leafwing_input_manager::{plugin::InputManagerSystem, prelude::*};

pub use shared::{InputVector, SharedInput};

use crate::session::DriveSession;

// ============================================================================
// Action enums
// ============================================================================

/// Actions available to the driver.
#[derive(Actionlike, PartialEq, Eq, Hash, Clone, Copy, Debug, Reflect)]
pub enum DriveAction {
    /// Steering on X, throttle on Y.
    #[actionlike(DualAxis)]
    Drive,
    /// Teleport back to the spawn point.
    Respawn,
    /// Show or hide the debug overlay (F1).
    ToggleDebugUi,
    /// Show or hide collider gizmos (F2).
    TogglePhysicsDebug,
}

/// Create the default input map for driver actions.
///
/// The left stick, WASD and the arrow keys all feed the same axis pair.
pub fn default_drive_input_map() -> InputMap<DriveAction> {
    InputMap::default()
        .with_dual_axis(DriveAction::Drive, GamepadStick::LEFT)
        .with_dual_axis(DriveAction::Drive, VirtualDPad::wasd())
        .with_dual_axis(DriveAction::Drive, VirtualDPad::arrow_keys())
        .with(DriveAction::Respawn, KeyCode::KeyR)
        .with(DriveAction::Respawn, GamepadButton::North)
        .with(DriveAction::ToggleDebugUi, KeyCode::F1)
        .with(DriveAction::TogglePhysicsDebug, KeyCode::F2)
}

// ============================================================================
// Plugin
// ============================================================================

/// Marker for the entity owning the driver's action state.
#[derive(Component)]
pub struct Driver;

/// Plugin that registers driver actions and publishes the stick sample.
pub struct DriveInputPlugin;

impl Plugin for DriveInputPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(InputManagerPlugin::<DriveAction>::default())
            .add_systems(Startup, spawn_driver)
            .add_systems(
                PreUpdate,
                publish_drive_input.after(InputManagerSystem::Update),
            );
    }
}

fn spawn_driver(mut commands: Commands) {
    commands.spawn((
        Name::new("Driver"),
        Driver,
        ActionState::<DriveAction>::default(),
        default_drive_input_map(),
    ));
}

/// Copy the `Drive` axis pair into the shared snapshot.
///
/// A released stick yields `(0, 0)`, the same as the widget's stop callback.
fn publish_drive_input(
    session: Res<DriveSession>,
    action_query: Query<&ActionState<DriveAction>, With<Driver>>,
) {
    let Ok(action_state) = action_query.single() else {
        return;
    };

    let stick = action_state.clamped_axis_pair(&DriveAction::Drive);
    if stick == Vec2::ZERO {
        session.input.release();
    } else {
        session.input.store(InputVector::new(stick.x, stick.y));
    }
}
