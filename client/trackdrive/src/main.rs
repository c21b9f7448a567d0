//! Browser-friendly 3D driving demo using Bevy.
//!
//! A physics-driven car is steered around a glTF race track with a gamepad
//! stick or the keyboard, followed by a smoothed chase camera.

mod camera;
mod input;
mod launch_params;
mod physics;
mod session;
mod track;
mod ui;
mod vehicle;

use bevy::light::GlobalAmbientLight;
use bevy::light::light_consts::lux;
use bevy::prelude::*;
use camera::ChaseCameraPlugin;
use input::DriveInputPlugin;
use physics::PhysicsIntegrationPlugin;
use session::DriveSession;
use track::TrackPlugin;
use ui::DebugUiPlugin;
use vehicle::VehiclePlugin;

/// Direction the late-afternoon sun shines from.
const SUN_DIRECTION: Vec3 = Vec3::new(-0.6, -0.35, -0.7);

/// Plugin for the main application.
pub struct AppPlugin;

impl Plugin for AppPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((
            DriveInputPlugin,
            PhysicsIntegrationPlugin,
            TrackPlugin,
            VehiclePlugin,
            ChaseCameraPlugin,
            DebugUiPlugin,
        ))
        .insert_resource(GlobalAmbientLight {
            color: Color::srgb(1.0, 0.85, 0.7),
            brightness: 400.0,
            ..default()
        })
        .add_systems(Startup, setup_scene);
    }
}

/// Set up the scene lighting.
fn setup_scene(mut commands: Commands) {
    // Low, warm sun for a sunset look.
    commands.spawn((
        Name::new("Sun"),
        DirectionalLight {
            color: Color::srgb(1.0, 0.78, 0.55),
            illuminance: lux::AMBIENT_DAYLIGHT,
            shadows_enabled: true,
            ..default()
        },
        Transform::default().looking_to(SUN_DIRECTION, Vec3::Y),
    ));

    tracing::info!("Scene setup complete - drive with WASD, arrow keys or the left stick");
}

fn main() {
    // Initialize tracing for native platforms.
    #[cfg(not(target_family = "wasm"))]
    {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
        tracing_subscriber::registry()
            .with(tracing_subscriber::fmt::layer())
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
            )
            .init();
    }

    // Initialize tracing for WASM (logs to browser console).
    #[cfg(target_family = "wasm")]
    {
        console_error_panic_hook::set_once();
        tracing_wasm::set_as_global_default();
    }

    let mut app = App::new();

    // Plugins read these while building, so they go in first.
    app.insert_resource(launch_params::parse())
        .init_resource::<DriveSession>();

    #[allow(unused_mut)]
    let mut window = Window {
        title: "trackdrive".to_string(),
        resolution: (1280, 720).into(),
        position: WindowPosition::Centered(MonitorSelection::Primary),
        ..Default::default()
    };

    // WASM: Fit canvas to parent element and prevent browser event handling.
    #[cfg(target_family = "wasm")]
    {
        window.fit_canvas_to_parent = true;
        window.prevent_default_event_handling = true;
    }

    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(window),
        ..Default::default()
    }));

    app.add_plugins(AppPlugin).run();
}
