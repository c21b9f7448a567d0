//! Debug overlay.
//!
//! Shows the live input sample, car readouts and track collision statistics,
//! and exposes the drive and camera tuning for live editing.

use bevy::{
    diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin},
    ecs::system::SystemParam,
    gizmos::config::GizmoConfigStore,
    prelude::*,
};
use bevy_egui::{EguiContexts, EguiPlugin, EguiPrimaryContextPass, egui};
use leafwing_input_manager::prelude::*;

use avian3d::prelude::Position;

use crate::{
    camera::ChaseCameraConfig,
    input::{DriveAction, Driver},
    launch_params::LaunchParams,
    physics::{TrackCollider, is_physics_debug_enabled, toggle_physics_debug},
    session::DriveSession,
    vehicle::{CarChassis, CarReadback, DriveTuning, core::horizontal_speed},
};

/// Resource controlling whether the debug overlay is visible.
#[derive(Resource, Default)]
pub struct UiVisible(pub bool);

/// Plugin for the debug overlay.
pub struct DebugUiPlugin;

impl Plugin for DebugUiPlugin {
    fn build(&self, app: &mut App) {
        let visible = app
            .world()
            .get_resource::<LaunchParams>()
            .is_some_and(|p| p.debug_ui);

        app.add_plugins(EguiPlugin::default())
            .add_plugins(FrameTimeDiagnosticsPlugin::default())
            .insert_resource(UiVisible(visible))
            .add_systems(Update, toggle_ui_visible)
            .add_systems(
                EguiPrimaryContextPass,
                debug_ui_system.run_if(|visible: Res<UiVisible>| visible.0),
            );
    }
}

/// Toggle overlay visibility with F1.
fn toggle_ui_visible(
    action_query: Query<&ActionState<DriveAction>, With<Driver>>,
    mut visible: ResMut<UiVisible>,
) {
    let Ok(action_state) = action_query.single() else {
        return;
    };

    if action_state.just_pressed(&DriveAction::ToggleDebugUi) {
        visible.0 = !visible.0;
    }
}

/// Queries for the car and camera shown in the overlay.
#[derive(SystemParam)]
struct OverlayParams<'w, 's> {
    session: Res<'w, DriveSession>,
    car_query: Query<
        'w,
        's,
        (
            &'static Position,
            &'static CarReadback,
            &'static mut DriveTuning,
        ),
    >,
    chassis_query: Query<'w, 's, &'static CarChassis>,
    camera_query: Query<'w, 's, &'static mut ChaseCameraConfig>,
    collider_query: Query<'w, 's, &'static TrackCollider>,
}

/// Render the debug overlay.
fn debug_ui_system(
    mut contexts: EguiContexts,
    diagnostics: Res<DiagnosticsStore>,
    mut config_store: ResMut<GizmoConfigStore>,
    mut overlay: OverlayParams,
) -> Result {
    let ctx = contexts.ctx_mut()?;

    let fps = diagnostics
        .get(&FrameTimeDiagnosticsPlugin::FPS)
        .and_then(bevy::diagnostic::Diagnostic::smoothed)
        .unwrap_or(0.0);
    let input = overlay.session.input.load();
    let respawns = overlay.session.respawns;
    let track = overlay.session.track;
    let car = overlay.session.car;
    let camera = overlay.session.camera;

    egui::Window::new("Debug")
        .default_pos([10.0, 10.0])
        .show(ctx, |ui| {
            ui.label(format!("FPS: {fps:.0}"));
            ui.label(format!("Input: x {:+.2}, y {:+.2}", input.x, input.y));
            ui.separator();

            if let Some(car) = car
                && let Ok((position, readback, mut tuning)) = overlay.car_query.get_mut(car)
            {
                let p = position.0;
                ui.label(format!("Position: ({:.1}, {:.1}, {:.1})", p.x, p.y, p.z));
                ui.label(format!(
                    "Speed: {:.1} m/s ({:.0} km/h)",
                    horizontal_speed(readback.velocity),
                    horizontal_speed(readback.velocity) * 3.6
                ));
                ui.label(format!("Vertical: {:+.1} m/s", readback.velocity.y));
                ui.label(format!("Tilt target: {:+.3} rad", readback.tilt));
                if let Some(chassis) = overlay.chassis_query.iter().next() {
                    ui.label(format!("Chassis pitch: {:+.3} rad", chassis.pitch));
                }
                ui.label(format!("Respawns: {respawns}"));

                ui.collapsing("Drive tuning", |ui| {
                    ui.add(
                        egui::Slider::new(&mut tuning.angular_gain, 0.0..=10.0)
                            .text("Angular gain"),
                    );
                    ui.add(
                        egui::Slider::new(&mut tuning.throttle_gain, 0.0..=80.0)
                            .text("Throttle gain"),
                    );
                    ui.add(
                        egui::Slider::new(&mut tuning.idle_decay, 0.5..=1.0).text("Idle decay"),
                    );
                    ui.add(
                        egui::Slider::new(&mut tuning.tilt_smoothing, 0.0..=1.0)
                            .text("Tilt smoothing"),
                    );
                    vec3_sliders(ui, "Spawn:", &mut tuning.spawn_position, -500.0..=500.0);
                });
            } else {
                ui.label("Car: not spawned");
            }

            if let Some(camera) = camera
                && let Ok(mut chase) = overlay.camera_query.get_mut(camera)
            {
                ui.collapsing("Chase camera", |ui| {
                    vec3_sliders(ui, "Offset:", &mut chase.offset, -50.0..=50.0);
                    ui.add(egui::Slider::new(&mut chase.smoothing, 0.0..=1.0).text("Smoothing"));
                });
            }

            ui.separator();
            if track.baked {
                ui.label(format!(
                    "Track collision: {} meshes, {} triangles",
                    track.meshes, track.triangles
                ));
                if track.skipped > 0 {
                    ui.label(format!("Skipped meshes: {}", track.skipped));
                }
                ui.collapsing("Colliders", |ui| {
                    for collider in &overlay.collider_query {
                        ui.label(format!("{} ({})", collider.source, collider.triangles));
                    }
                });
            } else {
                ui.label("Track collision: loading...");
            }

            let mut debug_enabled = is_physics_debug_enabled(&config_store);
            if ui
                .checkbox(&mut debug_enabled, "Show colliders (F2)")
                .changed()
            {
                toggle_physics_debug(&mut config_store);
            }
        });

    Ok(())
}

// ============================================================================
// UI helpers
// ============================================================================

/// Render drag values for a Vec3 with configurable range.
fn vec3_sliders(
    ui: &mut egui::Ui,
    label: &str,
    value: &mut Vec3,
    range: std::ops::RangeInclusive<f32>,
) {
    ui.label(label);
    ui.horizontal(|ui| {
        for (axis, component) in [("X:", &mut value.x), ("Y:", &mut value.y), ("Z:", &mut value.z)]
        {
            ui.label(axis);
            ui.add(
                egui::DragValue::new(component)
                    .range(range.clone())
                    .speed(0.1),
            );
        }
    });
}
