//! Per-session context shared by the frame routines.
//!
//! Holds explicit handles to everything the controller, camera and overlay
//! touch, so no routine reaches for a global.

use bevy::prelude::*;

use crate::input::SharedInput;

/// Handles to the live session objects.
#[derive(Resource, Default)]
pub struct DriveSession {
    /// Latest stick sample, written by input producers.
    pub input: SharedInput,
    /// The car's rigid body, once spawned.
    pub car: Option<Entity>,
    /// The chase camera.
    pub camera: Option<Entity>,
    /// Summary of the baked track collision.
    pub track: TrackCollisionStats,
    /// Number of times the car has been reset to spawn.
    pub respawns: u32,
}

/// What the collision extractor produced for the loaded track.
#[derive(Clone, Copy, Debug, Default)]
pub struct TrackCollisionStats {
    /// Whether extraction has run for the current track.
    pub baked: bool,
    /// Number of static collision bodies registered.
    pub meshes: usize,
    /// Total triangles across all bodies.
    pub triangles: usize,
    /// Sub-meshes that matched but failed to bake.
    pub skipped: usize,
}
