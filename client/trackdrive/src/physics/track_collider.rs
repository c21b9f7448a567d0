//! Static track collider creation.
//!
//! Wraps baked collision surfaces in Avian trimesh colliders.

use avian3d::prelude::*;
use bevy::prelude::*;

use crate::track::collision::{CollisionBakeError, StaticCollisionSurface, TRACK_FRICTION};

/// Marker component for track colliders.
///
/// These are static bodies baked once from the visual track mesh.
#[derive(Component)]
pub struct TrackCollider {
    /// Name of the visual mesh this collider was baked from.
    pub source: String,
    /// Number of triangles in the collider.
    pub triangles: usize,
}

/// Create a trimesh collider from a baked surface.
///
/// The surface is already in world space, so the body sits at the origin.
pub fn create_track_collider(
    surface: &StaticCollisionSurface,
    source: &str,
) -> Result<Collider, CollisionBakeError> {
    // Use try_trimesh to avoid panicking on invalid input.
    Collider::try_trimesh(surface.vertices.clone(), surface.triangles.clone()).map_err(|e| {
        CollisionBakeError::Trimesh {
            mesh: source.to_string(),
            message: format!("{e:?}"),
        }
    })
}

/// Bundle for a static, near-frictionless track body.
pub fn track_body(collider: Collider, source: &str, triangles: usize) -> impl Bundle {
    (
        Name::new(format!("Track Collider ({source})")),
        TrackCollider {
            source: source.to_string(),
            triangles,
        },
        RigidBody::Static,
        collider,
        Friction::new(TRACK_FRICTION),
        Transform::IDENTITY,
    )
}
