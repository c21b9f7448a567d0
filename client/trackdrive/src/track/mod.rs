//! Race track loading and collision extraction.
//!
//! The track glTF is rendered as-is. Once its scene instance is ready, the
//! hierarchy is walked once and every mesh whose name matches the drivable
//! allow-list is baked into a static trimesh collider in world space.

pub mod collision;

use bevy::{
    mesh::{PrimitiveTopology, VertexAttributeValues},
    prelude::*,
    scene::SceneInstanceReady,
    transform::helper::TransformHelper,
};

use collision::{CollisionBakeError, DrivableFilter, StaticCollisionSurface};

use crate::{
    launch_params::LaunchParams,
    physics::track_collider::{create_track_collider, track_body},
    session::{DriveSession, TrackCollisionStats},
};

/// Plugin for the race track.
pub struct TrackPlugin;

impl Plugin for TrackPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<TrackScene>()
            .add_systems(Startup, spawn_track)
            .add_observer(on_track_scene_ready);
    }
}

/// The spawned track scene and the filter used to bake it.
#[derive(Resource, Default)]
struct TrackScene {
    /// Scene root entity, set once the track is spawned.
    root: Option<Entity>,
    /// Drivable mesh name filter.
    filter: DrivableFilter,
}

/// A drivable mesh captured during traversal.
struct DrivableCapture {
    /// Name that matched the allow-list.
    name: String,
    /// The mesh asset.
    mesh: Handle<Mesh>,
    /// World transform at traversal time.
    world: Mat4,
}

/// Spawn the visual track scene.
fn spawn_track(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    launch_params: Res<LaunchParams>,
    mut track: ResMut<TrackScene>,
) {
    track.filter = DrivableFilter::default()
        .with_extra(launch_params.collision_patterns.iter().map(String::as_str));

    let scene = asset_server
        .load(GltfAssetLabel::Scene(0).from_asset(launch_params.track_model.clone()));
    let root = commands.spawn((Name::new("Track"), SceneRoot(scene))).id();
    track.root = Some(root);

    tracing::info!(
        "Loading track {} (drivable patterns: {})",
        launch_params.track_model,
        track.filter.patterns().join(", ")
    );
}

/// Observer called when the track scene finishes spawning.
#[allow(clippy::too_many_arguments)]
fn on_track_scene_ready(
    trigger: On<SceneInstanceReady>,
    mut commands: Commands,
    track: Res<TrackScene>,
    mut session: ResMut<DriveSession>,
    meshes: Res<Assets<Mesh>>,
    transform_helper: TransformHelper,
    children_query: Query<&Children>,
    mesh_query: Query<(Option<&Name>, Option<&ChildOf>, &Mesh3d)>,
    name_query: Query<&Name>,
) {
    let Some(root) = track.root else {
        return;
    };
    if trigger.event_target() != root {
        return;
    }

    // Capture geometry and world transforms in a single pass.
    let mut captures = Vec::new();
    for entity in children_query.iter_descendants(root) {
        let Ok((name, child_of, mesh)) = mesh_query.get(entity) else {
            continue;
        };

        let parent_name = child_of.and_then(|c| name_query.get(c.parent()).ok());
        let Some(matched) = track
            .filter
            .match_entity(name.map(Name::as_str), parent_name.map(Name::as_str))
        else {
            continue;
        };

        let world = match transform_helper.compute_global_transform(entity) {
            Ok(global) => Mat4::from(global.affine()),
            Err(e) => {
                tracing::warn!("Skipping {matched}: no world transform ({e:?})");
                continue;
            }
        };

        captures.push(DrivableCapture {
            name: matched.to_string(),
            mesh: mesh.0.clone(),
            world,
        });
    }

    let mut stats = TrackCollisionStats {
        baked: true,
        ..Default::default()
    };

    for capture in &captures {
        let surface = match bake_capture(capture, &meshes) {
            Ok(surface) if surface.is_empty() => {
                stats.skipped += 1;
                tracing::warn!("Skipping collision for {}: no triangles", capture.name);
                continue;
            }
            Ok(surface) => surface,
            Err(e) => {
                stats.skipped += 1;
                tracing::warn!("Skipping collision for {}: {e}", capture.name);
                continue;
            }
        };

        match create_track_collider(&surface, &capture.name) {
            Ok(collider) => {
                let triangles = surface.triangle_count();
                commands.spawn(track_body(collider, &capture.name, triangles));
                stats.meshes += 1;
                stats.triangles += triangles;
                tracing::debug!("Baked {} ({triangles} triangles)", capture.name);
            }
            Err(e) => {
                stats.skipped += 1;
                tracing::warn!("Skipping collision for {}: {e}", capture.name);
            }
        }
    }

    if stats.meshes == 0 {
        tracing::warn!("No drivable track meshes were baked; the car has nothing to land on");
    } else {
        tracing::info!(
            "Track collision ready: {} meshes, {} triangles",
            stats.meshes,
            stats.triangles
        );
    }

    session.track = stats;
}

/// Read a captured mesh and bake it into world space.
fn bake_capture(
    capture: &DrivableCapture,
    meshes: &Assets<Mesh>,
) -> collision::Result<StaticCollisionSurface> {
    let mesh = meshes
        .get(&capture.mesh)
        .ok_or_else(|| CollisionBakeError::MeshNotLoaded {
            mesh: capture.name.clone(),
        })?;

    if mesh.primitive_topology() != PrimitiveTopology::TriangleList {
        return Err(CollisionBakeError::UnsupportedTopology {
            mesh: capture.name.clone(),
        });
    }

    let positions = match mesh.attribute(Mesh::ATTRIBUTE_POSITION) {
        Some(VertexAttributeValues::Float32x3(positions)) => positions,
        Some(_) => {
            return Err(CollisionBakeError::UnsupportedPositionFormat {
                mesh: capture.name.clone(),
            });
        }
        None => {
            return Err(CollisionBakeError::MissingPositions {
                mesh: capture.name.clone(),
            });
        }
    };

    #[allow(clippy::cast_possible_truncation)]
    let indices: Option<Vec<u32>> = mesh
        .indices()
        .map(|indices| indices.iter().map(|i| i as u32).collect());

    StaticCollisionSurface::bake(positions, indices.as_deref(), capture.world)
}
