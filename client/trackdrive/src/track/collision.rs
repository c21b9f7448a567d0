//! Collision surface baking.
//!
//! Turns the world-space triangles of selected visual meshes into flat
//! triangle soups suitable for a static trimesh collider. Free of Bevy
//! types so it can be tested directly.

use std::fmt;

use glam::{Mat4, Vec3};

/// Name fragments of track sub-meshes the car can touch.
pub const DEFAULT_DRIVABLE_PATTERNS: &[&str] = &[
    "road",
    "tarmac",
    "runoff",
    "white_line",
    "grass",
    "sand_patches",
    "barriers",
    "collision",
];

/// Friction of the baked track surface.
///
/// Near zero so the car slides across seams between sub-meshes instead of
/// catching on them.
pub const TRACK_FRICTION: f32 = 0.01;

/// Result type for collision baking.
pub type Result<T> = std::result::Result<T, CollisionBakeError>;

/// Errors that can occur while baking a collision surface.
#[derive(Debug, Clone, PartialEq)]
pub enum CollisionBakeError {
    /// The mesh asset is not loaded.
    MeshNotLoaded {
        /// Name of the offending mesh.
        mesh: String,
    },
    /// The mesh is not a plain triangle list.
    UnsupportedTopology {
        /// Name of the offending mesh.
        mesh: String,
    },
    /// The mesh has no position attribute.
    MissingPositions {
        /// Name of the offending mesh.
        mesh: String,
    },
    /// The position attribute is not three 32-bit floats per vertex.
    UnsupportedPositionFormat {
        /// Name of the offending mesh.
        mesh: String,
    },
    /// An index points past the end of the vertex buffer.
    IndexOutOfRange {
        /// The bad index.
        index: u32,
        /// Number of vertices available.
        vertex_count: usize,
    },
    /// The physics engine rejected the triangle soup.
    Trimesh {
        /// Name of the offending mesh.
        mesh: String,
        /// The error message.
        message: String,
    },
}

impl fmt::Display for CollisionBakeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollisionBakeError::MeshNotLoaded { mesh } => {
                write!(f, "mesh '{mesh}' is not loaded")
            }
            CollisionBakeError::UnsupportedTopology { mesh } => {
                write!(f, "mesh '{mesh}' is not a triangle list")
            }
            CollisionBakeError::MissingPositions { mesh } => {
                write!(f, "mesh '{mesh}' has no vertex positions")
            }
            CollisionBakeError::UnsupportedPositionFormat { mesh } => {
                write!(f, "mesh '{mesh}' positions are not Float32x3")
            }
            CollisionBakeError::IndexOutOfRange {
                index,
                vertex_count,
            } => {
                write!(f, "index {index} out of range for {vertex_count} vertices")
            }
            CollisionBakeError::Trimesh { mesh, message } => {
                write!(f, "trimesh for '{mesh}' rejected: {message}")
            }
        }
    }
}

impl std::error::Error for CollisionBakeError {}

/// Case-insensitive allow-list of drivable mesh names.
#[derive(Clone, Debug)]
pub struct DrivableFilter {
    patterns: Vec<String>,
}

impl Default for DrivableFilter {
    fn default() -> Self {
        Self::new(DEFAULT_DRIVABLE_PATTERNS.iter().copied())
    }
}

impl DrivableFilter {
    /// Build a filter from name fragments.
    pub fn new<'a>(patterns: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            patterns: patterns.into_iter().map(str::to_lowercase).collect(),
        }
    }

    /// Add further fragments on top of the existing ones.
    #[must_use]
    pub fn with_extra<'a>(mut self, extra: impl IntoIterator<Item = &'a str>) -> Self {
        self.patterns.extend(extra.into_iter().map(str::to_lowercase));
        self
    }

    /// The lower-cased fragments.
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// Whether the lower-cased `name` contains any fragment.
    pub fn matches(&self, name: &str) -> bool {
        let name = name.to_lowercase();
        self.patterns.iter().any(|p| name.contains(p.as_str()))
    }

    /// Match a mesh entity by its own name, falling back to its parent's.
    ///
    /// glTF primitives are often unnamed children of the named node. Returns
    /// the name that matched, preferring the mesh's own.
    pub fn match_entity<'a>(
        &self,
        own: Option<&'a str>,
        parent: Option<&'a str>,
    ) -> Option<&'a str> {
        [own, parent].into_iter().flatten().find(|n| self.matches(n))
    }
}

/// A static triangle soup in world space.
///
/// Triangle `i` always uses vertices `3i`, `3i + 1` and `3i + 2`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StaticCollisionSurface {
    /// World-space vertex positions, three per triangle.
    pub vertices: Vec<Vec3>,
    /// Identity triangle indices.
    pub triangles: Vec<[u32; 3]>,
}

impl StaticCollisionSurface {
    /// Bake a mesh into world space.
    ///
    /// `indices` of `None` means the positions are already a flat triangle
    /// list. A trailing partial triangle is dropped.
    pub fn bake(positions: &[[f32; 3]], indices: Option<&[u32]>, world: Mat4) -> Result<Self> {
        let to_world = |p: &[f32; 3]| world.transform_point3(Vec3::from_array(*p));

        let vertices: Vec<Vec3> = match indices {
            Some(indices) => {
                let usable = indices.len() - indices.len() % 3;
                indices[..usable]
                    .iter()
                    .map(|&i| {
                        positions
                            .get(i as usize)
                            .map(to_world)
                            .ok_or(CollisionBakeError::IndexOutOfRange {
                                index: i,
                                vertex_count: positions.len(),
                            })
                    })
                    .collect::<Result<_>>()?
            }
            None => {
                let usable = positions.len() - positions.len() % 3;
                positions[..usable].iter().map(to_world).collect()
            }
        };

        let triangles = identity_triangles(vertices.len() / 3);
        Ok(Self {
            vertices,
            triangles,
        })
    }

    /// Number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Whether the surface has no triangles.
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }
}

/// `[[0, 1, 2], [3, 4, 5], ...]` for `count` triangles.
#[allow(clippy::cast_possible_truncation)]
fn identity_triangles(count: usize) -> Vec<[u32; 3]> {
    (0..count as u32)
        .map(|t| [3 * t, 3 * t + 1, 3 * t + 2])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUAD: [[f32; 3]; 4] = [
        [0.0, 0.0, 0.0],
        [1.0, 0.0, 0.0],
        [1.0, 0.0, 1.0],
        [0.0, 0.0, 1.0],
    ];

    #[test]
    fn test_default_filter_matches_scene_names() {
        let filter = DrivableFilter::default();
        let names = ["Road_01", "Skybox", "Collision_Wall"];
        let matched: Vec<_> = names.iter().filter(|n| filter.matches(n)).collect();
        assert_eq!(matched, vec![&"Road_01", &"Collision_Wall"]);
    }

    #[test]
    fn test_filter_is_case_insensitive_substring() {
        let filter = DrivableFilter::default();
        assert!(filter.matches("PIT_TARMAC.003"));
        assert!(filter.matches("trackside_Sand_Patches"));
        assert!(filter.matches("WHITE_LINE_left"));
        assert!(!filter.matches("grandstand"));
        assert!(!filter.matches("white line"));
    }

    #[test]
    fn test_filter_extra_patterns() {
        let filter = DrivableFilter::default().with_extra(["Kerb"]);
        assert!(filter.matches("kerb_turn1"));
        assert_eq!(filter.patterns().last().map(String::as_str), Some("kerb"));
    }

    #[test]
    fn test_unnamed_primitive_matches_through_parent() {
        let filter = DrivableFilter::default();
        assert_eq!(filter.match_entity(None, Some("Road_01")), Some("Road_01"));
        assert_eq!(filter.match_entity(None, Some("Skybox")), None);
        assert_eq!(filter.match_entity(Some("Primitive0"), Some("Skybox")), None);
        assert_eq!(filter.match_entity(None, None), None);
    }

    #[test]
    fn test_own_name_wins_over_parent() {
        let filter = DrivableFilter::default();
        assert_eq!(
            filter.match_entity(Some("Tarmac_Main"), Some("Road_01")),
            Some("Tarmac_Main")
        );
        assert_eq!(
            filter.match_entity(Some("Collision_Wall"), None),
            Some("Collision_Wall")
        );
        assert_eq!(
            filter.match_entity(Some("Collision_Wall"), Some("Skybox")),
            Some("Collision_Wall")
        );
    }

    #[test]
    fn test_empty_filter_matches_nothing() {
        let filter = DrivableFilter::new(std::iter::empty());
        assert!(!filter.matches("road"));
    }

    #[test]
    fn test_bake_indexed_quad_expands_and_translates() {
        let world = Mat4::from_translation(Vec3::new(10.0, -1.0, 0.0));
        let surface =
            StaticCollisionSurface::bake(&QUAD, Some(&[0, 1, 2, 0, 2, 3][..]), world).unwrap();

        assert_eq!(surface.vertices.len(), 6);
        assert_eq!(surface.triangles, vec![[0, 1, 2], [3, 4, 5]]);
        assert_eq!(surface.vertices[0], Vec3::new(10.0, -1.0, 0.0));
        assert_eq!(surface.vertices[3], Vec3::new(10.0, -1.0, 0.0));
        assert_eq!(surface.vertices[5], Vec3::new(10.0, -1.0, 1.0));
    }

    #[test]
    fn test_bake_applies_scale_and_rotation() {
        let world = Mat4::from_scale_rotation_translation(
            Vec3::splat(2.0),
            glam::Quat::from_rotation_y(std::f32::consts::PI),
            Vec3::ZERO,
        );
        let surface = StaticCollisionSurface::bake(&QUAD[..3], None, world).unwrap();

        let corner = surface.vertices[2];
        assert!((corner.x - -2.0).abs() < 1e-5);
        assert!((corner.z - -2.0).abs() < 1e-5);
    }

    #[test]
    fn test_bake_non_indexed_drops_partial_triangle() {
        let surface = StaticCollisionSurface::bake(&QUAD, None, Mat4::IDENTITY).unwrap();
        assert_eq!(surface.vertices.len(), 3);
        assert_eq!(surface.triangle_count(), 1);
    }

    #[test]
    fn test_bake_rejects_out_of_range_index() {
        let err = StaticCollisionSurface::bake(&QUAD, Some(&[0, 1, 9][..]), Mat4::IDENTITY)
            .unwrap_err();
        assert_eq!(
            err,
            CollisionBakeError::IndexOutOfRange {
                index: 9,
                vertex_count: 4
            }
        );
        assert_eq!(err.to_string(), "index 9 out of range for 4 vertices");
    }

    #[test]
    fn test_bake_degenerate_mesh_is_empty() {
        let surface = StaticCollisionSurface::bake(&QUAD[..2], None, Mat4::IDENTITY).unwrap();
        assert!(surface.is_empty());

        let surface =
            StaticCollisionSurface::bake(&QUAD, Some(&[0, 1][..]), Mat4::IDENTITY).unwrap();
        assert!(surface.is_empty());
        assert_eq!(surface.triangle_count(), 0);
    }

    #[test]
    fn test_bake_empty_mesh() {
        let surface = StaticCollisionSurface::bake(&[], Some(&[][..]), Mat4::IDENTITY).unwrap();
        assert!(surface.is_empty());
        assert!(surface.vertices.is_empty());
    }
}
