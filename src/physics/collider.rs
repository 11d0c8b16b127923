use glam::Vec2;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use crate::math::Aabb;

/// Vertices of a convex polygon collider. Inline up to the Box2D polygon cap.
pub type PolygonVertices = SmallVec<[Vec2; 8]>;

/// Shape handed to a physics engine, in output units.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Collider {
    Circle {
        center: Vec2,
        radius: f32,
    },
    /// Two semicircles joined by a rectangle.
    Capsule {
        center1: Vec2,
        center2: Vec2,
        radius: f32,
    },
    /// Convex, counter-clockwise in output space.
    Polygon {
        vertices: PolygonVertices,
        radius: f32,
    },
    /// Edges without an inside. `looped` closes the last point onto the first.
    Chain {
        points: Vec<Vec2>,
        looped: bool,
    },
}

impl Collider {
    pub fn polygon(vertices: impl IntoIterator<Item = Vec2>) -> Self {
        Self::Polygon {
            vertices: vertices.into_iter().collect(),
            radius: 0.0,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Circle { .. } => "circle",
            Self::Capsule { .. } => "capsule",
            Self::Polygon { .. } => "polygon",
            Self::Chain { .. } => "chain",
        }
    }

    pub fn aabb(&self) -> Aabb {
        match self {
            Self::Circle { center, radius } => Aabb::from_center_extents(*center, Vec2::splat(*radius)),
            Self::Capsule { center1, center2, radius } => {
                Aabb::from_points([center1, center2]).expand(*radius)
            },
            Self::Polygon { vertices, radius } => Aabb::from_points(vertices.iter()).expand(*radius),
            Self::Chain { points, .. } => Aabb::from_points(points),
        }
    }
}

/// Every collider of a single tile.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct TileColliders {
    pub tile_id: u32,
    /// Tile size in pixels.
    pub size: (u32, u32),
    pub colliders: Vec<Collider>,
}

impl TileColliders {
    pub fn aabb(&self) -> Aabb {
        self.colliders
            .iter()
            .fold(Aabb::EMPTY, |aabb, collider| aabb.union(collider.aabb()))
    }
}
