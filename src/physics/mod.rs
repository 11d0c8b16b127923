//! Colliders for Box2D-style engines: convex polygons of at most 8 vertices,
//! circles, capsules and chains. Nothing here simulates anything.
mod collider;
mod builder;

pub use collider::*;
pub use builder::*;

use derive_more::*;
use crate::math::DecomposeError;

#[derive(Error, Display, Debug, Clone, PartialEq)]
pub enum PhysicsError {
    #[display(fmt="Tile {tile_id}, object {object_id}: {cause}")]
    Decompose {
        tile_id: u32,
        object_id: u32,
        #[error(source)]
        cause: DecomposeError,
    },
    #[display(fmt="Tile {tile_id}, object {object_id}: polygon has no area left after cleanup ({vertices} vertices)")]
    Degenerate { tile_id: u32, object_id: u32, vertices: usize },
}
