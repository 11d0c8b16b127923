//! Loads Tiled `.tsx` tilesets, turns the collision shapes drawn on their tiles into
//! hitboxes, and prepares those hitboxes as colliders for a Box2D-style physics engine.
pub mod config;
pub mod debug;
pub mod map;
pub mod math;
pub mod physics;
mod asset;
mod util;

pub use asset::*;
pub use util::*;
pub use config::Config;
pub use map::{Hitbox, HitboxShape, Tile, Tileset, TsxLoader};
pub use physics::{Collider, ColliderBuilder, TileColliders};
