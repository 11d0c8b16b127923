//! Tiled tilesets and the collision shapes drawn on their tiles.
pub mod parse;
mod error;
mod hitbox;
mod tile;
mod tileset;
mod validate;

pub use error::*;
pub use hitbox::*;
pub use tile::*;
pub use tileset::*;
pub use validate::*;
