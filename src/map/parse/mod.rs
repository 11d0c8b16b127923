//! Structs defined here mirror those in [`crate::map`].
//! The main difference is that they're mostly a 1:1 mapping of the tsx spec:
//! objects are kept as written, whatever their class or shape.
mod tileset;
mod tile;
mod object;
mod property;

pub use tileset::*;
pub use tile::*;
pub use object::*;
pub use property::*;
