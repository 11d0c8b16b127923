//! Debug drawing of hitboxes and colliders.
mod color;
mod draw;
mod svg;

pub use color::*;
pub use draw::*;
pub use svg::*;
