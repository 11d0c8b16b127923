mod shape;
mod transform;
mod polygon;
mod decompose;

pub use shape::*;
pub use transform::*;
pub use polygon::*;
pub use decompose::*;
