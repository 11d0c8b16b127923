mod manager;
mod loader;
mod protocol;
mod path_parts;
mod image_check;

pub use manager::*;
pub use loader::*;
pub use protocol::*;
pub use path_parts::*;
pub use image_check::*;
