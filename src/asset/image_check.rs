use std::path::Path;
use derive_more::*;
use crate::map::{TileImage, Tileset};

/// Problem with an image a tileset refers to.
#[derive(Display, Clone, Eq, PartialEq, Debug)]
pub enum ImageIssue {
    #[display(fmt="{path}: file not found")]
    Missing { tile_id: Option<u32>, path: String },
    #[display(fmt="{path}: {message}")]
    Unreadable { tile_id: Option<u32>, path: String, message: String },
    #[display(fmt="{path}: declared {}x{} but the image is {}x{}", "declared.0", "declared.1", "actual.0", "actual.1")]
    SizeMismatch { tile_id: Option<u32>, path: String, declared: (u32, u32), actual: (u32, u32) },
}

impl ImageIssue {
    /// Tile the image belongs to. `None` for the atlas image.
    pub fn tile_id(&self) -> Option<u32> {
        match self {
            Self::Missing { tile_id, .. } => *tile_id,
            Self::Unreadable { tile_id, .. } => *tile_id,
            Self::SizeMismatch { tile_id, .. } => *tile_id,
        }
    }
}

/// Opens every image of the tileset under `root` and compares it to its declared size.
/// Only image headers are decoded.
pub fn verify_tile_images(tileset: &Tileset, root: impl AsRef<Path>) -> Vec<ImageIssue> {
    let root = root.as_ref();
    let atlas = tileset.image.iter().map(|image| (None, image));
    let tile_images = tileset
        .tiles()
        .filter_map(|tile| tile.image.as_ref().map(|image| (Some(tile.id), image)));
    let issues: Vec<ImageIssue> = atlas
        .chain(tile_images)
        .filter_map(|(tile_id, image)| verify_image(tile_id, image, root))
        .collect();
    if !issues.is_empty() {
        log::warn!("Tileset '{}' has {} image issues", tileset.name, issues.len());
    }
    issues
}

fn verify_image(tile_id: Option<u32>, image: &TileImage, root: &Path) -> Option<ImageIssue> {
    let file_path = root.join(&image.path);
    let path = image.path.clone();
    if !file_path.is_file() {
        return Some(ImageIssue::Missing { tile_id, path });
    }
    let actual = match image::image_dimensions(&file_path) {
        Ok(dimensions) => dimensions,
        Err(err) => return Some(ImageIssue::Unreadable { tile_id, path, message: err.to_string() }),
    };
    let declared = (image.width, image.height);
    // Tiled omits the size when it never loaded the image.
    if declared != (0, 0) && declared != actual {
        return Some(ImageIssue::SizeMismatch { tile_id, path, declared, actual });
    }
    None
}
