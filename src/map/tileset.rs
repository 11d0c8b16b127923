use std::collections::BTreeMap;
use roxmltree::Document;
use crate::config::LoaderConfig;
use crate::map::parse::{self, Export, Properties};
use crate::util::URect;
use crate::{AssetLoader, AssetPath};
use super::{Hitbox, Tile, TileImage, TsxParseError};

/// Loader for a .tsx file.
/// Outputs a [`Tileset`].
#[derive(Clone, Default, Debug)]
pub struct TsxLoader {
    pub config: LoaderConfig,
}

impl TsxLoader {
    pub fn new(config: LoaderConfig) -> Self {
        Self { config }
    }
}

impl AssetLoader for TsxLoader {
    type AssetType = Tileset;

    fn load(&self, bytes: &[u8], path: &AssetPath) -> anyhow::Result<Tileset> {
        let xml_source = std::str::from_utf8(bytes)?;
        let xml_doc = Document::parse(xml_source)?;
        let parsed_tileset = parse::Tileset::parse_doc(xml_doc, path.parent().as_deref())?;
        let tileset = Tileset::from_parsed(parsed_tileset, &self.config)?;
        log::debug!("Loaded tileset '{}' from {path} with {} tiles", tileset.name, tileset.tiles.len());
        Ok(tileset)
    }

    fn extensions(&self) -> &[&str] {
        &["tsx"]
    }
}

/// A processed version of [`parse::Tileset`] where tiles are keyed by id and
/// collision objects are turned into [`Hitbox`]es.
#[derive(Clone, Default, Debug)]
pub struct Tileset {
    pub name: String,
    pub class: String,
    pub version: String,
    pub tiled_version: String,
    pub tile_width: u32,
    pub tile_height: u32,
    pub spacing: u32,
    pub margin: u32,
    pub tile_count: u32,
    pub columns: u32,
    pub object_alignment: ObjectAlignment,
    pub tile_render_size: TileRenderSize,
    pub fill_mode: FillMode,
    pub tile_offset: Option<TileOffset>,
    pub grid: Option<Grid>,
    /// Atlas image. `None` for image collections.
    pub image: Option<TileImage>,
    pub export: Option<Export>,
    pub properties: Properties,
    pub tiles: BTreeMap<u32, Tile>,
}

impl Tileset {
    pub fn from_parsed(parsed_tileset: parse::Tileset, config: &LoaderConfig) -> Result<Self, TsxParseError> {
        let mut tiles = BTreeMap::new();
        for parsed_tile in parsed_tileset.tiles {
            let tile = process_tile(parsed_tile, config);
            tiles.insert(tile.id, tile);
        }
        let tileset = Self {
            name: parsed_tileset.name,
            class: parsed_tileset.class,
            version: parsed_tileset.version,
            tiled_version: parsed_tileset.tiled_version,
            tile_width: parsed_tileset.tile_width,
            tile_height: parsed_tileset.tile_height,
            spacing: parsed_tileset.spacing,
            margin: parsed_tileset.margin,
            tile_count: parsed_tileset.tile_count,
            columns: parsed_tileset.columns,
            object_alignment: parsed_tileset.object_alignment,
            tile_render_size: parsed_tileset.tile_render_size,
            fill_mode: parsed_tileset.fill_mode,
            tile_offset: parsed_tileset.tile_offset,
            grid: parsed_tileset.grid,
            image: parsed_tileset.image.map(TileImage::from_parsed),
            export: parsed_tileset.export,
            properties: parsed_tileset.properties,
            tiles,
        };
        if tileset.is_image_collection() && tileset.tile_count as usize != tileset.tiles.len() {
            log::warn!(
                "Tileset '{}' declares {} tiles but defines {}",
                tileset.name,
                tileset.tile_count,
                tileset.tiles.len(),
            );
        }
        Ok(tileset)
    }

    pub fn tile(&self, id: u32) -> Option<&Tile> {
        self.tiles.get(&id)
    }

    /// Tiles in id order.
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.values()
    }

    pub fn hitbox_tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.values().filter(|tile| tile.has_hitboxes())
    }

    pub fn hitbox_count(&self) -> usize {
        self.tiles.values().map(|tile| tile.hitboxes.len()).sum()
    }

    /// True if every tile has its own image instead of sharing an atlas.
    pub fn is_image_collection(&self) -> bool {
        self.image.is_none()
    }

    /// Pixel size of a tile.
    /// Uses the tile's own image when it has one, and the tileset's tile size otherwise.
    pub fn tile_size(&self, id: u32) -> (u32, u32) {
        let image = self.tile(id).and_then(|tile| tile.image.as_ref());
        match image {
            Some(image) if image.width > 0 && image.height > 0 => (image.width, image.height),
            _ => (self.tile_width, self.tile_height),
        }
    }

    /// Region of the atlas image that a tile occupies.
    /// `None` for image collections, and for ids past the end of the atlas.
    pub fn atlas_rect(&self, id: u32) -> Option<URect> {
        let image = self.image.as_ref()?;
        let columns = match self.columns {
            0 => self.fitting_columns(image.width),
            columns => columns,
        };
        if columns == 0 || id >= self.tile_count {
            return None;
        }
        let offset = |index: u32, size: u32| {
            size.checked_add(self.spacing)?
                .checked_mul(index)?
                .checked_add(self.margin)
        };
        let x = offset(id % columns, self.tile_width)?;
        let y = offset(id / columns, self.tile_height)?;
        Some(URect::new(x, y, self.tile_width, self.tile_height))
    }

    fn fitting_columns(&self, image_width: u32) -> u32 {
        let stride = self.tile_width.saturating_add(self.spacing);
        if stride == 0 {
            return 0;
        }
        let usable = image_width.saturating_sub(self.margin.saturating_mul(2));
        usable.saturating_add(self.spacing) / stride
    }

    /// Resolved paths of every image referenced, atlas first.
    pub fn image_paths(&self) -> Vec<&str> {
        let atlas = self.image.iter();
        let tile_images = self.tiles.values().filter_map(|tile| tile.image.as_ref());
        atlas.chain(tile_images).map(|image| image.path.as_str()).collect()
    }
}

fn process_tile(parsed_tile: parse::Tile, config: &LoaderConfig) -> Tile {
    let mut hitboxes = Vec::new();
    let objects = parsed_tile.object_group.map(|group| group.objects).unwrap_or_default();
    for object in &objects {
        if !config.is_hitbox_class(&object.class) {
            log::debug!("Tile {}: object {} has class '{}', not a hitbox", parsed_tile.id, object.id, object.class);
            continue;
        }
        match Hitbox::from_object(object) {
            Some(hitbox) => hitboxes.push(hitbox),
            None => log::warn!(
                "Tile {}: skipping object {} ({}) since it has no area",
                parsed_tile.id,
                object.id,
                object.kind.name(),
            ),
        }
    }
    if hitboxes.is_empty() && !objects.is_empty() {
        log::info!("Tile {} has {} objects but no hitboxes", parsed_tile.id, objects.len());
    }
    Tile {
        id: parsed_tile.id,
        class: parsed_tile.class,
        probability: parsed_tile.probability,
        image: parsed_tile.image.map(TileImage::from_parsed),
        ignored_objects: objects.len() - hitboxes.len(),
        hitboxes,
        animation: parsed_tile.animation,
        properties: parsed_tile.properties,
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Default, Debug)]
pub enum ObjectAlignment {
    #[default]
    Unspecified,
    TopLeft,
    Top,
    TopRight,
    Left,
    Center,
    Right,
    BottomLeft,
    Bottom,
    BottomRight,
}

impl ObjectAlignment {
    pub fn parse(str: &str) -> Result<Self, TsxParseError> {
        match str {
            "unspecified" => Ok(Self::Unspecified),
            "topleft" => Ok(Self::TopLeft),
            "top" => Ok(Self::Top),
            "topright" => Ok(Self::TopRight),
            "left" => Ok(Self::Left),
            "center" => Ok(Self::Center),
            "right" => Ok(Self::Right),
            "bottomleft" => Ok(Self::BottomLeft),
            "bottom" => Ok(Self::Bottom),
            "bottomright" => Ok(Self::BottomRight),
            _ => Err(TsxParseError::invalid_value("objectalignment", str)),
        }
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Default, Debug)]
pub enum FillMode {
    #[default]
    Stretch,
    PreserveAspectFit,
}

impl FillMode {
    pub fn parse(str: &str) -> Result<Self, TsxParseError> {
        match str {
            "stretch" => Ok(Self::Stretch),
            "preserve-aspect-fit" => Ok(Self::PreserveAspectFit),
            _ => Err(TsxParseError::invalid_value("fillmode", str)),
        }
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Default, Debug)]
pub enum TileRenderSize {
    #[default]
    Tile,
    Grid,
}

impl TileRenderSize {
    pub fn parse(str: &str) -> Result<Self, TsxParseError> {
        match str {
            "tile" => Ok(Self::Tile),
            "grid" => Ok(Self::Grid),
            _ => Err(TsxParseError::invalid_value("tilerendersize", str)),
        }
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Default, Debug)]
pub enum Orientation {
    #[default]
    Orthogonal,
    Isometric,
}

impl Orientation {
    pub fn parse(str: &str) -> Result<Self, TsxParseError> {
        match str {
            "orthogonal" => Ok(Self::Orthogonal),
            "isometric" => Ok(Self::Isometric),
            _ => Err(TsxParseError::invalid_value("orientation", str)),
        }
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Default, Debug)]
pub struct TileOffset { pub x: i32, pub y: i32 }

/// Grid used for tile objects and terrain overlays in the editor.
#[derive(Copy, Clone, Eq, PartialEq, Default, Debug)]
pub struct Grid {
    pub orientation: Orientation,
    pub width: u32,
    pub height: u32,
}
