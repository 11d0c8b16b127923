use roxmltree::{Document, Node};
use crate::map::{FillMode, Grid, ObjectAlignment, Orientation, TileOffset, TileRenderSize};
use crate::map::TsxParseError;
use crate::util::HashSet;
use super::{Properties, Tile};


#[derive(Clone, Default, Debug)]
pub struct Tileset {
    pub version: String,
    pub tiled_version: String,
    pub name: String,
    pub class: String,
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
    pub image: Option<Image>,
    pub export: Option<Export>,
    pub properties: Properties,
    pub tiles: Vec<Tile>,
}

impl Tileset {

    pub fn parse_doc(doc: Document, parent_path: Option<&str>) -> Result<Self, TsxParseError> {
        let root = doc.root_element();
        if !root.has_tag_name("tileset") {
            return Err(TsxParseError::MissingTag { tag_name: String::from("tileset") });
        }
        let mut tileset = Tileset::default();
        tileset.parse(root, parent_path)?;
        Ok(tileset)
    }

    pub fn parse(&mut self, tileset_node: Node, parent_path: Option<&str>) -> Result<(), TsxParseError> {

        // Parses attributes
        for attribute in tileset_node.attributes() {
            let name = attribute.name();
            let value = attribute.value();
            match name {
                "version" => self.version = String::from(value),
                "tiledversion" => self.tiled_version = String::from(value),
                "name" => self.name = String::from(value),
                "class" => self.class = String::from(value),
                "tilewidth" => self.tile_width = value.parse()?,
                "tileheight" => self.tile_height = value.parse()?,
                "spacing" => self.spacing = value.parse()?,
                "margin" => self.margin = value.parse()?,
                "tilecount" => self.tile_count = value.parse()?,
                "columns" => self.columns = value.parse()?,
                "objectalignment" => self.object_alignment = ObjectAlignment::parse(value)?,
                "tilerendersize" => self.tile_render_size = TileRenderSize::parse(value)?,
                "fillmode" => self.fill_mode = FillMode::parse(value)?,
                _ => {}
            }
        }

        // Parses children
        let mut seen_ids = HashSet::default();
        for child in tileset_node.children() {
            let tag = child.tag_name().name();
            match tag {
                "image" => self.image = Some(Image::parse(child, parent_path)?),
                "tileoffset" => self.tile_offset = Some(parse_tile_offset(child)?),
                "grid" => self.grid = Some(parse_grid(child)?),
                "editorsettings" => self.export = Export::parse(child),
                "properties" => self.properties = Properties::parse(child)?,
                "tile" => {
                    let tile = Tile::parse(child, parent_path)?;
                    if !seen_ids.insert(tile.id) {
                        return Err(TsxParseError::DuplicateTileId { id: tile.id });
                    }
                    self.tiles.push(tile);
                },
                _ => {}
            }
        }
        Ok(())
    }
}

fn parse_tile_offset(offset_node: Node) -> Result<TileOffset, TsxParseError> {
    let mut offset = TileOffset::default();
    for attribute in offset_node.attributes() {
        match attribute.name() {
            "x" => offset.x = attribute.value().parse()?,
            "y" => offset.y = attribute.value().parse()?,
            _ => {}
        }
    }
    Ok(offset)
}

fn parse_grid(grid_node: Node) -> Result<Grid, TsxParseError> {
    let mut grid = Grid::default();
    for attribute in grid_node.attributes() {
        let value = attribute.value();
        match attribute.name() {
            "orientation" => grid.orientation = Orientation::parse(value)?,
            "width" => grid.width = value.parse()?,
            "height" => grid.height = value.parse()?,
            _ => {}
        }
    }
    Ok(grid)
}

#[derive(Clone, Eq, PartialEq, Default, Debug)]
pub struct Image {
    pub format: String,
    /// Path exactly as written in the file.
    pub source: String,
    /// `source` joined onto the directory of the tileset file.
    pub path: String,
    pub trans: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl Image {
    pub fn parse(image_node: Node, parent_path: Option<&str>) -> Result<Image, TsxParseError> {
        let mut image = Image::default();
        for attribute in image_node.attributes() {
            let name = attribute.name();
            let value = attribute.value();
            match name {
                "format" => image.format = String::from(value),
                "source" => {
                    image.source = String::from(value);
                    image.path = match parent_path {
                        Some(parent) => format!("{parent}/{value}"),
                        None => String::from(value),
                    };
                },
                "trans" => image.trans = Some(String::from(value)),
                "width" => image.width = Some(value.parse()?),
                "height" => image.height = Some(value.parse()?),
                _ => {}
            }
        }
        Ok(image)
    }
}

/// Export target remembered by the editor, e.g. the Lua file generated from this tileset.
#[derive(Clone, Eq, PartialEq, Default, Debug)]
pub struct Export {
    pub target: String,
    pub format: String,
}

impl Export {
    fn parse(settings_node: Node) -> Option<Self> {
        let export_node = settings_node.children().find(|child| child.has_tag_name("export"))?;
        Some(Self {
            target: String::from(export_node.attribute("target").unwrap_or("")),
            format: String::from(export_node.attribute("format").unwrap_or("")),
        })
    }
}
