use roxmltree::Node;
use crate::map::TsxParseError;
use super::{Image, ObjectGroup, Properties};

/// A 1:1 mapping of `<tile>` inside a tileset.
#[derive(Clone, Debug)]
pub struct Tile {
    /// ID of tile local to its tileset
    pub id: u32,
    pub class: String,
    pub probability: f32,
    pub image: Option<Image>,
    pub object_group: Option<ObjectGroup>,
    pub animation: Vec<Frame>,
    pub properties: Properties,
}

impl Tile {
    pub fn parse(tile_node: Node, parent_path: Option<&str>) -> Result<Self, TsxParseError> {
        let id = tile_node
            .attribute("id")
            .ok_or_else(|| TsxParseError::missing_attribute("tile", "id"))?
            .parse()?;
        let mut tile = Tile {
            id,
            class: String::new(),
            probability: 1.0,
            image: None,
            object_group: None,
            animation: Vec::new(),
            properties: Properties::default(),
        };
        for attribute in tile_node.attributes() {
            let value = attribute.value();
            match attribute.name() {
                "type" | "class" => tile.class = String::from(value),
                "probability" => tile.probability = value.parse()?,
                _ => {}
            }
        }
        for child in tile_node.children() {
            match child.tag_name().name() {
                "image" => tile.image = Some(Image::parse(child, parent_path)?),
                "objectgroup" => tile.object_group = Some(ObjectGroup::parse(child)?),
                "animation" => tile.animation = Frame::parse_all(child)?,
                "properties" => tile.properties = Properties::parse(child)?,
                _ => {}
            }
        }
        Ok(tile)
    }
}

/// Single step of a tile animation.
#[derive(Copy, Clone, Eq, PartialEq, Default, Debug)]
pub struct Frame {
    pub tile_id: u32,
    pub duration_ms: u32,
}

impl Frame {
    fn parse_all(animation_node: Node) -> Result<Vec<Self>, TsxParseError> {
        let mut frames = Vec::new();
        for frame_node in animation_node.children().filter(|child| child.has_tag_name("frame")) {
            let tile_id = frame_node
                .attribute("tileid")
                .ok_or_else(|| TsxParseError::missing_attribute("frame", "tileid"))?
                .parse()?;
            let duration_ms = frame_node
                .attribute("duration")
                .ok_or_else(|| TsxParseError::missing_attribute("frame", "duration"))?
                .parse()?;
            frames.push(Frame { tile_id, duration_ms });
        }
        Ok(frames)
    }
}

#[cfg(test)]
mod test {
    use roxmltree::Document;
    use crate::map::TsxParseError;
    use super::{Frame, Tile};

    #[test]
    fn image_and_hitbox() {
        let xml = r#"
            <tile id="27">
                <image source="debug_tileset/Frame003.png" width="32" height="32"/>
                <objectgroup draworder="index" id="2">
                    <object id="1" type="Hitbox" x="0" y="0" width="32" height="18"/>
                </objectgroup>
            </tile>
        "#;
        let doc = Document::parse(xml).unwrap();
        let tile = Tile::parse(doc.root_element(), Some("assets/tilesets")).unwrap();
        assert_eq!(27, tile.id);
        assert_eq!(1.0, tile.probability);
        let image = tile.image.unwrap();
        assert_eq!("debug_tileset/Frame003.png", image.source);
        assert_eq!("assets/tilesets/debug_tileset/Frame003.png", image.path);
        assert_eq!(Some(32), image.width);
        assert_eq!(1, tile.object_group.unwrap().objects.len());
    }

    #[test]
    fn animation_frames() {
        let xml = r#"
            <tile id="0" probability="0.5">
                <animation>
                    <frame tileid="0" duration="100"/>
                    <frame tileid="1" duration="150"/>
                </animation>
            </tile>
        "#;
        let doc = Document::parse(xml).unwrap();
        let tile = Tile::parse(doc.root_element(), None).unwrap();
        assert_eq!(0.5, tile.probability);
        assert_eq!(
            vec![Frame { tile_id: 0, duration_ms: 100 }, Frame { tile_id: 1, duration_ms: 150 }],
            tile.animation
        );
    }

    #[test]
    fn missing_id() {
        let doc = Document::parse(r#"<tile/>"#).unwrap();
        assert!(matches!(
            Tile::parse(doc.root_element(), None),
            Err(TsxParseError::MissingAttribute { .. })
        ));
    }
}
