//! Authoring mistakes that still produce a loadable tileset.

use std::fmt;
use derive_more::Display;
use crate::math::{self, Aabb};
use glam::Vec2;
use super::{HitboxShape, Tileset};

#[derive(Display, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug)]
pub enum Severity {
    #[display(fmt="info")]
    Info,
    #[display(fmt="warning")]
    Warning,
    #[display(fmt="error")]
    Error,
}

#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Tile the problem was found on. `None` for tileset-wide problems.
    pub tile_id: Option<u32>,
    pub message: String,
}

impl Diagnostic {
    fn new(severity: Severity, tile_id: Option<u32>, message: String) -> Self {
        Self { severity, tile_id, message }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

// Written out since the tile part is optional.
impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.tile_id {
            Some(tile_id) => write!(f, "{}: tile {}: {}", self.severity, tile_id, self.message),
            None => write!(f, "{}: {}", self.severity, self.message),
        }
    }
}

/// Checks hitboxes and images of every tile.
/// `tolerance` is how many pixels a hitbox may extend past its tile.
pub fn validate_tileset(tileset: &Tileset, tolerance: f32) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    let image_collection = tileset.is_image_collection();
    for tile in tileset.tiles() {
        let id = Some(tile.id);
        match &tile.image {
            Some(image) if image.width > tileset.tile_width || image.height > tileset.tile_height => {
                diagnostics.push(Diagnostic::new(
                    Severity::Warning,
                    id,
                    format!(
                        "image {}x{} is larger than the tileset tile size {}x{}",
                        image.width, image.height, tileset.tile_width, tileset.tile_height,
                    ),
                ));
            },
            None if image_collection => {
                diagnostics.push(Diagnostic::new(Severity::Error, id, String::from("tile has no image")));
            },
            _ => {}
        }

        if !tile.has_hitboxes() && tile.ignored_objects > 0 {
            diagnostics.push(Diagnostic::new(
                Severity::Info,
                id,
                format!("{} objects but no hitboxes", tile.ignored_objects),
            ));
        }

        let (width, height) = tileset.tile_size(tile.id);
        let bounds = Aabb::new(Vec2::ZERO, Vec2::new(width as f32, height as f32)).expand(tolerance);
        for hitbox in &tile.hitboxes {
            let aabb = hitbox.aabb();
            if !bounds.contains_aabb(&aabb) {
                diagnostics.push(Diagnostic::new(
                    Severity::Warning,
                    id,
                    format!(
                        "{} hitbox {} spans ({:.1}, {:.1})..({:.1}, {:.1}), outside the {}x{} tile",
                        hitbox.kind(), hitbox.object_id,
                        aabb.min.x, aabb.min.y, aabb.max.x, aabb.max.y,
                        width, height,
                    ),
                ));
            }
            if let HitboxShape::Polygon { points } = &hitbox.shape {
                if !math::is_simple(points) {
                    diagnostics.push(Diagnostic::new(
                        Severity::Error,
                        id,
                        format!("polygon hitbox {} intersects itself", hitbox.object_id),
                    ));
                }
            }
        }
    }
    log::debug!("Validated tileset '{}': {} diagnostics", tileset.name, diagnostics.len());
    diagnostics
}

#[cfg(test)]
mod test {
    use roxmltree::Document;
    use crate::config::LoaderConfig;
    use crate::map::{parse, Tileset};
    use super::{validate_tileset, Severity};

    fn load(source: &str) -> Tileset {
        let doc = Document::parse(source).unwrap();
        let parsed = parse::Tileset::parse_doc(doc, None).unwrap();
        Tileset::from_parsed(parsed, &LoaderConfig::default()).unwrap()
    }

    #[test]
    fn debug_tileset_is_clean() {
        let tileset = load(include_str!("../../assets/tilesets/debug_tileset.tsx"));
        let diagnostics = validate_tileset(&tileset, 1.0);
        assert!(diagnostics.is_empty(), "{diagnostics:?}");
    }

    #[test]
    fn objects_tileset_is_clean() {
        let tileset = load(include_str!("../../assets/tilesets/debug_tileset_objects.tsx"));
        let diagnostics = validate_tileset(&tileset, 1.0);
        assert!(diagnostics.is_empty(), "{diagnostics:?}");
    }

    #[test]
    fn broken_tiles() {
        let xml = r#"
            <tileset name="broken" tilewidth="16" tileheight="16" tilecount="5" columns="0">
                <tile id="0"/>
                <tile id="1">
                    <image source="big.png" width="32" height="16"/>
                </tile>
                <tile id="2">
                    <image source="bowtie.png" width="16" height="16"/>
                    <objectgroup>
                        <object id="1" type="Hitbox" x="0" y="0">
                            <polygon points="0,0 16,16 16,0 0,16"/>
                        </object>
                    </objectgroup>
                </tile>
                <tile id="3">
                    <image source="wide_hitbox.png" width="16" height="16"/>
                    <objectgroup>
                        <object id="1" type="Hitbox" x="10" y="0" width="10" height="16"/>
                    </objectgroup>
                </tile>
                <tile id="4">
                    <image source="spawn.png" width="16" height="16"/>
                    <objectgroup>
                        <object id="1" type="Spawn" x="8" y="8">
                            <point/>
                        </object>
                        <object id="2" x="0" y="0" width="4" height="4"/>
                    </objectgroup>
                </tile>
            </tileset>
        "#;
        let diagnostics = validate_tileset(&load(xml), 1.0);
        assert_eq!(5, diagnostics.len());
        assert_eq!((Some(0), Severity::Error), (diagnostics[0].tile_id, diagnostics[0].severity));
        assert_eq!((Some(1), Severity::Warning), (diagnostics[1].tile_id, diagnostics[1].severity));
        assert_eq!((Some(2), Severity::Error), (diagnostics[2].tile_id, diagnostics[2].severity));
        assert_eq!("error: tile 2: polygon hitbox 1 intersects itself", diagnostics[2].to_string());
        assert_eq!((Some(3), Severity::Warning), (diagnostics[3].tile_id, diagnostics[3].severity));
        assert_eq!("info: tile 4: 2 objects but no hitboxes", diagnostics[4].to_string());
        assert!(!diagnostics[4].is_error());
        assert_eq!("warning", Severity::Warning.to_string());
    }
}
