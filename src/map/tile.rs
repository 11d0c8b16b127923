use glam::Vec2;
use crate::map::parse::{self, Frame, Properties};
use crate::math::Aabb;
use super::Hitbox;

/// Image reference of a tile, or the atlas image of a tileset.
#[derive(Clone, Eq, PartialEq, Default, Debug)]
pub struct TileImage {
    /// Path as written in the tileset file.
    pub source: String,
    /// Path relative to the asset root.
    pub path: String,
    pub width: u32,
    pub height: u32,
}

impl TileImage {
    pub fn from_parsed(image: parse::Image) -> Self {
        Self {
            source: image.source,
            path: image.path,
            width: image.width.unwrap_or(0),
            height: image.height.unwrap_or(0),
        }
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }
}

#[derive(Clone, Default, Debug)]
pub struct Tile {
    /// ID of tile local to its tileset
    pub id: u32,
    pub class: String,
    pub probability: f32,
    pub image: Option<TileImage>,
    pub hitboxes: Vec<Hitbox>,
    /// Objects of the collision editor that did not become hitboxes.
    pub ignored_objects: usize,
    pub animation: Vec<Frame>,
    pub properties: Properties,
}

impl Tile {
    pub fn has_hitboxes(&self) -> bool {
        !self.hitboxes.is_empty()
    }

    /// Union of all hitbox bounds. Empty when the tile has none.
    pub fn hitbox_bounds(&self) -> Aabb {
        self.hitboxes
            .iter()
            .fold(Aabb::EMPTY, |bounds, hitbox| bounds.union(hitbox.aabb()))
    }

    pub fn hitbox(&self, object_id: u32) -> Option<&Hitbox> {
        self.hitboxes.iter().find(|hitbox| hitbox.object_id == object_id)
    }

    /// True if any hitbox covers the point, in tile-local pixels.
    pub fn contains_point(&self, point: Vec2) -> bool {
        self.hitboxes.iter().any(|hitbox| hitbox.contains_point(point))
    }
}

#[cfg(test)]
mod test {
    use glam::Vec2;
    use crate::map::{Hitbox, HitboxShape};
    use super::Tile;

    fn hitbox(object_id: u32, position: Vec2, shape: HitboxShape) -> Hitbox {
        Hitbox {
            object_id,
            name: String::new(),
            class: String::from("Hitbox"),
            position,
            rotation: 0.0,
            shape,
        }
    }

    #[test]
    fn bounds_cover_every_hitbox() {
        let tile = Tile {
            id: 1,
            hitboxes: vec![
                hitbox(1, Vec2::new(2.0, 4.0), HitboxShape::Rect { size: Vec2::new(6.0, 2.0) }),
                hitbox(2, Vec2::new(10.0, 10.0), HitboxShape::Ellipse { size: Vec2::new(8.0, 4.0) }),
                hitbox(3, Vec2::new(0.0, 20.0), HitboxShape::Polygon {
                    points: vec![Vec2::ZERO, Vec2::new(3.0, -1.0), Vec2::new(1.0, 5.0)],
                }),
            ],
            ..Tile::default()
        };
        let bounds = tile.hitbox_bounds();
        assert_eq!(Vec2::new(0.0, 4.0), bounds.min);
        assert_eq!(Vec2::new(18.0, 25.0), bounds.max);
        assert_eq!(Some(2), tile.hitbox(2).map(|hitbox| hitbox.object_id));
        assert!(tile.contains_point(Vec2::new(14.0, 12.0)));
        assert!(!tile.contains_point(Vec2::new(30.0, 30.0)));
    }

    #[test]
    fn no_hitboxes_no_bounds() {
        let tile = Tile::default();
        assert!(!tile.has_hitboxes());
        assert!(tile.hitbox_bounds().is_empty());
    }
}
