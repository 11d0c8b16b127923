use glam::Vec2;
use rayon::prelude::*;
use tracing::instrument;
use crate::config::{ConcaveMode, EllipseMode, PhysicsConfig};
use crate::map::{Hitbox, HitboxShape, Tile, Tileset};
use crate::math::{self, DecomposeError};
use super::{Collider, PhysicsError, TileColliders};

/// Turns tile hitboxes into engine-ready colliders.
///
/// Hitboxes live in tile pixels with y pointing down. Output points are divided by
/// `pixels_per_unit`, flipped to y-up when `flip_y` is set, and measured from the tile
/// center when `center_origin` is set. Otherwise the origin is the top-left corner,
/// or the bottom-left corner once flipped.
#[derive(Clone, Debug)]
pub struct ColliderBuilder {
    config: PhysicsConfig,
}

impl ColliderBuilder {
    pub fn new(config: &PhysicsConfig) -> Self {
        Self { config: config.clone() }
    }

    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    /// Colliders of every tile with hitboxes, ordered by tile id.
    #[instrument(skip_all)]
    pub fn build_tileset(&self, tileset: &Tileset) -> Result<Vec<TileColliders>, PhysicsError> {
        let tiles: Vec<&Tile> = tileset.hitbox_tiles().collect();
        let colliders = tiles
            .par_iter()
            .map(|tile| self.build_tile(tile, tileset.tile_size(tile.id)))
            .collect::<Result<Vec<_>, _>>()?;
        let count: usize = colliders.iter().map(|tile| tile.colliders.len()).sum();
        log::info!("Built {count} colliders for {} tiles of '{}'", colliders.len(), tileset.name);
        Ok(colliders)
    }

    /// Colliders of a single tile. `size` is the tile's pixel size.
    pub fn build_tile(&self, tile: &Tile, size: (u32, u32)) -> Result<TileColliders, PhysicsError> {
        let space = OutputSpace::new(&self.config, size);
        let mut colliders = Vec::new();
        for hitbox in &tile.hitboxes {
            self.build_hitbox(hitbox, &space, &mut colliders)
                .map_err(|err| err.at(tile.id, hitbox.object_id))?;
        }
        Ok(TileColliders { tile_id: tile.id, size, colliders })
    }

    fn build_hitbox(&self, hitbox: &Hitbox, space: &OutputSpace, out: &mut Vec<Collider>) -> Result<(), ShapeError> {
        match &hitbox.shape {
            HitboxShape::Rect { .. } => {
                let mut vertices = space.points(&hitbox.outline(0));
                math::ensure_ccw(&mut vertices);
                let pieces = math::split_convex(&vertices, self.config.max_polygon_vertices)?;
                out.extend(pieces.into_iter().map(Collider::polygon));
            },
            HitboxShape::Ellipse { size } => self.build_ellipse(hitbox, *size, space, out)?,
            HitboxShape::Polygon { .. } => self.build_polygon(hitbox, space, out)?,
        }
        Ok(())
    }

    fn build_ellipse(&self, hitbox: &Hitbox, size: Vec2, space: &OutputSpace, out: &mut Vec<Collider>) -> Result<(), ShapeError> {
        let transform = hitbox.transform();
        let center = space.point(hitbox.center());
        let major = size.max_element();
        let minor = size.min_element();

        // Rotation cannot be seen on a circle, so it is ignored.
        if (major - minor) / major <= self.config.circle_tolerance {
            let radius = space.length((size.x + size.y) * 0.25);
            out.push(Collider::Circle { center, radius });
            return Ok(());
        }
        match self.config.ellipse_mode {
            EllipseMode::Capsule => {
                let axis = if size.x >= size.y { Vec2::X } else { Vec2::Y };
                let offset = transform.transform_vector(axis * (major - minor) * 0.5);
                let tile_center = hitbox.center();
                out.push(Collider::Capsule {
                    center1: space.point(tile_center - offset),
                    center2: space.point(tile_center + offset),
                    radius: space.length(minor * 0.5),
                });
            },
            EllipseMode::Polygon => {
                let mut outline = space.points(&hitbox.outline(self.config.ellipse_segments));
                math::ensure_ccw(&mut outline);
                let pieces = math::split_convex(&outline, self.config.max_polygon_vertices)?;
                out.extend(pieces.into_iter().map(Collider::polygon));
            },
        }
        Ok(())
    }

    fn build_polygon(&self, hitbox: &Hitbox, space: &OutputSpace, out: &mut Vec<Collider>) -> Result<(), ShapeError> {
        let outline = hitbox.outline(0);
        let welded = math::weld_points(&outline, self.config.weld_tolerance);
        let cleaned = math::remove_collinear(&welded, self.config.weld_tolerance);
        if cleaned.len() < 3 || math::area(&cleaned) <= f32::EPSILON {
            return Err(ShapeError::Degenerate { vertices: cleaned.len() });
        }
        if cleaned.len() < outline.len() {
            log::debug!("Object {}: cleaned {} vertices down to {}", hitbox.object_id, outline.len(), cleaned.len());
        }
        let mut points = space.points(&cleaned);
        math::ensure_ccw(&mut points);

        let max_vertices = self.config.max_polygon_vertices;
        if math::is_convex(&points) {
            let pieces = math::split_convex(&points, max_vertices)?;
            out.extend(pieces.into_iter().map(Collider::polygon));
            return Ok(());
        }
        match self.config.concave_mode {
            ConcaveMode::Decompose => {
                let pieces = math::decompose_convex(&points, max_vertices)?;
                out.extend(pieces.into_iter().map(Collider::polygon));
            },
            ConcaveMode::Chain => out.push(Collider::Chain { points, looped: true }),
        }
        Ok(())
    }
}

/// Maps tile pixels to output units.
struct OutputSpace {
    origin: Vec2,
    scale: Vec2,
}

impl OutputSpace {
    fn new(config: &PhysicsConfig, size: (u32, u32)) -> Self {
        let size = Vec2::new(size.0 as f32, size.1 as f32);
        let origin = match (config.center_origin, config.flip_y) {
            (true, _) => size * 0.5,
            (false, true) => Vec2::new(0.0, size.y),
            (false, false) => Vec2::ZERO,
        };
        let ppu = config.pixels_per_unit;
        let scale = match config.flip_y {
            true => Vec2::new(1.0 / ppu, -1.0 / ppu),
            false => Vec2::splat(1.0 / ppu),
        };
        Self { origin, scale }
    }

    fn point(&self, point: Vec2) -> Vec2 {
        (point - self.origin) * self.scale
    }

    fn points(&self, points: &[Vec2]) -> Vec<Vec2> {
        points.iter().map(|point| self.point(*point)).collect()
    }

    fn length(&self, length: f32) -> f32 {
        length * self.scale.x
    }
}

/// Failure on one hitbox, before the tile and object are known.
enum ShapeError {
    Decompose(DecomposeError),
    Degenerate { vertices: usize },
}

impl From<DecomposeError> for ShapeError {
    fn from(err: DecomposeError) -> Self {
        Self::Decompose(err)
    }
}

impl ShapeError {
    fn at(self, tile_id: u32, object_id: u32) -> PhysicsError {
        match self {
            Self::Decompose(cause) => PhysicsError::Decompose { tile_id, object_id, cause },
            Self::Degenerate { vertices } => PhysicsError::Degenerate { tile_id, object_id, vertices },
        }
    }
}
