use glam::Vec2;
use crate::config::DebugDrawConfig;
use crate::map::Tile;
use crate::math::{Aabb, Transform2};
use crate::physics::{Collider, TileColliders};
use super::Color;

/// Receives debug shapes, like the callbacks of a Box2D debug draw.
pub trait DebugDraw {
    /// Closed outline.
    fn draw_polygon(&mut self, vertices: &[Vec2], color: Color);
    /// Filled polygon placed by `transform`, rounded by `radius`.
    fn draw_solid_polygon(&mut self, transform: Transform2, vertices: &[Vec2], radius: f32, color: Color);
    fn draw_circle(&mut self, center: Vec2, radius: f32, color: Color);
    /// Filled circle centered on the transform, with a line showing its rotation.
    fn draw_solid_circle(&mut self, transform: Transform2, radius: f32, color: Color);
    fn draw_solid_capsule(&mut self, p1: Vec2, p2: Vec2, radius: f32, color: Color);
    fn draw_segment(&mut self, p1: Vec2, p2: Vec2, color: Color);
    fn draw_point(&mut self, point: Vec2, size: f32, color: Color);
    fn draw_string(&mut self, point: Vec2, text: &str, color: Color);

    /// Axes of a transform. X in red, Y in green.
    fn draw_transform(&mut self, transform: Transform2) {
        const AXIS_LENGTH: f32 = 4.0;
        let origin = transform.translation;
        let x_axis = transform.transform_point(Vec2::new(AXIS_LENGTH, 0.0));
        let y_axis = transform.transform_point(Vec2::new(0.0, AXIS_LENGTH));
        self.draw_segment(origin, x_axis, Color::RED);
        self.draw_segment(origin, y_axis, Color::GREEN);
    }
}

/// What [`draw_tile`] draws, and in which colors.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct DebugDrawOptions {
    pub draw_hitboxes: bool,
    pub draw_colliders: bool,
    pub draw_aabbs: bool,
    pub draw_labels: bool,
    pub ellipse_segments: usize,
    pub hitbox_color: Color,
    pub collider_color: Color,
    pub aabb_color: Color,
    pub tile_color: Color,
    pub label_color: Color,
}

impl Default for DebugDrawOptions {
    fn default() -> Self {
        Self::from(&DebugDrawConfig::default())
    }
}

impl From<&DebugDrawConfig> for DebugDrawOptions {
    fn from(config: &DebugDrawConfig) -> Self {
        Self {
            draw_hitboxes: config.draw_hitboxes,
            draw_colliders: config.draw_colliders,
            draw_aabbs: config.draw_aabbs,
            draw_labels: config.draw_labels,
            ellipse_segments: 32,
            hitbox_color: Color::from_hex(config.hitbox_color),
            collider_color: Color::from_hex(config.collider_color).with_alpha(0.5),
            aabb_color: Color::from_hex(config.aabb_color),
            tile_color: Color::from_hex(config.tile_color),
            label_color: Color::from_hex(config.label_color),
        }
    }
}

/// Draws one tile with its top-left corner at `offset`.
/// Colliders are expected in tile pixels, as built with [`PhysicsConfig::pixel_space`](crate::config::PhysicsConfig::pixel_space).
pub fn draw_tile(
    draw: &mut impl DebugDraw,
    tile: &Tile,
    size: (u32, u32),
    colliders: Option<&TileColliders>,
    offset: Vec2,
    options: &DebugDrawOptions,
) {
    let frame = Aabb::new(Vec2::ZERO, Vec2::new(size.0 as f32, size.1 as f32));
    draw.draw_polygon(&corners(frame, offset), options.tile_color);

    if options.draw_colliders {
        if let Some(colliders) = colliders {
            for collider in &colliders.colliders {
                draw_collider(draw, collider, offset, options.collider_color);
            }
        }
    }
    if options.draw_hitboxes {
        for hitbox in &tile.hitboxes {
            let outline: Vec<Vec2> = hitbox
                .outline(options.ellipse_segments)
                .into_iter()
                .map(|point| point + offset)
                .collect();
            draw.draw_polygon(&outline, options.hitbox_color);
            draw.draw_point(hitbox.center() + offset, 2.0, options.hitbox_color);
        }
    }
    if options.draw_aabbs && tile.has_hitboxes() {
        draw.draw_polygon(&corners(tile.hitbox_bounds(), offset), options.aabb_color);
    }
    if options.draw_labels {
        draw.draw_string(offset + Vec2::new(0.0, -2.0), &tile.id.to_string(), options.label_color);
    }
}

/// Draws a single collider moved by `offset`.
pub fn draw_collider(draw: &mut impl DebugDraw, collider: &Collider, offset: Vec2, color: Color) {
    match collider {
        Collider::Circle { center, radius } => {
            let transform = Transform2::IDENTITY.with_translation(*center + offset);
            draw.draw_solid_circle(transform, *radius, color);
        },
        Collider::Capsule { center1, center2, radius } => {
            draw.draw_solid_capsule(*center1 + offset, *center2 + offset, *radius, color);
        },
        Collider::Polygon { vertices, radius } => {
            let transform = Transform2::IDENTITY.with_translation(offset);
            draw.draw_solid_polygon(transform, vertices, *radius, color);
        },
        Collider::Chain { points, looped } => {
            for pair in points.windows(2) {
                draw.draw_segment(pair[0] + offset, pair[1] + offset, color);
            }
            if let (true, Some(first), Some(last)) = (*looped, points.first(), points.last()) {
                draw.draw_segment(*last + offset, *first + offset, color);
            }
        },
    }
}

fn corners(aabb: Aabb, offset: Vec2) -> [Vec2; 4] {
    [
        offset + aabb.min,
        offset + Vec2::new(aabb.max.x, aabb.min.y),
        offset + aabb.max,
        offset + Vec2::new(aabb.min.x, aabb.max.y),
    ]
}
