//! Collision shapes attached to tiles.
//!
//! All geometry is in tile-local pixels with y pointing down, exactly as drawn in
//! Tiled's collision editor. `position` is the object's anchor: the top-left corner
//! of rectangles and ellipse bounding boxes, and the origin of polygon points.
//! Rotation turns clockwise about that anchor.

use std::f32::consts::{PI, TAU};
use glam::Vec2;
use serde::{Deserialize, Serialize};
use crate::map::parse::{Object, ObjectKind};
use crate::math::{self, Aabb, Transform2};

#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HitboxShape {
    Rect { size: Vec2 },
    /// Ellipse inscribed in the `size` bounding box.
    Ellipse { size: Vec2 },
    /// Points relative to the hitbox position, in authored order.
    Polygon { points: Vec<Vec2> },
}

impl HitboxShape {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Rect { .. } => "rect",
            Self::Ellipse { .. } => "ellipse",
            Self::Polygon { .. } => "polygon",
        }
    }
}

#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct Hitbox {
    /// Id of the Tiled object this hitbox came from, unique within its tile.
    pub object_id: u32,
    pub name: String,
    pub class: String,
    pub position: Vec2,
    /// Degrees, clockwise.
    pub rotation: f32,
    pub shape: HitboxShape,
}

impl Hitbox {

    /// Converts a collision editor object.
    /// Returns `None` for objects without an area: points, polylines, text and empty boxes.
    pub fn from_object(object: &Object) -> Option<Self> {
        let size = Vec2::new(object.width, object.height);
        let shape = match &object.kind {
            ObjectKind::Rectangle => HitboxShape::Rect { size },
            ObjectKind::Ellipse => HitboxShape::Ellipse { size },
            ObjectKind::Polygon(points) => HitboxShape::Polygon { points: points.clone() },
            _ => return None,
        };
        if let HitboxShape::Rect { size } | HitboxShape::Ellipse { size } = &shape {
            if size.x <= 0.0 || size.y <= 0.0 {
                return None;
            }
        }
        Some(Self {
            object_id: object.id,
            name: object.name.clone(),
            class: object.class.clone(),
            position: Vec2::new(object.x, object.y),
            rotation: object.rotation,
            shape,
        })
    }

    pub fn kind(&self) -> &'static str {
        self.shape.name()
    }

    pub fn transform(&self) -> Transform2 {
        Transform2::from_xy_angle(self.position.x, self.position.y, self.rotation.to_radians())
    }

    pub fn is_rotated(&self) -> bool {
        self.rotation.rem_euclid(360.0) != 0.0
    }

    /// Vertex loop of the shape in tile space.
    /// Ellipses are sampled with `ellipse_segments` points, starting at the right-most point of the unrotated ellipse.
    pub fn outline(&self, ellipse_segments: usize) -> Vec<Vec2> {
        let transform = self.transform();
        let local: Vec<Vec2> = match &self.shape {
            HitboxShape::Rect { size } => vec![
                Vec2::ZERO,
                Vec2::new(size.x, 0.0),
                *size,
                Vec2::new(0.0, size.y),
            ],
            HitboxShape::Ellipse { size } => {
                let radii = *size * 0.5;
                let segments = ellipse_segments.max(3);
                (0..segments)
                    .map(|i| {
                        let angle = i as f32 / segments as f32 * TAU;
                        radii + radii * Vec2::from_angle(angle)
                    })
                    .collect()
            },
            HitboxShape::Polygon { points } => points.clone(),
        };
        local
            .into_iter()
            .map(|point| transform.transform_point(point))
            .collect()
    }

    /// Center of the shape in tile space. Polygons use their area centroid.
    pub fn center(&self) -> Vec2 {
        let transform = self.transform();
        match &self.shape {
            HitboxShape::Rect { size } | HitboxShape::Ellipse { size } => transform.transform_point(*size * 0.5),
            HitboxShape::Polygon { points } => transform.transform_point(math::centroid(points)),
        }
    }

    pub fn aabb(&self) -> Aabb {
        match &self.shape {
            HitboxShape::Ellipse { size } => {
                let radii = *size * 0.5;
                let (sin, cos) = self.rotation.to_radians().sin_cos();
                let extents = Vec2::new(
                    ((radii.x * cos).powi(2) + (radii.y * sin).powi(2)).sqrt(),
                    ((radii.x * sin).powi(2) + (radii.y * cos).powi(2)).sqrt(),
                );
                Aabb::from_center_extents(self.center(), extents)
            },
            _ => Aabb::from_points(&self.outline(0)),
        }
    }

    pub fn area(&self) -> f32 {
        match &self.shape {
            HitboxShape::Rect { size } => size.x * size.y,
            HitboxShape::Ellipse { size } => PI * size.x * size.y * 0.25,
            HitboxShape::Polygon { points } => math::area(points),
        }
    }

    /// Point in tile space. Rectangles and ellipses include their boundary.
    pub fn contains_point(&self, point: Vec2) -> bool {
        let local = self.transform().inverse_transform_point(point);
        match &self.shape {
            HitboxShape::Rect { size } => {
                local.x >= 0.0 && local.y >= 0.0 && local.x <= size.x && local.y <= size.y
            },
            HitboxShape::Ellipse { size } => {
                let radii = *size * 0.5;
                let normalized = (local - radii) / radii;
                normalized.length_squared() <= 1.0
            },
            HitboxShape::Polygon { points } => math::point_in_polygon(points, local),
        }
    }
}

#[cfg(test)]
mod test {
    use glam::Vec2;
    use crate::map::parse::{Object, ObjectKind};
    use super::{Hitbox, HitboxShape};

    fn object(kind: ObjectKind, x: f32, y: f32, width: f32, height: f32, rotation: f32) -> Object {
        Object {
            id: 1,
            class: String::from("Hitbox"),
            x,
            y,
            width,
            height,
            rotation,
            kind,
            ..Object::default()
        }
    }

    fn approx(a: Vec2, b: Vec2) -> bool {
        (a - b).length() < 1e-3
    }

    #[test]
    fn rect_geometry() {
        let hitbox = Hitbox::from_object(&object(ObjectKind::Rectangle, 15.0, 0.0, 17.0, 32.0, 0.0)).unwrap();
        assert_eq!(HitboxShape::Rect { size: Vec2::new(17.0, 32.0) }, hitbox.shape);
        let aabb = hitbox.aabb();
        assert_eq!(Vec2::new(15.0, 0.0), aabb.min);
        assert_eq!(Vec2::new(32.0, 32.0), aabb.max);
        assert_eq!(17.0 * 32.0, hitbox.area());
        assert!(hitbox.contains_point(Vec2::new(20.0, 10.0)));
        assert!(!hitbox.contains_point(Vec2::new(10.0, 10.0)));
    }

    #[test]
    fn rotated_rect_turns_clockwise() {
        let hitbox = Hitbox::from_object(&object(ObjectKind::Rectangle, 10.0, 10.0, 4.0, 2.0, 90.0)).unwrap();
        let outline = hitbox.outline(0);
        // The top edge now points down the screen.
        assert!(approx(Vec2::new(10.0, 14.0), outline[1]));
        assert!(approx(Vec2::new(8.0, 14.0), outline[2]));
        assert!(hitbox.contains_point(Vec2::new(9.0, 12.0)));
        assert!(!hitbox.contains_point(Vec2::new(12.0, 11.0)));
    }

    #[test]
    fn ellipse_bounds() {
        let hitbox = Hitbox::from_object(&object(ObjectKind::Ellipse, 0.0, 0.0, 20.0, 10.0, 90.0)).unwrap();
        let aabb = hitbox.aabb();
        // Rotated a quarter turn about the top-left corner, the box spans [-10, 0] x [0, 20].
        assert!(approx(Vec2::new(-10.0, 0.0), aabb.min));
        assert!(approx(Vec2::new(0.0, 20.0), aabb.max));
        assert!(hitbox.contains_point(hitbox.center()));

        let unrotated = Hitbox::from_object(&object(ObjectKind::Ellipse, 0.0, 0.0, 20.0, 10.0, 0.0)).unwrap();
        assert!(unrotated.contains_point(Vec2::new(10.0, 9.9)));
        assert!(!unrotated.contains_point(Vec2::new(1.0, 1.0)));
    }

    #[test]
    fn polygon_relative_points() {
        let points = vec![Vec2::new(0.0, 0.0), Vec2::new(-31.8638, 32.1553), Vec2::new(0.0, 32.2524)];
        let hitbox = Hitbox::from_object(&object(ObjectKind::Polygon(points), 31.8638, -0.291438, 0.0, 0.0, 0.0)).unwrap();
        let aabb = hitbox.aabb();
        assert!(approx(Vec2::new(0.0, -0.291438), aabb.min));
        assert!(approx(Vec2::new(31.8638, 31.960962), aabb.max));
        assert!(hitbox.contains_point(Vec2::new(28.0, 28.0)));
        assert!(!hitbox.contains_point(Vec2::new(2.0, 2.0)));
    }

    #[test]
    fn ellipse_and_polygon_area() {
        let ellipse = Hitbox::from_object(&object(ObjectKind::Ellipse, 5.0, 5.0, 20.0, 10.0, 30.0)).unwrap();
        assert!((ellipse.area() - std::f32::consts::PI * 50.0).abs() < 1e-3);

        // Winding does not matter.
        let points = vec![Vec2::ZERO, Vec2::new(0.0, 6.0), Vec2::new(4.0, 6.0), Vec2::new(4.0, 0.0)];
        let polygon = Hitbox::from_object(&object(ObjectKind::Polygon(points), 2.0, 2.0, 0.0, 0.0, 45.0)).unwrap();
        assert!((polygon.area() - 24.0).abs() < 1e-4);
    }

    #[test]
    fn arealess_objects_are_skipped() {
        assert!(Hitbox::from_object(&object(ObjectKind::Point, 3.0, 3.0, 0.0, 0.0, 0.0)).is_none());
        assert!(Hitbox::from_object(&object(ObjectKind::Rectangle, 3.0, 3.0, 0.0, 5.0, 0.0)).is_none());
        assert!(Hitbox::from_object(&object(ObjectKind::Ellipse, 3.0, 3.0, 6.0, 0.0, 0.0)).is_none());
        assert!(Hitbox::from_object(&object(ObjectKind::Ellipse, 3.0, 3.0, 0.0, 0.0, 0.0)).is_none());
        assert!(Hitbox::from_object(&object(ObjectKind::Polyline(vec![Vec2::ZERO, Vec2::X]), 0.0, 0.0, 0.0, 0.0, 0.0)).is_none());
    }
}
