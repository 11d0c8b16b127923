use glam::{Affine2, Vec2};

/**
 * The 2D transformation of a shape: a translation followed by a rotation about it.
 * Angles are in radians. In Tiled's y-down space a positive angle turns clockwise on screen.
 */
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Transform2 {
    pub translation: Vec2,
    pub rotation: f32,
}

impl Transform2 {
    pub const IDENTITY: Self = Self {
        translation: Vec2::ZERO,
        rotation: 0.0,
    };

    pub fn from_xy_angle(x: f32, y: f32, angle: f32) -> Self {
        Self {
            translation: Vec2::new(x, y),
            rotation: angle,
        }
    }

    pub fn with_translation(mut self, translation: Vec2) -> Self {
        self.translation = translation;
        self
    }

    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    /// Unit vector of the rotated x axis.
    pub fn direction(&self) -> Vec2 {
        Vec2::from_angle(self.rotation)
    }

    pub fn transform_point(&self, point: Vec2) -> Vec2 {
        self.translation + self.direction().rotate(point)
    }

    pub fn transform_vector(&self, vector: Vec2) -> Vec2 {
        self.direction().rotate(vector)
    }

    pub fn inverse_transform_point(&self, point: Vec2) -> Vec2 {
        let local = point - self.translation;
        Vec2::from_angle(-self.rotation).rotate(local)
    }
}

impl Default for Transform2 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl From<Transform2> for Affine2 {
    fn from(transform: Transform2) -> Self {
        Self::from_angle_translation(transform.rotation, transform.translation)
    }
}
