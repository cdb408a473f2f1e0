use crate::math::{EPSILON, Ray, Vector};
use crate::texture::Texture;

/// A finite, textured line segment in world space: a sprite face.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Billboard {
    pub start: Vector,
    pub direction: Vector,
    pub length: f64,
    pub texture: Texture,
}

impl Billboard {
    pub fn new(start: Vector, direction: Vector, length: f64, texture: Texture) -> Self {
        Self {
            start,
            direction: direction.normalized(),
            length,
            texture,
        }
    }

    #[inline]
    pub fn end(&self) -> Vector {
        self.start + self.direction * self.length
    }

    /// Where `ray` crosses this segment, if it does so in front of the ray
    /// origin.
    pub fn hit_test(&self, ray: Ray) -> Option<Vector> {
        // origin + d*t == start + b*s
        let denominator = ray.direction.cross(self.direction);
        if denominator.abs() < EPSILON {
            return None;
        }
        let offset = self.start - ray.origin;
        let t = offset.cross(self.direction) / denominator;
        let s = offset.cross(ray.direction) / denominator;
        if t < 0.0 || s < 0.0 || s > self.length {
            return None;
        }
        Some(ray.at(t))
    }

    /// Horizontal texture coordinate of `hit` along the face, in `[0, 1]`.
    pub fn texture_offset(&self, hit: Vector) -> f64 {
        ((hit - self.start).length() / self.length).clamp(0.0, 1.0)
    }
}
