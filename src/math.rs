//! 2-D geometry primitives shared by the simulation and the renderer.

use std::ops::{Add, AddAssign, Div, Mul, MulAssign, Neg, Sub, SubAssign};

/// Lengths below this are treated as zero.
pub const EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vector {
    pub x: f64,
    pub y: f64,
}

impl Vector {
    pub const ZERO: Vector = Vector { x: 0.0, y: 0.0 };

    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }

    #[inline]
    pub fn dot(self, rhs: Vector) -> f64 {
        self.x * rhs.x + self.y * rhs.y
    }

    /// 2-D cross product (z component of the 3-D cross product).
    #[inline]
    pub fn cross(self, rhs: Vector) -> f64 {
        self.x * rhs.y - self.y * rhs.x
    }

    /// Unit vector in the same direction, or the zero vector when `self` has
    /// no usable length.
    #[inline]
    pub fn normalized(self) -> Vector {
        let len = self.length();
        if len < EPSILON || !len.is_finite() {
            return Vector::ZERO;
        }
        self / len
    }

    /// Rotated a quarter turn: `(-y, x)`.
    #[inline]
    pub fn orthogonal(self) -> Vector {
        Vector::new(-self.y, self.x)
    }

    #[inline]
    pub fn rotated(self, rotation: Rotation) -> Vector {
        Vector::new(
            self.x * rotation.cosine - self.y * rotation.sine,
            self.x * rotation.sine + self.y * rotation.cosine,
        )
    }

    #[inline]
    pub fn floor(self) -> Vector {
        Vector::new(self.x.floor(), self.y.floor())
    }
}

impl Add for Vector {
    type Output = Vector;
    #[inline]
    fn add(self, rhs: Vector) -> Vector {
        Vector::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vector {
    #[inline]
    fn add_assign(&mut self, rhs: Vector) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vector {
    type Output = Vector;
    #[inline]
    fn sub(self, rhs: Vector) -> Vector {
        Vector::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl SubAssign for Vector {
    #[inline]
    fn sub_assign(&mut self, rhs: Vector) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl Mul<f64> for Vector {
    type Output = Vector;
    #[inline]
    fn mul(self, rhs: f64) -> Vector {
        Vector::new(self.x * rhs, self.y * rhs)
    }
}

impl MulAssign<f64> for Vector {
    #[inline]
    fn mul_assign(&mut self, rhs: f64) {
        self.x *= rhs;
        self.y *= rhs;
    }
}

impl Div<f64> for Vector {
    type Output = Vector;
    #[inline]
    fn div(self, rhs: f64) -> Vector {
        Vector::new(self.x / rhs, self.y / rhs)
    }
}

impl Neg for Vector {
    type Output = Vector;
    #[inline]
    fn neg(self) -> Vector {
        Vector::new(-self.x, -self.y)
    }
}

/// A precomputed rotation, stored as its sine and cosine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rotation {
    pub sine: f64,
    pub cosine: f64,
}

impl Rotation {
    pub const IDENTITY: Rotation = Rotation {
        sine: 0.0,
        cosine: 1.0,
    };

    pub fn from_radians(angle: f64) -> Self {
        let (sine, cosine) = angle.sin_cos();
        Self { sine, cosine }
    }
}

impl Default for Rotation {
    fn default() -> Self {
        Rotation::IDENTITY
    }
}

/// A half-line. The direction is always unit length (or zero when built
/// from a degenerate vector).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vector,
    pub direction: Vector,
}

impl Ray {
    pub fn new(origin: Vector, direction: Vector) -> Self {
        Self {
            origin,
            direction: direction.normalized(),
        }
    }

    /// Ray from `origin` through `target`.
    pub fn towards(origin: Vector, target: Vector) -> Self {
        Self::new(origin, target - origin)
    }

    #[inline]
    pub fn at(&self, distance: f64) -> Vector {
        self.origin + self.direction * distance
    }
}

/// Axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: Vector,
    pub max: Vector,
}

impl Rect {
    pub const fn new(min: Vector, max: Vector) -> Self {
        Self { min, max }
    }

    pub fn centered(center: Vector, half_extent: f64) -> Self {
        let half = Vector::new(half_extent, half_extent);
        Self::new(center - half, center + half)
    }

    /// Unit square of the tile at `(x, y)`.
    pub fn tile(x: usize, y: usize) -> Self {
        let min = Vector::new(x as f64, y as f64);
        Self::new(min, min + Vector::new(1.0, 1.0))
    }

    #[inline]
    pub fn size(&self) -> Vector {
        self.max - self.min
    }

    #[inline]
    pub fn center(&self) -> Vector {
        (self.min + self.max) / 2.0
    }

    pub fn scaled(&self, scale: f64) -> Rect {
        Rect::new(self.min * scale, self.max * scale)
    }

    /// Point inside the rectangle closest to `point`.
    pub fn clamp(&self, point: Vector) -> Vector {
        Vector::new(
            point.x.clamp(self.min.x, self.max.x),
            point.y.clamp(self.min.y, self.max.y),
        )
    }

    pub fn contains(&self, point: Vector) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.y >= self.min.y && point.y <= self.max.y
    }

    /// Smallest vector by which `self` must move back (subtracted) to stop
    /// overlapping `other`. Touching edges do not count as overlap.
    pub fn intersection(&self, other: &Rect) -> Option<Vector> {
        let left = Vector::new(self.max.x - other.min.x, 0.0);
        if left.x <= 0.0 {
            return None;
        }
        let right = Vector::new(self.min.x - other.max.x, 0.0);
        if right.x >= 0.0 {
            return None;
        }
        let up = Vector::new(0.0, self.max.y - other.min.y);
        if up.y <= 0.0 {
            return None;
        }
        let down = Vector::new(0.0, self.min.y - other.max.y);
        if down.y >= 0.0 {
            return None;
        }
        [left, right, up, down]
            .into_iter()
            .min_by(|a, b| a.length().total_cmp(&b.length()))
    }
}

/// Cubic ease in/out over `t` in `[0, 1]`.
#[inline]
pub fn smoothstep(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_guards_zero_length() {
        assert_eq!(Vector::ZERO.normalized(), Vector::ZERO);
        let n = Vector::new(3.0, 4.0).normalized();
        assert!((n.length() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn orthogonal_is_quarter_turn() {
        let v = Vector::new(1.0, 0.0);
        assert_eq!(v.orthogonal(), Vector::new(0.0, 1.0));
        let r = v.rotated(Rotation::from_radians(std::f64::consts::FRAC_PI_2));
        assert!((r - v.orthogonal()).length() < 1e-12);
    }

    #[test]
    fn ray_direction_is_unit() {
        let ray = Ray::new(Vector::ZERO, Vector::new(0.0, 7.0));
        assert_eq!(ray.direction, Vector::new(0.0, 1.0));
    }

    #[test]
    fn rect_intersection_picks_shallowest_axis() {
        let a = Rect::new(Vector::new(0.0, 0.0), Vector::new(1.0, 1.0));
        let b = Rect::new(Vector::new(0.9, 0.2), Vector::new(2.0, 0.8));
        assert_eq!(a.intersection(&b).map(|v| (v.x * 10.0).round()), Some(1.0));
        let touching = Rect::new(Vector::new(1.0, 0.0), Vector::new(2.0, 1.0));
        assert_eq!(a.intersection(&touching), None);
    }
}
