//! Fan of per-column view rays through a flat projection plane.

use crate::math::{Ray, Vector};

/// Camera pose plus a view plane split into `columns` equal steps.
#[derive(Debug, Clone, Copy)]
pub struct RayCaster {
    pub focal_length: f64,
    pub view_width: f64,
    pub origin: Vector,
    /// Full view plane vector, perpendicular to the view direction.
    pub view_plane: Vector,
    pub view_center: Vector,
    pub step: Vector,
    pub columns: usize,
}

impl RayCaster {
    pub fn new(
        focal_length: f64,
        view_width: f64,
        direction: Vector,
        origin: Vector,
        columns: usize,
    ) -> Self {
        let direction = direction.normalized();
        let view_plane = direction.orthogonal() * view_width;
        let step = if columns == 0 {
            Vector::ZERO
        } else {
            view_plane / columns as f64
        };
        Self {
            focal_length,
            view_width,
            origin,
            view_plane,
            view_center: origin + direction * focal_length,
            step,
            columns,
        }
    }

    #[inline]
    pub fn view_start(&self) -> Vector {
        self.view_center - self.view_plane / 2.0
    }

    /// Point on the view plane that column `x` aims at.
    #[inline]
    pub fn sample(&self, x: usize) -> Vector {
        self.view_start() + self.step * x as f64
    }

    pub fn ray(&self, x: usize) -> Ray {
        Ray::towards(self.origin, self.sample(x))
    }

    /// Ratio between the distance to column `x`'s sample and the focal
    /// length. Dividing a hit distance by this gives the distance measured
    /// perpendicular to the view plane.
    pub fn distance_ratio(&self, x: usize) -> f64 {
        (self.sample(x) - self.origin).length() / self.focal_length
    }

    pub fn rays(&self) -> Rays<'_> {
        Rays {
            caster: self,
            column: 0,
        }
    }
}

impl<'a> IntoIterator for &'a RayCaster {
    type Item = Ray;
    type IntoIter = Rays<'a>;

    fn into_iter(self) -> Rays<'a> {
        self.rays()
    }
}

pub struct Rays<'a> {
    caster: &'a RayCaster,
    column: usize,
}

impl Iterator for Rays<'_> {
    type Item = Ray;

    fn next(&mut self) -> Option<Ray> {
        if self.column >= self.caster.columns {
            return None;
        }
        let ray = self.caster.ray(self.column);
        self.column += 1;
        Some(ray)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.caster.columns.saturating_sub(self.column);
        (left, Some(left))
    }
}

impl ExactSizeIterator for Rays<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tilemap::Tilemap;

    fn caster(columns: usize) -> RayCaster {
        RayCaster::new(1.0, 1.5, Vector::new(1.0, 0.0), Vector::new(2.5, 3.5), columns)
    }

    #[test]
    fn columns_tile_the_view_plane() {
        let c = caster(64);
        let first = c.ray(0);
        assert!((first.direction - (c.view_start() - c.origin).normalized()).length() < 1e-12);
        let last_point = c.view_start() + c.step * 63.0;
        assert!((c.sample(63) - last_point).length() < 1e-12);
        assert!((c.step * 64.0 - c.view_plane).length() < 1e-12);
        assert_eq!(c.rays().len(), 64);
    }

    #[test]
    fn rays_are_unit_length() {
        let c = caster(17);
        for ray in &c {
            assert!((ray.direction.length() - 1.0).abs() < 1e-12);
            assert_eq!(ray.origin, c.origin);
        }
    }

    #[test]
    fn perpendicular_distance_is_uniform_on_a_facing_wall() {
        let map = Tilemap::from_rows(
            &[
                "##########",
                "#........#",
                "#........#",
                "#........#",
                "#........#",
                "#........#",
                "##########",
            ],
            0,
        )
        .unwrap();
        let c = RayCaster::new(1.0, 1.0, Vector::new(1.0, 0.0), Vector::new(2.5, 3.5), 40);
        for (x, ray) in c.rays().enumerate() {
            let hit = map.hit_test(ray);
            assert_eq!(hit.x, 9.0);
            let perpendicular = (hit - ray.origin).length() / c.distance_ratio(x);
            assert!((perpendicular - 6.5).abs() < 1e-9, "column {x}: {perpendicular}");
        }
    }
}
