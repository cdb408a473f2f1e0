//! Digital line stepping across the tile lattice.
//!
//! A [`Traversal`] walks a ray from grid line to grid line, yielding the ray
//! origin first and then every point where the ray crosses a vertical or
//! horizontal grid line, in travel order. It is lazy and always finite: it
//! stops when its [`Halt`] policy fires, when the ray direction is degenerate,
//! or after `width + height + 2` steps, whichever comes first.

use crate::math::{Ray, Vector};
use crate::tilemap::Tilemap;

/// Travelled distances this close to the target count as reached.
const DISTANCE_TOLERANCE: f64 = 1e-7;

/// When a traversal stops. The point that triggers the policy is still
/// yielded as the final element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Halt {
    /// Stop on entering a wall tile (or leaving the map).
    Wall,
    /// Stop once the travelled distance reaches the given value.
    Distance(f64),
}

pub struct Traversal<'a> {
    map: &'a Tilemap,
    ray: Ray,
    halt: Halt,
    position: Option<Vector>,
    remaining: usize,
    finished: bool,
}

impl<'a> Traversal<'a> {
    pub fn new(map: &'a Tilemap, ray: Ray, halt: Halt) -> Self {
        Self {
            map,
            ray,
            halt,
            position: None,
            remaining: map.width() + map.height() + 2,
            finished: false,
        }
    }

    fn should_halt(&self, position: Vector) -> bool {
        match self.halt {
            Halt::Wall => {
                let (x, y) = self.map.tile_coords(position, self.ray.direction);
                self.map.is_wall(x, y)
            }
            Halt::Distance(limit) => {
                (position - self.ray.origin).length() >= limit - DISTANCE_TOLERANCE
            }
        }
    }
}

impl Iterator for Traversal<'_> {
    type Item = Vector;

    fn next(&mut self) -> Option<Vector> {
        if self.finished {
            return None;
        }
        let Some(position) = self.position else {
            self.position = Some(self.ray.origin);
            return Some(self.ray.origin);
        };
        if self.remaining == 0 {
            self.finished = true;
            return None;
        }
        self.remaining -= 1;

        let Some(next) = next_crossing(position, self.ray.direction) else {
            self.finished = true;
            return None;
        };
        self.position = Some(next);
        if self.should_halt(next) {
            self.finished = true;
        }
        Some(next)
    }
}

/// Signed distance along one axis to the next grid line in the direction of
/// travel.
#[inline]
fn edge_distance(coordinate: f64, direction: f64) -> f64 {
    if direction > 0.0 {
        coordinate.floor() + 1.0 - coordinate
    } else {
        coordinate.ceil() - 1.0 - coordinate
    }
}

/// The next grid-line crossing after `position`. The candidate reaching a
/// vertical line (x edge) wins when both are reached at the same ray
/// parameter. Returns `None` for a zero direction.
pub fn next_crossing(position: Vector, direction: Vector) -> Option<Vector> {
    let edge_x = edge_distance(position.x, direction.x);
    let edge_y = edge_distance(position.y, direction.y);

    // The axis being stepped onto is snapped to its grid line so later
    // floor/ceil tests see an exact integer.
    let via_x = (direction.x != 0.0).then(|| {
        let point = Vector::new(
            (position.x + edge_x).round(),
            position.y + edge_x * direction.y / direction.x,
        );
        (edge_x / direction.x, point)
    });
    let via_y = (direction.y != 0.0).then(|| {
        let point = Vector::new(
            position.x + edge_y * direction.x / direction.y,
            (position.y + edge_y).round(),
        );
        (edge_y / direction.y, point)
    });

    match (via_x, via_y) {
        (Some((t_x, a)), Some((t_y, b))) => Some(if t_x <= t_y { a } else { b }),
        (a, b) => a.or(b).map(|(_, point)| point),
    }
}
