//! Shared collision behaviour for everything that moves as a circle.

use crate::door::Door;
use crate::math::{EPSILON, Rect, Vector};
use crate::pushwall::Pushwall;
use crate::tilemap::Tilemap;

/// Upper bound on push-out passes per actor per update.
pub const MAX_PUSH_ITERATIONS: usize = 16;
/// Damage per update taken by an actor that cannot be pushed clear.
pub const STUCK_DAMAGE: f64 = 1.0;

/// Everything an actor cannot walk through.
#[derive(Clone, Copy)]
pub struct Obstacles<'a> {
    pub map: &'a Tilemap,
    pub doors: &'a [Door],
    pub pushwalls: &'a [Pushwall],
}

impl Obstacles<'_> {
    /// Deepest overlap between the circle and any solid shape, as the vector
    /// to subtract from the circle's centre.
    pub fn penetration(&self, center: Vector, radius: f64) -> Option<Vector> {
        let min_x = (center.x - radius).floor() as isize;
        let max_x = (center.x + radius).floor() as isize;
        let min_y = (center.y - radius).floor() as isize;
        let max_y = (center.y + radius).floor() as isize;
        let walls = (min_y..=max_y)
            .flat_map(|y| (min_x..=max_x).map(move |x| (x, y)))
            .filter(|&(x, y)| self.map.is_wall(x, y))
            .filter_map(|(x, y)| self.wall_penetration(center, radius, x, y));
        let doors = self
            .doors
            .iter()
            .filter_map(|door| circle_rect_penetration(center, radius, &door.rect()));
        let pushwalls = self
            .pushwalls
            .iter()
            .filter_map(|pushwall| circle_rect_penetration(center, radius, &pushwall.rect()));
        walls
            .chain(doors)
            .chain(pushwalls)
            .max_by(|a, b| a.length().total_cmp(&b.length()))
    }

    /// Overlap with the wall tile at `(x, y)`. A centre buried in the tile
    /// leaves through the nearest side that opens onto a walkable tile.
    fn wall_penetration(&self, center: Vector, radius: f64, x: isize, y: isize) -> Option<Vector> {
        let tile = Rect::new(
            Vector::new(x as f64, y as f64),
            Vector::new(x as f64 + 1.0, y as f64 + 1.0),
        );
        if (tile.clamp(center) - center).length() > EPSILON {
            return circle_rect_penetration(center, radius, &tile);
        }
        let exits = side_exits(center, radius, &tile);
        let neighbours = [(x - 1, y), (x + 1, y), (x, y - 1), (x, y + 1)];
        let open = exits
            .into_iter()
            .zip(neighbours)
            .filter(|&(_, (nx, ny))| !self.map.is_wall(nx, ny))
            .map(|(push, _)| push);
        // Fully enclosed: any side will do, later passes resolve the rest.
        shortest(open).or_else(|| shortest(exits.into_iter()))
    }
}

fn shortest(pushes: impl Iterator<Item = Vector>) -> Option<Vector> {
    pushes.min_by(|a, b| a.length().total_cmp(&b.length()))
}

/// Pushes that move a centre inside `rect` out past its left, right, top
/// and bottom sides.
fn side_exits(center: Vector, radius: f64, rect: &Rect) -> [Vector; 4] {
    [
        Vector::new(center.x - (rect.min.x - radius), 0.0),
        Vector::new(center.x - (rect.max.x + radius), 0.0),
        Vector::new(0.0, center.y - (rect.min.y - radius)),
        Vector::new(0.0, center.y - (rect.max.y + radius)),
    ]
}

/// How far a circle overlaps `rect` (which may be a zero-width segment).
pub fn circle_rect_penetration(center: Vector, radius: f64, rect: &Rect) -> Option<Vector> {
    let closest = rect.clamp(center);
    let offset = closest - center;
    let distance = offset.length();
    if radius - distance <= EPSILON {
        return None;
    }
    if distance > EPSILON {
        return Some(offset / distance * (radius - distance));
    }
    // Centre is inside the shape: leave through the nearest side.
    shortest(side_exits(center, radius, rect).into_iter())
}

/// Whether a circle touches or overlaps `rect`.
pub fn circle_touches_rect(center: Vector, radius: f64, rect: &Rect) -> bool {
    (rect.clamp(center) - center).length() <= radius + EPSILON
}

pub trait Actor {
    fn radius(&self) -> f64;
    fn position(&self) -> Vector;
    fn position_mut(&mut self) -> &mut Vector;
    fn health(&self) -> f64;

    fn is_dead(&self) -> bool {
        self.health() <= 0.0
    }

    fn rect(&self) -> Rect {
        Rect::centered(self.position(), self.radius())
    }

    /// Overlap with another actor, as the vector to subtract from `self`
    /// (and add to `other`) to separate them completely.
    fn intersection<A: Actor + ?Sized>(&self, other: &A) -> Option<Vector> {
        let offset = other.position() - self.position();
        let reach = self.radius() + other.radius();
        let distance = offset.length();
        if reach - distance <= EPSILON {
            return None;
        }
        let axis = if distance > EPSILON {
            offset / distance
        } else {
            Vector::new(1.0, 0.0)
        };
        Some(axis * (reach - distance))
    }

    fn obstacle_intersection(&self, obstacles: &Obstacles<'_>) -> Option<Vector> {
        obstacles.penetration(self.position(), self.radius())
    }

    /// Pushes the actor out of walls, doors and pushwalls. Returns `false`
    /// if it is still overlapping something after the iteration cap.
    fn avoid_obstacles(&mut self, obstacles: &Obstacles<'_>) -> bool {
        for _ in 0..MAX_PUSH_ITERATIONS {
            match self.obstacle_intersection(obstacles) {
                Some(push) => *self.position_mut() -= push,
                None => return true,
            }
        }
        self.obstacle_intersection(obstacles).is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Ball {
        position: Vector,
        radius: f64,
    }

    impl Actor for Ball {
        fn radius(&self) -> f64 {
            self.radius
        }
        fn position(&self) -> Vector {
            self.position
        }
        fn position_mut(&mut self) -> &mut Vector {
            &mut self.position
        }
        fn health(&self) -> f64 {
            1.0
        }
    }

    fn map() -> Tilemap {
        Tilemap::from_rows(&["####", "#..#", "#..#", "####"], 0).unwrap()
    }

    #[test]
    fn pushes_out_of_a_flat_wall() {
        let map = map();
        let obstacles = Obstacles {
            map: &map,
            doors: &[],
            pushwalls: &[],
        };
        let mut ball = Ball {
            position: Vector::new(1.1, 1.8),
            radius: 0.25,
        };
        assert!(ball.avoid_obstacles(&obstacles));
        assert!((ball.position.x - 1.25).abs() < 1e-9);
        assert!((ball.position.y - 1.8).abs() < 1e-9);
    }

    #[test]
    fn pushes_out_of_an_inner_corner() {
        let map = map();
        let obstacles = Obstacles {
            map: &map,
            doors: &[],
            pushwalls: &[],
        };
        let mut ball = Ball {
            position: Vector::new(1.05, 1.05),
            radius: 0.4,
        };
        assert!(ball.avoid_obstacles(&obstacles));
        assert!(ball.position.x >= 1.4 - 1e-9 && ball.position.y >= 1.4 - 1e-9);
    }

    #[test]
    fn centre_inside_a_wall_leaves_through_nearest_side() {
        let tile = Rect::new(Vector::new(0.0, 0.0), Vector::new(1.0, 1.0));
        let push = circle_rect_penetration(Vector::new(0.9, 0.5), 0.25, &tile).unwrap();
        let moved = Vector::new(0.9, 0.5) - push;
        assert!((moved - Vector::new(1.25, 0.5)).length() < 1e-12);
    }

    #[test]
    fn buried_centre_leaves_toward_open_floor() {
        // The nearest side of tile (0, 4) faces the wall below it; the open
        // side is to the right.
        let map = Tilemap::from_rows(
            &["######", "#....#", "#....#", "#..#.#", "#....#", "######"],
            0,
        )
        .unwrap();
        let obstacles = Obstacles {
            map: &map,
            doors: &[],
            pushwalls: &[],
        };
        let mut ball = Ball {
            position: Vector::new(0.87, 4.88),
            radius: 0.25,
        };
        assert!(ball.avoid_obstacles(&obstacles));
        assert!(
            (ball.position - Vector::new(1.25, 4.75)).length() < 1e-9,
            "ended at {:?}",
            ball.position
        );
        assert_eq!(obstacles.penetration(ball.position, ball.radius), None);
    }

    #[test]
    fn deepest_overlap_is_resolved_first() {
        let map = map();
        let obstacles = Obstacles {
            map: &map,
            doors: &[],
            pushwalls: &[],
        };
        // Grazes the left wall by 0.05 and sinks 0.2 into the top wall.
        let push = obstacles.penetration(Vector::new(1.2, 1.05), 0.25).unwrap();
        assert!((push - Vector::new(0.0, -0.2)).length() < 1e-9, "{push:?}");
    }

    #[test]
    fn overlapping_actors_separate_along_centre_line() {
        let a = Ball {
            position: Vector::new(1.0, 1.0),
            radius: 0.5,
        };
        let b = Ball {
            position: Vector::new(1.6, 1.0),
            radius: 0.5,
        };
        let push = a.intersection(&b).unwrap();
        assert!((push - Vector::new(0.4, 0.0)).length() < 1e-12);
        let far = Ball {
            position: Vector::new(3.0, 1.0),
            radius: 0.5,
        };
        assert_eq!(a.intersection(&far), None);
    }
}
