//! Secret walls that slide when the player shoves them.

use crate::actor::Actor;
use crate::billboard::Billboard;
use crate::math::{Rect, Vector};
use crate::tilemap::Tile;
use crate::world::World;

/// Tiles per second while sliding.
pub const PUSHWALL_SPEED: f64 = 0.25;

#[derive(Debug, Clone, PartialEq)]
pub struct Pushwall {
    pub position: Vector,
    pub velocity: Vector,
    /// The wall tile this pushwall was carved out of; supplies its textures.
    pub tile: Tile,
}

impl Pushwall {
    pub fn new(position: Vector, tile: Tile) -> Self {
        Self {
            position,
            velocity: Vector::ZERO,
            tile,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::centered(self.position, 0.5)
    }

    pub fn is_moving(&self) -> bool {
        self.velocity != Vector::ZERO
    }

    /// The faces of the block that can be seen from `viewpoint`.
    pub fn billboards(&self, viewpoint: Vector) -> Vec<Billboard> {
        let Rect { min, max } = self.rect();
        let [vertical, horizontal] = self.tile.textures();
        [
            Billboard::new(min, Vector::new(0.0, 1.0), 1.0, vertical),
            Billboard::new(Vector::new(max.x, min.y), Vector::new(-1.0, 0.0), 1.0, horizontal),
            Billboard::new(max, Vector::new(0.0, -1.0), 1.0, vertical),
            Billboard::new(Vector::new(min.x, max.y), Vector::new(1.0, 0.0), 1.0, horizontal),
        ]
        .into_iter()
        .filter(|billboard| (billboard.start - viewpoint).dot(billboard.direction.orthogonal()) < 0.0)
        .collect()
    }

    /// Whether the block overlaps anything solid: map walls, door leaves or
    /// another pushwall.
    fn is_obstructed(&self, world: &World) -> bool {
        let rect = self.rect();
        let map = world.map();
        let (x0, y0) = (rect.min.x.floor() as isize, rect.min.y.floor() as isize);
        let (x1, y1) = (rect.max.x.floor() as isize, rect.max.y.floor() as isize);
        let hits_wall = (y0..=y1)
            .flat_map(|y| (x0..=x1).map(move |x| (x, y)))
            .filter(|&(x, y)| map.is_wall(x, y))
            .any(|(x, y)| {
                let tile = Rect::new(
                    Vector::new(x as f64, y as f64),
                    Vector::new(x as f64 + 1.0, y as f64 + 1.0),
                );
                rect.intersection(&tile).is_some()
            });
        hits_wall
            || world.doors.iter().any(|door| crosses(&rect, &door.rect()))
            || world
                .pushwalls
                .iter()
                .filter(|other| other.position != self.position)
                .any(|other| rect.intersection(&other.rect()).is_some())
    }

    /// Stops a sliding block against anything solid, or starts one the
    /// player is pushing into. Position is integrated by the world afterwards.
    pub fn update(&mut self, world: &World) {
        if self.is_moving() {
            if self.is_obstructed(world) {
                // Settle on the tile the block is leaving.
                let back = self.velocity.normalized() * 0.5;
                self.position = (self.position - back).floor() + Vector::new(0.5, 0.5);
                self.velocity = Vector::ZERO;
                tracing::debug!(position = ?self.position, "pushwall stopped");
            }
            return;
        }

        let player = &world.player;
        if player.is_dead() {
            return;
        }
        let Some(push) = player.rect().intersection(&self.rect()) else {
            return;
        };
        let direction = if push.x.abs() > push.y.abs() {
            Vector::new(push.x.signum(), 0.0)
        } else {
            Vector::new(0.0, push.y.signum())
        };
        let target = self.position + direction;
        if !world.map().is_wall(target.x.floor() as isize, target.y.floor() as isize) {
            tracing::debug!(position = ?self.position, ?direction, "pushwall pushed");
            self.velocity = direction * PUSHWALL_SPEED;
        }
    }
}

/// Strict overlap that also holds for a zero-thickness `segment`.
fn crosses(rect: &Rect, segment: &Rect) -> bool {
    segment.min.x < rect.max.x
        && segment.max.x > rect.min.x
        && segment.min.y < rect.max.y
        && segment.max.y > rect.min.y
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Input;
    use crate::tilemap::Tilemap;

    fn slide_right(rows: &[&str]) -> World {
        let mut world = World::new(Tilemap::from_rows(rows, 0).unwrap()).unwrap();
        world.pushwalls[0].velocity = Vector::new(PUSHWALL_SPEED, 0.0);
        for _ in 0..1200 {
            world.update(1.0 / 60.0, &Input::default());
        }
        world
    }

    #[test]
    fn sliding_block_stops_before_a_wall() {
        let world = slide_right(&["#######", "#PW...#", "#######"]);
        assert!(!world.pushwalls[0].is_moving());
        assert_eq!(world.pushwalls[0].position, Vector::new(5.5, 1.5));
    }

    #[test]
    fn sliding_block_stops_before_a_closed_door() {
        let world = slide_right(&["#######", "#PW.D.#", "#######"]);
        assert!(!world.pushwalls[0].is_moving());
        assert_eq!(world.pushwalls[0].position, Vector::new(3.5, 1.5));
    }

    #[test]
    fn sliding_block_stops_before_another_pushwall() {
        let world = slide_right(&["########", "#PW..W.#", "########"]);
        assert!(!world.pushwalls[0].is_moving());
        assert_eq!(world.pushwalls[0].position, Vector::new(4.5, 1.5));
        assert_eq!(world.pushwalls[1].position, Vector::new(5.5, 1.5));
    }

    #[test]
    fn only_faces_toward_the_viewer_are_returned() {
        let pushwall = Pushwall::new(Vector::new(3.5, 3.5), Tile::CrackWall);
        let faces = pushwall.billboards(Vector::new(1.5, 3.5));
        assert_eq!(faces.len(), 1);
        assert_eq!(faces[0].start, Vector::new(3.0, 3.0));

        let diagonal = pushwall.billboards(Vector::new(1.5, 1.5));
        assert_eq!(diagonal.len(), 2);
    }
}
