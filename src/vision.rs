//! Fog-of-war memory: when each tile was last seen by the player.

use crate::bitmap::Color;
use crate::config::VisionConfig;
use crate::math::Ray;
use crate::raycaster::RayCaster;
use crate::traversal::{Halt, Traversal};
use crate::world::World;

pub const FOG_COLOR: Color = Color::GRAY;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sighting {
    /// World time of the latest sighting.
    pub seen_at: f64,
    pub was_wall: bool,
}

#[derive(Debug, Clone, Default)]
pub struct WorldVision {
    width: usize,
    height: usize,
    tiles: Vec<Option<Sighting>>,
    config: VisionConfig,
}

impl WorldVision {
    pub fn new(width: usize, height: usize, config: VisionConfig) -> Self {
        Self {
            width,
            height,
            tiles: vec![None; width * height],
            config,
        }
    }

    pub fn config(&self) -> &VisionConfig {
        &self.config
    }

    fn index(&self, x: isize, y: isize) -> Option<usize> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        Some(y as usize * self.width + x as usize)
    }

    pub fn sighting(&self, x: isize, y: isize) -> Option<Sighting> {
        self.index(x, y).and_then(|i| self.tiles[i])
    }

    pub fn mark(&mut self, x: isize, y: isize, now: f64, was_wall: bool) {
        if let Some(i) = self.index(x, y) {
            self.tiles[i] = Some(Sighting {
                seen_at: now,
                was_wall,
            });
        }
    }

    /// Marks every tile the player's vision fan reaches, up to and
    /// including the first solid surface along each ray.
    pub fn update(&mut self, world: &World) {
        let player = &world.player;
        let caster = RayCaster::new(1.0, 1.0, player.direction, player.position, self.config.rays);
        for ray in caster.rays() {
            self.mark_ray(ray, world);
        }
    }

    fn mark_ray(&mut self, ray: Ray, world: &World) {
        let map = world.map();
        let limit = (world.hit_test(ray) - ray.origin).length();
        for point in Traversal::new(map, ray, Halt::Distance(limit)) {
            // A door or pushwall face can stop the ray mid-tile; the
            // crossing after it is not visible.
            if (point - ray.origin).length() > limit + 1e-7 {
                break;
            }
            let (x, y) = map.tile_coords(point, ray.direction);
            self.mark(x, y, world.time(), map.is_wall(x, y));
        }
    }

    /// Overlay opacity for the tile at `(x, y)` at time `now`, or `None` if
    /// the tile should be drawn fully revealed.
    ///
    /// Unseen tiles are fully covered. A seen floor tile stays clear for
    /// `delay` seconds, then fades toward `completion` over `duration`.
    /// Walls stay revealed once seen.
    pub fn fog(&self, x: isize, y: isize, now: f64) -> Option<f64> {
        let Some(sighting) = self.sighting(x, y) else {
            return Some(1.0);
        };
        if sighting.was_wall {
            return None;
        }
        let VisionConfig {
            duration,
            delay,
            completion,
            ..
        } = self.config;
        let since = now - sighting.seen_at;
        if since < delay {
            return None;
        }
        let faded = (since - delay).min(duration * completion);
        Some(faded / duration)
    }
}
