//! The authoritative simulation: spawns a level, steps every entity and
//! resolves collisions between them.

use crate::actor::{Actor, Obstacles, STUCK_DAMAGE};
use crate::billboard::Billboard;
use crate::bitmap::Color;
use crate::config::VisionConfig;
use crate::door::Door;
use crate::effect::{Effect, EffectKind};
use crate::error::MapResult;
use crate::input::Input;
use crate::math::{Ray, Vector};
use crate::monster::Monster;
use crate::player::Player;
use crate::pushwall::Pushwall;
use crate::switch::Switch;
use crate::texture::Texture;
use crate::tilemap::{Thing, Tile, Tilemap};
use crate::vision::WorldVision;

/// Something an entity asks the world to do on its behalf.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WorldEvent {
    HurtPlayer(f64),
    HurtMonster { index: usize, damage: f64 },
    EndLevel,
}

/// Something the world asks its owner to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorldAction {
    LoadLevel(usize),
}

/// The wall surface a ray ended on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallFace {
    pub texture: Texture,
    /// Horizontal texture coordinate in `[0, 1)`.
    pub u: f64,
    pub tile: (isize, isize),
}

#[derive(Debug, Clone)]
pub struct World {
    /// The level as loaded; `map` is rebuilt from it on every reset.
    level: Tilemap,
    map: Tilemap,
    effects: Vec<Effect>,
    vision: WorldVision,
    vision_config: VisionConfig,
    time: f64,
    is_level_ended: bool,
    pub player: Player,
    pub monsters: Vec<Monster>,
    pub doors: Vec<Door>,
    pub switches: Vec<Switch>,
    pub pushwalls: Vec<Pushwall>,
    /// Draw the top-down map without fog.
    pub is_revealed: bool,
}

impl World {
    pub fn new(map: Tilemap) -> MapResult<Self> {
        Self::with_vision(map, VisionConfig::default())
    }

    pub fn with_vision(map: Tilemap, vision_config: VisionConfig) -> MapResult<Self> {
        map.validate()?;
        let mut world = Self {
            level: map.clone(),
            map,
            effects: Vec::new(),
            vision: WorldVision::default(),
            vision_config,
            time: 0.0,
            is_level_ended: false,
            player: Player::new(Vector::ZERO),
            monsters: Vec::new(),
            doors: Vec::new(),
            switches: Vec::new(),
            pushwalls: Vec::new(),
            is_revealed: false,
        };
        world.reset();
        Ok(world)
    }

    /// Respawns every entity from the level and forgets what was seen.
    /// Queued effects survive.
    pub fn reset(&mut self) {
        self.map = self.level.clone();
        self.monsters.clear();
        self.doors.clear();
        self.switches.clear();
        self.pushwalls.clear();
        self.is_level_ended = false;

        for y in 0..self.level.height() {
            for x in 0..self.level.width() {
                let position = Vector::new(x as f64 + 0.5, y as f64 + 0.5);
                let (xi, yi) = (x as isize, y as isize);
                match self.level.thing(x, y) {
                    Thing::Nothing => {}
                    Thing::Player => self.player = Player::new(position),
                    Thing::Monster => self.monsters.push(Monster::new(position)),
                    Thing::Door => {
                        let is_vertical = self.level.is_wall(xi, yi - 1) && self.level.is_wall(xi, yi + 1);
                        self.doors.push(Door::new(position, is_vertical));
                    }
                    Thing::Pushwall => {
                        let tile = self.level.tile(xi, yi).unwrap_or(Tile::Wall);
                        self.map.set_tile(x, y, Tile::Floor);
                        self.pushwalls.push(Pushwall::new(position, tile));
                    }
                    Thing::Switch => self.switches.push(Switch::new(position)),
                }
            }
        }

        self.vision = WorldVision::new(self.map.width(), self.map.height(), self.vision_config);
        tracing::info!(
            level = self.map.index(),
            monsters = self.monsters.len(),
            doors = self.doors.len(),
            "world reset"
        );
    }

    /// Replaces the level and respawns. In-flight effects are kept so a
    /// transition can finish over the new level.
    pub fn set_level(&mut self, map: Tilemap) -> MapResult<()> {
        map.validate()?;
        tracing::info!(level = map.index(), "level loaded");
        self.level = map;
        self.reset();
        Ok(())
    }

    #[inline]
    pub fn map(&self) -> &Tilemap {
        &self.map
    }

    #[inline]
    pub fn effects(&self) -> &[Effect] {
        &self.effects
    }

    pub fn push_effect(&mut self, effect: Effect) {
        self.effects.push(effect);
    }

    #[inline]
    pub fn vision(&self) -> &WorldVision {
        &self.vision
    }

    /// Simulation clock in seconds.
    #[inline]
    pub fn time(&self) -> f64 {
        self.time
    }

    #[inline]
    pub fn is_level_ended(&self) -> bool {
        self.is_level_ended
    }

    pub fn size(&self) -> Vector {
        self.map.size()
    }

    pub fn end_level(&mut self) {
        if self.is_level_ended {
            return;
        }
        tracing::info!(level = self.map.index(), "level ended");
        self.is_level_ended = true;
        self.effects
            .push(Effect::new(EffectKind::FadeOut, Color::BLACK, 2.0));
    }

    pub fn hurt_player(&mut self, damage: f64) {
        if self.player.is_dead() {
            return;
        }
        self.effects
            .push(Effect::new(EffectKind::FadeIn, Color::RED, 0.2));
        self.wound_player(damage);
    }

    fn wound_player(&mut self, damage: f64) {
        if self.player.is_dead() {
            return;
        }
        self.player.health -= damage;
        if self.player.is_dead() {
            tracing::info!(position = ?self.player.position, "player died");
            self.player.velocity = Vector::ZERO;
            self.effects
                .push(Effect::new(EffectKind::FizzleOut, Color::RED, 2.0));
        }
    }

    pub fn hurt_monster(&mut self, index: usize, damage: f64) {
        if let Some(monster) = self.monsters.get_mut(index) {
            monster.hurt(damage);
        }
    }

    pub fn apply(&mut self, event: WorldEvent) {
        match event {
            WorldEvent::HurtPlayer(damage) => self.hurt_player(damage),
            WorldEvent::HurtMonster { index, damage } => self.hurt_monster(index, damage),
            WorldEvent::EndLevel => self.end_level(),
        }
    }

    /// Nearest solid surface along `ray`: walls, doors, and pushwall faces
    /// turned toward the ray origin.
    pub fn hit_test(&self, ray: Ray) -> Vector {
        let mut nearest = self.map.hit_test(ray);
        let mut nearest_distance = (nearest - ray.origin).length();
        let faces = self
            .doors
            .iter()
            .map(Door::billboard)
            .chain(self.pushwalls.iter().flat_map(|pushwall| pushwall.billboards(ray.origin)));
        for face in faces {
            if let Some(hit) = face.hit_test(ray) {
                let distance = (hit - ray.origin).length();
                if distance < nearest_distance {
                    nearest = hit;
                    nearest_distance = distance;
                }
            }
        }
        nearest
    }

    /// Index of the closest living monster `ray` hits before any surface.
    pub fn pick_monster(&self, ray: Ray) -> Option<usize> {
        let limit = (self.hit_test(ray) - ray.origin).length();
        self.monsters
            .iter()
            .enumerate()
            .filter_map(|(index, monster)| {
                monster
                    .hit_test(ray)
                    .map(|hit| (index, (hit - ray.origin).length()))
            })
            .filter(|&(_, distance)| distance < limit)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(index, _)| index)
    }

    /// Every sprite face as seen from the player.
    pub fn sprites(&self) -> Vec<Billboard> {
        let plane = self.player.direction.orthogonal();
        self.monsters
            .iter()
            .map(|monster| monster.billboard(plane))
            .chain(self.doors.iter().map(Door::billboard))
            .chain(
                self.pushwalls
                    .iter()
                    .flat_map(|pushwall| pushwall.billboards(self.player.position)),
            )
            .collect()
    }

    #[inline]
    pub fn is_door(&self, x: isize, y: isize) -> bool {
        self.map.is_door(x, y)
    }

    pub fn switch_at(&self, x: isize, y: isize) -> Option<&Switch> {
        self.switches.iter().find(|switch| switch.tile() == (x, y))
    }

    /// Texture and horizontal coordinate for the wall face a ray travelling
    /// along `direction` ended on at `end`. Walls beside a door show the
    /// door jamb.
    pub fn wall_face(&self, end: Vector, direction: Vector) -> WallFace {
        let (x, y) = self.map.tile_coords(end, direction);
        let [vertical, horizontal] = self.map.tile(x, y).unwrap_or(Tile::Wall).textures();
        if end.x.floor() == end.x && direction.x != 0.0 {
            let behind = x - direction.x.signum() as isize;
            let texture = if self.is_door(behind, y) {
                Texture::DoorJamb
            } else {
                vertical
            };
            WallFace {
                texture,
                u: end.y - end.y.floor(),
                tile: (x, y),
            }
        } else {
            let behind = y - direction.y.signum() as isize;
            let texture = if self.is_door(x, behind) {
                Texture::DoorJamb2
            } else {
                horizontal
            };
            WallFace {
                texture,
                u: end.x - end.x.floor(),
                tile: (x, y),
            }
        }
    }

    fn refresh_vision(&mut self) {
        let mut vision = std::mem::take(&mut self.vision);
        vision.update(self);
        self.vision = vision;
    }

    /// Advances the simulation by `time_step` seconds.
    pub fn update(&mut self, time_step: f64, input: &Input) -> Option<WorldAction> {
        self.time += time_step;
        for effect in &mut self.effects {
            effect.time += time_step;
        }
        self.effects.retain(|effect| !effect.is_completed());

        if self.is_level_ended {
            if self.effects.is_empty() {
                self.is_level_ended = false;
                return Some(WorldAction::LoadLevel(self.map.index() + 1));
            }
            return None;
        }

        self.refresh_vision();

        if !self.player.is_dead() {
            let mut player = self.player.clone();
            let event = player.update(input, self);
            player.position += player.velocity * time_step;
            player.animation.advance(time_step);
            self.player = player;
            if let Some(event) = event {
                self.apply(event);
            }
        } else if self.effects.is_empty() {
            self.reset();
            self.effects
                .push(Effect::new(EffectKind::FadeIn, Color::RED, 0.5));
            return None;
        }

        self.refresh_vision();

        for index in 0..self.monsters.len() {
            let mut monster = self.monsters[index].clone();
            let event = monster.update(self);
            monster.position += monster.velocity * time_step;
            monster.animation.advance(time_step);
            self.monsters[index] = monster;
            if let Some(event) = event {
                self.apply(event);
            }
        }

        for index in 0..self.doors.len() {
            let mut door = self.doors[index].clone();
            door.time += time_step;
            door.update(self);
            self.doors[index] = door;
        }

        for index in 0..self.switches.len() {
            let mut switch = self.switches[index].clone();
            switch.animation.advance(time_step);
            let event = switch.update(self);
            self.switches[index] = switch;
            if let Some(event) = event {
                self.apply(event);
            }
        }

        for index in 0..self.pushwalls.len() {
            let mut pushwall = self.pushwalls[index].clone();
            pushwall.update(self);
            pushwall.position += pushwall.velocity * time_step;
            self.pushwalls[index] = pushwall;
        }

        self.resolve_collisions();
        None
    }

    /// Separates overlapping actors, then pushes each one out of the
    /// scenery. Actors that cannot be freed take damage.
    fn resolve_collisions(&mut self) {
        let obstacles = Obstacles {
            map: &self.map,
            doors: &self.doors,
            pushwalls: &self.pushwalls,
        };
        let player = &mut self.player;
        let mut stuck = Vec::new();

        for index in 0..self.monsters.len() {
            let (head, tail) = self.monsters.split_at_mut(index + 1);
            let monster = &mut head[index];
            if monster.is_dead() {
                continue;
            }
            if let Some(push) = player.intersection(&*monster) {
                player.position -= push / 2.0;
                monster.position += push / 2.0;
            }
            for other in tail.iter_mut().filter(|other| !other.is_dead()) {
                if let Some(push) = monster.intersection(&*other) {
                    monster.position -= push / 2.0;
                    other.position += push / 2.0;
                }
            }
            if !monster.avoid_obstacles(&obstacles) {
                stuck.push(index);
            }
        }
        let player_stuck = !player.avoid_obstacles(&obstacles);

        for index in stuck {
            tracing::debug!(index, "monster stuck");
            self.hurt_monster(index, STUCK_DAMAGE);
        }
        if player_stuck {
            tracing::debug!(position = ?self.player.position, "player stuck");
            self.wound_player(STUCK_DAMAGE);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world(rows: &[&str]) -> World {
        World::new(Tilemap::from_rows(rows, 0).unwrap()).unwrap()
    }

    fn door_world() -> World {
        world(&[
            "#####", //
            "#.#.#",
            "#PD.#",
            "#.#.#",
            "#####",
        ])
    }

    #[test]
    fn spawns_things_at_tile_centres() {
        let world = world(&[
            "#####", //
            "#P.M#",
            "#####",
        ]);
        assert_eq!(world.player.position, Vector::new(1.5, 1.5));
        assert_eq!(world.monsters.len(), 1);
        assert_eq!(world.monsters[0].position, Vector::new(3.5, 1.5));
    }

    #[test]
    fn closed_door_blocks_world_hit_test_only() {
        let world = door_world();
        assert_eq!(world.doors.len(), 1);
        assert_eq!(world.doors[0].direction, Vector::new(0.0, 1.0));
        let ray = Ray::new(Vector::new(1.5, 2.5), Vector::new(1.0, 0.0));
        assert_eq!(world.hit_test(ray), Vector::new(2.5, 2.5));
        assert_eq!(world.map().hit_test(ray), Vector::new(4.0, 2.5));
    }

    #[test]
    fn walls_beside_a_door_show_the_jamb() {
        let world = door_world();
        let direction = Vector::new(0.0, -1.0);
        let face = world.wall_face(Vector::new(2.5, 2.0), direction);
        assert_eq!(face.texture, Texture::DoorJamb2);
        assert_eq!(face.tile, (2, 1));
        assert!((face.u - 0.5).abs() < 1e-12);

        let plain = world.wall_face(Vector::new(1.0, 2.5), Vector::new(-1.0, 0.0));
        assert_eq!(plain.texture, Texture::Wall);
        assert_eq!(plain.tile, (0, 2));
    }

    #[test]
    fn pushwall_tile_is_carved_and_restored_on_reset() {
        let mut world = world(&[
            "#####", //
            "#P.W#",
            "#####",
        ]);
        assert_eq!(world.map().tile(3, 1), Some(Tile::Floor));
        assert_eq!(world.pushwalls.len(), 1);
        assert_eq!(world.pushwalls[0].tile, Tile::Wall);

        let ray = Ray::new(world.player.position, Vector::new(1.0, 0.0));
        assert_eq!(world.hit_test(ray), Vector::new(3.0, 1.5));

        world.pushwalls[0].position = Vector::new(2.5, 1.5);
        world.reset();
        assert_eq!(world.pushwalls[0].position, Vector::new(3.5, 1.5));
        assert_eq!(world.map().tile(3, 1), Some(Tile::Floor));
    }

    #[test]
    fn picks_nearest_living_monster() {
        let mut world = world(&[
            "#######", //
            "#P.M.M#",
            "#######",
        ]);
        let ray = Ray::new(world.player.position, Vector::new(1.0, 0.0));
        assert_eq!(world.pick_monster(ray), Some(0));
        world.hurt_monster(0, 1000.0);
        assert_eq!(world.pick_monster(ray), Some(1));
        let away = Ray::new(world.player.position, Vector::new(-1.0, 0.0));
        assert_eq!(world.pick_monster(away), None);
    }

    #[test]
    fn hurting_the_player_queues_a_flash() {
        let mut world = world(&["###", "#P#", "###"]);
        world.hurt_player(10.0);
        assert_eq!(world.player.health, 90.0);
        assert_eq!(world.effects().len(), 1);
        assert_eq!(world.effects()[0].kind, EffectKind::FadeIn);

        world.hurt_player(500.0);
        assert!(world.player.is_dead());
        assert_eq!(world.effects().last().map(|e| e.kind), Some(EffectKind::FizzleOut));

        let before = world.effects().len();
        world.hurt_player(10.0);
        assert_eq!(world.effects().len(), before);
    }

    #[test]
    fn end_level_is_idempotent() {
        let mut world = world(&["###", "#P#", "###"]);
        world.end_level();
        world.end_level();
        assert!(world.is_level_ended());
        assert_eq!(world.effects().len(), 1);
        assert_eq!(world.effects()[0].kind, EffectKind::FadeOut);
    }

    #[test]
    fn player_walks_forward() {
        let mut world = world(&[
            "######", //
            "#P...#",
            "######",
        ]);
        let input = Input::new(1.0, Default::default(), false);
        for _ in 0..60 {
            world.update(1.0 / 120.0, &input);
        }
        assert!((world.player.position.x - 2.5).abs() < 1e-9);
        assert!((world.time() - 0.5).abs() < 1e-9);
    }
}
