//! Monster behaviour: see the player, close in, scratch.

use crate::actor::Actor;
use crate::animation::Animation;
use crate::billboard::Billboard;
use crate::math::{Ray, Vector};
use crate::texture::Texture;
use crate::world::{World, WorldEvent};

pub const MONSTER_RADIUS: f64 = 0.4375;
pub const MONSTER_SPEED: f64 = 0.5;
pub const MONSTER_HEALTH: f64 = 50.0;
pub const MONSTER_ATTACK_COOLDOWN: f64 = 0.4;
pub const MONSTER_REACH: f64 = 0.25;
pub const MONSTER_DAMAGE: f64 = 10.0;

pub const MONSTER_IDLE: Animation = Animation::new(&[Texture::Monster], 0.0);
pub const MONSTER_WALK: Animation = Animation::new(
    &[
        Texture::MonsterWalk1,
        Texture::Monster,
        Texture::MonsterWalk2,
        Texture::Monster,
    ],
    0.5,
);
pub const MONSTER_SCRATCH: Animation = Animation::new(
    &[
        Texture::MonsterScratch1,
        Texture::MonsterScratch2,
        Texture::MonsterScratch3,
        Texture::MonsterScratch4,
        Texture::MonsterScratch5,
        Texture::MonsterScratch6,
        Texture::MonsterScratch7,
        Texture::MonsterScratch8,
    ],
    0.8,
);
pub const MONSTER_HURT: Animation = Animation::new(&[Texture::MonsterHurt], 0.2);
pub const MONSTER_DEATH: Animation = Animation::new(
    &[
        Texture::MonsterHurt,
        Texture::MonsterDeath1,
        Texture::MonsterDeath2,
    ],
    0.5,
);
pub const MONSTER_DEAD: Animation = Animation::new(&[Texture::MonsterDead], 0.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonsterState {
    Idle,
    Chasing,
    Scratching,
    Hurt,
    Dead,
}

#[derive(Debug, Clone)]
pub struct Monster {
    pub position: Vector,
    pub velocity: Vector,
    pub health: f64,
    pub state: MonsterState,
    pub animation: Animation,
    last_attack_time: f64,
}

impl Monster {
    pub fn new(position: Vector) -> Self {
        Self {
            position,
            velocity: Vector::ZERO,
            health: MONSTER_HEALTH,
            state: MonsterState::Idle,
            animation: MONSTER_IDLE,
            last_attack_time: 0.0,
        }
    }

    /// Nothing solid between the monster and the player.
    pub fn can_see_player(&self, world: &World) -> bool {
        let offset = world.player.position - self.position;
        let player_distance = offset.length();
        if player_distance <= 0.0 {
            return true;
        }
        let ray = Ray::new(self.position, offset);
        let hit = world.hit_test(ray);
        (hit - self.position).length() > player_distance
    }

    pub fn can_reach_player(&self, world: &World) -> bool {
        let player_distance = (world.player.position - self.position).length();
        player_distance - MONSTER_RADIUS - world.player.radius() < MONSTER_REACH
    }

    fn enter(&mut self, state: MonsterState, animation: Animation) {
        tracing::debug!(from = ?self.state, to = ?state, "monster state");
        self.state = state;
        self.animation = animation;
    }

    pub fn update(&mut self, world: &World) -> Option<WorldEvent> {
        match self.state {
            MonsterState::Idle => {
                if self.can_see_player(world) {
                    self.enter(MonsterState::Chasing, MONSTER_WALK);
                }
                self.velocity = Vector::ZERO;
            }
            MonsterState::Chasing => {
                if !self.can_see_player(world) {
                    self.enter(MonsterState::Idle, MONSTER_IDLE);
                    self.velocity = Vector::ZERO;
                    return None;
                }
                if self.can_reach_player(world) {
                    self.enter(MonsterState::Scratching, MONSTER_SCRATCH);
                    self.last_attack_time = -MONSTER_ATTACK_COOLDOWN;
                }
                let offset = world.player.position - self.position;
                self.velocity = offset.normalized() * MONSTER_SPEED;
            }
            MonsterState::Scratching => {
                if !self.can_reach_player(world) {
                    self.enter(MonsterState::Chasing, MONSTER_WALK);
                    return None;
                }
                if self.animation.time - self.last_attack_time >= MONSTER_ATTACK_COOLDOWN {
                    self.last_attack_time = self.animation.time;
                    return Some(WorldEvent::HurtPlayer(MONSTER_DAMAGE));
                }
            }
            MonsterState::Hurt => {
                if self.animation.is_completed() {
                    self.enter(MonsterState::Idle, MONSTER_IDLE);
                }
            }
            MonsterState::Dead => {
                if self.animation.is_completed() {
                    self.animation = MONSTER_DEAD;
                }
            }
        }
        None
    }

    /// Applies damage; the monster either flinches or dies.
    pub fn hurt(&mut self, damage: f64) {
        if self.is_dead() {
            return;
        }
        self.health -= damage;
        self.velocity = Vector::ZERO;
        if self.is_dead() {
            self.enter(MonsterState::Dead, MONSTER_DEATH);
        } else {
            self.enter(MonsterState::Hurt, MONSTER_HURT);
        }
    }

    /// Sprite face centred on the monster and lying along `plane`.
    pub fn billboard(&self, plane: Vector) -> Billboard {
        let plane = plane.normalized();
        Billboard::new(
            self.position - plane / 2.0,
            plane,
            1.0,
            self.animation.texture(),
        )
    }

    /// Where `ray` hits this monster, if it is alive.
    pub fn hit_test(&self, ray: Ray) -> Option<Vector> {
        if self.is_dead() {
            return None;
        }
        self.billboard(ray.direction.orthogonal()).hit_test(ray)
    }
}

impl Actor for Monster {
    fn radius(&self) -> f64 {
        MONSTER_RADIUS
    }

    fn position(&self) -> Vector {
        self.position
    }

    fn position_mut(&mut self) -> &mut Vector {
        &mut self.position
    }

    fn health(&self) -> f64 {
        self.health
    }
}
