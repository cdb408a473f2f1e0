use crate::actor::Actor;
use crate::animation::Animation;
use crate::input::Input;
use crate::math::{Ray, Vector};
use crate::texture::Texture;
use crate::world::{World, WorldEvent};

pub const PLAYER_SPEED: f64 = 2.0;
pub const PLAYER_TURNING_SPEED: f64 = std::f64::consts::PI;
pub const PLAYER_RADIUS: f64 = 0.25;
pub const PLAYER_HEALTH: f64 = 100.0;
pub const PLAYER_ATTACK_COOLDOWN: f64 = 0.4;
pub const PLAYER_SHOT_DAMAGE: f64 = 10.0;

pub const PISTOL_IDLE: Animation = Animation::new(&[Texture::Pistol], 0.0);
pub const PISTOL_FIRE: Animation = Animation::new(
    &[
        Texture::PistolFire1,
        Texture::PistolFire2,
        Texture::PistolFire3,
        Texture::PistolFire4,
        Texture::Pistol,
    ],
    0.5,
);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerState {
    Idle,
    Firing,
}

#[derive(Debug, Clone)]
pub struct Player {
    pub position: Vector,
    pub velocity: Vector,
    pub direction: Vector,
    pub health: f64,
    pub state: PlayerState,
    pub animation: Animation,
}

impl Player {
    pub fn new(position: Vector) -> Self {
        Self {
            position,
            velocity: Vector::ZERO,
            direction: Vector::new(1.0, 0.0),
            health: PLAYER_HEALTH,
            state: PlayerState::Idle,
            animation: PISTOL_IDLE,
        }
    }

    /// Applies `input` to heading and velocity and runs the weapon state
    /// machine. A shot that lands is returned as an event for the world.
    pub fn update(&mut self, input: &Input, world: &World) -> Option<WorldEvent> {
        self.direction = self.direction.rotated(input.rotation).normalized();
        self.velocity = self.direction * input.speed.clamp(-1.0, 1.0) * PLAYER_SPEED;

        match self.state {
            PlayerState::Idle => {
                if input.is_firing {
                    self.state = PlayerState::Firing;
                    self.animation = PISTOL_FIRE;
                    let ray = Ray::new(self.position, self.direction);
                    return world.pick_monster(ray).map(|index| WorldEvent::HurtMonster {
                        index,
                        damage: PLAYER_SHOT_DAMAGE,
                    });
                }
            }
            PlayerState::Firing => {
                if self.animation.time >= PLAYER_ATTACK_COOLDOWN {
                    self.state = PlayerState::Idle;
                    self.animation = PISTOL_IDLE;
                }
            }
        }
        None
    }
}

impl Actor for Player {
    fn radius(&self) -> f64 {
        PLAYER_RADIUS
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Rotation;
    use crate::tilemap::Tilemap;

    fn world() -> World {
        World::new(Tilemap::from_rows(&["######", "#P.M.#", "######"], 0).unwrap()).unwrap()
    }

    #[test]
    fn turning_rotates_heading_without_moving() {
        let world = world();
        let mut player = world.player.clone();
        let input = Input::new(0.0, Rotation::from_radians(std::f64::consts::FRAC_PI_2), false);
        assert_eq!(player.update(&input, &world), None);
        assert!((player.direction - Vector::new(0.0, 1.0)).length() < 1e-12);
        assert_eq!(player.velocity, Vector::ZERO);
    }

    #[test]
    fn shot_hits_monster_ahead_once_per_cooldown() {
        let world = world();
        let mut player = world.player.clone();
        let fire = Input::new(0.0, Rotation::IDENTITY, true);

        let event = player.update(&fire, &world);
        assert_eq!(
            event,
            Some(WorldEvent::HurtMonster {
                index: 0,
                damage: PLAYER_SHOT_DAMAGE
            })
        );
        assert_eq!(player.state, PlayerState::Firing);
        assert_eq!(player.update(&fire, &world), None);

        player.animation.advance(PLAYER_ATTACK_COOLDOWN);
        assert_eq!(player.update(&fire, &world), None);
        assert_eq!(player.state, PlayerState::Idle);
        assert!(player.update(&fire, &world).is_some());
    }
}
