use crate::actor::Actor;
use crate::animation::Animation;
use crate::math::{Rect, Vector};
use crate::texture::Texture;
use crate::world::{World, WorldEvent};

pub const SWITCH_OFF: Animation = Animation::new(&[Texture::Switch1], 0.0);
pub const SWITCH_FLIP: Animation = Animation::new(
    &[
        Texture::Switch1,
        Texture::Switch2,
        Texture::Switch3,
        Texture::Switch4,
    ],
    0.4,
);
pub const SWITCH_ON: Animation = Animation::new(&[Texture::Switch4], 0.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchState {
    Off,
    On,
}

/// A wall-mounted lever that ends the level once flipped.
#[derive(Debug, Clone)]
pub struct Switch {
    pub position: Vector,
    pub state: SwitchState,
    pub animation: Animation,
    latched: bool,
}

impl Switch {
    pub fn new(position: Vector) -> Self {
        Self {
            position,
            state: SwitchState::Off,
            animation: SWITCH_OFF,
            latched: false,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::centered(self.position, 0.5)
    }

    /// Tile the switch is mounted on.
    pub fn tile(&self) -> (isize, isize) {
        (self.position.x.floor() as isize, self.position.y.floor() as isize)
    }

    pub fn update(&mut self, world: &World) -> Option<WorldEvent> {
        match self.state {
            SwitchState::Off => {
                if world.player.rect().intersection(&self.rect()).is_some() {
                    tracing::debug!(position = ?self.position, "switch flipped");
                    self.state = SwitchState::On;
                    self.animation = SWITCH_FLIP;
                }
                None
            }
            SwitchState::On => {
                if self.latched || !self.animation.is_completed() {
                    return None;
                }
                self.latched = true;
                self.animation = SWITCH_ON;
                Some(WorldEvent::EndLevel)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tilemap::Tilemap;

    #[test]
    fn ends_the_level_once_after_flipping() {
        let mut world = World::new(Tilemap::from_rows(&["#####", "#P.S#", "#####"], 0).unwrap()).unwrap();
        let mut switch = world.switches[0].clone();
        assert_eq!(switch.tile(), (3, 1));
        assert_eq!(switch.update(&world), None);
        assert_eq!(switch.state, SwitchState::Off);

        world.player.position = Vector::new(2.75, 1.5);
        assert_eq!(switch.update(&world), None);
        assert_eq!(switch.state, SwitchState::On);
        assert_eq!(switch.update(&world), None);

        switch.animation.advance(0.4);
        assert_eq!(switch.update(&world), Some(WorldEvent::EndLevel));
        assert_eq!(switch.animation.texture(), Texture::Switch4);
        assert_eq!(switch.update(&world), None);
    }
}
