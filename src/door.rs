use crate::actor::{Actor, circle_touches_rect};
use crate::billboard::Billboard;
use crate::math::{Ray, Rect, Vector, smoothstep};
use crate::texture::Texture;
use crate::world::World;

/// Seconds to slide fully open or closed.
pub const DOOR_DURATION: f64 = 0.5;
/// Seconds a door stays open before closing again.
pub const DOOR_CLOSE_DELAY: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoorState {
    Closed,
    Opening,
    Open,
    Closing,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Door {
    pub position: Vector,
    pub direction: Vector,
    pub texture: Texture,
    pub state: DoorState,
    pub time: f64,
}

impl Door {
    /// A vertical door spans its tile along y, a horizontal one along x.
    pub fn new(position: Vector, is_vertical: bool) -> Self {
        let (direction, texture) = if is_vertical {
            (Vector::new(0.0, 1.0), Texture::Door)
        } else {
            (Vector::new(1.0, 0.0), Texture::Door2)
        };
        Self {
            position,
            direction,
            texture,
            state: DoorState::Closed,
            time: 0.0,
        }
    }

    /// How far the door has slid into the wall, from 0 (closed) to 1.
    pub fn offset(&self) -> f64 {
        let t = (self.time / DOOR_DURATION).min(1.0);
        match self.state {
            DoorState::Closed => 0.0,
            DoorState::Opening => smoothstep(t),
            DoorState::Open => 1.0,
            DoorState::Closing => 1.0 - smoothstep(t),
        }
    }

    fn start(&self) -> Vector {
        self.position + self.direction * (self.offset() - 0.5)
    }

    pub fn billboard(&self) -> Billboard {
        Billboard::new(self.start(), self.direction, 1.0, self.texture)
    }

    /// The door leaf as a zero-thickness rectangle.
    pub fn rect(&self) -> Rect {
        let start = self.start();
        let end = start + self.direction;
        Rect::new(
            Vector::new(start.x.min(end.x), start.y.min(end.y)),
            Vector::new(start.x.max(end.x), start.y.max(end.y)),
        )
    }

    pub fn hit_test(&self, ray: Ray) -> Option<Vector> {
        self.billboard().hit_test(ray)
    }

    fn is_touched_by<A: Actor>(&self, actor: &A) -> bool {
        !actor.is_dead() && circle_touches_rect(actor.position(), actor.radius(), &self.rect())
    }

    /// Advances the open/close cycle. `time` must already include this
    /// step's elapsed time.
    pub fn update(&mut self, world: &World) {
        let next = match self.state {
            DoorState::Closed => {
                let touched = self.is_touched_by(&world.player)
                    || world.monsters.iter().any(|monster| self.is_touched_by(monster));
                touched.then_some(DoorState::Opening)
            }
            DoorState::Opening => (self.time >= DOOR_DURATION).then_some(DoorState::Open),
            DoorState::Open => (self.time >= DOOR_CLOSE_DELAY).then_some(DoorState::Closing),
            DoorState::Closing => (self.time >= DOOR_DURATION).then_some(DoorState::Closed),
        };
        if let Some(state) = next {
            tracing::debug!(position = ?self.position, ?state, "door");
            self.state = state;
            self.time = 0.0;
        }
    }
}
