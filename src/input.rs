use crate::math::Rotation;

/// Player intent for a single simulation step.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Input {
    /// Forward (positive) or backward intent in `[-1, 1]`.
    pub speed: f64,
    /// Turn to apply this step.
    pub rotation: Rotation,
    pub is_firing: bool,
}

impl Input {
    pub fn new(speed: f64, rotation: Rotation, is_firing: bool) -> Self {
        Self {
            speed: speed.clamp(-1.0, 1.0),
            rotation,
            is_firing,
        }
    }
}
