use crate::effect::DEFAULT_FIZZLE_SEED;

/// Tuning for fog-of-war memory.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisionConfig {
    /// Rays in the vision fan (coarser than the render fan).
    pub rays: usize,
    /// Seconds over which a remembered tile fades.
    pub duration: f64,
    /// Seconds a tile stays fully revealed after it was last seen.
    pub delay: f64,
    /// Fraction of `duration` the fade is capped at; never fully opaque.
    pub completion: f64,
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            rays: 10,
            duration: 5.0,
            delay: 2.0,
            completion: 0.7,
        }
    }
}

/// Engine-wide settings for a run.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Longest wall-clock step simulated in one frame (seconds).
    pub max_time_step: f64,
    /// Target length of one physics sub-step (seconds).
    pub world_time_step: f64,
    /// Seed for the fizzle dissolve permutation.
    pub fizzle_seed: u64,
    pub vision: VisionConfig,
    /// Height of the internal framebuffer; width follows the window aspect.
    pub internal_height: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_time_step: 1.0 / 20.0,
            world_time_step: 1.0 / 120.0,
            fizzle_seed: DEFAULT_FIZZLE_SEED,
            vision: VisionConfig::default(),
            internal_height: 480,
        }
    }
}

impl EngineConfig {
    pub fn with_max_time_step(mut self, seconds: f64) -> Self {
        self.max_time_step = seconds;
        self
    }

    pub fn with_world_time_step(mut self, seconds: f64) -> Self {
        self.world_time_step = seconds;
        self
    }

    pub fn with_fizzle_seed(mut self, seed: u64) -> Self {
        self.fizzle_seed = seed;
        self
    }

    pub fn with_vision(mut self, vision: VisionConfig) -> Self {
        self.vision = vision;
        self
    }

    pub fn with_internal_height(mut self, height: usize) -> Self {
        self.internal_height = height;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = EngineConfig::default();
        assert!((config.max_time_step - 0.05).abs() < f64::EPSILON);
        assert!((config.world_time_step - 1.0 / 120.0).abs() < f64::EPSILON);
        assert_eq!(config.vision.rays, 10);
        assert_eq!(config.internal_height, 480);
    }

    #[test]
    fn builder_chain() {
        let config = EngineConfig::default()
            .with_fizzle_seed(9)
            .with_max_time_step(0.1)
            .with_vision(VisionConfig {
                rays: 4,
                ..VisionConfig::default()
            });
        assert_eq!(config.fizzle_seed, 9);
        assert_eq!(config.vision.rays, 4);
        assert!((config.max_time_step - 0.1).abs() < f64::EPSILON);
    }
}
