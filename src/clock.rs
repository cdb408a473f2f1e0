//! Splits variable frame times into fixed physics sub-steps.

use crate::config::EngineConfig;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameClock {
    max_time_step: f64,
    world_time_step: f64,
}

/// `count` equal sub-steps of `step` seconds each.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubSteps {
    pub count: usize,
    pub step: f64,
}

impl FrameClock {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            max_time_step: config.max_time_step,
            world_time_step: config.world_time_step,
        }
    }

    /// Clamp `elapsed` (seconds) and divide it into sub-steps no longer than
    /// the world time step.
    pub fn sub_steps(&self, elapsed: f64) -> SubSteps {
        let elapsed = elapsed.clamp(0.0, self.max_time_step);
        if elapsed <= 0.0 || self.world_time_step <= 0.0 {
            return SubSteps { count: 0, step: 0.0 };
        }
        // Tolerance keeps an exact multiple from rounding up to an extra step.
        let count = (elapsed / self.world_time_step - 1e-9).ceil().max(1.0) as usize;
        SubSteps {
            count,
            step: elapsed / count as f64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_long_frames() {
        let clock = FrameClock::new(&EngineConfig::default());
        let steps = clock.sub_steps(1.0);
        assert_eq!(steps.count, 6);
        assert!((steps.step * steps.count as f64 - 0.05).abs() < 1e-12);
    }

    #[test]
    fn short_frames_take_one_step() {
        let clock = FrameClock::new(&EngineConfig::default());
        let steps = clock.sub_steps(0.001);
        assert_eq!(steps.count, 1);
        assert!((steps.step - 0.001).abs() < 1e-12);
    }

    #[test]
    fn no_time_no_steps() {
        let clock = FrameClock::new(&EngineConfig::default());
        assert_eq!(clock.sub_steps(0.0).count, 0);
        assert_eq!(clock.sub_steps(-1.0).count, 0);
    }
}
