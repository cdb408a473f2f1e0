use crate::texture::Texture;

/// A looping sequence of frames. A zero duration pins the first frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Animation {
    frames: &'static [Texture],
    pub duration: f64,
    pub time: f64,
}

impl Animation {
    pub const fn new(frames: &'static [Texture], duration: f64) -> Self {
        Self {
            frames,
            duration,
            time: 0.0,
        }
    }

    pub fn texture(&self) -> Texture {
        if self.duration <= 0.0 || self.frames.len() == 1 {
            return self.frames[0];
        }
        let t = self.time.rem_euclid(self.duration) / self.duration;
        let index = (self.frames.len() as f64 * t) as usize;
        self.frames[index.min(self.frames.len() - 1)]
    }

    #[inline]
    pub fn is_completed(&self) -> bool {
        self.time >= self.duration
    }

    #[inline]
    pub fn advance(&mut self, time_step: f64) {
        self.time += time_step;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WALK: Animation = Animation::new(
        &[Texture::MonsterWalk1, Texture::Monster, Texture::MonsterWalk2, Texture::Monster],
        0.5,
    );

    #[test]
    fn picks_frame_by_elapsed_time() {
        let mut walk = WALK;
        assert_eq!(walk.texture(), Texture::MonsterWalk1);
        walk.advance(0.13);
        assert_eq!(walk.texture(), Texture::Monster);
        walk.advance(0.13);
        assert_eq!(walk.texture(), Texture::MonsterWalk2);
    }

    #[test]
    fn wraps_after_duration() {
        let mut walk = WALK;
        walk.advance(0.5 + 0.01);
        assert_eq!(walk.texture(), Texture::MonsterWalk1);
        assert!(walk.is_completed());
    }

    #[test]
    fn zero_duration_is_static() {
        let mut still = Animation::new(&[Texture::Pistol], 0.0);
        still.advance(3.0);
        assert_eq!(still.texture(), Texture::Pistol);
        assert!(still.is_completed());
    }
}
