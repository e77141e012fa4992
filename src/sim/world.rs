//! Services an entity update may touch
//!
//! Entities never reach into the session. Each update borrows exactly what it
//! needs through `World`: the level geometry, animation templates, effect and
//! projectile sinks, the sound sink and the session RNG.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::particle::Particles;
use super::projectile::Fireball;
use super::sprites::{ParticleKind, SpriteBank};
use super::tilemap::Tilemap;
use crate::audio::{AudioSink, SoundEffect};

pub struct World<'a> {
    pub tilemap: &'a Tilemap,
    pub sprites: &'a SpriteBank,
    pub particles: &'a mut Particles,
    pub fireballs: &'a mut Vec<Fireball>,
    pub audio: &'a mut dyn AudioSink,
    pub rng: &'a mut Pcg32,
}

impl World<'_> {
    pub fn play(&mut self, sfx: SoundEffect) {
        self.audio.play(sfx);
    }

    pub fn spawn_particle(&mut self, kind: ParticleKind, pos: Vec2, velocity: Vec2, frame: u32) {
        self.particles
            .spawn(kind, pos, velocity, frame, &self.sprites.particles);
    }

    /// `count` spark particles from `center`; `velocity` maps a uniform
    /// sample pair `(a, b)` in `[0, 1)` to a particle velocity
    pub fn spark_burst(
        &mut self,
        center: Vec2,
        count: usize,
        max_frame: u32,
        velocity: impl Fn(f32, f32) -> Vec2,
    ) {
        for _ in 0..count {
            let a: f32 = self.rng.random();
            let b: f32 = self.rng.random();
            let frame = self.rng.random_range(0..=max_frame);
            self.spawn_particle(ParticleKind::Spark, center, velocity(a, b), frame);
        }
    }
}

/// Unit vector at `angle` radians scaled by `speed`
#[inline]
pub fn polar(angle: f32, speed: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin()) * speed
}

#[cfg(test)]
pub(crate) mod test_support {
    use rand::SeedableRng;

    use super::*;
    use crate::sim::sprites::test_support::sprites;

    /// Owned backing storage for a `World` in unit tests
    pub struct Harness {
        pub tilemap: Tilemap,
        pub sprites: SpriteBank,
        pub particles: Particles,
        pub fireballs: Vec<Fireball>,
        pub audio: Vec<SoundEffect>,
        pub rng: Pcg32,
    }

    impl Harness {
        pub fn new(tilemap: Tilemap) -> Self {
            Self {
                tilemap,
                sprites: sprites(),
                particles: Particles::new(1000, 240),
                fireballs: Vec::new(),
                audio: Vec::new(),
                rng: Pcg32::seed_from_u64(7),
            }
        }

        pub fn world(&mut self) -> World<'_> {
            World {
                tilemap: &self.tilemap,
                sprites: &self.sprites,
                particles: &mut self.particles,
                fireballs: &mut self.fireballs,
                audio: &mut self.audio,
                rng: &mut self.rng,
            }
        }
    }
}
