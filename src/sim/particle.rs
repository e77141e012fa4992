//! Short-lived visual effect entities
//!
//! Particles never affect gameplay. Ambient leaves and drops sway sideways as
//! they fall; looping particles are retired by age since their animation
//! never finishes.

use std::collections::VecDeque;

use glam::{IVec2, Vec2};

use super::animation::Animation;
use super::sprites::{ParticleAnimations, ParticleKind};
use crate::render::Surface;

#[derive(Debug, Clone)]
pub struct Particle {
    pub kind: ParticleKind,
    /// Center position in world pixels
    pub pos: Vec2,
    pub velocity: Vec2,
    pub animation: Animation,
    /// Ticks alive
    pub age: u32,
}

impl Particle {
    /// `frame` seeds the animation cursor so a burst doesn't animate in lockstep
    pub fn new(
        kind: ParticleKind,
        pos: Vec2,
        velocity: Vec2,
        frame: u32,
        animations: &ParticleAnimations,
    ) -> Self {
        let mut animation = animations.get(kind).instance();
        animation.frame = frame;
        Self {
            kind,
            pos,
            velocity,
            animation,
            age: 0,
        }
    }

    /// Advance one tick. Returns true when the particle should be removed.
    ///
    /// The kill decision is taken before moving, so a finished particle is
    /// still advanced (and drawn) on the tick it is reported.
    pub fn update(&mut self) -> bool {
        let kill = self.animation.done();

        self.pos += self.velocity;
        self.animation.update();
        self.age += 1;

        if self.kind.drifts() {
            self.pos.x += (self.animation.frame as f32 * 0.1).sin() * 0.3;
        }

        kill
    }

    pub fn render(&self, surface: &mut dyn Surface, offset: IVec2) {
        let image = self.animation.img();
        let half = surface.image_size(image) / 2;
        let pos = self.pos - offset.as_vec2() - half.as_vec2();
        surface.blit(image, pos, false);
    }
}

/// Bounded particle list; the oldest particle is dropped when full
#[derive(Debug, Clone)]
pub struct Particles {
    list: VecDeque<Particle>,
    max: usize,
    looping_lifetime: u32,
}

impl Particles {
    pub fn new(max: usize, looping_lifetime: u32) -> Self {
        Self {
            list: VecDeque::new(),
            max,
            looping_lifetime,
        }
    }

    pub fn push(&mut self, particle: Particle) {
        if self.max == 0 {
            return;
        }
        while self.list.len() >= self.max {
            self.list.pop_front();
        }
        self.list.push_back(particle);
    }

    pub fn spawn(
        &mut self,
        kind: ParticleKind,
        pos: Vec2,
        velocity: Vec2,
        frame: u32,
        animations: &ParticleAnimations,
    ) {
        self.push(Particle::new(kind, pos, velocity, frame, animations));
    }

    /// Advance every particle and drop finished or expired ones
    pub fn update(&mut self) {
        let lifetime = self.looping_lifetime;
        self.list.retain_mut(|particle| {
            let kill = particle.update();
            let expired = particle.animation.sequence().looping() && particle.age > lifetime;
            !(kill || expired)
        });
    }

    pub fn clear(&mut self) {
        self.list.clear();
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.list.iter()
    }

    pub fn render(&self, surface: &mut dyn Surface, offset: IVec2) {
        for particle in &self.list {
            particle.render(surface, offset);
        }
    }
}
