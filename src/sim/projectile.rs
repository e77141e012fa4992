//! Enemy fireballs
//!
//! A fireball flies horizontally at constant speed until it enters a solid
//! tile or outlives `FIREBALL_MAX_AGE`. Player hits are resolved by the
//! session, which owns lives and the death counter.

use glam::{IVec2, Vec2};

use super::rect::Rect;
use super::tilemap::Tilemap;
use crate::assets::ImageId;
use crate::consts::FIREBALL_MAX_AGE;
use crate::render::Surface;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fireball {
    /// Leading point in world pixels
    pub pos: Vec2,
    /// Horizontal pixels per tick (sign = direction)
    pub speed: f32,
    /// Ticks alive
    pub age: u32,
}

impl Fireball {
    pub fn new(pos: Vec2, speed: f32) -> Self {
        Self { pos, speed, age: 0 }
    }

    /// Move one tick. Returns false once the fireball is spent.
    pub fn advance(&mut self, tilemap: &Tilemap) -> bool {
        self.pos.x += self.speed;
        self.age += 1;

        if tilemap.solid_check(self.pos).is_some() {
            return false;
        }
        self.age <= FIREBALL_MAX_AGE
    }

    pub fn hits(&self, target: &Rect) -> bool {
        target.collide_point(self.pos)
    }

    pub fn render(&self, surface: &mut dyn Surface, offset: IVec2, image: ImageId) {
        let half = surface.image_size(image).as_vec2() / 2.0;
        surface.blit(image, self.pos - half - offset.as_vec2(), false);
    }
}
