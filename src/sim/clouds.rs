//! Parallax background clouds

use glam::{IVec2, Vec2};
use rand::Rng;
use rand::seq::IndexedRandom;
use rand_pcg::Pcg32;

use crate::assets::ImageId;
use crate::render::Surface;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cloud {
    pub pos: Vec2,
    pub image: ImageId,
    /// Drift per tick
    pub speed: f32,
    /// Parallax factor (0 = fixed to the screen, 1 = fixed to the world)
    pub depth: f32,
}

impl Cloud {
    pub fn update(&mut self) {
        self.pos.x += self.speed;
    }

    pub fn render(&self, surface: &mut dyn Surface, offset: IVec2) {
        let pos = self.pos - offset.as_vec2() * self.depth;
        let size = surface.size().as_vec2();
        let image = surface.image_size(self.image).as_vec2();
        let wrapped = Vec2::new(
            pos.x.rem_euclid(size.x + image.x) - image.x,
            pos.y.rem_euclid(size.y + image.y) - image.y,
        );
        surface.blit(self.image, wrapped, false);
    }
}

/// Cloud layer, drawn back to front
#[derive(Debug, Clone, Default)]
pub struct Clouds {
    clouds: Vec<Cloud>,
}

impl Clouds {
    pub fn new(images: &[ImageId], count: usize, rng: &mut Pcg32) -> Self {
        let mut clouds = Vec::with_capacity(count);
        for _ in 0..count {
            let Some(&image) = images.choose(rng) else {
                break;
            };
            clouds.push(Cloud {
                pos: Vec2::new(rng.random::<f32>() * 99999.0, rng.random::<f32>() * 99999.0),
                image,
                speed: rng.random::<f32>() * 0.05 + 0.05,
                depth: rng.random::<f32>() * 0.6 + 0.2,
            });
        }
        clouds.sort_by(|a, b| a.depth.total_cmp(&b.depth));
        Self { clouds }
    }

    pub fn update(&mut self) {
        for cloud in &mut self.clouds {
            cloud.update();
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Cloud> {
        self.clouds.iter()
    }

    pub fn len(&self) -> usize {
        self.clouds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clouds.is_empty()
    }

    pub fn render(&self, surface: &mut dyn Surface, offset: IVec2) {
        for cloud in &self.clouds {
            cloud.render(surface, offset);
        }
    }
}
