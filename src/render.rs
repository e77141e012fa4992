//! Drawing interface
//!
//! Components expose `render(surface, offset)`; the host implements
//! `Surface` over whatever actually composites pixels.

use glam::{IVec2, Vec2};

use crate::assets::ImageId;

pub trait Surface {
    /// Drawable area in pixels
    fn size(&self) -> IVec2;
    /// Pixel size of an image handle
    fn image_size(&self, image: ImageId) -> IVec2;
    /// Draw `image` with its top-left corner at `pos`, optionally mirrored
    fn blit(&mut self, image: ImageId, pos: Vec2, flip_x: bool);
}

/// A single recorded draw call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Blit {
    pub image: ImageId,
    pub pos: Vec2,
    pub flip_x: bool,
}

/// Surface that records draw calls instead of drawing (headless runs, tests)
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    pub size: IVec2,
    /// Size reported for every image
    pub image_size: IVec2,
    pub blits: Vec<Blit>,
}

impl RecordingSurface {
    pub fn new(size: IVec2, image_size: IVec2) -> Self {
        Self {
            size,
            image_size,
            blits: Vec::new(),
        }
    }

    pub fn clear(&mut self) {
        self.blits.clear();
    }

    pub fn count(&self, image: ImageId) -> usize {
        self.blits.iter().filter(|b| b.image == image).count()
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> IVec2 {
        self.size
    }

    fn image_size(&self, _image: ImageId) -> IVec2 {
        self.image_size
    }

    fn blit(&mut self, image: ImageId, pos: Vec2, flip_x: bool) {
        self.blits.push(Blit { image, pos, flip_x });
    }
}
