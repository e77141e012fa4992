//! Frame-cycling sprite animation
//!
//! An `AnimationSequence` (frames, duration, loop flag) is shared between every
//! entity that uses it; each entity owns a small `Animation` cursor.

use std::sync::Arc;

use crate::assets::ImageId;

/// Immutable frame sequence shared through the asset table
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationSequence {
    frames: Vec<ImageId>,
    img_duration: u32,
    looping: bool,
}

impl AnimationSequence {
    /// Returns `None` for sequences with no frames or zero duration
    pub fn new(frames: Vec<ImageId>, img_duration: u32, looping: bool) -> Option<Self> {
        if frames.is_empty() || img_duration == 0 {
            return None;
        }
        Some(Self {
            frames,
            img_duration,
            looping,
        })
    }

    pub fn frames(&self) -> &[ImageId] {
        &self.frames
    }

    pub fn frame_count(&self) -> u32 {
        self.frames.len() as u32
    }

    /// Ticks each image is displayed
    pub fn img_duration(&self) -> u32 {
        self.img_duration
    }

    pub fn looping(&self) -> bool {
        self.looping
    }

    /// Total ticks in one pass of the sequence
    pub fn span(&self) -> u32 {
        self.img_duration * self.frame_count()
    }

    /// Fresh cursor at frame 0
    pub fn instance(self: &Arc<Self>) -> Animation {
        Animation {
            sequence: Arc::clone(self),
            frame: 0,
            done: false,
        }
    }
}

/// Per-instance animation cursor
#[derive(Debug, Clone)]
pub struct Animation {
    sequence: Arc<AnimationSequence>,
    /// Tick counter into the sequence
    pub frame: u32,
    done: bool,
}

impl Animation {
    /// New cursor on the same shared sequence with its own progress
    pub fn copy(&self) -> Animation {
        self.sequence.instance()
    }

    pub fn sequence(&self) -> &Arc<AnimationSequence> {
        &self.sequence
    }

    /// True once a non-looping animation has reached its last frame
    pub fn done(&self) -> bool {
        self.done
    }

    pub fn update(&mut self) {
        let span = self.sequence.span();
        if self.sequence.looping {
            self.frame = (self.frame + 1) % span;
        } else {
            self.frame = (self.frame + 1).min(span - 1);
            if self.frame >= span - 1 {
                self.done = true;
            }
        }
    }

    /// Index of the image currently displayed
    pub fn image_index(&self) -> usize {
        let index = (self.frame / self.sequence.img_duration) as usize;
        index.min(self.sequence.frames.len() - 1)
    }

    /// Image currently displayed
    pub fn img(&self) -> ImageId {
        self.sequence.frames[self.image_index()]
    }
}
