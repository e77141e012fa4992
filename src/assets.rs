//! Asset table supplied by the host
//!
//! The core never touches pixels. The host registers opaque image handles and
//! animation sequences under string keys (`"player/run"`, `"particle/leaf"`,
//! `"grass"`, ...) and the simulation indexes this table.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::sim::animation::AnimationSequence;

/// Opaque handle to an image owned by the rendering collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ImageId(pub u32);

/// A single asset table entry
#[derive(Debug, Clone)]
pub enum Asset {
    Image(ImageId),
    Images(Vec<ImageId>),
    Animation(Arc<AnimationSequence>),
}

impl Asset {
    fn kind_name(&self) -> &'static str {
        match self {
            Asset::Image(_) => "image",
            Asset::Images(_) => "image list",
            Asset::Animation(_) => "animation",
        }
    }
}

/// Error type for asset lookups
#[derive(Debug, Clone, PartialEq)]
pub enum AssetError {
    /// No asset registered under this key
    MissingKey(String),
    /// Key exists but holds a different kind of asset
    WrongKind {
        key: String,
        expected: &'static str,
        found: &'static str,
    },
    /// Animation with no frames or a zero frame duration
    EmptyAnimation(String),
}

impl fmt::Display for AssetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetError::MissingKey(key) => write!(f, "missing asset: {}", key),
            AssetError::WrongKind {
                key,
                expected,
                found,
            } => write!(f, "asset {} is a {}, expected {}", key, found, expected),
            AssetError::EmptyAnimation(key) => write!(f, "animation {} has no frames", key),
        }
    }
}

impl std::error::Error for AssetError {}

/// String-keyed asset registry
#[derive(Debug, Clone, Default)]
pub struct AssetTable {
    entries: HashMap<String, Asset>,
}

impl AssetTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_image(&mut self, key: impl Into<String>, image: ImageId) {
        self.entries.insert(key.into(), Asset::Image(image));
    }

    pub fn insert_images(&mut self, key: impl Into<String>, images: Vec<ImageId>) {
        self.entries.insert(key.into(), Asset::Images(images));
    }

    /// Register an animation template. Rejects empty sequences up front so
    /// frame arithmetic never divides by zero.
    pub fn insert_animation(
        &mut self,
        key: impl Into<String>,
        frames: Vec<ImageId>,
        img_duration: u32,
        looping: bool,
    ) -> Result<(), AssetError> {
        let key = key.into();
        let sequence = AnimationSequence::new(frames, img_duration, looping)
            .ok_or_else(|| AssetError::EmptyAnimation(key.clone()))?;
        self.entries.insert(key, Asset::Animation(Arc::new(sequence)));
        Ok(())
    }

    pub fn get(&self, key: &str) -> Result<&Asset, AssetError> {
        self.entries
            .get(key)
            .ok_or_else(|| AssetError::MissingKey(key.to_string()))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn image(&self, key: &str) -> Result<ImageId, AssetError> {
        match self.get(key)? {
            Asset::Image(id) => Ok(*id),
            other => Err(wrong_kind(key, "image", other)),
        }
    }

    pub fn images(&self, key: &str) -> Result<&[ImageId], AssetError> {
        match self.get(key)? {
            Asset::Images(ids) => Ok(ids),
            other => Err(wrong_kind(key, "image list", other)),
        }
    }

    /// Shared animation template; callers instantiate their own cursor from it
    pub fn animation(&self, key: &str) -> Result<Arc<AnimationSequence>, AssetError> {
        match self.get(key)? {
            Asset::Animation(seq) => Ok(Arc::clone(seq)),
            other => Err(wrong_kind(key, "animation", other)),
        }
    }

    /// Tile image for a `(type, variant)` pair, if registered
    pub fn tile_image(&self, kind: &str, variant: u32) -> Option<ImageId> {
        match self.entries.get(kind)? {
            Asset::Images(ids) => ids.get(variant as usize).copied(),
            Asset::Image(id) if variant == 0 => Some(*id),
            _ => None,
        }
    }

    /// Table with every key a session needs, backed by sequential image ids.
    /// Used by headless hosts that have no art loaded.
    pub fn placeholder() -> Result<Self, AssetError> {
        let mut next = 0u32;
        let mut ids = |n: u32| {
            let frames: Vec<ImageId> = (next..next + n).map(ImageId).collect();
            next += n;
            frames
        };

        let mut assets = Self::new();
        for (action, frames, duration) in [
            ("idle", 4, 6),
            ("run", 8, 4),
            ("jump", 1, 5),
            ("wall_slide", 1, 4),
            ("attack", 4, 1),
            ("attack2", 4, 1),
            ("attack3", 4, 1),
            ("hit", 1, 5),
        ] {
            assets.insert_animation(format!("player/{action}"), ids(frames), duration, true)?;
        }
        assets.insert_animation("enemy/idle", ids(4), 6, true)?;
        assets.insert_animation("enemy/run", ids(8), 4, true)?;
        assets.insert_animation("particle/leaf", ids(18), 20, false)?;
        assets.insert_animation("particle/drop", ids(4), 5, true)?;
        assets.insert_animation("particle/particle", ids(4), 6, false)?;

        for key in ["weapon1", "fireball", "background", "background2", "background3"] {
            assets.insert_image(key, ids(1)[0]);
        }
        assets.insert_images("clouds", ids(2));
        assets.insert_images("grass", ids(9));
        assets.insert_images("stone", ids(9));
        assets.insert_images("large_decor", ids(25));
        assets.insert_images("spawners", ids(2));
        Ok(assets)
    }
}

fn wrong_kind(key: &str, expected: &'static str, found: &Asset) -> AssetError {
    AssetError::WrongKind {
        key: key.to_string(),
        expected,
        found: found.kind_name(),
    }
}
