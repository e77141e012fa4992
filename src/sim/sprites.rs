//! Animation lookups resolved once per session
//!
//! Every action an entity kind can enter is looked up in the asset table when
//! the session starts, so a missing key fails there instead of mid-frame.
//! Asking a set for an action it never loaded is a bug and panics.

use std::sync::Arc;

use super::animation::AnimationSequence;
use crate::assets::{AssetError, AssetTable};

/// Entity animation state (`"<entity>/<action>"` asset keys)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Action {
    #[default]
    Idle,
    Run,
    Jump,
    WallSlide,
    Attack,
    Attack2,
    Attack3,
    Hit,
}

impl Action {
    pub const COUNT: usize = 8;

    pub const PLAYER: [Action; 8] = [
        Action::Idle,
        Action::Run,
        Action::Jump,
        Action::WallSlide,
        Action::Attack,
        Action::Attack2,
        Action::Attack3,
        Action::Hit,
    ];

    pub const ENEMY: [Action; 2] = [Action::Idle, Action::Run];

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Idle => "idle",
            Action::Run => "run",
            Action::Jump => "jump",
            Action::WallSlide => "wall_slide",
            Action::Attack => "attack",
            Action::Attack2 => "attack2",
            Action::Attack3 => "attack3",
            Action::Hit => "hit",
        }
    }
}

/// Animations for one entity kind, indexed by action
#[derive(Debug, Clone)]
pub struct AnimationSet {
    entity: &'static str,
    sequences: [Option<Arc<AnimationSequence>>; Action::COUNT],
}

impl AnimationSet {
    /// Resolve `<entity>/<action>` for each action (idle is always required)
    pub fn load(
        assets: &AssetTable,
        entity: &'static str,
        actions: &[Action],
    ) -> Result<Self, AssetError> {
        let mut sequences: [Option<Arc<AnimationSequence>>; Action::COUNT] = Default::default();
        for &action in std::iter::once(&Action::Idle).chain(actions) {
            let key = format!("{}/{}", entity, action.as_str());
            sequences[action as usize] = Some(assets.animation(&key)?);
        }
        Ok(Self { entity, sequences })
    }

    pub fn entity(&self) -> &'static str {
        self.entity
    }

    pub fn contains(&self, action: Action) -> bool {
        self.sequences[action as usize].is_some()
    }

    /// Sequence for `action`.
    ///
    /// # Panics
    ///
    /// If `action` was not in the list this set was loaded with. Entity code
    /// only enters the actions its kind loads, so this is a logic error.
    pub fn get(&self, action: Action) -> &Arc<AnimationSequence> {
        match &self.sequences[action as usize] {
            Some(sequence) => sequence,
            None => panic!("{}/{} is not loaded for this entity", self.entity, action.as_str()),
        }
    }
}

/// Visual effect particle types (`"particle/<type>"` asset keys)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParticleKind {
    Leaf,
    Drop,
    /// Generic burst particle (dash trail, hits, deaths)
    Spark,
}

impl ParticleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParticleKind::Leaf => "leaf",
            ParticleKind::Drop => "drop",
            ParticleKind::Spark => "particle",
        }
    }

    /// Ambient particles drift sideways as they fall
    pub fn drifts(&self) -> bool {
        matches!(self, ParticleKind::Leaf | ParticleKind::Drop)
    }
}

#[derive(Debug, Clone)]
pub struct ParticleAnimations {
    leaf: Arc<AnimationSequence>,
    drop: Arc<AnimationSequence>,
    spark: Arc<AnimationSequence>,
}

impl ParticleAnimations {
    pub fn load(assets: &AssetTable) -> Result<Self, AssetError> {
        let load = |kind: ParticleKind| assets.animation(&format!("particle/{}", kind.as_str()));
        Ok(Self {
            leaf: load(ParticleKind::Leaf)?,
            drop: load(ParticleKind::Drop)?,
            spark: load(ParticleKind::Spark)?,
        })
    }

    pub fn get(&self, kind: ParticleKind) -> &Arc<AnimationSequence> {
        match kind {
            ParticleKind::Leaf => &self.leaf,
            ParticleKind::Drop => &self.drop,
            ParticleKind::Spark => &self.spark,
        }
    }
}

/// All animation templates the simulation needs
#[derive(Debug, Clone)]
pub struct SpriteBank {
    pub player: AnimationSet,
    pub enemy: AnimationSet,
    pub particles: ParticleAnimations,
}

impl SpriteBank {
    pub fn load(assets: &AssetTable) -> Result<Self, AssetError> {
        Ok(Self {
            player: AnimationSet::load(assets, "player", &Action::PLAYER)?,
            enemy: AnimationSet::load(assets, "enemy", &Action::ENEMY)?,
            particles: ParticleAnimations::load(assets)?,
        })
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::full_assets;
    use super::*;

    #[test]
    fn loads_every_action() {
        let bank = SpriteBank::load(&full_assets()).unwrap();
        for action in Action::PLAYER {
            assert!(bank.player.contains(action));
        }
        assert!(bank.enemy.contains(Action::Run));
        assert!(!bank.enemy.contains(Action::Attack));
        assert!(!bank.particles.get(ParticleKind::Leaf).looping());
    }

    #[test]
    fn missing_action_fails_at_load() {
        let assets = full_assets();
        let mut trimmed = AssetTable::new();
        // Rebuild without player/wall_slide
        for action in Action::PLAYER {
            if action != Action::WallSlide {
                let key = format!("player/{}", action.as_str());
                let seq = assets.animation(&key).unwrap();
                trimmed
                    .insert_animation(key, seq.frames().to_vec(), seq.img_duration(), seq.looping())
                    .unwrap();
            }
        }
        let err = AnimationSet::load(&trimmed, "player", &Action::PLAYER).unwrap_err();
        assert_eq!(err, AssetError::MissingKey("player/wall_slide".to_string()));
    }

    #[test]
    fn idle_loaded_even_when_unlisted() {
        let set = AnimationSet::load(&full_assets(), "enemy", &[Action::Run]).unwrap();
        assert!(set.contains(Action::Idle));
        assert_eq!(set.get(Action::Idle).frames()[0], crate::assets::ImageId(200));
    }

    #[test]
    #[should_panic(expected = "enemy/hit is not loaded")]
    fn unloaded_action_panics() {
        let bank = SpriteBank::load(&full_assets()).unwrap();
        bank.enemy.get(Action::Hit);
    }

    #[test]
    fn every_entity_action_resolves() {
        let bank = SpriteBank::load(&full_assets()).unwrap();
        for action in Action::PLAYER {
            assert!(!bank.player.get(action).frames().is_empty());
        }
        for action in Action::ENEMY {
            assert!(!bank.enemy.get(action).frames().is_empty());
        }
    }
}
