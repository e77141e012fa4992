//! Session state and level lifecycle
//!
//! The session owns every entity collection of the running level and the
//! counters the HUD shows. `tick` drives it one fixed step at a time.

use std::fmt;

use glam::{IVec2, Vec2};
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::clouds::Clouds;
use super::enemy::Enemy;
use super::particle::Particles;
use super::player::{DeathCause, Player};
use super::projectile::Fireball;
use super::rect::Rect;
use super::sprites::{Action, SpriteBank};
use super::tilemap::Tilemap;
use crate::assets::{AssetError, AssetTable, ImageId};
use crate::consts::*;
use crate::level::{LevelError, LevelProvider};
use crate::render::Surface;
use crate::settings::SessionConfig;

/// Current phase of the run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Normal play
    Running,
    /// Player died; the level reloads when the respawn countdown runs out
    PlayerDead,
    /// Last level cleared
    RunComplete,
}

/// Notifications for the host, drained once per frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    LevelLoaded { level: usize, enemies: u32 },
    LevelCleared { level: usize },
    EnemyKilled { pos: Vec2 },
    /// A fireball hit; `lives` is what remains after it
    PlayerHit { lives: u32 },
    PlayerDied { cause: DeathCause },
    RunComplete,
}

/// Error type for session construction and level transitions
#[derive(Debug)]
pub enum SessionError {
    Level(LevelError),
    Asset(AssetError),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::Level(e) => write!(f, "level error: {}", e),
            SessionError::Asset(e) => write!(f, "asset error: {}", e),
        }
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SessionError::Level(e) => Some(e),
            SessionError::Asset(e) => Some(e),
        }
    }
}

impl From<LevelError> for SessionError {
    fn from(e: LevelError) -> Self {
        SessionError::Level(e)
    }
}

impl From<AssetError> for SessionError {
    fn from(e: AssetError) -> Self {
        SessionError::Asset(e)
    }
}

/// Counters shown by the HUD
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hud {
    pub enemies_killed: u32,
    pub total_enemies: u32,
    pub lives: u32,
    pub max_lives: u32,
    /// Zero-based level index
    pub level: usize,
}

impl Hud {
    pub fn lines(&self) -> [String; 3] {
        [
            format!("Kills: {}/{}", self.enemies_killed, self.total_enemies),
            format!("Lives: {}/{}", self.lives, self.max_lives),
            format!("LEVEL: {}", self.level + 1),
        ]
    }
}

/// Images drawn by the session itself (entities resolve theirs through animations)
#[derive(Debug, Clone)]
struct SessionImages {
    weapon: ImageId,
    fireball: ImageId,
    backgrounds: [ImageId; 3],
}

impl SessionImages {
    fn load(assets: &AssetTable) -> Result<Self, AssetError> {
        Ok(Self {
            weapon: assets.image("weapon1")?,
            fireball: assets.image("fireball")?,
            backgrounds: [
                assets.image("background")?,
                assets.image("background2")?,
                assets.image("background3")?,
            ],
        })
    }

    fn background(&self, level: usize) -> ImageId {
        self.backgrounds[level.min(self.backgrounds.len() - 1)]
    }
}

/// A running game
pub struct Session {
    pub(super) config: SessionConfig,
    levels: Box<dyn LevelProvider>,
    level_count: usize,
    assets: AssetTable,
    pub(super) sprites: SpriteBank,
    images: SessionImages,
    pub(super) rng: Pcg32,

    /// Current level index
    pub level: usize,
    pub tilemap: Tilemap,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub fireballs: Vec<Fireball>,
    pub particles: Particles,
    pub clouds: Clouds,
    pub leaf_spawners: Vec<Rect>,
    pub drop_spawners: Vec<Rect>,
    /// Lethal decoration cells, cached at level load
    pub hazards: Vec<Rect>,

    /// Camera offset (top-left of the view in world pixels)
    pub scroll: Vec2,
    /// Death countdown: 0 = alive, otherwise ticks since death + 1
    pub dead: u32,
    pub lives: u32,
    pub fireball_hits: u32,
    pub enemies_killed: u32,
    pub total_enemies: u32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub(super) complete: bool,
    pub(super) events: Vec<GameEvent>,
}

impl Session {
    /// Resolve assets, seed the RNG and load the starting level
    pub fn new(
        config: SessionConfig,
        levels: impl LevelProvider + 'static,
        assets: AssetTable,
    ) -> Result<Self, SessionError> {
        let sprites = SpriteBank::load(&assets)?;
        let images = SessionImages::load(&assets)?;
        let mut rng = Pcg32::seed_from_u64(config.seed);
        let clouds = Clouds::new(assets.images("clouds")?, config.cloud_count, &mut rng);

        let level_count = config.level_count.min(levels.level_count());
        if config.start_level >= level_count {
            return Err(LevelError::MissingLevel(config.start_level).into());
        }

        let player = Player::new(Vec2::from(PLAYER_DEFAULT_SPAWN), &sprites.player);
        let mut session = Self {
            levels: Box::new(levels),
            level_count,
            assets,
            sprites,
            images,
            rng,
            level: config.start_level,
            tilemap: Tilemap::new(16)?,
            player,
            enemies: Vec::new(),
            fireballs: Vec::new(),
            particles: Particles::new(config.max_particles, config.looping_particle_lifetime),
            clouds,
            leaf_spawners: Vec::new(),
            drop_spawners: Vec::new(),
            hazards: Vec::new(),
            scroll: Vec2::ZERO,
            dead: 0,
            lives: config.lives,
            fireball_hits: 0,
            enemies_killed: 0,
            total_enemies: 0,
            time_ticks: 0,
            complete: false,
            events: Vec::new(),
            config,
        };
        session.load_level(session.config.start_level)?;
        Ok(session)
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn assets(&self) -> &AssetTable {
        &self.assets
    }

    /// Levels in this run (config limit clamped to what the provider has)
    pub fn level_count(&self) -> usize {
        self.level_count
    }

    pub fn last_level(&self) -> usize {
        self.level_count - 1
    }

    pub fn phase(&self) -> GamePhase {
        if self.complete {
            GamePhase::RunComplete
        } else if self.dead > 0 {
            GamePhase::PlayerDead
        } else {
            GamePhase::Running
        }
    }

    pub fn is_dead(&self) -> bool {
        self.dead > 0
    }

    /// (Re)enter a level: rebuild the map, spawners, enemies and player
    pub fn load_level(&mut self, index: usize) -> Result<(), SessionError> {
        let data = self.levels.load(index)?;
        let mut tilemap = Tilemap::from_level(data)?;
        let tile_size = tilemap.tile_size();

        let (dx, dy, w, h) = SPAWNER_RECT;
        let spawner_rect = |pos: IVec2| Rect::new(pos.x + dx, pos.y + dy, w, h);
        self.leaf_spawners = tilemap
            .extract(&LEAF_SPAWNER_DECOR, true)
            .iter()
            .map(|tile| spawner_rect(tile.pos))
            .collect();
        self.drop_spawners = tilemap
            .extract(&DROP_SPAWNER_DECOR, true)
            .iter()
            .map(|tile| spawner_rect(tile.pos))
            .collect();
        self.hazards = tilemap
            .extract(&LETHAL_DECOR, true)
            .iter()
            .map(|tile| Rect::new(tile.pos.x, tile.pos.y, tile_size, tile_size))
            .collect();

        let mut spawn = Vec2::from(PLAYER_DEFAULT_SPAWN);
        self.enemies.clear();
        for marker in tilemap.extract(&SPAWNER_MARKERS, false) {
            if marker.variant == 0 {
                spawn = marker.pos.as_vec2();
            } else {
                self.enemies
                    .push(Enemy::new(marker.pos.as_vec2(), &self.sprites.enemy));
            }
        }

        self.tilemap = tilemap;
        self.player = Player::new(spawn, &self.sprites.player);
        self.level = index;
        self.total_enemies = self.enemies.len() as u32;
        self.enemies_killed = 0;
        self.fireballs.clear();
        self.particles.clear();
        self.scroll = Vec2::ZERO;
        self.dead = 0;

        log::info!(
            "Loaded level {} ({} enemies, {} hazards)",
            index,
            self.total_enemies,
            self.hazards.len()
        );
        self.events.push(GameEvent::LevelLoaded {
            level: index,
            enemies: self.total_enemies,
        });
        Ok(())
    }

    /// Start the respawn countdown; ignored while it is already running
    pub fn arm_death(&mut self, cause: DeathCause) {
        if self.dead > 0 {
            return;
        }
        self.dead = 1;
        self.lives = self.config.lives;
        self.fireball_hits = 0;
        log::debug!("Player died ({:?}) on level {}", cause, self.level);
        self.events.push(GameEvent::PlayerDied { cause });
    }

    /// Record one fireball hit. Returns true if it was fatal.
    pub(super) fn register_fireball_hit(&mut self) -> bool {
        self.fireball_hits += 1;
        self.lives = self.lives.saturating_sub(1);
        self.player.body.set_action(Action::Hit, &self.sprites.player);
        self.events.push(GameEvent::PlayerHit { lives: self.lives });
        self.fireball_hits >= FIREBALL_HITS_TO_DIE
    }

    /// Take all events recorded since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Camera offset truncated to whole pixels
    pub fn render_scroll(&self) -> IVec2 {
        IVec2::new(self.scroll.x as i32, self.scroll.y as i32)
    }

    pub fn hud(&self) -> Hud {
        Hud {
            enemies_killed: self.enemies_killed,
            total_enemies: self.total_enemies,
            lives: self.lives,
            max_lives: self.config.lives,
            level: self.level,
        }
    }

    /// Draw the whole scene back to front
    pub fn render(&self, surface: &mut dyn Surface) {
        let offset = self.render_scroll();

        surface.blit(self.images.background(self.level), Vec2::ZERO, false);
        self.clouds.render(surface, offset);
        self.tilemap.render(surface, offset, &self.assets);

        for enemy in &self.enemies {
            enemy.render(surface, offset, self.images.weapon);
        }
        if self.dead == 0 {
            self.player.render(surface, offset);
        }
        for fireball in &self.fireballs {
            fireball.render(surface, offset, self.images.fireball);
        }
        self.particles.render(surface, offset);
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("level", &self.level)
            .field("phase", &self.phase())
            .field("enemies", &self.enemies.len())
            .field("fireballs", &self.fireballs.len())
            .field("particles", &self.particles.len())
            .field("lives", &self.lives)
            .field("time_ticks", &self.time_ticks)
            .finish()
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::level::LevelSet;
    use crate::sim::sprites::test_support::full_assets;

    /// Player marker at grid (2, 6), one enemy at (400, 149), lethal spikes at
    /// column 30 row 9 and a leaf tree off-grid. No floor.
    pub const ARENA: &str = r#"{
        "tilemap": {
            "30;9": {"type": "large_decor", "variant": 2, "pos": [30, 9]},
            "2;6": {"type": "spawners", "variant": 0, "pos": [2, 6]}
        },
        "tile_size": 16,
        "offgrid": [
            {"type": "spawners", "variant": 1, "pos": [400, 149]},
            {"type": "large_decor", "variant": 1, "pos": [100, 100]}
        ]
    }"#;

    /// `ARENA` plus a solid floor, as a level JSON string
    pub fn arena_json() -> String {
        let mut level = crate::level::LevelData::from_json(ARENA).unwrap();
        for x in 0..40 {
            let tile = crate::sim::tilemap::Tile::new("grass", 0, IVec2::new(x, 10));
            level.tilemap.insert(crate::level::grid_key(tile.pos), tile);
        }
        level.to_json().unwrap()
    }

    pub fn session_with(levels: &[String], config: SessionConfig) -> Session {
        let set = LevelSet::from_json(levels).unwrap();
        Session::new(config, set, full_assets()).unwrap()
    }

    pub fn arena_session() -> Session {
        session_with(&[arena_json()], SessionConfig {
            level_count: 1,
            ..Default::default()
        })
    }
}
