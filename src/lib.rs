//! Jumpy - A tile-based 2D platformer simulation core
//!
//! Core modules:
//! - `sim`: Deterministic frame simulation (physics, entities, session lifecycle)
//! - `assets`: Image handles and shared animation sequences supplied by the host
//! - `level`: Level data format and level providers
//! - `audio`: Fire-and-forget sound notifications
//! - `render`: Drawing interface implemented by the host
//! - `settings`: Session configuration

pub mod assets;
pub mod audio;
pub mod level;
pub mod render;
pub mod settings;
pub mod sim;

pub use assets::{Asset, AssetError, AssetTable, ImageId};
pub use audio::{AudioSink, NullAudio, SoundEffect};
pub use level::{LevelData, LevelError, LevelProvider, LevelSet};
pub use settings::SessionConfig;

/// Game configuration constants
pub mod consts {
    /// Nominal simulation rate (one tick per rendered frame)
    pub const TICKS_PER_SECOND: u32 = 60;

    /// Downward acceleration per tick
    pub const GRAVITY: f32 = 0.1;
    /// Terminal fall speed (pixels/tick)
    pub const TERMINAL_VELOCITY: f32 = 5.0;
    /// Sprite draw offset relative to the collision box
    pub const ANIM_OFFSET: (f32, f32) = (-3.0, -3.0);

    /// Tile types that participate in collision
    pub const SOLID_TILE_TYPES: [&str; 3] = ["grass", "stone", "sky"];

    /// Player collision box
    pub const PLAYER_SIZE: (i32, i32) = (8, 15);
    /// Fallback spawn when a level has no player marker
    pub const PLAYER_DEFAULT_SPAWN: (f32, f32) = (50.0, 50.0);
    /// Ticks airborne before the player counts as stuck/fallen
    pub const MAX_AIR_TIME: u32 = 160;
    /// Ticks after leaving the ground before jump/wall-slide animations kick in
    pub const COYOTE_TICKS: u32 = 4;
    pub const JUMP_VELOCITY: f32 = -3.0;
    pub const WALL_JUMP_VELOCITY: (f32, f32) = (3.5, -2.5);
    pub const WALL_SLIDE_MAX_FALL: f32 = 0.5;
    /// Horizontal friction per tick
    pub const FRICTION: f32 = 0.1;

    /// Dash counter start value (sign = direction)
    pub const DASH_DURATION: i32 = 70;
    /// While |dashing| is above this the dash burst drives velocity
    pub const DASH_BURST_THRESHOLD: i32 = 60;
    pub const DASH_SPEED: f32 = 8.0;
    /// Velocity damping on the last burst tick
    pub const DASH_STOP_DAMPING: f32 = 0.01;
    /// Minimum |dashing| at which the player kills enemies on contact
    pub const DASH_KILL_THRESHOLD: i32 = 20;
    /// Minimum |dashing| at which fireballs pass through the player
    pub const DASH_INVULNERABLE_THRESHOLD: i32 = 50;

    /// Enemy collision box
    pub const ENEMY_SIZE: (i32, i32) = (8, 11);
    pub const ENEMY_WALK_SPEED: f32 = 0.5;
    /// Per-tick chance for an idle enemy to start walking
    pub const ENEMY_WALK_CHANCE: f32 = 0.01;
    pub const ENEMY_WALK_MIN: u32 = 30;
    pub const ENEMY_WALK_MAX: u32 = 120;
    /// Ledge probe: horizontal distance from center and depth below `pos.y`
    pub const ENEMY_PROBE_AHEAD: i32 = 7;
    pub const ENEMY_PROBE_DEPTH: f32 = 23.0;
    /// Max vertical distance at which an enemy will fire at the player
    pub const ENEMY_SIGHT_HEIGHT: f32 = 16.0;
    /// Muzzle offset from the enemy center
    pub const ENEMY_MUZZLE_OFFSET: i32 = 7;

    pub const FIREBALL_SPEED: f32 = 3.0;
    /// Fireballs older than this are removed (6 s at 60 Hz)
    pub const FIREBALL_MAX_AGE: u32 = 360;
    /// Fireball hits that kill the player
    pub const FIREBALL_HITS_TO_DIE: u32 = 2;

    /// Area-ticks per ambient particle
    pub const SPAWNER_AREA_RATE: f32 = 19999.0;
    /// Ambient spawner rect relative to its decor tile: (dx, dy, w, h)
    pub const SPAWNER_RECT: (i32, i32, i32, i32) = (1, 4, 30, 10);

    /// Trees that shed leaves
    pub const LEAF_SPAWNER_DECOR: [(&str, u32); 9] = [
        ("large_decor", 1),
        ("large_decor", 8),
        ("large_decor", 9),
        ("large_decor", 10),
        ("large_decor", 11),
        ("large_decor", 12),
        ("large_decor", 18),
        ("large_decor", 19),
        ("large_decor", 20),
    ];
    /// Rocks that drip
    pub const DROP_SPAWNER_DECOR: [(&str, u32); 4] = [
        ("large_decor", 4),
        ("large_decor", 5),
        ("large_decor", 6),
        ("large_decor", 7),
    ];
    /// Decoration that kills the player on contact
    pub const LETHAL_DECOR: [(&str, u32); 10] = [
        ("large_decor", 2),
        ("large_decor", 3),
        ("large_decor", 4),
        ("large_decor", 5),
        ("large_decor", 6),
        ("large_decor", 7),
        ("large_decor", 21),
        ("large_decor", 22),
        ("large_decor", 23),
        ("large_decor", 24),
    ];
    /// Spawn markers: variant 0 is the player, anything else an enemy
    pub const SPAWNER_MARKERS: [(&str, u32); 2] = [("spawners", 0), ("spawners", 1)];
}

/// Move `value` toward zero by `step` without crossing it
#[inline]
pub fn approach_zero(value: f32, step: f32) -> f32 {
    if value > 0.0 {
        (value - step).max(0.0)
    } else {
        (value + step).min(0.0)
    }
}

/// Move an integer counter one step toward zero
#[inline]
pub fn step_toward_zero(value: i32) -> i32 {
    value - value.signum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn approach_zero_never_crosses() {
        assert_eq!(approach_zero(0.05, 0.1), 0.0);
        assert_eq!(approach_zero(-0.05, 0.1), 0.0);
        assert!((approach_zero(1.0, 0.1) - 0.9).abs() < 1e-6);
        assert_eq!(approach_zero(0.0, 0.1), 0.0);
    }

    #[test]
    fn step_toward_zero_keeps_sign() {
        assert_eq!(step_toward_zero(70), 69);
        assert_eq!(step_toward_zero(-70), -69);
        assert_eq!(step_toward_zero(1), 0);
        assert_eq!(step_toward_zero(0), 0);
    }
}
