//! Session configuration
//!
//! Tunables a host may override from JSON. Gameplay constants that never
//! change live in `crate::consts`.

use serde::{Deserialize, Serialize};

/// Session settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Level index the run starts on
    pub start_level: usize,
    /// Number of levels in a run (last one clears into RunComplete)
    pub level_count: usize,
    /// Lives restored on every death
    pub lives: u32,

    // === Camera ===
    /// Viewport size in world pixels
    pub view_size: [f32; 2],
    /// Camera catch-up divisor (higher = lazier)
    pub scroll_smoothing: f32,

    // === Timing ===
    /// Ticks between death and level reload
    pub respawn_delay_ticks: u32,

    // === Effects ===
    /// Maximum live particles (oldest dropped first)
    pub max_particles: usize,
    /// Lifetime for particles whose animation loops forever
    pub looping_particle_lifetime: u32,
    /// Number of background clouds
    pub cloud_count: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            seed: 0x6a75_6d70,
            start_level: 0,
            level_count: 3,
            lives: 2,

            view_size: [640.0, 360.0],
            scroll_smoothing: 30.0,

            respawn_delay_ticks: 40,

            max_particles: 1000,
            looping_particle_lifetime: 240,
            cloud_count: 16,
        }
    }
}

impl SessionConfig {
    /// Parse settings from JSON; missing fields take defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let config: Self = serde_json::from_str(json)?;
        log::info!(
            "Loaded session config (seed {}, {} levels)",
            config.seed,
            config.level_count
        );
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Index of the last level in the run
    pub fn last_level(&self) -> usize {
        self.level_count.saturating_sub(1)
    }
}
