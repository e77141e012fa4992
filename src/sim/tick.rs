//! Fixed timestep simulation tick
//!
//! Core game loop that advances a session deterministically. Order within a
//! tick: input, level clear check, respawn countdown, camera, ambient
//! spawners, clouds, enemies, player, fireballs, particles.

use std::f32::consts::{PI, TAU};

use glam::Vec2;
use rand::Rng;

use super::player::DeathCause;
use super::sprites::ParticleKind;
use super::state::{GameEvent, Session, SessionError};
use super::world::{World, polar};
use crate::audio::{AudioSink, SoundEffect};
use crate::consts::*;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Horizontal intent: -1 left, 0 none, 1 right
    pub movement: i8,
    /// Jump pressed this tick (edge-triggered)
    pub jump: bool,
    /// Dash pressed this tick (edge-triggered)
    pub dash: bool,
}

impl TickInput {
    pub fn movement_vec(&self) -> Vec2 {
        Vec2::new(self.movement.signum() as f32, 0.0)
    }
}

/// Advance the session by one fixed timestep.
///
/// Fails only when a level transition cannot load its level.
pub fn tick(
    session: &mut Session,
    input: &TickInput,
    audio: &mut dyn AudioSink,
) -> Result<(), SessionError> {
    if session.complete {
        return Ok(());
    }
    session.time_ticks += 1;

    if session.dead == 0 {
        if input.jump && session.player.jump() {
            audio.play(SoundEffect::Jump);
        }
        if input.dash && session.player.dash() {
            audio.play(SoundEffect::Dash);
        }
    }

    // Level cleared
    if session.enemies.is_empty() {
        let cleared = session.level;
        session.events.push(GameEvent::LevelCleared { level: cleared });
        if cleared < session.last_level() {
            log::info!("Level {} cleared", cleared);
            session.load_level(cleared + 1)?;
        } else {
            log::info!("Run complete after level {}", cleared);
            session.complete = true;
            session.events.push(GameEvent::RunComplete);
            return Ok(());
        }
    }

    // Respawn countdown
    if session.dead > 0 {
        session.dead += 1;
        if session.dead > session.config.respawn_delay_ticks {
            log::debug!("Respawning on level {}", session.level);
            session.load_level(session.level)?;
        }
    }

    update_camera(session);
    spawn_ambient_particles(session);
    session.clouds.update();

    // Enemies
    let mut killed = Vec::new();
    {
        let mut world = World {
            tilemap: &session.tilemap,
            sprites: &session.sprites,
            particles: &mut session.particles,
            fireballs: &mut session.fireballs,
            audio: &mut *audio,
            rng: &mut session.rng,
        };
        let player = &session.player;
        session.enemies.retain_mut(|enemy| {
            let kill = enemy.update(&mut world, player);
            if kill {
                killed.push(enemy.rect().center());
            }
            !kill
        });
    }
    for pos in killed {
        session.enemies_killed += 1;
        log::debug!(
            "Enemy killed at {:?} ({}/{})",
            pos,
            session.enemies_killed,
            session.total_enemies
        );
        session.events.push(GameEvent::EnemyKilled { pos });
    }

    // Player
    if session.dead == 0 {
        let mut world = World {
            tilemap: &session.tilemap,
            sprites: &session.sprites,
            particles: &mut session.particles,
            fireballs: &mut session.fireballs,
            audio: &mut *audio,
            rng: &mut session.rng,
        };
        let death = session
            .player
            .update(&mut world, &session.hazards, input.movement_vec());
        if let Some(cause) = death {
            audio.play(SoundEffect::Hit);
            session.arm_death(cause);
        }
    }

    update_fireballs(session, audio);
    session.particles.update();

    Ok(())
}

/// Ease the camera toward the player's center
fn update_camera(session: &mut Session) {
    let center = session.player.rect().center();
    let view = Vec2::from(session.config.view_size);
    let smoothing = session.config.scroll_smoothing.max(1.0);
    session.scroll += (center - view / 2.0 - session.scroll) / smoothing;
}

/// Each spawner rolls once per tick with odds proportional to its area
fn spawn_ambient_particles(session: &mut Session) {
    let sources = [
        (ParticleKind::Leaf, &session.leaf_spawners),
        (ParticleKind::Drop, &session.drop_spawners),
    ];
    for (kind, spawners) in sources {
        for rect in spawners {
            if session.rng.random::<f32>() * SPAWNER_AREA_RATE >= rect.area() as f32 {
                continue;
            }
            let pos = Vec2::new(
                rect.x as f32 + session.rng.random::<f32>() * rect.w as f32,
                rect.y as f32 + session.rng.random::<f32>() * rect.h as f32,
            );
            let (velocity, frame) = match kind {
                ParticleKind::Leaf => (Vec2::new(-0.1, 0.2), session.rng.random_range(0..=15)),
                _ => (Vec2::new(0.0, 1.0), 0),
            };
            session
                .particles
                .spawn(kind, pos, velocity, frame, &session.sprites.particles);
        }
    }
}

/// Advance fireballs, then resolve hits against a live, vulnerable player
fn update_fireballs(session: &mut Session, audio: &mut dyn AudioSink) {
    let player_rect = session.player.rect();
    let mut hit_budget = if session.dead == 0 && !session.player.invulnerable() {
        FIREBALL_HITS_TO_DIE.saturating_sub(session.fireball_hits)
    } else {
        0
    };
    let mut hits = 0;
    let tilemap = &session.tilemap;
    session.fireballs.retain_mut(|fireball| {
        if !fireball.advance(tilemap) {
            return false;
        }
        if hit_budget > 0 && fireball.hits(&player_rect) {
            hit_budget -= 1;
            hits += 1;
            return false;
        }
        true
    });

    for _ in 0..hits {
        audio.play(SoundEffect::Hit);
        if session.register_fireball_hit() {
            let center = session.player.rect().center();
            let mut world = World {
                tilemap: &session.tilemap,
                sprites: &session.sprites,
                particles: &mut session.particles,
                fireballs: &mut session.fireballs,
                audio: &mut *audio,
                rng: &mut session.rng,
            };
            world.spark_burst(center, 30, 7, |a, b| polar(a * TAU + PI, b * 5.0 * 0.5));
            session.arm_death(DeathCause::Fireballs);
        }
    }
}
