//! Player state machine
//!
//! Layers jumping, wall sliding, dashing and attack phases on top of the
//! shared physics body. The player only reports a death; arming the respawn
//! countdown belongs to the session.

use std::f32::consts::TAU;

use glam::{IVec2, Vec2};
use rand::Rng;

use super::physics::PhysicsBody;
use super::rect::Rect;
use super::sprites::{Action, AnimationSet, ParticleKind};
use super::world::{World, polar};
use crate::consts::*;
use crate::render::Surface;
use crate::{approach_zero, step_toward_zero};

/// Why the player died
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeathCause {
    /// Airborne for longer than `MAX_AIR_TIME`
    Fall,
    /// Touched lethal decoration
    Hazard,
    /// Took `FIREBALL_HITS_TO_DIE` fireball hits
    Fireballs,
}

#[derive(Debug, Clone)]
pub struct Player {
    pub body: PhysicsBody,
    /// Ticks since last grounded
    pub air_time: u32,
    /// Remaining jump charges (0 or 1)
    pub jumps: u32,
    pub wall_slide: bool,
    /// Dash counter: magnitude is ticks left in the dash, sign is direction
    pub dashing: i32,
}

impl Player {
    pub fn new(pos: Vec2, animations: &AnimationSet) -> Self {
        Self {
            body: PhysicsBody::new(pos, IVec2::from(PLAYER_SIZE), animations),
            air_time: 0,
            jumps: 0,
            wall_slide: false,
            dashing: 0,
        }
    }

    pub fn rect(&self) -> Rect {
        self.body.rect()
    }

    pub fn action(&self) -> Action {
        self.body.action()
    }

    /// True while fireballs pass through
    pub fn invulnerable(&self) -> bool {
        self.dashing.abs() >= DASH_INVULNERABLE_THRESHOLD
    }

    /// True while touching an enemy kills it
    pub fn attacking(&self) -> bool {
        self.dashing.abs() >= DASH_KILL_THRESHOLD
    }

    /// Advance one tick with a horizontal intent in {-1, 0, 1}.
    ///
    /// `hazards` are the lethal decoration rects of the current level.
    /// Returns the cause if the player died this tick.
    pub fn update(
        &mut self,
        world: &mut World<'_>,
        hazards: &[Rect],
        movement: Vec2,
    ) -> Option<DeathCause> {
        let sprites = world.sprites;
        self.body.update(world.tilemap, movement);

        let mut death = None;

        self.air_time += 1;
        if self.air_time > MAX_AIR_TIME {
            death = Some(DeathCause::Fall);
            let center = self.rect().center();
            world.spark_burst(center, 30, 6, |a, b| polar(a * TAU, 2.0 + b * 3.0));
        }

        if self.body.collisions.down {
            self.air_time = 0;
            self.jumps = 1;
        }

        self.wall_slide = false;
        if self.body.collisions.horizontal() && self.air_time > COYOTE_TICKS {
            self.wall_slide = true;
            self.body.velocity.y = self.body.velocity.y.min(WALL_SLIDE_MAX_FALL);
            self.body.flip = !self.body.collisions.right;
        }

        let mut action = if self.wall_slide {
            Action::WallSlide
        } else if self.air_time > COYOTE_TICKS {
            Action::Jump
        } else if movement.x != 0.0 {
            Action::Run
        } else {
            Action::Idle
        };
        if let Some(phase) = attack_phase(self.dashing) {
            action = phase;
        }

        if self.dashing.abs() == DASH_DURATION || self.dashing.abs() == DASH_BURST_THRESHOLD {
            self.dash_trail(world);
        }
        self.dashing = step_toward_zero(self.dashing);

        if self.dashing.abs() > DASH_BURST_THRESHOLD {
            self.dash_trail(world);
            self.body.velocity.x = self.dashing.signum() as f32 * DASH_SPEED;
            if self.dashing.abs() == DASH_BURST_THRESHOLD + 1 {
                self.dash_trail(world);
                self.body.velocity.x *= DASH_STOP_DAMPING;
                action = Action::Attack2;
            }
        } else {
            self.body.velocity.x = approach_zero(self.body.velocity.x, FRICTION);
        }

        let rect = self.rect();
        if hazards.iter().any(|hazard| rect.collide_rect(hazard)) {
            death.get_or_insert(DeathCause::Hazard);
            world.spark_burst(rect.center(), 20, 6, |a, b| polar(a * 6.0, 2.0 + b * 3.0));
        }

        if death.is_some() {
            action = Action::Hit;
        }
        self.body.set_action(action, &sprites.player);

        death
    }

    fn dash_trail(&self, world: &mut World<'_>) {
        let center = self.rect().center();
        for _ in 0..3 {
            let angle = world.rng.random::<f32>() * 10.0;
            let speed = world.rng.random::<f32>();
            let frame = world.rng.random_range(0..=2);
            world.spawn_particle(ParticleKind::Spark, center, polar(angle, speed), frame);
        }
    }

    /// Try to jump; returns true if a jump was consumed.
    ///
    /// While wall sliding only a wall jump is possible, and only when the
    /// last input pushed into the wall.
    pub fn jump(&mut self) -> bool {
        if self.wall_slide {
            let into_left_wall = self.body.flip && self.body.last_movement.x < 0.0;
            let into_right_wall = !self.body.flip && self.body.last_movement.x > 0.0;
            if !(into_left_wall || into_right_wall) {
                return false;
            }
            let (push, lift) = WALL_JUMP_VELOCITY;
            self.body.velocity = Vec2::new(if into_left_wall { push } else { -push }, lift);
            self.air_time = COYOTE_TICKS + 1;
            self.jumps = self.jumps.saturating_sub(1);
            return true;
        }

        if self.jumps > 0 {
            self.body.velocity.y = JUMP_VELOCITY;
            self.jumps -= 1;
            self.air_time = COYOTE_TICKS + 1;
            return true;
        }
        false
    }

    /// Start a dash in the facing direction; no-op while already dashing
    pub fn dash(&mut self) -> bool {
        if self.dashing != 0 {
            return false;
        }
        self.dashing = if self.body.flip {
            -DASH_DURATION
        } else {
            DASH_DURATION
        };
        true
    }

    pub fn render(&self, surface: &mut dyn Surface, offset: IVec2) {
        self.body.render(surface, offset);
    }
}

/// Attack animation for a dash counter value (checked before it decays)
fn attack_phase(dashing: i32) -> Option<Action> {
    match dashing.abs() {
        56.. => Some(Action::Attack),
        36..=55 => Some(Action::Attack2),
        25..=35 => Some(Action::Attack3),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::tilemap::{Tile, Tilemap};
    use crate::sim::world::test_support::Harness;
    use proptest::prelude::*;

    /// Grass floor on row 4 (y = 64..80) across x = 0..320, stone wall at column 10
    fn floor_map() -> Tilemap {
        let mut map = Tilemap::new(16).unwrap();
        for x in 0..20 {
            map.insert(Tile::new("grass", 0, IVec2::new(x, 4)));
        }
        for y in 0..4 {
            map.insert(Tile::new("stone", 0, IVec2::new(10, y)));
        }
        map
    }

    fn grounded_player(harness: &mut Harness, x: f32) -> Player {
        let mut player = Player::new(Vec2::new(x, 49.0), &harness.sprites.player);
        // Settle onto the floor until a contact registers
        for _ in 0..10 {
            player.update(&mut harness.world(), &[], Vec2::ZERO);
            if player.body.collisions.down {
                break;
            }
        }
        assert!(player.body.collisions.down);
        player
    }

    #[test]
    fn jump_from_ground_then_no_double_jump() {
        let mut harness = Harness::new(floor_map());
        let mut player = grounded_player(&mut harness, 40.0);
        assert_eq!(player.jumps, 1);

        assert!(player.jump());
        assert_eq!(player.body.velocity.y, -3.0);
        assert_eq!(player.air_time, 5);
        assert_eq!(player.jumps, 0);

        player.update(&mut harness.world(), &[], Vec2::ZERO);
        let velocity = player.body.velocity;
        assert!(!player.jump());
        assert_eq!(player.body.velocity, velocity);
        assert_eq!(player.action(), Action::Jump);
    }

    #[test]
    fn dash_direction_and_noop_while_dashing() {
        let mut harness = Harness::new(floor_map());
        let mut right = Player::new(Vec2::new(40.0, 49.0), &harness.sprites.player);
        assert!(right.dash());
        assert_eq!(right.dashing, 70);
        assert!(!right.dash());
        assert_eq!(right.dashing, 70);

        let mut left = Player::new(Vec2::new(40.0, 49.0), &harness.sprites.player);
        left.body.flip = true;
        assert!(left.dash());
        assert_eq!(left.dashing, -70);
        left.update(&mut harness.world(), &[], Vec2::ZERO);
        assert_eq!(left.dashing, -69);
    }

    #[test]
    fn dash_burst_drives_velocity_then_stops() {
        let mut harness = Harness::new(floor_map());
        let mut player = Player::new(Vec2::new(20.0, 49.0), &harness.sprites.player);
        player.dash();

        player.update(&mut harness.world(), &[], Vec2::ZERO);
        assert_eq!(player.dashing, 69);
        assert_eq!(player.body.velocity.x, 8.0);
        assert_eq!(player.action(), Action::Attack);
        // Trail at 70 plus the burst trail
        assert_eq!(harness.particles.len(), 6);

        for _ in 0..8 {
            player.update(&mut harness.world(), &[], Vec2::ZERO);
        }
        // Tick that lands on 61 damps the burst
        assert_eq!(player.dashing, 61);
        assert!((player.body.velocity.x - 0.08).abs() < 1e-6);
        assert_eq!(player.action(), Action::Attack2);

        player.update(&mut harness.world(), &[], Vec2::ZERO);
        assert_eq!(player.body.velocity.x, 0.0);
    }

    #[test]
    fn attack_phase_thresholds() {
        assert_eq!(attack_phase(70), Some(Action::Attack));
        assert_eq!(attack_phase(-56), Some(Action::Attack));
        assert_eq!(attack_phase(55), Some(Action::Attack2));
        assert_eq!(attack_phase(-36), Some(Action::Attack2));
        assert_eq!(attack_phase(35), Some(Action::Attack3));
        assert_eq!(attack_phase(-25), Some(Action::Attack3));
        assert_eq!(attack_phase(24), None);
        assert_eq!(attack_phase(0), None);
    }

    #[test]
    fn fall_timeout_reports_death_with_burst() {
        let mut harness = Harness::new(Tilemap::new(16).unwrap());
        let mut player = Player::new(Vec2::new(0.0, 0.0), &harness.sprites.player);
        for tick in 1..=160 {
            assert_eq!(player.update(&mut harness.world(), &[], Vec2::ZERO), None, "tick {}", tick);
        }
        assert_eq!(harness.particles.len(), 0);
        let death = player.update(&mut harness.world(), &[], Vec2::ZERO);
        assert_eq!(death, Some(DeathCause::Fall));
        assert_eq!(player.air_time, 161);
        assert_eq!(player.action(), Action::Hit);
        assert_eq!(harness.particles.len(), 30);
    }

    #[test]
    fn hazard_overlap_reports_death() {
        let mut harness = Harness::new(floor_map());
        let mut player = grounded_player(&mut harness, 40.0);
        let far = [Rect::new(200, 48, 16, 16)];
        assert_eq!(player.update(&mut harness.world(), &far, Vec2::ZERO), None);
        let near = [Rect::new(40, 48, 16, 16)];
        let before = harness.particles.len();
        assert_eq!(
            player.update(&mut harness.world(), &near, Vec2::ZERO),
            Some(DeathCause::Hazard)
        );
        assert_eq!(harness.particles.len(), before + 20);
    }

    #[test]
    fn wall_slide_caps_fall_and_enables_wall_jump() {
        let mut harness = Harness::new(floor_map());
        // Airborne right next to the wall at x = 160
        let mut player = Player::new(Vec2::new(150.0, 10.0), &harness.sprites.player);
        player.air_time = 10;
        player.body.velocity.y = 2.0;
        player.update(&mut harness.world(), &[], Vec2::new(1.0, 0.0));
        player.update(&mut harness.world(), &[], Vec2::new(1.0, 0.0));
        player.update(&mut harness.world(), &[], Vec2::new(1.0, 0.0));
        assert!(player.body.collisions.right);
        assert!(player.wall_slide);
        assert!(player.body.velocity.y <= 0.5);
        assert!(!player.body.flip);
        assert_eq!(player.action(), Action::WallSlide);

        assert!(player.jump());
        assert_eq!(player.body.velocity, Vec2::new(-3.5, -2.5));
        assert_eq!(player.air_time, 5);
    }

    #[test]
    fn left_wall_jump_pushes_right() {
        let mut harness = Harness::new(floor_map());
        // Airborne just right of the wall's right face at x = 176
        let mut player = Player::new(Vec2::new(178.0, 10.0), &harness.sprites.player);
        player.air_time = 10;
        player.body.velocity.y = 2.0;
        for _ in 0..3 {
            player.update(&mut harness.world(), &[], Vec2::new(-1.0, 0.0));
        }
        assert!(player.body.collisions.left);
        assert_eq!(player.rect().left(), 176);
        assert!(player.wall_slide);
        assert!(player.body.flip);
        assert!(player.body.velocity.y <= 0.5);
        assert_eq!(player.action(), Action::WallSlide);

        assert_eq!(player.jumps, 0);
        assert!(player.jump());
        assert_eq!(player.body.velocity, Vec2::new(3.5, -2.5));
        assert_eq!(player.air_time, 5);
        assert_eq!(player.jumps, 0);
    }

    #[test]
    fn wall_slide_without_push_cannot_jump() {
        let mut harness = Harness::new(floor_map());
        let mut player = Player::new(Vec2::new(150.0, 10.0), &harness.sprites.player);
        player.air_time = 10;
        player.jumps = 1;
        player.update(&mut harness.world(), &[], Vec2::new(1.0, 0.0));
        player.update(&mut harness.world(), &[], Vec2::new(1.0, 0.0));
        player.update(&mut harness.world(), &[], Vec2::new(1.0, 0.0));
        assert!(player.wall_slide);
        player.body.last_movement = Vec2::ZERO;
        let velocity = player.body.velocity;
        assert!(!player.jump());
        assert_eq!(player.body.velocity, velocity);
        assert_eq!(player.jumps, 1);
    }

    proptest! {
        #[test]
        fn dash_decays_to_zero_without_crossing(left in any::<bool>()) {
            let mut harness = Harness::new(floor_map());
            let mut player = Player::new(Vec2::new(20.0, 49.0), &harness.sprites.player);
            player.body.flip = left;
            player.dash();
            let start = player.dashing;
            for _ in 0..start.abs() {
                player.update(&mut harness.world(), &[], Vec2::ZERO);
                prop_assert!(player.dashing == 0 || player.dashing.signum() == start.signum());
            }
            prop_assert_eq!(player.dashing, 0);
            player.update(&mut harness.world(), &[], Vec2::ZERO);
            prop_assert_eq!(player.dashing, 0);
        }
    }
}
