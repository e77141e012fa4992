//! Patrolling enemies
//!
//! An enemy idles until a random roll starts a patrol burst. While walking it
//! turns at ledges and walls; when the burst runs out it fires at the player
//! if they stand roughly level with it on the side it faces.

use std::f32::consts::{PI, TAU};

use glam::{IVec2, Vec2};
use rand::Rng;

use super::physics::PhysicsBody;
use super::player::Player;
use super::projectile::Fireball;
use super::rect::Rect;
use super::sprites::{Action, AnimationSet};
use super::world::{World, polar};
use crate::assets::ImageId;
use crate::audio::SoundEffect;
use crate::consts::*;
use crate::render::Surface;

#[derive(Debug, Clone)]
pub struct Enemy {
    pub body: PhysicsBody,
    /// Ticks left in the current patrol burst (0 = standing)
    pub walking: u32,
}

impl Enemy {
    pub fn new(pos: Vec2, animations: &AnimationSet) -> Self {
        Self {
            body: PhysicsBody::new(pos, IVec2::from(ENEMY_SIZE), animations),
            walking: 0,
        }
    }

    pub fn rect(&self) -> Rect {
        self.body.rect()
    }

    /// Advance one tick. Returns true when the player's dash killed this enemy.
    pub fn update(&mut self, world: &mut World<'_>, player: &Player) -> bool {
        let sprites = world.sprites;
        let mut movement = Vec2::ZERO;

        if self.walking > 0 {
            let rect = self.rect();
            let ahead = if self.body.flip {
                -ENEMY_PROBE_AHEAD
            } else {
                ENEMY_PROBE_AHEAD
            };
            let probe = Vec2::new(
                (rect.center_x() + ahead) as f32,
                self.body.pos.y + ENEMY_PROBE_DEPTH,
            );
            if world.tilemap.solid_check(probe).is_some() {
                if self.body.collisions.horizontal() {
                    self.body.flip = !self.body.flip;
                } else {
                    movement.x = self.body.facing() * ENEMY_WALK_SPEED;
                }
            } else {
                self.body.flip = !self.body.flip;
            }

            self.walking -= 1;
            if self.walking == 0 {
                self.fire_at(world, player);
            }
        } else if world.rng.random::<f32>() < ENEMY_WALK_CHANCE {
            self.walking = world.rng.random_range(ENEMY_WALK_MIN..=ENEMY_WALK_MAX);
        }

        self.body.update(world.tilemap, movement);

        let action = if movement.x != 0.0 {
            Action::Run
        } else {
            Action::Idle
        };
        self.body.set_action(action, &sprites.enemy);

        if player.attacking() && self.rect().collide_rect(&player.rect()) {
            world.play(SoundEffect::Hit);
            world.spark_burst(self.rect().center(), 20, 2, |a, b| {
                polar(a * TAU + PI, b * 5.0 * 0.2)
            });
            return true;
        }
        false
    }

    /// Shoot if the player is level with us on the side we face
    fn fire_at(&self, world: &mut World<'_>, player: &Player) {
        let delta = player.body.pos - self.body.pos;
        if delta.y.abs() >= ENEMY_SIGHT_HEIGHT {
            return;
        }
        let facing_player = if self.body.flip {
            delta.x < 0.0
        } else {
            delta.x > 0.0
        };
        if !facing_player {
            return;
        }

        let rect = self.rect();
        let direction = self.body.facing();
        let muzzle = Vec2::new(
            (rect.center_x() + direction as i32 * ENEMY_MUZZLE_OFFSET) as f32,
            rect.center_y() as f32,
        );
        world.play(SoundEffect::Shoot);
        world
            .fireballs
            .push(Fireball::new(muzzle, direction * FIREBALL_SPEED));
    }

    /// Draw the body, then the weapon on the facing side
    pub fn render(&self, surface: &mut dyn Surface, offset: IVec2, weapon: ImageId) {
        self.body.render(surface, offset);

        let rect = self.rect();
        let y = rect.center_y() - offset.y - 8;
        let x = if self.body.flip {
            rect.center_x() - 6 - surface.image_size(weapon).x - offset.x
        } else {
            rect.center_x() + 4 - offset.x
        };
        surface.blit(weapon, IVec2::new(x, y).as_vec2(), self.body.flip);
    }
}
