//! Axis-separated rect-vs-grid collision and velocity integration
//!
//! Shared by the player and enemies. Movement is resolved X first, then Y;
//! each pass pushes the box out of every overlapping solid tile in neighbor
//! order, so a later overlap overrides an earlier correction.

use glam::{IVec2, Vec2};

use super::animation::Animation;
use super::rect::Rect;
use super::sprites::{Action, AnimationSet};
use super::tilemap::Tilemap;
use crate::assets::ImageId;
use crate::consts::{ANIM_OFFSET, GRAVITY, TERMINAL_VELOCITY};
use crate::render::Surface;

/// Contact flags from the most recent update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Collisions {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl Collisions {
    pub fn horizontal(&self) -> bool {
        self.left || self.right
    }

    pub fn vertical(&self) -> bool {
        self.up || self.down
    }
}

#[derive(Debug, Clone)]
pub struct PhysicsBody {
    /// Top-left corner in world pixels
    pub pos: Vec2,
    size: IVec2,
    pub velocity: Vec2,
    pub collisions: Collisions,
    action: Action,
    pub animation: Animation,
    /// Facing left
    pub flip: bool,
    /// Raw movement intent from the last update
    pub last_movement: Vec2,
}

impl PhysicsBody {
    pub fn new(pos: Vec2, size: IVec2, animations: &AnimationSet) -> Self {
        Self {
            pos,
            size,
            velocity: Vec2::ZERO,
            collisions: Collisions::default(),
            action: Action::Idle,
            animation: animations.get(Action::Idle).instance(),
            flip: false,
            last_movement: Vec2::ZERO,
        }
    }

    pub fn size(&self) -> IVec2 {
        self.size
    }

    pub fn rect(&self) -> Rect {
        Rect::from_pos(self.pos, self.size)
    }

    pub fn action(&self) -> Action {
        self.action
    }

    /// Switch animation; re-entering the current action keeps its progress
    pub fn set_action(&mut self, action: Action, animations: &AnimationSet) {
        if action != self.action {
            self.action = action;
            self.animation = animations.get(action).instance();
        }
    }

    /// Horizontal facing as a sign
    pub fn facing(&self) -> f32 {
        if self.flip { -1.0 } else { 1.0 }
    }

    /// Advance one tick: move, collide, apply gravity, animate
    pub fn update(&mut self, tilemap: &Tilemap, movement: Vec2) {
        self.collisions = Collisions::default();

        let frame_movement = movement + self.velocity;

        self.pos.x += frame_movement.x;
        let mut entity_rect = self.rect();
        for rect in tilemap.physics_rects_around(self.pos) {
            if entity_rect.collide_rect(&rect) {
                if frame_movement.x > 0.0 {
                    entity_rect.set_right(rect.left());
                    self.collisions.right = true;
                }
                if frame_movement.x < 0.0 {
                    entity_rect.set_left(rect.right());
                    self.collisions.left = true;
                }
                self.pos.x = entity_rect.x as f32;
            }
        }

        self.pos.y += frame_movement.y;
        let mut entity_rect = self.rect();
        for rect in tilemap.physics_rects_around(self.pos) {
            if entity_rect.collide_rect(&rect) {
                if frame_movement.y > 0.0 {
                    entity_rect.set_bottom(rect.top());
                    self.collisions.down = true;
                }
                if frame_movement.y < 0.0 {
                    entity_rect.set_top(rect.bottom());
                    self.collisions.up = true;
                }
                self.pos.y = entity_rect.y as f32;
            }
        }

        if movement.x > 0.0 {
            self.flip = false;
        }
        if movement.x < 0.0 {
            self.flip = true;
        }

        self.last_movement = movement;

        self.velocity.y = (self.velocity.y + GRAVITY).min(TERMINAL_VELOCITY);
        if self.collisions.vertical() {
            self.velocity.y = 0.0;
        }

        self.animation.update();
    }

    pub fn img(&self) -> ImageId {
        self.animation.img()
    }

    pub fn render(&self, surface: &mut dyn Surface, offset: IVec2) {
        let pos = self.pos - offset.as_vec2() + Vec2::from(ANIM_OFFSET);
        surface.blit(self.img(), pos, self.flip);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::sprites::test_support::sprites;
    use crate::sim::tilemap::Tile;
    use proptest::prelude::*;

    /// Floor along row 4 (y = 64..80) from x = 0 to 160, wall at column 6 rows 0..4
    fn arena() -> Tilemap {
        let mut map = Tilemap::new(16).unwrap();
        for x in 0..10 {
            map.insert(Tile::new("grass", 0, IVec2::new(x, 4)));
        }
        for y in 0..4 {
            map.insert(Tile::new("stone", 0, IVec2::new(6, y)));
        }
        map
    }

    fn body(pos: Vec2) -> PhysicsBody {
        PhysicsBody::new(pos, IVec2::new(8, 15), &sprites().player)
    }

    #[test]
    fn lands_on_floor() {
        let map = arena();
        let mut b = body(Vec2::new(20.0, 40.0));
        b.velocity.y = 5.0;
        b.update(&map, Vec2::ZERO);
        // 40 + 5 = 45, bottom 60 < 64: still falling
        assert!(!b.collisions.down);
        b.update(&map, Vec2::ZERO);
        // bottom would be 65 > 64: snapped
        assert!(b.collisions.down);
        assert_eq!(b.rect().bottom(), 64);
        assert_eq!(b.velocity.y, 0.0);
    }

    #[test]
    fn resting_body_touches_floor_periodically() {
        let map = arena();
        let mut b = body(Vec2::new(20.0, 49.0));
        let mut contacts = 0;
        for _ in 0..20 {
            b.update(&map, Vec2::ZERO);
            assert!(b.rect().bottom() <= 64);
            if b.collisions.down {
                contacts += 1;
                assert_eq!(b.pos.y, 49.0);
            }
        }
        // Gravity sinks the truncated box into the floor every few ticks
        assert!(contacts >= 3);
    }

    #[test]
    fn wall_blocks_rightward_movement() {
        let map = arena();
        let mut b = body(Vec2::new(86.0, 49.0));
        b.update(&map, Vec2::new(1.0, 0.0));
        assert!(!b.collisions.right);
        b.update(&map, Vec2::new(1.0, 0.0));
        // Right edge would be 96 = wall left: touching, no overlap
        assert!(!b.collisions.right);
        b.update(&map, Vec2::new(1.0, 0.0));
        assert!(b.collisions.right);
        assert_eq!(b.rect().right(), 96);
        assert!(!b.flip);
    }

    #[test]
    fn ceiling_cancels_upward_velocity() {
        let mut map = Tilemap::new(16).unwrap();
        map.insert(Tile::new("sky", 0, IVec2::new(1, 0)));
        let mut b = body(Vec2::new(18.0, 17.0));
        b.velocity.y = -3.0;
        b.update(&map, Vec2::ZERO);
        assert!(b.collisions.up);
        assert_eq!(b.rect().top(), 16);
        assert_eq!(b.velocity.y, 0.0);
    }

    #[test]
    fn zero_movement_preserves_facing() {
        let map = arena();
        let mut b = body(Vec2::new(20.0, 49.0));
        b.update(&map, Vec2::new(-1.0, 0.0));
        assert!(b.flip);
        b.update(&map, Vec2::ZERO);
        assert!(b.flip);
        assert_eq!(b.last_movement, Vec2::ZERO);
        b.update(&map, Vec2::new(1.0, 0.0));
        assert!(!b.flip);
    }

    #[test]
    fn set_action_keeps_progress_on_same_action() {
        let bank = sprites();
        let map = arena();
        let mut b = body(Vec2::new(20.0, 49.0));
        b.update(&map, Vec2::ZERO);
        b.update(&map, Vec2::ZERO);
        assert_eq!(b.animation.frame, 2);
        b.set_action(Action::Idle, &bank.player);
        assert_eq!(b.animation.frame, 2);
        b.set_action(Action::Run, &bank.player);
        assert_eq!(b.action(), Action::Run);
        assert_eq!(b.animation.frame, 0);
    }

    #[test]
    fn render_applies_offset_and_flip() {
        use crate::render::RecordingSurface;
        let mut b = body(Vec2::new(20.0, 49.0));
        b.flip = true;
        let mut surface = RecordingSurface::new(IVec2::new(640, 360), IVec2::splat(16));
        b.render(&mut surface, IVec2::new(10, 5));
        assert_eq!(surface.blits[0].pos, Vec2::new(7.0, 41.0));
        assert!(surface.blits[0].flip_x);
    }

    proptest! {
        #[test]
        fn gravity_never_exceeds_terminal_velocity(
            start_vy in -10.0f32..10.0,
            ticks in 1usize..400,
        ) {
            let map = Tilemap::new(16).unwrap();
            let mut b = body(Vec2::new(0.0, 0.0));
            b.velocity.y = start_vy;
            for _ in 0..ticks {
                b.update(&map, Vec2::ZERO);
                prop_assert!(b.velocity.y <= TERMINAL_VELOCITY);
            }
        }

        #[test]
        fn falling_body_only_reports_floor_contact(
            x in 0.0f32..80.0,
            y in -40.0f32..48.0,
            vy in 0.0f32..5.0,
        ) {
            let map = arena();
            let mut b = body(Vec2::new(x, y));
            b.velocity.y = vy;
            for _ in 0..120 {
                b.update(&map, Vec2::ZERO);
                let r = b.rect();
                prop_assert!(r.bottom() <= 64);
                prop_assert!(!b.collisions.up && !b.collisions.horizontal());
                if b.collisions.down {
                    prop_assert_eq!(r.bottom(), 64);
                    prop_assert_eq!(b.velocity.y, 0.0);
                }
            }
            prop_assert_eq!(b.pos.x, x);
        }
    }
}
