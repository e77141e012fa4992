//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (ordered grid storage, insertion-ordered entity lists)
//! - No rendering or platform dependencies beyond the `Surface` trait

pub mod animation;
pub mod clouds;
pub mod enemy;
pub mod particle;
pub mod physics;
pub mod player;
pub mod projectile;
pub mod rect;
pub mod sprites;
pub mod state;
pub mod tick;
pub mod tilemap;
pub mod world;

pub use animation::{Animation, AnimationSequence};
pub use clouds::{Cloud, Clouds};
pub use enemy::Enemy;
pub use particle::{Particle, Particles};
pub use physics::{Collisions, PhysicsBody};
pub use player::{DeathCause, Player};
pub use projectile::Fireball;
pub use rect::Rect;
pub use sprites::{Action, AnimationSet, ParticleKind, SpriteBank};
pub use state::{GameEvent, GamePhase, Hud, Session, SessionError};
pub use tick::{TickInput, tick};
pub use tilemap::{NEIGHBOR_OFFSETS, Tile, TileKey, Tilemap};
pub use world::World;
