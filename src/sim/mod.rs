//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One fixed step per tick
//! - Seeded RNG only
//! - Stable iteration order (brick list order decides collision ties)
//! - No rendering or platform dependencies

pub mod collision;
pub mod level;
pub mod particles;
pub mod powerups;
pub mod state;
pub mod tick;

pub use collision::{BrickContact, Rect, reflect_velocity};
pub use level::{GridLayout, generate_level, grid_layout, level_cleared};
pub use particles::Particle;
pub use powerups::{ActiveEffects, TimedEffect};
pub use state::{
    Ball, Brick, BrickHit, GameEvent, GamePhase, GameState, Paddle, PowerUp, PowerUpKind,
};
pub use tick::{TickInput, tick};
