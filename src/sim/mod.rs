//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay pure:
//! - No rendering, audio or platform dependencies
//! - Seeded RNG only (used for cosmetic scatter, never for gameplay)
//! - Variable timestep, clamped per tick
//! - Pooled entities with stable slot order

pub mod pool;
pub mod spawn;
pub mod stance;
pub mod state;
pub mod tick;

pub use pool::SlotPool;
pub use spawn::{SPAWN_PATTERN, prefill, spawn};
pub use stance::{STANCE_DEFS, Stance, StanceDef};
pub use state::{GameEvent, GameState, HudState, Obstacle, Paddle, Particle, Side, Streak};
pub use tick::{TickInput, tick};
