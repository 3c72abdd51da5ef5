//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed tick period, simulated clock only
//! - Seeded RNG only
//! - Stable iteration order (spawn order for circles, id order for shots)
//! - No rendering or platform dependencies

pub mod collision;
pub mod player;
pub mod powerup;
pub mod random;
pub mod snapshot;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod timers;

pub use collision::{circles_overlap, reflect_inside};
pub use player::{RespawnOutcome, submit_high_score};
pub use powerup::{AppliedEffect, DROP_TABLE, pick_kind};
pub use snapshot::{EffectTimer, Hud, Snapshot};
pub use spawn::{split_circle, spawn_wave};
pub use state::{
    ActiveEffects, ActivePowerUp, Circle, CircleKind, EffectKind, GameState, LevelCleared,
    PlayerPhase, PlayerRunState, Playfield, PowerUp, PowerUpKind, Projectile, Special,
};
pub use tick::{TickInput, TickReport, fire, tick};
pub use timers::{TimerId, TimerKind, TimerRegistry};
