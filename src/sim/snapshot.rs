//! Read-only view of the world handed to the renderer after each tick

use serde::Serialize;

use super::state::{Circle, EffectKind, GameState, PowerUp, Projectile};

/// Countdown for one active effect
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EffectTimer {
    pub kind: EffectKind,
    pub remaining_secs: u64,
}

/// Heads-up display fields
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hud {
    pub lives: u8,
    pub score: u64,
    pub level: u32,
    pub weapon: &'static str,
    pub shots_available: u8,
    pub shots_fired: u32,
    pub shots_hit: u32,
    /// Percent, one decimal
    pub accuracy: f32,
    pub elapsed_secs: u64,
    pub effects: Vec<EffectTimer>,
    pub message: Option<String>,
    pub game_over: bool,
    pub awaiting_name: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub circles: Vec<Circle>,
    pub projectiles: Vec<Projectile>,
    pub power_ups: Vec<PowerUp>,
    pub player_visible: bool,
    pub hud: Hud,
}

impl Snapshot {
    pub fn capture(state: &GameState) -> Self {
        let player = &state.player;
        let effects = state
            .effects
            .iter()
            .filter(|(_, e)| !e.is_expired(state.now_ms))
            .map(|(kind, e)| EffectTimer {
                kind,
                remaining_secs: e.remaining_secs(state.now_ms),
            })
            .collect();

        Self {
            circles: state.circles.clone(),
            projectiles: state.projectiles.clone(),
            power_ups: state.power_ups.clone(),
            player_visible: player.visible,
            hud: Hud {
                lives: player.lives,
                score: player.score,
                level: player.level,
                weapon: state.weapon_name(),
                shots_available: player.shots_available,
                shots_fired: player.shots_fired,
                shots_hit: player.shots_hit,
                accuracy: player.accuracy(),
                elapsed_secs: player.elapsed_secs,
                effects,
                message: state.message.clone(),
                game_over: player.is_game_over(),
                awaiting_name: player.awaiting_name,
            },
        }
    }
}
