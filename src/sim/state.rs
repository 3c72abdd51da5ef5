//! Game state and core simulation types
//!
//! Entity records are plain data. All mutation goes through the tick engine,
//! the spawner, the power-up system and the player state machine.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::timers::{TimerId, TimerKind, TimerRegistry};
use crate::consts::*;
use crate::highscores::HighScores;

/// Measured playfield. Positions live in `[0, width] x [0, height]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Playfield {
    pub width: f32,
    pub height: f32,
}

impl Playfield {
    /// Returns `None` for geometry that cannot be simulated (zero, negative, NaN)
    pub fn new(width: f32, height: f32) -> Option<Self> {
        let valid = |v: f32| v.is_finite() && v > 0.0;
        if valid(width) && valid(height) {
            Some(Self { width, height })
        } else {
            None
        }
    }

    /// The player is pinned here
    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    #[inline]
    pub fn contains(&self, pos: Vec2) -> bool {
        pos.x >= 0.0 && pos.x <= self.width && pos.y >= 0.0 && pos.y <= self.height
    }
}

/// Circle size category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CircleKind {
    Large,
    Medium,
    Small,
}

impl CircleKind {
    pub fn size(self) -> f32 {
        match self {
            CircleKind::Large => 30.0,
            CircleKind::Medium => 20.0,
            CircleKind::Small => 12.0,
        }
    }

    pub fn points(self) -> u64 {
        match self {
            CircleKind::Large => 1,
            CircleKind::Medium => 2,
            CircleKind::Small => 5,
        }
    }

    /// RGB color for the renderer
    pub fn color(self) -> u32 {
        match self {
            CircleKind::Large => 0xff0000,  // red
            CircleKind::Medium => 0xffa500, // orange
            CircleKind::Small => 0xffff00,  // yellow
        }
    }

    /// Category of the two offspring, `None` for circles that do not split
    pub fn split(self) -> Option<CircleKind> {
        match self {
            CircleKind::Large => Some(CircleKind::Medium),
            CircleKind::Medium => Some(CircleKind::Small),
            CircleKind::Small => None,
        }
    }
}

/// Temporary "drops a power-up when killed" window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Special {
    pub since_ms: u64,
    pub duration_ms: u64,
}

impl Special {
    pub fn starting_at(now_ms: u64) -> Self {
        Self {
            since_ms: now_ms,
            duration_ms: SPECIAL_DURATION_MS,
        }
    }

    #[inline]
    pub fn is_expired(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.since_ms) > self.duration_ms
    }
}

/// A drifting target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    pub kind: CircleKind,
    pub points: u64,
    pub color: u32,
    /// Only ever `Some` for small circles
    pub special: Option<Special>,
}

impl Circle {
    pub fn new(kind: CircleKind, pos: Vec2, vel: Vec2) -> Self {
        Self {
            pos,
            vel,
            size: kind.size(),
            kind,
            points: kind.points(),
            color: kind.color(),
            special: None,
        }
    }

    /// Mark as special. Ignored for anything but small circles.
    pub fn with_special(mut self, special: Option<Special>) -> Self {
        if self.kind == CircleKind::Small {
            self.special = special;
        }
        self
    }

    #[inline]
    pub fn is_special(&self) -> bool {
        self.special.is_some()
    }

    /// Drop the special flag once its window has run out
    pub fn update_special(&mut self, now_ms: u64) {
        if self.special.is_some_and(|s| s.is_expired(now_ms)) {
            self.special = None;
        }
    }
}

/// A player shot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PowerUpKind {
    Shotgun,
    Points100,
    Bounce,
    Invincibility,
    Nuke,
    ExtraLife,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 6] = [
        PowerUpKind::Shotgun,
        PowerUpKind::Points100,
        PowerUpKind::Bounce,
        PowerUpKind::Invincibility,
        PowerUpKind::Nuke,
        PowerUpKind::ExtraLife,
    ];

    /// Pickup banner text
    pub fn message(self) -> &'static str {
        match self {
            PowerUpKind::Shotgun => "Shotgun!",
            PowerUpKind::Points100 => "+100 Points!",
            PowerUpKind::Bounce => "Bounce!",
            PowerUpKind::Invincibility => "Invincible!",
            PowerUpKind::Nuke => "NUKE! +250",
            PowerUpKind::ExtraLife => "Extra Life!",
        }
    }

    /// The timed effect this pickup arms, if any
    pub fn effect(self) -> Option<EffectKind> {
        match self {
            PowerUpKind::Shotgun => Some(EffectKind::Shotgun),
            PowerUpKind::Bounce => Some(EffectKind::Bounce),
            PowerUpKind::Invincibility => Some(EffectKind::Invincibility),
            PowerUpKind::Points100 | PowerUpKind::Nuke | PowerUpKind::ExtraLife => None,
        }
    }
}

/// A collectible lying in the playfield
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerUp {
    pub id: u32,
    pub pos: Vec2,
    pub kind: PowerUpKind,
    pub spawned_ms: u64,
    pub lifetime_ms: u64,
    /// Uncollectable on the tick it appears
    pub just_dropped: bool,
}

impl PowerUp {
    #[inline]
    pub fn is_expired(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.spawned_ms) >= self.lifetime_ms
    }
}

/// Timed effects a pickup can leave on the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectKind {
    Shotgun,
    Bounce,
    Invincibility,
}

impl EffectKind {
    pub const ALL: [EffectKind; 3] = [EffectKind::Shotgun, EffectKind::Bounce, EffectKind::Invincibility];

    pub fn duration_ms(self) -> u64 {
        match self {
            EffectKind::Shotgun => SHOTGUN_DURATION_MS,
            EffectKind::Bounce => BOUNCE_DURATION_MS,
            EffectKind::Invincibility => INVINCIBILITY_DURATION_MS,
        }
    }
}

/// A timed effect currently in force
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivePowerUp {
    pub started_ms: u64,
    pub duration_ms: u64,
}

impl ActivePowerUp {
    #[inline]
    pub fn is_expired(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.started_ms) > self.duration_ms
    }

    /// Whole seconds left, rounded up
    pub fn remaining_secs(&self, now_ms: u64) -> u64 {
        let left = (self.started_ms + self.duration_ms).saturating_sub(now_ms);
        left.div_ceil(1000)
    }
}

/// One slot per effect kind, so a second pickup can only restart the timer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveEffects {
    pub shotgun: Option<ActivePowerUp>,
    pub bounce: Option<ActivePowerUp>,
    pub invincibility: Option<ActivePowerUp>,
}

impl ActiveEffects {
    pub fn get(&self, kind: EffectKind) -> Option<&ActivePowerUp> {
        match kind {
            EffectKind::Shotgun => self.shotgun.as_ref(),
            EffectKind::Bounce => self.bounce.as_ref(),
            EffectKind::Invincibility => self.invincibility.as_ref(),
        }
    }

    fn slot_mut(&mut self, kind: EffectKind) -> &mut Option<ActivePowerUp> {
        match kind {
            EffectKind::Shotgun => &mut self.shotgun,
            EffectKind::Bounce => &mut self.bounce,
            EffectKind::Invincibility => &mut self.invincibility,
        }
    }

    /// Arm (or re-arm) an effect starting now
    pub fn arm(&mut self, kind: EffectKind, now_ms: u64) {
        *self.slot_mut(kind) = Some(ActivePowerUp {
            started_ms: now_ms,
            duration_ms: kind.duration_ms(),
        });
    }

    pub fn is_active(&self, kind: EffectKind, now_ms: u64) -> bool {
        self.get(kind).is_some_and(|e| !e.is_expired(now_ms))
    }

    /// Remove every effect whose window has elapsed. Returns the kinds removed.
    pub fn expire(&mut self, now_ms: u64) -> Vec<EffectKind> {
        let mut expired = Vec::new();
        for kind in EffectKind::ALL {
            let slot = self.slot_mut(kind);
            if slot.is_some_and(|e| e.is_expired(now_ms)) {
                *slot = None;
                expired.push(kind);
            }
        }
        expired
    }

    pub fn iter(&self) -> impl Iterator<Item = (EffectKind, &ActivePowerUp)> {
        EffectKind::ALL
            .into_iter()
            .filter_map(|kind| self.get(kind).map(|e| (kind, e)))
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Where the player is in the life/respawn cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerPhase {
    /// Playable (possibly still immune during the post-respawn blink tail)
    Active,
    /// Hidden, waiting for the respawn delay to take a life
    Respawning,
    /// Run ended
    GameOver,
}

/// Visibility blink animation in progress
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Blink {
    /// Delay before the next toggle
    pub interval_ms: f32,
    /// Sum of intervals played so far
    pub elapsed_ms: f32,
    pub duration_ms: u64,
    /// Visibility the animation last set
    pub shown: bool,
    /// When the pending toggle was scheduled for; toggles chain off this
    /// rather than the tick that fired them
    pub next_due_ms: u64,
    pub timer: Option<TimerId>,
}

/// Everything about the player's run
#[derive(Debug, Clone)]
pub struct PlayerRunState {
    pub lives: u8,
    pub phase: PlayerPhase,
    /// Hits are ignored while set
    pub immune: bool,
    pub visible: bool,
    pub level: u32,
    pub score: u64,
    pub shots_available: u8,
    pub shots_fired: u32,
    pub shots_hit: u32,
    pub run_started_ms: Option<u64>,
    pub elapsed_secs: u64,
    /// Top 10 name prompt is open
    pub awaiting_name: bool,
    pub blink: Option<Blink>,
}

impl Default for PlayerRunState {
    fn default() -> Self {
        Self {
            lives: STARTING_LIVES,
            phase: PlayerPhase::Active,
            immune: false,
            visible: true,
            level: 1,
            score: 0,
            shots_available: MAX_SHOTS,
            shots_fired: 0,
            shots_hit: 0,
            run_started_ms: None,
            elapsed_secs: 0,
            awaiting_name: false,
            blink: None,
        }
    }
}

impl PlayerRunState {
    #[inline]
    pub fn is_respawning(&self) -> bool {
        self.phase == PlayerPhase::Respawning
    }

    #[inline]
    pub fn is_game_over(&self) -> bool {
        self.phase == PlayerPhase::GameOver
    }

    /// Hit percentage rounded to one decimal, 0 before the first shot
    pub fn accuracy(&self) -> f32 {
        if self.shots_fired == 0 {
            return 0.0;
        }
        let pct = self.shots_hit as f32 / self.shots_fired as f32 * 100.0;
        (pct * 10.0).round() / 10.0
    }
}

/// Result of a level transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelCleared {
    /// Level entered
    pub level: u32,
    /// False when a nuke caused the transition
    pub bonus_awarded: bool,
}

/// Complete game state (deterministic for a given seed and input sequence)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    /// Simulated clock
    pub now_ms: u64,
    /// `None` until the host has measured the playfield
    pub playfield: Option<Playfield>,
    pub player: PlayerRunState,
    pub circles: Vec<Circle>,
    pub projectiles: Vec<Projectile>,
    pub power_ups: Vec<PowerUp>,
    pub effects: ActiveEffects,
    /// Waiting on the next wave; suppresses level-clear checks
    pub spawning: bool,
    pub message: Option<String>,
    pub timers: TimerRegistry,
    /// Leaderboard as seeded at startup, used for the top 10 check
    pub leaderboard: HighScores,
    next_projectile_id: u32,
    next_power_up_id: u32,
}

impl GameState {
    /// Create a new run with the given seed
    pub fn new(seed: u64, playfield: Option<Playfield>, leaderboard: HighScores) -> Self {
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            now_ms: 0,
            playfield,
            player: PlayerRunState::default(),
            circles: Vec::new(),
            projectiles: Vec::new(),
            power_ups: Vec::new(),
            effects: ActiveEffects::default(),
            spawning: false,
            message: None,
            timers: TimerRegistry::new(),
            leaderboard,
            next_projectile_id: 0,
            next_power_up_id: 0,
        };
        state.enter_spawning();
        state
    }

    /// Throw away the current run. Every pending timer is cancelled first so
    /// nothing scheduled by the old run can touch the new one.
    pub fn restart(&mut self) {
        let cancelled = self.timers.cancel_all();
        log::info!(
            "Restarting run (score {}, level {}, {} timers cancelled)",
            self.player.score,
            self.player.level,
            cancelled
        );
        self.player = PlayerRunState::default();
        self.circles.clear();
        self.projectiles.clear();
        self.power_ups.clear();
        self.effects.clear();
        self.spawning = false;
        self.message = None;
        self.next_projectile_id = 0;
        self.next_power_up_id = 0;
        self.enter_spawning();
    }

    pub fn set_playfield(&mut self, playfield: Option<Playfield>) {
        self.playfield = playfield;
    }

    pub fn next_projectile_id(&mut self) -> u32 {
        let id = self.next_projectile_id;
        self.next_projectile_id += 1;
        id
    }

    pub fn next_power_up_id(&mut self) -> u32 {
        let id = self.next_power_up_id;
        self.next_power_up_id += 1;
        id
    }

    /// Wait for the next wave; it spawns after `LEVEL_SPAWN_DELAY_MS`
    pub fn enter_spawning(&mut self) {
        self.spawning = true;
        self.timers.cancel_kind(TimerKind::LevelSpawn);
        self.timers
            .schedule(TimerKind::LevelSpawn, self.now_ms + LEVEL_SPAWN_DELAY_MS);
    }

    /// Show a pickup banner, replacing (and un-scheduling) any previous one
    pub fn show_message(&mut self, text: impl Into<String>) {
        self.timers.cancel_kind(TimerKind::MessageExpiry);
        self.message = Some(text.into());
        self.timers
            .schedule(TimerKind::MessageExpiry, self.now_ms + MESSAGE_DURATION_MS);
    }

    pub fn is_active(&self, kind: EffectKind) -> bool {
        self.effects.is_active(kind, self.now_ms)
    }

    /// Weapon name for the HUD
    pub fn weapon_name(&self) -> &'static str {
        if self.is_active(EffectKind::Shotgun) {
            "Shotgun"
        } else {
            "Pistol"
        }
    }
}
