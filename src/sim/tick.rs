//! Fixed-period simulation tick
//!
//! Core game loop that advances the run by `TICK_MS`. Order inside a tick:
//! input, clock + timers, then (only while the player is active) projectiles,
//! circles, expiry, shot/circle hits, shot/pickup hits, circle/player hits,
//! commit, nuke, level clear.

use std::collections::HashSet;

use glam::Vec2;

use super::collision::{circles_overlap, reflect_inside};
use super::player::{self, RespawnOutcome};
use super::powerup::{self, AppliedEffect};
use super::spawn::{spawn_wave, split_circle};
use super::state::{CircleKind, EffectKind, GameState, LevelCleared, PlayerPhase, Projectile};
use super::timers::TimerKind;
use crate::consts::*;
use crate::velocity_from_angle;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Fire toward this angle (radians from the player, screen space)
    pub fire: Option<f32>,
    /// Throw the run away and start over
    pub restart: bool,
}

/// What happened during one tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    /// Projectiles created by this tick's fire command
    pub fired: usize,
    /// Points from destroyed circles (pickup bonuses go straight to the score)
    pub points: u64,
    pub circles_destroyed: usize,
    pub power_ups_collected: usize,
    /// A circle reached the player and started the respawn sequence
    pub player_hit: bool,
    pub level_cleared: Option<LevelCleared>,
    pub respawn: Option<RespawnOutcome>,
    /// Number of circles placed by a wave spawn this tick
    pub wave_spawned: Option<usize>,
}

/// Advance the game state by one fixed period
pub fn tick(state: &mut GameState, input: &TickInput) -> TickReport {
    let mut report = TickReport::default();

    if input.restart {
        state.restart();
    }
    if let Some(angle) = input.fire {
        report.fired = fire(state, angle);
    }

    state.now_ms += TICK_MS;
    run_timers(state, &mut report);

    // Nothing moves while the player is down or the run is over
    if state.player.phase != PlayerPhase::Active {
        return report;
    }
    let Some(field) = state.playfield else {
        return report;
    };
    let now = state.now_ms;
    let bounce = state.is_active(EffectKind::Bounce);

    // 1. Projectiles
    let mut projectiles = std::mem::take(&mut state.projectiles);
    for p in projectiles.iter_mut() {
        p.pos += p.vel;
        if bounce {
            reflect_inside(&mut p.pos, &mut p.vel, 0.0, &field);
        }
    }
    if !bounce {
        projectiles.retain(|p| field.contains(p.pos));
    }

    // 2. Circles always bounce off the walls
    let mut circles = std::mem::take(&mut state.circles);
    for c in circles.iter_mut() {
        c.pos += c.vel;
        reflect_inside(&mut c.pos, &mut c.vel, c.size, &field);
        c.update_special(now);
    }

    // 3. Expiry
    powerup::expire(state);

    // 4. Projectile vs circle: each shot kills at most one circle
    let mut used: HashSet<u32> = HashSet::new();
    let mut survivors = Vec::with_capacity(circles.len());
    let mut offspring = Vec::new();
    let mut points = 0;
    let mut hits = 0u32;

    for circle in circles {
        let hit_by = projectiles
            .iter()
            .find(|p| !used.contains(&p.id) && circles_overlap(p.pos, p.size, circle.pos, circle.size))
            .map(|p| p.id);

        let Some(id) = hit_by else {
            survivors.push(circle);
            continue;
        };
        used.insert(id);
        hits += 1;
        points += circle.points;
        report.circles_destroyed += 1;

        if circle.is_special() {
            let drop = powerup::drop_at(state, circle.pos);
            state.power_ups.push(drop);
        }
        offspring.extend(split_circle(&mut state.rng, &circle, &field, now));
    }

    // 5. Projectile vs field pickup
    let mut nuked = false;
    let mut remaining = Vec::with_capacity(state.power_ups.len());
    for mut pickup in std::mem::take(&mut state.power_ups) {
        let collected_by = if pickup.just_dropped {
            None
        } else {
            projectiles
                .iter()
                .find(|p| !used.contains(&p.id) && circles_overlap(p.pos, p.size, pickup.pos, POWERUP_RADIUS))
                .map(|p| p.id)
        };

        match collected_by {
            Some(id) => {
                used.insert(id);
                hits += 1;
                report.power_ups_collected += 1;
                if powerup::apply(state, pickup.kind) == AppliedEffect::Nuke {
                    nuked = true;
                }
            }
            None => {
                pickup.just_dropped = false;
                remaining.push(pickup);
            }
        }
    }

    // 6. Circle vs player, survivors only
    let center = field.center();
    if survivors
        .iter()
        .any(|c| circles_overlap(c.pos, c.size, center, PLAYER_RADIUS))
    {
        report.player_hit = player::on_hit(state);
    }

    // 7. Commit
    projectiles.retain(|p| !used.contains(&p.id));
    state.projectiles = projectiles;
    survivors.extend(offspring);
    state.circles = survivors;
    state.power_ups = remaining;
    state.player.score += points;
    state.player.shots_hit += hits;
    report.points = points;

    // 8. Nuke wipes the field and takes the level transition itself
    if nuked {
        state.circles.clear();
        state.power_ups.clear();
        report.level_cleared = Some(advance_level(state, false));
        return report;
    }

    // 9. Level clear
    if state.circles.is_empty() && !state.spawning {
        report.level_cleared = Some(advance_level(state, true));
    }

    report
}

/// Move to the next level and queue its wave
fn advance_level(state: &mut GameState, bonus: bool) -> LevelCleared {
    state.player.level += 1;
    if bonus {
        state.player.score += LEVEL_CLEAR_BONUS;
    }
    state.enter_spawning();
    log::info!(
        "Level {} reached (score {}{})",
        state.player.level,
        state.player.score,
        if bonus { "" } else { ", no clear bonus" }
    );
    LevelCleared {
        level: state.player.level,
        bonus_awarded: bonus,
    }
}

/// Fire toward `angle`. Returns the number of projectiles created; 0 when the
/// shot is refused (no ammo, respawning, game over, or no playfield yet).
pub fn fire(state: &mut GameState, angle: f32) -> usize {
    let Some(field) = state.playfield else {
        return 0;
    };
    if state.player.shots_available == 0 || state.player.phase != PlayerPhase::Active {
        return 0;
    }

    if state.player.run_started_ms.is_none() {
        state.player.run_started_ms = Some(state.now_ms);
        state.timers.cancel_kind(TimerKind::ElapsedClock);
        state
            .timers
            .schedule(TimerKind::ElapsedClock, state.now_ms + CLOCK_INTERVAL_MS);
    }

    let origin = field.center();
    let spread: &[f32] = if state.is_active(EffectKind::Shotgun) {
        &SHOTGUN_SPREAD
    } else {
        &[0.0]
    };
    for offset in spread {
        let id = state.next_projectile_id();
        state.projectiles.push(Projectile {
            id,
            pos: origin,
            vel: velocity_from_angle(angle + offset, PROJECTILE_SPEED),
            size: PROJECTILE_SIZE,
        });
    }

    state.player.shots_available -= 1;
    state.player.shots_fired += spread.len() as u32;
    state
        .timers
        .schedule(TimerKind::Reload, state.now_ms + FIRE_RATE_MS);
    spread.len()
}

/// Fire every timer due by now, in deadline order
fn run_timers(state: &mut GameState, report: &mut TickReport) {
    while let Some((_, kind)) = state.timers.pop_due(state.now_ms) {
        match kind {
            TimerKind::Reload => {
                state.player.shots_available = (state.player.shots_available + 1).min(MAX_SHOTS);
            }
            TimerKind::MessageExpiry => {
                state.message = None;
            }
            TimerKind::RespawnResolve => {
                report.respawn = Some(player::resolve_respawn(state));
            }
            TimerKind::BlinkToggle => player::blink_step(state),
            TimerKind::ImmunityEnd => player::end_immunity(state),
            TimerKind::ElapsedClock => {
                if state.player.is_game_over() {
                    continue;
                }
                if !state.player.is_respawning() {
                    if let Some(start) = state.player.run_started_ms {
                        state.player.elapsed_secs = (state.now_ms - start) / 1000;
                    }
                }
                state
                    .timers
                    .schedule(TimerKind::ElapsedClock, state.now_ms + CLOCK_INTERVAL_MS);
            }
            TimerKind::LevelSpawn => {
                report.wave_spawned = spawn_level_wave(state);
            }
        }
    }
}

/// Place the wave for the current level. Retries later if the playfield is
/// not measurable yet.
fn spawn_level_wave(state: &mut GameState) -> Option<usize> {
    if state.player.is_game_over() {
        return None;
    }
    let Some(field) = state.playfield else {
        state
            .timers
            .schedule(TimerKind::LevelSpawn, state.now_ms + LEVEL_SPAWN_DELAY_MS);
        return None;
    };

    let count = state.player.level as usize * CIRCLES_PER_LEVEL;
    let center: Vec2 = field.center();
    let wave = spawn_wave(
        &mut state.rng,
        count,
        CircleKind::Large,
        &field,
        center,
        PLAYER_RADIUS,
        state.now_ms,
    );
    let placed = wave.len();
    log::debug!("Level {}: spawned {} of {} circles", state.player.level, placed, count);
    state.circles = wave;
    state.spawning = false;
    Some(placed)
}
