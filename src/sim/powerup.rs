//! Power-up drops, pickup effects and expiry

use glam::Vec2;
use rand::Rng;

use super::player;
use super::random::weighted_choice;
use super::state::{EffectKind, GameState, PowerUp, PowerUpKind};
use crate::consts::*;

/// Drop weights, summing to 100
pub const DROP_TABLE: [(PowerUpKind, u32); 6] = [
    (PowerUpKind::Shotgun, 25),
    (PowerUpKind::Points100, 25),
    (PowerUpKind::Bounce, 25),
    (PowerUpKind::Invincibility, 10),
    (PowerUpKind::Nuke, 10),
    (PowerUpKind::ExtraLife, 5),
];

/// Weighted draw over `DROP_TABLE`, falling back to shotgun if the roll lands
/// past the last threshold
pub fn pick_kind<R: Rng>(rng: &mut R) -> PowerUpKind {
    weighted_choice(rng, &DROP_TABLE).unwrap_or(PowerUpKind::Shotgun)
}

/// Field pickup left behind by a special circle
pub fn drop_at(state: &mut GameState, pos: Vec2) -> PowerUp {
    let kind = pick_kind(&mut state.rng);
    let id = state.next_power_up_id();
    log::debug!("Dropped {:?} power-up #{} at ({:.0}, {:.0})", kind, id, pos.x, pos.y);
    PowerUp {
        id,
        pos,
        kind,
        spawned_ms: state.now_ms,
        lifetime_ms: POWERUP_LIFETIME_MS,
        just_dropped: true,
    }
}

/// What a collected pickup did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppliedEffect {
    /// A timed effect was armed (or its timer restarted)
    Timed(EffectKind),
    ExtraLife,
    Points(u64),
    /// Score awarded; the tick engine must clear the field and advance the level
    Nuke,
}

/// Apply a pickup to the run and show its banner
pub fn apply(state: &mut GameState, kind: PowerUpKind) -> AppliedEffect {
    log::debug!("Collected {:?}", kind);
    state.show_message(kind.message());

    match kind {
        PowerUpKind::Shotgun => {
            state.effects.arm(EffectKind::Shotgun, state.now_ms);
            AppliedEffect::Timed(EffectKind::Shotgun)
        }
        PowerUpKind::Bounce => {
            state.effects.arm(EffectKind::Bounce, state.now_ms);
            AppliedEffect::Timed(EffectKind::Bounce)
        }
        PowerUpKind::Invincibility => {
            state.effects.arm(EffectKind::Invincibility, state.now_ms);
            player::start_blink(state, INVINCIBILITY_DURATION_MS);
            AppliedEffect::Timed(EffectKind::Invincibility)
        }
        PowerUpKind::ExtraLife => {
            state.player.lives = state.player.lives.saturating_add(1);
            AppliedEffect::ExtraLife
        }
        PowerUpKind::Points100 => {
            state.player.score += POINTS_BONUS;
            AppliedEffect::Points(POINTS_BONUS)
        }
        PowerUpKind::Nuke => {
            state.player.score += NUKE_BONUS;
            AppliedEffect::Nuke
        }
    }
}

/// Drop field pickups past their lifetime and effects past their duration
pub fn expire(state: &mut GameState) {
    let now = state.now_ms;
    state.power_ups.retain(|p| !p.is_expired(now));
    for kind in state.effects.expire(now) {
        log::debug!("{:?} wore off", kind);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highscores::HighScores;
    use crate::sim::state::{Playfield, PlayerPhase};
    use crate::sim::timers::TimerKind;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use std::collections::HashMap;

    fn state() -> GameState {
        GameState::new(3, Playfield::new(800.0, 600.0), HighScores::new())
    }

    #[test]
    fn test_drop_table_sums_to_100() {
        assert_eq!(DROP_TABLE.iter().map(|&(_, w)| w).sum::<u32>(), 100);
        for kind in PowerUpKind::ALL {
            assert!(DROP_TABLE.iter().any(|&(k, _)| k == kind));
        }
    }

    #[test]
    fn test_pick_kind_distribution() {
        let mut rng = Pcg32::seed_from_u64(77);
        let mut counts: HashMap<PowerUpKind, u32> = HashMap::new();
        for _ in 0..20_000 {
            *counts.entry(pick_kind(&mut rng)).or_default() += 1;
        }
        let share = |k| counts.get(&k).copied().unwrap_or(0) as f32 / 20_000.0;
        assert!((share(PowerUpKind::Shotgun) - 0.25).abs() < 0.02);
        assert!((share(PowerUpKind::Nuke) - 0.10).abs() < 0.02);
        assert!((share(PowerUpKind::ExtraLife) - 0.05).abs() < 0.015);
    }

    #[test]
    fn test_drop_is_just_dropped() {
        let mut s = state();
        s.now_ms = 1234;
        let p = drop_at(&mut s, Vec2::new(10.0, 20.0));
        assert!(p.just_dropped);
        assert_eq!(p.spawned_ms, 1234);
        assert_eq!(p.lifetime_ms, POWERUP_LIFETIME_MS);
        assert_ne!(drop_at(&mut s, Vec2::ZERO).id, p.id);
    }

    #[test]
    fn test_immediate_effects() {
        let mut s = state();
        assert_eq!(apply(&mut s, PowerUpKind::ExtraLife), AppliedEffect::ExtraLife);
        assert_eq!(s.player.lives, STARTING_LIVES + 1);
        assert_eq!(apply(&mut s, PowerUpKind::Points100), AppliedEffect::Points(100));
        assert_eq!(s.player.score, 100);
        assert_eq!(apply(&mut s, PowerUpKind::Nuke), AppliedEffect::Nuke);
        assert_eq!(s.player.score, 350);
        assert_eq!(s.message.as_deref(), Some("NUKE! +250"));
    }

    #[test]
    fn test_timed_effect_and_message_replacement() {
        let mut s = state();
        apply(&mut s, PowerUpKind::Shotgun);
        assert!(s.is_active(EffectKind::Shotgun));
        assert_eq!(s.weapon_name(), "Shotgun");
        apply(&mut s, PowerUpKind::Bounce);
        assert_eq!(s.message.as_deref(), Some("Bounce!"));
        assert_eq!(s.timers.pending(TimerKind::MessageExpiry), 1);
    }

    #[test]
    fn test_invincibility_starts_blink_without_immunity() {
        let mut s = state();
        apply(&mut s, PowerUpKind::Invincibility);
        assert!(s.is_active(EffectKind::Invincibility));
        assert!(s.player.blink.is_some());
        assert!(!s.player.immune);
        assert_eq!(s.player.phase, PlayerPhase::Active);
    }

    #[test]
    fn test_expire_removes_stale_entries() {
        let mut s = state();
        s.effects.arm(EffectKind::Bounce, 0);
        let p = drop_at(&mut s, Vec2::ZERO);
        s.power_ups.push(p);
        s.now_ms = POWERUP_LIFETIME_MS;
        expire(&mut s);
        assert!(s.power_ups.is_empty());
        assert!(s.effects.bounce.is_some());
        s.now_ms = BOUNCE_DURATION_MS + 1;
        expire(&mut s);
        assert!(s.effects.bounce.is_none());
    }

    proptest! {
        #[test]
        fn prop_one_active_entry_per_kind(picks in prop::collection::vec(0usize..6, 1..40)) {
            let mut s = state();
            for (i, idx) in picks.into_iter().enumerate() {
                s.now_ms = i as u64 * 700;
                apply(&mut s, PowerUpKind::ALL[idx]);
                let kinds: Vec<_> = s.effects.iter().map(|(k, _)| k).collect();
                let mut unique = kinds.clone();
                unique.dedup();
                prop_assert_eq!(kinds.len(), unique.len());
                prop_assert!(kinds.len() <= 3);
            }
        }
    }
}
