//! Player life/respawn state machine
//!
//! ```text
//! Active --hit--> Respawning --2s, lives > 0--> Active (immune, blinking for 5s)
//!                           \--2s, lives = 0--> GameOver
//! ```
//!
//! Timer callbacks land here from the tick engine's timer pump.

use super::state::{Blink, EffectKind, GameState, PlayerPhase};
use super::timers::TimerKind;
use crate::consts::*;
use crate::highscores::{LeaderboardEntry, SubmitError, clean_name};

/// How a respawn delay resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RespawnOutcome {
    Respawned { lives: u8 },
    GameOver { qualifies: bool },
}

/// Whether a circle touching the player right now would cost a life
pub fn can_be_hit(state: &GameState) -> bool {
    state.player.phase == PlayerPhase::Active
        && !state.player.immune
        && !state.is_active(EffectKind::Invincibility)
}

/// Start the respawn sequence. Returns false (and does nothing) if the hit
/// is ignored.
pub fn on_hit(state: &mut GameState) -> bool {
    if !can_be_hit(state) {
        return false;
    }
    log::debug!("Player hit at {}ms, {} lives left", state.now_ms, state.player.lives);

    stop_blink(state);
    let player = &mut state.player;
    player.immune = true;
    player.visible = false;
    player.phase = PlayerPhase::Respawning;
    state
        .timers
        .schedule(TimerKind::RespawnResolve, state.now_ms + RESPAWN_DELAY_MS);
    true
}

/// Fired `RESPAWN_DELAY_MS` after a hit: take the life and decide what's next
pub fn resolve_respawn(state: &mut GameState) -> RespawnOutcome {
    state.player.lives = state.player.lives.saturating_sub(1);

    if state.player.lives == 0 {
        state.player.phase = PlayerPhase::GameOver;
        let qualifies = state.leaderboard.qualifies(state.player.score);
        state.player.awaiting_name = qualifies;
        log::info!(
            "Game over: score {}, level {}, accuracy {:.1}%{}",
            state.player.score,
            state.player.level,
            state.player.accuracy(),
            if qualifies { " (top 10!)" } else { "" }
        );
        return RespawnOutcome::GameOver { qualifies };
    }

    state.player.phase = PlayerPhase::Active;
    state.player.visible = true;
    start_blink(state, RESPAWN_IMMUNITY_MS);
    state.timers.cancel_kind(TimerKind::ImmunityEnd);
    state
        .timers
        .schedule(TimerKind::ImmunityEnd, state.now_ms + RESPAWN_IMMUNITY_MS);
    RespawnOutcome::Respawned {
        lives: state.player.lives,
    }
}

/// Immunity ends on its own timer, not when the blink animation stops
pub fn end_immunity(state: &mut GameState) {
    state.player.immune = false;
}

/// Begin a visibility blink lasting `duration_ms`, replacing any running one.
/// The first toggle happens immediately.
pub fn start_blink(state: &mut GameState, duration_ms: u64) {
    stop_blink(state);
    state.player.blink = Some(Blink {
        interval_ms: BLINK_START_INTERVAL_MS,
        elapsed_ms: 0.0,
        duration_ms,
        shown: false,
        next_due_ms: state.now_ms,
        timer: None,
    });
    blink_step(state);
}

/// One toggle of the blink animation
pub fn blink_step(state: &mut GameState) {
    let hidden_for_respawn = state.player.is_respawning();
    let Some(blink) = state.player.blink.as_mut() else {
        return;
    };

    blink.shown = !blink.shown;
    blink.elapsed_ms += blink.interval_ms;

    if blink.elapsed_ms >= blink.duration_ms as f32 {
        state.player.blink = None;
        if !hidden_for_respawn {
            state.player.visible = true;
        }
        return;
    }

    blink.interval_ms = (blink.interval_ms * BLINK_DECAY).max(BLINK_MIN_INTERVAL_MS);
    let due = blink.next_due_ms + blink.interval_ms.round() as u64;
    blink.next_due_ms = due;
    blink.timer = Some(state.timers.schedule(TimerKind::BlinkToggle, due));
    if !hidden_for_respawn {
        state.player.visible = blink.shown;
    }
}

/// Close the game-over name prompt with a candidate entry for the host to
/// persist. An empty name leaves the prompt open.
pub fn submit_high_score(
    state: &mut GameState,
    name: &str,
    date: String,
) -> Result<LeaderboardEntry, SubmitError> {
    if !state.player.awaiting_name {
        return Err(SubmitError::NoPendingPrompt);
    }
    let name = clean_name(name).ok_or(SubmitError::EmptyName)?;
    state.player.awaiting_name = false;

    let player = &state.player;
    let entry = LeaderboardEntry {
        name,
        score: player.score,
        accuracy: player.accuracy(),
        time_secs: player.elapsed_secs,
        level: player.level,
        date,
    };
    let rank = state.leaderboard.add_entry(entry.clone());
    log::info!("High score for {} recorded at rank {:?}", entry.name, rank);
    Ok(entry)
}

fn stop_blink(state: &mut GameState) {
    if let Some(timer) = state.player.blink.take().and_then(|b| b.timer) {
        state.timers.cancel(timer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highscores::HighScores;
    use crate::sim::state::Playfield;

    fn state() -> GameState {
        GameState::new(5, Playfield::new(800.0, 600.0), HighScores::new())
    }

    /// Advance the clock firing only player timers
    fn run_until(state: &mut GameState, until_ms: u64) {
        while state.now_ms < until_ms {
            state.now_ms += TICK_MS;
            while let Some((_, kind)) = state.timers.pop_due(state.now_ms) {
                match kind {
                    TimerKind::RespawnResolve => {
                        resolve_respawn(state);
                    }
                    TimerKind::BlinkToggle => blink_step(state),
                    TimerKind::ImmunityEnd => end_immunity(state),
                    _ => {}
                }
            }
        }
    }

    #[test]
    fn test_hit_hides_player_and_ignores_reentry() {
        let mut s = state();
        assert!(on_hit(&mut s));
        assert!(s.player.immune);
        assert!(!s.player.visible);
        assert!(s.player.is_respawning());
        assert!(!on_hit(&mut s));
        assert_eq!(s.timers.pending(TimerKind::RespawnResolve), 1);
        assert_eq!(s.player.lives, STARTING_LIVES);
    }

    #[test]
    fn test_life_taken_after_delay_then_immunity_window() {
        let mut s = state();
        on_hit(&mut s);
        run_until(&mut s, RESPAWN_DELAY_MS - TICK_MS);
        assert_eq!(s.player.lives, 3);
        run_until(&mut s, RESPAWN_DELAY_MS + TICK_MS);
        assert_eq!(s.player.lives, 2);
        assert_eq!(s.player.phase, PlayerPhase::Active);
        assert!(s.player.immune);
        assert!(s.player.blink.is_some());

        // Still immune just before the 5s window closes
        run_until(&mut s, RESPAWN_DELAY_MS + RESPAWN_IMMUNITY_MS - TICK_MS);
        assert!(s.player.immune);
        assert!(!on_hit(&mut s));

        run_until(&mut s, RESPAWN_DELAY_MS + RESPAWN_IMMUNITY_MS + TICK_MS);
        assert!(!s.player.immune);
        assert!(s.player.visible);
        assert!(s.player.blink.is_none());
    }

    #[test]
    fn test_three_hits_end_the_run() {
        let mut s = state();
        for expected in [2u8, 1] {
            assert!(on_hit(&mut s));
            let until = s.now_ms + RESPAWN_DELAY_MS + RESPAWN_IMMUNITY_MS + 100;
            run_until(&mut s, until);
            assert_eq!(s.player.lives, expected);
            assert_eq!(s.player.phase, PlayerPhase::Active);
        }
        assert!(on_hit(&mut s));
        let until = s.now_ms + RESPAWN_DELAY_MS + 100;
        run_until(&mut s, until);
        assert_eq!(s.player.lives, 0);
        assert!(s.player.is_game_over());
        // Empty leaderboard: any score makes the top 10
        assert!(s.player.awaiting_name);
        assert!(!on_hit(&mut s));
    }

    #[test]
    fn test_game_over_without_qualifying() {
        let mut board = HighScores::new();
        for i in 0..10 {
            board.add_entry(LeaderboardEntry {
                name: format!("p{i}"),
                score: 1_000 + i,
                accuracy: 50.0,
                time_secs: 60,
                level: 3,
                date: "1/1/2026".into(),
            });
        }
        let mut s = GameState::new(5, Playfield::new(800.0, 600.0), board);
        s.player.lives = 1;
        on_hit(&mut s);
        assert_eq!(resolve_respawn(&mut s), RespawnOutcome::GameOver { qualifies: false });
        assert!(!s.player.awaiting_name);
    }

    #[test]
    fn test_submit_high_score() {
        let mut s = state();
        assert_eq!(
            submit_high_score(&mut s, "Ada", "1/1/2026".into()),
            Err(SubmitError::NoPendingPrompt)
        );

        s.player.lives = 1;
        s.player.score = 420;
        s.player.level = 3;
        s.player.shots_fired = 8;
        s.player.shots_hit = 3;
        on_hit(&mut s);
        resolve_respawn(&mut s);
        assert!(s.player.awaiting_name);

        assert_eq!(
            submit_high_score(&mut s, "   ", "1/1/2026".into()),
            Err(SubmitError::EmptyName)
        );
        assert!(s.player.awaiting_name);

        let entry = submit_high_score(&mut s, "  Ada Lovelace  ", "1/1/2026".into()).unwrap();
        assert_eq!(entry.name, "Ada Lovelace");
        assert_eq!(entry.score, 420);
        assert_eq!(entry.level, 3);
        assert_eq!(entry.accuracy, 37.5);
        assert_eq!(entry.date, "1/1/2026");
        assert!(!s.player.awaiting_name);
        assert_eq!(s.leaderboard.top_score(), Some(420));
        assert_eq!(
            submit_high_score(&mut s, "again", "1/1/2026".into()),
            Err(SubmitError::NoPendingPrompt)
        );
    }

    #[test]
    fn test_invincibility_blocks_hits() {
        let mut s = state();
        s.effects.arm(EffectKind::Invincibility, s.now_ms);
        assert!(!can_be_hit(&s));
        assert!(!on_hit(&mut s));
        assert_eq!(s.player.phase, PlayerPhase::Active);
    }

    #[test]
    fn test_blink_interval_decays_to_floor() {
        let mut s = state();
        start_blink(&mut s, 30_000);
        let mut last = BLINK_START_INTERVAL_MS;
        for _ in 0..40 {
            let interval = s.player.blink.unwrap().interval_ms;
            assert!(interval <= last);
            assert!(interval >= BLINK_MIN_INTERVAL_MS);
            last = interval;
            blink_step(&mut s);
        }
        assert_eq!(s.player.blink.unwrap().interval_ms, BLINK_MIN_INTERVAL_MS);
    }

    #[test]
    fn test_blink_toggles_visibility() {
        let mut s = state();
        start_blink(&mut s, RESPAWN_IMMUNITY_MS);
        let first = s.player.visible;
        blink_step(&mut s);
        assert_ne!(s.player.visible, first);
    }
}
