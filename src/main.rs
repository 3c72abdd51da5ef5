//! Gun Game entry point
//!
//! Native builds run a headless auto-aim session against the simulation and
//! log the result. The browser entry point lives in `gun_game::web`.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use gun_game::consts::*;
    use gun_game::sim::{GameState, TickInput, submit_high_score, tick};
    use gun_game::{HighScores, Settings, format_time};

    env_logger::init();
    log::info!("Gun Game (native) starting...");

    // Date label for a leaderboard entry, e.g. `gun-game 10/18/2026`
    let date = std::env::args().nth(1).unwrap_or_else(|| "-".to_string());
    let settings = Settings::load();
    let seed = settings.resolve_seed();
    let playfield = settings.playfield();
    if playfield.is_none() {
        log::warn!(
            "Playfield {}x{} is unusable, nothing will move",
            settings.playfield_width,
            settings.playfield_height
        );
    }

    let mut state = GameState::new(seed, playfield, HighScores::load());
    log::info!("Seed {seed}, running up to {} ticks", settings.max_ticks);

    let mut input = TickInput::default();
    for n in 0..settings.max_ticks {
        input.fire = aim(&state);
        let report = tick(&mut state, &input);

        if let Some(cleared) = report.level_cleared {
            log::info!(
                "Tick {n}: level {} cleared, score {}",
                cleared.level,
                state.player.score
            );
        }
        if state.player.is_game_over() {
            break;
        }
    }

    if state.player.awaiting_name {
        match submit_high_score(&mut state, "AUTO", date) {
            Ok(_) => state.leaderboard.save(),
            Err(e) => log::warn!("High score not recorded: {e}"),
        }
    }

    let player = &state.player;
    log::info!(
        "Finished: score {}, level {}, lives {}/{}, accuracy {:.1}%, time {}",
        player.score,
        player.level,
        player.lives,
        STARTING_LIVES,
        player.accuracy(),
        format_time(player.elapsed_secs)
    );
}

/// Fire at the nearest circle whenever a shot is loaded
#[cfg(not(target_arch = "wasm32"))]
fn aim(state: &gun_game::sim::GameState) -> Option<f32> {
    if state.player.shots_available == 0 {
        return None;
    }
    let origin = state.playfield?.center();
    let target = state.circles.iter().min_by(|a, b| {
        a.pos
            .distance_squared(origin)
            .total_cmp(&b.pos.distance_squared(origin))
    })?;
    let to = target.pos - origin;
    Some(to.y.atan2(to.x))
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is gun_game::web::start, this is just to satisfy the compiler
}
