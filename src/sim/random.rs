//! Random content helpers: bounded positions with rejection, weighted picks

use glam::Vec2;
use rand::Rng;

use super::state::{CircleKind, Playfield, Special};
use crate::consts::SPECIAL_CHANCE;

/// Uniform position keeping `margin` clearance from every edge.
/// `None` when the field is too small to fit the margin.
pub fn random_position<R: Rng>(rng: &mut R, field: &Playfield, margin: f32) -> Option<Vec2> {
    let span_x = field.width - margin * 2.0;
    let span_y = field.height - margin * 2.0;
    if span_x <= 0.0 || span_y <= 0.0 {
        return None;
    }
    Some(Vec2::new(
        rng.random::<f32>() * span_x + margin,
        rng.random::<f32>() * span_y + margin,
    ))
}

/// Rejection sampling: draw up to `attempts` positions and return the first
/// one `accept` allows.
pub fn sample_position<R, F>(
    rng: &mut R,
    field: &Playfield,
    margin: f32,
    attempts: u32,
    accept: F,
) -> Option<Vec2>
where
    R: Rng,
    F: Fn(Vec2) -> bool,
{
    for _ in 0..attempts {
        let candidate = random_position(rng, field, margin)?;
        if accept(candidate) {
            return Some(candidate);
        }
    }
    None
}

/// Cumulative-threshold selection for a roll in `[0, total_weight)`
pub fn weighted_pick<T: Copy>(table: &[(T, u32)], roll: f32) -> Option<T> {
    let mut threshold = 0.0;
    for &(item, weight) in table {
        threshold += weight as f32;
        if roll < threshold {
            return Some(item);
        }
    }
    None
}

/// Draw once and select from a weight table
pub fn weighted_choice<R: Rng, T: Copy>(rng: &mut R, table: &[(T, u32)]) -> Option<T> {
    let total: u32 = table.iter().map(|&(_, w)| w).sum();
    if total == 0 {
        return None;
    }
    let roll = rng.random::<f32>() * total as f32;
    weighted_pick(table, roll)
}

/// 5% chance for a fresh small circle to start special
pub fn roll_special<R: Rng>(rng: &mut R, kind: CircleKind, now_ms: u64) -> Option<Special> {
    if kind == CircleKind::Small && rng.random_bool(SPECIAL_CHANCE) {
        Some(Special::starting_at(now_ms))
    } else {
        None
    }
}
