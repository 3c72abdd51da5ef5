//! Circle spawning: level waves and split offspring

use glam::Vec2;
use rand::Rng;
use std::f32::consts::PI;

use super::collision::clamp_inside;
use super::random::{roll_special, sample_position};
use super::state::{Circle, CircleKind, Playfield};
use crate::consts::*;
use crate::{distance, velocity_from_angle};

/// Place `count` circles of one category away from the player.
///
/// Each circle gets `SPAWN_ATTEMPTS` tries at a position further than
/// `player_radius + size + SPAWN_CLEARANCE` from the player. A circle that
/// never finds room is left out, so the result may be shorter than `count`.
pub fn spawn_wave<R: Rng>(
    rng: &mut R,
    count: usize,
    kind: CircleKind,
    field: &Playfield,
    player_pos: Vec2,
    player_radius: f32,
    now_ms: u64,
) -> Vec<Circle> {
    let size = kind.size();
    let min_dist = player_radius + size + SPAWN_CLEARANCE;
    let mut circles = Vec::with_capacity(count);

    for _ in 0..count {
        let Some(pos) = sample_position(rng, field, size, SPAWN_ATTEMPTS, |p| {
            distance(p, player_pos) > min_dist
        }) else {
            continue;
        };
        let vel = Vec2::new(
            (rng.random::<f32>() - 0.5) * 2.0,
            (rng.random::<f32>() - 0.5) * 2.0,
        );
        let special = roll_special(rng, kind, now_ms);
        circles.push(Circle::new(kind, pos, vel).with_special(special));
    }

    if circles.len() < count {
        log::debug!("Placed {} of {} {:?} circles", circles.len(), count, kind);
    }
    circles
}

/// Offspring of a destroyed circle: two of the next smaller category,
/// nothing for small circles.
pub fn split_circle<R: Rng>(rng: &mut R, circle: &Circle, field: &Playfield, now_ms: u64) -> Vec<Circle> {
    let Some(kind) = circle.kind.split() else {
        return Vec::new();
    };
    let size = kind.size();

    (0..2)
        .map(|i| {
            let angle = PI * i as f32 + rng.random::<f32>() * SPLIT_JITTER;
            let speed = SPLIT_MIN_SPEED + rng.random::<f32>() * (SPLIT_MAX_SPEED - SPLIT_MIN_SPEED);
            let pos = clamp_inside(circle.pos + velocity_from_angle(angle, SPLIT_OFFSET), size, field);
            let special = roll_special(rng, kind, now_ms);
            Circle::new(kind, pos, velocity_from_angle(angle, speed)).with_special(special)
        })
        .collect()
}
