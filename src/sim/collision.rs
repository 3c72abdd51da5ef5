//! Collision detection and boundary response
//!
//! Everything in the playfield is a circle: targets, shots, pickups and the
//! player. Overlap is strict (`distance < r1 + r2`), touching does not count.

use glam::Vec2;

use super::state::Playfield;
use crate::distance;

/// Strict circle/circle overlap test
#[inline]
pub fn circles_overlap(a: Vec2, a_radius: f32, b: Vec2, b_radius: f32) -> bool {
    distance(a, b) < a_radius + b_radius
}

/// Keep a body of the given `margin` (its radius, or 0 for a point) inside
/// the playfield.
///
/// For each axis where `pos ± margin` leaves the field the velocity component
/// is inverted and the position is clamped back to `[margin, extent - margin]`.
pub fn reflect_inside(pos: &mut Vec2, vel: &mut Vec2, margin: f32, field: &Playfield) {
    if pos.x - margin < 0.0 || pos.x + margin > field.width {
        vel.x = -vel.x;
    }
    if pos.y - margin < 0.0 || pos.y + margin > field.height {
        vel.y = -vel.y;
    }

    // max/min rather than clamp: a field narrower than the body must not panic
    pos.x = pos.x.min(field.width - margin).max(margin);
    pos.y = pos.y.min(field.height - margin).max(margin);
}

/// Clamp a point into the field keeping `margin` clearance on each side
#[inline]
pub fn clamp_inside(pos: Vec2, margin: f32, field: &Playfield) -> Vec2 {
    Vec2::new(
        pos.x.min(field.width - margin).max(margin),
        pos.y.min(field.height - margin).max(margin),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(w: f32, h: f32) -> Playfield {
        Playfield::new(w, h).unwrap()
    }

    #[test]
    fn test_overlap_is_strict() {
        assert!(circles_overlap(Vec2::ZERO, 5.0, Vec2::new(9.0, 0.0), 5.0));
        assert!(!circles_overlap(Vec2::ZERO, 5.0, Vec2::new(10.0, 0.0), 5.0));
    }

    #[test]
    fn test_reflect_inside_flips_violated_axis_only() {
        let f = field(200.0, 200.0);
        let mut pos = Vec2::new(175.0, 100.0);
        let mut vel = Vec2::new(5.0, 1.0);
        reflect_inside(&mut pos, &mut vel, 30.0, &f);
        assert_eq!(vel, Vec2::new(-5.0, 1.0));
        assert_eq!(pos, Vec2::new(170.0, 100.0));
    }

    #[test]
    fn test_reflect_inside_point_on_corner() {
        let f = field(100.0, 100.0);
        let mut pos = Vec2::new(-2.0, 103.0);
        let mut vel = Vec2::new(-8.0, 8.0);
        reflect_inside(&mut pos, &mut vel, 0.0, &f);
        assert_eq!(vel, Vec2::new(8.0, -8.0));
        assert_eq!(pos, Vec2::new(0.0, 100.0));
    }

    #[test]
    fn test_inside_body_untouched() {
        let f = field(100.0, 100.0);
        let mut pos = Vec2::new(50.0, 50.0);
        let mut vel = Vec2::new(1.0, -1.0);
        reflect_inside(&mut pos, &mut vel, 10.0, &f);
        assert_eq!(vel, Vec2::new(1.0, -1.0));
        assert_eq!(pos, Vec2::new(50.0, 50.0));
    }

    #[test]
    fn test_clamp_inside_tiny_field_does_not_panic() {
        let f = field(10.0, 10.0);
        let p = clamp_inside(Vec2::new(50.0, -5.0), 20.0, &f);
        assert!(p.x.is_finite() && p.y.is_finite());
    }
}
