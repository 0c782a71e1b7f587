//! Скалярные helpers для интеграторов (lerp, move_towards, smooth_damp)

use bevy::prelude::*;
use std::f32::consts::{PI, TAU};

/// Линейная интерполяция без clamp по `t`
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Сдвигает `current` к `target` не более чем на `max_delta`
pub fn move_towards(current: f32, target: f32, max_delta: f32) -> f32 {
    let diff = target - current;
    if diff.abs() <= max_delta {
        target
    } else {
        current + diff.signum() * max_delta
    }
}

/// Угол в диапазоне (-π, π]
pub fn wrap_angle(angle: f32) -> f32 {
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI {
        wrapped + TAU
    } else {
        wrapped
    }
}

/// Critically damped сглаживание позиции (аналог SmoothDamp)
///
/// `velocity`: внутреннее состояние, хранится между кадрами.
/// Не перескакивает target.
pub fn smooth_damp(current: Vec3, target: Vec3, velocity: &mut Vec3, smooth_time: f32, dt: f32) -> Vec3 {
    if dt <= 0.0 {
        return current;
    }

    let smooth_time = smooth_time.max(1e-4);
    let omega = 2.0 / smooth_time;
    let x = omega * dt;
    let decay = 1.0 / (1.0 + x + 0.48 * x * x + 0.235 * x * x * x);

    let change = current - target;
    let temp = (*velocity + omega * change) * dt;
    *velocity = (*velocity - omega * temp) * decay;

    let output = target + (change + temp) * decay;

    // Overshoot: если прошли через target: фиксируемся на нём
    if (target - current).dot(output - target) > 0.0 {
        *velocity = Vec3::ZERO;
        return target;
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_towards_does_not_overshoot() {
        assert_eq!(move_towards(0.0, 10.0, 3.0), 3.0);
        assert_eq!(move_towards(9.0, 10.0, 3.0), 10.0);
        assert_eq!(move_towards(5.0, -5.0, 2.0), 3.0);
    }

    #[test]
    fn test_wrap_angle_range() {
        assert!((wrap_angle(3.0 * PI) - PI).abs() < 1e-5);
        assert!((wrap_angle(-PI) - PI).abs() < 1e-5);
        assert!((wrap_angle(0.5) - 0.5).abs() < 1e-6);
        assert!((wrap_angle(-TAU - 0.25) + 0.25).abs() < 1e-5);
    }

    #[test]
    fn test_smooth_damp_converges_without_overshoot() {
        let target = Vec3::new(10.0, 0.0, 0.0);
        let mut pos = Vec3::ZERO;
        let mut velocity = Vec3::ZERO;

        for _ in 0..600 {
            pos = smooth_damp(pos, target, &mut velocity, 0.2, 1.0 / 60.0);
            assert!(pos.x <= target.x + 1e-4, "overshoot: {}", pos.x);
        }

        assert!(pos.distance(target) < 0.01);
    }
}
