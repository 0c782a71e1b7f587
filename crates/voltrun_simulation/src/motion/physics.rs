//! Ride physics (FixedUpdate): clamp скорости, прыжки, гравитация, земля
//!
//! Только вертикаль и ограничение скорости. Горизонтальное движение
//! ведёт drive_bikes в Update.

use bevy::prelude::*;

use super::events::{GroundContactLost, Landed, LaunchImpulse};
use crate::components::{Bike, BikeMotion, BikeTuning, BoostConfig};
use crate::logger;
use crate::GroundLevel;

/// Прыжки длиннее этого логируются как big air (секунды)
pub const BIG_AIR_TIME: f32 = 1.0;

/// Система: вертикальные импульсы (трамплины)
pub fn apply_launch_impulses(mut impulses: EventReader<LaunchImpulse>, mut bikes: Query<&mut BikeMotion>) {
    for impulse in impulses.read() {
        if let Ok(mut motion) = bikes.get_mut(impulse.bike) {
            motion.vertical_velocity += impulse.vertical_speed;
        }
    }
}

/// Система: |speed| ≤ max_speed × boost multiplier
pub fn clamp_bike_speed(mut bikes: Query<(&mut BikeMotion, &BikeTuning, &BoostConfig)>) {
    for (mut motion, tuning, boost) in bikes.iter_mut() {
        let multiplier = if motion.boost.is_active() { boost.multiplier } else { 1.0 };
        let limit = (tuning.max_speed * multiplier).max(0.0);
        motion.current_speed = motion.current_speed.clamp(-limit, limit);
    }
}

/// Система: сопротивление воздуха в прыжке
pub fn apply_air_drag(mut bikes: Query<(&mut BikeMotion, &BikeTuning)>, time: Res<Time<Fixed>>) {
    let delta = time.delta_secs();

    for (mut motion, tuning) in bikes.iter_mut() {
        if !motion.grounded {
            motion.current_speed *= (1.0 - tuning.air_drag * delta).max(0.0);
        }
    }
}

/// Система: гравитация + прижимная сила
///
/// Downforce ∝ скорости действует и в воздухе: быстрый байк прыгает
/// ниже и короче. На земле её съедает snap в ground_detection.
pub fn integrate_vertical(
    mut bikes: Query<(&mut Transform, &mut BikeMotion, &BikeTuning), With<Bike>>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (mut transform, mut motion, tuning) in bikes.iter_mut() {
        let speed_ratio = tuning.speed_fraction(motion.current_speed).min(1.0);
        let acceleration = tuning.gravity + tuning.downforce * speed_ratio;

        motion.vertical_velocity -= acceleration * delta;
        transform.translation.y += motion.vertical_velocity * delta;
    }
}

/// Система: ground detection против `GroundLevel`
///
/// Переходы grounded ↔ airborne пишут события; air_time копится в прыжке.
pub fn ground_detection(
    mut bikes: Query<(Entity, &mut Transform, &mut BikeMotion), With<Bike>>,
    ground: Res<GroundLevel>,
    mut lost: EventWriter<GroundContactLost>,
    mut landed: EventWriter<Landed>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (entity, mut transform, mut motion) in bikes.iter_mut() {
        let on_ground =
            transform.translation.y <= ground.height + ground.tolerance && motion.vertical_velocity <= 0.0;

        if on_ground {
            transform.translation.y = ground.height;
            motion.vertical_velocity = 0.0;

            if !motion.grounded {
                motion.grounded = true;
                let air_time = motion.air_time;
                motion.air_time = 0.0;

                if air_time > BIG_AIR_TIME {
                    logger::log_info(&format!("Bike {:?}: big air! {:.1}s", entity, air_time));
                }
                landed.write(Landed { bike: entity, air_time });
            }
        } else {
            if motion.grounded {
                motion.grounded = false;
                motion.air_time = 0.0;
                lost.write(GroundContactLost { bike: entity });
            }
            motion.air_time += delta;
        }
    }
}
