//! Drive система: input → скорость, heading, позиция

use bevy::prelude::*;

use super::events::BoostEnded;
use crate::components::{Battery, Bike, BikeMotion, BikeTuning, BoostConfig, DriveInput};
use crate::logger;

/// Система: один drive тик для каждого байка
///
/// Перемещение вдоль forward до поворота (heading применяется к следующему кадру).
/// Вертикаль не трогаем: её ведёт ride physics в FixedUpdate.
pub fn drive_bikes(
    mut bikes: Query<
        (
            Entity,
            &mut Transform,
            &mut BikeMotion,
            &BikeTuning,
            &BoostConfig,
            &DriveInput,
            &mut Battery,
        ),
        With<Bike>,
    >,
    mut ended: EventWriter<BoostEnded>,
    time: Res<Time>,
) {
    let delta = time.delta_secs();

    for (entity, mut transform, mut motion, tuning, boost, input, mut battery) in bikes.iter_mut() {
        let forward = motion.forward();
        let step = motion.drive(tuning, boost, input, &mut battery, delta);

        if step.boost_interrupted {
            logger::log_info(&format!("Bike {:?}: boost cut, battery empty", entity));
            ended.write(BoostEnded {
                bike: entity,
                interrupted: true,
            });
        }

        if step.stalled {
            continue;
        }

        transform.translation += forward * step.distance;
        transform.rotation = Quat::from_rotation_y(motion.heading);
    }
}

/// Bundle байка: позиция + heading (0 = смотрим в -Z)
pub fn bike_bundle(position: Vec3, heading: f32) -> impl Bundle {
    let motion = BikeMotion::with_heading(heading);
    (
        Bike,
        Transform::from_translation(position).with_rotation(Quat::from_rotation_y(motion.heading)),
        motion,
    )
}

/// Spawn байка через Commands
pub fn spawn_bike(commands: &mut Commands, position: Vec3, heading: f32) -> Entity {
    commands.spawn(bike_bundle(position, heading)).id()
}
