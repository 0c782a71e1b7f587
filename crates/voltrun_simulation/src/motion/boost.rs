//! Boost системы: активация, force stop, таймеры

use bevy::prelude::*;

use super::events::{ActivateBoost, BoostActivated, BoostEnded, BoostReady, BoostRejectedEvent, ForceStop};
use crate::components::{Battery, BikeMotion, BoostConfig, BoostTransition, DriveInput};
use crate::logger;

/// Система: запросы boost (DriveInput::boost + ActivateBoost)
///
/// Несколько запросов одного байка за кадр схлопываются в один,
/// поэтому cost списывается не больше одного раза.
/// `DriveInput::boost`: одноразовый запрос, сбрасывается после обработки.
pub fn handle_boost_requests(
    mut requests: EventReader<ActivateBoost>,
    mut bikes: Query<(&mut BikeMotion, &BoostConfig, &mut Battery)>,
    mut inputs: Query<(Entity, &mut DriveInput)>,
    mut activated: EventWriter<BoostActivated>,
    mut rejected: EventWriter<BoostRejectedEvent>,
) {
    let mut pending: Vec<Entity> = Vec::new();

    for (entity, mut input) in inputs.iter_mut() {
        if input.boost {
            input.boost = false;
            pending.push(entity);
        }
    }
    for request in requests.read() {
        if !pending.contains(&request.bike) {
            pending.push(request.bike);
        }
    }

    for bike in pending {
        let Ok((mut motion, config, mut battery)) = bikes.get_mut(bike) else {
            logger::log_warning(&format!("Boost request for non-bike entity {:?}", bike));
            continue;
        };

        match motion.activate_boost(config, &mut battery) {
            Ok(()) => {
                logger::log_info(&format!(
                    "Bike {:?}: boost activated (-{:.1}, battery {:.1})",
                    bike,
                    config.cost,
                    battery.level()
                ));
                activated.write(BoostActivated {
                    bike,
                    cost: config.cost,
                    duration: config.duration,
                });
            }
            Err(reason) => {
                logger::log(&format!("Bike {:?}: boost rejected: {}", bike, reason));
                rejected.write(BoostRejectedEvent { bike, reason });
            }
        }
    }
}

/// Система: ForceStop → speed 0, активный boost → Cooldown
pub fn handle_force_stop(
    mut requests: EventReader<ForceStop>,
    mut bikes: Query<(&mut BikeMotion, &BoostConfig)>,
    mut ended: EventWriter<BoostEnded>,
) {
    for request in requests.read() {
        let Ok((mut motion, config)) = bikes.get_mut(request.bike) else {
            continue;
        };

        if motion.force_stop(config) {
            ended.write(BoostEnded {
                bike: request.bike,
                interrupted: true,
            });
        }
    }
}

/// Система: boost таймеры (Active → Cooldown → Inactive)
pub fn tick_boost(
    mut bikes: Query<(Entity, &mut BikeMotion, &BoostConfig)>,
    mut ended: EventWriter<BoostEnded>,
    mut ready: EventWriter<BoostReady>,
    time: Res<Time>,
) {
    let delta = time.delta_secs();

    for (bike, mut motion, config) in bikes.iter_mut() {
        match motion.boost.tick(delta, config.cooldown) {
            Some(BoostTransition::Ended) => {
                ended.write(BoostEnded {
                    bike,
                    interrupted: false,
                });
            }
            Some(BoostTransition::Ready) => {
                ready.write(BoostReady { bike });
            }
            None => {}
        }
    }
}
