//! Battery системы: зарядка, tick, пороговые события

use bevy::prelude::*;

use super::events::{BatteryThresholdCrossed, ChargeRequest};
use crate::components::{Battery, BatteryThreshold, Bike, ChargeSource, ChargingStation, DriveInput};
use crate::logger;

/// Система: зарядные станции
///
/// В радиусе + `interact` → старт зарядки (source = Station).
/// Вне радиуса всех станций → стоп, но только своей сессии:
/// зарядка по `ChargeRequest` продолжается.
pub fn charging_station_proximity(
    stations: Query<(&Transform, &ChargingStation), Without<Bike>>,
    mut bikes: Query<(Entity, &Transform, &DriveInput, &mut Battery, &mut ChargeSource), With<Bike>>,
) {
    for (entity, transform, input, mut battery, mut source) in bikes.iter_mut() {
        // Сессию мог закрыть кто угодно (host Stop, ...)
        if !battery.is_charging() && *source != ChargeSource::Idle {
            *source = ChargeSource::Idle;
        }

        let in_range = stations.iter().any(|(station_transform, station)| {
            station_transform.translation.distance(transform.translation) <= station.range
        });

        if in_range && input.interact {
            if battery.start_charging() {
                *source = ChargeSource::Station;
                logger::log_info(&format!(
                    "Bike {:?} started charging ({:.1}/{:.1})",
                    entity,
                    battery.level(),
                    battery.capacity()
                ));
            }
        } else if !in_range && *source == ChargeSource::Station {
            battery.stop_charging();
            *source = ChargeSource::Idle;
            logger::log_info(&format!("Bike {:?} left charging station", entity));
        }
    }
}

/// Система: явные запросы зарядки от host'а
///
/// `Start` забирает сессию себе (уход от станции её не прервёт).
pub fn handle_charge_requests(
    mut requests: EventReader<ChargeRequest>,
    mut batteries: Query<(&mut Battery, Option<&mut ChargeSource>)>,
) {
    for request in requests.read() {
        let Ok((mut battery, source)) = batteries.get_mut(request.bike()) else {
            logger::log_warning(&format!("ChargeRequest for entity without Battery: {:?}", request.bike()));
            continue;
        };

        let next = match request {
            ChargeRequest::Start { .. } => {
                battery.start_charging();
                ChargeSource::Host
            }
            ChargeRequest::Stop { .. } => {
                battery.stop_charging();
                ChargeSource::Idle
            }
        };

        if let Some(mut source) = source {
            *source = next;
        }
    }
}

/// Система: drain при движении / зарядка
///
/// Движение = ненулевая ось `DriveInput` (даже если байк упёрся).
pub fn tick_battery(mut query: Query<(&mut Battery, Option<&DriveInput>)>, time: Res<Time>) {
    let delta = time.delta_secs();

    for (mut battery, input) in query.iter_mut() {
        let is_moving = input.is_some_and(DriveInput::is_moving);
        battery.tick(delta, is_moving);
    }
}

/// Система: пороговые события (после всех мутаций батареи за кадр)
pub fn emit_battery_thresholds(
    mut query: Query<(Entity, &mut Battery)>,
    mut crossed: EventWriter<BatteryThresholdCrossed>,
) {
    for (entity, mut battery) in query.iter_mut() {
        for threshold in battery.evaluate_thresholds() {
            match threshold {
                BatteryThreshold::Depleted => {
                    logger::log_warning(&format!("Bike {:?}: battery dead, motion halted", entity));
                }
                BatteryThreshold::Low | BatteryThreshold::Critical => {
                    logger::log_info(&format!(
                        "Bike {:?}: battery {:?} ({:.0}%)",
                        entity,
                        threshold,
                        battery.fraction() * 100.0
                    ));
                }
                BatteryThreshold::Full => {
                    logger::log(&format!("Bike {:?}: battery full", entity));
                }
            }

            crossed.write(BatteryThresholdCrossed { entity, threshold });
        }
    }
}

/// Bundle зарядной станции
pub fn charging_station_bundle(position: Vec3, range: f32) -> impl Bundle {
    (ChargingStation { range }, Transform::from_translation(position))
}
