//! Delivery системы: countdown, pickup, arrival, старт новой доставки

use bevy::prelude::*;
use rand::Rng;

use super::events::{DeliverAttempt, DeliveryCompleted, DeliveryFailed, DeliveryStarted, PackagePickedUp};
use super::timer::{DeliveryConfig, DeliveryTimer, DeliveryTransition};
use crate::components::{BikeMotion, DeliveryPoint, Package, Player, ProximityTrigger};
use crate::logger;
use crate::proximity::ProximityEntered;
use crate::DeterministicRng;

/// Система: countdown / restart пауза
///
/// Провал: посылка (если лежит) убирается, байки её теряют.
pub fn tick_delivery_timer(
    mut commands: Commands,
    mut timer: ResMut<DeliveryTimer>,
    config: Res<DeliveryConfig>,
    mut bikes: Query<&mut BikeMotion>,
    packages: Query<Entity, With<Package>>,
    mut failed: EventWriter<DeliveryFailed>,
    time: Res<Time>,
) {
    match timer.tick(time.delta_secs(), &config) {
        Some(DeliveryTransition::Expired { point }) => {
            logger::log_info(&format!("Delivery to {:?} failed: time is up", point));

            if let Some(package) = timer.package.take() {
                if packages.contains(package) {
                    commands.entity(package).despawn();
                }
            }
            for mut motion in bikes.iter_mut() {
                motion.carries_package = false;
            }

            failed.write(DeliveryFailed { point });
        }
        Some(DeliveryTransition::RestartDue) => {
            logger::log("Delivery restart delay elapsed");
        }
        None => {}
    }
}

/// Система: proximity байк ↔ посылка → pickup
pub fn pick_up_packages(
    mut commands: Commands,
    mut entered: EventReader<ProximityEntered>,
    mut timer: ResMut<DeliveryTimer>,
    packages: Query<Entity, With<Package>>,
    mut bikes: Query<&mut BikeMotion>,
    mut picked: EventWriter<PackagePickedUp>,
) {
    let mut taken: Vec<Entity> = Vec::new();

    for event in entered.read() {
        if taken.contains(&event.trigger) || !packages.contains(event.trigger) {
            continue;
        }
        let Ok(mut motion) = bikes.get_mut(event.bike) else {
            continue;
        };

        motion.carries_package = true;
        taken.push(event.trigger);
        commands.entity(event.trigger).despawn();
        if timer.package == Some(event.trigger) {
            timer.package = None;
        }

        logger::log_info(&format!("Bike {:?} picked up package {:?}", event.bike, event.trigger));
        picked.write(PackagePickedUp {
            bike: event.bike,
            package: event.trigger,
        });
    }
}

/// Система: прибытие в точку (proximity) или явный DeliverAttempt
pub fn handle_delivery_arrivals(
    mut entered: EventReader<ProximityEntered>,
    mut attempts: EventReader<DeliverAttempt>,
    mut timer: ResMut<DeliveryTimer>,
    config: Res<DeliveryConfig>,
    points: Query<&DeliveryPoint>,
    mut bikes: Query<&mut BikeMotion>,
    mut completed: EventWriter<DeliveryCompleted>,
) {
    let arrivals = entered
        .read()
        .filter(|event| points.contains(event.trigger))
        .map(|event| (event.bike, event.trigger))
        .chain(attempts.read().map(|attempt| (attempt.bike, attempt.point)));

    for (bike, point) in arrivals {
        let Ok(mut motion) = bikes.get_mut(bike) else {
            continue;
        };

        let Some(reward) = timer.try_deliver(point, motion.carries_package, &config) else {
            continue;
        };
        motion.carries_package = false;

        let label = points.get(point).map(DeliveryPoint::label).unwrap_or("?");
        logger::log_info(&format!(
            "Delivered to {} for ${:.0} (total ${:.0}, {} done)",
            label, reward, timer.stats.total_earnings, timer.stats.completed
        ));
        completed.write(DeliveryCompleted { bike, point, reward });
    }
}

/// Система: старт доставки из Idle
///
/// Точка: равномерно из фиксированного набора (порядок по entity index,
/// выбор через DeterministicRng). Посылка спавнится над байком игрока.
/// Нет точек или игрока → остаёмся в Idle, warning один раз.
pub fn start_deliveries(
    mut commands: Commands,
    mut timer: ResMut<DeliveryTimer>,
    config: Res<DeliveryConfig>,
    points: Query<(Entity, &DeliveryPoint)>,
    players: Query<&Transform, With<Player>>,
    mut rng: ResMut<DeterministicRng>,
    mut started: EventWriter<DeliveryStarted>,
) {
    if !config.autostart || !timer.is_idle() {
        return;
    }

    let mut candidates: Vec<(Entity, &DeliveryPoint)> = points.iter().collect();
    if candidates.is_empty() {
        if !timer.start_blocked_logged {
            logger::log_warning("No delivery points in the world, deliveries paused");
            timer.start_blocked_logged = true;
        }
        return;
    }

    let Some(player_transform) = players.iter().next() else {
        if !timer.start_blocked_logged {
            logger::log_warning("No Player bike, deliveries paused");
            timer.start_blocked_logged = true;
        }
        return;
    };
    timer.start_blocked_logged = false;

    candidates.sort_by_key(|(entity, _)| entity.index());
    let (point, delivery_point) = candidates[rng.rng.gen_range(0..candidates.len())];

    if !timer.start(point, &config) {
        return;
    }

    let package_position = player_transform.translation + Vec3::Y * config.package_spawn_height;
    let package = commands
        .spawn((
            Package,
            ProximityTrigger::new(config.pickup_radius),
            Transform::from_translation(package_position),
        ))
        .id();
    timer.package = Some(package);

    logger::log_info(&format!(
        "New delivery: {} ({:.0}s)",
        delivery_point.label(),
        config.time_limit
    ));
    started.write(DeliveryStarted {
        point,
        package,
        time_limit: config.time_limit,
    });
}

/// Bundle точки доставки
pub fn delivery_point_bundle(name: impl Into<String>, position: Vec3, radius: f32) -> impl Bundle {
    (
        DeliveryPoint::new(name),
        ProximityTrigger::new(radius),
        Transform::from_translation(position),
    )
}
