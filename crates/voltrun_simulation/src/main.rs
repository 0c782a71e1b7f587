//! Headless симуляция VOLTRUN
//!
//! Байк игрока на автопилоте ездит к активной точке доставки.
//! Печатает HUD snapshot раз в секунду симуляции.

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use std::time::Duration;

use voltrun_simulation::battery::charging_station_bundle;
use voltrun_simulation::camera::{chase_camera_bundle, obstacle_bundle};
use voltrun_simulation::delivery::delivery_point_bundle;
use voltrun_simulation::motion::bike_bundle;
use voltrun_simulation::{
    create_headless_app, BikeMotion, BoostConfig, ChaseCameraSettings, DeliveryTimer, DriveInput, Player, RideHud,
    SimulationPlugin,
};

/// Автопилот: рулим на активную точку, boost на длинных прямых
fn autopilot(
    timer: Res<DeliveryTimer>,
    points: Query<&Transform, Without<Player>>,
    mut bikes: Query<(&Transform, &BikeMotion, &mut DriveInput), With<Player>>,
) {
    let Ok((transform, motion, mut input)) = bikes.single_mut() else {
        return;
    };

    let Some(goal) = timer.active_point().and_then(|point| points.get(point).ok()) else {
        *input = DriveInput::default();
        return;
    };

    let to_goal = goal.translation - transform.translation;
    let planar = Vec3::new(to_goal.x, 0.0, to_goal.z);
    let forward = motion.forward();
    // Положительный cross.y: цель слева
    let side = forward.cross(planar.normalize_or_zero()).y;

    input.throttle = if planar.length() > 4.0 { 1.0 } else { 0.3 };
    input.steer = (-side * 2.0).clamp(-1.0, 1.0);
    input.boost = planar.length() > 60.0 && side.abs() < 0.1 && !motion.boost.is_active();
}

fn main() {
    let seed = 42;
    println!("Starting VOLTRUN headless simulation (seed: {})", seed);

    let mut app = create_headless_app(seed);
    app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(1.0 / 60.0)))
        .add_plugins(SimulationPlugin)
        .add_systems(Update, autopilot.before(voltrun_simulation::SimSet::Input));

    let world = app.world_mut();
    let bike = world
        .spawn((bike_bundle(Vec3::ZERO, 0.0), Player, BoostConfig::enabled()))
        .id();
    world.spawn(chase_camera_bundle(bike, ChaseCameraSettings::default()));

    world.spawn(delivery_point_bundle("DeliveryPoint_Harbor", Vec3::new(40.0, 0.0, -60.0), 3.0));
    world.spawn(delivery_point_bundle("DeliveryPoint_Bakery", Vec3::new(-50.0, 0.0, -20.0), 3.0));
    world.spawn(delivery_point_bundle("DeliveryPoint_Station", Vec3::new(10.0, 0.0, 80.0), 3.0));
    world.spawn(charging_station_bundle(Vec3::new(0.0, 0.0, 10.0), 3.0));
    world.spawn(obstacle_bundle(Vec3::new(0.0, 2.0, 6.0), Vec3::new(3.0, 2.0, 0.5)));

    // 3 минуты симуляции
    for tick in 0..(60 * 180) {
        app.update();

        if tick % 60 == 0 {
            let hud = app.world().resource::<RideHud>();
            let bike = hud.bike.clone().unwrap_or_default();
            let waypoint = hud
                .waypoint
                .as_ref()
                .map(|waypoint| format!("{} {}", waypoint.label, waypoint.distance_text))
                .unwrap_or_else(|| "-".to_string());

            println!(
                "t={:>3}s battery {:>3}% speed {:>3} km/h | {} ({:?}) → {} | done {} ${:.0}",
                tick / 60,
                bike.battery_percent,
                bike.speed_kmh,
                hud.delivery.timer_text,
                hud.delivery.urgency,
                waypoint,
                hud.delivery.completed,
                hud.delivery.total_earnings
            );
        }
    }

    println!("Simulation complete!");
}
