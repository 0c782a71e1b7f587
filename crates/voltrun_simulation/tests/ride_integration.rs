//! Integration тесты езды: батарея, boost, зарядка
//!
//! Полный SimulationPlugin, фиксированный шаг 1/60 через ManualDuration.

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use std::time::Duration;

use voltrun_simulation::battery::charging_station_bundle;
use voltrun_simulation::motion::bike_bundle;
use voltrun_simulation::{
    create_headless_app, ActivateBoost, Battery, BikeMotion, BoostActivated, BoostConfig, BoostRejected,
    BoostRejectedEvent, DriveInput, Player, SimulationPlugin,
};

#[derive(Resource, Default)]
struct BoostLog {
    activated: usize,
    rejected: Vec<BoostRejected>,
}

fn collect_boost(
    mut activated: EventReader<BoostActivated>,
    mut rejected: EventReader<BoostRejectedEvent>,
    mut log: ResMut<BoostLog>,
) {
    log.activated += activated.read().count();
    log.rejected.extend(rejected.read().map(|event| event.reason));
}

fn setup_app(seed: u64) -> App {
    let mut app = create_headless_app(seed);
    app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(1.0 / 60.0)))
        .add_plugins(SimulationPlugin)
        .init_resource::<BoostLog>()
        .add_systems(Last, collect_boost);
    app
}

fn input_mut(app: &mut App, bike: Entity) -> Mut<'_, DriveInput> {
    app.world_mut().get_mut::<DriveInput>(bike).unwrap()
}

#[test]
fn test_battery_stays_in_bounds_and_depletion_halts_bike() {
    let mut app = setup_app(1);
    let bike = app
        .world_mut()
        .spawn((
            bike_bundle(Vec3::ZERO, 0.0),
            Player,
            BoostConfig::enabled(),
            Battery::new(100.0).with_level(25.0).with_rates(2.0, 5.0),
        ))
        .id();

    let mut was_depleted = false;
    let mut halted_frames = 0;

    for frame in 0..(60 * 30) {
        {
            let mut input = input_mut(&mut app, bike);
            input.throttle = 1.0;
            input.steer = ((frame as f32) * 0.02).sin();
            input.boost = frame % 120 == 0;
        }
        app.update();

        let battery = *app.world().get::<Battery>(bike).unwrap();
        let motion = *app.world().get::<BikeMotion>(bike).unwrap();

        assert!(
            battery.level() >= 0.0 && battery.level() <= battery.capacity(),
            "frame {}: level {}",
            frame,
            battery.level()
        );

        // Пустая батарея на прошлом кадре → стоим на этом
        if was_depleted {
            assert_eq!(motion.current_speed, 0.0, "frame {}: bike moves on empty battery", frame);
            assert!(!motion.boost.is_active());
            halted_frames += 1;
        }
        was_depleted = battery.is_depleted();
    }

    assert!(halted_frames > 0, "battery never ran out");
}

#[test]
fn test_boost_cost_paid_once_and_refused_when_poor() {
    let mut app = setup_app(2);
    let rich = app
        .world_mut()
        .spawn((bike_bundle(Vec3::ZERO, 0.0), BoostConfig::enabled()))
        .id();
    let poor = app
        .world_mut()
        .spawn((
            bike_bundle(Vec3::new(10.0, 0.0, 0.0), 0.0),
            BoostConfig::enabled(),
            Battery::new(100.0).with_level(10.0),
        ))
        .id();

    app.update();

    input_mut(&mut app, rich).boost = true;
    app.world_mut().send_event(ActivateBoost { bike: rich });
    app.world_mut().send_event(ActivateBoost { bike: poor });
    app.update();

    let rich_level = app.world().get::<Battery>(rich).unwrap().level();
    // 15 за активацию + не больше одного кадра boost drain
    assert!(rich_level < 85.0 + 1e-3 && rich_level > 84.9, "rich level {}", rich_level);
    assert_eq!(app.world().get::<Battery>(poor).unwrap().level(), 10.0);

    let log = app.world().resource::<BoostLog>();
    assert_eq!(log.activated, 1);
    assert_eq!(
        log.rejected,
        vec![BoostRejected::InsufficientBattery { level: 10.0, cost: 15.0 }]
    );

    // Boost заканчивается, cooldown блокирует повтор
    for _ in 0..(60 * 4) {
        app.update();
    }
    app.world_mut().send_event(ActivateBoost { bike: rich });
    app.update();
    let log = app.world().resource::<BoostLog>();
    assert!(matches!(log.rejected.last(), Some(BoostRejected::CoolingDown { .. })));

    // После cooldown: снова можно
    for _ in 0..(60 * 5) {
        app.update();
    }
    app.world_mut().send_event(ActivateBoost { bike: rich });
    app.update();
    assert_eq!(app.world().resource::<BoostLog>().activated, 2);
}

#[test]
fn test_charging_station_revives_dead_bike() {
    let mut app = setup_app(3);
    app.world_mut().spawn(charging_station_bundle(Vec3::new(0.0, 0.0, -1.0), 3.0));
    let bike = app
        .world_mut()
        .spawn((bike_bundle(Vec3::ZERO, 0.0), Battery::new(100.0).with_level(0.0)))
        .id();

    input_mut(&mut app, bike).throttle = 1.0;
    for _ in 0..30 {
        app.update();
    }
    assert_eq!(app.world().get::<Transform>(bike).unwrap().translation, Vec3::ZERO);

    // Interact у станции → зарядка (стоим на месте)
    {
        let mut input = input_mut(&mut app, bike);
        input.throttle = 0.0;
        input.interact = true;
    }
    app.update();
    assert!(app.world().get::<Battery>(bike).unwrap().is_charging());

    for _ in 0..60 {
        app.update();
    }
    let battery = app.world().get::<Battery>(bike).unwrap();
    assert!(battery.level() > 4.0, "level {}", battery.level());

    // Байк снова едет и уезжает из радиуса станции → зарядка выключается
    {
        let mut input = input_mut(&mut app, bike);
        input.throttle = 1.0;
        input.interact = false;
    }
    for _ in 0..120 {
        app.update();
    }
    let transform = app.world().get::<Transform>(bike).unwrap();
    assert!(transform.translation.z < -3.0, "z = {}", transform.translation.z);
    assert!(!app.world().get::<Battery>(bike).unwrap().is_charging());
}
