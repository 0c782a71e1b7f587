//! HUD snapshot: всё, что UI host'а показывает, одним resource
//!
//! Симуляция не трогает UI напрямую: host читает `RideHud` после кадра.

use bevy::prelude::*;

pub mod waypoint;

pub use waypoint::{format_distance, project_to_screen, ScreenMarker, ScreenSize};

use crate::components::{Battery, BikeMotion, BikeTuning, ChaseCamera, DeliveryPoint, Player, LOW_THRESHOLD};
use crate::delivery::{DeliveryConfig, DeliveryTimer};
use crate::SimSet;

/// Углы стрелки спидометра (0 → 90°, max speed → -90°)
pub const NEEDLE_MIN_ANGLE: f32 = 90.0;
pub const NEEDLE_MAX_ANGLE: f32 = -90.0;

/// Срочность таймера доставки
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimerUrgency {
    #[default]
    Normal,
    /// ≤ 60 сек
    Warning,
    /// ≤ 30 сек
    Critical,
}

impl TimerUrgency {
    pub fn from_remaining(seconds: f32) -> Self {
        if seconds <= 30.0 {
            TimerUrgency::Critical
        } else if seconds <= 60.0 {
            TimerUrgency::Warning
        } else {
            TimerUrgency::Normal
        }
    }
}

/// "MM:SS" (секунды округляются вниз)
pub fn format_timer(seconds: f32) -> String {
    let total = seconds.max(0.0).floor() as u32;
    format!("{:02}:{:02}", total / 60, total % 60)
}

/// Состояние байка игрока
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BikeHud {
    pub battery_percent: u32,
    pub low_battery: bool,
    pub charging: bool,
    pub speed_kmh: u32,
    /// |speed| / max_speed ∈ [0, 1]
    pub speed_needle: f32,
    /// Угол стрелки (градусы)
    pub needle_angle: f32,
    /// Время текущего прыжка (None на земле)
    pub air_time: Option<f32>,
    pub boost_remaining: f32,
    pub carries_package: bool,
}

/// Доставка
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeliveryHud {
    pub active: bool,
    pub timer_text: String,
    pub urgency: TimerUrgency,
    pub projected_reward: Option<f32>,
    pub completed: u32,
    pub failed: u32,
    pub total_earnings: f32,
}

/// Маркер активной точки доставки
#[derive(Debug, Clone, PartialEq)]
pub struct WaypointHud {
    /// Имя без scene-префикса
    pub label: String,
    pub distance: f32,
    pub distance_text: String,
    /// None: нет камеры для проекции
    pub marker: Option<ScreenMarker>,
}

/// Snapshot для UI
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct RideHud {
    pub bike: Option<BikeHud>,
    pub delivery: DeliveryHud,
    pub waypoint: Option<WaypointHud>,
}

impl BikeHud {
    pub fn from_state(battery: &Battery, motion: &BikeMotion, tuning: &BikeTuning) -> Self {
        let speed_needle = tuning.speed_fraction(motion.current_speed).min(1.0);

        Self {
            battery_percent: (battery.fraction() * 100.0).round() as u32,
            low_battery: battery.fraction() < LOW_THRESHOLD,
            charging: battery.is_charging(),
            speed_kmh: motion.speed_kmh().round() as u32,
            speed_needle,
            needle_angle: crate::math::lerp(NEEDLE_MIN_ANGLE, NEEDLE_MAX_ANGLE, speed_needle),
            air_time: (!motion.grounded).then_some(motion.air_time),
            boost_remaining: motion.boost_time_remaining(),
            carries_package: motion.carries_package,
        }
    }
}

impl DeliveryHud {
    pub fn from_timer(timer: &DeliveryTimer, config: &DeliveryConfig) -> Self {
        let active = timer.is_active();
        let remaining = timer.time_remaining();

        Self {
            active,
            timer_text: if active { format_timer(remaining) } else { "--:--".to_string() },
            urgency: if active { TimerUrgency::from_remaining(remaining) } else { TimerUrgency::Normal },
            projected_reward: timer.projected_reward(config),
            completed: timer.stats.completed,
            failed: timer.stats.failed,
            total_earnings: timer.stats.total_earnings,
        }
    }
}

/// Система: собрать snapshot в конце кадра
pub fn update_ride_hud(
    mut hud: ResMut<RideHud>,
    players: Query<(Entity, &Transform, &Battery, &BikeMotion, &BikeTuning), With<Player>>,
    cameras: Query<(&Transform, &ChaseCamera)>,
    points: Query<(&Transform, &DeliveryPoint)>,
    timer: Res<DeliveryTimer>,
    config: Res<DeliveryConfig>,
    screen: Res<ScreenSize>,
) {
    let player = players.iter().next();

    hud.bike = player.map(|(_, _, battery, motion, tuning)| BikeHud::from_state(battery, motion, tuning));
    hud.delivery = DeliveryHud::from_timer(&timer, &config);

    hud.waypoint = timer
        .active_point()
        .and_then(|point| points.get(point).ok())
        .map(|(point_transform, point)| {
            let player_position = player.map(|(_, transform, ..)| transform.translation);
            let distance = player_position
                .map(|position| position.distance(point_transform.translation))
                .unwrap_or(0.0);

            // Камера игрока, иначе любая
            let camera = cameras
                .iter()
                .find(|(_, chase)| player.is_some_and(|(entity, ..)| chase.target == Some(entity)))
                .or_else(|| cameras.iter().next());

            WaypointHud {
                label: point.label().to_string(),
                distance,
                distance_text: format_distance(distance),
                marker: camera.map(|(camera_transform, chase)| {
                    project_to_screen(camera_transform, chase.current_fov, &screen, point_transform.translation)
                }),
            }
        });
}

pub struct HudPlugin;

impl Plugin for HudPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<RideHud>()
            .init_resource::<ScreenSize>()
            .add_systems(Update, update_ride_hud.in_set(SimSet::Snapshot));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_timer() {
        assert_eq!(format_timer(120.0), "02:00");
        assert_eq!(format_timer(65.9), "01:05");
        assert_eq!(format_timer(0.4), "00:00");
        assert_eq!(format_timer(-5.0), "00:00");
    }

    #[test]
    fn test_timer_urgency() {
        assert_eq!(TimerUrgency::from_remaining(90.0), TimerUrgency::Normal);
        assert_eq!(TimerUrgency::from_remaining(60.0), TimerUrgency::Warning);
        assert_eq!(TimerUrgency::from_remaining(30.0), TimerUrgency::Critical);
        assert_eq!(TimerUrgency::from_remaining(5.0), TimerUrgency::Critical);
    }

    #[test]
    fn test_bike_hud_from_state() {
        let battery = Battery::new(100.0).with_level(15.4);
        let tuning = BikeTuning::default();
        let motion = BikeMotion {
            current_speed: tuning.max_speed * 0.5,
            ..default()
        };

        let hud = BikeHud::from_state(&battery, &motion, &tuning);
        assert_eq!(hud.battery_percent, 15);
        assert!(hud.low_battery);
        assert_eq!(hud.speed_kmh, 27); // 7.5 m/s × 3.6
        assert!((hud.speed_needle - 0.5).abs() < 1e-6);
        assert!(hud.needle_angle.abs() < 1e-4);
        assert_eq!(hud.air_time, None);
    }

    #[test]
    fn test_delivery_hud_idle_and_active() {
        let config = DeliveryConfig::default();
        let mut timer = DeliveryTimer::default();

        let idle = DeliveryHud::from_timer(&timer, &config);
        assert!(!idle.active);
        assert_eq!(idle.timer_text, "--:--");

        timer.start(Entity::from_raw(1), &config);
        timer.tick(75.0, &config);
        let active = DeliveryHud::from_timer(&timer, &config);
        assert_eq!(active.timer_text, "00:45");
        assert_eq!(active.urgency, TimerUrgency::Warning);
        assert_eq!(active.projected_reward, Some(140.0));
    }
}
