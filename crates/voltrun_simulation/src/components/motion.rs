//! Motion компоненты байка: tuning, boost FSM, состояние движения, input
//!
//! Архитектура:
//! - `DriveInput` заполняется host'ом (клавиатура, геймпад) или тестом
//! - `BikeMotion::drive`: чистая интеграция одного тика (speed, heading, drain)
//! - Системы в `motion/` только раздают компоненты и пишут события

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::components::battery::{Battery, ChargeSource};
use crate::math::{lerp, move_towards, wrap_angle};

/// Ниже этой скорости (m/s) считаем что стоим
pub const SPEED_EPSILON: f32 = 0.1;

/// m/s → km/h
pub const MS_TO_KMH: f32 = 3.6;

/// Marker + required set для электробайка
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
#[require(Battery, ChargeSource, BikeMotion, BikeTuning, BoostConfig, DriveInput, Transform)]
pub struct Bike;

/// Ходовые параметры байка
#[derive(Component, Debug, Clone, Copy, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
pub struct BikeTuning {
    /// Максимальная скорость (m/s) при полном заряде
    pub max_speed: f32,
    /// Разгон в том же направлении (m/s²)
    pub acceleration: f32,
    /// Замедление при смене направления / сбросе газа (m/s²)
    pub deceleration: f32,
    /// Торможение (m/s²)
    pub brake_force: f32,
    /// Базовая скорость поворота (rad/s)
    pub turn_speed: f32,
    /// Прирост поворота на полной скорости (0.5 = +50%)
    pub turn_boost: f32,
    /// Множитель скорости на пустой батарее (до жёсткой остановки на 0)
    pub min_speed_multiplier: f32,
    /// Доп. расход на полной скорости (units/sec)
    pub movement_drain_rate: f32,
    /// Гравитация (m/s²)
    pub gravity: f32,
    /// Прижимная сила на полной скорости (m/s²): укорачивает прыжки на скорости
    pub downforce: f32,
    /// Сопротивление воздуха в прыжке (доля скорости в секунду)
    pub air_drag: f32,
}

impl Default for BikeTuning {
    fn default() -> Self {
        Self {
            max_speed: 15.0, // 54 km/h
            acceleration: 8.0,
            deceleration: 12.0,
            brake_force: 20.0,
            turn_speed: 50f32.to_radians(),
            turn_boost: 0.5,
            min_speed_multiplier: 0.3,
            movement_drain_rate: 0.5,
            gravity: 9.81,
            downforce: 5.0,
            air_drag: 0.1,
        }
    }
}

impl BikeTuning {
    /// |speed| / max_speed (не клампится сверху: boost даёт > 1)
    ///
    /// 0 при max_speed ≤ 0, чтобы битый конфиг не давал NaN.
    pub fn speed_fraction(&self, speed: f32) -> f32 {
        if self.max_speed > 0.0 {
            speed.abs() / self.max_speed
        } else {
            0.0
        }
    }
}

/// Конфигурация boost (turbo)
///
/// Boost: опциональная способность: `enabled = false` по умолчанию,
/// включается конфигурацией конкретного байка.
#[derive(Component, Debug, Clone, Copy, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
pub struct BoostConfig {
    pub enabled: bool,
    /// Стоимость активации (battery units)
    pub cost: f32,
    /// Длительность (секунды)
    pub duration: f32,
    /// Cooldown после окончания (секунды)
    pub cooldown: f32,
    /// Множитель target speed
    pub multiplier: f32,
    /// Доп. расход пока boost активен (units/sec)
    pub drain_rate: f32,
}

impl Default for BoostConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            cost: 15.0,
            duration: 3.0,
            cooldown: 5.0,
            multiplier: 1.5,
            drain_rate: 1.0,
        }
    }
}

impl BoostConfig {
    pub fn enabled() -> Self {
        Self {
            enabled: true,
            ..default()
        }
    }
}

/// Boost FSM: Inactive → Active → Cooldown → Inactive
#[derive(Debug, Clone, Copy, PartialEq, Default, Reflect)]
pub enum BoostState {
    #[default]
    Inactive,
    Active {
        remaining: f32,
    },
    Cooldown {
        remaining: f32,
    },
}

/// Переход boost FSM по таймеру
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoostTransition {
    /// Active → Cooldown
    Ended,
    /// Cooldown → Inactive
    Ready,
}

impl BoostState {
    pub fn is_active(&self) -> bool {
        matches!(self, BoostState::Active { .. })
    }

    /// Остаток активного boost (0 если не активен)
    pub fn time_remaining(&self) -> f32 {
        match self {
            BoostState::Active { remaining } => *remaining,
            _ => 0.0,
        }
    }

    pub fn cooldown_remaining(&self) -> f32 {
        match self {
            BoostState::Cooldown { remaining } => *remaining,
            _ => 0.0,
        }
    }

    /// Продвинуть таймеры на `delta_time`
    pub fn tick(&mut self, delta_time: f32, cooldown: f32) -> Option<BoostTransition> {
        match *self {
            BoostState::Inactive => None,
            BoostState::Active { remaining } => {
                let remaining = remaining - delta_time;
                if remaining <= 0.0 {
                    *self = BoostState::Cooldown { remaining: cooldown.max(0.0) };
                    Some(BoostTransition::Ended)
                } else {
                    *self = BoostState::Active { remaining };
                    None
                }
            }
            BoostState::Cooldown { remaining } => {
                let remaining = remaining - delta_time;
                if remaining <= 0.0 {
                    *self = BoostState::Inactive;
                    Some(BoostTransition::Ready)
                } else {
                    *self = BoostState::Cooldown { remaining };
                    None
                }
            }
        }
    }

    /// Прервать активный boost (→ Cooldown). Returns true если был активен.
    pub fn interrupt(&mut self, cooldown: f32) -> bool {
        if self.is_active() {
            *self = BoostState::Cooldown { remaining: cooldown.max(0.0) };
            true
        } else {
            false
        }
    }
}

/// Причина отказа в активации boost (state не меняется)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BoostRejected {
    Disabled,
    AlreadyActive,
    CoolingDown { remaining: f32 },
    InsufficientBattery { level: f32, cost: f32 },
}

impl fmt::Display for BoostRejected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoostRejected::Disabled => write!(f, "boost disabled"),
            BoostRejected::AlreadyActive => write!(f, "boost already active"),
            BoostRejected::CoolingDown { remaining } => {
                write!(f, "boost cooling down ({:.1}s left)", remaining)
            }
            BoostRejected::InsufficientBattery { level, cost } => {
                write!(f, "insufficient battery ({:.1} < {:.1})", level, cost)
            }
        }
    }
}

impl std::error::Error for BoostRejected {}

/// Input для одного тика
///
/// Для headless тестов: mock input через этот компонент.
/// Для игры: заполняется host'ом из устройств ввода.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct DriveInput {
    /// Газ [-1, 1] (отрицательный: задний ход)
    pub throttle: f32,
    /// Руль [-1, 1] (положительный: вправо)
    pub steer: f32,
    pub brake: bool,
    /// Запрос boost в этом тике
    pub boost: bool,
    /// Взаимодействие (charging station)
    pub interact: bool,
}

impl DriveInput {
    /// Любая ось ненулевая: батарея тратится
    pub fn is_moving(&self) -> bool {
        self.throttle != 0.0 || self.steer != 0.0
    }
}

/// Результат одного drive тика
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DriveStep {
    /// Пройденное расстояние вдоль forward (метры, со знаком)
    pub distance: f32,
    /// Изменение heading (радианы)
    pub heading_delta: f32,
    /// Батарея пуста: движение заблокировано
    pub stalled: bool,
    /// Активный boost прерван разрядкой
    pub boost_interrupted: bool,
}

/// Состояние движения байка
///
/// Heading: угол вокруг Y (0 = смотрим в -Z), в диапазоне (-π, π].
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct BikeMotion {
    /// Текущая скорость (m/s, со знаком)
    pub current_speed: f32,
    /// Целевая скорость последнего тика
    pub target_speed: f32,
    pub heading: f32,
    pub boost: BoostState,
    pub grounded: bool,
    /// Вертикальная скорость (m/s), интегрируется в FixedUpdate
    pub vertical_velocity: f32,
    /// Время в воздухе текущего прыжка (секунды)
    pub air_time: f32,
    pub carries_package: bool,
}

impl Default for BikeMotion {
    fn default() -> Self {
        Self {
            current_speed: 0.0,
            target_speed: 0.0,
            heading: 0.0,
            boost: BoostState::Inactive,
            grounded: true,
            vertical_velocity: 0.0,
            air_time: 0.0,
            carries_package: false,
        }
    }
}

/// Множитель max speed от заряда: lerp(min, 1, fraction)
///
/// Монотонно не убывает по fraction. Жёсткая остановка на 0: отдельный gate.
pub fn battery_speed_multiplier(min_multiplier: f32, fraction: f32) -> f32 {
    lerp(min_multiplier.clamp(0.0, 1.0), 1.0, fraction.clamp(0.0, 1.0))
}

impl BikeMotion {
    pub fn with_heading(heading: f32) -> Self {
        Self {
            heading: wrap_angle(heading),
            ..default()
        }
    }

    pub fn speed_kmh(&self) -> f32 {
        self.current_speed.abs() * MS_TO_KMH
    }

    pub fn boost_time_remaining(&self) -> f32 {
        self.boost.time_remaining()
    }

    /// Направление движения в мире
    pub fn forward(&self) -> Vec3 {
        Quat::from_rotation_y(self.heading) * Vec3::NEG_Z
    }

    /// Запрос boost: платим cost из батареи или отказ без изменений
    pub fn activate_boost(
        &mut self,
        config: &BoostConfig,
        battery: &mut Battery,
    ) -> Result<(), BoostRejected> {
        if !config.enabled {
            return Err(BoostRejected::Disabled);
        }

        match self.boost {
            BoostState::Active { .. } => return Err(BoostRejected::AlreadyActive),
            BoostState::Cooldown { remaining } if remaining > 0.0 => {
                return Err(BoostRejected::CoolingDown { remaining });
            }
            _ => {}
        }

        if !battery.consume(config.cost) {
            return Err(BoostRejected::InsufficientBattery {
                level: battery.level(),
                cost: config.cost,
            });
        }

        self.boost = BoostState::Active {
            remaining: config.duration,
        };
        Ok(())
    }

    /// Немедленная остановка. Returns true если прервали boost.
    pub fn force_stop(&mut self, config: &BoostConfig) -> bool {
        self.current_speed = 0.0;
        self.target_speed = 0.0;
        self.boost.interrupt(config.cooldown)
    }

    /// Скорость изменения speed для текущего target (асимметричная)
    fn speed_change_rate(&self, tuning: &BikeTuning, braking: bool) -> f32 {
        if braking {
            return tuning.brake_force;
        }

        if self.target_speed.abs() > SPEED_EPSILON {
            let same_direction = self.target_speed.signum() == self.current_speed.signum();
            if same_direction || self.current_speed.abs() < SPEED_EPSILON {
                tuning.acceleration
            } else {
                tuning.deceleration
            }
        } else {
            tuning.deceleration
        }
    }

    /// Один drive тик
    ///
    /// Порядок:
    /// 1. Gate: пустая батарея → speed = 0, без движения и поворота
    /// 2. target = throttle × max_speed (0 при торможении) × boost × battery multiplier
    /// 3. current_speed → target с асимметричными rate
    /// 4. heading += steer × turn_speed × (1 + speed_factor × turn_boost) × dt
    /// 5. Доп. drain пропорционально интенсивности движения (+ boost drain)
    ///
    /// CanMove не кешируется: батарея и движение связаны в пределах тика.
    pub fn drive(
        &mut self,
        tuning: &BikeTuning,
        boost: &BoostConfig,
        input: &DriveInput,
        battery: &mut Battery,
        delta_time: f32,
    ) -> DriveStep {
        if battery.is_depleted() {
            self.current_speed = 0.0;
            self.target_speed = 0.0;
            return DriveStep {
                stalled: true,
                boost_interrupted: self.boost.interrupt(boost.cooldown),
                ..default()
            };
        }

        let throttle = input.throttle.clamp(-1.0, 1.0);
        let steer = input.steer.clamp(-1.0, 1.0);

        let mut target = if input.brake { 0.0 } else { throttle * tuning.max_speed };
        if self.boost.is_active() {
            target *= boost.multiplier;
        }
        target *= battery_speed_multiplier(tuning.min_speed_multiplier, battery.fraction());
        self.target_speed = target;

        let rate = self.speed_change_rate(tuning, input.brake);
        self.current_speed = move_towards(self.current_speed, target, rate * delta_time);

        let speed_factor = tuning.speed_fraction(self.current_speed);
        // Положительный steer: поворот вправо (по часовой сверху) → heading уменьшается
        let heading_delta =
            -steer * tuning.turn_speed * (1.0 + speed_factor * tuning.turn_boost) * delta_time;
        self.heading = wrap_angle(self.heading + heading_delta);

        let mut extra_drain = tuning.movement_drain_rate * speed_factor * delta_time;
        if self.boost.is_active() {
            extra_drain += boost.drain_rate * delta_time;
        }
        battery.drain(extra_drain);

        DriveStep {
            distance: self.current_speed * delta_time,
            heading_delta,
            stalled: false,
            boost_interrupted: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn full_throttle() -> DriveInput {
        DriveInput {
            throttle: 1.0,
            ..default()
        }
    }

    #[test]
    fn test_accelerates_towards_max_speed() {
        let tuning = BikeTuning::default();
        let boost = BoostConfig::default();
        let mut battery = Battery::new(100.0);
        let mut motion = BikeMotion::default();

        let step = motion.drive(&tuning, &boost, &full_throttle(), &mut battery, 1.0);
        // 1 сек разгона при 8 m/s²
        assert!((motion.current_speed - 8.0).abs() < 1e-4);
        assert!((step.distance - 8.0).abs() < 1e-4);

        for _ in 0..10 {
            motion.drive(&tuning, &boost, &full_throttle(), &mut battery, 1.0);
        }
        assert!(motion.current_speed <= tuning.max_speed + 1e-4);
        assert!(motion.current_speed > tuning.max_speed * 0.9);
    }

    #[test]
    fn test_zero_max_speed_keeps_heading_finite() {
        let tuning = BikeTuning {
            max_speed: 0.0,
            ..default()
        };
        let boost = BoostConfig::default();
        let mut battery = Battery::new(100.0);
        let mut motion = BikeMotion::default();
        let input = DriveInput {
            throttle: 1.0,
            steer: 1.0,
            ..default()
        };

        motion.drive(&tuning, &boost, &input, &mut battery, 0.5);

        assert!(motion.heading.is_finite());
        assert_eq!(motion.current_speed, 0.0);
        assert!(battery.level().is_finite());
        assert_eq!(tuning.speed_fraction(5.0), 0.0);
    }

    #[test]
    fn test_reversing_uses_deceleration_rate() {
        let tuning = BikeTuning::default();
        let boost = BoostConfig::default();
        let mut battery = Battery::new(100.0);
        let mut motion = BikeMotion {
            current_speed: 10.0,
            ..default()
        };

        let reverse = DriveInput {
            throttle: -1.0,
            ..default()
        };
        motion.drive(&tuning, &boost, &reverse, &mut battery, 0.5);
        // 10 - 12 × 0.5 = 4
        assert!((motion.current_speed - 4.0).abs() < 1e-4);
    }

    #[test]
    fn test_braking_uses_brake_force() {
        let tuning = BikeTuning::default();
        let boost = BoostConfig::default();
        let mut battery = Battery::new(100.0);
        let mut motion = BikeMotion {
            current_speed: 10.0,
            ..default()
        };

        let brake = DriveInput {
            throttle: 1.0,
            brake: true,
            ..default()
        };
        motion.drive(&tuning, &boost, &brake, &mut battery, 0.25);
        // 10 - 20 × 0.25 = 5
        assert!((motion.current_speed - 5.0).abs() < 1e-4);
        assert_eq!(motion.target_speed, 0.0);
    }

    #[test]
    fn test_coasting_uses_deceleration() {
        let tuning = BikeTuning::default();
        let boost = BoostConfig::default();
        let mut battery = Battery::new(100.0);
        let mut motion = BikeMotion {
            current_speed: 6.0,
            ..default()
        };

        motion.drive(&tuning, &boost, &DriveInput::default(), &mut battery, 0.25);
        assert!((motion.current_speed - 3.0).abs() < 1e-4);
    }

    #[test]
    fn test_depleted_battery_is_hard_stop() {
        let tuning = BikeTuning::default();
        let boost = BoostConfig::enabled();
        let mut battery = Battery::new(100.0).with_level(0.0);
        let mut motion = BikeMotion {
            current_speed: 12.0,
            heading: 0.3,
            boost: BoostState::Active { remaining: 1.0 },
            ..default()
        };

        let input = DriveInput {
            throttle: 1.0,
            steer: 1.0,
            ..default()
        };
        let step = motion.drive(&tuning, &boost, &input, &mut battery, DT);

        assert!(step.stalled);
        assert!(step.boost_interrupted);
        assert_eq!(step.distance, 0.0);
        assert_eq!(motion.current_speed, 0.0);
        assert_eq!(motion.heading, 0.3); // не поворачиваем
        assert!(matches!(motion.boost, BoostState::Cooldown { .. }));
    }

    #[test]
    fn test_speed_multiplier_monotonic() {
        let mut previous = 0.0;
        for i in 0..=100 {
            let fraction = i as f32 / 100.0;
            let multiplier = battery_speed_multiplier(0.3, fraction);
            assert!(multiplier >= previous);
            previous = multiplier;
        }
        assert!((battery_speed_multiplier(0.3, 0.0) - 0.3).abs() < 1e-6);
        assert!((battery_speed_multiplier(0.3, 1.0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_low_battery_limits_top_speed() {
        let tuning = BikeTuning::default();
        let boost = BoostConfig::default();
        let mut battery = Battery::new(100.0).with_level(50.0);
        let mut motion = BikeMotion::default();

        motion.drive(&tuning, &boost, &full_throttle(), &mut battery, DT);
        // lerp(0.3, 1.0, ~0.5) × 15
        let expected = battery_speed_multiplier(0.3, battery.fraction()) * tuning.max_speed;
        assert!((motion.target_speed - expected).abs() < 0.05);
        assert!(motion.target_speed < tuning.max_speed);
    }

    #[test]
    fn test_turning_authority_grows_with_speed() {
        let tuning = BikeTuning::default();
        let boost = BoostConfig::default();
        let mut battery = Battery::new(100.0);
        let input = DriveInput {
            steer: 1.0,
            ..default()
        };

        let mut slow = BikeMotion::default();
        let slow_step = slow.drive(&tuning, &boost, &input, &mut battery, DT);

        let mut fast = BikeMotion {
            current_speed: tuning.max_speed,
            ..default()
        };
        let fast_input = DriveInput {
            throttle: 1.0,
            steer: 1.0,
            ..default()
        };
        let fast_step = fast.drive(&tuning, &boost, &fast_input, &mut battery, DT);

        assert!(slow_step.heading_delta < 0.0); // вправо
        assert!(fast_step.heading_delta.abs() > slow_step.heading_delta.abs());
    }

    #[test]
    fn test_boost_activation_pays_cost_once() {
        let config = BoostConfig::enabled();
        let mut battery = Battery::new(100.0);
        let mut motion = BikeMotion::default();

        assert!(motion.activate_boost(&config, &mut battery).is_ok());
        assert_eq!(battery.level(), 85.0);

        // Повторный запрос в том же тике
        assert_eq!(
            motion.activate_boost(&config, &mut battery),
            Err(BoostRejected::AlreadyActive)
        );
        assert_eq!(battery.level(), 85.0);
    }

    #[test]
    fn test_boost_rejections() {
        let config = BoostConfig::enabled();

        let mut poor = Battery::new(100.0).with_level(10.0);
        let mut motion = BikeMotion::default();
        assert!(matches!(
            motion.activate_boost(&config, &mut poor),
            Err(BoostRejected::InsufficientBattery { .. })
        ));
        assert_eq!(poor.level(), 10.0);
        assert_eq!(motion.boost, BoostState::Inactive);

        let mut battery = Battery::new(100.0);
        let mut cooling = BikeMotion {
            boost: BoostState::Cooldown { remaining: 2.0 },
            ..default()
        };
        assert!(matches!(
            cooling.activate_boost(&config, &mut battery),
            Err(BoostRejected::CoolingDown { .. })
        ));
        assert_eq!(battery.level(), 100.0);

        let disabled = BoostConfig::default();
        assert_eq!(
            BikeMotion::default().activate_boost(&disabled, &mut battery),
            Err(BoostRejected::Disabled)
        );
    }

    #[test]
    fn test_boost_lifecycle() {
        let config = BoostConfig::enabled();
        let mut state = BoostState::Active { remaining: config.duration };

        assert_eq!(state.tick(2.0, config.cooldown), None);
        assert!((state.time_remaining() - 1.0).abs() < 1e-6);

        assert_eq!(state.tick(1.0, config.cooldown), Some(BoostTransition::Ended));
        assert_eq!(state, BoostState::Cooldown { remaining: 5.0 });

        assert_eq!(state.tick(4.0, config.cooldown), None);
        assert_eq!(state.tick(1.0, config.cooldown), Some(BoostTransition::Ready));
        assert_eq!(state, BoostState::Inactive);
    }

    #[test]
    fn test_boost_raises_target_speed() {
        let tuning = BikeTuning::default();
        let config = BoostConfig::enabled();
        let mut battery = Battery::new(100.0);
        let mut motion = BikeMotion::default();

        motion.activate_boost(&config, &mut battery).unwrap();
        motion.drive(&tuning, &config, &full_throttle(), &mut battery, DT);

        let battery_multiplier = battery_speed_multiplier(0.3, battery.fraction());
        let expected = tuning.max_speed * config.multiplier * battery_multiplier;
        assert!((motion.target_speed - expected).abs() < 0.05);
        assert!(motion.target_speed > tuning.max_speed);
    }

    #[test]
    fn test_force_stop() {
        let config = BoostConfig::enabled();
        let mut motion = BikeMotion {
            current_speed: 9.0,
            target_speed: 15.0,
            boost: BoostState::Active { remaining: 2.0 },
            ..default()
        };

        assert!(motion.force_stop(&config));
        assert_eq!(motion.current_speed, 0.0);
        assert_eq!(motion.boost, BoostState::Cooldown { remaining: 5.0 });
    }

    #[test]
    fn test_speed_kmh_and_forward() {
        let motion = BikeMotion {
            current_speed: -10.0,
            ..default()
        };
        assert!((motion.speed_kmh() - 36.0).abs() < 1e-4);
        assert!(motion.forward().distance(Vec3::NEG_Z) < 1e-6);
    }
}
