//! Battery компонент: заряд, режим (discharging/charging), пороговые события

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Порог "low battery" (доля от capacity)
pub const LOW_THRESHOLD: f32 = 0.2;
/// Порог "critical battery" (доля от capacity)
pub const CRITICAL_THRESHOLD: f32 = 0.05;

/// Режим батареи
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect, Serialize, Deserialize)]
pub enum BatteryMode {
    /// Тратим заряд при движении
    #[default]
    Discharging,
    /// Заряжаемся (charging station)
    Charging,
}

/// Пересечение порога заряда
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum BatteryThreshold {
    /// Уровень упал ниже 20%
    Low,
    /// Уровень упал ниже 5%
    Critical,
    /// Уровень достиг 0
    Depleted,
    /// Уровень достиг capacity
    Full,
}

/// Кто запустил текущую сессию зарядки
///
/// Станция гасит только свою сессию; зарядку по `ChargeRequest` host
/// останавливает сам.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
#[reflect(Component)]
pub enum ChargeSource {
    #[default]
    Idle,
    Station,
    Host,
}

/// Батарея электробайка
///
/// Инвариант: 0.0 ≤ level ≤ capacity (поля приватные, все мутации клампятся).
/// Пороги edge-triggered: `evaluate_thresholds` сравнивает с уровнем
/// прошлой проверки, поэтому стоя ровно на границе событие не повторяется.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Battery {
    capacity: f32,
    level: f32,
    mode: BatteryMode,
    /// Расход при движении (units/sec)
    pub drain_rate: f32,
    /// Скорость зарядки (units/sec)
    pub charge_rate: f32,
    /// Уровень на момент прошлой проверки порогов
    last_observed: f32,
}

impl Default for Battery {
    fn default() -> Self {
        Self::new(100.0)
    }
}

impl Battery {
    /// Полная батарея
    pub fn new(capacity: f32) -> Self {
        let capacity = capacity.max(f32::EPSILON);
        Self {
            capacity,
            level: capacity,
            mode: BatteryMode::Discharging,
            drain_rate: 0.5,
            charge_rate: 5.0,
            last_observed: capacity,
        }
    }

    pub fn with_rates(mut self, drain_rate: f32, charge_rate: f32) -> Self {
        self.drain_rate = drain_rate.max(0.0);
        self.charge_rate = charge_rate.max(0.0);
        self
    }

    /// Стартовый уровень (клампится). Пороги считаются от него же.
    pub fn with_level(mut self, level: f32) -> Self {
        self.level = level.clamp(0.0, self.capacity);
        self.last_observed = self.level;
        self
    }

    pub fn level(&self) -> f32 {
        self.level
    }

    pub fn capacity(&self) -> f32 {
        self.capacity
    }

    pub fn mode(&self) -> BatteryMode {
        self.mode
    }

    /// level / capacity ∈ [0, 1]
    pub fn fraction(&self) -> f32 {
        self.level / self.capacity
    }

    pub fn is_depleted(&self) -> bool {
        self.level <= 0.0
    }

    pub fn is_charging(&self) -> bool {
        self.mode == BatteryMode::Charging
    }

    /// Один тик: drain при движении или зарядка
    pub fn tick(&mut self, delta_time: f32, is_moving: bool) {
        let delta_time = delta_time.max(0.0);

        match self.mode {
            BatteryMode::Discharging if is_moving => {
                self.level -= self.drain_rate * delta_time;
            }
            BatteryMode::Discharging => {}
            BatteryMode::Charging => {
                self.level += self.charge_rate * delta_time;
            }
        }

        self.level = self.level.clamp(0.0, self.capacity);
    }

    /// Returns true если режим изменился
    pub fn start_charging(&mut self) -> bool {
        if self.mode == BatteryMode::Charging {
            return false;
        }
        self.mode = BatteryMode::Charging;
        true
    }

    /// Returns true если режим изменился
    pub fn stop_charging(&mut self) -> bool {
        if self.mode == BatteryMode::Discharging {
            return false;
        }
        self.mode = BatteryMode::Discharging;
        true
    }

    pub fn can_afford(&self, amount: f32) -> bool {
        amount >= 0.0 && self.level >= amount
    }

    /// Списать `amount` целиком или ничего
    ///
    /// Списание мгновенное: второй запрос в том же тике видит уже уменьшенный уровень.
    pub fn consume(&mut self, amount: f32) -> bool {
        if self.can_afford(amount) {
            self.level = (self.level - amount).max(0.0);
            true
        } else {
            false
        }
    }

    /// Безусловный drain (движение, boost), клампится к 0
    pub fn drain(&mut self, amount: f32) {
        if amount > 0.0 {
            self.level = (self.level - amount).max(0.0);
        }
    }

    /// Пересечённые с прошлой проверки пороги
    ///
    /// Вызывается один раз за тик после всех мутаций.
    pub fn evaluate_thresholds(&mut self) -> Vec<BatteryThreshold> {
        let previous = self.last_observed;
        let current = self.level;
        self.last_observed = current;

        let low = self.capacity * LOW_THRESHOLD;
        let critical = self.capacity * CRITICAL_THRESHOLD;

        let mut crossed = Vec::new();
        if previous >= low && current < low {
            crossed.push(BatteryThreshold::Low);
        }
        if previous >= critical && current < critical {
            crossed.push(BatteryThreshold::Critical);
        }
        if previous > 0.0 && current <= 0.0 {
            crossed.push(BatteryThreshold::Depleted);
        }
        if previous < self.capacity && current >= self.capacity {
            crossed.push(BatteryThreshold::Full);
        }
        crossed
    }
}
