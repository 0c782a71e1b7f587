//! DeliveryTimer: countdown + reward state machine
//!
//! Idle → InProgress → (Completed | Failed) → restart_delay → Idle → start.
//! Выбор точки и посылка: в systems, здесь только переходы.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Параметры доставок
#[derive(Resource, Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
pub struct DeliveryConfig {
    /// Лимит времени на доставку (секунды)
    pub time_limit: f32,
    pub base_reward: f32,
    /// Бонус за каждую оставшуюся секунду
    pub bonus_rate: f32,
    /// Пауза перед следующей доставкой (секунды)
    pub restart_delay: f32,
    /// Высота спавна посылки над байком игрока
    pub package_spawn_height: f32,
    /// Радиус pickup посылки
    pub pickup_radius: f32,
    /// Автостарт первой доставки и рестарт после паузы
    pub autostart: bool,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            time_limit: 120.0,
            base_reward: 50.0,
            bonus_rate: 2.0,
            restart_delay: 3.0,
            package_spawn_height: 2.0,
            pickup_radius: 2.5,
            autostart: true,
        }
    }
}

impl DeliveryConfig {
    /// base + remaining × bonus_rate
    pub fn reward_for(&self, time_remaining: f32) -> f32 {
        self.base_reward + time_remaining.max(0.0) * self.bonus_rate
    }
}

/// Фаза доставки
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DeliveryPhase {
    #[default]
    Idle,
    InProgress {
        point: Entity,
        time_remaining: f32,
    },
    Completed {
        point: Entity,
        reward: f32,
        restart_in: f32,
    },
    Failed {
        point: Entity,
        restart_in: f32,
    },
}

/// Переход по таймеру
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryTransition {
    /// Дедлайн истёк → Failed
    Expired { point: Entity },
    /// Пауза после доставки закончилась → Idle
    RestartDue,
}

/// Статистика сессии
#[derive(Debug, Clone, Copy, Default, PartialEq, Reflect, Serialize, Deserialize)]
pub struct DeliveryStats {
    pub completed: u32,
    pub failed: u32,
    pub total_earnings: f32,
}

/// Состояние текущей доставки (resource)
#[derive(Resource, Debug, Clone, Default)]
pub struct DeliveryTimer {
    pub phase: DeliveryPhase,
    pub stats: DeliveryStats,
    /// Посылка, ещё не подобранная байком
    pub package: Option<Entity>,
    /// Warning про пустой набор точек / отсутствие игрока уже выдан
    pub(crate) start_blocked_logged: bool,
}

impl DeliveryTimer {
    pub fn is_active(&self) -> bool {
        matches!(self.phase, DeliveryPhase::InProgress { .. })
    }

    pub fn is_idle(&self) -> bool {
        self.phase == DeliveryPhase::Idle
    }

    /// Точка текущей доставки (только InProgress)
    pub fn active_point(&self) -> Option<Entity> {
        match self.phase {
            DeliveryPhase::InProgress { point, .. } => Some(point),
            _ => None,
        }
    }

    pub fn time_remaining(&self) -> f32 {
        match self.phase {
            DeliveryPhase::InProgress { time_remaining, .. } => time_remaining,
            _ => 0.0,
        }
    }

    /// Награда, если доставить прямо сейчас
    pub fn projected_reward(&self, config: &DeliveryConfig) -> Option<f32> {
        match self.phase {
            DeliveryPhase::InProgress { time_remaining, .. } => Some(config.reward_for(time_remaining)),
            _ => None,
        }
    }

    /// Idle → InProgress. Returns false если доставка уже идёт / пауза.
    pub fn start(&mut self, point: Entity, config: &DeliveryConfig) -> bool {
        if !self.is_idle() {
            return false;
        }
        self.phase = DeliveryPhase::InProgress {
            point,
            time_remaining: config.time_limit.max(0.0),
        };
        true
    }

    /// Продвинуть таймеры на `delta_time`
    pub fn tick(&mut self, delta_time: f32, config: &DeliveryConfig) -> Option<DeliveryTransition> {
        match &mut self.phase {
            DeliveryPhase::Idle => None,
            DeliveryPhase::InProgress { point, time_remaining } => {
                *time_remaining -= delta_time;
                if *time_remaining > 0.0 {
                    return None;
                }

                let point = *point;
                self.phase = DeliveryPhase::Failed {
                    point,
                    restart_in: config.restart_delay,
                };
                self.stats.failed += 1;
                Some(DeliveryTransition::Expired { point })
            }
            DeliveryPhase::Completed { restart_in, .. } | DeliveryPhase::Failed { restart_in, .. } => {
                *restart_in -= delta_time;
                if *restart_in > 0.0 {
                    return None;
                }

                self.phase = DeliveryPhase::Idle;
                Some(DeliveryTransition::RestartDue)
            }
        }
    }

    /// Доставка в `point`: только активная точка и только с посылкой
    ///
    /// Returns награду; None: попытка не засчитана (state не меняется).
    pub fn try_deliver(&mut self, point: Entity, carries_package: bool, config: &DeliveryConfig) -> Option<f32> {
        let DeliveryPhase::InProgress {
            point: active,
            time_remaining,
        } = self.phase
        else {
            return None;
        };

        if active != point || !carries_package {
            return None;
        }

        let reward = config.reward_for(time_remaining);
        self.phase = DeliveryPhase::Completed {
            point,
            reward,
            restart_in: config.restart_delay,
        };
        self.stats.completed += 1;
        self.stats.total_earnings += reward;
        Some(reward)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(index: u32) -> Entity {
        Entity::from_raw(index)
    }

    #[test]
    fn test_reward_with_time_bonus() {
        let config = DeliveryConfig::default();
        let mut timer = DeliveryTimer::default();
        assert!(timer.start(point(1), &config));

        // 120 - 90 = 30 сек осталось
        for _ in 0..90 {
            assert!(timer.tick(1.0, &config).is_none());
        }
        assert!((timer.time_remaining() - 30.0).abs() < 1e-3);

        let reward = timer.try_deliver(point(1), true, &config);
        assert_eq!(reward.map(f32::round), Some(110.0));
        assert_eq!(timer.stats.completed, 1);
        assert_eq!(timer.stats.total_earnings.round(), 110.0);
        assert!(!timer.is_active());
    }

    #[test]
    fn test_delivery_requires_package_and_active_point() {
        let config = DeliveryConfig::default();
        let mut timer = DeliveryTimer::default();
        timer.start(point(1), &config);

        assert_eq!(timer.try_deliver(point(2), true, &config), None); // Не та точка
        assert_eq!(timer.try_deliver(point(1), false, &config), None); // Без посылки
        assert!(timer.is_active());
        assert_eq!(timer.stats.completed, 0);

        // Idle: ничего не принимаем
        let mut idle = DeliveryTimer::default();
        assert_eq!(idle.try_deliver(point(1), true, &config), None);
    }

    #[test]
    fn test_deadline_fails_then_restarts() {
        let config = DeliveryConfig::default();
        let mut timer = DeliveryTimer::default();
        timer.start(point(3), &config);
        assert!(!timer.start(point(4), &config)); // уже идёт

        assert_eq!(
            timer.tick(121.0, &config),
            Some(DeliveryTransition::Expired { point: point(3) })
        );
        assert!(matches!(timer.phase, DeliveryPhase::Failed { .. }));
        assert_eq!(timer.stats.failed, 1);
        assert_eq!(timer.active_point(), None);

        assert_eq!(timer.tick(2.0, &config), None);
        assert_eq!(timer.tick(1.5, &config), Some(DeliveryTransition::RestartDue));
        assert!(timer.is_idle());
        assert!(timer.start(point(4), &config));
    }

    #[test]
    fn test_projected_reward() {
        let config = DeliveryConfig::default();
        let mut timer = DeliveryTimer::default();
        assert_eq!(timer.projected_reward(&config), None);

        timer.start(point(1), &config);
        assert_eq!(timer.projected_reward(&config), Some(290.0));
    }
}
