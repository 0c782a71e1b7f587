//! Delivery события

use bevy::prelude::*;

/// Новая доставка: точка выбрана, посылка заспавнена
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct DeliveryStarted {
    pub point: Entity,
    pub package: Entity,
    pub time_limit: f32,
}

/// Доставка засчитана
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct DeliveryCompleted {
    pub bike: Entity,
    pub point: Entity,
    pub reward: f32,
}

/// Дедлайн истёк
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryFailed {
    pub point: Entity,
}

/// Байк подобрал посылку
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackagePickedUp {
    pub bike: Entity,
    pub package: Entity,
}

/// Явная попытка доставки от host'а (триггер движка, кнопка)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeliverAttempt {
    pub bike: Entity,
    pub point: Entity,
}
