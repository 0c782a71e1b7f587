//! Motion события: boost, force stop, прыжки

use bevy::prelude::*;

use crate::components::BoostRejected;

/// Запрос boost (альтернатива `DriveInput::boost`)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivateBoost {
    pub bike: Entity,
}

/// Немедленная остановка байка (катсцена, респаун)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForceStop {
    pub bike: Entity,
}

/// Boost активирован, cost списан
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct BoostActivated {
    pub bike: Entity,
    pub cost: f32,
    pub duration: f32,
}

/// Boost закончился (таймер или прерывание) → Cooldown
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoostEnded {
    pub bike: Entity,
    /// true: прерван (пустая батарея, force stop)
    pub interrupted: bool,
}

/// Cooldown закончился, boost снова доступен
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoostReady {
    pub bike: Entity,
}

/// Запрос boost отклонён (state не изменился)
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct BoostRejectedEvent {
    pub bike: Entity,
    pub reason: BoostRejected,
}

/// Вертикальный импульс (трамплин, кочка): пишет host или trigger
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct LaunchImpulse {
    pub bike: Entity,
    /// Вертикальная скорость (m/s), добавляется к текущей
    pub vertical_speed: f32,
}

/// Байк оторвался от земли
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroundContactLost {
    pub bike: Entity,
}

/// Байк приземлился
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct Landed {
    pub bike: Entity,
    /// Длительность прыжка (секунды)
    pub air_time: f32,
}
