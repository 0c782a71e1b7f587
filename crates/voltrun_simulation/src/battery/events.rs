//! Battery события

use bevy::prelude::*;

use crate::components::BatteryThreshold;

/// Заряд пересёк порог (edge-triggered, один раз на пересечение)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatteryThresholdCrossed {
    pub entity: Entity,
    pub threshold: BatteryThreshold,
}

/// Запрос host'а на зарядку (UI кнопка, скриптовая станция)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChargeRequest {
    Start { bike: Entity },
    Stop { bike: Entity },
}

impl ChargeRequest {
    pub fn bike(&self) -> Entity {
        match self {
            ChargeRequest::Start { bike } | ChargeRequest::Stop { bike } => *bike,
        }
    }
}
