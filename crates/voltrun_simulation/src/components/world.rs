//! World компоненты: proximity triggers, charging stations

use bevy::prelude::*;

/// Сферический trigger для proximity событий
///
/// Хранит байки внутри радиуса, чтобы слать только enter-переходы
/// (а не событие каждый кадр пока байк стоит в зоне).
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct ProximityTrigger {
    pub radius: f32,
    pub(crate) occupants: Vec<Entity>,
}

impl Default for ProximityTrigger {
    fn default() -> Self {
        Self::new(2.5)
    }
}

impl ProximityTrigger {
    pub fn new(radius: f32) -> Self {
        Self {
            radius: radius.max(0.0),
            occupants: Vec::new(),
        }
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.occupants.contains(&entity)
    }
}

/// Зарядная станция: в радиусе + interact → зарядка, вне радиуса → stop
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
#[require(Transform)]
pub struct ChargingStation {
    pub range: f32,
}

impl Default for ChargingStation {
    fn default() -> Self {
        Self { range: 3.0 }
    }
}
