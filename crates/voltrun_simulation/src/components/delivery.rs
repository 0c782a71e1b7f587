//! Delivery компоненты: точки доставки, посылка

use bevy::prelude::*;

use crate::components::world::ProximityTrigger;

/// Префикс имён точек из сцены ("DeliveryPoint_Harbor" → "Harbor")
pub const DELIVERY_POINT_PREFIX: &str = "DeliveryPoint_";

/// Точка доставки: одна из фиксированного набора
///
/// DeliveryTimer держит только `Entity` handle (lookup, без ownership).
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
#[require(ProximityTrigger, Transform)]
pub struct DeliveryPoint {
    pub name: String,
}

impl DeliveryPoint {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Имя для HUD без scene-префикса
    pub fn label(&self) -> &str {
        self.name.strip_prefix(DELIVERY_POINT_PREFIX).unwrap_or(&self.name)
    }
}

/// Посылка, ожидающая pickup
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
#[require(ProximityTrigger, Transform)]
pub struct Package;
