//! Proximity feed: байк вошёл в радиус trigger'а → `ProximityEntered`
//!
//! Headless замена trigger-коллайдерам движка. Host со своей физикой
//! может писать те же события напрямую (система detect_proximity тогда
//! просто не найдёт `ProximityTrigger` entity).

use bevy::prelude::*;

use crate::components::{Bike, ProximityTrigger};
use crate::SimSet;

/// Байк пересёк границу trigger'а внутрь
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProximityEntered {
    pub bike: Entity,
    pub trigger: Entity,
}

pub struct ProximityPlugin;

impl Plugin for ProximityPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<ProximityEntered>()
            .add_systems(Update, detect_proximity.in_set(SimSet::Input));
    }
}

/// Enter-edges: событие только когда байка не было внутри на прошлом кадре
pub fn detect_proximity(
    bikes: Query<(Entity, &Transform), With<Bike>>,
    mut triggers: Query<(Entity, &Transform, &mut ProximityTrigger), Without<Bike>>,
    mut entered: EventWriter<ProximityEntered>,
) {
    for (trigger_entity, trigger_transform, mut trigger) in triggers.iter_mut() {
        let radius_sq = trigger.radius * trigger.radius;

        let inside: Vec<Entity> = bikes
            .iter()
            .filter(|(_, bike_transform)| {
                bike_transform.translation.distance_squared(trigger_transform.translation) <= radius_sq
            })
            .map(|(bike, _)| bike)
            .collect();

        for &bike in &inside {
            if !trigger.contains(bike) {
                entered.write(ProximityEntered {
                    bike,
                    trigger: trigger_entity,
                });
            }
        }

        // Вышедшие (и despawned) байки выпадают из occupants автоматически
        if inside != trigger.occupants {
            trigger.occupants = inside;
        }
    }
}
