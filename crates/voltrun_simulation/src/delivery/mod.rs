//! Delivery module: таймер доставки, награды, посылки
//!
//! Порядок (SimSet::Timers):
//! 1. tick_delivery_timer: countdown / провал / restart пауза
//! 2. pick_up_packages: ProximityEntered с посылкой
//! 3. handle_delivery_arrivals: ProximityEntered с точкой, DeliverAttempt
//! 4. start_deliveries: Idle → новая доставка

use bevy::prelude::*;

pub mod events;
pub mod systems;
pub mod timer;

pub use events::{DeliverAttempt, DeliveryCompleted, DeliveryFailed, DeliveryStarted, PackagePickedUp};
pub use systems::{
    delivery_point_bundle, handle_delivery_arrivals, pick_up_packages, start_deliveries, tick_delivery_timer,
};
pub use timer::{DeliveryConfig, DeliveryPhase, DeliveryStats, DeliveryTimer, DeliveryTransition};

use crate::SimSet;

pub struct DeliveryPlugin;

impl Plugin for DeliveryPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DeliveryConfig>()
            .init_resource::<DeliveryTimer>()
            .add_event::<DeliveryStarted>()
            .add_event::<DeliveryCompleted>()
            .add_event::<DeliveryFailed>()
            .add_event::<PackagePickedUp>()
            .add_event::<DeliverAttempt>()
            .add_systems(
                Update,
                (
                    tick_delivery_timer,
                    pick_up_packages,
                    handle_delivery_arrivals,
                    start_deliveries,
                )
                    .chain()
                    .in_set(SimSet::Timers),
            );
    }
}
