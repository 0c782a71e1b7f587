//! Battery module: расход, зарядка, пороги заряда
//!
//! Порядок в кадре:
//! 1. Input: charging_station_proximity → handle_charge_requests
//! 2. Resource: tick_battery (drain при движении / зарядка)
//! 3. Motion (после drive_bikes): emit_battery_thresholds

use bevy::prelude::*;

pub mod events;
pub mod systems;

pub use events::{BatteryThresholdCrossed, ChargeRequest};
pub use systems::{
    charging_station_bundle, charging_station_proximity, emit_battery_thresholds, handle_charge_requests,
    tick_battery,
};

use crate::SimSet;

pub struct BatteryPlugin;

impl Plugin for BatteryPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<BatteryThresholdCrossed>()
            .add_event::<ChargeRequest>()
            .add_systems(
                Update,
                (charging_station_proximity, handle_charge_requests)
                    .chain()
                    .in_set(SimSet::Input),
            )
            .add_systems(Update, tick_battery.in_set(SimSet::Resource))
            .add_systems(
                Update,
                emit_battery_thresholds
                    .in_set(SimSet::Motion)
                    .after(crate::motion::drive_bikes),
            );
    }
}
