//! Motion module: drive, boost, ride physics
//!
//! Update (кадр):
//! 1. Input: handle_force_stop → handle_boost_requests
//! 2. Motion: drive_bikes (speed, heading, позиция, доп. drain)
//! 3. Timers: tick_boost
//!
//! FixedUpdate (60Hz): apply_launch_impulses → clamp_bike_speed →
//! apply_air_drag → integrate_vertical → ground_detection

use bevy::prelude::*;

pub mod boost;
pub mod drive;
pub mod events;
pub mod physics;

pub use boost::{handle_boost_requests, handle_force_stop, tick_boost};
pub use drive::{bike_bundle, drive_bikes, spawn_bike};
pub use events::{
    ActivateBoost, BoostActivated, BoostEnded, BoostReady, BoostRejectedEvent, ForceStop, GroundContactLost,
    Landed, LaunchImpulse,
};
pub use physics::{
    apply_air_drag, apply_launch_impulses, clamp_bike_speed, ground_detection, integrate_vertical, BIG_AIR_TIME,
};

use crate::{GroundLevel, SimSet};

pub struct MotionPlugin;

impl Plugin for MotionPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<ActivateBoost>()
            .add_event::<ForceStop>()
            .add_event::<BoostActivated>()
            .add_event::<BoostEnded>()
            .add_event::<BoostReady>()
            .add_event::<BoostRejectedEvent>()
            .add_event::<LaunchImpulse>()
            .add_event::<GroundContactLost>()
            .add_event::<Landed>()
            .init_resource::<GroundLevel>();

        app.add_systems(
            Update,
            (handle_force_stop, handle_boost_requests)
                .chain()
                .in_set(SimSet::Input),
        )
        .add_systems(Update, drive_bikes.in_set(SimSet::Motion))
        .add_systems(Update, tick_boost.in_set(SimSet::Timers));

        app.add_systems(
            FixedUpdate,
            (
                apply_launch_impulses,
                clamp_bike_speed,
                apply_air_drag,
                integrate_vertical,
                ground_detection,
            )
                .chain(), // Последовательное выполнение
        );
    }
}
