//! Camera module: chase camera за байком
//!
//! Follow с occlusion (rapier коллайдеры `CameraObstacle`),
//! speed presets, manual look, shake.

use bevy::prelude::*;

pub mod follow;
pub mod occlusion;

pub use follow::{
    apply_camera_look, chase_camera_bundle, follow_target, speed_ratio, spike_shake_on_air, update_camera_shake,
};
pub use occlusion::{cast_obstacles, obstacle_bundle, ObstacleQuery};

use crate::SimSet;

pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (
                apply_camera_look,
                spike_shake_on_air,
                update_camera_shake,
                follow_target,
            )
                .chain()
                .in_set(SimSet::Camera),
        );
    }
}
