//! Chase camera системы: look input, shake, follow
//!
//! Порядок (SimSet::Camera, после движения target):
//! apply_camera_look → spike_shake_on_air → update_camera_shake → follow_target

use bevy::prelude::*;
use rand::Rng;

use super::occlusion::{cast_obstacles, ObstacleQuery};
use crate::components::{BikeMotion, CameraLookInput, ChaseCamera, ChaseCameraSettings};
use crate::logger;
use crate::motion::GroundContactLost;
use crate::DeterministicRng;

/// Система: manual look FSM
///
/// `CameraLookInput`: дельты одного кадра, обнуляются после чтения.
pub fn apply_camera_look(
    mut cameras: Query<(&mut ChaseCamera, &ChaseCameraSettings, &mut CameraLookInput)>,
    time: Res<Time>,
) {
    let delta = time.delta_secs();

    for (mut camera, settings, mut input) in cameras.iter_mut() {
        camera.apply_look_input(settings, &input, delta);
        *input = CameraLookInput::default();
    }
}

/// Система: отрыв target от земли → всплеск тряски
pub fn spike_shake_on_air(
    mut events: EventReader<GroundContactLost>,
    mut cameras: Query<(&mut ChaseCamera, &ChaseCameraSettings)>,
) {
    for event in events.read() {
        for (mut camera, settings) in cameras.iter_mut() {
            if camera.target == Some(event.bike) {
                camera.spike_shake(settings);
            }
        }
    }
}

/// Система: engine shake по скорости target
pub fn update_camera_shake(
    mut cameras: Query<(&mut ChaseCamera, &ChaseCameraSettings)>,
    targets: Query<&BikeMotion>,
    mut rng: ResMut<DeterministicRng>,
    time: Res<Time>,
) {
    let delta = time.delta_secs();

    for (mut camera, settings) in cameras.iter_mut() {
        let speed_ratio = camera
            .target
            .and_then(|target| targets.get(target).ok())
            .map(|motion| speed_ratio(settings, motion))
            .unwrap_or(0.0);

        let jitter = Vec2::new(rng.rng.gen_range(-1.0..=1.0), rng.rng.gen_range(-1.0..=1.0));
        camera.update_shake(settings, speed_ratio, jitter, delta);
    }
}

/// Speed ratio ∈ [0, 1] для presets и shake
pub fn speed_ratio(settings: &ChaseCameraSettings, motion: &BikeMotion) -> f32 {
    if settings.reference_speed_kmh <= 0.0 {
        return 0.0;
    }
    (motion.speed_kmh() / settings.reference_speed_kmh).clamp(0.0, 1.0)
}

/// Система: позиция и поворот камеры за target
///
/// 1. Speed presets (distance, height, FOV target)
/// 2. Desired позиция (manual orbit или back vector)
/// 3. Occlusion probe target → desired, clamp boom
/// 4. Боковые probes от стен
/// 5. Shake offset + SmoothDamp
/// 6. Look-at (slerp в auto, напрямую в manual)
/// 7. FOV
pub fn follow_target(
    mut cameras: Query<(Entity, &mut ChaseCamera, &ChaseCameraSettings, &mut Transform)>,
    targets: Query<(&Transform, Option<&BikeMotion>), Without<ChaseCamera>>,
    obstacles: ObstacleQuery,
    time: Res<Time>,
) {
    let delta = time.delta_secs();

    for (entity, mut camera, settings, mut transform) in cameras.iter_mut() {
        let Some(target) = camera.target else {
            continue;
        };

        let Ok((target_transform, motion)) = targets.get(target) else {
            if !camera.missing_target_logged {
                logger::log_warning(&format!(
                    "ChaseCamera {:?}: target {:?} has no Transform, camera idle",
                    entity, target
                ));
                camera.missing_target_logged = true;
            }
            continue;
        };
        camera.missing_target_logged = false;

        let first_frame = camera.last_target_position.is_none();
        camera.track_target_velocity(target_transform.translation, delta);

        let ratio = motion.map(|motion| speed_ratio(settings, motion));
        camera.update_speed_presets(settings, ratio, delta);

        // Occlusion
        let target_position = target_transform.translation;
        let desired = camera.desired_position(target_transform);
        let boom = desired - target_position;
        let hit = cast_obstacles(obstacles.iter(), target_position, boom, boom.length());
        let resolved = camera.resolve_boom(settings, target_position, desired, hit);

        // Стены по бокам камеры
        let right = *transform.right();
        let wall_right = cast_obstacles(obstacles.iter(), resolved, right, settings.wall_probe_length).is_some();
        let wall_left = cast_obstacles(obstacles.iter(), resolved, -right, settings.wall_probe_length).is_some();
        let goal = ChaseCamera::avoid_walls(settings, resolved, right, wall_right, wall_left) + camera.shake_offset;

        if first_frame {
            transform.translation = goal;
        } else {
            let mut velocity = camera.smoothing_velocity;
            transform.translation = crate::math::smooth_damp(
                transform.translation,
                goal,
                &mut velocity,
                settings.position_smooth_time,
                delta,
            );
            camera.smoothing_velocity = velocity;
        }

        // Look-at
        // Со знаком: задним ходом look-ahead уходит за спину target
        let speed = motion
            .map(|motion| motion.current_speed)
            .unwrap_or(camera.target_velocity);
        let look_point = camera.look_at_point(settings, target_transform, speed);
        let look_rotation = transform.looking_at(look_point, Vec3::Y).rotation;

        transform.rotation = if camera.manual.is_manual() || first_frame {
            look_rotation
        } else {
            let t = (settings.rotation_smoothing * delta).clamp(0.0, 1.0);
            transform.rotation.slerp(look_rotation, t)
        };

        camera.update_fov(settings, delta);
    }
}

/// Bundle chase camera за `target`
pub fn chase_camera_bundle(target: Entity, settings: ChaseCameraSettings) -> impl Bundle {
    (ChaseCamera::new(Some(target), &settings), settings)
}
