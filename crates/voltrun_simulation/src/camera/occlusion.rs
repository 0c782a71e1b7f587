//! Occlusion probes: ray casts против `CameraObstacle` коллайдеров
//!
//! Без physics pipeline: brute-force по всем obstacle entity через
//! shape-level `Collider::cast_ray`. Позиция коллайдера: `Transform`
//! (headless, GlobalTransform не пропагируется).

use bevy::prelude::*;
use bevy_rapier3d::prelude::Collider;

use crate::components::{Bike, CameraObstacle, ChaseCamera};

/// Obstacle геометрия для camera probes
pub type ObstacleQuery<'w, 's> = Query<
    'w,
    's,
    (&'static Transform, &'static Collider),
    (With<CameraObstacle>, Without<ChaseCamera>, Without<Bike>),
>;

/// Ближайшее попадание луча (дистанция вдоль `direction`)
///
/// `direction` нормализуется; нулевой вектор → None.
pub fn cast_obstacles<'a>(
    obstacles: impl IntoIterator<Item = (&'a Transform, &'a Collider)>,
    origin: Vec3,
    direction: Vec3,
    max_distance: f32,
) -> Option<f32> {
    let direction = direction.try_normalize()?;
    if max_distance <= 0.0 {
        return None;
    }

    obstacles
        .into_iter()
        .filter_map(|(transform, collider)| {
            collider.cast_ray(
                transform.translation,
                transform.rotation,
                origin,
                direction,
                max_distance,
                true,
            )
        })
        .min_by(|a, b| a.total_cmp(b))
}

/// Bundle box-препятствия (стена, здание)
pub fn obstacle_bundle(position: Vec3, half_extents: Vec3) -> impl Bundle {
    (
        CameraObstacle,
        Collider::cuboid(half_extents.x, half_extents.y, half_extents.z),
        Transform::from_translation(position),
    )
}
