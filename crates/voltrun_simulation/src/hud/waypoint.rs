//! Waypoint: проекция точки доставки на экран (pinhole chase camera)

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Размер экрана host'а (пиксели, origin: левый нижний угол)
#[derive(Resource, Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
pub struct ScreenSize {
    pub width: f32,
    pub height: f32,
    /// Отступ маркера от края экрана
    pub edge_buffer: f32,
}

impl Default for ScreenSize {
    fn default() -> Self {
        Self {
            width: 1920.0,
            height: 1080.0,
            edge_buffer: 50.0,
        }
    }
}

/// Маркер на экране
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenMarker {
    /// Позиция, прижатая к краям с edge_buffer
    pub position: Vec2,
    pub on_screen: bool,
}

/// Точка мира → пиксели экрана
///
/// Камера смотрит вдоль -Z, `fov_degrees`: вертикальный.
/// Точка за камерой отражается через центр экрана и считается off-screen,
/// чтобы маркер прилипал к краю со стороны цели.
pub fn project_to_screen(camera: &Transform, fov_degrees: f32, screen: &ScreenSize, world: Vec3) -> ScreenMarker {
    let local = camera.rotation.inverse() * (world - camera.translation);
    let mut depth = -local.z;
    if depth.abs() < 1e-4 {
        depth = -1e-4;
    }

    let half_height = (fov_degrees.to_radians() * 0.5).tan().max(1e-4);
    let aspect = screen.width / screen.height.max(1.0);
    let ndc = Vec2::new(
        local.x / (depth * half_height * aspect),
        local.y / (depth * half_height),
    );

    let mut position = Vec2::new((ndc.x + 1.0) * 0.5 * screen.width, (ndc.y + 1.0) * 0.5 * screen.height);
    let mut on_screen = true;

    if depth < 0.0 {
        position = Vec2::new(screen.width - position.x, screen.height - position.y);
        on_screen = false;
    }

    if position.x < 0.0 || position.x > screen.width || position.y < 0.0 || position.y > screen.height {
        on_screen = false;
    }

    let buffer = screen.edge_buffer.min(screen.width * 0.5).min(screen.height * 0.5);
    position.x = position.x.clamp(buffer, screen.width - buffer);
    position.y = position.y.clamp(buffer, screen.height - buffer);

    ScreenMarker { position, on_screen }
}

/// Дистанция для HUD: "123m"
pub fn format_distance(distance: f32) -> String {
    format!("{:.0}m", distance.max(0.0))
}
