//! Chase camera компоненты: настройки, состояние, manual look, shake
//!
//! Вся математика кадра: методы `ChaseCamera`, системы в `camera/`
//! только достают target transform и occlusion probes.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::math::lerp;

/// Настройки chase camera
#[derive(Component, Debug, Clone, Copy, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
pub struct ChaseCameraSettings {
    // Follow
    /// Дистанция в покое (метры)
    pub distance: f32,
    /// Высота в покое (метры)
    pub height: f32,
    /// Время сглаживания позиции (секунды)
    pub position_smooth_time: f32,
    /// Скорость slerp поворота (1/sec)
    pub rotation_smoothing: f32,

    // Speed presets
    pub speed_distance: f32,
    pub speed_height: f32,
    /// Скорость перехода distance/height (1/sec)
    pub speed_transition: f32,
    /// km/h при которых ratio = 1
    pub reference_speed_kmh: f32,
    pub base_fov: f32,
    pub speed_fov_increase: f32,
    pub fov_transition: f32,

    // Manual look
    pub look_sensitivity_x: f32,
    pub look_sensitivity_y: f32,
    pub invert_y: bool,
    /// Предел yaw (градусы)
    pub max_yaw: f32,
    /// Предел pitch (градусы)
    pub max_pitch: f32,
    /// Мёртвая зона input (градусы за кадр после sensitivity)
    pub look_deadzone: f32,
    /// Сколько держим manual углы без input (секунды)
    pub manual_reset_window: f32,
    /// Скорость экспоненциального возврата (1/sec)
    pub manual_decay: f32,
    /// Порог возврата в Auto (градусы)
    pub manual_epsilon: f32,

    // Shake
    pub engine_shake: f32,
    pub landing_shake: f32,
    pub shake_decay: f32,

    // Collision avoidance
    pub min_distance: f32,
    pub max_distance: f32,
    pub collision_offset: f32,
    pub wall_probe_length: f32,
    pub wall_avoidance_force: f32,

    /// Look-ahead по скорости target
    pub look_ahead: f32,
}

impl Default for ChaseCameraSettings {
    fn default() -> Self {
        Self {
            distance: 5.0,
            height: 2.0,
            position_smooth_time: 0.15,
            rotation_smoothing: 10.0,

            speed_distance: 8.0,
            speed_height: 3.0,
            speed_transition: 2.0,
            reference_speed_kmh: 50.0,
            base_fov: 60.0,
            speed_fov_increase: 15.0,
            fov_transition: 3.0,

            look_sensitivity_x: 2.0,
            look_sensitivity_y: 2.0,
            invert_y: false,
            max_yaw: 120.0,
            max_pitch: 80.0,
            look_deadzone: 0.1,
            manual_reset_window: 2.0,
            manual_decay: 3.0,
            manual_epsilon: 0.1,

            engine_shake: 0.05,
            landing_shake: 1.0,
            shake_decay: 5.0,

            min_distance: 1.0,
            max_distance: 10.0,
            collision_offset: 0.5,
            wall_probe_length: 2.0,
            wall_avoidance_force: 2.0,

            look_ahead: 2.0,
        }
    }
}

impl ChaseCameraSettings {
    /// Resting distance, клампится в [min_distance, max_distance]
    pub fn set_distance(&mut self, value: f32) {
        self.distance = value.clamp(self.min_distance, self.max_distance);
    }
}

/// Manual look FSM
#[derive(Debug, Clone, Copy, PartialEq, Default, Reflect)]
pub enum ManualLook {
    /// Камера следует за forward target
    #[default]
    Auto,
    /// Free-look: углы относительно yaw target (градусы)
    Manual { yaw: f32, pitch: f32, timer: f32 },
}

impl ManualLook {
    pub fn is_manual(&self) -> bool {
        matches!(self, ManualLook::Manual { .. })
    }

    pub fn angles(&self) -> Vec2 {
        match self {
            ManualLook::Auto => Vec2::ZERO,
            ManualLook::Manual { yaw, pitch, .. } => Vec2::new(*yaw, *pitch),
        }
    }
}

/// Look input камеры (mouse delta, reset key): пишет host
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct CameraLookInput {
    /// Сырые дельты указателя за кадр
    pub delta: Vec2,
    pub reset: bool,
}

/// Marker: геометрия, которую камера обходит (occlusion layer)
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct CameraObstacle;

/// Chase camera: привязана к одному target
///
/// Инвариант: `resolved_distance` ∈ [min_distance, max_distance] после occlusion.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
#[require(ChaseCameraSettings, CameraLookInput, Transform)]
pub struct ChaseCamera {
    /// Tracked entity (None → камера отключена)
    pub target: Option<Entity>,
    pub current_distance: f32,
    pub current_height: f32,
    pub current_fov: f32,
    pub target_fov: f32,
    pub manual: ManualLook,
    pub shake_intensity: f32,
    pub shake_offset: Vec3,
    /// Длина boom после occlusion correction
    pub resolved_distance: f32,
    /// Скорость target (m/s) по разнице позиций
    pub target_velocity: f32,
    /// SmoothDamp state
    pub(crate) smoothing_velocity: Vec3,
    pub(crate) last_target_position: Option<Vec3>,
    /// Warning про пропавший target уже выдан
    pub(crate) missing_target_logged: bool,
}

impl Default for ChaseCamera {
    fn default() -> Self {
        Self::new(None, &ChaseCameraSettings::default())
    }
}

impl ChaseCamera {
    pub fn new(target: Option<Entity>, settings: &ChaseCameraSettings) -> Self {
        Self {
            target,
            current_distance: settings.distance,
            current_height: settings.height,
            current_fov: settings.base_fov,
            target_fov: settings.base_fov,
            manual: ManualLook::Auto,
            shake_intensity: 0.0,
            shake_offset: Vec3::ZERO,
            resolved_distance: settings.distance.clamp(settings.min_distance, settings.max_distance),
            target_velocity: 0.0,
            smoothing_velocity: Vec3::ZERO,
            last_target_position: None,
            missing_target_logged: false,
        }
    }

    pub fn following(target: Entity) -> Self {
        Self::new(Some(target), &ChaseCameraSettings::default())
    }

    /// Manual look FSM: Auto → Manual при input > deadzone, decay после таймера
    pub fn apply_look_input(&mut self, settings: &ChaseCameraSettings, input: &CameraLookInput, delta_time: f32) {
        if input.reset {
            self.manual = ManualLook::Auto;
            return;
        }

        let y_sign = if settings.invert_y { 1.0 } else { -1.0 };
        let scaled = Vec2::new(
            input.delta.x * settings.look_sensitivity_x,
            input.delta.y * settings.look_sensitivity_y * y_sign,
        );
        let has_input = scaled.x.abs() > settings.look_deadzone || scaled.y.abs() > settings.look_deadzone;

        if has_input {
            let current = self.manual.angles();
            self.manual = ManualLook::Manual {
                yaw: (current.x + scaled.x).clamp(-settings.max_yaw, settings.max_yaw),
                pitch: (current.y + scaled.y).clamp(-settings.max_pitch, settings.max_pitch),
                timer: settings.manual_reset_window,
            };
            return;
        }

        let ManualLook::Manual { yaw, pitch, timer } = self.manual else {
            return;
        };

        if timer > 0.0 {
            self.manual = ManualLook::Manual {
                yaw,
                pitch,
                timer: (timer - delta_time).max(0.0),
            };
            return;
        }

        let t = (settings.manual_decay * delta_time).clamp(0.0, 1.0);
        let decayed = Vec2::new(yaw, pitch).lerp(Vec2::ZERO, t);
        self.manual = if decayed.length() < settings.manual_epsilon {
            ManualLook::Auto
        } else {
            ManualLook::Manual {
                yaw: decayed.x,
                pitch: decayed.y,
                timer: 0.0,
            }
        };
    }

    /// Blend distance/height/FOV между resting и high-speed presets
    ///
    /// `speed_ratio = None`: target без motion, сразу resting presets.
    pub fn update_speed_presets(&mut self, settings: &ChaseCameraSettings, speed_ratio: Option<f32>, delta_time: f32) {
        let Some(ratio) = speed_ratio else {
            self.current_distance = settings.distance;
            self.current_height = settings.height;
            self.target_fov = settings.base_fov;
            return;
        };

        let ratio = ratio.clamp(0.0, 1.0);
        let target_distance = lerp(settings.distance, settings.speed_distance, ratio);
        let target_height = lerp(settings.height, settings.speed_height, ratio);

        let t = (settings.speed_transition * delta_time).clamp(0.0, 1.0);
        self.current_distance = lerp(self.current_distance, target_distance, t)
            .clamp(settings.min_distance, settings.max_distance);
        self.current_height = lerp(self.current_height, target_height, t);
        self.target_fov = settings.base_fov + ratio * settings.speed_fov_increase;
    }

    pub fn update_fov(&mut self, settings: &ChaseCameraSettings, delta_time: f32) {
        let t = (settings.fov_transition * delta_time).clamp(0.0, 1.0);
        self.current_fov = lerp(self.current_fov, self.target_fov, t);
    }

    /// Желаемая позиция за target (до occlusion)
    pub fn desired_position(&self, target: &Transform) -> Vec3 {
        let direction = match self.manual {
            ManualLook::Manual { yaw, pitch, .. } => {
                let (target_yaw, _, _) = target.rotation.to_euler(EulerRot::YXZ);
                // Положительный pitch поднимает камеру над target
                let orbit = Quat::from_euler(EulerRot::YXZ, target_yaw + yaw.to_radians(), -pitch.to_radians(), 0.0);
                orbit * Vec3::Z
            }
            ManualLook::Auto => *target.back(),
        };

        target.translation + direction * self.current_distance + Vec3::Y * self.current_height
    }

    /// Occlusion correction boom'а target → desired
    ///
    /// `hit_distance`: результат probe (None = путь свободен).
    /// Длина boom клампится в [min_distance, max_distance] в обоих случаях.
    pub fn resolve_boom(&mut self, settings: &ChaseCameraSettings, target: Vec3, desired: Vec3, hit_distance: Option<f32>) -> Vec3 {
        let offset = desired - target;
        let length = offset.length();
        let Some(direction) = offset.try_normalize() else {
            self.resolved_distance = settings.min_distance;
            return target + Vec3::Y * settings.min_distance;
        };

        let boom = match hit_distance {
            Some(hit) => (hit - settings.collision_offset).clamp(settings.min_distance, settings.max_distance),
            None => length.clamp(settings.min_distance, settings.max_distance),
        };

        self.resolved_distance = boom;
        target + direction * boom
    }

    /// Сдвиг от стен по результатам боковых probes
    pub fn avoid_walls(settings: &ChaseCameraSettings, position: Vec3, right: Vec3, wall_right: bool, wall_left: bool) -> Vec3 {
        let mut position = position;
        if wall_right {
            position -= right * settings.wall_avoidance_force;
        }
        if wall_left {
            position += right * settings.wall_avoidance_force;
        }
        position
    }

    /// Всплеск тряски (отрыв от земли)
    pub fn spike_shake(&mut self, settings: &ChaseCameraSettings) {
        self.shake_intensity = self.shake_intensity.max(settings.landing_shake);
    }

    /// Intensity → engine_shake × speed_ratio, offset в пределах ±intensity
    ///
    /// `jitter`: две случайные величины в [-1, 1].
    pub fn update_shake(&mut self, settings: &ChaseCameraSettings, speed_ratio: f32, jitter: Vec2, delta_time: f32) {
        let base = settings.engine_shake * speed_ratio.max(0.0);
        let t = (settings.shake_decay * delta_time).clamp(0.0, 1.0);
        self.shake_intensity = lerp(self.shake_intensity, base, t).max(0.0);

        self.shake_offset = if self.shake_intensity > 0.001 {
            Vec3::new(
                jitter.x.clamp(-1.0, 1.0) * self.shake_intensity,
                jitter.y.clamp(-1.0, 1.0) * self.shake_intensity,
                0.0,
            )
        } else {
            Vec3::ZERO
        };
    }

    /// Точка взгляда: manual: сам target, auto: с look-ahead по скорости
    ///
    /// `target_speed` со знаком (отрицательная = задний ход).
    pub fn look_at_point(&self, settings: &ChaseCameraSettings, target: &Transform, target_speed: f32) -> Vec3 {
        if self.manual.is_manual() {
            return target.translation;
        }
        target.translation + *target.forward() * (target_speed * settings.look_ahead * 0.5)
    }

    /// Трекинг скорости target по разнице позиций
    pub fn track_target_velocity(&mut self, position: Vec3, delta_time: f32) {
        if let Some(last) = self.last_target_position {
            if delta_time > 0.0 {
                self.target_velocity = position.distance(last) / delta_time;
            }
        }
        self.last_target_position = Some(position);
    }
}
