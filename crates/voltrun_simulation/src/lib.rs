//! VOLTRUN Simulation Core
//!
//! ECS-симуляция электробайка-курьера на Bevy 0.16 (headless)
//!
//! Слои:
//! - components: данные + чистые per-tick методы (Battery, BikeMotion, ChaseCamera)
//! - battery / motion / camera / delivery: системы и события
//! - hud: snapshot для UI (рендер: забота host'а)
//!
//! Host (renderer, input) пишет `DriveInput` / `CameraLookInput` и события,
//! читает компоненты, события и `RideHud`.

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

// Публичные модули
pub mod battery;
pub mod camera;
pub mod components;
pub mod delivery;
pub mod hud;
pub mod logger;
pub mod math;
pub mod motion;
pub mod proximity;

// Re-export базовых компонентов для удобства
pub use battery::{BatteryPlugin, BatteryThresholdCrossed, ChargeRequest};
pub use camera::CameraPlugin;
pub use components::*;
pub use delivery::{
    DeliverAttempt, DeliveryCompleted, DeliveryConfig, DeliveryFailed, DeliveryPhase, DeliveryPlugin,
    DeliveryStarted, DeliveryStats, DeliveryTimer, PackagePickedUp,
};
pub use hud::{HudPlugin, RideHud, ScreenSize, TimerUrgency};
pub use logger::{init_logger, log, log_error, log_info, log_warning, LogLevel, LogPrinter};
pub use motion::{
    ActivateBoost, BoostActivated, BoostEnded, BoostReady, BoostRejectedEvent, ForceStop, GroundContactLost,
    LaunchImpulse, Landed, MotionPlugin,
};
pub use proximity::{ProximityEntered, ProximityPlugin};

/// Seed по умолчанию (если host не вставил свой `DeterministicRng`)
pub const DEFAULT_SEED: u64 = 42;

/// Порядок фаз кадра (Update)
///
/// Input → Resource → Motion → Camera → Timers → Snapshot.
/// Каждая подсистема кладёт свои системы в нужную фазу.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimSet {
    /// Proximity, запросы host'а (charge, boost, force stop)
    Input,
    /// Battery tick
    Resource,
    /// Drive интеграция, пороги батареи
    Motion,
    /// Chase camera (после движения target)
    Camera,
    /// Boost таймеры, delivery countdown
    Timers,
    /// HUD snapshot
    Snapshot,
}

/// Главный plugin симуляции (объединяет все подсистемы)
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        init_logger();

        // Seed от host'а не перетираем (create_headless_app ставит свой)
        if !app.world().contains_resource::<DeterministicRng>() {
            app.insert_resource(DeterministicRng::new(DEFAULT_SEED));
        }

        app
            // Fixed timestep 60Hz для ride physics
            .insert_resource(Time::<Fixed>::from_hz(60.0))
            .init_resource::<GroundLevel>()
            .configure_sets(
                Update,
                (
                    SimSet::Input,
                    SimSet::Resource,
                    SimSet::Motion,
                    SimSet::Camera,
                    SimSet::Timers,
                    SimSet::Snapshot,
                )
                    .chain(),
            )
            // Подсистемы
            .add_plugins((
                ProximityPlugin,
                BatteryPlugin,
                MotionPlugin,
                CameraPlugin,
                DeliveryPlugin,
                HudPlugin,
            ));
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Высота земли (Y) для ground detection
#[derive(Resource, Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
pub struct GroundLevel {
    pub height: f32,
    /// Допуск над землёй, при котором байк ещё считается grounded
    pub tolerance: f32,
}

impl Default for GroundLevel {
    fn default() -> Self {
        Self {
            height: 0.0,
            tolerance: 0.05,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(Time::<Fixed>::from_hz(60.0)); // 60Hz FixedUpdate

    app
}

/// Snapshot мира для сравнения детерминизма
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    // Сериализуем в байты через Debug (простейший способ)
    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
