//! ECS Components для игровых entity
//!
//! Организация по доменам:
//! - battery: заряд, режим, пороги, источник зарядки (Battery, ChargeSource)
//! - motion: байк, tuning, boost, input (Bike, BikeMotion, DriveInput)
//! - camera: chase camera и её настройки (ChaseCamera, ChaseCameraSettings)
//! - delivery: точки доставки и посылки (DeliveryPoint, Package)
//! - world: proximity triggers, зарядные станции
//! - player: player control marker (Player)

pub mod battery;
pub mod camera;
pub mod delivery;
pub mod motion;
pub mod player;
pub mod world;

pub use battery::*;
pub use camera::*;
pub use delivery::*;
pub use motion::*;
pub use player::*;
pub use world::*;
