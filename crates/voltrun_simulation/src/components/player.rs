//! Player control marker component

use bevy::prelude::Component;

/// Marker component для байка игрока
///
/// Delivery спавнит посылку над ним, HUD читает его состояние.
/// В single-player обычно ровно один entity имеет этот компонент.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Player;
