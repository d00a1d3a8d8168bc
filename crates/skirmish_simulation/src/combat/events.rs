//! Combat events вокруг attack slots

use bevy::prelude::*;

/// Анимация/hitbox collaborator → arbitrator: атака врага закончилась
#[derive(Event, Debug, Clone, Copy)]
pub struct AttackFinished {
    pub entity: Entity,
}

/// Arbitrator выдал slot — враг реально начинает атаку
#[derive(Event, Debug, Clone, Copy)]
pub struct EnemyAttackStarted {
    pub entity: Entity,
}
