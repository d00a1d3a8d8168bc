//! AI Events: граница между enemy brains и внешними collaborators
//!
//! Входящие: perception (строковые triggers), combat (health), navigation (arrival).
//! Исходящие: navigation requests + уведомления о состоянии врага.

use bevy::prelude::*;

use super::states::{EnemyState, EnemyTrigger};

/// Perception → brain: trigger по имени ("SeePlayer", "Attacked", ...)
///
/// Неизвестное имя логируется и отбрасывается.
#[derive(Event, Debug, Clone)]
pub struct PerceptionEvent {
    pub entity: Entity,
    pub trigger: String,
}

impl PerceptionEvent {
    pub fn new(entity: Entity, trigger: impl Into<String>) -> Self {
        Self {
            entity,
            trigger: trigger.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HealthChangeKind {
    /// loseHP
    Damage(f32),
    /// healHP
    Heal(f32),
    /// Прямая установка (clamp в [0, max])
    Set(f32),
}

/// Combat collaborator → brain
#[derive(Event, Debug, Clone, Copy)]
pub struct HealthChange {
    pub entity: Entity,
    pub change: HealthChangeKind,
}

/// Navigation collaborator → brain: дошли до точки
#[derive(Event, Debug, Clone, Copy)]
pub struct DestinationReached {
    pub entity: Entity,
    pub position: Vec3,
}

/// Brain → navigation collaborator: идти в точку
#[derive(Event, Debug, Clone, Copy)]
pub struct NavigationRequest {
    pub entity: Entity,
    pub destination: Vec3,
}

/// Health впервые упал ниже порога (latched до RecoveredHealth)
#[derive(Event, Debug, Clone, Copy)]
pub struct EnemyLowHealth {
    pub entity: Entity,
}

/// Recover завершён
#[derive(Event, Debug, Clone, Copy)]
pub struct EnemyRecovered {
    pub entity: Entity,
}

/// Враг умер (ровно один раз на entity)
#[derive(Event, Debug, Clone, Copy)]
pub struct EnemyDied {
    pub entity: Entity,
}

/// Зеркало каждого FSM перехода (для UI/анимаций/отладки)
#[derive(Event, Debug, Clone, Copy)]
pub struct EnemyStateChanged {
    pub entity: Entity,
    pub from: EnemyState,
    pub to: EnemyState,
    pub trigger: EnemyTrigger,
}
