//! Combo events: input → resolver → attack ID для animation collaborator

use bevy::prelude::*;

use super::resolver::{AttackId, AttackKind, Stance};

/// Нажатие кнопки атаки (input binding — снаружи)
#[derive(Event, Debug, Clone, Copy)]
pub struct AttackInput {
    pub entity: Entity,
    pub kind: AttackKind,
    pub stance: Stance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AirborneChange {
    TakeOff,
    Land,
    AirDash,
}

/// Movement collaborator: смена airborne состояния игрока
#[derive(Event, Debug, Clone, Copy)]
pub struct AirborneEvent {
    pub entity: Entity,
    pub change: AirborneChange,
}

/// Animation collaborator: клип атаки доигран
#[derive(Event, Debug, Clone, Copy)]
pub struct AttackAnimationComplete {
    pub entity: Entity,
}

/// Выбранная атака (opaque ID → клип + damage window снаружи)
#[derive(Event, Debug, Clone, Copy)]
pub struct AttackResolved {
    pub entity: Entity,
    pub attack: AttackId,
    /// None для aerial атак
    pub tier: Option<u8>,
    pub finisher: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComboResetReason {
    /// Истекло окно неактивности
    Timeout,
    /// Tier 3 выполнен
    Finisher,
}

#[derive(Event, Debug, Clone, Copy)]
pub struct ComboReset {
    pub entity: Entity,
    pub reason: ComboResetReason,
}
