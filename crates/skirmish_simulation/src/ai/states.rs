//! Enemy FSM tags: состояния и triggers
//!
//! Иерархия:
//! - Patrol ⊃ { Idle, Relocate }
//! - Combat ⊃ { Chase, Attack }
//! - Recover
//! - Death (terminal)

use crate::fsm::TriggerRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnemyState {
    /// Parent: мирное поведение в своей зоне
    Patrol,
    /// Стоим/бродим внутри зоны, ждём idle timer
    Idle,
    /// Идём в другую зону
    Relocate,
    /// Parent: бой с игроком
    Combat,
    /// Преследуем/кружим вокруг цели (swarm "ready" state)
    Chase,
    /// Держим/ждём attack slot
    Attack,
    /// Отступили, регенерируем health
    Recover,
    /// Terminal
    Death,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnemyTrigger {
    SeePlayer,
    LosePlayer,
    Attacked,
    InAttackRange,
    OutOfAttackRange,
    AttackFinished,
    IdleTimerElapsed,
    ReachZone,
    LowHealth,
    RecoveredHealth,
    Die,
}

impl EnemyTrigger {
    pub const ALL: [EnemyTrigger; 11] = [
        EnemyTrigger::SeePlayer,
        EnemyTrigger::LosePlayer,
        EnemyTrigger::Attacked,
        EnemyTrigger::InAttackRange,
        EnemyTrigger::OutOfAttackRange,
        EnemyTrigger::AttackFinished,
        EnemyTrigger::IdleTimerElapsed,
        EnemyTrigger::ReachZone,
        EnemyTrigger::LowHealth,
        EnemyTrigger::RecoveredHealth,
        EnemyTrigger::Die,
    ];

    /// Имя как его шлёт perception collaborator
    pub fn name(self) -> &'static str {
        match self {
            EnemyTrigger::SeePlayer => "SeePlayer",
            EnemyTrigger::LosePlayer => "LosePlayer",
            EnemyTrigger::Attacked => "Attacked",
            EnemyTrigger::InAttackRange => "InAttackRange",
            EnemyTrigger::OutOfAttackRange => "OutOfAttackRange",
            EnemyTrigger::AttackFinished => "AttackFinished",
            EnemyTrigger::IdleTimerElapsed => "IdleTimerElapsed",
            EnemyTrigger::ReachZone => "ReachZone",
            EnemyTrigger::LowHealth => "LowHealth",
            EnemyTrigger::RecoveredHealth => "RecoveredHealth",
            EnemyTrigger::Die => "Die",
        }
    }

    /// Registry для строковых событий (все triggers по их enum name)
    pub fn registry() -> TriggerRegistry<EnemyTrigger> {
        TriggerRegistry::from_names(Self::ALL.iter().map(|trigger| (trigger.name(), *trigger)))
    }
}
