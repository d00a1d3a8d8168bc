//! Archetype → таблица переходов enemy FSM
//!
//! Один builder на все archetype'ы; различия — точечные ignore/permit.
//! Hooks делегируют в `EnemyContext`, сами данных не держат.

use super::brain::{EnemyContext, EnemyMachine};
use super::states::{EnemyState as S, EnemyTrigger as T};
use crate::fsm::StateMachineBuilder;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnemyArchetype {
    /// Обычный враг: полный цикл patrol / combat / recover
    Grunt,
    /// Swarm-враг: не отступает на восстановление
    Swarmling,
    /// Босс: не меняет зону, не отступает, умирает только через health
    Boss,
}

impl EnemyArchetype {
    pub fn is_boss(self) -> bool {
        matches!(self, EnemyArchetype::Boss)
    }
}

pub fn build_machine(archetype: EnemyArchetype) -> EnemyMachine {
    let mut builder: StateMachineBuilder<S, T, EnemyContext> = StateMachineBuilder::new(S::Idle);

    // --- Patrol branch ---
    let patrol = builder
        .configure(S::Patrol)
        .permit(T::SeePlayer, S::Chase)
        .permit(T::Attacked, S::Chase);
    let patrol = match archetype {
        EnemyArchetype::Grunt => patrol.permit(T::LowHealth, S::Recover),
        EnemyArchetype::Swarmling | EnemyArchetype::Boss => patrol.ignore(T::LowHealth),
    };
    if !archetype.is_boss() {
        patrol.permit(T::Die, S::Death);
    }

    let idle = builder
        .configure(S::Idle)
        .substate_of(S::Patrol)
        .on_entry(|ctx: &mut EnemyContext, _| ctx.enter_idle())
        .on_exit(|ctx: &mut EnemyContext, _| ctx.exit_idle());
    if archetype.is_boss() {
        idle.ignore(T::IdleTimerElapsed);
    } else {
        idle.permit(T::IdleTimerElapsed, S::Relocate);
    }

    builder
        .configure(S::Relocate)
        .substate_of(S::Patrol)
        .permit(T::ReachZone, S::Idle)
        .on_entry(|ctx: &mut EnemyContext, _| ctx.enter_relocate())
        .on_exit(|ctx: &mut EnemyContext, _| ctx.exit_relocate());

    // --- Combat branch ---
    let combat = builder
        .configure(S::Combat)
        .permit(T::LosePlayer, S::Idle);
    let combat = match archetype {
        EnemyArchetype::Grunt => combat.permit(T::LowHealth, S::Recover),
        EnemyArchetype::Swarmling | EnemyArchetype::Boss => combat.ignore(T::LowHealth),
    };
    if !archetype.is_boss() {
        combat.permit(T::Die, S::Death);
    }

    builder
        .configure(S::Chase)
        .substate_of(S::Combat)
        .permit(T::InAttackRange, S::Attack)
        .ignore(T::SeePlayer)
        .ignore(T::Attacked)
        .ignore(T::OutOfAttackRange);

    builder
        .configure(S::Attack)
        .substate_of(S::Combat)
        .permit(T::AttackFinished, S::Chase)
        .permit(T::OutOfAttackRange, S::Chase)
        .ignore(T::SeePlayer)
        .ignore(T::Attacked)
        .ignore(T::InAttackRange)
        .on_entry(|ctx: &mut EnemyContext, _| ctx.enter_attack())
        .on_exit(|ctx: &mut EnemyContext, _| ctx.exit_attack());

    // --- Recover ---
    if archetype == EnemyArchetype::Grunt {
        builder
            .configure(S::Recover)
            .permit(T::RecoveredHealth, S::Idle)
            .permit(T::Die, S::Death)
            .permit(T::Attacked, S::Chase)
            .ignore(T::LowHealth)
            .ignore(T::SeePlayer)
            .on_entry(|ctx: &mut EnemyContext, _| ctx.enter_recover())
            .on_exit(|ctx: &mut EnemyContext, _| ctx.exit_recover());
    }

    // --- Death: terminal, переходов нет ---
    builder
        .configure(S::Death)
        .on_entry(|ctx: &mut EnemyContext, _| ctx.enter_death());

    builder.on_transitioned(|ctx: &mut EnemyContext, transition| ctx.after_transition(transition));

    builder.build()
}
