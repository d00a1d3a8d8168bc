//! Combat module: arbitration атак врагов
//!
//! ECS ответственность:
//! - AttackSlotArbitrator: кто из врагов может атаковать прямо сейчас
//! - Events: AttackFinished (вход), EnemyAttackStarted (выход)
//!
//! Само попадание/урон — внешний collaborator (анимация + hitbox),
//! обратно приходит через HealthChange и AttackFinished.

use bevy::prelude::*;

use crate::config::SimulationConfig;
use crate::SimulationSet;

pub mod attack_slots;
pub mod events;
pub mod systems;

// Re-export основных типов
pub use attack_slots::{AttackSlotArbitrator, AttackerKind};
pub use events::{AttackFinished, EnemyAttackStarted};

/// Combat Plugin
///
/// Порядок выполнения (SimulationSet::Arbitration):
/// 1. register_new_attackers: новые враги в конец очереди
/// 2. apply_attack_finished: AttackFinished → FSM
/// 3. sweep_attack_slots: purge мёртвых, затем timeouts
/// 4. gate_enemy_attacks: возврат slots, затем выдача
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        let config = app
            .world()
            .get_resource::<SimulationConfig>()
            .cloned()
            .unwrap_or_default();

        // Регистрация событий
        app.add_event::<AttackFinished>()
            .add_event::<EnemyAttackStarted>()
            .insert_resource(AttackSlotArbitrator::new(&config.attack_slots));

        // Регистрация систем в FixedUpdate
        app.add_systems(
            FixedUpdate,
            (
                systems::register_new_attackers,
                systems::apply_attack_finished,
                systems::sweep_attack_slots,
                systems::gate_enemy_attacks,
            )
                .chain() // Последовательное выполнение
                .in_set(SimulationSet::Arbitration),
        );
    }
}
