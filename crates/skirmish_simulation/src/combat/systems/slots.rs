//! Attack slot systems: регистрация, finish, sweep (purge + timeout), gate.

use bevy::prelude::*;

use crate::ai::{EnemyBrain, EnemyTrigger};
use crate::combat::attack_slots::{AttackSlotArbitrator, AttackerKind};
use crate::combat::events::{AttackFinished, EnemyAttackStarted};

/// Система: новые враги встают в очередь (порядок спавна)
pub fn register_new_attackers(
    mut arbitrator: ResMut<AttackSlotArbitrator>,
    spawned: Query<(Entity, &EnemyBrain), Added<EnemyBrain>>,
) {
    for (entity, brain) in spawned.iter() {
        let kind = if brain.is_boss() {
            AttackerKind::Boss
        } else {
            AttackerKind::Regular
        };
        arbitrator.register(entity, kind);
    }
}

/// Система: AttackFinished → FSM (slot вернёт exit hook через gate)
pub fn apply_attack_finished(mut events: EventReader<AttackFinished>, mut brains: Query<&mut EnemyBrain>) {
    for event in events.read() {
        let Ok(mut brain) = brains.get_mut(event.entity) else {
            continue;
        };

        if brain.state() == crate::ai::EnemyState::Attack {
            let _ = brain.fire(EnemyTrigger::AttackFinished);
        }
    }
}

/// Система: purge мёртвых → timeout cycling (в этом порядке)
pub fn sweep_attack_slots(
    time: Res<Time>,
    mut arbitrator: ResMut<AttackSlotArbitrator>,
    mut brains: Query<&mut EnemyBrain>,
) {
    let now = time.elapsed_secs();

    let expired = arbitrator.tick(now, |entity| {
        brains.get(entity).map(|brain| brain.is_alive()).unwrap_or(false)
    });

    // Застрявшая атака отзывается: враг возвращается в Chase
    for entity in expired {
        if let Ok(mut brain) = brains.get_mut(entity) {
            brain.revoke_attack_slot();
        }
    }
}

/// Система: сначала возвраты slots, потом выдача ждущим
pub fn gate_enemy_attacks(
    time: Res<Time>,
    mut arbitrator: ResMut<AttackSlotArbitrator>,
    mut brains: Query<(Entity, &mut EnemyBrain)>,
    mut started: EventWriter<EnemyAttackStarted>,
) {
    let now = time.elapsed_secs();

    for (entity, mut brain) in brains.iter_mut() {
        if brain.take_slot_release() {
            arbitrator.finish_attack(entity, brain.is_alive());
        }
    }

    for (entity, mut brain) in brains.iter_mut() {
        if !brain.wants_attack_slot() {
            continue;
        }

        if arbitrator.can_attack(entity) && arbitrator.begin_attack(entity, now) {
            brain.mark_attack_started();
            crate::logger::log(&format!("⚔️ {:?} got attack slot", entity));
            started.write(EnemyAttackStarted { entity });
        }
    }
}
