//! Brain systems: входящие events → EnemyBrain, tick, outbox → исходящие events.

use bevy::prelude::*;

use crate::ai::brain::{EnemyBrain, EnemySignal};
use crate::ai::events::{
    DestinationReached, EnemyDied, EnemyLowHealth, EnemyRecovered, EnemyStateChanged, HealthChange,
    HealthChangeKind, NavigationRequest, PerceptionEvent,
};
use crate::ai::zones::ZoneRegistry;
use crate::ai::PerceptionTriggers;
use crate::fsm::FsmError;

/// System: часы всех brains = время fixed тика (до обработки событий)
pub fn sync_brain_clocks(time: Res<Time>, mut brains: Query<&mut EnemyBrain>) {
    let now = time.elapsed_secs();
    for mut brain in brains.iter_mut() {
        brain.sync_clock(now);
    }
}

/// System: PerceptionEvent (строковый trigger) → FSM
pub fn apply_perception_events(
    mut events: EventReader<PerceptionEvent>,
    triggers: Res<PerceptionTriggers>,
    mut brains: Query<&mut EnemyBrain>,
) {
    for event in events.read() {
        let Ok(mut brain) = brains.get_mut(event.entity) else {
            crate::logger::log_warning(&format!(
                "AI: perception '{}' for unknown enemy {:?}",
                event.trigger, event.entity
            ));
            continue;
        };

        match brain.fire_by_name(&event.trigger, &triggers.0) {
            Ok(outcome) if outcome.transitioned() => {
                crate::logger::log(&format!(
                    "👁️ {:?}: {} → {:?}",
                    event.entity,
                    event.trigger,
                    brain.state()
                ));
            }
            Ok(_) => {}
            // Мёртвые молча игнорируют perception
            Err(FsmError::Dead(_)) => {}
            // Unknown / NotPermitted уже залогированы
            Err(_) => {}
        }
    }
}

/// System: HealthChange от combat collaborator
pub fn apply_health_changes(mut events: EventReader<HealthChange>, mut brains: Query<&mut EnemyBrain>) {
    for event in events.read() {
        let Ok(mut brain) = brains.get_mut(event.entity) else {
            continue;
        };

        match event.change {
            HealthChangeKind::Damage(amount) => brain.lose_hp(amount),
            HealthChangeKind::Heal(amount) => brain.heal_hp(amount),
            HealthChangeKind::Set(value) => brain.set_health(value),
        }
    }
}

/// System: navigation collaborator сообщил о прибытии
pub fn apply_destination_reached(
    mut events: EventReader<DestinationReached>,
    zones: Res<ZoneRegistry>,
    mut brains: Query<&mut EnemyBrain>,
) {
    for event in events.read() {
        if let Ok(mut brain) = brains.get_mut(event.entity) {
            brain.reach_destination(event.position, &zones);
        }
    }
}

/// System: idle/wander timers, relocate, recover regen
pub fn tick_enemy_brains(time: Res<Time>, zones: Res<ZoneRegistry>, mut brains: Query<&mut EnemyBrain>) {
    let now = time.elapsed_secs();
    let dt = time.delta_secs();

    for mut brain in brains.iter_mut() {
        brain.tick(now, dt, &zones);
    }
}

/// System: outbox brains → Bevy events
///
/// Запускается после arbitration/swarm, чтобы переходы, сделанные там,
/// попали в тот же тик.
pub fn flush_enemy_signals(
    mut brains: Query<(Entity, &mut EnemyBrain)>,
    mut navigation: EventWriter<NavigationRequest>,
    mut low_health: EventWriter<EnemyLowHealth>,
    mut recovered: EventWriter<EnemyRecovered>,
    mut died: EventWriter<EnemyDied>,
    mut state_changed: EventWriter<EnemyStateChanged>,
) {
    for (entity, mut brain) in brains.iter_mut() {
        for signal in brain.drain_signals() {
            match signal {
                EnemySignal::StateChanged { from, to, trigger } => {
                    state_changed.write(EnemyStateChanged {
                        entity,
                        from,
                        to,
                        trigger,
                    });
                }
                EnemySignal::LowHealth => {
                    crate::logger::log(&format!("🩸 {:?} low health", entity));
                    low_health.write(EnemyLowHealth { entity });
                }
                EnemySignal::Recovered => {
                    crate::logger::log(&format!("💚 {:?} recovered", entity));
                    recovered.write(EnemyRecovered { entity });
                }
                EnemySignal::Died => {
                    crate::logger::log_info(&format!("💀 {:?} died", entity));
                    died.write(EnemyDied { entity });
                }
                EnemySignal::MoveTo(destination) => {
                    navigation.write(NavigationRequest { entity, destination });
                }
            }
        }
    }
}
