//! Tests for attack slot systems (headless App, один fixed тик на update).

#[cfg(test)]
mod tests {
    use bevy::prelude::*;

    use crate::ai::{enemy_bundle, EnemyArchetype, EnemyBrain, EnemyState, HealthChange, HealthChangeKind, PerceptionEvent, SlotStatus, ZoneRegistry};
    use crate::combat::{AttackFinished, AttackSlotArbitrator, EnemyAttackStarted};
    use crate::config::{AttackSlotConfig, SimulationConfig};
    use crate::create_headless_app_with_config;

    fn app_with_slots(slots: AttackSlotConfig) -> App {
        let mut app = create_headless_app_with_config(SimulationConfig {
            attack_slots: slots,
            ..Default::default()
        });
        app.update(); // первый update — нулевой delta
        app
    }

    fn spawn(app: &mut App, archetype: EnemyArchetype) -> Entity {
        let config = app.world().resource::<SimulationConfig>().enemy.clone();
        let zones = ZoneRegistry::new();
        app.world_mut()
            .spawn(enemy_bundle(archetype, Vec3::ZERO, &config, &zones, 1))
            .id()
    }

    fn engage(app: &mut App, entity: Entity) {
        app.world_mut().send_event(PerceptionEvent::new(entity, "SeePlayer"));
        app.world_mut().send_event(PerceptionEvent::new(entity, "InAttackRange"));
    }

    fn started(app: &mut App) -> Vec<Entity> {
        app.world_mut()
            .resource_mut::<Events<EnemyAttackStarted>>()
            .drain()
            .map(|event| event.entity)
            .collect()
    }

    fn slot(app: &App, entity: Entity) -> SlotStatus {
        app.world()
            .get::<EnemyBrain>(entity)
            .map(|brain| brain.slot_status())
            .unwrap_or_default()
    }

    fn queue(app: &App) -> Vec<Entity> {
        app.world().resource::<AttackSlotArbitrator>().queue().to_vec()
    }

    #[test]
    fn test_capacity_gates_attackers() {
        let mut app = app_with_slots(AttackSlotConfig::default());
        let a = spawn(&mut app, EnemyArchetype::Grunt);
        let b = spawn(&mut app, EnemyArchetype::Grunt);
        let c = spawn(&mut app, EnemyArchetype::Grunt);
        app.update();
        assert_eq!(queue(&app), vec![a, b, c]);

        for entity in [a, b, c] {
            engage(&mut app, entity);
        }
        app.update();

        let mut granted = started(&mut app);
        granted.sort();
        let mut expected = vec![a, b];
        expected.sort();
        assert_eq!(granted, expected);
        assert_eq!(slot(&app, c), SlotStatus::Waiting);
    }

    #[test]
    fn test_finished_attacker_cycles_to_back() {
        let mut app = app_with_slots(AttackSlotConfig::default());
        let a = spawn(&mut app, EnemyArchetype::Grunt);
        let b = spawn(&mut app, EnemyArchetype::Grunt);
        let c = spawn(&mut app, EnemyArchetype::Grunt);
        app.update();
        for entity in [a, b, c] {
            engage(&mut app, entity);
        }
        app.update();
        started(&mut app);

        app.world_mut().send_event(AttackFinished { entity: a });
        app.update();

        assert_eq!(queue(&app), vec![b, c, a]);
        assert_eq!(started(&mut app), vec![c]);
        assert_eq!(slot(&app, c), SlotStatus::Active);
        let state = app.world().get::<EnemyBrain>(a).map(|brain| brain.state());
        assert_eq!(state, Some(EnemyState::Chase));
    }

    #[test]
    fn test_stalled_attack_times_out() {
        let mut app = app_with_slots(AttackSlotConfig {
            capacity: 1,
            attack_timeout: 0.5,
            include_bosses: false,
        });
        let a = spawn(&mut app, EnemyArchetype::Grunt);
        let b = spawn(&mut app, EnemyArchetype::Grunt);
        app.update();
        engage(&mut app, a);
        engage(&mut app, b);
        app.update();
        assert_eq!(started(&mut app), vec![a]);

        // 0.5 сек при 60Hz = 30 тиков; с запасом
        for _ in 0..40 {
            app.update();
        }

        assert_eq!(started(&mut app), vec![b]);
        assert_eq!(queue(&app), vec![b, a]);
        assert_eq!(slot(&app, a), SlotStatus::None);
        let state = app.world().get::<EnemyBrain>(a).map(|brain| brain.state());
        assert_eq!(state, Some(EnemyState::Chase));
    }

    #[test]
    fn test_dead_attacker_frees_slot() {
        let mut app = app_with_slots(AttackSlotConfig {
            capacity: 1,
            ..Default::default()
        });
        let a = spawn(&mut app, EnemyArchetype::Grunt);
        let b = spawn(&mut app, EnemyArchetype::Grunt);
        app.update();
        engage(&mut app, a);
        engage(&mut app, b);
        app.update();
        assert_eq!(started(&mut app), vec![a]);

        app.world_mut().send_event(HealthChange {
            entity: a,
            change: HealthChangeKind::Damage(1000.0),
        });
        app.update();

        assert_eq!(queue(&app), vec![b]);
        assert_eq!(started(&mut app), vec![b]);
    }

    #[test]
    fn test_boss_attacks_outside_queue() {
        let mut app = app_with_slots(AttackSlotConfig {
            capacity: 1,
            ..Default::default()
        });
        let a = spawn(&mut app, EnemyArchetype::Grunt);
        let b = spawn(&mut app, EnemyArchetype::Grunt);
        let boss = spawn(&mut app, EnemyArchetype::Boss);
        app.update();
        assert_eq!(queue(&app), vec![a, b]);

        for entity in [a, b, boss] {
            engage(&mut app, entity);
        }
        app.update();

        let mut granted = started(&mut app);
        granted.sort();
        let mut expected = vec![a, boss];
        expected.sort();
        assert_eq!(granted, expected);
    }
}
