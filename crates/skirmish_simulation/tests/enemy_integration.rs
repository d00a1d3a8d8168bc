//! Enemy integration tests
//!
//! Полный headless App (SimulationPlugin + HeadlessNavigationPlugin),
//! один fixed тик на `app.update()`.
//!
//! Проверяем:
//! - Relocate между зонами через navigation collaborator
//! - Low health → Recover → Idle (один EnemyRecovered)
//! - Смерть → один EnemyDied → despawn после окна
//! - Swarm: только K ближайших идут в Attack
//! - Combo через события (tier progression, reset, aerial cap)

use bevy::prelude::*;
use skirmish_simulation::ai::{
    enemy_bundle, EnemyDied, EnemyRecovered, HealthChange, HealthChangeKind, PerceptionEvent,
};
use skirmish_simulation::combo::{AirborneChange, AirborneEvent, AttackInput, AttackResolved, ComboReset, ComboResetReason};
use skirmish_simulation::config::EnemyConfig;
use skirmish_simulation::swarm::{SwarmMember, SwarmTarget};
use skirmish_simulation::*;

/// Helper: App с навигацией; первый (нулевой) update уже сделан
fn create_enemy_app(config: SimulationConfig) -> App {
    let mut app = create_headless_app_with_config(config);
    app.add_plugins(HeadlessNavigationPlugin);
    app.update();
    app
}

fn spawn_enemy(app: &mut App, archetype: EnemyArchetype, position: Vec3) -> Entity {
    let seed = app.world_mut().resource_mut::<DeterministicRng>().next_seed();
    let enemy_config = app.world().resource::<SimulationConfig>().enemy.clone();
    let zones = app.world().resource::<ZoneRegistry>().clone();
    app.world_mut()
        .spawn(enemy_bundle(archetype, position, &enemy_config, &zones, seed))
        .id()
}

fn brain(app: &App, entity: Entity) -> Option<&EnemyBrain> {
    app.world().get::<EnemyBrain>(entity)
}

fn drain<E: Event>(app: &mut App) -> Vec<E> {
    app.world_mut().resource_mut::<Events<E>>().drain().collect()
}

fn run(app: &mut App, ticks: usize) {
    for _ in 0..ticks {
        app.update();
    }
}

/// Events живут два update'а — собираем после каждого тика
fn run_collect<E: Event>(app: &mut App, ticks: usize) -> Vec<E> {
    let mut collected = Vec::new();
    for _ in 0..ticks {
        app.update();
        collected.extend(drain::<E>(app));
    }
    collected
}

/// Test: Idle timer → Relocate → навигация → Idle в другой зоне
#[test]
fn test_enemy_relocates_to_other_zone() {
    let mut app = create_enemy_app(SimulationConfig {
        enemy: EnemyConfig {
            idle_duration: 1.0,
            ..Default::default()
        },
        ..Default::default()
    });
    {
        let mut zones = app.world_mut().resource_mut::<ZoneRegistry>();
        zones.add(Zone::from_corners("west", Vec3::ZERO, Vec3::new(10.0, 0.0, 10.0)));
        zones.add(Zone::from_corners("east", Vec3::new(30.0, 0.0, 0.0), Vec3::new(40.0, 0.0, 10.0)));
    }
    let enemy = spawn_enemy(&mut app, EnemyArchetype::Grunt, Vec3::new(5.0, 0.0, 5.0));
    assert_eq!(brain(&app, enemy).and_then(|b| b.zone()), Some(ZoneId(0)));

    // 1 сек idle + до ~12 сек пути при 4 м/с
    let mut arrived = false;
    for _ in 0..(15 * 60) {
        app.update();
        let Some(enemy_brain) = brain(&app, enemy) else {
            break;
        };
        if enemy_brain.zone() == Some(ZoneId(1)) && enemy_brain.state() == EnemyState::Idle {
            arrived = true;
            break;
        }
    }

    assert!(arrived, "enemy must reach the east zone");
    let position = app.world().get::<Transform>(enemy).map(|t| t.translation);
    let east = app.world().resource::<ZoneRegistry>().get(ZoneId(1)).cloned();
    assert!(matches!((position, east), (Some(p), Some(zone)) if zone.contains(p)));
}

/// Test: low health → Recover → RecoveredHealth → Idle, сигналы по одному
#[test]
fn test_low_health_retreat_and_recovery() {
    let mut app = create_enemy_app(SimulationConfig::default());
    let enemy = spawn_enemy(&mut app, EnemyArchetype::Grunt, Vec3::ZERO);
    app.update();

    app.world_mut().send_event(PerceptionEvent::new(enemy, "SeePlayer"));
    app.world_mut().send_event(HealthChange {
        entity: enemy,
        change: HealthChangeKind::Set(20.0),
    });
    app.update();
    assert_eq!(brain(&app, enemy).map(|b| b.state()), Some(EnemyState::Recover));

    // Ещё удар ниже порога — latch держит
    app.world_mut().send_event(HealthChange {
        entity: enemy,
        change: HealthChangeKind::Damage(5.0),
    });
    app.update();
    assert_eq!(drain::<skirmish_simulation::ai::EnemyLowHealth>(&mut app).len(), 1);

    // Экспоненциальный подход к 80 — около 42 сек
    let mut recovered = 0;
    for _ in 0..(60 * 60) {
        app.update();
        recovered += drain::<EnemyRecovered>(&mut app).len();
        if brain(&app, enemy).map(|b| b.state()) == Some(EnemyState::Idle) {
            break;
        }
    }

    assert_eq!(brain(&app, enemy).map(|b| b.state()), Some(EnemyState::Idle));
    assert_eq!(recovered, 1);
    assert!(!brain(&app, enemy).map(|b| b.low_health_latched()).unwrap_or(true));
    let health = brain(&app, enemy).map(|b| b.health().current).unwrap_or(0.0);
    assert!((health - 80.0).abs() < 1e-3, "health = {}", health);
}

/// Test: смерть двумя путями в одном тике → один EnemyDied, затем despawn
#[test]
fn test_death_emits_once_and_despawns() {
    let mut app = create_enemy_app(SimulationConfig::default());
    let enemy = spawn_enemy(&mut app, EnemyArchetype::Grunt, Vec3::ZERO);
    app.update();

    app.world_mut().send_event(HealthChange {
        entity: enemy,
        change: HealthChangeKind::Damage(500.0),
    });
    app.world_mut().send_event(PerceptionEvent::new(enemy, "Die"));
    app.update();

    assert_eq!(drain::<EnemyDied>(&mut app).len(), 1);
    assert_eq!(brain(&app, enemy).map(|b| b.state()), Some(EnemyState::Death));
    assert!(app.world().get::<skirmish_simulation::ai::Dead>(enemy).is_some());

    // despawn_delay = 3 сек
    run(&mut app, 3 * 60 + 5);

    assert!(app.world().get_entity(enemy).is_err());
    assert!(!app.world().resource::<AttackSlotArbitrator>().is_registered(enemy));
    assert!(drain::<EnemyDied>(&mut app).is_empty());
}

/// Test: boss умирает только через health, EnemyDied тоже один
#[test]
fn test_boss_death_through_health_only() {
    let mut app = create_enemy_app(SimulationConfig::default());
    let boss = spawn_enemy(&mut app, EnemyArchetype::Boss, Vec3::ZERO);
    app.update();

    app.world_mut().send_event(PerceptionEvent::new(boss, "Die"));
    app.update();
    assert!(brain(&app, boss).map(|b| b.is_alive()).unwrap_or(false));

    app.world_mut().send_event(HealthChange {
        entity: boss,
        change: HealthChangeKind::Set(0.0),
    });
    app.update();

    assert_eq!(drain::<EnemyDied>(&mut app).len(), 1);
    assert!(brain(&app, boss).map(|b| b.is_dead()).unwrap_or(false));
}

/// Test: unknown trigger name: warning, ничего не меняется
#[test]
fn test_unknown_perception_trigger_is_dropped() {
    let mut app = create_enemy_app(SimulationConfig::default());
    let enemy = spawn_enemy(&mut app, EnemyArchetype::Grunt, Vec3::ZERO);
    app.update();

    app.world_mut().send_event(PerceptionEvent::new(enemy, "Teleport"));
    app.update();

    assert_eq!(brain(&app, enemy).map(|b| b.state()), Some(EnemyState::Idle));
}

/// Test: swarm: только K=3 ближайших из 5 переходят в Attack
#[test]
fn test_swarm_only_closest_attack() {
    let mut app = create_enemy_app(SimulationConfig::default());
    let config = app.world().resource::<SimulationConfig>().swarm.clone();
    let swarm = app.world_mut().resource_mut::<SwarmCoordinator>().create_group(&config);
    app.world_mut().spawn((Transform::from_xyz(0.0, 0.0, 0.0), SwarmTarget));

    // Дистанции 2, 4, 6, 8, 10 — separation (радиус 1.5) не задевает
    let members: Vec<Entity> = (1..=5)
        .map(|i| {
            let entity = spawn_enemy(&mut app, EnemyArchetype::Swarmling, Vec3::new(i as f32 * 2.0, 0.0, 0.0));
            app.world_mut().entity_mut(entity).insert(SwarmMember { group: swarm });
            entity
        })
        .collect();
    app.update();

    for entity in &members {
        app.world_mut().send_event(PerceptionEvent::new(*entity, "SeePlayer"));
    }
    app.update();

    let states: Vec<Option<EnemyState>> = members.iter().map(|e| brain(&app, *e).map(|b| b.state())).collect();
    assert_eq!(
        states,
        vec![
            Some(EnemyState::Attack),
            Some(EnemyState::Attack),
            Some(EnemyState::Attack),
            Some(EnemyState::Chase),
            Some(EnemyState::Chase),
        ]
    );
    let group_len = app
        .world()
        .resource::<SwarmCoordinator>()
        .group(swarm)
        .map(|group| group.len());
    assert_eq!(group_len, Some(5));
}

/// Test: мёртвый member покидает группу до следующего ranking
#[test]
fn test_swarm_member_leaves_on_death() {
    let mut app = create_enemy_app(SimulationConfig::default());
    let config = app.world().resource::<SimulationConfig>().swarm.clone();
    let swarm = app.world_mut().resource_mut::<SwarmCoordinator>().create_group(&config);
    app.world_mut().spawn((Transform::from_xyz(0.0, 0.0, 0.0), SwarmTarget));

    let members: Vec<Entity> = (1..=4)
        .map(|i| {
            let entity = spawn_enemy(&mut app, EnemyArchetype::Swarmling, Vec3::new(i as f32 * 2.0, 0.0, 0.0));
            app.world_mut().entity_mut(entity).insert(SwarmMember { group: swarm });
            entity
        })
        .collect();
    app.update();

    app.world_mut().send_event(HealthChange {
        entity: members[0],
        change: HealthChangeKind::Set(0.0),
    });
    for entity in &members {
        app.world_mut().send_event(PerceptionEvent::new(*entity, "SeePlayer"));
    }
    app.update();

    let coordinator = app.world().resource::<SwarmCoordinator>();
    let group = coordinator.group(swarm);
    assert_eq!(group.map(|g| g.contains(members[0])), Some(false));
    // Место мёртвого занял четвёртый
    assert_eq!(brain(&app, members[3]).map(|b| b.state()), Some(EnemyState::Attack));
}

/// Test: combo через события: SX1, SX2, SX3, затем reset по таймауту
#[test]
fn test_combo_events_progress_and_reset() {
    let mut app = create_enemy_app(SimulationConfig::default());
    let player = app.world_mut().spawn(PlayerCombo::default()).id();

    let mut attacks: Vec<&'static str> = Vec::new();
    for _ in 0..3 {
        app.world_mut().send_event(AttackInput {
            entity: player,
            kind: AttackKind::Fast,
            stance: Stance::Single,
        });
        let resolved = run_collect::<AttackResolved>(&mut app, 10);
        attacks.extend(resolved.iter().map(|event| event.attack.as_str()));
    }
    assert_eq!(attacks, vec!["SX1", "SX2", "SX3"]);

    // reset_timeout 1.2 сек = 72 тика после последнего input
    let resets = run_collect::<ComboReset>(&mut app, 90);
    assert_eq!(resets.len(), 1);
    assert_eq!(resets[0].reason, ComboResetReason::Timeout);

    app.world_mut().send_event(AttackInput {
        entity: player,
        kind: AttackKind::Fast,
        stance: Stance::Area,
    });
    app.update();
    let attacks: Vec<AttackId> = drain::<AttackResolved>(&mut app).iter().map(|event| event.attack).collect();
    assert_eq!(attacks, vec![AttackId::AX1]);
}

/// Test: в воздухе: максимум 2 fast атаки, air-dash добавляет ещё 2
#[test]
fn test_aerial_combo_through_events() {
    let mut app = create_enemy_app(SimulationConfig::default());
    let player = app.world_mut().spawn(PlayerCombo::default()).id();

    app.world_mut().send_event(AirborneEvent {
        entity: player,
        change: AirborneChange::TakeOff,
    });
    app.update();

    for _ in 0..3 {
        app.world_mut().send_event(AttackInput {
            entity: player,
            kind: AttackKind::Fast,
            stance: Stance::Single,
        });
    }
    app.update();
    let attacks: Vec<AttackId> = drain::<AttackResolved>(&mut app).iter().map(|event| event.attack).collect();
    assert_eq!(attacks, vec![AttackId::AIR_X1, AttackId::AIR_X2]);

    app.world_mut().send_event(AirborneEvent {
        entity: player,
        change: AirborneChange::AirDash,
    });
    app.world_mut().send_event(AttackInput {
        entity: player,
        kind: AttackKind::Fast,
        stance: Stance::Single,
    });
    app.world_mut().send_event(AttackInput {
        entity: player,
        kind: AttackKind::Heavy,
        stance: Stance::Single,
    });
    app.update();
    let attacks: Vec<AttackId> = drain::<AttackResolved>(&mut app).iter().map(|event| event.attack).collect();
    assert_eq!(attacks, vec![AttackId::AIR_X1, AttackId::AIR_PLUNGE]);

    // Приземлились — наземный combo
    app.world_mut().send_event(AirborneEvent {
        entity: player,
        change: AirborneChange::Land,
    });
    app.world_mut().send_event(AttackInput {
        entity: player,
        kind: AttackKind::Fast,
        stance: Stance::Single,
    });
    app.update();
    let attacks: Vec<AttackId> = drain::<AttackResolved>(&mut app).iter().map(|event| event.attack).collect();
    assert_eq!(attacks, vec![AttackId::SX1]);
}
