//! Headless симуляция SKIRMISH
//!
//! Запускает Bevy App без рендера: две зоны, grunts, swarm, boss и игрок.
//! Perception/damage/animation collaborators заменены скриптом по тикам.
//!
//! Usage: skirmish_simulation [config.ron]

use std::collections::HashMap;

use bevy::prelude::*;
use skirmish_simulation::ai::{
    enemy_bundle, EnemyDied, HealthChange, HealthChangeKind, PerceptionEvent,
};
use skirmish_simulation::combat::{AttackFinished, EnemyAttackStarted};
use skirmish_simulation::combo::{AttackInput, AttackResolved};
use skirmish_simulation::logger::{log_error, log_info, set_log_level, LogLevel};
use skirmish_simulation::swarm::{SwarmMember, SwarmTarget};
use skirmish_simulation::{
    create_headless_app_with_config, AttackKind, DeterministicRng, EnemyArchetype, EnemyBrain, EnemyState,
    HeadlessNavigationPlugin, PlayerCombo, SimulationConfig, Stance, SwarmCoordinator, Zone, ZoneRegistry,
};

const TICKS: u32 = 1800;
/// Сколько тиков "играет" анимация атаки врага
const ENEMY_ATTACK_TICKS: u32 = 40;

fn main() {
    let config = match std::env::args().nth(1) {
        Some(path) => match SimulationConfig::load(&path) {
            Ok(config) => config,
            Err(err) => {
                skirmish_simulation::init_logger();
                log_error(&format!("Failed to load config '{}': {}", path, err));
                std::process::exit(1);
            }
        },
        None => SimulationConfig::default(),
    };

    let mut app = create_headless_app_with_config(config.clone());
    app.add_plugins(HeadlessNavigationPlugin);
    set_log_level(LogLevel::Info);

    log_info(&format!("Starting SKIRMISH headless simulation (seed: {})", config.seed));

    {
        let mut zones = app.world_mut().resource_mut::<ZoneRegistry>();
        zones.add(Zone::from_corners("courtyard", Vec3::new(-10.0, 0.0, -10.0), Vec3::new(10.0, 0.0, 10.0)));
        zones.add(Zone::from_corners("barracks", Vec3::new(30.0, 0.0, -10.0), Vec3::new(50.0, 0.0, 10.0)));
    }

    let player = app
        .world_mut()
        .spawn((Transform::from_xyz(0.0, 0.0, 15.0), SwarmTarget, PlayerCombo::from_config(&config)))
        .id();

    let swarm = app
        .world_mut()
        .resource_mut::<SwarmCoordinator>()
        .create_group(&config.swarm);

    let mut enemies = Vec::new();
    for i in 0..3 {
        let position = Vec3::new(-6.0 + i as f32 * 6.0, 0.0, 0.0);
        enemies.push(spawn_enemy(&mut app, &config, EnemyArchetype::Grunt, position));
    }
    for i in 0..6 {
        let position = Vec3::new(-5.0 + i as f32 * 2.0, 0.0, 5.0);
        let entity = spawn_enemy(&mut app, &config, EnemyArchetype::Swarmling, position);
        app.world_mut().entity_mut(entity).insert(SwarmMember { group: swarm });
        enemies.push(entity);
    }
    enemies.push(spawn_enemy(&mut app, &config, EnemyArchetype::Boss, Vec3::new(40.0, 0.0, 0.0)));

    // tick → враги, у которых в этот тик закончится анимация атаки
    let mut finishing: HashMap<u32, Vec<Entity>> = HashMap::new();
    let mut attacks_started = 0usize;
    let mut attacks_resolved = 0usize;
    let mut deaths = 0usize;
    let mut damage_cursor = 0usize;

    for tick in 0..TICKS {
        // --- Скрипт perception / combat collaborators ---
        if tick == 60 {
            for entity in &enemies {
                app.world_mut().send_event(PerceptionEvent::new(*entity, "SeePlayer"));
            }
        }
        if tick == 90 {
            for entity in enemies.iter().take(3) {
                app.world_mut().send_event(PerceptionEvent::new(*entity, "InAttackRange"));
            }
        }
        if tick > 120 && tick % 20 == 0 {
            let stance = if (tick / 200) % 2 == 0 { Stance::Single } else { Stance::Area };
            app.world_mut().send_event(AttackInput {
                entity: player,
                kind: AttackKind::Fast,
                stance,
            });
        }
        if tick > 120 && tick % 45 == 0 {
            let target = enemies[damage_cursor % enemies.len()];
            damage_cursor += 1;
            app.world_mut().send_event(HealthChange {
                entity: target,
                change: HealthChangeKind::Damage(18.0),
            });
        }
        if let Some(done) = finishing.remove(&tick) {
            for entity in done {
                app.world_mut().send_event(AttackFinished { entity });
            }
        }

        app.update();

        // --- Исходящие события ---
        let started: Vec<Entity> = app
            .world_mut()
            .resource_mut::<Events<EnemyAttackStarted>>()
            .drain()
            .map(|event| event.entity)
            .collect();
        attacks_started += started.len();
        finishing.entry(tick + ENEMY_ATTACK_TICKS).or_default().extend(started);

        attacks_resolved += app.world_mut().resource_mut::<Events<AttackResolved>>().drain().count();
        deaths += app.world_mut().resource_mut::<Events<EnemyDied>>().drain().count();

        if tick % 300 == 0 {
            log_info(&format!("Tick {}: {}", tick, state_summary(app.world_mut())));
        }
    }

    log_info(&format!(
        "Simulation complete: {} enemy attacks, {} player attacks, {} deaths",
        attacks_started, attacks_resolved, deaths
    ));
}

fn spawn_enemy(app: &mut App, config: &SimulationConfig, archetype: EnemyArchetype, position: Vec3) -> Entity {
    let seed = app.world_mut().resource_mut::<DeterministicRng>().next_seed();
    let zones = app.world().resource::<ZoneRegistry>().clone();
    app.world_mut()
        .spawn(enemy_bundle(archetype, position, &config.enemy, &zones, seed))
        .id()
}

fn state_summary(world: &mut World) -> String {
    let mut counts: Vec<(EnemyState, usize)> = Vec::new();
    let mut query = world.query::<&EnemyBrain>();

    for brain in query.iter(world) {
        match counts.iter_mut().find(|(state, _)| *state == brain.state()) {
            Some((_, count)) => *count += 1,
            None => counts.push((brain.state(), 1)),
        }
    }

    counts
        .iter()
        .map(|(state, count)| format!("{:?}={}", state, count))
        .collect::<Vec<_>>()
        .join(", ")
}
