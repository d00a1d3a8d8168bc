//! Enemy lifecycle: spawn helper, death marker, delayed despawn.

use bevy::prelude::*;

use crate::ai::archetype::EnemyArchetype;
use crate::ai::brain::EnemyBrain;
use crate::ai::events::EnemyDied;
use crate::ai::zones::ZoneRegistry;
use crate::config::{EnemyConfig, SimulationConfig};

/// Компонент-маркер: враг мёртв (brain больше не реагирует)
#[derive(Component, Debug)]
pub struct Dead;

/// Компонент-маркер: деспавн entity после указанного времени
#[derive(Component, Debug)]
pub struct DespawnAfter {
    /// Время деспавна (в секундах от старта симуляции)
    pub despawn_time: f32,
}

/// Компоненты нового врага. Зона — первая, содержащая `position`
pub fn enemy_bundle(
    archetype: EnemyArchetype,
    position: Vec3,
    config: &EnemyConfig,
    zones: &ZoneRegistry,
    seed: u64,
) -> (EnemyBrain, Transform) {
    let brain = EnemyBrain::new(archetype, config, seed).with_zone(zones.zone_at(position));
    (brain, Transform::from_translation(position))
}

/// Система: EnemyDied → Dead + DespawnAfter
pub fn mark_dead_enemies(
    mut commands: Commands,
    mut died_events: EventReader<EnemyDied>,
    config: Res<SimulationConfig>,
    time: Res<Time>,
) {
    let despawn_time = time.elapsed_secs() + config.enemy.despawn_delay;

    for event in died_events.read() {
        if let Ok(mut entity_commands) = commands.get_entity(event.entity) {
            entity_commands.insert((Dead, DespawnAfter { despawn_time }));
        }
    }
}

/// Система: деспавн entities с истёкшим DespawnAfter
pub fn despawn_after_timeout(
    mut commands: Commands,
    query: Query<(Entity, &DespawnAfter)>,
    time: Res<Time>,
) {
    let current_time = time.elapsed_secs();

    for (entity, despawn_after) in query.iter() {
        if current_time >= despawn_after.despawn_time {
            crate::logger::log(&format!("⚰️ Despawning entity {:?} (timeout)", entity));
            commands.entity(entity).despawn();
        }
    }
}
