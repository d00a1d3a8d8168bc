//! Enemy AI: иерархическая FSM на каждого врага
//!
//! - `states` / `archetype`: теги и таблицы переходов
//! - `brain`: EnemyBrain component (FSM + health + timers)
//! - `zones`: zone collaborator (wander/relocate)
//! - `systems`: события ⇄ brains
//! - `navigation`: headless navigation collaborator

use bevy::prelude::*;

use crate::config::SimulationConfig;
use crate::fsm::TriggerRegistry;
use crate::SimulationSet;

pub mod archetype;
pub mod brain;
pub mod events;
pub mod health;
pub mod navigation;
pub mod states;
pub mod systems;
pub mod zones;


// Re-export основных типов
pub use archetype::{build_machine, EnemyArchetype};
pub use brain::{EnemyBrain, EnemySignal, SlotStatus};
pub use events::{
    DestinationReached, EnemyDied, EnemyLowHealth, EnemyRecovered, EnemyStateChanged, HealthChange,
    HealthChangeKind, NavigationRequest, PerceptionEvent,
};
pub use health::Health;
pub use navigation::{HeadlessNavigationPlugin, NavigationAgent};
pub use states::{EnemyState, EnemyTrigger};
pub use systems::{enemy_bundle, Dead, DespawnAfter};
pub use zones::{Zone, ZoneId, ZoneRegistry};

/// Имена triggers, которые понимает perception (Resource)
#[derive(Resource, Debug, Clone)]
pub struct PerceptionTriggers(pub TriggerRegistry<EnemyTrigger>);

impl Default for PerceptionTriggers {
    fn default() -> Self {
        Self(EnemyTrigger::registry())
    }
}

/// AI Plugin
///
/// Порядок внутри FixedUpdate (см. SimulationSet):
/// 1. Input: часы, perception, health, navigation arrival
/// 2. Brains: timers / relocate / recover
/// 3. Signals: outbox brains → events (после arbitration/swarm)
/// 4. Lifecycle: Dead marker + despawn
pub struct AIPlugin;

impl Plugin for AIPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SimulationConfig>()
            .init_resource::<ZoneRegistry>()
            .init_resource::<PerceptionTriggers>()
            .add_event::<PerceptionEvent>()
            .add_event::<HealthChange>()
            .add_event::<DestinationReached>()
            .add_event::<NavigationRequest>()
            .add_event::<EnemyLowHealth>()
            .add_event::<EnemyRecovered>()
            .add_event::<EnemyDied>()
            .add_event::<EnemyStateChanged>()
            .add_systems(
                FixedUpdate,
                (
                    systems::sync_brain_clocks,
                    systems::apply_perception_events,
                    systems::apply_health_changes,
                    systems::apply_destination_reached,
                )
                    .chain()
                    .in_set(SimulationSet::Input),
            )
            .add_systems(FixedUpdate, systems::tick_enemy_brains.in_set(SimulationSet::Brains))
            .add_systems(FixedUpdate, systems::flush_enemy_signals.in_set(SimulationSet::Signals))
            .add_systems(
                FixedUpdate,
                (systems::mark_dead_enemies, systems::despawn_after_timeout)
                    .chain()
                    .in_set(SimulationSet::Lifecycle),
            );
    }
}
