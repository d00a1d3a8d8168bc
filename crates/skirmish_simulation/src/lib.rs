//! SKIRMISH Simulation Core
//!
//! ECS-симуляция боевой координации врагов на Bevy 0.16 (strategic layer):
//! - fsm: иерархическая state machine (engine-agnostic)
//! - ai: enemy brains (patrol / combat / recover / death)
//! - combat: attack slot arbitrator
//! - swarm: distance-ranked swarm coordination
//! - combo: player tier combo + aerial combo
//!
//! Движок (навигация, анимации, hitbox'ы) — внешние collaborators,
//! общаются с ядром через Bevy events.

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod ai;
pub mod combat;
pub mod combo;
pub mod config;
pub mod fsm;
pub mod logger;
pub mod swarm;
pub mod timer;

// Re-export базовых типов для удобства
pub use ai::{
    AIPlugin, EnemyArchetype, EnemyBrain, EnemyState, EnemyTrigger, HeadlessNavigationPlugin, Zone, ZoneId,
    ZoneRegistry,
};
pub use combat::{AttackSlotArbitrator, AttackerKind, CombatPlugin};
pub use combo::{AerialComboResolver, AttackId, AttackKind, ComboPlugin, ComboResolver, PlayerCombo, Stance};
pub use config::{ConfigError, SimulationConfig};
pub use fsm::{FsmError, StateMachine, StateMachineBuilder, TriggerRegistry};
pub use logger::{init_logger, log, log_error, log_info, log_warning, LogLevel};
pub use swarm::{SwarmCoordinator, SwarmPlugin};

/// Порядок фаз внутри FixedUpdate (chain)
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    /// Часы + входящие события (perception, health, navigation arrival)
    Input,
    /// Таймеры врагов (idle, wander, relocate, recover)
    Brains,
    /// Swarm membership → ranking → separation
    Swarm,
    /// Attack slots: purge → timeouts → gate
    Arbitration,
    /// Player combo
    Combo,
    /// Outbox brains → исходящие events
    Signals,
    /// Headless navigation (если подключена)
    Navigation,
    /// Dead marker + despawn
    Lifecycle,
}

/// Главный plugin симуляции (объединяет все подсистемы)
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SimulationConfig>();
        let config = app
            .world()
            .get_resource::<SimulationConfig>()
            .cloned()
            .unwrap_or_default();

        app
            // Fixed timestep для simulation tick (60Hz по умолчанию)
            .insert_resource(Time::<Fixed>::from_hz(config.fixed_hz()))
            // Детерминистичный RNG (seed из конфига)
            .insert_resource(DeterministicRng::new(config.seed))
            .configure_sets(
                FixedUpdate,
                (
                    SimulationSet::Input,
                    SimulationSet::Brains,
                    SimulationSet::Swarm,
                    SimulationSet::Arbitration,
                    SimulationSet::Combo,
                    SimulationSet::Signals,
                    SimulationSet::Navigation,
                    SimulationSet::Lifecycle,
                )
                    .chain(),
            )
            // Подсистемы (ECS strategic layer)
            .add_plugins((AIPlugin, CombatPlugin, SwarmPlugin, ComboPlugin));
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Seed для per-enemy RNG (wander/relocate)
    pub fn next_seed(&mut self) -> u64 {
        use rand::RngCore;
        self.rng.next_u64()
    }
}

/// Создаёт headless Bevy App с SimulationPlugin (seed + defaults)
pub fn create_headless_app(seed: u64) -> App {
    create_headless_app_with_config(SimulationConfig {
        seed,
        ..Default::default()
    })
}

/// Headless App: ровно один FixedUpdate тик на `app.update()`
/// (ManualDuration = fixed timestep; первый update — нулевой delta)
pub fn create_headless_app_with_config(config: SimulationConfig) -> App {
    init_logger();

    let tick = Duration::from_secs_f64(1.0 / config.fixed_hz());
    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .insert_resource(TimeUpdateStrategy::ManualDuration(tick))
        .insert_resource(config)
        .add_plugins(SimulationPlugin);

    app
}

/// Snapshot мира для сравнения детерминизма
/// (Debug-представление компонентов, отсортированное по Entity index)
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
