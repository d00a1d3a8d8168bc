//! Swarm coordination: distance-ranked attack permission + separation
//!
//! Отдельная от AttackSlotArbitrator стратегия: swarm решает, КОМУ из
//! группы перейти в Attack, arbitrator — кому из атакующих реально бить.

use bevy::prelude::*;

use crate::SimulationSet;

pub mod group;
pub mod systems;

pub use group::{SwarmCoordinator, SwarmGroup, SwarmId};
pub use systems::{SwarmMember, SwarmTarget};

/// Swarm Plugin
///
/// Порядок (SimulationSet::Swarm):
/// 1. sync_swarm_membership: join/leave
/// 2. track_swarm_targets: позиция цели
/// 3. rank_swarm_attackers: InAttackRange для K ближайших
/// 4. apply_swarm_separation: nudge
pub struct SwarmPlugin;

impl Plugin for SwarmPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SwarmCoordinator>().add_systems(
            FixedUpdate,
            (
                systems::sync_swarm_membership,
                systems::track_swarm_targets,
                systems::rank_swarm_attackers,
                systems::apply_swarm_separation,
            )
                .chain()
                .in_set(SimulationSet::Swarm),
        );
    }
}
