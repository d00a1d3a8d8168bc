//! Swarm systems: membership → target → ranking → separation
//!
//! Membership всегда применяется до ranking в том же тике.

use std::collections::HashMap;

use bevy::prelude::*;

use super::group::{SwarmCoordinator, SwarmId};
use crate::ai::{EnemyBrain, EnemyTrigger};

/// Компонент: враг состоит в swarm группе
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwarmMember {
    pub group: SwarmId,
}

/// Компонент-маркер: цель всех swarm групп (игрок)
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct SwarmTarget;

/// Система: живые SwarmMember в группах, мёртвые/удалённые — вон
pub fn sync_swarm_membership(
    mut coordinator: ResMut<SwarmCoordinator>,
    members: Query<(Entity, &SwarmMember, &EnemyBrain)>,
) {
    let living: HashMap<Entity, SwarmId> = members
        .iter()
        .filter(|(_, _, brain)| brain.is_alive())
        .map(|(entity, member, _)| (entity, member.group))
        .collect();

    for (id, group) in coordinator.groups_mut() {
        group.retain_members(|entity| living.get(&entity) == Some(&id));
    }

    // Query order стабилен для одинаковой истории спавна
    for (entity, member, brain) in members.iter() {
        if !brain.is_alive() {
            continue;
        }
        match coordinator.group_mut(member.group) {
            Some(group) => {
                if group.add_member(entity) {
                    crate::logger::log(&format!("🐝 {:?} joined swarm {:?}", entity, member.group));
                }
            }
            None => crate::logger::log_warning(&format!(
                "Swarm: {:?} references unknown group {:?}",
                entity, member.group
            )),
        }
    }
}

/// Система: позиция SwarmTarget → target каждой группы
pub fn track_swarm_targets(
    mut coordinator: ResMut<SwarmCoordinator>,
    targets: Query<&Transform, With<SwarmTarget>>,
) {
    let target = targets.iter().next().map(|transform| transform.translation);

    for (_, group) in coordinator.groups_mut() {
        group.set_target(target);
    }
}

/// Система: K ближайших ready members получают InAttackRange
pub fn rank_swarm_attackers(
    coordinator: Res<SwarmCoordinator>,
    mut brains: Query<(&Transform, &mut EnemyBrain), With<SwarmMember>>,
) {
    for (_, group) in coordinator.groups() {
        let ranked = group.rank(|entity| brains.get(entity).ok().map(|(transform, _)| transform.translation));
        let ready_state = group.ready_state();
        let selected = group.select_attackers(&ranked, |entity| {
            brains
                .get(entity)
                .map(|(_, brain)| brain.is_alive() && brain.state() == ready_state)
                .unwrap_or(false)
        });

        for entity in selected {
            if let Ok((_, mut brain)) = brains.get_mut(entity) {
                let _ = brain.fire(EnemyTrigger::InAttackRange);
            }
        }
    }
}

/// Система: separation nudge (после ranking, не влияет на него в этом тике)
pub fn apply_swarm_separation(
    coordinator: Res<SwarmCoordinator>,
    mut transforms: Query<&mut Transform, With<SwarmMember>>,
) {
    for (_, group) in coordinator.groups() {
        let positions: Vec<(Entity, Vec3)> = group
            .members()
            .iter()
            .filter_map(|entity| transforms.get(*entity).ok().map(|transform| (*entity, transform.translation)))
            .collect();

        for (entity, nudge) in group.separation_offsets(&positions) {
            if let Ok(mut transform) = transforms.get_mut(entity) {
                transform.translation += nudge;
            }
        }
    }
}
