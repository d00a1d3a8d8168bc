//! SwarmGroup + SwarmCoordinator
//!
//! В отличие от AttackSlotArbitrator здесь нет персистентной очереди:
//! ranking чисто по дистанции до цели и пересчитывается каждый тик.
//! Round-robin `rotation` — отдельный helper, ranking его не использует.

use std::collections::{BTreeMap, VecDeque};

use bevy::prelude::*;

use crate::ai::EnemyState;
use crate::config::SwarmConfig;

/// Минимальная дистанция, на которой separation ещё считает направление
const SEPARATION_EPSILON: f32 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SwarmId(pub u32);

#[derive(Debug, Clone)]
pub struct SwarmGroup {
    /// Порядок вступления (для стабильного ranking при равных дистанциях)
    members: Vec<Entity>,
    rotation: VecDeque<Entity>,
    target: Option<Vec3>,
    /// K
    max_attackers: usize,
    separation_radius: f32,
    separation_strength: f32,
    /// Sub-state, в котором member может получить InAttackRange
    ready_state: EnemyState,
}

impl SwarmGroup {
    pub fn new(config: &SwarmConfig) -> Self {
        Self {
            members: Vec::new(),
            rotation: VecDeque::new(),
            target: None,
            max_attackers: config.max_attackers,
            separation_radius: config.separation_radius,
            separation_strength: config.separation_strength,
            ready_state: EnemyState::Chase,
        }
    }

    // === Membership ===

    /// false если уже состоит
    pub fn add_member(&mut self, entity: Entity) -> bool {
        if self.members.contains(&entity) {
            return false;
        }
        self.members.push(entity);
        self.rotation.push_back(entity);
        true
    }

    /// Удаляет и из rotation. false если не состоял
    pub fn remove_member(&mut self, entity: Entity) -> bool {
        let before = self.members.len();
        self.members.retain(|member| *member != entity);
        self.rotation.retain(|member| *member != entity);
        before != self.members.len()
    }

    pub fn retain_members(&mut self, keep: impl Fn(Entity) -> bool) {
        self.members.retain(|member| keep(*member));
        self.rotation.retain(|member| keep(*member));
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.members.contains(&entity)
    }

    pub fn members(&self) -> &[Entity] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    // === Target / config ===

    pub fn set_target(&mut self, target: Option<Vec3>) {
        self.target = target;
    }

    pub fn target(&self) -> Option<Vec3> {
        self.target
    }

    pub fn max_attackers(&self) -> usize {
        self.max_attackers
    }

    pub fn ready_state(&self) -> EnemyState {
        self.ready_state
    }

    pub fn with_ready_state(mut self, state: EnemyState) -> Self {
        self.ready_state = state;
        self
    }

    // === Ranking ===

    /// Members с известной позицией, по возрастанию дистанции до цели.
    /// Без цели — пусто. Равные дистанции сохраняют порядок вступления
    pub fn rank(&self, position_of: impl Fn(Entity) -> Option<Vec3>) -> Vec<(Entity, f32)> {
        let Some(target) = self.target else {
            return Vec::new();
        };

        let mut ranked: Vec<(Entity, f32)> = self
            .members
            .iter()
            .filter_map(|member| position_of(*member).map(|position| (*member, position.distance(target))))
            .collect();

        ranked.sort_by(|a, b| a.1.total_cmp(&b.1));
        ranked
    }

    /// Из K ближайших — те, что сейчас в ready state
    pub fn select_attackers(&self, ranked: &[(Entity, f32)], is_ready: impl Fn(Entity) -> bool) -> Vec<Entity> {
        ranked
            .iter()
            .take(self.max_attackers)
            .map(|(member, _)| *member)
            .filter(|member| is_ready(*member))
            .collect()
    }

    // === Separation ===

    /// Boids-style separation: для каждого member среднее отталкивание от
    /// соседей в радиусе (вес `radius - distance`), умноженное на strength.
    /// Возвращает только ненулевые сдвиги
    pub fn separation_offsets(&self, positions: &[(Entity, Vec3)]) -> Vec<(Entity, Vec3)> {
        let mut offsets = Vec::new();

        for (entity, position) in positions {
            if !self.contains(*entity) {
                continue;
            }

            let mut push = Vec3::ZERO;
            let mut neighbours = 0;

            for (other, other_position) in positions {
                if other == entity || !self.contains(*other) {
                    continue;
                }

                let away = *position - *other_position;
                let distance = away.length();

                if distance < self.separation_radius && distance > SEPARATION_EPSILON {
                    push += away.normalize() * (self.separation_radius - distance);
                    neighbours += 1;
                }
            }

            if neighbours > 0 {
                let nudge = push / neighbours as f32 * self.separation_strength;
                offsets.push((*entity, nudge));
            }
        }

        offsets
    }

    // === Rotation ===

    /// Round-robin: следующий member, он же уходит в конец
    pub fn next_in_rotation(&mut self) -> Option<Entity> {
        let next = self.rotation.pop_front()?;
        self.rotation.push_back(next);
        Some(next)
    }
}

/// Resource: все swarm группы симуляции
#[derive(Resource, Debug, Clone, Default)]
pub struct SwarmCoordinator {
    groups: BTreeMap<SwarmId, SwarmGroup>,
    next_id: u32,
}

impl SwarmCoordinator {
    pub fn create_group(&mut self, config: &SwarmConfig) -> SwarmId {
        let id = SwarmId(self.next_id);
        self.next_id += 1;
        self.groups.insert(id, SwarmGroup::new(config));
        id
    }

    pub fn insert_group(&mut self, group: SwarmGroup) -> SwarmId {
        let id = SwarmId(self.next_id);
        self.next_id += 1;
        self.groups.insert(id, group);
        id
    }

    pub fn group(&self, id: SwarmId) -> Option<&SwarmGroup> {
        self.groups.get(&id)
    }

    pub fn group_mut(&mut self, id: SwarmId) -> Option<&mut SwarmGroup> {
        self.groups.get_mut(&id)
    }

    pub fn groups(&self) -> impl Iterator<Item = (SwarmId, &SwarmGroup)> {
        self.groups.iter().map(|(id, group)| (*id, group))
    }

    pub fn groups_mut(&mut self) -> impl Iterator<Item = (SwarmId, &mut SwarmGroup)> {
        self.groups.iter_mut().map(|(id, group)| (*id, group))
    }

    pub fn remove_everywhere(&mut self, entity: Entity) {
        for group in self.groups.values_mut() {
            group.remove_member(entity);
        }
    }
}
