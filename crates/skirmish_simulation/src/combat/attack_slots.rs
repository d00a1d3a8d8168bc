//! Attack Slot Arbitrator: общая очередь атакующих с ограниченной ёмкостью
//!
//! Правила:
//! - Порядок = порядок регистрации; меняется только cycle-to-back (finish/timeout)
//!   и удалением мёртвых. Никакой сортировки по дистанции внутри arbitrator'а.
//! - Атаковать может тот, чья позиция в очереди < capacity.
//! - Боссы (если `include_bosses == false`) в очередь не попадают и свободны всегда.
//! - Очистка мёртвых идёт до любых проверок позиции (`tick` = purge → timeouts).

use std::collections::{HashMap, HashSet};

use bevy::prelude::*;

use crate::config::AttackSlotConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttackerKind {
    Regular,
    Boss,
}

/// Resource: единственный arbitrator на симуляцию
#[derive(Resource, Debug, Clone)]
pub struct AttackSlotArbitrator {
    /// Front = наивысший приоритет
    queue: Vec<Entity>,
    /// attacker → время начала атаки
    active: HashMap<Entity, f32>,
    /// Боссы вне очереди
    excluded: HashSet<Entity>,
    capacity: usize,
    attack_timeout: f32,
    include_bosses: bool,
}

impl Default for AttackSlotArbitrator {
    fn default() -> Self {
        Self::new(&AttackSlotConfig::default())
    }
}

impl AttackSlotArbitrator {
    pub fn new(config: &AttackSlotConfig) -> Self {
        Self {
            queue: Vec::new(),
            active: HashMap::new(),
            excluded: HashSet::new(),
            capacity: config.capacity,
            attack_timeout: config.attack_timeout,
            include_bosses: config.include_bosses,
        }
    }

    // === Registration ===

    /// Идемпотентно. Excluded boss запоминается, но в очередь не ставится
    pub fn register(&mut self, attacker: Entity, kind: AttackerKind) {
        if kind == AttackerKind::Boss && !self.include_bosses {
            self.excluded.insert(attacker);
            return;
        }

        if !self.queue.contains(&attacker) {
            self.queue.push(attacker);
        }
    }

    /// Безопасно вызывать повторно
    pub fn unregister(&mut self, attacker: Entity) {
        self.queue.retain(|queued| *queued != attacker);
        self.active.remove(&attacker);
        self.excluded.remove(&attacker);
    }

    // === Permission ===

    /// Позиция < capacity, либо excluded boss.
    ///
    /// Незарегистрированный attacker регистрируется в конец текущей очереди
    /// и получает false (встаёт в очередь, а не атакует сразу).
    pub fn can_attack(&mut self, attacker: Entity) -> bool {
        if self.excluded.contains(&attacker) {
            return true;
        }

        match self.position(attacker) {
            Some(index) => index < self.capacity,
            None => {
                crate::logger::log_warning(&format!(
                    "AttackSlots: {:?} was not registered, queued at back",
                    attacker
                ));
                self.queue.push(attacker);
                false
            }
        }
    }

    /// Начать атаку. Без разрешения — warning и false
    pub fn begin_attack(&mut self, attacker: Entity, now: f32) -> bool {
        if !self.can_attack(attacker) {
            crate::logger::log_warning(&format!(
                "AttackSlots: {:?} tried to attack without a slot",
                attacker
            ));
            return false;
        }

        self.active.entry(attacker).or_insert(now);
        true
    }

    /// Атака закончена: в конец очереди, если жив; мёртвый выбывает.
    /// Незарегистрированный attacker в очередь не попадает
    pub fn finish_attack(&mut self, attacker: Entity, still_alive: bool) {
        self.active.remove(&attacker);

        if self.excluded.contains(&attacker) {
            if !still_alive {
                self.excluded.remove(&attacker);
            }
            return;
        }

        let Some(index) = self.position(attacker) else {
            return;
        };
        self.queue.remove(index);
        if still_alive {
            self.queue.push(attacker);
        }
    }

    // === Per-tick maintenance ===

    /// Убрать мёртвых/удалённых отовсюду. Возвращает число удалённых из очереди
    pub fn purge(&mut self, is_alive: impl Fn(Entity) -> bool) -> usize {
        let before = self.queue.len();
        self.queue.retain(|attacker| is_alive(*attacker));
        self.active.retain(|attacker, _| is_alive(*attacker));
        self.excluded.retain(|attacker| is_alive(*attacker));
        before - self.queue.len()
    }

    /// Принудительный cycle атакующих, превысивших timeout (в порядке очереди)
    pub fn expire_timeouts(&mut self, now: f32, is_alive: impl Fn(Entity) -> bool) -> Vec<Entity> {
        let mut expired: Vec<Entity> = self
            .active
            .iter()
            .filter(|(_, started)| now - **started > self.attack_timeout)
            .map(|(attacker, _)| *attacker)
            .collect();

        // HashMap без порядка — упорядочиваем по очереди, затем по entity
        expired.sort_by_key(|attacker| (self.position(*attacker).unwrap_or(usize::MAX), *attacker));

        for attacker in &expired {
            crate::logger::log(&format!("⏱️ AttackSlots: {:?} timed out, cycling", attacker));
            self.finish_attack(*attacker, is_alive(*attacker));
        }

        expired
    }

    /// purge → timeouts. Возвращает attackers, отозванных по timeout
    pub fn tick(&mut self, now: f32, is_alive: impl Fn(Entity) -> bool) -> Vec<Entity> {
        self.purge(&is_alive);
        self.expire_timeouts(now, &is_alive)
    }

    // === Queries ===

    pub fn queue(&self) -> &[Entity] {
        &self.queue
    }

    pub fn position(&self, attacker: Entity) -> Option<usize> {
        self.queue.iter().position(|queued| *queued == attacker)
    }

    pub fn is_registered(&self, attacker: Entity) -> bool {
        self.excluded.contains(&attacker) || self.queue.contains(&attacker)
    }

    pub fn is_excluded(&self, attacker: Entity) -> bool {
        self.excluded.contains(&attacker)
    }

    pub fn is_active(&self, attacker: Entity) -> bool {
        self.active.contains_key(&attacker)
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn attack_timeout(&self) -> f32 {
        self.attack_timeout
    }
}
