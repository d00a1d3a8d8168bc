//! Tier combo resolver (наземный)
//!
//! Состояние: tier 1..=3, sub-index 0/1, stance, last stance.
//! Attack ID детерминированно выводится из (tier, sub, stance, kind):
//!
//! | tier | Single fast | Area fast | Single heavy | Area heavy |
//! |------|-------------|-----------|--------------|------------|
//! | 1    | SX1 / SX2   | AX1 / AX2 | SY1          | AY1        |
//! | 2    | SX3 / SX4   | AX3       | SY2          | AY2        |
//! | 3    | SX5         | AX4       | SY3          | AY3        |
//!
//! Tier 3 = finisher, после него combo всегда сбрасывается.
//! Смена stance на tier > 1 не сбрасывает combo, а переводит текущий tier
//! в набор ID новой stance.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::ComboConfig;
use crate::timer::Deadline;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Stance {
    /// Одиночная цель
    #[default]
    Single,
    /// По площади
    Area,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttackKind {
    Fast,
    Heavy,
}

/// Opaque ключ атаки для animation/hitbox collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AttackId(&'static str);

impl AttackId {
    pub const SX1: AttackId = AttackId("SX1");
    pub const SX2: AttackId = AttackId("SX2");
    pub const SX3: AttackId = AttackId("SX3");
    pub const SX4: AttackId = AttackId("SX4");
    pub const SX5: AttackId = AttackId("SX5");
    pub const AX1: AttackId = AttackId("AX1");
    pub const AX2: AttackId = AttackId("AX2");
    pub const AX3: AttackId = AttackId("AX3");
    pub const AX4: AttackId = AttackId("AX4");
    pub const SY1: AttackId = AttackId("SY1");
    pub const SY2: AttackId = AttackId("SY2");
    pub const SY3: AttackId = AttackId("SY3");
    pub const AY1: AttackId = AttackId("AY1");
    pub const AY2: AttackId = AttackId("AY2");
    pub const AY3: AttackId = AttackId("AY3");
    pub const AIR_X1: AttackId = AttackId("AirX1");
    pub const AIR_X2: AttackId = AttackId("AirX2");
    pub const AIR_PLUNGE: AttackId = AttackId("AirPlunge");

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for AttackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

pub const MIN_TIER: u8 = 1;
pub const MAX_TIER: u8 = 3;

/// Таблица ID. Tier вне 1..=3 прижимается к границам, sub > 1 трактуется как 1
pub fn attack_id(tier: u8, sub_index: u8, stance: Stance, kind: AttackKind) -> AttackId {
    let second = sub_index > 0;
    match (tier.clamp(MIN_TIER, MAX_TIER), stance, kind) {
        (1, Stance::Single, AttackKind::Fast) if second => AttackId::SX2,
        (1, Stance::Single, AttackKind::Fast) => AttackId::SX1,
        (1, Stance::Area, AttackKind::Fast) if second => AttackId::AX2,
        (1, Stance::Area, AttackKind::Fast) => AttackId::AX1,
        (1, Stance::Single, AttackKind::Heavy) => AttackId::SY1,
        (1, Stance::Area, AttackKind::Heavy) => AttackId::AY1,

        (2, Stance::Single, AttackKind::Fast) if second => AttackId::SX4,
        (2, Stance::Single, AttackKind::Fast) => AttackId::SX3,
        (2, Stance::Area, AttackKind::Fast) => AttackId::AX3,
        (2, Stance::Single, AttackKind::Heavy) => AttackId::SY2,
        (2, Stance::Area, AttackKind::Heavy) => AttackId::AY2,

        (_, Stance::Single, AttackKind::Fast) => AttackId::SX5,
        (_, Stance::Area, AttackKind::Fast) => AttackId::AX4,
        (_, Stance::Single, AttackKind::Heavy) => AttackId::SY3,
        (_, Stance::Area, AttackKind::Heavy) => AttackId::AY3,
    }
}

/// Результат одного запроса атаки
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComboStep {
    pub attack: AttackId,
    /// Tier, на котором атака выполнена
    pub tier: u8,
    pub stance: Stance,
    pub kind: AttackKind,
    /// Tier 3 — combo закончен и сброшен
    pub finisher: bool,
    /// В этом combo уже был heavy
    pub heavy_chain: bool,
}

#[derive(Debug, Clone)]
pub struct ComboResolver {
    tier: u8,
    sub_index: u8,
    stance: Stance,
    last_stance: Option<Stance>,
    heavy_chain: bool,
    last_input: Option<f32>,
    reset_window: Deadline,
    reset_timeout: f32,
}

impl Default for ComboResolver {
    fn default() -> Self {
        Self::new(&ComboConfig::default())
    }
}

impl ComboResolver {
    pub fn new(config: &ComboConfig) -> Self {
        Self {
            tier: MIN_TIER,
            sub_index: 0,
            stance: Stance::Single,
            last_stance: None,
            heavy_chain: false,
            last_input: None,
            reset_window: Deadline::new(),
            reset_timeout: config.reset_timeout,
        }
    }

    // === Queries ===

    pub fn tier(&self) -> u8 {
        self.tier
    }

    pub fn sub_index(&self) -> u8 {
        self.sub_index
    }

    pub fn stance(&self) -> Stance {
        self.stance
    }

    pub fn last_stance(&self) -> Option<Stance> {
        self.last_stance
    }

    pub fn heavy_chain(&self) -> bool {
        self.heavy_chain
    }

    pub fn last_input(&self) -> Option<f32> {
        self.last_input
    }

    /// Combo в процессе (есть открытое reset окно)
    pub fn is_active(&self) -> bool {
        self.reset_window.is_scheduled()
    }

    pub fn reset_deadline(&self) -> Option<f32> {
        self.reset_window.fires_at()
    }

    // === Requests ===

    pub fn request_fast_attack(&mut self, stance: Stance, now: f32) -> ComboStep {
        self.request(AttackKind::Fast, stance, now)
    }

    pub fn request_heavy_attack(&mut self, stance: Stance, now: f32) -> ComboStep {
        self.request(AttackKind::Heavy, stance, now)
    }

    pub fn request(&mut self, kind: AttackKind, stance: Stance, now: f32) -> ComboStep {
        // Окно истекло, а poll ещё не вызывался — начинаем заново
        if self.reset_window.poll(now) {
            self.reset();
        }

        if self.last_stance.is_some_and(|last| last != stance) {
            // Tier сохраняется; последовательность внутри tier'а — с начала
            self.sub_index = 0;
        }
        self.stance = stance;

        let tier = self.tier;
        let attack = attack_id(tier, self.sub_index, stance, kind);
        if kind == AttackKind::Heavy {
            self.heavy_chain = true;
        }
        let heavy_chain = self.heavy_chain;

        let finisher = self.advance(kind, stance);

        self.last_stance = Some(stance);
        self.last_input = Some(now);

        if finisher {
            self.reset();
        } else {
            self.reset_window.schedule(now, self.reset_timeout);
        }

        ComboStep {
            attack,
            tier,
            stance,
            kind,
            finisher,
            heavy_chain,
        }
    }

    /// true — был finisher (tier 3)
    fn advance(&mut self, kind: AttackKind, stance: Stance) -> bool {
        match (self.tier, kind) {
            (MAX_TIER, _) => true,
            (_, AttackKind::Heavy) => {
                self.promote();
                false
            }
            (1, AttackKind::Fast) => {
                if self.sub_index == 0 {
                    self.sub_index = 1;
                } else {
                    self.promote();
                }
                false
            }
            (_, AttackKind::Fast) => {
                if stance == Stance::Single && self.sub_index == 0 {
                    self.sub_index = 1;
                } else {
                    self.promote();
                }
                false
            }
        }
    }

    fn promote(&mut self) {
        self.tier = (self.tier + 1).min(MAX_TIER);
        self.sub_index = 0;
    }

    // === Timing ===

    /// Reset по неактивности. true — combo был сброшен этим вызовом
    pub fn poll(&mut self, now: f32) -> bool {
        if self.reset_window.poll(now) {
            crate::logger::log("Combo: reset window elapsed");
            self.reset();
            true
        } else {
            false
        }
    }

    /// Клип атаки доигран — окно считаем от конца анимации
    pub fn notify_animation_complete(&mut self, now: f32) {
        if self.reset_window.is_scheduled() {
            self.reset_window.schedule(now, self.reset_timeout);
        }
    }

    pub fn reset(&mut self) {
        self.tier = MIN_TIER;
        self.sub_index = 0;
        self.last_stance = None;
        self.heavy_chain = false;
        self.reset_window.cancel();
    }
}
