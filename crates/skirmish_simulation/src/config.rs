//! Конфигурация симуляции (RON)
//!
//! Все секции `#[serde(default)]` — в файле достаточно указать только то,
//! что отличается от defaults.
//!
//! ```ron
//! (
//!     seed: 7,
//!     attack_slots: (capacity: 3),
//!     combo: (reset_timeout: 0.8),
//! )
//! ```

use std::path::Path;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] ron::error::SpannedError),
}

/// Корневой конфиг (Resource, вставляется SimulationPlugin'ом)
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Seed для DeterministicRng
    pub seed: u64,
    /// Частота FixedUpdate
    pub tick_hz: f64,
    pub enemy: EnemyConfig,
    pub attack_slots: AttackSlotConfig,
    pub swarm: SwarmConfig,
    pub combo: ComboConfig,
    pub aerial: AerialConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            tick_hz: 60.0,
            enemy: EnemyConfig::default(),
            attack_slots: AttackSlotConfig::default(),
            swarm: SwarmConfig::default(),
            combo: ComboConfig::default(),
            aerial: AerialConfig::default(),
        }
    }
}

impl SimulationConfig {
    pub fn from_ron_str(source: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(source)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_ron_str(&source)
    }

    /// tick_hz, если он положительный и конечный; иначе 60
    pub fn fixed_hz(&self) -> f64 {
        if self.tick_hz.is_finite() && self.tick_hz > 0.0 {
            self.tick_hz
        } else {
            60.0
        }
    }
}

/// Параметры enemy behavior core
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyConfig {
    pub max_health: f32,
    /// Доля max health, ниже которой стреляет LowHealth
    pub low_health_threshold: f32,
    /// Сколько стоим в Idle до IdleTimerElapsed (секунды)
    pub idle_duration: f32,
    /// Интервал wander loop: равномерно в [min, max)
    pub wander_interval: (f32, f32),
    /// Recover регенерирует до этой доли max health
    pub recover_target_fraction: f32,
    /// delta = rate * missing * dt
    pub recover_rate: f32,
    /// Окно до деспавна трупа (VFX, scoring, pooling)
    pub despawn_delay: f32,
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            max_health: 100.0,
            low_health_threshold: 0.25,
            idle_duration: 5.0,
            wander_interval: (2.0, 4.0),
            recover_target_fraction: 0.8,
            recover_rate: 0.1,
            despawn_delay: 3.0,
        }
    }
}

/// Параметры attack slot arbitrator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttackSlotConfig {
    /// Максимум одновременных атакующих
    pub capacity: usize,
    /// Атака дольше timeout принудительно циклируется (секунды)
    pub attack_timeout: f32,
    /// false = боссы вне очереди и атакуют всегда
    pub include_bosses: bool,
}

impl Default for AttackSlotConfig {
    fn default() -> Self {
        Self {
            capacity: 2,
            attack_timeout: 3.0,
            include_bosses: false,
        }
    }
}

/// Параметры swarm группы
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwarmConfig {
    /// K ближайших к цели могут атаковать
    pub max_attackers: usize,
    pub separation_radius: f32,
    /// Множитель separation nudge за тик
    pub separation_strength: f32,
}

impl Default for SwarmConfig {
    fn default() -> Self {
        Self {
            max_attackers: 3,
            separation_radius: 1.5,
            separation_strength: 0.1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComboConfig {
    /// Без input дольше этого — combo сбрасывается в tier 1
    pub reset_timeout: f32,
}

impl Default for ComboConfig {
    fn default() -> Self {
        Self { reset_timeout: 1.2 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AerialConfig {
    /// Fast атак за один airborne период
    pub max_fast_attacks: u32,
}

impl Default for AerialConfig {
    fn default() -> Self {
        Self { max_fast_attacks: 2 }
    }
}
