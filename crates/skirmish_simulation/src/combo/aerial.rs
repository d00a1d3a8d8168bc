//! Aerial combo: отдельный resolver на время полёта
//!
//! За один airborne период: не больше `max_fast_attacks` быстрых атак,
//! один plunge, один air-dash refund быстрых атак. Приземление сбрасывает всё.

use crate::config::AerialConfig;

use super::resolver::AttackId;

#[derive(Debug, Clone)]
pub struct AerialComboResolver {
    airborne: bool,
    fast_used: u32,
    max_fast_attacks: u32,
    plunge_used: bool,
    dash_refund_used: bool,
}

impl Default for AerialComboResolver {
    fn default() -> Self {
        Self::new(&AerialConfig::default())
    }
}

impl AerialComboResolver {
    pub fn new(config: &AerialConfig) -> Self {
        Self {
            airborne: false,
            fast_used: 0,
            max_fast_attacks: config.max_fast_attacks,
            plunge_used: false,
            dash_refund_used: false,
        }
    }

    pub fn is_airborne(&self) -> bool {
        self.airborne
    }

    pub fn fast_attacks_used(&self) -> u32 {
        self.fast_used
    }

    pub fn plunge_used(&self) -> bool {
        self.plunge_used
    }

    /// Начало airborne периода
    pub fn take_off(&mut self) {
        self.clear_counters();
        self.airborne = true;
    }

    /// AirX1, AirX2, AirX1... пока не исчерпан лимит; None на земле/сверх лимита
    pub fn request_fast_attack(&mut self) -> Option<AttackId> {
        if !self.airborne || self.fast_used >= self.max_fast_attacks {
            return None;
        }

        let attack = if self.fast_used % 2 == 0 {
            AttackId::AIR_X1
        } else {
            AttackId::AIR_X2
        };
        self.fast_used += 1;
        Some(attack)
    }

    /// Plunge: один на airborne период
    pub fn request_plunge(&mut self) -> Option<AttackId> {
        if !self.airborne || self.plunge_used {
            return None;
        }
        self.plunge_used = true;
        Some(AttackId::AIR_PLUNGE)
    }

    /// Air-dash обнуляет счётчик быстрых атак, но только один раз за период.
    /// true — refund применён
    pub fn air_dash(&mut self) -> bool {
        if !self.airborne || self.dash_refund_used {
            return false;
        }
        self.dash_refund_used = true;
        self.fast_used = 0;
        true
    }

    pub fn land(&mut self) {
        self.clear_counters();
        self.airborne = false;
    }

    fn clear_counters(&mut self) {
        self.fast_used = 0;
        self.plunge_used = false;
        self.dash_refund_used = false;
    }
}
