//! Health врага
//!
//! Инвариант: 0 ≤ current ≤ max. f32, потому что Recover регенерирует
//! экспоненциально (дробные приращения за тик).

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Health {
    pub current: f32,
    pub max: f32,
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100.0)
    }
}

impl Health {
    pub fn new(max: f32) -> Self {
        let max = max.max(0.0);
        Self { current: max, max }
    }

    pub fn is_depleted(&self) -> bool {
        self.current <= 0.0
    }

    /// Clamp в [0, max]; NaN трактуется как 0
    pub fn set(&mut self, value: f32) {
        self.current = if value.is_nan() {
            0.0
        } else {
            value.clamp(0.0, self.max)
        };
    }

    pub fn take_damage(&mut self, amount: f32) {
        self.set(self.current - amount.max(0.0));
    }

    pub fn heal(&mut self, amount: f32) {
        self.set(self.current + amount.max(0.0));
    }

    /// current / max (0 если max == 0)
    pub fn fraction(&self) -> f32 {
        if self.max > 0.0 {
            self.current / self.max
        } else {
            0.0
        }
    }
}
