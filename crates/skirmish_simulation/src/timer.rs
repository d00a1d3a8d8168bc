//! Deadline: отложенное "пробуждение" на будущем тике
//!
//! Idle timer, wander loop, combo reset window — всё это не корутины, а
//! сохранённый timestamp (секунды симуляции), который проверяется каждый тик.
//! Отмена = очистить timestamp, сработавший deadline больше не стреляет.

/// Cancellable fires-at timestamp
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Deadline {
    fires_at: Option<f32>,
}

impl Deadline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Запланировать (или перепланировать) срабатывание через `delay` секунд
    pub fn schedule(&mut self, now: f32, delay: f32) {
        self.fires_at = Some(now + delay.max(0.0));
    }

    /// Отмена. Повторный cancel — no-op
    pub fn cancel(&mut self) {
        self.fires_at = None;
    }

    pub fn is_scheduled(&self) -> bool {
        self.fires_at.is_some()
    }

    pub fn fires_at(&self) -> Option<f32> {
        self.fires_at
    }

    /// Время до срабатывания (0 если уже просрочен)
    pub fn remaining(&self, now: f32) -> Option<f32> {
        self.fires_at.map(|at| (at - now).max(0.0))
    }

    /// Истёк ли deadline (без потребления)
    pub fn is_due(&self, now: f32) -> bool {
        matches!(self.fires_at, Some(at) if now >= at)
    }

    /// Если deadline истёк — снимает его и возвращает true (one-shot)
    pub fn poll(&mut self, now: f32) -> bool {
        if self.is_due(now) {
            self.fires_at = None;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deadline_fires_once() {
        let mut deadline = Deadline::new();
        deadline.schedule(1.0, 2.0);

        assert!(!deadline.poll(2.5));
        assert!(deadline.poll(3.0));
        assert!(!deadline.poll(4.0)); // one-shot
        assert!(!deadline.is_scheduled());
    }

    #[test]
    fn test_cancelled_deadline_never_fires() {
        let mut deadline = Deadline::new();
        deadline.schedule(0.0, 1.0);
        deadline.cancel();
        deadline.cancel(); // double cancel — no-op

        assert!(!deadline.poll(10.0));
    }

    #[test]
    fn test_reschedule_supersedes_previous() {
        let mut deadline = Deadline::new();
        deadline.schedule(0.0, 1.0);
        deadline.schedule(0.5, 1.0); // теперь fires_at = 1.5

        assert!(!deadline.poll(1.2));
        let remaining = deadline.remaining(1.2).unwrap_or_default();
        assert!((remaining - 0.3).abs() < 1e-5, "remaining = {}", remaining);
        assert!(deadline.poll(1.5));
    }
}
