//! EnemyBrain: state machine + health + timers одного врага
//!
//! Composition вместо наследования: машина (таблица переходов из archetype)
//! и `EnemyContext` (данные, которые мутируют entry/exit hooks).
//! Внешний мир видит brain через методы (perception, health, navigation)
//! и через outbox `EnemySignal`, который systems превращают в Bevy events.
//!
//! Death детектится двумя путями (Die transition и прямой zero health) —
//! оба идут через `EnemyContext::emit_died`, latch гарантирует ровно один сигнал.

use std::fmt;

use bevy::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::config::EnemyConfig;
use crate::fsm::{FireOutcome, FsmError, StateMachine, Transition, TriggerRegistry};
use crate::timer::Deadline;

use super::archetype::{build_machine, EnemyArchetype};
use super::health::Health;
use super::states::{EnemyState, EnemyTrigger};
use super::zones::{ZoneId, ZoneRegistry};

/// Recover считается завершённым, когда до цели осталось меньше этой доли max
pub const RECOVER_EPSILON_FRACTION: f32 = 0.01;

pub type EnemyMachine = StateMachine<EnemyState, EnemyTrigger, EnemyContext>;
pub type EnemyTransition = Transition<EnemyState, EnemyTrigger>;

/// Outbox: что brain хочет сообщить внешнему миру
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EnemySignal {
    StateChanged {
        from: EnemyState,
        to: EnemyState,
        trigger: EnemyTrigger,
    },
    LowHealth,
    Recovered,
    Died,
    /// Запрос navigation collaborator'у
    MoveTo(Vec3),
}

/// Attack slot со стороны врага
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SlotStatus {
    /// Не в Attack state
    #[default]
    None,
    /// В Attack state, ждём разрешения arbitrator'а
    Waiting,
    /// Slot получен, атака идёт
    Active,
}

/// Данные, доступные FSM hooks
pub struct EnemyContext {
    pub(crate) now: f32,
    pub(crate) config: EnemyConfig,
    pub(crate) health: Health,
    pub(crate) low_health_fired: bool,
    pub(crate) died: bool,
    pub(crate) zone: Option<ZoneId>,
    pub(crate) idle_timer: Deadline,
    pub(crate) wander_timer: Deadline,
    pub(crate) relocate_pending: bool,
    pub(crate) relocation_target: Option<ZoneId>,
    pub(crate) recover_target: Option<f32>,
    pub(crate) slot: SlotStatus,
    pub(crate) release_slot: bool,
    pub(crate) signals: Vec<EnemySignal>,
    pub(crate) rng: ChaCha8Rng,
}

impl EnemyContext {
    fn new(config: &EnemyConfig, seed: u64) -> Self {
        Self {
            now: 0.0,
            config: config.clone(),
            health: Health::new(config.max_health),
            low_health_fired: false,
            died: false,
            zone: None,
            idle_timer: Deadline::new(),
            wander_timer: Deadline::new(),
            relocate_pending: false,
            relocation_target: None,
            recover_target: None,
            slot: SlotStatus::None,
            release_slot: false,
            signals: Vec::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    fn wander_delay(&mut self) -> f32 {
        let (min, max) = self.config.wander_interval;
        if max > min {
            self.rng.gen_range(min..max)
        } else {
            min
        }
    }

    /// Latched: второй путь смерти молча подавляется
    pub(crate) fn emit_died(&mut self) -> bool {
        if self.died {
            return false;
        }
        self.died = true;
        self.cancel_timers();
        self.recover_target = None;
        self.relocate_pending = false;
        self.signals.push(EnemySignal::Died);
        true
    }

    fn cancel_timers(&mut self) {
        self.idle_timer.cancel();
        self.wander_timer.cancel();
    }

    // === Hooks (вызываются из archetype таблицы) ===

    pub(crate) fn enter_idle(&mut self) {
        let now = self.now;
        let idle_duration = self.config.idle_duration;
        let wander_delay = self.wander_delay();
        // Повторный вход в Idle перепланирует (старый deadline больше не выстрелит)
        self.idle_timer.schedule(now, idle_duration);
        self.wander_timer.schedule(now, wander_delay);
    }

    pub(crate) fn exit_idle(&mut self) {
        self.cancel_timers();
    }

    pub(crate) fn enter_relocate(&mut self) {
        self.relocate_pending = true;
    }

    pub(crate) fn exit_relocate(&mut self) {
        self.relocate_pending = false;
        self.relocation_target = None;
    }

    pub(crate) fn enter_recover(&mut self) {
        self.recover_target = Some(self.health.max * self.config.recover_target_fraction);
    }

    pub(crate) fn exit_recover(&mut self) {
        self.recover_target = None;
    }

    pub(crate) fn enter_attack(&mut self) {
        self.slot = SlotStatus::Waiting;
    }

    pub(crate) fn exit_attack(&mut self) {
        if self.slot == SlotStatus::Active {
            self.release_slot = true;
        }
        self.slot = SlotStatus::None;
    }

    pub(crate) fn enter_death(&mut self) {
        self.emit_died();
    }

    pub(crate) fn after_transition(&mut self, transition: &EnemyTransition) {
        if transition.trigger == EnemyTrigger::RecoveredHealth {
            self.low_health_fired = false;
            self.signals.push(EnemySignal::Recovered);
        }

        self.signals.push(EnemySignal::StateChanged {
            from: transition.source,
            to: transition.destination,
            trigger: transition.trigger,
        });
    }
}

/// Component: мозг врага
#[derive(Component)]
pub struct EnemyBrain {
    archetype: EnemyArchetype,
    machine: EnemyMachine,
    ctx: EnemyContext,
    started: bool,
}

impl fmt::Debug for EnemyBrain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnemyBrain")
            .field("archetype", &self.archetype)
            .field("state", &self.machine.state())
            .field("health", &self.ctx.health.current)
            .field("zone", &self.ctx.zone)
            .field("alive", &self.is_alive())
            .field("slot", &self.ctx.slot)
            .finish()
    }
}

impl EnemyBrain {
    /// `seed` — per-enemy RNG (wander interval); берётся из DeterministicRng при спавне
    pub fn new(archetype: EnemyArchetype, config: &EnemyConfig, seed: u64) -> Self {
        Self {
            archetype,
            machine: build_machine(archetype),
            ctx: EnemyContext::new(config, seed),
            started: false,
        }
    }

    pub fn with_zone(mut self, zone: Option<ZoneId>) -> Self {
        self.ctx.zone = zone;
        self
    }

    /// Запускает initial state (Idle) с реальным временем спавна. Идемпотентно
    pub fn start(&mut self, now: f32) {
        if self.started {
            return;
        }
        self.started = true;
        self.ctx.now = now;
        if self.machine.state() == EnemyState::Idle && !self.is_dead() {
            self.ctx.enter_idle();
        }
    }

    /// Синхронизация часов перед обработкой событий тика
    pub fn sync_clock(&mut self, now: f32) {
        self.start(now);
        self.ctx.now = now;
    }

    // === Queries ===

    pub fn archetype(&self) -> EnemyArchetype {
        self.archetype
    }

    pub fn is_boss(&self) -> bool {
        self.archetype.is_boss()
    }

    pub fn state(&self) -> EnemyState {
        self.machine.state()
    }

    pub fn is_in_state(&self, state: EnemyState) -> bool {
        self.machine.is_in_state(state)
    }

    pub fn can_fire(&self, trigger: EnemyTrigger) -> bool {
        !self.is_dead() && self.machine.can_fire(trigger)
    }

    pub fn is_dead(&self) -> bool {
        self.ctx.died
    }

    pub fn is_alive(&self) -> bool {
        !self.ctx.died
    }

    pub fn health(&self) -> Health {
        self.ctx.health
    }

    pub fn zone(&self) -> Option<ZoneId> {
        self.ctx.zone
    }

    pub fn low_health_latched(&self) -> bool {
        self.ctx.low_health_fired
    }

    pub fn idle_deadline(&self) -> Option<f32> {
        self.ctx.idle_timer.fires_at()
    }

    pub fn relocation_target(&self) -> Option<ZoneId> {
        self.ctx.relocation_target
    }

    pub fn slot_status(&self) -> SlotStatus {
        self.ctx.slot
    }

    // === Triggers ===

    pub fn fire(&mut self, trigger: EnemyTrigger) -> Result<FireOutcome<EnemyState, EnemyTrigger>, FsmError> {
        if self.is_dead() {
            return Err(FsmError::Dead(trigger.name().to_string()));
        }
        self.fire_internal(trigger)
    }

    /// Строковый trigger от perception. Unknown name → warning, ничего не происходит
    pub fn fire_by_name(
        &mut self,
        name: &str,
        registry: &TriggerRegistry<EnemyTrigger>,
    ) -> Result<FireOutcome<EnemyState, EnemyTrigger>, FsmError> {
        let trigger = registry.resolve(name).inspect_err(|_| {
            crate::log_warning(&format!("AI: unknown trigger name '{}' dropped", name));
        })?;
        self.fire(trigger)
    }

    fn fire_internal(&mut self, trigger: EnemyTrigger) -> Result<FireOutcome<EnemyState, EnemyTrigger>, FsmError> {
        self.machine.fire(trigger, &mut self.ctx)
    }

    // === Health ===

    pub fn set_health(&mut self, value: f32) {
        if self.is_dead() {
            return;
        }

        self.ctx.health.set(value);

        if self.ctx.health.is_depleted() {
            self.die_from_health();
            return;
        }

        let threshold = self.ctx.health.max * self.ctx.config.low_health_threshold;
        if self.ctx.health.current < threshold && !self.ctx.low_health_fired {
            self.ctx.low_health_fired = true;
            self.ctx.signals.push(EnemySignal::LowHealth);
            // Ignored/NotPermitted — не ошибка для health пути (warning уже в логе)
            let _ = self.fire_internal(EnemyTrigger::LowHealth);
        }
    }

    /// loseHP от combat collaborator
    pub fn lose_hp(&mut self, amount: f32) {
        let current = self.ctx.health.current;
        self.set_health(current - amount.max(0.0));
    }

    /// healHP от combat collaborator
    pub fn heal_hp(&mut self, amount: f32) {
        let current = self.ctx.health.current;
        self.set_health(current + amount.max(0.0));
    }

    fn die_from_health(&mut self) {
        self.ctx.emit_died();
        // Archetype без Die перехода (boss) остаётся в своём state, но latch уже закрыт
        if matches!(
            self.machine.resolve(EnemyTrigger::Die),
            crate::fsm::Resolution::Permitted(_)
        ) {
            let _ = self.fire_internal(EnemyTrigger::Die);
        }
    }

    // === Navigation ===

    /// "destination reached" от navigation collaborator.
    /// ReachZone только если прибыли внутрь целевой зоны relocate
    /// (поздний arrival от wander не считается)
    pub fn reach_destination(&mut self, position: Vec3, zones: &ZoneRegistry) {
        if self.is_dead() {
            return;
        }

        self.ctx.zone = zones.zone_at(position);

        if self.machine.state() != EnemyState::Relocate {
            return;
        }

        let arrived = self
            .ctx
            .relocation_target
            .and_then(|id| zones.get(id))
            .is_some_and(|zone| zone.contains(position));
        if arrived {
            let _ = self.fire_internal(EnemyTrigger::ReachZone);
        }
    }

    // === Attack slot ===

    pub fn wants_attack_slot(&self) -> bool {
        self.is_alive() && self.ctx.slot == SlotStatus::Waiting
    }

    pub fn mark_attack_started(&mut self) {
        if self.ctx.slot == SlotStatus::Waiting {
            self.ctx.slot = SlotStatus::Active;
        }
    }

    /// Slot нужно вернуть arbitrator'у (вышли из Attack посреди атаки)
    pub fn take_slot_release(&mut self) -> bool {
        std::mem::take(&mut self.ctx.release_slot)
    }

    /// Arbitrator сам отозвал slot (timeout) — атака считается законченной
    pub fn revoke_attack_slot(&mut self) {
        if self.ctx.slot != SlotStatus::Active {
            return;
        }
        self.ctx.slot = SlotStatus::None;
        if !self.is_dead() && self.machine.state() == EnemyState::Attack {
            let _ = self.fire_internal(EnemyTrigger::AttackFinished);
        }
        // exit hook не должен повторно освобождать уже отозванный slot
        self.ctx.release_slot = false;
    }

    // === Tick ===

    /// Таймеры, relocate, recover. `dt` — шаг симуляции
    pub fn tick(&mut self, now: f32, dt: f32, zones: &ZoneRegistry) {
        self.sync_clock(now);

        if self.is_dead() {
            return;
        }

        match self.machine.state() {
            EnemyState::Idle => self.tick_idle(now, zones),
            EnemyState::Relocate => self.tick_relocate(zones),
            EnemyState::Recover => self.tick_recover(dt),
            _ => {}
        }
    }

    fn tick_idle(&mut self, now: f32, zones: &ZoneRegistry) {
        if self.ctx.wander_timer.poll(now) {
            if let Some(zone) = self.ctx.zone.and_then(|id| zones.get(id)) {
                let point = zone.random_point(&mut self.ctx.rng);
                self.ctx.signals.push(EnemySignal::MoveTo(point));
            }
            let delay = self.ctx.wander_delay();
            self.ctx.wander_timer.schedule(now, delay);
        }

        if self.ctx.idle_timer.poll(now) {
            let _ = self.fire_internal(EnemyTrigger::IdleTimerElapsed);
        }
    }

    fn tick_relocate(&mut self, zones: &ZoneRegistry) {
        if !self.ctx.relocate_pending {
            return;
        }
        self.ctx.relocate_pending = false;

        let target = zones.pick_other(self.ctx.zone, &mut self.ctx.rng);
        match target.and_then(|id| zones.get(id).map(|zone| (id, zone))) {
            Some((id, zone)) => {
                let point = zone.random_point(&mut self.ctx.rng);
                self.ctx.relocation_target = Some(id);
                self.ctx.signals.push(EnemySignal::MoveTo(point));
            }
            None => {
                // Некуда идти — сразу "прибыли", обратно в Idle
                crate::log("AI: relocate has no other zone, staying");
                let _ = self.fire_internal(EnemyTrigger::ReachZone);
            }
        }
    }

    fn tick_recover(&mut self, dt: f32) {
        let Some(target) = self.ctx.recover_target else {
            return;
        };

        let health = &mut self.ctx.health;
        let missing = target - health.current;
        let epsilon = health.max * RECOVER_EPSILON_FRACTION;

        if missing <= epsilon {
            if missing > 0.0 {
                health.set(target);
            }
            self.ctx.recover_target = None;
            let _ = self.fire_internal(EnemyTrigger::RecoveredHealth);
        } else {
            // Экспоненциальное приближение: чем больше не хватает, тем быстрее
            let rate = self.ctx.config.recover_rate;
            let current = health.current;
            health.set(current + rate * missing * dt);
        }
    }

    /// Забрать накопленные сигналы (вызывается один раз за тик)
    pub fn drain_signals(&mut self) -> Vec<EnemySignal> {
        std::mem::take(&mut self.ctx.signals)
    }
}
