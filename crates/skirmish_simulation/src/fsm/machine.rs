//! Hierarchical state machine (statechart-like, без guards и timed transitions)
//!
//! Конфигурация собирается через `StateMachineBuilder`, после `build()` — immutable.
//! Resolution trigger'а:
//! 1. permitted-таблица текущего состояния
//! 2. ignore-список текущего состояния → trigger поглощён, переход не происходит
//! 3. то же самое для parent (substate_of), рекурсивно до root
//! 4. нигде не нашли → `FsmError::NotPermitted`
//!
//! Hooks получают `&mut C` (контекст владельца) и описание перехода.
//! Порядок: exit(leaf) → смена state → entry(destination) → on_transitioned.

use std::collections::{HashMap, HashSet};
use std::fmt::Debug;
use std::hash::Hash;

use super::FsmError;

/// Tag для state/trigger: маленький Copy enum или число
pub trait Tag: Copy + Eq + Hash + Debug + Send + Sync + 'static {}

impl<X> Tag for X where X: Copy + Eq + Hash + Debug + Send + Sync + 'static {}

/// Callback на entry/exit/post-transition
pub type Hook<S, T, C> = Box<dyn Fn(&mut C, &Transition<S, T>) + Send + Sync>;

/// Описание перехода (передаётся во все hooks)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition<S, T> {
    pub source: S,
    pub destination: S,
    pub trigger: T,
}

/// Результат успешного fire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FireOutcome<S, T> {
    Transitioned(Transition<S, T>),
    /// Trigger совпал с ignore-списком — deliberate no-op
    Ignored,
}

impl<S, T> FireOutcome<S, T> {
    pub fn transitioned(&self) -> bool {
        matches!(self, FireOutcome::Transitioned(_))
    }
}

/// Результат resolution без мутации
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution<S> {
    Permitted(S),
    Ignored,
    NotPermitted,
}

struct StateRepresentation<S, T, C> {
    parent: Option<S>,
    permitted: HashMap<T, S>,
    ignored: HashSet<T>,
    on_entry: Vec<Hook<S, T, C>>,
    on_exit: Vec<Hook<S, T, C>>,
}

impl<S, T, C> Default for StateRepresentation<S, T, C> {
    fn default() -> Self {
        Self {
            parent: None,
            permitted: HashMap::new(),
            ignored: HashSet::new(),
            on_entry: Vec::new(),
            on_exit: Vec::new(),
        }
    }
}

/// Builder для машины (единственное место где конфигурация мутабельна)
pub struct StateMachineBuilder<S: Tag, T: Tag, C> {
    initial: S,
    states: HashMap<S, StateRepresentation<S, T, C>>,
    on_transitioned: Vec<Hook<S, T, C>>,
}

impl<S: Tag, T: Tag, C> StateMachineBuilder<S, T, C> {
    pub fn new(initial: S) -> Self {
        Self {
            initial,
            states: HashMap::new(),
            on_transitioned: Vec::new(),
        }
    }

    pub fn configure(&mut self, state: S) -> StateConfig<'_, S, T, C> {
        let representation = self.states.entry(state).or_default();
        StateConfig {
            state,
            representation,
        }
    }

    /// Global post-transition hook (inspector mirror, "entered Death" подписчики)
    pub fn on_transitioned<F>(&mut self, hook: F) -> &mut Self
    where
        F: Fn(&mut C, &Transition<S, T>) + Send + Sync + 'static,
    {
        self.on_transitioned.push(Box::new(hook));
        self
    }

    pub fn build(self) -> StateMachine<S, T, C> {
        StateMachine {
            state: self.initial,
            states: self.states,
            on_transitioned: self.on_transitioned,
        }
    }
}

/// Конфигурация одного состояния (chainable, by value)
pub struct StateConfig<'a, S: Tag, T: Tag, C> {
    state: S,
    representation: &'a mut StateRepresentation<S, T, C>,
}

impl<'a, S: Tag, T: Tag, C> StateConfig<'a, S, T, C> {
    pub fn substate_of(self, parent: S) -> Self {
        if parent == self.state {
            crate::log_warning(&format!(
                "FSM: state {:?} cannot be a substate of itself, ignored",
                self.state
            ));
        } else {
            self.representation.parent = Some(parent);
        }
        self
    }

    pub fn permit(self, trigger: T, destination: S) -> Self {
        self.representation.ignored.remove(&trigger);
        self.representation.permitted.insert(trigger, destination);
        self
    }

    pub fn ignore(self, trigger: T) -> Self {
        self.representation.permitted.remove(&trigger);
        self.representation.ignored.insert(trigger);
        self
    }

    pub fn on_entry<F>(self, hook: F) -> Self
    where
        F: Fn(&mut C, &Transition<S, T>) + Send + Sync + 'static,
    {
        self.representation.on_entry.push(Box::new(hook));
        self
    }

    pub fn on_exit<F>(self, hook: F) -> Self
    where
        F: Fn(&mut C, &Transition<S, T>) + Send + Sync + 'static,
    {
        self.representation.on_exit.push(Box::new(hook));
        self
    }
}

/// Hierarchical FSM instance (один на владельца)
pub struct StateMachine<S: Tag, T: Tag, C> {
    state: S,
    states: HashMap<S, StateRepresentation<S, T, C>>,
    on_transitioned: Vec<Hook<S, T, C>>,
}

impl<S: Tag, T: Tag, C> StateMachine<S, T, C> {
    pub fn state(&self) -> S {
        self.state
    }

    pub fn parent_of(&self, state: S) -> Option<S> {
        self.states.get(&state).and_then(|rep| rep.parent)
    }

    /// Цепочка state → parent → ... → root (ограничена числом состояний)
    pub fn ancestry(&self, state: S) -> Vec<S> {
        let mut chain = vec![state];
        let mut current = state;

        while let Some(parent) = self.parent_of(current) {
            // Кривая конфигурация с циклом не должна зависнуть
            if chain.len() > self.states.len() || chain.contains(&parent) {
                break;
            }
            chain.push(parent);
            current = parent;
        }

        chain
    }

    /// true если текущее состояние == `state` или его потомок
    pub fn is_in_state(&self, state: S) -> bool {
        self.ancestry(self.state).contains(&state)
    }

    pub fn resolve(&self, trigger: T) -> Resolution<S> {
        for state in self.ancestry(self.state) {
            let Some(rep) = self.states.get(&state) else {
                continue;
            };

            if let Some(destination) = rep.permitted.get(&trigger) {
                return Resolution::Permitted(*destination);
            }

            if rep.ignored.contains(&trigger) {
                return Resolution::Ignored;
            }
        }

        Resolution::NotPermitted
    }

    /// Проверка без мутации. Ignored trigger считается "можно" (не ошибка)
    pub fn can_fire(&self, trigger: T) -> bool {
        !matches!(self.resolve(trigger), Resolution::NotPermitted)
    }

    /// Все triggers, приводящие к переходу из текущего состояния (с учётом предков)
    pub fn permitted_triggers(&self) -> Vec<T> {
        let mut triggers = Vec::new();
        for state in self.ancestry(self.state) {
            if let Some(rep) = self.states.get(&state) {
                for trigger in rep.permitted.keys() {
                    if !triggers.contains(trigger)
                        && matches!(self.resolve(*trigger), Resolution::Permitted(_))
                    {
                        triggers.push(*trigger);
                    }
                }
            }
        }
        triggers
    }

    pub fn fire(&mut self, trigger: T, context: &mut C) -> Result<FireOutcome<S, T>, FsmError> {
        let destination = match self.resolve(trigger) {
            Resolution::Permitted(destination) => destination,
            Resolution::Ignored => return Ok(FireOutcome::Ignored),
            Resolution::NotPermitted => {
                crate::log_warning(&format!(
                    "FSM: trigger {:?} not permitted in state {:?}",
                    trigger, self.state
                ));
                return Err(FsmError::NotPermitted {
                    state: format!("{:?}", self.state),
                    trigger: format!("{:?}", trigger),
                });
            }
        };

        let transition = Transition {
            source: self.state,
            destination,
            trigger,
        };

        // Exit только leaf: родительская ветка остаётся активной
        if let Some(rep) = self.states.get(&transition.source) {
            for hook in &rep.on_exit {
                hook(context, &transition);
            }
        }

        self.state = destination;

        if let Some(rep) = self.states.get(&destination) {
            for hook in &rep.on_entry {
                hook(context, &transition);
            }
        }

        for hook in &self.on_transitioned {
            hook(context, &transition);
        }

        Ok(FireOutcome::Transitioned(transition))
    }
}
