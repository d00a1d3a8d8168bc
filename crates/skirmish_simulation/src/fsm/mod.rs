//! Hierarchical state machine engine
//!
//! Generic по state/trigger tag (`Tag`) и контексту владельца `C`.
//! Ничего не знает про Bevy — enemy brain держит машину внутри Component.

pub mod error;
pub mod machine;
pub mod registry;

// Tests (separate files with _tests suffix)
#[cfg(test)]
mod machine_tests;

pub use error::FsmError;
pub use machine::{
    FireOutcome, Hook, Resolution, StateConfig, StateMachine, StateMachineBuilder, Tag, Transition,
};
pub use registry::TriggerRegistry;
