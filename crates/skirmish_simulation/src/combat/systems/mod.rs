//! Combat systems (attack slot arbitration)

pub mod slots;

// Tests (separate files with _tests suffix)
#[cfg(test)]
mod slots_tests;

// Re-export all systems
pub use slots::*;
