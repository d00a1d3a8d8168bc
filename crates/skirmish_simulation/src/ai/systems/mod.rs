//! AI systems.

pub mod brain;
pub mod lifecycle;

pub use brain::*;
pub use lifecycle::*;
