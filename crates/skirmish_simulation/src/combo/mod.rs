//! Player combo module
//!
//! - `resolver`: tier combo (Single/Area stance, fast/heavy)
//! - `aerial`: отдельный resolver на airborne период
//! - `systems`: PlayerCombo component + event plumbing

use bevy::prelude::*;

use crate::SimulationSet;

pub mod aerial;
pub mod events;
pub mod resolver;
pub mod systems;

#[cfg(test)]
mod resolver_tests;

// Re-export основных типов
pub use aerial::AerialComboResolver;
pub use events::{
    AirborneChange, AirborneEvent, AttackAnimationComplete, AttackInput, AttackResolved, ComboReset, ComboResetReason,
};
pub use resolver::{attack_id, AttackId, AttackKind, ComboResolver, ComboStep, Stance};
pub use systems::PlayerCombo;

/// Combo Plugin
///
/// Порядок (SimulationSet::Combo):
/// 1. apply_airborne_events: take-off/land/air-dash до inputs того же тика
/// 2. resolve_attack_inputs
/// 3. apply_animation_complete
/// 4. expire_combo_windows
pub struct ComboPlugin;

impl Plugin for ComboPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<AttackInput>()
            .add_event::<AirborneEvent>()
            .add_event::<AttackAnimationComplete>()
            .add_event::<AttackResolved>()
            .add_event::<ComboReset>()
            .add_systems(
                FixedUpdate,
                (
                    systems::apply_airborne_events,
                    systems::resolve_attack_inputs,
                    systems::apply_animation_complete,
                    systems::expire_combo_windows,
                )
                    .chain()
                    .in_set(SimulationSet::Combo),
            );
    }
}
