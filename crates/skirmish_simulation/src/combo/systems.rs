//! Combo systems: airborne → inputs → animation feedback → reset windows.

use bevy::prelude::*;

use super::aerial::AerialComboResolver;
use super::events::{
    AirborneChange, AirborneEvent, AttackAnimationComplete, AttackInput, AttackResolved, ComboReset, ComboResetReason,
};
use super::resolver::{AttackKind, ComboResolver};
use crate::config::SimulationConfig;

/// Компонент: combo state игрока (наземный + aerial resolver)
#[derive(Component, Debug, Clone, Default)]
pub struct PlayerCombo {
    pub ground: ComboResolver,
    pub aerial: AerialComboResolver,
}

impl PlayerCombo {
    pub fn from_config(config: &SimulationConfig) -> Self {
        Self {
            ground: ComboResolver::new(&config.combo),
            aerial: AerialComboResolver::new(&config.aerial),
        }
    }
}

/// Система: take-off / land / air-dash
pub fn apply_airborne_events(mut events: EventReader<AirborneEvent>, mut combos: Query<&mut PlayerCombo>) {
    for event in events.read() {
        let Ok(mut combo) = combos.get_mut(event.entity) else {
            continue;
        };

        match event.change {
            AirborneChange::TakeOff => combo.aerial.take_off(),
            AirborneChange::Land => combo.aerial.land(),
            AirborneChange::AirDash => {
                if combo.aerial.air_dash() {
                    crate::logger::log(&format!("💨 {:?} air-dash refunded aerial attacks", event.entity));
                }
            }
        }
    }
}

/// Система: AttackInput → AttackResolved (в воздухе — aerial resolver)
pub fn resolve_attack_inputs(
    time: Res<Time>,
    mut inputs: EventReader<AttackInput>,
    mut combos: Query<&mut PlayerCombo>,
    mut resolved: EventWriter<AttackResolved>,
    mut resets: EventWriter<ComboReset>,
) {
    let now = time.elapsed_secs();

    for input in inputs.read() {
        let Ok(mut combo) = combos.get_mut(input.entity) else {
            crate::logger::log_warning(&format!("Combo: input for {:?} without PlayerCombo", input.entity));
            continue;
        };

        if combo.aerial.is_airborne() {
            let attack = match input.kind {
                AttackKind::Fast => combo.aerial.request_fast_attack(),
                AttackKind::Heavy => combo.aerial.request_plunge(),
            };

            match attack {
                Some(attack) => {
                    resolved.write(AttackResolved {
                        entity: input.entity,
                        attack,
                        tier: None,
                        finisher: false,
                    });
                }
                None => crate::logger::log(&format!("Combo: {:?} aerial {:?} exhausted", input.entity, input.kind)),
            }
            continue;
        }

        let step = combo.ground.request(input.kind, input.stance, now);
        crate::logger::log(&format!(
            "🗡️ {:?}: {} (tier {}, {:?})",
            input.entity, step.attack, step.tier, step.stance
        ));

        resolved.write(AttackResolved {
            entity: input.entity,
            attack: step.attack,
            tier: Some(step.tier),
            finisher: step.finisher,
        });

        if step.finisher {
            resets.write(ComboReset {
                entity: input.entity,
                reason: ComboResetReason::Finisher,
            });
        }
    }
}

/// Система: клип доигран → окно считаем от конца анимации
pub fn apply_animation_complete(
    time: Res<Time>,
    mut events: EventReader<AttackAnimationComplete>,
    mut combos: Query<&mut PlayerCombo>,
) {
    let now = time.elapsed_secs();

    for event in events.read() {
        if let Ok(mut combo) = combos.get_mut(event.entity) {
            combo.ground.notify_animation_complete(now);
        }
    }
}

/// Система: reset по неактивности
pub fn expire_combo_windows(
    time: Res<Time>,
    mut combos: Query<(Entity, &mut PlayerCombo)>,
    mut resets: EventWriter<ComboReset>,
) {
    let now = time.elapsed_secs();

    for (entity, mut combo) in combos.iter_mut() {
        if combo.ground.poll(now) {
            resets.write(ComboReset {
                entity,
                reason: ComboResetReason::Timeout,
            });
        }
    }
}
