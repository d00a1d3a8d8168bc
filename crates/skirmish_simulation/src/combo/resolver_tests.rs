//! Tests for ComboResolver (tier progression, stance routing, reset window).

#[cfg(test)]
mod tests {
    use super::super::resolver::*;
    use crate::config::ComboConfig;

    fn resolver() -> ComboResolver {
        ComboResolver::new(&ComboConfig { reset_timeout: 1.0 })
    }

    #[test]
    fn test_attack_id_table() {
        use AttackKind::{Fast, Heavy};
        use Stance::{Area, Single};

        assert_eq!(attack_id(1, 0, Single, Fast), AttackId::SX1);
        assert_eq!(attack_id(1, 1, Single, Fast), AttackId::SX2);
        assert_eq!(attack_id(1, 1, Area, Fast), AttackId::AX2);
        assert_eq!(attack_id(2, 1, Single, Fast), AttackId::SX4);
        assert_eq!(attack_id(2, 1, Area, Fast), AttackId::AX3);
        assert_eq!(attack_id(3, 0, Single, Fast), AttackId::SX5);
        assert_eq!(attack_id(3, 0, Area, Fast), AttackId::AX4);
        assert_eq!(attack_id(1, 0, Area, Heavy), AttackId::AY1);
        assert_eq!(attack_id(2, 0, Single, Heavy), AttackId::SY2);
        assert_eq!(attack_id(3, 0, Area, Heavy), AttackId::AY3);
    }

    #[test]
    fn test_tier_progression_single_stance() {
        let mut combo = resolver();

        assert_eq!(combo.request_fast_attack(Stance::Single, 0.0).attack, AttackId::SX1);
        assert_eq!(combo.request_fast_attack(Stance::Single, 0.3).attack, AttackId::SX2);
        assert_eq!(combo.tier(), 2);
        assert_eq!(combo.request_fast_attack(Stance::Single, 0.6).attack, AttackId::SX3);
        assert_eq!(combo.request_fast_attack(Stance::Single, 0.9).attack, AttackId::SX4);
        assert_eq!(combo.tier(), 3);

        let finisher = combo.request_fast_attack(Stance::Single, 1.2);
        assert_eq!(finisher.attack, AttackId::SX5);
        assert!(finisher.finisher);
        assert_eq!(combo.tier(), 1);
        assert_eq!(combo.sub_index(), 0);
        assert!(!combo.is_active());
    }

    #[test]
    fn test_area_tier_two_needs_single_hit() {
        let mut combo = resolver();

        assert_eq!(combo.request_fast_attack(Stance::Area, 0.0).attack, AttackId::AX1);
        assert_eq!(combo.request_fast_attack(Stance::Area, 0.2).attack, AttackId::AX2);
        assert_eq!(combo.request_fast_attack(Stance::Area, 0.4).attack, AttackId::AX3);
        assert_eq!(combo.tier(), 3);
        assert_eq!(combo.request_fast_attack(Stance::Area, 0.6).attack, AttackId::AX4);
        assert_eq!(combo.tier(), 1);
    }

    #[test]
    fn test_heavy_promotes_tier() {
        let mut combo = resolver();

        let step = combo.request_heavy_attack(Stance::Single, 0.0);
        assert_eq!(step.attack, AttackId::SY1);
        assert!(step.heavy_chain);
        assert_eq!(combo.tier(), 2);

        assert_eq!(combo.request_heavy_attack(Stance::Single, 0.2).attack, AttackId::SY2);
        assert_eq!(combo.tier(), 3);

        let finisher = combo.request_heavy_attack(Stance::Single, 0.4);
        assert_eq!(finisher.attack, AttackId::SY3);
        assert!(finisher.finisher);
        assert_eq!(combo.tier(), 1);
        assert!(!combo.heavy_chain());
    }

    #[test]
    fn test_fast_then_heavy_mix() {
        let mut combo = resolver();

        combo.request_fast_attack(Stance::Single, 0.0);
        // Heavy на tier 1 после одного fast — сразу tier 2
        assert_eq!(combo.request_heavy_attack(Stance::Single, 0.2).attack, AttackId::SY1);
        assert_eq!(combo.tier(), 2);
        assert_eq!(combo.sub_index(), 0);
        assert_eq!(combo.request_fast_attack(Stance::Single, 0.4).attack, AttackId::SX3);
    }

    #[test]
    fn test_stance_switch_keeps_tier() {
        let mut combo = resolver();
        combo.request_fast_attack(Stance::Single, 0.0);
        combo.request_fast_attack(Stance::Single, 0.2);
        assert_eq!(combo.tier(), 2);

        let step = combo.request_fast_attack(Stance::Area, 0.4);

        assert_eq!(step.attack, AttackId::AX3);
        assert_eq!(step.tier, 2);
        assert_eq!(combo.tier(), 3);
    }

    #[test]
    fn test_stance_switch_mid_tier_two_restarts_sub_index() {
        let mut combo = resolver();
        combo.request_fast_attack(Stance::Area, 0.0);
        combo.request_fast_attack(Stance::Area, 0.2);
        combo.request_fast_attack(Stance::Single, 0.4); // tier 2, sub 0 → SX3
        assert_eq!(combo.sub_index(), 1);

        // Назад в Area на tier 2 — AX3, не AX1
        assert_eq!(combo.request_fast_attack(Stance::Area, 0.6).attack, AttackId::AX3);
    }

    #[test]
    fn test_stance_switch_at_tier_one_restarts_sequence() {
        let mut combo = resolver();
        combo.request_fast_attack(Stance::Single, 0.0);

        let step = combo.request_fast_attack(Stance::Area, 0.2);

        assert_eq!(step.attack, AttackId::AX1);
        assert_eq!(combo.tier(), 1);
        assert_eq!(combo.sub_index(), 1);
    }

    #[test]
    fn test_reset_on_inactivity() {
        let mut combo = resolver();
        combo.request_fast_attack(Stance::Single, 0.0);
        combo.request_fast_attack(Stance::Single, 0.5);
        assert_eq!(combo.tier(), 2);

        assert!(!combo.poll(1.4));
        assert!(combo.poll(1.6));

        assert_eq!(combo.tier(), 1);
        assert_eq!(combo.sub_index(), 0);
        assert_eq!(combo.last_stance(), None);
        assert!(!combo.poll(5.0));
    }

    #[test]
    fn test_late_request_starts_fresh_combo() {
        let mut combo = resolver();
        combo.request_fast_attack(Stance::Single, 0.0);
        combo.request_fast_attack(Stance::Single, 0.5);

        // poll не вызывался, но окно истекло
        let step = combo.request_fast_attack(Stance::Single, 3.0);

        assert_eq!(step.attack, AttackId::SX1);
        assert_eq!(step.tier, 1);
    }

    #[test]
    fn test_each_request_restarts_window() {
        let mut combo = resolver();
        combo.request_fast_attack(Stance::Single, 0.0);
        combo.request_fast_attack(Stance::Single, 0.9);

        let deadline = combo.reset_deadline().unwrap_or(0.0);
        assert!((deadline - 1.9).abs() < 1e-5);
        assert!(!combo.poll(1.5));
        assert_eq!(combo.tier(), 2);
    }

    #[test]
    fn test_animation_complete_extends_open_window() {
        let mut combo = resolver();
        combo.request_fast_attack(Stance::Single, 0.0);

        combo.notify_animation_complete(0.8);
        let deadline = combo.reset_deadline().unwrap_or(0.0);
        assert!((deadline - 1.8).abs() < 1e-5);
        assert!(!combo.poll(1.5));

        // Без открытого окна — ничего не планирует
        let mut idle = resolver();
        idle.notify_animation_complete(0.8);
        assert_eq!(idle.reset_deadline(), None);
    }
}
