//! Tests for hierarchical state machine.

#[cfg(test)]
mod tests {
    use super::super::{FireOutcome, FsmError, Resolution, StateMachine, StateMachineBuilder, TriggerRegistry};

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum S {
        Patrol,
        Idle,
        Chase,
        Death,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum T {
        SeePlayer,
        LosePlayer,
        Die,
        Poke,
    }

    #[derive(Default)]
    struct Log {
        events: Vec<String>,
    }

    fn machine() -> StateMachine<S, T, Log> {
        let mut builder = StateMachineBuilder::new(S::Idle);

        builder
            .configure(S::Patrol)
            .permit(T::SeePlayer, S::Chase)
            .permit(T::Die, S::Death)
            .on_exit(|log: &mut Log, _| log.events.push("exit Patrol".into()));

        builder
            .configure(S::Idle)
            .substate_of(S::Patrol)
            .on_entry(|log: &mut Log, _| log.events.push("enter Idle".into()))
            .on_exit(|log: &mut Log, _| log.events.push("exit Idle".into()));

        builder
            .configure(S::Chase)
            .permit(T::LosePlayer, S::Idle)
            .permit(T::Die, S::Death)
            .ignore(T::SeePlayer)
            .on_entry(|log: &mut Log, t| {
                log.events.push(format!("enter Chase via {:?}", t.trigger))
            });

        builder.configure(S::Death);

        builder.on_transitioned(|log: &mut Log, t| {
            log.events.push(format!("{:?} -> {:?}", t.source, t.destination))
        });

        builder.build()
    }

    #[test]
    fn test_substate_inherits_parent_transition() {
        let mut fsm = machine();
        let mut log = Log::default();

        // SeePlayer разрешён только на Patrol, Idle — substate
        let outcome = fsm.fire(T::SeePlayer, &mut log).expect("inherited transition");

        assert!(outcome.transitioned());
        assert_eq!(fsm.state(), S::Chase);
    }

    #[test]
    fn test_hook_order_exit_leaf_only() {
        let mut fsm = machine();
        let mut log = Log::default();

        fsm.fire(T::SeePlayer, &mut log).expect("transition");

        // Exit только leaf (Idle), не parent (Patrol)
        assert_eq!(
            log.events,
            vec![
                "exit Idle".to_string(),
                "enter Chase via SeePlayer".to_string(),
                "Idle -> Chase".to_string(),
            ]
        );
    }

    #[test]
    fn test_ignored_trigger_is_noop() {
        let mut fsm = machine();
        let mut log = Log::default();
        fsm.fire(T::SeePlayer, &mut log).expect("to chase");
        log.events.clear();

        let outcome = fsm.fire(T::SeePlayer, &mut log).expect("ignored is not an error");

        assert_eq!(outcome, FireOutcome::Ignored);
        assert_eq!(fsm.state(), S::Chase);
        assert!(log.events.is_empty());
    }

    #[test]
    fn test_not_permitted_reports_error() {
        let mut fsm = machine();
        let mut log = Log::default();

        let result = fsm.fire(T::Poke, &mut log);

        assert!(matches!(result, Err(FsmError::NotPermitted { .. })));
        assert_eq!(fsm.state(), S::Idle);
        assert!(!fsm.can_fire(T::Poke));
    }

    #[test]
    fn test_death_is_terminal() {
        let mut fsm = machine();
        let mut log = Log::default();

        fsm.fire(T::Die, &mut log).expect("inherited Die");
        assert_eq!(fsm.state(), S::Death);

        assert!(fsm.fire(T::SeePlayer, &mut log).is_err());
        assert!(fsm.permitted_triggers().is_empty());
    }

    #[test]
    fn test_can_fire_does_not_mutate() {
        let fsm = machine();

        assert!(fsm.can_fire(T::SeePlayer));
        assert_eq!(fsm.resolve(T::SeePlayer), Resolution::Permitted(S::Chase));
        assert_eq!(fsm.state(), S::Idle);
    }

    #[test]
    fn test_is_in_state_checks_ancestors() {
        let fsm = machine();

        assert!(fsm.is_in_state(S::Idle));
        assert!(fsm.is_in_state(S::Patrol));
        assert!(!fsm.is_in_state(S::Chase));
    }

    #[test]
    fn test_self_parent_is_rejected() {
        let mut builder: StateMachineBuilder<S, T, Log> = StateMachineBuilder::new(S::Idle);
        builder.configure(S::Idle).substate_of(S::Idle);
        let fsm = builder.build();

        assert_eq!(fsm.parent_of(S::Idle), None);
        assert_eq!(fsm.ancestry(S::Idle), vec![S::Idle]);
    }

    #[test]
    fn test_cyclic_parents_do_not_hang() {
        let mut builder: StateMachineBuilder<S, T, Log> = StateMachineBuilder::new(S::Idle);
        builder.configure(S::Idle).substate_of(S::Patrol);
        builder.configure(S::Patrol).substate_of(S::Idle);
        let fsm = builder.build();

        assert_eq!(fsm.resolve(T::Poke), Resolution::NotPermitted);
        assert_eq!(fsm.ancestry(S::Idle).len(), 2);
    }

    #[test]
    fn test_registry_resolves_names() {
        let registry = TriggerRegistry::from_names([("SeePlayer", T::SeePlayer), ("Die", T::Die)]);

        assert_eq!(registry.resolve("SeePlayer"), Ok(T::SeePlayer));
        assert_eq!(
            registry.resolve("Dance"),
            Err(FsmError::UnknownTrigger("Dance".to_string()))
        );
        assert_eq!(registry.len(), 2);
    }
}
