use super::*;

#[test]
fn test_repair_restores_down_machine() {
    let content = base_content();
    let mut env = environment_with(&[[9, 1, 9, 9, 9]]);
    let mut rng = make_rng();
    env.tick(&content, &mut rng);

    let outcome = env.repair_machine(0, &content, &mut rng).unwrap();

    assert_eq!(
        outcome,
        RepairOutcome::Repaired {
            machine_id: MachineId(0),
            components: vec![component_id(0, ComponentKind::Cpu)],
        }
    );
    let machine = &env.machines()[0];
    assert!(machine.is_operational());
    let cpu = machine.component_of_kind(ComponentKind::Cpu).unwrap();
    assert!(!cpu.is_failed());
    assert!((5..=15).contains(&cpu.lifespan));
    // History is a log, not current state.
    assert_eq!(env.failure_history().len(), 1);
}

#[test]
fn test_repair_out_of_range_is_not_found() {
    let content = base_content();
    let mut env = environment_with(&[[9; 5]]);
    let mut rng = make_rng();

    let err = env.repair_machine(1, &content, &mut rng).unwrap_err();
    assert_eq!(err, FleetError::MachineNotFound(1));
}

#[test]
fn test_repair_on_operational_machine_is_noop() {
    let content = base_content();
    let mut env = environment_with(&[[5, 6, 7, 8, 9]]);
    let mut rng = make_rng();

    let outcome = env.repair_machine(0, &content, &mut rng).unwrap();

    assert_eq!(
        outcome,
        RepairOutcome::AlreadyOperational {
            machine_id: MachineId(0)
        }
    );
    assert_eq!(lifespans(&env, 0), vec![5, 6, 7, 8, 9]);
}

#[test]
fn test_repaired_machine_resumes_degrading() {
    let content = base_content();
    let mut env = environment_with(&[[1, 9, 9, 9, 9]]);
    let mut rng = make_rng();
    env.tick(&content, &mut rng);
    env.repair_machine(0, &content, &mut rng).unwrap();
    let before = lifespans(&env, 0);

    env.tick(&content, &mut rng);

    let after = lifespans(&env, 0);
    for (b, a) in before.iter().zip(&after) {
        assert_eq!(*a, b - 1);
    }
}

#[test]
fn test_spawn_machine_assigns_sequential_ids() {
    let content = base_content();
    let mut env = Environment::new(1, "test");
    let mut rng = make_rng();

    let ids: Vec<_> = (0..3).map(|_| env.spawn_machine(&content, &mut rng)).collect();

    assert_eq!(ids, vec![MachineId(0), MachineId(1), MachineId(2)]);
    assert_eq!(env.machines().len(), 3);
    assert!(env.machines().iter().all(Machine::is_operational));
}

#[test]
fn test_add_machine_advances_id_counter() {
    let content = base_content();
    let mut env = Environment::new(1, "test");
    let mut rng = make_rng();

    env.add_machine(Machine::with_lifespans(MachineId(4), [9; 5]));
    let next = env.spawn_machine(&content, &mut rng);

    assert_eq!(next, MachineId(5));
}

#[test]
fn test_add_machine_with_max_id_saturates_counter() {
    let mut env = Environment::new(1, "test");

    env.add_machine(Machine::with_lifespans(MachineId(u32::MAX), [9; 5]));

    assert_eq!(env.counters.next_machine_id, u32::MAX);
    assert_eq!(env.machines().len(), 1);
}
