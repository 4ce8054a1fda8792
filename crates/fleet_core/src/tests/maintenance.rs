use super::*;

#[test]
fn test_preventive_unknown_id_fails_without_mutation() {
    let content = base_content();
    let mut env = environment_with(&[[9, 9, 9, 9, 9]]);
    let mut rng = make_rng();
    let before = env.snapshot();

    let err = env
        .preventive_maintenance(&ComponentId("9-ram".to_string()), &content, &mut rng)
        .unwrap_err();

    assert_eq!(
        err,
        FleetError::ComponentNotFound(ComponentId("9-ram".to_string()))
    );
    assert_eq!(env.snapshot(), before);
}

#[test]
fn test_preventive_boosts_lifespan_and_clears_warning() {
    let content = base_content();
    let mut env = environment_with(&[[9, 9, 4, 9, 9]]);
    let mut rng = make_rng();
    env.tick(&content, &mut rng);
    let ram = component_id(0, ComponentKind::Ram);
    assert!(env.machines()[0].component(&ram).unwrap().maintenance_due);

    let report = env
        .preventive_maintenance(&ram, &content, &mut rng)
        .unwrap();

    assert_eq!(report.lifespan_before, 3);
    let boost = report.lifespan_after - report.lifespan_before;
    assert!((10..=20).contains(&boost), "boost {boost}");
    let component = env.machines()[0].component(&ram).unwrap();
    assert_eq!(component.lifespan, report.lifespan_after);
    assert!(!component.maintenance_due);
}

#[test]
fn test_preventive_targets_only_the_named_component() {
    let content = base_content();
    let mut env = environment_with(&[[9; 5], [9; 5]]);
    let mut rng = make_rng();

    env.preventive_maintenance(&component_id(1, ComponentKind::Storage), &content, &mut rng)
        .unwrap();

    assert_eq!(lifespans(&env, 0), vec![9; 5]);
    let after = lifespans(&env, 1);
    assert_eq!(&after[..3], &[9, 9, 9]);
    assert!(after[3] >= 19);
    assert_eq!(after[4], 9);
}

#[test]
fn test_preventive_on_failed_component_brings_machine_back() {
    let content = base_content();
    let mut env = environment_with(&[[9, 9, 9, 1, 9]]);
    let mut rng = make_rng();
    env.tick(&content, &mut rng);
    assert!(!env.machines()[0].is_operational());

    let storage = component_id(0, ComponentKind::Storage);
    let report = env
        .preventive_maintenance(&storage, &content, &mut rng)
        .unwrap();

    assert_eq!(report.lifespan_before, 0);
    assert!(env.machines()[0].is_operational());
    assert!(env.machines()[0].component(&storage).unwrap().fault().is_none());
    assert_invariants(&env);
}
