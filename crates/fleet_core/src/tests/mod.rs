use super::*;
use crate::test_fixtures::{base_content, environment_with, make_rng};

mod concurrency;
mod maintenance;
mod repair;

// --- Shared test helpers ------------------------------------------------

fn lifespans(env: &Environment, index: usize) -> Vec<u32> {
    env.machines()[index]
        .components()
        .iter()
        .map(|c| c.lifespan)
        .collect()
}

fn component_id(machine: u32, kind: ComponentKind) -> ComponentId {
    ComponentId::for_machine(MachineId(machine), kind)
}

/// Invariants that must hold after every public operation.
fn assert_invariants(env: &Environment) {
    for machine in env.machines() {
        for c in machine.components() {
            assert_eq!(
                c.is_failed(),
                c.fault().is_some(),
                "{}: failed state and fault disagree",
                c.id
            );
        }
        let all_up = machine.components().iter().all(|c| !c.is_failed());
        assert_eq!(
            machine.is_operational(),
            all_up,
            "machine {} flag out of sync with components",
            machine.id
        );
    }
}
