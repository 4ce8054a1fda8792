//! Shared test fixtures for fleet_core and downstream crates.

use crate::{Constants, Environment, FaultCatalog, FleetContent, Machine, MachineId};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Reference catalog and reference constants.
pub fn base_content() -> FleetContent {
    FleetContent {
        content_version: "test".to_string(),
        fault_catalog: FaultCatalog::reference(),
        constants: Constants::default(),
    }
}

/// Environment with one machine per lifespan row, ids assigned in order.
pub fn environment_with(lifespans: &[[u32; 5]]) -> Environment {
    let mut env = Environment::new(42, "test");
    for (idx, row) in lifespans.iter().enumerate() {
        let id = MachineId(u32::try_from(idx).unwrap_or(u32::MAX));
        env.add_machine(Machine::with_lifespans(id, *row));
    }
    env
}

/// Deterministic RNG seeded with 42.
pub fn make_rng() -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(42)
}
