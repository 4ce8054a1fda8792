//! Content loading and fleet setup shared between fleet_cli and fleet_daemon.

use anyhow::{Context, Result};
use fleet_core::{Constants, Environment, FaultCatalog, FleetContent};
use rand::Rng;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

#[derive(Deserialize)]
struct FaultCatalogFile {
    content_version: String,
    faults: FaultCatalog,
}

/// Validates loaded content, panicking on any authoring error.
///
/// Catches mistakes like: an inverted lifespan range, a zero-cost fault, or
/// two faults with the same name under one kind.
pub fn validate_content(content: &FleetContent) {
    let c = &content.constants;
    for (label, min, max) in [
        ("initial_lifespan", c.initial_lifespan_min, c.initial_lifespan_max),
        ("repair_lifespan", c.repair_lifespan_min, c.repair_lifespan_max),
        ("preventive_boost", c.preventive_boost_min, c.preventive_boost_max),
    ] {
        assert!(min <= max, "{label} range is inverted: {min} > {max}");
    }
    assert!(
        c.initial_lifespan_min > 0 && c.repair_lifespan_min > 0,
        "lifespan ranges must start above zero"
    );

    for (kind, faults) in content.fault_catalog.iter() {
        let mut names = HashSet::new();
        for fault in faults {
            assert!(!fault.name.is_empty(), "{kind} has a fault with an empty name");
            assert!(
                fault.cost > 0,
                "{kind} fault '{}' has non-positive cost",
                fault.name
            );
            assert!(
                names.insert(fault.name.as_str()),
                "{kind} fault '{}' is listed twice",
                fault.name
            );
        }
    }
}

pub fn load_content(content_dir: &str) -> Result<FleetContent> {
    let dir = Path::new(content_dir);
    let constants: Constants = serde_json::from_str(
        &std::fs::read_to_string(dir.join("constants.json")).context("reading constants.json")?,
    )
    .context("parsing constants.json")?;
    let catalog_file: FaultCatalogFile = serde_json::from_str(
        &std::fs::read_to_string(dir.join("fault_catalog.json"))
            .context("reading fault_catalog.json")?,
    )
    .context("parsing fault_catalog.json")?;
    let content = FleetContent {
        content_version: catalog_file.content_version,
        fault_catalog: catalog_file.faults,
        constants,
    };
    validate_content(&content);
    Ok(content)
}

/// Fresh environment with `initial_machine_count` machines, ids `0..n`.
pub fn build_initial_environment(
    content: &FleetContent,
    seed: u64,
    rng: &mut impl Rng,
) -> Environment {
    let mut environment = Environment::new(seed, content.content_version.clone());
    for _ in 0..content.constants.initial_machine_count {
        environment.spawn_machine(content, rng);
    }
    environment
}
