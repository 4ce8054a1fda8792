//! Type definitions for `fleet_core`.
//!
//! Public structs, enums, and ID newtypes shared by the simulation.

use serde::{Deserialize, Serialize};

use crate::catalog::FaultCatalog;

// ---------------------------------------------------------------------------
// ID newtypes
// ---------------------------------------------------------------------------

macro_rules! string_id {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub String);

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(ComponentId);
string_id!(EventId);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MachineId(pub u32);

impl std::fmt::Display for MachineId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl ComponentId {
    /// Composite key: unique across the whole environment.
    pub fn for_machine(machine_id: MachineId, kind: ComponentKind) -> Self {
        Self(format!("{machine_id}-{}", kind.id_suffix()))
    }
}

// ---------------------------------------------------------------------------
// Core enums
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ComponentKind {
    Motherboard,
    Cpu,
    Ram,
    Storage,
    PowerSupply,
}

impl ComponentKind {
    /// Fixed processing order for every machine.
    pub const ALL: [ComponentKind; 5] = [
        ComponentKind::Motherboard,
        ComponentKind::Cpu,
        ComponentKind::Ram,
        ComponentKind::Storage,
        ComponentKind::PowerSupply,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ComponentKind::Motherboard => "Motherboard",
            ComponentKind::Cpu => "CPU",
            ComponentKind::Ram => "RAM",
            ComponentKind::Storage => "Storage",
            ComponentKind::PowerSupply => "Power Supply",
        }
    }

    pub fn id_suffix(self) -> &'static str {
        match self {
            ComponentKind::Motherboard => "board",
            ComponentKind::Cpu => "cpu",
            ComponentKind::Ram => "ram",
            ComponentKind::Storage => "storage",
            ComponentKind::PowerSupply => "psu",
        }
    }
}

impl std::fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A component is either running or broken with the fault that broke it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state")]
pub enum ComponentState {
    Operational,
    Failed { fault: Fault },
}

impl ComponentState {
    pub fn is_failed(&self) -> bool {
        matches!(self, ComponentState::Failed { .. })
    }

    pub fn fault(&self) -> Option<&Fault> {
        match self {
            ComponentState::Operational => None,
            ComponentState::Failed { fault } => Some(fault),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fault {
    pub name: String,
    pub cost: u32,
    pub remedy: String,
}

// ---------------------------------------------------------------------------
// State types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetaState {
    /// Completed cycles.
    pub tick: u64,
    pub seed: u64,
    pub content_version: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Counters {
    pub next_event_id: u64,
    pub next_machine_id: u32,
}

/// One entry of the global failure log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureRecord {
    pub tick: u64,
    pub machine_id: MachineId,
    pub component_id: ComponentId,
    pub component_kind: ComponentKind,
    pub fault: Fault,
}

// ---------------------------------------------------------------------------
// Read-only projections
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineStatus {
    pub id: MachineId,
    pub operational: bool,
    pub components: Vec<ComponentStatus>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentStatus {
    pub id: ComponentId,
    pub kind: ComponentKind,
    pub name: String,
    pub lifespan: u32,
    pub failed: bool,
    pub fault: Option<Fault>,
    pub maintenance_due: bool,
}

// ---------------------------------------------------------------------------
// Operation results
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RepairOutcome {
    /// Machine was already running; nothing was touched.
    AlreadyOperational { machine_id: MachineId },
    Repaired {
        machine_id: MachineId,
        components: Vec<ComponentId>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceReport {
    pub machine_id: MachineId,
    pub component_id: ComponentId,
    pub lifespan_before: u32,
    pub lifespan_after: u32,
}

// ---------------------------------------------------------------------------
// Event types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnvelope {
    pub id: EventId,
    pub tick: u64,
    pub event: Event,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    ComponentFailed {
        machine_id: MachineId,
        component_id: ComponentId,
        kind: ComponentKind,
        fault: Fault,
    },
    MaintenanceDue {
        machine_id: MachineId,
        component_id: ComponentId,
        kind: ComponentKind,
        lifespan: u32,
    },
}

// ---------------------------------------------------------------------------
// Content types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FleetContent {
    pub content_version: String,
    pub fault_catalog: FaultCatalog,
    pub constants: Constants,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Constants {
    pub initial_lifespan_min: u32,
    pub initial_lifespan_max: u32,
    pub repair_lifespan_min: u32,
    pub repair_lifespan_max: u32,
    pub preventive_boost_min: u32,
    pub preventive_boost_max: u32,
    /// Exact lifespan at which `maintenance_due` is raised.
    pub maintenance_warning_lifespan: u32,
    pub initial_machine_count: u32,
}

impl Default for Constants {
    fn default() -> Self {
        Self {
            initial_lifespan_min: 5,
            initial_lifespan_max: 10,
            repair_lifespan_min: 5,
            repair_lifespan_max: 15,
            preventive_boost_min: 10,
            preventive_boost_max: 20,
            maintenance_warning_lifespan: 3,
            initial_machine_count: 3,
        }
    }
}
