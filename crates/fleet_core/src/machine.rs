//! A machine: five components, one per kind, in fixed order.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::catalog::FaultCatalog;
use crate::component::{Component, Degradation};
use crate::error::FleetError;
use crate::{ComponentId, ComponentKind, Constants, Fault, MachineId, MachineStatus};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Machine {
    pub id: MachineId,
    components: Vec<Component>,
    /// Cached: false as soon as any component fails.
    operational: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentFailure {
    pub component_id: ComponentId,
    pub kind: ComponentKind,
    pub fault: Fault,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaintenanceWarning {
    pub component_id: ComponentId,
    pub kind: ComponentKind,
    pub lifespan: u32,
}

/// Result of one degradation pass over a machine.
///
/// `error` is set when a component could not be degraded. The pass stops at
/// that component, but wear and warnings from earlier components are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckOutcome {
    pub failure: Option<ComponentFailure>,
    pub warnings: Vec<MaintenanceWarning>,
    pub error: Option<FleetError>,
}

impl Machine {
    /// Build a machine with independently randomized initial lifespans.
    pub fn new(id: MachineId, constants: &Constants, rng: &mut impl Rng) -> Self {
        let lifespans = ComponentKind::ALL.map(|_| {
            rng.gen_range(constants.initial_lifespan_min..=constants.initial_lifespan_max)
        });
        Self::with_lifespans(id, lifespans)
    }

    /// Build a machine with explicit lifespans, in `ComponentKind::ALL` order.
    pub fn with_lifespans(id: MachineId, lifespans: [u32; 5]) -> Self {
        let components = ComponentKind::ALL
            .iter()
            .zip(lifespans)
            .map(|(&kind, lifespan)| {
                Component::new(ComponentId::for_machine(id, kind), kind, lifespan)
            })
            .collect();
        Self {
            id,
            components,
            operational: true,
        }
    }

    pub fn is_operational(&self) -> bool {
        self.operational
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn component(&self, id: &ComponentId) -> Option<&Component> {
        self.components.iter().find(|c| c.id == *id)
    }

    pub fn component_mut(&mut self, id: &ComponentId) -> Option<&mut Component> {
        self.components.iter_mut().find(|c| c.id == *id)
    }

    pub fn component_of_kind(&self, kind: ComponentKind) -> Option<&Component> {
        self.components.iter().find(|c| c.kind == kind)
    }

    /// Degrade components in kind order, stopping at the first failure.
    ///
    /// Components after the failing one are not degraded this pass. A machine
    /// that is already down does not degrade at all.
    pub fn check_components(
        &mut self,
        catalog: &FaultCatalog,
        constants: &Constants,
        rng: &mut impl Rng,
    ) -> CheckOutcome {
        let mut outcome = CheckOutcome::default();
        if !self.operational {
            return outcome;
        }

        for component in &mut self.components {
            let degradation = match component.degrade(catalog, constants, rng) {
                Ok(degradation) => degradation,
                Err(err) => {
                    outcome.error = Some(err);
                    break;
                }
            };
            match degradation {
                Degradation::Failed(fault) => {
                    self.operational = false;
                    outcome.failure = Some(ComponentFailure {
                        component_id: component.id.clone(),
                        kind: component.kind,
                        fault,
                    });
                    break;
                }
                Degradation::MaintenanceDue => outcome.warnings.push(MaintenanceWarning {
                    component_id: component.id.clone(),
                    kind: component.kind,
                    lifespan: component.lifespan,
                }),
                Degradation::Worn | Degradation::Dormant => {}
            }
        }
        outcome
    }

    /// Repair every failed component, then force the machine operational.
    /// Returns the ids of the components that were repaired.
    pub fn repair_all(&mut self, constants: &Constants, rng: &mut impl Rng) -> Vec<ComponentId> {
        let mut repaired = Vec::new();
        for component in &mut self.components {
            if component.is_failed() {
                component.repair(constants, rng);
                repaired.push(component.id.clone());
            }
        }
        self.operational = true;
        repaired
    }

    /// Recompute the cached flag from component states.
    pub fn refresh_operational(&mut self) {
        self.operational = self.components.iter().all(|c| !c.is_failed());
    }

    pub fn status(&self) -> MachineStatus {
        MachineStatus {
            id: self.id,
            operational: self.operational,
            components: self.components.iter().map(Component::status).collect(),
        }
    }
}
