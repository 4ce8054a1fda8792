use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{FleetError, Result};
use crate::machine::{CheckOutcome, Machine};
use crate::{
    ComponentId, Counters, Event, EventEnvelope, FailureRecord, FleetContent, MachineId,
    MachineStatus, MetaState, RepairOutcome, ServiceReport,
};

/// The whole fleet plus its failure log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Environment {
    pub meta: MetaState,
    machines: Vec<Machine>,
    history: Vec<FailureRecord>,
    pub counters: Counters,
}

/// Everything one tick produced.
///
/// A machine that errors mid-pass lands in `errors`; the rest of the fleet
/// is still processed.
#[derive(Debug, Default)]
pub struct TickReport {
    pub events: Vec<EventEnvelope>,
    pub errors: Vec<(MachineId, FleetError)>,
}

impl TickReport {
    pub fn failures(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e.event, Event::ComponentFailed { .. }))
            .count()
    }
}

impl Environment {
    pub fn new(seed: u64, content_version: impl Into<String>) -> Self {
        Self {
            meta: MetaState {
                tick: 0,
                seed,
                content_version: content_version.into(),
            },
            machines: Vec::new(),
            history: Vec::new(),
            counters: Counters::default(),
        }
    }

    pub fn machines(&self) -> &[Machine] {
        &self.machines
    }

    pub fn machine(&self, index: usize) -> Option<&Machine> {
        self.machines.get(index)
    }

    pub fn add_machine(&mut self, machine: Machine) {
        self.counters.next_machine_id = self
            .counters
            .next_machine_id
            .max(machine.id.0.saturating_add(1));
        self.machines.push(machine);
    }

    /// Build a machine with the next sequential id and append it.
    pub fn spawn_machine(&mut self, content: &FleetContent, rng: &mut impl Rng) -> MachineId {
        let id = MachineId(self.counters.next_machine_id);
        self.add_machine(Machine::new(id, &content.constants, rng));
        id
    }

    /// Advance the simulation by one cycle.
    ///
    /// Each operational machine degrades in kind order until its first
    /// failure. Every failure transition appends one history record carrying
    /// the fault stored on the component. Machines already down are skipped.
    pub fn tick(&mut self, content: &FleetContent, rng: &mut impl Rng) -> TickReport {
        let current_tick = self.meta.tick;
        let mut report = TickReport::default();

        for machine in &mut self.machines {
            if !machine.is_operational() {
                continue;
            }
            let CheckOutcome {
                failure,
                warnings,
                error,
            } = machine.check_components(&content.fault_catalog, &content.constants, rng);
            for warning in warnings {
                report.events.push(crate::emit(
                    &mut self.counters,
                    current_tick,
                    Event::MaintenanceDue {
                        machine_id: machine.id,
                        component_id: warning.component_id,
                        kind: warning.kind,
                        lifespan: warning.lifespan,
                    },
                ));
            }
            if let Some(err) = error {
                report.errors.push((machine.id, err));
            }
            if let Some(failure) = failure {
                self.history.push(FailureRecord {
                    tick: current_tick,
                    machine_id: machine.id,
                    component_id: failure.component_id.clone(),
                    component_kind: failure.kind,
                    fault: failure.fault.clone(),
                });
                report.events.push(crate::emit(
                    &mut self.counters,
                    current_tick,
                    Event::ComponentFailed {
                        machine_id: machine.id,
                        component_id: failure.component_id,
                        kind: failure.kind,
                        fault: failure.fault,
                    },
                ));
            }
        }

        self.meta.tick += 1;
        report
    }

    /// Corrective repair of the machine at `index`. Only a machine that is
    /// down gets touched.
    pub fn repair_machine(
        &mut self,
        index: usize,
        content: &FleetContent,
        rng: &mut impl Rng,
    ) -> Result<RepairOutcome> {
        let machine = self
            .machines
            .get_mut(index)
            .ok_or(FleetError::MachineNotFound(index))?;
        if machine.is_operational() {
            return Ok(RepairOutcome::AlreadyOperational {
                machine_id: machine.id,
            });
        }
        let components = machine.repair_all(&content.constants, rng);
        Ok(RepairOutcome::Repaired {
            machine_id: machine.id,
            components,
        })
    }

    /// Extend a component's lifespan by a random boost and clear its warning.
    ///
    /// The owning machine's flag is recomputed, so servicing the only failed
    /// component of a machine brings the machine back up.
    pub fn preventive_maintenance(
        &mut self,
        component_id: &ComponentId,
        content: &FleetContent,
        rng: &mut impl Rng,
    ) -> Result<ServiceReport> {
        let machine = self
            .machines
            .iter_mut()
            .find(|m| m.component(component_id).is_some())
            .ok_or_else(|| FleetError::ComponentNotFound(component_id.clone()))?;

        let c = &content.constants;
        let boost = rng.gen_range(c.preventive_boost_min..=c.preventive_boost_max);
        let machine_id = machine.id;
        let component = machine
            .component_mut(component_id)
            .ok_or_else(|| FleetError::ComponentNotFound(component_id.clone()))?;
        let lifespan_before = component.lifespan;
        component.service(boost);
        let lifespan_after = component.lifespan;
        machine.refresh_operational();

        Ok(ServiceReport {
            machine_id,
            component_id: component_id.clone(),
            lifespan_before,
            lifespan_after,
        })
    }

    pub fn snapshot(&self) -> Vec<MachineStatus> {
        self.machines.iter().map(Machine::status).collect()
    }

    /// Failure log, oldest first.
    pub fn failure_history(&self) -> &[FailureRecord] {
        &self.history
    }

    pub fn total_repair_cost(&self) -> u64 {
        self.history.iter().map(|r| u64::from(r.fault.cost)).sum()
    }
}
