use fleet_core::{
    ComponentId, Environment, EventEnvelope, FleetContent, FleetError, MachineId, RepairOutcome,
    ServiceReport, TickReport,
};
use parking_lot::Mutex;
use rand_chacha::ChaCha8Rng;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;

/// Everything the tick loop and the routes share. Always accessed through
/// `SharedSim`, so every operation holds the lock for its whole duration.
pub struct SimState {
    pub environment: Environment,
    pub content: FleetContent,
    pub rng: ChaCha8Rng,
}

impl SimState {
    pub fn tick(&mut self) -> TickReport {
        let SimState {
            ref mut environment,
            ref content,
            ref mut rng,
        } = *self;
        environment.tick(content, rng)
    }

    pub fn repair_machine(&mut self, index: usize) -> Result<RepairOutcome, FleetError> {
        let SimState {
            ref mut environment,
            ref content,
            ref mut rng,
        } = *self;
        environment.repair_machine(index, content, rng)
    }

    pub fn preventive_maintenance(
        &mut self,
        component_id: &ComponentId,
    ) -> Result<ServiceReport, FleetError> {
        let SimState {
            ref mut environment,
            ref content,
            ref mut rng,
        } = *self;
        environment.preventive_maintenance(component_id, content, rng)
    }

    pub fn add_machine(&mut self) -> MachineId {
        let SimState {
            ref mut environment,
            ref content,
            ref mut rng,
        } = *self;
        environment.spawn_machine(content, rng)
    }
}

pub type SharedSim = Arc<Mutex<SimState>>;
pub type EventTx = broadcast::Sender<Vec<EventEnvelope>>;

#[derive(Clone)]
pub struct AppState {
    pub sim: SharedSim,
    pub event_tx: EventTx,
    pub paused: Arc<AtomicBool>,
    pub tick_interval: Duration,
}
