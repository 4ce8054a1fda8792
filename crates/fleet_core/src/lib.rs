//! `fleet_core` — component wear, failure, and repair for a fleet of machines.
//!
//! No IO, no network. All randomness via the passed-in Rng.

mod catalog;
mod component;
mod environment;
mod error;
mod machine;
mod types;

#[cfg(any(test, feature = "test-support"))]
pub mod test_fixtures;

pub use catalog::{CatalogEntries, FaultCatalog};
pub use component::{Component, Degradation};
pub use environment::{Environment, TickReport};
pub use error::{FleetError, Result};
pub use machine::{CheckOutcome, ComponentFailure, Machine, MaintenanceWarning};
pub use types::*;

pub(crate) fn emit(counters: &mut Counters, tick: u64, event: Event) -> EventEnvelope {
    let id = EventId(format!("evt_{:06}", counters.next_event_id));
    counters.next_event_id += 1;
    EventEnvelope { id, tick, event }
}

#[cfg(test)]
mod tests;
