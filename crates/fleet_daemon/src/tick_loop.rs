use crate::state::{EventTx, SharedSim};
use fleet_core::{Event, TickReport};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

/// Drive `Environment::tick` every `tick_interval` until shutdown is
/// signalled or `max_ticks` is reached. A zero interval runs as fast as
/// possible. While `paused` is set the loop keeps waking but does not tick.
pub async fn run_tick_loop(
    sim: SharedSim,
    event_tx: EventTx,
    tick_interval: Duration,
    max_ticks: Option<u64>,
    paused: Arc<AtomicBool>,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut interval = if tick_interval.is_zero() {
        None
    } else {
        let mut iv = tokio::time::interval(tick_interval);
        iv.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Some(iv)
    };

    loop {
        if let Some(ref mut iv) = interval {
            tokio::select! {
                _ = iv.tick() => {}
                _ = shutdown.changed() => break,
            }
        } else {
            tokio::task::yield_now().await;
        }
        if *shutdown.borrow() {
            break;
        }
        if paused.load(Ordering::Relaxed) {
            continue;
        }

        let (report, tick) = {
            let mut guard = sim.lock();
            let report = guard.tick();
            (report, guard.environment.meta.tick)
        };

        log_report(tick, &report);
        let _ = event_tx.send(report.events);

        if max_ticks.is_some_and(|max| tick >= max) {
            break;
        }
    }
    tracing::info!("tick loop stopped");
}

fn log_report(tick: u64, report: &TickReport) {
    tracing::info!(cycle = tick, failures = report.failures(), "cycle complete");
    for envelope in &report.events {
        match &envelope.event {
            Event::ComponentFailed {
                machine_id,
                component_id,
                fault,
                ..
            } => tracing::warn!(
                machine = %machine_id,
                component = %component_id,
                fault = %fault.name,
                cost = fault.cost,
                "component failed"
            ),
            Event::MaintenanceDue {
                component_id,
                lifespan,
                ..
            } => tracing::info!(component = %component_id, lifespan, "maintenance due"),
        }
    }
    for (machine_id, err) in &report.errors {
        tracing::error!(machine = %machine_id, "machine skipped this cycle: {err}");
    }
}
