mod routes;
mod state;
mod tick_loop;

use anyhow::{Context, Result};
use clap::Parser;
use fleet_world::{build_initial_environment, load_content};
use parking_lot::Mutex;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use state::{AppState, SimState};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, watch};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "fleet_daemon", about = "Fleet degradation simulation daemon")]
struct Cli {
    #[arg(long, default_value = "./content")]
    content_dir: String,
    /// RNG seed. Random when omitted.
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long, default_value_t = 3001)]
    port: u16,
    /// Seconds between cycles. 0 runs as fast as possible.
    #[arg(long, default_value_t = 10.0)]
    tick_interval_secs: f64,
    /// Stop ticking after this many cycles.
    #[arg(long)]
    max_ticks: Option<u64>,
    #[arg(long, default_value = "http://localhost:5173")]
    cors_origin: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();
    let content = load_content(&cli.content_dir)?;
    let seed = cli.seed.unwrap_or_else(rand::random);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let environment = build_initial_environment(&content, seed, &mut rng);
    let tick_interval = Duration::try_from_secs_f64(cli.tick_interval_secs)
        .context("--tick-interval-secs must be a non-negative number")?;

    tracing::info!(
        seed,
        machines = environment.machines().len(),
        content_version = %content.content_version,
        "fleet initialised"
    );

    let sim = Arc::new(Mutex::new(SimState {
        environment,
        content,
        rng,
    }));
    let (event_tx, _) = broadcast::channel(256);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let paused = Arc::new(AtomicBool::new(false));

    let app_state = AppState {
        sim: sim.clone(),
        event_tx: event_tx.clone(),
        paused: paused.clone(),
        tick_interval,
    };

    let tick_handle = tokio::spawn(tick_loop::run_tick_loop(
        sim,
        event_tx,
        tick_interval,
        cli.max_ticks,
        paused,
        shutdown_rx,
    ));

    let app = routes::make_router_with_cors(app_state, &cli.cors_origin);
    let addr = format!("0.0.0.0:{}", cli.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    tracing::info!("listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutdown requested");
        })
        .await
        .context("serving http")?;

    let _ = shutdown_tx.send(true);
    tick_handle.await.context("joining tick loop")?;
    Ok(())
}
