use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use fleet_core::{Environment, Event, FleetContent};
use fleet_world::{build_initial_environment, load_content};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// ---------------------------------------------------------------------------
// CLI definition
// ---------------------------------------------------------------------------

#[derive(Parser)]
#[command(name = "fleet_cli", about = "Fleet degradation simulation CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the simulation for a fixed number of cycles.
    Run {
        #[arg(long)]
        ticks: u64,
        /// RNG seed. Random when omitted.
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long, default_value = "./content")]
        content_dir: String,
        #[arg(long, default_value_t = 10)]
        print_every: u64,
        /// Repair every machine that is down at the end of each cycle.
        #[arg(long)]
        auto_repair: bool,
        /// Print the final status and history as JSON instead of text.
        #[arg(long)]
        json: bool,
    },
}

// ---------------------------------------------------------------------------
// Run loop
// ---------------------------------------------------------------------------

struct RunOptions {
    ticks: u64,
    print_every: u64,
    auto_repair: bool,
}

/// Advance `env` by `opts.ticks` cycles, printing progress. Returns the number
/// of corrective repairs made.
fn simulate(
    env: &mut Environment,
    content: &FleetContent,
    rng: &mut impl Rng,
    opts: &RunOptions,
    quiet: bool,
) -> usize {
    let mut repairs = 0;
    for _ in 0..opts.ticks {
        let report = env.tick(content, rng);

        // Print failures regardless of print_every.
        for envelope in &report.events {
            if let Event::ComponentFailed {
                machine_id,
                component_id,
                fault,
                ..
            } = &envelope.event
            {
                if !quiet {
                    println!(
                        "*** FAILURE: machine {machine_id} component {component_id} \
                         '{}' cost={} at cycle={:04} ***",
                        fault.name, fault.cost, envelope.tick
                    );
                }
            }
        }
        for (machine_id, err) in &report.errors {
            eprintln!("machine {machine_id} skipped: {err}");
        }

        if opts.auto_repair {
            for index in 0..env.machines().len() {
                if let Ok(fleet_core::RepairOutcome::Repaired { .. }) =
                    env.repair_machine(index, content, rng)
                {
                    repairs += 1;
                }
            }
        }

        if !quiet && opts.print_every > 0 && env.meta.tick % opts.print_every == 0 {
            print_status(env);
        }
    }
    repairs
}

fn run(
    opts: &RunOptions,
    seed: Option<u64>,
    content_dir: &str,
    json: bool,
) -> Result<()> {
    let content = load_content(content_dir)?;
    let resolved_seed = seed.unwrap_or_else(rand::random);
    let mut rng = ChaCha8Rng::seed_from_u64(resolved_seed);
    let mut env = build_initial_environment(&content, resolved_seed, &mut rng);

    if !json {
        println!(
            "Starting simulation: ticks={} seed={resolved_seed} machines={} content_version={}",
            opts.ticks,
            env.machines().len(),
            content.content_version,
        );
        println!("{}", "-".repeat(80));
    }

    let repairs = simulate(&mut env, &content, &mut rng, opts, json);

    if json {
        let out = serde_json::json!({
            "tick": env.meta.tick,
            "seed": env.meta.seed,
            "status": env.snapshot(),
            "history": env.failure_history(),
            "total_cost": env.total_repair_cost(),
            "repairs": repairs,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&out).context("serializing final state")?
        );
        return Ok(());
    }

    println!("{}", "-".repeat(80));
    println!("Done. Final state at cycle {}:", env.meta.tick);
    print_status(&env);
    println!(
        "failures={} repairs={repairs} total_cost={}",
        env.failure_history().len(),
        env.total_repair_cost()
    );
    Ok(())
}

fn status_line(env: &Environment) -> String {
    let machines: Vec<String> = env
        .machines()
        .iter()
        .map(|m| {
            let lifespans: Vec<String> = m
                .components()
                .iter()
                .map(|c| {
                    if c.is_failed() {
                        "X".to_string()
                    } else if c.maintenance_due {
                        format!("{}!", c.lifespan)
                    } else {
                        c.lifespan.to_string()
                    }
                })
                .collect();
            let flag = if m.is_operational() { "up" } else { "DOWN" };
            format!("#{} {flag} [{}]", m.id, lifespans.join(" "))
        })
        .collect();
    format!(
        "[cycle={:04}]  failures={:3}  {}",
        env.meta.tick,
        env.failure_history().len(),
        machines.join("  ")
    )
}

fn print_status(env: &Environment) {
    println!("{}", status_line(env));
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Run {
            ticks,
            seed,
            content_dir,
            print_every,
            auto_repair,
            json,
        } => {
            let opts = RunOptions {
                ticks,
                print_every,
                auto_repair,
            };
            run(&opts, seed, &content_dir, json)?;
        }
    }
    Ok(())
}
