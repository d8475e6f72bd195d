use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use log::info;

use coffee_shop_sim::simulation::{self, SimConfig, SimWorld};

#[derive(Parser)]
#[command(name = "coffee_shop_sim")]
#[command(about = "Coffee shop simulation with optional UI")]
struct Cli {
    /// Run with the Bevy game engine UI
    #[arg(long)]
    ui: bool,

    /// Number of simulation ticks to run in headless mode
    #[arg(long, default_value = "600")]
    ticks: u32,

    /// Time delta per tick in seconds
    #[arg(long, default_value = "0.1")]
    delta: f32,

    /// Seed the random number generator for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// TOML file overriding simulation parameters
    #[arg(long)]
    config: Option<PathBuf>,

    /// JSON list of {"tick": N, "command": {...}} to submit during the run
    #[arg(long)]
    script: Option<PathBuf>,

    /// Print every published snapshot to stdout as a JSON line
    #[arg(long)]
    snapshots: bool,

    /// Skip the per-second shop floor map
    #[arg(long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => SimConfig::load(path)?,
        None => SimConfig::default(),
    };

    if cli.ui {
        #[cfg(feature = "ui")]
        {
            run_with_ui(config, cli.seed);
            return Ok(());
        }
        #[cfg(not(feature = "ui"))]
        {
            anyhow::bail!("UI feature is not enabled. Rebuild with --features ui");
        }
    }

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    run_headless(&cli, config)
}

/// Run the simulation in headless mode (no graphics)
fn run_headless(cli: &Cli, config: SimConfig) -> Result<()> {
    anyhow::ensure!(cli.delta > 0.0, "--delta must be positive");

    let script = match &cli.script {
        Some(path) => simulation::load_script(path)?,
        None => Vec::new(),
    };

    info!("Running coffee shop simulation in headless mode...");
    info!("Ticks: {}, Delta: {}s", cli.ticks, cli.delta);

    // Calculate how many ticks equal 1 second of simulation time
    let ticks_per_second = u64::from(((1.0 / cli.delta).ceil() as u32).max(1));

    let mut world = SimWorld::with_config(config, cli.seed);
    let sender = world.sender();
    let snapshots = cli.snapshots.then(|| world.bridge.subscribe());
    let show_map = !cli.quiet && !cli.snapshots;

    if show_map {
        world.draw_map();
    }

    let mut script = script.into_iter().peekable();
    for tick in 1..=u64::from(cli.ticks) {
        // Scripted commands take the same queue a view would use
        while let Some(entry) = script.next_if(|entry| entry.tick <= tick) {
            sender.send(entry.command);
        }

        world.tick(cli.delta);

        if let Some(rx) = &snapshots {
            for snapshot in rx.try_iter() {
                println!("{}", serde_json::to_string(&*snapshot)?);
            }
        }

        if tick % ticks_per_second == 0 {
            info!(
                "--- After tick {} ({:.1}s simulated time) ---",
                tick,
                world.clock.elapsed()
            );
            world.print_summary();
            if show_map {
                world.draw_map();
            }
        }
    }

    info!("=== SIMULATION COMPLETE ===");
    world.print_summary();
    info!("Customers spawned: {}", world.stats.customers_spawned);
    info!("Customers served: {}", world.stats.customers_served);
    info!("Customers lost: {}", world.stats.customers_lost);
    info!("Drinks brewed: {}", world.stats.drinks_brewed);
    info!("Commands applied: {}", world.bridge.commands_applied());
    info!("Commands rejected: {}", world.bridge.commands_rejected());
    info!("Snapshots published: {}", world.bridge.version());

    world.teardown();
    Ok(())
}

#[cfg(feature = "ui")]
fn run_with_ui(config: SimConfig, seed: Option<u64>) {
    use bevy::log::LogPlugin;
    use bevy::prelude::*;

    use coffee_shop_sim::ui;

    println!("Starting Coffee Shop UI...");
    println!();
    println!("Controls:");
    println!("  B           - Toggle build mode");
    println!("  1/2/3/4     - Pick wood table / marble table / plant / coffee machine");
    println!("  Click       - Place the picked item (build mode)");
    println!("  M then click- Move the item under the cursor (build mode)");
    println!("  R / Delete  - Rotate / delete the item under the cursor (build mode)");
    println!("  Space       - Brew on the machine under the cursor");
    println!("  S           - Serve the nearest seated customer");
    println!("  ESC         - Exit");
    println!();

    App::new()
        .add_plugins(
            DefaultPlugins
                .set(LogPlugin {
                    filter: "warn,coffee_shop_sim=debug".to_string(),
                    level: bevy::log::Level::DEBUG,
                    ..default()
                })
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Coffee Shop Sim - Bevy Game".into(),
                        resolution: (1280, 720).into(),
                        ..default()
                    }),
                    ..default()
                }),
        )
        .add_plugins(ui::CoffeeShopUIPlugin { config, seed })
        .run();
}
