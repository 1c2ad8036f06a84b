#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that autoplays Merge Arena campaigns and inspects saves.

mod balance;
mod campaign;
mod save_transfer;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use merge_arena_core::Event;
use merge_arena_system_battle::Outcome;
use merge_arena_system_economy::Economy;
use merge_arena_world::{query, World};
use tracing_subscriber::EnvFilter;

use balance::BalanceConfig;
use campaign::{Campaign, WaveReport};

/// Merge Arena campaign runner.
#[derive(Debug, Parser)]
#[command(name = "merge-arena", version)]
struct Cli {
    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Debug, Subcommand)]
enum CliCommand {
    /// Autoplays waves: buy, merge, deploy, battle, settle.
    Play {
        /// Seed for enemy rosters and damage variance.
        #[arg(long, default_value_t = 0)]
        seed: u64,
        /// Number of waves to play.
        #[arg(long, default_value_t = 1)]
        waves: u32,
        /// TOML balance file overriding the default tuning.
        #[arg(long)]
        config: Option<PathBuf>,
        /// Save string to resume from instead of a new game.
        #[arg(long)]
        load: Option<String>,
    },
    /// Decodes a save string and prints the roster it holds.
    Inspect {
        /// Save string produced by `play`.
        save: String,
        /// TOML balance file used to interpret the save.
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    init_tracing();

    match Cli::parse().command {
        CliCommand::Play {
            seed,
            waves,
            config,
            load,
        } => play(seed, waves, config.as_deref(), load.as_deref()),
        CliCommand::Inspect { save, config } => inspect(&save, config.as_deref()),
    }
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("merge_arena=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_balance(path: Option<&Path>) -> Result<BalanceConfig> {
    match path {
        Some(path) => BalanceConfig::load(path),
        None => Ok(BalanceConfig::default()),
    }
}

fn restore_world(balance: &BalanceConfig, save: Option<&str>) -> Result<World> {
    let economy = Economy::new(balance.economy.clone());
    match save {
        Some(save) => {
            let snapshot = save_transfer::decode(save).context("failed to decode save string")?;
            Ok(World::from_snapshot(snapshot, balance.world.clone(), economy))
        }
        None => Ok(World::with_config(balance.world.clone(), economy)),
    }
}

fn play(seed: u64, waves: u32, config: Option<&Path>, load: Option<&str>) -> Result<()> {
    let balance = load_balance(config)?;
    let world = restore_world(&balance, load)?;
    let mut campaign = Campaign::new(world, &balance, seed)?;

    tracing::info!(seed, waves, "starting campaign");
    for _ in 0..waves {
        let report = campaign.play_wave()?;
        print_report(&report);
    }

    let save = save_transfer::encode(&query::snapshot(campaign.world()))
        .context("failed to encode save string")?;
    println!("{save}");
    Ok(())
}

fn print_report(report: &WaveReport) {
    println!("== Wave {} ==", report.wave);
    for line in &report.log {
        println!("{line}");
    }
    let verdict = match report.outcome {
        Outcome::Victory => "Victory",
        Outcome::Defeat => "Defeat",
    };
    println!(
        "{verdict} after {} turns: +{} coins, +{} xp",
        report.turns, report.rewards.coins, report.rewards.xp
    );
    for event in &report.events {
        match event {
            Event::CreaturesMerged { created, tier, .. } => {
                println!("merged into {created} at tier {}", tier.get());
            }
            Event::CreatureLeveledUp { creature, level } => {
                println!("{creature} reached level {level}");
            }
            Event::CreatureRetired { creature } => println!("{creature} retired"),
            _ => {}
        }
    }
}

fn inspect(save: &str, config: Option<&Path>) -> Result<()> {
    let balance = load_balance(config)?;
    let world = restore_world(&balance, Some(save))?;

    println!(
        "wave {}/{} | coins {}",
        query::wave(&world),
        query::max_wave(&world),
        query::coins(&world)
    );
    for cell in query::grid(&world) {
        let Some(creature) = cell.occupant.and_then(|id| query::creature(&world, id)) else {
            println!("[{}] empty", cell.id.get());
            continue;
        };
        println!(
            "[{}] {} {} ({} T{} L{}) hp {}/{} atk {} def {} xp {}/{}",
            cell.id.get(),
            creature.id(),
            creature.name(),
            creature.element(),
            creature.tier().get(),
            creature.level(),
            creature.health(),
            creature.max_health(),
            creature.attack(),
            creature.defense(),
            creature.experience(),
            creature.experience_to_next_level(),
        );
    }
    Ok(())
}
