// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use serde::Serialize;
use storage::{Database, StoredMinimum};

use self::cli::{Cli, Command, ImportArgs, StatsArgs};

fn import(args: ImportArgs) -> Result<()> {
    let config = config::layered(args.config.config.as_deref(), args.overrides())?
        .resolve()
        .context("incomplete import configuration")?;

    let report = landscape::run(&config)
        .with_context(|| format!("import into {} failed", config.store.display()))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    for timing in &report.timings {
        println!(
            "{}",
            format!("{}: {:.1?}", timing.phase, timing.elapsed).yellow()
        );
    }
    println!(
        "{}",
        format!(
            "Imported {} minima and {} transition states into {} in {:.1?}",
            report.minima,
            report.transition_states,
            config.store.display(),
            report.total
        )
        .green()
    );
    Ok(())
}

#[derive(Serialize)]
struct Stats {
    minima: usize,
    transition_states: usize,
    lowest: Vec<StoredMinimum>,
}

fn stats(args: StatsArgs) -> Result<()> {
    let store = config::layered(args.config.config.as_deref(), args.overrides())?.store_location();
    let db = Database::open_existing(&store)?;

    let stats = Stats {
        minima: db.number_of_minima()?,
        transition_states: db.number_of_transition_states()?,
        lowest: db.lowest_minima(args.lowest)?,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("{}", format!("Store: {}", store.display()).green());
    println!("- minima: {}", stats.minima);
    println!("- transition states: {}", stats.transition_states);
    for minimum in &stats.lowest {
        let connections = db.transition_states_of(minimum.id)?.len();
        println!(
            " - {}: E = {:.6} ({} atoms, {} transition states)",
            minimum.id,
            minimum.energy,
            minimum.coords.len() / 3,
            connections
        );
    }
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Import(args) => import(args),
        Command::Stats(args) => stats(args),
    }
}

fn main() {
    let cli = Cli::parse();
    logging::init(logging::CRATES, cli.log_level());

    if let Err(err) = run(cli) {
        eprintln!("{} {}", "Error:".red().bold(), err);
        for cause in err.chain().skip(1) {
            eprintln!("because: {}", cause);
        }
        std::process::exit(1);
    }
}
