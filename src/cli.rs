// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use clap::{ArgAction, Args, Parser, Subcommand};
use config::PartialConfig;
use logging::LevelFilter;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "landscape",
    about = "Load energy-landscape minima and transition states into a database",
    version,
    propagate_version = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// More log output; repeat for more detail
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Import minima and transition states into the store
    Import(ImportArgs),

    /// Summarize the contents of a store
    Stats(StatsArgs),
}

/// Where the settings come from; shared by all commands.
#[derive(Args)]
pub struct ConfigArgs {
    /// Config file (default: import.toml in the user config directory, if present)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Database to write to or read from
    #[arg(long, value_name = "FILE")]
    pub store: Option<PathBuf>,
}

#[derive(Args)]
pub struct ImportArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Atoms per structure
    #[arg(short = 'n', long = "atoms", value_name = "N")]
    pub atom_count: Option<usize>,

    /// Minima summary file
    #[arg(long = "minima", value_name = "FILE")]
    pub minima_summary: Option<PathBuf>,

    /// Minima coordinates file
    #[arg(long, value_name = "FILE")]
    pub minima_coords: Option<PathBuf>,

    /// Transition-state summary file
    #[arg(long = "ts", value_name = "FILE")]
    pub ts_summary: Option<PathBuf>,

    /// Transition-state coordinates file
    #[arg(long, value_name = "FILE")]
    pub ts_coords: Option<PathBuf>,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct StatsArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Number of lowest minima to list
    #[arg(short, long, value_name = "K", default_value_t = 5)]
    pub lowest: usize,

    /// Print the summary as JSON
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    pub fn log_level(&self) -> LevelFilter {
        logging::adjusted_level(logging::default_level(), self.verbose, self.quiet)
    }
}

impl ImportArgs {
    /// The command-line layer of the configuration.
    pub fn overrides(&self) -> PartialConfig {
        PartialConfig {
            atom_count: self.atom_count,
            minima_summary: self.minima_summary.clone(),
            minima_coords: self.minima_coords.clone(),
            ts_summary: self.ts_summary.clone(),
            ts_coords: self.ts_coords.clone(),
            store: self.config.store.clone(),
        }
    }
}

impl StatsArgs {
    pub fn overrides(&self) -> PartialConfig {
        PartialConfig {
            store: self.config.store.clone(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn import_flags_become_overrides() {
        let cli = Cli::parse_from([
            "landscape",
            "import",
            "--atoms",
            "38",
            "--ts",
            "paths/ts.data",
            "--store",
            "out.sqlite",
        ]);
        let Command::Import(args) = cli.command else {
            panic!("expected the import command");
        };
        let overrides = args.overrides();
        assert_eq!(overrides.atom_count, Some(38));
        assert_eq!(overrides.ts_summary, Some(PathBuf::from("paths/ts.data")));
        assert_eq!(overrides.store, Some(PathBuf::from("out.sqlite")));
        assert_eq!(overrides.minima_summary, None);
    }

    #[test]
    fn verbosity_is_global() {
        let cli = Cli::parse_from(["landscape", "stats", "-vv"]);
        assert_eq!(cli.verbose, 2);
        assert!(Cli::try_parse_from(["landscape", "stats", "-q", "-v"]).is_err());
    }
}
