//! planner - recompute, reorder and validate drone show trajectories

use anyhow::Result;
use clap::{Parser, Subcommand};
use planner_cli::{commands, io, Config};
use planner_core::{ElevationSource, Position, WaypointId};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON file with feasibility thresholds, overriding the environment
    #[arg(long, global = true)]
    rules: Option<PathBuf>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Recompute speeds and headings for every waypoint
    Recalc {
        file: PathBuf,
    },
    /// Move one waypoint to a new index and refresh the affected legs
    Drag {
        file: PathBuf,
        /// Id of the waypoint to move
        #[arg(long)]
        id: WaypointId,
        /// Target index in the sequence
        #[arg(long)]
        to: usize,
    },
    /// Report time ordering, speed ceiling and optional ground clearance issues
    Validate {
        file: PathBuf,
        /// Terrain grid JSON used for clearance checks
        #[arg(long)]
        terrain: Option<PathBuf>,
    },
    /// Print distance, duration and per-tier leg counts
    Summary {
        file: PathBuf,
    },
    /// Bearing between two points
    Heading {
        #[arg(long, value_parser = io::parse_position)]
        from: Position,
        #[arg(long, value_parser = io::parse_position)]
        to: Position,
    },
    /// Generate a demo trajectory around the home position
    Generate {
        #[arg(long, default_value_t = 8)]
        count: usize,
        #[arg(long)]
        seed: Option<u64>,
    },
}

/// `RUST_LOG` plus defaults: CLI progress at info, engine recoveries at warn.
fn log_filter() -> Result<EnvFilter> {
    Ok(EnvFilter::from_default_env()
        .add_directive("planner=info".parse()?)
        .add_directive("planner_cli=info".parse()?)
        .add_directive("planner_core=warn".parse()?))
}

fn init_tracing(json: bool) -> Result<()> {
    let filter = log_filter()?;

    // stdout carries command output, logs go to stderr
    if json {
        tracing_subscriber::registry()
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .with(filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .with(filter)
            .init();
    }
    Ok(())
}

fn run(args: Args) -> Result<ExitCode> {
    let mut config = Config::from_env();
    if let Some(path) = &args.rules {
        config = config.with_rules_file(path)?;
    }
    config.validate()?;

    match args.command {
        Command::Recalc { file } => {
            let waypoints = commands::recalc(io::read_waypoints(&file)?, &config)?;
            io::print_json(&waypoints)?;
        }
        Command::Drag { file, id, to } => {
            let waypoints = commands::drag(io::read_waypoints(&file)?, &id, to, &config)?;
            io::print_json(&waypoints)?;
        }
        Command::Validate { file, terrain } => {
            let grid = terrain.as_deref().map(io::read_terrain).transpose()?;
            let report = commands::validate(
                io::read_waypoints(&file)?,
                grid.as_ref().map(|g| g as &dyn ElevationSource),
                &config,
            )?;
            io::print_json(&report)?;
            if !report.valid {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::Summary { file } => {
            let summary = commands::summary(io::read_waypoints(&file)?, &config)?;
            io::print_json(&summary)?;
        }
        Command::Heading { from, to } => {
            io::print_json(&commands::heading(from, to))?;
        }
        Command::Generate { count, seed } => {
            io::print_json(&commands::generate(count, seed, &config))?;
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();
    init_tracing(args.json_logs)?;
    tracing::debug!(?args, "starting planner");
    run(args)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filter_surfaces_engine_warnings() {
        let filter = log_filter().unwrap().to_string();
        assert!(filter.contains("planner_core=warn"), "{filter}");
        assert!(filter.contains("planner_cli=info"), "{filter}");
    }

    #[test]
    fn cli_arguments_parse() {
        let args = Args::try_parse_from([
            "planner", "--json-logs", "heading", "--from", "0,0", "--to", "0,1",
        ])
        .unwrap();
        assert!(args.json_logs);
        assert!(matches!(args.command, Command::Heading { .. }));
    }
}
