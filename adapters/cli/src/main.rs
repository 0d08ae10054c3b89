#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that loads a Grid Tactics map and shows where a unit
//! may move.

mod ascii;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use grid_tactics_core::{Event, UnitId, UnitKind, Vector2};
use grid_tactics_rendering::{present, GridLayout};
use grid_tactics_system_bootstrap::{Bootstrap, DirectoryResources};
use grid_tactics_system_movement::{Movement, ReachPolicy};
use grid_tactics_world::{self as world, LoadMode};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::ascii::AsciiCanvas;

/// Loads a map, deploys swordsmen and prints the reachable cells.
#[derive(Debug, Parser)]
#[command(name = "grid-tactics", version, about)]
struct Args {
    /// Logical name of the map description to load.
    #[arg(long)]
    map: String,

    /// Directory holding map descriptions.
    #[arg(long, default_value = "maps")]
    resources: PathBuf,

    /// Reject descriptions containing unknown terrain tokens.
    #[arg(long)]
    strict: bool,

    /// Places a swordsman at X,Y. May be repeated.
    #[arg(long = "unit", value_name = "X,Y", value_parser = parse_position)]
    units: Vec<Vector2>,

    /// Index of the deployed unit whose reachable cells are shown.
    #[arg(long, default_value_t = 0)]
    select: usize,

    /// Moves the selected unit to X,Y before printing.
    #[arg(long = "move", value_name = "X,Y", value_parser = parse_position)]
    destination: Option<Vector2>,

    /// Only reach cells connected to the unit through walkable terrain.
    #[arg(long)]
    connected: bool,

    /// Allow destinations held by other units.
    #[arg(long)]
    ignore_occupancy: bool,
}

fn parse_position(value: &str) -> Result<Vector2, String> {
    let (x, y) = value
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y but found '{value}'"))?;
    let x = x
        .trim()
        .parse::<i32>()
        .map_err(|error| format!("invalid x coordinate '{x}': {error}"))?;
    let y = y
        .trim()
        .parse::<i32>()
        .map_err(|error| format!("invalid y coordinate '{y}': {error}"))?;
    Ok(Vector2::new(x, y))
}

/// Entry point for the Grid Tactics command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let mode = if args.strict {
        LoadMode::Strict
    } else {
        LoadMode::Lenient
    };
    let policy = if args.connected {
        ReachPolicy::Connected
    } else {
        ReachPolicy::Shape
    };

    let loader = DirectoryResources::new(&args.resources);
    let bootstrap = Bootstrap::new(mode);
    let map = bootstrap
        .load_map(&loader, &args.map)
        .with_context(|| format!("failed to load map from {}", args.resources.display()))?;

    let deployment: Vec<(UnitKind, Vector2)> = args
        .units
        .iter()
        .map(|&position| (UnitKind::Swordsman, position))
        .collect();
    let mut events = Vec::new();
    bootstrap.deploy(&map, &deployment, &mut events);
    let deployed = report_deployment(&events);

    let movement = Movement::new(policy, !args.ignore_occupancy);
    let selected = deployed.get(args.select).copied();

    if let Some(destination) = args.destination {
        let Some(unit) = selected else {
            bail!("--move requires a deployed unit to select");
        };
        let command = movement
            .plan_move(&map, unit, destination)
            .with_context(|| format!("cannot move unit {} to {destination:?}", unit.get()))?;
        events.clear();
        world::apply(&map, command, &mut events);
        info!(?events, "applied move");
    }

    let highlights = match selected {
        Some(unit) => movement.reachable_on(&map, unit)?,
        None => Vec::new(),
    };

    let grid = map.snapshot();
    let layout = GridLayout::for_grid(&grid, 1.0)?;
    let mut canvas = AsciiCanvas::new(layout);
    present(&grid, &map.units(), &layout, &highlights, &mut canvas)?;

    print!("{}", canvas.render());
    if let Some(unit) = selected.and_then(|id| map.unit(id)) {
        let position = unit.position();
        println!(
            "{} {} at {},{} can reach {} cells",
            unit.kind().display_name(),
            unit.id().get(),
            position.x(),
            position.y(),
            highlights.len()
        );
    }

    Ok(())
}

/// Logs rejected placements and returns the ids of the units that landed.
fn report_deployment(events: &[Event]) -> Vec<UnitId> {
    events
        .iter()
        .filter_map(|event| match event {
            Event::UnitPlaced { unit, .. } => Some(*unit),
            Event::UnitPlacementRejected {
                kind,
                position,
                reason,
            } => {
                warn!(?kind, ?position, %reason, "unit placement rejected");
                None
            }
            _ => None,
        })
        .collect()
}
