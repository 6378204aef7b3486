#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a Mars Rover mission file.

mod transcript;

use std::{fs, io, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use mars_rover_core::{Direction, Position};
use mars_rover_rendering::{Palette, RenderingBackend, Scene, TerminalBackend};
use mars_rover_system_mission::{self as mission, CommandPolicy};
use mars_rover_world::{query, Rover};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::transcript::{OutputFormat, Transcript};

const START_POSITION: Position = Position::new(0, 0);
const START_DIRECTION: Direction = Direction::North;

/// Drives a rover across a wrap-around grid following a mission file.
#[derive(Debug, Parser)]
#[command(name = "mars-rover", version, about, long_about = None)]
struct Cli {
    /// Mission file with a `Size` line, `Obstacle` lines and command lines
    input: PathBuf,

    /// File receiving one result line per command sequence
    #[arg(short, long, default_value = "output.txt")]
    output: PathBuf,

    /// Draw the grid before the first sequence and after each one
    #[arg(long)]
    draw: bool,

    /// Disable ANSI colors in grid drawings
    #[arg(long)]
    no_color: bool,

    /// Reject unknown command characters instead of skipping them
    #[arg(long)]
    strict: bool,

    /// Encoding of the printed and written results
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Log every applied command (overridden by RUST_LOG)
    #[arg(short, long)]
    verbose: bool,
}

/// Entry point for the Mars Rover command-line interface.
fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    run(&cli)
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    let text = fs::read_to_string(&cli.input)
        .with_context(|| format!("failed to read mission file {}", cli.input.display()))?;
    let policy = if cli.strict {
        CommandPolicy::Strict
    } else {
        CommandPolicy::Lenient
    };
    let mission = mission::parse(&text, policy)
        .with_context(|| format!("invalid mission file {}", cli.input.display()))?;
    info!(
        width = mission.grid.width().get(),
        height = mission.grid.height().get(),
        obstacles = mission.obstacles.len(),
        sequences = mission.sequences.len(),
        "mission loaded"
    );

    let mut rover = Rover::new(
        START_POSITION,
        START_DIRECTION,
        mission.grid,
        mission.obstacles.iter().copied(),
    );

    let palette = if cli.no_color {
        Palette::plain()
    } else {
        Palette::ansi()
    };
    let mut backend = cli
        .draw
        .then(|| TerminalBackend::new(io::stdout().lock(), palette));
    if let Some(backend) = backend.as_mut() {
        backend.present_initial(&scene(&rover)?)?;
    }

    let mut reports = Vec::with_capacity(mission.sequences.len());
    let mut events = Vec::new();
    for (index, sequence) in mission.sequences.iter().enumerate() {
        events.clear();
        let report = rover.execute(sequence, &mut events);
        debug!(
            sequence = index + 1,
            applied = events.len(),
            total = sequence.len(),
            %report,
            "sequence finished"
        );
        if let Some(backend) = backend.as_mut() {
            backend.present(&scene(&rover)?)?;
        }
        reports.push(report);
    }
    drop(backend);

    let transcript = Transcript::new(mission.grid, query::obstacles(&rover), reports);
    let encoded = transcript
        .encode(cli.format)
        .context("failed to encode results")?;
    println!("Output:\n{encoded}");

    fs::write(&cli.output, &encoded)
        .with_context(|| format!("failed to write output file {}", cli.output.display()))?;
    info!(path = %cli.output.display(), "results written");
    Ok(())
}

fn scene(rover: &Rover) -> Result<Scene> {
    let scene = Scene::new(
        query::grid_size(rover),
        query::report(rover),
        query::obstacles(rover),
    )?;
    Ok(scene)
}
