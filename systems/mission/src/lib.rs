#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure mission system that turns an input file into rover instructions.
//!
//! A mission file holds one `Size <width> <height>` line, any number of
//! `Obstacle <x> <y>` lines, and one or more command lines made of the
//! letters `L`, `R`, `F` and `B`. Blank lines are ignored and every line is
//! trimmed before it is inspected.

use mars_rover_core::{Command, GridSize, Position};
use thiserror::Error;
use tracing::warn;

const SIZE_KEYWORD: &str = "Size";
const OBSTACLE_KEYWORD: &str = "Obstacle";

/// Treatment of characters in command lines that are not rover commands.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CommandPolicy {
    /// Unknown characters are dropped from the sequence.
    #[default]
    Lenient,
    /// Unknown characters abort parsing.
    Strict,
}

/// Everything the engine needs to simulate one input file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mission {
    /// Dimensions of the toroidal grid.
    pub grid: GridSize,
    /// Obstacles in file order.
    pub obstacles: Vec<Position>,
    /// Command sequences, one per command line.
    pub sequences: Vec<Vec<Command>>,
}

/// Reasons a mission file is rejected.
///
/// Line numbers are 1-based and refer to the raw input, blank lines included.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum MissionError {
    /// No `Size` line was found.
    #[error("grid size definition is missing")]
    MissingGridSize,
    /// More than one `Size` line was found.
    #[error("line {line}: grid size is already defined")]
    DuplicateGridSize {
        /// Line holding the second definition.
        line: usize,
    },
    /// A keyword line did not have exactly two values.
    #[error("line {line}: invalid format, expected \"{keyword} X Y\"")]
    InvalidFormat {
        /// Offending line.
        line: usize,
        /// Keyword that introduced the line.
        keyword: &'static str,
    },
    /// A keyword value was not an integer.
    #[error("line {line}: {keyword} coordinates must be integers (received '{value}')")]
    NonInteger {
        /// Offending line.
        line: usize,
        /// Keyword that introduced the line.
        keyword: &'static str,
        /// Token that failed to parse.
        value: String,
    },
    /// A grid dimension was zero or negative.
    #[error("line {line}: grid size values must be positive integers")]
    NonPositiveGridSize {
        /// Offending line.
        line: usize,
    },
    /// A grid dimension does not fit the supported range.
    #[error("line {line}: grid size values must not exceed {}", u32::MAX)]
    GridSizeTooLarge {
        /// Offending line.
        line: usize,
    },
    /// An obstacle coordinate was negative.
    #[error("line {line}: obstacle coordinates must be non-negative integers")]
    NegativeObstacle {
        /// Offending line.
        line: usize,
    },
    /// No command line was found.
    #[error("commands line is missing")]
    MissingCommands,
    /// A command line held an unknown character under [`CommandPolicy::Strict`].
    #[error("line {line}: invalid command '{symbol}'")]
    UnknownCommand {
        /// Offending line.
        line: usize,
        /// Character that is not a rover command.
        symbol: char,
    },
}

/// Parses a mission file.
pub fn parse(text: &str, policy: CommandPolicy) -> Result<Mission, MissionError> {
    let mut grid = None;
    let mut obstacles = Vec::new();
    let mut sequences = Vec::new();

    for (index, raw) in text.lines().enumerate() {
        let line = index + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            continue;
        }

        match trimmed.split_whitespace().next() {
            Some(SIZE_KEYWORD) => {
                if grid.is_some() {
                    return Err(MissionError::DuplicateGridSize { line });
                }
                grid = Some(parse_grid_size(trimmed, line)?);
            }
            Some(OBSTACLE_KEYWORD) => obstacles.push(parse_obstacle(trimmed, line)?),
            _ => sequences.push(parse_commands(trimmed, line, policy)?),
        }
    }

    let grid = grid.ok_or(MissionError::MissingGridSize)?;
    if sequences.is_empty() {
        return Err(MissionError::MissingCommands);
    }

    Ok(Mission {
        grid,
        obstacles,
        sequences,
    })
}

/// Parses a `Size <width> <height>` line.
pub fn parse_grid_size(text: &str, line: usize) -> Result<GridSize, MissionError> {
    let (width, height) = extract_pair(text, line, SIZE_KEYWORD)?;
    let dimension = |value: i64| {
        if value <= 0 {
            return Err(MissionError::NonPositiveGridSize { line });
        }
        u32::try_from(value).map_err(|_| MissionError::GridSizeTooLarge { line })
    };

    GridSize::new(dimension(width)?, dimension(height)?)
        .map_err(|_| MissionError::NonPositiveGridSize { line })
}

/// Parses an `Obstacle <x> <y>` line.
pub fn parse_obstacle(text: &str, line: usize) -> Result<Position, MissionError> {
    let (x, y) = extract_pair(text, line, OBSTACLE_KEYWORD)?;
    if x < 0 || y < 0 {
        return Err(MissionError::NegativeObstacle { line });
    }
    Ok(Position::new(x, y))
}

/// Parses a command line, ignoring case and embedded whitespace.
pub fn parse_commands(
    text: &str,
    line: usize,
    policy: CommandPolicy,
) -> Result<Vec<Command>, MissionError> {
    let mut commands = Vec::with_capacity(text.len());
    for symbol in text.chars().filter(|symbol| !symbol.is_whitespace()) {
        match (Command::from_symbol(symbol), policy) {
            (Some(command), _) => commands.push(command),
            (None, CommandPolicy::Lenient) => {
                warn!(line, %symbol, "ignoring unknown command");
            }
            (None, CommandPolicy::Strict) => {
                return Err(MissionError::UnknownCommand { line, symbol });
            }
        }
    }
    Ok(commands)
}

fn extract_pair(text: &str, line: usize, keyword: &'static str) -> Result<(i64, i64), MissionError> {
    let parts: Vec<&str> = text.split_whitespace().collect();
    let [head, first, second] = parts.as_slice() else {
        return Err(MissionError::InvalidFormat { line, keyword });
    };
    if *head != keyword {
        return Err(MissionError::InvalidFormat { line, keyword });
    }

    let integer = |value: &str| {
        value.parse::<i64>().map_err(|_| MissionError::NonInteger {
            line,
            keyword,
            value: value.to_owned(),
        })
    };
    Ok((integer(*first)?, integer(*second)?))
}
