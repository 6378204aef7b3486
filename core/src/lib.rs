#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Mars Rover simulator.
//!
//! This crate defines the vocabulary that connects the parser, the rover
//! engine and the adapters. Adapters hand [`Command`] values to the engine,
//! the engine applies them and broadcasts [`Event`] values describing what
//! happened, and the final state of every command sequence is captured as a
//! [`Report`] whose [`Display`](fmt::Display) form is the textual output
//! protocol.
//!
//! The grid is a torus: leaving one edge re-enters on the opposite edge. The
//! coordinate helpers [`displacement`], [`rotate`] and [`wrap`] are pure and
//! total over their inputs.

use std::{fmt, num::NonZeroU32};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Prefix emitted before a report when the sequence hit an obstacle.
pub const OBSTACLE_MARKER: &str = "O";

const FIELD_DELIMITER: char = ':';

/// Cardinal headings a rover can face.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Heading toward increasing `y`.
    North,
    /// Heading toward increasing `x`.
    East,
    /// Heading toward decreasing `y`.
    South,
    /// Heading toward decreasing `x`.
    West,
}

impl Direction {
    /// Every direction in clockwise order starting from north.
    pub const ALL: [Direction; 4] = [Self::North, Self::East, Self::South, Self::West];

    /// Single-letter symbol used by the output protocol.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::North => 'N',
            Self::East => 'E',
            Self::South => 'S',
            Self::West => 'W',
        }
    }

    /// Decodes a direction from its symbol, ignoring case.
    #[must_use]
    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol.to_ascii_uppercase() {
            'N' => Some(Self::North),
            'E' => Some(Self::East),
            'S' => Some(Self::South),
            'W' => Some(Self::West),
            _ => None,
        }
    }

    const fn index(self) -> usize {
        match self {
            Self::North => 0,
            Self::East => 1,
            Self::South => 2,
            Self::West => 3,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Unit step taken when travelling one cell in `direction`.
#[must_use]
pub const fn displacement(direction: Direction) -> (i64, i64) {
    match direction {
        Direction::North => (0, 1),
        Direction::East => (1, 0),
        Direction::South => (0, -1),
        Direction::West => (-1, 0),
    }
}

/// Rotates `direction` by a quarter turn.
#[must_use]
pub const fn rotate(direction: Direction, clockwise: bool) -> Direction {
    let len = Direction::ALL.len();
    let step = if clockwise { 1 } else { len - 1 };
    Direction::ALL[(direction.index() + step) % len]
}

/// Folds an unbounded coordinate onto `[0, size)`.
///
/// Works for any magnitude, not just single steps past an edge.
#[must_use]
pub const fn wrap(coordinate: i64, size: NonZeroU32) -> i64 {
    coordinate.rem_euclid(size.get() as i64)
}

/// Location on the grid expressed as `x` (column) and `y` (row) coordinates.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Position {
    x: i64,
    y: i64,
}

impl Position {
    /// Creates a new position.
    #[must_use]
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// Horizontal coordinate.
    #[must_use]
    pub const fn x(&self) -> i64 {
        self.x
    }

    /// Vertical coordinate.
    #[must_use]
    pub const fn y(&self) -> i64 {
        self.y
    }

    /// Position reached by adding `(dx, dy)` and wrapping onto `grid`.
    ///
    /// Each axis is normalized before the offset is added so that the sum
    /// cannot overflow for positions that were assigned out of bounds.
    #[must_use]
    pub const fn offset_wrapped(self, delta: (i64, i64), grid: GridSize) -> Self {
        let x = wrap(wrap(self.x, grid.width) + delta.0, grid.width);
        let y = wrap(wrap(self.y, grid.height) + delta.1, grid.height);
        Self { x, y }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

/// Dimensions of the toroidal grid. Both axes are at least one cell wide.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridSize {
    width: NonZeroU32,
    height: NonZeroU32,
}

impl GridSize {
    /// Creates a grid descriptor, rejecting zero-sized axes.
    pub fn new(width: u32, height: u32) -> Result<Self, GridSizeError> {
        match (NonZeroU32::new(width), NonZeroU32::new(height)) {
            (Some(width), Some(height)) => Ok(Self { width, height }),
            _ => Err(GridSizeError::ZeroDimension { width, height }),
        }
    }

    /// Number of columns.
    #[must_use]
    pub const fn width(&self) -> NonZeroU32 {
        self.width
    }

    /// Number of rows.
    #[must_use]
    pub const fn height(&self) -> NonZeroU32 {
        self.height
    }

    /// Reports whether `position` lies inside `[0, width) x [0, height)`.
    #[must_use]
    pub const fn contains(&self, position: Position) -> bool {
        position.x >= 0
            && position.y >= 0
            && position.x < self.width.get() as i64
            && position.y < self.height.get() as i64
    }
}

/// Reasons a [`GridSize`] cannot be constructed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum GridSizeError {
    /// One of the axes was zero, which leaves nothing to wrap onto.
    #[error("grid dimensions must be positive (received {width}x{height})")]
    ZeroDimension {
        /// Requested number of columns.
        width: u32,
        /// Requested number of rows.
        height: u32,
    },
}

/// Instructions the rover understands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Command {
    /// Rotate a quarter turn counter-clockwise.
    TurnLeft,
    /// Rotate a quarter turn clockwise.
    TurnRight,
    /// Step one cell along the current heading.
    MoveForward,
    /// Step one cell against the current heading.
    MoveBackward,
}

impl Command {
    /// Decodes a command from its single-letter symbol, ignoring case.
    #[must_use]
    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol.to_ascii_uppercase() {
            'L' => Some(Self::TurnLeft),
            'R' => Some(Self::TurnRight),
            'F' => Some(Self::MoveForward),
            'B' => Some(Self::MoveBackward),
            _ => None,
        }
    }

    /// Canonical uppercase symbol of the command.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::TurnLeft => 'L',
            Self::TurnRight => 'R',
            Self::MoveForward => 'F',
            Self::MoveBackward => 'B',
        }
    }
}

/// Result of a single movement attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveOutcome {
    /// The rover now occupies the contained cell.
    Moved(Position),
    /// The contained cell holds an obstacle; the rover stayed put.
    Blocked(Position),
}

impl MoveOutcome {
    /// Reports whether the move was rejected by an obstacle.
    #[must_use]
    pub const fn is_blocked(&self) -> bool {
        matches!(self, Self::Blocked(_))
    }
}

/// Events broadcast by the engine after applying commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    /// The rover changed heading.
    Turned {
        /// Heading before the turn.
        from: Direction,
        /// Heading after the turn.
        to: Direction,
    },
    /// The rover advanced to a new cell.
    Moved {
        /// Cell occupied before the step.
        from: Position,
        /// Cell occupied after the step, already wrapped onto the grid.
        to: Position,
    },
    /// A step was refused because the destination holds an obstacle.
    Blocked {
        /// Cell the rover remains on.
        at: Position,
        /// Cell holding the obstacle.
        obstacle: Position,
    },
}

/// Final rover state after a command sequence, as emitted by the output protocol.
///
/// Formats as `x:y:D`, or `O:x:y:D` when the sequence was cut short by an
/// obstacle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    /// Cell occupied by the rover.
    pub position: Position,
    /// Heading of the rover.
    pub direction: Direction,
    /// Whether the most recent movement attempt was blocked.
    pub blocked: bool,
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.blocked {
            write!(f, "{OBSTACLE_MARKER}{FIELD_DELIMITER}")?;
        }
        write!(
            f,
            "{x}{FIELD_DELIMITER}{y}{FIELD_DELIMITER}{direction}",
            x = self.position.x(),
            y = self.position.y(),
            direction = self.direction,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(width: u32, height: u32) -> GridSize {
        GridSize::new(width, height).expect("positive dimensions")
    }

    #[test]
    fn displacement_matches_compass() {
        assert_eq!(displacement(Direction::North), (0, 1));
        assert_eq!(displacement(Direction::East), (1, 0));
        assert_eq!(displacement(Direction::South), (0, -1));
        assert_eq!(displacement(Direction::West), (-1, 0));
    }

    #[test]
    fn rotate_steps_one_quarter_turn() {
        assert_eq!(rotate(Direction::North, true), Direction::East);
        assert_eq!(rotate(Direction::West, true), Direction::North);
        assert_eq!(rotate(Direction::North, false), Direction::West);
        assert_eq!(rotate(Direction::East, false), Direction::North);
    }

    #[test]
    fn four_rotations_close_the_cycle() {
        for start in Direction::ALL {
            for clockwise in [true, false] {
                let mut direction = start;
                for _ in 0..4 {
                    direction = rotate(direction, clockwise);
                }
                assert_eq!(direction, start);
            }
            assert_eq!(rotate(rotate(start, true), false), start);
        }
    }

    #[test]
    fn wrap_handles_negative_and_distant_coordinates() {
        let five = NonZeroU32::new(5).expect("non-zero");
        assert_eq!(wrap(-1, five), 4);
        assert_eq!(wrap(5, five), 0);
        assert_eq!(wrap(3, five), 3);
        assert_eq!(wrap(-11, five), 4);
        assert_eq!(wrap(17, five), 2);
    }

    #[test]
    fn offset_wrapped_crosses_every_edge() {
        let grid = grid(5, 4);
        assert_eq!(
            Position::new(0, 3).offset_wrapped((0, 1), grid),
            Position::new(0, 0)
        );
        assert_eq!(
            Position::new(4, 0).offset_wrapped((1, 0), grid),
            Position::new(0, 0)
        );
        assert_eq!(
            Position::new(0, 0).offset_wrapped((-1, 0), grid),
            Position::new(4, 0)
        );
        assert_eq!(
            Position::new(0, 0).offset_wrapped((0, -1), grid),
            Position::new(0, 3)
        );
    }

    #[test]
    fn offset_wrapped_normalizes_extreme_positions() {
        let grid = grid(5, 4);
        let far = Position::new(i64::MAX, i64::MIN);
        let next = far.offset_wrapped((1, -1), grid);
        assert!(grid.contains(next));
    }

    #[test]
    fn grid_size_rejects_zero_dimensions() {
        assert_eq!(
            GridSize::new(0, 4),
            Err(GridSizeError::ZeroDimension {
                width: 0,
                height: 4
            })
        );
        assert!(GridSize::new(3, 0).is_err());
        assert!(GridSize::new(1, 1).is_ok());
    }

    #[test]
    fn command_symbols_are_case_insensitive() {
        assert_eq!(Command::from_symbol('l'), Some(Command::TurnLeft));
        assert_eq!(Command::from_symbol('R'), Some(Command::TurnRight));
        assert_eq!(Command::from_symbol('f'), Some(Command::MoveForward));
        assert_eq!(Command::from_symbol('B'), Some(Command::MoveBackward));
        assert_eq!(Command::from_symbol('X'), None);
        assert_eq!(Command::MoveBackward.symbol(), 'B');
        assert_eq!(Direction::from_symbol('w'), Some(Direction::West));
        assert_eq!(Direction::from_symbol('Q'), None);
    }

    #[test]
    fn report_formats_with_and_without_obstacle_marker() {
        let clear = Report {
            position: Position::new(1, 3),
            direction: Direction::South,
            blocked: false,
        };
        let blocked = Report {
            position: Position::new(1, 0),
            direction: Direction::East,
            blocked: true,
        };
        assert_eq!(clear.to_string(), "1:3:S");
        assert_eq!(blocked.to_string(), "O:1:0:E");
    }

    #[test]
    fn report_round_trips_through_bincode() {
        let report = Report {
            position: Position::new(4, 2),
            direction: Direction::West,
            blocked: true,
        };
        let bytes = bincode::serialize(&report).expect("serialize");
        let restored: Report = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(restored, report);
    }
}
