#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative rover state for the Mars Rover simulator.
//!
//! A [`Rover`] owns its position, heading, the grid it drives on and the
//! static obstacle set. Commands are applied one at a time through [`apply`],
//! which reports what happened as [`Event`] values. Whole command sequences go
//! through [`Rover::execute`], which stops at the first blocked move and
//! yields a [`Report`].

use std::collections::HashSet;

use mars_rover_core::{
    displacement, rotate, Command, Direction, Event, GridSize, MoveOutcome, Position, Report,
};
use tracing::{debug, info};

/// Rover driving on a toroidal grid around static obstacles.
#[derive(Clone, Debug)]
pub struct Rover {
    position: Position,
    direction: Direction,
    grid: GridSize,
    obstacles: HashSet<Position>,
    blocked: bool,
}

impl Rover {
    /// Creates a rover at `position` facing `direction`.
    ///
    /// Obstacles outside the grid are kept but can never be reached.
    #[must_use]
    pub fn new<I>(position: Position, direction: Direction, grid: GridSize, obstacles: I) -> Self
    where
        I: IntoIterator<Item = Position>,
    {
        Self {
            position,
            direction,
            grid,
            obstacles: obstacles.into_iter().collect(),
            blocked: false,
        }
    }

    /// Cell currently occupied by the rover.
    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }

    /// Current heading.
    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    /// Overwrites the position. The value is neither wrapped nor checked
    /// against obstacles.
    pub fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    /// Overwrites the heading.
    pub fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
    }

    /// Rotates a quarter turn counter-clockwise.
    pub fn turn_left(&mut self) {
        self.direction = rotate(self.direction, false);
    }

    /// Rotates a quarter turn clockwise.
    pub fn turn_right(&mut self) {
        self.direction = rotate(self.direction, true);
    }

    /// Cell one step ahead (`forward`) or behind, wrapped onto the grid.
    #[must_use]
    pub fn next_position(&self, forward: bool) -> Position {
        let (dx, dy) = displacement(self.direction);
        let delta = if forward { (dx, dy) } else { (-dx, -dy) };
        self.position.offset_wrapped(delta, self.grid)
    }

    /// Steps one cell along the heading unless an obstacle is in the way.
    pub fn move_forward(&mut self) -> MoveOutcome {
        self.step(true)
    }

    /// Steps one cell against the heading unless an obstacle is in the way.
    pub fn move_backward(&mut self) -> MoveOutcome {
        self.step(false)
    }

    fn step(&mut self, forward: bool) -> MoveOutcome {
        let next = self.next_position(forward);
        if self.obstacles.contains(&next) {
            self.blocked = true;
            return MoveOutcome::Blocked(next);
        }

        self.position = next;
        self.blocked = false;
        MoveOutcome::Moved(next)
    }

    /// Reports whether the most recent movement attempt hit an obstacle.
    #[must_use]
    pub const fn is_blocked(&self) -> bool {
        self.blocked
    }

    /// Snapshot of the state encoded by the output protocol.
    #[must_use]
    pub const fn report(&self) -> Report {
        Report {
            position: self.position,
            direction: self.direction,
            blocked: self.blocked,
        }
    }

    /// Runs a command sequence and returns the resulting state.
    ///
    /// The blocked flag is cleared first, so every sequence is an independent
    /// attempt while position and heading carry over from the previous one.
    /// Once a move is blocked the rest of the sequence, turns included, is
    /// skipped. One [`Event`] per applied command is appended to `out_events`.
    pub fn execute(&mut self, commands: &[Command], out_events: &mut Vec<Event>) -> Report {
        self.blocked = false;

        for (index, command) in commands.iter().enumerate() {
            if self.blocked {
                info!(
                    skipped = commands.len() - index,
                    position = %self.position,
                    "sequence halted by obstacle"
                );
                break;
            }
            apply(self, *command, out_events);
        }

        self.report()
    }

    /// Runs a command sequence and returns its encoded output line.
    pub fn execute_commands(&mut self, commands: &[Command]) -> String {
        let mut events = Vec::new();
        self.execute(commands, &mut events).to_string()
    }

    /// Encodes the current state as an output line (`x:y:D` or `O:x:y:D`).
    #[must_use]
    pub fn write_output(&self) -> String {
        self.report().to_string()
    }
}

/// Applies a single command to the rover, appending the resulting event.
pub fn apply(rover: &mut Rover, command: Command, out_events: &mut Vec<Event>) {
    let event = match command {
        Command::TurnLeft => {
            let from = rover.direction;
            rover.turn_left();
            Event::Turned {
                from,
                to: rover.direction,
            }
        }
        Command::TurnRight => {
            let from = rover.direction;
            rover.turn_right();
            Event::Turned {
                from,
                to: rover.direction,
            }
        }
        Command::MoveForward => {
            let from = rover.position;
            movement_event(from, rover.move_forward())
        }
        Command::MoveBackward => {
            let from = rover.position;
            movement_event(from, rover.move_backward())
        }
    };

    debug!(command = %command.symbol(), ?event, "applied command");
    out_events.push(event);
}

fn movement_event(from: Position, outcome: MoveOutcome) -> Event {
    match outcome {
        MoveOutcome::Moved(to) => Event::Moved { from, to },
        MoveOutcome::Blocked(obstacle) => Event::Blocked { at: from, obstacle },
    }
}

/// Query functions that provide read-only access to the rover state.
pub mod query {
    use mars_rover_core::{GridSize, Position, Report};

    use super::Rover;

    /// Snapshot of the state encoded by the output protocol.
    #[must_use]
    pub fn report(rover: &Rover) -> Report {
        rover.report()
    }

    /// Dimensions of the grid the rover drives on.
    #[must_use]
    pub fn grid_size(rover: &Rover) -> GridSize {
        rover.grid
    }

    /// Obstacles known to the rover in deterministic order.
    #[must_use]
    pub fn obstacles(rover: &Rover) -> Vec<Position> {
        let mut obstacles: Vec<Position> = rover.obstacles.iter().copied().collect();
        obstacles.sort_unstable();
        obstacles
    }

    /// Reports whether `position` holds an obstacle.
    #[must_use]
    pub fn is_obstacle(rover: &Rover, position: Position) -> bool {
        rover.obstacles.contains(&position)
    }
}
