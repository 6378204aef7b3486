#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Terminal rendering for the Mars Rover simulator.
//!
//! Rendering is read-only: a [`Scene`] is captured from the rover state and
//! drawn as a box-drawing grid with row `height - 1` at the top, so north
//! points up the screen.

use anyhow::{Context, Result as AnyResult};
use mars_rover_core::{Direction, GridSize, Position, Report};
use std::{error::Error, fmt, io::Write};

/// Largest grid the terminal drawing accepts along either axis.
pub const MAX_DRAWABLE_CELLS: u32 = 256;

const OBSTACLE_GLYPH: char = '■';
const EMPTY_CELL: &str = "   ";

/// ANSI escape sequence applied to a glyph.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Color {
    code: &'static str,
}

impl Color {
    /// Green foreground.
    pub const GREEN: Self = Self::new("\x1b[32m");
    /// Red foreground.
    pub const RED: Self = Self::new("\x1b[31m");
    /// Leaves the terminal's default styling untouched.
    pub const NONE: Self = Self::new("");

    const RESET: &'static str = "\x1b[0m";

    /// Creates a color from a raw escape sequence.
    #[must_use]
    pub const fn new(code: &'static str) -> Self {
        Self { code }
    }

    /// Wraps `text` in this color, resetting afterwards.
    #[must_use]
    pub fn paint(self, text: &str) -> String {
        if self.code.is_empty() {
            text.to_owned()
        } else {
            format!("{}{text}{}", self.code, Self::RESET)
        }
    }
}

/// Colors used for the glyphs of a drawing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Palette {
    /// Rover glyph after an unobstructed sequence.
    pub rover: Color,
    /// Rover glyph after a sequence stopped by an obstacle.
    pub blocked_rover: Color,
    /// Obstacle glyph.
    pub obstacle: Color,
}

impl Palette {
    /// Colored palette for ANSI terminals.
    #[must_use]
    pub const fn ansi() -> Self {
        Self {
            rover: Color::GREEN,
            blocked_rover: Color::RED,
            obstacle: Color::RED,
        }
    }

    /// Palette that emits no escape sequences.
    #[must_use]
    pub const fn plain() -> Self {
        Self {
            rover: Color::NONE,
            blocked_rover: Color::NONE,
            obstacle: Color::NONE,
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::ansi()
    }
}

/// Arrow drawn in the rover's cell for each heading.
#[must_use]
pub const fn heading_glyph(direction: Direction) -> char {
    match direction {
        Direction::North => '▲',
        Direction::East => '▶',
        Direction::South => '▼',
        Direction::West => '◀',
    }
}

/// Immutable snapshot of everything a drawing shows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Scene {
    columns: u32,
    rows: u32,
    rover: Report,
    obstacles: Vec<Position>,
}

impl Scene {
    /// Captures a scene, rejecting grids too large to draw legibly.
    pub fn new(
        grid: GridSize,
        rover: Report,
        obstacles: Vec<Position>,
    ) -> Result<Self, RenderingError> {
        let columns = grid.width().get();
        let rows = grid.height().get();
        if columns > MAX_DRAWABLE_CELLS || rows > MAX_DRAWABLE_CELLS {
            return Err(RenderingError::GridTooLarge { columns, rows });
        }

        Ok(Self {
            columns,
            rows,
            rover,
            obstacles,
        })
    }

    /// Rover state shown by the scene.
    #[must_use]
    pub const fn rover(&self) -> Report {
        self.rover
    }

    fn cell(&self, x: i64, y: i64, palette: &Palette) -> String {
        let position = Position::new(x, y);
        if self.rover.position == position {
            let color = if self.rover.blocked {
                palette.blocked_rover
            } else {
                palette.rover
            };
            let glyph = heading_glyph(self.rover.direction).to_string();
            format!(" {} ", color.paint(&glyph))
        } else if self.obstacles.contains(&position) {
            format!(" {} ", palette.obstacle.paint(&OBSTACLE_GLYPH.to_string()))
        } else {
            EMPTY_CELL.to_owned()
        }
    }
}

/// Draws the grid with row labels on the left and column labels underneath.
#[must_use]
pub fn draw_grid(scene: &Scene, palette: &Palette) -> String {
    let label_width = (scene.rows.max(1) - 1).to_string().len();
    let margin = " ".repeat(label_width + 1);
    let border = |left: &str, joint: &str, right: &str| {
        let span = vec!["───"; scene.columns as usize].join(joint);
        format!("{margin}{left}{span}{right}\n")
    };

    let mut output = border("┌", "┬", "┐");
    for y in (0..i64::from(scene.rows)).rev() {
        output.push_str(&format!("{y:>label_width$} │"));
        for x in 0..i64::from(scene.columns) {
            output.push_str(&scene.cell(x, y, palette));
            output.push('│');
        }
        output.push('\n');

        if y > 0 {
            output.push_str(&border("├", "┼", "┤"));
        }
    }
    output.push_str(&border("└", "┴", "┘"));

    output.push_str(&margin);
    for x in 0..scene.columns {
        output.push_str(&format!(" {x:^3}"));
    }
    output.push('\n');

    output
}

/// Draws the grid preceded by a line announcing the rover's starting state.
#[must_use]
pub fn draw_initial_grid(scene: &Scene, palette: &Palette) -> String {
    let rover = scene.rover;
    let header = format!(
        "{}, {}, {}",
        rover.position.x(),
        rover.position.y(),
        rover.direction
    );
    format!(
        "Initial Position: {}\n\n{}",
        palette.rover.paint(&header),
        draw_grid(scene, palette)
    )
}

/// Rendering backend capable of presenting rover scenes.
pub trait RenderingBackend {
    /// Presents the scene before any command has run.
    fn present_initial(&mut self, scene: &Scene) -> AnyResult<()>;

    /// Presents the scene after a command sequence completed.
    fn present(&mut self, scene: &Scene) -> AnyResult<()>;
}

/// Backend that writes drawings to any byte sink, typically stdout.
#[derive(Debug)]
pub struct TerminalBackend<W> {
    sink: W,
    palette: Palette,
}

impl<W: Write> TerminalBackend<W> {
    /// Creates a backend drawing into `sink`.
    #[must_use]
    pub const fn new(sink: W, palette: Palette) -> Self {
        Self { sink, palette }
    }

    /// Releases the underlying sink.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.sink
    }

    fn emit(&mut self, drawing: &str) -> AnyResult<()> {
        self.sink
            .write_all(drawing.as_bytes())
            .and_then(|()| self.sink.flush())
            .context("failed to write grid drawing")
    }
}

impl<W: Write> RenderingBackend for TerminalBackend<W> {
    fn present_initial(&mut self, scene: &Scene) -> AnyResult<()> {
        let drawing = draw_initial_grid(scene, &self.palette);
        self.emit(&drawing)
    }

    fn present(&mut self, scene: &Scene) -> AnyResult<()> {
        let drawing = format!("{}\n{}", scene.rover(), draw_grid(scene, &self.palette));
        self.emit(&drawing)
    }
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq, Eq)]
pub enum RenderingError {
    /// The grid has more cells along an axis than a terminal can show.
    GridTooLarge {
        /// Requested number of columns.
        columns: u32,
        /// Requested number of rows.
        rows: u32,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GridTooLarge { columns, rows } => {
                write!(
                    f,
                    "grid {columns}x{rows} exceeds the drawable limit of {MAX_DRAWABLE_CELLS} cells per axis"
                )
            }
        }
    }
}

impl Error for RenderingError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(x: i64, y: i64, direction: Direction, blocked: bool) -> Report {
        Report {
            position: Position::new(x, y),
            direction,
            blocked,
        }
    }

    fn scene(width: u32, height: u32, rover: Report, obstacles: &[(i64, i64)]) -> Scene {
        Scene::new(
            GridSize::new(width, height).expect("valid grid"),
            rover,
            obstacles.iter().map(|&(x, y)| Position::new(x, y)).collect(),
        )
        .expect("drawable grid")
    }

    #[test]
    fn draws_plain_grid_with_rover_and_obstacles() {
        let scene = scene(
            3,
            2,
            report(0, 0, Direction::North, false),
            &[(2, 1), (7, 7)],
        );

        let drawing = draw_grid(&scene, &Palette::plain());

        let expected = concat!(
            "  ┌───┬───┬───┐\n",
            "1 │   │   │ ■ │\n",
            "  ├───┼───┼───┤\n",
            "0 │ ▲ │   │   │\n",
            "  └───┴───┴───┘\n",
            "    0   1   2 \n",
        );
        assert_eq!(drawing, expected);
    }

    #[test]
    fn rover_glyph_follows_heading() {
        for direction in Direction::ALL {
            let scene = scene(1, 1, report(0, 0, direction, false), &[]);
            let drawing = draw_grid(&scene, &Palette::plain());
            assert!(drawing.contains(heading_glyph(direction)));
        }
    }

    #[test]
    fn ansi_palette_colors_rover_by_outcome() {
        let clear = scene(2, 2, report(1, 1, Direction::East, false), &[]);
        let blocked = scene(2, 2, report(1, 1, Direction::East, true), &[]);

        assert!(draw_grid(&clear, &Palette::ansi()).contains("\x1b[32m▶\x1b[0m"));
        assert!(draw_grid(&blocked, &Palette::ansi()).contains("\x1b[31m▶\x1b[0m"));
    }

    #[test]
    fn plain_palette_emits_no_escape_sequences() {
        let scene = scene(4, 3, report(2, 2, Direction::West, true), &[(0, 0)]);

        assert!(!draw_grid(&scene, &Palette::plain()).contains('\x1b'));
    }

    #[test]
    fn row_labels_are_padded_for_tall_grids() {
        let scene = scene(1, 12, report(0, 0, Direction::South, false), &[]);
        let drawing = draw_grid(&scene, &Palette::plain());

        assert!(drawing.starts_with("   ┌───┐\n11 │   │\n"));
        assert!(drawing.contains("\n 0 │ ▼ │\n"));
    }

    #[test]
    fn initial_grid_announces_start() {
        let scene = scene(2, 1, report(0, 0, Direction::North, false), &[]);
        let drawing = draw_initial_grid(&scene, &Palette::plain());

        assert!(drawing.starts_with("Initial Position: 0, 0, N\n\n  ┌"));
    }

    #[test]
    fn scene_rejects_oversized_grids() {
        let grid = GridSize::new(MAX_DRAWABLE_CELLS + 1, 4).expect("valid grid");
        let error = Scene::new(grid, report(0, 0, Direction::North, false), Vec::new())
            .expect_err("oversized grid");

        assert_eq!(
            error,
            RenderingError::GridTooLarge {
                columns: MAX_DRAWABLE_CELLS + 1,
                rows: 4
            }
        );
    }

    #[test]
    fn terminal_backend_writes_report_and_grid() {
        let scene = scene(2, 1, report(1, 0, Direction::West, true), &[]);
        let mut backend = TerminalBackend::new(Vec::new(), Palette::plain());

        backend.present(&scene).expect("write to vec");
        let written = String::from_utf8(backend.into_inner()).expect("utf-8 output");

        assert!(written.starts_with("O:1:0:W\n  ┌───┬───┐\n"));
    }
}
