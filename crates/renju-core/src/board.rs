//! Board projection: one cell per coordinate, colored by ply parity.
//!
//! Coordinates outside the grid resolve to a synthetic occupied, colorless
//! cell, so a scan walking off the edge stops on the same color test that
//! stops it at an opponent stone or an empty point.

use serde::{Deserialize, Serialize, Serializer};
use tracing::warn;

use crate::game_data::{Color, Move};
use crate::lines::LineId;

/// A signed board coordinate. Probes may step off the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub row: isize,
    pub col: isize,
}

impl Point {
    pub fn new(row: isize, col: isize) -> Self {
        Self { row, col }
    }

    /// The move placing a stone here, if the coordinate is non-negative.
    pub fn to_move(self) -> Option<Move> {
        let row = usize::try_from(self.row).ok()?;
        let col = usize::try_from(self.col).ok()?;
        Some(Move::new(row, col))
    }
}

impl From<Move> for Point {
    fn from(mv: Move) -> Self {
        Self {
            row: isize::try_from(mv.row).unwrap_or(isize::MAX),
            col: isize::try_from(mv.col).unwrap_or(isize::MAX),
        }
    }
}

/// The four line axes. Forward is toward increasing column, except for
/// `Vertical` where it is toward increasing row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Horizontal,
    Vertical,
    /// Rising diagonal: forward goes up a row and right a column.
    Positive,
    /// Falling diagonal: forward goes down a row and right a column.
    Negative,
}

impl Direction {
    /// Scan order. Line ids depend on it.
    pub const ALL: [Direction; 4] = [
        Direction::Horizontal,
        Direction::Vertical,
        Direction::Positive,
        Direction::Negative,
    ];

    pub fn index(self) -> usize {
        match self {
            Direction::Horizontal => 0,
            Direction::Vertical => 1,
            Direction::Positive => 2,
            Direction::Negative => 3,
        }
    }

    fn delta(self) -> (isize, isize) {
        match self {
            Direction::Horizontal => (0, 1),
            Direction::Vertical => (1, 0),
            Direction::Positive => (-1, 1),
            Direction::Negative => (1, 1),
        }
    }

    /// One step along this axis, forwards or backwards.
    pub fn step(self, point: Point, forward: bool) -> Point {
        let (dr, dc) = self.delta();
        let sign = if forward { 1 } else { -1 };
        Point {
            row: point.row + dr * sign,
            col: point.col + dc * sign,
        }
    }
}

/// What fills one intersection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
    pub occupied: bool,
    #[serde(serialize_with = "color_or_none")]
    pub color: Option<Color>,
    /// 1-based ply at which the stone was played.
    #[serde(rename = "moveNum", skip_serializing_if = "Option::is_none")]
    pub ply: Option<usize>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub illegal: bool,
    /// Line id per direction, indexed by `Direction::index`.
    #[serde(rename = "lines")]
    pub runs: [Option<LineId>; 4],
}

/// Empty and off-board cells carry the color `"none"` on the wire.
fn color_or_none<S: Serializer>(color: &Option<Color>, serializer: S) -> Result<S::Ok, S::Error> {
    match color {
        Some(color) => color.serialize(serializer),
        None => serializer.serialize_str("none"),
    }
}

impl Cell {
    /// The cell reported for any coordinate off the board.
    pub const OFF_BOARD: Cell = Cell {
        occupied: true,
        color: None,
        ply: None,
        illegal: false,
        runs: [None; 4],
    };

    pub fn run(&self, direction: Direction) -> Option<LineId> {
        self.runs[direction.index()]
    }
}

/// Occupancy grid rebuilt from a move history. Owned by the state that
/// projected it; line tagging happens on this copy only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl Board {
    pub fn empty(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![Cell::default(); rows * cols],
        }
    }

    /// Place every move of `history`, coloring by index parity.
    ///
    /// A move targeting an already used cell keeps the later stone; the
    /// repeat is logged rather than rejected. Off-board entries are skipped.
    pub fn project(rows: usize, cols: usize, history: &[Move]) -> Self {
        let mut board = Self::empty(rows, cols);
        for (index, mv) in history.iter().enumerate() {
            let Some(i) = board.index(Point::from(*mv)) else {
                warn!(row = mv.row, col = mv.col, ply = index + 1, "Move history entry is off the board, skipping");
                continue;
            };
            if board.cells[i].occupied {
                warn!(row = mv.row, col = mv.col, ply = index + 1, "Move history repeats an occupied cell");
            }
            board.cells[i] = Cell {
                occupied: true,
                color: Some(Color::for_ply(index)),
                ply: Some(index + 1),
                illegal: mv.illegal,
                runs: [None; 4],
            };
        }
        board
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn contains(&self, point: Point) -> bool {
        self.index(point).is_some()
    }

    fn index(&self, point: Point) -> Option<usize> {
        let row = usize::try_from(point.row).ok()?;
        let col = usize::try_from(point.col).ok()?;
        (row < self.rows && col < self.cols).then(|| row * self.cols + col)
    }

    /// The cell at `point`, or `Cell::OFF_BOARD` outside the grid.
    pub fn get(&self, point: Point) -> Cell {
        self.index(point)
            .map(|i| self.cells[i])
            .unwrap_or(Cell::OFF_BOARD)
    }

    pub(crate) fn tag(&mut self, point: Point, direction: Direction, id: LineId) {
        if let Some(i) = self.index(point) {
            self.cells[i].runs[direction.index()] = Some(id);
        }
    }

    pub fn stone_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.occupied).count()
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|cell| cell.occupied)
    }

    /// Rows of cells, top to bottom.
    pub fn grid(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.cols.max(1))
    }
}

impl Serialize for Board {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.grid())
    }
}
