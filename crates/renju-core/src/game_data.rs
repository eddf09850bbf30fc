use serde::{Deserialize, Serialize};

use crate::history;

/// Stone color. Black always moves first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Black,
    White,
}

impl Color {
    /// Color of the stone played at a 0-based history index.
    pub fn for_ply(index: usize) -> Self {
        if index % 2 == 0 {
            Color::Black
        } else {
            Color::White
        }
    }

    pub fn opponent(self) -> Self {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
        }
    }
}

/// One entry of a move history. The stone's color is implied by its index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub row: usize,
    pub col: usize,
    /// Set once the move has been adjudicated as a restriction breach.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub illegal: bool,
}

impl Move {
    pub fn new(row: usize, col: usize) -> Self {
        Self {
            row,
            col,
            illegal: false,
        }
    }

    pub fn marked_illegal(self) -> Self {
        Self {
            illegal: true,
            ..self
        }
    }

    pub fn same_cell(&self, other: &Move) -> bool {
        self.row == other.row && self.col == other.col
    }
}

/// Which forbidden shapes block a move. Each toggle is independent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Restrictions {
    pub overline: bool,
    pub three_three: bool,
    pub four_four: bool,
}

impl Restrictions {
    pub const NONE: Restrictions = Restrictions {
        overline: false,
        three_three: false,
        four_four: false,
    };

    pub const ALL: Restrictions = Restrictions {
        overline: true,
        three_three: true,
        four_four: true,
    };
}

/// Forbidden shapes produced by the most recent move.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Violations {
    pub overline: bool,
    pub three_three: bool,
    pub four_four: bool,
}

impl Violations {
    pub fn any(&self) -> bool {
        self.overline || self.three_three || self.four_four
    }

    /// True if any violation is one the restrictions forbid.
    pub fn breaches(&self, restrictions: &Restrictions) -> bool {
        (restrictions.overline && self.overline)
            || (restrictions.three_three && self.three_three)
            || (restrictions.four_four && self.four_four)
    }
}

/// A stored game: board size, winning length, history and restriction set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameRecord {
    pub rows: usize,
    pub cols: usize,
    #[serde(alias = "towin")]
    pub to_win: usize,
    #[serde(default, deserialize_with = "history::deserialize")]
    pub move_history: Vec<Move>,
    #[serde(flatten)]
    pub restrictions: Restrictions,
}

impl GameRecord {
    pub fn new(rows: usize, cols: usize, to_win: usize, restrictions: Restrictions) -> Self {
        Self {
            rows,
            cols,
            to_win,
            move_history: Vec::new(),
            restrictions,
        }
    }

    /// Replace the stored history only if the incoming one is strictly longer.
    /// Returns whether the history was accepted.
    pub fn accept_history(&mut self, history: Vec<Move>) -> bool {
        if history.len() > self.move_history.len() {
            self.move_history = history;
            true
        } else {
            false
        }
    }
}
