//! Line detection and forbidden-move rules for five-in-a-row games.
//!
//! Everything here is a pure function of a move history: each call rebuilds
//! the board, discovers the same-colored lines in all four directions, links
//! lines separated by a single cell and, where asked, classifies threes and
//! fours to report overline, double-three and double-four violations.
//!
//! The three entry points consumed by the game server are
//! [`compute_lines`], [`check_violations`] and [`find_winning_lines`].

pub mod board;
pub mod game_data;
pub mod history;
pub mod lines;
pub mod rules;
pub mod state;
pub mod win;

use serde::Serialize;

pub use board::{Board, Cell, Direction, Point};
pub use game_data::{Color, GameRecord, Move, Restrictions, Violations};
pub use lines::{Line, LineId, LineKind};
pub use rules::{Evaluator, FIVE};
pub use state::GameState;
pub use win::{find_winning_lines, WinLine, WinningLines};

/// Lines and board for a history.
#[derive(Debug, Clone, Serialize)]
pub struct ComputedLines {
    pub lines: Vec<Line>,
    pub board: Board,
}

/// Every line on the board after `history`, linked across single gaps.
pub fn compute_lines(history: &[Move], rows: usize, cols: usize) -> ComputedLines {
    let (board, lines) = GameState::build(rows, cols, history.to_vec()).into_parts();
    ComputedLines { lines, board }
}

/// Violations created by the last move of `history`.
///
/// The restrictions decide which hypothetical follow-up moves count as
/// available while classifying; they do not filter the flags reported. The
/// engine does not know which color is restricted, so callers decide whether
/// the last move belongs to the restricted side.
pub fn check_violations(
    history: &[Move],
    rows: usize,
    cols: usize,
    restrictions: &Restrictions,
) -> Violations {
    let state = GameState::build(rows, cols, history.to_vec());
    Evaluator::new(*restrictions).check(&state)
}
