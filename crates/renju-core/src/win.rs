//! Winning-line detection.

use serde::Serialize;
use tracing::debug;

use crate::board::Board;
use crate::game_data::{Color, Move};
use crate::lines::{self, Line};

/// `lineNum` carried by the forfeit entry.
pub const FORFEIT_LINE_NUM: i64 = -1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum WinLine {
    Run(Line),
    /// The last move was adjudicated illegal: `color` wins by forfeit.
    Forfeit {
        color: Color,
        #[serde(rename = "lineNum")]
        line_num: i64,
    },
}

impl WinLine {
    pub fn color(&self) -> Color {
        match self {
            WinLine::Run(line) => line.color,
            WinLine::Forfeit { color, .. } => *color,
        }
    }

    pub fn is_forfeit(&self) -> bool {
        matches!(self, WinLine::Forfeit { .. })
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WinningLines {
    pub win_lines: Vec<WinLine>,
    pub board: Board,
}

/// Every run at least `to_win` long. If the last move is marked illegal the
/// result is a single forfeit entry for the other color instead, whatever
/// runs the board shows.
pub fn find_winning_lines(history: &[Move], rows: usize, cols: usize, to_win: usize) -> WinningLines {
    let mut board = Board::project(rows, cols, history);
    let runs = lines::scan(&mut board, history);

    let forfeit = history
        .len()
        .checked_sub(1)
        .filter(|&last| history[last].illegal)
        .map(|last| Color::for_ply(last).opponent());

    let win_lines = match forfeit {
        Some(color) => {
            debug!(winner = ?color, "Last move illegal, awarding forfeit");
            vec![WinLine::Forfeit {
                color,
                line_num: FORFEIT_LINE_NUM,
            }]
        }
        None => runs
            .into_iter()
            .filter(|line| line.length >= to_win)
            .map(WinLine::Run)
            .collect(),
    };

    WinningLines { win_lines, board }
}
