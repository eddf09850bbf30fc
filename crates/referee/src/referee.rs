//! Move adjudication for a stored game.
//!
//! The referee is the engine's caller: it validates coordinates, decides
//! whether the mover is the restricted side, marks restriction breaches as
//! illegal and reads the outcome off the winning lines.

use renju_core::history;
use renju_core::{
    find_winning_lines, Color, Evaluator, GameRecord, GameState, Line, Move, Point, Violations,
    WinLine, FIVE,
};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::RefereeConfig;
use crate::error::RefereeError;

/// Largest accepted board side.
pub const MAX_BOARD_SIDE: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "camelCase")]
pub enum Outcome {
    Ongoing,
    Win { color: Color, lines: Vec<Line> },
    Forfeit { winner: Color },
    Draw,
}

impl Outcome {
    pub fn is_decided(&self) -> bool {
        !matches!(self, Outcome::Ongoing)
    }
}

/// Result of adjudicating one move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Verdict {
    pub violations: Violations,
    pub illegal: bool,
    pub outcome: Outcome,
}

#[derive(Debug, Clone, Copy)]
pub struct Referee {
    restricted: Option<Color>,
    search_depth: u8,
}

impl Referee {
    pub fn new(config: &RefereeConfig) -> Self {
        Self {
            restricted: config.restricted,
            search_depth: config.search_depth,
        }
    }

    /// Play `(row, col)` for the side to move and store the new history.
    pub fn play(&self, game: &mut GameRecord, row: usize, col: usize) -> Result<Verdict, RefereeError> {
        check_dimensions(game.rows, game.cols)?;
        check_to_win(game.to_win)?;
        validate_history(&game.move_history, game.rows, game.cols)?;
        if self.outcome(game).is_decided() {
            return Err(RefereeError::GameOver);
        }
        check_in_bounds(row, col, game.rows, game.cols)?;
        let mv = Move::new(row, col);
        if game.move_history.iter().any(|played| played.same_cell(&mv)) {
            return Err(RefereeError::Occupied { row, col });
        }

        let mover = Color::for_ply(game.move_history.len());
        let mut history = game.move_history.clone();
        history.push(mv);

        let (violations, makes_five) = self.judge(mover, &history, game);
        if makes_five && violations.breaches(&game.restrictions) {
            debug!(row, col, ?violations, "Exact five overrides restrictions");
        }
        let illegal = !makes_five && violations.breaches(&game.restrictions);
        if illegal {
            warn!(row, col, ?mover, ?violations, "Move breaks an enabled restriction");
            if let Some(last) = history.last_mut() {
                *last = last.marked_illegal();
            }
        }

        game.accept_history(history);
        let outcome = self.outcome(game);
        info!(row, col, ?mover, illegal, ?outcome, "Move adjudicated");

        Ok(Verdict {
            violations,
            illegal,
            outcome,
        })
    }

    /// Violations of the last move of `history` and whether that move
    /// completes an exact five. Only the restricted side is judged.
    fn judge(&self, mover: Color, history: &[Move], game: &GameRecord) -> (Violations, bool) {
        if self.restricted != Some(mover) {
            return (Violations::default(), false);
        }
        let state = GameState::build(game.rows, game.cols, history.to_vec());
        let makes_five = state.last_move().is_some_and(|last| {
            state
                .lines_at(Point::from(*last))
                .any(|line| line.length == FIVE)
        });
        let violations = Evaluator::new(game.restrictions)
            .with_depth(self.search_depth)
            .check(&state);
        (violations, makes_five)
    }

    /// Whether the stored game is won, forfeited, drawn or still going.
    pub fn outcome(&self, game: &GameRecord) -> Outcome {
        let result = find_winning_lines(&game.move_history, game.rows, game.cols, game.to_win);
        let mut runs = Vec::new();
        for entry in result.win_lines {
            match entry {
                WinLine::Forfeit { color, .. } => return Outcome::Forfeit { winner: color },
                WinLine::Run(line) => runs.push(line),
            }
        }

        match runs.first() {
            Some(first) => {
                let color = first.color;
                debug!(?color, lines = runs.len(), "Winning lines found");
                Outcome::Win { color, lines: runs }
            }
            None if result.board.is_full() => Outcome::Draw,
            None => Outcome::Ongoing,
        }
    }
}

/// Reject empty boards and boards past `MAX_BOARD_SIDE`.
pub fn check_dimensions(rows: usize, cols: usize) -> Result<(), RefereeError> {
    if (1..=MAX_BOARD_SIDE).contains(&rows) && (1..=MAX_BOARD_SIDE).contains(&cols) {
        Ok(())
    } else {
        Err(RefereeError::InvalidBoard { rows, cols })
    }
}

pub fn check_to_win(to_win: usize) -> Result<(), RefereeError> {
    if to_win == 0 {
        Err(RefereeError::InvalidToWin(to_win))
    } else {
        Ok(())
    }
}

pub(crate) fn check_in_bounds(row: usize, col: usize, rows: usize, cols: usize) -> Result<(), RefereeError> {
    if row < rows && col < cols {
        Ok(())
    } else {
        Err(RefereeError::OutOfBounds { row, col, rows, cols })
    }
}

/// Reject histories the engine must never see: off-board moves and repeated
/// cells.
pub fn validate_history(history: &[Move], rows: usize, cols: usize) -> Result<(), RefereeError> {
    for mv in history {
        check_in_bounds(mv.row, mv.col, rows, cols)?;
    }
    if let Some(&index) = history::duplicates(history).first() {
        let mv = history[index];
        return Err(RefereeError::DuplicateMove {
            row: mv.row,
            col: mv.col,
            ply: index + 1,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use renju_core::Restrictions;

    fn game(coords: &[(usize, usize)], restrictions: Restrictions) -> GameRecord {
        let mut game = GameRecord::new(15, 15, 5, restrictions);
        game.move_history = coords.iter().map(|&(r, c)| Move::new(r, c)).collect();
        game
    }

    fn referee() -> Referee {
        Referee::new(&RefereeConfig {
            workers: 1,
            ..RefereeConfig::default()
        })
    }

    #[test]
    fn test_plain_move_is_ongoing() {
        let mut g = game(&[], Restrictions::ALL);
        let verdict = referee().play(&mut g, 7, 7).unwrap();
        assert_eq!(verdict.outcome, Outcome::Ongoing);
        assert!(!verdict.illegal);
        assert_eq!(g.move_history, vec![Move::new(7, 7)]);
    }

    #[test]
    fn test_rejects_bad_targets() {
        let mut g = game(&[(7, 7)], Restrictions::ALL);
        assert!(matches!(
            referee().play(&mut g, 7, 7),
            Err(RefereeError::Occupied { row: 7, col: 7 })
        ));
        assert!(matches!(
            referee().play(&mut g, 15, 0),
            Err(RefereeError::OutOfBounds { .. })
        ));
        assert_eq!(g.move_history.len(), 1);
    }

    #[test]
    fn test_rejects_duplicate_history() {
        let mut g = game(&[(7, 7), (7, 8), (7, 7)], Restrictions::ALL);
        assert!(matches!(
            referee().play(&mut g, 0, 0),
            Err(RefereeError::DuplicateMove { row: 7, col: 7, ply: 3 })
        ));
    }

    #[test]
    fn test_five_wins_and_ends_game() {
        let mut g = game(
            &[(7, 3), (0, 0), (7, 4), (0, 2), (7, 5), (0, 4), (7, 6), (0, 6)],
            Restrictions::ALL,
        );
        let verdict = referee().play(&mut g, 7, 7).unwrap();
        match verdict.outcome {
            Outcome::Win { color, ref lines } => {
                assert_eq!(color, Color::Black);
                assert_eq!(lines.len(), 1);
                assert_eq!(lines[0].length, 5);
            }
            ref other => panic!("expected a win, got {other:?}"),
        }
        assert!(matches!(referee().play(&mut g, 9, 9), Err(RefereeError::GameOver)));
    }

    #[test]
    fn test_full_board_is_draw() {
        let mut g = GameRecord::new(1, 2, 5, Restrictions::NONE);
        referee().play(&mut g, 0, 0).unwrap();
        let verdict = referee().play(&mut g, 0, 1).unwrap();
        assert_eq!(verdict.outcome, Outcome::Draw);
    }

    const BEFORE_DOUBLE_THREE: [(usize, usize); 8] = [
        (6, 7), (1, 3), (5, 7), (1, 4), (6, 8), (1, 5), (5, 9), (1, 6),
    ];

    #[test]
    fn test_double_three_forfeits_when_restricted() {
        let mut g = game(&BEFORE_DOUBLE_THREE, Restrictions::ALL);
        let verdict = referee().play(&mut g, 7, 7).unwrap();
        assert!(verdict.violations.three_three);
        assert!(verdict.illegal);
        assert_eq!(verdict.outcome, Outcome::Forfeit { winner: Color::White });
        assert!(g.move_history[8].illegal);
        assert!(matches!(referee().play(&mut g, 0, 0), Err(RefereeError::GameOver)));
    }

    #[test]
    fn test_double_three_allowed_when_unrestricted() {
        let restrictions = Restrictions {
            three_three: false,
            ..Restrictions::ALL
        };
        let mut g = game(&BEFORE_DOUBLE_THREE, restrictions);
        let verdict = referee().play(&mut g, 7, 7).unwrap();
        assert!(verdict.violations.three_three);
        assert!(!verdict.illegal);
        assert_eq!(verdict.outcome, Outcome::Ongoing);
        assert!(!g.move_history[8].illegal);
    }

    #[test]
    fn test_exact_five_wins_despite_overline() {
        // (7,7) completes a five on row 7 and a six on column 7.
        let blacks = [(7, 3), (7, 4), (7, 5), (7, 6), (3, 7), (4, 7), (5, 7), (6, 7), (8, 7)];
        let whites = [(0, 0), (0, 2), (0, 4), (0, 6), (0, 8), (0, 10), (0, 12), (0, 14), (14, 0)];
        let coords: Vec<(usize, usize)> = blacks
            .iter()
            .zip(whites.iter())
            .flat_map(|(b, w)| [*b, *w])
            .collect();
        let mut g = game(&coords, Restrictions::ALL);
        let verdict = referee().play(&mut g, 7, 7).unwrap();
        assert!(verdict.violations.overline);
        assert!(!verdict.illegal);
        assert!(!g.move_history[18].illegal);
        assert!(matches!(verdict.outcome, Outcome::Win { color: Color::Black, .. }));
    }

    #[test]
    fn test_rejects_bad_game_settings() {
        let mut g = GameRecord::new(usize::MAX, 2, 5, Restrictions::ALL);
        assert!(matches!(
            referee().play(&mut g, 0, 0),
            Err(RefereeError::InvalidBoard { .. })
        ));
        let mut g = GameRecord::new(0, 15, 5, Restrictions::ALL);
        assert!(matches!(
            referee().play(&mut g, 0, 0),
            Err(RefereeError::InvalidBoard { rows: 0, cols: 15 })
        ));
        let mut g = GameRecord::new(15, 15, 0, Restrictions::ALL);
        assert!(matches!(
            referee().play(&mut g, 7, 7),
            Err(RefereeError::InvalidToWin(0))
        ));
        assert!(g.move_history.is_empty());
    }

    #[test]
    fn test_unrestricted_side_is_never_checked() {
        // White builds a double three shape; only Black is restricted.
        let mut g = game(
            &[(1, 3), (6, 7), (1, 4), (5, 7), (1, 5), (6, 8), (1, 7), (5, 9), (1, 11)],
            Restrictions::ALL,
        );
        let verdict = referee().play(&mut g, 7, 7).unwrap();
        assert_eq!(verdict.violations, Violations::default());
        assert!(!verdict.illegal);
    }
}
