//! Game state reconstructed from a move history.

use crate::board::{Board, Direction, Point};
use crate::game_data::{Color, Move};
use crate::lines::{self, Line, LineId};

/// Board, lines and history for one position. Built fresh from a history and
/// never edited afterwards; a hypothetical move produces a new state.
#[derive(Debug, Clone)]
pub struct GameState {
    rows: usize,
    cols: usize,
    history: Vec<Move>,
    board: Board,
    lines: Vec<Line>,
}

impl GameState {
    /// Project the history, scan its lines, then link lines across gaps.
    pub fn build(rows: usize, cols: usize, history: Vec<Move>) -> Self {
        let mut board = Board::project(rows, cols, &history);
        let mut lines = lines::scan(&mut board, &history);
        lines::link(&board, &mut lines);
        Self {
            rows,
            cols,
            history,
            board,
            lines,
        }
    }

    /// The state after appending a stone at `point`, or `None` for a
    /// coordinate that cannot be a move.
    pub fn play(&self, point: Point) -> Option<GameState> {
        let mv = point.to_move()?;
        let mut history = Vec::with_capacity(self.history.len() + 1);
        history.extend_from_slice(&self.history);
        history.push(mv);
        Some(Self::build(self.rows, self.cols, history))
    }

    /// Side to move next.
    pub fn turn(&self) -> Color {
        Color::for_ply(self.history.len())
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn history(&self) -> &[Move] {
        &self.history
    }

    pub fn last_move(&self) -> Option<&Move> {
        self.history.last()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn line(&self, id: LineId) -> Option<&Line> {
        lines::find(&self.lines, id)
    }

    /// The lines running through `point`, one per direction.
    pub fn lines_at(&self, point: Point) -> impl Iterator<Item = &Line> + '_ {
        let cell = self.board.get(point);
        Direction::ALL
            .into_iter()
            .filter_map(move |direction| cell.run(direction))
            .filter_map(|id| self.line(id))
    }

    pub fn into_parts(self) -> (Board, Vec<Line>) {
        (self.board, self.lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(coords: &[(usize, usize)]) -> GameState {
        GameState::build(15, 15, coords.iter().map(|&(r, c)| Move::new(r, c)).collect())
    }

    #[test]
    fn test_turn_follows_history_parity() {
        assert_eq!(state(&[]).turn(), Color::Black);
        assert_eq!(state(&[(7, 7)]).turn(), Color::White);
        assert_eq!(state(&[(7, 7), (7, 8)]).turn(), Color::Black);
    }

    #[test]
    fn test_play_returns_new_state() {
        let before = state(&[(7, 7)]);
        let after = before.play(Point::new(7, 8)).unwrap();
        assert_eq!(before.history().len(), 1);
        assert_eq!(after.history().len(), 2);
        assert_eq!(after.board().get(Point::new(7, 8)).color, Some(Color::White));
        assert!(before.play(Point::new(-1, 3)).is_none());
    }

    #[test]
    fn test_lines_at_covers_each_direction() {
        let s = state(&[(7, 7), (0, 0), (7, 8)]);
        let through: Vec<&Line> = s.lines_at(Point::new(7, 8)).collect();
        assert_eq!(through.len(), 4);
        assert_eq!(through[0].direction, Direction::Horizontal);
        assert_eq!(through[0].length, 2);
        assert_eq!(s.lines_at(Point::new(3, 3)).count(), 0);
    }

    #[test]
    fn test_every_stone_in_four_lines() {
        let s = state(&[(5, 4), (1, 8), (5, 5), (2, 9), (5, 6), (4, 11), (5, 8)]);
        for mv in s.history() {
            let cell = s.board().get(Point::from(*mv));
            for direction in Direction::ALL {
                let line = s.line(cell.run(direction).unwrap()).unwrap();
                assert!(line.length >= 1);
                assert_eq!(line.direction, direction);
            }
        }
    }
}
