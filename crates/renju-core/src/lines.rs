//! Line discovery and gap linking.
//!
//! A line is a maximal run of same-colored stones along one axis. Every
//! stone belongs to exactly one line per direction.

use serde::{Deserialize, Serialize};

use crate::board::{Board, Direction, Point};
use crate::game_data::{Color, Move};

/// 1-based id of a line within one reconstructed state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineId(pub usize);

/// Shape a line forms for restriction purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineKind {
    Three,
    Four,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Line {
    #[serde(rename = "lineNum")]
    pub id: LineId,
    pub color: Color,
    pub length: usize,
    #[serde(rename = "lineDirection")]
    pub direction: Direction,
    pub start: Point,
    pub end: Point,
    /// Nearest same-colored line two steps behind `start`.
    #[serde(rename = "lineBefore", skip_serializing_if = "Option::is_none")]
    pub before: Option<LineId>,
    /// Nearest same-colored line two steps beyond `end`.
    #[serde(rename = "lineAfter", skip_serializing_if = "Option::is_none")]
    pub after: Option<LineId>,
    #[serde(rename = "lineType", skip_serializing_if = "Option::is_none")]
    pub kind: Option<LineKind>,
}

/// Find every line on `board`, tagging each member cell with its line id.
///
/// Moves are visited in history order and a cell already tagged for a
/// direction is skipped, so each line is found once and ids are stable for
/// a given history.
pub fn scan(board: &mut Board, history: &[Move]) -> Vec<Line> {
    let mut lines = Vec::new();
    for mv in history {
        let root = Point::from(*mv);
        for direction in Direction::ALL {
            let cell = board.get(root);
            if cell.run(direction).is_some() {
                continue;
            }
            let Some(color) = cell.color else {
                continue;
            };
            let id = LineId(lines.len() + 1);
            lines.push(trace(board, root, color, id, direction));
        }
    }
    lines
}

fn trace(board: &mut Board, root: Point, color: Color, id: LineId, direction: Direction) -> Line {
    let mut length = 0;

    let mut cursor = root;
    while board.get(cursor).color == Some(color) {
        length += 1;
        board.tag(cursor, direction, id);
        cursor = direction.step(cursor, true);
    }
    let end = direction.step(cursor, false);

    cursor = direction.step(root, false);
    while board.get(cursor).color == Some(color) {
        length += 1;
        board.tag(cursor, direction, id);
        cursor = direction.step(cursor, false);
    }
    let start = direction.step(cursor, true);

    Line {
        id,
        color,
        length,
        direction,
        start,
        end,
        before: None,
        after: None,
        kind: None,
    }
}

/// Fill in `before`/`after` for every line: the same-colored line whose
/// nearest stone sits two steps beyond the line's end along its own axis.
/// The cell in between is not inspected.
pub fn link(board: &Board, lines: &mut [Line]) {
    for line in lines.iter_mut() {
        let direction = line.direction;
        let after = direction.step(direction.step(line.end, true), true);
        let before = direction.step(direction.step(line.start, false), false);
        line.after = neighbor(board, after, line.color, direction);
        line.before = neighbor(board, before, line.color, direction);
    }
}

fn neighbor(board: &Board, point: Point, color: Color, direction: Direction) -> Option<LineId> {
    if !board.contains(point) {
        return None;
    }
    let cell = board.get(point);
    if cell.color == Some(color) {
        cell.run(direction)
    } else {
        None
    }
}

/// Look a line up by id in a list kept in id order.
pub fn find(lines: &[Line], id: LineId) -> Option<&Line> {
    let index = id.0.checked_sub(1)?;
    lines
        .get(index)
        .filter(|line| line.id == id)
        .or_else(|| lines.iter().find(|line| line.id == id))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scanned(rows: usize, cols: usize, coords: &[(usize, usize)]) -> (Board, Vec<Line>) {
        let history: Vec<Move> = coords.iter().map(|&(r, c)| Move::new(r, c)).collect();
        let mut board = Board::project(rows, cols, &history);
        let mut lines = scan(&mut board, &history);
        link(&board, &mut lines);
        (board, lines)
    }

    #[test]
    fn test_single_stone_has_four_lines() {
        let (board, lines) = scanned(15, 15, &[(7, 7)]);
        assert_eq!(lines.len(), 4);
        let cell = board.get(Point::new(7, 7));
        for (i, direction) in Direction::ALL.into_iter().enumerate() {
            assert_eq!(cell.run(direction), Some(LineId(i + 1)));
            assert_eq!(lines[i].length, 1);
            assert_eq!(lines[i].start, lines[i].end);
        }
    }

    #[test]
    fn test_run_found_once_from_any_member() {
        // Black at (3,2), (3,4), (3,3) joined horizontally; white elsewhere.
        let (board, lines) = scanned(9, 9, &[(3, 2), (0, 0), (3, 4), (0, 8), (3, 3)]);
        let horizontal: Vec<&Line> = lines
            .iter()
            .filter(|l| l.direction == Direction::Horizontal && l.color == Color::Black)
            .collect();
        assert_eq!(horizontal.len(), 1);

        let id = board.get(Point::new(3, 2)).run(Direction::Horizontal).unwrap();
        assert_eq!(board.get(Point::new(3, 3)).run(Direction::Horizontal), Some(id));
        assert_eq!(board.get(Point::new(3, 4)).run(Direction::Horizontal), Some(id));
        let run = find(&lines, id).unwrap();
        assert_eq!(run.length, 3);
        assert_eq!(run.start, Point::new(3, 2));
        assert_eq!(run.end, Point::new(3, 4));
    }

    #[test]
    fn test_diagonal_endpoints() {
        // Positive diagonal: forward is up-right.
        let (_, lines) = scanned(9, 9, &[(4, 4), (0, 0), (3, 5), (0, 8), (5, 3)]);
        let diag = lines
            .iter()
            .find(|l| l.direction == Direction::Positive && l.color == Color::Black)
            .unwrap();
        assert_eq!(diag.length, 3);
        assert_eq!(diag.start, Point::new(5, 3));
        assert_eq!(diag.end, Point::new(3, 5));
    }

    #[test]
    fn test_edge_runs_stop_at_boundary() {
        let (_, lines) = scanned(5, 5, &[(0, 0), (4, 4), (0, 1)]);
        let top = &lines[0];
        assert_eq!(top.direction, Direction::Horizontal);
        assert_eq!(top.length, 2);
        assert_eq!(top.start, Point::new(0, 0));
        assert_eq!(top.end, Point::new(0, 1));
        assert_eq!(top.before, None);
    }

    #[test]
    fn test_link_across_single_gap_is_symmetric() {
        let (_, lines) = scanned(15, 15, &[(5, 4), (0, 0), (5, 5), (0, 2), (5, 7)]);
        let left = &lines[0];
        assert_eq!(left.length, 2);
        let right = find(&lines, left.after.unwrap()).unwrap();
        assert_eq!(right.start, Point::new(5, 7));
        assert_eq!(right.before, Some(left.id));
    }

    #[test]
    fn test_no_link_across_two_cells() {
        let (_, lines) = scanned(15, 15, &[(5, 4), (0, 0), (5, 7)]);
        assert!(lines.iter().all(|l| l.before.is_none() && l.after.is_none()));
    }

    #[test]
    fn test_ids_sequential_on_full_board() {
        let coords: Vec<(usize, usize)> = (0..19).flat_map(|r| (0..19).map(move |c| (r, c))).collect();
        let (_, lines) = scanned(19, 19, &coords);
        for (i, line) in lines.iter().enumerate() {
            assert_eq!(line.id, LineId(i + 1));
        }
        let total: usize = lines.iter().map(|l| l.length).sum();
        assert_eq!(total, 19 * 19 * 4);
    }

    #[test]
    fn test_find_handles_missing_ids() {
        let (_, lines) = scanned(15, 15, &[(7, 7)]);
        assert!(find(&lines, LineId(0)).is_none());
        assert!(find(&lines, LineId(99)).is_none());
        assert_eq!(find(&lines, LineId(3)).unwrap().direction, Direction::Positive);
    }
}
