//! Forbidden-move rules: move availability, three/four classification and
//! violation reporting for the most recent move.
//!
//! Availability is decided by playing the candidate on a rebuilt state and
//! checking what that state violates. Classification in turn asks whether
//! the cells around a line are available, so the two recurse into each
//! other. `Evaluator::depth` bounds that recursion: at depth 0 a hypothetical
//! state is judged on its unclassified lines (the five override and overline
//! only); each extra level classifies the hypothetical state too.

use tracing::{debug, trace};

use crate::board::{Direction, Point};
use crate::game_data::{Restrictions, Violations};
use crate::lines::{self, Line, LineKind};
use crate::state::GameState;

/// Run length that wins under the restriction rules. Anything longer is an
/// overline.
pub const FIVE: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Evaluator {
    restrictions: Restrictions,
    depth: u8,
}

impl Evaluator {
    pub fn new(restrictions: Restrictions) -> Self {
        Self {
            restrictions,
            depth: 0,
        }
    }

    /// Number of speculative levels that are themselves classified.
    pub fn with_depth(self, depth: u8) -> Self {
        Self { depth, ..self }
    }

    pub fn restrictions(&self) -> &Restrictions {
        &self.restrictions
    }

    pub fn depth(&self) -> u8 {
        self.depth
    }

    /// Could the side to move play at `point` without breaking an enabled
    /// restriction? Occupied and off-board points never are. A move that
    /// makes a run of exactly five is always available.
    pub fn is_available(&self, point: Point, state: &GameState) -> bool {
        if state.board().get(point).occupied {
            return false;
        }
        let Some(next) = state.play(point) else {
            return false;
        };
        if next.lines().iter().any(|line| line.length == FIVE) {
            return true;
        }

        // Depth guard: below the budget, skip classification so recursion
        // stops here.
        let flags = match self.depth.checked_sub(1) {
            Some(depth) => self.with_depth(depth).check(&next),
            None => violations(&next, next.lines()),
        };
        let available = !flags.breaches(&self.restrictions);
        trace!(row = point.row, col = point.col, depth = self.depth, available, "Probed cell");
        available
    }

    /// Classify one line of `state` as a three, a four, or neither.
    ///
    /// "Gap" is the cell just beyond the line's end, "left" the cell just
    /// before its start. A linked line is the one sitting past the gap.
    pub fn identify(&self, line: &Line, state: &GameState) -> LineKind {
        let direction = line.direction;
        let left = direction.step(line.start, false);
        let gap = direction.step(line.end, true);

        if self.is_available(gap, state) {
            if let Some(linked) = line.after.and_then(|id| state.line(id)) {
                let right = direction.step(linked.end, true);
                match (line.length, linked.length) {
                    // b_bb and bb_b: a three when both outer ends stay open
                    // once the gap is filled
                    (1, 2) | (2, 1) => {
                        if self.open_after(state, gap, left, right) {
                            return LineKind::Three;
                        }
                    }
                    (1, r) if r >= 3 => return LineKind::Four,
                    (2, r) if r >= 2 => return LineKind::Four,
                    (l, _) if l >= 3 => return LineKind::Four,
                    _ => {}
                }
            } else if line.length == 3 {
                let right = direction.step(gap, true);
                if self.open_after(state, gap, left, right) {
                    return LineKind::Three;
                }
                if self.is_available(left, state)
                    && self.open_after(state, left, beyond(direction, left), gap)
                {
                    return LineKind::Three;
                }
            }
        } else if self.is_available(left, state) {
            match line.length {
                3 => {
                    if self.open_after(state, left, beyond(direction, left), gap) {
                        return LineKind::Three;
                    }
                }
                4 => return LineKind::Four,
                _ => {}
            }
        }
        LineKind::Other
    }

    /// With `fill` played, are `a` and `b` both available?
    fn open_after(&self, state: &GameState, fill: Point, a: Point, b: Point) -> bool {
        state
            .play(fill)
            .is_some_and(|filled| self.is_available(a, &filled) && self.is_available(b, &filled))
    }

    /// Copies of every line of `state` with its kind filled in.
    pub fn identify_all(&self, state: &GameState) -> Vec<Line> {
        state
            .lines()
            .iter()
            .map(|line| Line {
                kind: Some(self.identify(line, state)),
                ..line.clone()
            })
            .collect()
    }

    /// Violations of the most recent move in `state`. Only the lines that
    /// can count toward a double three or four are classified.
    pub fn check(&self, state: &GameState) -> Violations {
        let relevant: Vec<_> = candidates(state, state.lines())
            .into_iter()
            .map(|line| line.id)
            .collect();
        let classified: Vec<Line> = state
            .lines()
            .iter()
            .map(|line| {
                let mut line = line.clone();
                if relevant.contains(&line.id) {
                    line.kind = Some(self.identify(&line, state));
                    debug!(line = line.id.0, length = line.length, kind = ?line.kind, "Classified line");
                }
                line
            })
            .collect();
        violations(state, &classified)
    }
}

/// The next cell outward from `point`, away from the line.
fn beyond(direction: Direction, point: Point) -> Point {
    direction.step(point, false)
}

/// Flags for the most recent move of `state`, read from `lines` (the state's
/// lines, classified or not). Overline looks at the whole board; the double
/// shapes look only at the lines through the last stone plus any line linked
/// behind them that is not already four long.
pub fn violations(state: &GameState, lines: &[Line]) -> Violations {
    let overline = lines.iter().any(|line| line.length > FIVE);
    let candidates = candidates(state, lines);
    let count = |kind: LineKind| {
        candidates
            .iter()
            .filter(|line| line.kind == Some(kind))
            .count()
    };
    Violations {
        overline,
        three_three: count(LineKind::Three) >= 2,
        four_four: count(LineKind::Four) >= 2,
    }
}

fn candidates<'a>(state: &GameState, lines: &'a [Line]) -> Vec<&'a Line> {
    let Some(last) = state.last_move() else {
        return Vec::new();
    };
    let cell = state.board().get(Point::from(*last));
    if cell.color.is_none() {
        return Vec::new();
    }

    let through: Vec<&Line> = Direction::ALL
        .into_iter()
        .filter_map(|direction| cell.run(direction))
        .filter_map(|id| lines::find(lines, id))
        .collect();
    let behind: Vec<&Line> = through
        .iter()
        .filter_map(|line| line.before)
        .filter_map(|id| lines::find(lines, id))
        .filter(|line| line.length != 4)
        .collect();

    through.into_iter().chain(behind).collect()
}
