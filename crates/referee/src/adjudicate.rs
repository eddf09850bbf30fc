//! JSON request/response envelopes for the batch worker.
//!
//! One request per line, tagged by `op`:
//!
//! ```text
//! {"op":"lines","moveHistory":"7,7;7,8","rows":15,"cols":15}
//! {"op":"violations","moveHistory":[{"row":7,"col":7}],"threeThree":true}
//! {"op":"winLines","moveHistory":"7,3;0,0;7,4","towin":5}
//! {"op":"play","game":{"rows":15,"cols":15,"toWin":5,"moveHistory":""},"row":7,"col":7}
//! ```
//!
//! Omitted `rows`, `cols` and `toWin` fall back to the configured defaults.

use renju_core::history;
use renju_core::{
    compute_lines, find_winning_lines, Color, ComputedLines, Evaluator, GameRecord, GameState,
    Move, Restrictions, Violations, WinningLines,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::RefereeConfig;
use crate::error::RefereeError;
use crate::referee::{check_dimensions, check_to_win, validate_history, Referee, Verdict};

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum Request {
    Lines(HistoryArgs),
    Violations(ViolationsRequest),
    WinLines(WinLinesRequest),
    Play(PlayRequest),
}

/// History plus optional board size.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryArgs {
    #[serde(default, deserialize_with = "history::deserialize")]
    pub move_history: Vec<Move>,
    #[serde(default)]
    pub rows: Option<usize>,
    #[serde(default)]
    pub cols: Option<usize>,
}

impl HistoryArgs {
    /// Board size for the request, checked against the accepted range.
    fn dimensions(&self, config: &RefereeConfig) -> Result<(usize, usize), RefereeError> {
        let rows = self.rows.unwrap_or(config.rows);
        let cols = self.cols.unwrap_or(config.cols);
        check_dimensions(rows, cols)?;
        Ok((rows, cols))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ViolationsRequest {
    #[serde(flatten)]
    pub args: HistoryArgs,
    #[serde(flatten)]
    pub restrictions: Restrictions,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WinLinesRequest {
    #[serde(flatten)]
    pub args: HistoryArgs,
    #[serde(default, alias = "towin")]
    pub to_win: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlayRequest {
    pub game: GameRecord,
    pub row: usize,
    pub col: usize,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Response {
    Lines(ComputedLines),
    Violations(Violations),
    WinLines(WinningLines),
    Play { verdict: Verdict, game: GameRecord },
    Error { error: String },
}

impl Response {
    pub fn is_error(&self) -> bool {
        matches!(self, Response::Error { .. })
    }
}

pub fn parse_request(line: &str) -> Result<Request, RefereeError> {
    Ok(serde_json::from_str(line)?)
}

/// Run one request against the engine.
pub fn adjudicate(request: Request, config: &RefereeConfig) -> Result<Response, RefereeError> {
    match request {
        Request::Lines(args) => {
            let (rows, cols) = args.dimensions(config)?;
            validate_history(&args.move_history, rows, cols)?;
            Ok(Response::Lines(compute_lines(&args.move_history, rows, cols)))
        }
        Request::Violations(request) => {
            let (rows, cols) = request.args.dimensions(config)?;
            let history = request.args.move_history;
            validate_history(&history, rows, cols)?;

            // Only the restricted side's moves are checked.
            let last_mover = history.len().checked_sub(1).map(Color::for_ply);
            if last_mover.is_none() || last_mover != config.restricted {
                debug!(plies = history.len(), "Last move not restricted, skipping check");
                return Ok(Response::Violations(Violations::default()));
            }

            let state = GameState::build(rows, cols, history);
            let violations = Evaluator::new(request.restrictions)
                .with_depth(config.search_depth)
                .check(&state);
            Ok(Response::Violations(violations))
        }
        Request::WinLines(request) => {
            let (rows, cols) = request.args.dimensions(config)?;
            validate_history(&request.args.move_history, rows, cols)?;
            let to_win = request.to_win.unwrap_or(config.to_win);
            check_to_win(to_win)?;
            Ok(Response::WinLines(find_winning_lines(
                &request.args.move_history,
                rows,
                cols,
                to_win,
            )))
        }
        Request::Play(PlayRequest { mut game, row, col }) => {
            let verdict = Referee::new(config).play(&mut game, row, col)?;
            Ok(Response::Play { verdict, game })
        }
    }
}

/// Parse and adjudicate one input line, folding any failure into an error
/// response.
pub fn respond(line: &str, config: &RefereeConfig) -> Response {
    match parse_request(line).and_then(|request| adjudicate(request, config)) {
        Ok(response) => response,
        Err(e) => Response::Error {
            error: e.to_string(),
        },
    }
}
