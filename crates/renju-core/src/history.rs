//! Persisted move-history codec.
//!
//! Storage keeps a game's moves in a text column, either as a JSON array of
//! `{row, col, illegal?}` objects or in the compact form `row,col` separated
//! by `;` or whitespace, with a trailing `!` for a move adjudicated illegal:
//!
//! ```text
//! 7,7;6,8;7,8!
//! ```

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Deserializer};

use crate::game_data::Move;

#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    #[error("invalid move token: {0:?}")]
    InvalidToken(String),

    #[error("invalid JSON move history: {0}")]
    Json(#[from] serde_json::Error),
}

fn token_re() -> &'static Regex {
    static TOKEN: OnceLock<Regex> = OnceLock::new();
    TOKEN.get_or_init(|| Regex::new(r"^(\d+),(\d+)(!?)$").expect("move token pattern is valid"))
}

/// Parse a stored history in either encoding. Blank text is an empty history.
pub fn parse(text: &str) -> Result<Vec<Move>, HistoryError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(Vec::new());
    }
    if text.starts_with('[') {
        return Ok(serde_json::from_str(text)?);
    }

    text.split(|c: char| c == ';' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .map(parse_token)
        .collect()
}

fn parse_token(token: &str) -> Result<Move, HistoryError> {
    let invalid = || HistoryError::InvalidToken(token.to_string());
    let cap = token_re().captures(token).ok_or_else(invalid)?;
    let row = cap[1].parse().map_err(|_| invalid())?;
    let col = cap[2].parse().map_err(|_| invalid())?;
    let mv = Move::new(row, col);
    Ok(if &cap[3] == "!" { mv.marked_illegal() } else { mv })
}

/// Encode a history in the compact form.
pub fn encode_compact(history: &[Move]) -> String {
    history
        .iter()
        .map(|mv| {
            let mark = if mv.illegal { "!" } else { "" };
            format!("{},{}{}", mv.row, mv.col, mark)
        })
        .collect::<Vec<_>>()
        .join(";")
}

/// Indices of moves that land on a cell an earlier move already used.
pub fn duplicates(history: &[Move]) -> Vec<usize> {
    let mut seen = HashSet::with_capacity(history.len());
    history
        .iter()
        .enumerate()
        .filter(|(_, mv)| !seen.insert((mv.row, mv.col)))
        .map(|(index, _)| index)
        .collect()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Stored {
    Moves(Vec<Move>),
    Text(String),
}

/// Serde adapter accepting either a move array or a stored history string.
pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<Move>, D::Error>
where
    D: Deserializer<'de>,
{
    match Stored::deserialize(deserializer)? {
        Stored::Moves(moves) => Ok(moves),
        Stored::Text(text) => parse(&text).map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_compact() {
        let history = parse("7,7; 6,8\n7,8!").unwrap();
        assert_eq!(
            history,
            vec![Move::new(7, 7), Move::new(6, 8), Move::new(7, 8).marked_illegal()]
        );
    }

    #[test]
    fn test_parse_json() {
        let history = parse(r#"[{"row": 0, "col": 14}, {"row": 3, "col": 2, "illegal": true}]"#).unwrap();
        assert_eq!(history[0], Move::new(0, 14));
        assert!(history[1].illegal);
    }

    #[test]
    fn test_blank_is_empty() {
        assert!(parse("").unwrap().is_empty());
        assert!(parse("   ").unwrap().is_empty());
    }

    #[test]
    fn test_bad_token_is_reported() {
        match parse("7,7;x,3") {
            Err(HistoryError::InvalidToken(token)) => assert_eq!(token, "x,3"),
            other => panic!("expected invalid token, got {other:?}"),
        }
        assert!(matches!(parse("-1,3"), Err(HistoryError::InvalidToken(_))));
        assert!(matches!(parse("[{\"row\": 1}]"), Err(HistoryError::Json(_))));
    }

    #[test]
    fn test_compact_round_trip_keeps_illegal_marker() {
        let history = vec![Move::new(7, 7), Move::new(10, 11), Move::new(0, 0).marked_illegal()];
        let text = encode_compact(&history);
        assert_eq!(text, "7,7;10,11;0,0!");
        assert_eq!(parse(&text).unwrap(), history);
    }

    #[test]
    fn test_duplicates_flag_repeated_cells() {
        let history = vec![Move::new(1, 1), Move::new(2, 2), Move::new(1, 1), Move::new(2, 2)];
        assert_eq!(duplicates(&history), vec![2, 3]);
        assert!(duplicates(&history[..2]).is_empty());
    }
}
