//! Referee configuration from environment variables

use std::env;
use std::str::FromStr;

use renju_core::Color;

use crate::error::RefereeError;
use crate::referee::check_dimensions;

/// Deepest speculative search accepted. Each level multiplies the number of
/// state rebuilds per classified line.
pub const MAX_SEARCH_DEPTH: u8 = 3;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RefereeConfig {
    /// Board rows used when a request does not give its own
    pub rows: usize,

    /// Board columns used when a request does not give its own
    pub cols: usize,

    /// Winning run length used when a request does not give its own
    pub to_win: usize,

    /// Side whose moves are checked against the restrictions (None = nobody)
    pub restricted: Option<Color>,

    /// Speculative levels classified while probing availability (at most
    /// `MAX_SEARCH_DEPTH`)
    pub search_depth: u8,

    /// Concurrent adjudication jobs in batch mode
    pub workers: usize,
}

impl Default for RefereeConfig {
    fn default() -> Self {
        Self {
            rows: 15,
            cols: 15,
            to_win: 5,
            restricted: Some(Color::Black),
            search_depth: 0,
            workers: num_cpus::get(),
        }
    }
}

impl RefereeConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, RefereeError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through `lookup`, falling back to defaults for
    /// unset keys.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, RefereeError> {
        let defaults = Self::default();

        let rows = parse_var(&lookup, "RENJU_ROWS", defaults.rows)?;
        let cols = parse_var(&lookup, "RENJU_COLS", defaults.cols)?;
        let to_win = parse_var(&lookup, "RENJU_TO_WIN", defaults.to_win)?;
        let search_depth = parse_var(&lookup, "RENJU_SEARCH_DEPTH", defaults.search_depth)?;
        let workers = parse_var(&lookup, "RENJU_WORKERS", defaults.workers)?;

        let restricted = match lookup("RENJU_RESTRICTED_COLOR") {
            None => defaults.restricted,
            Some(value) => parse_color(&value)?,
        };

        for (key, value) in [
            ("RENJU_ROWS", rows),
            ("RENJU_COLS", cols),
            ("RENJU_TO_WIN", to_win),
            ("RENJU_WORKERS", workers),
        ] {
            if value == 0 {
                return Err(RefereeError::Config(format!("{key} must be at least 1")));
            }
        }

        check_dimensions(rows, cols)
            .map_err(|e| RefereeError::Config(format!("RENJU_ROWS/RENJU_COLS: {e}")))?;
        if search_depth > MAX_SEARCH_DEPTH {
            return Err(RefereeError::Config(format!(
                "RENJU_SEARCH_DEPTH must be at most {MAX_SEARCH_DEPTH}"
            )));
        }

        Ok(Self {
            rows,
            cols,
            to_win,
            restricted,
            search_depth,
            workers,
        })
    }
}

fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, RefereeError> {
    match lookup(key) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| RefereeError::Config(format!("{key} has invalid value {value:?}"))),
    }
}

fn parse_color(value: &str) -> Result<Option<Color>, RefereeError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "black" => Ok(Some(Color::Black)),
        "white" => Ok(Some(Color::White)),
        "none" | "" => Ok(None),
        _ => Err(RefereeError::Config(format!(
            "RENJU_RESTRICTED_COLOR must be black, white or none, got {value:?}"
        ))),
    }
}
