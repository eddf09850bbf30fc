//! Game referee for five-in-a-row with Renju restrictions.
//!
//! Wraps the `renju_core` engine with move validation, outcome tracking and
//! a batch worker that adjudicates newline-delimited JSON requests.

pub mod adjudicate;
pub mod batch;
pub mod config;
pub mod error;
pub mod referee;

pub use adjudicate::{adjudicate, respond, Request, Response};
pub use batch::{run_batch, BatchSummary};
pub use config::RefereeConfig;
pub use error::RefereeError;
pub use referee::{Outcome, Referee, Verdict};
