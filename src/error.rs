/// Request validation errors.

use thiserror::Error;

/// Problems with a request arriving over the worker boundary. The search
/// itself never fails; these are caught before a position is built.
#[derive(Error, Debug)]
pub enum RequestError {
    #[error("malformed request: {0}")]
    Json(#[from] serde_json::Error),
    #[error("pip value out of range in {0}-{1}")]
    PipOutOfRange(i32, i32),
    #[error("end value {0} out of range")]
    EndOutOfRange(i32),
    #[error("tile {0} appears more than once")]
    DuplicateTile(String),
    #[error("tile {0} is not in play under the current ruleset")]
    ExcludedTile(String),
    #[error("unknown player {0:?}")]
    UnknownPlayer(String),
    #[error("unknown end {0:?}")]
    UnknownEnd(String),
    #[error("board is not empty but an end value is missing")]
    MissingEnd,
    #[error("no legal move for the side to move")]
    NoLegalMove,
    #[error("malformed engine config: {0}")]
    Config(serde_json::Error),
}
