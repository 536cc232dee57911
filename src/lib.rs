/// WASM entry points: JSON in, JSON out. The rules engine's worker calls
/// these through wasm_bindgen; native callers can use the modules directly.

pub mod board;
pub mod config;
pub mod error;
pub mod eval;
pub mod movegen;
pub mod ordering;
pub mod position;
pub mod protocol;
pub mod scoring;
pub mod search;
pub mod tiles;
pub mod tt;
pub mod zobrist;

use wasm_bindgen::prelude::*;

pub use board::{End, Ends, Move, Placement, PlacementHistory, Player};
pub use config::{EngineConfig, EvalWeights, SearchConfig};
pub use error::RequestError;
pub use protocol::{MoveRequest, MoveResponse};
pub use search::{choose_move, RootScore, SearchRequest, SearchResult, SearchStats, Searcher};
pub use tiles::{Hand, Ruleset, Tile};

/// Chooses a move for the AI with the default tuning.
#[wasm_bindgen]
pub fn wasm_choose_move(input_json: &str) -> String {
    protocol::respond(input_json, &EngineConfig::default()).to_json()
}

/// Same as `wasm_choose_move`, with weights and limits overridden by a
/// (possibly partial) JSON config.
#[wasm_bindgen]
pub fn wasm_choose_move_with_config(input_json: &str, config_json: &str) -> String {
    match EngineConfig::load_from_json(config_json) {
        Ok(config) => protocol::respond(input_json, &config).to_json(),
        Err(e) => MoveResponse::from_error(&RequestError::Config(e)).to_json(),
    }
}

/// Routes `log` output to the browser console. Unknown level names mean
/// `info`. Returns false if a logger was already installed.
#[wasm_bindgen]
pub fn wasm_init_logging(level: &str) -> bool {
    let level = level.parse::<log::Level>().unwrap_or(log::Level::Info);
    install_logger(level)
}

#[cfg(target_arch = "wasm32")]
fn install_logger(level: log::Level) -> bool {
    console_log::init_with_level(level).is_ok()
}

// Native hosts bring their own backend; only the filter is applied.
#[cfg(not(target_arch = "wasm32"))]
fn install_logger(level: log::Level) -> bool {
    log::set_max_level(level.to_level_filter());
    false
}
