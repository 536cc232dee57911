/// Engine tuning: evaluation weights, search limits and the per-move time
/// budget. Every field has a default so a partial JSON override is enough.

use serde::{Deserialize, Serialize};

/// Evaluation weights and phase scaling. Defaults are the shipped tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalWeights {
    pub pip: f64,
    pub mobility: f64,
    pub tile: f64,
    pub suit: f64,
    pub lockin: f64,
    pub lockin_both: f64,
    pub ghost: f64,
    /// Fraction of `ghost` applied while the double-zero is only stranded
    /// for its holder (the other side still holds zero-suit tiles).
    pub ghost_pressure: f64,
    pub double: f64,

    /// At or above this many tiles in hands the opening multipliers apply.
    pub opening_tiles: u32,
    /// Below this many tiles the endgame multipliers apply.
    pub endgame_tiles: u32,
    pub opening: PhaseScale,
    pub midgame: PhaseScale,
    pub endgame: PhaseScale,

    /// Match-score lead (either sign) that switches to defensive/aggressive play.
    pub match_threshold: i32,
    pub leading_pip: f64,
    pub leading_suit: f64,
    pub trailing_pip: f64,
    pub trailing_suit: f64,
    pub trailing_mobility: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhaseScale {
    pub pip: f64,
    pub mobility: f64,
    pub suit: f64,
    pub double: f64,
}

impl Default for EvalWeights {
    fn default() -> Self {
        Self {
            pip: 2.0,
            mobility: 4.0,
            tile: 5.0,
            suit: 3.0,
            lockin: 8.0,
            lockin_both: 15.0,
            ghost: 10.0,
            ghost_pressure: 0.4,
            double: 1.5,

            opening_tiles: 20,
            endgame_tiles: 8,
            opening: PhaseScale { pip: 0.7, mobility: 1.5, suit: 1.3, double: 1.3 },
            midgame: PhaseScale { pip: 1.0, mobility: 1.0, suit: 1.0, double: 1.0 },
            endgame: PhaseScale { pip: 1.5, mobility: 0.6, suit: 1.5, double: 1.0 },

            match_threshold: 50,
            leading_pip: 1.4,
            leading_suit: 0.6,
            trailing_pip: 0.7,
            trailing_suit: 1.5,
            trailing_mobility: 1.3,
        }
    }
}

/// Search limits and driver tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub max_depth: i32,
    /// Node ceiling per iteration.
    pub node_limit: u64,
    /// No new iteration starts once this fraction of the budget is spent.
    pub time_fraction: f64,
    pub default_time_budget_ms: f64,
    /// Budget cap applied once fewer than `endgame_budget_tiles` remain.
    pub endgame_budget_cap_ms: Option<f64>,
    pub endgame_budget_tiles: u32,

    pub aspiration_window: i32,
    pub aspiration_window_deep: i32,
    pub aspiration_deep_from: i32,
    pub aspiration_retries: u32,

    pub extension_base: i32,
    /// Extra extension plies granted per tile below this count.
    pub extension_taper_tiles: i32,
    /// Opponent-single-reply sharpness only applies at or below this many tiles.
    pub sharp_tiles: u32,

    pub tt_size_log2: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_depth: 50,
            node_limit: 20_000_000,
            time_fraction: 0.75,
            default_time_budget_ms: 5000.0,
            endgame_budget_cap_ms: Some(1000.0),
            endgame_budget_tiles: 12,

            aspiration_window: 30,
            aspiration_window_deep: 15,
            aspiration_deep_from: 6,
            aspiration_retries: 3,

            extension_base: 6,
            extension_taper_tiles: 12,
            sharp_tiles: 8,

            tt_size_log2: 20,
        }
    }
}

impl SearchConfig {
    /// Budget for a decision with `tiles_remaining` tiles still in hands.
    pub fn move_budget_ms(&self, requested_ms: Option<f64>, tiles_remaining: u32) -> f64 {
        let budget = requested_ms.filter(|&b| b > 0.0).unwrap_or(self.default_time_budget_ms);
        match self.endgame_budget_cap_ms {
            Some(cap) if tiles_remaining < self.endgame_budget_tiles => budget.min(cap),
            _ => budget,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub search: SearchConfig,
    pub eval: EvalWeights,
}

impl EngineConfig {
    /// Parses a possibly partial JSON document; absent fields keep their defaults.
    pub fn load_from_json(json_str: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json_str)
    }
}
