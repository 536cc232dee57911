/// JSON message format shared with the rules engine's worker.
/// Requests are validated here; everything past this point assumes a
/// consistent position.

use log::warn;
use serde::{Deserialize, Serialize};

use crate::board::{End, Ends, Move, Placement, PlacementHistory, Player};
use crate::config::EngineConfig;
use crate::error::RequestError;
use crate::search::{choose_move, SearchRequest, SearchResult};
use crate::tiles::{Hand, Ruleset, Tile, MAX_PIP};

#[derive(Deserialize, Debug, Clone, Copy)]
pub struct TileDesc {
    pub low: i32,
    pub high: i32,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub player: String,
    #[serde(default)]
    pub pass: bool,
    #[serde(default)]
    pub tile_low: i32,
    #[serde(default)]
    pub tile_high: i32,
    #[serde(default)]
    pub board_left: i32,
    #[serde(default)]
    pub board_right: i32,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct LegalMoveDesc {
    pub tile_low: i32,
    pub tile_high: i32,
    pub end: String,
}

#[derive(Deserialize, Debug, Clone, Copy)]
pub struct MatchScore {
    pub ai: i32,
    pub human: i32,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct MoveRequest {
    pub ai_tiles: Vec<TileDesc>,
    pub human_tiles: Vec<TileDesc>,
    #[serde(default)]
    pub board_empty: bool,
    #[serde(default)]
    pub left: Option<i32>,
    #[serde(default)]
    pub right: Option<i32>,
    #[serde(default)]
    pub move_history: Vec<HistoryEntry>,
    #[serde(default)]
    pub legal_moves: Vec<LegalMoveDesc>,
    #[serde(default)]
    pub match_score: Option<MatchScore>,
    #[serde(default)]
    pub time_budget: Option<f64>,
    #[serde(default)]
    pub exclude_double_zero: bool,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisEntry {
    pub tile_id: String,
    pub end: String,
    pub score: i32,
}

#[derive(Serialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct MoveResponse {
    pub tile_id: String,
    pub end: String,
    pub best_score: i32,
    pub depth: i32,
    pub nodes: u64,
    pub analysis: Vec<AnalysisEntry>,
    // TT diagnostics; ignored by the UI
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tt_probes: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tt_hits: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tt_cutoffs: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tt_hints: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

fn parse_pip(v: i32) -> Option<u8> {
    u8::try_from(v).ok().filter(|&p| p <= MAX_PIP)
}

fn parse_tile(low: i32, high: i32) -> Result<Tile, RequestError> {
    parse_pip(low)
        .zip(parse_pip(high))
        .and_then(|(a, b)| Tile::from_pips(a, b))
        .ok_or(RequestError::PipOutOfRange(low, high))
}

fn parse_end_value(v: i32) -> Result<u8, RequestError> {
    parse_pip(v).ok_or(RequestError::EndOutOfRange(v))
}

fn parse_player(name: &str) -> Result<Player, RequestError> {
    match name {
        "ai" => Ok(Player::Ai),
        "human" => Ok(Player::Human),
        other => Err(RequestError::UnknownPlayer(other.to_string())),
    }
}

fn parse_end(name: &str) -> Result<End, RequestError> {
    match name {
        "left" => Ok(End::Left),
        "right" => Ok(End::Right),
        other => Err(RequestError::UnknownEnd(other.to_string())),
    }
}

impl MoveRequest {
    pub fn from_json(json: &str) -> Result<Self, RequestError> {
        Ok(serde_json::from_str(json)?)
    }

    fn ruleset(&self) -> Ruleset {
        Ruleset { exclude_double_zero: self.exclude_double_zero }
    }

    /// Builds both hands, rejecting tiles listed twice or not in play.
    fn hands(&self) -> Result<(Hand, Hand), RequestError> {
        let universe = self.ruleset().universe();
        let mut seen = Hand::EMPTY;
        let mut build = |descs: &[TileDesc]| -> Result<Hand, RequestError> {
            let mut hand = Hand::EMPTY;
            for d in descs {
                let tile = parse_tile(d.low, d.high)?;
                if seen.contains(tile) {
                    return Err(RequestError::DuplicateTile(tile.id()));
                }
                if !universe.contains(tile) {
                    return Err(RequestError::ExcludedTile(tile.id()));
                }
                seen.insert(tile);
                hand.insert(tile);
            }
            Ok(hand)
        };
        let ai = build(&self.ai_tiles)?;
        let human = build(&self.human_tiles)?;
        Ok((ai, human))
    }

    fn ends(&self) -> Result<Ends, RequestError> {
        if self.board_empty {
            return Ok(Ends::EMPTY);
        }
        match (self.left, self.right) {
            (None, None) => Ok(Ends::EMPTY),
            (Some(l), Some(r)) => Ok(Ends::new(parse_end_value(l)?, parse_end_value(r)?)),
            _ => Err(RequestError::MissingEnd),
        }
    }

    /// Last two placements, ignoring passes.
    fn history(&self) -> Result<PlacementHistory, RequestError> {
        let mut history = PlacementHistory::default();
        for entry in self.move_history.iter().filter(|e| !e.pass) {
            history.record(Placement {
                player: parse_player(&entry.player)?,
                tile: parse_tile(entry.tile_low, entry.tile_high)?,
                ends_after: Ends::new(
                    parse_end_value(entry.board_left)?,
                    parse_end_value(entry.board_right)?,
                ),
            });
        }
        Ok(history)
    }

    pub fn legal_moves(&self) -> Result<Vec<Move>, RequestError> {
        self.legal_moves
            .iter()
            .map(|lm| Ok(Move::new(parse_tile(lm.tile_low, lm.tile_high)?, parse_end(&lm.end)?)))
            .collect()
    }

    pub fn to_search_request(&self) -> Result<SearchRequest, RequestError> {
        let (ai, human) = self.hands()?;
        let mut req = SearchRequest::new(ai, human, self.ends()?);
        req.history = self.history()?;
        req.cons_pass = self.move_history.last().map_or(0, |e| u8::from(e.pass));
        req.match_diff = self.match_score.map_or(0, |ms| ms.ai - ms.human);
        req.time_budget_ms = self.time_budget;
        req.ruleset = self.ruleset();
        Ok(req)
    }
}

/// The move actually returned: the search's choice when the rules engine
/// agrees it is legal, else a legal move with the same tile, else the first
/// legal move.
fn reconcile(best: Option<Move>, legal: &[Move]) -> Option<Move> {
    if legal.is_empty() {
        return best;
    }
    match best {
        Some(mv) if legal.contains(&mv) => Some(mv),
        Some(mv) => {
            let fallback = legal.iter().find(|m| m.tile == mv.tile).unwrap_or(&legal[0]);
            warn!("search chose {mv}, not in the legal list; playing {fallback}");
            Some(*fallback)
        }
        None => {
            warn!("search found no move; playing first legal move {}", legal[0]);
            Some(legal[0])
        }
    }
}

impl MoveResponse {
    pub fn from_error(err: &RequestError) -> Self {
        MoveResponse {
            end: End::Left.name().to_string(),
            error: Some(err.to_string()),
            ..Default::default()
        }
    }

    fn from_result(mv: Move, result: &SearchResult) -> Self {
        let analysis = result
            .analysis
            .iter()
            .map(|r| AnalysisEntry {
                tile_id: r.mv.tile.id(),
                end: r.mv.end.name().to_string(),
                score: r.score,
            })
            .collect();
        let stats = &result.stats;
        MoveResponse {
            tile_id: mv.tile.id(),
            end: mv.end.name().to_string(),
            best_score: result.best_score,
            depth: result.depth,
            nodes: result.nodes,
            analysis,
            tt_probes: Some(stats.tt_probes),
            tt_hits: Some(stats.tt_hits),
            tt_cutoffs: Some(stats.tt_cutoffs),
            tt_hints: Some(stats.tt_hints),
            error: None,
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Runs a validated request through the search.
pub fn handle(request: &MoveRequest, config: &EngineConfig) -> Result<MoveResponse, RequestError> {
    let search_req = request.to_search_request()?;
    let legal = request.legal_moves()?;
    let result = choose_move(&search_req, config);
    let mv = reconcile(result.best_move, &legal).ok_or(RequestError::NoLegalMove)?;
    Ok(MoveResponse::from_result(mv, &result))
}

/// Parses, searches and answers. Errors come back inside the response.
pub fn respond(request_json: &str, config: &EngineConfig) -> MoveResponse {
    MoveRequest::from_json(request_json)
        .and_then(|req| handle(&req, config))
        .unwrap_or_else(|e| {
            warn!("rejected request: {e}");
            MoveResponse::from_error(&e)
        })
}
