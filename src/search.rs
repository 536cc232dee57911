/// Search driver: negamax alpha-beta over an in-place position, with a
/// transposition table, killer/history ordering, tactical extensions,
/// iterative deepening and aspiration windows. PVS at the root.

use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::{debug, info, trace, warn};

use crate::board::{Ends, Move, PlacementHistory, Player};
use crate::config::{EngineConfig, SearchConfig};
use crate::eval::Evaluator;
use crate::movegen::{count_playable, MoveStack, MAX_PLY};
use crate::ordering::MoveOrderer;
use crate::position::{Position, Undo};
use crate::scoring::{placement_outcome, score_block};
use crate::tiles::{Hand, Ruleset};
use crate::tt::{Bound, TranspositionTable};

pub const INFINITY: i32 = 100_000;

/// One decision's input. The AI is always the side to move.
#[derive(Clone, Debug)]
pub struct SearchRequest {
    pub ai_hand: Hand,
    pub human_hand: Hand,
    pub ends: Ends,
    pub history: PlacementHistory,
    /// 1 when the human has just passed.
    pub cons_pass: u8,
    /// AI match score minus human match score.
    pub match_diff: i32,
    pub time_budget_ms: Option<f64>,
    pub ruleset: Ruleset,
}

impl SearchRequest {
    pub fn new(ai_hand: Hand, human_hand: Hand, ends: Ends) -> Self {
        Self {
            ai_hand,
            human_hand,
            ends,
            history: PlacementHistory::default(),
            cons_pass: 0,
            match_diff: 0,
            time_budget_ms: None,
            ruleset: Ruleset::default(),
        }
    }

    pub fn position(&self) -> Position {
        Position::new(
            self.ai_hand,
            self.human_hand,
            self.ruleset.universe(),
            self.ends,
            Player::Ai,
            self.cons_pass,
            self.history,
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RootScore {
    pub mv: Move,
    pub score: i32,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SearchStats {
    pub nodes: u64,
    pub tt_probes: u64,
    pub tt_hits: u64,
    pub tt_cutoffs: u64,
    pub tt_hints: u64,
    pub extensions: u64,
    pub deepest_extension: i32,
    pub iterations: u32,
    pub elapsed_ms: f64,
    pub node_limit_hit: bool,
}

#[derive(Clone, Debug)]
pub struct SearchResult {
    /// `None` only when the AI had no legal move.
    pub best_move: Option<Move>,
    pub best_score: i32,
    /// Depth of the last completed iteration.
    pub depth: i32,
    pub nodes: u64,
    /// Every root move with its score, best first.
    pub analysis: Vec<RootScore>,
    pub stats: SearchStats,
}

/// Wall clock: `Date.now()` inside the WASM worker, `Instant` natively.
struct Clock {
    #[cfg(target_arch = "wasm32")]
    start: f64,
    #[cfg(not(target_arch = "wasm32"))]
    start: std::time::Instant,
}

impl Clock {
    #[cfg(target_arch = "wasm32")]
    fn start() -> Self {
        Self { start: js_sys::Date::now() }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn start() -> Self {
        Self { start: std::time::Instant::now() }
    }

    #[cfg(target_arch = "wasm32")]
    fn elapsed_ms(&self) -> f64 {
        js_sys::Date::now() - self.start
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

/// One root pass over the ordered root moves.
struct RootPass {
    scores: Vec<RootScore>,
    best: Option<RootScore>,
    /// Best among moves whose subtree finished before the node ceiling fired
    /// and whose score is exact or a lower bound.
    best_settled: Option<RootScore>,
    complete: bool,
}

impl RootPass {
    /// What a pass cut short by the node ceiling may still contribute. A
    /// settled score above zero at a depth reaching the end of the game is a
    /// proven win; otherwise the raw best only stands in when no iteration
    /// has completed.
    fn partial_pick(&self, depth: i32, total_tiles: i32, have_completed: bool) -> Option<RootScore> {
        let proven = self.best_settled.filter(|b| depth >= total_tiles && b.score > 0);
        proven.or(if have_completed { None } else { self.best })
    }
}

/// Search context. Owns every table a search mutates; one search at a time.
pub struct Searcher {
    config: SearchConfig,
    evaluator: Evaluator,
    tt: TranspositionTable,
    orderer: MoveOrderer,
    moves: MoveStack,
    pos: Position,
    match_diff: i32,
    iter_nodes: u64,
    aborted: bool,
    stats: SearchStats,
    stop: Arc<AtomicBool>,
}

/// A move applied to the searcher's position; dropping it unmakes the move.
struct Applied<'a> {
    searcher: &'a mut Searcher,
    undo: Undo,
}

impl Deref for Applied<'_> {
    type Target = Searcher;

    fn deref(&self) -> &Searcher {
        &*self.searcher
    }
}

impl DerefMut for Applied<'_> {
    fn deref_mut(&mut self) -> &mut Searcher {
        &mut *self.searcher
    }
}

impl Drop for Applied<'_> {
    fn drop(&mut self) {
        self.searcher.pos.unmake(self.undo);
    }
}

impl Searcher {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            config: config.search.clone(),
            evaluator: Evaluator::new(config.eval.clone()),
            tt: TranspositionTable::new(config.search.tt_size_log2),
            orderer: MoveOrderer::new(),
            moves: MoveStack::new(),
            pos: Position::new(
                Hand::EMPTY,
                Hand::EMPTY,
                Hand::EMPTY,
                Ends::EMPTY,
                Player::Ai,
                0,
                PlacementHistory::default(),
            ),
            match_diff: 0,
            iter_nodes: 0,
            aborted: false,
            stats: SearchStats::default(),
            stop: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Flag checked between iterations; setting it ends the running search
    /// after its current iteration. Cleared when the search returns.
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    pub fn position(&self) -> &Position {
        &self.pos
    }

    fn play(&mut self, mv: Move) -> Applied<'_> {
        let undo = self.pos.make_move(mv);
        Applied { searcher: self, undo }
    }

    fn pass(&mut self) -> Applied<'_> {
        let undo = self.pos.make_pass();
        Applied { searcher: self, undo }
    }

    /// Evaluation from the side to move's point of view.
    #[inline]
    fn static_score(&self) -> i32 {
        let e = self.evaluator.evaluate(
            self.pos.ai_hand(),
            self.pos.human_hand(),
            self.pos.ends(),
            self.match_diff,
        );
        e * self.pos.to_move().sign()
    }

    /// Sharp positions get searched past the nominal horizon: a single
    /// playable tile, a pass just made, or few tiles left with the opponent
    /// down to one reply.
    fn should_extend(&self, ext: i32, mine: Hand, theirs: Hand) -> bool {
        let cfg = &self.config;
        let remaining = self.pos.tiles_remaining() as i32;
        let max_ext = cfg.extension_base + (cfg.extension_taper_tiles - remaining).max(0);
        if ext >= max_ext {
            return false;
        }
        let ends = self.pos.ends();
        count_playable(mine, ends) == 1
            || self.pos.cons_pass() > 0
            || (remaining <= cfg.sharp_tiles as i32 && count_playable(theirs, ends) <= 1)
    }

    fn negamax(&mut self, mut depth: i32, mut alpha: i32, beta: i32, mut ext: i32) -> i32 {
        debug_assert!(self.pos.partition_holds());
        debug_assert_eq!(self.pos.hash(), self.pos.compute_hash());

        self.stats.nodes += 1;
        self.iter_nodes += 1;
        if self.iter_nodes >= self.config.node_limit {
            self.aborted = true;
            return self.static_score();
        }

        let ply = self.pos.ply();
        if ply + 1 >= MAX_PLY {
            return self.static_score();
        }

        let side = self.pos.to_move();
        let mine = self.pos.hand(side);
        let theirs = self.pos.hand(side.opponent());
        let ends = self.pos.ends();
        let num_moves = self.moves.generate(ply, mine, ends);

        if num_moves == 0 {
            if self.pos.cons_pass() > 0 {
                return score_block(self.pos.history(), self.pos.ai_hand(), self.pos.human_hand())
                    .score_for(side);
            }
            let mut child = self.pass();
            return -child.negamax(depth, -beta, -alpha, ext);
        }

        if depth <= 0 {
            if !self.should_extend(ext, mine, theirs) {
                return self.static_score();
            }
            trace!("extending at ply {ply}, extension {ext}");
            depth = 1;
            ext += 1;
            self.stats.extensions += 1;
            self.stats.deepest_extension = self.stats.deepest_extension.max(ext);
        }

        let key = self.pos.hash();
        let mut hint = None;
        self.stats.tt_probes += 1;
        if let Some(hit) = self.tt.probe(key, depth, alpha, beta) {
            self.stats.tt_hits += 1;
            if let Some(score) = hit.score {
                self.stats.tt_cutoffs += 1;
                return score;
            }
            self.stats.tt_hints += 1;
            hint = hit.best;
        }

        self.orderer.order(&mut self.moves, ply, depth, mine, theirs, ends, hint);

        let orig_alpha = alpha;
        let mut best = -INFINITY;
        let mut best_move = None;
        for i in 0..num_moves {
            let mv = self.moves.get(ply, i);
            let score = {
                let mut child = self.play(mv);
                -child.after_placement(depth - 1, -beta, -alpha, ext)
            };
            if score > best {
                best = score;
                best_move = Some(mv);
            }
            if best > alpha {
                alpha = best;
            }
            if alpha >= beta {
                self.orderer.record_cutoff(mv, depth);
                break;
            }
        }

        if !self.aborted {
            let bound = if best <= orig_alpha {
                Bound::Upper
            } else if best >= beta {
                Bound::Lower
            } else {
                Bound::Exact
            };
            self.tt.store(key, depth, bound, best, best_move);
        }
        best
    }

    /// Value for the side to move right after the opponent laid a tile.
    #[inline]
    fn after_placement(&mut self, depth: i32, alpha: i32, beta: i32, ext: i32) -> i32 {
        match placement_outcome(&self.pos) {
            Some(outcome) => outcome.score_for(self.pos.to_move()),
            None => self.negamax(depth, alpha, beta, ext),
        }
    }

    fn search_root(&mut self, depth: i32, alpha_w: i32, beta_w: i32, root_moves: &[Move]) -> RootPass {
        let root_side = self.pos.to_move();
        let mut pass = RootPass {
            scores: Vec::with_capacity(root_moves.len()),
            best: None,
            best_settled: None,
            complete: true,
        };
        let mut alpha = alpha_w;

        for (i, &mv) in root_moves.iter().enumerate() {
            let (score, terminal) = {
                let mut child = self.play(mv);
                match placement_outcome(&child.pos) {
                    Some(outcome) => (outcome.score_for(root_side), true),
                    None if i == 0 => (-child.negamax(depth - 1, -beta_w, -alpha, 0), false),
                    None => {
                        let mut sc = -child.negamax(depth - 1, -alpha - 1, -alpha, 0);
                        if sc > alpha && sc < beta_w {
                            sc = -child.negamax(depth - 1, -beta_w, -alpha, 0);
                        }
                        (sc, false)
                    }
                }
            };

            let entry = RootScore { mv, score };
            pass.scores.push(entry);
            if pass.best.map_or(true, |b| score > b.score) {
                pass.best = Some(entry);
            }
            if self.aborted {
                pass.complete = false;
                break;
            }
            // A fail-low score is only an upper bound.
            let bounded_below = terminal || score > alpha;
            if bounded_below && pass.best_settled.map_or(true, |b| score > b.score) {
                pass.best_settled = Some(entry);
            }
            alpha = alpha.max(score);
        }
        pass
    }

    /// Runs iterative deepening on `request` and returns the best move found
    /// by the last completed iteration.
    pub fn search(&mut self, request: &SearchRequest) -> SearchResult {
        let clock = Clock::start();
        self.pos = request.position();
        self.match_diff = request.match_diff;
        self.tt.clear();
        self.orderer.clear();
        self.stats = SearchStats::default();
        self.aborted = false;

        let total_tiles = self.pos.tiles_remaining() as i32;
        let budget_ms = self.config.move_budget_ms(request.time_budget_ms, total_tiles as u32);
        let root_key = self.pos.hash();
        let root_side = self.pos.to_move();
        debug!(
            "searching {total_tiles} tiles, budget {budget_ms:.0} ms, table of {} entries",
            self.tt.capacity()
        );

        let mut best_move: Option<Move> = None;
        let mut best_score = 0;
        let mut last_depth = 0;
        let mut analysis: Vec<RootScore> = Vec::new();
        let mut prev_score: Option<i32> = None;

        for depth in 1..=self.config.max_depth.max(1) {
            self.iter_nodes = 0;

            let n = self.moves.generate(0, self.pos.hand(root_side), self.pos.ends());
            if n == 0 {
                warn!("search requested with no legal move for {}", root_side.name());
                break;
            }
            let priority = best_move.or_else(|| self.tt.get(root_key).and_then(|e| e.best));
            let (mine, theirs, ends) =
                (self.pos.hand(root_side), self.pos.hand(root_side.opponent()), self.pos.ends());
            self.orderer.order(&mut self.moves, 0, depth, mine, theirs, ends, priority);
            let root_moves: Vec<Move> = self.moves.as_slice(0).to_vec();

            let width = if depth >= self.config.aspiration_deep_from {
                self.config.aspiration_window_deep
            } else {
                self.config.aspiration_window
            };
            let (mut alpha_w, mut beta_w) = match prev_score {
                Some(prev) if depth > 1 => (prev - width, prev + width),
                _ => (-INFINITY, INFINITY),
            };

            let mut pass = self.search_root(depth, alpha_w, beta_w, &root_moves);
            for _ in 1..self.config.aspiration_retries.max(1) {
                let Some(best) = pass.best.filter(|_| pass.complete) else {
                    break;
                };
                if best.score <= alpha_w && alpha_w > -INFINITY {
                    alpha_w = -INFINITY;
                } else if best.score >= beta_w && beta_w < INFINITY {
                    beta_w = INFINITY;
                } else {
                    break;
                }
                trace!("depth {depth}: aspiration miss at {}, widening to [{alpha_w}, {beta_w}]", best.score);
                pass = self.search_root(depth, alpha_w, beta_w, &root_moves);
            }

            if pass.complete {
                if let Some(best) = pass.best {
                    best_move = Some(best.mv);
                    best_score = best.score;
                    prev_score = Some(best.score);
                    last_depth = depth;
                    analysis = pass.scores;
                    self.stats.iterations += 1;
                    self.tt.store(root_key, depth, Bound::Exact, best.score, Some(best.mv));
                    debug!(
                        "depth {depth}: best {} score {} nodes {} ({:.0} ms)",
                        best.mv,
                        best.score,
                        self.iter_nodes,
                        clock.elapsed_ms()
                    );
                }
            } else {
                self.stats.node_limit_hit = true;
                warn!("node ceiling reached during depth {depth} after {} nodes", self.iter_nodes);
                if let Some(pick) = pass.partial_pick(depth, total_tiles, best_move.is_some()) {
                    best_move = Some(pick.mv);
                    best_score = pick.score;
                    if analysis.is_empty() {
                        analysis = pass.scores;
                    }
                }
                break;
            }

            if depth >= total_tiles {
                break;
            }
            if self.stop.load(Ordering::Relaxed) {
                debug!("stop requested after depth {depth}");
                break;
            }
            if clock.elapsed_ms() >= budget_ms * self.config.time_fraction {
                break;
            }
        }

        self.stop.store(false, Ordering::Relaxed);
        analysis.sort_by(|a, b| b.score.cmp(&a.score));
        self.stats.elapsed_ms = clock.elapsed_ms();
        if let Some(mv) = best_move {
            info!(
                "chose {mv} score {best_score} depth {last_depth} nodes {} in {:.0} ms",
                self.stats.nodes, self.stats.elapsed_ms
            );
        }

        SearchResult {
            best_move,
            best_score,
            depth: last_depth,
            nodes: self.stats.nodes,
            analysis,
            stats: self.stats.clone(),
        }
    }
}

/// Runs one decision with a fresh search context.
pub fn choose_move(request: &SearchRequest, config: &EngineConfig) -> SearchResult {
    Searcher::new(config).search(request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{End, Placement};
    use crate::tiles::Tile;

    fn tile(a: u8, b: u8) -> Tile {
        Tile::from_pips(a, b).unwrap()
    }

    fn hand(tiles: &[(u8, u8)]) -> Hand {
        tiles.iter().map(|&(a, b)| tile(a, b)).collect()
    }

    fn small_config() -> EngineConfig {
        let mut config = EngineConfig::default();
        config.search.tt_size_log2 = 12;
        config
    }

    #[test]
    fn test_last_double_goes_out() {
        let mut req = SearchRequest::new(hand(&[(3, 3)]), hand(&[(1, 2), (4, 6)]), Ends::new(3, 3));
        req.time_budget_ms = Some(1000.0);
        let result = choose_move(&req, &small_config());
        assert_eq!(result.best_move, Some(Move::new(tile(3, 3), End::Left)));
        assert_eq!(result.best_score, 13);
        assert_eq!(result.analysis.len(), 1);
    }

    #[test]
    fn test_takes_the_winning_line() {
        // (2,5) blocks at once with the AI light on pips. (4,5) lets the
        // human answer (4,4) and win the block on the reversal.
        let ai = hand(&[(2, 5), (4, 5), (0, 1)]);
        let human = hand(&[(4, 4), (1, 6)]);
        let req = SearchRequest::new(ai, human, Ends::new(5, 3));
        let result = choose_move(&req, &small_config());
        let best = result.best_move.unwrap();
        assert_ne!(best.tile, tile(4, 5));
        assert!(result.best_score > 0);
        assert_eq!(result.analysis[0].score, result.best_score);
        assert!(result.analysis.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn test_full_solve_stops_at_tile_count() {
        let ai = hand(&[(0, 1), (1, 2), (2, 3)]);
        let human = hand(&[(3, 4), (4, 5), (5, 6)]);
        let req = SearchRequest::new(ai, human, Ends::new(1, 4));
        let result = choose_move(&req, &small_config());
        assert_eq!(result.depth, 6);
        assert!(!result.stats.node_limit_hit);
        assert_eq!(result.stats.iterations, 6);
    }

    #[test]
    fn test_position_restored_after_search() {
        let ai = hand(&[(0, 1), (1, 2), (2, 3), (6, 6)]);
        let human = hand(&[(3, 4), (4, 5), (1, 5)]);
        let req = SearchRequest::new(ai, human, Ends::new(1, 4));
        let mut searcher = Searcher::new(&small_config());
        searcher.search(&req);
        let root = req.position();
        let after = searcher.position();
        assert_eq!(after.hash(), root.hash());
        assert_eq!(after.ai_hand(), ai);
        assert_eq!(after.human_hand(), human);
        assert_eq!(after.ends(), root.ends());
        assert_eq!(after.ply(), 0);
    }

    #[test]
    fn test_node_ceiling_keeps_a_move() {
        let mut config = small_config();
        config.search.node_limit = 50;
        let ai = hand(&[(0, 1), (1, 2), (2, 3), (3, 3), (4, 6), (0, 6), (2, 2)]);
        let human = hand(&[(3, 4), (4, 5), (1, 5), (0, 4), (5, 5), (1, 6), (2, 6)]);
        let req = SearchRequest::new(ai, human, Ends::new(1, 4));
        let result = choose_move(&req, &config);
        assert!(result.stats.node_limit_hit);
        let best = result.best_move.unwrap();
        assert!(ai.contains(best.tile));
    }

    #[test]
    fn test_stop_flag_is_cleared_on_return() {
        let mut searcher = Searcher::new(&small_config());
        let stop = searcher.stop_handle();
        stop.store(true, Ordering::Relaxed);
        let ai = hand(&[(0, 1), (1, 2), (2, 3), (6, 6)]);
        let human = hand(&[(3, 4), (4, 5), (1, 5)]);
        let result = searcher.search(&SearchRequest::new(ai, human, Ends::new(1, 4)));
        assert_eq!(result.depth, 1);
        assert!(result.best_move.is_some());
        assert!(!stop.load(Ordering::Relaxed));
    }

    fn no_extensions(mut config: EngineConfig) -> EngineConfig {
        config.search.extension_base = 0;
        config.search.extension_taper_tiles = 0;
        config
    }

    fn middlegame() -> SearchRequest {
        let ai = hand(&[(0, 1), (1, 2), (2, 3), (3, 3), (4, 6), (0, 6), (2, 2)]);
        let human = hand(&[(3, 4), (4, 5), (1, 5), (0, 4), (5, 5), (1, 6), (2, 6)]);
        SearchRequest::new(ai, human, Ends::new(1, 4))
    }

    fn root_pass(config: &EngineConfig, req: &SearchRequest, depth: i32, alpha: i32, beta: i32) -> RootPass {
        let mut searcher = Searcher::new(config);
        searcher.pos = req.position();
        searcher.moves.generate(0, req.ai_hand, req.ends);
        let root_moves = searcher.moves.as_slice(0).to_vec();
        searcher.search_root(depth, alpha, beta, &root_moves)
    }

    /// After the AI's (1,2) or (4,6) the human has exactly one playable tile.
    fn single_reply() -> SearchRequest {
        SearchRequest::new(hand(&[(1, 2), (4, 6), (3, 3), (5, 5)]), hand(&[(2, 5), (0, 3), (3, 6)]), Ends::new(1, 4))
    }

    #[test]
    fn test_aborted_root_move_is_not_settled() {
        let req = middlegame();
        let mut partial_with_settled = 0;
        for limit in (1..600).step_by(3) {
            let mut config = no_extensions(small_config());
            config.search.node_limit = limit;
            let pass = root_pass(&config, &req, 4, -INFINITY, INFINITY);
            if pass.complete {
                continue;
            }
            let aborted = pass.scores.last().unwrap().mv;
            if let Some(settled) = pass.best_settled {
                assert_ne!(settled.mv, aborted, "limit {limit}");
                assert!(pass.scores[..pass.scores.len() - 1].contains(&settled));
                partial_with_settled += 1;
            }
        }
        assert!(partial_with_settled > 0);
    }

    #[test]
    fn test_fail_low_scores_are_never_settled() {
        let req = middlegame();
        let high = INFINITY / 2;
        for limit in (1..600).step_by(3).chain([20_000_000]) {
            let mut config = no_extensions(small_config());
            config.search.node_limit = limit;
            let pass = root_pass(&config, &req, 4, high, high + 1);
            assert!(pass.best.is_some());
            assert_eq!(pass.best_settled, None, "limit {limit}");
            assert_eq!(pass.partial_pick(30, 14, true), None);
        }
    }

    #[test]
    fn test_partial_pass_adoption() {
        let win = RootScore { mv: Move::new(tile(1, 2), End::Left), score: 12 };
        let raw = RootScore { mv: Move::new(tile(4, 6), End::Right), score: 30 };
        let pass = RootPass { scores: vec![win, raw], best: Some(raw), best_settled: Some(win), complete: false };

        // Deep enough to reach the end of the game: the settled win replaces
        // whatever the last completed iteration chose.
        assert_eq!(pass.partial_pick(14, 14, true), Some(win));
        // Short of the end the settled score is only an estimate.
        assert_eq!(pass.partial_pick(13, 14, true), None);
        assert_eq!(pass.partial_pick(13, 14, false), Some(raw));

        let losing = RootScore { score: -4, ..win };
        let pass = RootPass { best_settled: Some(losing), ..pass };
        assert_eq!(pass.partial_pick(14, 14, true), None);
        assert_eq!(pass.partial_pick(14, 14, false), Some(raw));
    }

    #[test]
    fn test_zero_time_fraction_stops_after_first_iteration() {
        let mut config = small_config();
        config.search.time_fraction = 0.0;
        let result = choose_move(&middlegame(), &config);
        assert_eq!(result.depth, 1);
        assert_eq!(result.stats.iterations, 1);
        assert!(result.best_move.is_some());
    }

    #[test]
    fn test_single_reply_is_extended() {
        let mut config = small_config();
        config.search.max_depth = 1;
        let result = choose_move(&single_reply(), &config);
        assert_eq!(result.depth, 1);
        assert!(result.stats.extensions > 0);
        assert!(result.stats.deepest_extension >= 1);
        let cap = config.search.extension_base + config.search.extension_taper_tiles;
        assert!(result.stats.deepest_extension <= cap);
    }

    #[test]
    fn test_extension_cap_is_respected() {
        let mut config = no_extensions(small_config());
        config.search.max_depth = 1;
        let result = choose_move(&single_reply(), &config);
        assert_eq!(result.stats.extensions, 0);
        assert_eq!(result.stats.deepest_extension, 0);

        config.search.extension_base = 1;
        let result = choose_move(&single_reply(), &config);
        assert!(result.stats.extensions > 0);
        assert_eq!(result.stats.deepest_extension, 1);
    }

    #[test]
    fn test_passes_when_stuck_then_answers() {
        // Human just passed; AI must still find its only tile.
        let mut req = SearchRequest::new(hand(&[(2, 6), (6, 6)]), hand(&[(0, 1)]), Ends::new(2, 4));
        req.cons_pass = 1;
        req.history.record(Placement { player: Player::Ai, tile: tile(4, 4), ends_after: Ends::new(2, 4) });
        let result = choose_move(&req, &small_config());
        assert_eq!(result.best_move, Some(Move::new(tile(2, 6), End::Left)));
    }
}
