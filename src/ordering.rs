/// Move ordering: two killer slots per depth, a butterfly-style history table
/// and static tiebreaks. Reorders only; never affects legality or scores.

use crate::board::{Ends, Move};
use crate::movegen::{has_move, MoveStack};
use crate::tiles::{ghost_active, Hand, Tile, NUM_TILES};

const MO_KILLER_1: f64 = 5000.0;
const MO_KILLER_2: f64 = 4500.0;
const MO_DOUBLE: f64 = 12.0;
const MO_PIP_MULT: f64 = 1.5;
const MO_FORCE_PASS: f64 = 25.0;
const MO_GHOST: f64 = 15.0;

const MAX_HISTORY: i32 = 10_000;

pub const MAX_DEPTH_SLOTS: usize = 64;

pub struct MoveOrderer {
    killers: [[Option<Move>; 2]; MAX_DEPTH_SLOTS],
    /// [tile][end]
    history: [[i32; 2]; NUM_TILES],
}

impl Default for MoveOrderer {
    fn default() -> Self {
        Self::new()
    }
}

impl MoveOrderer {
    pub fn new() -> Self {
        Self {
            killers: [[None; 2]; MAX_DEPTH_SLOTS],
            history: [[0; 2]; NUM_TILES],
        }
    }

    pub fn clear(&mut self) {
        *self = Self::new();
    }

    #[inline(always)]
    fn depth_slot(depth: i32) -> Option<usize> {
        usize::try_from(depth).ok().filter(|&d| d < MAX_DEPTH_SLOTS)
    }

    pub fn killers(&self, depth: i32) -> [Option<Move>; 2] {
        Self::depth_slot(depth).map_or([None; 2], |d| self.killers[d])
    }

    pub fn history(&self, mv: Move) -> i32 {
        self.history[mv.tile.index()][mv.end.index()]
    }

    /// Records a move that caused a cutoff at `depth`.
    pub fn record_cutoff(&mut self, mv: Move, depth: i32) {
        if let Some(d) = Self::depth_slot(depth) {
            let slot = &mut self.killers[d];
            if slot[0] != Some(mv) {
                slot[1] = slot[0];
                slot[0] = Some(mv);
            }
        }
        let h = &mut self.history[mv.tile.index()][mv.end.index()];
        *h = (*h + depth * depth).min(MAX_HISTORY);
    }

    /// Static and learned ordering score of `mv` for the side holding `mine`.
    pub fn score(&self, mv: Move, depth: i32, mine: Hand, theirs: Hand, ends: Ends) -> f64 {
        let tile = mv.tile;
        let mut s = 0.0;

        let [k1, k2] = self.killers(depth);
        if k1 == Some(mv) {
            s += MO_KILLER_1;
        } else if k2 == Some(mv) {
            s += MO_KILLER_2;
        }

        s += self.history(mv) as f64;

        if tile.is_double() {
            s += MO_DOUBLE;
        }
        s += tile.pips() as f64 * MO_PIP_MULT;

        if !has_move(theirs, ends.place(tile, mv.end)) {
            s += MO_FORCE_PASS;
        }

        if theirs.contains(Tile::DOUBLE_ZERO) {
            let mut after = mine;
            after.remove(tile);
            if ghost_active(after.union(theirs)) {
                s += MO_GHOST;
            }
        }
        s
    }

    /// Scores and sorts the moves at `ply` (stable, descending), then moves
    /// `priority` to the front if it is among them.
    pub fn order(
        &self,
        stack: &mut MoveStack,
        ply: usize,
        depth: i32,
        mine: Hand,
        theirs: Hand,
        ends: Ends,
        priority: Option<Move>,
    ) {
        let (moves, scores) = stack.slot_mut(ply);
        if moves.len() > 1 {
            for (mv, score) in moves.iter().zip(scores.iter_mut()) {
                *score = self.score(*mv, depth, mine, theirs, ends);
            }
            insertion_sort_desc(moves, scores);
        }
        if let Some(p) = priority {
            stack.promote(ply, p);
        }
    }
}

/// Insertion sort on parallel slices; move lists are short.
fn insertion_sort_desc(moves: &mut [Move], scores: &mut [f64]) {
    for i in 1..moves.len() {
        let (m, s) = (moves[i], scores[i]);
        let mut j = i;
        while j > 0 && scores[j - 1] < s {
            moves[j] = moves[j - 1];
            scores[j] = scores[j - 1];
            j -= 1;
        }
        moves[j] = m;
        scores[j] = s;
    }
}
