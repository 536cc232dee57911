/// Encoded game state mutated in place by the search.

use crate::board::{Ends, Move, Placement, PlacementHistory, Player};
use crate::tiles::Hand;
use crate::zobrist;

/// Everything `unmake` needs that the XOR toggles cannot recover.
#[derive(Clone, Copy, Debug)]
pub struct Undo {
    played: Option<Move>,
    ends: Ends,
    cons_pass: u8,
    history: PlacementHistory,
}

#[derive(Clone, Debug)]
pub struct Position {
    hands: [Hand; 2],
    board: Hand,
    universe: Hand,
    ends: Ends,
    to_move: Player,
    cons_pass: u8,
    history: PlacementHistory,
    hash: u64,
    ply: usize,
}

impl Position {
    /// Builds a position. Tiles of `universe` outside both hands are on the board.
    pub fn new(
        ai: Hand,
        human: Hand,
        universe: Hand,
        ends: Ends,
        to_move: Player,
        cons_pass: u8,
        history: PlacementHistory,
    ) -> Position {
        let cons_pass = cons_pass.min(1);
        let board = universe.difference(ai.union(human));
        Position {
            hands: [ai, human],
            board,
            universe,
            ends,
            to_move,
            cons_pass,
            history,
            hash: zobrist::full_hash(ai, human, ends, to_move, cons_pass),
            ply: 0,
        }
    }

    #[inline(always)]
    pub fn hand(&self, player: Player) -> Hand {
        self.hands[player.index()]
    }

    #[inline(always)]
    pub fn ai_hand(&self) -> Hand {
        self.hands[Player::Ai.index()]
    }

    #[inline(always)]
    pub fn human_hand(&self) -> Hand {
        self.hands[Player::Human.index()]
    }

    #[inline(always)]
    pub fn both_hands(&self) -> Hand {
        self.hands[0].union(self.hands[1])
    }

    #[inline(always)]
    pub fn board(&self) -> Hand {
        self.board
    }

    #[inline(always)]
    pub fn ends(&self) -> Ends {
        self.ends
    }

    #[inline(always)]
    pub fn to_move(&self) -> Player {
        self.to_move
    }

    #[inline(always)]
    pub fn cons_pass(&self) -> u8 {
        self.cons_pass
    }

    #[inline(always)]
    pub fn history(&self) -> &PlacementHistory {
        &self.history
    }

    #[inline(always)]
    pub fn hash(&self) -> u64 {
        self.hash
    }

    /// Plies made since the search root.
    #[inline(always)]
    pub fn ply(&self) -> usize {
        self.ply
    }

    #[inline(always)]
    pub fn tiles_remaining(&self) -> u32 {
        self.both_hands().len()
    }

    /// Hands disjoint, and hands plus board cover exactly the universe.
    pub fn partition_holds(&self) -> bool {
        let [ai, human] = self.hands;
        ai.intersection(human).is_empty()
            && ai.intersection(self.board).is_empty()
            && human.intersection(self.board).is_empty()
            && ai.union(human).union(self.board) == self.universe
    }

    pub fn compute_hash(&self) -> u64 {
        zobrist::full_hash(self.hands[0], self.hands[1], self.ends, self.to_move, self.cons_pass)
    }

    /// Lays `mv.tile` from the side to move's hand; the turn passes over.
    pub fn make_move(&mut self, mv: Move) -> Undo {
        let undo = Undo {
            played: Some(mv),
            ends: self.ends,
            cons_pass: self.cons_pass,
            history: self.history,
        };
        let mover = self.to_move;
        let new_ends = self.ends.place(mv.tile, mv.end);

        self.hands[mover.index()].remove(mv.tile);
        self.board.insert(mv.tile);
        self.hash ^= zobrist::tile_key(mv.tile, mover);
        self.hash ^= zobrist::ends_key(self.ends) ^ zobrist::ends_key(new_ends);
        self.ends = new_ends;
        if self.cons_pass > 0 {
            self.hash ^= zobrist::pass_key();
            self.cons_pass = 0;
        }
        self.history.record(Placement { player: mover, ends_after: new_ends, tile: mv.tile });
        self.switch_side();
        self.ply += 1;
        undo
    }

    pub fn make_pass(&mut self) -> Undo {
        let undo = Undo {
            played: None,
            ends: self.ends,
            cons_pass: self.cons_pass,
            history: self.history,
        };
        if self.cons_pass == 0 {
            self.hash ^= zobrist::pass_key();
        }
        self.cons_pass = self.cons_pass.saturating_add(1);
        self.switch_side();
        self.ply += 1;
        undo
    }

    /// Reverts the most recent `make_move`/`make_pass`.
    pub fn unmake(&mut self, undo: Undo) {
        self.switch_side();
        self.ply -= 1;
        if (self.cons_pass > 0) != (undo.cons_pass > 0) {
            self.hash ^= zobrist::pass_key();
        }
        self.cons_pass = undo.cons_pass;
        if let Some(mv) = undo.played {
            let mover = self.to_move;
            self.hash ^= zobrist::ends_key(self.ends) ^ zobrist::ends_key(undo.ends);
            self.hash ^= zobrist::tile_key(mv.tile, mover);
            self.board.remove(mv.tile);
            self.hands[mover.index()].insert(mv.tile);
        }
        self.ends = undo.ends;
        self.history = undo.history;
    }

    #[inline(always)]
    fn switch_side(&mut self) {
        self.to_move = self.to_move.opponent();
        self.hash ^= zobrist::side_key();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::End;
    use crate::tiles::{Ruleset, Tile};

    fn tile(a: u8, b: u8) -> Tile {
        Tile::from_pips(a, b).unwrap()
    }

    fn hand(tiles: &[(u8, u8)]) -> Hand {
        tiles.iter().map(|&(a, b)| tile(a, b)).collect()
    }

    fn sample() -> Position {
        let ai = hand(&[(2, 4), (5, 6), (1, 1)]);
        let human = hand(&[(4, 4), (0, 5)]);
        let universe = ai.union(human).union(hand(&[(2, 5)]));
        Position::new(ai, human, universe, Ends::new(2, 5), Player::Ai, 0, PlacementHistory::default())
    }

    #[test]
    fn test_make_unmake_restores_everything() {
        let mut pos = sample();
        let before = pos.clone();
        let undo = pos.make_move(Move::new(tile(2, 4), End::Left));
        assert_eq!(pos.ends(), Ends::new(4, 5));
        assert_eq!(pos.to_move(), Player::Human);
        assert_eq!(pos.ply(), 1);
        assert!(pos.board().contains(tile(2, 4)));
        assert_eq!(pos.hash(), pos.compute_hash());
        assert!(pos.partition_holds());
        pos.unmake(undo);
        assert_eq!(pos.hash(), before.hash());
        assert_eq!(pos.ai_hand(), before.ai_hand());
        assert_eq!(pos.board(), before.board());
        assert_eq!(pos.ends(), before.ends());
        assert_eq!(pos.history(), before.history());
        assert_eq!(pos.ply(), 0);
    }

    #[test]
    fn test_pass_then_placement_clears_counter() {
        let mut pos = sample();
        let root_hash = pos.hash();
        let u1 = pos.make_pass();
        assert_eq!(pos.cons_pass(), 1);
        assert_eq!(pos.to_move(), Player::Human);
        assert_eq!(pos.hash(), pos.compute_hash());
        let u2 = pos.make_move(Move::new(tile(0, 5), End::Right));
        assert_eq!(pos.cons_pass(), 0);
        assert_eq!(pos.hash(), pos.compute_hash());
        pos.unmake(u2);
        assert_eq!(pos.cons_pass(), 1);
        assert_eq!(pos.hash(), pos.compute_hash());
        pos.unmake(u1);
        assert_eq!(pos.hash(), root_hash);
        assert_eq!(pos.to_move(), Player::Ai);
    }

    #[test]
    fn test_partition_full_deal() {
        let universe = Ruleset::default().universe();
        let ai = Hand::from_bits(0x3FFF);
        let human = universe.difference(ai);
        let pos = Position::new(ai, human, universe, Ends::EMPTY, Player::Ai, 0, PlacementHistory::default());
        assert!(pos.partition_holds());
        assert!(pos.board().is_empty());
    }
}
