/// Legal move generation into fixed per-ply buffers.

use crate::board::{End, Ends, Move};
use crate::tiles::{Hand, NUM_TILES};

/// Deepest ply a search can reach: 28 placements with a pass between each.
pub const MAX_PLY: usize = 64;

/// Upper bound on moves at one node (a full hand on an empty board).
pub const MAX_MOVES: usize = NUM_TILES;

const NO_MOVE: Move = Move { tile: crate::tiles::Tile::DOUBLE_ZERO, end: End::Left };

/// Tiles in `hand` playable on either end. On an empty board, the whole hand.
#[inline(always)]
pub fn playable_tiles(hand: Hand, ends: Ends) -> Hand {
    if ends.is_empty() {
        hand
    } else {
        hand.suit(ends.left).union(hand.suit(ends.right))
    }
}

/// Number of distinct tiles `hand` can lay. Used for mobility and block tests.
#[inline(always)]
pub fn count_playable(hand: Hand, ends: Ends) -> i32 {
    playable_tiles(hand, ends).len() as i32
}

#[inline(always)]
pub fn has_move(hand: Hand, ends: Ends) -> bool {
    !playable_tiles(hand, ends).is_empty()
}

/// Writes every legal move into `out`, returning the count.
///
/// Empty board: every tile once, on the left. Otherwise each left-matching
/// tile on the left and each right-matching tile on the right, except that
/// when both ends show the same value the right side would only mirror the
/// left one and is skipped.
#[inline]
pub fn generate_into(hand: Hand, ends: Ends, out: &mut [Move; MAX_MOVES]) -> usize {
    let mut n = 0;
    if ends.is_empty() {
        for tile in hand.iter() {
            out[n] = Move::new(tile, End::Left);
            n += 1;
        }
        return n;
    }

    let left = hand.suit(ends.left);
    for tile in left.iter() {
        out[n] = Move::new(tile, End::Left);
        n += 1;
    }
    let right = if ends.left == ends.right {
        hand.suit(ends.right).difference(left)
    } else {
        hand.suit(ends.right)
    };
    for tile in right.iter() {
        out[n] = Move::new(tile, End::Right);
        n += 1;
    }
    n
}

/// One move buffer (with ordering scores) per ply, allocated once per search context.
pub struct MoveStack {
    moves: Box<[[Move; MAX_MOVES]; MAX_PLY]>,
    scores: Box<[[f64; MAX_MOVES]; MAX_PLY]>,
    len: [usize; MAX_PLY],
}

impl Default for MoveStack {
    fn default() -> Self {
        Self::new()
    }
}

impl MoveStack {
    pub fn new() -> Self {
        MoveStack {
            moves: Box::new([[NO_MOVE; MAX_MOVES]; MAX_PLY]),
            scores: Box::new([[0.0; MAX_MOVES]; MAX_PLY]),
            len: [0; MAX_PLY],
        }
    }

    /// Regenerates the moves at `ply`.
    #[inline]
    pub fn generate(&mut self, ply: usize, hand: Hand, ends: Ends) -> usize {
        let n = generate_into(hand, ends, &mut self.moves[ply]);
        self.len[ply] = n;
        n
    }

    #[inline(always)]
    pub fn get(&self, ply: usize, i: usize) -> Move {
        self.moves[ply][i]
    }

    #[inline(always)]
    pub fn as_slice(&self, ply: usize) -> &[Move] {
        &self.moves[ply][..self.len[ply]]
    }

    /// Moves and their ordering scores at `ply`, for in-place sorting.
    #[inline(always)]
    pub fn slot_mut(&mut self, ply: usize) -> (&mut [Move], &mut [f64]) {
        let n = self.len[ply];
        (&mut self.moves[ply][..n], &mut self.scores[ply][..n])
    }

    /// Moves `mv` to the front at `ply` if present. Returns whether it was found.
    pub fn promote(&mut self, ply: usize, mv: Move) -> bool {
        let n = self.len[ply];
        match self.moves[ply][..n].iter().position(|&m| m == mv) {
            Some(0) => true,
            Some(i) => {
                self.moves[ply][..=i].rotate_right(1);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tiles::Tile;

    fn hand(tiles: &[(u8, u8)]) -> Hand {
        tiles.iter().map(|&(a, b)| Tile::from_pips(a, b).unwrap()).collect()
    }

    fn moves(h: Hand, ends: Ends) -> Vec<Move> {
        let mut buf = [NO_MOVE; MAX_MOVES];
        let n = generate_into(h, ends, &mut buf);
        buf[..n].to_vec()
    }

    #[test]
    fn test_empty_board_lists_every_tile_left() {
        let h = hand(&[(0, 0), (0, 1), (0, 2)]);
        let ms = moves(h, Ends::EMPTY);
        assert_eq!(ms.len(), 3);
        assert!(ms.iter().all(|m| m.end == End::Left));
        assert_eq!(count_playable(h, Ends::EMPTY), 3);
    }

    #[test]
    fn test_two_five_example() {
        let h = hand(&[(2, 4), (5, 6), (1, 1)]);
        let ms = moves(h, Ends::new(2, 5));
        assert_eq!(
            ms,
            vec![
                Move::new(Tile::from_pips(2, 4).unwrap(), End::Left),
                Move::new(Tile::from_pips(5, 6).unwrap(), End::Right),
            ]
        );
    }

    #[test]
    fn test_tile_matching_both_ends_listed_twice() {
        let h = hand(&[(0, 1)]);
        let ms = moves(h, Ends::new(0, 1));
        assert_eq!(ms.len(), 2);
        assert_eq!(count_playable(h, Ends::new(0, 1)), 1);
    }

    #[test]
    fn test_equal_ends_listed_once() {
        let h = hand(&[(3, 3), (3, 6), (1, 1)]);
        let ms = moves(h, Ends::new(3, 3));
        assert_eq!(ms.len(), 2);
        assert!(ms.iter().all(|m| m.end == End::Left));
        assert_eq!(count_playable(h, Ends::new(3, 3)), 2);
    }

    #[test]
    fn test_promote() {
        let mut stack = MoveStack::new();
        let h = hand(&[(2, 4), (2, 6), (5, 6)]);
        let n = stack.generate(3, h, Ends::new(2, 5));
        assert_eq!(n, 3);
        let last = stack.get(3, 2);
        assert!(stack.promote(3, last));
        assert_eq!(stack.get(3, 0), last);
        assert_eq!(stack.as_slice(3).len(), 3);
        let absent = Move::new(Tile::from_pips(1, 1).unwrap(), End::Left);
        assert!(!stack.promote(3, absent));
    }
}
