/// Board ends, moves, players and the two-slot placement history.

use std::fmt;

use crate::tiles::Tile;

/// Sentinel for an end with no tile behind it.
pub const EMPTY_END: u8 = 7;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Player {
    /// The searching side.
    Ai,
    Human,
}

impl Player {
    #[inline(always)]
    pub fn opponent(self) -> Player {
        match self {
            Player::Ai => Player::Human,
            Player::Human => Player::Ai,
        }
    }

    #[inline(always)]
    pub fn index(self) -> usize {
        self as usize
    }

    /// +1 for the searching side, -1 for its opponent.
    #[inline(always)]
    pub fn sign(self) -> i32 {
        match self {
            Player::Ai => 1,
            Player::Human => -1,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Player::Ai => "ai",
            Player::Human => "human",
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum End {
    Left,
    Right,
}

impl End {
    #[inline(always)]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            End::Left => "left",
            End::Right => "right",
        }
    }
}

/// The two exposed pip values of the chain.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Ends {
    pub left: u8,
    pub right: u8,
}

impl Ends {
    pub const EMPTY: Ends = Ends { left: EMPTY_END, right: EMPTY_END };

    pub fn new(left: u8, right: u8) -> Ends {
        Ends { left, right }
    }

    #[inline(always)]
    pub fn is_empty(self) -> bool {
        self.left == EMPTY_END
    }

    #[inline(always)]
    pub fn value(self, end: End) -> u8 {
        match end {
            End::Left => self.left,
            End::Right => self.right,
        }
    }

    /// Whether `tile` may be laid on `end`.
    #[inline(always)]
    pub fn accepts(self, tile: Tile, end: End) -> bool {
        self.is_empty() || tile.has_suit(self.value(end))
    }

    /// Ends after laying `tile` on `end`. The caller guarantees legality.
    /// On an empty board the tile establishes both ends regardless of `end`.
    #[inline(always)]
    pub fn place(self, tile: Tile, end: End) -> Ends {
        if self.is_empty() {
            return Ends { left: tile.low(), right: tile.high() };
        }
        match end {
            End::Left => Ends { left: tile.next_left(self.left), right: self.right },
            End::Right => Ends { left: self.left, right: tile.next_right(self.right) },
        }
    }
}

impl fmt::Display for Ends {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            write!(f, "(empty)")
        } else {
            write!(f, "({}|{})", self.left, self.right)
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Move {
    pub tile: Tile,
    pub end: End,
}

impl Move {
    pub fn new(tile: Tile, end: End) -> Move {
        Move { tile, end }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.tile, self.end.name())
    }
}

/// A non-pass placement as the aggressor rule needs it.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Placement {
    pub player: Player,
    pub ends_after: Ends,
    pub tile: Tile,
}

/// The two most recent placements. Passes are never recorded.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct PlacementHistory {
    pub last: Option<Placement>,
    pub previous: Option<Placement>,
}

impl PlacementHistory {
    #[inline(always)]
    pub fn record(&mut self, placement: Placement) {
        self.previous = self.last;
        self.last = Some(placement);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tile(a: u8, b: u8) -> Tile {
        Tile::from_pips(a, b).unwrap()
    }

    #[test]
    fn test_place_on_empty_board() {
        let ends = Ends::EMPTY.place(tile(5, 2), End::Right);
        assert_eq!(ends, Ends::new(2, 5));
    }

    #[test]
    fn test_place_each_end() {
        let ends = Ends::new(2, 5);
        assert_eq!(ends.place(tile(2, 4), End::Left), Ends::new(4, 5));
        assert_eq!(ends.place(tile(5, 6), End::Right), Ends::new(2, 6));
        assert_eq!(ends.place(tile(5, 5), End::Right), Ends::new(2, 5));
    }

    #[test]
    fn test_accepts() {
        let ends = Ends::new(2, 5);
        assert!(ends.accepts(tile(2, 4), End::Left));
        assert!(!ends.accepts(tile(2, 4), End::Right));
        assert!(Ends::EMPTY.accepts(tile(1, 1), End::Left));
    }

    #[test]
    fn test_history_shift() {
        let mut h = PlacementHistory::default();
        let a = Placement { player: Player::Ai, ends_after: Ends::new(1, 2), tile: tile(1, 2) };
        let b = Placement { player: Player::Human, ends_after: Ends::new(1, 4), tile: tile(2, 4) };
        h.record(a);
        h.record(b);
        assert_eq!(h.last, Some(b));
        assert_eq!(h.previous, Some(a));
    }
}
