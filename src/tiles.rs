/// Tile universe for the double-six set and the hand bitsets built over it.
/// Index order: (0,0),(0,1),...,(0,6),(1,1),(1,2),...,(6,6).

use std::fmt;

pub const NUM_TILES: usize = 28;
pub const MAX_PIP: u8 = 6;

/// Pip score of a stranded double-zero (ghost rule).
pub const GHOST_PIPS: i32 = 13;

/// (low, high) halves for every tile index.
const HALVES: [(u8, u8); NUM_TILES] = {
    let mut t = [(0u8, 0u8); NUM_TILES];
    let mut idx = 0;
    let mut lo = 0u8;
    while lo <= MAX_PIP {
        let mut hi = lo;
        while hi <= MAX_PIP {
            t[idx] = (lo, hi);
            idx += 1;
            hi += 1;
        }
        lo += 1;
    }
    t
};

/// Index lookup by `[low][high]`, `low <= high`.
static INDEX_OF: [[u8; 7]; 7] = {
    let mut m = [[u8::MAX; 7]; 7];
    let mut idx = 0u8;
    let mut lo = 0;
    while lo <= 6 {
        let mut hi = lo;
        while hi <= 6 {
            m[lo][hi] = idx;
            m[hi][lo] = idx;
            idx += 1;
            hi += 1;
        }
        lo += 1;
    }
    m
};

/// Tiles bearing each pip value.
pub const SUIT_MASK: [u32; 7] = {
    let mut m = [0u32; 7];
    let mut idx = 0;
    while idx < NUM_TILES {
        let (lo, hi) = HALVES[idx];
        m[lo as usize] |= 1 << idx;
        m[hi as usize] |= 1 << idx;
        idx += 1;
    }
    m
};

pub const DOUBLE_MASK: u32 = {
    let mut mask = 0u32;
    let mut idx = 0;
    while idx < NUM_TILES {
        if HALVES[idx].0 == HALVES[idx].1 {
            mask |= 1 << idx;
        }
        idx += 1;
    }
    mask
};

/// Face value of each tile.
static PIP_SUM: [u8; NUM_TILES] = {
    let mut t = [0u8; NUM_TILES];
    let mut idx = 0;
    while idx < NUM_TILES {
        t[idx] = HALVES[idx].0 + HALVES[idx].1;
        idx += 1;
    }
    t
};

pub const DOUBLE_ZERO_BIT: u32 = 1;
pub const FULL_SET_MASK: u32 = (1 << NUM_TILES) - 1;

/// [0-1] through [0-6].
pub const ZERO_SUIT_OTHERS: u32 = SUIT_MASK[0] & !DOUBLE_ZERO_BIT;

/// Exposed value after laying a tile against an end showing `v`.
/// Indexed `tile * 8 + v`; `v == 7` is the empty board. `u8::MAX` marks an illegal fit.
/// Left and right differ only on the empty board, where the tile's
/// low half goes left and the high half goes right.
static NEXT_END_LEFT: [u8; NUM_TILES * 8] = next_end_table(true);
static NEXT_END_RIGHT: [u8; NUM_TILES * 8] = next_end_table(false);

const fn next_end_table(left: bool) -> [u8; NUM_TILES * 8] {
    let mut table = [u8::MAX; NUM_TILES * 8];
    let mut idx = 0;
    while idx < NUM_TILES {
        let (lo, hi) = HALVES[idx];
        let mut v = 0u8;
        while v <= MAX_PIP {
            if lo == v {
                table[idx * 8 + v as usize] = hi;
            } else if hi == v {
                table[idx * 8 + v as usize] = lo;
            }
            v += 1;
        }
        table[idx * 8 + 7] = if left { lo } else { hi };
        idx += 1;
    }
    table
}

/// A single tile, identified by its stable index.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Tile(u8);

impl Tile {
    pub const DOUBLE_ZERO: Tile = Tile(0);

    /// Tile from two pip values in either order.
    pub fn from_pips(a: u8, b: u8) -> Option<Tile> {
        if a > MAX_PIP || b > MAX_PIP {
            return None;
        }
        Some(Tile(INDEX_OF[a as usize][b as usize]))
    }

    #[inline(always)]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    #[inline(always)]
    pub fn bit(self) -> u32 {
        1 << self.0
    }

    #[inline(always)]
    pub fn low(self) -> u8 {
        HALVES[self.index()].0
    }

    #[inline(always)]
    pub fn high(self) -> u8 {
        HALVES[self.index()].1
    }

    #[inline(always)]
    pub fn pips(self) -> i32 {
        PIP_SUM[self.index()] as i32
    }

    #[inline(always)]
    pub fn is_double(self) -> bool {
        DOUBLE_MASK & self.bit() != 0
    }

    #[inline(always)]
    pub fn has_suit(self, v: u8) -> bool {
        v <= MAX_PIP && SUIT_MASK[v as usize] & self.bit() != 0
    }

    /// New exposed value when laid on the left end showing `v` (7 = empty).
    #[inline(always)]
    pub(crate) fn next_left(self, v: u8) -> u8 {
        NEXT_END_LEFT[self.index() * 8 + v as usize]
    }

    #[inline(always)]
    pub(crate) fn next_right(self, v: u8) -> u8 {
        NEXT_END_RIGHT[self.index() * 8 + v as usize]
    }

    /// `"low-high"`, the id format the UI uses.
    pub fn id(self) -> String {
        format!("{}-{}", self.low(), self.high())
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}-{}]", self.low(), self.high())
    }
}

/// Set of tiles as a bitmask over tile indices.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Hand(u32);

impl Hand {
    pub const EMPTY: Hand = Hand(0);
    pub const FULL: Hand = Hand(FULL_SET_MASK);

    #[inline(always)]
    pub const fn from_bits(bits: u32) -> Hand {
        Hand(bits & FULL_SET_MASK)
    }

    #[inline(always)]
    pub const fn bits(self) -> u32 {
        self.0
    }

    #[inline(always)]
    pub fn contains(self, tile: Tile) -> bool {
        self.0 & tile.bit() != 0
    }

    #[inline(always)]
    pub fn insert(&mut self, tile: Tile) {
        self.0 |= tile.bit();
    }

    #[inline(always)]
    pub fn remove(&mut self, tile: Tile) {
        self.0 &= !tile.bit();
    }

    #[inline(always)]
    pub fn toggle(&mut self, tile: Tile) {
        self.0 ^= tile.bit();
    }

    #[inline(always)]
    pub fn len(self) -> u32 {
        self.0.count_ones()
    }

    #[inline(always)]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline(always)]
    pub fn union(self, other: Hand) -> Hand {
        Hand(self.0 | other.0)
    }

    #[inline(always)]
    pub fn intersection(self, other: Hand) -> Hand {
        Hand(self.0 & other.0)
    }

    #[inline(always)]
    pub fn difference(self, other: Hand) -> Hand {
        Hand(self.0 & !other.0)
    }

    /// Tiles in this hand bearing pip `v`.
    #[inline(always)]
    pub fn suit(self, v: u8) -> Hand {
        Hand(self.0 & SUIT_MASK[v as usize])
    }

    #[inline(always)]
    pub fn doubles(self) -> Hand {
        Hand(self.0 & DOUBLE_MASK)
    }

    /// Lowest-index tile, if any.
    #[inline(always)]
    pub fn first(self) -> Option<Tile> {
        (self.0 != 0).then(|| Tile(self.0.trailing_zeros() as u8))
    }

    pub fn iter(self) -> HandIter {
        HandIter(self.0)
    }

    /// Pip total. When `ghost` is set a held double-zero counts [`GHOST_PIPS`].
    #[inline]
    pub fn pip_total(self, ghost: bool) -> i32 {
        let mut sum: i32 = self.iter().map(Tile::pips).sum();
        if ghost && self.contains(Tile::DOUBLE_ZERO) {
            sum += GHOST_PIPS;
        }
        sum
    }
}

/// Whether a double-zero still in play is permanently stranded: every other
/// zero-suit tile has left both hands.
#[inline(always)]
pub fn ghost_active(both_hands: Hand) -> bool {
    both_hands.0 & ZERO_SUIT_OTHERS == 0
}

impl FromIterator<Tile> for Hand {
    fn from_iter<I: IntoIterator<Item = Tile>>(iter: I) -> Self {
        let mut hand = Hand::EMPTY;
        for tile in iter {
            hand.insert(tile);
        }
        hand
    }
}

impl fmt::Debug for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

pub struct HandIter(u32);

impl Iterator for HandIter {
    type Item = Tile;

    #[inline(always)]
    fn next(&mut self) -> Option<Tile> {
        if self.0 == 0 {
            return None;
        }
        let idx = self.0.trailing_zeros();
        self.0 &= self.0 - 1;
        Some(Tile(idx as u8))
    }
}

/// Rule variants that change the tile universe.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Ruleset {
    pub exclude_double_zero: bool,
}

impl Ruleset {
    pub fn universe(self) -> Hand {
        if self.exclude_double_zero {
            Hand(FULL_SET_MASK & !DOUBLE_ZERO_BIT)
        } else {
            Hand::FULL
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_round_trip() {
        let mut seen = 0;
        for lo in 0..=6u8 {
            for hi in lo..=6u8 {
                let t = Tile::from_pips(hi, lo).unwrap();
                assert_eq!((t.low(), t.high()), (lo, hi));
                seen += 1;
            }
        }
        assert_eq!(seen, NUM_TILES);
        assert_eq!(Tile::from_pips(0, 6).unwrap().index(), 6);
        assert_eq!(Tile::from_pips(6, 6).unwrap().index(), 27);
        assert!(Tile::from_pips(7, 1).is_none());
    }

    #[test]
    fn test_masks() {
        assert_eq!(SUIT_MASK[0].count_ones(), 7);
        assert_eq!(SUIT_MASK[6].count_ones(), 7);
        assert_eq!(DOUBLE_MASK.count_ones(), 7);
        assert_eq!(ZERO_SUIT_OTHERS.count_ones(), 6);
        assert_eq!(ZERO_SUIT_OTHERS & DOUBLE_ZERO_BIT, 0);
    }

    #[test]
    fn test_next_end() {
        let t = Tile::from_pips(0, 6).unwrap();
        assert_eq!(t.next_left(6), 0);
        assert_eq!(t.next_left(0), 6);
        assert_eq!(t.next_left(3), u8::MAX);
        let t = Tile::from_pips(3, 5).unwrap();
        assert_eq!(t.next_right(3), 5);
        assert_eq!(t.next_right(5), 3);
        assert_eq!(t.next_left(7), 3);
        assert_eq!(t.next_right(7), 5);
        assert_eq!(t.pips(), 8);
    }

    #[test]
    fn test_hand_iter_and_pips() {
        let hand: Hand = [(0, 0), (0, 1), (0, 2)]
            .iter()
            .filter_map(|&(a, b)| Tile::from_pips(a, b))
            .collect();
        assert_eq!(hand.len(), 3);
        assert_eq!(hand.iter().map(Tile::index).collect::<Vec<_>>(), vec![0, 1, 2]);
        assert_eq!(hand.pip_total(false), 3);
        assert_eq!(hand.pip_total(true), 3 + GHOST_PIPS);

        let mut flipped = hand;
        flipped.toggle(Tile::DOUBLE_ZERO);
        assert!(!flipped.contains(Tile::DOUBLE_ZERO));
        flipped.toggle(Tile::DOUBLE_ZERO);
        assert_eq!(flipped, hand);
    }

    #[test]
    fn test_ghost_active() {
        let lone = Hand::from_bits(DOUBLE_ZERO_BIT);
        assert!(ghost_active(lone));
        assert!(!ghost_active(Hand::from_bits(0b11)));
    }

    #[test]
    fn test_ruleset_universe() {
        assert_eq!(Ruleset::default().universe().len(), 28);
        let r = Ruleset { exclude_double_zero: true };
        assert_eq!(r.universe().len(), 27);
        assert!(!r.universe().contains(Tile::DOUBLE_ZERO));
    }
}
