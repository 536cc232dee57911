/// Zobrist keys, generated at compile time from a fixed xorshift64 stream so
/// hashes are identical across builds and targets.

use crate::board::{Ends, Player};
use crate::tiles::{Hand, Tile, NUM_TILES};

struct ZobristKeys {
    tile: [[u64; 2]; NUM_TILES],
    left: [u64; 8],
    right: [u64; 8],
    side: u64,
    pass: u64,
}

const SEED: u64 = 0x9E37_79B9_7F4A_7C15;

const fn generate() -> ZobristKeys {
    let mut s = SEED;

    macro_rules! next {
        () => {{
            s ^= s << 13;
            s ^= s >> 7;
            s ^= s << 17;
            s
        }};
    }

    let mut tile = [[0u64; 2]; NUM_TILES];
    let mut i = 0;
    while i < NUM_TILES {
        tile[i][0] = next!();
        tile[i][1] = next!();
        i += 1;
    }

    let mut left = [0u64; 8];
    let mut i = 0;
    while i < 8 {
        left[i] = next!();
        i += 1;
    }

    let mut right = [0u64; 8];
    let mut i = 0;
    while i < 8 {
        right[i] = next!();
        i += 1;
    }

    let side = next!();
    let pass = next!();

    ZobristKeys { tile, left, right, side, pass }
}

static KEYS: ZobristKeys = generate();

#[inline(always)]
pub fn tile_key(tile: Tile, owner: Player) -> u64 {
    KEYS.tile[tile.index()][owner.index()]
}

#[inline(always)]
pub fn ends_key(ends: Ends) -> u64 {
    KEYS.left[ends.left as usize] ^ KEYS.right[ends.right as usize]
}

/// Present while the human is to move.
#[inline(always)]
pub fn side_key() -> u64 {
    KEYS.side
}

/// Present while the consecutive-pass counter is nonzero.
#[inline(always)]
pub fn pass_key() -> u64 {
    KEYS.pass
}

/// Hash of a position from scratch.
pub fn full_hash(ai: Hand, human: Hand, ends: Ends, to_move: Player, cons_pass: u8) -> u64 {
    let mut h = ai.iter().fold(0, |h, t| h ^ tile_key(t, Player::Ai));
    h = human.iter().fold(h, |h, t| h ^ tile_key(t, Player::Human));
    h ^= ends_key(ends);
    if to_move == Player::Human {
        h ^= side_key();
    }
    if cons_pass > 0 {
        h ^= pass_key();
    }
    h
}
