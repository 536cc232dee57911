/// Terminal scoring: domino (out) wins, blocked games, and the forcing rule
/// that decides who is responsible for a block.
///
/// These results must agree exactly with the rules engine's own tally.

use crate::board::{End, Ends, PlacementHistory, Player};
use crate::movegen::{has_move, playable_tiles};
use crate::position::Position;
use crate::tiles::{ghost_active, Hand, Tile};

/// A blocked game pays the winner this multiple of the loser's pips.
pub const BLOCK_MULTIPLIER: i32 = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutcomeKind {
    Out,
    Block,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Outcome {
    pub kind: OutcomeKind,
    pub winner: Player,
    pub points: i32,
}

impl Outcome {
    /// Signed points from `player`'s point of view.
    #[inline(always)]
    pub fn score_for(self, player: Player) -> i32 {
        if self.winner == player {
            self.points
        } else {
            -self.points
        }
    }
}

/// `winner` emptied their hand; they collect what `loser_hand` holds.
#[inline]
pub fn score_out(winner: Player, loser_hand: Hand) -> Outcome {
    Outcome {
        kind: OutcomeKind::Out,
        winner,
        points: loser_hand.pip_total(ghost_active(loser_hand)),
    }
}

/// Who is responsible for a block.
///
/// Normally the last placer. But if the last placer was forced: their hand
/// before that move had exactly one playable tile against the board the
/// previous placement left, and every way of laying that tile leaves neither
/// hand with a reply. Then the previous placer set the block up and is the
/// aggressor instead.
pub fn detect_aggressor(history: &PlacementHistory, ai: Hand, human: Hand) -> Player {
    let Some(last) = history.last else {
        return Player::Human;
    };
    let Some(previous) = history.previous else {
        return last.player;
    };

    let (placer_now, other) = match last.player {
        Player::Ai => (ai, human),
        Player::Human => (human, ai),
    };
    let mut placer_before = placer_now;
    placer_before.insert(last.tile);

    let board = previous.ends_after;
    let playable = playable_tiles(placer_before, board);
    if playable.len() != 1 {
        return last.player;
    }
    let Some(forced) = playable.first() else {
        return last.player;
    };

    let escapes = |ends: Ends| has_move(other, ends) || has_move(placer_now, ends);
    for end in orientations(forced, board) {
        if escapes(board.place(forced, end)) {
            return last.player;
        }
    }
    previous.player
}

/// Distinct ends `tile` may be laid on. Equal ends collapse to the left.
fn orientations(tile: Tile, ends: Ends) -> impl Iterator<Item = End> {
    let left = ends.accepts(tile, End::Left);
    let right = !ends.is_empty()
        && ends.accepts(tile, End::Right)
        && !(ends.left == ends.right && left);
    [(left, End::Left), (right, End::Right)]
        .into_iter()
        .filter_map(|(ok, end)| ok.then_some(end))
}

/// Scores a blocked game.
///
/// The aggressor wins `BLOCK_MULTIPLIER` times the opponent's pips when their
/// own pips are not higher. Otherwise the opponent wins both hands' pips.
pub fn score_block(history: &PlacementHistory, ai: Hand, human: Hand) -> Outcome {
    let aggressor = detect_aggressor(history, ai, human);
    let ghost = ghost_active(ai.union(human));
    let ai_pips = ai.pip_total(ghost);
    let human_pips = human.pip_total(ghost);
    let (aggr_pips, opp_pips) = match aggressor {
        Player::Ai => (ai_pips, human_pips),
        Player::Human => (human_pips, ai_pips),
    };

    if aggr_pips <= opp_pips {
        Outcome {
            kind: OutcomeKind::Block,
            winner: aggressor,
            points: opp_pips * BLOCK_MULTIPLIER,
        }
    } else {
        Outcome {
            kind: OutcomeKind::Block,
            winner: aggressor.opponent(),
            points: ai_pips + human_pips,
        }
    }
}

/// Terminal check right after a placement: the placer went out, or neither
/// side can lay a tile on the new ends.
#[inline]
pub fn placement_outcome(pos: &Position) -> Option<Outcome> {
    let placer = pos.to_move().opponent();
    let (ai, human) = (pos.ai_hand(), pos.human_hand());
    if pos.hand(placer).is_empty() {
        return Some(score_out(placer, pos.hand(placer.opponent())));
    }
    let ends = pos.ends();
    if !has_move(ai, ends) && !has_move(human, ends) {
        return Some(score_block(pos.history(), ai, human));
    }
    None
}
