/// Static evaluation: weighted pip, mobility, tile-count, suit-control, ghost
/// and double terms, scaled by game phase and match standing.

use crate::board::Ends;
use crate::config::{EvalWeights, PhaseScale};
use crate::movegen::count_playable;
use crate::tiles::{ghost_active, Hand, Tile, ZERO_SUIT_OTHERS};

pub struct Evaluator {
    weights: EvalWeights,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new(EvalWeights::default())
    }
}

impl Evaluator {
    pub fn new(weights: EvalWeights) -> Self {
        Self { weights }
    }

    /// Score of a non-terminal position for the AI (positive = AI better).
    /// `match_diff` is the AI match score minus the human's.
    pub fn evaluate(&self, ai: Hand, human: Hand, ends: Ends, match_diff: i32) -> i32 {
        self.evaluate_f64(ai, human, ends, match_diff) as i32
    }

    pub fn evaluate_f64(&self, ai: Hand, human: Hand, ends: Ends, match_diff: i32) -> f64 {
        let w = &self.weights;
        let both = ai.union(human);
        let ghost = ghost_active(both);

        let pip_score = (human.pip_total(ghost) - ai.pip_total(ghost)) as f64 * w.pip;
        let mob_score =
            (count_playable(ai, ends) - count_playable(human, ends)) as f64 * w.mobility;
        let tile_score = (human.len() as f64 - ai.len() as f64) * w.tile;
        let suit_score = self.suit_control(ai, human, ends);
        let ghost_score = self.ghost_pressure(ai, human);
        let double_score = double_weight(human) - double_weight(ai);

        let scale = self.phase_scale(both.len(), match_diff);

        pip_score * scale.pip
            + mob_score * scale.mobility
            + tile_score
            + suit_score * scale.suit
            + ghost_score
            + double_score * w.double * scale.double
    }

    /// Tiles held on the exposed suits, plus lock-in bonuses when the human has
    /// nothing for an end.
    fn suit_control(&self, ai: Hand, human: Hand, ends: Ends) -> f64 {
        let w = &self.weights;
        if ends.is_empty() {
            return 0.0;
        }
        let h_l = human.suit(ends.left).len() as f64;
        let a_l = ai.suit(ends.left).len() as f64;
        if ends.left == ends.right {
            let mut s = (a_l - h_l) * w.suit * 2.0;
            if h_l == 0.0 {
                s += w.lockin * 2.0 + w.lockin_both;
            }
            return s;
        }
        let h_r = human.suit(ends.right).len() as f64;
        let a_r = ai.suit(ends.right).len() as f64;
        let mut s = (a_l + a_r - h_l - h_r) * w.suit;
        if h_l == 0.0 {
            s += w.lockin;
        }
        if h_r == 0.0 {
            s += w.lockin;
        }
        if h_l == 0.0 && h_r == 0.0 {
            s += w.lockin_both;
        }
        s
    }

    /// A held double-zero is dead weight once its holder has no other
    /// zero-suit tile left; fully stranded once neither hand does.
    fn ghost_pressure(&self, ai: Hand, human: Hand) -> f64 {
        let w = &self.weights;
        let stranded = |holder: Hand, other: Hand| -> f64 {
            if !holder.contains(Tile::DOUBLE_ZERO) || holder.bits() & ZERO_SUIT_OTHERS != 0 {
                0.0
            } else if other.bits() & ZERO_SUIT_OTHERS == 0 {
                w.ghost
            } else {
                w.ghost * w.ghost_pressure
            }
        };
        stranded(human, ai) - stranded(ai, human)
    }

    fn phase_scale(&self, tiles_remaining: u32, match_diff: i32) -> PhaseScale {
        let w = &self.weights;
        let mut scale = if tiles_remaining >= w.opening_tiles {
            w.opening
        } else if tiles_remaining < w.endgame_tiles {
            w.endgame
        } else {
            w.midgame
        };
        if match_diff >= w.match_threshold {
            scale.pip *= w.leading_pip;
            scale.suit *= w.leading_suit;
        } else if match_diff <= -w.match_threshold {
            scale.pip *= w.trailing_pip;
            scale.suit *= w.trailing_suit;
            scale.mobility *= w.trailing_mobility;
        }
        scale
    }
}

/// Doubles only match one suit; each counts its pips plus two.
fn double_weight(hand: Hand) -> f64 {
    hand.doubles().iter().map(|t| (t.pips() + 2) as f64).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hand(tiles: &[(u8, u8)]) -> Hand {
        tiles.iter().map(|&(a, b)| Tile::from_pips(a, b).unwrap()).collect()
    }

    #[test]
    fn test_fewer_tiles_is_better() {
        let ev = Evaluator::default();
        let ai = hand(&[(0, 0)]);
        let human = hand(&[(0, 1), (0, 2), (0, 3), (6, 6)]);
        assert!(ev.evaluate(ai, human, Ends::new(0, 0), 0) > 0);
    }

    #[test]
    fn test_mirror_positions_have_opposite_sign() {
        let ev = Evaluator::default();
        let a = hand(&[(1, 2), (4, 6), (5, 5)]);
        let b = hand(&[(1, 1), (3, 4)]);
        let ends = Ends::new(1, 4);
        assert!(ev.evaluate_f64(b, a, ends, 0) > 0.0);
        assert!(ev.evaluate_f64(a, b, ends, 0) < 0.0);
    }

    #[test]
    fn test_match_standing_changes_score() {
        let ev = Evaluator::default();
        let ai = hand(&[(0, 0), (0, 1), (0, 2)]);
        let human = hand(&[(0, 3), (0, 4), (0, 5)]);
        let lead = ev.evaluate_f64(ai, human, Ends::new(0, 1), 100);
        let trail = ev.evaluate_f64(ai, human, Ends::new(0, 1), -100);
        assert_ne!(lead, trail);
    }

    #[test]
    fn test_ghost_pressure_levels() {
        let ev = Evaluator::default();
        let w = EvalWeights::default();
        // Human's double-zero, every other zero tile gone.
        let full = ev.ghost_pressure(hand(&[(6, 6)]), hand(&[(0, 0)]));
        assert_eq!(full, w.ghost);
        // Human holds no other zero tile, AI still has one.
        let partial = ev.ghost_pressure(hand(&[(0, 4)]), hand(&[(0, 0)]));
        assert_eq!(partial, w.ghost * w.ghost_pressure);
        // Human can still reach zero through its own tile.
        assert_eq!(ev.ghost_pressure(hand(&[(6, 6)]), hand(&[(0, 0), (0, 3)])), 0.0);
        // Mirrored for the AI.
        assert_eq!(ev.ghost_pressure(hand(&[(0, 0)]), hand(&[(6, 6)])), -w.ghost);
    }

    #[test]
    fn test_lockin_bonus() {
        let ev = Evaluator::default();
        let ai = hand(&[(3, 4)]);
        let locked = ev.suit_control(ai, hand(&[(1, 1)]), Ends::new(3, 5));
        let open = ev.suit_control(ai, hand(&[(1, 3)]), Ends::new(3, 5));
        assert!(locked > open);
    }

    #[test]
    fn test_custom_weights() {
        let mut w = EvalWeights::default();
        w.tile = 0.0;
        w.pip = 0.0;
        w.double = 0.0;
        w.mobility = 0.0;
        w.suit = 0.0;
        w.lockin = 0.0;
        w.lockin_both = 0.0;
        let ev = Evaluator::new(w);
        assert_eq!(ev.evaluate(hand(&[(1, 2)]), hand(&[(3, 4), (5, 6)]), Ends::new(1, 3), 0), 0);
    }
}
