use serde::{Deserialize, Serialize};

use crate::wheel::Sector;

/// Result of checking one player selection against the target sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Correct so far; more selections are needed this round.
    Continue,
    /// The whole sequence was reproduced; the next round has been prepared.
    RoundComplete,
    /// Wrong selection; the game is over.
    Failed,
}

/// Owns the growing target sequence and the player's in-progress attempt.
///
/// The sequence is append-only within a game and its length always equals the
/// current level once a game has started.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceController {
    sequence: Vec<Sector>,
    attempt: Vec<Sector>,
    level: u32,
    rng: Rng,
}

impl SequenceController {
    pub fn new(seed: u64) -> Self {
        Self {
            sequence: Vec::new(),
            attempt: Vec::new(),
            level: 1,
            rng: Rng::new(seed),
        }
    }

    /// Starts a fresh game: empty attempt, level 1, one-element sequence.
    pub fn reset(&mut self) {
        self.sequence.clear();
        self.attempt.clear();
        self.level = 1;
        self.extend();
    }

    /// Appends one uniformly random sector to the target sequence.
    pub fn extend(&mut self) {
        let pick = self.rng.next_u32() as usize % Sector::COUNT;
        self.sequence.push(Sector::ALL[pick]);
    }

    /// Records one selection and checks it against the target.
    ///
    /// Must not be called once the attempt already covers the whole sequence;
    /// the caller is expected to have acted on `RoundComplete` or `Failed`.
    pub fn submit(&mut self, sector: Sector) -> SubmitOutcome {
        assert!(
            self.attempt.len() < self.sequence.len(),
            "submit called with a complete attempt"
        );

        self.attempt.push(sector);
        let checked = self.attempt.len() - 1;
        if self.attempt[checked] != self.sequence[checked] {
            // The attempt is kept as-is so the mismatch can be displayed.
            return SubmitOutcome::Failed;
        }

        if self.attempt.len() == self.sequence.len() {
            self.level += 1;
            self.extend();
            self.attempt.clear();
            SubmitOutcome::RoundComplete
        } else {
            SubmitOutcome::Continue
        }
    }

    pub fn clear_attempt(&mut self) {
        self.attempt.clear();
    }

    pub fn sequence(&self) -> &[Sector] {
        &self.sequence
    }

    pub fn attempt(&self) -> &[Sector] {
        &self.attempt
    }

    pub fn level(&self) -> u32 {
        self.level
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct Rng {
    state: u64,
}

impl Rng {
    fn new(seed: u64) -> Self {
        let seed = if seed == 0 {
            0x9E37_79B9_7F4A_7C15
        } else {
            seed
        };
        Self { state: seed }
    }

    fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        (x.wrapping_mul(0x2545_F491_4F6C_DD1D) >> 32) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_leaves_one_element_at_level_one() {
        let mut ctrl = SequenceController::new(7);
        ctrl.reset();
        assert_eq!(ctrl.sequence().len(), 1);
        assert_eq!(ctrl.level(), 1);
        assert!(ctrl.attempt().is_empty());
    }

    #[test]
    fn sequence_length_tracks_level_across_rounds() {
        let mut ctrl = SequenceController::new(7);
        ctrl.reset();

        for _ in 0..5 {
            assert_eq!(ctrl.sequence().len() as u32, ctrl.level());
            let target: Vec<Sector> = ctrl.sequence().to_vec();
            let mut outcome = SubmitOutcome::Continue;
            for &sector in &target {
                outcome = ctrl.submit(sector);
            }
            assert_eq!(outcome, SubmitOutcome::RoundComplete);
            assert!(ctrl.attempt().is_empty());
        }
        assert_eq!(ctrl.level(), 6);
        assert_eq!(ctrl.sequence().len(), 6);
    }

    #[test]
    fn correct_prefix_yields_continue() {
        let mut ctrl = SequenceController::new(7);
        ctrl.reset();
        let target = ctrl.sequence()[0];
        ctrl.submit(target);
        // Level 2: two elements now, first submit of the new round is a prefix.
        let first = ctrl.sequence()[0];
        assert_eq!(ctrl.submit(first), SubmitOutcome::Continue);
        assert_eq!(ctrl.attempt(), &[first]);
    }

    #[test]
    fn mismatch_fails_and_preserves_state() {
        let mut ctrl = SequenceController::new(7);
        ctrl.reset();
        let target = ctrl.sequence()[0];
        let wrong = Sector::ALL
            .into_iter()
            .find(|&s| s != target)
            .expect("four sectors exist");

        let before = ctrl.sequence().to_vec();
        assert_eq!(ctrl.submit(wrong), SubmitOutcome::Failed);
        assert_eq!(ctrl.sequence(), before, "sequence is untouched by failure");
        assert_eq!(ctrl.level(), 1);
        assert_eq!(ctrl.attempt(), &[wrong], "attempt keeps the wrong entry");
    }

    #[test]
    fn round_complete_grows_sequence_by_one() {
        let mut ctrl = SequenceController::new(7);
        ctrl.reset();
        let target = ctrl.sequence()[0];
        assert_eq!(ctrl.submit(target), SubmitOutcome::RoundComplete);
        assert_eq!(ctrl.level(), 2);
        assert_eq!(ctrl.sequence().len(), 2);
        assert_eq!(&ctrl.sequence()[..1], &[target], "prefix is preserved");
    }

    #[test]
    fn same_seed_same_sequence() {
        let mut a = SequenceController::new(42);
        let mut b = SequenceController::new(42);
        a.reset();
        b.reset();
        for _ in 0..8 {
            a.extend();
            b.extend();
        }
        assert_eq!(a.sequence(), b.sequence());
    }

    #[test]
    fn extend_draws_from_all_sectors_eventually() {
        let mut ctrl = SequenceController::new(1);
        ctrl.reset();
        for _ in 0..200 {
            ctrl.extend();
        }
        for sector in Sector::ALL {
            assert!(
                ctrl.sequence().contains(&sector),
                "{sector:?} never drawn in 201 samples"
            );
        }
    }

    #[test]
    #[should_panic(expected = "complete attempt")]
    fn submit_on_complete_attempt_panics() {
        let mut ctrl = SequenceController::new(7);
        ctrl.reset();
        let target = ctrl.sequence()[0];
        let wrong = Sector::ALL
            .into_iter()
            .find(|&s| s != target)
            .expect("four sectors exist");
        // A failed attempt fills the slot without clearing it.
        ctrl.submit(wrong);
        ctrl.submit(wrong);
    }
}
