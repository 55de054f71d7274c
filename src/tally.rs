//! The vote allocator: per-round vote totals, cursor advancement, and the
//! full-weight and fractional-surplus transfers between rounds.

use log::debug;

use crate::ballot::{Ballot, CandidateId};

/// Weight comparisons tolerate this much floating-point drift.
pub(crate) const WEIGHT_EPSILON: f64 = 1e-9;

/// The arena of ballots with one integer cursor and one remaining weight per
/// ballot. Ballots themselves are immutable; the cursor marks the next
/// unconsidered ranking and only ever moves forward.
///
/// Owned exclusively by the round engine: it is read and written strictly
/// between rounds, never during one.
pub(crate) struct BallotTable {
    ballots: Vec<Ballot>,
    cursors: Vec<usize>,
    weights: Vec<f64>,
}

/// One round's totals: candidate weight indexed by candidate id, plus the
/// exhausted weight.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Tally {
    pub totals: Vec<f64>,
    pub exhausted: f64,
}

/// Where a transfer went: destination weight by candidate id, plus the weight
/// that found no continuing candidate.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TransferRecord {
    pub to: Vec<f64>,
    pub exhausted: f64,
}

impl BallotTable {
    pub fn new(ballots: Vec<Ballot>) -> BallotTable {
        let cursors = vec![0; ballots.len()];
        let weights = ballots.iter().map(|b| b.weight as f64).collect();
        BallotTable {
            ballots,
            cursors,
            weights,
        }
    }

    /// The combined weight of every ballot as supplied, before any surplus
    /// scaling. Fixed for the whole run.
    pub fn total_weight(&self) -> f64 {
        self.ballots.iter().map(|b| b.weight as f64).sum()
    }

    /// The candidate the ballot currently rests on, if any.
    fn current(&self, idx: usize) -> Option<CandidateId> {
        self.ballots[idx].ranking.get(self.cursors[idx]).copied()
    }

    /// Advances every cursor past candidates that can no longer hold votes.
    /// Advancement is monotonic and permanent: a skipped candidate is never
    /// reconsidered.
    pub fn settle(&mut self, continuing: &[bool]) {
        for idx in 0..self.ballots.len() {
            while let Some(cid) = self.current(idx) {
                if continuing[cid.index()] {
                    break;
                }
                self.cursors[idx] += 1;
            }
        }
    }

    /// Credits each ballot's remaining weight to the candidate under its
    /// cursor, or to the exhausted total. Ballots are visited in arena order
    /// so the floating-point sums are reproducible.
    ///
    /// Callers must have settled the table first: a ballot resting on a
    /// non-continuing candidate would be miscounted.
    pub fn tally(&self, num_candidates: usize) -> Tally {
        let mut totals = vec![0.0; num_candidates];
        let mut exhausted = 0.0;
        for idx in 0..self.ballots.len() {
            match self.current(idx) {
                Some(cid) => totals[cid.index()] += self.weights[idx],
                None => exhausted += self.weights[idx],
            }
        }
        Tally { totals, exhausted }
    }

    /// Moves every ballot resting on `from` to its next continuing
    /// preference, scaling its remaining weight by `scale` first.
    ///
    /// `scale` is 1 for an elimination; for a surplus transfer it is
    /// surplus / total, the Gregory transfer value, so that the weight
    /// distributed across destinations sums to exactly the scaled weight.
    pub fn transfer(
        &mut self,
        from: CandidateId,
        continuing: &[bool],
        scale: f64,
        num_candidates: usize,
    ) -> TransferRecord {
        let mut record = TransferRecord {
            to: vec![0.0; num_candidates],
            exhausted: 0.0,
        };
        for idx in 0..self.ballots.len() {
            if self.current(idx) != Some(from) {
                continue;
            }
            self.weights[idx] *= scale;
            self.cursors[idx] += 1;
            while let Some(cid) = self.current(idx) {
                if continuing[cid.index()] {
                    break;
                }
                self.cursors[idx] += 1;
            }
            match self.current(idx) {
                Some(cid) => record.to[cid.index()] += self.weights[idx],
                None => record.exhausted += self.weights[idx],
            }
        }
        debug!(
            "transfer: from {:?} scale {} moved {} exhausted {}",
            from,
            scale,
            record.to.iter().sum::<f64>(),
            record.exhausted
        );
        record
    }
}
