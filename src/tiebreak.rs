//! The tie-break resolver. All three policies reduce to a fixed "favour
//! order" fallback computed once at run start, so a rerun with the same
//! configuration resolves every tie identically.

use log::debug;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use crate::ballot::{CandidateId, Roster};
use crate::config::{TabulationError, TieBreakPolicy};

pub(crate) struct TieBreaker {
    policy: TieBreakPolicy,
    names: Vec<String>,
    /// favour[candidate index] = position in the favour order. Lower is more
    /// favoured: wins election ties, survives elimination ties.
    favour: Vec<usize>,
}

impl TieBreaker {
    pub fn new(policy: TieBreakPolicy, seed: Option<u64>, roster: &Roster) -> TieBreaker {
        let names: Vec<String> = roster.ids().map(|cid| roster.name(cid).to_string()).collect();
        let order: Vec<usize> = match policy {
            TieBreakPolicy::SeededRandom => {
                // The permutation is drawn once, before any round, from the
                // configured seed. ChaCha is specified independently of the
                // platform, so reruns and reimplementations agree.
                let seed = seed.expect("validated at run start");
                let mut rng = ChaCha20Rng::seed_from_u64(seed);
                let mut ids: Vec<usize> = (0..names.len()).collect();
                ids.shuffle(&mut rng);
                ids
            }
            // Lexicographic order doubles as the prior-round fallback.
            TieBreakPolicy::Lexicographic | TieBreakPolicy::PriorRound => {
                let mut ids: Vec<usize> = (0..names.len()).collect();
                ids.sort_by(|a, b| names[*a].cmp(&names[*b]));
                ids
            }
        };
        let mut favour = vec![0; names.len()];
        for (pos, idx) in order.iter().enumerate() {
            favour[*idx] = pos;
        }
        debug!("tiebreak: policy {:?} favour order {:?}", policy, order);
        TieBreaker {
            policy,
            names,
            favour,
        }
    }

    /// Picks the one candidate to eliminate among tied lowest candidates.
    pub fn break_for_elimination(
        &self,
        tied: &[CandidateId],
        history: &[Vec<f64>],
    ) -> Result<CandidateId, TabulationError> {
        self.resolve(tied, history, false)
    }

    /// Picks the one candidate to elect first among tied candidates at the
    /// threshold.
    pub fn break_for_election(
        &self,
        tied: &[CandidateId],
        history: &[Vec<f64>],
    ) -> Result<CandidateId, TabulationError> {
        self.resolve(tied, history, true)
    }

    fn resolve(
        &self,
        tied: &[CandidateId],
        history: &[Vec<f64>],
        prefer_high: bool,
    ) -> Result<CandidateId, TabulationError> {
        if tied.is_empty() {
            return Err(TabulationError::TieBreakExhausted(vec![]));
        }
        if tied.len() == 1 {
            return Ok(tied[0]);
        }
        let mut pool: Vec<CandidateId> = tied.to_vec();
        if self.policy == TieBreakPolicy::PriorRound {
            pool = self.narrow_by_prior_rounds(pool, history, prefer_high);
            if pool.len() == 1 {
                return Ok(pool[0]);
            }
        }
        // Elimination takes the least favoured remaining candidate, election
        // the most favoured.
        let pick = if prefer_high {
            pool.iter().min_by_key(|cid| self.favour[cid.index()])
        } else {
            pool.iter().max_by_key(|cid| self.favour[cid.index()])
        };
        match pick {
            Some(cid) => Ok(*cid),
            None => Err(TabulationError::TieBreakExhausted(
                pool.iter()
                    .map(|cid| self.names[cid.index()].clone())
                    .collect(),
            )),
        }
    }

    /// Walks completed rounds from most recent to earliest. At each round
    /// where the pool's totals are not all equal, the pool shrinks to the
    /// candidates with the fewest votes (for elimination) or the most (for
    /// election). An empty or fully tied history leaves the pool untouched.
    fn narrow_by_prior_rounds(
        &self,
        mut pool: Vec<CandidateId>,
        history: &[Vec<f64>],
        prefer_high: bool,
    ) -> Vec<CandidateId> {
        use crate::tally::WEIGHT_EPSILON;
        for totals in history.iter().rev() {
            let bound = pool
                .iter()
                .map(|cid| totals[cid.index()])
                .fold(if prefer_high { f64::MIN } else { f64::MAX }, |acc, t| {
                    if prefer_high {
                        acc.max(t)
                    } else {
                        acc.min(t)
                    }
                });
            let kept: Vec<CandidateId> = pool
                .iter()
                .copied()
                .filter(|cid| (totals[cid.index()] - bound).abs() <= WEIGHT_EPSILON)
                .collect();
            if kept.len() < pool.len() {
                debug!(
                    "tiebreak: prior-round narrowed {:?} to {:?} at totals {:?}",
                    pool, kept, totals
                );
                pool = kept;
            }
            if pool.len() == 1 {
                break;
            }
        }
        pool
    }
}
