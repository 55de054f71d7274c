// ********* Configuration and error taxonomy ***********

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Whether the contest fills a single seat (instant-runoff) or several seats
/// (proportional surplus transfer).
#[derive(Eq, PartialEq, Debug, Clone, Copy, Serialize, Deserialize)]
pub enum Mode {
    SingleSeat,
    MultiSeat,
}

/// What to do with a rank position where more than one candidate was marked.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Serialize, Deserialize)]
pub enum OvervotePolicy {
    /// The ballot's ranking sequence ends at the overvoted rank.
    Exhaust,
    /// The overvoted rank is dropped and the following ranks are kept.
    Skip,
}

/// What to do with a rank position that was left blank.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Serialize, Deserialize)]
pub enum UndervotePolicy {
    /// The blank rank is treated as absent and reading continues.
    Skip,
    /// The ballot's ranking sequence ends at the first blank rank.
    Truncate,
}

/// How to pick exactly one candidate among tied candidates.
///
/// Whatever the policy, the resolution must be reproducible: running the same
/// ballots and configuration twice picks the same candidate.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Serialize, Deserialize)]
pub enum TieBreakPolicy {
    /// Order candidates by identifier. Earlier names are favoured: they win
    /// election ties and survive elimination ties.
    Lexicographic,
    /// Order candidates by a permutation drawn once at run start from the
    /// configured seed.
    SeededRandom,
    /// Compare the tied candidates' totals in the most recent prior round
    /// where they differed, recursing to earlier rounds, falling back to
    /// lexicographic order if every round ties.
    PriorRound,
}

/// The rounding convention for the multi-seat election quota.
///
/// Jurisdictions vary on this, so it is a configuration choice rather than a
/// constant.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Serialize, Deserialize)]
pub enum QuotaRounding {
    /// Droop quota: floor(valid weight / (seats + 1)) + 1. A candidate at or
    /// above the quota is elected.
    FloorPlusOne,
    /// Exact quota: valid weight / (seats + 1), no rounding. A candidate must
    /// strictly exceed the quota to be elected.
    Exact,
}

/// The recognized configuration options for a tabulation run.
#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct TabulationConfig {
    pub mode: Mode,
    /// Number of seats to fill. Must be 1 in single-seat mode.
    pub seats: u32,
    pub overvote_policy: OvervotePolicy,
    pub undervote_policy: UndervotePolicy,
    pub tie_break: TieBreakPolicy,
    /// Required when `tie_break` is `SeededRandom`.
    pub tie_break_seed: Option<u64>,
    /// Only consulted in multi-seat mode.
    pub quota_rounding: QuotaRounding,
}

impl TabulationConfig {
    /// A single-seat instant-runoff contest with the most common policies.
    pub const SINGLE_SEAT_DEFAULTS: TabulationConfig = TabulationConfig {
        mode: Mode::SingleSeat,
        seats: 1,
        overvote_policy: OvervotePolicy::Exhaust,
        undervote_policy: UndervotePolicy::Skip,
        tie_break: TieBreakPolicy::Lexicographic,
        tie_break_seed: None,
        quota_rounding: QuotaRounding::FloorPlusOne,
    };

    /// A multi-seat contest with the most common policies.
    pub fn multi_seat(seats: u32) -> TabulationConfig {
        TabulationConfig {
            mode: Mode::MultiSeat,
            seats,
            ..TabulationConfig::SINGLE_SEAT_DEFAULTS
        }
    }

    /// Checks the configuration against the candidate roster before any round
    /// runs. All fatal configuration conditions are caught here.
    pub(crate) fn validate(&self, num_candidates: usize) -> Result<(), TabulationError> {
        if self.seats == 0 {
            return Err(TabulationError::SeatsOutOfRange {
                seats: self.seats,
                candidates: num_candidates,
            });
        }
        if self.mode == Mode::SingleSeat && self.seats != 1 {
            return Err(TabulationError::SeatsOutOfRange {
                seats: self.seats,
                candidates: num_candidates,
            });
        }
        if self.seats as usize >= num_candidates {
            return Err(TabulationError::SeatsOutOfRange {
                seats: self.seats,
                candidates: num_candidates,
            });
        }
        if self.tie_break == TieBreakPolicy::SeededRandom && self.tie_break_seed.is_none() {
            return Err(TabulationError::MissingTieBreakSeed);
        }
        Ok(())
    }
}

/// Conditions that abort a run. Exhausted ballots and degenerate standings
/// are not errors: the engine reports them as termination states instead.
#[derive(Error, Eq, PartialEq, Debug, Clone)]
pub enum TabulationError {
    /// A raw row could not be turned into a canonical ballot. The row index
    /// and the offending token are surfaced to the caller.
    #[error("invalid ballot at row {row}: {token:?}")]
    InvalidBallot { row: usize, token: String },
    /// The candidate roster is empty.
    #[error("no candidates configured")]
    NoCandidates,
    /// The same candidate identifier appears twice in the roster.
    #[error("duplicate candidate in roster: {0:?}")]
    DuplicateCandidate(String),
    /// The seat count does not fit the mode or the roster.
    #[error("{seats} seat(s) cannot be filled from {candidates} candidate(s)")]
    SeatsOutOfRange { seats: u32, candidates: usize },
    /// The seeded-random tie-break policy was selected without a seed.
    #[error("tie_break is seeded-random but no tie_break_seed was provided")]
    MissingTieBreakSeed,
    /// The configured tie-break policy could not single out one candidate.
    #[error("tie-break policy exhausted for candidates {0:?}")]
    TieBreakExhausted(Vec<String>),
    /// Internal guard: the round count exceeded any plausible contest size.
    #[error("tabulation did not converge within the round limit")]
    NoConvergence,
}
