//! Tabulation core for ranked-choice voting.
//!
//! Given a pre-validated table of ranked ballots and a configuration, the
//! crate runs successive elimination and transfer rounds and returns a
//! structured, auditable round-by-round result: instant-runoff for a single
//! seat, proportional surplus transfer for several.
//!
//! Reading ballot files, writing reports, and command-line handling are the
//! business of the surrounding program; this crate only consumes a normalized
//! table and produces a [`TabulationResult`].
//!
//! ```
//! use rcv_tabulator::{tabulate, BallotRow, TabulationConfig};
//!
//! let rows = vec![
//!     BallotRow::weighted(40, &["Alice", "Bob"]),
//!     BallotRow::weighted(35, &["Bob", "Alice"]),
//!     BallotRow::weighted(25, &["Clara", "Alice"]),
//! ];
//! let candidates: Vec<String> =
//!     ["Alice", "Bob", "Clara"].iter().map(|s| s.to_string()).collect();
//! let result = tabulate(&rows, &candidates, &TabulationConfig::SINGLE_SEAT_DEFAULTS)?;
//! assert_eq!(result.winners, vec!["Alice".to_string()]);
//! # Ok::<(), rcv_tabulator::TabulationError>(())
//! ```

mod ballot;
mod builder;
mod config;
mod engine;
mod tally;
mod tiebreak;

use log::info;

pub use crate::ballot::{normalize_rows, Ballot, BallotRow, CandidateId, RankCell, Roster};
pub use crate::builder::Builder;
pub use crate::config::{
    Mode, OvervotePolicy, QuotaRounding, TabulationConfig, TabulationError, TieBreakPolicy,
    UndervotePolicy,
};
pub use crate::engine::{
    CandidateState, Round, RoundAction, TabulationResult, TerminationReason,
};

/// Runs a full tabulation: normalizes the raw rows against the candidate
/// roster, then drives rounds to completion.
///
/// All ballots and the configuration are checked before the first round; any
/// fatal condition aborts with the offending input and no partial result.
pub fn tabulate(
    rows: &[BallotRow],
    candidates: &[String],
    config: &TabulationConfig,
) -> Result<TabulationResult, TabulationError> {
    info!(
        "tabulate: {} rows, {} candidates, mode {:?}",
        rows.len(),
        candidates.len(),
        config.mode
    );
    let roster = Roster::new(candidates)?;
    config.validate(roster.len())?;
    for cid in roster.ids() {
        info!("Candidate {}: {}", cid.0, roster.name(cid));
    }
    let ballots = normalize_rows(rows, &roster, config)?;
    engine::Engine::new(config, &roster, ballots).run()
}

/// Runs a tabulation over already-canonical ballots, skipping normalization.
pub fn tabulate_ballots(
    ballots: Vec<Ballot>,
    candidates: &[String],
    config: &TabulationConfig,
) -> Result<TabulationResult, TabulationError> {
    let roster = Roster::new(candidates)?;
    config.validate(roster.len())?;
    for (row, ballot) in ballots.iter().enumerate() {
        if ballot.weight == 0 {
            return Err(TabulationError::InvalidBallot {
                row,
                token: "weight 0".to_string(),
            });
        }
        if let Some(cid) = ballot
            .ranking
            .iter()
            .find(|cid| cid.index() >= roster.len())
        {
            return Err(TabulationError::InvalidBallot {
                row,
                token: format!("candidate #{}", cid.0),
            });
        }
    }
    engine::Engine::new(config, &roster, ballots).run()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_ballots_tabulate_like_raw_rows() {
        let candidates: Vec<String> = ["A", "B", "C"].iter().map(|s| s.to_string()).collect();
        let config = TabulationConfig::SINGLE_SEAT_DEFAULTS;
        let rows = vec![
            BallotRow::weighted(40, &["A", "B"]),
            BallotRow::weighted(35, &["B", "A"]),
            BallotRow::weighted(25, &["C", "A"]),
        ];
        let roster = Roster::new(&candidates).unwrap();
        let ballots = normalize_rows(&rows, &roster, &config).unwrap();
        let from_rows = tabulate(&rows, &candidates, &config).unwrap();
        let from_ballots = tabulate_ballots(ballots, &candidates, &config).unwrap();
        assert_eq!(from_rows, from_ballots);
    }

    #[test]
    fn out_of_roster_ballot_is_rejected() {
        let candidates: Vec<String> = ["A", "B"].iter().map(|s| s.to_string()).collect();
        let ballots = vec![Ballot {
            ranking: vec![CandidateId(5)],
            weight: 1,
        }];
        let err = tabulate_ballots(
            ballots,
            &candidates,
            &TabulationConfig::SINGLE_SEAT_DEFAULTS,
        )
        .unwrap_err();
        assert!(matches!(err, TabulationError::InvalidBallot { row: 0, .. }));
    }
}
