//! Ballot normalization: turning a raw ranked-choice table into canonical
//! ballots according to the configured overvote/undervote/duplicate policies.

use std::collections::{HashMap, HashSet};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::{OvervotePolicy, TabulationConfig, TabulationError, UndervotePolicy};

/// Identifies a candidate by its position in the roster. Stable for the whole
/// tabulation run.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct CandidateId(pub u32);

impl CandidateId {
    pub(crate) fn index(&self) -> usize {
        self.0 as usize
    }
}

/// One cell of the raw ranked-choice table, as supplied by the upstream
/// reader. The reader is expected to have already collapsed its blank and
/// overvote markers into these variants.
#[derive(Eq, PartialEq, Debug, Clone, Hash, Serialize, Deserialize)]
pub enum RankCell {
    /// A candidate identifier, not yet checked against the roster.
    Candidate(String),
    /// The rank was left blank (undervote).
    Blank,
    /// More than one candidate was marked at this rank (overvote).
    Overvote,
}

/// One row of the raw table: a distinct ballot pattern with its weight.
/// Rank cells are in priority order, highest priority first.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct BallotRow {
    /// Pre-aggregated count for this pattern. Must be at least 1.
    pub weight: u64,
    pub ranks: Vec<RankCell>,
}

impl BallotRow {
    /// A row with weight 1 ranking the given candidates in order.
    pub fn simple(names: &[&str]) -> BallotRow {
        BallotRow {
            weight: 1,
            ranks: names
                .iter()
                .map(|n| RankCell::Candidate(n.to_string()))
                .collect(),
        }
    }

    /// A pre-aggregated row ranking the given candidates in order.
    pub fn weighted(weight: u64, names: &[&str]) -> BallotRow {
        BallotRow {
            weight,
            ..BallotRow::simple(names)
        }
    }
}

/// A canonical ballot: a deduplicated candidate sequence plus an integer
/// weight. Immutable once normalized; the engine tracks a separate cursor per
/// ballot instead of mutating it.
///
/// A ballot whose policies removed every ranking is kept with an empty
/// sequence: its weight counts as exhausted from round 1.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct Ballot {
    pub ranking: Vec<CandidateId>,
    pub weight: u64,
}

/// The configured candidate list, with name-to-id resolution.
#[derive(Debug, Clone)]
pub struct Roster {
    names: Vec<String>,
    by_name: HashMap<String, CandidateId>,
}

impl Roster {
    pub fn new(names: &[String]) -> Result<Roster, TabulationError> {
        if names.is_empty() {
            return Err(TabulationError::NoCandidates);
        }
        let mut by_name: HashMap<String, CandidateId> = HashMap::new();
        for (idx, name) in names.iter().enumerate() {
            if by_name
                .insert(name.clone(), CandidateId(idx as u32))
                .is_some()
            {
                return Err(TabulationError::DuplicateCandidate(name.clone()));
            }
        }
        Ok(Roster {
            names: names.to_vec(),
            by_name,
        })
    }

    pub fn id(&self, name: &str) -> Option<CandidateId> {
        self.by_name.get(name).copied()
    }

    pub fn name(&self, cid: CandidateId) -> &str {
        &self.names[cid.index()]
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// All candidate ids in roster order.
    pub fn ids(&self) -> impl Iterator<Item = CandidateId> + '_ {
        (0..self.names.len()).map(|idx| CandidateId(idx as u32))
    }
}

/// Normalizes a raw table into canonical ballots.
///
/// Every row must be valid before any round runs: the first malformed row
/// aborts with [`TabulationError::InvalidBallot`].
pub fn normalize_rows(
    rows: &[BallotRow],
    roster: &Roster,
    config: &TabulationConfig,
) -> Result<Vec<Ballot>, TabulationError> {
    let mut ballots = Vec::with_capacity(rows.len());
    for (row, raw) in rows.iter().enumerate() {
        ballots.push(normalize_row(row, raw, roster, config)?);
    }
    debug!("normalize_rows: {} rows normalized", ballots.len());
    Ok(ballots)
}

fn normalize_row(
    row: usize,
    raw: &BallotRow,
    roster: &Roster,
    config: &TabulationConfig,
) -> Result<Ballot, TabulationError> {
    if raw.weight == 0 {
        return Err(TabulationError::InvalidBallot {
            row,
            token: "weight 0".to_string(),
        });
    }
    // An unknown candidate name is an input error anywhere in the row, even
    // past a truncation point.
    for cell in raw.ranks.iter() {
        if let RankCell::Candidate(name) = cell {
            if roster.id(name).is_none() {
                return Err(TabulationError::InvalidBallot {
                    row,
                    token: name.clone(),
                });
            }
        }
    }

    let mut ranking: Vec<CandidateId> = Vec::new();
    let mut seen: HashSet<CandidateId> = HashSet::new();
    for cell in raw.ranks.iter() {
        match cell {
            RankCell::Candidate(name) => {
                let cid = roster.id(name).expect("checked above");
                // Duplicate ranking: only the first occurrence counts. A
                // repeat never truncates the sequence.
                if seen.insert(cid) {
                    ranking.push(cid);
                }
            }
            RankCell::Blank => match config.undervote_policy {
                UndervotePolicy::Skip => continue,
                UndervotePolicy::Truncate => break,
            },
            RankCell::Overvote => match config.overvote_policy {
                OvervotePolicy::Exhaust => break,
                OvervotePolicy::Skip => continue,
            },
        }
    }
    Ok(Ballot {
        ranking,
        weight: raw.weight,
    })
}
