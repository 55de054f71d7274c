use crate::ballot::{BallotRow, RankCell};
use crate::config::{TabulationConfig, TabulationError};
use crate::engine::TabulationResult;

/// An incremental API for assembling a tabulation run.
///
/// Each rank position is given as the list of candidates marked at that
/// position, so overvotes and blanks are classified here rather than by the
/// caller.
///
/// ```
/// use rcv_tabulator::{Builder, TabulationConfig};
///
/// let mut builder = Builder::new(&TabulationConfig::SINGLE_SEAT_DEFAULTS)
///     .candidates(&["Alice".to_string(), "Bob".to_string()]);
/// builder.add_ranking_simple(&["Alice".to_string(), "Bob".to_string()]);
/// builder.add_ranking_simple(&["Bob".to_string()]);
/// builder.add_ranking_simple(&["Alice".to_string()]);
/// let result = builder.tabulate()?;
/// assert_eq!(result.winners, vec!["Alice".to_string()]);
/// # Ok::<(), rcv_tabulator::TabulationError>(())
/// ```
pub struct Builder {
    config: TabulationConfig,
    candidates: Option<Vec<String>>,
    rows: Vec<BallotRow>,
}

impl Builder {
    pub fn new(config: &TabulationConfig) -> Builder {
        Builder {
            config: config.clone(),
            candidates: None,
            rows: Vec::new(),
        }
    }

    pub fn candidates(mut self, names: &[String]) -> Builder {
        self.candidates = Some(names.to_vec());
        self
    }

    /// Adds one ballot pattern with the given weight. Each element of
    /// `choices` holds the candidates marked at that rank: an empty list or a
    /// single empty string is a blank, more than one entry is an overvote.
    pub fn add_ranking(&mut self, choices: &[Vec<String>], weight: u64) {
        let ranks: Vec<RankCell> = choices
            .iter()
            .map(|c| match c.as_slice() {
                [] => RankCell::Blank,
                [s] if s.is_empty() => RankCell::Blank,
                [s] => RankCell::Candidate(s.clone()),
                _ => RankCell::Overvote,
            })
            .collect();
        self.rows.push(BallotRow {
            weight,
            ranks,
        });
    }

    /// Adds one ballot with weight 1 and exactly one candidate per rank.
    pub fn add_ranking_simple(&mut self, choices: &[String]) {
        let per_rank: Vec<Vec<String>> = choices.iter().map(|c| vec![c.clone()]).collect();
        self.add_ranking(&per_rank, 1);
    }

    /// Runs the tabulation over the collected ballots.
    pub fn tabulate(&self) -> Result<TabulationResult, TabulationError> {
        let candidates = self
            .candidates
            .as_deref()
            .ok_or(TabulationError::NoCandidates)?;
        crate::tabulate(&self.rows, candidates, &self.config)
    }
}
