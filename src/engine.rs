//! The round engine: the state machine driving elimination and transfer
//! rounds until a majority winner emerges, every seat is filled, or no
//! transferable votes remain.

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::ballot::{Ballot, CandidateId, Roster};
use crate::config::{Mode, QuotaRounding, TabulationConfig, TabulationError, TieBreakPolicy};
use crate::tally::{BallotTable, Tally, TransferRecord, WEIGHT_EPSILON};
use crate::tiebreak::TieBreaker;

/// Per-candidate state. Eliminated and Elected are terminal: a candidate
/// never returns to Active.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Serialize, Deserialize)]
pub enum CandidateState {
    Active,
    Eliminated,
    Elected,
}

/// What the engine did at the end of a round.
#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub enum RoundAction {
    /// The lowest candidate was removed and each of their ballots moved at
    /// full weight to its next continuing preference, or exhausted.
    Eliminate {
        candidate: String,
        transfers: Vec<(String, f64)>,
        exhausted: f64,
    },
    /// A candidate reached the winning threshold. In multi-seat mode the
    /// surplus above the quota is redistributed at the Gregory transfer
    /// value; a single-seat majority win terminates the run and transfers
    /// nothing.
    Elect {
        candidate: String,
        surplus: f64,
        transfers: Vec<(String, f64)>,
        exhausted: f64,
    },
    /// The remaining candidates won by default: no transferable votes were
    /// left to separate them.
    ElectByDefault { candidates: Vec<String> },
}

/// An append-only snapshot of one round. Together the rounds form the audit
/// trail of every elimination, transfer, and exhaustion event.
#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct Round {
    /// Strictly increasing from 1.
    pub round: u32,
    /// Vote totals at the start of the round for every candidate not yet
    /// eliminated, in roster order. An already-elected candidate appears
    /// with the quota weight they retain.
    pub tally: Vec<(String, f64)>,
    /// Weight held by ballots with no remaining valid preference.
    pub exhausted: f64,
    pub actions: Vec<RoundAction>,
}

/// Why the run stopped.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Serialize, Deserialize)]
pub enum TerminationReason {
    /// Single-seat: a candidate holds more than half of the non-exhausted
    /// weight.
    Majority,
    /// Multi-seat: the elected count reached the seat count.
    SeatsFilled,
    /// No further transfer could change the outcome; the remaining
    /// candidates won by default.
    NoTransferable,
}

/// The structured output handed to the reporting collaborator. The core
/// writes no files.
#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct TabulationResult {
    pub rounds: Vec<Round>,
    /// Winner names in order of election.
    pub winners: Vec<String>,
    pub termination: TerminationReason,
    /// The tie-break policy (and seed, if any) in force, recorded for
    /// auditability.
    pub tie_break: TieBreakPolicy,
    pub tie_break_seed: Option<u64>,
    /// The winning threshold at the deciding round: half the valid weight in
    /// single-seat mode, the quota in multi-seat mode.
    pub threshold: f64,
}

// Guard against a cycle that would never terminate. No real contest comes
// anywhere close.
const MAX_ROUNDS: usize = 10_000;

pub(crate) struct Engine<'a> {
    config: &'a TabulationConfig,
    roster: &'a Roster,
    table: BallotTable,
    total_weight: f64,
    states: Vec<CandidateState>,
    /// Quota weight kept by each elected candidate after surplus transfer.
    retained: Vec<f64>,
    /// Completed rounds' per-candidate totals, for prior-round tie-breaks.
    history: Vec<Vec<f64>>,
    rounds: Vec<Round>,
    breaker: TieBreaker,
    /// Winners in order of election.
    elected: Vec<CandidateId>,
    /// Fixed at round 1 in multi-seat mode.
    quota: Option<f64>,
}

impl<'a> Engine<'a> {
    pub fn new(config: &'a TabulationConfig, roster: &'a Roster, ballots: Vec<Ballot>) -> Engine<'a> {
        let n = roster.len();
        let table = BallotTable::new(ballots);
        let total_weight = table.total_weight();
        Engine {
            breaker: TieBreaker::new(config.tie_break, config.tie_break_seed, roster),
            table,
            total_weight,
            states: vec![CandidateState::Active; n],
            retained: vec![0.0; n],
            history: Vec::new(),
            rounds: Vec::new(),
            elected: Vec::new(),
            quota: None,
            config,
            roster,
        }
    }

    pub fn run(mut self) -> Result<TabulationResult, TabulationError> {
        info!(
            "run: mode {:?}, {} candidates, total weight {}",
            self.config.mode,
            self.roster.len(),
            self.total_weight
        );
        loop {
            if self.rounds.len() >= MAX_ROUNDS {
                return Err(TabulationError::NoConvergence);
            }
            let round_id = self.rounds.len() as u32 + 1;
            let continuing = self.continuing();
            self.table.settle(&continuing);
            let tally = self.table.tally(self.roster.len());
            info!(
                "Round {}: totals {:?}, exhausted {}",
                round_id, tally.totals, tally.exhausted
            );

            // Snapshots taken before this round's actions.
            let tally_rows = self.tally_rows(&tally);
            let full_totals = self.full_totals(&tally);

            let finished = match self.config.mode {
                Mode::SingleSeat => self.single_seat_round(round_id, &tally, tally_rows)?,
                Mode::MultiSeat => self.multi_seat_round(round_id, &tally, tally_rows)?,
            };
            self.history.push(full_totals);
            if let Some(result) = finished {
                return Ok(result);
            }
        }
    }

    fn continuing(&self) -> Vec<bool> {
        self.states
            .iter()
            .map(|s| *s == CandidateState::Active)
            .collect()
    }

    fn actives(&self) -> Vec<CandidateId> {
        self.roster
            .ids()
            .filter(|cid| self.states[cid.index()] == CandidateState::Active)
            .collect()
    }

    /// The round record's tally rows: every non-eliminated candidate in
    /// roster order, elected candidates at their retained weight.
    fn tally_rows(&self, tally: &Tally) -> Vec<(String, f64)> {
        self.roster
            .ids()
            .filter_map(|cid| {
                let name = self.roster.name(cid).to_string();
                match self.states[cid.index()] {
                    CandidateState::Eliminated => None,
                    CandidateState::Elected => Some((name, self.retained[cid.index()])),
                    CandidateState::Active => Some((name, tally.totals[cid.index()])),
                }
            })
            .collect()
    }

    /// Per-candidate totals indexed by candidate id, for the tie-break
    /// history. Eliminated candidates hold zero.
    fn full_totals(&self, tally: &Tally) -> Vec<f64> {
        self.roster
            .ids()
            .map(|cid| match self.states[cid.index()] {
                CandidateState::Eliminated => 0.0,
                CandidateState::Elected => self.retained[cid.index()],
                CandidateState::Active => tally.totals[cid.index()],
            })
            .collect()
    }

    fn named_transfers(&self, record: &TransferRecord) -> Vec<(String, f64)> {
        self.roster
            .ids()
            .filter(|cid| record.to[cid.index()] > 0.0)
            .map(|cid| (self.roster.name(cid).to_string(), record.to[cid.index()]))
            .collect()
    }

    fn single_seat_round(
        &mut self,
        round_id: u32,
        tally: &Tally,
        tally_rows: Vec<(String, f64)>,
    ) -> Result<Option<TabulationResult>, TabulationError> {
        let actives = self.actives();
        let valid = self.total_weight - tally.exhausted;

        // Every ballot exhausted: the survivors win by default.
        if valid <= WEIGHT_EPSILON {
            let round = self.elect_by_default(round_id, tally_rows, tally.exhausted, &actives);
            self.rounds.push(round);
            return Ok(Some(self.finish(TerminationReason::NoTransferable, 0.0)));
        }

        let threshold = valid / 2.0;
        if let Some(winner) = actives
            .iter()
            .copied()
            .find(|cid| tally.totals[cid.index()] > threshold)
        {
            info!(
                "Round {}: {} holds a majority ({} of {} valid)",
                round_id,
                self.roster.name(winner),
                tally.totals[winner.index()],
                valid
            );
            self.states[winner.index()] = CandidateState::Elected;
            self.retained[winner.index()] = tally.totals[winner.index()];
            self.elected.push(winner);
            self.rounds.push(Round {
                round: round_id,
                tally: tally_rows,
                exhausted: tally.exhausted,
                actions: vec![RoundAction::Elect {
                    candidate: self.roster.name(winner).to_string(),
                    surplus: 0.0,
                    transfers: vec![],
                    exhausted: 0.0,
                }],
            });
            return Ok(Some(self.finish(TerminationReason::Majority, threshold)));
        }

        let action = self.eliminate_lowest(&actives, tally)?;
        self.rounds.push(Round {
            round: round_id,
            tally: tally_rows,
            exhausted: tally.exhausted,
            actions: vec![action],
        });
        Ok(None)
    }

    fn multi_seat_round(
        &mut self,
        round_id: u32,
        tally: &Tally,
        tally_rows: Vec<(String, f64)>,
    ) -> Result<Option<TabulationResult>, TabulationError> {
        let seats = self.config.seats as usize;
        let actives = self.actives();
        let valid = self.total_weight - tally.exhausted;
        let quota = match self.quota {
            Some(q) => q,
            None => {
                // The quota is fixed from the round-1 valid weight.
                let q = match self.config.quota_rounding {
                    QuotaRounding::FloorPlusOne => {
                        (valid / (self.config.seats as f64 + 1.0)).floor() + 1.0
                    }
                    QuotaRounding::Exact => valid / (self.config.seats as f64 + 1.0),
                };
                info!("Round {}: quota fixed at {}", round_id, q);
                self.quota = Some(q);
                q
            }
        };
        let remaining_seats = seats - self.elected.len();

        // Not enough candidates left to keep eliminating, or nothing left to
        // transfer: the rest win by default.
        if actives.len() <= remaining_seats || valid <= WEIGHT_EPSILON {
            let round = self.elect_by_default(round_id, tally_rows, tally.exhausted, &actives);
            self.rounds.push(round);
            return Ok(Some(self.finish(TerminationReason::NoTransferable, quota)));
        }

        let mut pool: Vec<CandidateId> = actives
            .iter()
            .copied()
            .filter(|cid| {
                let total = tally.totals[cid.index()];
                match self.config.quota_rounding {
                    QuotaRounding::FloorPlusOne => total >= quota - WEIGHT_EPSILON,
                    QuotaRounding::Exact => total > quota + WEIGHT_EPSILON,
                }
            })
            .collect();

        if pool.is_empty() {
            let action = self.eliminate_lowest(&actives, tally)?;
            self.rounds.push(Round {
                round: round_id,
                tally: tally_rows,
                exhausted: tally.exhausted,
                actions: vec![action],
            });
            return Ok(None);
        }

        // Order this round's winners by descending total, resolving ties with
        // the configured policy, and cap at the open seats.
        let mut chosen: Vec<CandidateId> = Vec::new();
        while !pool.is_empty() && chosen.len() < remaining_seats {
            let top = pool
                .iter()
                .map(|cid| tally.totals[cid.index()])
                .fold(f64::MIN, f64::max);
            let tied: Vec<CandidateId> = pool
                .iter()
                .copied()
                .filter(|cid| (tally.totals[cid.index()] - top).abs() <= WEIGHT_EPSILON)
                .collect();
            let pick = if tied.len() > 1 {
                self.breaker.break_for_election(&tied, &self.history)?
            } else {
                tied[0]
            };
            chosen.push(pick);
            pool.retain(|cid| *cid != pick);
        }

        for cid in chosen.iter() {
            self.states[cid.index()] = CandidateState::Elected;
            self.retained[cid.index()] = quota;
            self.elected.push(*cid);
        }

        // Surplus transfers happen after every winner of the round has left
        // the continuing set, in order of election.
        let continuing = self.continuing();
        let mut actions: Vec<RoundAction> = Vec::new();
        for cid in chosen.iter() {
            let total = tally.totals[cid.index()];
            let surplus = (total - quota).max(0.0);
            let record =
                self.table
                    .transfer(*cid, &continuing, surplus / total, self.roster.len());
            info!(
                "Round {}: {} elected with {}, surplus {}",
                round_id,
                self.roster.name(*cid),
                total,
                surplus
            );
            actions.push(RoundAction::Elect {
                candidate: self.roster.name(*cid).to_string(),
                surplus,
                transfers: self.named_transfers(&record),
                exhausted: record.exhausted,
            });
        }

        self.rounds.push(Round {
            round: round_id,
            tally: tally_rows,
            exhausted: tally.exhausted,
            actions,
        });
        if self.elected.len() == seats {
            return Ok(Some(self.finish(TerminationReason::SeatsFilled, quota)));
        }
        Ok(None)
    }

    fn eliminate_lowest(
        &mut self,
        actives: &[CandidateId],
        tally: &Tally,
    ) -> Result<RoundAction, TabulationError> {
        let min = actives
            .iter()
            .map(|cid| tally.totals[cid.index()])
            .fold(f64::MAX, f64::min);
        let tied: Vec<CandidateId> = actives
            .iter()
            .copied()
            .filter(|cid| tally.totals[cid.index()] <= min + WEIGHT_EPSILON)
            .collect();
        let loser = self.breaker.break_for_elimination(&tied, &self.history)?;
        debug!(
            "eliminate_lowest: min {}, tied {:?}, eliminating {}",
            min,
            tied,
            self.roster.name(loser)
        );
        self.states[loser.index()] = CandidateState::Eliminated;
        let continuing = self.continuing();
        let record = self
            .table
            .transfer(loser, &continuing, 1.0, self.roster.len());
        Ok(RoundAction::Eliminate {
            candidate: self.roster.name(loser).to_string(),
            transfers: self.named_transfers(&record),
            exhausted: record.exhausted,
        })
    }

    fn elect_by_default(
        &mut self,
        round_id: u32,
        tally_rows: Vec<(String, f64)>,
        exhausted: f64,
        actives: &[CandidateId],
    ) -> Round {
        let names: Vec<String> = actives
            .iter()
            .map(|cid| self.roster.name(*cid).to_string())
            .collect();
        info!(
            "Round {}: no transferable votes left, electing by default: {:?}",
            round_id, names
        );
        for cid in actives.iter() {
            self.states[cid.index()] = CandidateState::Elected;
            self.elected.push(*cid);
        }
        Round {
            round: round_id,
            tally: tally_rows,
            exhausted,
            actions: vec![RoundAction::ElectByDefault { candidates: names }],
        }
    }

    fn finish(&mut self, termination: TerminationReason, threshold: f64) -> TabulationResult {
        let winners = self
            .elected
            .iter()
            .map(|cid| self.roster.name(*cid).to_string())
            .collect();
        TabulationResult {
            rounds: std::mem::take(&mut self.rounds),
            winners,
            termination,
            tie_break: self.config.tie_break,
            tie_break_seed: self.config.tie_break_seed,
            threshold,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ballot::BallotRow;
    use crate::config::{OvervotePolicy, UndervotePolicy};
    use crate::tabulate;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn assert_conserved(result: &TabulationResult, total: f64) {
        for round in result.rounds.iter() {
            let sum: f64 = round.tally.iter().map(|(_, w)| w).sum::<f64>() + round.exhausted;
            assert!(
                (sum - total).abs() < WEIGHT_EPSILON,
                "round {} sums to {} instead of {}",
                round.round,
                sum,
                total
            );
        }
    }

    #[test]
    fn single_seat_transfer_scenario() {
        let rows = vec![
            BallotRow::weighted(40, &["A", "B"]),
            BallotRow::weighted(35, &["B", "A"]),
            BallotRow::weighted(25, &["C", "A"]),
        ];
        let result = tabulate(
            &rows,
            &names(&["A", "B", "C"]),
            &TabulationConfig::SINGLE_SEAT_DEFAULTS,
        )
        .unwrap();

        assert_eq!(result.rounds.len(), 2);
        let r1 = &result.rounds[0];
        assert_eq!(r1.round, 1);
        assert_eq!(
            r1.tally,
            vec![
                ("A".to_string(), 40.0),
                ("B".to_string(), 35.0),
                ("C".to_string(), 25.0)
            ]
        );
        assert_eq!(
            r1.actions,
            vec![RoundAction::Eliminate {
                candidate: "C".to_string(),
                transfers: vec![("A".to_string(), 25.0)],
                exhausted: 0.0,
            }]
        );
        let r2 = &result.rounds[1];
        assert_eq!(
            r2.tally,
            vec![("A".to_string(), 65.0), ("B".to_string(), 35.0)]
        );
        assert_eq!(result.winners, vec!["A".to_string()]);
        assert_eq!(result.termination, TerminationReason::Majority);
        assert_eq!(result.threshold, 50.0);
        assert_conserved(&result, 100.0);
    }

    #[test]
    fn majority_terminates_immediately() {
        let rows = vec![
            BallotRow::weighted(60, &["A", "B"]),
            BallotRow::weighted(30, &["B"]),
            BallotRow::weighted(10, &["C"]),
        ];
        let result = tabulate(
            &rows,
            &names(&["A", "B", "C"]),
            &TabulationConfig::SINGLE_SEAT_DEFAULTS,
        )
        .unwrap();
        assert_eq!(result.rounds.len(), 1);
        assert_eq!(result.winners, vec!["A".to_string()]);
        assert_eq!(result.termination, TerminationReason::Majority);
    }

    #[test]
    fn overvote_exhausts_instead_of_transferring() {
        use crate::ballot::RankCell;
        let rows = vec![
            BallotRow {
                weight: 1,
                ranks: vec![
                    RankCell::Candidate("A".to_string()),
                    RankCell::Overvote,
                    RankCell::Candidate("D".to_string()),
                ],
            },
            BallotRow::weighted(3, &["B"]),
            BallotRow::weighted(2, &["D"]),
        ];
        let mut config = TabulationConfig::SINGLE_SEAT_DEFAULTS;
        config.overvote_policy = OvervotePolicy::Exhaust;
        let result = tabulate(&rows, &names(&["A", "B", "D"]), &config).unwrap();

        // A is eliminated first; the overvoted ballot exhausts rather than
        // reaching D.
        assert_eq!(
            result.rounds[0].actions,
            vec![RoundAction::Eliminate {
                candidate: "A".to_string(),
                transfers: vec![],
                exhausted: 1.0,
            }]
        );
        assert_eq!(result.winners, vec!["B".to_string()]);
        assert_conserved(&result, 6.0);
    }

    #[test]
    fn multi_seat_surplus_transfer() {
        let rows = vec![
            BallotRow::weighted(40, &["A", "B"]),
            BallotRow::weighted(26, &["B"]),
            BallotRow::weighted(24, &["C"]),
            BallotRow::weighted(10, &["D", "C"]),
        ];
        let result = tabulate(
            &rows,
            &names(&["A", "B", "C", "D"]),
            &TabulationConfig::multi_seat(2),
        )
        .unwrap();

        // Droop quota over 100 valid votes with 2 seats.
        assert_eq!(result.threshold, 34.0);

        let r1 = &result.rounds[0];
        assert_eq!(
            r1.actions,
            vec![RoundAction::Elect {
                candidate: "A".to_string(),
                surplus: 6.0,
                transfers: vec![("B".to_string(), 6.0)],
                exhausted: 0.0,
            }]
        );

        // A retains exactly the quota from round 2 on.
        let r2 = &result.rounds[1];
        assert_eq!(r2.tally[0], ("A".to_string(), 34.0));
        assert!((r2.tally[1].1 - 32.0).abs() < WEIGHT_EPSILON);
        assert_eq!(
            r2.actions,
            vec![RoundAction::Eliminate {
                candidate: "D".to_string(),
                transfers: vec![("C".to_string(), 10.0)],
                exhausted: 0.0,
            }]
        );

        let r3 = &result.rounds[2];
        assert!(matches!(
            &r3.actions[0],
            RoundAction::Elect { candidate, surplus, .. }
                if candidate == "C" && surplus.abs() < WEIGHT_EPSILON
        ));

        assert_eq!(result.winners, names(&["A", "C"]));
        assert_eq!(result.termination, TerminationReason::SeatsFilled);
        assert_conserved(&result, 100.0);
    }

    #[test]
    fn multi_seat_exact_quota_requires_strictly_more() {
        let mut config = TabulationConfig::multi_seat(2);
        config.quota_rounding = QuotaRounding::Exact;
        // Exact quota is 99/3 = 33; A sits exactly on it and is not elected
        // until the transfer from C pushes it over.
        let rows = vec![
            BallotRow::weighted(33, &["A"]),
            BallotRow::weighted(32, &["B"]),
            BallotRow::weighted(20, &["C", "A"]),
            BallotRow::weighted(14, &["D", "B"]),
        ];
        let result = tabulate(&rows, &names(&["A", "B", "C", "D"]), &config).unwrap();
        assert_eq!(result.threshold, 33.0);
        assert!(matches!(
            &result.rounds[0].actions[0],
            RoundAction::Eliminate { .. }
        ));
        assert_conserved(&result, 99.0);
    }

    #[test]
    fn no_transferable_votes_elects_by_default() {
        use crate::ballot::RankCell;
        let rows = vec![BallotRow {
            weight: 2,
            ranks: vec![RankCell::Blank],
        }];
        let mut config = TabulationConfig::SINGLE_SEAT_DEFAULTS;
        config.undervote_policy = UndervotePolicy::Skip;
        let result = tabulate(&rows, &names(&["A", "B"]), &config).unwrap();
        assert_eq!(result.rounds.len(), 1);
        assert_eq!(result.termination, TerminationReason::NoTransferable);
        assert_eq!(result.winners, names(&["A", "B"]));
        assert_eq!(
            result.rounds[0].actions,
            vec![RoundAction::ElectByDefault {
                candidates: names(&["A", "B"])
            }]
        );
    }

    #[test]
    fn prior_round_tie_break_eliminates_earlier_trailer() {
        let rows = vec![
            BallotRow::weighted(4, &["A"]),
            BallotRow::weighted(3, &["C"]),
            BallotRow::weighted(2, &["B"]),
            BallotRow::weighted(1, &["D", "B"]),
        ];
        let mut config = TabulationConfig::SINGLE_SEAT_DEFAULTS;
        config.tie_break = TieBreakPolicy::PriorRound;
        let result = tabulate(&rows, &names(&["A", "B", "C", "D"]), &config).unwrap();

        // Round 2 ties B and C at 3. B trailed C in round 1, so B goes,
        // where the lexicographic fallback would have removed C.
        assert!(matches!(
            &result.rounds[1].actions[0],
            RoundAction::Eliminate { candidate, .. } if candidate == "B"
        ));
        assert_eq!(result.winners, vec!["A".to_string()]);
        assert_eq!(result.tie_break, TieBreakPolicy::PriorRound);
    }

    #[test]
    fn seeded_random_runs_are_byte_identical() {
        let rows = vec![
            BallotRow::weighted(2, &["A"]),
            BallotRow::weighted(2, &["B"]),
            BallotRow::weighted(2, &["C"]),
        ];
        let mut config = TabulationConfig::SINGLE_SEAT_DEFAULTS;
        config.tie_break = TieBreakPolicy::SeededRandom;
        config.tie_break_seed = Some(7);
        let candidates = names(&["A", "B", "C"]);
        let first = tabulate(&rows, &candidates, &config).unwrap();
        let second = tabulate(&rows, &candidates, &config).unwrap();
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
        assert_eq!(first.tie_break_seed, Some(7));
    }

    #[test]
    fn eliminated_candidates_never_return() {
        let rows = vec![
            BallotRow::weighted(4, &["A", "B"]),
            BallotRow::weighted(3, &["B", "C"]),
            BallotRow::weighted(2, &["C", "D"]),
            BallotRow::weighted(2, &["D", "A"]),
        ];
        let result = tabulate(
            &rows,
            &names(&["A", "B", "C", "D"]),
            &TabulationConfig::SINGLE_SEAT_DEFAULTS,
        )
        .unwrap();
        // The tally row set shrinks monotonically and never regains a name.
        let mut previous: Option<Vec<String>> = None;
        for round in result.rounds.iter() {
            let current: Vec<String> = round.tally.iter().map(|(n, _)| n.clone()).collect();
            if let Some(prev) = previous {
                assert!(current.len() <= prev.len());
                for name in current.iter() {
                    assert!(prev.contains(name));
                }
            }
            previous = Some(current);
        }
        assert_conserved(&result, 11.0);
    }

    #[test]
    fn seats_must_be_fewer_than_candidates() {
        let rows = vec![BallotRow::simple(&["A"])];
        let err = tabulate(&rows, &names(&["A", "B"]), &TabulationConfig::multi_seat(2)).unwrap_err();
        assert_eq!(
            err,
            TabulationError::SeatsOutOfRange {
                seats: 2,
                candidates: 2
            }
        );
    }

    #[test]
    fn seeded_random_requires_a_seed() {
        let rows = vec![BallotRow::simple(&["A"])];
        let mut config = TabulationConfig::SINGLE_SEAT_DEFAULTS;
        config.tie_break = TieBreakPolicy::SeededRandom;
        let err = tabulate(&rows, &names(&["A", "B"]), &config).unwrap_err();
        assert_eq!(err, TabulationError::MissingTieBreakSeed);
    }
}
