pub mod builder;
pub mod manual;
mod model;
mod tiebreak;
use log::{debug, info};

use std::{cmp::Ordering, collections::BTreeMap};

pub use crate::model::*;
pub use crate::tiebreak::fractional_weight;

// **** Private structures ****

type RoundId = u32;

// First preferences of the active ballots for one round.
// The map is ordered by candidate, which fixes the iteration order of every decision below.
#[derive(Eq, PartialEq, Debug, Clone)]
struct RoundTally {
    counts: BTreeMap<Candidate, u64>,
    active_ballots: u64,
}

impl RoundTally {
    fn threshold(&self) -> f64 {
        self.active_ballots as f64 / 2.0
    }
}

/// Ranks the candidates of an election.
///
/// Each round, the first preferences of the non-empty ballots are counted. A candidate
/// with strictly more than half of them takes the next position in the ranking.
/// Otherwise the weakest candidate is eliminated. In both cases the candidate is removed
/// from every ballot before the next round. The tabulation stops when no ballot has any
/// candidate left.
///
/// Eliminated candidates are not ranked, so the ranking may hold fewer candidates than
/// the ballots mention. An empty ballot set gives an empty ranking.
///
/// ```
/// use irv_ranking::{run_ranking, BallotSet};
///
/// let ballots = BallotSet::from_raw(&[vec!["A", "B"], vec!["A", "B"], vec!["B", "A"]]);
/// let res = run_ranking(&ballots)?;
/// assert_eq!(res.ranking_text(), "1: a\n2: b");
/// # Ok::<(), irv_ranking::TabulationError>(())
/// ```
pub fn run_ranking(ballots: &BallotSet) -> Result<TabulationResult, TabulationError> {
    let num_candidates = ballots.candidates().len();
    info!(
        "run_ranking: Processing {:?} ballots, {:?} candidates",
        ballots.len(),
        num_candidates
    );

    // Every round removes one candidate. The extra round is the one that finds no active ballot.
    let max_rounds = num_candidates as RoundId + 1;

    let mut ranking: Vec<RankingEntry> = Vec::new();
    let mut round_stats: Vec<RoundStats> = Vec::new();
    let mut cur_ballots: BallotSet = ballots.clone();
    let mut round_id: RoundId = 0;

    loop {
        round_id += 1;
        if round_id > max_rounds {
            return Err(TabulationError::NoConvergence { rounds: max_rounds });
        }

        let tally = match compute_tally(&cur_ballots) {
            Some(t) => t,
            None => {
                debug!("run_ranking: round {:?}: no active ballot left", round_id);
                break;
            }
        };
        info!(
            "Round {} ({} active ballots, winning threshold: {})",
            round_id,
            tally.active_ballots,
            tally.threshold()
        );
        debug!("run_ranking: tally: {:?}", tally.counts);

        let outcome = if let Some(winner) = find_majority(&tally) {
            let position = ranking.len() as u32 + 1;
            info!("      {} -> elected at position {}", winner, position);
            ranking.push(RankingEntry {
                position,
                candidate: winner.clone(),
            });
            RoundOutcome::Elected(winner, position)
        } else {
            let loser = find_eliminated_candidate(&tally);
            info!("      {} -> eliminated", loser);
            RoundOutcome::Eliminated(loser)
        };

        let removed = match &outcome {
            RoundOutcome::Elected(c, _) => c,
            RoundOutcome::Eliminated(c) => c,
        };
        cur_ballots = cur_ballots.without(removed);

        round_stats.push(RoundStats {
            round: round_id,
            active_ballots: tally.active_ballots,
            threshold: tally.threshold(),
            tally: tally
                .counts
                .iter()
                .map(|(c, vc)| (c.name().to_string(), *vc))
                .collect(),
            outcome,
        });
    }

    for e in ranking.iter() {
        info!("Candidate: {}", e);
    }
    Ok(TabulationResult {
        ranking,
        round_stats,
    })
}

/// Same as [run_ranking], keeping only the ranking.
pub fn rank_candidates(ballots: &BallotSet) -> Result<Vec<RankingEntry>, TabulationError> {
    run_ranking(ballots).map(|r| r.ranking)
}

/// Counts the first choice of every non-empty ballot.
/// Returns None when all the ballots are empty.
fn compute_tally(ballots: &BallotSet) -> Option<RoundTally> {
    let mut counts: BTreeMap<Candidate, u64> = BTreeMap::new();
    let mut active_ballots: u64 = 0;
    for first in ballots.ballots().iter().filter_map(|b| b.first()) {
        *counts.entry(first.clone()).or_insert(0) += 1;
        active_ballots += 1;
    }
    if active_ballots == 0 {
        None
    } else {
        Some(RoundTally {
            counts,
            active_ballots,
        })
    }
}

/// The first candidate, in canonical order, with strictly more than half of the active ballots.
fn find_majority(tally: &RoundTally) -> Option<Candidate> {
    let threshold = tally.threshold();
    tally
        .counts
        .iter()
        .find(|(_, count)| (**count as f64) > threshold)
        .map(|(c, _)| c.clone())
}

/// The candidate with the lowest score, where the score is the vote count plus the
/// fractional weight of the candidate.
/// Equal scores are resolved by canonical order.
fn find_eliminated_candidate(tally: &RoundTally) -> Candidate {
    let mut scored: Vec<(f64, &Candidate)> = tally
        .counts
        .iter()
        .map(|(c, count)| (*count as f64 + fractional_weight(c), c))
        .collect();
    debug!("find_eliminated_candidate: scores: {:?}", scored);
    scored.sort_by(compare_scores);
    // Tallies only exist with at least one active ballot, hence one candidate.
    assert!(!scored.is_empty(), "No candidate to eliminate");
    scored[0].1.clone()
}

/// Lowest score first, then canonical order of the candidates.
fn compare_scores(a: &(f64, &Candidate), b: &(f64, &Candidate)) -> Ordering {
    match a.0.total_cmp(&b.0) {
        Ordering::Equal => a.1.cmp(b.1),
        o => o,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn ballots(rows: &[&[&str]]) -> BallotSet {
        BallotSet::from_raw(&rows.iter().map(|r| r.to_vec()).collect::<Vec<Vec<&str>>>())
    }

    fn names(ranking: &[RankingEntry]) -> Vec<String> {
        ranking.iter().map(|e| e.candidate.to_string()).collect()
    }

    #[test]
    fn majority_then_runoff() {
        init();
        let res = run_ranking(&ballots(&[&["A", "B"], &["A", "B"], &["B", "A"]])).unwrap();
        assert_eq!(res.ranking_text(), "1: a\n2: b");
        assert_eq!(res.round_stats.len(), 2);
        assert_eq!(
            res.round_stats[0].tally,
            vec![("a".to_string(), 2), ("b".to_string(), 1)]
        );
        assert_eq!(res.round_stats[0].threshold, 1.5);
        assert_eq!(
            res.round_stats[1].outcome,
            RoundOutcome::Elected(Candidate::new("b"), 2)
        );
    }

    #[test]
    fn exactly_half_is_not_a_majority() {
        init();
        let t = compute_tally(&ballots(&[&["A", "B"], &["B", "A"]])).unwrap();
        assert_eq!(t.active_ballots, 2);
        assert_eq!(t.threshold(), 1.0);
        assert_eq!(find_majority(&t), None);

        let res = run_ranking(&ballots(&[&["A", "B"], &["B", "A"]])).unwrap();
        // a has the smaller fractional weight and goes first.
        assert_eq!(
            res.round_stats[0].outcome,
            RoundOutcome::Eliminated(Candidate::new("a"))
        );
        assert_eq!(res.ranking_text(), "1: b");
    }

    #[test]
    fn empty_inputs_give_empty_ranking() {
        init();
        assert!(rank_candidates(&BallotSet::default()).unwrap().is_empty());
        let res = run_ranking(&ballots(&[&[], &[], &[]])).unwrap();
        assert!(res.ranking.is_empty());
        assert!(res.round_stats.is_empty());
    }

    #[test]
    fn tally_skips_empty_ballots() {
        let t = compute_tally(&ballots(&[&["b", "a"], &[], &["a"], &["B"]])).unwrap();
        assert_eq!(t.active_ballots, 3);
        assert_eq!(t.counts.get(&Candidate::new("a")), Some(&1));
        assert_eq!(t.counts.get(&Candidate::new("b")), Some(&2));
        // Candidates only ranked below the first choice are not in the tally.
        assert_eq!(t.counts.len(), 2);
        assert_eq!(compute_tally(&ballots(&[&[]])), None);
    }

    #[test]
    fn fewer_votes_always_eliminated_first() {
        // b has the largest weight of the three, but fewer votes than c.
        let t = compute_tally(&ballots(&[&["a"], &["a"], &["c"], &["c"], &["b"]])).unwrap();
        assert_eq!(find_eliminated_candidate(&t), Candidate::new("b"));
    }

    #[test]
    fn equal_scores_use_candidate_order() {
        let a = Candidate::new("a");
        let b = Candidate::new("b");
        assert_eq!(compare_scores(&(1.5, &b), &(1.5, &a)), Ordering::Greater);
        assert_eq!(compare_scores(&(1.5, &a), &(1.5, &b)), Ordering::Less);
        assert_eq!(compare_scores(&(1.5, &a), &(1.5, &a)), Ordering::Equal);
        // The score comes first.
        assert_eq!(compare_scores(&(1.25, &b), &(1.5, &a)), Ordering::Less);

        let mut scored = vec![(1.5, &b), (2.0, &a), (1.5, &a)];
        scored.sort_by(compare_scores);
        assert_eq!(scored, vec![(1.5, &a), (1.5, &b), (2.0, &a)]);
    }

    #[test]
    fn symmetric_ballots_redistribute() {
        init();
        let bs = ballots(&[&["A", "B", "C"], &["B", "C", "A"], &["C", "A", "B"]]);
        let res = run_ranking(&bs).unwrap();
        assert_eq!(
            res.round_stats[0].outcome,
            RoundOutcome::Eliminated(Candidate::new("a"))
        );
        // The ballot of a moves to b, which then has 2 out of 3.
        assert_eq!(names(&res.ranking), vec!["b", "c"]);
        assert!(matches!(
            res.round_stats[1].outcome,
            RoundOutcome::Elected(_, 1)
        ));
    }

    #[test]
    fn repeated_runs_are_identical() {
        let bs = ballots(&[
            &["dave", "erin"],
            &["erin", "frank"],
            &["frank", "dave"],
            &["grace"],
            &["heidi", "grace"],
        ]);
        let first = run_ranking(&bs).unwrap();
        for _ in 0..5 {
            assert_eq!(run_ranking(&bs).unwrap(), first);
        }
    }

    #[test]
    fn ranking_has_no_duplicates_and_increasing_positions() {
        init();
        let bs = ballots(&[
            &["a", "b", "c", "d"],
            &["b", "a"],
            &["c", "d", "a"],
            &["d"],
            &["d", "c"],
            &["a", "c"],
            &[],
        ]);
        let ranking = rank_candidates(&bs).unwrap();
        assert!(ranking.len() <= bs.candidates().len());
        for (idx, e) in ranking.iter().enumerate() {
            assert_eq!(e.position, idx as u32 + 1);
        }
        let mut ns = names(&ranking);
        ns.sort();
        ns.dedup();
        assert_eq!(ns.len(), ranking.len());
    }

    #[test]
    fn winner_removed_from_lower_preferences() {
        init();
        // a wins round 1, and must not come back through the second choices.
        let bs = ballots(&[&["a", "b"], &["a", "c"], &["c", "a"], &["b", "a"], &["a"]]);
        let res = run_ranking(&bs).unwrap();
        assert_eq!(res.ranking[0].candidate, Candidate::new("a"));
        assert!(res.ranking[1..]
            .iter()
            .all(|e| e.candidate != Candidate::new("a")));
        assert_eq!(res.round_stats[1].active_ballots, 4);
    }

    #[test]
    fn single_candidate_wins_alone() {
        let res = run_ranking(&ballots(&[&["Zed"], &["zed", "ZED"]])).unwrap();
        assert_eq!(res.ranking_text(), "1: zed");
    }
}
