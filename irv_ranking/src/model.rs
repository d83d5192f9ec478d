// ********* Input data structures ***********

use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::Display;

/// A candidate, identified by the lower-cased form of its name.
///
/// Two names that only differ by case refer to the same candidate:
///
/// ```
/// use irv_ranking::Candidate;
///
/// assert_eq!(Candidate::new("Alice"), Candidate::new("ALICE"));
/// assert_eq!(Candidate::new("Alice").name(), "alice");
/// ```
#[derive(Eq, PartialEq, Debug, Clone, Hash, Ord, PartialOrd)]
pub struct Candidate(String);

impl Candidate {
    pub fn new(name: &str) -> Candidate {
        Candidate(name.to_lowercase())
    }

    /// The canonical identifier.
    pub fn name(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for Candidate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The ordered preferences of one voter, the most preferred first.
///
/// Invariant: a candidate appears at most once.
/// A ballot whose candidates have all been removed is empty. It stays in its
/// ballot set but does not contribute to any tally.
#[derive(Eq, PartialEq, Debug, Clone, Hash, Default)]
pub struct Ballot {
    choices: Vec<Candidate>,
}

impl Ballot {
    /// Builds a ballot from raw names.
    ///
    /// Names are canonicalized and only the first occurrence of each candidate
    /// is kept. Any string is accepted, and an empty input gives an empty ballot.
    pub fn from_raw<S: AsRef<str>>(raw_choices: &[S]) -> Ballot {
        let mut seen: BTreeSet<Candidate> = BTreeSet::new();
        let mut choices: Vec<Candidate> = Vec::with_capacity(raw_choices.len());
        for raw in raw_choices.iter() {
            let c = Candidate::new(raw.as_ref());
            if seen.insert(c.clone()) {
                choices.push(c);
            }
        }
        Ballot { choices }
    }

    pub fn choices(&self) -> &[Candidate] {
        &self.choices
    }

    /// The current first preference, if the ballot is still active.
    pub fn first(&self) -> Option<&Candidate> {
        self.choices.first()
    }

    pub fn is_empty(&self) -> bool {
        self.choices.is_empty()
    }

    /// A copy of this ballot with the given candidate removed wherever it is ranked.
    pub fn without(&self, candidate: &Candidate) -> Ballot {
        Ballot {
            choices: self
                .choices
                .iter()
                .filter(|c| *c != candidate)
                .cloned()
                .collect(),
        }
    }
}

/// All the ballots of one tabulation.
///
/// A ballot set is never modified. Removing a candidate produces a new set.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct BallotSet {
    ballots: Vec<Ballot>,
}

impl BallotSet {
    pub fn new(ballots: Vec<Ballot>) -> BallotSet {
        BallotSet { ballots }
    }

    /// Normalizes every raw row into a ballot.
    pub fn from_raw<S: AsRef<str>>(rows: &[Vec<S>]) -> BallotSet {
        BallotSet {
            ballots: rows.iter().map(|r| Ballot::from_raw(r.as_slice())).collect(),
        }
    }

    pub fn ballots(&self) -> &[Ballot] {
        &self.ballots
    }

    pub fn len(&self) -> usize {
        self.ballots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ballots.is_empty()
    }

    /// All the distinct candidates ranked on at least one ballot, in canonical order.
    pub fn candidates(&self) -> BTreeSet<Candidate> {
        self.ballots
            .iter()
            .flat_map(|b| b.choices.iter().cloned())
            .collect()
    }

    /// The ballot set of the next round: the candidate is removed from every ballot.
    /// Ballots that become empty are kept.
    pub fn without(&self, candidate: &Candidate) -> BallotSet {
        BallotSet {
            ballots: self.ballots.iter().map(|b| b.without(candidate)).collect(),
        }
    }
}

// ******** Output data structures *********

/// One line of the final ranking. Position 1 is the overall winner.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub struct RankingEntry {
    pub position: u32,
    pub candidate: Candidate,
}

impl Display for RankingEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.position, self.candidate)
    }
}

/// What happened to a candidate at the end of a round.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum RoundOutcome {
    /// The candidate had a strict majority and took the given position.
    Elected(Candidate, u32),
    /// Nobody had a majority and this candidate was the weakest.
    Eliminated(Candidate),
}

/// Statistics for one round
#[derive(PartialEq, Debug, Clone)]
pub struct RoundStats {
    pub round: u32,
    pub active_ballots: u64,
    pub threshold: f64,
    /// First preferences, sorted by candidate.
    pub tally: Vec<(String, u64)>,
    pub outcome: RoundOutcome,
}

#[derive(PartialEq, Debug, Clone, Default)]
pub struct TabulationResult {
    pub ranking: Vec<RankingEntry>,
    pub round_stats: Vec<RoundStats>,
}

impl TabulationResult {
    /// The ranking, one `"<position>: <candidate>"` line per entry.
    pub fn ranking_text(&self) -> String {
        render_ranking(&self.ranking)
    }
}

pub fn render_ranking(ranking: &[RankingEntry]) -> String {
    ranking
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<String>>()
        .join("\n")
}

/// Errors that prevent the algorithm from completing successfully.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum TabulationError {
    /// The elimination loop ran for more rounds than there are candidates.
    NoConvergence { rounds: u32 },
}

impl Error for TabulationError {}

impl Display for TabulationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TabulationError::NoConvergence { rounds } => {
                write!(f, "tabulation did not converge after {} rounds", rounds)
            }
        }
    }
}
