pub use crate::model::*;

/// A builder for adding ballots one row at a time.
///
/// Using the builder should be considered when the ballots are streamed from a reader.
///
/// ```
/// use irv_ranking::builder::Builder;
///
/// let mut builder = Builder::new();
/// builder.add_ballot(&["Anna", "Bob"]);
/// builder.add_ballot(&["anna", "ANNA", "Clara"]);
/// builder.add_ballot::<&str>(&[]);
///
/// let ballots = builder.build();
/// assert_eq!(ballots.len(), 3);
/// assert_eq!(ballots.ballots()[1].choices().len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Builder {
    _ballots: Vec<Ballot>,
}

impl Builder {
    pub fn new() -> Builder {
        Builder {
            _ballots: Vec::new(),
        }
    }

    /// Adds a ballot to the builder.
    ///
    /// choices: the names chosen by the voter, in order of preference. Names do not need
    /// to be distinct: later occurrences of a candidate are ignored.
    pub fn add_ballot<S: AsRef<str>>(&mut self, choices: &[S]) {
        self._ballots.push(Ballot::from_raw(choices));
    }

    /// Adds the same ballot `count` times.
    pub fn add_ballots<S: AsRef<str>>(&mut self, choices: &[S], count: u64) {
        let ballot = Ballot::from_raw(choices);
        for _ in 0..count {
            self._ballots.push(ballot.clone());
        }
    }

    pub fn len(&self) -> usize {
        self._ballots.len()
    }

    pub fn is_empty(&self) -> bool {
        self._ballots.is_empty()
    }

    pub fn build(self) -> BallotSet {
        BallotSet::new(self._ballots)
    }
}
