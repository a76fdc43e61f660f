pub use crate::config::*;
use crate::allocate_seats;

/// A builder for accumulating party tallies before an allocation.
///
/// Votes added for a party already in the builder are accumulated, which
/// is convenient when summing over municipalities or ballot sheets.
///
/// ```
/// pub use proportional_voting::builder::Builder;
/// pub use proportional_voting::SeatRules;
/// # use proportional_voting::AllocationErrors;
///
/// let mut builder = Builder::new(&SeatRules::DEPARTMENTAL_JUNTA);
/// builder.add_votes("Partido A", 1200)?;
/// builder.add_votes("Partido B", 800)?;
/// builder.add_votes("Partido A", 300)?;
///
/// let allocation = builder.allocate()?;
/// assert_eq!(allocation.winner, "Partido A");
///
/// # Ok::<(), AllocationErrors>(())
/// ```
pub struct Builder {
    pub(crate) _rules: SeatRules,
    pub(crate) _tallies: Vec<PartyTally>,
}

impl Builder {
    pub fn new(rules: &SeatRules) -> Builder {
        Builder {
            _rules: *rules,
            _tallies: Vec::new(),
        }
    }

    /// Adds votes for a party, accumulating with any previous count.
    pub fn add_votes(&mut self, party: &str, votes: u64) -> Result<(), AllocationErrors> {
        match self._tallies.iter_mut().find(|t| t.name == party) {
            Some(t) => t.votes += votes,
            None => self._tallies.push(PartyTally::new(party, votes)),
        }
        Ok(())
    }

    /// Runs the allocation over the accumulated tallies.
    pub fn allocate(&self) -> Result<Allocation, AllocationErrors> {
        allocate_seats(&self._tallies, &self._rules)
    }
}
