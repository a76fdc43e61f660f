// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;

/// The total valid votes credited to one party (lema) in a single
/// constituency.
///
/// The order of the tallies matters: it is the order of the official
/// results file, and it is the last resort for breaking ties.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct PartyTally {
    pub name: String,
    pub votes: u64,
}

impl PartyTally {
    pub fn new(name: &str, votes: u64) -> PartyTally {
        PartyTally {
            name: name.to_string(),
            votes,
        }
    }
}

/// The votes obtained by one list (hoja) inside a party, for the
/// list-level split of the seats already awarded to that party.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ListTally {
    pub number: u64,
    pub name: String,
    pub votes: u64,
}

// ********* Configuration **********

/// The rules governing one allocation run.
///
/// `winner_floor` is the number of seats the most voted party is
/// guaranteed, regardless of its proportional share. The remaining seats
/// are distributed with the D'Hondt divisor method.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub struct SeatRules {
    pub total_seats: u32,
    pub winner_floor: u32,
}

impl SeatRules {
    /// Junta Departamental: 31 ediles, absolute majority of 16 for the
    /// winning party (art. 272 of the constitution).
    pub const DEPARTMENTAL_JUNTA: SeatRules = SeatRules {
        total_seats: 31,
        winner_floor: 16,
    };

    /// Concejo Municipal: 5 concejales, 3 of them for the winning party
    /// (ley 19.272).
    pub const MUNICIPAL_COUNCIL: SeatRules = SeatRules {
        total_seats: 5,
        winner_floor: 3,
    };

    /// Plain proportional allocation, no guaranteed majority.
    pub fn proportional(total_seats: u32) -> SeatRules {
        SeatRules {
            total_seats,
            winner_floor: 0,
        }
    }
}

// ******** Output data structures *********

/// Seats awarded to one party, in the order of the input tallies.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct PartySeats {
    pub name: String,
    pub votes: u64,
    pub seats: u32,
}

/// The outcome of one allocation run.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Allocation {
    pub winner: String,
    /// True when plain D'Hondt fell short of the winner floor and the
    /// winner had to be pinned to it.
    pub floor_applied: bool,
    pub seats: Vec<PartySeats>,
}

impl Allocation {
    /// The seats awarded to the given party, 0 if it is not in the tally.
    pub fn seats_for(&self, name: &str) -> u32 {
        self.seats
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.seats)
            .unwrap_or(0)
    }
}

/// Seats awarded to one list inside a party.
///
/// `last_quotient` is the divisor-method quotient that earned the list
/// its final seat (votes / seats awarded), 0.0 when it won none. It is
/// the customary figure for reporting how close a list was to the next
/// seat.
#[derive(PartialEq, Debug, Clone)]
pub struct ListSeats {
    pub number: u64,
    pub name: String,
    pub votes: u64,
    pub seats: u32,
    pub last_quotient: f64,
}

/// Errors that prevent an allocation from completing.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum AllocationErrors {
    /// No party in the tally.
    EmptyElection,
    /// More than one party, all of them with zero votes: no proportional
    /// criterion exists and the seats cannot be conserved meaningfully.
    NoVotes,
    /// The winner floor exceeds the number of seats.
    InvalidRules,
}

impl Error for AllocationErrors {}

impl Display for AllocationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AllocationErrors::EmptyElection => write!(f, "no parties in the tally"),
            AllocationErrors::NoVotes => write!(f, "no votes in the tally"),
            AllocationErrors::InvalidRules => {
                write!(f, "the winner floor exceeds the total number of seats")
            }
        }
    }
}
