mod config;
use log::{debug, info};

use std::ops::{Add, AddAssign};

pub use crate::config::*;
pub mod builder;
pub mod quick_start;

// **** Private structures ****

#[derive(Eq, PartialEq, Debug, Clone, Copy, PartialOrd, Ord, Hash)]
struct VoteCount(u64);

impl VoteCount {
    const EMPTY: VoteCount = VoteCount(0);
}

impl std::iter::Sum for VoteCount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        VoteCount(iter.map(|vc| vc.0).sum())
    }
}

impl AddAssign for VoteCount {
    fn add_assign(&mut self, rhs: VoteCount) {
        self.0 += rhs.0;
    }
}

impl Add for VoteCount {
    type Output = VoteCount;
    fn add(self: VoteCount, rhs: VoteCount) -> VoteCount {
        VoteCount(self.0 + rhs.0)
    }
}

/// Allocates the seats of one constituency among the parties of the tally.
///
/// The seats are distributed with the D'Hondt divisor method (successive
/// quotients votes / (seats + 1)). When the rules carry a winner floor and
/// plain D'Hondt grants the most voted party fewer seats than the floor,
/// the winner is pinned to exactly the floor and the remaining seats are
/// re-distributed among the other parties.
///
/// Ties between quotients are resolved toward the party with more total
/// votes, then toward the party that appears first in the tally.
///
/// Arguments:
/// * `tally` the total valid votes of each party, in the order of the
///   official results file
/// * `rules` the seat count and winner floor that govern this allocation
pub fn allocate_seats(
    tally: &[PartyTally],
    rules: &SeatRules,
) -> Result<Allocation, AllocationErrors> {
    info!(
        "allocate_seats: processing {:?} parties, rules: {:?}",
        tally.len(),
        rules
    );
    if rules.winner_floor > rules.total_seats {
        return Err(AllocationErrors::InvalidRules);
    }
    if tally.is_empty() {
        return Err(AllocationErrors::EmptyElection);
    }

    // A single party takes every seat, votes or not.
    if let [party] = tally {
        return Ok(Allocation {
            winner: party.name.clone(),
            floor_applied: false,
            seats: vec![PartySeats {
                name: party.name.clone(),
                votes: party.votes,
                seats: rules.total_seats,
            }],
        });
    }

    let total_votes: VoteCount = tally.iter().map(|p| VoteCount(p.votes)).sum();
    if total_votes == VoteCount::EMPTY {
        return Err(AllocationErrors::NoVotes);
    }

    let winner_idx = most_voted(tally);
    let mut seats = dhondt(tally, rules.total_seats, None);
    debug!("allocate_seats: plain d'hondt distribution: {:?}", seats);

    let floor_applied = seats[winner_idx] < rules.winner_floor;
    if floor_applied {
        debug!(
            "allocate_seats: winner {:?} got {:?} seats, below the floor of {:?}",
            tally[winner_idx].name, seats[winner_idx], rules.winner_floor
        );
        seats = dhondt(tally, rules.total_seats - rules.winner_floor, Some(winner_idx));
        seats[winner_idx] = rules.winner_floor;
    }

    let allocated: Vec<PartySeats> = tally
        .iter()
        .zip(seats.iter())
        .map(|(p, s)| PartySeats {
            name: p.name.clone(),
            votes: p.votes,
            seats: *s,
        })
        .collect();

    for p in allocated.iter() {
        info!("Party: {} votes: {} seats: {}", p.name, p.votes, p.seats);
    }

    Ok(Allocation {
        winner: tally[winner_idx].name.clone(),
        floor_applied,
        seats: allocated,
    })
}

/// Splits the seats already awarded to a party among its lists, with the
/// plain D'Hondt divisor method.
///
/// Lists with zero votes never receive a seat. This function cannot fail:
/// an empty input yields an empty output, and when no list has votes the
/// seats are simply not awarded.
pub fn allocate_list_seats(lists: &[ListTally], seats: u32) -> Vec<ListSeats> {
    let votes: Vec<PartyTally> = lists
        .iter()
        .map(|l| PartyTally {
            name: l.name.clone(),
            votes: l.votes,
        })
        .collect();
    let assigned = dhondt(&votes, seats, None);
    lists
        .iter()
        .zip(assigned.iter())
        .map(|(l, s)| ListSeats {
            number: l.number,
            name: l.name.clone(),
            votes: l.votes,
            seats: *s,
            last_quotient: if *s > 0 {
                l.votes as f64 / *s as f64
            } else {
                0.0
            },
        })
        .collect()
}

// Index of the most voted party. Ties go to the earlier entry.
fn most_voted(tally: &[PartyTally]) -> usize {
    let mut best = 0;
    for (idx, p) in tally.iter().enumerate().skip(1) {
        if p.votes > tally[best].votes {
            best = idx;
        }
    }
    best
}

// Assigns `seats` seats one at a time, each to the party with the highest
// current quotient. The excluded party (the pinned winner of a floor
// re-distribution) never receives one, and neither does a party without
// votes.
fn dhondt(tally: &[PartyTally], seats: u32, excluded: Option<usize>) -> Vec<u32> {
    let mut assigned: Vec<u32> = vec![0; tally.len()];
    for _ in 0..seats {
        let mut best: Option<usize> = None;
        for (idx, p) in tally.iter().enumerate() {
            if excluded == Some(idx) || p.votes == 0 {
                continue;
            }
            best = match best {
                None => Some(idx),
                Some(b) if quotient_gt(p.votes, assigned[idx], tally[b].votes, assigned[b]) => {
                    Some(idx)
                }
                Some(b) => Some(b),
            };
        }
        match best {
            Some(idx) => assigned[idx] += 1,
            // No party can take another seat.
            None => break,
        }
    }
    assigned
}

// Exact comparison of votes_a / (seats_a + 1) > votes_b / (seats_b + 1),
// by cross multiplication. Equal quotients go to the larger vote total;
// a full tie keeps the earlier entry (the caller iterates in order).
fn quotient_gt(votes_a: u64, seats_a: u32, votes_b: u64, seats_b: u32) -> bool {
    let lhs = (votes_a as u128) * (seats_b as u128 + 1);
    let rhs = (votes_b as u128) * (seats_a as u128 + 1);
    if lhs != rhs {
        lhs > rhs
    } else {
        votes_a > votes_b
    }
}
