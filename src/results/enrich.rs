// Derived facts over the loaded model: winners, seat allocations,
// candidate tables and preliminary-data flags.
//
// Valid votes follow the official methodology: they are the sum of the
// votes credited to parties, excluding blank, annulled and observed
// votes, and every percentage is computed against that sum.

use log::warn;
use serde::Serialize;
use snafu::prelude::*;

use proportional_voting::{allocate_list_seats, allocate_seats, ListTally, PartyTally, SeatRules};

use crate::results::config_reader::{Department, Municipality};
use crate::results::normalize::{
    canonical_party, display_department, format_candidate_name, party_color, round1, UNAVAILABLE,
};
use crate::results::{AllocationSnafu, ResultsResult};

/// Counting below this scrutiny percentage is reported as preliminary.
pub const PRELIMINARY_SCRUTINY_PCT: f64 = 10.0;

/// One party's line in a departmental or municipal table.
#[derive(Serialize, PartialEq, Debug, Clone)]
pub struct PartyLine {
    pub party: String,
    pub color: String,
    pub votes: u64,
    pub pct: f64,
    pub seats: u32,
}

/// One Intendente candidacy, with its shares of the party and of the
/// departmental total.
#[derive(Serialize, PartialEq, Debug, Clone)]
pub struct CandidateRow {
    pub name: String,
    pub party: String,
    pub votes: u64,
    pub sheet_votes: u64,
    pub votes_to_lema: u64,
    pub pct_of_party: f64,
    pub pct_of_total: f64,
    pub preliminary: bool,
}

/// One list running for the Junta Departamental.
#[derive(Serialize, PartialEq, Debug, Clone)]
pub struct JuntaListRow {
    pub party: String,
    pub sublema: String,
    pub list: String,
    pub votes: u64,
}

/// One municipal list with its concejal seats.
#[derive(Serialize, PartialEq, Debug, Clone)]
pub struct CouncilSeatRow {
    pub party: String,
    pub number: u64,
    pub list: String,
    pub votes: u64,
    pub seats: u32,
    pub last_quotient: f64,
}

#[derive(Serialize, PartialEq, Debug, Clone)]
pub struct EnrichedMunicipality {
    pub name: String,
    pub id: u64,
    pub winner: String,
    pub alcalde: String,
    pub scrutinized_pct: f64,
    pub preliminary: bool,
    pub valid_votes: u64,
    pub blank_votes: u64,
    pub annulled_votes: u64,
    pub parties: Vec<PartyLine>,
    pub council: Vec<CouncilSeatRow>,
}

#[derive(Serialize, PartialEq, Debug, Clone)]
pub struct EnrichedDepartment {
    pub name: String,
    pub code: String,
    pub winner: String,
    pub intendente: String,
    pub scrutinized_pct: f64,
    pub participation_pct: f64,
    pub preliminary: bool,
    pub valid_votes: u64,
    pub blank_votes: u64,
    pub annulled_votes: u64,
    pub parties: Vec<PartyLine>,
    pub candidates: Vec<CandidateRow>,
    pub junta_lists: Vec<JuntaListRow>,
    pub municipalities: Vec<EnrichedMunicipality>,
}

/// Sums votes per party with canonical names, preserving the file order.
/// Variant spellings of the same party are merged.
pub fn party_totals<'a, I>(parties: I) -> Vec<PartyTally>
where
    I: IntoIterator<Item = (&'a str, u64)>,
{
    let mut totals: Vec<PartyTally> = Vec::new();
    for (raw, votes) in parties {
        if raw.trim().is_empty() {
            continue;
        }
        let name = canonical_party(raw);
        match totals.iter_mut().find(|t| t.name == name) {
            Some(t) => t.votes += votes,
            None => totals.push(PartyTally { name, votes }),
        }
    }
    totals
}

// The most voted party. Ties keep the file order.
fn winner_of(totals: &[PartyTally]) -> Option<&PartyTally> {
    let mut best: Option<&PartyTally> = None;
    for t in totals {
        match best {
            Some(b) if t.votes <= b.votes => {}
            _ => best = Some(t),
        }
    }
    best
}

// Seats per party, in the order of `totals`. An empty or voteless tally
// gets no seats rather than an error: incomplete files are expected
// while counting is under way.
fn allocate_or_empty(
    totals: &[PartyTally],
    rules: &SeatRules,
    scope: &str,
) -> ResultsResult<Vec<u32>> {
    if totals.is_empty() || totals.iter().all(|t| t.votes == 0) {
        return Ok(vec![0; totals.len()]);
    }
    let allocation = allocate_seats(totals, rules).context(AllocationSnafu { scope })?;
    Ok(allocation.seats.iter().map(|p| p.seats).collect())
}

fn preliminary(scrutinized_pct: f64) -> bool {
    scrutinized_pct < PRELIMINARY_SCRUTINY_PCT
}

fn party_lines(totals: &[PartyTally], seats: &[u32]) -> Vec<PartyLine> {
    let valid: u64 = totals.iter().map(|t| t.votes).sum();
    let mut lines: Vec<PartyLine> = totals
        .iter()
        .zip(seats.iter())
        .map(|(t, s)| PartyLine {
            party: t.name.clone(),
            color: party_color(&t.name),
            votes: t.votes,
            pct: if valid > 0 {
                round1(t.votes as f64 / valid as f64 * 100.0)
            } else {
                0.0
            },
            seats: *s,
        })
        .collect();
    lines.sort_by(|a, b| b.votes.cmp(&a.votes));
    lines
}

pub fn enrich_department(d: &Department) -> ResultsResult<EnrichedDepartment> {
    let totals = party_totals(d.parties.iter().map(|p| (p.name.as_str(), p.votes)));
    let valid_votes: u64 = totals.iter().map(|t| t.votes).sum();
    if d.valid_votes > 0 && valid_votes > 0 && d.valid_votes != valid_votes {
        warn!(
            "Department {:?}: file total {:?} differs from the sum of party votes {:?}",
            d.name, d.valid_votes, valid_votes
        );
    }

    let seats = allocate_or_empty(&totals, &SeatRules::DEPARTMENTAL_JUNTA, &d.name)?;
    let winner = winner_of(&totals)
        .map(|t| t.name.clone())
        .unwrap_or_else(|| UNAVAILABLE.to_string());

    let candidates = intendente_candidates(d);
    let intendente = candidates
        .iter()
        .filter(|c| c.party == winner)
        .max_by_key(|c| c.votes)
        .map(|c| c.name.clone())
        .unwrap_or_else(|| UNAVAILABLE.to_string());

    let municipalities = d
        .municipalities
        .iter()
        .map(enrich_municipality)
        .collect::<ResultsResult<Vec<EnrichedMunicipality>>>()?;

    Ok(EnrichedDepartment {
        name: display_department(&d.name),
        code: d.code.clone(),
        winner,
        intendente,
        scrutinized_pct: d.scrutinized_pct,
        participation_pct: d.participation_pct,
        preliminary: preliminary(d.scrutinized_pct),
        valid_votes,
        blank_votes: d.blank_votes,
        annulled_votes: d.annulled_votes,
        parties: party_lines(&totals, &seats),
        candidates,
        junta_lists: junta_lists(d),
        municipalities,
    })
}

// All the Intendente candidacies of the department, most voted first.
fn intendente_candidates(d: &Department) -> Vec<CandidateRow> {
    let total_votes: u64 = d.parties.iter().map(|p| p.intendente.votes).sum();
    let mut rows: Vec<CandidateRow> = Vec::new();
    for party in d.parties.iter() {
        if party.name.trim().is_empty() {
            continue;
        }
        let party_name = canonical_party(&party.name);
        let party_votes = party.intendente.votes;
        for sheet in party.intendente.sheets.iter() {
            let formatted = format_candidate_name(&sheet.description);
            let name = if formatted == UNAVAILABLE {
                format!("Candidato de {}", party_name)
            } else {
                formatted
            };
            let pct_of_party = if party_votes > 0 {
                round1(sheet.votes as f64 / party_votes as f64 * 100.0)
            } else {
                0.0
            };
            let pct_of_total = if total_votes > 0 {
                round1(sheet.votes as f64 / total_votes as f64 * 100.0)
            } else {
                0.0
            };
            rows.push(CandidateRow {
                name,
                party: party_name.clone(),
                votes: sheet.votes,
                sheet_votes: sheet.sheet_votes,
                votes_to_lema: sheet.votes_to_lema,
                pct_of_party,
                pct_of_total,
                preliminary: party_votes > 0 && pct_of_total < PRELIMINARY_SCRUTINY_PCT,
            });
        }
    }
    rows.sort_by(|a, b| b.votes.cmp(&a.votes));
    rows
}

fn junta_lists(d: &Department) -> Vec<JuntaListRow> {
    let mut rows: Vec<JuntaListRow> = Vec::new();
    for party in d.parties.iter() {
        let party_name = canonical_party(&party.name);
        for sublema in party.junta.sublemas.iter() {
            for list in sublema.junta_lists.iter() {
                rows.push(JuntaListRow {
                    party: party_name.clone(),
                    sublema: sublema.name.clone(),
                    list: list.description.clone(),
                    votes: list.votes,
                });
            }
        }
    }
    rows
}

pub fn enrich_municipality(m: &Municipality) -> ResultsResult<EnrichedMunicipality> {
    let totals = party_totals(m.parties.iter().map(|p| (p.name.as_str(), p.votes)));
    let valid_votes: u64 = totals.iter().map(|t| t.votes).sum();

    let seats = allocate_or_empty(&totals, &SeatRules::MUNICIPAL_COUNCIL, &m.name)?;
    let winner = winner_of(&totals)
        .map(|t| t.name.clone())
        .unwrap_or_else(|| UNAVAILABLE.to_string());

    Ok(EnrichedMunicipality {
        name: m.name.trim().to_string(),
        id: m.id,
        winner: winner.clone(),
        alcalde: alcalde_of(m, &winner),
        scrutinized_pct: m.scrutinized_pct,
        preliminary: preliminary(m.scrutinized_pct),
        valid_votes,
        blank_votes: m.blank_votes,
        annulled_votes: m.annulled_votes,
        council: council_rows(m, &totals, &seats),
        parties: party_lines(&totals, &seats),
    })
}

// The alcalde is the head of the most voted list within the most voted
// party (ley 19.272). Some files carry the name directly.
fn alcalde_of(m: &Municipality, winner: &str) -> String {
    if !m.alcalde.trim().is_empty() {
        return format_candidate_name(&m.alcalde);
    }
    if winner == UNAVAILABLE {
        return UNAVAILABLE.to_string();
    }
    let mut best_votes = 0;
    let mut best_name: Option<&str> = None;
    for party in m.parties.iter() {
        if canonical_party(&party.name) != winner {
            continue;
        }
        for sublema in party.detail.sublemas.iter() {
            for list in sublema.municipal_lists.iter() {
                if list.votes > best_votes && !list.description.trim().is_empty() {
                    best_votes = list.votes;
                    best_name = Some(&list.description);
                }
            }
        }
    }
    best_name
        .map(format_candidate_name)
        .unwrap_or_else(|| UNAVAILABLE.to_string())
}

// Splits each party's concejal seats among its municipal lists.
fn council_rows(m: &Municipality, totals: &[PartyTally], seats: &[u32]) -> Vec<CouncilSeatRow> {
    let mut rows: Vec<CouncilSeatRow> = Vec::new();
    for party in m.parties.iter() {
        let party_name = canonical_party(&party.name);
        let party_seats = totals
            .iter()
            .zip(seats.iter())
            .find(|(t, _)| t.name == party_name)
            .map(|(_, s)| *s)
            .unwrap_or(0);
        let lists: Vec<ListTally> = party
            .detail
            .sublemas
            .iter()
            .flat_map(|sl| sl.municipal_lists.iter())
            .map(|l| ListTally {
                number: l.id,
                name: l.description.clone(),
                votes: l.votes,
            })
            .collect();
        for split in allocate_list_seats(&lists, party_seats) {
            rows.push(CouncilSeatRow {
                party: party_name.clone(),
                number: split.number,
                list: split.name,
                votes: split.votes,
                seats: split.seats,
                last_quotient: split.last_quotient,
            });
        }
    }
    rows
}
