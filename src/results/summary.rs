// National aggregation over the enriched departments.
//
// The national percentages use only valid votes (the sum of party votes
// across departments), rounded to two decimals.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::results::enrich::EnrichedDepartment;
use crate::results::normalize::{names_match, round2, UNAVAILABLE};

#[derive(Serialize, PartialEq, Debug, Clone)]
pub struct NationalSummary {
    pub year: u32,
    pub total_departments: usize,
    pub total_municipalities: usize,
    pub total_valid_votes: u64,
    pub most_voted: String,
    pub party_votes: BTreeMap<String, u64>,
    pub party_pct: BTreeMap<String, f64>,
    pub department_winners: BTreeMap<String, u32>,
    pub municipality_winners: BTreeMap<String, u32>,
    pub ediles: BTreeMap<String, u32>,
    pub alcaldes: BTreeMap<String, u32>,
}

pub fn national_summary(year: u32, departments: &[EnrichedDepartment]) -> NationalSummary {
    let mut party_votes: BTreeMap<String, u64> = BTreeMap::new();
    let mut department_winners: BTreeMap<String, u32> = BTreeMap::new();
    let mut municipality_winners: BTreeMap<String, u32> = BTreeMap::new();
    let mut ediles: BTreeMap<String, u32> = BTreeMap::new();
    let mut alcaldes: BTreeMap<String, u32> = BTreeMap::new();
    let mut total_municipalities = 0;

    for dept in departments {
        if dept.winner != UNAVAILABLE {
            *department_winners.entry(dept.winner.clone()).or_insert(0) += 1;
        }
        for line in dept.parties.iter() {
            *party_votes.entry(line.party.clone()).or_insert(0) += line.votes;
            if line.seats > 0 {
                *ediles.entry(line.party.clone()).or_insert(0) += line.seats;
            }
        }
        total_municipalities += dept.municipalities.len();
        for muni in dept.municipalities.iter() {
            if muni.winner != UNAVAILABLE {
                *municipality_winners.entry(muni.winner.clone()).or_insert(0) += 1;
                // The alcalde belongs to the most voted party (ley 19.272).
                *alcaldes.entry(muni.winner.clone()).or_insert(0) += 1;
            }
        }
    }

    let total_valid_votes: u64 = party_votes.values().sum();
    let party_pct: BTreeMap<String, f64> = if total_valid_votes > 0 {
        party_votes
            .iter()
            .map(|(party, votes)| {
                (
                    party.clone(),
                    round2(*votes as f64 / total_valid_votes as f64 * 100.0),
                )
            })
            .collect()
    } else {
        BTreeMap::new()
    };

    let most_voted = most_voted_party(&party_votes, &department_winners, &municipality_winners);

    NationalSummary {
        year,
        total_departments: departments.len(),
        total_municipalities,
        total_valid_votes,
        most_voted,
        party_votes,
        party_pct,
        department_winners,
        municipality_winners,
        ediles,
        alcaldes,
    }
}

// The party with most votes nationwide. Without vote data, the party
// holding most departments, then most municipalities. Ties resolve to the
// alphabetically first name so the outcome is reproducible.
fn most_voted_party(
    votes: &BTreeMap<String, u64>,
    departments: &BTreeMap<String, u32>,
    municipalities: &BTreeMap<String, u32>,
) -> String {
    fn best<V: Ord + Copy>(m: &BTreeMap<String, V>) -> Option<String> {
        m.iter()
            .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(a.0)))
            .map(|(k, _)| k.clone())
    }
    best(votes)
        .or_else(|| best(departments))
        .or_else(|| best(municipalities))
        .unwrap_or_else(|| UNAVAILABLE.to_string())
}

/// The department whose name matches `name` under normalization.
pub fn find_department<'a>(
    departments: &'a [EnrichedDepartment],
    name: &str,
) -> Option<&'a EnrichedDepartment> {
    departments.iter().find(|d| names_match(&d.name, name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::enrich::{EnrichedMunicipality, PartyLine};

    fn line(party: &str, votes: u64, seats: u32) -> PartyLine {
        PartyLine {
            party: party.to_string(),
            color: String::new(),
            votes,
            pct: 0.0,
            seats,
        }
    }

    fn dept(name: &str, winner: &str, lines: Vec<PartyLine>) -> EnrichedDepartment {
        EnrichedDepartment {
            name: name.to_string(),
            code: String::new(),
            winner: winner.to_string(),
            intendente: UNAVAILABLE.to_string(),
            scrutinized_pct: 95.0,
            participation_pct: 0.0,
            preliminary: false,
            valid_votes: lines.iter().map(|l| l.votes).sum(),
            blank_votes: 0,
            annulled_votes: 0,
            parties: lines,
            candidates: vec![],
            junta_lists: vec![],
            municipalities: vec![],
        }
    }

    fn muni(name: &str, winner: &str) -> EnrichedMunicipality {
        EnrichedMunicipality {
            name: name.to_string(),
            id: 0,
            winner: winner.to_string(),
            alcalde: UNAVAILABLE.to_string(),
            scrutinized_pct: 95.0,
            preliminary: false,
            valid_votes: 0,
            blank_votes: 0,
            annulled_votes: 0,
            parties: vec![],
            council: vec![],
        }
    }

    #[test]
    fn national_totals_and_percentages() {
        let d1 = dept("Florida", "A", vec![line("A", 600, 16), line("B", 400, 15)]);
        let d2 = dept("Rocha", "B", vec![line("B", 700, 16), line("A", 300, 15)]);
        let s = national_summary(2020, &[d1, d2]);
        assert_eq!(s.total_departments, 2);
        assert_eq!(s.total_valid_votes, 2000);
        assert_eq!(s.party_votes["A"], 900);
        assert_eq!(s.party_votes["B"], 1100);
        assert_eq!(s.party_pct["A"], 45.0);
        assert_eq!(s.party_pct["B"], 55.0);
        let pct_sum: f64 = s.party_pct.values().sum();
        assert!((pct_sum - 100.0).abs() < 0.05);
        assert_eq!(s.most_voted, "B");
        assert_eq!(s.ediles["A"], 31);
        assert_eq!(s.ediles["B"], 31);
        assert_eq!(s.department_winners["A"], 1);
        assert_eq!(s.department_winners["B"], 1);
    }

    #[test]
    fn municipality_roll_up() {
        let mut d = dept("Florida", "A", vec![line("A", 600, 31)]);
        d.municipalities = vec![muni("Sarandí Grande", "A"), muni("Casupá", "B")];
        let s = national_summary(2020, &[d]);
        assert_eq!(s.total_municipalities, 2);
        assert_eq!(s.municipality_winners["A"], 1);
        assert_eq!(s.alcaldes["B"], 1);
    }

    #[test]
    fn unavailable_winners_are_not_counted() {
        let d = dept("Flores", UNAVAILABLE, vec![]);
        let s = national_summary(2020, &[d]);
        assert!(s.department_winners.is_empty());
        assert_eq!(s.most_voted, UNAVAILABLE);
    }

    #[test]
    fn departments_are_found_by_normalized_name() {
        let deps = vec![dept("Paysandú", "A", vec![])];
        assert!(find_department(&deps, "PAYSANDU").is_some());
        assert!(find_department(&deps, "paysandú").is_some());
        assert!(find_department(&deps, "Rocha").is_none());
    }
}
