// Serde model of the official results files (Corte Electoral, 2020-family
// schema). Field names follow the official short keys; the raw 2020 files
// spell three counters differently (VB/VA/TOT), which serde aliases absorb.
//
// Count fields occasionally arrive as strings with stray spaces or comma
// decimals, so every counter goes through a tolerant deserializer instead
// of a plain integer.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value as JSValue;

use crate::results::normalize::{parse_count, parse_percent};

fn de_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let v = JSValue::deserialize(deserializer)?;
    Ok(match v {
        JSValue::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
            .unwrap_or(0),
        JSValue::String(s) => parse_count(&s),
        JSValue::Bool(b) => b as u64,
        _ => 0,
    })
}

fn de_percent<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let v = JSValue::deserialize(deserializer)?;
    Ok(match v {
        JSValue::Number(n) => n.as_f64().unwrap_or(0.0),
        JSValue::String(s) => parse_percent(&s),
        _ => 0.0,
    })
}

/// An individual ballot sheet (hoja). On the Intendente section the `Dsc`
/// field carries the candidate name backed by the sheet.
#[derive(PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct Sheet {
    #[serde(rename = "HI", default, deserialize_with = "de_count")]
    pub number: u64,
    #[serde(rename = "HN", default)]
    pub label: String,
    #[serde(rename = "Dsc", default)]
    pub description: String,
    #[serde(rename = "Tot", default, deserialize_with = "de_count")]
    pub votes: u64,
    #[serde(rename = "VH", default, deserialize_with = "de_count")]
    pub sheet_votes: u64,
    #[serde(rename = "VAL", default, deserialize_with = "de_count")]
    pub votes_to_lema: u64,
}

/// A candidate list presented inside a sublema.
#[derive(PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct List {
    #[serde(rename = "LId", default, deserialize_with = "de_count")]
    pub id: u64,
    #[serde(rename = "Dsc", default)]
    pub description: String,
    #[serde(rename = "VH", default, deserialize_with = "de_count")]
    pub sheet_votes: u64,
    #[serde(rename = "VAL", default, deserialize_with = "de_count")]
    pub votes_to_lema: u64,
    #[serde(rename = "Tot", default, deserialize_with = "de_count")]
    pub votes: u64,
}

/// An intra-party grouping of lists.
#[derive(PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct Sublema {
    #[serde(rename = "Id", default, deserialize_with = "de_count")]
    pub id: u64,
    #[serde(rename = "Nombre", default)]
    pub name: String,
    #[serde(rename = "VH", default, deserialize_with = "de_count")]
    pub sheet_votes: u64,
    #[serde(rename = "VAS", default, deserialize_with = "de_count")]
    pub votes_to_sublema: u64,
    #[serde(rename = "Tot", default, deserialize_with = "de_count")]
    pub votes: u64,
    #[serde(rename = "ListasJunta", default)]
    pub junta_lists: Vec<List>,
    #[serde(rename = "ListasMunicipio", default)]
    pub municipal_lists: Vec<List>,
}

/// The Intendente race inside one party: the sheets backing each
/// candidacy.
#[derive(PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct IntendenteDetail {
    #[serde(rename = "Listas", default)]
    pub sheets: Vec<Sheet>,
    #[serde(rename = "TALDI", default, deserialize_with = "de_count")]
    pub votes_to_lema: u64,
    #[serde(rename = "Tot", default, deserialize_with = "de_count")]
    pub votes: u64,
}

/// The Junta Departamental race inside one party.
#[derive(PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct JuntaDetail {
    #[serde(rename = "Sublemas", default)]
    pub sublemas: Vec<Sublema>,
    #[serde(rename = "TALDSL", default, deserialize_with = "de_count")]
    pub votes_to_lema: u64,
    #[serde(rename = "Tot", default, deserialize_with = "de_count")]
    pub votes: u64,
}

/// The municipal race inside one party.
#[derive(PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct MunicipalDetail {
    #[serde(rename = "Sublemas", default)]
    pub sublemas: Vec<Sublema>,
    #[serde(rename = "TALDSL", default, deserialize_with = "de_count")]
    pub votes_to_lema: u64,
    #[serde(rename = "Tot", default, deserialize_with = "de_count")]
    pub votes: u64,
}

/// One party's departmental result.
#[derive(PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct DepartmentParty {
    #[serde(rename = "LI", default, deserialize_with = "de_count")]
    pub id: u64,
    #[serde(rename = "LN", default)]
    pub name: String,
    #[serde(rename = "LIcon", default)]
    pub icon: String,
    #[serde(rename = "TH", default, deserialize_with = "de_count")]
    pub sheet_total: u64,
    #[serde(rename = "TAL", default, deserialize_with = "de_count")]
    pub votes_to_lema: u64,
    #[serde(rename = "Tot", default, deserialize_with = "de_count")]
    pub votes: u64,
    #[serde(rename = "Hojas", default)]
    pub sheets: Vec<Sheet>,
    #[serde(rename = "Intendente", default)]
    pub intendente: IntendenteDetail,
    #[serde(rename = "Junta", default)]
    pub junta: JuntaDetail,
}

/// One party's result in a municipality.
#[derive(PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct MunicipalParty {
    #[serde(rename = "LI", default, deserialize_with = "de_count")]
    pub id: u64,
    #[serde(rename = "LN", default)]
    pub name: String,
    #[serde(rename = "LIcon", default)]
    pub icon: String,
    #[serde(rename = "TH", default, deserialize_with = "de_count")]
    pub sheet_total: u64,
    #[serde(rename = "TAL", default, deserialize_with = "de_count")]
    pub votes_to_lema: u64,
    #[serde(rename = "Tot", default, deserialize_with = "de_count")]
    pub votes: u64,
    #[serde(rename = "Hojas", default)]
    pub sheets: Vec<Sheet>,
    #[serde(rename = "Municipio", default)]
    pub detail: MunicipalDetail,
}

/// The full result of one municipality.
#[derive(PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct Municipality {
    #[serde(rename = "MI", default, deserialize_with = "de_count")]
    pub id: u64,
    #[serde(rename = "MD", default)]
    pub name: String,
    #[serde(rename = "CE", default, deserialize_with = "de_count")]
    pub observed_votes: u64,
    #[serde(rename = "CT", default, deserialize_with = "de_count")]
    pub eligible_voters: u64,
    #[serde(rename = "CP", default, deserialize_with = "de_percent")]
    pub participation_pct: f64,
    #[serde(rename = "TA", alias = "VB", default, deserialize_with = "de_count")]
    pub blank_votes: u64,
    #[serde(rename = "TO", alias = "VA", default, deserialize_with = "de_count")]
    pub annulled_votes: u64,
    #[serde(rename = "TNO", default, deserialize_with = "de_count")]
    pub non_observed_votes: u64,
    #[serde(rename = "TE", default, deserialize_with = "de_count")]
    pub envelopes: u64,
    #[serde(rename = "TH", alias = "TOT", default, deserialize_with = "de_count")]
    pub valid_votes: u64,
    #[serde(rename = "CFCO", default)]
    pub final_count: bool,
    #[serde(rename = "TEB", default, deserialize_with = "de_count")]
    pub scrutinized_ballots: u64,
    #[serde(rename = "TEBP", default, deserialize_with = "de_percent")]
    pub scrutinized_pct: f64,
    #[serde(rename = "CCO", default, deserialize_with = "de_count")]
    pub counted_stations: u64,
    /// Some files carry the elected alcalde directly.
    #[serde(rename = "CAlcalde", default)]
    pub alcalde: String,
    #[serde(rename = "Eleccion", default)]
    pub parties: Vec<MunicipalParty>,
}

/// The full result of one department.
#[derive(PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct Department {
    #[serde(rename = "DI", default)]
    pub code: String,
    #[serde(rename = "DN", default)]
    pub name: String,
    #[serde(rename = "CE", default, deserialize_with = "de_count")]
    pub observed_votes: u64,
    #[serde(rename = "CT", default, deserialize_with = "de_count")]
    pub eligible_voters: u64,
    #[serde(rename = "CP", default, deserialize_with = "de_percent")]
    pub participation_pct: f64,
    #[serde(rename = "TA", alias = "VB", default, deserialize_with = "de_count")]
    pub blank_votes: u64,
    #[serde(rename = "TO", alias = "VA", default, deserialize_with = "de_count")]
    pub annulled_votes: u64,
    #[serde(rename = "TNO", default, deserialize_with = "de_count")]
    pub non_observed_votes: u64,
    #[serde(rename = "TE", default, deserialize_with = "de_count")]
    pub envelopes: u64,
    #[serde(rename = "TH", alias = "TOT", default, deserialize_with = "de_count")]
    pub valid_votes: u64,
    #[serde(rename = "CFCO", default)]
    pub final_count: bool,
    #[serde(rename = "TEB", default, deserialize_with = "de_count")]
    pub scrutinized_ballots: u64,
    #[serde(rename = "TEBP", default, deserialize_with = "de_percent")]
    pub scrutinized_pct: f64,
    #[serde(rename = "CCO", default, deserialize_with = "de_count")]
    pub counted_stations: u64,
    #[serde(rename = "Municipales", default)]
    pub municipalities: Vec<Municipality>,
    #[serde(rename = "Departamentales", default)]
    pub parties: Vec<DepartmentParty>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_tolerate_strings_and_spaces() {
        let js = r#"{"HI": "71", "Dsc": "CARLOS ENCISO", "Tot": " 1200 ", "VH": 1100, "VAL": "12,0"}"#;
        let sheet: Sheet = serde_json::from_str(js).unwrap();
        assert_eq!(sheet.number, 71);
        assert_eq!(sheet.votes, 1200);
        assert_eq!(sheet.sheet_votes, 1100);
        assert_eq!(sheet.votes_to_lema, 12);
    }

    #[test]
    fn missing_fields_default_to_zero() {
        let sheet: Sheet = serde_json::from_str("{}").unwrap();
        assert_eq!(sheet.votes, 0);
        assert_eq!(sheet.description, "");
    }

    #[test]
    fn raw_2020_spellings_are_accepted() {
        let js = r#"{"DN": "FLORIDA", "VB": 500, "VA": 300, "TOT": 40000}"#;
        let d: Department = serde_json::from_str(js).unwrap();
        assert_eq!(d.blank_votes, 500);
        assert_eq!(d.annulled_votes, 300);
        assert_eq!(d.valid_votes, 40000);
    }

    #[test]
    fn percent_fields_accept_comma_strings() {
        let js = r#"{"MD": "CIUDAD DEL PLATA", "CP": "55,3", "TEBP": 92}"#;
        let m: Municipality = serde_json::from_str(js).unwrap();
        assert_eq!(m.participation_pct, 55.3);
        assert_eq!(m.scrutinized_pct, 92.0);
    }
}
