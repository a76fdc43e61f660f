use log::{info, warn};

use snafu::{prelude::*, Snafu};

use std::fs;
use std::path::PathBuf;

use serde_json::json;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::Args;
use crate::results::enrich::EnrichedDepartment;
use crate::results::summary::NationalSummary;

pub mod config_reader;
pub mod enrich;
pub mod io_geo;
pub mod io_results;
pub mod normalize;
pub mod summary;

#[derive(Debug, Snafu)]
pub enum ResultsError {
    #[snafu(display("Error opening results file {path}"))]
    OpeningResults {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing results file {path}"))]
    ParsingResults {
        source: serde_json::Error,
        path: String,
    },
    #[snafu(display("Results file {path} does not contain any department"))]
    EmptyResults { path: String },
    #[snafu(display("Unrecognized results format in {path}: found keys {keys:?}"))]
    UnknownFormat { path: String, keys: Vec<String> },
    #[snafu(display("Error opening boundaries file {path}"))]
    OpeningGeo {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing boundaries file {path}"))]
    ParsingGeo {
        source: serde_json::Error,
        path: String,
    },
    #[snafu(display("Error writing output file {path}"))]
    WritingOutput {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error serializing the summary"))]
    SerializingSummary { source: serde_json::Error },
    #[snafu(display("Seat allocation failed for {scope}"))]
    Allocation {
        source: proportional_voting::AllocationErrors,
        scope: String,
    },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type ResultsResult<T> = Result<T, ResultsError>;

const DEFAULT_YEAR: u32 = 2020;
const DEFAULT_DATA_DIR: &str = "data";

/// Run configuration, resolved from the command line with environment
/// variable fallbacks (ELECTION_YEAR, DATA_DIR).
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Settings {
    pub year: u32,
    pub data_dir: PathBuf,
}

impl Settings {
    pub fn from_args(args: &Args) -> Settings {
        let year = args.year.or_else(env_year).unwrap_or(DEFAULT_YEAR);
        let data_dir = args
            .data_dir
            .clone()
            .or_else(|| std::env::var("DATA_DIR").ok())
            .unwrap_or_else(|| DEFAULT_DATA_DIR.to_string());
        Settings {
            year,
            data_dir: PathBuf::from(data_dir),
        }
    }

    /// Conventional location of a year's results file.
    pub fn results_path(&self) -> PathBuf {
        self.data_dir
            .join("election_data")
            .join(self.year.to_string())
            .join(format!("results_{}.json", self.year))
    }
}

fn env_year() -> Option<u32> {
    let raw = std::env::var("ELECTION_YEAR").ok()?;
    match raw.trim().parse::<u32>() {
        Ok(year) => Some(year),
        Err(_) => {
            warn!("Ignoring unparseable ELECTION_YEAR {:?}", raw);
            None
        }
    }
}

pub fn run_summary(args: &Args) -> ResultsResult<()> {
    let settings = Settings::from_args(args);
    let path = args
        .data
        .clone()
        .unwrap_or_else(|| settings.results_path().display().to_string());
    info!("settings: {:?}, results file: {:?}", settings, path);

    let raw = io_results::load_departments(&path)?;
    let departments = raw
        .iter()
        .map(enrich::enrich_department)
        .collect::<ResultsResult<Vec<EnrichedDepartment>>>()?;
    let national = summary::national_summary(settings.year, &departments);

    let selected: Vec<&EnrichedDepartment> = match &args.department {
        Some(name) => {
            let dept = summary::find_department(&departments, name)
                .with_whatever_context(|| format!("No department named {:?} in {}", name, path))?;
            vec![dept]
        }
        None => departments.iter().collect(),
    };

    let result_js = build_summary_js(&settings, &national, &selected);
    let pretty_js_stats =
        serde_json::to_string_pretty(&result_js).context(SerializingSummarySnafu {})?;

    match args.out.as_deref() {
        None | Some("stdout") => println!("{}", pretty_js_stats),
        Some(out_path) => {
            fs::write(out_path, &pretty_js_stats)
                .context(WritingOutputSnafu { path: out_path })?;
            info!("Wrote summary to {:?}", out_path);
        }
    }

    if let Some(geo_path) = &args.geojson {
        let mut fc = io_geo::load_boundaries(geo_path)?;
        let matched = io_geo::join_winners(&mut fc, &departments);
        info!(
            "Matched {:?} of {:?} boundary features",
            matched,
            fc.features.len()
        );
        let out_path = match geo_path.strip_suffix(".json") {
            Some(stem) => format!("{}.winners.json", stem),
            None => format!("{}.winners.json", geo_path),
        };
        io_geo::write_enriched(&out_path, &fc)?;
    }

    // The reference summary, if provided for comparison
    if let Some(reference_path) = &args.reference {
        let reference = read_reference(reference_path)?;
        let pretty_js_reference =
            serde_json::to_string_pretty(&reference).context(SerializingSummarySnafu {})?;
        if pretty_js_reference != pretty_js_stats {
            warn!("Found differences with the reference summary");
            print_diff(
                pretty_js_reference.as_str(),
                pretty_js_stats.as_ref(),
                "\n",
            );
            whatever!("Difference detected between tabulated summary and reference summary");
        }
    }

    Ok(())
}

fn build_summary_js(
    settings: &Settings,
    national: &NationalSummary,
    departments: &[&EnrichedDepartment],
) -> JSValue {
    json!({
        "year": settings.year,
        "national": national,
        "departments": departments,
    })
}

fn read_reference(path: &str) -> ResultsResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningResultsSnafu { path })?;
    let js: JSValue = serde_json::from_str(&contents).context(ParsingResultsSnafu { path })?;
    Ok(js)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::normalize::UNAVAILABLE;

    // A small two-department file in the official layout. Salto is barely
    // scrutinized, and one of its counters arrives as a string.
    static RESULTS_FIXTURE: &str = r#"[
      {
        "DI": "07", "DN": "FLORIDA",
        "TA": 400, "TO": 100, "TNO": 0, "TE": 3000, "TH": 2500,
        "TEB": 2900, "TEBP": 92, "CCO": 120, "CFCO": true,
        "Departamentales": [
          {
            "LI": 1, "LN": "PARTIDO A", "Tot": 1200,
            "Intendente": {
              "Tot": 1200,
              "Listas": [
                {"HI": 904, "Dsc": "CARLOS ENCISO", "Tot": 900, "VH": 880, "VAL": 20},
                {"HI": 55, "Dsc": "ANA SOSA", "Tot": 300, "VH": 295, "VAL": 5}
              ]
            },
            "Junta": {
              "Sublemas": [
                {"Nombre": "SUBLEMA A1", "ListasJunta": [{"LId": 904, "Dsc": "LISTA 904", "Tot": 700}]}
              ]
            }
          },
          {
            "LI": 2, "LN": "PARTIDO B", "Tot": 800,
            "Intendente": {"Tot": 800, "Listas": [{"HI": 71, "Dsc": "JOSE PEREZ", "Tot": 800}]}
          },
          {
            "LI": 3, "LN": "PARTIDO C", "Tot": 500,
            "Intendente": {"Tot": 500, "Listas": [{"HI": 10, "Dsc": "MARIA GOMEZ", "Tot": 500}]}
          }
        ],
        "Municipales": [
          {
            "MI": 1, "MD": "SARANDI GRANDE", "TEBP": 88, "TH": 900,
            "Eleccion": [
              {
                "LI": 1, "LN": "PARTIDO A", "Tot": 600,
                "Municipio": {
                  "Sublemas": [
                    {
                      "Nombre": "S1",
                      "ListasMunicipio": [
                        {"LId": 90, "Dsc": "JUAN LOPEZ", "Tot": 400},
                        {"LId": 71, "Dsc": "PEDRO RODRIGUEZ", "Tot": 200}
                      ]
                    }
                  ]
                }
              },
              {"LI": 2, "LN": "PARTIDO B", "Tot": 300}
            ]
          }
        ]
      },
      {
        "DI": "15", "DN": "SALTO",
        "TA": 0, "TO": 0, "TH": 1000, "TEBP": 5,
        "Departamentales": [
          {"LI": 2, "LN": "PARTIDO B", "Tot": "600"},
          {"LI": 1, "LN": "PARTIDO A", "Tot": 400}
        ],
        "Municipales": []
      }
    ]"#;

    fn fixture_departments() -> Vec<EnrichedDepartment> {
        let raw = io_results::parse_departments(RESULTS_FIXTURE, "fixture.json").unwrap();
        raw.iter()
            .map(|d| enrich::enrich_department(d).unwrap())
            .collect()
    }

    #[test]
    fn tabulates_the_fixture_end_to_end() {
        let departments = fixture_departments();
        assert_eq!(departments.len(), 2);

        let florida = &departments[0];
        assert_eq!(florida.name, "Florida");
        assert_eq!(florida.winner, "Partido A");
        assert_eq!(florida.intendente, "Carlos Enciso");
        assert!(!florida.preliminary);

        let salto = &departments[1];
        assert_eq!(salto.name, "Salto");
        assert_eq!(salto.winner, "Partido B");
        // The string counter was parsed.
        assert_eq!(salto.valid_votes, 1000);
        // 5% scrutinized.
        assert!(salto.preliminary);
        // No Intendente candidates in the file.
        assert_eq!(salto.intendente, UNAVAILABLE);
    }

    #[test]
    fn seats_are_conserved_in_every_department() {
        for dept in fixture_departments() {
            let total: u32 = dept.parties.iter().map(|p| p.seats).sum();
            assert_eq!(total, 31, "department: {}", dept.name);
            for muni in dept.municipalities.iter() {
                let total: u32 = muni.parties.iter().map(|p| p.seats).sum();
                assert_eq!(total, 5, "municipality: {}", muni.name);
            }
        }
    }

    #[test]
    fn percentages_sum_to_one_hundred() {
        for dept in fixture_departments() {
            let sum: f64 = dept.parties.iter().map(|p| p.pct).sum();
            assert!((sum - 100.0).abs() < 0.3, "department: {}", dept.name);
        }
    }

    #[test]
    fn national_summary_aggregates_the_fixture() {
        let departments = fixture_departments();
        let national = summary::national_summary(2020, &departments);
        assert_eq!(national.total_departments, 2);
        assert_eq!(national.total_municipalities, 1);
        assert_eq!(national.party_votes["Partido A"], 1600);
        assert_eq!(national.party_votes["Partido B"], 1400);
        assert_eq!(national.party_votes["Partido C"], 500);
        assert_eq!(national.most_voted, "Partido A");
        assert_eq!(national.department_winners["Partido A"], 1);
        assert_eq!(national.department_winners["Partido B"], 1);
        let total_ediles: u32 = national.ediles.values().sum();
        assert_eq!(total_ediles, 62);
        assert_eq!(national.alcaldes["Partido A"], 1);
        let pct_sum: f64 = national.party_pct.values().sum();
        assert!((pct_sum - 100.0).abs() < 0.05);
    }

    #[test]
    fn municipal_council_is_tabulated() {
        let departments = fixture_departments();
        let muni = &departments[0].municipalities[0];
        assert_eq!(muni.name, "SARANDI GRANDE");
        assert_eq!(muni.winner, "Partido A");
        assert_eq!(muni.alcalde, "Juan Lopez");
        let winner_line = muni.parties.iter().find(|p| p.party == "Partido A").unwrap();
        assert!(winner_line.seats >= 3);
        let split: u32 = muni
            .council
            .iter()
            .filter(|r| r.party == "Partido A")
            .map(|r| r.seats)
            .sum();
        assert_eq!(split, winner_line.seats);
    }

    #[test]
    fn summary_document_shape() {
        let departments = fixture_departments();
        let national = summary::national_summary(2020, &departments);
        let settings = Settings {
            year: 2020,
            data_dir: PathBuf::from("data"),
        };
        let selected: Vec<&EnrichedDepartment> = departments.iter().collect();
        let js = build_summary_js(&settings, &national, &selected);
        assert_eq!(js["year"], 2020);
        assert_eq!(js["national"]["total_departments"], 2);
        assert_eq!(js["departments"][0]["name"], "Florida");
    }
}
