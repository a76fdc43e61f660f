// Reading of the official results files, with format auto-detection.
//
// The 2020 files and the 2025 API snapshots share the same schema, so a
// single reader covers both; the signature check is what keeps the seam
// open for a future year that changes the layout.

use std::fs;

use log::info;
use serde_json::Value as JSValue;
use snafu::prelude::*;

use crate::results::config_reader::Department;
use crate::results::{
    EmptyResultsSnafu, OpeningResultsSnafu, ParsingResultsSnafu, ResultsResult, UnknownFormatSnafu,
};

// Keys that identify the 2020-family schema. Counter keys are accepted in
// either spelling (raw files use VB/VA/TOT, the API uses TA/TO/TH).
static SIGNATURE: [&[&str]; 4] = [
    &["DN"],
    &["Departamentales"],
    &["Municipales"],
    &["TH", "TOT"],
];

pub fn load_departments(path: &str) -> ResultsResult<Vec<Department>> {
    let contents = fs::read_to_string(path).context(OpeningResultsSnafu { path })?;
    parse_departments(&contents, path)
}

pub fn parse_departments(contents: &str, path: &str) -> ResultsResult<Vec<Department>> {
    let js: JSValue = serde_json::from_str(contents).context(ParsingResultsSnafu { path })?;
    let first = js
        .as_array()
        .and_then(|a| a.first())
        .context(EmptyResultsSnafu { path })?;
    check_signature(first, path)?;
    let departments: Vec<Department> =
        serde_json::from_value(js).context(ParsingResultsSnafu { path })?;
    info!(
        "Loaded {:?} departments from results file {:?}",
        departments.len(),
        path
    );
    Ok(departments)
}

fn check_signature(first: &JSValue, path: &str) -> ResultsResult<()> {
    let keys: Vec<String> = match first.as_object() {
        Some(map) => map.keys().cloned().collect(),
        None => Vec::new(),
    };
    let matches = SIGNATURE
        .iter()
        .all(|alternatives| alternatives.iter().any(|k| keys.iter().any(|key| key == k)));
    ensure!(
        matches,
        UnknownFormatSnafu {
            path,
            keys: keys.clone()
        }
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_the_official_schema() {
        let js = r#"[{"DN": "FLORIDA", "TH": 100, "Departamentales": [], "Municipales": []}]"#;
        let deps = parse_departments(js, "results.json").unwrap();
        assert_eq!(deps.len(), 1);
        assert_eq!(deps[0].name, "FLORIDA");
    }

    #[test]
    fn accepts_the_raw_2020_spelling() {
        let js = r#"[{"DN": "FLORIDA", "TOT": 100, "Departamentales": [], "Municipales": []}]"#;
        assert!(parse_departments(js, "results.json").is_ok());
    }

    #[test]
    fn rejects_unknown_layouts() {
        let js = r#"[{"departamento": "FLORIDA", "votos": 100}]"#;
        let err = parse_departments(js, "results.json").unwrap_err();
        let msg = format!("{}", err);
        assert!(msg.contains("departamento"), "message: {}", msg);
    }

    #[test]
    fn rejects_empty_files() {
        assert!(parse_departments("[]", "results.json").is_err());
        assert!(parse_departments("{}", "results.json").is_err());
    }
}
