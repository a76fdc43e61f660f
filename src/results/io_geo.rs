// Joining of the department boundary files (GeoJSON, converted offline
// from the official shapefiles) with the tabulated winners. Only the
// feature properties are touched; geometries pass through untouched.

use std::fs;

use log::{info, warn};
use serde::{Deserialize, Serialize};
use serde_json::json;
use serde_json::Map as JSMap;
use serde_json::Value as JSValue;
use snafu::prelude::*;

use crate::results::enrich::EnrichedDepartment;
use crate::results::normalize::{names_match, party_color};
use crate::results::{OpeningGeoSnafu, ParsingGeoSnafu, ResultsResult, WritingOutputSnafu};

// Property keys under which boundary files name the department.
static NAME_KEYS: [&str; 6] = ["NOMBRE", "nombre", "NAME", "name", "DEPTO", "depto"];

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub properties: JSMap<String, JSValue>,
    #[serde(default)]
    pub geometry: JSValue,
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub kind: String,
    pub features: Vec<Feature>,
}

pub fn load_boundaries(path: &str) -> ResultsResult<FeatureCollection> {
    let contents = fs::read_to_string(path).context(OpeningGeoSnafu { path })?;
    let fc: FeatureCollection =
        serde_json::from_str(&contents).context(ParsingGeoSnafu { path })?;
    info!(
        "Loaded {:?} boundary features from {:?}",
        fc.features.len(),
        path
    );
    Ok(fc)
}

fn feature_name(feature: &Feature) -> Option<&str> {
    NAME_KEYS
        .iter()
        .find_map(|k| feature.properties.get(*k).and_then(|v| v.as_str()))
}

/// Writes the winner, its vote share and the preliminary flag into each
/// matching feature's properties. Returns the number of features matched.
pub fn join_winners(fc: &mut FeatureCollection, departments: &[EnrichedDepartment]) -> usize {
    let mut matched = 0;
    for feature in fc.features.iter_mut() {
        let name = match feature_name(feature) {
            Some(n) => n.to_string(),
            None => {
                warn!("Boundary feature without a department name: {:?}", feature.properties);
                continue;
            }
        };
        let dept = departments.iter().find(|d| names_match(&d.name, &name));
        match dept {
            Some(d) => {
                let winner_pct = d
                    .parties
                    .iter()
                    .find(|p| p.party == d.winner)
                    .map(|p| p.pct)
                    .unwrap_or(0.0);
                feature.properties.insert("winner".to_string(), json!(d.winner));
                feature
                    .properties
                    .insert("winner_color".to_string(), json!(party_color(&d.winner)));
                feature
                    .properties
                    .insert("winner_pct".to_string(), json!(winner_pct));
                feature
                    .properties
                    .insert("preliminary".to_string(), json!(d.preliminary));
                matched += 1;
            }
            None => {
                warn!("No results for boundary feature {:?}", name);
            }
        }
    }
    matched
}

pub fn write_enriched(path: &str, fc: &FeatureCollection) -> ResultsResult<()> {
    let contents = serde_json::to_string_pretty(fc).context(ParsingGeoSnafu { path })?;
    fs::write(path, contents).context(WritingOutputSnafu { path })?;
    info!("Wrote enriched boundaries to {:?}", path);
    Ok(())
}
