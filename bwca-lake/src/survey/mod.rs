//! LakeFinder fishery survey documents.
//!
//! A survey response is a nested JSON tree whose layout drifts between lakes:
//! some documents hold many historical surveys, some none, and any species
//! may be missing from any survey. The document is read by recursive descent
//! over [`serde_json::Value`] into keyed records, and the same information
//! can be recovered from its flattened form through [`SurveySource`].

#[cfg(feature = "api")]
pub mod client;
pub mod flatten;
pub mod histogram;
pub mod selector;

use crate::error::Result;
use crate::species::Species;
use flatten::scalar_text;
use log::debug;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Key holding the array of historical surveys.
const SURVEYS_KEY: &str = "surveys";

/// A survey's date string, keyed by its position in the document.
#[derive(Debug, PartialEq, Eq, Clone, Serialize)]
pub struct SurveyDate {
    pub index: usize,
    pub date: String,
}

/// One `fishCount` entry: a length label and the number of fish at it.
///
/// Values are kept as text until extraction; the count may be missing.
#[derive(Debug, PartialEq, Eq, Clone, Serialize)]
pub struct FishCountEntry {
    pub length: String,
    pub count: Option<String>,
}

/// Anything survey dates and length-frequency entries can be read from.
pub trait SurveySource {
    /// Every survey that carries a date, in document order.
    fn survey_dates(&self) -> Vec<SurveyDate>;

    /// The `fishCount` entries of one species in one survey, in entry order.
    /// Empty when the survey or species is absent.
    fn fish_count_entries(&self, survey_index: usize, species: Species) -> Vec<FishCountEntry>;
}

/// Physical lake characteristics, reported as the API sends them (text).
#[derive(Debug, PartialEq, Eq, Clone, Default, Serialize)]
pub struct LakeCharacteristics {
    pub area_acres: Option<String>,
    pub littoral_acres: Option<String>,
    pub shore_length_miles: Option<String>,
    pub mean_depth_feet: Option<String>,
    pub max_depth_feet: Option<String>,
    pub average_water_clarity: Option<String>,
}

impl LakeCharacteristics {
    fn from_object(object: &Map<String, Value>) -> Self {
        let text = |key: &str| object.get(key).filter(|v| !v.is_null()).map(scalar_text);
        LakeCharacteristics {
            area_acres: text("areaAcres"),
            littoral_acres: text("littoralAcres"),
            shore_length_miles: text("shoreLengthMiles"),
            mean_depth_feet: text("meanDepthFeet"),
            max_depth_feet: text("maxDepthFeet"),
            average_water_clarity: text("averageWaterClarity"),
        }
    }

    /// Labelled lines with units, e.g. `"Area: 1,234 acres"`. Missing values
    /// are skipped.
    pub fn display_lines(&self) -> Vec<String> {
        [
            ("Area", &self.area_acres, "acres"),
            ("Littoral Area", &self.littoral_acres, "acres"),
            ("Shore Length", &self.shore_length_miles, "miles"),
            ("Mean Depth", &self.mean_depth_feet, "ft"),
            ("Maximum Depth", &self.max_depth_feet, "ft"),
            ("Average Water Clarity", &self.average_water_clarity, "ft"),
        ]
        .into_iter()
        .filter_map(|(label, value, unit)| {
            value.as_ref().map(|v| format!("{}: {} {}", label, v, unit))
        })
        .collect()
    }
}

/// One historical survey.
#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct SurveyRecord {
    /// Position in the document's survey array.
    pub index: usize,
    pub date: Option<String>,
    /// "Status of the Fishery" prose, as HTML.
    pub narrative: Option<String>,
    pub fish_counts: BTreeMap<Species, Vec<FishCountEntry>>,
}

impl SurveyRecord {
    fn from_value(index: usize, value: &Value) -> Self {
        let date = value
            .get("surveyDate")
            .filter(|v| !v.is_null())
            .map(scalar_text);
        let narrative = value
            .get("narrative")
            .filter(|v| !v.is_null())
            .map(scalar_text);
        let mut fish_counts = BTreeMap::new();
        if let Some(lengths) = value.get("lengths").and_then(Value::as_object) {
            for species in Species::ALL {
                let entries = lengths
                    .get(species.code())
                    .and_then(|s| s.get("fishCount"))
                    .and_then(Value::as_array)
                    .map(|items| items.iter().filter_map(fish_count_entry).collect::<Vec<_>>())
                    .unwrap_or_default();
                if !entries.is_empty() {
                    fish_counts.insert(species, entries);
                }
            }
        }
        SurveyRecord {
            index,
            date,
            narrative,
            fish_counts,
        }
    }
}

/// Read a `[length, count]` pair, or an object keyed `0`/`1` (or `_0`/`_1`).
fn fish_count_entry(value: &Value) -> Option<FishCountEntry> {
    let (length, count) = match value {
        Value::Array(pair) => (pair.first(), pair.get(1)),
        Value::Object(fields) => (
            fields.get("0").or_else(|| fields.get("_0")),
            fields.get("1").or_else(|| fields.get("_1")),
        ),
        _ => (None, None),
    };
    let length = length.filter(|v| !v.is_null()).map(scalar_text)?;
    Some(FishCountEntry {
        length,
        count: count.filter(|v| !v.is_null()).map(scalar_text),
    })
}

/// Depth-first search for the first object holding `key`.
fn find_object_with_key<'a>(value: &'a Value, key: &str) -> Option<&'a Map<String, Value>> {
    match value {
        Value::Object(map) => {
            if map.contains_key(key) {
                return Some(map);
            }
            map.values().find_map(|child| find_object_with_key(child, key))
        }
        Value::Array(items) => items.iter().find_map(|child| find_object_with_key(child, key)),
        _ => None,
    }
}

/// A parsed survey response for one lake.
#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct SurveyDocument {
    /// Response status, e.g. "SUCCESS" or "ERROR".
    pub status: Option<String>,
    pub message: Option<String>,
    pub lake_name: Option<String>,
    pub dow_number: Option<String>,
    pub characteristics: LakeCharacteristics,
    pub surveys: Vec<SurveyRecord>,
    #[serde(skip)]
    raw: Value,
}

impl SurveyDocument {
    /// Parse a response body.
    pub fn parse(body: &str) -> Result<SurveyDocument> {
        let value: Value = serde_json::from_str(body)?;
        Ok(SurveyDocument::from_value(value))
    }

    pub fn from_value(value: Value) -> SurveyDocument {
        let text = |v: Option<&Value>| v.filter(|v| !v.is_null()).map(scalar_text);
        let status = text(value.get("status"));
        let message = text(value.get("message"));

        let empty = Map::new();
        let container = find_object_with_key(&value, SURVEYS_KEY)
            .or_else(|| value.get("result").and_then(Value::as_object))
            .or_else(|| value.as_object())
            .unwrap_or(&empty);

        let surveys: Vec<SurveyRecord> = container
            .get(SURVEYS_KEY)
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| SurveyRecord::from_value(i, item))
                    .collect()
            })
            .unwrap_or_default();
        debug!("Survey document holds {} surveys", surveys.len());

        SurveyDocument {
            status,
            message,
            lake_name: text(container.get("lakeName")),
            dow_number: text(container.get("DOWNumber")),
            characteristics: LakeCharacteristics::from_object(container),
            surveys,
            raw: value,
        }
    }

    /// True when the API reported an error instead of a survey result.
    pub fn is_error(&self) -> bool {
        self.status
            .as_deref()
            .is_some_and(|s| s.eq_ignore_ascii_case("ERROR"))
    }

    pub fn survey(&self, index: usize) -> Option<&SurveyRecord> {
        self.surveys.iter().find(|s| s.index == index)
    }

    /// The response tree as received.
    pub fn raw(&self) -> &Value {
        &self.raw
    }
}

impl SurveySource for SurveyDocument {
    fn survey_dates(&self) -> Vec<SurveyDate> {
        self.surveys
            .iter()
            .filter_map(|s| {
                s.date.as_ref().map(|date| SurveyDate {
                    index: s.index,
                    date: date.clone(),
                })
            })
            .collect()
    }

    fn fish_count_entries(&self, survey_index: usize, species: Species) -> Vec<FishCountEntry> {
        self.survey(survey_index)
            .and_then(|s| s.fish_counts.get(&species))
            .cloned()
            .unwrap_or_default()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serde_json::json;

    pub(crate) fn two_survey_document() -> Value {
        json!({
            "status": "SUCCESS",
            "message": "Lake survey found",
            "result": {
                "DOWNumber": "16063300",
                "lakeName": "Saganaga",
                "areaAcres": 13832.04,
                "littoralAcres": "3544",
                "shoreLengthMiles": 110.3,
                "meanDepthFeet": 30,
                "maxDepthFeet": 280,
                "averageWaterClarity": 15.1,
                "surveys": [
                    {
                        "surveyDate": "2015-06-01",
                        "narrative": "<p>Older survey</p>",
                        "lengths": {
                            "WAE": { "fishCount": [[10, 7], [11, 2]] }
                        }
                    },
                    {
                        "surveyDate": "2019-07-10",
                        "narrative": "<p>Walleye abundance is <b>high</b>.</p>",
                        "lengths": {
                            "WAE": { "fishCount": [[12, 5], [14, 3]] },
                            "NOP": { "fishCount": [{"0": 24, "1": 2}, {"0": 30, "1": null}] },
                            "BLG": { "fishCount": [[6, 40]] }
                        }
                    }
                ]
            }
        })
    }

    #[test]
    fn test_from_value_reads_surveys_and_characteristics() {
        let doc = SurveyDocument::from_value(two_survey_document());
        assert_eq!(doc.status.as_deref(), Some("SUCCESS"));
        assert!(!doc.is_error());
        assert_eq!(doc.lake_name.as_deref(), Some("Saganaga"));
        assert_eq!(doc.dow_number.as_deref(), Some("16063300"));
        assert_eq!(doc.surveys.len(), 2);
        assert_eq!(doc.characteristics.area_acres.as_deref(), Some("13832.04"));
        assert_eq!(doc.characteristics.mean_depth_feet.as_deref(), Some("30"));

        let latest = doc.survey(1).unwrap();
        assert_eq!(latest.date.as_deref(), Some("2019-07-10"));
        assert_eq!(latest.fish_counts.len(), 2, "BLG is not a tracked species");
        assert_eq!(
            latest.fish_counts[&Species::NorthernPike][1],
            FishCountEntry {
                length: "30".to_string(),
                count: None
            }
        );
    }

    #[test]
    fn test_display_lines_carry_units() {
        let doc = SurveyDocument::from_value(two_survey_document());
        let lines = doc.characteristics.display_lines();
        assert_eq!(lines[0], "Area: 13832.04 acres");
        assert_eq!(lines[2], "Shore Length: 110.3 miles");
        assert_eq!(lines[5], "Average Water Clarity: 15.1 ft");
    }

    #[test]
    fn test_surveys_found_at_any_depth() {
        let value = json!({
            "payload": { "lake": { "surveys": [ { "surveyDate": "2001-05-05" } ] } }
        });
        let doc = SurveyDocument::from_value(value);
        assert_eq!(
            doc.survey_dates(),
            vec![SurveyDate {
                index: 0,
                date: "2001-05-05".to_string()
            }]
        );
    }

    #[test]
    fn test_error_status_and_empty_document() {
        let doc = SurveyDocument::parse(r#"{"status":"ERROR","message":"No survey"}"#).unwrap();
        assert!(doc.is_error());
        assert!(doc.surveys.is_empty());
        assert!(doc.survey_dates().is_empty());
        assert!(doc.fish_count_entries(0, Species::Walleye).is_empty());
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(SurveyDocument::parse("<html>502</html>").is_err());
    }
}
