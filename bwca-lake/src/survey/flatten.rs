//! Structural flattening of a JSON tree into path/value pairs.
//!
//! Object keys and array positions are joined with `_`, so element `i`
//! field `f` under key `k` becomes `k_i_f`. Leaves are rendered as text.
//! Distinct paths can join to the same text (key `a_b` and nested `a.b`);
//! the leaf visited last wins and the overwrite is logged.

use super::{FishCountEntry, SurveyDate, SurveySource};
use crate::species::Species;
use log::warn;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

pub const PATH_SEPARATOR: char = '_';

/// Textual form of a leaf: strings as-is, everything else as JSON text
/// (`12`, `15.1`, `true`, `null`).
pub fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// A single flat row mapping leaf paths to text values.
#[derive(Debug, PartialEq, Eq, Clone, Default, Serialize)]
pub struct FlattenedRecord {
    fields: BTreeMap<String, String>,
}

impl FlattenedRecord {
    pub fn get(&self, path: &str) -> Option<&str> {
        self.fields.get(path).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Prefix of the survey array, e.g. `result_surveys`, taken from the
    /// first survey date path.
    fn surveys_prefix(&self) -> Option<&str> {
        self.fields
            .keys()
            .find_map(|key| split_survey_date_path(key).map(|(prefix, _)| prefix))
    }
}

/// Split `<prefix>_<index>_surveyDate` where the prefix ends in `surveys`.
fn split_survey_date_path(key: &str) -> Option<(&str, usize)> {
    let rest = key.strip_suffix("_surveyDate")?;
    let (prefix, index) = rest.rsplit_once(PATH_SEPARATOR)?;
    let index = index.parse::<usize>().ok()?;
    if prefix == "surveys" || prefix.ends_with("_surveys") {
        Some((prefix, index))
    } else {
        None
    }
}

fn join_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{}{}{}", prefix, PATH_SEPARATOR, key)
    }
}

fn flatten_into(value: &Value, prefix: &str, out: &mut BTreeMap<String, String>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                flatten_into(child, &join_path(prefix, key), out);
            }
        }
        Value::Array(items) => {
            for (i, child) in items.iter().enumerate() {
                flatten_into(child, &join_path(prefix, &i.to_string()), out);
            }
        }
        leaf => {
            if let Some(previous) = out.insert(prefix.to_string(), scalar_text(leaf)) {
                warn!("Path {} appears twice; replacing {:?}", prefix, previous);
            }
        }
    }
}

/// Flatten a JSON tree. Empty objects and arrays contribute no paths.
pub fn flatten(value: &Value) -> FlattenedRecord {
    let mut fields = BTreeMap::new();
    flatten_into(value, "", &mut fields);
    FlattenedRecord { fields }
}

impl SurveySource for FlattenedRecord {
    fn survey_dates(&self) -> Vec<SurveyDate> {
        let Some(surveys_prefix) = self.surveys_prefix() else {
            return Vec::new();
        };
        let mut dates: Vec<SurveyDate> = self
            .fields
            .iter()
            .filter_map(|(key, value)| {
                let (prefix, index) = split_survey_date_path(key)?;
                (prefix == surveys_prefix && value != "null").then(|| SurveyDate {
                    index,
                    date: value.clone(),
                })
            })
            .collect();
        dates.sort_by_key(|d| d.index);
        dates
    }

    fn fish_count_entries(&self, survey_index: usize, species: Species) -> Vec<FishCountEntry> {
        let Some(surveys_prefix) = self.surveys_prefix() else {
            return Vec::new();
        };
        let path = format!(
            "{}_{}_lengths_{}_fishCount_",
            surveys_prefix,
            survey_index,
            species.code()
        );

        // entry index -> (length, count)
        let mut pairs: BTreeMap<usize, (Option<String>, Option<String>)> = BTreeMap::new();
        for (key, value) in self.fields.range(path.clone()..) {
            let Some(rest) = key.strip_prefix(path.as_str()) else {
                break;
            };
            let Some((entry, field)) = rest.split_once(PATH_SEPARATOR) else {
                continue;
            };
            let Ok(entry) = entry.parse::<usize>() else {
                continue;
            };
            let slot = pairs.entry(entry).or_default();
            match field.trim_start_matches(PATH_SEPARATOR) {
                "0" => slot.0 = Some(value.clone()),
                "1" => slot.1 = Some(value.clone()).filter(|v| v != "null"),
                _ => {}
            }
        }

        pairs
            .into_values()
            .filter_map(|(length, count)| {
                let length = length.filter(|l| l != "null")?;
                Some(FishCountEntry { length, count })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::survey::tests::two_survey_document;
    use crate::survey::SurveyDocument;
    use serde_json::json;

    #[test]
    fn test_flatten_paths() {
        let value = json!({
            "k": [ { "f": 1 }, { "f": "two", "g": [true, null] } ],
            "empty": {},
            "n": 1.5
        });
        let flat = flatten(&value);
        assert_eq!(flat.get("k_0_f"), Some("1"));
        assert_eq!(flat.get("k_1_f"), Some("two"));
        assert_eq!(flat.get("k_1_g_0"), Some("true"));
        assert_eq!(flat.get("k_1_g_1"), Some("null"));
        assert_eq!(flat.get("n"), Some("1.5"));
        assert_eq!(flat.len(), 5);
    }

    #[test]
    fn test_colliding_paths_keep_last_leaf() {
        let value = json!({ "a_b": 1, "a": { "b": 2 } });
        let flat = flatten(&value);
        assert_eq!(flat.len(), 1);

        // Map iteration order decides which leaf is visited last.
        let expected = match value.as_object().unwrap().keys().last().map(String::as_str) {
            Some("a_b") => "1",
            _ => "2",
        };
        assert_eq!(flat.get("a_b"), Some(expected));
    }

    #[test]
    fn test_flatten_is_deterministic() {
        let value = two_survey_document();
        assert_eq!(flatten(&value), flatten(&value));
    }

    #[test]
    fn test_flattened_matches_typed_document() {
        let value = two_survey_document();
        let flat = flatten(&value);
        let doc = SurveyDocument::from_value(value);

        assert_eq!(flat.get("result_surveys_1_surveyDate"), Some("2019-07-10"));
        assert_eq!(flat.get("result_surveys_1_lengths_WAE_fishCount_0_0"), Some("12"));
        assert_eq!(flat.get("result_surveys_1_lengths_WAE_fishCount_0_1"), Some("5"));

        assert_eq!(flat.survey_dates(), doc.survey_dates());
        for species in Species::ALL {
            for index in 0..2 {
                assert_eq!(
                    flat.fish_count_entries(index, species),
                    doc.fish_count_entries(index, species),
                    "{} survey {}",
                    species,
                    index
                );
            }
        }
    }

    #[test]
    fn test_underscored_entry_keys() {
        let value = json!({ "result": { "surveys": [ {
            "surveyDate": "2019-07-10",
            "lengths": { "WAE": { "fishCount": [{ "_0": 12, "_1": 5 }, { "_0": 14, "_1": null }] } }
        } ] } });
        let flat = flatten(&value);
        assert_eq!(flat.get("result_surveys_0_lengths_WAE_fishCount_0__0"), Some("12"));
        assert_eq!(flat.get("result_surveys_0_lengths_WAE_fishCount_0__1"), Some("5"));

        let entries = flat.fish_count_entries(0, Species::Walleye);
        assert_eq!(
            entries,
            vec![
                FishCountEntry { length: "12".to_string(), count: Some("5".to_string()) },
                FishCountEntry { length: "14".to_string(), count: None },
            ]
        );
        let doc = SurveyDocument::from_value(value);
        assert_eq!(entries, doc.fish_count_entries(0, Species::Walleye));
    }

    #[test]
    fn test_entry_order_is_numeric() {
        let items: Vec<Value> = (0..12).map(|i| json!([i, 1])).collect();
        let value = json!({ "surveys": [ { "surveyDate": "2020-01-01", "lengths": { "SMB": { "fishCount": items } } } ] });
        let entries = flatten(&value).fish_count_entries(0, Species::SmallmouthBass);
        let lengths: Vec<&str> = entries.iter().map(|e| e.length.as_str()).collect();
        assert_eq!(
            lengths,
            vec!["0", "1", "2", "3", "4", "5", "6", "7", "8", "9", "10", "11"]
        );
    }

    #[test]
    fn test_no_surveys() {
        let flat = flatten(&json!({ "status": "ERROR" }));
        assert!(flat.survey_dates().is_empty());
        assert!(flat.fish_count_entries(0, Species::Walleye).is_empty());
    }
}
