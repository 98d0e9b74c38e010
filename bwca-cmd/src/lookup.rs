//! End-to-end lake lookup.
//!
//! Resolves a lake name against the reference tables, fetches its survey
//! document, and assembles everything shown for one lake. Failures are kept
//! per section: a failed fetch suppresses only the fishery section, a lake
//! missing from the aggregate table suppresses only the BFI section, and a
//! species without length data suppresses only that species.

use bwca_data::comparison::{compare_to_population, ComparisonPoint};
use bwca_data::distribution::{normalize, DistributionTable, LengthDistribution};
use bwca_db::ReferenceTables;
use bwca_lake::bfi::SpeciesBfi;
use bwca_lake::error::{BwcaError, Result};
use bwca_lake::lake::LakeIdentity;
use bwca_lake::population::PopulationBaseline;
use bwca_lake::species::Species;
use bwca_lake::survey::client::SurveyClient;
use bwca_lake::survey::histogram::extract_all;
use bwca_lake::survey::selector::{select_most_recent, SelectedSurvey};
use bwca_lake::survey::{LakeCharacteristics, SurveyDocument};
use bwca_lake::waypoint::{map_center, WaypointRecord};
use log::{info, warn};
use std::collections::BTreeMap;

/// Distribution of one species in the selected survey.
#[derive(Debug, Clone)]
pub struct SpeciesReport {
    pub species: Species,
    pub fish_counted: u64,
    pub distribution: LengthDistribution,
    /// Lake against the all-lakes baseline over the species' chart range.
    pub comparison: Vec<ComparisonPoint>,
}

impl SpeciesReport {
    /// Most common length and its share.
    pub fn mode(&self) -> Option<(u8, f64)> {
        self.distribution
            .iter()
            .fold(None, |best: Option<(u8, f64)>, (bin, pct)| match best {
                Some((_, top)) if top >= pct => best,
                _ => Some((bin, pct)),
            })
    }
}

/// Fishery section: the most recent survey and its length distributions.
#[derive(Debug)]
pub struct FisheryReport {
    pub survey: SelectedSurvey,
    /// "Status of the Fishery" prose as HTML.
    pub narrative: Option<String>,
    pub characteristics: LakeCharacteristics,
    pub table: DistributionTable,
    pub species: BTreeMap<Species, Result<SpeciesReport>>,
}

/// Everything known about one lake.
#[derive(Debug)]
pub struct LakeReport {
    pub lake: LakeIdentity,
    pub campsites: Vec<WaypointRecord>,
    /// `None` when other lakes share this name.
    pub campsite_count: Option<usize>,
    pub map_center: Option<(f64, f64)>,
    pub bfi: Result<Vec<SpeciesBfi>>,
    pub fishery: Result<FisheryReport>,
}

/// Select the most recent survey and build its distributions.
pub fn build_fishery_report(
    document: &SurveyDocument,
    baseline: &PopulationBaseline,
) -> Result<FisheryReport> {
    let survey = select_most_recent(document)?;
    let histograms = extract_all(document, &survey);
    let table = normalize(&histograms);

    let species = Species::ALL
        .iter()
        .map(|species| {
            let report = match table.distribution(*species) {
                Some(distribution) if distribution.has_data() => Ok(SpeciesReport {
                    species: *species,
                    fish_counted: histograms.get(species).map_or(0, |h| h.total()),
                    distribution: distribution.clone(),
                    comparison: compare_to_population(distribution, baseline),
                }),
                _ => Err(BwcaError::SpeciesDataAbsent(*species)),
            };
            (*species, report)
        })
        .collect();

    let record = document.survey(survey.index);
    Ok(FisheryReport {
        narrative: record.and_then(|r| r.narrative.clone()),
        characteristics: document.characteristics.clone(),
        survey,
        table,
        species,
    })
}

/// Assemble the report for a resolved lake from an already completed fetch.
pub fn build_lake_report(
    tables: &ReferenceTables,
    lake: LakeIdentity,
    fetched: Result<SurveyDocument>,
) -> anyhow::Result<LakeReport> {
    let campsites = tables.query_campsites(&lake.name)?;
    let namesakes = tables.query_lakes_by_name(&lake.name)?.len();
    let campsite_count = (namesakes <= 1).then_some(campsites.len());
    let center = map_center(&campsites);

    let bfi = tables.bfi_for_lake(&lake.lake_id).map(|row| row.resolve());
    if let Err(e) = &bfi {
        info!("{}", e);
    }

    let baseline = tables.query_population_baseline()?;
    let fishery = fetched.and_then(|document| build_fishery_report(&document, &baseline));
    if let Err(e) = &fishery {
        warn!("Fishery section unavailable for {}: {}", lake.lake_id, e);
    }

    Ok(LakeReport {
        lake,
        campsites,
        campsite_count,
        map_center: center,
        bfi,
        fishery,
    })
}

/// Resolve `name` (and `town`, when several lakes share the name), fetch the
/// survey, and build the report.
///
/// Only lookup failures are errors here: [`BwcaError::LakeNotFound`] and
/// [`BwcaError::AmbiguousLake`] come back through `anyhow` and can be
/// downcast. Fetch failures land in [`LakeReport::fishery`].
pub async fn lookup_lake(
    tables: &ReferenceTables,
    client: &SurveyClient,
    name: &str,
    town: Option<&str>,
) -> anyhow::Result<LakeReport> {
    let lake = tables.resolve_lake(name, town)?;
    info!(
        "Resolved {} ({}) to lake {}",
        lake.name, lake.nearest_town, lake.lake_id
    );
    let fetched = client.fetch(&lake.lake_id).await;
    build_lake_report(tables, lake, fetched)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn document() -> SurveyDocument {
        SurveyDocument::from_value(json!({
            "status": "SUCCESS",
            "result": {
                "lakeName": "Saganaga",
                "areaAcres": 13832.04,
                "surveys": [
                    {
                        "surveyDate": "2015-06-01",
                        "lengths": { "WAE": { "fishCount": [[10, 7]] } }
                    },
                    {
                        "surveyDate": "2019-07-10",
                        "narrative": "<p>Walleye abundance was high.</p>",
                        "lengths": {
                            "WAE": { "fishCount": [{ "_0": 12, "_1": 5 }, { "_0": 14, "_1": 3 }] },
                            "SMB": { "fishCount": [[11, 0]] }
                        }
                    }
                ]
            }
        }))
    }

    #[test]
    fn test_fishery_report_uses_latest_survey() {
        let baseline = PopulationBaseline::parse_population_csv("Length,WAEpct\n12,0.3\n").unwrap();
        let report = build_fishery_report(&document(), &baseline).unwrap();
        assert_eq!(report.survey.date, "2019-07-10");
        assert_eq!(report.narrative.as_deref(), Some("<p>Walleye abundance was high.</p>"));
        assert_eq!(report.characteristics.area_acres.as_deref(), Some("13832.04"));

        let walleye = report.species[&Species::Walleye].as_ref().unwrap();
        assert_eq!(walleye.fish_counted, 8);
        assert_eq!(walleye.distribution.get(12), Some(0.625));
        assert_eq!(walleye.mode(), Some((12, 0.625)));
        assert_eq!(walleye.comparison.len(), 33);
        assert_eq!(walleye.comparison[12].population_pct, Some(0.3));
    }

    #[test]
    fn test_species_without_fish_are_absent_individually() {
        let report = build_fishery_report(&document(), &PopulationBaseline::default()).unwrap();
        for species in [Species::NorthernPike, Species::LakeTrout, Species::SmallmouthBass] {
            assert!(matches!(
                report.species[&species],
                Err(BwcaError::SpeciesDataAbsent(s)) if s == species
            ));
        }
        assert!(report.species[&Species::Walleye].is_ok());
    }

    #[test]
    fn test_document_without_surveys() {
        let doc = SurveyDocument::from_value(json!({ "status": "SUCCESS", "result": {} }));
        let err = build_fishery_report(&doc, &PopulationBaseline::default()).unwrap_err();
        assert!(matches!(err, BwcaError::NoSurveysInDocument));
    }
}
