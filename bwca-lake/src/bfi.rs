//! Big Fish Index aggregates and percentile banding.
//!
//! The aggregate table holds, per lake, a precomputed BFI score and the
//! lake's percentile among all surveyed lakes for each species. Lakes
//! without enough survey history are absent from the table entirely, and
//! individual species may be blank for lakes that are present.

use crate::species::Species;
use bwca_utils::format::{format_grouped, format_percent};
use csv::ReaderBuilder;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Score and population percentile for one species on one lake.
#[derive(Debug, PartialEq, Clone, Copy, Default, Serialize, Deserialize)]
pub struct BfiScore {
    pub score: Option<f64>,
    /// Fraction in [0, 1].
    pub percentile: Option<f64>,
}

/// One row of the per-lake BFI aggregate table.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct BfiAggregate {
    pub lake_id: String,
    pub scores: BTreeMap<Species, BfiScore>,
}

/// `lakeagg.csv` row. Blank or non-numeric cells read as `None`.
#[derive(Debug, Deserialize)]
struct AggregateRow {
    #[serde(rename = "LakeID", alias = "ID")]
    lake_id: String,
    #[serde(rename = "BFI_WAE", default, deserialize_with = "csv::invalid_option")]
    wae: Option<f64>,
    #[serde(rename = "BFI_WAE_Pct", default, deserialize_with = "csv::invalid_option")]
    wae_pct: Option<f64>,
    #[serde(rename = "BFI_NOP", default, deserialize_with = "csv::invalid_option")]
    nop: Option<f64>,
    #[serde(rename = "BFI_NOP_Pct", default, deserialize_with = "csv::invalid_option")]
    nop_pct: Option<f64>,
    #[serde(rename = "BFI_LAT", default, deserialize_with = "csv::invalid_option")]
    lat: Option<f64>,
    #[serde(rename = "BFI_LAT_Pct", default, deserialize_with = "csv::invalid_option")]
    lat_pct: Option<f64>,
    #[serde(rename = "BFI_SMB", default, deserialize_with = "csv::invalid_option")]
    smb: Option<f64>,
    #[serde(rename = "BFI_SMB_Pct", default, deserialize_with = "csv::invalid_option")]
    smb_pct: Option<f64>,
}

fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

impl From<AggregateRow> for BfiAggregate {
    fn from(row: AggregateRow) -> Self {
        let pairs = [
            (Species::Walleye, row.wae, row.wae_pct),
            (Species::NorthernPike, row.nop, row.nop_pct),
            (Species::LakeTrout, row.lat, row.lat_pct),
            (Species::SmallmouthBass, row.smb, row.smb_pct),
        ];
        let scores = pairs
            .into_iter()
            .map(|(species, score, percentile)| {
                (
                    species,
                    BfiScore {
                        score: finite(score),
                        percentile: finite(percentile),
                    },
                )
            })
            .collect();
        BfiAggregate {
            lake_id: row.lake_id.trim().to_string(),
            scores,
        }
    }
}

impl BfiAggregate {
    /// Parse the aggregate CSV. Columns follow the `BFI_<SPECIES>` /
    /// `BFI_<SPECIES>_Pct` convention and are matched by header.
    pub fn parse_bfi_aggregate_csv(csv_object: &str) -> Result<Vec<BfiAggregate>, csv::Error> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(csv_object.as_bytes());
        rdr.deserialize::<AggregateRow>()
            .map(|row| row.map(BfiAggregate::from))
            .collect()
    }

    pub fn get(&self, species: Species) -> BfiScore {
        self.scores.get(&species).copied().unwrap_or_default()
    }

    /// Per-species display values, in `Species::ALL` order.
    pub fn resolve(&self) -> Vec<SpeciesBfi> {
        Species::ALL
            .iter()
            .map(|species| SpeciesBfi::new(*species, self.get(*species)))
            .collect()
    }
}

/// Resolved BFI for one species, ready for display.
#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct SpeciesBfi {
    pub species: Species,
    pub score: Option<f64>,
    pub percentile: Option<f64>,
    /// Score with two decimals, e.g. "1.27".
    pub score_display: Option<String>,
    /// Percentile as a percentage, e.g. "87.34%".
    pub percentile_display: Option<String>,
    pub tier: Option<PercentileTier>,
}

impl SpeciesBfi {
    pub fn new(species: Species, bfi: BfiScore) -> Self {
        SpeciesBfi {
            species,
            score: bfi.score,
            percentile: bfi.percentile,
            score_display: bfi.score.map(|s| format_grouped(s, 2)),
            percentile_display: bfi.percentile.map(format_percent),
            tier: bfi.percentile.and_then(PercentileTier::from_fraction),
        }
    }
}

/// Qualitative band of a population percentile, worst to best.
///
/// Each band is inclusive on its upper edge: 0.20 is `Poor`, 0.95 is
/// `Excellent`.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash, Serialize, Deserialize)]
pub enum PercentileTier {
    Poor,
    BelowAverage,
    Average,
    AboveAverage,
    Excellent,
    Trophy,
}

impl PercentileTier {
    /// Band a percentile fraction. Non-finite input has no band.
    pub fn from_fraction(p: f64) -> Option<PercentileTier> {
        if !p.is_finite() {
            return None;
        }
        let tier = if p <= 0.20 {
            PercentileTier::Poor
        } else if p <= 0.40 {
            PercentileTier::BelowAverage
        } else if p <= 0.60 {
            PercentileTier::Average
        } else if p <= 0.80 {
            PercentileTier::AboveAverage
        } else if p <= 0.95 {
            PercentileTier::Excellent
        } else {
            PercentileTier::Trophy
        };
        Some(tier)
    }

    /// 1 (worst) through 6 (best).
    pub fn rank(&self) -> u8 {
        match self {
            PercentileTier::Poor => 1,
            PercentileTier::BelowAverage => 2,
            PercentileTier::Average => 3,
            PercentileTier::AboveAverage => 4,
            PercentileTier::Excellent => 5,
            PercentileTier::Trophy => 6,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PercentileTier::Poor => "Poor",
            PercentileTier::BelowAverage => "Below Average",
            PercentileTier::Average => "Average",
            PercentileTier::AboveAverage => "Above Average",
            PercentileTier::Excellent => "Excellent",
            PercentileTier::Trophy => "Trophy",
        }
    }
}

impl fmt::Display for PercentileTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
