//! Length-distribution processing for fishery surveys.
//!
//! This crate turns per-species length histograms into percentage
//! distributions suitable for charting, and pairs them with the
//! all-lakes population baseline.

/// Normalization of raw length counts into percentage distributions.
pub mod distribution {
    use bwca_lake::species::Species;
    use bwca_lake::survey::histogram::{length_bins, LengthBin, LengthHistogram};
    use log::debug;
    use serde::Serialize;
    use std::collections::BTreeMap;
    use std::io::Write;

    /// Share of a species' fish at each length.
    ///
    /// Only bins with a recorded count have a value. When the species'
    /// total is zero no bin has a value: "no data" is not a flat zero curve.
    #[derive(Debug, Clone, PartialEq, Serialize)]
    pub struct LengthDistribution {
        pub species: Species,
        pct: BTreeMap<LengthBin, f64>,
    }

    impl LengthDistribution {
        pub fn from_histogram(histogram: &LengthHistogram) -> Self {
            let total = histogram.total();
            let pct = if total == 0 {
                BTreeMap::new()
            } else {
                histogram
                    .iter()
                    .map(|(bin, count)| (bin, f64::from(count) / total as f64))
                    .collect()
            };
            LengthDistribution {
                species: histogram.species,
                pct,
            }
        }

        pub fn get(&self, bin: LengthBin) -> Option<f64> {
            self.pct.get(&bin).copied()
        }

        /// False when the species had no fish in the survey.
        pub fn has_data(&self) -> bool {
            !self.pct.is_empty()
        }

        pub fn iter(&self) -> impl Iterator<Item = (LengthBin, f64)> + '_ {
            self.pct.iter().map(|(bin, pct)| (*bin, *pct))
        }
    }

    /// One length bin of the distribution table: raw counts and shares for
    /// all four species.
    #[derive(Debug, Clone, PartialEq, Serialize)]
    pub struct DistributionRow {
        #[serde(rename = "Length")]
        pub length: LengthBin,
        #[serde(rename = "SMBcnt")]
        pub smb_count: Option<u32>,
        #[serde(rename = "NOPcnt")]
        pub nop_count: Option<u32>,
        #[serde(rename = "WAEcnt")]
        pub wae_count: Option<u32>,
        #[serde(rename = "LATcnt")]
        pub lat_count: Option<u32>,
        #[serde(rename = "SMBpct")]
        pub smb_pct: Option<f64>,
        #[serde(rename = "NOPpct")]
        pub nop_pct: Option<f64>,
        #[serde(rename = "WAEpct")]
        pub wae_pct: Option<f64>,
        #[serde(rename = "LATpct")]
        pub lat_pct: Option<f64>,
    }

    impl DistributionRow {
        pub fn count(&self, species: Species) -> Option<u32> {
            match species {
                Species::Walleye => self.wae_count,
                Species::NorthernPike => self.nop_count,
                Species::LakeTrout => self.lat_count,
                Species::SmallmouthBass => self.smb_count,
            }
        }

        pub fn pct(&self, species: Species) -> Option<f64> {
            match species {
                Species::Walleye => self.wae_pct,
                Species::NorthernPike => self.nop_pct,
                Species::LakeTrout => self.lat_pct,
                Species::SmallmouthBass => self.smb_pct,
            }
        }
    }

    /// The 47-row length table for one survey.
    #[derive(Debug, Clone, PartialEq, Serialize)]
    pub struct DistributionTable {
        pub rows: Vec<DistributionRow>,
        pub distributions: BTreeMap<Species, LengthDistribution>,
    }

    impl DistributionTable {
        pub fn distribution(&self, species: Species) -> Option<&LengthDistribution> {
            self.distributions.get(&species)
        }

        /// Write the table as CSV; undefined cells are left empty.
        pub fn write_csv<W: Write>(&self, writer: W) -> anyhow::Result<()> {
            let mut wtr = csv::Writer::from_writer(writer);
            for row in &self.rows {
                wtr.serialize(row)?;
            }
            wtr.flush()?;
            Ok(())
        }
    }

    /// Normalize each species' histogram over the fixed 0..=46 domain.
    ///
    /// Species missing from `histograms` are treated as empty.
    pub fn normalize(histograms: &BTreeMap<Species, LengthHistogram>) -> DistributionTable {
        let empty: BTreeMap<Species, LengthHistogram> = Species::ALL
            .iter()
            .map(|s| (*s, LengthHistogram::new(*s)))
            .collect();
        let histogram = |species: Species| {
            histograms
                .get(&species)
                .unwrap_or_else(|| &empty[&species])
        };

        let distributions: BTreeMap<Species, LengthDistribution> = Species::ALL
            .iter()
            .map(|s| (*s, LengthDistribution::from_histogram(histogram(*s))))
            .collect();
        for (species, distribution) in &distributions {
            debug!(
                "{}: {} fish across {} bins, has_data={}",
                species,
                histogram(*species).total(),
                histogram(*species).len(),
                distribution.has_data()
            );
        }

        let rows = length_bins()
            .map(|length| DistributionRow {
                length,
                smb_count: histogram(Species::SmallmouthBass).get(length),
                nop_count: histogram(Species::NorthernPike).get(length),
                wae_count: histogram(Species::Walleye).get(length),
                lat_count: histogram(Species::LakeTrout).get(length),
                smb_pct: distributions[&Species::SmallmouthBass].get(length),
                nop_pct: distributions[&Species::NorthernPike].get(length),
                wae_pct: distributions[&Species::Walleye].get(length),
                lat_pct: distributions[&Species::LakeTrout].get(length),
            })
            .collect();

        DistributionTable {
            rows,
            distributions,
        }
    }

}

/// Lake distribution against the all-lakes baseline.
pub mod comparison {
    use crate::distribution::LengthDistribution;
    use bwca_lake::population::PopulationBaseline;
    use bwca_lake::survey::histogram::LengthBin;
    use serde::Serialize;

    /// One chart point: this lake's share (bar) and the population's share
    /// (line) at a length.
    #[derive(Debug, Clone, PartialEq, Serialize)]
    pub struct ComparisonPoint {
        pub length: LengthBin,
        pub lake_pct: Option<f64>,
        pub population_pct: Option<f64>,
    }

    /// Pair a lake's distribution with the baseline across the species'
    /// chart range (0 through `Species::chart_max_length`).
    pub fn compare_to_population(
        distribution: &LengthDistribution,
        baseline: &PopulationBaseline,
    ) -> Vec<ComparisonPoint> {
        let species = distribution.species;
        (0..=species.chart_max_length())
            .map(|length| ComparisonPoint {
                length,
                lake_pct: distribution.get(length),
                population_pct: baseline.pct(species, length),
            })
            .collect()
    }

}
